//! `prompt`: create a task and wait for its result.

use anyhow::Result;
use clap::Args;

use crate::config::{validate_wait, MAX_WAIT_SECS};
use crate::context::Context;
use crate::util::display_value;

use super::task::{submit, SchemaArgs, SubmitLabels};

#[derive(Args)]
pub struct PromptArgs {
    /// Prompt text to create a new task
    pub text: String,

    /// Seconds the server may wait for the task to finish (0-900)
    #[arg(long, default_value_t = MAX_WAIT_SECS, allow_negative_numbers = true)]
    pub wait: i64,

    #[command(flatten)]
    pub schema: SchemaArgs,
}

pub async fn execute(args: PromptArgs, ctx: &Context) -> Result<()> {
    let wait = validate_wait(args.wait)?;
    let labels = SubmitLabels {
        running: "Executing prompt, this may take a while...",
        done: "Prompt completed successfully!",
        failed: "Failed to execute prompt",
        error: "Error executing prompt:",
    };

    let Some(task) = submit(ctx, &args.text, wait, &args.schema, &labels).await else {
        return Ok(());
    };

    if ctx.out.is_json() {
        return ctx.out.json(&task);
    }

    let id = task.id();
    match (task.result(), task.error_message()) {
        (Some(result), _) => {
            ctx.out.log("Result:");
            ctx.out.result(display_value(result));
        }
        (None, Some(error)) => ctx.fail(format!("Task {} failed: {}", id, error)),
        (None, None) => {
            let status = task.status().unwrap_or_else(|| "unknown".into());
            ctx.out.info(&format!(
                "Task {} has no result yet (status: {}). Check later with `task result {}`.",
                id, status, id
            ));
        }
    }

    Ok(())
}
