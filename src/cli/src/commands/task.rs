//! Task management commands.
//!
//! Provides get, cancel, result, create and delete operations for tasks.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Subcommand};
use serde_json::Value;

use crate::config::validate_wait;
use crate::context::Context;
use crate::error::InputError;
use crate::output::Output;
use crate::service;
use crate::types::Task;
use crate::util::{display_value, format_timestamp, load_schema};

#[derive(Subcommand)]
pub enum TaskCommands {
    /// Show a task
    Get {
        /// Task ID
        task_id: String,
    },

    /// Cancel a running task
    Cancel {
        /// Task ID
        task_id: String,
    },

    /// Show the result of a task
    #[command(name = "result")]
    TaskResult {
        /// Task ID
        task_id: String,
    },

    /// Create a new task
    Create {
        /// Prompt for the agent
        prompt: String,

        /// Seconds the server may wait for the task to finish (0-900)
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        wait: i64,

        #[command(flatten)]
        schema: SchemaArgs,
    },

    /// Delete a task
    Delete {
        /// Task ID
        task_id: String,
    },
}

impl TaskCommands {
    pub fn wait(&self) -> Option<i64> {
        match self {
            TaskCommands::Create { wait, .. } => Some(*wait),
            _ => None,
        }
    }
}

/// Output schema options shared by `task create` and `prompt`.
#[derive(Debug, Clone, Default, Args)]
pub struct SchemaArgs {
    /// JSON schema the task result must follow
    #[arg(long)]
    pub schema: Option<String>,

    /// Path to a file containing the JSON schema
    #[arg(long)]
    pub schema_file: Option<PathBuf>,
}

impl SchemaArgs {
    pub fn load(&self) -> Result<Option<Value>, InputError> {
        load_schema(self.schema.as_deref(), self.schema_file.as_deref())
    }
}

/// Labels used while a task submission is in flight.
pub(crate) struct SubmitLabels {
    pub running: &'static str,
    pub done: &'static str,
    pub failed: &'static str,
    /// Printed on the error channel ahead of the request error.
    pub error: &'static str,
}

/// Validate the schema, submit the prompt and report failures.
///
/// Returns `None` when the submission failed; the failure has already been
/// printed and the exit code raised.
pub(crate) async fn submit(
    ctx: &Context,
    prompt: &str,
    wait: u32,
    schema: &SchemaArgs,
    labels: &SubmitLabels,
) -> Option<Task> {
    let schema = match schema.load() {
        Ok(schema) => schema,
        Err(err) => {
            ctx.fail(err);
            return None;
        }
    };

    let spinner = ctx.out.spinner(labels.running);

    match service::prompt_agent(ctx, prompt, wait, schema.as_ref()).await {
        Ok(task) => {
            spinner.succeed(labels.done);
            Some(task)
        }
        Err(err) => {
            spinner.fail(labels.failed);
            ctx.fail(labels.error);
            ctx.out.error(&err);
            None
        }
    }
}

/// Labeled lines for a single task.
pub(crate) fn print_task(out: &Output, task: &Task) {
    out.header(&format!("Task: {}", task.id()));

    if let Some(agent) = task.agent_id() {
        out.detail("Agent", &agent);
    }
    if let Some(status) = task.status() {
        out.detail("Status", &status);
    }
    if let Some(prompt) = task.prompt() {
        out.detail("Prompt", &prompt);
    }
    if let Some(created) = task.created_at() {
        out.detail("Created", &format_timestamp(&created));
    }
    if let Some(updated) = task.updated_at() {
        out.detail("Updated", &format_timestamp(&updated));
    }
    if let Some(schema) = task.output_schema() {
        out.detail("Output Schema", &display_value(schema));
    }
    if let Some(error) = task.error_message() {
        out.detail("Error", &error);
    }
    if let Some(result) = task.result() {
        out.detail("Result", &display_value(result));
    }
}

pub async fn execute(cmd: TaskCommands, ctx: &Context) -> Result<()> {
    match cmd {
        TaskCommands::Get { task_id } => match service::get_agent_task(ctx, &task_id).await {
            Ok(task) if ctx.out.is_json() => ctx.out.json(&task)?,
            Ok(task) => print_task(&ctx.out, &task),
            Err(err) => {
                ctx.fail(format!("Failed to get task {}", task_id));
                ctx.out.error(&err);
            }
        },

        TaskCommands::Cancel { task_id } => match service::cancel_task(ctx, &task_id).await {
            Ok(resp) if ctx.out.is_json() => ctx.out.json(&resp)?,
            Ok(resp) => {
                ctx.out.success(&format!("Task {} cancelled", task_id));
                if let Some(status) = resp.get("status").and_then(Value::as_str) {
                    ctx.out.detail("Status", status);
                }
            }
            Err(err) => {
                ctx.fail(format!("Failed to cancel task {}", task_id));
                ctx.out.error(&err);
            }
        },

        TaskCommands::TaskResult { task_id } => match service::get_task_result(ctx, &task_id).await {
            Ok(body) if ctx.out.is_json() => ctx.out.json(&body)?,
            Ok(body) => {
                let result = body.get("result").unwrap_or(&body);
                ctx.out.log("Result:");
                ctx.out.result(display_value(result));
            }
            Err(err) => {
                ctx.fail(format!("Failed to get result for task {}", task_id));
                ctx.out.error(&err);
            }
        },

        TaskCommands::Create {
            prompt,
            wait,
            schema,
        } => {
            let wait = validate_wait(wait)?;
            let labels = SubmitLabels {
                running: "Creating task...",
                done: "Task created",
                failed: "Failed to create task",
                error: "Error creating task:",
            };

            if let Some(task) = submit(ctx, &prompt, wait, &schema, &labels).await {
                if ctx.out.is_json() {
                    ctx.out.json(&task)?;
                } else {
                    print_task(&ctx.out, &task);
                }
            }
        }

        TaskCommands::Delete { task_id } => {
            let deleted = service::delete_task(ctx, &task_id).await;

            if !deleted {
                ctx.fail(format!("Failed to delete task {}", task_id));
            }

            if ctx.out.is_json() {
                return ctx.out.json(&deleted);
            }

            if deleted {
                ctx.out.success(&format!("Task {} deleted", task_id));
            }
        }
    }

    Ok(())
}
