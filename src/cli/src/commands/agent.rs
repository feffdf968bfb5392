//! Commands on a single agent.
//!
//! Provides task listing and deletion for one agent.

use anyhow::Result;
use clap::Subcommand;
use tabled::Tabled;

use crate::context::Context;
use crate::service;
use crate::types::Task;
use crate::util::{format_timestamp, or_dash, truncate};

/// Longest prompt shown in the tasks table.
const PROMPT_COLUMN_WIDTH: usize = 60;

#[derive(Subcommand)]
pub enum AgentCommands {
    /// Get tasks on a specific agent
    Tasks {
        /// Agent ID
        agent_id: String,
    },

    /// Delete a specific agent
    Delete {
        /// Agent ID
        agent_id: String,
    },
}

#[derive(Debug, Tabled)]
pub(crate) struct TaskRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Prompt")]
    prompt: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Created At")]
    created_at: String,
    #[tabled(rename = "Updated At")]
    updated_at: String,
}

impl From<&Task> for TaskRow {
    fn from(task: &Task) -> Self {
        let timestamp = |raw: Option<&str>| raw.map(format_timestamp).unwrap_or_else(|| "-".into());

        Self {
            id: task.id(),
            prompt: truncate(task.prompt().as_deref().unwrap_or("-"), PROMPT_COLUMN_WIDTH),
            status: or_dash(task.status().as_deref()),
            created_at: timestamp(task.created_at().as_deref()),
            updated_at: timestamp(task.updated_at().as_deref()),
        }
    }
}

pub async fn execute(cmd: AgentCommands, ctx: &Context) -> Result<()> {
    match cmd {
        AgentCommands::Tasks { agent_id } => {
            let outcome = service::get_agent_tasks(ctx, &agent_id).await;
            let degraded = outcome.is_degraded();
            let tasks = outcome.into_inner();

            if ctx.out.is_json() {
                return ctx.out.json(&tasks);
            }

            // A failed listing has already been reported.
            if degraded {
                return Ok(());
            }

            if tasks.is_empty() {
                ctx.out.log("No tasks found for this agent.");
                return Ok(());
            }

            let rows: Vec<TaskRow> = tasks.iter().map(TaskRow::from).collect();
            ctx.out.table(&rows);
            ctx.out.log(format!("Total tasks: {}", tasks.len()));
        }

        AgentCommands::Delete { agent_id } => {
            let deleted = service::delete_agent(ctx, &agent_id).await;

            if !deleted {
                ctx.fail(format!("Failed to delete agent {}", agent_id));
            }

            if ctx.out.is_json() {
                return ctx.out.json(&deleted);
            }

            if deleted {
                ctx.out.success(&format!("Agent {} deleted", agent_id));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::test_support::context;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn row_truncates_long_prompts() {
        let task: Task = serde_json::from_value(json!({
            "id": "t-1",
            "prompt": "x".repeat(200),
            "status": "running",
            "created_at": "2025-03-01T10:00:00Z"
        }))
        .unwrap();

        let row = TaskRow::from(&task);
        assert_eq!(row.prompt.chars().count(), PROMPT_COLUMN_WIDTH);
        assert_eq!(row.created_at, "2025-03-01 10:00:00 UTC");
        assert_eq!(row.updated_at, "-");
    }

    #[tokio::test]
    async fn failed_delete_sets_exit_code() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/v1/agents/browser-use/a-1"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let ctx = context(&server.uri());
        execute(
            AgentCommands::Delete {
                agent_id: "a-1".into(),
            },
            &ctx,
        )
        .await
        .unwrap();
        assert_eq!(ctx.exit.get(), 1);
    }

    #[tokio::test]
    async fn successful_delete_keeps_exit_code() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/v1/agents/browser-use/a-1"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let ctx = context(&server.uri());
        execute(
            AgentCommands::Delete {
                agent_id: "a-1".into(),
            },
            &ctx,
        )
        .await
        .unwrap();
        assert_eq!(ctx.exit.get(), 0);
    }
}
