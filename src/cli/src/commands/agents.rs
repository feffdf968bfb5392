//! `agents list`.

use anyhow::Result;
use clap::Subcommand;
use tabled::Tabled;

use crate::context::Context;
use crate::service;
use crate::types::Agent;
use crate::util::{format_timestamp, or_dash};

#[derive(Subcommand)]
pub enum AgentsCommands {
    /// List all agents
    List,
}

#[derive(Debug, Tabled)]
pub(crate) struct AgentRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Created At")]
    created_at: String,
}

impl From<&Agent> for AgentRow {
    fn from(agent: &Agent) -> Self {
        Self {
            id: agent.id(),
            name: or_dash(agent.name().as_deref()),
            created_at: agent
                .created_at()
                .as_deref()
                .map(format_timestamp)
                .unwrap_or_else(|| "-".into()),
        }
    }
}

pub async fn execute(cmd: AgentsCommands, ctx: &Context) -> Result<()> {
    match cmd {
        AgentsCommands::List => {
            let agents = service::list_agents(ctx).await.into_inner();

            if ctx.out.is_json() {
                return ctx.out.json(&agents);
            }

            match agents.as_deref() {
                None | Some([]) => ctx.out.result("No agents found."),
                Some(agents) => {
                    let rows: Vec<AgentRow> = agents.iter().map(AgentRow::from).collect();
                    ctx.out.table(&rows);
                }
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
    fn row_fills_missing_fields() {
        let agent: Agent = serde_json::from_value(json!({"id": "a-1"})).unwrap();
        let row = AgentRow::from(&agent);
        assert_eq!(row.name, "-");
        assert_eq!(row.created_at, "-");
    }

    #[tokio::test]
    async fn failed_listing_sets_exit_code_without_erroring() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/agents/browser-use"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let ctx = context(&server.uri());
        execute(AgentsCommands::List, &ctx).await.unwrap();
        assert_eq!(ctx.exit.get(), 1);
    }
}
