//! Agent and task operations on the Gobii API.
//!
//! Each operation has a fixed failure policy:
//!
//! | operation | on failure |
//! |---|---|
//! | [`list_agents`] | logged, exit code 1, [`Outcome::Degraded`]`(None)` |
//! | [`get_agent_tasks`] | logged, exit code 1, [`Outcome::Degraded`]`(vec![])` |
//! | [`get_agent_task`], [`cancel_task`], [`get_task_result`], [`prompt_agent`] | `Err` returned to the caller |
//! | [`delete_agent`], [`delete_task`], [`ping`] | `false` |

use reqwest::Method;
use serde_json::Value;

use crate::client::RequestOptions;
use crate::context::Context;
use crate::error::ApiError;
use crate::types::{Agent, CreateTaskRequest, ResultsPage, Task};

const AGENTS: &str = "agents/browser-use";
const TASKS: &str = "tasks/browser-use";

/// Result of an operation that degrades to a default value instead of failing.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Ok(T),
    /// The request failed; the failure was already reported and the exit
    /// code raised. Carries the operation's default value.
    Degraded(T),
}

impl<T> Outcome<T> {
    pub fn is_degraded(&self) -> bool {
        matches!(self, Outcome::Degraded(_))
    }

    pub fn into_inner(self) -> T {
        match self {
            Outcome::Ok(value) | Outcome::Degraded(value) => value,
        }
    }
}

/// `GET agents/browser-use`. Degrades to `None`.
pub async fn list_agents(ctx: &Context) -> Outcome<Option<Vec<Agent>>> {
    match ctx
        .client
        .fetch_json::<ResultsPage<Agent>>(AGENTS, RequestOptions::default())
        .await
    {
        Ok(page) => Outcome::Ok(page.results),
        Err(err) => {
            tracing::warn!(error = %err, "listing agents failed");
            ctx.fail("Error listing agents");
            ctx.out.error(&err);
            Outcome::Degraded(None)
        }
    }
}

/// `GET agents/browser-use/{agent_id}/tasks`. Degrades to an empty list.
pub async fn get_agent_tasks(ctx: &Context, agent_id: &str) -> Outcome<Vec<Task>> {
    let endpoint = format!("{}/{}/tasks", AGENTS, agent_id);
    match ctx
        .client
        .fetch_json::<ResultsPage<Task>>(&endpoint, RequestOptions::default())
        .await
    {
        Ok(page) => Outcome::Ok(page.results.unwrap_or_default()),
        Err(err) => {
            tracing::warn!(agent_id, error = %err, "listing agent tasks failed");
            ctx.fail("Error getting agent tasks");
            ctx.out.error(&err);
            Outcome::Degraded(Vec::new())
        }
    }
}

/// `GET tasks/browser-use/{task_id}`.
pub async fn get_agent_task(ctx: &Context, task_id: &str) -> Result<Task, ApiError> {
    ctx.client
        .fetch_json(&format!("{}/{}", TASKS, task_id), RequestOptions::default())
        .await
}

/// `DELETE agents/browser-use/{agent_id}`.
pub async fn delete_agent(ctx: &Context, agent_id: &str) -> bool {
    ctx.client
        .fetch_success(
            &format!("{}/{}", AGENTS, agent_id),
            RequestOptions::method(Method::DELETE),
        )
        .await
}

/// `POST tasks/browser-use/{task_id}/cancel/`.
pub async fn cancel_task(ctx: &Context, task_id: &str) -> Result<Value, ApiError> {
    ctx.client
        .fetch_json(
            &format!("{}/{}/cancel/", TASKS, task_id),
            RequestOptions::method(Method::POST),
        )
        .await
}

/// `DELETE tasks/browser-use/{task_id}`.
pub async fn delete_task(ctx: &Context, task_id: &str) -> bool {
    ctx.client
        .fetch_success(
            &format!("{}/{}", TASKS, task_id),
            RequestOptions::method(Method::DELETE),
        )
        .await
}

/// `GET tasks/browser-use/{task_id}/result/`.
pub async fn get_task_result(ctx: &Context, task_id: &str) -> Result<Value, ApiError> {
    ctx.client
        .fetch_json(
            &format!("{}/{}/result/", TASKS, task_id),
            RequestOptions::default(),
        )
        .await
}

/// `POST tasks/browser-use/` with `{prompt, wait, output_schema?}`.
///
/// `wait` is how long the server may block before answering with the task.
/// `output_schema` is left out of the body entirely when `schema` is `None`.
pub async fn prompt_agent(
    ctx: &Context,
    prompt: &str,
    wait: u32,
    schema: Option<&Value>,
) -> Result<Task, ApiError> {
    let body = serde_json::to_string(&CreateTaskRequest {
        prompt,
        wait,
        output_schema: schema,
    })
    .map_err(ApiError::Encode)?;

    ctx.client
        .post_json(
            &format!("{}/", TASKS),
            RequestOptions::default().with_body(body),
        )
        .await
}

/// `GET ping`.
pub async fn ping(ctx: &Context) -> bool {
    ctx.client.fetch_success("ping", RequestOptions::default()).await
}
