//! Gobii API types.
//!
//! Agents and tasks are kept exactly as the server returned them, so JSON
//! output is the server's document and unexpected field types never fail
//! decoding. Accessors provide the views used for text rendering.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::util::display_value;

/// Non-null field rendered as text. Strings are returned raw.
fn text(fields: &Map<String, Value>, key: &str) -> Option<String> {
    field(fields, key).map(display_value)
}

fn field<'a>(fields: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    fields.get(key).filter(|v| !v.is_null())
}

/// A browser-use agent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Agent(Map<String, Value>);

impl Agent {
    pub fn id(&self) -> String {
        text(&self.0, "id").unwrap_or_else(|| "-".into())
    }

    pub fn name(&self) -> Option<String> {
        text(&self.0, "name")
    }

    pub fn created_at(&self) -> Option<String> {
        text(&self.0, "created_at")
    }
}

/// A task submitted to an agent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Task(Map<String, Value>);

impl Task {
    pub fn id(&self) -> String {
        text(&self.0, "id").unwrap_or_else(|| "-".into())
    }

    pub fn prompt(&self) -> Option<String> {
        text(&self.0, "prompt")
    }

    pub fn status(&self) -> Option<String> {
        text(&self.0, "status")
    }

    /// `agentId`, falling back to `agent` given either as an ID or an object.
    pub fn agent_id(&self) -> Option<String> {
        text(&self.0, "agentId").or_else(|| match field(&self.0, "agent")? {
            Value::Object(agent) => text(agent, "id"),
            other => Some(display_value(other)),
        })
    }

    pub fn output_schema(&self) -> Option<&Value> {
        field(&self.0, "output_schema")
    }

    pub fn created_at(&self) -> Option<String> {
        text(&self.0, "created_at")
    }

    pub fn updated_at(&self) -> Option<String> {
        text(&self.0, "updated_at")
    }

    pub fn error_message(&self) -> Option<String> {
        text(&self.0, "error_message")
    }

    pub fn result(&self) -> Option<&Value> {
        field(&self.0, "result")
    }
}

/// List envelope returned by the listing endpoints.
#[derive(Debug, Deserialize)]
pub struct ResultsPage<T> {
    pub results: Option<Vec<T>>,
}

/// Body of `POST tasks/browser-use/`.
#[derive(Debug, Serialize)]
pub struct CreateTaskRequest<'a> {
    pub prompt: &'a str,
    pub wait: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_schema: Option<&'a Value>,
}
