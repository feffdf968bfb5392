//! Command handlers, one module per command group.

pub mod agent;
pub mod agents;
pub mod ping;
pub mod prompt;
pub mod task;
