//! Per-invocation state shared by every command.

use crate::client::ApiClient;
use crate::config::Settings;
use crate::error::ApiError;
use crate::exit::ExitCode;
use crate::output::Output;

/// Built once in `main` from the normalized [`Settings`] and passed by
/// reference into commands and service calls.
#[derive(Debug)]
pub struct Context {
    pub out: Output,
    pub exit: ExitCode,
    pub client: ApiClient,
}

impl Context {
    pub fn new(settings: &Settings) -> Result<Self, ApiError> {
        let out = Output::new(settings.logging, settings.output_type);
        Ok(Self {
            out,
            exit: ExitCode::new(),
            client: ApiClient::new(settings, out)?,
        })
    }

    /// Report a failure: print it on the error channel and raise the exit code to 1.
    pub fn fail(&self, msg: impl std::fmt::Display) {
        self.out.error(msg);
        self.exit.set(1);
    }
}
