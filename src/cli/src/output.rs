//! Output controller for the Gobii CLI.
//!
//! Every piece of console output goes through [`Output`], which gates it by
//! channel:
//!
//! - info (`log`): stdout, suppressed by `--silent`
//! - verbose (`verbose`): stdout with a `[verbose]` marker, only with `--verbose`
//! - error (`error`): stderr, never suppressed
//! - result (`result`): stdout, never suppressed; this is what JSON consumers parse

use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

use crate::config::ConfigError;

/// Output format selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputType {
    /// Human readable tables and labeled lines
    #[default]
    Text,
    /// Pretty-printed JSON on the result channel only
    Json,
}

impl FromStr for OutputType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::InvalidFormat(other.to_string())),
        }
    }
}

/// Verbosity flags, replaced together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoggingOptions {
    pub verbose: bool,
    pub silent: bool,
}

/// Output channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Info,
    Verbose,
    Error,
    Result,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Output {
    options: LoggingOptions,
    output_type: OutputType,
}

impl Output {
    pub fn new(options: LoggingOptions, output_type: OutputType) -> Self {
        let mut out = Self::default();
        out.set_logging_options(options);
        out.set_output_type(output_type);
        out
    }

    pub fn set_logging_options(&mut self, options: LoggingOptions) {
        self.options = options;
    }

    pub fn set_output_type(&mut self, output_type: OutputType) {
        self.output_type = output_type;
    }

    pub fn output_type(&self) -> OutputType {
        self.output_type
    }

    pub fn is_json(&self) -> bool {
        self.output_type() == OutputType::Json
    }

    pub fn is_silent(&self) -> bool {
        self.options.silent
    }

    pub fn is_verbose(&self) -> bool {
        self.options.verbose
    }

    /// Whether anything written to `channel` reaches the console.
    pub fn enabled(&self, channel: Channel) -> bool {
        match channel {
            Channel::Info => !self.options.silent,
            Channel::Verbose => self.options.verbose,
            Channel::Error | Channel::Result => true,
        }
    }

    /// Informational message on stdout.
    pub fn log(&self, msg: impl Display) {
        if self.enabled(Channel::Info) {
            println!("{}", msg);
        }
    }

    /// Trace message on stdout, only in verbose mode.
    pub fn verbose(&self, msg: impl Display) {
        if self.enabled(Channel::Verbose) {
            println!("{} {}", "[verbose]".dimmed(), msg);
        }
    }

    /// Error message on stderr.
    pub fn error(&self, msg: impl Display) {
        if self.enabled(Channel::Error) {
            eprintln!("{} {}", "[error]".red().bold(), msg);
        }
    }

    /// The answer to the user's command. Always printed.
    pub fn result(&self, msg: impl Display) {
        println!("{}", msg);
    }

    pub fn success(&self, msg: &str) {
        self.log(format!("{} {}", "[OK]".green().bold(), msg));
    }

    pub fn info(&self, msg: &str) {
        self.log(format!("{} {}", "[INFO]".blue().bold(), msg));
    }

    pub fn header(&self, title: &str) {
        self.result(format!("\n{}\n", title.bold().underline()));
    }

    /// Labeled line for single-entity views.
    pub fn detail(&self, key: &str, value: &str) {
        self.result(format!("  {}: {}", key.cyan(), value));
    }

    /// Pretty-printed JSON on the result channel.
    pub fn json<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
        self.result(json);
        Ok(())
    }

    /// Render rows as a table on the result channel.
    pub fn table<T: Tabled>(&self, rows: &[T]) {
        self.result(render_table(rows));
    }

    /// Start a progress spinner. Only shown in text mode when not silent.
    pub fn spinner(&self, message: &str) -> Spinner {
        if self.is_json() || self.is_silent() {
            return Spinner { bar: None };
        }

        let style = ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());

        let bar = ProgressBar::new_spinner();
        bar.set_style(style);
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(100));

        Spinner { bar: Some(bar) }
    }
}

/// Print a startup error and exit with status 1.
pub fn print_fatal(err: &dyn Display) -> ! {
    eprintln!("{} {}", "[error]".red().bold(), err);
    std::process::exit(1);
}

pub fn render_table<T: Tabled>(rows: &[T]) -> String {
    Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(..)).with(Alignment::left()))
        .to_string()
}

/// Handle to a running spinner. Inert when spinners are disabled.
pub struct Spinner {
    bar: Option<ProgressBar>,
}

impl Spinner {
    pub fn succeed(self, msg: &str) {
        if let Some(bar) = self.bar {
            bar.finish_with_message(format!("{} {}", "✔".green(), msg));
        }
    }

    pub fn fail(self, msg: &str) {
        if let Some(bar) = self.bar {
            bar.abandon_with_message(format!("{} {}", "✖".red(), msg));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Tabled)]
    struct Row {
        #[tabled(rename = "ID")]
        id: String,
        #[tabled(rename = "Name")]
        name: String,
    }

    #[test]
    fn parses_known_formats() {
        assert_eq!("text".parse::<OutputType>().unwrap(), OutputType::Text);
        assert_eq!("json".parse::<OutputType>().unwrap(), OutputType::Json);
    }

    #[test]
    fn rejects_unknown_format() {
        let err = "banana".parse::<OutputType>().unwrap_err();
        assert!(err.to_string().contains("Invalid format: \"banana\""));
    }

    #[test]
    fn silent_gates_info_but_not_result_or_error() {
        let out = Output::new(
            LoggingOptions {
                verbose: false,
                silent: true,
            },
            OutputType::Text,
        );
        assert!(!out.enabled(Channel::Info));
        assert!(!out.enabled(Channel::Verbose));
        assert!(out.enabled(Channel::Error));
        assert!(out.enabled(Channel::Result));
    }

    #[test]
    fn verbose_is_independent_of_silent() {
        let out = Output::new(
            LoggingOptions {
                verbose: true,
                silent: true,
            },
            OutputType::Text,
        );
        assert!(out.enabled(Channel::Verbose));
        assert!(!out.enabled(Channel::Info));
    }

    #[test]
    fn set_logging_options_replaces_both_flags() {
        let mut out = Output::new(
            LoggingOptions {
                verbose: true,
                silent: true,
            },
            OutputType::Text,
        );
        out.set_logging_options(LoggingOptions::default());
        assert!(!out.is_verbose());
        assert!(!out.is_silent());
        assert!(out.enabled(Channel::Info));
    }

    #[test]
    fn spinner_is_inert_in_json_or_silent_mode() {
        let json = Output::new(LoggingOptions::default(), OutputType::Json);
        assert!(json.spinner("working").bar.is_none());

        let silent = Output::new(
            LoggingOptions {
                verbose: false,
                silent: true,
            },
            OutputType::Text,
        );
        assert!(silent.spinner("working").bar.is_none());
    }

    #[test]
    fn table_contains_headers_and_cells() {
        let rendered = render_table(&[Row {
            id: "a-1".into(),
            name: "scraper".into(),
        }]);
        assert!(rendered.contains("ID"));
        assert!(rendered.contains("Name"));
        assert!(rendered.contains("scraper"));
    }
}
