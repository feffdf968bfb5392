//! Gobii CLI - Command-line interface for Gobii browser-use agents.
//!
//! Provides commands for agent listing and deletion, task management,
//! one-shot prompts and API health checks.

mod client;
mod commands;
mod config;
mod context;
mod error;
mod exit;
mod output;
mod service;
mod types;
mod util;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{agent, agents, ping, prompt, task};
use config::{validate_wait, ConfigError, GlobalArgs, Settings};
use context::Context;

/// Gobii - browser-use agents from the command line
#[derive(Parser)]
#[command(
    name = "gobii-cli",
    version,
    about = "Gobii - browser-use agents from the command line",
    long_about = "CLI tool for managing Gobii agents and tasks and running prompts.",
    propagate_version = true
)]
pub struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage agents
    #[command(subcommand)]
    Agents(agents::AgentsCommands),

    /// Manage an individual agent
    #[command(subcommand)]
    Agent(agent::AgentCommands),

    /// Manage tasks
    #[command(subcommand)]
    Task(task::TaskCommands),

    /// Create a new task with a provided prompt and wait for the result
    Prompt(prompt::PromptArgs),

    /// Check that the Gobii API is reachable
    Ping,
}

impl Commands {
    /// Command-specific startup checks that must pass before anything runs.
    fn validate(&self) -> Result<(), ConfigError> {
        let wait = match self {
            Commands::Prompt(args) => Some(args.wait),
            Commands::Task(cmd) => cmd.wait(),
            _ => None,
        };
        if let Some(wait) = wait {
            validate_wait(wait)?;
        }
        Ok(())
    }
}

/// Diagnostics go to stderr, filtered by `RUST_LOG` (errors only by default).
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .try_init();
}

/// Anything that escapes a command as a panic is fatal with status 1.
fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        eprintln!("[error] Unhandled panic: {}", info);
        std::process::exit(1);
    }));
}

#[tokio::main]
async fn main() {
    install_panic_hook();
    init_tracing();

    let cli = Cli::parse();

    let settings = match Settings::from_args(&cli.global) {
        Ok(settings) => settings,
        Err(e) => output::print_fatal(&e),
    };
    if let Err(e) = cli.command.validate() {
        output::print_fatal(&e);
    }

    if !settings.color {
        colored::control::set_override(false);
    }

    let ctx = match Context::new(&settings) {
        Ok(ctx) => ctx,
        Err(e) => output::print_fatal(&e),
    };

    let result = match cli.command {
        Commands::Agents(cmd) => agents::execute(cmd, &ctx).await,
        Commands::Agent(cmd) => agent::execute(cmd, &ctx).await,
        Commands::Task(cmd) => task::execute(cmd, &ctx).await,
        Commands::Prompt(args) => prompt::execute(args, &ctx).await,
        Commands::Ping => ping::execute(&ctx).await,
    };

    if let Err(e) = result {
        ctx.fail(format!("Fatal CLI error: {:#}", e));
    }

    std::process::exit(ctx.exit.get());
}
