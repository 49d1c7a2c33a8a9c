//! Mailplate — email template store and renderer CLI.
//!
//! # Usage
//!
//! ```text
//! mailplate init
//! mailplate template list [--json]
//! mailplate template show <name>
//! mailplate template create <name> (--file <path> | --html <text>)
//! mailplate template update <name> [--name <new>] (--file <path> | --html <text>)
//! mailplate template delete <name>
//! mailplate render --to <addr> --subject <text> [--template <name>] [--body <text> …] [--json]
//! ```

mod commands;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use commands::{init::InitArgs, render::RenderArgs, template::TemplateCommand};
use mailplate_core::{config, TemplateError};
use mailplate_service::{ErrorResponse, Mailplate};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "mailplate",
    version,
    about = "Store email templates and render them with placeholder content",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write default config and seed the protected Default template.
    Init(InitArgs),

    /// Manage stored templates.
    Template {
        #[command(subcommand)]
        command: TemplateCommand,
    },

    /// Render a template into an email and print it.
    Render(RenderArgs),
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

pub(crate) fn home() -> Result<PathBuf> {
    config::home().context("could not determine home directory")
}

pub(crate) fn open() -> Result<Mailplate> {
    Mailplate::open().context("failed to open template store")
}

/// Attach the boundary status to a template failure.
pub(crate) fn reject(err: TemplateError) -> anyhow::Error {
    let response = ErrorResponse::from(&err);
    anyhow::anyhow!("{} (status {})", response.body.message, response.status)
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    tracing::debug!(command = ?cli.command, "dispatching");
    match cli.command {
        Commands::Init(args) => args.run(),
        Commands::Template { command } => commands::template::run(command),
        Commands::Render(args) => args.run(),
    }
}
