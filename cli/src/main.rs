// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! # shareplane CLI
//!
//! The `shareplane` binary is the storage control plane. It keeps the
//! metadata store of hosts, directories, CIFS shares and accounts, and
//! drives each host's executor to make those resources real.
//!
//! ## Commands
//!
//! - `shareplane host register|unregister|get|list|refresh` - Host registry
//! - `shareplane directory|share|local-user|user ...` - Resource lifecycle
//! - `shareplane serve` - Run the refresh scheduler (and metrics) in the foreground
//! - `shareplane config show|validate|generate` - Configuration management

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

use shareplane_cli::commands::{
    self, ConfigCommand, DirectoryCommand, HostCommand, LocalUserCommand, ServeArgs, ShareCommand,
    UserCommand,
};
use shareplane_cli::embedded::EmbeddedControlPlane;
use shareplane_core::application::ControlPlane;

/// shareplane - Storage control plane for CIFS hosts
#[derive(Parser)]
#[command(name = "shareplane")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to configuration file (overrides discovery)
    #[arg(
        short,
        long,
        global = true,
        env = "SHAREPLANE_CONFIG_PATH",
        value_name = "FILE"
    )]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "SHAREPLANE_LOG_LEVEL", default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Resource(ResourceCommand),

    /// Run the control plane in the foreground
    #[command(name = "serve")]
    Serve(ServeArgs),

    /// Configuration management
    #[command(name = "config")]
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Commands that operate on stored resources through an open control plane
#[derive(Subcommand)]
enum ResourceCommand {
    /// Manage registered hosts
    #[command(name = "host")]
    Host {
        #[command(subcommand)]
        command: HostCommand,
    },

    /// Manage directories on hosts
    #[command(name = "directory")]
    Directory {
        #[command(subcommand)]
        command: DirectoryCommand,
    },

    /// Manage CIFS shares
    #[command(name = "share")]
    Share {
        #[command(subcommand)]
        command: ShareCommand,
    },

    /// Manage host-local accounts (addressed by host name)
    #[command(name = "local-user")]
    LocalUser {
        #[command(subcommand)]
        command: LocalUserCommand,
    },

    /// Manage user accounts (addressed by host IP)
    #[command(name = "user")]
    User {
        #[command(subcommand)]
        command: UserCommand,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Initialize logging
    init_logging(&cli.log_level)?;

    let Some(command) = cli.command else {
        eprintln!("{}", "No command specified. Use --help for usage.".yellow());
        std::process::exit(1);
    };

    match command {
        Commands::Config { command } => commands::config::handle_command(command, cli.config).await,
        Commands::Serve(args) => {
            let embedded = EmbeddedControlPlane::open(cli.config).await?;
            commands::serve::run(args, embedded).await
        }
        Commands::Resource(command) => {
            let embedded = EmbeddedControlPlane::open(cli.config).await?;
            let result = run_resource_command(command, &embedded.plane).await;
            embedded.close().await;
            result
        }
    }
}

async fn run_resource_command(command: ResourceCommand, plane: &ControlPlane) -> Result<()> {
    match command {
        ResourceCommand::Host { command } => commands::host::handle_command(command, plane).await,
        ResourceCommand::Directory { command } => {
            commands::directory::handle_command(command, plane).await
        }
        ResourceCommand::Share { command } => commands::share::handle_command(command, plane).await,
        ResourceCommand::LocalUser { command } => {
            commands::user::handle_local_user(command, plane).await
        }
        ResourceCommand::User { command } => commands::user::handle_user(command, plane).await,
    }
}

/// Initialize tracing subscriber for logging
fn init_logging(level: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(level))
        .context("Failed to create log filter")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    Ok(())
}
