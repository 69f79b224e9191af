// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Configuration management commands
//!
//! Commands: show, validate, generate

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;
use std::path::PathBuf;

use shareplane_core::domain::config::ControlPlaneConfig;

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Show config file paths checked
        #[arg(long)]
        paths: bool,
    },

    /// Validate configuration file
    Validate {
        /// Path to config file (default: discover)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },

    /// Generate sample configuration
    Generate {
        /// Output path (default: ./shareplane.yaml)
        #[arg(short, long, default_value = "./shareplane.yaml")]
        output: PathBuf,

        /// Include examples and comments
        #[arg(long)]
        examples: bool,
    },
}

pub async fn handle_command(
    command: ConfigCommand,
    config_override: Option<PathBuf>,
) -> Result<()> {
    match command {
        ConfigCommand::Show { paths } => show(config_override, paths),
        ConfigCommand::Validate { file } => validate(file.or(config_override)),
        ConfigCommand::Generate { output, examples } => generate(output, examples),
    }
}

fn show(config_override: Option<PathBuf>, show_paths: bool) -> Result<()> {
    let config = ControlPlaneConfig::load_or_default(config_override.clone())
        .context("Failed to load configuration")?;

    if show_paths {
        println!("{}", "Configuration discovery paths:".bold());
        match &config_override {
            Some(path) => println!("  --config flag: {}", path.display()),
            None => println!("  --config flag: {}", "(not set)".dimmed()),
        }
        for (i, path) in ControlPlaneConfig::search_paths().iter().enumerate() {
            let marker = if path.exists() { "found".green() } else { "missing".dimmed() };
            println!("  {}. {} ({})", i + 1, path.display(), marker);
        }
        println!();
    }

    println!("{}", "Current configuration:".bold());
    println!();

    println!("{}", "Metadata Store:".bold());
    println!("  URL: {}", config.database.url);
    println!("  Max connections: {}", config.database.max_connections);
    println!();

    println!("{}", "Executor Transport:".bold());
    println!(
        "  Endpoint: {}://<host_ip>:{}/{}/<resource>/<action>",
        config.agent.scheme,
        config.agent.port,
        config.agent.base_path.trim_matches('/')
    );
    println!("  Timeout: {}s", config.agent.timeout_secs);
    println!();

    println!("{}", "Secrets:".bold());
    match config.secrets.key.strip_prefix("env:") {
        Some(var) => println!("  Key: from ${}", var),
        None => println!("  Key: {}", "(inline)".dimmed()),
    }
    println!();

    println!("{}", "Refresh:".bold());
    if config.refresh.enabled {
        println!("  Every {}s", config.refresh.interval_secs);
    } else {
        println!("  {}", "disabled".dimmed());
    }
    if let Some(listen) = &config.metrics.listen {
        println!("  Metrics: http://{}/metrics", listen);
    }
    println!();

    Ok(())
}

fn validate(config_path: Option<PathBuf>) -> Result<()> {
    println!("Validating configuration...");

    let config = ControlPlaneConfig::load_or_default(config_path)
        .context("Failed to load configuration")?;

    config
        .validate()
        .context("Configuration validation failed")?;

    config
        .secrets
        .resolve_key()
        .context("Credential encryption key is not available")?;

    println!("{}", "✓ Configuration is valid".green());

    Ok(())
}

fn generate(output: PathBuf, with_examples: bool) -> Result<()> {
    let sample = if with_examples {
        include_str!("../../templates/config-with-examples.yaml")
    } else {
        include_str!("../../templates/config-minimal.yaml")
    };

    std::fs::write(&output, sample)
        .with_context(|| format!("Failed to write config to {:?}", output))?;

    println!(
        "{}",
        format!("✓ Configuration generated: {}", output.display()).green()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_templates_parse_and_validate() {
        for template in [
            include_str!("../../templates/config-minimal.yaml"),
            include_str!("../../templates/config-with-examples.yaml"),
        ] {
            let config = ControlPlaneConfig::from_yaml_str(template).unwrap();
            config.validate().unwrap();
            assert_eq!(config.database.url, "sqlite://shareplane.db");
        }
    }

    #[test]
    fn test_generate_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("shareplane.yaml");
        generate(output.clone(), false).unwrap();
        let written = std::fs::read_to_string(output).unwrap();
        assert!(written.contains("env:SHAREPLANE_SECRET_KEY"));
    }
}
