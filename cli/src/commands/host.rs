// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Host registry commands
//!
//! Commands: register, unregister, get, list, refresh

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use serde::Serialize;

use shareplane_core::application::{ControlPlane, HostRefresh, RefreshOutcome};
use shareplane_core::domain::host::Host;
use shareplane_core::domain::query::Page;

use super::{print_json, print_page, success, ListArgs};

#[derive(Subcommand)]
pub enum HostCommand {
    /// Register a host with the control plane
    Register {
        name: String,

        ip: String,

        /// Executor account name
        #[arg(short, long)]
        username: String,

        /// Executor account password
        #[arg(short, long, env = "SHAREPLANE_HOST_PASSWORD", hide_env_values = true)]
        password: String,

        /// Storage backend kind (agent, appliance)
        #[arg(short = 't', long, default_value = "agent")]
        storage_type: String,
    },

    /// Remove a host record (resources on it are left in place)
    Unregister {
        /// Host name or IP
        host: String,
    },

    /// Show one host
    Get {
        /// Host name or IP
        host: String,

        #[arg(long)]
        json: bool,
    },

    /// List registered hosts
    List(ListArgs),

    /// Query every host's executor once and report the results
    Refresh {
        #[arg(long)]
        json: bool,
    },
}

/// Host as printed; the password never leaves the control plane.
#[derive(Serialize)]
struct HostView<'a> {
    name: &'a str,
    ip: &'a str,
    username: &'a str,
    storage_type: &'a str,
}

impl<'a> From<&'a Host> for HostView<'a> {
    fn from(host: &'a Host) -> Self {
        Self {
            name: &host.name,
            ip: &host.ip,
            username: &host.username,
            storage_type: &host.storage_type,
        }
    }
}

pub async fn handle_command(command: HostCommand, plane: &ControlPlane) -> Result<()> {
    match command {
        HostCommand::Register {
            name,
            ip,
            username,
            password,
            storage_type,
        } => {
            plane
                .hosts
                .register(Host::new(&name, &ip, username, password, storage_type))
                .await?;
            success(format!("Host {} ({}) registered", name, ip));
        }
        HostCommand::Unregister { host } => {
            let removed = plane.hosts.unregister(&host).await?;
            success(format!("Host {} ({}) unregistered", removed.name, removed.ip));
        }
        HostCommand::Get { host, json } => {
            let host = plane.hosts.get(&host).await?;
            if json {
                print_json(&HostView::from(&host))?;
            } else {
                println!("{}", host.name.bold());
                println!("  IP: {}", host.ip);
                println!("  Username: {}", host.username);
                println!("  Backend: {}", host.storage_type);
            }
        }
        HostCommand::List(args) => {
            let page = plane.hosts.list(&args.to_filter()?).await?;
            let views = Page::new(
                page.records.iter().map(HostView::from).collect(),
                page.total,
            );
            print_page(&views, args.json, |h: &HostView<'_>| {
                format!("{:<20} {:<16} {}", h.name.bold(), h.ip, h.storage_type.dimmed())
            })?;
        }
        HostCommand::Refresh { json } => {
            let reports = plane.hosts.refresh_all().await?;
            if json {
                print_json(&reports)?;
            } else {
                print_refresh(&reports);
            }
        }
    }
    Ok(())
}

fn print_refresh(reports: &[HostRefresh]) {
    if reports.is_empty() {
        println!("{}", "No hosts registered".dimmed());
        return;
    }

    for report in reports {
        match &report.outcome {
            RefreshOutcome::Online { system_info } => {
                let detail = system_info
                    .hostname
                    .as_deref()
                    .or(system_info.os.as_deref())
                    .unwrap_or("online");
                println!(
                    "  {} {:<20} {:<16} {}",
                    "●".green(),
                    report.host_name,
                    report.host_ip,
                    detail
                );
            }
            RefreshOutcome::Failed { error } => {
                println!(
                    "  {} {:<20} {:<16} {}",
                    "●".red(),
                    report.host_name,
                    report.host_ip,
                    error.red()
                );
            }
        }
    }
}
