// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Directory commands
//!
//! Commands: create, delete, get, list, prune

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;

use shareplane_core::application::ControlPlane;
use shareplane_core::domain::directory::Directory;

use super::{print_json, print_page, success, FilterArgs, ListArgs};

#[derive(Subcommand)]
pub enum DirectoryCommand {
    /// Create a directory on a host
    Create {
        name: String,

        /// IP of the host that holds the directory
        #[arg(long = "host-ip")]
        host_ip: String,
    },

    /// Delete a directory from a host
    Delete {
        name: String,

        #[arg(long = "host-ip")]
        host_ip: String,
    },

    Get {
        name: String,

        #[arg(long = "host-ip")]
        host_ip: String,

        #[arg(long)]
        json: bool,
    },

    /// List directory records
    List(ListArgs),

    /// Drop matching directory records without contacting any host
    Prune(FilterArgs),
}

pub async fn handle_command(command: DirectoryCommand, plane: &ControlPlane) -> Result<()> {
    match command {
        DirectoryCommand::Create { name, host_ip } => {
            let created = plane
                .directories
                .create(Directory::new(name, host_ip))
                .await?;
            success(format!(
                "Directory {} created on {}",
                created.name, created.host_ip
            ));
        }
        DirectoryCommand::Delete { name, host_ip } => {
            plane.directories.delete(&name, &host_ip).await?;
            success(format!("Directory {} deleted from {}", name, host_ip));
        }
        DirectoryCommand::Get {
            name,
            host_ip,
            json,
        } => {
            let directory = plane.directories.get(&name, &host_ip).await?;
            if json {
                print_json(&directory)?;
            } else {
                println!("{} on {}", directory.name.bold(), directory.host_ip);
            }
        }
        DirectoryCommand::List(args) => {
            let page = plane.directories.list(&args.to_filter()?).await?;
            print_page(&page, args.json, |d| {
                format!("{:<24} {}", d.name.bold(), d.host_ip)
            })?;
        }
        DirectoryCommand::Prune(args) => {
            let removed = plane.directories.prune(&args.to_filter()?).await?;
            success(format!("{} directory record(s) removed", removed));
        }
    }
    Ok(())
}
