// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! CIFS share commands
//!
//! Commands: create, delete, mount, unmount, get, list, prune

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;

use shareplane_core::application::ControlPlane;
use shareplane_core::domain::share::Share;

use super::{print_json, print_page, success, FilterArgs, ListArgs};

#[derive(Subcommand)]
pub enum ShareCommand {
    /// Export a directory as a CIFS share
    Create {
        name: String,

        #[arg(long = "host-ip")]
        host_ip: String,

        /// Directory backing the share
        #[arg(long)]
        directory: String,

        /// Exported path (defaults to the directory)
        #[arg(long, default_value = "")]
        path: String,

        #[arg(long, default_value = "")]
        description: String,

        /// User allowed to access the share (repeatable)
        #[arg(long = "user", value_name = "NAME")]
        users: Vec<String>,
    },

    /// Remove a share from its host
    Delete { name: String },

    /// Mount a share at a path on its host
    Mount { name: String, mount_point: String },

    Unmount { name: String },

    Get {
        name: String,

        #[arg(long)]
        json: bool,
    },

    /// List share records
    List(ListArgs),

    /// Drop matching share records without contacting any host
    Prune(FilterArgs),
}

pub async fn handle_command(command: ShareCommand, plane: &ControlPlane) -> Result<()> {
    match command {
        ShareCommand::Create {
            name,
            host_ip,
            directory,
            path,
            description,
            users,
        } => {
            let share = Share::new(name, host_ip, directory)
                .with_path(path)
                .with_description(description)
                .with_access_users(users);
            let created = plane.shares.create(share).await?;
            success(format!(
                "Share {} created on {} ({})",
                created.name,
                created.host_ip,
                created.effective_path()
            ));
        }
        ShareCommand::Delete { name } => {
            plane.shares.delete(&name).await?;
            success(format!("Share {} deleted", name));
        }
        ShareCommand::Mount { name, mount_point } => {
            plane.shares.mount(&name, &mount_point).await?;
            success(format!("Share {} mounted at {}", name, mount_point));
        }
        ShareCommand::Unmount { name } => {
            plane.shares.unmount(&name).await?;
            success(format!("Share {} unmounted", name));
        }
        ShareCommand::Get { name, json } => {
            let share = plane.shares.get(&name).await?;
            if json {
                print_json(&share)?;
            } else {
                print_share(&share);
            }
        }
        ShareCommand::List(args) => {
            let page = plane.shares.list(&args.to_filter()?).await?;
            print_page(&page, args.json, |s| {
                let mount = match s.mount_point.as_deref() {
                    Some(point) if !point.is_empty() => point.to_string(),
                    _ => "-".to_string(),
                };
                format!(
                    "{:<20} {:<16} {:<20} {}",
                    s.name.bold(),
                    s.host_ip,
                    s.directory_name,
                    mount.dimmed()
                )
            })?;
        }
        ShareCommand::Prune(args) => {
            let removed = plane.shares.prune(&args.to_filter()?).await?;
            success(format!("{} share record(s) removed", removed));
        }
    }
    Ok(())
}

fn print_share(share: &Share) {
    println!("{}", share.name.bold());
    println!("  Host: {}", share.host_ip);
    println!("  Directory: {}", share.directory_name);
    println!("  Path: {}", share.effective_path());
    if !share.description.is_empty() {
        println!("  Description: {}", share.description);
    }
    match share.mount_point.as_deref() {
        Some(point) if share.is_mounted() => println!("  Mounted at: {}", point),
        _ => println!("  Mounted at: {}", "(not mounted)".dimmed()),
    }
    if share.access_user_names.is_empty() {
        println!("  Users: {}", "(none)".dimmed());
    } else {
        println!("  Users: {}", share.access_user_names.join(", "));
    }
}
