// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Account commands
//!
//! `local-user` accounts are addressed by host name, `user` accounts by host IP.

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use serde::Serialize;

use shareplane_core::application::ControlPlane;
use shareplane_core::domain::account::{LocalUser, User};
use shareplane_core::domain::query::Page;

use super::{print_json, print_page, success, FilterArgs, ListArgs};

#[derive(Subcommand)]
pub enum LocalUserCommand {
    /// Create a local account on a host
    Create {
        name: String,

        /// Name of the host that holds the account
        #[arg(long = "host")]
        host_name: String,

        #[arg(short, long, env = "SHAREPLANE_USER_PASSWORD", hide_env_values = true)]
        password: String,
    },

    Delete { name: String },

    Get {
        name: String,

        #[arg(long)]
        json: bool,
    },

    List(ListArgs),

    /// Drop matching records without contacting any host
    Prune(FilterArgs),
}

#[derive(Subcommand)]
pub enum UserCommand {
    /// Create a user account on a host
    Create {
        name: String,

        /// IP of the host that holds the account
        #[arg(long = "host-ip")]
        host_ip: String,

        #[arg(short, long, env = "SHAREPLANE_USER_PASSWORD", hide_env_values = true)]
        password: String,
    },

    Delete { name: String },

    Get {
        name: String,

        #[arg(long)]
        json: bool,
    },

    List(ListArgs),

    /// Drop matching records without contacting any host
    Prune(FilterArgs),
}

#[derive(Serialize)]
struct AccountView<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    host_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    host_ip: Option<&'a str>,
}

impl<'a> From<&'a LocalUser> for AccountView<'a> {
    fn from(user: &'a LocalUser) -> Self {
        Self {
            name: &user.name,
            host_name: Some(&user.host_name),
            host_ip: None,
        }
    }
}

impl<'a> From<&'a User> for AccountView<'a> {
    fn from(user: &'a User) -> Self {
        Self {
            name: &user.name,
            host_name: None,
            host_ip: Some(&user.host_ip),
        }
    }
}

impl AccountView<'_> {
    fn line(&self) -> String {
        let host = self.host_name.or(self.host_ip).unwrap_or("-");
        format!("{:<24} {}", self.name.bold(), host)
    }
}

fn print_accounts<'a, T: 'a>(page: &'a Page<T>, json: bool) -> Result<()>
where
    AccountView<'a>: From<&'a T>,
{
    let views = Page::new(
        page.records.iter().map(AccountView::from).collect(),
        page.total,
    );
    print_page(&views, json, AccountView::line)
}

fn print_account(view: AccountView<'_>, json: bool) -> Result<()> {
    if json {
        print_json(&view)
    } else {
        println!("{}", view.line());
        Ok(())
    }
}

pub async fn handle_local_user(command: LocalUserCommand, plane: &ControlPlane) -> Result<()> {
    match command {
        LocalUserCommand::Create {
            name,
            host_name,
            password,
        } => {
            plane
                .local_users
                .create(LocalUser::new(&name, password, &host_name))
                .await?;
            success(format!("Local user {} created on {}", name, host_name));
        }
        LocalUserCommand::Delete { name } => {
            plane.local_users.delete(&name).await?;
            success(format!("Local user {} deleted", name));
        }
        LocalUserCommand::Get { name, json } => {
            let user = plane.local_users.get(&name).await?;
            print_account(AccountView::from(&user), json)?;
        }
        LocalUserCommand::List(args) => {
            let page = plane.local_users.list(&args.to_filter()?).await?;
            print_accounts(&page, args.json)?;
        }
        LocalUserCommand::Prune(args) => {
            let removed = plane.local_users.prune(&args.to_filter()?).await?;
            success(format!("{} local user record(s) removed", removed));
        }
    }
    Ok(())
}

pub async fn handle_user(command: UserCommand, plane: &ControlPlane) -> Result<()> {
    match command {
        UserCommand::Create {
            name,
            host_ip,
            password,
        } => {
            plane
                .users
                .create(User::new(&name, password, &host_ip))
                .await?;
            success(format!("User {} created on {}", name, host_ip));
        }
        UserCommand::Delete { name } => {
            plane.users.delete(&name).await?;
            success(format!("User {} deleted", name));
        }
        UserCommand::Get { name, json } => {
            let user = plane.users.get(&name).await?;
            print_account(AccountView::from(&user), json)?;
        }
        UserCommand::List(args) => {
            let page = plane.users.list(&args.to_filter()?).await?;
            print_accounts(&page, args.json)?;
        }
        UserCommand::Prune(args) => {
            let removed = plane.users.prune(&args.to_filter()?).await?;
            success(format!("{} user record(s) removed", removed));
        }
    }
    Ok(())
}
