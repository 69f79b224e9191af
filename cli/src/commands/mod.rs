// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Command implementations for the shareplane CLI

pub mod config;
pub mod directory;
pub mod host;
pub mod serve;
pub mod share;
pub mod user;

pub use self::config::ConfigCommand;
pub use self::directory::DirectoryCommand;
pub use self::host::HostCommand;
pub use self::serve::ServeArgs;
pub use self::share::ShareCommand;
pub use self::user::{LocalUserCommand, UserCommand};

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;

use shareplane_core::domain::query::{Page, QueryFilter};

/// Predicate flags shared by `list` and `prune`.
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Case-insensitive substring match, `COLUMN=TEXT` (repeatable)
    #[arg(long = "keyword", value_name = "COLUMN=TEXT", value_parser = parse_pair)]
    pub keywords: Vec<(String, String)>,

    /// Exact match, `COLUMN=VALUE` (repeatable)
    #[arg(long = "where", value_name = "COLUMN=VALUE", value_parser = parse_pair)]
    pub conditions: Vec<(String, String)>,

    /// Full filter as JSON; flags are merged on top
    #[arg(long, value_name = "JSON")]
    pub filter: Option<String>,
}

impl FilterArgs {
    pub fn to_filter(&self) -> Result<QueryFilter> {
        let mut filter = match &self.filter {
            Some(raw) => serde_json::from_str::<QueryFilter>(raw)
                .context("--filter is not a valid query filter")?,
            None => QueryFilter::new(),
        };

        for (column, text) in &self.keywords {
            filter = filter.keyword(column, text);
        }
        for (column, value) in &self.conditions {
            filter = filter.condition(column, value.as_str());
        }

        Ok(filter)
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct ListArgs {
    #[command(flatten)]
    pub filter: FilterArgs,

    /// Project onto these columns (repeatable)
    #[arg(long = "field", value_name = "COLUMN")]
    pub fields: Vec<String>,

    /// 1-based page number; requires --page-size
    #[arg(long, requires = "page_size")]
    pub page: Option<u32>,

    #[arg(long)]
    pub page_size: Option<u32>,

    /// Print JSON instead of a listing
    #[arg(long)]
    pub json: bool,
}

impl ListArgs {
    pub fn to_filter(&self) -> Result<QueryFilter> {
        let mut filter = self.filter.to_filter()?;
        for field in &self.fields {
            filter = filter.field(field);
        }
        if let Some(page_size) = self.page_size {
            filter = filter.paginate(self.page.unwrap_or(1), page_size);
        }
        Ok(filter)
    }
}

fn parse_pair(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((column, value)) if !column.trim().is_empty() => {
            Ok((column.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected COLUMN=VALUE, got '{}'", raw)),
    }
}

pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).context("Failed to serialize output")?
    );
    Ok(())
}

/// Print a page either as JSON or one line per record.
pub(crate) fn print_page<T: Serialize>(
    page: &Page<T>,
    json: bool,
    line: impl Fn(&T) -> String,
) -> Result<()> {
    if json {
        return print_json(page);
    }

    if page.records.is_empty() {
        println!("{}", "No matching records".dimmed());
    }
    for record in &page.records {
        println!("  {}", line(record));
    }
    if page.records.len() as u64 != page.total {
        println!(
            "{}",
            format!("{} of {} shown", page.records.len(), page.total).dimmed()
        );
    }
    Ok(())
}

pub(crate) fn success(message: impl AsRef<str>) {
    println!("{}", format!("✓ {}", message.as_ref()).green());
}
