// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Metadata Store Connection Pool
//!
//! Wraps `sqlx::SqlitePool` in a thin `Database` handle that is constructed
//! once at startup and injected into every repository. Schema creation is
//! idempotent (`IF NOT EXISTS`), so connecting twice to the same file is
//! harmless. Shutdown is explicit via [`Database::close`].

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

use crate::domain::config::DatabaseSettings;

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS hosts (
        name         TEXT NOT NULL UNIQUE,
        ip           TEXT NOT NULL UNIQUE,
        username     TEXT NOT NULL,
        password     TEXT NOT NULL,
        storage_type TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS directories (
        name    TEXT NOT NULL,
        host_ip TEXT NOT NULL,
        UNIQUE (name, host_ip)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS shares (
        name              TEXT NOT NULL UNIQUE,
        host_ip           TEXT NOT NULL,
        path              TEXT NOT NULL DEFAULT '',
        directory_name    TEXT NOT NULL,
        description       TEXT NOT NULL DEFAULT '',
        mount_point       TEXT NOT NULL DEFAULT '',
        access_user_names TEXT NOT NULL DEFAULT ''
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS local_users (
        name      TEXT NOT NULL UNIQUE,
        password  TEXT NOT NULL,
        host_name TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS users (
        name     TEXT NOT NULL UNIQUE,
        password TEXT NOT NULL,
        host_ip  TEXT NOT NULL
    )
    "#,
];

#[derive(Clone, Debug)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    pub async fn connect(settings: &DatabaseSettings) -> Result<Self, sqlx::Error> {
        if is_memory_url(&settings.url) {
            return Self::in_memory().await;
        }

        let options = SqliteConnectOptions::from_str(&settings.url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            // Concurrent writers wait on the lock instead of failing outright.
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(settings.max_connections)
            .connect_with(options)
            .await?;

        let db = Self { pool };
        db.migrate().await?;
        info!(url = %settings.url, "Metadata store ready");
        Ok(db)
    }

    /// Private in-memory store. Pinned to one connection that never expires,
    /// since every SQLite memory connection is its own database.
    pub async fn in_memory() -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    async fn migrate(&self) -> Result<(), sqlx::Error> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }

    pub fn get_pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn is_memory_url(url: &str) -> bool {
    url == "sqlite::memory:" || url.contains("mode=memory")
}
