// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! SQLite Host
//!
//! Host registry persistence. Name and IP carry independent UNIQUE
//! constraints; the password column only ever holds codec output.

use async_trait::async_trait;
use sqlx::sqlite::{SqlitePool, SqliteRow};

use crate::domain::host::Host;
use crate::domain::query::{Page, QueryFilter};
use crate::domain::repository::{HostRepository, RepositoryError};
use crate::infrastructure::repositories::{describe_conflict, reveal};
use crate::infrastructure::secret_codec::SecretCodec;
use crate::infrastructure::store::{self, column, RecordSchema};

/// Row shape of `hosts`, password still sealed.
struct StoredHost {
    name: String,
    ip: String,
    username: String,
    password: String,
    storage_type: String,
}

impl RecordSchema for StoredHost {
    const TABLE: &'static str = "hosts";
    const COLUMNS: &'static [&'static str] = &["name", "ip", "username", "password", "storage_type"];

    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            name: column(row, "name")?,
            ip: column(row, "ip")?,
            username: column(row, "username")?,
            password: column(row, "password")?,
            storage_type: column(row, "storage_type")?,
        })
    }
}

pub struct SqliteHostRepository {
    pool: SqlitePool,
    codec: SecretCodec,
}

impl SqliteHostRepository {
    pub fn new(pool: SqlitePool, codec: SecretCodec) -> Self {
        Self { pool, codec }
    }

    fn open(&self, stored: StoredHost) -> Result<Host, RepositoryError> {
        Ok(Host {
            name: stored.name,
            ip: stored.ip,
            username: stored.username,
            password: reveal(&self.codec, stored.password)?,
            storage_type: stored.storage_type,
        })
    }

    async fn find_one(&self, column: &str, value: &str) -> Result<Option<Host>, RepositoryError> {
        let filter = QueryFilter::new().condition(column, value);
        store::list::<StoredHost>(&self.pool, &filter)
            .await?
            .into_iter()
            .next()
            .map(|stored| self.open(stored))
            .transpose()
    }
}

#[async_trait]
impl HostRepository for SqliteHostRepository {
    async fn insert(&self, host: &Host) -> Result<(), RepositoryError> {
        host.validate()?;
        let sealed = self.codec.encrypt(&host.password)?;

        sqlx::query(
            r#"
            INSERT INTO hosts (name, ip, username, password, storage_type)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&host.name)
        .bind(&host.ip)
        .bind(&host.username)
        .bind(sealed)
        .bind(&host.storage_type)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            describe_conflict(e.into(), |raw| {
                if raw.contains("hosts.ip") {
                    format!("a host with ip '{}' is already registered", host.ip)
                } else {
                    format!("a host named '{}' is already registered", host.name)
                }
            })
        })?;

        Ok(())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Host>, RepositoryError> {
        self.find_one("name", name).await
    }

    async fn find_by_ip(&self, ip: &str) -> Result<Option<Host>, RepositoryError> {
        self.find_one("ip", ip).await
    }

    async fn query(&self, filter: &QueryFilter) -> Result<Page<Host>, RepositoryError> {
        store::query::<StoredHost>(&self.pool, filter)
            .await?
            .map(|stored| self.open(stored))
    }

    async fn list_all(&self) -> Result<Vec<Host>, RepositoryError> {
        store::list::<StoredHost>(&self.pool, &QueryFilter::new())
            .await?
            .into_iter()
            .map(|stored| self.open(stored))
            .collect()
    }

    async fn delete(&self, name: &str) -> Result<(), RepositoryError> {
        let removed =
            store::delete::<StoredHost>(&self.pool, &QueryFilter::new().condition("name", name))
                .await?;
        if removed == 0 {
            return Err(RepositoryError::NotFound(format!("host '{}'", name)));
        }
        Ok(())
    }
}
