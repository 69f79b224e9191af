// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use async_trait::async_trait;
use sqlx::sqlite::{SqlitePool, SqliteRow};

use crate::domain::directory::Directory;
use crate::domain::query::{Page, QueryFilter};
use crate::domain::repository::{DirectoryRepository, RepositoryError};
use crate::infrastructure::repositories::describe_conflict;
use crate::infrastructure::store::{self, column, RecordSchema};

impl RecordSchema for Directory {
    const TABLE: &'static str = "directories";
    const COLUMNS: &'static [&'static str] = &["name", "host_ip"];

    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            name: column(row, "name")?,
            host_ip: column(row, "host_ip")?,
        })
    }
}

pub struct SqliteDirectoryRepository {
    pool: SqlitePool,
}

impl SqliteDirectoryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn identity(name: &str, host_ip: &str) -> QueryFilter {
        QueryFilter::new()
            .condition("name", name)
            .condition("host_ip", host_ip)
    }
}

#[async_trait]
impl DirectoryRepository for SqliteDirectoryRepository {
    async fn insert(&self, directory: &Directory) -> Result<(), RepositoryError> {
        directory.validate()?;

        sqlx::query("INSERT INTO directories (name, host_ip) VALUES (?, ?)")
            .bind(&directory.name)
            .bind(&directory.host_ip)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                describe_conflict(e.into(), |_| {
                    format!(
                        "directory '{}' already exists on {}",
                        directory.name, directory.host_ip
                    )
                })
            })?;

        Ok(())
    }

    async fn find(&self, name: &str, host_ip: &str) -> Result<Option<Directory>, RepositoryError> {
        Ok(store::list::<Directory>(&self.pool, &Self::identity(name, host_ip))
            .await?
            .into_iter()
            .next())
    }

    async fn query(&self, filter: &QueryFilter) -> Result<Page<Directory>, RepositoryError> {
        store::query::<Directory>(&self.pool, filter).await
    }

    async fn delete(&self, name: &str, host_ip: &str) -> Result<(), RepositoryError> {
        let removed = store::delete::<Directory>(&self.pool, &Self::identity(name, host_ip)).await?;
        if removed == 0 {
            return Err(RepositoryError::NotFound(format!(
                "directory '{}' on {}",
                name, host_ip
            )));
        }
        Ok(())
    }

    async fn delete_matching(&self, filter: &QueryFilter) -> Result<u64, RepositoryError> {
        store::delete::<Directory>(&self.pool, filter).await
    }
}
