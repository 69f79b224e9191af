// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! SQLite Account
//!
//! Persistence for [`LocalUser`] and [`User`]. Both tables seal the password
//! column with the shared codec.

use async_trait::async_trait;
use sqlx::sqlite::{SqlitePool, SqliteRow};

use crate::domain::account::{LocalUser, User};
use crate::domain::query::{Page, QueryFilter};
use crate::domain::repository::{LocalUserRepository, RepositoryError, UserRepository};
use crate::infrastructure::repositories::{describe_conflict, reveal};
use crate::infrastructure::secret_codec::SecretCodec;
use crate::infrastructure::store::{self, column, RecordSchema};

struct StoredLocalUser {
    name: String,
    password: String,
    host_name: String,
}

impl RecordSchema for StoredLocalUser {
    const TABLE: &'static str = "local_users";
    const COLUMNS: &'static [&'static str] = &["name", "password", "host_name"];

    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            name: column(row, "name")?,
            password: column(row, "password")?,
            host_name: column(row, "host_name")?,
        })
    }
}

struct StoredUser {
    name: String,
    password: String,
    host_ip: String,
}

impl RecordSchema for StoredUser {
    const TABLE: &'static str = "users";
    const COLUMNS: &'static [&'static str] = &["name", "password", "host_ip"];

    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            name: column(row, "name")?,
            password: column(row, "password")?,
            host_ip: column(row, "host_ip")?,
        })
    }
}

pub struct SqliteLocalUserRepository {
    pool: SqlitePool,
    codec: SecretCodec,
}

impl SqliteLocalUserRepository {
    pub fn new(pool: SqlitePool, codec: SecretCodec) -> Self {
        Self { pool, codec }
    }

    fn open(&self, stored: StoredLocalUser) -> Result<LocalUser, RepositoryError> {
        Ok(LocalUser {
            name: stored.name,
            password: reveal(&self.codec, stored.password)?,
            host_name: stored.host_name,
        })
    }
}

#[async_trait]
impl LocalUserRepository for SqliteLocalUserRepository {
    async fn insert(&self, user: &LocalUser) -> Result<(), RepositoryError> {
        user.validate()?;
        let sealed = self.codec.encrypt(&user.password)?;

        sqlx::query("INSERT INTO local_users (name, password, host_name) VALUES (?, ?, ?)")
            .bind(&user.name)
            .bind(sealed)
            .bind(&user.host_name)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                describe_conflict(e.into(), |_| {
                    format!("local user '{}' already exists", user.name)
                })
            })?;

        Ok(())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<LocalUser>, RepositoryError> {
        let filter = QueryFilter::new().condition("name", name);
        store::list::<StoredLocalUser>(&self.pool, &filter)
            .await?
            .into_iter()
            .next()
            .map(|stored| self.open(stored))
            .transpose()
    }

    async fn query(&self, filter: &QueryFilter) -> Result<Page<LocalUser>, RepositoryError> {
        store::query::<StoredLocalUser>(&self.pool, filter)
            .await?
            .map(|stored| self.open(stored))
    }

    async fn delete(&self, name: &str) -> Result<(), RepositoryError> {
        let filter = QueryFilter::new().condition("name", name);
        if store::delete::<StoredLocalUser>(&self.pool, &filter).await? == 0 {
            return Err(RepositoryError::NotFound(format!("local user '{}'", name)));
        }
        Ok(())
    }

    async fn delete_matching(&self, filter: &QueryFilter) -> Result<u64, RepositoryError> {
        store::delete::<StoredLocalUser>(&self.pool, filter).await
    }
}

pub struct SqliteUserRepository {
    pool: SqlitePool,
    codec: SecretCodec,
}

impl SqliteUserRepository {
    pub fn new(pool: SqlitePool, codec: SecretCodec) -> Self {
        Self { pool, codec }
    }

    fn open(&self, stored: StoredUser) -> Result<User, RepositoryError> {
        Ok(User {
            name: stored.name,
            password: reveal(&self.codec, stored.password)?,
            host_ip: stored.host_ip,
        })
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn insert(&self, user: &User) -> Result<(), RepositoryError> {
        user.validate()?;
        let sealed = self.codec.encrypt(&user.password)?;

        sqlx::query("INSERT INTO users (name, password, host_ip) VALUES (?, ?, ?)")
            .bind(&user.name)
            .bind(sealed)
            .bind(&user.host_ip)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                describe_conflict(e.into(), |_| format!("user '{}' already exists", user.name))
            })?;

        Ok(())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<User>, RepositoryError> {
        let filter = QueryFilter::new().condition("name", name);
        store::list::<StoredUser>(&self.pool, &filter)
            .await?
            .into_iter()
            .next()
            .map(|stored| self.open(stored))
            .transpose()
    }

    async fn query(&self, filter: &QueryFilter) -> Result<Page<User>, RepositoryError> {
        store::query::<StoredUser>(&self.pool, filter)
            .await?
            .map(|stored| self.open(stored))
    }

    async fn delete(&self, name: &str) -> Result<(), RepositoryError> {
        let filter = QueryFilter::new().condition("name", name);
        if store::delete::<StoredUser>(&self.pool, &filter).await? == 0 {
            return Err(RepositoryError::NotFound(format!("user '{}'", name)));
        }
        Ok(())
    }

    async fn delete_matching(&self, filter: &QueryFilter) -> Result<u64, RepositoryError> {
        store::delete::<StoredUser>(&self.pool, filter).await
    }
}
