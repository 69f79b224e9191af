// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! SQLite Share
//!
//! `mount_point` is stored as `''` when unset and `access_user_names` as a
//! comma-joined list; both are mapped back to their domain shapes on read.

use async_trait::async_trait;
use sqlx::sqlite::{SqlitePool, SqliteRow};

use crate::domain::query::{Page, QueryFilter};
use crate::domain::repository::{RepositoryError, ShareRepository};
use crate::domain::share::{join_access_users, split_access_users, Share};
use crate::infrastructure::repositories::describe_conflict;
use crate::infrastructure::store::{self, column, RecordSchema};

impl RecordSchema for Share {
    const TABLE: &'static str = "shares";
    const COLUMNS: &'static [&'static str] = &[
        "name",
        "host_ip",
        "path",
        "directory_name",
        "description",
        "mount_point",
        "access_user_names",
    ];

    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        let mount_point: String = column(row, "mount_point")?;
        let access_user_names: String = column(row, "access_user_names")?;

        Ok(Self {
            name: column(row, "name")?,
            host_ip: column(row, "host_ip")?,
            path: column(row, "path")?,
            directory_name: column(row, "directory_name")?,
            description: column(row, "description")?,
            mount_point: Some(mount_point).filter(|m| !m.is_empty()),
            access_user_names: split_access_users(&access_user_names),
        })
    }
}

pub struct SqliteShareRepository {
    pool: SqlitePool,
}

impl SqliteShareRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ShareRepository for SqliteShareRepository {
    async fn insert(&self, share: &Share) -> Result<(), RepositoryError> {
        share.validate()?;

        sqlx::query(
            r#"
            INSERT INTO shares (
                name, host_ip, path, directory_name,
                description, mount_point, access_user_names
            )
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&share.name)
        .bind(&share.host_ip)
        .bind(&share.path)
        .bind(&share.directory_name)
        .bind(&share.description)
        .bind(share.mount_point.as_deref().unwrap_or_default())
        .bind(join_access_users(&share.access_user_names))
        .execute(&self.pool)
        .await
        .map_err(|e| {
            describe_conflict(e.into(), |_| format!("share '{}' already exists", share.name))
        })?;

        Ok(())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Share>, RepositoryError> {
        Ok(
            store::list::<Share>(&self.pool, &QueryFilter::new().condition("name", name))
                .await?
                .into_iter()
                .next(),
        )
    }

    async fn set_mount_point(
        &self,
        name: &str,
        mount_point: Option<&str>,
    ) -> Result<(), RepositoryError> {
        let updated = sqlx::query("UPDATE shares SET mount_point = ? WHERE name = ?")
            .bind(mount_point.unwrap_or_default())
            .bind(name)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if updated == 0 {
            return Err(RepositoryError::NotFound(format!("share '{}'", name)));
        }
        Ok(())
    }

    async fn query(&self, filter: &QueryFilter) -> Result<Page<Share>, RepositoryError> {
        store::query::<Share>(&self.pool, filter).await
    }

    async fn delete(&self, name: &str) -> Result<(), RepositoryError> {
        let removed =
            store::delete::<Share>(&self.pool, &QueryFilter::new().condition("name", name)).await?;
        if removed == 0 {
            return Err(RepositoryError::NotFound(format!("share '{}'", name)));
        }
        Ok(())
    }

    async fn delete_matching(&self, filter: &QueryFilter) -> Result<u64, RepositoryError> {
        store::delete::<Share>(&self.pool, filter).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::db::Database;

    #[tokio::test]
    async fn test_share_round_trip_and_mount() {
        let db = Database::in_memory().await.unwrap();
        let repo = SqliteShareRepository::new(db.get_pool().clone());

        let share = Share::new("s1", "10.0.0.1", "d1")
            .with_description("team data")
            .with_access_users(["carol", "alice"]);
        repo.insert(&share).await.unwrap();

        let loaded = repo.find_by_name("s1").await.unwrap().unwrap();
        assert_eq!(loaded, share);
        assert!(!loaded.is_mounted());

        repo.set_mount_point("s1", Some("/mnt/s1")).await.unwrap();
        let loaded = repo.find_by_name("s1").await.unwrap().unwrap();
        assert_eq!(loaded.mount_point.as_deref(), Some("/mnt/s1"));

        repo.set_mount_point("s1", None).await.unwrap();
        assert!(repo.find_by_name("s1").await.unwrap().unwrap().mount_point.is_none());

        assert!(matches!(
            repo.set_mount_point("s9", Some("/mnt/x")).await,
            Err(RepositoryError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_duplicate_share_name_conflicts() {
        let db = Database::in_memory().await.unwrap();
        let repo = SqliteShareRepository::new(db.get_pool().clone());

        repo.insert(&Share::new("s1", "10.0.0.1", "d1")).await.unwrap();
        let err = repo.insert(&Share::new("s1", "10.0.0.2", "d2")).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(msg) if msg.contains("s1")));
    }

    #[tokio::test]
    async fn test_null_mount_point_condition_finds_unmounted_shares() {
        let db = Database::in_memory().await.unwrap();
        let repo = SqliteShareRepository::new(db.get_pool().clone());

        repo.insert(&Share::new("s1", "10.0.0.1", "d1")).await.unwrap();
        repo.insert(&Share::new("s2", "10.0.0.1", "d2")).await.unwrap();
        repo.set_mount_point("s2", Some("/mnt/s2")).await.unwrap();

        let unmounted = repo
            .query(&QueryFilter::new().condition("mount_point", serde_json::Value::Null))
            .await
            .unwrap();
        let names: Vec<_> = unmounted.records.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["s1"]);
    }
}
