// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Generic Record Store
//!
//! A filter/pagination engine shared by every SQLite repository.
//!
//! # Architecture
//!
//! - **Layer:** Infrastructure Layer
//! - **Purpose:** Turn a [`QueryFilter`](crate::domain::query::QueryFilter)
//!   into parameterized SQL over any table with a static [`RecordSchema`]
//!
//! Column identifiers are only ever taken from `RecordSchema::COLUMNS`; every
//! user-supplied value is a bound parameter.

mod engine;

pub use engine::{delete, list, query};

use sqlx::sqlite::{Sqlite, SqliteRow};
use sqlx::Row;

/// Static description of one persisted record shape.
pub trait RecordSchema: Sized + Send + Unpin {
    const TABLE: &'static str;

    /// Every selectable column, in storage order.
    const COLUMNS: &'static [&'static str];

    /// Build a record from a row that may carry only a projection of
    /// `COLUMNS`.
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error>;
}

/// Read `name` from `row`, falling back to `T::default()` when the column
/// was projected out of the query.
pub fn column<T>(row: &SqliteRow, name: &str) -> Result<T, sqlx::Error>
where
    T: Default + sqlx::Type<Sqlite> + for<'r> sqlx::Decode<'r, Sqlite>,
{
    match row.try_get::<T, _>(name) {
        Ok(value) => Ok(value),
        Err(sqlx::Error::ColumnNotFound(_)) => Ok(T::default()),
        Err(e) => Err(e),
    }
}
