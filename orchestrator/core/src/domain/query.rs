// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! # QueryFilter
//!
//! The fixed filter/pagination shape accepted by every list and prune
//! operation against the metadata store:
//!
//! ```json
//! {
//!   "fields": ["name", "host_ip"],
//!   "keyword": {"name": "backup"},
//!   "pagination": {"page": 2, "page_size": 5},
//!   "conditions": {"host_ip": "10.0.0.1"}
//! }
//! ```
//!
//! - `fields` projects output columns (empty = every column).
//! - `keyword` adds a case-insensitive substring match per column; empty
//!   values are ignored. Case folding is SQLite's `LOWER`, which only folds
//!   ASCII letters: `ÄRCHIV` does not match `ärchiv`.
//! - `conditions` adds an equality match per column. A `null` condition
//!   matches both `NULL` and the empty string, since unset text columns
//!   (e.g. a share's `mount_point`) are stored as `''`.
//! - `pagination` is 1-indexed.
//!
//! Column names are checked against the record's static schema by the
//! store, not here.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::domain::validation::ValidationError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryFilter {
    #[serde(default)]
    pub fields: Vec<String>,
    #[serde(default)]
    pub keyword: BTreeMap<String, String>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
    #[serde(default)]
    pub conditions: Map<String, Value>,
}

impl QueryFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, column: impl Into<String>) -> Self {
        self.fields.push(column.into());
        self
    }

    pub fn keyword(mut self, column: impl Into<String>, pattern: impl Into<String>) -> Self {
        self.keyword.insert(column.into(), pattern.into());
        self
    }

    pub fn condition(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.insert(column.into(), value.into());
        self
    }

    pub fn paginate(mut self, page: u32, page_size: u32) -> Self {
        self.pagination = Some(Pagination { page, page_size });
        self
    }

    /// Keyword entries that actually constrain the result set.
    pub fn active_keywords(&self) -> impl Iterator<Item = (&String, &String)> {
        self.keyword.iter().filter(|(_, pattern)| !pattern.is_empty())
    }

    /// True when neither keywords nor conditions constrain the query.
    pub fn is_unconstrained(&self) -> bool {
        self.active_keywords().next().is_none() && self.conditions.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
}

impl Pagination {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.page < 1 {
            return Err(ValidationError::new("pagination page must be >= 1"));
        }
        if self.page_size == 0 {
            return Err(ValidationError::new("pagination page_size must be > 0"));
        }
        Ok(())
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.page_size)
    }

    pub fn limit(&self) -> u64 {
        u64::from(self.page_size)
    }
}

/// One page of matching records plus the count over the full predicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub records: Vec<T>,
    pub total: u64,
}

impl<T> Page<T> {
    pub fn new(records: Vec<T>, total: u64) -> Self {
        Self { records, total }
    }

    pub fn map<U, E>(self, f: impl FnMut(T) -> Result<U, E>) -> Result<Page<U>, E> {
        let records = self.records.into_iter().map(f).collect::<Result<Vec<_>, _>>()?;
        Ok(Page {
            records,
            total: self.total,
        })
    }
}
