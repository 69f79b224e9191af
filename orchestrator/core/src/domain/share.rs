// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! # Share Aggregate
//!
//! An exported (CIFS) share backed by a [`Directory`](super::directory::Directory)
//! on the same host.
//!
//! ## Access user list encoding
//!
//! `access_user_names` is an ordered list persisted as a single
//! comma-joined column. No escaping is defined for the delimiter, so names
//! containing [`ACCESS_USER_DELIMITER`] are rejected by [`Share::validate`]
//! instead of being silently split on read-back.

use serde::{Deserialize, Serialize};

use crate::domain::validation::{require_ip, require_non_empty, ValidationError};

pub const ACCESS_USER_DELIMITER: char = ',';

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Share {
    pub name: String,
    pub host_ip: String,
    /// Exported path on the host. Defaults to the directory name when empty.
    #[serde(default)]
    pub path: String,
    pub directory_name: String,
    #[serde(default)]
    pub description: String,
    /// Set once the share has been mounted through the host's executor.
    #[serde(default)]
    pub mount_point: Option<String>,
    #[serde(default)]
    pub access_user_names: Vec<String>,
}

impl Share {
    pub fn new(
        name: impl Into<String>,
        host_ip: impl Into<String>,
        directory_name: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            host_ip: host_ip.into(),
            path: String::new(),
            directory_name: directory_name.into(),
            description: String::new(),
            mount_point: None,
            access_user_names: Vec::new(),
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_access_users<I, S>(mut self, users: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.access_user_names = users.into_iter().map(Into::into).collect();
        self
    }

    /// Path exported on the host; falls back to the backing directory.
    pub fn effective_path(&self) -> &str {
        if self.path.is_empty() {
            &self.directory_name
        } else {
            &self.path
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.mount_point.as_deref().is_some_and(|m| !m.is_empty())
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_empty("share name", &self.name)?;
        require_ip("share host_ip", &self.host_ip)?;
        require_non_empty("share directory_name", &self.directory_name)?;
        for user in &self.access_user_names {
            require_non_empty("access user name", user)?;
            if user.contains(ACCESS_USER_DELIMITER) {
                return Err(ValidationError(format!(
                    "access user name '{}' must not contain '{}'",
                    user, ACCESS_USER_DELIMITER
                )));
            }
        }
        Ok(())
    }
}

/// Join access user names for storage.
pub fn join_access_users(users: &[String]) -> String {
    users.join(&ACCESS_USER_DELIMITER.to_string())
}

/// Split a stored access user column; an empty column is an empty list.
pub fn split_access_users(stored: &str) -> Vec<String> {
    if stored.is_empty() {
        return Vec::new();
    }
    stored
        .split(ACCESS_USER_DELIMITER)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_users_round_trip_preserves_order() {
        let users = vec!["carol".to_string(), "alice".to_string(), "bob".to_string()];
        let stored = join_access_users(&users);
        assert_eq!(stored, "carol,alice,bob");
        assert_eq!(split_access_users(&stored), users);
    }

    #[test]
    fn test_empty_column_is_empty_list() {
        assert!(split_access_users("").is_empty());
        assert_eq!(join_access_users(&[]), "");
    }

    #[test]
    fn test_validate_rejects_delimiter_in_user_name() {
        let share = Share::new("s1", "10.0.0.1", "d1").with_access_users(["a,b"]);
        assert!(share.validate().is_err());
    }

    #[test]
    fn test_effective_path_defaults_to_directory() {
        let share = Share::new("s1", "10.0.0.1", "d1");
        assert_eq!(share.effective_path(), "d1");
        let share = share.with_path("/srv/d1");
        assert_eq!(share.effective_path(), "/srv/d1");
    }
}
