// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use serde_json::Value;
use sqlx::sqlite::{Sqlite, SqlitePool};
use sqlx::QueryBuilder;
use tracing::debug;

use super::RecordSchema;
use crate::domain::query::{Page, Pagination, QueryFilter};
use crate::domain::repository::RepositoryError;
use crate::domain::validation::ValidationError;

#[derive(Debug, Clone, PartialEq)]
enum ConditionValue {
    Text(String),
    Integer(i64),
    Real(f64),
    Bool(bool),
    Null,
}

impl ConditionValue {
    fn from_json(column: &str, value: &Value) -> Result<Self, ValidationError> {
        match value {
            Value::String(s) => Ok(Self::Text(s.clone())),
            Value::Bool(b) => Ok(Self::Bool(*b)),
            Value::Null => Ok(Self::Null),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Self::Integer(i))
                } else if let Some(f) = n.as_f64() {
                    Ok(Self::Real(f))
                } else {
                    Err(ValidationError(format!(
                        "condition on '{}' has an unrepresentable number",
                        column
                    )))
                }
            }
            Value::Array(_) | Value::Object(_) => Err(ValidationError(format!(
                "condition on '{}' must be a scalar value",
                column
            ))),
        }
    }
}

/// A filter whose column names have all been resolved against a schema.
#[derive(Debug)]
struct CompiledFilter {
    projection: Vec<&'static str>,
    keywords: Vec<(&'static str, String)>,
    conditions: Vec<(&'static str, ConditionValue)>,
    pagination: Option<Pagination>,
}

fn resolve_column<R: RecordSchema>(name: &str) -> Result<&'static str, ValidationError> {
    R::COLUMNS
        .iter()
        .copied()
        .find(|column| *column == name)
        .ok_or_else(|| ValidationError(format!("invalid attribute '{}' for {}", name, R::TABLE)))
}

fn compile<R: RecordSchema>(filter: &QueryFilter) -> Result<CompiledFilter, ValidationError> {
    let projection = if filter.fields.is_empty() {
        R::COLUMNS.to_vec()
    } else {
        let mut projection = Vec::with_capacity(filter.fields.len());
        for field in &filter.fields {
            let field = field.trim();
            if field.is_empty() {
                continue;
            }
            let column = resolve_column::<R>(field)?;
            if !projection.contains(&column) {
                projection.push(column);
            }
        }
        if projection.is_empty() {
            return Err(ValidationError::new("no valid fields selected"));
        }
        projection
    };

    let keywords = filter
        .active_keywords()
        .map(|(column, pattern)| Ok((resolve_column::<R>(column)?, pattern.clone())))
        .collect::<Result<Vec<_>, ValidationError>>()?;

    let conditions = filter
        .conditions
        .iter()
        .map(|(column, value)| {
            let column = resolve_column::<R>(column)?;
            Ok((column, ConditionValue::from_json(column, value)?))
        })
        .collect::<Result<Vec<_>, ValidationError>>()?;

    if let Some(pagination) = &filter.pagination {
        pagination.validate()?;
    }

    Ok(CompiledFilter {
        projection,
        keywords,
        conditions,
        pagination: filter.pagination,
    })
}

fn escape_like(pattern: &str) -> String {
    let mut escaped = String::with_capacity(pattern.len() + 2);
    escaped.push('%');
    for c in pattern.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

impl CompiledFilter {
    fn has_predicate(&self) -> bool {
        !self.keywords.is_empty() || !self.conditions.is_empty()
    }

    fn push_where(&self, builder: &mut QueryBuilder<'_, Sqlite>) {
        let mut clause = " WHERE ";

        for (column, pattern) in &self.keywords {
            builder
                .push(clause)
                .push("LOWER(")
                .push(*column)
                .push(") LIKE LOWER(")
                .push_bind(escape_like(pattern))
                .push(") ESCAPE '\\'");
            clause = " AND ";
        }

        for (column, value) in &self.conditions {
            builder.push(clause);
            match value {
                // Unset text columns are stored as '' rather than NULL.
                ConditionValue::Null => {
                    builder
                        .push("(")
                        .push(*column)
                        .push(" IS NULL OR ")
                        .push(*column)
                        .push(" = '')");
                }
                ConditionValue::Text(s) => {
                    builder.push(*column).push(" = ").push_bind(s.clone());
                }
                ConditionValue::Integer(i) => {
                    builder.push(*column).push(" = ").push_bind(*i);
                }
                ConditionValue::Real(f) => {
                    builder.push(*column).push(" = ").push_bind(*f);
                }
                ConditionValue::Bool(b) => {
                    builder.push(*column).push(" = ").push_bind(*b);
                }
            }
            clause = " AND ";
        }
    }
}

/// SQLite integers are signed; anything beyond `i64::MAX` saturates so an
/// out-of-range offset yields an empty page rather than wrapping negative.
fn to_sql_int(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

async fn fetch<R: RecordSchema>(
    pool: &SqlitePool,
    compiled: &CompiledFilter,
) -> Result<Vec<R>, RepositoryError> {
    let mut builder = QueryBuilder::<Sqlite>::new("SELECT ");
    builder.push(compiled.projection.join(", "));
    builder.push(" FROM ").push(R::TABLE);
    compiled.push_where(&mut builder);
    // rowid keeps page boundaries stable across calls
    builder.push(" ORDER BY rowid");
    if let Some(pagination) = &compiled.pagination {
        builder
            .push(" LIMIT ")
            .push_bind(to_sql_int(pagination.limit()))
            .push(" OFFSET ")
            .push_bind(to_sql_int(pagination.offset()));
    }

    let rows = builder.build().fetch_all(pool).await?;
    rows.iter()
        .map(|row| R::from_row(row).map_err(RepositoryError::from))
        .collect()
}

async fn count<R: RecordSchema>(
    pool: &SqlitePool,
    compiled: &CompiledFilter,
) -> Result<u64, RepositoryError> {
    let mut builder = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM ");
    builder.push(R::TABLE);
    compiled.push_where(&mut builder);
    let total: i64 = builder.build_query_scalar().fetch_one(pool).await?;
    Ok(total.max(0) as u64)
}

/// Matching records plus the total over the full predicate. With
/// pagination, only the requested page is returned.
pub async fn query<R: RecordSchema>(
    pool: &SqlitePool,
    filter: &QueryFilter,
) -> Result<Page<R>, RepositoryError> {
    let compiled = compile::<R>(filter)?;

    let page = if compiled.pagination.is_some() {
        let total = count::<R>(pool, &compiled).await?;
        Page::new(fetch::<R>(pool, &compiled).await?, total)
    } else {
        let records = fetch::<R>(pool, &compiled).await?;
        let total = records.len() as u64;
        Page::new(records, total)
    };

    debug!(table = R::TABLE, returned = page.records.len(), total = page.total, "Queried records");
    Ok(page)
}

/// Every matching record. Pagination is rejected, never ignored.
pub async fn list<R: RecordSchema>(
    pool: &SqlitePool,
    filter: &QueryFilter,
) -> Result<Vec<R>, RepositoryError> {
    if filter.pagination.is_some() {
        return Err(RepositoryError::Validation(format!(
            "pagination is not supported when listing all {}",
            R::TABLE
        )));
    }
    let compiled = compile::<R>(filter)?;
    fetch::<R>(pool, &compiled).await
}

/// Permanently remove every matching record, returning how many went.
pub async fn delete<R: RecordSchema>(
    pool: &SqlitePool,
    filter: &QueryFilter,
) -> Result<u64, RepositoryError> {
    if filter.pagination.is_some() {
        return Err(RepositoryError::Validation(
            "pagination is not supported on delete".to_string(),
        ));
    }
    let compiled = compile::<R>(filter)?;
    if !compiled.has_predicate() {
        return Err(RepositoryError::Validation(format!(
            "refusing to delete from {} without a keyword or condition",
            R::TABLE
        )));
    }

    let mut builder = QueryBuilder::<Sqlite>::new("DELETE FROM ");
    builder.push(R::TABLE);
    compiled.push_where(&mut builder);
    let affected = builder.build().execute(pool).await?.rows_affected();

    debug!(table = R::TABLE, affected, "Deleted records");
    Ok(affected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::directory::Directory;
    use crate::infrastructure::db::Database;
    use serde_json::json;

    async fn seeded(count: usize) -> Database {
        let db = Database::in_memory().await.unwrap();
        for i in 1..=count {
            sqlx::query("INSERT INTO directories (name, host_ip) VALUES (?, ?)")
                .bind(format!("dir-{:02}", i))
                .bind(if i % 2 == 0 { "10.0.0.2" } else { "10.0.0.1" })
                .execute(db.get_pool())
                .await
                .unwrap();
        }
        db
    }

    #[tokio::test]
    async fn test_second_page_of_twelve() {
        let db = seeded(12).await;
        let page = query::<Directory>(db.get_pool(), &QueryFilter::new().paginate(2, 5))
            .await
            .unwrap();

        assert_eq!(page.total, 12);
        let names: Vec<_> = page.records.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["dir-06", "dir-07", "dir-08", "dir-09", "dir-10"]);
    }

    #[tokio::test]
    async fn test_last_partial_page() {
        let db = seeded(12).await;
        let page = query::<Directory>(db.get_pool(), &QueryFilter::new().paginate(3, 5))
            .await
            .unwrap();
        assert_eq!(page.total, 12);
        assert_eq!(page.records.len(), 2);
    }

    #[tokio::test]
    async fn test_page_beyond_sql_range_is_empty() {
        let db = seeded(3).await;
        let page = query::<Directory>(db.get_pool(), &QueryFilter::new().paginate(u32::MAX, u32::MAX))
            .await
            .unwrap();
        assert_eq!(page.total, 3);
        assert!(page.records.is_empty());
    }

    #[test]
    fn test_to_sql_int_saturates() {
        assert_eq!(to_sql_int(5), 5);
        assert_eq!(to_sql_int(u64::MAX), i64::MAX);
    }

    #[tokio::test]
    async fn test_unknown_field_is_rejected() {
        let db = seeded(3).await;
        let err = query::<Directory>(db.get_pool(), &QueryFilter::new().field("password"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Validation(msg) if msg.contains("invalid attribute")));
    }

    #[tokio::test]
    async fn test_blank_projection_is_rejected() {
        let db = seeded(1).await;
        let err = query::<Directory>(db.get_pool(), &QueryFilter::new().field("  "))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Validation(_)));
    }

    #[tokio::test]
    async fn test_projection_defaults_missing_columns() {
        let db = seeded(1).await;
        let page = query::<Directory>(db.get_pool(), &QueryFilter::new().field("name"))
            .await
            .unwrap();
        assert_eq!(page.records[0].name, "dir-01");
        assert_eq!(page.records[0].host_ip, "");
    }

    #[tokio::test]
    async fn test_empty_keyword_is_noop() {
        let db = seeded(4).await;
        let page = query::<Directory>(db.get_pool(), &QueryFilter::new().keyword("name", ""))
            .await
            .unwrap();
        assert_eq!(page.total, 4);
    }

    #[tokio::test]
    async fn test_keyword_is_case_insensitive_substring() {
        let db = seeded(12).await;
        let page = query::<Directory>(db.get_pool(), &QueryFilter::new().keyword("name", "DIR-1"))
            .await
            .unwrap();
        let names: Vec<_> = page.records.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["dir-10", "dir-11", "dir-12"]);
    }

    #[tokio::test]
    async fn test_keyword_case_folding_is_ascii_only() {
        let db = Database::in_memory().await.unwrap();
        sqlx::query("INSERT INTO directories (name, host_ip) VALUES ('ärchiv-Backup', '10.0.0.1')")
            .execute(db.get_pool())
            .await
            .unwrap();

        let ascii = query::<Directory>(db.get_pool(), &QueryFilter::new().keyword("name", "BACKUP"))
            .await
            .unwrap();
        assert_eq!(ascii.total, 1);

        let folded = query::<Directory>(db.get_pool(), &QueryFilter::new().keyword("name", "ÄRCHIV"))
            .await
            .unwrap();
        assert_eq!(folded.total, 0);
    }

    #[tokio::test]
    async fn test_keyword_wildcards_are_literal() {
        let db = Database::in_memory().await.unwrap();
        for name in ["a_b", "axb"] {
            sqlx::query("INSERT INTO directories (name, host_ip) VALUES (?, '10.0.0.1')")
                .bind(name)
                .execute(db.get_pool())
                .await
                .unwrap();
        }
        let page = query::<Directory>(db.get_pool(), &QueryFilter::new().keyword("name", "_"))
            .await
            .unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.records[0].name, "a_b");
    }

    #[tokio::test]
    async fn test_keyword_and_condition_are_conjunctive() {
        let db = seeded(12).await;
        let filter = QueryFilter::new()
            .keyword("name", "dir-0")
            .condition("host_ip", "10.0.0.2");
        let page = query::<Directory>(db.get_pool(), &filter).await.unwrap();
        let names: Vec<_> = page.records.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["dir-02", "dir-04", "dir-06", "dir-08"]);
    }

    #[tokio::test]
    async fn test_structured_condition_is_rejected() {
        let db = seeded(1).await;
        let filter = QueryFilter::new().condition("name", json!(["a", "b"]));
        let err = query::<Directory>(db.get_pool(), &filter).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Validation(_)));
    }

    #[tokio::test]
    async fn test_list_rejects_pagination() {
        let db = seeded(2).await;
        let err = list::<Directory>(db.get_pool(), &QueryFilter::new().paginate(1, 1))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Validation(_)));
    }

    #[tokio::test]
    async fn test_delete_matching_and_guards() {
        let db = seeded(6).await;

        let unconstrained = delete::<Directory>(db.get_pool(), &QueryFilter::new()).await;
        assert!(matches!(unconstrained, Err(RepositoryError::Validation(_))));

        let paged = delete::<Directory>(
            db.get_pool(),
            &QueryFilter::new().condition("host_ip", "10.0.0.1").paginate(1, 2),
        )
        .await;
        assert!(matches!(paged, Err(RepositoryError::Validation(_))));

        let removed = delete::<Directory>(
            db.get_pool(),
            &QueryFilter::new().condition("host_ip", "10.0.0.1"),
        )
        .await
        .unwrap();
        assert_eq!(removed, 3);

        let remaining = list::<Directory>(db.get_pool(), &QueryFilter::new()).await.unwrap();
        assert!(remaining.iter().all(|d| d.host_ip == "10.0.0.2"));
    }

    #[test]
    fn test_condition_values() {
        assert_eq!(ConditionValue::from_json("c", &json!(null)).unwrap(), ConditionValue::Null);
        assert_eq!(ConditionValue::from_json("c", &json!(3)).unwrap(), ConditionValue::Integer(3));
        assert_eq!(ConditionValue::from_json("c", &json!(true)).unwrap(), ConditionValue::Bool(true));
        assert!(ConditionValue::from_json("c", &json!({"a": 1})).is_err());
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("50%_off\\"), "%50\\%\\_off\\\\%");
    }
}
