//! SQLite-backed document store using sqlx.
//!
//! All collections share one `documents` table; bodies are stored as JSON
//! text and filters compile to `json_extract` predicates.
//!
//! SQLite's `lower()` only folds ASCII, so `Contains` is not decided in SQL.
//! It compiles to a looser "field is text" predicate and the candidates are
//! re-checked with [`Filter::matches`]. Filters have no negation, so a looser
//! leaf only ever widens the candidate set.

use {
    async_trait::async_trait,
    serde_json::Value,
    sqlx::{QueryBuilder, Row, Sqlite, SqlitePool, sqlite::SqlitePoolOptions},
    tracing::debug,
};

use crate::{
    Result,
    filter::{Filter, Page},
    store::{DocumentStore, RawDocument},
    types::DocumentId,
};

pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Connect to `database_url` and create the documents table if needed.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Self::with_pool(pool).await
    }

    /// Use an existing pool. The documents table is created if missing.
    pub async fn with_pool(pool: SqlitePool) -> Result<Self> {
        Self::init(&pool).await?;
        Ok(Self { pool })
    }

    async fn init(pool: &SqlitePool) -> Result<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS documents (
                seq        INTEGER PRIMARY KEY AUTOINCREMENT,
                collection TEXT NOT NULL,
                id         TEXT NOT NULL,
                data       TEXT NOT NULL,
                UNIQUE (collection, id)
            )",
        )
        .execute(pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for SqliteStore {
    async fn insert(&self, collection: &str, body: Value) -> Result<DocumentId> {
        let id = DocumentId::generate();
        let data = serde_json::to_string(&body)?;
        sqlx::query("INSERT INTO documents (collection, id, data) VALUES (?, ?, ?)")
            .bind(collection)
            .bind(id.as_str())
            .bind(&data)
            .execute(&self.pool)
            .await?;
        debug!(collection, %id, "inserted document");
        Ok(id)
    }

    async fn insert_unique(
        &self,
        collection: &str,
        field: &str,
        body: Value,
    ) -> Result<Option<DocumentId>> {
        let id = DocumentId::generate();
        let data = serde_json::to_string(&body)?;
        let guard = Filter::eq(field, body.get(field).cloned().unwrap_or(Value::Null));

        // One statement, so the existence check and the write are atomic.
        let mut qb = QueryBuilder::<Sqlite>::new(
            "INSERT INTO documents (collection, id, data) SELECT ",
        );
        qb.push_bind(collection.to_string());
        qb.push(", ");
        qb.push_bind(id.as_str().to_string());
        qb.push(", ");
        qb.push_bind(data);
        qb.push(" WHERE NOT EXISTS (SELECT 1 FROM documents WHERE collection = ");
        qb.push_bind(collection.to_string());
        qb.push(" AND ");
        push_filter(&mut qb, &guard);
        qb.push(")");

        let inserted = qb.build().execute(&self.pool).await?.rows_affected() > 0;
        if !inserted {
            debug!(collection, field, "unique insert skipped, value taken");
            return Ok(None);
        }
        debug!(collection, %id, "inserted document");
        Ok(Some(id))
    }

    async fn find(
        &self,
        collection: &str,
        filter: &Filter,
        page: Page,
    ) -> Result<Vec<RawDocument>> {
        let exact = !has_contains(filter);
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT id, data FROM documents WHERE collection = ");
        qb.push_bind(collection.to_string());
        qb.push(" AND ");
        push_filter(&mut qb, filter);
        qb.push(" ORDER BY seq");
        if exact {
            // SQLite needs a LIMIT before OFFSET; -1 means unbounded.
            qb.push(" LIMIT ");
            qb.push_bind(page.limit.map_or(-1, |l| i64::try_from(l).unwrap_or(i64::MAX)));
            qb.push(" OFFSET ");
            qb.push_bind(i64::try_from(page.skip).unwrap_or(i64::MAX));
        }

        let rows = qb.build().fetch_all(&self.pool).await?;
        let mut docs = Vec::with_capacity(rows.len());
        for row in rows {
            let id: String = row.try_get("id")?;
            let data: String = row.try_get("data")?;
            docs.push(RawDocument {
                id: id.into(),
                body: serde_json::from_str(&data)?,
            });
        }
        if exact {
            return Ok(docs);
        }
        Ok(page.apply(docs.into_iter().filter(|d| filter.matches(d))))
    }
}

/// Whether any leaf of `filter` needs re-checking outside SQL.
fn has_contains(filter: &Filter) -> bool {
    match filter {
        Filter::Contains { .. } => true,
        Filter::And(filters) | Filter::Or(filters) => filters.iter().any(has_contains),
        Filter::All | Filter::Eq { .. } | Filter::IdIn(_) => false,
    }
}

fn json_path(field: &str) -> String {
    format!("$.\"{}\"", field.replace('"', "\\\""))
}

fn push_filter(qb: &mut QueryBuilder<'_, Sqlite>, filter: &Filter) {
    match filter {
        Filter::All => {
            qb.push("1 = 1");
        },
        Filter::Eq { field, value } => {
            qb.push("json_extract(data, ");
            qb.push_bind(json_path(field));
            match value {
                Value::Null => {
                    qb.push(") IS NULL");
                },
                Value::Bool(b) => {
                    qb.push(") = ");
                    qb.push_bind(i64::from(*b));
                },
                Value::Number(n) => {
                    qb.push(") = ");
                    match n.as_i64() {
                        Some(i) => qb.push_bind(i),
                        None => qb.push_bind(n.as_f64().unwrap_or_default()),
                    };
                },
                Value::String(s) => {
                    qb.push(") = ");
                    qb.push_bind(s.clone());
                },
                Value::Array(_) | Value::Object(_) => {
                    qb.push(") = json(");
                    qb.push_bind(value.to_string());
                    qb.push(")");
                },
            }
        },
        Filter::Contains { field, .. } => {
            qb.push("json_type(data, ");
            qb.push_bind(json_path(field));
            qb.push(") = 'text'");
        },
        Filter::IdIn(ids) if ids.is_empty() => {
            qb.push("0 = 1");
        },
        Filter::IdIn(ids) => {
            qb.push("id IN (");
            {
                let mut list = qb.separated(", ");
                for id in ids {
                    list.push_bind(id.as_str().to_string());
                }
            }
            qb.push(")");
        },
        Filter::And(filters) => push_joined(qb, filters, " AND ", "1 = 1"),
        Filter::Or(filters) => push_joined(qb, filters, " OR ", "0 = 1"),
    }
}

fn push_joined(
    qb: &mut QueryBuilder<'_, Sqlite>,
    filters: &[Filter],
    separator: &str,
    empty: &str,
) {
    if filters.is_empty() {
        qb.push(empty);
        return;
    }
    qb.push("(");
    for (i, f) in filters.iter().enumerate() {
        if i > 0 {
            qb.push(separator);
        }
        push_filter(qb, f);
    }
    qb.push(")");
}
