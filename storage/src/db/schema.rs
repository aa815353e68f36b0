//! Static descriptors for the tables this crate manages at startup.

use crate::db::connection::DbPool;
use crate::error::StorageError;

#[derive(Debug, Clone, Copy)]
pub struct ColumnSpec {
    pub name: &'static str,
    pub definition: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct TableSchema {
    pub name: &'static str,
    pub columns: &'static [ColumnSpec],
}

impl TableSchema {
    pub fn create_sql(&self) -> String {
        let columns = self
            .columns
            .iter()
            .map(|column| format!("{} {}", column.name, column.definition))
            .collect::<Vec<_>>()
            .join(", ");
        format!("CREATE TABLE IF NOT EXISTS {} ({})", self.name, columns)
    }
}

pub const ARTICLES: TableSchema = TableSchema {
    name: "articles",
    columns: &[
        ColumnSpec {
            name: "id",
            definition: "BIGSERIAL PRIMARY KEY",
        },
        ColumnSpec {
            name: "title",
            definition: "VARCHAR(128) NOT NULL",
        },
        ColumnSpec {
            name: "body",
            definition: "VARCHAR(1024) NOT NULL",
        },
    ],
};

/// Create the managed table if it does not exist yet.
///
/// Idempotent; runs directly on the pool at startup, outside any caller
/// transaction.
pub async fn ensure_schema(pool: &DbPool, table: &TableSchema) -> Result<(), StorageError> {
    let sql = table.create_sql();
    sqlx::query(&sql)
        .execute(pool)
        .await
        .map_err(|source| StorageError::Schema {
            table: table.name.to_string(),
            source,
        })?;
    tracing::debug!(table = table.name, "schema ensured");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn articles_ddl_is_rendered_with_if_not_exists() {
        assert_eq!(
            ARTICLES.create_sql(),
            "CREATE TABLE IF NOT EXISTS articles (id BIGSERIAL PRIMARY KEY, \
             title VARCHAR(128) NOT NULL, body VARCHAR(1024) NOT NULL)"
        );
    }
}
