use crate::core::importer::ImportTable;
use crate::domain::model::{FieldValue, ImportSummary, Row, LISTINGS_TABLE};
use crate::domain::ports::ListingSource;
use crate::utils::error::{BotError, Result};
use rusqlite::types::{ToSqlOutput, ValueRef};
use rusqlite::{params, params_from_iter, Connection, OpenFlags, ToSql};
use std::path::{Path, PathBuf};

/// SQLite file holding the `listings` relation.
///
/// No connection is kept between calls: every operation opens its own and
/// drops it before returning, on success and on error alike.
#[derive(Debug, Clone)]
pub struct SqliteListingStore {
    path: PathBuf,
}

impl SqliteListingStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Like [`SqliteListingStore::new`] but fails when the file is absent.
    pub fn open_existing(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.is_file() {
            return Err(BotError::StoreNotFound {
                path: path.display().to_string(),
            });
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn connect_read_only(&self) -> Result<Connection> {
        tracing::debug!("Opening store {} read-only", self.path.display());
        let conn = Connection::open_with_flags(
            &self.path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        Ok(conn)
    }

    /// Number of rows where `key` equals `value`.
    pub fn count(&self, key: &str, value: &str) -> Result<usize> {
        let conn = self.connect_read_only()?;
        ensure_columns(&conn, LISTINGS_TABLE, &[key])?;

        let sql = format!(
            "SELECT COUNT(*) FROM {} WHERE {} = ?1",
            quote_identifier(LISTINGS_TABLE),
            quote_identifier(key)
        );
        let count: i64 = conn.query_row(&sql, params![value], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Drops and recreates `listings` from `table` inside one transaction.
    pub fn replace_listings(&self, table: &ImportTable) -> Result<ImportSummary> {
        let mut conn = Connection::open(&self.path)?;
        let tx = conn.transaction()?;

        let listings = quote_identifier(LISTINGS_TABLE);
        tx.execute(&format!("DROP TABLE IF EXISTS {}", listings), [])?;

        let column_defs = table
            .columns
            .iter()
            .map(|column| format!("{} {}", quote_identifier(&column.name), column.kind.sql_type()))
            .collect::<Vec<_>>()
            .join(", ");
        tx.execute(&format!("CREATE TABLE {} ({})", listings, column_defs), [])?;

        {
            let placeholders = (1..=table.columns.len())
                .map(|i| format!("?{}", i))
                .collect::<Vec<_>>()
                .join(", ");
            let mut insert =
                tx.prepare(&format!("INSERT INTO {} VALUES ({})", listings, placeholders))?;
            for row in &table.rows {
                insert.execute(params_from_iter(row.iter()))?;
            }
        }

        if table.has_column("neighbourhood_group") {
            tx.execute(
                &format!(
                    "CREATE INDEX {} ON {} ({})",
                    quote_identifier("idx_listings_neighbourhood_group"),
                    listings,
                    quote_identifier("neighbourhood_group")
                ),
                [],
            )?;
        }

        tx.commit()?;

        let summary = ImportSummary {
            rows: table.rows.len(),
            columns: table.columns.len(),
        };
        tracing::info!(
            "Wrote {} rows ({} columns) to {}",
            summary.rows,
            summary.columns,
            self.path.display()
        );
        Ok(summary)
    }
}

impl ListingSource for SqliteListingStore {
    fn query(&self, key: &str, value: &str, columns: &[&str]) -> Result<Vec<Row>> {
        let conn = self.connect_read_only()?;

        // 欄位名稱無法綁定參數，先對照資料表結構驗證
        let mut referenced = Vec::with_capacity(columns.len() + 1);
        referenced.push(key);
        referenced.extend_from_slice(columns);
        ensure_columns(&conn, LISTINGS_TABLE, &referenced)?;

        let projection = columns
            .iter()
            .map(|column| quote_identifier(column))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "SELECT {} FROM {} WHERE {} = ?1",
            projection,
            quote_identifier(LISTINGS_TABLE),
            quote_identifier(key)
        );
        tracing::debug!("Executing query: {} [?1 = {:?}]", sql, value);

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![value], |row| {
                (0..columns.len())
                    .map(|i| row.get_ref(i).map(FieldValue::from))
                    .collect::<rusqlite::Result<Row>>()
            })?
            .collect::<rusqlite::Result<Vec<Row>>>()?;

        tracing::debug!("Query returned {} rows", rows.len());
        Ok(rows)
    }
}

fn table_columns(conn: &Connection, table: &str) -> Result<Vec<String>> {
    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1)")?;
    let columns = stmt
        .query_map(params![table], |row| row.get::<_, String>(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(columns)
}

fn ensure_columns(conn: &Connection, table: &str, wanted: &[&str]) -> Result<()> {
    let existing = table_columns(conn, table)?;
    if existing.is_empty() {
        return Err(BotError::MissingTable {
            table: table.to_string(),
        });
    }

    for column in wanted {
        if !existing.iter().any(|c| c == column) {
            return Err(BotError::UnknownColumn {
                table: table.to_string(),
                column: column.to_string(),
            });
        }
    }
    Ok(())
}

fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

impl From<ValueRef<'_>> for FieldValue {
    fn from(value: ValueRef<'_>) -> Self {
        match value {
            ValueRef::Null => FieldValue::Null,
            ValueRef::Integer(v) => FieldValue::Integer(v),
            ValueRef::Real(v) => FieldValue::Real(v),
            ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
                FieldValue::Text(String::from_utf8_lossy(bytes).into_owned())
            }
        }
    }
}

impl ToSql for FieldValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            FieldValue::Null => ToSqlOutput::Borrowed(ValueRef::Null),
            FieldValue::Integer(v) => ToSqlOutput::Borrowed(ValueRef::Integer(*v)),
            FieldValue::Real(v) => ToSqlOutput::Borrowed(ValueRef::Real(*v)),
            FieldValue::Text(v) => ToSqlOutput::Borrowed(ValueRef::Text(v.as_bytes())),
        })
    }
}
