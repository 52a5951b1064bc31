use crate::adapters::sqlite::SqliteListingStore;
use crate::domain::model::{FieldValue, ImportSummary, REQUIRED_COLUMNS};
use crate::utils::error::{BotError, Result};
use std::io::Read;
use std::path::Path;

/// Row-number column prepended to every imported table.
pub const INDEX_COLUMN: &str = "index";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Integer,
    Real,
    Text,
}

impl ColumnKind {
    pub fn sql_type(self) -> &'static str {
        match self {
            ColumnKind::Integer => "INTEGER",
            ColumnKind::Real => "REAL",
            ColumnKind::Text => "TEXT",
        }
    }

    /// 取能容納所有非空值的最窄型別
    fn infer<'a>(values: impl Iterator<Item = &'a str>) -> Self {
        let mut kind = ColumnKind::Integer;
        for value in values.map(str::trim).filter(|v| !v.is_empty()) {
            if kind == ColumnKind::Integer && value.parse::<i64>().is_err() {
                kind = ColumnKind::Real;
            }
            if kind == ColumnKind::Real && value.parse::<f64>().is_err() {
                return ColumnKind::Text;
            }
        }
        kind
    }

    fn convert(self, raw: &str) -> FieldValue {
        if raw.trim().is_empty() {
            return FieldValue::Null;
        }
        match self {
            ColumnKind::Integer => raw
                .trim()
                .parse()
                .map(FieldValue::Integer)
                .unwrap_or_else(|_| FieldValue::from(raw)),
            ColumnKind::Real => raw
                .trim()
                .parse()
                .map(FieldValue::Real)
                .unwrap_or_else(|_| FieldValue::from(raw)),
            ColumnKind::Text => FieldValue::from(raw),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportColumn {
    pub name: String,
    pub kind: ColumnKind,
}

/// A parsed CSV file ready to be written to the store.
#[derive(Debug, Clone)]
pub struct ImportTable {
    pub columns: Vec<ImportColumn>,
    pub rows: Vec<Vec<FieldValue>>,
}

impl ImportTable {
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path.as_ref()).map_err(BotError::IoError)?;
        tracing::info!("Reading listings from {}", path.as_ref().display());
        Self::from_csv_reader(file)
    }

    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(false)
            .from_reader(reader);

        let headers: Vec<String> = csv_reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        for required in REQUIRED_COLUMNS {
            if !headers.iter().any(|h| h == required) {
                return Err(BotError::MissingColumn {
                    column: required.to_string(),
                });
            }
        }

        let records = csv_reader
            .records()
            .collect::<std::result::Result<Vec<_>, csv::Error>>()?;
        tracing::debug!("Parsed {} CSV records with {} columns", records.len(), headers.len());

        let kinds: Vec<ColumnKind> = (0..headers.len())
            .map(|i| ColumnKind::infer(records.iter().map(|r| r.get(i).unwrap_or(""))))
            .collect();

        let add_index = !headers.iter().any(|h| h == INDEX_COLUMN);

        let mut columns = Vec::with_capacity(headers.len() + 1);
        if add_index {
            columns.push(ImportColumn {
                name: INDEX_COLUMN.to_string(),
                kind: ColumnKind::Integer,
            });
        }
        columns.extend(headers.into_iter().zip(kinds.iter()).map(|(name, kind)| ImportColumn {
            name,
            kind: *kind,
        }));

        let rows = records
            .iter()
            .enumerate()
            .map(|(row_number, record)| {
                let mut row = Vec::with_capacity(columns.len());
                if add_index {
                    row.push(FieldValue::Integer(row_number as i64));
                }
                row.extend(
                    kinds
                        .iter()
                        .enumerate()
                        .map(|(i, kind)| kind.convert(record.get(i).unwrap_or(""))),
                );
                row
            })
            .collect();

        Ok(Self { columns, rows })
    }
}

/// Reads `csv_path` and replaces the `listings` relation in `db_path`.
pub fn import_listings<C: AsRef<Path>, D: AsRef<Path>>(csv_path: C, db_path: D) -> Result<ImportSummary> {
    let table = ImportTable::from_csv_path(csv_path)?;
    SqliteListingStore::new(db_path.as_ref()).replace_listings(&table)
}
