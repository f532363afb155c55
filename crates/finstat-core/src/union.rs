use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::FinstatError;
use crate::model::{CanonicalRecord, ItemError, FIELDS};

/// One already-normalized table, as read from a producer's output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// A table in canonical layout holding `records`.
    pub fn from_records(records: &[CanonicalRecord]) -> Self {
        Table {
            headers: FIELDS.iter().map(|f| f.to_string()).collect(),
            rows: records
                .iter()
                .map(|r| r.values().iter().map(|v| v.to_string()).collect())
                .collect(),
        }
    }

    /// Read a delimited file with a header row. Short rows are allowed.
    pub fn read_csv(path: &Path) -> Result<Self, FinstatError> {
        let unavailable = |reason: String| FinstatError::InputUnavailable {
            path: path.to_path_buf(),
            reason,
        };

        if !path.is_file() {
            return Err(unavailable("not found".into()));
        }

        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(path)
            .map_err(|e| unavailable(e.to_string()))?;
        let headers = reader
            .headers()
            .map_err(|e| unavailable(e.to_string()))?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| unavailable(e.to_string()))?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        Ok(Table { headers, rows })
    }

    /// Project every row onto the canonical columns. Extra columns are
    /// dropped, missing ones become empty.
    pub fn project(&self) -> Vec<CanonicalRecord> {
        let positions: Vec<Option<usize>> = FIELDS
            .iter()
            .map(|f| self.headers.iter().position(|h| h == f))
            .collect();

        self.rows
            .iter()
            .map(|row| {
                CanonicalRecord::from_lookup(|field| {
                    let column = FIELDS.iter().position(|f| *f == field)?;
                    let idx = positions[column]?;
                    row.get(idx).cloned()
                })
            })
            .collect()
    }
}

/// Records combined from several inputs, plus the inputs that were skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UnionResult {
    pub records: Vec<CanonicalRecord>,
    pub skipped: Vec<ItemError>,
}

/// Concatenate tables input by input, row by row, projected onto the
/// canonical columns. No de-duplication or sorting.
pub fn union(inputs: &[Table]) -> Vec<CanonicalRecord> {
    inputs.iter().flat_map(Table::project).collect()
}

/// Read and union delimited files. Inputs that cannot be found or read are
/// skipped with a diagnostic instead of failing the run.
pub fn union_tables(paths: &[PathBuf]) -> UnionResult {
    let mut result = UnionResult::default();

    for path in paths {
        match Table::read_csv(path) {
            Ok(table) => {
                let before = result.records.len();
                result.records.extend(table.project());
                log::debug!(
                    "{}: {} row(s)",
                    path.display(),
                    result.records.len() - before
                );
            }
            Err(e) => {
                log::warn!("skip {}", e);
                result.skipped.push(ItemError {
                    item: path.display().to_string(),
                    message: match e {
                        FinstatError::InputUnavailable { reason, .. } => reason,
                        other => other.to_string(),
                    },
                });
            }
        }
    }

    log::info!(
        "union finished: rows={}, skipped inputs={}",
        result.records.len(),
        result.skipped.len()
    );
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(headers: &[&str], rows: &[&[&str]]) -> Table {
        Table {
            headers: headers.iter().map(|s| s.to_string()).collect(),
            rows: rows
                .iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
        }
    }

    fn nl_table() -> Table {
        table(
            &FIELDS,
            &[
                &["NL", "kvk", "", "", "2022", "12345", "-250", "", "a.xml", "2022", "12345", "-250", ""],
                &["NL", "kvk", "", "", "2022", "9", "", "", "b.xml", "2022", "9", "", ""],
            ],
        )
    }

    fn fi_table_ten_columns() -> Table {
        table(
            &[
                "country", "source", "company_id", "company_name", "year", "revenue", "profit",
                "assets", "doc_id", "raw_year",
            ],
            &[&["FI", "prh", "0112038-9", "", "2023-12-31", "", "", "", "0112038-9_2023-12-31", "2023-12-31T00:00:00"]],
        )
    }

    #[test]
    fn test_missing_columns_become_empty() {
        let records = union(&[fi_table_ten_columns()]);
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.raw_year.as_deref(), Some("2023-12-31T00:00:00"));
        assert_eq!(r.raw_revenue, None);
        assert_eq!(r.raw_profit, None);
        assert_eq!(r.raw_assets, None);
    }

    #[test]
    fn test_extra_columns_dropped_and_order_preserved() {
        let extra = table(
            &["employees", "source", "country", "revenue"],
            &[&["12", "cro", "IE", "77"]],
        );
        let records = union(&[nl_table(), extra]);
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].doc_id.as_deref(), Some("a.xml"));
        assert_eq!(records[1].doc_id.as_deref(), Some("b.xml"));
        assert_eq!(records[2].country, "IE");
        assert_eq!(records[2].revenue.as_deref(), Some("77"));
    }

    #[test]
    fn test_short_rows_padded() {
        let short = table(&["country", "source", "company_id"], &[&["IE", "cro"]]);
        let records = union(&[short]);
        assert_eq!(records[0].company_id, None);
    }

    #[test]
    fn test_union_is_associative() {
        let a = nl_table();
        let b = fi_table_ten_columns();
        let c = table(&["country", "source"], &[&["FR", "inpi-rne"]]);

        let ab = union(&[a.clone(), b.clone()]);
        let stepwise = union(&[Table::from_records(&ab), c.clone()]);
        let direct = union(&[a, b, c]);
        assert_eq!(stepwise, direct);
    }

    #[test]
    fn test_union_tables_skips_missing_inputs() {
        let dir = tempfile::tempdir().unwrap();
        let present = dir.path().join("ie.csv");
        std::fs::write(&present, "country,source,company_id\nIE,cro,104547\n").unwrap();

        let result = union_tables(&[dir.path().join("missing.csv"), present]);
        assert_eq!(result.records.len(), 1);
        assert_eq!(result.records[0].company_id.as_deref(), Some("104547"));
        assert_eq!(result.skipped.len(), 1);
        assert!(result.skipped[0].item.ends_with("missing.csv"));
    }
}
