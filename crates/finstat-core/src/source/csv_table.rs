use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;

use crate::batch::DocumentRead;
use crate::error::FinstatError;
use crate::extraction::{DocumentBody, SourceDocument};
use crate::model::ItemError;
use crate::source::source_unreadable;

/// Rows of a delimited export with a header line (e.g. CRO
/// `financial_statements_YYYY.csv`). Row ids are `row-N`, 1-based over data rows.
pub struct CsvDocuments {
    headers: Vec<String>,
    records: csv::StringRecordsIntoIter<File>,
    row: usize,
}

impl CsvDocuments {
    pub fn open(path: &Path) -> Result<Self, FinstatError> {
        let mut reader = csv::Reader::from_path(path).map_err(|e| source_unreadable(path, e))?;
        let headers = reader
            .headers()
            .map_err(|e| source_unreadable(path, e))?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        Ok(CsvDocuments {
            headers,
            records: reader.into_records(),
            row: 0,
        })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }
}

impl Iterator for CsvDocuments {
    type Item = DocumentRead;

    fn next(&mut self) -> Option<Self::Item> {
        let record = self.records.next()?;
        self.row += 1;
        let id = format!("row-{}", self.row);

        Some(match record {
            Ok(record) => {
                let row: BTreeMap<String, String> = self
                    .headers
                    .iter()
                    .cloned()
                    .zip(record.iter().map(str::to_string))
                    .collect();
                Ok(SourceDocument::new(id, DocumentBody::Row(row)))
            }
            Err(e) => Err(ItemError {
                item: id,
                message: e.to_string(),
            }),
        })
    }
}
