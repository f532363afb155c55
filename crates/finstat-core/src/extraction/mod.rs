pub mod csv_row;
pub mod json_item;
pub mod xbrl;

use std::collections::{BTreeMap, BTreeSet};

use crate::error::FinstatError;
use crate::mapping::schema::{SourceFormat, SourceMapping};
use crate::model::RawFactSet;
use csv_row::CsvRowExtractor;
use json_item::JsonItemExtractor;
use xbrl::XbrlExtractor;

/// Length of a canonical `YYYY-MM-DD` date.
pub const DATE_LEN: usize = 10;

/// Payload of one source document.
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentBody {
    /// Raw bytes of an XML/XBRL instance.
    Bytes(Vec<u8>),
    /// One item of a JSON listing.
    Json(serde_json::Value),
    /// One row of a delimited export, keyed by header.
    Row(BTreeMap<String, String>),
}

/// A source document together with the identifier used in error reports.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceDocument {
    pub id: String,
    pub body: DocumentBody,
}

impl SourceDocument {
    pub fn new(id: impl Into<String>, body: DocumentBody) -> Self {
        SourceDocument {
            id: id.into(),
            body,
        }
    }
}

/// Trait for per-format field extraction backends.
pub trait FieldExtractor: Send + Sync {
    /// Pull the recognized facts out of one document.
    fn extract(&self, document: &SourceDocument) -> Result<RawFactSet, FinstatError>;

    /// Name of the source format handled (for diagnostics).
    fn format_name(&self) -> &str;
}

/// Build the extractor matching a mapping's source format.
pub fn extractor_for(mapping: &SourceMapping) -> Box<dyn FieldExtractor> {
    match mapping.format {
        SourceFormat::Xbrl => Box::new(XbrlExtractor::from_mapping(mapping)),
        SourceFormat::Json => Box::new(JsonItemExtractor::from_mapping(mapping)),
        SourceFormat::Csv => Box::new(CsvRowExtractor::from_mapping(mapping)),
    }
}

/// Cut a date-like value down to its first ten characters.
///
/// Shorter values pass through unchanged; the result is not validated.
pub fn truncate_date(value: &str) -> &str {
    match value.char_indices().nth(DATE_LEN) {
        Some((idx, _)) => &value[..idx],
        None => value,
    }
}

/// Keys that gate whether an item is complete enough to normalize.
#[derive(Debug, Clone, Default)]
pub(crate) struct RequiredKeys {
    required: Vec<String>,
    date_keys: BTreeSet<String>,
}

impl RequiredKeys {
    pub(crate) fn from_mapping(mapping: &SourceMapping) -> Self {
        RequiredKeys {
            required: mapping.required.clone(),
            date_keys: mapping.date_keys.iter().cloned().collect(),
        }
    }

    /// Fail with `FieldMissingRequired` on the first required key that is
    /// absent, or empty once date truncation is applied.
    pub(crate) fn check(&self, facts: &RawFactSet) -> Result<(), FinstatError> {
        for key in &self.required {
            let value = facts.get(key).unwrap_or("");
            let value = if self.date_keys.contains(key) {
                truncate_date(value)
            } else {
                value
            };
            if value.trim().is_empty() {
                return Err(FinstatError::FieldMissingRequired { field: key.clone() });
            }
        }
        Ok(())
    }
}

fn wrong_body(document: &SourceDocument, expected: &str) -> FinstatError {
    let got = match document.body {
        DocumentBody::Bytes(_) => "raw bytes",
        DocumentBody::Json(_) => "a JSON item",
        DocumentBody::Row(_) => "a table row",
    };
    FinstatError::unreadable(&document.id, format!("expected {expected}, got {got}"))
}
