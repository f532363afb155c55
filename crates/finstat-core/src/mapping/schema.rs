use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Shape of the documents a source publishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    /// XML tag soup with `key`/`value` attribute pairs.
    Xbrl,
    /// Items of a JSON listing.
    Json,
    /// Rows of a delimited export.
    Csv,
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceFormat::Xbrl => write!(f, "xbrl"),
            SourceFormat::Json => write!(f, "json"),
            SourceFormat::Csv => write!(f, "csv"),
        }
    }
}

/// How one national source maps its native keys onto the canonical record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMapping {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Country code written to every record.
    pub country: String,
    /// Dataset identifier written to every record.
    pub source: String,
    pub format: SourceFormat,
    /// Keys an item must carry to be normalized at all.
    #[serde(default)]
    pub required: Vec<String>,
    /// Keys holding dates that may arrive timestamp-shaped. Required-key
    /// checks and listing item ids see their truncated form; extraction keeps
    /// the value as found. `year` is truncated by the normalizer either way.
    #[serde(default)]
    pub date_keys: Vec<String>,
    /// Dotted path to the item array of a JSON listing.
    #[serde(default)]
    pub items_path: Option<String>,
    /// Canonical field -> candidate source keys, first present wins.
    pub fields: BTreeMap<String, Vec<String>>,
    /// Tags recorded during extraction without feeding a canonical field.
    #[serde(default)]
    pub extra_keys: Vec<String>,
}

impl SourceMapping {
    /// Candidate source keys for a canonical field, in priority order.
    pub fn keys_for(&self, field: &str) -> &[String] {
        self.fields.get(field).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Every source key an extractor should keep.
    pub fn recognized_keys(&self) -> BTreeSet<&str> {
        self.fields
            .values()
            .flatten()
            .chain(self.extra_keys.iter())
            .chain(self.required.iter())
            .map(|s| s.as_str())
            .collect()
    }

    pub fn is_date_key(&self, key: &str) -> bool {
        self.date_keys.iter().any(|k| k == key)
    }
}
