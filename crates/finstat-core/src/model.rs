use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Canonical column order. Every normalized table uses exactly this header.
pub const FIELDS: [&str; 13] = [
    "country",
    "source",
    "company_id",
    "company_name",
    "year",
    "revenue",
    "profit",
    "assets",
    "doc_id",
    "raw_year",
    "raw_revenue",
    "raw_profit",
    "raw_assets",
];

/// Canonical fields a source mapping may populate from a fact set.
///
/// `country` and `source` come from the mapping itself, the `raw_*`
/// columns are derived from their normalized counterparts.
pub const MAPPABLE_FIELDS: &[&str] = &[
    "company_id",
    "company_name",
    "year",
    "revenue",
    "profit",
    "assets",
    "doc_id",
];

/// One company-year financial fact set in the shared cross-country shape.
///
/// Absent values are `None` and serialize as empty cells.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalRecord {
    pub country: String,
    pub source: String,
    pub company_id: Option<String>,
    pub company_name: Option<String>,
    pub year: Option<String>,
    pub revenue: Option<String>,
    pub profit: Option<String>,
    pub assets: Option<String>,
    pub doc_id: Option<String>,
    pub raw_year: Option<String>,
    pub raw_revenue: Option<String>,
    pub raw_profit: Option<String>,
    pub raw_assets: Option<String>,
}

impl CanonicalRecord {
    /// Build a record by asking `lookup` for each canonical field.
    ///
    /// Empty strings are stored as absent.
    pub fn from_lookup<F>(mut lookup: F) -> CanonicalRecord
    where
        F: FnMut(&str) -> Option<String>,
    {
        let mut get = |name: &str| lookup(name).filter(|v| !v.is_empty());
        CanonicalRecord {
            country: get("country").unwrap_or_default(),
            source: get("source").unwrap_or_default(),
            company_id: get("company_id"),
            company_name: get("company_name"),
            year: get("year"),
            revenue: get("revenue"),
            profit: get("profit"),
            assets: get("assets"),
            doc_id: get("doc_id"),
            raw_year: get("raw_year"),
            raw_revenue: get("raw_revenue"),
            raw_profit: get("raw_profit"),
            raw_assets: get("raw_assets"),
        }
    }

    /// Look up a field by canonical name. Unknown names and empty values yield `None`.
    pub fn get(&self, field: &str) -> Option<&str> {
        let value = match field {
            "country" => Some(self.country.as_str()),
            "source" => Some(self.source.as_str()),
            "company_id" => self.company_id.as_deref(),
            "company_name" => self.company_name.as_deref(),
            "year" => self.year.as_deref(),
            "revenue" => self.revenue.as_deref(),
            "profit" => self.profit.as_deref(),
            "assets" => self.assets.as_deref(),
            "doc_id" => self.doc_id.as_deref(),
            "raw_year" => self.raw_year.as_deref(),
            "raw_revenue" => self.raw_revenue.as_deref(),
            "raw_profit" => self.raw_profit.as_deref(),
            "raw_assets" => self.raw_assets.as_deref(),
            _ => None,
        };
        value.filter(|v| !v.is_empty())
    }

    /// Field values in canonical column order, with `""` for absent values.
    pub fn values(&self) -> [&str; 13] {
        FIELDS.map(|f| self.get(f).unwrap_or(""))
    }
}

/// Source-native key/value pairs extracted from one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawFactSet {
    facts: BTreeMap<String, String>,
}

impl RawFactSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a fact. A later value for the same key replaces the earlier one.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.facts.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.facts.get(key).map(|s| s.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.facts.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.facts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawFactSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = RawFactSet::new();
        for (k, v) in iter {
            set.insert(k, v);
        }
        set
    }
}

/// Identifies the origin of the facts handed to the normalizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizeContext {
    pub country: String,
    pub source: String,
    pub doc_id: Option<String>,
}

/// A document that failed extraction, keyed by its identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemError {
    pub item: String,
    pub message: String,
}

impl fmt::Display for ItemError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.item, self.message)
    }
}
