use std::collections::BTreeSet;

use serde_json::Value;

use crate::error::FinstatError;
use crate::extraction::{wrong_body, DocumentBody, FieldExtractor, RequiredKeys, SourceDocument};
use crate::mapping::schema::SourceMapping;
use crate::model::RawFactSet;

/// Reads recognized keys straight off one JSON listing item.
pub struct JsonItemExtractor {
    keys: BTreeSet<String>,
    required: RequiredKeys,
}

impl JsonItemExtractor {
    pub fn from_mapping(mapping: &SourceMapping) -> Self {
        JsonItemExtractor {
            keys: mapping
                .recognized_keys()
                .into_iter()
                .map(str::to_string)
                .collect(),
            required: RequiredKeys::from_mapping(mapping),
        }
    }
}

impl FieldExtractor for JsonItemExtractor {
    fn extract(&self, document: &SourceDocument) -> Result<RawFactSet, FinstatError> {
        let item = match &document.body {
            DocumentBody::Json(value) => value,
            _ => return Err(wrong_body(document, "a JSON item")),
        };
        let object = item.as_object().ok_or_else(|| {
            FinstatError::unreadable(&document.id, "listing item is not a JSON object")
        })?;

        let mut facts = RawFactSet::new();
        for key in &self.keys {
            if let Some(value) = object.get(key).and_then(scalar_to_string) {
                facts.insert(key.as_str(), value);
            }
        }

        self.required.check(&facts)?;
        Ok(facts)
    }

    fn format_name(&self) -> &str {
        "json"
    }
}

/// Stringify a scalar JSON value. Nulls, empty strings and containers are absent.
fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
