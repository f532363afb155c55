use std::path::Path;

use serde_json::Value;

use crate::error::FinstatError;
use crate::extraction::{truncate_date, DocumentBody, SourceDocument};
use crate::mapping::schema::SourceMapping;
use crate::source::source_unreadable;

/// Read a JSON listing file and split it into one document per item.
pub fn load_listing(
    path: &Path,
    mapping: &SourceMapping,
) -> Result<Vec<SourceDocument>, FinstatError> {
    let bytes = std::fs::read(path).map_err(|e| source_unreadable(path, e))?;
    let listing: Value =
        serde_json::from_slice(&bytes).map_err(|e| source_unreadable(path, e))?;
    listing_documents(&listing, mapping).map_err(|e| source_unreadable(path, e))
}

/// Split a parsed listing into item documents.
///
/// Items live at the mapping's dotted `items_path` (the document itself when
/// unset). A listing without items there, or with `null`, yields no documents.
pub fn listing_documents(
    listing: &Value,
    mapping: &SourceMapping,
) -> Result<Vec<SourceDocument>, FinstatError> {
    let path = mapping.items_path.as_deref().unwrap_or("");
    let items = match lookup_path(listing, path) {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(items)) => items,
        Some(_) => {
            return Err(FinstatError::MappingInvalid(format!(
                "'{}' in listing is not an array",
                if path.is_empty() { "<root>" } else { path }
            )))
        }
    };

    Ok(items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            SourceDocument::new(
                item_id(item, mapping, i + 1),
                DocumentBody::Json(item.clone()),
            )
        })
        .collect())
}

fn lookup_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .filter(|seg| !seg.is_empty())
        .try_fold(value, |v, seg| v.get(seg))
}

/// `{id}_{date}` built from the mapping's required keys, like the file names
/// registries use for downloaded statements; `item-{n}` otherwise.
fn item_id(item: &Value, mapping: &SourceMapping, n: usize) -> String {
    let parts: Option<Vec<String>> = if mapping.required.is_empty() {
        None
    } else {
        mapping
            .required
            .iter()
            .map(|key| {
                let raw = match item.get(key)? {
                    Value::String(s) => s.clone(),
                    Value::Number(n) => n.to_string(),
                    _ => return None,
                };
                let value = if mapping.is_date_key(key) {
                    truncate_date(&raw).to_string()
                } else {
                    raw
                };
                (!value.is_empty()).then_some(value)
            })
            .collect()
    };

    match parts {
        Some(parts) => parts.join("_"),
        None => format!("item-{n}"),
    }
}
