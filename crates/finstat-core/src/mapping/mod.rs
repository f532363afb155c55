pub mod builtin;
pub mod schema;

use crate::error::FinstatError;
use crate::model::MAPPABLE_FIELDS;
use schema::{SourceFormat, SourceMapping};
use std::path::Path;

/// Load a source mapping from a JSON file.
pub fn load_mapping(path: &Path) -> Result<SourceMapping, FinstatError> {
    let content = std::fs::read_to_string(path).map_err(|e| FinstatError::MappingLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    parse_mapping(&content, path)
}

/// Parse a source mapping from a JSON string.
pub fn parse_mapping(json: &str, source: &Path) -> Result<SourceMapping, FinstatError> {
    let mapping: SourceMapping =
        serde_json::from_str(json).map_err(|e| FinstatError::MappingLoad {
            path: source.to_path_buf(),
            reason: e.to_string(),
        })?;
    validate_mapping(&mapping)?;
    Ok(mapping)
}

/// Parse a source mapping from a JSON string (no file path context).
pub fn parse_mapping_str(json: &str) -> Result<SourceMapping, FinstatError> {
    let mapping: SourceMapping = serde_json::from_str(json)?;
    validate_mapping(&mapping)?;
    Ok(mapping)
}

/// Validate that a mapping is well-formed.
pub fn validate_mapping(mapping: &SourceMapping) -> Result<(), FinstatError> {
    if mapping.name.trim().is_empty() {
        return Err(FinstatError::MappingInvalid("name must not be empty".into()));
    }
    if mapping.country.trim().is_empty() {
        return Err(FinstatError::MappingInvalid(
            "country must not be empty".into(),
        ));
    }
    if mapping.source.trim().is_empty() {
        return Err(FinstatError::MappingInvalid("source must not be empty".into()));
    }

    if mapping.fields.is_empty() {
        return Err(FinstatError::MappingInvalid("fields must not be empty".into()));
    }

    for (field, keys) in &mapping.fields {
        if !MAPPABLE_FIELDS.contains(&field.as_str()) {
            return Err(FinstatError::MappingInvalid(format!(
                "'{}' is not a mappable field (expected one of {})",
                field,
                MAPPABLE_FIELDS.join(", ")
            )));
        }
        if keys.is_empty() || keys.iter().any(|k| k.trim().is_empty()) {
            return Err(FinstatError::MappingInvalid(format!(
                "field '{}' must list at least one non-empty source key",
                field
            )));
        }
    }

    let mapped = |key: &str| mapping.fields.values().flatten().any(|k| k == key);

    for key in &mapping.required {
        if !mapped(key) {
            return Err(FinstatError::MappingInvalid(format!(
                "required key '{}' is not mapped to any field",
                key
            )));
        }
    }

    for key in &mapping.date_keys {
        if !mapped(key) {
            return Err(FinstatError::MappingInvalid(format!(
                "date key '{}' is not mapped to any field",
                key
            )));
        }
    }

    if mapping.items_path.is_some() && mapping.format != SourceFormat::Json {
        return Err(FinstatError::MappingInvalid(format!(
            "items_path is only valid for json mappings, not {}",
            mapping.format
        )));
    }

    Ok(())
}
