use std::collections::BTreeSet;

use crate::error::FinstatError;
use crate::extraction::{wrong_body, DocumentBody, FieldExtractor, RequiredKeys, SourceDocument};
use crate::mapping::schema::SourceMapping;
use crate::model::RawFactSet;

/// Reads recognized columns of one row of a delimited export.
pub struct CsvRowExtractor {
    keys: BTreeSet<String>,
    required: RequiredKeys,
}

impl CsvRowExtractor {
    pub fn from_mapping(mapping: &SourceMapping) -> Self {
        CsvRowExtractor {
            keys: mapping
                .recognized_keys()
                .into_iter()
                .map(str::to_string)
                .collect(),
            required: RequiredKeys::from_mapping(mapping),
        }
    }
}

impl FieldExtractor for CsvRowExtractor {
    fn extract(&self, document: &SourceDocument) -> Result<RawFactSet, FinstatError> {
        let row = match &document.body {
            DocumentBody::Row(row) => row,
            _ => return Err(wrong_body(document, "a table row")),
        };

        let facts: RawFactSet = row
            .iter()
            .filter(|(k, v)| self.keys.contains(k.as_str()) && !v.trim().is_empty())
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();

        self.required.check(&facts)?;
        Ok(facts)
    }

    fn format_name(&self) -> &str {
        "csv"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::builtin::load_preset;
    use std::collections::BTreeMap;

    fn row(pairs: &[(&str, &str)]) -> SourceDocument {
        let map: BTreeMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        SourceDocument::new("row-1", DocumentBody::Row(map))
    }

    #[test]
    fn test_reads_mapped_columns() {
        let ie = CsvRowExtractor::from_mapping(&load_preset("ie").unwrap());
        let facts = ie
            .extract(&row(&[
                ("company_num", "104547"),
                ("company_name", "Example Holdings DAC"),
                ("turnover", "1500000"),
                ("total_assets", ""),
                ("registered_address", "Dublin 2"),
            ]))
            .unwrap();
        assert_eq!(facts.get("company_num"), Some("104547"));
        assert_eq!(facts.get("turnover"), Some("1500000"));
        assert!(!facts.contains("total_assets"));
        assert!(!facts.contains("registered_address"));
    }

    #[test]
    fn test_blank_identifier_is_missing_required() {
        let ie = CsvRowExtractor::from_mapping(&load_preset("ie").unwrap());
        let err = ie
            .extract(&row(&[("company_num", "  "), ("turnover", "1")]))
            .unwrap_err();
        assert!(matches!(err, FinstatError::FieldMissingRequired { .. }));
    }
}
