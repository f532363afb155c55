use crate::error::FinstatError;
use crate::mapping::parse_mapping_str;
use crate::mapping::schema::SourceMapping;

const NL_KVK_JSON: &str = include_str!("../../../../mappings/nl-kvk.json");
const FI_PRH_JSON: &str = include_str!("../../../../mappings/fi-prh.json");
const FR_INPI_JSON: &str = include_str!("../../../../mappings/fr-inpi.json");
const IE_CRO_JSON: &str = include_str!("../../../../mappings/ie-cro.json");
const IE_CRO_DATASTORE_JSON: &str = include_str!("../../../../mappings/ie-cro-datastore.json");

/// Available predefined source mappings.
pub const PRESETS: &[&str] = &["nl", "fi", "fr", "ie", "ie-datastore"];

/// Load a predefined mapping by name.
pub fn load_preset(name: &str) -> Result<SourceMapping, FinstatError> {
    let json = match name {
        "nl" => NL_KVK_JSON,
        "fi" => FI_PRH_JSON,
        "fr" => FR_INPI_JSON,
        "ie" => IE_CRO_JSON,
        "ie-datastore" => IE_CRO_DATASTORE_JSON,
        _ => {
            return Err(FinstatError::MappingInvalid(format!(
                "unknown preset '{}'. Available: {}",
                name,
                PRESETS.join(", ")
            )))
        }
    };
    parse_mapping_str(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::schema::SourceFormat;

    #[test]
    fn test_all_presets_load() {
        for name in PRESETS {
            let mapping = load_preset(name).unwrap();
            assert!(!mapping.country.is_empty(), "{name}");
        }
    }

    #[test]
    fn test_nl_preset_recognizes_kvk_tags() {
        let nl = load_preset("nl").unwrap();
        assert_eq!(nl.format, SourceFormat::Xbrl);
        let keys = nl.recognized_keys();
        assert_eq!(keys.len(), 11);
        assert!(keys.contains("NetTurnover"));
        assert!(keys.contains("OperatingResult"));
        assert_eq!(nl.keys_for("profit"), ["ProfitOrLoss", "ResultAfterTaxes"]);
    }

    #[test]
    fn test_fi_preset_reads_financials() {
        let fi = load_preset("fi").unwrap();
        assert_eq!(fi.items_path.as_deref(), Some("financials"));
        assert!(fi.is_date_key("financialDate"));
    }

    #[test]
    fn test_unknown_preset() {
        assert!(load_preset("se").is_err());
    }
}
