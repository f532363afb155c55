use crate::extraction::truncate_date;
use crate::mapping::schema::SourceMapping;
use crate::model::{CanonicalRecord, NormalizeContext, RawFactSet};

/// Map a raw fact set onto the canonical record.
///
/// Values are copied as opaque strings. The only reshaping is date
/// truncation of `year`; every `raw_*` column keeps the value exactly as
/// extracted. A mapped `doc_id` key takes precedence over the context's
/// document identifier.
pub fn normalize(
    facts: &RawFactSet,
    mapping: &SourceMapping,
    ctx: &NormalizeContext,
) -> CanonicalRecord {
    let lookup = |field: &str| -> Option<String> {
        mapping
            .keys_for(field)
            .iter()
            .find_map(|key| facts.get(key).filter(|v| !v.is_empty()))
            .map(str::to_string)
    };

    let raw_year = lookup("year");
    let raw_revenue = lookup("revenue");
    let raw_profit = lookup("profit");
    let raw_assets = lookup("assets");

    CanonicalRecord {
        country: ctx.country.clone(),
        source: ctx.source.clone(),
        company_id: lookup("company_id"),
        company_name: lookup("company_name"),
        year: raw_year.as_deref().map(|y| truncate_date(y).to_string()),
        revenue: raw_revenue.clone(),
        profit: raw_profit.clone(),
        assets: raw_assets.clone(),
        doc_id: lookup("doc_id").or_else(|| ctx.doc_id.clone()),
        raw_year,
        raw_revenue,
        raw_profit,
        raw_assets,
    }
}

impl NormalizeContext {
    /// Context carrying the mapping's country and source for one document.
    pub fn for_document(mapping: &SourceMapping, doc_id: impl Into<String>) -> Self {
        NormalizeContext {
            country: mapping.country.clone(),
            source: mapping.source.clone(),
            doc_id: Some(doc_id.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::builtin::load_preset;
    use crate::model::FIELDS;

    #[test]
    fn test_net_turnover_without_assets() {
        let nl = load_preset("nl").unwrap();
        let facts: RawFactSet = [("NetTurnover", "12345")].into_iter().collect();
        let record = normalize(&facts, &nl, &NormalizeContext::for_document(&nl, "a.xml"));

        assert_eq!(record.country, "NL");
        assert_eq!(record.source, "kvk");
        assert_eq!(record.revenue.as_deref(), Some("12345"));
        assert_eq!(record.raw_revenue.as_deref(), Some("12345"));
        assert_eq!(record.assets, None);
        assert_eq!(record.values()[7], "");
        assert_eq!(record.doc_id.as_deref(), Some("a.xml"));
    }

    #[test]
    fn test_fallback_key_used_when_primary_absent() {
        let nl = load_preset("nl").unwrap();
        let facts: RawFactSet = [("ResultAfterTaxes", "-10"), ("EquityAndLiabilities", "77")]
            .into_iter()
            .collect();
        let record = normalize(&facts, &nl, &NormalizeContext::for_document(&nl, "b.xml"));
        assert_eq!(record.profit.as_deref(), Some("-10"));
        assert_eq!(record.assets.as_deref(), Some("77"));
    }

    #[test]
    fn test_primary_key_wins() {
        let nl = load_preset("nl").unwrap();
        let facts: RawFactSet = [("ProfitOrLoss", "5"), ("ResultAfterTaxes", "-10")]
            .into_iter()
            .collect();
        let record = normalize(&facts, &nl, &NormalizeContext::for_document(&nl, "c.xml"));
        assert_eq!(record.profit.as_deref(), Some("5"));
    }

    #[test]
    fn test_year_truncated_raw_year_kept() {
        let fi = load_preset("fi").unwrap();
        let facts: RawFactSet = [
            ("businessId", "0112038-9"),
            ("financialDate", "2023-12-31T00:00:00"),
        ]
        .into_iter()
        .collect();
        let record = normalize(&facts, &fi, &NormalizeContext::for_document(&fi, "x"));
        assert_eq!(record.company_id.as_deref(), Some("0112038-9"));
        assert_eq!(record.year.as_deref(), Some("2023-12-31"));
        assert_eq!(record.raw_year.as_deref(), Some("2023-12-31T00:00:00"));
    }

    #[test]
    fn test_year_truncated_without_date_keys() {
        let nl = load_preset("nl").unwrap();
        assert!(!nl.is_date_key("FinancialYear"));
        let facts: RawFactSet = [("FinancialYear", "2022-12-31T00:00:00")]
            .into_iter()
            .collect();
        let record = normalize(&facts, &nl, &NormalizeContext::for_document(&nl, "y.xml"));
        assert_eq!(record.year.as_deref(), Some("2022-12-31"));
        assert_eq!(record.raw_year.as_deref(), Some("2022-12-31T00:00:00"));
    }

    #[test]
    fn test_mapped_doc_id_overrides_context() {
        let fr = load_preset("fr").unwrap();
        let facts: RawFactSet = [
            ("siren", "552032534"),
            ("dateCloture", "2022-12-31"),
            ("id", "63b7f0c1"),
        ]
        .into_iter()
        .collect();
        let record = normalize(&facts, &fr, &NormalizeContext::for_document(&fr, "item-3"));
        assert_eq!(record.doc_id.as_deref(), Some("63b7f0c1"));
    }

    #[test]
    fn test_empty_fact_set_still_has_every_field() {
        let nl = load_preset("nl").unwrap();
        let ctx = NormalizeContext {
            country: "NL".into(),
            source: "kvk".into(),
            doc_id: None,
        };
        let record = normalize(&RawFactSet::new(), &nl, &ctx);
        let values = record.values();
        assert_eq!(values.len(), FIELDS.len());
        assert!(values[2..].iter().all(|v| v.is_empty()));
    }
}
