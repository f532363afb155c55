use finstat_core::batch::BatchResult;
use finstat_core::model::CanonicalRecord;

const COLUMNS: &[&str] = &[
    "country",
    "company_id",
    "company_name",
    "year",
    "revenue",
    "profit",
    "assets",
    "doc_id",
];

/// Widest cell shown before truncating with an ellipsis.
const MAX_WIDTH: usize = 32;

pub fn print(result: &BatchResult) {
    print!("{}", format_result(result));
}

pub fn format_result(result: &BatchResult) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "{} record(s), {} error(s), {} skipped\n\n",
        result.ok_count(),
        result.error_count(),
        result.skipped
    ));

    if !result.records.is_empty() {
        out.push_str(&format_records(&result.records));
        out.push('\n');
    }

    if !result.errors.is_empty() {
        out.push_str("Errors:\n");
        for e in &result.errors {
            out.push_str(&format!("  {} -> {}\n", e.item, e.message));
        }
    }

    out
}

fn format_records(records: &[CanonicalRecord]) -> String {
    let cells: Vec<Vec<String>> = records
        .iter()
        .map(|r| {
            COLUMNS
                .iter()
                .map(|c| clip(r.get(c).unwrap_or("-")))
                .collect()
        })
        .collect();

    let widths: Vec<usize> = COLUMNS
        .iter()
        .enumerate()
        .map(|(i, c)| {
            cells
                .iter()
                .map(|row| row[i].chars().count())
                .chain(std::iter::once(c.len()))
                .max()
                .unwrap_or(c.len())
        })
        .collect();

    let mut out = String::new();
    let header: Vec<String> = COLUMNS
        .iter()
        .zip(&widths)
        .map(|(c, w)| format!("{:<w$}", c, w = *w))
        .collect();
    out.push_str(&format!("  {}\n", header.join("  ").trim_end()));
    out.push_str(&format!(
        "  {}\n",
        "-".repeat(widths.iter().sum::<usize>() + 2 * (widths.len() - 1))
    ));

    for row in &cells {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(v, w)| format!("{:<w$}", v, w = *w))
            .collect();
        out.push_str(&format!("  {}\n", line.join("  ").trim_end()));
    }

    out
}

fn clip(value: &str) -> String {
    if value.chars().count() <= MAX_WIDTH {
        value.to_string()
    } else {
        let mut s: String = value.chars().take(MAX_WIDTH - 1).collect();
        s.push('…');
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use finstat_core::model::ItemError;

    #[test]
    fn test_format_result_lists_records_and_errors() {
        let result = BatchResult {
            records: vec![CanonicalRecord {
                country: "NL".into(),
                source: "kvk".into(),
                revenue: Some("12345".into()),
                doc_id: Some("a.xml".into()),
                ..Default::default()
            }],
            errors: vec![ItemError {
                item: "b.xml".into(),
                message: "no XML element found".into(),
            }],
            skipped: 0,
        };
        let text = format_result(&result);
        assert!(text.starts_with("1 record(s), 1 error(s), 0 skipped"));
        assert!(text.contains("12345"));
        assert!(text.contains("  b.xml -> no XML element found"));
    }

    #[test]
    fn test_clip_long_names() {
        let long = "A".repeat(40);
        assert_eq!(clip(&long).chars().count(), MAX_WIDTH);
        assert_eq!(clip("short"), "short");
    }
}
