use finstat_core::error::FinstatError;
use finstat_core::mapping::builtin;
use finstat_core::mapping::schema::SourceMapping;
use finstat_core::model::MAPPABLE_FIELDS;
use std::path::Path;

pub fn list() -> Result<(), FinstatError> {
    println!("Available predefined mappings:\n");
    for name in builtin::PRESETS {
        let m = builtin::load_preset(name)?;
        println!(
            "  {:<13} {} [{} / {}, {}]",
            name, m.name, m.country, m.source, m.format
        );
        if let Some(ref desc) = m.description {
            println!("                {}", desc);
        }
        println!();
    }
    Ok(())
}

pub fn show(preset: &str) -> Result<(), FinstatError> {
    let m = builtin::load_preset(preset)?;

    println!("{} ({} / {})\n", m.name, m.country, m.source);
    if let Some(ref desc) = m.description {
        println!("{}\n", desc);
    }
    println!("Reads {} documents.", m.format);
    if let Some(ref path) = m.items_path {
        println!("Listing items are taken from '{}'.", path);
    }
    if !m.required.is_empty() {
        println!(
            "Items without {} are skipped.",
            m.required.join(" or ")
        );
    }
    println!();

    print_field_table(&m);

    if !m.extra_keys.is_empty() {
        println!("\nAlso recognized: {}", m.extra_keys.join(", "));
    }
    println!();

    Ok(())
}

fn print_field_table(m: &SourceMapping) {
    let width = MAPPABLE_FIELDS.iter().map(|f| f.len()).max().unwrap_or(12);
    println!("  {:<width$}  Source keys (first present wins)", "Column");
    println!("  {}", "-".repeat(width + 36));
    for field in MAPPABLE_FIELDS {
        let keys = m.keys_for(field);
        let shown = if keys.is_empty() {
            if *field == "doc_id" {
                "(document identifier)".to_string()
            } else {
                "-".to_string()
            }
        } else {
            keys.join(", ")
        };
        let marker = if *field == "year" && !keys.is_empty() {
            "  (truncated to YYYY-MM-DD)"
        } else {
            ""
        };
        println!("  {:<width$}  {}{}", field, shown, marker);
    }
}

pub fn validate(file: &Path) -> Result<(), FinstatError> {
    let m = finstat_core::mapping::load_mapping(file)?;

    println!("Mapping '{}' is valid.", m.name);
    println!("  Country/source: {} / {}", m.country, m.source);
    println!("  Format: {}", m.format);
    println!("  Recognized keys: {}", m.recognized_keys().len());

    // Unmapped value columns are allowed but usually an oversight.
    let warnings: Vec<String> = ["revenue", "profit", "assets", "year"]
        .iter()
        .filter(|f| m.keys_for(f).is_empty())
        .map(|f| format!("no source key for '{}'; the column will always be empty", f))
        .collect();

    if !warnings.is_empty() {
        println!("\nWarnings:");
        for w in &warnings {
            println!("  - {}", w);
        }
    }

    Ok(())
}
