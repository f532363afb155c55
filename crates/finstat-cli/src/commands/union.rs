use finstat_core::error::FinstatError;
use finstat_core::output::write_records_csv;
use finstat_core::union::union_tables;
use std::path::{Path, PathBuf};

pub fn run(out: &Path, inputs: &[PathBuf]) -> Result<(), FinstatError> {
    let result = union_tables(inputs);

    for skipped in &result.skipped {
        eprintln!("Skip {}: {}", skipped.item, skipped.message);
    }

    write_records_csv(out, &result.records)?;
    eprintln!("OK rows {} -> {}", result.records.len(), out.display());

    Ok(())
}
