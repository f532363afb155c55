//! Sinks for finalized batch and union results.
//!
//! Files are written to a temporary sibling first and renamed into place,
//! so an interrupted run never leaves a partial table behind.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::FinstatError;
use crate::model::{CanonicalRecord, ItemError, FIELDS};

/// Write records as CSV with the canonical header row.
pub fn write_records<W: Write>(writer: W, records: &[CanonicalRecord]) -> Result<(), FinstatError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(FIELDS)?;
    for record in records {
        wtr.write_record(record.values())?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write records to `path` atomically, creating the parent directory.
pub fn write_records_csv(path: &Path, records: &[CanonicalRecord]) -> Result<(), FinstatError> {
    persist_atomically(path, |file| write_records(file, records))
}

/// Write one `item -> message` line per error.
///
/// With no errors nothing is written and a file already at `path` is removed.
pub fn write_errors(path: &Path, errors: &[ItemError]) -> Result<(), FinstatError> {
    if errors.is_empty() {
        return match std::fs::remove_file(path) {
            Ok(()) => {
                log::debug!("removed stale {}", path.display());
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        };
    }
    persist_atomically(path, |file| {
        for e in errors {
            writeln!(file, "{e}")?;
        }
        Ok(())
    })
}

fn persist_atomically<F>(path: &Path, write: F) -> Result<(), FinstatError>
where
    F: FnOnce(&mut std::fs::File) -> Result<(), FinstatError>,
{
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    write(tmp.as_file_mut())?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| FinstatError::Io(e.error))?;
    log::debug!("wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_row_is_canonical() {
        let mut buf = Vec::new();
        write_records(&mut buf, &[]).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "country,source,company_id,company_name,year,revenue,profit,assets,doc_id,raw_year,raw_revenue,raw_profit,raw_assets\n"
        );
    }

    #[test]
    fn test_absent_values_are_empty_cells() {
        let record = CanonicalRecord {
            country: "NL".into(),
            source: "kvk".into(),
            revenue: Some("12345".into()),
            raw_revenue: Some("12345".into()),
            doc_id: Some("a.xml".into()),
            ..Default::default()
        };
        let mut buf = Vec::new();
        write_records(&mut buf, &[record]).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(
            text.lines().nth(1).unwrap(),
            "NL,kvk,,,,12345,,,a.xml,,12345,,"
        );
    }

    #[test]
    fn test_write_creates_parent_and_replaces() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("NL").join("kvk.csv");
        write_records_csv(&path, &[]).unwrap();
        write_records_csv(&path, &[CanonicalRecord::default()]).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 2);
        let leftovers = std::fs::read_dir(path.parent().unwrap()).unwrap().count();
        assert_eq!(leftovers, 1);
    }

    #[test]
    fn test_write_errors_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("errors.txt");
        let errors = vec![ItemError {
            item: "doc3.xml".into(),
            message: "unexpected end of document (unclosed element)".into(),
        }];
        write_errors(&path, &errors).unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "doc3.xml -> unexpected end of document (unclosed element)\n"
        );
    }

    #[test]
    fn test_clean_run_removes_stale_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("errors.txt");
        std::fs::write(&path, "doc1.xml -> stale\n").unwrap();

        write_errors(&path, &[]).unwrap();
        assert!(!path.exists());

        // Nothing to remove is fine too.
        write_errors(&path, &[]).unwrap();
        assert!(!path.exists());
    }
}
