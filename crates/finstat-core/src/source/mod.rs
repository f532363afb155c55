//! Document suppliers feeding the batch processor.
//!
//! Opening a source is fatal when it fails; reading an individual document
//! is not, and surfaces as an `Err` item of the iterator.

pub mod csv_table;
pub mod directory;
pub mod listing;
pub mod zip_archive;

use std::path::Path;

use crate::error::FinstatError;

pub use csv_table::CsvDocuments;
pub use directory::DirectoryDocuments;
pub use listing::{listing_documents, load_listing};
pub use zip_archive::ZipDocuments;

pub(crate) fn source_unreadable(path: &Path, reason: impl ToString) -> FinstatError {
    FinstatError::SourceUnreadable {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}

/// Last path segment of an archive member or file name.
pub(crate) fn basename(name: &str) -> &str {
    name.rsplit(['/', '\\']).next().unwrap_or(name)
}

/// Case-insensitive extension match (`ext` given without the dot).
pub(crate) fn has_extension(name: &str, ext: &str) -> bool {
    name.rsplit_once('.')
        .is_some_and(|(_, e)| e.eq_ignore_ascii_case(ext))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basename() {
        assert_eq!(basename("part1/2023/kvk_123.xml"), "kvk_123.xml");
        assert_eq!(basename("plain.xml"), "plain.xml");
    }

    #[test]
    fn test_has_extension() {
        assert!(has_extension("A.XML", "xml"));
        assert!(has_extension("0112038-9_2023-12-31.xbrl", "xbrl"));
        assert!(!has_extension("readme", "xml"));
        assert!(!has_extension("data.xml.bak", "xml"));
    }
}
