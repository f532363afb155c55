use std::path::{Path, PathBuf};

use crate::batch::DocumentRead;
use crate::error::FinstatError;
use crate::extraction::{DocumentBody, SourceDocument};
use crate::model::ItemError;
use crate::source::{has_extension, source_unreadable};

/// Documents stored as individual files (e.g. PRH `.xbrl` downloads),
/// ordered by file name.
pub struct DirectoryDocuments {
    files: std::vec::IntoIter<PathBuf>,
}

impl DirectoryDocuments {
    /// List regular files in `dir` whose extension matches one of `extensions`.
    pub fn open(dir: &Path, extensions: &[&str]) -> Result<Self, FinstatError> {
        let entries = std::fs::read_dir(dir).map_err(|e| source_unreadable(dir, e))?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| source_unreadable(dir, e))?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if extensions.iter().any(|ext| has_extension(&name, ext)) {
                files.push(path);
            }
        }
        files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        log::debug!("{}: {} document file(s)", dir.display(), files.len());

        Ok(DirectoryDocuments {
            files: files.into_iter(),
        })
    }
}

impl Iterator for DirectoryDocuments {
    type Item = DocumentRead;

    fn next(&mut self) -> Option<Self::Item> {
        let path = self.files.next()?;
        let id = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Some(match std::fs::read(&path) {
            Ok(bytes) => Ok(SourceDocument::new(id, DocumentBody::Bytes(bytes))),
            Err(e) => Err(ItemError {
                item: id,
                message: e.to_string(),
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matching_files_sorted_by_name() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("2331972-7_2023-12-31.xbrl"), "<b/>").unwrap();
        std::fs::write(dir.path().join("0112038-9_2023-12-31.xbrl"), "<a/>").unwrap();
        std::fs::write(dir.path().join("errors.txt"), "x").unwrap();
        std::fs::create_dir(dir.path().join("nested.xbrl")).unwrap();

        let docs: Vec<_> = DirectoryDocuments::open(dir.path(), &["xbrl", "xml"])
            .unwrap()
            .map(|d| d.unwrap().id)
            .collect();
        assert_eq!(
            docs,
            vec!["0112038-9_2023-12-31.xbrl", "2331972-7_2023-12-31.xbrl"]
        );
    }

    #[test]
    fn test_missing_directory_is_fatal() {
        assert!(DirectoryDocuments::open(Path::new("/nonexistent/fi"), &["xml"]).is_err());
    }
}
