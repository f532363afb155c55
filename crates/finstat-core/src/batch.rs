use serde::Serialize;

use crate::error::FinstatError;
use crate::extraction::{FieldExtractor, SourceDocument};
use crate::mapping::schema::SourceMapping;
use crate::model::{CanonicalRecord, ItemError, NormalizeContext};
use crate::normalize::normalize;

/// A document as handed over by a document source: either readable, or a
/// per-item read failure keyed by the item's identifier.
pub type DocumentRead = Result<SourceDocument, ItemError>;

/// Outcome of one extraction run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchResult {
    /// Normalized records, in source order.
    pub records: Vec<CanonicalRecord>,
    /// Items that could not be read or extracted, in source order.
    pub errors: Vec<ItemError>,
    /// Structurally incomplete items left out without an error entry.
    pub skipped: usize,
}

impl BatchResult {
    pub fn ok_count(&self) -> usize {
        self.records.len()
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }
}

/// Extract and normalize every document in order.
///
/// Per-document failures land in `errors` and never stop the run. Items
/// missing a required key are counted in `skipped`. With a non-zero
/// `limit`, the run stops once that many records were normalized.
pub fn run_batch<I>(
    documents: I,
    extractor: &dyn FieldExtractor,
    mapping: &SourceMapping,
    limit: Option<usize>,
) -> BatchResult
where
    I: IntoIterator<Item = DocumentRead>,
{
    let limit = limit.filter(|n| *n > 0);
    let mut result = BatchResult::default();

    for read in documents {
        if limit.is_some_and(|n| result.records.len() >= n) {
            break;
        }

        let document = match read {
            Ok(document) => document,
            Err(e) => {
                log::warn!("skipping unreadable item {}: {}", e.item, e.message);
                result.errors.push(e);
                continue;
            }
        };

        match extractor.extract(&document) {
            Ok(facts) => {
                let ctx = NormalizeContext::for_document(mapping, document.id.as_str());
                result.records.push(normalize(&facts, mapping, &ctx));
            }
            Err(FinstatError::FieldMissingRequired { field }) => {
                log::debug!("{}: missing required '{}', skipped", document.id, field);
                result.skipped += 1;
            }
            Err(e) => {
                let message = item_message(&e);
                log::warn!("{}: {}", document.id, message);
                result.errors.push(ItemError {
                    item: document.id,
                    message,
                });
            }
        }
    }

    log::info!(
        "{} ({}) batch finished: ok={}, err={}, skipped={}",
        mapping.name,
        extractor.format_name(),
        result.ok_count(),
        result.error_count(),
        result.skipped
    );

    result
}

/// Error text without the identifier already carried by the item.
fn item_message(e: &FinstatError) -> String {
    match e {
        FinstatError::DocumentUnreadable { reason, .. } => reason.clone(),
        other => other.to_string(),
    }
}
