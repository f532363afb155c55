pub mod batch;
pub mod error;
pub mod extraction;
pub mod mapping;
pub mod model;
pub mod normalize;
pub mod output;
pub mod source;
pub mod union;

use std::path::Path;

use batch::{run_batch, BatchResult};
use error::FinstatError;
use extraction::extractor_for;
use mapping::schema::{SourceFormat, SourceMapping};
use source::{load_listing, CsvDocuments, DirectoryDocuments, ZipDocuments};

/// Normalize the XML members of a bulk ZIP archive (KVK style).
pub fn normalize_zip(
    zip_path: &Path,
    mapping: &SourceMapping,
    limit: Option<usize>,
) -> Result<BatchResult, FinstatError> {
    ensure_format(mapping, SourceFormat::Xbrl)?;
    let documents = ZipDocuments::open(zip_path)?;
    let extractor = extractor_for(mapping);
    Ok(run_batch(documents, extractor.as_ref(), mapping, limit))
}

/// Normalize a directory of XML/XBRL documents with the given extensions.
pub fn normalize_dir(
    dir: &Path,
    extensions: &[&str],
    mapping: &SourceMapping,
    limit: Option<usize>,
) -> Result<BatchResult, FinstatError> {
    ensure_format(mapping, SourceFormat::Xbrl)?;
    let documents = DirectoryDocuments::open(dir, extensions)?;
    let extractor = extractor_for(mapping);
    Ok(run_batch(documents, extractor.as_ref(), mapping, limit))
}

/// Normalize the items of a JSON listing (PRH, INPI, CKAN datastore).
pub fn normalize_listing(
    listing_path: &Path,
    mapping: &SourceMapping,
    limit: Option<usize>,
) -> Result<BatchResult, FinstatError> {
    ensure_format(mapping, SourceFormat::Json)?;
    let documents = load_listing(listing_path, mapping)?;
    let extractor = extractor_for(mapping);
    Ok(run_batch(
        documents.into_iter().map(Ok),
        extractor.as_ref(),
        mapping,
        limit,
    ))
}

/// Normalize the rows of a delimited export (CRO CSV).
pub fn normalize_csv(
    csv_path: &Path,
    mapping: &SourceMapping,
    limit: Option<usize>,
) -> Result<BatchResult, FinstatError> {
    ensure_format(mapping, SourceFormat::Csv)?;
    let documents = CsvDocuments::open(csv_path)?;
    let extractor = extractor_for(mapping);
    Ok(run_batch(documents, extractor.as_ref(), mapping, limit))
}

fn ensure_format(mapping: &SourceMapping, expected: SourceFormat) -> Result<(), FinstatError> {
    if mapping.format == expected {
        Ok(())
    } else {
        Err(FinstatError::MappingInvalid(format!(
            "mapping '{}' reads {} documents, but this source provides {}",
            mapping.name, mapping.format, expected
        )))
    }
}
