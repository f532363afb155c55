use finstat_core::batch::BatchResult;
use finstat_core::error::FinstatError;
use finstat_core::mapping::builtin;
use finstat_core::mapping::schema::SourceMapping;
use finstat_core::output::{write_errors, write_records_csv};
use std::path::PathBuf;

use crate::output;
use crate::NormalizeArgs;

/// Where the documents of one run come from.
pub enum Source {
    Zip(PathBuf),
    Dir(PathBuf, Vec<String>),
    Listing(PathBuf),
    Csv(PathBuf),
}

pub fn run(source: Source, args: &NormalizeArgs) -> Result<(), FinstatError> {
    let mapping = resolve_mapping(args)?;
    log::info!(
        "using mapping '{}' ({} / {}, {})",
        mapping.name,
        mapping.country,
        mapping.source,
        mapping.format
    );

    let (origin, result) = match &source {
        Source::Zip(path) => (
            path,
            finstat_core::normalize_zip(path, &mapping, args.limit)?,
        ),
        Source::Dir(path, extensions) => {
            let exts: Vec<&str> = extensions.iter().map(|s| s.as_str()).collect();
            (
                path,
                finstat_core::normalize_dir(path, &exts, &mapping, args.limit)?,
            )
        }
        Source::Listing(path) => (
            path,
            finstat_core::normalize_listing(path, &mapping, args.limit)?,
        ),
        Source::Csv(path) => (
            path,
            finstat_core::normalize_csv(path, &mapping, args.limit)?,
        ),
    };

    if let Some(errors_path) = &args.errors {
        write_errors(errors_path, &result.errors)?;
    }

    match &args.out {
        Some(path) => {
            write_records_csv(path, &result.records)?;
            eprintln!(
                "OK {} -> {} (ok={}, err={}, skipped={})",
                origin.display(),
                path.display(),
                result.ok_count(),
                result.error_count(),
                result.skipped
            );
            if args.errors.is_none() {
                print_errors(&result);
            }
        }
        None => match args.output.as_str() {
            "json" => output::json::print(&result)?,
            _ => output::table::print(&result),
        },
    }

    Ok(())
}

fn resolve_mapping(args: &NormalizeArgs) -> Result<SourceMapping, FinstatError> {
    match (&args.preset, &args.mapping) {
        (Some(name), _) => builtin::load_preset(name),
        (None, Some(path)) => finstat_core::mapping::load_mapping(path),
        (None, None) => Err(FinstatError::MappingInvalid(format!(
            "no mapping given. Use --preset ({}) or --mapping FILE",
            builtin::PRESETS.join(", ")
        ))),
    }
}

fn print_errors(result: &BatchResult) {
    for e in &result.errors {
        eprintln!("  error: {e}");
    }
}
