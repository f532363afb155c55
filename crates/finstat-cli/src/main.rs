mod commands;
mod output;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use commands::normalize::Source;

#[derive(Parser)]
#[command(
    name = "finstat",
    version,
    about = "Normalize national company financial-statement open data into one table"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize the XML members of a bulk ZIP archive (e.g. KVK jaarrekeningen_partN.zip)
    ParseZip {
        /// Path to the ZIP archive
        zip: PathBuf,

        #[command(flatten)]
        args: NormalizeArgs,
    },
    /// Normalize a directory of XML/XBRL documents
    ParseDir {
        /// Directory holding the documents
        dir: PathBuf,

        /// File extension(s) to pick up
        #[arg(long = "ext", value_name = "EXT", default_values = ["xml", "xbrl"])]
        extensions: Vec<String>,

        #[command(flatten)]
        args: NormalizeArgs,
    },
    /// Normalize the items of a JSON listing (PRH, INPI RNE, CKAN datastore)
    ParseListing {
        /// Path to the JSON listing
        listing: PathBuf,

        #[command(flatten)]
        args: NormalizeArgs,
    },
    /// Normalize the rows of a CSV export (CRO)
    ParseCsv {
        /// Path to the CSV file
        csv: PathBuf,

        #[command(flatten)]
        args: NormalizeArgs,
    },
    /// Union normalized CSV files into one table
    Union {
        /// Output CSV
        #[arg(short = 'O', long = "out", value_name = "FILE")]
        out: PathBuf,

        /// Input CSV files, combined in the order given
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },
    /// Inspect and validate source mappings
    Mappings {
        #[command(subcommand)]
        action: MappingsAction,
    },
}

#[derive(Args)]
pub struct NormalizeArgs {
    /// Predefined source mapping: nl, fi, fr, ie, ie-datastore
    #[arg(
        short,
        long,
        value_name = "NAME",
        required_unless_present = "mapping",
        conflicts_with = "mapping"
    )]
    pub preset: Option<String>,

    /// Custom JSON mapping file
    #[arg(short, long, value_name = "FILE")]
    pub mapping: Option<PathBuf>,

    /// Write normalized records to this CSV file
    #[arg(short = 'O', long = "out", value_name = "FILE")]
    pub out: Option<PathBuf>,

    /// Write per-item errors to this file (removed when a run has none)
    #[arg(long, value_name = "FILE")]
    pub errors: Option<PathBuf>,

    /// Stop after this many good records (0 = no limit)
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Output format when printing: table (default) or json
    #[arg(short, long, default_value = "table")]
    pub output: String,
}

#[derive(Subcommand)]
enum MappingsAction {
    /// List predefined mappings
    List,
    /// Show which source keys feed each canonical column
    Show {
        /// Preset name (e.g., "nl")
        preset: String,
    },
    /// Validate a custom mapping file
    Validate {
        /// Path to JSON mapping file
        file: PathBuf,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::ParseZip { zip, args } => commands::normalize::run(Source::Zip(zip), &args),
        Commands::ParseDir {
            dir,
            extensions,
            args,
        } => commands::normalize::run(Source::Dir(dir, extensions), &args),
        Commands::ParseListing { listing, args } => {
            commands::normalize::run(Source::Listing(listing), &args)
        }
        Commands::ParseCsv { csv, args } => commands::normalize::run(Source::Csv(csv), &args),
        Commands::Union { out, inputs } => commands::union::run(&out, &inputs),
        Commands::Mappings { action } => match action {
            MappingsAction::List => commands::mappings::list(),
            MappingsAction::Show { preset } => commands::mappings::show(&preset),
            MappingsAction::Validate { file } => commands::mappings::validate(&file),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
