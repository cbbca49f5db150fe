//! wheelhouse-meta CLI
//!
//! Command-line interface for mirror inventory and baseline generation.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use wheelhouse_history::DATE_FORMAT;
use wheelhouse_meta::{
    artifact::extract_path,
    baseline::generate_baseline,
    checksum::sha256sum,
    pipeline::{build_inventory, first_use_index, InventoryOptions},
    report::{deliver, ReportFormat},
    requirements::DEFAULT_MANIFEST,
    Error, Result, RowLabels,
};

#[derive(Parser)]
#[command(name = "wheelhouse-meta")]
#[command(about = "Inventory generator for a local Python package mirror", long_about = None)]
#[command(version)]
struct Cli {
    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the inventory report for a mirror
    Report {
        /// Mirror directory holding wheels and sdists
        #[arg(short, long, env = "WHEELHOUSE_MIRROR")]
        mirror: PathBuf,

        /// Integrity baseline document (optional)
        #[arg(short, long, env = "WHEELHOUSE_BASELINE")]
        baseline: Option<PathBuf>,

        /// Approved-packages git repository (optional)
        #[arg(long, env = "WHEELHOUSE_HISTORY_REPO")]
        history_repo: Option<PathBuf>,

        /// Manifest path inside the history repository
        #[arg(long, env = "WHEELHOUSE_MANIFEST", default_value = DEFAULT_MANIFEST)]
        manifest: String,

        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "tsv")]
        format: ReportFormat,

        /// Prepend a row of column names (tsv only)
        #[arg(long)]
        header: bool,

        /// Value of the Source column
        #[arg(long, default_value = "PyPi")]
        source_label: String,

        /// Value of the Reviewer column
        #[arg(long, default_value = "Reviewer")]
        reviewer_label: String,

        /// Value of the Installer column
        #[arg(long, default_value = "Installer")]
        installer_label: String,
    },

    /// Show the metadata extracted from a single artifact
    Inspect {
        /// Wheel or sdist file
        artifact: PathBuf,
    },

    /// Show first-use dates mined from the approved-packages repository
    FirstUse {
        /// Approved-packages git repository
        #[arg(long, env = "WHEELHOUSE_HISTORY_REPO")]
        history_repo: PathBuf,

        /// Manifest path inside the repository
        #[arg(long, env = "WHEELHOUSE_MANIFEST", default_value = DEFAULT_MANIFEST)]
        manifest: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate an integrity baseline document for a mirror
    Baseline {
        /// Mirror directory to hash
        #[arg(short, long, env = "WHEELHOUSE_MIRROR")]
        mirror: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Compute the SHA-256 of a file
    Hash {
        /// File to hash
        file: PathBuf,
    },
}

fn setup_logging(level: &str) {
    let level = match level.to_lowercase().as_str() {
        "error" => Level::ERROR,
        "warn" => Level::WARN,
        "info" => Level::INFO,
        "debug" => Level::DEBUG,
        "trace" => Level::TRACE,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(&cli.log_level);

    match cli.command {
        Commands::Report {
            mirror,
            baseline,
            history_repo,
            manifest,
            output,
            format,
            header,
            source_label,
            reviewer_label,
            installer_label,
        } => {
            let options = InventoryOptions {
                mirror,
                baseline,
                history_repo,
                manifest,
                labels: RowLabels {
                    source: source_label,
                    reviewer: reviewer_label,
                    installer: installer_label,
                },
            };
            cmd_report(options, format, header, output)
        }

        Commands::Inspect { artifact } => cmd_inspect(artifact),

        Commands::FirstUse {
            history_repo,
            manifest,
            json,
        } => cmd_first_use(history_repo, manifest, json),

        Commands::Baseline { mirror, output } => cmd_baseline(mirror, output),

        Commands::Hash { file } => cmd_hash(file),
    }
}

fn cmd_report(
    options: InventoryOptions,
    format: ReportFormat,
    header: bool,
    output: Option<PathBuf>,
) -> Result<()> {
    info!("Building inventory for {:?}", options.mirror);
    let rows = build_inventory(&options)?;
    deliver(&rows, format, header, output.as_deref())?;
    Ok(())
}

fn cmd_inspect(artifact: PathBuf) -> Result<()> {
    let record = extract_path(&artifact, None)?
        .ok_or_else(|| Error::Other(format!("No metadata could be extracted from {:?}", artifact)))?;
    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}

fn cmd_first_use(repo: PathBuf, manifest: String, json: bool) -> Result<()> {
    let index = first_use_index(&repo, &manifest);

    if json {
        println!("{}", serde_json::to_string_pretty(&index)?);
    } else {
        for (key, date) in index.iter() {
            println!("{}\t{}", key, date.format(DATE_FORMAT));
        }
    }

    info!("{} packages with a first-use date", index.len());
    Ok(())
}

fn cmd_baseline(mirror: PathBuf, output: Option<PathBuf>) -> Result<()> {
    let document = generate_baseline(&mirror)?;
    let json = document.to_json()?;

    match output {
        Some(path) => {
            std::fs::write(&path, json)?;
            info!(
                "Wrote baseline for {} files -> {:?}",
                document.mirror.files.len(),
                path
            );
        }
        None => println!("{}", json),
    }

    Ok(())
}

fn cmd_hash(file: PathBuf) -> Result<()> {
    println!("{}", sha256sum(&file)?);
    Ok(())
}
