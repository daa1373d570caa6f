//! Config table exporter CLI
//!
//! Reads the manifest in the source directory, parses every selected table,
//! and writes the zipped JSON bundle plus the type declarations.

use cfgs_core::config::DEFAULT_ENCODING;
use cfgs_core::manifest::{DEFAULT_MANIFEST, DEFAULT_SHEET};
use cfgs_core::{export, ExportConfig};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cfgs")]
#[command(
    about = "Export spreadsheet config tables to a zipped JSON bundle and type declarations",
    long_about = None
)]
#[command(version)]
struct Cli {
    /// Directory holding the manifest and table files
    source: PathBuf,

    /// Directory the bundle is written to (must exist)
    target: PathBuf,

    /// Directory the type declarations are written to
    interface: PathBuf,

    /// Text encoding of .txt tables
    #[arg(short, long, default_value = DEFAULT_ENCODING)]
    encoding: String,

    /// Manifest file name inside the source directory
    #[arg(short, long, default_value = DEFAULT_MANIFEST)]
    manifest: String,

    /// Manifest sheet name
    #[arg(long, default_value = DEFAULT_SHEET)]
    sheet: String,

    /// Enable debug output
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> cfgs_core::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = ExportConfig::new(cli.source, cli.target, cli.interface)
        .with_encoding(cli.encoding)
        .with_manifest(cli.manifest, cli.sheet);

    let summary = export(&config)?;

    println!(
        "Exported {} tables ({} records)",
        summary.tables.len(),
        summary.total_records()
    );
    for table in &summary.tables {
        println!("  {} ({} records, {} columns)", table.name, table.records, table.columns);
    }
    println!("Bundle: {} ({} bytes)", summary.bundle_path.display(), summary.bundle_bytes);
    println!("Declarations: {}", summary.declarations_path.display());

    Ok(())
}
