//! Wrapweld CLI
//!
//! ```bash
//! # Generate bindings for every request in a batch file
//! wrapweld generate --config wrapweld.toml
//!
//! # Generate offline from pre-extracted metadata
//! wrapweld generate --config wrapweld.toml --metadata-dir metadata/
//!
//! # Print the binding plan for one metadata document
//! wrapweld plan metadata/pandas.json
//! ```
//!
//! Log verbosity is read from `WRAPWELD_LOG` (default `info`).

mod config;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use config::{BatchFile, BridgeKind};
use std::fs;
use std::path::PathBuf;
use tracing::info;
use wrapweld::{
    BatchGenerator, BindingSynthesizer, LibraryDescriptor, LibraryDocument, MetadataDirBridge,
    PythonBridge, RuntimeBridge, SourceTreeSink,
};

/// Generate Java bindings for Python libraries
#[derive(Parser)]
#[command(name = "wrapweld")]
#[command(version)]
#[command(about = "Generate Java bindings for Python libraries", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every request in a batch file
    Generate {
        /// Batch file
        #[arg(short, long, default_value = "wrapweld.toml")]
        config: PathBuf,

        /// Read pre-extracted metadata from this directory instead of running Python
        #[arg(long, conflicts_with = "python")]
        metadata_dir: Option<PathBuf>,

        /// Python interpreter to extract metadata with
        #[arg(long)]
        python: Option<PathBuf>,
    },

    /// Print the binding plan for a metadata document as JSON
    Plan {
        /// Metadata document
        metadata: PathBuf,

        /// Library name, when the document lacks one
        #[arg(long)]
        library: Option<String>,
    },
}

fn main() -> Result<()> {
    use tracing_subscriber::EnvFilter;
    let filter = EnvFilter::try_from_env("WRAPWELD_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match Cli::parse().command {
        Commands::Generate {
            config,
            metadata_dir,
            python,
        } => generate(config, metadata_dir, python),
        Commands::Plan { metadata, library } => plan(metadata, library),
    }
}

fn generate(
    config: PathBuf,
    metadata_dir: Option<PathBuf>,
    python: Option<PathBuf>,
) -> Result<()> {
    let batch = BatchFile::load(&config)?;
    if batch.requests.is_empty() {
        bail!("{} contains no [[request]] entries", config.display());
    }

    let bridge: Box<dyn RuntimeBridge> = match (metadata_dir, python) {
        (Some(dir), _) => Box::new(MetadataDirBridge::new(dir)),
        (None, Some(interpreter)) => Box::new(PythonBridge::with_interpreter(interpreter)),
        (None, None) => match batch.bridge.kind {
            BridgeKind::Metadata => {
                let Some(dir) = batch.bridge.metadata_dir.clone() else {
                    bail!("[bridge] kind = \"metadata\" requires metadata_dir");
                };
                Box::new(MetadataDirBridge::new(dir))
            }
            BridgeKind::Python => match batch.bridge.python.clone() {
                Some(interpreter) => Box::new(PythonBridge::with_interpreter(interpreter)),
                None => Box::new(PythonBridge::discover()?),
            },
        },
    };

    let report = BatchGenerator::new(bridge, SourceTreeSink::new(batch.emit))
        .with_synthesizer(BindingSynthesizer::new(batch.synthesis))
        .generate(&batch.requests)?;

    let files: usize = report.outcomes.iter().map(|o| o.files.len()).sum();
    info!(
        requests = report.outcomes.len(),
        files,
        "Binding generation complete"
    );
    Ok(())
}

fn plan(metadata: PathBuf, library: Option<String>) -> Result<()> {
    let json = fs::read_to_string(&metadata)
        .with_context(|| format!("Failed to read {}", metadata.display()))?;
    let mut document = LibraryDocument::from_json(&json)
        .with_context(|| format!("Failed to parse {}", metadata.display()))?;
    if library.is_some() {
        document.library = library;
    }

    let descriptor = LibraryDescriptor::try_from(document)?;
    let plan = BindingSynthesizer::default().synthesize(descriptor);
    println!("{}", serde_json::to_string_pretty(&plan)?);
    Ok(())
}
