//! CLI tool for document store files.
//!
//! Provides commands for:
//! - Inspecting the stored version and sections
//! - Checking a document against a version range
//! - Creating empty, version-stamped documents

mod cli;

use std::path::Path;

use anyhow::{bail, Context};
use clap::Parser;
use docstore_core::document::load_document;
use docstore_core::version::read_version;
use docstore_core::vocabulary::VERSION_NODE;
use docstore_core::{CompatibilityVersion, RecordStore, StoreConfig};

use cli::{Cli, Commands};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt::init();

    match cli.command {
        Commands::Info { file } => info(&file),
        Commands::Check {
            file,
            current,
            minimum,
        } => check(&file, current, minimum),
        Commands::Init { file, stamp, force } => init(&file, stamp, force),
    }
}

fn info(file: &Path) -> anyhow::Result<()> {
    let root = load_document(file)
        .with_context(|| format!("Failed to read '{}'", file.display()))?;

    match read_version(&root) {
        Some(version) => println!("Version: {}", version),
        None => println!("Version: none"),
    }

    let sections: Vec<_> = root
        .children()
        .iter()
        .filter(|node| node.name() != VERSION_NODE)
        .collect();
    println!("Sections: {}", sections.len());
    for section in sections {
        println!("  {:<24} {} records", section.name(), section.children().len());
    }
    Ok(())
}

fn check(
    file: &Path,
    current: Option<CompatibilityVersion>,
    minimum: Option<CompatibilityVersion>,
) -> anyhow::Result<()> {
    let mut config = StoreConfig::default();
    if let Some(current) = current {
        config = config.with_current_version(current);
    }
    if let Some(minimum) = minimum {
        config = config.with_minimum_version(minimum);
    }
    if config.minimum_version > config.current_version {
        bail!(
            "Minimum version {} is newer than current version {}",
            config.minimum_version,
            config.current_version
        );
    }

    let (current, minimum) = (config.current_version, config.minimum_version);
    let store = RecordStore::open(file, config)
        .with_context(|| format!("'{}' rejected for range {}..={}", file.display(), minimum, current))?;

    println!(
        "'{}' accepted: version {} within {}..={}",
        file.display(),
        store
            .file_version()
            .map(|v| v.to_string())
            .unwrap_or_default(),
        minimum,
        current
    );
    Ok(())
}

fn init(file: &Path, stamp: Option<CompatibilityVersion>, force: bool) -> anyhow::Result<()> {
    if file.exists() && !force {
        bail!("'{}' already exists, use --force to overwrite", file.display());
    }

    let mut config = StoreConfig::default();
    if let Some(stamp) = stamp {
        config = config.with_current_version(stamp);
    }
    let stamped = config.current_version;

    RecordStore::new(config)
        .save(file)
        .with_context(|| format!("Failed to write '{}'", file.display()))?;
    tracing::info!("Initialized '{}' at version {}", file.display(), stamped);
    println!("Created '{}' at version {}", file.display(), stamped);
    Ok(())
}
