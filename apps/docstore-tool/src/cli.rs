use std::path::PathBuf;

use clap::{Parser, Subcommand};
use docstore_core::CompatibilityVersion;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the stored version and the record count of every section
    Info {
        /// Document file
        file: PathBuf,
    },

    /// Check whether a document would be accepted for the given version range
    Check {
        /// Document file
        file: PathBuf,

        /// Newest accepted version (major.minor.release.revision)
        #[arg(long)]
        current: Option<CompatibilityVersion>,

        /// Oldest accepted version (major.minor.release.revision)
        #[arg(long)]
        minimum: Option<CompatibilityVersion>,
    },

    /// Write an empty document stamped with a version
    Init {
        /// Destination file
        file: PathBuf,

        /// Version to stamp (major.minor.release.revision)
        #[arg(long)]
        stamp: Option<CompatibilityVersion>,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}
