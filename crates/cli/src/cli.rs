use apk_manifest_core::attributes::MANIFEST_PATH;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "apk-manifest",
    about = "Inspect JAR/APK signing manifests",
    long_about = "Parse the signing manifest of an APK/JAR archive (or a bare manifest file) and show its attributes and the exact byte span of every entry."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output machine-readable JSON to stdout
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable verbose logging (uses debug level unless RUST_LOG is set)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse a manifest and print its main attributes and entries
    Inspect {
        /// Archive (APK/JAR/zip) or bare manifest file
        input: PathBuf,

        /// Path of the manifest inside the archive (ignored for bare manifests)
        #[arg(short, long, default_value = MANIFEST_PATH)]
        entry: String,

        /// Record entry spans and compute the digests each entry declares.
        /// Repeated entry names become an error.
        #[arg(short, long)]
        chunks: bool,
    },
}
