use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "rukopis")]
#[command(about = "Browse, search and export a digitized archive of writers' manuscripts", long_about = None)]
#[command(version = crate::version_string())]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Dataset root, overriding the configured one
    #[arg(long, global = true, env = "RUKOPIS_DATA")]
    pub data: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the authors in the catalog
    Authors,

    /// List the archive types of an author
    Types { author: String },

    /// List the archives of an author and archive type
    Archives {
        author: String,
        archive_type: String,
    },

    /// List the page scans of an archive
    Pages {
        author: String,
        archive_type: String,
        archive: String,
    },

    /// Print the metadata table of an archive
    Meta {
        author: String,
        archive_type: String,
        archive: String,
    },

    /// Search the metadata of every archive
    Search { query: String },

    /// Filtered search; with no flags this lists the whole catalog
    Find {
        /// Restrict to one author
        #[arg(short, long)]
        author: Option<String>,

        /// Restrict to one archive type
        #[arg(short = 't', long = "type")]
        archive_type: Option<String>,

        /// Free-text condition over the metadata
        #[arg(short = 'x', long)]
        text: Option<String>,
    },

    /// Write a downloadable artifact for an archive
    Export {
        #[command(subcommand)]
        what: ExportTarget,
    },

    /// Transcribe a page scan (OCR)
    Transcribe {
        author: String,
        archive_type: String,
        archive: String,
        /// Page number as shown by `pages` (0-based)
        page: usize,
    },

    /// Adapt a transcribed page into plain language
    Adapt {
        author: String,
        archive_type: String,
        archive: String,
        page: usize,
    },

    /// Generate TEI markup for a transcribed page
    Tei {
        author: String,
        archive_type: String,
        archive: String,
        page: usize,
    },

    /// Describe a page scan for audio description
    Describe {
        author: String,
        archive_type: String,
        archive: String,
        page: usize,
    },

    /// Synthesize narration for a page's description
    Narrate {
        author: String,
        archive_type: String,
        archive: String,
        page: usize,

        /// Output file (defaults to the artifact name)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Get or set configuration
    Config {
        /// Configuration key (e.g., dataset-dir, model, speaker, seed)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ExportTarget {
    /// One PDF with all pages of the archive
    Pdf {
        author: String,
        archive_type: String,
        archive: String,

        /// Output file (defaults to the artifact name)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Zip bundle of the original page images
    Bundle {
        author: String,
        archive_type: String,
        archive: String,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// The stored metadata file, byte for byte
    Meta {
        author: String,
        archive_type: String,
        archive: String,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}
