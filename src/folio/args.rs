use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "folio")]
#[command(about = "Versioned document vault with template merge", long_about = None)]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_version = LONG_VERSION)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("GIT_HASH"),
    " ",
    env!("GIT_COMMIT_DATE"),
    ")"
);

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new document
    #[command(alias = "n")]
    New {
        /// Title of the document
        title: Option<String>,

        /// Content (use "-" or omit to read stdin)
        content: Option<String>,

        /// Read content from a file
        #[arg(long, value_name = "FILE")]
        from: Option<PathBuf>,
    },

    /// Save a new version of a document
    #[command(alias = "s")]
    Save {
        /// Document (uuid, uuid prefix, or title)
        selector: String,

        /// Content (use "-" or omit to read stdin)
        content: Option<String>,

        /// Read content from a file
        #[arg(long, value_name = "FILE")]
        from: Option<PathBuf>,

        /// New title for the document
        #[arg(short, long)]
        title: Option<String>,

        /// Version comment
        #[arg(short, long)]
        comment: Option<String>,
    },

    /// Print a document's content
    #[command(alias = "cat")]
    Show {
        /// Document (uuid, uuid prefix, or title)
        selector: String,

        /// Show an archived version instead of the current one
        #[arg(short, long)]
        version: Option<u32>,
    },

    /// Show a document's version history
    #[command(alias = "log")]
    History {
        /// Document (uuid, uuid prefix, or title)
        selector: String,
    },

    /// Restore an archived version as a new version
    Restore {
        /// Document (uuid, uuid prefix, or title)
        selector: String,

        /// Version number to restore
        version: u32,
    },

    /// List documents
    #[command(alias = "ls")]
    List {
        /// Search term (title and records notes)
        #[arg(short, long)]
        search: Option<String>,

        /// Filter by records document type
        #[arg(long = "doc-type")]
        document_type: Option<String>,

        /// Filter by records classification
        #[arg(long)]
        classification: Option<String>,

        /// Only finalized documents
        #[arg(long)]
        finalized: bool,
    },

    /// Delete one or more documents and their history
    #[command(alias = "rm")]
    Delete {
        /// Documents (uuid, uuid prefix, or title)
        #[arg(required = true, num_args = 1..)]
        selectors: Vec<String>,
    },

    /// Set records-management metadata on a document
    Records {
        /// Document (uuid, uuid prefix, or title)
        selector: String,

        #[arg(long)]
        classification: Option<String>,

        #[arg(long = "doc-type")]
        document_type: Option<String>,

        #[arg(long)]
        retention: Option<String>,

        #[arg(long = "record-number")]
        record_number: Option<String>,

        #[arg(long)]
        notes: Option<String>,
    },

    /// Finalize a document (one-way; no further saves)
    Finalize {
        /// Document (uuid, uuid prefix, or title)
        selector: String,

        /// Who finalized it
        #[arg(long)]
        by: Option<String>,

        #[arg(long)]
        notes: Option<String>,
    },

    /// Manage templates
    #[command(alias = "tpl")]
    Template {
        #[command(subcommand)]
        command: TemplateCommands,
    },

    /// Generate a document from a template
    #[command(alias = "gen")]
    Generate {
        /// Template (uuid, uuid prefix, or name)
        selector: String,

        /// Merge values as field=value (repeatable)
        #[arg(short = 'd', long = "data", value_name = "FIELD=VALUE")]
        data: Vec<String>,

        /// JSON object (or array for --batch) of merge values
        #[arg(long = "data-file", value_name = "FILE")]
        data_file: Option<PathBuf>,

        /// Name for the generated document
        #[arg(short, long)]
        name: Option<String>,

        /// Print the merged content without saving
        #[arg(long)]
        preview: bool,

        /// Treat the data file as an array and generate one document per item
        #[arg(long)]
        batch: bool,
    },

    /// Browse the standard merge field catalog
    Fields {
        /// Category to list (personal, company, dates, document)
        category: Option<String>,

        /// Search fields by name/description/category
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Export a document and its history as a tar.gz
    Export {
        /// Document (uuid, uuid prefix, or title)
        selector: String,
    },

    /// Print the content file path of one or more documents
    Path {
        #[arg(required = true, num_args = 1..)]
        selectors: Vec<String>,
    },

    /// Verify and repair vault consistency
    Doctor,

    /// Get or set configuration
    Config {
        /// Configuration key (e.g., file-ext)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },

    /// Initialize a vault in the current directory
    Init,
}

#[derive(Subcommand, Debug)]
pub enum TemplateCommands {
    /// Add a template
    Add {
        name: String,

        /// Content (use "-" or omit to read stdin)
        content: Option<String>,

        /// Read content from a file
        #[arg(long, value_name = "FILE")]
        from: Option<PathBuf>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        category: Option<String>,

        #[arg(long = "doc-type")]
        document_type: Option<String>,

        /// Records classification inherited by generated documents
        #[arg(long)]
        classification: Option<String>,

        /// Records retention period inherited by generated documents
        #[arg(long)]
        retention: Option<String>,
    },

    /// List templates
    #[command(alias = "ls")]
    List,

    /// Show a template and its merge fields
    Show {
        /// Template (uuid, uuid prefix, or name)
        selector: String,
    },

    /// Delete a template
    #[command(alias = "delete")]
    Rm {
        /// Template (uuid, uuid prefix, or name)
        selector: String,
    },
}
