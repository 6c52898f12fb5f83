use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "spamscan")]
#[command(author, version, about = "Email spam detection with a pretrained random forest")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, default_value = "spamscan.yaml")]
    pub config: String,

    /// TF-IDF vectorizer artifact (overrides the config file)
    #[arg(long, global = true)]
    pub vectorizer: Option<PathBuf>,

    /// Random-forest artifact (overrides the config file)
    #[arg(long, global = true)]
    pub classifier: Option<PathBuf>,

    /// Local tokenizer.json; disables downloads
    #[arg(long, global = true)]
    pub tokenizer: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the web UI
    Serve {
        /// Listen address
        #[arg(short, long)]
        address: Option<String>,

        /// Listen port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Classify one email and print the verdict
    Check {
        /// Email content
        text: String,
    },
}
