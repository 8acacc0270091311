use cadc_core::Exponent;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "cadc: archives keyed by parameter records", long_about = None)]
pub struct Cli {
    /// Working root; parameter records live in <root>/records
    #[arg(long, global = true, env = "CADC_ROOT")]
    pub root: Option<PathBuf>,

    /// JSON configuration file
    #[arg(long, global = true, env = "CADC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, global = true, env = "CADC_LOG", default_value = "warn")]
    pub log: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Pack a file or directory into an encrypted archive next to it
    Encrypt {
        source: PathBuf,
        /// Parameter record name
        #[arg(long)]
        record: String,
        /// Exponent such as 123.45678 (random when omitted)
        #[arg(long)]
        exponent: Option<Exponent>,
    },

    /// Verify and extract an archive
    Decrypt {
        archive: PathBuf,
        #[arg(long)]
        record: String,
    },

    /// Print a derived key without touching any files
    Keygen {
        #[arg(long)]
        record: String,
        #[arg(long)]
        exponent: Option<Exponent>,
    },

    #[command(subcommand)]
    /// Manage parameter records
    Records(RecordCommands),

    #[command(subcommand)]
    /// Archive-name codec
    Codec(CodecCommands),
}

#[derive(Subcommand, Debug)]
pub enum RecordCommands {
    /// List stored record names
    List,

    /// Create or overwrite a record
    New {
        name: String,
        /// Fill every field with random values
        #[arg(long, conflicts_with_all = ["base", "offset", "precision", "key_length"])]
        random: bool,
        #[arg(long, required_unless_present = "random")]
        base: Option<String>,
        #[arg(long, required_unless_present = "random")]
        offset: Option<String>,
        #[arg(long, required_unless_present = "random")]
        precision: Option<i64>,
        #[arg(long, required_unless_present = "random")]
        key_length: Option<i64>,
    },
}

#[derive(Subcommand, Debug)]
pub enum CodecCommands {
    /// Digits to tokens
    Encode { digits: String },
    /// Tokens to digits
    Decode { tokens: String },
}
