//! Command-line arguments

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// pwseal - Password-based envelope encryption
#[derive(Parser, Debug)]
#[command(name = "pwseal")]
#[command(version)]
#[command(about = "Encrypt and decrypt data into self-contained password envelopes")]
pub struct Args {
    /// Password for the envelope (prompted for when absent)
    #[arg(long, global = true, env = "PWSEAL_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Seal plaintext into a base64 envelope
    Encrypt {
        /// Plaintext file (stdin when omitted)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Envelope destination (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Open an envelope and recover the plaintext
    Decrypt {
        /// Envelope file (stdin when omitted)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Plaintext destination (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show the region sizes of an envelope without decrypting it
    Inspect {
        /// Envelope file (stdin when omitted)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}
