use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "pv",
    about = "ProofVault — certify that a file existed, at a hash, at a time",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Data directory holding the simulated chain and preferences
    #[arg(long, global = true, default_value = ".proofvault")]
    pub data_dir: PathBuf,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Register a proof of existence for a file
    Register(RegisterArgs),
    /// Mint a certificate token for a proof
    Mint(MintArgs),
    /// Check whether a proof is registered and minted
    Verify(VerifyArgs),
    /// Show a registered proof record
    Show(ShowArgs),
    /// Show the simulated transaction log
    Log(LogArgs),
    /// Get or set the backend mode
    Mode(ModeArgs),
}

#[derive(Args)]
pub struct RegisterArgs {
    /// File to certify
    pub file: PathBuf,

    /// Proof id (generated if omitted)
    #[arg(long)]
    pub id: Option<String>,

    /// External content address for the file's bytes
    #[arg(long)]
    pub address: Option<String>,
}

#[derive(Args)]
pub struct MintArgs {
    /// File the certificate describes
    pub file: PathBuf,

    /// Proof id to mint for
    #[arg(long)]
    pub id: String,

    /// External content address for the file's bytes
    #[arg(long)]
    pub address: Option<String>,
}

#[derive(Args)]
pub struct VerifyArgs {
    /// Proof id to check
    pub id: String,
}

#[derive(Args)]
pub struct ShowArgs {
    /// Proof id to show
    pub id: String,
}

#[derive(Args)]
pub struct LogArgs {
    /// Maximum entries to print, newest first
    #[arg(long, default_value_t = 20)]
    pub limit: usize,
}

#[derive(Args)]
pub struct ModeArgs {
    /// New mode (`simulated` or `real`); prints the current mode if omitted
    pub mode: Option<String>,
}
