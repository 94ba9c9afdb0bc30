use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use colored::Colorize;
use rand::Rng;

use pv_chain::{OperationStatus, ProofChain};
use pv_ledger::LedgerConfig;
use pv_store::FileSlotStore;
use pv_types::{BackendMode, ContentHash};

use crate::cli::{
    Cli, Command, LogArgs, MintArgs, ModeArgs, OutputFormat, RegisterArgs, ShowArgs, VerifyArgs,
};

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    let store = FileSlotStore::open(&cli.data_dir)
        .with_context(|| format!("opening data directory {}", cli.data_dir.display()))?;
    let chain = ProofChain::open(Arc::new(store), LedgerConfig::default());

    match cli.command {
        Command::Register(args) => cmd_register(&chain, args, &cli.format).await,
        Command::Mint(args) => cmd_mint(&chain, args, &cli.format).await,
        Command::Verify(args) => cmd_verify(&chain, args).await,
        Command::Show(args) => cmd_show(&chain, args, &cli.format).await,
        Command::Log(args) => cmd_log(&chain, args),
        Command::Mode(args) => cmd_mode(&chain, args),
    }
}

fn hash_file(path: &Path) -> anyhow::Result<ContentHash> {
    let data = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    Ok(ContentHash::from_raw(*blake3::hash(&data).as_bytes()))
}

/// `PV-<unix-ms>-<9 uppercase base36 chars>`, matching the proof id shape
/// certificates are issued under.
fn generate_proof_id() -> String {
    const ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
    let mut rng = rand::thread_rng();
    let suffix: String = (0..9)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect();
    format!("PV-{}-{}", chrono::Utc::now().timestamp_millis(), suffix)
}

fn default_address(path: &Path) -> String {
    format!("file://{}", path.display())
}

fn print_status(status: &OperationStatus, format: &OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(status)?),
        OutputFormat::Text => match status {
            OperationStatus::Pending => println!("{} pending", "…".dimmed()),
            OperationStatus::Confirming => println!("{} confirming", "…".dimmed()),
            OperationStatus::Succeeded { tx_hash, outcome } => {
                println!("{} confirmed", "✓".green().bold());
                println!("  Tx: {}", tx_hash.to_hex().yellow());
                match outcome {
                    pv_chain::Outcome::Registered { block_number } => {
                        println!("  Block: {block_number}");
                    }
                    pv_chain::Outcome::Minted { token_id } => {
                        println!("  Token: #{token_id}");
                    }
                }
            }
            OperationStatus::Failed { message, .. } => {
                println!("{} {}", "✗".red().bold(), message);
            }
        },
    }
    Ok(())
}

async fn cmd_register(
    chain: &ProofChain,
    args: RegisterArgs,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    let content_hash = hash_file(&args.file)?;
    let proof_id = args.id.unwrap_or_else(generate_proof_id);
    let address = args.address.unwrap_or_else(|| default_address(&args.file));

    println!(
        "Registering {} as {} ({})",
        args.file.display().to_string().bold(),
        proof_id.cyan(),
        chain.mode()
    );
    let status = chain.register(&proof_id, content_hash, &address).await;
    print_status(&status, format)
}

async fn cmd_mint(chain: &ProofChain, args: MintArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let content_hash = hash_file(&args.file)?;
    let metadata = fs::metadata(&args.file)
        .with_context(|| format!("reading metadata of {}", args.file.display()))?;
    let file_name = args
        .file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let address = args.address.unwrap_or_else(|| default_address(&args.file));

    println!(
        "Minting certificate for {} ({})",
        args.id.cyan(),
        chain.mode()
    );
    let status = chain
        .mint(&args.id, content_hash, &address, &file_name, metadata.len())
        .await;
    print_status(&status, format)
}

async fn cmd_verify(chain: &ProofChain, args: VerifyArgs) -> anyhow::Result<()> {
    let exists = chain.exists(&args.id).await?;
    let minted = chain.minted(&args.id).await?;

    let yes = "✓".green().bold();
    let no = "✗".red();
    println!(
        "{}  registered: {}  minted: {}",
        args.id.cyan(),
        if exists { &yes } else { &no },
        if minted { &yes } else { &no },
    );
    Ok(())
}

async fn cmd_show(chain: &ProofChain, args: ShowArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let Some(record) = chain.get_record(&args.id).await? else {
        println!("{} no proof registered as {}", "✗".red(), args.id.cyan());
        return Ok(());
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&record)?),
        OutputFormat::Text => {
            println!("Proof {}", record.proof_id.cyan().bold());
            println!("  Hash: {}", record.content_hash.to_hex().yellow());
            println!("  Address: {}", record.content_address);
            println!("  Registrant: {}", record.registrant);
            println!("  Block: {}", record.created_at_block);
            println!("  Time: {}", record.created_at_time);
            if let Some(token) = chain.ledger().get_token(&args.id) {
                println!(
                    "  Certificate: token #{} ({}, {} bytes)",
                    token.token_id, token.file_name, token.file_size
                );
            }
        }
    }
    Ok(())
}

fn cmd_log(chain: &ProofChain, args: LogArgs) -> anyhow::Result<()> {
    let transactions = chain.ledger().transactions();
    if transactions.is_empty() {
        println!("No transactions.");
        return Ok(());
    }
    for tx in transactions.iter().rev().take(args.limit) {
        let token = tx
            .token_id
            .map(|id| format!(" token #{id}"))
            .unwrap_or_default();
        println!(
            "{} {} {} block {}{}",
            tx.hash.short_id().dimmed(),
            tx.kind.to_string().yellow(),
            tx.proof_id.cyan(),
            tx.block_number,
            token,
        );
    }
    Ok(())
}

fn cmd_mode(chain: &ProofChain, args: ModeArgs) -> anyhow::Result<()> {
    match args.mode {
        None => println!("{}", chain.mode()),
        Some(raw) => {
            let mode: BackendMode = raw.parse()?;
            chain.set_mode(mode)?;
            println!("{} mode set to {}", "✓".green().bold(), mode.to_string().bold());
        }
    }
    Ok(())
}
