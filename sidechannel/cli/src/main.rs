use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing::{debug, info};

use sidechannel_filter::{HdrMasteringMetadata, SideChannelConfig, SideDataPayload};

#[derive(Parser, Debug)]
#[command(name = "sidechannel")]
#[command(about = "Inspect side-channel payloads and configuration")]
#[command(arg_required_else_help = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// HDR mastering metadata payloads
    Hdr {
        #[command(subcommand)]
        command: HdrCommand,
    },
    /// Component configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum HdrCommand {
    /// Print a raw 80-byte payload as JSON
    Decode {
        /// Raw payload file
        file: PathBuf,
    },
    /// Write a raw payload from JSON
    Encode {
        /// JSON file with the metadata fields
        #[arg(long)]
        json: PathBuf,

        /// Output payload file
        #[arg(short, long)]
        out: PathBuf,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Print the effective configuration
    Show {
        /// Print the config file path instead
        #[arg(long)]
        path: bool,

        /// Config file to read instead of the per-user one
        #[arg(long)]
        file: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    debug!(?cli, "parsed arguments");

    match cli.command {
        Commands::Hdr { command } => match command {
            HdrCommand::Decode { file } => hdr_decode(&file),
            HdrCommand::Encode { json, out } => hdr_encode(&json, &out),
        },
        Commands::Config { command } => match command {
            ConfigCommand::Show { path, file } => config_show(path, file),
        },
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}

fn hdr_decode(file: &Path) -> Result<()> {
    let bytes = fs::read(file).with_context(|| format!("failed to read {}", file.display()))?;
    let metadata = HdrMasteringMetadata::from_bytes(&bytes)
        .with_context(|| format!("{} is not an HDR payload", file.display()))?;
    println!("{}", serde_json::to_string_pretty(&metadata)?);
    Ok(())
}

fn hdr_encode(json: &Path, out: &Path) -> Result<()> {
    let contents =
        fs::read_to_string(json).with_context(|| format!("failed to read {}", json.display()))?;
    let metadata: HdrMasteringMetadata = serde_json::from_str(&contents)
        .with_context(|| format!("{} is not valid HDR metadata JSON", json.display()))?;
    metadata.validate()?;
    fs::write(out, metadata.as_bytes())
        .with_context(|| format!("failed to write {}", out.display()))?;
    info!(out = %out.display(), bytes = HdrMasteringMetadata::SIZE, "wrote HDR payload");
    Ok(())
}

fn config_show(path_only: bool, file: Option<PathBuf>) -> Result<()> {
    let path = file.or_else(SideChannelConfig::default_path);
    if path_only {
        match &path {
            Some(path) => println!("{}", path.display()),
            None => bail!("no per-user data directory on this platform"),
        }
        return Ok(());
    }

    let config = match &path {
        Some(path) => SideChannelConfig::load_from(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => SideChannelConfig::default(),
    };
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}
