//! Elohim Shares operator tool
//!
//! Drives the filesystem share backend against a local storage directory.
//!
//! ## Usage
//!
//! ```bash
//! # Capacity and capability descriptor
//! elohim-shares version
//!
//! # Stage shares 0..2 of a storage index
//! elohim-shares allocate rkqjx3bbmz7y 0 1 2
//!
//! # Upload and commit a share from a file
//! elohim-shares write rkqjx3bbmz7y 0 share0.bin
//!
//! # Inspect committed shares
//! elohim-shares list rkqjx3bbmz7y
//! elohim-shares stat rkqjx3bbmz7y 0
//! elohim-shares read rkqjx3bbmz7y 0 --out share0.copy
//!
//! # Use a different storage directory
//! elohim-shares --storage-dir /data/shares list rkqjx3bbmz7y
//! ```

use anyhow::Context;
use bytes::Bytes;
use clap::{Parser, Subcommand};
use elohim_shares::{Config, FilesystemBackend, ShareNumber, StorageBackend, StorageIndex};
use std::io::Write;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "elohim-shares")]
#[command(about = "Filesystem share storage for Elohim nodes")]
struct Args {
    /// Path to config file
    #[arg(short, long, env = "ELOHIM_SHARES_CONFIG")]
    config: Option<PathBuf>,

    /// Storage directory
    #[arg(long, env = "ELOHIM_SHARES_DIR")]
    storage_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the version/capability descriptor as JSON
    Version,

    /// Stage space for shares of a storage index
    Allocate {
        storage_index: String,
        #[arg(required = true)]
        shares: Vec<u64>,
    },

    /// Upload a file as one share and commit it
    Write {
        storage_index: String,
        share: u64,
        file: PathBuf,
    },

    /// List committed share numbers
    List { storage_index: String },

    /// Read one committed share
    Read {
        storage_index: String,
        share: u64,
        /// Write to this file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Print the size of one committed share
    Stat { storage_index: String, share: u64 },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so share bytes on stdout stay clean
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("elohim_shares=info".parse()?),
        )
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => Config::default(),
    };

    // Apply CLI overrides
    if let Some(dir) = args.storage_dir {
        config.storage_dir = dir;
    }

    let backend = FilesystemBackend::open(&config.storage_dir, config.backend.clone()).await?;

    // Save default config if it doesn't exist
    let config_path = config.config_path();
    if args.config.is_none() && !config_path.exists() {
        config.save(&config_path)?;
        info!(path = %config_path.display(), "Created default config");
    }

    match args.command {
        Command::Version => {
            let version = backend.version().await?;
            println!("{}", serde_json::to_string_pretty(&version)?);
        }
        Command::Allocate {
            storage_index,
            shares,
        } => {
            let shares: Vec<ShareNumber> = shares.into_iter().map(ShareNumber).collect();
            let result = backend
                .create_immutable_storage_index(&StorageIndex::new(storage_index), &shares)
                .await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Command::Write {
            storage_index,
            share,
            file,
        } => {
            let si = StorageIndex::new(storage_index);
            let share = ShareNumber(share);
            let data = tokio::fs::read(&file)
                .await
                .with_context(|| format!("reading {}", file.display()))?;

            let allocation = backend.create_immutable_storage_index(&si, &[share]).await?;
            if allocation.already_have.contains(&share) {
                anyhow::bail!("share {} of {} is already committed", share, si);
            }

            backend
                .write_immutable_share(&si, share, Bytes::from(data), None)
                .await?;
        }
        Command::List { storage_index } => {
            let shares = backend
                .get_immutable_share_numbers(&StorageIndex::new(storage_index))
                .await?;
            for share in shares {
                println!("{}", share);
            }
        }
        Command::Read {
            storage_index,
            share,
            out,
        } => {
            let share = ShareNumber(share);
            let mut read = backend
                .read_immutable_shares(&StorageIndex::new(storage_index), &[share], &[], &[])
                .await?;
            let data: Vec<Bytes> = read.remove(&share).unwrap_or_default();

            match out {
                Some(path) => {
                    let joined: Vec<u8> = data.iter().flat_map(|b| b.iter().copied()).collect();
                    tokio::fs::write(&path, joined)
                        .await
                        .with_context(|| format!("writing {}", path.display()))?;
                }
                None => {
                    let mut stdout = std::io::stdout().lock();
                    for chunk in &data {
                        stdout.write_all(chunk)?;
                    }
                    stdout.flush()?;
                }
            }
        }
        Command::Stat {
            storage_index,
            share,
        } => {
            let size = backend
                .share_size(&StorageIndex::new(storage_index), ShareNumber(share))
                .await?;
            println!("{}", size);
        }
    }

    Ok(())
}
