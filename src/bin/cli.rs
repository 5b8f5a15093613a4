//! RangeKV CLI
//!
//! Builds blobs from CSV and runs lookups against blob files.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use rangekv::{BlobBuilder, Config, FileSource, LookupEngine};
use tracing_subscriber::{fmt, EnvFilter};

/// RangeKV CLI
#[derive(Parser, Debug)]
#[command(name = "rangekv-cli")]
#[command(about = "Build and query immutable sorted key-value blobs")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build a blob from `hexkey,hexvalue` lines
    Build {
        /// Input CSV file
        #[arg(short, long)]
        input: PathBuf,

        /// Output blob file
        #[arg(short, long)]
        output: PathBuf,

        /// Key size in bytes
        #[arg(short, long, default_value = "32")]
        key_size: u32,
    },

    /// Look up a key
    Get {
        /// Blob file
        blob: PathBuf,

        /// The key, hex encoded
        key: String,

        /// Print the value as hex instead of text
        #[arg(long)]
        hex: bool,
    },

    /// Print the blob trailer
    Info {
        /// Blob file
        blob: PathBuf,
    },
}

fn main() -> ExitCode {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,rangekv=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let runtime = match tokio::runtime::Builder::new_current_thread().build() {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("Failed to start runtime: {}", e);
            return ExitCode::from(2);
        }
    };

    let result = match args.command {
        Commands::Build {
            input,
            output,
            key_size,
        } => build(&input, &output, key_size).map(|_| ExitCode::SUCCESS),
        Commands::Get { blob, key, hex } => runtime.block_on(get(blob, &key, hex)),
        Commands::Info { blob } => runtime.block_on(info(blob)).map(|_| ExitCode::SUCCESS),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::from(2)
        }
    }
}

type CliResult<T> = std::result::Result<T, Box<dyn std::error::Error>>;

fn build(input: &Path, output: &Path, key_size: u32) -> CliResult<()> {
    let reader = BufReader::new(File::open(input)?);
    let mut builder = BlobBuilder::new(key_size)?;

    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let (key, value) = line
            .split_once(',')
            .ok_or_else(|| format!("line {}: expected `hexkey,hexvalue`", line_no + 1))?;
        let key = hex::decode(key.trim()).map_err(|e| format!("line {}: key: {}", line_no + 1, e))?;
        let value =
            hex::decode(value.trim()).map_err(|e| format!("line {}: value: {}", line_no + 1, e))?;
        builder.add(key, value)?;
    }

    let count = builder.len();
    let key_size = builder.key_size();
    let trailer = builder.write_file(output)?;
    tracing::info!(
        "Wrote {} entries of {}-byte keys to {} (index at {})",
        count,
        key_size,
        output.display(),
        trailer.index_offset
    );
    Ok(())
}

async fn get(blob: PathBuf, key: &str, as_hex: bool) -> CliResult<ExitCode> {
    let key = hex::decode(key)?;
    let engine = LookupEngine::with_config(FileSource::open(&blob)?, Config::default());

    let value = engine.lookup_key(&key).await?;
    let stats = engine.stats();
    tracing::debug!(
        "{} range reads, {} bytes read",
        stats.range_reads,
        stats.bytes_read
    );

    match value {
        Some(value) => {
            let mut stdout = io::stdout().lock();
            if as_hex {
                writeln!(stdout, "{}", hex::encode(&value))?;
            } else {
                writeln!(stdout, "{}", String::from_utf8_lossy(&value))?;
            }
            Ok(ExitCode::SUCCESS)
        }
        None => {
            eprintln!("not found");
            Ok(ExitCode::from(1))
        }
    }
}

async fn info(blob: PathBuf) -> CliResult<()> {
    let engine = LookupEngine::new(FileSource::open(&blob)?);
    let trailer = engine.trailer().await?;

    println!("version:      {}", trailer.version);
    println!("key_size:     {}", trailer.key_size);
    println!("entry_count:  {}", trailer.entry_count);
    println!("index_offset: {}", trailer.index_offset);
    println!("record_size:  {}", trailer.record_size());
    Ok(())
}
