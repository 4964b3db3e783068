//! Fleetfile CLI (fleetctl)
//!
//! Command-line tool for working with fleetfile store files.
//!
//! ## Overview
//!
//! `fleetctl` provides a small toolbox around store files:
//! - **generate**: Build a store of synthetic waveform records
//! - **keys**: List every key in a store
//! - **read**: Fetch one or more records by key
//! - **info**: Show header and schema details, including for half-written files
//!
//! ## Installation
//!
//! ```bash
//! # Build from source
//! cargo build --release -p fleetfile-cli
//!
//! # Binary will be at ./target/release/fleetctl
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! # Generate a 100-key store of synthetic waveforms
//! fleetctl generate demo.flt --keys 100
//!
//! # Inspect it
//! fleetctl info demo.flt
//! fleetctl keys demo.flt
//!
//! # Read records (integer-looking arguments are integer keys)
//! fleetctl read demo.flt 0 1 2
//! fleetctl read demo.flt 0 --json
//! ```
//!
//! ## Architecture
//!
//! The CLI uses:
//! - **clap**: For argument parsing and help generation
//! - **anyhow**: For ergonomic error handling
//! - **serde_json**: For JSON output of records
//! - **rand**: For deterministic synthetic data (seeded)
//!
//! Logging from the storage layer is off by default; set `RUST_LOG=debug`
//! to watch open/append/finalize activity.

use std::fs::{File, OpenOptions};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use fleetfile_core::{Key, Value};
use fleetfile_storage::{FileReader, FileWriter};

#[derive(Parser)]
#[command(name = "fleetctl")]
#[command(about = "Fleetfile store command-line tool", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a store of synthetic waveform records
    Generate {
        /// Output path (overwritten if it exists)
        path: PathBuf,
        /// Number of keys to generate
        #[arg(long, default_value = "100")]
        keys: u64,
        /// RNG seed for reproducible stores
        #[arg(long, default_value = "1248")]
        seed: u64,
        /// Short waveform leads per record
        #[arg(long, default_value = "12")]
        short_leads: usize,
        /// Samples per short lead
        #[arg(long, default_value = "128")]
        short_samples: usize,
        /// Long waveform leads per record
        #[arg(long, default_value = "3")]
        long_leads: usize,
        /// Samples per long lead
        #[arg(long, default_value = "512")]
        long_samples: usize,
    },
    /// List all keys in a store
    Keys {
        /// Store file path
        path: PathBuf,
    },
    /// Read one or more records by key
    Read {
        /// Store file path
        path: PathBuf,
        /// Keys to read; integer-looking arguments are integer keys
        #[arg(required = true)]
        keys: Vec<String>,
        /// Emit records as a JSON object keyed by the requested keys
        #[arg(long)]
        json: bool,
    },
    /// Show header and schema details
    Info {
        /// Store file path
        path: PathBuf,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Generate {
            path,
            keys,
            seed,
            short_leads,
            short_samples,
            long_leads,
            long_samples,
        } => handle_generate(
            path,
            keys,
            seed,
            short_leads,
            short_samples,
            long_leads,
            long_samples,
        ),
        Commands::Keys { path } => handle_keys(path),
        Commands::Read { path, keys, json } => handle_read(path, keys, json),
        Commands::Info { path } => handle_info(path),
    }
}

/// Parse a CLI key argument: anything that parses as an integer is an
/// integer key, everything else is a string key.
fn parse_key(arg: &str) -> Key {
    match arg.parse::<i64>() {
        Ok(n) => Key::Int(n),
        Err(_) => Key::Str(arg.to_string()),
    }
}

/// Render one record value as JSON. Byte strings become lowercase hex so
/// the output stays printable.
fn value_to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Int(n) => serde_json::json!(n),
        Value::Float(x) => serde_json::json!(x),
        Value::Str(s) => serde_json::json!(s),
        Value::Bytes(b) => {
            let hex: String = b.iter().map(|byte| format!("{:02x}", byte)).collect();
            serde_json::json!(hex)
        }
        Value::IntList(v) => serde_json::json!(v),
        Value::FloatList(v) => serde_json::json!(v),
        Value::StrList(v) => serde_json::json!(v),
    }
}

/// One-line human summary of a value, without dumping full payloads
fn value_summary(value: &Value) -> String {
    match value {
        Value::Int(n) => format!("int {}", n),
        Value::Float(x) => format!("float {}", x),
        Value::Str(s) => format!("str {:?}", s),
        Value::Bytes(b) => format!("bytes [{} bytes]", b.len()),
        Value::IntList(v) => format!("int_list [{} items]", v.len()),
        Value::FloatList(v) => format!("float_list [{} items]", v.len()),
        Value::StrList(v) => format!("str_list [{} items]", v.len()),
    }
}

/// Generates a store of synthetic multi-lead waveform records.
///
/// Each record holds `short_leads` float lists of `short_samples` values
/// and `long_leads` float lists of `long_samples` values, the shape of an
/// ECG-style training set. Generation is deterministic for a given seed.
#[allow(clippy::too_many_arguments)]
fn handle_generate(
    path: PathBuf,
    keys: u64,
    seed: u64,
    short_leads: usize,
    short_samples: usize,
    long_leads: usize,
    long_samples: usize,
) -> Result<()> {
    let handle = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(true)
        .open(&path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    let mut rng = StdRng::seed_from_u64(seed);
    let mut writer = FileWriter::open(handle).context("Failed to initialize store")?;

    for key in 0..keys {
        let mut record = Vec::with_capacity(short_leads + long_leads);
        for _ in 0..short_leads {
            let lead: Vec<f64> = (0..short_samples).map(|_| rng.random::<f64>()).collect();
            record.push(Value::FloatList(lead));
        }
        for _ in 0..long_leads {
            let lead: Vec<f64> = (0..long_samples).map(|_| rng.random::<f64>()).collect();
            record.push(Value::FloatList(lead));
        }
        writer
            .append(key as i64, &record)
            .with_context(|| format!("Failed to append key {}", key))?;
    }
    writer.finish().context("Failed to finalize store")?;

    let file_len = std::fs::metadata(&path)?.len();
    println!("✅ Store generated:");
    println!("  Path: {}", path.display());
    println!("  Keys: {}", keys);
    println!("  Fields per record: {}", short_leads + long_leads);
    println!("  Size: {} bytes", file_len);

    Ok(())
}

/// Lists every key in a store, sorted (integer keys before string keys).
fn handle_keys(path: PathBuf) -> Result<()> {
    let file =
        File::open(&path).with_context(|| format!("Failed to open {}", path.display()))?;
    let mut reader = FileReader::open(file).context("Failed to open store")?;

    let keys = reader.keys().context("Failed to load key index")?;
    if keys.is_empty() {
        println!("No keys found");
    } else {
        println!("Keys ({}):", keys.len());
        for key in keys {
            println!("  - {}", key);
        }
    }

    Ok(())
}

/// Reads records for the given keys.
///
/// ## Output
/// - Default: a per-key summary line for each field
/// - `--json`: one JSON object mapping each requested key to its record
///
/// The whole command fails if any requested key is absent.
fn handle_read(path: PathBuf, key_args: Vec<String>, json: bool) -> Result<()> {
    let file =
        File::open(&path).with_context(|| format!("Failed to open {}", path.display()))?;
    let mut reader = FileReader::open(file).context("Failed to open store")?;

    let keys: Vec<Key> = key_args.iter().map(|arg| parse_key(arg)).collect();
    let records = reader
        .read_many(keys.iter().cloned())
        .context("Failed to read records")?;

    if json {
        let mut object = serde_json::Map::new();
        for (key, record) in keys.iter().zip(&records) {
            let fields: Vec<serde_json::Value> = record.iter().map(value_to_json).collect();
            object.insert(key.to_string(), serde_json::Value::Array(fields));
        }
        println!("{}", serde_json::to_string_pretty(&object)?);
    } else {
        for (key, record) in keys.iter().zip(&records) {
            println!("{}:", key);
            for (i, value) in record.iter().enumerate() {
                println!("  _{}: {}", i, value_summary(value));
            }
        }
    }

    Ok(())
}

/// Shows header and schema details for a store file.
///
/// Works on unfinalized files too: the header is readable even when the
/// index is not, which is exactly what you want when inspecting the
/// leftovers of an interrupted writer.
fn handle_info(path: PathBuf) -> Result<()> {
    let file =
        File::open(&path).with_context(|| format!("Failed to open {}", path.display()))?;
    let file_len = file.metadata()?.len();
    let reader = FileReader::open(file).context("Failed to open store")?;

    let header = reader.header();
    println!("Store: {}", path.display());
    println!("  Size: {} bytes", file_len);
    println!("  Keys: {}", header.key_count);
    if header.is_finalized() {
        println!("  Index offset: {}", header.index_offset);
    } else {
        println!("  Index offset: unset (file was never finalized)");
    }
    match reader.schema() {
        Some(schema) => {
            println!("  Schema ({} fields):", schema.len());
            for field in schema.fields() {
                println!("    {}: {}", field.name, field.dtype);
            }
        }
        None => println!("  Schema: none (no records)"),
    }

    Ok(())
}
