// In app/src/main.rs

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use app_config::Settings;
use clap::{Parser, Subcommand};
use codec::SchemaError;
use core_types::RecordKind;
use serde::Serialize;
use tracing_subscriber::prelude::*;

mod sample;

// --- Command-Line Interface Definition ---

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = "Encodes and decodes typed market records as JSON.")]
struct Cli {
    /// Read settings from this TOML file instead of the layered `config/` sources.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Indent JSON output.
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Decodes a JSON document and prints its canonical encoding.
    Decode {
        /// Input file. Reads stdin when omitted.
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Validate against this record kind's schema (e.g., "stock", "trade").
        #[arg(short, long)]
        kind: Option<RecordKind>,
    },

    /// Validates one JSON object against a record schema and reports every bad field.
    Validate {
        /// The record kind whose schema applies.
        #[arg(short, long)]
        kind: RecordKind,

        /// Input file. Reads stdin when omitted.
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Encodes the sample activity, decodes it back and checks the round trip.
    Demo,
}

// --- Main Application Entry Point ---

fn main() -> Result<()> {
    // Load environment variables from a .env file, if it exists.
    dotenvy::dotenv().ok();

    // Parse command-line arguments.
    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => app_config::load_settings_file(path)
            .with_context(|| format!("Failed to load settings from {}", path.display()))?,
        None => app_config::load_settings()?,
    };
    init_tracing(&settings.app.log_level);

    tracing::info!(environment = %settings.app.environment, "Starting recordctl");
    let pretty = cli.pretty || settings.codec.pretty;

    match cli.command {
        Commands::Decode { input, kind } => {
            handle_decode(input.as_deref(), kind, &settings, pretty)?;
        }
        Commands::Validate { kind, input } => {
            handle_validate(kind, input.as_deref())?;
        }
        Commands::Demo => {
            handle_demo(pretty)?;
        }
    }

    Ok(())
}

/// Logs go to stderr so stdout carries nothing but JSON.
fn init_tracing(log_level: &str) {
    let level = log_level.parse::<tracing::Level>().ok();
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(
            tracing_subscriber::filter::Targets::new()
                .with_default(level.unwrap_or(tracing::Level::INFO)),
        );
    tracing_subscriber::registry().with(fmt_layer).init();

    if level.is_none() {
        tracing::warn!(log_level, "Unrecognized log level; using info.");
    }
}

// --- Subcommand Logic ---

fn handle_decode(
    input: Option<&Path>,
    kind: Option<RecordKind>,
    settings: &Settings,
    pretty: bool,
) -> Result<()> {
    let text = read_input(input)?;

    let document = match (kind, settings.codec.strict) {
        (Some(kind), _) => codec::deserialize_with_schema(&text, codec::schema_for(kind))?,
        (None, true) => anyhow::bail!("Strict decoding is enabled; pass --kind to choose a schema."),
        (None, false) => codec::decode(&text)?,
    };

    let records = document.records();
    tracing::info!(records = records.len(), shape = document.shape(), "Decoded document.");
    for record in &records {
        tracing::debug!(kind = %record.kind(), symbol = record.symbol(), "Decoded record.");
    }

    println!("{}", render(&document, pretty)?);
    Ok(())
}

fn handle_validate(kind: RecordKind, input: Option<&Path>) -> Result<()> {
    let text = read_input(input)?;

    match codec::deserialize_with_schema(&text, codec::schema_for(kind)) {
        Ok(document) => {
            tracing::info!(%kind, shape = document.shape(), "Input satisfies the schema.");
            println!("ok");
            Ok(())
        }
        Err(SchemaError::Validation(err)) => {
            println!("{}", serde_json::to_string_pretty(&err.errors)?);
            anyhow::bail!(err)
        }
        Err(other) => Err(other.into()),
    }
}

fn handle_demo(pretty: bool) -> Result<()> {
    let activity = sample::activity();
    let json = render(&activity, pretty)?;
    println!("{json}");

    let decoded = codec::decode(&json)?;
    if decoded != activity {
        anyhow::bail!("Decoded activity differs from what was encoded.");
    }

    // The schema-validated path must agree on every record.
    for record in activity.records() {
        let strict = codec::serialize_with_schema(record)?;
        let back = codec::deserialize_with_schema(&strict, codec::schema_for(record.kind()))?;
        if back.as_record() != Some(record) {
            anyhow::bail!("Schema round trip changed the {} record for {}.", record.kind(), record.symbol());
        }
    }

    tracing::info!(records = decoded.records().len(), "Round trip verified.");
    Ok(())
}

// --- Helpers ---

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read stdin")?;
            Ok(buffer)
        }
    }
}

fn render<T: Serialize + ?Sized>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        codec::encode_pretty(value)?
    } else {
        codec::encode(value)?
    };
    Ok(json)
}
