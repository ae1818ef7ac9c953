//! Schema Fetch CLI
//!
//! Command-line interface for fetching JSON documents and validating
//! instances against schemas whose `$ref`s are fetched on demand.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use schema_fetch::{
    parse_json, read_text, root_schema, validate_instance, validator_for, FetchingSchemaStore,
    SchemaStore, ValidateError,
};
use tracing_subscriber::EnvFilter;

/// Label for parse errors on instance documents.
const INSTANCE_LABEL: &str = "JSON instance";

#[derive(Parser)]
#[command(name = "schema-fetch")]
#[command(about = "Fetch JSON Schemas from stdin, URLs or files")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a document and print it as JSON
    Fetch {
        /// Source: "-" for stdin, a URL, or a file path
        address: String,

        /// HTTP header for remote fetches, as "Name: Value" (repeatable)
        #[arg(long = "http-header", short = 'H', value_name = "HEADER")]
        http_headers: Vec<String>,

        /// Output file (stdout if not specified)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Validate an instance against a schema, fetching $ref targets as needed
    Validate {
        /// Instance to validate: "-" for stdin, a URL, or a file path
        instance: String,

        /// Schema source: "-" for stdin, a URL, or a file path
        #[arg(long)]
        schema: String,

        /// HTTP header for remote fetches, as "Name: Value" (repeatable)
        #[arg(long = "http-header", short = 'H', value_name = "HEADER")]
        http_headers: Vec<String>,

        /// Output results as JSON (for automation)
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Fetch {
            address,
            http_headers,
            output,
            pretty,
        } => run_fetch(&address, &http_headers, output, pretty),

        Commands::Validate {
            instance,
            schema,
            http_headers,
            json,
        } => run_validate(&instance, &schema, &http_headers, json),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => ExitCode::from(code),
    }
}

/// Log to stderr so stdout carries only command output.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run_fetch(
    address: &str,
    http_headers: &[String],
    output: Option<PathBuf>,
    pretty: bool,
) -> Result<(), u8> {
    let store = FetchingSchemaStore::with_headers(http_headers).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;

    let document = store.fetch(address).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;

    let json_output = if pretty {
        serde_json::to_string_pretty(&document)
    } else {
        serde_json::to_string(&document)
    }
    .map_err(|e| {
        eprintln!("Error serializing output: {}", e);
        2u8
    })?;

    match output {
        Some(path) => {
            std::fs::write(&path, &json_output).map_err(|e| {
                eprintln!("Error writing to {}: {}", path.display(), e);
                3u8
            })?;
        }
        None => {
            println!("{}", json_output);
        }
    }

    Ok(())
}

fn run_validate(
    instance_address: &str,
    schema_address: &str,
    http_headers: &[String],
    json_output: bool,
) -> Result<(), u8> {
    let store = FetchingSchemaStore::with_headers(http_headers).map_err(|e| {
        report_error(json_output, &e.to_string());
        e.exit_code() as u8
    })?;

    let instance = read_text(instance_address, store.headers())
        .and_then(|text| parse_json(&text, INSTANCE_LABEL, instance_address))
        .map_err(|e| {
            report_error(json_output, &format!("loading instance: {}", e));
            e.exit_code() as u8
        })?;

    let schema = root_schema(&store, schema_address).map_err(|e| {
        report_error(json_output, &format!("loading schema: {}", e));
        e.exit_code() as u8
    })?;

    let result =
        validator_for(&schema, store).and_then(|validator| validate_instance(&validator, &instance));

    match result {
        Ok(()) => {
            if json_output {
                println!(r#"{{"valid":true}}"#);
            } else {
                println!("Valid");
            }
            Ok(())
        }
        Err(ValidateError::Invalid { errors }) => {
            if json_output {
                let output = serde_json::json!({
                    "valid": false,
                    "errors": errors
                });
                println!("{}", output);
            } else {
                eprintln!("Validation failed:");
                for error in errors {
                    eprintln!("  {}", error);
                }
            }
            Err(1)
        }
        Err(e) => {
            report_error(json_output, &e.to_string());
            Err(e.exit_code() as u8)
        }
    }
}

/// Output an error message in plain text or JSON format.
fn report_error(json_output: bool, msg: &str) {
    if json_output {
        println!("{}", serde_json::json!({ "valid": false, "error": msg }));
    } else {
        eprintln!("Error: {}", msg);
    }
}
