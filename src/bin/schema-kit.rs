//! Schema Kit CLI
//!
//! Command-line interface for merging schemas, resolving pointers and
//! validating payloads.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use schema_kit::{load_document_auto, load_documents, merge_schemas, pointer, validate, ValidateError};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "schema-kit")]
#[command(about = "Merge JSON Schemas and resolve JSON Pointers")]
#[command(version)]
struct Cli {
    /// Verbose logging to stderr (-v, -vv, -vvv). Without it, RUST_LOG applies
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge schema fragments into one schema
    Merge {
        /// Schema sources: file paths or URLs (http:// or https://)
        #[arg(required = true)]
        schemas: Vec<String>,

        /// Output file (stdout if not specified)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Print the value a pointer resolves to
    Get {
        /// Document source: file path or URL
        document: String,

        /// JSON Pointer, e.g. /items/0/name or /users/role==admin
        #[arg(allow_hyphen_values = true)]
        pointer: String,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Print every leaf of a document keyed by its pointer
    Dict {
        /// Document source: file path or URL
        document: String,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Translate a data pointer to the schema location describing it
    SchemaPointer {
        /// Schema source: file path or URL
        schema: String,

        /// Pointer into a data instance
        #[arg(allow_hyphen_values = true)]
        data_pointer: String,
    },

    /// Translate a schema pointer to the data location it describes
    DataPointer {
        /// Schema source: file path or URL
        schema: String,

        /// Pointer into the schema
        #[arg(allow_hyphen_values = true)]
        schema_pointer: String,
    },

    /// Validate a payload against one or more merged schemas
    Validate {
        /// Payload source: file path or URL
        payload: String,

        /// Schema source, repeatable; all schemas are merged
        #[arg(long, required = true)]
        schema: Vec<String>,

        /// Output results as JSON (for automation)
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Merge {
            schemas,
            output,
            pretty,
        } => run_merge(&schemas, output, pretty),
        Commands::Get {
            document,
            pointer,
            pretty,
        } => run_get(&document, &pointer, pretty),
        Commands::Dict { document, pretty } => run_dict(&document, pretty),
        Commands::SchemaPointer {
            schema,
            data_pointer,
        } => run_translate(&schema, &data_pointer, pointer::to_schema_pointer::<str>),
        Commands::DataPointer {
            schema,
            schema_pointer,
        } => run_translate(&schema, &schema_pointer, pointer::to_data_pointer::<str>),
        Commands::Validate {
            payload,
            schema,
            json,
        } => run_validate(&payload, &schema, json),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => ExitCode::from(code),
    }
}

fn load(source: &str) -> Result<Value, u8> {
    load_document_auto(source).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })
}

fn run_merge(sources: &[String], output: Option<PathBuf>, pretty: bool) -> Result<(), u8> {
    let schemas = load_documents(sources).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;

    let merged = merge_schemas(&schemas).map_err(|e| {
        eprintln!("Error: {}", e);
        2u8
    })?;

    let text = render(&merged, pretty)?;
    match output {
        Some(path) => {
            std::fs::write(&path, &text).map_err(|e| {
                eprintln!("Error writing to {}: {}", path.display(), e);
                3u8
            })?;
        }
        None => {
            println!("{}", text);
        }
    }

    Ok(())
}

fn run_get(source: &str, pointer_text: &str, pretty: bool) -> Result<(), u8> {
    let document = load(source)?;
    let value = pointer::get(&document, pointer_text).map_err(|e| {
        eprintln!("Error: {}", e);
        1u8
    })?;
    println!("{}", render(value, pretty)?);
    Ok(())
}

fn run_dict(source: &str, pretty: bool) -> Result<(), u8> {
    let document = load(source)?;
    let leaves = Value::Object(pointer::dict(&document));
    println!("{}", render(&leaves, pretty)?);
    Ok(())
}

fn run_translate(
    schema_source: &str,
    pointer_text: &str,
    translate: fn(&str, &Value) -> Result<String, schema_kit::PointerError>,
) -> Result<(), u8> {
    let schema = load(schema_source)?;
    let translated = translate(pointer_text, &schema).map_err(|e| {
        eprintln!("Error: {}", e);
        1u8
    })?;
    println!("{}", translated);
    Ok(())
}

fn run_validate(payload_source: &str, schema_sources: &[String], json_output: bool) -> Result<(), u8> {
    let payload = load_document_auto(payload_source).map_err(|e| {
        report_error(json_output, &e.to_string());
        e.exit_code() as u8
    })?;
    let schemas = load_documents(schema_sources).map_err(|e| {
        report_error(json_output, &e.to_string());
        e.exit_code() as u8
    })?;

    match validate(&payload, &schemas) {
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

fn render(value: &Value, pretty: bool) -> Result<String, u8> {
    if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .map_err(|e| {
        eprintln!("Error serializing output: {}", e);
        2u8
    })
}

/// Output an error message in plain text or JSON format.
fn report_error(json_output: bool, msg: &str) {
    if json_output {
        println!("{}", serde_json::json!({ "valid": false, "error": msg }));
    } else {
        eprintln!("Error: {}", msg);
    }
}
