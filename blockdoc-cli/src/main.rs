//! Command-line interface for blockdoc
//! Converts block documents (as JSON) to and from the supported external formats.
//!
//! Usage:
//!   blockdoc export `<doc.json>` --to `<format>` [--full-document]   - Print a document in a format
//!   blockdoc import `<file>` --from `<format>` [--root `<flavour>`]  - Print a payload as document JSON
//!   blockdoc formats                                               - List the registered formats
//!   blockdoc extensions                                            - List registered modules and capabilities
//!
//! Every command accepts `--config <file>` to layer a TOML file over the built-in defaults.
//! Conversion warnings are printed to stderr; errors exit with status 1.

use blockdoc_babel::{ConvertError, Converter, Diagnostics, Registry, TargetFormat};
use blockdoc_config::{BlockdocConfig, ConfigError, Loader};
use blockdoc_model::{Block, ModelError};
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::fs;
use std::io;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("cannot read '{path}': {source}")]
    Read { path: String, source: io::Error },
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error(transparent)]
    Convert(#[from] ConvertError),
}

fn cli() -> Command {
    let format_help = TargetFormat::ALL
        .iter()
        .map(TargetFormat::name)
        .collect::<Vec<_>>()
        .join(", ");

    Command::new("blockdoc")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert block documents to and from html, markdown, plain text and Notion formats")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .help("TOML configuration file layered over the defaults"),
        )
        .subcommand(
            Command::new("export")
                .about("Export a document JSON file to a format")
                .arg(
                    Arg::new("path")
                        .help("Path to the document JSON")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("to")
                        .long("to")
                        .short('t')
                        .required(true)
                        .help(format!("Target format ({})", format_help)),
                )
                .arg(
                    Arg::new("full-document")
                        .long("full-document")
                        .help("Wrap html output in a complete document")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("import")
                .about("Import a file and print the document as JSON")
                .arg(
                    Arg::new("path")
                        .help("Path to the payload")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("from")
                        .long("from")
                        .short('f')
                        .required(true)
                        .help(format!("Source format ({})", format_help)),
                )
                .arg(
                    Arg::new("root")
                        .long("root")
                        .help("Flavour of the created root block (default from config)"),
                ),
        )
        .subcommand(Command::new("formats").about("List the registered formats"))
        .subcommand(
            Command::new("extensions").about("List registered modules and their capabilities"),
        )
}

fn main() {
    let matches = cli().get_matches();

    let config = load_config(&matches).unwrap_or_else(|e| {
        eprintln!("Configuration error: {}", e);
        std::process::exit(1);
    });
    init_tracing(&config.logging.level);

    let registry = Registry::standard();
    let result = match matches.subcommand() {
        Some(("export", sub)) => handle_export_command(&registry, &config, sub),
        Some(("import", sub)) => handle_import_command(&registry, &config, sub),
        Some(("formats", _)) => {
            handle_formats_command(&registry);
            Ok(())
        }
        Some(("extensions", _)) => {
            handle_extensions_command(&registry);
            Ok(())
        }
        _ => Ok(()),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Defaults, then the `--config` file, then flags that map onto config keys.
fn load_config(matches: &ArgMatches) -> Result<BlockdocConfig, ConfigError> {
    let mut loader = Loader::new();
    if let Some(path) = matches.get_one::<String>("config") {
        loader = loader.with_file(path);
    }
    if let Some(("export", sub)) = matches.subcommand() {
        if sub.get_flag("full-document") {
            loader = loader.set_override("convert.html.full_document", true)?;
        }
    }
    loader.build()
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn read(path: &str) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_string(),
        source,
    })
}

fn format_arg(matches: &ArgMatches, name: &str) -> Result<TargetFormat, CliError> {
    let value = matches.get_one::<String>(name).map(String::as_str).unwrap_or_default();
    Ok(value.parse()?)
}

fn report(diagnostics: &Diagnostics) {
    for warning in diagnostics.warnings() {
        eprintln!("warning: {}", warning);
    }
}

/// Handle the export command
fn handle_export_command(
    registry: &Registry,
    config: &BlockdocConfig,
    matches: &ArgMatches,
) -> Result<(), CliError> {
    let format = format_arg(matches, "to")?;
    let path = matches.get_one::<String>("path").map(String::as_str).unwrap_or_default();
    let doc = Block::from_json(&read(path)?)?;
    debug!(path, format = %format, "exporting");

    let mut diagnostics = Diagnostics::new();
    let output = Converter::new(registry, &config.convert).export(&doc, format, &mut diagnostics);
    report(&diagnostics);

    let output = output?;
    if output.ends_with('\n') {
        print!("{}", output);
    } else {
        println!("{}", output);
    }
    Ok(())
}

/// Handle the import command
fn handle_import_command(
    registry: &Registry,
    config: &BlockdocConfig,
    matches: &ArgMatches,
) -> Result<(), CliError> {
    let format = format_arg(matches, "from")?;
    let path = matches.get_one::<String>("path").map(String::as_str).unwrap_or_default();
    let source = read(path)?;
    let root = matches.get_one::<String>("root").map(String::as_str);
    debug!(path, format = %format, "importing");

    let mut diagnostics = Diagnostics::new();
    let doc = Converter::new(registry, &config.convert).import(&source, format, root, &mut diagnostics);
    report(&diagnostics);

    println!("{}", doc?.to_json_pretty()?);
    Ok(())
}

/// Handle the formats command
fn handle_formats_command(registry: &Registry) {
    for format in registry.formats() {
        println!("  {:<12} {}", format.name(), format.description());
    }
}

/// Handle the extensions command
fn handle_extensions_command(registry: &Registry) {
    println!("Modules:");
    for module in registry.modules() {
        println!("  {}", module);
    }
    println!();
    println!("Capabilities:");
    for capability in registry.capabilities() {
        println!("  {}", capability.describe());
    }
}
