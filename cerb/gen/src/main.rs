//! Cerb Record Generator
//!
//! Reads the schema of a live Cerb instance and writes a typed records
//! module or a plain-text cheat sheet.

use std::path::PathBuf;
use std::time::Duration;

use cerb::{CerbClient, DEFAULT_BASE_URL};
use cerb_gen::cheat_sheet::CheatSheetBuilder;
use cerb_gen::errors::GeneratorError;
use cerb_gen::introspect::{ExampleQuery, Introspector};
use cerb_gen::output::{RecordsModuleBuilder, write_atomic};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::{filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Cerb record generator - turns a live Cerb schema into typed Rust wrappers
#[derive(Parser, Debug)]
#[command(name = "cerb-gen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    connection: ConnectionArgs,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
struct ConnectionArgs {
    /// REST API access key
    #[arg(long, env = "CERB_ACCESS_KEY", hide_env_values = true)]
    access_key: String,

    /// REST API secret
    #[arg(long, env = "CERB_SECRET", hide_env_values = true)]
    secret: String,

    /// REST base URL (e.g. https://cerb.example.com/rest/)
    #[arg(long, env = "CERB_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Per-request timeout in seconds (no timeout when absent)
    #[arg(long, value_name = "SECS")]
    timeout_secs: Option<u64>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate the typed records module
    Records {
        /// Output file [default: stdout]
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Generate a plain-text cheat sheet of every context
    CheatSheet {
        /// Output file [default: stdout]
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

/// Log directives for a `-v` count, used when `RUST_LOG` is unset or invalid.
fn verbosity_directives(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "warn,cerb=info,cerb_gen=info",
        2 => "warn,cerb=debug,cerb_gen=debug",
        _ => "info,cerb=trace,cerb_gen=trace",
    }
}

/// Installs the stderr subscriber.
///
/// JSON output carries the current span, so every `cerb_request` event
/// keeps its `http.*` fields.
fn init_tracing(verbose: u8, json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity_directives(verbose)));
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(verbose >= 2)
                    .with_file(verbose >= 3)
                    .with_line_number(verbose >= 3)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .init();
    }
}

async fn connect(args: &ConnectionArgs) -> Result<CerbClient, GeneratorError> {
    let mut builder = CerbClient::builder(args.access_key.as_str(), &args.secret)
        .base_url(args.base_url.as_str());
    if let Some(secs) = args.timeout_secs {
        if secs == 0 {
            return Err(GeneratorError::Config(
                "--timeout-secs must be greater than zero".to_string(),
            ));
        }
        builder = builder.timeout(Duration::from_secs(secs));
    }
    Ok(builder.connect().await?)
}

fn emit(content: &str, output: Option<&PathBuf>, what: &str) -> Result<(), GeneratorError> {
    match output {
        Some(path) => {
            write_atomic(path, content)?;
            eprintln!(
                "{} {} written to {}",
                "✓".green().bold(),
                what,
                path.display().to_string().cyan()
            );
        }
        None => print!("{content}"),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), GeneratorError> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.json);

    let client = connect(&cli.connection).await?;
    tracing::info!(
        version = client.version(),
        build = client.build(),
        base_url = %client.base_url(),
        "Connected to Cerb"
    );
    let introspector = Introspector::new(&client);

    match &cli.command {
        Commands::Records { output } => {
            let snapshot = introspector.snapshot(ExampleQuery::RECORDS).await?;
            let code = RecordsModuleBuilder::new(&snapshot).build()?;
            emit(&code, output.as_ref(), "Records module")?;
        }
        Commands::CheatSheet { output } => {
            let snapshot = introspector.snapshot(ExampleQuery::CHEAT_SHEET).await?;
            let sheet = CheatSheetBuilder::new(&snapshot).build();
            emit(&sheet, output.as_ref(), "Cheat sheet")?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verbosity_directives_parse() {
        for verbose in 0..=4 {
            let directives = verbosity_directives(verbose);
            assert!(EnvFilter::try_new(directives).is_ok(), "{directives}");
        }
        assert_eq!(verbosity_directives(0), "warn");
        assert!(verbosity_directives(1).contains("cerb=info"));
        assert_eq!(verbosity_directives(3), verbosity_directives(9));
    }

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_records_subcommand() {
        let cli = Cli::try_parse_from([
            "cerb-gen",
            "--access-key",
            "key",
            "--secret",
            "secret",
            "--base-url",
            "https://cerb.example.com/rest/",
            "records",
            "-o",
            "src/records.rs",
        ])
        .unwrap();

        assert_eq!(cli.connection.access_key, "key");
        assert_eq!(cli.connection.base_url, "https://cerb.example.com/rest/");
        match cli.command {
            Commands::Records { output } => {
                assert_eq!(output, Some(PathBuf::from("src/records.rs")));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_cheat_sheet_with_global_flags() {
        let cli = Cli::try_parse_from([
            "cerb-gen",
            "--access-key",
            "key",
            "--secret",
            "secret",
            "--timeout-secs",
            "30",
            "cheat-sheet",
            "-vv",
            "--json",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        assert!(cli.json);
        assert_eq!(cli.connection.timeout_secs, Some(30));
        assert!(matches!(cli.command, Commands::CheatSheet { output: None }));
    }
}
