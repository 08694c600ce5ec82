//! Udyam form schema extractor entry point.

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use udyam_form_cli::commands::{check, scrape, survey, validate};
use udyam_form_cli::output;

#[derive(Parser)]
#[command(
    name = "udyam-form",
    about = "Extract the Udyam registration form schema (steps, fields, validation rules) to JSON",
    version,
    after_help = "Run 'udyam-form <command> --help' for details on each command.\nRun 'udyam-form' with no command to scrape with default settings."
)]
struct Cli {
    /// Output results as JSON (machine-readable).
    #[arg(long, global = true)]
    json: bool,

    /// Suppress non-essential output.
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the form schema and write it to a JSON file (default).
    Scrape {
        /// Output file (default: udyam_form_schema.json, or $UDYAM_SCHEMA_FILE).
        #[arg(short, long)]
        output: Option<String>,
        /// Registration page URL (default: the public portal, or $UDYAM_FORM_URL).
        #[arg(long)]
        url: Option<String>,
        /// Request timeout in milliseconds (default: 15000, or $UDYAM_TIMEOUT_MS).
        #[arg(long)]
        timeout_ms: Option<u64>,
        /// Do not contact the portal; write the built-in schema.
        #[arg(long)]
        offline: bool,
    },
    /// Check that a written schema is internally consistent.
    Check {
        /// Schema file to check.
        #[arg(short, long)]
        schema: Option<String>,
    },
    /// Validate a value against one field of the schema.
    Validate {
        /// Field name (e.g. "pan_number").
        #[arg(long)]
        field: String,
        /// Value to check.
        #[arg(long)]
        value: String,
        /// Schema file to validate against (default: the written schema, else built-in).
        #[arg(short, long)]
        schema: Option<String>,
    },
    /// List the inputs present in the live registration page.
    Survey {
        /// Registration page URL.
        #[arg(long)]
        url: Option<String>,
        /// Request timeout in milliseconds.
        #[arg(long)]
        timeout_ms: Option<u64>,
    },
    /// Generate shell completion scripts.
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish).
        shell: Shell,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.json {
        std::env::set_var(output::ENV_JSON, "1");
    }
    if cli.quiet {
        std::env::set_var(output::ENV_QUIET, "1");
    }

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        None => scrape::run(&scrape::ScrapeOptions::default()).await,

        Some(Commands::Scrape {
            output,
            url,
            timeout_ms,
            offline,
        }) => {
            let opts = scrape::ScrapeOptions {
                output,
                url,
                timeout_ms,
                offline,
            };
            scrape::run(&opts).await
        }
        Some(Commands::Check { schema }) => check::run(schema.as_deref()),
        Some(Commands::Validate {
            field,
            value,
            schema,
        }) => validate::run(schema.as_deref(), &field, &value),
        Some(Commands::Survey { url, timeout_ms }) => {
            survey::run(url.as_deref(), timeout_ms).await
        }
        Some(Commands::Completions { shell }) => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "udyam-form", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = &result {
        if output::is_json() {
            output::print_json(&serde_json::json!({
                "error": true,
                "message": format!("{e:#}"),
            }));
        } else if !output::is_quiet() {
            eprintln!("  Error: {e:#}");
        }
        std::process::exit(1);
    }

    result
}
