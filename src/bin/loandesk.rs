use std::path::Path;

use arrrg::CommandLine;
use arrrg_derive::CommandLine;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::EnvFilter;

use loandesk::cli_utils::OutputFormat;
use loandesk::commands::errors::format_cli_error;
use loandesk::commands::{Console, Flow, USAGE};
use loandesk::{ClientConfig, Overrides};

#[derive(CommandLine, Default, PartialEq, Eq)]
struct Options {
    #[arrrg(optional, "Base URL of the loan-management API")]
    base_url: Option<String>,
    #[arrrg(optional, "Path to a JSON or YAML config file")]
    config: Option<String>,
    #[arrrg(optional, "Output format for records: table, json or yaml (default: table)")]
    output: Option<OutputFormat>,
    #[arrrg(flag, "Enable verbose logging")]
    verbose: bool,
}

const HELP_TEXT: &str = r#"loandesk - loan-management admin console

USAGE:
    loandesk [OPTIONS]

OPTIONS:
    --base-url <URL>     Base URL of the API [default: http://localhost:8080/api]
    --config <PATH>      JSON or YAML config file with base_url, output and log_filter
    --output <FORMAT>    Output format for records: table, json or yaml [default: table]
    --verbose            Enable verbose logging

ENVIRONMENT:
    LOANDESK_BASE_URL    Base URL used when --base-url is not given
    RUST_LOG             Log filter, overriding the config file and --verbose

The console commands follow."#;

fn init_logging(config: &ClientConfig, verbose: bool) {
    let fallback = match (&config.log_filter, verbose) {
        (Some(filter), _) => filter.clone(),
        (None, true) => "debug".to_string(),
        (None, false) => "warn".to_string(),
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (options, free) = Options::from_command_line_relaxed("USAGE: loandesk [OPTIONS]");

    if !free.is_empty() {
        if free[0] == "help" {
            println!("{}\n\n{}", HELP_TEXT, USAGE);
            return Ok(());
        }
        eprintln!("Unexpected argument '{}'\n\n{}", free[0], HELP_TEXT);
        std::process::exit(1);
    }

    let overrides = Overrides {
        base_url: options.base_url,
        output: options.output,
    };
    let config = match ClientConfig::load(options.config.as_deref().map(Path::new), overrides) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", format_cli_error(&e));
            std::process::exit(1);
        }
    };
    init_logging(&config, options.verbose);
    tracing::debug!(base_url = %config.base_url, output = %config.output, "starting console");

    let mut console = match Console::from_config(&config) {
        Ok(console) => console,
        Err(e) => {
            eprintln!("{}", format_cli_error(&e));
            std::process::exit(1);
        }
    };

    println!("loandesk console for {}", config.base_url);
    println!("Log in with 'login <username> <password>'; 'help' lists every command.");

    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        stdout.write_all(console.prompt().as_bytes()).await?;
        stdout.flush().await?;
        let Some(line) = lines.next_line().await? else {
            stdout.write_all(b"\n").await?;
            break;
        };
        let flow = console.execute(&line).await;
        for text in console.take_output() {
            stdout.write_all(text.as_bytes()).await?;
            stdout.write_all(b"\n").await?;
        }
        if flow == Flow::Quit {
            break;
        }
    }
    Ok(())
}
