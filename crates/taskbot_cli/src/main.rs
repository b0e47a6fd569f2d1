use clap::Parser;
use clap::error::ErrorKind;
use std::io::{self, Write};
use std::path::PathBuf;
use taskbot_cli::chat::ChatSession;
use taskbot_cli::cli::{Cli, TaskCommand};
use taskbot_cli::render;
use taskbot_core::config::{self, Config};
use taskbot_core::error::AppError;
use taskbot_core::responder::responder_from_config;
use taskbot_core::storage::json_store;
use tracing_subscriber::EnvFilter;

const LOG_ENV_VAR: &str = "TASKBOT_LOG";

fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .try_init()
        .ok();
}

fn normalize_parse_error(err: clap::Error) -> AppError {
    let rendered = err.to_string();
    let first_line = rendered.lines().next().unwrap_or("invalid command").trim();
    let message = first_line
        .strip_prefix("error: ")
        .unwrap_or(first_line)
        .to_string();
    AppError::invalid_input(message)
}

fn resolve_config(cli: &Cli) -> Result<Config, AppError> {
    let overrides = cli
        .config_override
        .iter()
        .map(|raw| config::parse_config_override(raw))
        .collect::<Result<Vec<_>, _>>()?;

    let loaded = config::load_config_with_fallback();
    if let Some(err) = loaded.error {
        tracing::warn!(error = %err, "ignoring unreadable config, using defaults");
    }

    Ok(config::merge_overrides(&loaded.config, &overrides))
}

fn store_path(cli: &Cli, config: &Config) -> PathBuf {
    cli.store
        .clone()
        .unwrap_or_else(|| json_store::store_path(config.store_path.as_deref()))
}

fn run_chat(cli: &Cli, config: &Config) -> Result<(), AppError> {
    let store = store_path(cli, config);
    let responder = responder_from_config(&config.responder)?;

    let session = ChatSession {
        store: &store,
        responder: responder.as_ref(),
        json: cli.json,
        max_history_messages: config.responder.max_history_messages,
    };

    let stdin = io::stdin();
    let stdout = io::stdout();
    let stderr = io::stderr();
    session.run(stdin.lock(), &mut stdout.lock(), &mut stderr.lock())
}

fn run(cli: Cli) -> Result<(), AppError> {
    let config = resolve_config(&cli)?;

    let Some(text) = cli.command_text() else {
        return run_chat(&cli, &config);
    };

    let store = store_path(&cli, &config);
    let command = TaskCommand::parse(&text)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    render::run_command(&store, &command, cli.json, &mut out)?;
    out.flush()?;
    Ok(())
}

fn main() {
    init_tracing();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        Err(err) => {
            eprintln!("ERROR: {}", normalize_parse_error(err));
            std::process::exit(1);
        }
    };

    if let Err(err) = run(cli) {
        eprintln!("ERROR: {}", err);
        std::process::exit(1);
    }
}
