use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pocketcalc::calculator;
use pocketcalc::config::Config;
use pocketcalc::history::HistoryStore;
use pocketcalc::session::Session;
use pocketcalc::storage::FileStorage;
use pocketcalc::{logging, repl};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;

/// A keypad calculator with persistent history.
#[derive(Parser, Debug)]
#[command(name = "pocketcalc", version, about)]
struct Cli {
    /// Config file (default: ~/.config/pocketcalc/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory the history is stored in
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Evaluate an expression and record it in history
    Eval {
        expression: String,
        /// Copy the result to the clipboard
        #[arg(long)]
        copy: bool,
        /// Do not record the result
        #[arg(long)]
        no_history: bool,
    },
    /// Show the live preview for an expression
    Preview { expression: String },
    /// List history, newest first
    History {
        /// Print the stored JSON instead
        #[arg(long)]
        json: bool,
    },
    /// Delete all history
    ClearHistory,
    /// Interactive keypad (the default)
    Repl,
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;

    let level = if cli.verbose {
        "debug"
    } else {
        config.logging.level.as_str()
    };
    logging::init(level);

    let data_dir = cli
        .data_dir
        .clone()
        .or_else(|| config.data_dir())
        .context("Could not determine a data directory; pass --data-dir")?;
    debug!(data_dir = %data_dir.display(), "Using history storage");

    let store = HistoryStore::with_capacity(
        FileStorage::new(data_dir),
        config.history.key.clone(),
        config.history.max_entries,
    );
    let mut session = Session::new(store).with_history_recording(config.history.enabled);

    match cli.command.unwrap_or(Command::Repl) {
        Command::Eval {
            expression,
            copy,
            no_history,
        } => {
            if no_history {
                session = session.with_history_recording(false);
            }

            match session.commit_expression(&expression) {
                Ok(Some(value)) => {
                    println!("{}", calculator::format_number(value));
                    if copy {
                        calculator::copy_result(value).map_err(anyhow::Error::msg)?;
                    }
                }
                Ok(None) => println!("{}", session.display().result),
                Err(e) => {
                    eprintln!("Error: {}", e);
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
        Command::Preview { expression } => {
            let preview = calculator::preview_evaluate(&expression);
            println!("{}", preview.as_deref().unwrap_or(pocketcalc::session::PENDING));
        }
        Command::History { json } => {
            let entries = session.history();
            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else {
                repl::write_history(entries, &mut io::stdout().lock())?;
            }
        }
        Command::ClearHistory => {
            session
                .history_store()
                .try_clear()
                .context("Failed to clear history")?;
            println!("History cleared");
        }
        Command::Repl => {
            let stdin = io::stdin();
            repl::run(&mut session, stdin.lock(), io::stdout().lock())?;
        }
    }

    Ok(ExitCode::SUCCESS)
}
