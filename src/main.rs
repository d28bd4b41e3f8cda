//! Interactive shell for cityfinder.
//!
//! Reads one command per line from stdin while search completions arrive from the
//! worker, and applies both on the same task:
//!
//! ```text
//! stdin lines ──┐
//!               ├── tokio::select! ──▶ CatalogService ──▶ stdout
//! worker ───────┘
//! ```
//!
//! # Commands
//!
//! - `search <query>`: search cities
//! - `results`: list the latest results
//! - `select <n>`: select result `n`
//! - `details`: show the selected city
//! - `fav`: toggle the selected city as a favorite
//! - `favs [filter]`: list favorites, optionally fuzzy-filtered
//! - `help`, `quit`

use clap::Parser;
use cityfinder::app::CatalogEvent;
use cityfinder::observability::init_tracing;
use cityfinder::remote::ReqwestTransport;
use cityfinder::storage::MemoryStore;
use cityfinder::ui::{render_detail, render_favorites, render_results, CatalogViewModel, CityDetail};
use cityfinder::{CatalogService, Config, IdentityPolicy};
use std::io::Write as _;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast;

const HELP: &str = "\
Commands:
  search <query>   search cities by name
  results          list the latest results
  select <n>       select result n
  details          show the selected city
  fav              add or remove the selected city from favorites
  favs [filter]    list favorite cities
  help             show this help
  quit             exit
";

/// Command-line options.
#[derive(Parser, Debug)]
#[command(name = "cityfinder", version, about = "Search cities and keep favorites")]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Search endpoint URL.
    #[arg(long)]
    endpoint: Option<String>,

    /// Account name sent with every search.
    #[arg(long)]
    username: Option<String>,

    /// Maximum results per search.
    #[arg(long)]
    max_rows: Option<u32>,

    /// Directory for the favorites store and log file.
    #[arg(long)]
    data_dir: Option<String>,

    /// Tracing filter, e.g. `debug` or `cityfinder=trace`.
    #[arg(long)]
    trace_level: Option<String>,

    /// Identifier policy for decoded cities: `fresh` or `content`.
    #[arg(long)]
    identity: Option<String>,

    /// Keep favorites in memory only.
    #[arg(long)]
    ephemeral: bool,
}

impl Cli {
    /// Loads the config file, if any, then applies flag overrides.
    fn resolve_config(&self) -> cityfinder::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_toml_file(path)?,
            None => Config::default(),
        };

        if let Some(endpoint) = &self.endpoint {
            config.endpoint.clone_from(endpoint);
        }
        if let Some(username) = &self.username {
            config.username.clone_from(username);
        }
        if let Some(max_rows) = self.max_rows.filter(|n| *n > 0) {
            config.max_rows = max_rows;
        }
        if let Some(identity) = &self.identity {
            config.identity = IdentityPolicy::from_name(identity).ok_or_else(|| {
                cityfinder::CityfinderError::Config(format!("unknown identity policy: {identity}"))
            })?;
        }
        if self.data_dir.is_some() {
            config.data_dir.clone_from(&self.data_dir);
        }
        if self.trace_level.is_some() {
            config.trace_level.clone_from(&self.trace_level);
        }
        Ok(config)
    }
}

/// One shell command.
#[derive(Debug, PartialEq, Eq)]
enum Command {
    Search(String),
    Results,
    Select(usize),
    Details,
    Fav,
    Favs(String),
    Help,
    Quit,
}

fn parse_command(input: &str) -> Result<Option<Command>, String> {
    let trimmed = input.trim();
    let (command, rest) = trimmed
        .split_once(char::is_whitespace)
        .map_or((trimmed, ""), |(c, r)| (c, r.trim()));

    match command.to_lowercase().as_str() {
        "" => Ok(None),
        "search" | "s" => Ok(Some(Command::Search(rest.to_string()))),
        "results" | "r" => Ok(Some(Command::Results)),
        "select" => {
            let n = rest
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| "usage: select <n>".to_string())?;
            Ok(Some(Command::Select(n)))
        }
        "details" | "d" => Ok(Some(Command::Details)),
        "fav" => Ok(Some(Command::Fav)),
        "favs" => Ok(Some(Command::Favs(rest.to_string()))),
        "help" | "?" => Ok(Some(Command::Help)),
        "quit" | "exit" | "q" => Ok(Some(Command::Quit)),
        other => Err(format!("unknown command: {other} (try `help`)")),
    }
}

/// Runs one command. Returns `false` when the shell should exit.
fn run_command(catalog: &mut CatalogService, command: Command) -> bool {
    match command {
        Command::Search(query) => {
            let label = query.clone();
            let result = catalog.search(&query, move |outcome| match outcome {
                Ok(cities) => println!("\"{label}\": {} cities", cities.len()),
                Err(e) => println!("\"{label}\": {e}"),
            });
            if let Err(e) = result {
                println!("error: {e}");
            }
        }
        Command::Results => {
            print!("{}", render_results(&CatalogViewModel::from_state(catalog.state(), "")));
        }
        Command::Select(n) => {
            if catalog.select(n - 1) {
                if let Ok(city) = catalog.selected_detail() {
                    println!("Selected {}", city.title);
                }
            } else {
                println!("No result {n}");
            }
        }
        Command::Details => match catalog.selected_detail() {
            Ok(city) => print!("{}", render_detail(&CityDetail::from_city(city, catalog.is_favorite(city)))),
            Err(e) => println!("{e}"),
        },
        Command::Fav => match catalog.selected_detail().cloned() {
            Ok(city) => {
                if catalog.toggle_favorite(&city) {
                    println!("Added {} to favorites", city.title);
                } else {
                    println!("Removed {} from favorites", city.title);
                }
            }
            Err(e) => println!("{e}"),
        },
        Command::Favs(filter) => {
            print!("{}", render_favorites(&CatalogViewModel::from_state(catalog.state(), &filter)));
        }
        Command::Help => print!("{HELP}"),
        Command::Quit => return false,
    }
    true
}

/// Prints events the commands do not already report.
fn report_events(events: &mut broadcast::Receiver<CatalogEvent>) {
    loop {
        match events.try_recv() {
            Ok(CatalogEvent::PersistFailed { message }) => {
                println!("warning: favorites were not saved: {message}");
            }
            Ok(_) => {}
            Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                tracing::debug!(skipped, "shell lagged behind catalog events");
            }
            Err(_) => break,
        }
    }
}

fn prompt() {
    print!("> ");
    let _ = std::io::stdout().flush();
}

async fn run_shell(mut catalog: CatalogService) -> cityfinder::Result<()> {
    let mut events = catalog.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    print!("{HELP}");
    prompt();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                match parse_command(&line) {
                    Ok(Some(command)) => {
                        if !run_command(&mut catalog, command) {
                            break;
                        }
                    }
                    Ok(None) => {}
                    Err(message) => println!("{message}"),
                }
                report_events(&mut events);
                prompt();
            }
            Some(response) = catalog.next_response() => {
                println!();
                if catalog.handle_worker_response(response) {
                    print!("{}", render_results(&CatalogViewModel::from_state(catalog.state(), "")));
                }
                report_events(&mut events);
                prompt();
            }
        }
    }

    catalog.shutdown().await;
    tracing::info!(pending = catalog.pending(), "shell exiting");
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match cli.resolve_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("cityfinder: {e}");
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&config);

    let catalog = if cli.ephemeral {
        CatalogService::with_storage(&config, Box::new(MemoryStore::new()), Arc::new(ReqwestTransport::new()))
    } else {
        CatalogService::from_config(&config)
    };

    let result = match catalog {
        Ok(catalog) => run_shell(catalog).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "cityfinder failed");
            eprintln!("cityfinder: {e}");
            ExitCode::FAILURE
        }
    }
}
