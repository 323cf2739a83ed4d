use std::net::SocketAddr;
use std::process;

use clap::{Parser, Subcommand};
use contracts::{StatDeltas, TurnReport};
use kernel_api::{ApiConfig, GameApi, StoreBackend};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "grad-survival")]
#[command(about = "Survive graduate school one day at a time")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the JSON API
    Serve {
        /// Bind address (overrides GRAD_SURVIVAL_ADDR)
        #[arg(long)]
        addr: Option<SocketAddr>,

        /// SQLite database path, or ":memory:" (overrides GRAD_SURVIVAL_SQLITE_PATH)
        #[arg(long)]
        sqlite: Option<String>,

        /// Event generator seed (overrides GRAD_SURVIVAL_SEED)
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Print the action catalog
    Actions,
    /// Print the random event table
    Events,
    /// Play the given actions on a fresh session
    Play {
        #[arg(long, default_value = "0")]
        seed: u64,

        #[arg(required = true)]
        actions: Vec<String>,
    },
    /// Play random actions until the session ends
    Simulate {
        #[arg(long, default_value = "0")]
        seed: u64,

        #[arg(long, default_value = "1000")]
        max_turns: u32,

        /// Persist the finished session to this SQLite database
        #[arg(long)]
        sqlite: Option<String>,
    },
}

fn format_changes(changes: &StatDeltas) -> String {
    if changes.is_empty() {
        return "-".to_string();
    }
    changes
        .iter()
        .map(|(key, delta)| format!("{key}{delta:+}"))
        .collect::<Vec<_>>()
        .join(" ")
}

fn print_turn(action: &str, report: &TurnReport) {
    let session = &report.game_state;
    println!(
        "semester {} day {:>2} | {:<12} | {}",
        session.semester,
        session.day,
        action,
        format_changes(&report.changes)
    );
    if let Some(event) = &report.event {
        println!("    event: {} ({:?})", event.title, event.polarity);
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), String> {
    let rendered =
        serde_json::to_string_pretty(value).map_err(|err| format!("failed to render json: {err}"))?;
    println!("{rendered}");
    Ok(())
}

async fn run_serve(
    addr: Option<SocketAddr>,
    sqlite: Option<String>,
    seed: Option<u64>,
) -> Result<(), String> {
    let config = ApiConfig::from_env()
        .map_err(|err| err.to_string())?
        .with_overrides(addr, sqlite.as_deref(), seed);

    println!("serving api on http://{}", config.bind_addr);
    kernel_api::serve(config)
        .await
        .map_err(|err| format!("server error: {err}"))
}

fn run_play(seed: u64, actions: &[String]) -> Result<(), String> {
    let mut api = GameApi::in_memory(Some(seed));
    let game = api.create_game().map_err(|err| err.to_string())?;

    let mut session = game;
    for action in actions {
        let report = api
            .perform_action(&session.id, action)
            .map_err(|err| err.to_string())?;
        print_turn(action, &report);
        session = report.game_state;
        if session.is_terminal() {
            break;
        }
    }

    println!("{session}");
    println!("outcome: {}", session.outcome());
    Ok(())
}

fn run_simulate(seed: u64, max_turns: u32, sqlite: Option<String>) -> Result<(), String> {
    let store = sqlite
        .as_deref()
        .map(StoreBackend::from_path)
        .unwrap_or(StoreBackend::Memory);
    let persisted = matches!(store, StoreBackend::Sqlite(_));
    let mut api = GameApi::new(
        store.open().map_err(|err| format!("failed to open store: {err}"))?,
        Some(seed),
    );
    let action_ids: Vec<String> = api.actions().into_iter().map(|action| action.id).collect();
    let mut policy = StdRng::seed_from_u64(seed.wrapping_add(1));

    let mut session = api.create_game().map_err(|err| err.to_string())?;
    let mut turns = 0;
    while !session.is_terminal() && turns < max_turns {
        let Some(action) = action_ids.choose(&mut policy) else {
            return Err("action catalog is empty".to_string());
        };
        let report = api
            .perform_action(&session.id, action)
            .map_err(|err| err.to_string())?;
        print_turn(action, &report);
        session = report.game_state;
        turns += 1;
    }

    let summary = api.summary(&session.id).map_err(|err| err.to_string())?;
    info!(
        game_id = %session.id,
        turns,
        outcome = %summary.outcome,
        persisted,
        "simulation finished"
    );
    print_json(&summary)
}

#[tokio::main]
async fn main() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Serve { addr, sqlite, seed } => run_serve(addr, sqlite, seed).await,
        Command::Actions => print_json(&GameApi::in_memory(Some(0)).actions()),
        Command::Events => print_json(&GameApi::in_memory(Some(0)).events()),
        Command::Play { seed, actions } => run_play(seed, &actions),
        Command::Simulate {
            seed,
            max_turns,
            sqlite,
        } => run_simulate(seed, max_turns, sqlite),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_play_and_simulate() {
        let cli = Cli::try_parse_from(["grad-survival", "play", "--seed", "4", "sleep", "rest"])
            .expect("play parses");
        match cli.command {
            Command::Play { seed, actions } => {
                assert_eq!(seed, 4);
                assert_eq!(actions, vec!["sleep".to_string(), "rest".to_string()]);
            }
            other => panic!("unexpected command {other:?}"),
        }

        let cli = Cli::try_parse_from(["grad-survival", "simulate", "--max-turns", "5"])
            .expect("simulate parses");
        assert!(matches!(
            cli.command,
            Command::Simulate {
                seed: 0,
                max_turns: 5,
                sqlite: None
            }
        ));
    }

    #[test]
    fn play_requires_actions() {
        assert!(Cli::try_parse_from(["grad-survival", "play"]).is_err());
    }

    #[test]
    fn changes_render_signed() {
        let mut changes = StatDeltas::new();
        changes.insert(contracts::StatKey::Health, 25);
        changes.insert(contracts::StatKey::Money, -5_000);
        assert_eq!(format_changes(&changes), "health+25 money-5000");
        assert_eq!(format_changes(&StatDeltas::new()), "-");
    }

    #[test]
    fn simulate_runs_to_the_turn_cap() {
        run_simulate(9, 3, None).expect("short simulation");
    }
}
