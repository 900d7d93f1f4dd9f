mod simulate;

use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use labyrinth_core::{
    DEFAULT_LEADERBOARD_LIMIT, FileProgress, Rules, load_journal_from_file, replay_journal,
};
use serde::Serialize;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Print results as JSON instead of text.
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Replay a recorded input journal and print the final snapshot.
    Replay {
        /// Path to the JSONL journal.
        journal: PathBuf,
        /// Rules file the session was played with.
        #[arg(long)]
        rules: Option<PathBuf>,
        /// Keep the clock running until this session time; defaults to the last input.
        #[arg(long)]
        until_ms: Option<u64>,
    },
    /// Play random inputs headlessly, checking invariants after every step.
    Simulate {
        #[arg(short, long, default_value_t = 42)]
        seed: u64,
        /// Seed for the random input stream; defaults to the session seed.
        #[arg(long)]
        input_seed: Option<u64>,
        #[arg(long, default_value_t = 1000)]
        steps: u32,
        #[arg(long)]
        rules: Option<PathBuf>,
        /// Write accepted inputs to this journal file.
        #[arg(long)]
        journal: Option<PathBuf>,
    },
    /// Print the top entries of a progress file.
    Leaderboard {
        store: PathBuf,
        #[arg(short, long, default_value_t = DEFAULT_LEADERBOARD_LIMIT)]
        limit: usize,
    },
}

#[derive(Serialize)]
struct ReplaySummary {
    status: String,
    level: u32,
    coins: u64,
    final_ms: u64,
    snapshot_hash: String,
}

fn load_rules(path: Option<&Path>) -> Result<Rules> {
    match path {
        Some(path) => Rules::load(path)
            .with_context(|| format!("failed to load rules from {}", path.display())),
        None => Ok(Rules::default()),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run(args: Args) -> Result<()> {
    match args.command {
        Command::Replay { journal, rules, until_ms } => {
            let rules = load_rules(rules.as_deref())?;
            let loaded = load_journal_from_file(&journal)
                .with_context(|| format!("failed to load journal {}", journal.display()))?;
            let last_input_ms = loaded.journal.inputs.last().map_or(0, |record| record.at_ms);
            let result =
                replay_journal(&rules, &loaded.journal, until_ms.unwrap_or(last_input_ms))
                    .context("replay failed")?;
            info!(inputs = loaded.journal.inputs.len(), "replay_complete");

            let summary = ReplaySummary {
                status: format!("{:?}", result.status),
                level: result.level,
                coins: result.coins,
                final_ms: result.final_ms,
                snapshot_hash: format!("0x{:016x}", result.snapshot_hash),
            };
            if args.json {
                return print_json(&summary);
            }
            println!("Replay complete.");
            println!("Session time: {} ms", summary.final_ms);
            println!("Status: {} on level {} with {} coins", summary.status, summary.level, summary.coins);
            println!("Snapshot Hash: {}", summary.snapshot_hash);
        }
        Command::Simulate { seed, input_seed, steps, rules, journal } => {
            let rules = load_rules(rules.as_deref())?;
            let summary = simulate::simulate(
                &rules,
                seed,
                input_seed.unwrap_or(seed),
                steps,
                journal.as_deref(),
            )?;
            if args.json {
                return print_json(&summary);
            }
            println!("Simulated {} steps on seed {}.", summary.steps, summary.seed);
            println!("Wins: {}  Losses: {}", summary.wins, summary.losses);
            println!("Status: {} on level {} with {} coins", summary.status, summary.level, summary.coins);
            println!("Snapshot Hash: {}", summary.snapshot_hash);
        }
        Command::Leaderboard { store, limit } => {
            let book = FileProgress::open(&store, "")
                .read_book()
                .with_context(|| format!("failed to read progress store {}", store.display()))?;
            let entries = book.leaderboard(limit);
            if args.json {
                return print_json(&entries);
            }
            if entries.is_empty() {
                println!("No players yet.");
            }
            for (rank, entry) in entries.iter().enumerate() {
                println!(
                    "{:>2}. {:<16} level {:<3} {} coins",
                    rank + 1,
                    entry.player,
                    entry.highest_level,
                    entry.coins
                );
            }
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %format!("{err:#}"), "command_failed");
            ExitCode::FAILURE
        }
    }
}
