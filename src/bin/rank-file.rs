//! Rank File CLI Tool
//!
//! Ranks a JSON file of participants offline, using the same calculator and
//! presentation rules as the leaderboard service.
//!
//! Usage:
//!   cargo run --bin rank-file -- --help
//!   cargo run --bin rank-file records --file board.json --mode monthly
//!   cargo run --bin rank-file stats --file stats.json --mode yearly --yearly-tie-break
//!   cargo run --bin rank-file stats --file stats.json --mode monthly --json

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use retro_leaderboard::config::RankingConfig;
use retro_leaderboard::presentation::{present, LeaderboardRow};
use retro_leaderboard::ranking::{compute_ranks_with, RankingPolicy};
use retro_leaderboard::stats::{to_records, ParticipantStats};
use retro_leaderboard::types::{ParticipantRecord, RankingMode};
use tracing::{debug, info};

#[derive(Parser)]
#[command(name = "rank-file")]
#[command(about = "Rank a JSON file of participants with competition ranking")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Board mode (monthly or yearly)
    #[arg(short, long, global = true, default_value = "monthly")]
    mode: String,

    /// Break yearly ties on the secondary metric
    #[arg(long, global = true)]
    yearly_tie_break: bool,

    /// Print the board as JSON instead of a table
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank pre-computed records (identifier, primary_metric, secondary_metric)
    Records {
        /// JSON array of records
        #[arg(short, long)]
        file: PathBuf,
    },
    /// Rank raw provider statistics (user, completed/total achievements, points)
    Stats {
        /// JSON array of participant statistics
        #[arg(short, long)]
        file: PathBuf,
    },
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("Failed to parse {}", path.display()))
}

fn print_table(rows: &[LeaderboardRow], mode: RankingMode) {
    let primary_header = match mode {
        RankingMode::Monthly => "Completion %",
        RankingMode::Yearly => "Points",
    };

    println!(
        "{:<6} {:<6} {:<24} {:>14} {:>10}",
        "Rank", "Medal", "Participant", primary_header, "Secondary"
    );
    println!("{}", "─".repeat(64));

    for row in rows {
        let medal = match row.medal {
            Some(medal) => format!("{:?}", medal).to_lowercase(),
            None => String::new(),
        };
        println!(
            "{:<6} {:<6} {:<24} {:>14.2} {:>10}",
            row.rank_label, medal, row.identifier, row.primary_metric, row.secondary_metric
        );
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mode: RankingMode = cli.mode.parse()?;
    let policy = RankingPolicy::from_config(
        mode,
        &RankingConfig {
            yearly_secondary_tie_break: cli.yearly_tie_break,
        },
    );

    let records: Vec<ParticipantRecord> = match &cli.command {
        Commands::Records { file } => read_json(file)?,
        Commands::Stats { file } => {
            let stats: Vec<ParticipantStats> = read_json(file)?;
            debug!("Loaded {} participant stats", stats.len());
            to_records(&stats, mode)
        }
    };

    info!(
        "Ranking {} participants ({} board, tie-break {:?})",
        records.len(),
        mode,
        policy.tie_break
    );

    let rows = present(&compute_ranks_with(records, &policy));

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else if rows.is_empty() {
        println!("No participants to rank");
    } else {
        print_table(&rows, mode);
    }

    Ok(())
}
