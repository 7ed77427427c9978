use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use rating_engine::{sort_players, PlayerInput, RankingFilter, RatingConfig, RatingEngine, RatingEvent};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Rate a roster of players and print the leaderboard
#[derive(Parser, Debug)]
#[command(name = "rating-engine", version, about)]
struct Cli {
    /// JSON file holding an array of players with their match documents
    #[arg(long)]
    roster: PathBuf,

    /// TOML config file (RATING__* environment variables override it)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Sort by: rating, points, threes, twoInt, twoExt, lf, discipline
    #[arg(long, default_value = "rating")]
    sort: RankingFilter,

    /// Show only the first N players
    #[arg(long)]
    limit: Option<usize>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let cli = Cli::parse();

    let config = RatingConfig::load(cli.config.as_deref())?;
    info!("Loaded configuration: {:?}", config);

    let content = std::fs::read_to_string(&cli.roster)
        .with_context(|| format!("Failed to read roster {}", cli.roster.display()))?;
    let roster: Vec<PlayerInput> =
        serde_json::from_str(&content).context("Roster must be a JSON array of players")?;

    let engine = RatingEngine::new(config)?;
    let outcome = match engine.process_roster(&roster) {
        Ok(outcome) => outcome,
        Err(e) => {
            error!("Failed to rate roster: {}", e);
            return Err(e.into());
        }
    };

    let players = sort_players(&outcome.ranking, cli.sort);
    let limit = cli.limit.unwrap_or(players.len());

    println!("{:<4} {:<24} {:<14} {:>6} {:>6} {:>5} {:>5}", "#", "Player", "Position", "Rating", "PTS", "LF", "F");
    for (rank, player) in players.iter().take(limit).enumerate() {
        println!(
            "{:<4} {:<24} {:<14} {:>6} {:>6.1} {:>5.1} {:>5.1}",
            rank + 1,
            player.name,
            player.position.as_deref().unwrap_or("-"),
            player.rating,
            player.averages.pts,
            player.averages.lf,
            player.averages.fouls
        );
    }

    for event in &outcome.events {
        match event {
            RatingEvent::RecordRejected { player_id, record_index, error, .. } => {
                println!("  rejected record #{record_index} for {player_id}: {error}");
            }
            RatingEvent::PlayerSkipped { player_id, error, .. } => {
                println!("  skipped {player_id}: {error}");
            }
            RatingEvent::BatchCompleted { processed_count, rated_count, rejected_records, .. } => {
                println!(
                    "Processed {processed_count} players, rated {rated_count}, rejected {rejected_records} records"
                );
            }
            RatingEvent::PlayerRated { .. } => {}
        }
    }

    Ok(())
}
