//! Squash League CLI
//!
//! Command-line host for the league engine: drives seasons match by
//! match, prints standings and season reports, and persists the league
//! between invocations through the snapshot autosave.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use sq_core::{
    division_standings_view, league_summary, standings_json, Division, LeagueState, Match,
    MatchKind, Phase, SaveManager,
};

#[derive(Parser)]
#[command(name = "sq_cli")]
#[command(about = "Run a ten-player squash league from the terminal", long_about = None)]
struct Cli {
    /// Directory holding the league autosave
    #[arg(long, default_value = ".")]
    save_dir: PathBuf,

    /// Seed used when no autosave exists yet
    #[arg(long, default_value = "42")]
    seed: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show season progress and both division tables
    Status,

    /// Play the next N matches
    Play {
        #[arg(long, default_value = "1")]
        count: usize,
    },

    /// Play every remaining match of the current season and close it
    Season,

    /// Print standings for both divisions as JSON
    Json,

    /// Delete the autosave and start over
    Reset,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let save_path = SaveManager::auto_save_path(&cli.save_dir);

    if let Commands::Reset = cli.command {
        SaveManager::delete(&save_path).context("failed to delete autosave")?;
        let league = LeagueState::new(cli.seed);
        SaveManager::save_state(&save_path, &league).context("failed to write autosave")?;
        println!("League reset with seed {}.", cli.seed);
        return Ok(());
    }

    let mut league =
        SaveManager::load_or_new(&save_path, cli.seed).context("failed to load league")?;

    match cli.command {
        Commands::Status => print_status(&league),
        Commands::Play { count } => {
            play_matches(&mut league, count)?;
            SaveManager::save_state(&save_path, &league).context("failed to write autosave")?;
        }
        Commands::Season => {
            run_out_season(&mut league)?;
            SaveManager::save_state(&save_path, &league).context("failed to write autosave")?;
        }
        Commands::Json => println!("{}", standings_json(&league)?),
        Commands::Reset => unreachable!("handled before loading"),
    }

    Ok(())
}

fn play_matches(league: &mut LeagueState, count: usize) -> Result<()> {
    drain_retirements(league)?;
    for _ in 0..count {
        match league.simulate_next_match() {
            Ok(result) => print_match(&result),
            Err(sq_core::LeagueError::NoMatchesRemaining(season)) => {
                println!("Season {season} is fully played; run `season` to close it.");
                break;
            }
            Err(err) => return Err(err.into()),
        }
    }
    Ok(())
}

fn run_out_season(league: &mut LeagueState) -> Result<()> {
    drain_retirements(league)?;
    while let Ok(result) = league.simulate_next_match() {
        print_match(&result);
    }

    let season = league.current_season().number;
    league.end_season().context("failed to close season")?;
    println!("\n=== Season {season} closed ===");

    let notices = league.pending_retirements().to_vec();
    for notice in &notices {
        println!(
            "{} ({}) retires at {:.1}; {} joins Division 2",
            notice.retiree.name,
            notice.retiree.nationality,
            notice.retiree.rating,
            notice.replacement.name,
        );
    }
    drain_retirements(league)?;

    print_status(league);
    Ok(())
}

fn drain_retirements(league: &mut LeagueState) -> Result<()> {
    if league.phase() == Phase::Transitioning {
        league.acknowledge_retirements().context("failed to schedule next season")?;
    }
    Ok(())
}

fn print_match(result: &Match) {
    let (p1_sets, p2_sets) = result.sets_tally();
    let stage = match result.kind {
        MatchKind::League => format!("R{:02}", result.round),
        MatchKind::CupSemifinal => "Cup SF".to_string(),
        MatchKind::CupThirdPlace => "Cup 3rd".to_string(),
        MatchKind::CupFinal => "Cup F".to_string(),
    };
    println!(
        "[{stage}] {} {p1_sets}-{p2_sets} {}",
        result.player1.name, result.player2.name
    );
}

fn print_status(league: &LeagueState) {
    let summary = league_summary(league);
    println!(
        "Season {}: {}/{} matches, round {}/{}",
        summary.season,
        summary.matches_played,
        summary.matches_total,
        summary.current_round,
        summary.max_round,
    );

    for division in [Division::One, Division::Two] {
        let view = division_standings_view(league, division);
        println!("\nDivision {}", view.division);
        println!("{:<3} {:<24} {:>4} {:>4} {:>5} {:>6}", "#", "Player", "Pts", "W-L", "Sets", "Rtg");
        for row in &view.rows {
            println!(
                "{:<3} {:<24} {:>4} {:>2}-{:<2} {:>+5} {:>6.1}",
                row.position,
                format!("{} ({})", row.name, row.nationality),
                row.league_points,
                row.games_won,
                row.games_lost,
                row.set_difference,
                row.rating,
            );
        }
    }
}
