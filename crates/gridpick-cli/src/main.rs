// gridpick entry point.
//
// Startup sequence:
// 1. Parse arguments
// 2. Initialize tracing (log to file; stdout carries JSON output)
// 3. Load config, copying defaults on first run
// 4. Build file-backed providers and the advisor
// 5. Run the subcommand and print its result as JSON

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{error, info};

use gridpick_cli::commands;
use gridpick_cli::sources::{CsvRankingProvider, JsonBoardProvider};
use gridpick_core::advisor::{Advisor, AdvisorRequest, AdvisorResponse, AdvisorSettings};
use gridpick_core::config::{self, Config};
use gridpick_core::draft::player::Position;
use gridpick_core::error::EngineError;
use gridpick_core::provider::{RankingProvider, RankingQuery};
use gridpick_core::strategy::recommend::Strategy;

#[derive(Debug, Parser)]
#[clap(name = "gridpick", about = "Fantasy football draft strategy engine")]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Recommend the next pick for an owner from the live draft board.
    Recommend {
        /// Owner name as shown on the board (defaults to league.owner).
        #[clap(long, short)]
        owner: Option<String>,

        /// balanced, best_available, upside or safe.
        #[clap(long, short)]
        strategy: Option<Strategy>,

        /// Ignore bye week conflicts when scoring.
        #[clap(long)]
        no_bye_weeks: bool,

        /// Bypass the rankings and board caches.
        #[clap(long)]
        refresh: bool,
    },

    /// Run a local mock snake draft with every team following the engine.
    Mock {
        #[clap(long, short)]
        strategy: Option<Strategy>,

        /// Rounds to draft (defaults to league.rounds).
        #[clap(long, short)]
        rounds: Option<u32>,
    },

    /// Check an owner's roster for legality and remaining needs.
    Validate {
        #[clap(long, short)]
        owner: Option<String>,
    },

    /// Look up ranked players by last name.
    Player {
        #[clap(long, short = 'n')]
        last_name: String,

        /// Pro team code to narrow the match.
        #[clap(long, short)]
        team: Option<String>,
    },

    /// Show aggregated rankings.
    Rankings {
        /// Ranking source to include; repeat for several (defaults to
        /// strategy.ranking_sources).
        #[clap(long = "source")]
        sources: Vec<String>,

        #[clap(long, short, value_parser = parse_position)]
        position: Option<Position>,

        #[clap(long, short)]
        limit: Option<usize>,

        #[clap(long)]
        refresh: bool,
    },

    /// Show teams, picks and whose turn it is on the draft board.
    Progress {
        #[clap(long)]
        refresh: bool,
    },

    /// Value the players still available.
    Analyze {
        #[clap(long, short, value_parser = parse_position)]
        position: Option<Position>,

        /// Players to return (default 20).
        #[clap(long, short)]
        limit: Option<usize>,

        #[clap(long)]
        refresh: bool,
    },
}

fn parse_position(s: &str) -> Result<Position, EngineError> {
    Position::parse_draftable(s)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing()?;
    info!("gridpick starting: {:?}", cli.command);

    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: league={}, {} teams, {} rounds",
        config.league.name, config.league.num_teams, config.league.rounds
    );

    let result = run(cli.command, &config).await;
    if let Err(e) = &result {
        error!("Command failed: {:#}", e);
    }
    result
}

async fn run(command: Command, config: &Config) -> anyhow::Result<()> {
    let rankings = CsvRankingProvider::new(&config.data_paths.rankings);
    let board = JsonBoardProvider::new(&config.data_paths.draft_board);

    match command {
        Command::Recommend {
            owner,
            strategy,
            no_bye_weeks,
            refresh,
        } => {
            let advisor = Advisor::new(rankings, board, AdvisorSettings::from(config));
            let request = AdvisorRequest {
                owner,
                strategy,
                consider_bye_weeks: no_bye_weeks.then_some(false),
                force_refresh: refresh,
            };
            let response = advisor.suggest_pick(&request).await;
            finish("recommendation", response)?;
        }
        Command::Mock { strategy, rounds } => {
            let query = RankingQuery {
                sources: config.strategy.ranking_sources.clone(),
                ..RankingQuery::default()
            };
            let records = rankings.get_rankings(&query).await.with_context(|| {
                format!("failed to load rankings from {}", rankings.path().display())
            })?;
            let pool = commands::player_pool(&records);
            let strategy = strategy.unwrap_or(config.strategy.default_strategy);
            let rounds = rounds.unwrap_or(config.league.rounds);
            let report = commands::mock_draft(config, &pool, strategy, rounds)
                .context("mock draft failed")?;
            print_json(&report)?;
        }
        Command::Validate { owner } => {
            let advisor = Advisor::new(rankings, board, AdvisorSettings::from(config));
            let report = advisor
                .roster_report(owner.as_deref(), false)
                .await
                .context("roster validation failed")?;
            print_json(&report)?;
        }
        Command::Player { last_name, team } => {
            let advisor = Advisor::new(rankings, board, AdvisorSettings::from(config));
            let players = advisor
                .player_info(&last_name, team.as_deref(), false)
                .await
                .context("player lookup failed")?;
            print_json(&players)?;
        }
        Command::Rankings {
            sources,
            position,
            limit,
            refresh,
        } => {
            let advisor = Advisor::new(rankings, board, AdvisorSettings::from(config));
            let query = RankingQuery {
                sources,
                position,
                limit,
            };
            let response = advisor.rankings(&query, refresh).await;
            finish("rankings lookup", response)?;
        }
        Command::Progress { refresh } => {
            let advisor = Advisor::new(rankings, board, AdvisorSettings::from(config));
            let response = advisor.draft_progress(refresh).await;
            finish("draft progress", response)?;
        }
        Command::Analyze {
            position,
            limit,
            refresh,
        } => {
            let advisor = Advisor::new(rankings, board, AdvisorSettings::from(config));
            let response = advisor.analyze_available(position, limit, refresh).await;
            finish("available player analysis", response)?;
        }
    }
    Ok(())
}

/// Print a boundary response and turn a failed one into an error exit.
fn finish<T: Serialize>(what: &str, response: AdvisorResponse<T>) -> anyhow::Result<()> {
    print_json(&response)?;
    if !response.success {
        anyhow::bail!("{} failed: {}", what, response.error.unwrap_or_default());
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    println!("{out}");
    Ok(())
}

/// Initialize tracing to log to a file (stdout is reserved for JSON output).
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("gridpick.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("gridpick=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
