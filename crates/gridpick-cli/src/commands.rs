// Subcommand implementations that do not go through the advisor.

use gridpick_core::config::Config;
use gridpick_core::draft::player::{Player, Position};
use gridpick_core::draft::state::DraftState;
use gridpick_core::error::{EngineError, Result};
use gridpick_core::provider::RankedPlayerRecord;
use gridpick_core::strategy::needs::roster_balance_score;
use gridpick_core::strategy::recommend::{recommend, RecommendOptions, Strategy};
use serde::Serialize;
use tracing::{info, warn};

#[derive(Debug, Clone, Serialize)]
pub struct MockPick {
    pub pick: u32,
    pub round: u32,
    pub team: String,
    pub player: String,
    pub position: Position,
    pub strategy_score: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MockTeamSummary {
    pub team: String,
    pub roster: Vec<String>,
    pub roster_balance_score: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MockDraftReport {
    pub strategy: Strategy,
    pub rounds: u32,
    pub picks: Vec<MockPick>,
    pub teams: Vec<MockTeamSummary>,
}

/// Convert ranking records into a player pool, skipping records that do not
/// describe a draftable player.
pub fn player_pool(records: &[RankedPlayerRecord]) -> Vec<Player> {
    records
        .iter()
        .filter_map(|record| match record.to_player() {
            Ok(player) => Some(player),
            Err(e) => {
                warn!("Skipping ranked player '{}': {}", record.name, e);
                None
            }
        })
        .collect()
}

/// Run a local draft where every team takes the engine's primary pick.
///
/// The draft stops early if the pool runs dry.
pub fn mock_draft(
    config: &Config,
    pool: &[Player],
    strategy: Strategy,
    rounds: u32,
) -> Result<MockDraftReport> {
    let names: Vec<String> = (1..=config.league.num_teams)
        .map(|i| format!("Team {i}"))
        .collect();
    let name_refs: Vec<&str> = names.iter().map(String::as_str).collect();
    let mut state = DraftState::new(&name_refs, rounds, config.league.snake)?;
    state.set_available_players(pool);

    let base = config.recommend_options();
    let mut picks = Vec::new();

    while !state.is_complete() {
        let options = RecommendOptions {
            strategy,
            current_round: state.current_round(),
            ..base.clone()
        };
        let rec = recommend(
            state.current_team(),
            &state.available_players,
            &config.settings,
            &options,
        );
        let Some(choice) = rec.primary_pick else {
            warn!("Player pool exhausted at pick {}", state.current_pick);
            break;
        };
        let made = state.make_pick(&choice.analysis.player)?;
        picks.push(MockPick {
            pick: made.pick_number,
            round: made.round_number,
            team: made.team_name,
            player: made.player.name,
            position: made.player.position,
            strategy_score: choice.strategy_score,
        });
    }

    if picks.is_empty() && !pool.is_empty() {
        return Err(EngineError::InvalidDraftSetup {
            message: "mock draft made no picks".into(),
        });
    }

    info!("Mock draft finished: {} picks", picks.len());

    let teams = state
        .teams
        .iter()
        .map(|team| MockTeamSummary {
            team: team.name.clone(),
            roster: team.roster.iter().map(|p| p.name.clone()).collect(),
            roster_balance_score: roster_balance_score(team, &config.settings.depth_targets),
        })
        .collect();

    Ok(MockDraftReport {
        strategy,
        rounds,
        picks,
        teams,
    })
}
