// Draft advisor: one recommendation request end to end.
//
// Fetches the board and rankings (through the TTL caches), finds the
// requesting owner's team, removes drafted players from the pool, rebuilds the
// owner's roster from the board, and hands everything to the engine. Also
// serves the read-only views: rankings, draft progress and the available pool.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::Serialize;
use tracing::{info, warn};

use crate::cache::TtlCache;
use crate::config::Config;
use crate::draft::player::{Player, Position};
use crate::draft::roster::Team;
use crate::draft::state::DraftState;
use crate::error::{EngineError, Result};
use crate::names::{
    matches_last_name, normalize_player_name, split_name_team, DraftedIndex, TeamMatch,
    UNKNOWN_TEAM,
};
use crate::provider::{
    BoardPick, BoardTeam, DraftBoard, DraftStateProvider, RankedPlayerRecord, RankingProvider,
    RankingQuery,
};
use crate::rules::{FlexEligibility, PositionNeeds, ValidationResult};
use crate::strategy::guidance::DraftFormat;
use crate::strategy::needs::{analyze_roster_needs, RosterAnalysis};
use crate::strategy::recommend::{
    recommend, EngineSettings, RecommendOptions, Recommendation, Strategy,
};
use crate::valuation::analysis::{analyze_available, AvailableAnalysis};
use crate::valuation::bye_week::{ByeProfile, ByeWeekSummary};

/// Team count assumed when the board lists no teams.
const DEFAULT_NUM_TEAMS: usize = 10;

/// Players returned by an available-pool analysis when no limit is given.
pub const DEFAULT_ANALYZE_LIMIT: usize = 20;

// ---------------------------------------------------------------------------
// Settings and requests
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct AdvisorSettings {
    pub engine: EngineSettings,
    pub defaults: RecommendOptions,
    /// Owner used when a request names none.
    pub owner: String,
    pub rounds: u32,
    pub snake: bool,
    pub team_match: TeamMatch,
    pub ranking_sources: Vec<String>,
    pub rankings_ttl: Duration,
    pub draft_board_ttl: Duration,
}

impl From<&Config> for AdvisorSettings {
    fn from(config: &Config) -> Self {
        AdvisorSettings {
            engine: config.settings.clone(),
            defaults: config.recommend_options(),
            owner: config.league.owner.clone(),
            rounds: config.league.rounds,
            snake: config.league.snake,
            team_match: config.strategy.team_match,
            ranking_sources: config.strategy.ranking_sources.clone(),
            rankings_ttl: config.cache.rankings_ttl,
            draft_board_ttl: config.cache.draft_board_ttl,
        }
    }
}

/// Per-request overrides; `None` falls back to the configured default.
#[derive(Debug, Clone, Default)]
pub struct AdvisorRequest {
    pub owner: Option<String>,
    pub strategy: Option<Strategy>,
    pub consider_bye_weeks: Option<bool>,
    pub force_refresh: bool,
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct SuggestionReport {
    pub owner: String,
    pub team_name: String,
    pub picks_made: usize,
    pub total_available: usize,
    #[serde(flatten)]
    pub recommendation: Recommendation,
    pub data_warnings: Vec<String>,
}

/// Boundary response: never an `Err`, always `success` plus either the
/// report or an error message.
#[derive(Debug, Clone, Serialize)]
pub struct AdvisorResponse<T = SuggestionReport> {
    pub success: bool,
    #[serde(flatten)]
    pub report: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
}

impl<T> From<Result<T>> for AdvisorResponse<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(report) => AdvisorResponse {
                success: true,
                report: Some(report),
                error: None,
                error_type: None,
            },
            Err(e) => AdvisorResponse {
                success: false,
                report: None,
                error: Some(e.to_string()),
                error_type: Some(e.kind().to_string()),
            },
        }
    }
}

/// Legality and needs of one owner's current roster.
#[derive(Debug, Clone, Serialize)]
pub struct RosterReport {
    pub owner: String,
    pub team_name: String,
    pub roster: Vec<Player>,
    pub validation: ValidationResult,
    pub position_needs: PositionNeeds,
    pub remaining_slots: BTreeMap<Position, usize>,
    pub flex: FlexEligibility,
    pub roster_analysis: RosterAnalysis,
    pub bye_weeks: ByeWeekSummary,
    pub data_warnings: Vec<String>,
}

/// Ranked players after source, position and limit filters.
#[derive(Debug, Clone, Serialize)]
pub struct RankingsReport {
    pub sources: Vec<String>,
    pub position: Option<Position>,
    pub limit: Option<usize>,
    /// Matching players before the limit was applied.
    pub count: usize,
    pub players: Vec<RankedPlayerRecord>,
    pub data_warnings: Vec<String>,
}

/// One board pick as the draft progress view reports it.
#[derive(Debug, Clone, Serialize)]
pub struct ProgressPick {
    pub pick: u32,
    pub round: Option<u32>,
    pub fantasy_team: Option<String>,
    pub owner: Option<String>,
    pub player: String,
    pub pro_team: Option<String>,
    pub position: Option<Position>,
    pub bye_week: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TeamProgress {
    pub team_name: String,
    pub owner: String,
    pub draft_slot: usize,
    pub picks: Vec<ProgressPick>,
}

/// Where the draft stands according to the board.
#[derive(Debug, Clone, Serialize)]
pub struct DraftProgress {
    pub total_teams: usize,
    pub total_picks: usize,
    pub current_round: u32,
    /// Next pick number to be made.
    pub current_pick: u32,
    /// Team whose turn it is under the configured draft order; `None` once
    /// every round is filled or when the board lists no teams.
    pub on_the_clock: Option<String>,
    pub is_complete: bool,
    pub teams: Vec<TeamProgress>,
    pub picks: Vec<ProgressPick>,
    pub data_warnings: Vec<String>,
}

/// Valued available players, for the owner's team when it can be found.
#[derive(Debug, Clone, Serialize)]
pub struct AvailableReport {
    pub owner: Option<String>,
    pub team_name: Option<String>,
    pub position: Option<Position>,
    pub limit: usize,
    #[serde(flatten)]
    pub analysis: AvailableAnalysis,
    pub data_warnings: Vec<String>,
}

/// Everything derived from the board and rankings. `team` is empty when no
/// owner's roster was requested.
struct DraftContext {
    team: Team,
    available: Vec<Player>,
    picks_made: usize,
    current_round: u32,
    draft_format: DraftFormat,
    data_warnings: Vec<String>,
}

// ---------------------------------------------------------------------------
// Advisor
// ---------------------------------------------------------------------------

pub struct Advisor<R, D> {
    rankings: R,
    board: D,
    settings: AdvisorSettings,
    ranking_cache: TtlCache<Vec<RankedPlayerRecord>>,
    board_cache: TtlCache<DraftBoard>,
}

impl<R: RankingProvider, D: DraftStateProvider> Advisor<R, D> {
    pub fn new(rankings: R, board: D, settings: AdvisorSettings) -> Self {
        Advisor {
            ranking_cache: TtlCache::new("rankings", settings.rankings_ttl),
            board_cache: TtlCache::new("draft board", settings.draft_board_ttl),
            rankings,
            board,
            settings,
        }
    }

    pub fn settings(&self) -> &AdvisorSettings {
        &self.settings
    }

    /// Recommendation wrapped for the outer boundary.
    pub async fn suggest_pick(&self, request: &AdvisorRequest) -> AdvisorResponse {
        respond("Pick suggestion", self.try_suggest_pick(request).await)
    }

    pub async fn try_suggest_pick(&self, request: &AdvisorRequest) -> Result<SuggestionReport> {
        let owner = self.owner_for(request);
        let (board_team, ctx) = self.load_context(owner, request.force_refresh).await?;

        let engine = EngineSettings {
            draft_format: ctx.draft_format,
            ..self.settings.engine.clone()
        };
        let options = RecommendOptions {
            strategy: request.strategy.unwrap_or(self.settings.defaults.strategy),
            current_round: ctx.current_round,
            consider_bye_weeks: request
                .consider_bye_weeks
                .unwrap_or(self.settings.defaults.consider_bye_weeks),
            analysis_limit: self.settings.defaults.analysis_limit,
        };

        let recommendation = recommend(&ctx.team, &ctx.available, &engine, &options);

        Ok(SuggestionReport {
            owner: board_team.owner,
            team_name: board_team.team_name,
            picks_made: ctx.picks_made,
            total_available: ctx.available.len(),
            recommendation,
            data_warnings: ctx.data_warnings,
        })
    }

    /// Legality and needs report for an owner's roster.
    pub async fn roster_report(
        &self,
        owner: Option<&str>,
        force_refresh: bool,
    ) -> Result<RosterReport> {
        let owner = owner.unwrap_or(self.settings.owner.as_str());
        let (board_team, ctx) = self.load_context(owner, force_refresh).await?;
        let rules = &self.settings.engine.rules;
        let ir_used = ctx.team.injured_count().min(rules.ir_slots());

        Ok(RosterReport {
            owner: board_team.owner,
            team_name: board_team.team_name,
            validation: rules.is_roster_legal(&ctx.team, ir_used),
            position_needs: rules.position_needs(&ctx.team, true),
            remaining_slots: rules.remaining_slots(&ctx.team),
            flex: rules.flex_eligibility(&ctx.team, None),
            roster_analysis: analyze_roster_needs(&ctx.team, &self.settings.engine.depth_targets),
            bye_weeks: ByeProfile::from_team(&ctx.team).summary(),
            roster: ctx.team.roster,
            data_warnings: ctx.data_warnings,
        })
    }

    /// Ranked players whose last name starts with `last_name`, best first.
    pub async fn player_info(
        &self,
        last_name: &str,
        team: Option<&str>,
        force_refresh: bool,
    ) -> Result<Vec<Player>> {
        let (players, _) = self.fetch_players(force_refresh).await?;
        let mut matched: Vec<Player> = players
            .into_iter()
            .filter(|p| matches_last_name(last_name, &p.name))
            .filter(|p| team.map_or(true, |t| self.settings.team_match.teams_match(t, &p.team)))
            .collect();
        matched.sort_by(|a, b| {
            let ra = a.average_rank().unwrap_or(f64::MAX);
            let rb = b.average_rank().unwrap_or(f64::MAX);
            ra.partial_cmp(&rb).unwrap_or(std::cmp::Ordering::Equal)
        });
        info!("Player lookup '{}' matched {} players", last_name, matched.len());
        Ok(matched)
    }

    /// Rankings filtered by source, position and limit.
    ///
    /// The configured sources (or an empty source list) are served from the
    /// rankings cache; any other source set goes to the provider directly.
    pub async fn rankings(
        &self,
        query: &RankingQuery,
        force_refresh: bool,
    ) -> AdvisorResponse<RankingsReport> {
        respond("Rankings lookup", self.try_rankings(query, force_refresh).await)
    }

    /// Teams, picks and turn order as recorded on the board.
    pub async fn draft_progress(&self, force_refresh: bool) -> AdvisorResponse<DraftProgress> {
        respond("Draft progress", self.try_draft_progress(force_refresh).await)
    }

    /// Value the undrafted pool, best first.
    ///
    /// Bye-week effects are measured against the configured owner's roster.
    /// When that owner is not on the board the analysis is general and a
    /// data warning says so.
    pub async fn analyze_available(
        &self,
        position: Option<Position>,
        limit: Option<usize>,
        force_refresh: bool,
    ) -> AdvisorResponse<AvailableReport> {
        respond(
            "Available player analysis",
            self.try_analyze_available(position, limit, force_refresh)
                .await,
        )
    }

    async fn try_rankings(
        &self,
        query: &RankingQuery,
        force_refresh: bool,
    ) -> Result<RankingsReport> {
        let configured = query.sources.is_empty()
            || same_sources(&query.sources, &self.settings.ranking_sources);
        let records = if configured {
            self.fetch_records(force_refresh).await?
        } else {
            info!("Fetching uncached rankings for sources {:?}", query.sources);
            self.rankings.get_rankings(query).await?
        };

        let mut data_warnings = Vec::new();
        let mut players: Vec<RankedPlayerRecord> = Vec::new();
        for record in records {
            if let Some(wanted) = query.position {
                match Position::parse_draftable(&record.position) {
                    Ok(pos) if pos == wanted => {}
                    Ok(_) => continue,
                    Err(e) => {
                        data_warnings
                            .push(format!("Skipped ranked player '{}': {}", record.name, e));
                        continue;
                    }
                }
            }
            players.push(record);
        }
        players.sort_by(|a, b| {
            let ra = a.average_rank.unwrap_or(f64::MAX);
            let rb = b.average_rank.unwrap_or(f64::MAX);
            ra.partial_cmp(&rb).unwrap_or(std::cmp::Ordering::Equal)
        });

        let count = players.len();
        if let Some(limit) = query.limit {
            players.truncate(limit);
        }
        info!("Rankings lookup: {} matching, returning {}", count, players.len());

        Ok(RankingsReport {
            sources: if configured {
                self.settings.ranking_sources.clone()
            } else {
                query.sources.clone()
            },
            position: query.position,
            limit: query.limit,
            count,
            players,
            data_warnings,
        })
    }

    async fn try_draft_progress(&self, force_refresh: bool) -> Result<DraftProgress> {
        let board = self.fetch_board(force_refresh).await?;
        let mut data_warnings = Vec::new();

        let owner_of = |team: &str| {
            board
                .teams
                .iter()
                .find(|t| t.team_name == team)
                .map(|t| t.owner.clone())
        };

        let picks: Vec<ProgressPick> = board
            .picks
            .iter()
            .enumerate()
            .filter_map(|(i, pick)| {
                let cell = pick.player_cell()?;
                let (player, pro_team) = split_name_team(cell);
                let position = match pick.position.as_deref() {
                    Some(p) => match Position::parse_draftable(p) {
                        Ok(pos) => Some(pos),
                        Err(_) => {
                            data_warnings
                                .push(format!("Pick '{player}' has unknown position '{p}'"));
                            None
                        }
                    },
                    None => None,
                };
                let fantasy_team = pick.fantasy_team().map(str::to_string);
                Some(ProgressPick {
                    pick: pick.pick.unwrap_or(i as u32 + 1),
                    round: pick.round,
                    owner: fantasy_team.as_deref().and_then(owner_of),
                    fantasy_team,
                    player,
                    pro_team,
                    position,
                    bye_week: pick.bye_week.filter(|&b| b > 0),
                })
            })
            .collect();

        let teams: Vec<TeamProgress> = board
            .teams
            .iter()
            .enumerate()
            .map(|(i, team)| TeamProgress {
                team_name: team.team_name.clone(),
                owner: team.owner.clone(),
                draft_slot: i + 1,
                picks: picks
                    .iter()
                    .filter(|p| p.fantasy_team.as_deref() == Some(team.team_name.as_str()))
                    .cloned()
                    .collect(),
            })
            .collect();

        let total_picks = board.picks.len();
        let current_pick = total_picks as u32 + 1;
        let order = self.draft_order(&board);
        let is_complete = order
            .as_ref()
            .is_some_and(|state| current_pick > state.total_picks());
        let on_the_clock = order
            .filter(|_| !is_complete)
            .map(|state| state.teams[state.team_index_for_pick(current_pick)].name.clone());

        info!(
            "Draft progress: {} picks over {} teams, next up {:?}",
            total_picks,
            board.teams.len(),
            on_the_clock
        );

        Ok(DraftProgress {
            total_teams: board.teams.len(),
            total_picks,
            current_round: board_round(&board),
            current_pick,
            on_the_clock,
            is_complete,
            teams,
            picks,
            data_warnings,
        })
    }

    async fn try_analyze_available(
        &self,
        position: Option<Position>,
        limit: Option<usize>,
        force_refresh: bool,
    ) -> Result<AvailableReport> {
        let board = self.fetch_board(force_refresh).await?;
        let owner = self.settings.owner.as_str();
        let mut general_warning = None;
        let board_team = match find_owner_team(&board, owner) {
            Ok(team) => Some(team.clone()),
            Err(e @ EngineError::OwnerNotFound { .. }) => {
                info!("{}; analyzing without a roster", e);
                general_warning = Some(format!(
                    "Owner '{owner}' not found on the board; bye-week effects are not applied"
                ));
                None
            }
            Err(e) => return Err(e),
        };

        let ctx = self
            .build_context(&board, board_team.as_ref(), force_refresh)
            .await?;
        let mut data_warnings = ctx.data_warnings;
        data_warnings.extend(general_warning);

        let limit = limit.unwrap_or(DEFAULT_ANALYZE_LIMIT);
        let analysis = analyze_available(
            &ctx.available,
            board_team.as_ref().map(|_| &ctx.team),
            &self.settings.engine.rules,
            &self.settings.engine.scarcity,
            position,
            Some(limit),
        );

        Ok(AvailableReport {
            owner: board_team.as_ref().map(|t| t.owner.clone()),
            team_name: board_team.map(|t| t.team_name),
            position,
            limit,
            analysis,
            data_warnings,
        })
    }

    /// Turn order for the board's teams under the configured rounds and
    /// snake setting.
    fn draft_order(&self, board: &DraftBoard) -> Option<DraftState> {
        if board.teams.is_empty() {
            return None;
        }
        let names: Vec<&str> = board.teams.iter().map(|t| t.team_name.as_str()).collect();
        match DraftState::new(&names, self.settings.rounds, self.settings.snake) {
            Ok(state) => Some(state),
            Err(e) => {
                warn!("Cannot derive turn order from the board: {}", e);
                None
            }
        }
    }

    fn owner_for<'a>(&'a self, request: &'a AdvisorRequest) -> &'a str {
        request
            .owner
            .as_deref()
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .unwrap_or(self.settings.owner.as_str())
    }

    async fn fetch_board(&self, force_refresh: bool) -> Result<DraftBoard> {
        self.board_cache
            .get_or_fetch(force_refresh, || self.board.get_draft_board())
            .await
    }

    async fn fetch_records(&self, force_refresh: bool) -> Result<Vec<RankedPlayerRecord>> {
        let query = RankingQuery {
            sources: self.settings.ranking_sources.clone(),
            position: None,
            limit: None,
        };
        self.ranking_cache
            .get_or_fetch(force_refresh, || self.rankings.get_rankings(&query))
            .await
    }

    /// Rankings converted to players, plus warnings for records that could
    /// not be converted.
    async fn fetch_players(&self, force_refresh: bool) -> Result<(Vec<Player>, Vec<String>)> {
        let records = self.fetch_records(force_refresh).await?;

        let mut players = Vec::with_capacity(records.len());
        let mut warnings = Vec::new();
        for record in &records {
            match record.to_player() {
                Ok(player) => players.push(player),
                Err(e) => {
                    warn!("Skipping ranked player '{}': {}", record.name, e);
                    warnings.push(format!("Skipped ranked player '{}': {}", record.name, e));
                }
            }
        }
        Ok((players, warnings))
    }

    async fn load_context(
        &self,
        owner: &str,
        force_refresh: bool,
    ) -> Result<(BoardTeam, DraftContext)> {
        let board = self.fetch_board(force_refresh).await?;
        let board_team = find_owner_team(&board, owner)?.clone();
        info!(
            "Analyzing for {} (owner: {})",
            board_team.team_name, board_team.owner
        );
        let ctx = self
            .build_context(&board, Some(&board_team), force_refresh)
            .await?;
        Ok((board_team, ctx))
    }

    /// Drafted players removed from the pool; `board_team`'s roster rebuilt
    /// from its picks.
    async fn build_context(
        &self,
        board: &DraftBoard,
        board_team: Option<&BoardTeam>,
        force_refresh: bool,
    ) -> Result<DraftContext> {
        let (ranked, mut data_warnings) = self.fetch_players(force_refresh).await?;

        let mut drafted = DraftedIndex::new(self.settings.team_match);
        let mut team = match board_team {
            Some(bt) => Team::new(&bt.team_name, draft_slot(board, bt)),
            None => Team::new("", 0),
        };

        for pick in &board.picks {
            let Some(cell) = pick.player_cell() else {
                continue;
            };
            let (name, pro_team) = split_name_team(cell);
            drafted.insert(&name, pro_team.as_deref());

            let Some(bt) = board_team else {
                continue;
            };
            if pick.fantasy_team() != Some(bt.team_name.as_str()) {
                continue;
            }
            match self.rostered_player(pick, &name, pro_team.as_deref(), &ranked) {
                Ok((player, warning)) => {
                    if let Some(w) = warning {
                        warn!("{}", w);
                        data_warnings.push(w);
                    }
                    team.add_player(player);
                }
                Err(w) => {
                    warn!("{}", w);
                    data_warnings.push(w);
                }
            }
        }

        let available: Vec<Player> = ranked
            .into_iter()
            .filter(|p| !drafted.contains(&p.name, Some(&p.team)))
            .collect();

        let picks_made = board.picks.len();
        let current_round = board_round(board);

        let draft_format = match &board.draft_rules {
            Some(rules) => rules.apply_to(&self.settings.engine.draft_format),
            None => self.settings.engine.draft_format.clone(),
        };

        info!(
            "{} drafted, {} available, round {}",
            drafted.len(),
            available.len(),
            current_round
        );

        Ok(DraftContext {
            team,
            available,
            picks_made,
            current_round,
            draft_format,
            data_warnings,
        })
    }

    /// The owner's drafted player, enriched from rankings when a match
    /// exists. `Err` carries a warning for picks that cannot be rostered.
    fn rostered_player(
        &self,
        pick: &BoardPick,
        name: &str,
        pro_team: Option<&str>,
        ranked: &[Player],
    ) -> std::result::Result<(Player, Option<String>), String> {
        let key = normalize_player_name(name);
        let matched = ranked.iter().find(|p| {
            normalize_player_name(&p.name) == key
                && pro_team.map_or(true, |t| self.settings.team_match.teams_match(t, &p.team))
        });
        if let Some(player) = matched {
            let mut player = player.clone();
            if let Some(bye) = pick.bye_week.filter(|&b| b > 0) {
                player.bye_week = bye;
            }
            return Ok((player, None));
        }

        let position = pick
            .position
            .as_deref()
            .ok_or_else(|| format!("Pick '{name}' has no position; left off the roster"))
            .and_then(|p| {
                Position::parse_draftable(p)
                    .map_err(|_| format!("Pick '{name}' has unknown position '{p}'; left off the roster"))
            })?;
        let player = Player::new(
            name,
            position,
            pro_team.unwrap_or(UNKNOWN_TEAM),
            pick.bye_week.unwrap_or(0),
        );
        Ok((
            player,
            Some(format!("Could not match drafted player '{name}' to rankings")),
        ))
    }
}

/// Owner lookup: case-insensitive exact match first, then containment
/// either way.
pub fn find_owner_team<'a>(board: &'a DraftBoard, owner: &str) -> Result<&'a BoardTeam> {
    let wanted = owner.trim().to_lowercase();
    let exact = board
        .teams
        .iter()
        .find(|t| t.owner.trim().to_lowercase() == wanted);
    let partial = || {
        board.teams.iter().find(|t| {
            let o = t.owner.trim().to_lowercase();
            !o.is_empty() && !wanted.is_empty() && (o.contains(&wanted) || wanted.contains(&o))
        })
    };
    exact.or_else(partial).ok_or_else(|| EngineError::OwnerNotFound {
        owner: owner.to_string(),
        available: board.owners(),
    })
}

/// Round reported by the board, else derived from the pick count.
fn board_round(board: &DraftBoard) -> u32 {
    let num_teams = if board.teams.is_empty() {
        DEFAULT_NUM_TEAMS
    } else {
        board.teams.len()
    };
    board
        .current_round
        .filter(|&r| r > 0)
        .unwrap_or((board.picks.len() / num_teams) as u32 + 1)
}

fn same_sources(requested: &[String], configured: &[String]) -> bool {
    requested.len() == configured.len()
        && requested
            .iter()
            .all(|r| configured.iter().any(|c| c.eq_ignore_ascii_case(r)))
}

fn respond<T>(operation: &str, result: Result<T>) -> AdvisorResponse<T> {
    if let Err(e) = &result {
        warn!("{} failed: {}", operation, e);
    }
    result.into()
}

fn draft_slot(board: &DraftBoard, team: &BoardTeam) -> usize {
    board
        .teams
        .iter()
        .position(|t| t.team_name == team.team_name)
        .map_or(1, |i| i + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board() -> DraftBoard {
        DraftBoard {
            teams: vec![
                BoardTeam {
                    team_name: "Gridiron Gang".into(),
                    owner: "Adam Smith".into(),
                },
                BoardTeam {
                    team_name: "Blitz".into(),
                    owner: "Dan".into(),
                },
            ],
            ..DraftBoard::default()
        }
    }

    #[test]
    fn owner_lookup_exact_then_partial() {
        let board = board();
        assert_eq!(find_owner_team(&board, "dan").unwrap().team_name, "Blitz");
        assert_eq!(
            find_owner_team(&board, "Adam").unwrap().team_name,
            "Gridiron Gang"
        );
        let err = find_owner_team(&board, "Zed").unwrap_err();
        match err {
            EngineError::OwnerNotFound { available, .. } => {
                assert_eq!(available, vec!["Adam Smith", "Dan"]);
            }
            other => panic!("expected OwnerNotFound, got {other}"),
        }
    }

    #[test]
    fn draft_slot_is_one_based() {
        let board = board();
        assert_eq!(draft_slot(&board, &board.teams[1]), 2);
    }

    #[test]
    fn error_response_shape() {
        let response: AdvisorResponse = Err(EngineError::RankingFetch {
            message: "503".into(),
        })
        .into();
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error_type"], "ranking_fetch_failed");
        assert!(json["error"].as_str().unwrap().contains("503"));
        assert!(json.get("primary_pick").is_none());
    }
}
