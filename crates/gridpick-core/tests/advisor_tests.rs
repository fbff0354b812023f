// Integration tests for the draft advisor.
//
// These tests drive the advisor through its public API with in-memory
// providers standing in for the ranking scraper and the draft spreadsheet.
// They cover drafted-player filtering across naming conventions, owner
// lookup, roster reconstruction, caching, the read-only rankings, progress
// and available-pool views, and the boundary response shape.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use gridpick_core::advisor::{Advisor, AdvisorRequest, AdvisorSettings, DEFAULT_ANALYZE_LIMIT};
use gridpick_core::draft::player::{Position, SourceRanking};
use gridpick_core::error::{EngineError, Result};
use gridpick_core::names::TeamMatch;
use gridpick_core::provider::{
    BoardPick, BoardTeam, DraftBoard, DraftStateProvider, RankedPlayerRecord, RankingProvider,
    RankingQuery,
};
use gridpick_core::strategy::recommend::{EngineSettings, RecommendOptions, Strategy};

// ===========================================================================
// Fakes
// ===========================================================================

#[derive(Clone)]
struct FakeRankings {
    records: Vec<RankedPlayerRecord>,
    calls: Arc<AtomicU32>,
    failing: Arc<AtomicBool>,
}

#[async_trait]
impl RankingProvider for FakeRankings {
    async fn get_rankings(&self, _query: &RankingQuery) -> Result<Vec<RankedPlayerRecord>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(EngineError::RankingFetch {
                message: "rankings site returned 503".into(),
            });
        }
        Ok(self.records.clone())
    }
}

#[derive(Clone)]
struct FakeBoard {
    board: DraftBoard,
    calls: Arc<AtomicU32>,
}

#[async_trait]
impl DraftStateProvider for FakeBoard {
    async fn get_draft_board(&self) -> Result<DraftBoard> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.board.clone())
    }
}

// ===========================================================================
// Test helpers
// ===========================================================================

fn record(name: &str, pos: &str, team: &str, bye: u32, rank: u32, score: f64) -> RankedPlayerRecord {
    RankedPlayerRecord {
        name: name.into(),
        position: pos.into(),
        team: team.into(),
        bye_week: Some(bye),
        average_rank: Some(rank as f64),
        average_score: Some(score),
        rankings: BTreeMap::from([("espn".to_string(), SourceRanking { rank, score })]),
        injury_status: None,
        commentary: None,
    }
}

fn rankings() -> Vec<RankedPlayerRecord> {
    vec![
        record("Christian McCaffrey", "RB", "SFO", 9, 1, 99.0),
        record("Bijan Robinson", "RB", "ATL", 12, 2, 97.0),
        record("Ja'Marr Chase", "WR", "CIN", 10, 3, 96.0),
        record("Travis Etienne", "RB", "JAX", 8, 20, 84.0),
        record("Josh Allen", "QB", "BUF", 7, 25, 90.0),
        record("Kenneth Walker III", "RB", "SEA", 8, 30, 78.0),
        record("Sam LaPorta", "TE", "DET", 5, 40, 70.0),
        record("Tom Brady", "QB", "TBB", 11, 150, 30.0),
        record("Jake Elliott", "K", "PHI", 5, 160, 20.0),
        record("Eagles D/ST", "DST", "PHI", 5, 170, 18.0),
        record("John Walker Smith", "WR", "DAL", 7, 180, 12.0),
    ]
}

fn pick(round: u32, cell: &str, position: &str, fantasy_team: &str) -> BoardPick {
    BoardPick {
        round: Some(round),
        player_name: Some(cell.into()),
        position: Some(position.into()),
        column_team: Some(fantasy_team.into()),
        ..BoardPick::default()
    }
}

fn board() -> DraftBoard {
    DraftBoard {
        teams: vec![
            BoardTeam {
                team_name: "Gridiron Gang".into(),
                owner: "Adam".into(),
            },
            BoardTeam {
                team_name: "Blitz".into(),
                owner: "Dan".into(),
            },
        ],
        picks: vec![
            pick(1, "Christian McCaffrey SF", "RB", "Blitz"),
            pick(1, "Travis Etienne Jr.   JAC", "RB", "Gridiron Gang"),
            BoardPick {
                round: Some(2),
                player: Some("Mystery Rookie".into()),
                position: Some("WR".into()),
                team: Some("Gridiron Gang".into()),
                bye_week: Some(9),
                ..BoardPick::default()
            },
            pick(2, "Tom Brady", "QB", "Blitz"),
        ],
        current_round: None,
        draft_rules: None,
    }
}

fn settings() -> AdvisorSettings {
    AdvisorSettings {
        engine: EngineSettings::default(),
        defaults: RecommendOptions::default(),
        owner: "Adam".into(),
        rounds: 15,
        snake: true,
        team_match: TeamMatch::Prefix,
        ranking_sources: vec!["espn".into()],
        rankings_ttl: Duration::from_secs(6 * 3600),
        draft_board_ttl: Duration::from_secs(30),
    }
}

struct Harness {
    advisor: Advisor<FakeRankings, FakeBoard>,
    ranking_calls: Arc<AtomicU32>,
    board_calls: Arc<AtomicU32>,
    failing: Arc<AtomicBool>,
}

fn harness(board: DraftBoard) -> Harness {
    harness_with(board, settings())
}

fn harness_with(board: DraftBoard, settings: AdvisorSettings) -> Harness {
    let ranking_calls = Arc::new(AtomicU32::new(0));
    let board_calls = Arc::new(AtomicU32::new(0));
    let failing = Arc::new(AtomicBool::new(false));
    let advisor = Advisor::new(
        FakeRankings {
            records: rankings(),
            calls: ranking_calls.clone(),
            failing: failing.clone(),
        },
        FakeBoard {
            board,
            calls: board_calls.clone(),
        },
        settings,
    );
    Harness {
        advisor,
        ranking_calls,
        board_calls,
        failing,
    }
}

// ===========================================================================
// Recommendations
// ===========================================================================

#[tokio::test]
async fn drafted_players_are_filtered_across_spellings() {
    let h = harness(board());
    let report = h
        .advisor
        .try_suggest_pick(&AdvisorRequest::default())
        .await
        .unwrap();

    assert_eq!(report.team_name, "Gridiron Gang");
    assert_eq!(report.picks_made, 4);
    // 11 ranked, minus McCaffrey (SF/SFO), Etienne (Jr., JAC/JAX), Brady (no team).
    assert_eq!(report.total_available, 8);

    let rec = &report.recommendation;
    let suggested: Vec<&str> = rec
        .primary_pick
        .iter()
        .chain(&rec.alternatives)
        .map(|c| c.analysis.player.name.as_str())
        .collect();
    assert_eq!(suggested.len(), 4);
    for drafted in ["Christian McCaffrey", "Travis Etienne", "Tom Brady"] {
        assert!(!suggested.contains(&drafted), "{drafted} was already drafted");
    }
    // 4 picks over 2 teams.
    assert_eq!(rec.current_round, 3);
    assert_eq!(rec.strategy_used, Strategy::Balanced);
}

#[tokio::test]
async fn owner_roster_is_rebuilt_from_board() {
    let h = harness(board());
    let report = h
        .advisor
        .roster_report(Some("adam"), false)
        .await
        .unwrap();

    let names: Vec<&str> = report.roster.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Travis Etienne", "Mystery Rookie"]);

    // Matched player keeps rankings data; unmatched one gets UNK.
    assert_eq!(report.roster[0].team, "JAX");
    assert!(report.roster[0].average_rank().is_some());
    assert_eq!(report.roster[1].team, "UNK");
    assert_eq!(report.roster[1].bye_week, 9);
    assert_eq!(report.roster[1].position, Position::WideReceiver);
    assert!(report
        .data_warnings
        .contains(&"Could not match drafted player 'Mystery Rookie' to rankings".to_string()));

    assert!(report.validation.is_valid);
    assert_eq!(report.position_needs.need(Position::RunningBack), 1);
    assert_eq!(report.remaining_slots[&Position::RunningBack], 7);
}

#[tokio::test]
async fn unknown_owner_is_reported_not_raised() {
    let h = harness(board());
    let response = h
        .advisor
        .suggest_pick(&AdvisorRequest {
            owner: Some("Zed".into()),
            ..AdvisorRequest::default()
        })
        .await;

    assert!(!response.success);
    assert_eq!(response.error_type.as_deref(), Some("owner_not_found"));
    let message = response.error.unwrap();
    assert!(message.contains("Zed"));
    assert!(message.contains("Dan"));
}

#[tokio::test]
async fn success_response_serializes_flat() {
    let h = harness(board());
    let response = h.advisor.suggest_pick(&AdvisorRequest::default()).await;
    let json = serde_json::to_value(&response).unwrap();

    assert_eq!(json["success"], true);
    assert!(json.get("error").is_none());
    assert!(json["primary_pick"]["player"]["name"].is_string());
    assert!(json["alternatives"].is_array());
    assert!(json["roster_analysis"]["position_needs"].is_array());
    assert!(json["strategic_guidance"]["round_guidance"]["key_focus"].is_string());
    assert!(json["confidence_factors"]["high_confidence"].is_boolean());
    assert_eq!(json["team_name"], "Gridiron Gang");
}

#[tokio::test]
async fn qb_warning_once_round_passes_six() {
    let mut late = board();
    late.current_round = Some(8);
    let h = harness(late);
    let report = h
        .advisor
        .try_suggest_pick(&AdvisorRequest::default())
        .await
        .unwrap();

    let advice = &report.recommendation.strategic_guidance.advice;
    assert!(advice
        .warnings
        .contains(&"No QB drafted yet - becoming urgent".to_string()));
    assert_eq!(report.recommendation.current_round, 8);
}

#[tokio::test]
async fn request_overrides_strategy_and_bye_weeks() {
    let h = harness(board());
    let report = h
        .advisor
        .try_suggest_pick(&AdvisorRequest {
            strategy: Some(Strategy::BestAvailable),
            consider_bye_weeks: Some(false),
            ..AdvisorRequest::default()
        })
        .await
        .unwrap();

    let rec = &report.recommendation;
    assert_eq!(rec.strategy_used, Strategy::BestAvailable);
    assert!(!rec.consider_bye_weeks);
    let primary = rec.primary_pick.as_ref().unwrap();
    assert!((primary.bye_week_factor - 1.0).abs() < 1e-9);
}

#[tokio::test]
async fn board_draft_rules_override_format() {
    let mut custom = board();
    custom.current_round = Some(4);
    custom.draft_rules = Some(gridpick_core::provider::BoardRules {
        auction_rounds: Some(vec![]),
        keeper_round: Some(9),
    });
    let h = harness(custom);
    let report = h
        .advisor
        .try_suggest_pick(&AdvisorRequest::default())
        .await
        .unwrap();
    assert_eq!(
        report.recommendation.round_type,
        gridpick_core::strategy::guidance::RoundType::EarlySnake
    );
}

// ===========================================================================
// Caching
// ===========================================================================

#[tokio::test]
async fn providers_are_called_once_within_ttl() {
    let h = harness(board());
    h.advisor.suggest_pick(&AdvisorRequest::default()).await;
    h.advisor.suggest_pick(&AdvisorRequest::default()).await;
    assert_eq!(h.ranking_calls.load(Ordering::SeqCst), 1);
    assert_eq!(h.board_calls.load(Ordering::SeqCst), 1);

    h.advisor
        .suggest_pick(&AdvisorRequest {
            force_refresh: true,
            ..AdvisorRequest::default()
        })
        .await;
    assert_eq!(h.ranking_calls.load(Ordering::SeqCst), 2);
    assert_eq!(h.board_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn board_cache_expires_before_rankings() {
    let h = harness(board());
    h.advisor.suggest_pick(&AdvisorRequest::default()).await;
    tokio::time::advance(Duration::from_secs(31)).await;
    h.advisor.suggest_pick(&AdvisorRequest::default()).await;

    assert_eq!(h.board_calls.load(Ordering::SeqCst), 2);
    assert_eq!(h.ranking_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn ranking_failures_are_not_cached() {
    let h = harness(board());
    h.failing.store(true, Ordering::SeqCst);

    let failed = h.advisor.suggest_pick(&AdvisorRequest::default()).await;
    assert!(!failed.success);
    assert_eq!(failed.error_type.as_deref(), Some("ranking_fetch_failed"));

    h.failing.store(false, Ordering::SeqCst);
    let ok = h.advisor.suggest_pick(&AdvisorRequest::default()).await;
    assert!(ok.success);
    assert_eq!(h.ranking_calls.load(Ordering::SeqCst), 2);
}

// ===========================================================================
// Player lookup
// ===========================================================================

#[tokio::test]
async fn last_name_lookup_ignores_middle_names() {
    let h = harness(board());
    let found = h.advisor.player_info("Walker", None, false).await.unwrap();
    let names: Vec<&str> = found.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Kenneth Walker III"]);

    let by_team = h
        .advisor
        .player_info("Robinson", Some("KC"), false)
        .await
        .unwrap();
    assert!(by_team.is_empty());

    let sf = h
        .advisor
        .player_info("McCaffrey", Some("SF"), false)
        .await
        .unwrap();
    assert_eq!(sf.len(), 1);
}

// ===========================================================================
// Rankings
// ===========================================================================

#[tokio::test]
async fn rankings_filter_by_position_and_limit() {
    let h = harness(board());
    let query = RankingQuery {
        position: Some(Position::RunningBack),
        limit: Some(2),
        ..RankingQuery::default()
    };
    let response = h.advisor.rankings(&query, false).await;
    assert!(response.success, "{:?}", response.error);

    let report = response.report.unwrap();
    assert_eq!(report.sources, vec!["espn"]);
    // McCaffrey, Bijan, Etienne and Walker; drafted players stay ranked.
    assert_eq!(report.count, 4);
    let names: Vec<&str> = report.players.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Christian McCaffrey", "Bijan Robinson"]);

    // Configured sources are served from the cache.
    h.advisor.rankings(&RankingQuery::default(), false).await;
    assert_eq!(h.ranking_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn rankings_for_other_sources_skip_the_cache() {
    let h = harness(board());
    let query = RankingQuery {
        sources: vec!["fantasypros".into()],
        ..RankingQuery::default()
    };
    let first = h.advisor.rankings(&query, false).await.report.unwrap();
    assert_eq!(first.sources, vec!["fantasypros"]);
    assert_eq!(first.count, 11);

    h.advisor.rankings(&query, false).await;
    assert_eq!(h.ranking_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn rankings_failure_uses_error_shape() {
    let h = harness(board());
    h.failing.store(true, Ordering::SeqCst);

    let response = h.advisor.rankings(&RankingQuery::default(), false).await;
    assert!(!response.success);
    assert_eq!(response.error_type.as_deref(), Some("ranking_fetch_failed"));

    let json = serde_json::to_value(&response).unwrap();
    assert!(json.get("players").is_none());
    assert!(json["error"].as_str().unwrap().contains("503"));
}

// ===========================================================================
// Draft progress
// ===========================================================================

#[tokio::test]
async fn progress_reports_picks_and_next_team() {
    let h = harness(board());
    let response = h.advisor.draft_progress(false).await;
    assert!(response.success, "{:?}", response.error);

    let progress = response.report.unwrap();
    assert_eq!(progress.total_teams, 2);
    assert_eq!(progress.total_picks, 4);
    assert_eq!(progress.current_pick, 5);
    assert_eq!(progress.current_round, 3);
    // Snake order: round 3 runs forward again, so slot 1 is up.
    assert_eq!(progress.on_the_clock.as_deref(), Some("Gridiron Gang"));
    assert!(!progress.is_complete);

    let gang = &progress.teams[0];
    assert_eq!(gang.owner, "Adam");
    assert_eq!(gang.draft_slot, 1);
    let names: Vec<&str> = gang.picks.iter().map(|p| p.player.as_str()).collect();
    assert_eq!(names, vec!["Travis Etienne Jr.", "Mystery Rookie"]);

    let rookie = &progress.picks[2];
    assert_eq!(rookie.pick, 3);
    assert_eq!(rookie.owner.as_deref(), Some("Adam"));
    assert_eq!(rookie.position, Some(Position::WideReceiver));
    assert_eq!(rookie.bye_week, Some(9));

    // Progress reads the board only.
    assert_eq!(h.ranking_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn progress_has_no_team_on_the_clock_once_complete() {
    let h = harness_with(
        board(),
        AdvisorSettings {
            rounds: 2,
            ..settings()
        },
    );
    let progress = h.advisor.draft_progress(false).await.report.unwrap();
    assert!(progress.is_complete);
    assert!(progress.on_the_clock.is_none());
}

// ===========================================================================
// Available players
// ===========================================================================

#[tokio::test]
async fn available_analysis_excludes_drafted_players() {
    let h = harness(board());
    let response = h.advisor.analyze_available(None, None, false).await;
    assert!(response.success, "{:?}", response.error);

    let report = response.report.unwrap();
    assert_eq!(report.team_name.as_deref(), Some("Gridiron Gang"));
    assert_eq!(report.limit, DEFAULT_ANALYZE_LIMIT);
    assert_eq!(report.analysis.total_available, 8);
    for drafted in ["Christian McCaffrey", "Travis Etienne", "Tom Brady"] {
        assert!(report
            .analysis
            .players
            .iter()
            .all(|a| a.player.name != drafted));
    }

    let json = serde_json::to_value(&report).unwrap();
    assert!(json["position_breakdown"].is_array());
    assert!(json["highlights"].is_object());
}

#[tokio::test]
async fn available_analysis_narrows_by_position() {
    let h = harness(board());
    let report = h
        .advisor
        .analyze_available(Some(Position::RunningBack), Some(1), false)
        .await
        .report
        .unwrap();

    // Bijan and Walker remain at RB.
    assert_eq!(report.analysis.total_available, 2);
    assert_eq!(report.analysis.players.len(), 1);
    assert_eq!(report.analysis.players[0].position(), Position::RunningBack);
    assert_eq!(report.position, Some(Position::RunningBack));
}

#[tokio::test]
async fn available_analysis_without_owner_is_general() {
    let h = harness_with(
        board(),
        AdvisorSettings {
            owner: "Zed".into(),
            ..settings()
        },
    );
    let response = h.advisor.analyze_available(None, None, false).await;
    assert!(response.success, "{:?}", response.error);

    let report = response.report.unwrap();
    assert!(report.team_name.is_none());
    assert!(report.owner.is_none());
    assert_eq!(report.analysis.total_available, 8);
    assert!(report.data_warnings.iter().any(|w| w.contains("Zed")));
}
