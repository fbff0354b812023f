// File-backed providers: rankings CSV and draft board JSON.

use std::collections::{BTreeMap, HashMap};
use std::io::Read;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use gridpick_core::draft::player::{Position, SourceRanking};
use gridpick_core::error::{EngineError, Result};
use gridpick_core::names::normalize_player_name;
use gridpick_core::provider::{
    DraftBoard, DraftStateProvider, RankedPlayerRecord, RankingProvider, RankingQuery,
};
use serde::Deserialize;
use tracing::{info, warn};

// ---------------------------------------------------------------------------
// Rankings CSV
// ---------------------------------------------------------------------------

/// One row of the rankings file: a single source's view of a single player.
#[derive(Debug, Deserialize)]
struct RawRankingRow {
    name: String,
    position: String,
    #[serde(default)]
    team: String,
    #[serde(default)]
    bye_week: Option<u32>,
    source: String,
    rank: u32,
    score: f64,
    #[serde(default)]
    injury_status: Option<String>,
    #[serde(default)]
    commentary: Option<String>,
}

/// Rankings read from a CSV file with one row per player per source.
#[derive(Debug, Clone)]
pub struct CsvRankingProvider {
    path: PathBuf,
}

impl CsvRankingProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        CsvRankingProvider { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl RankingProvider for CsvRankingProvider {
    async fn get_rankings(&self, query: &RankingQuery) -> Result<Vec<RankedPlayerRecord>> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|e| EngineError::RankingFetch {
                message: format!("failed to read {}: {e}", self.path.display()),
            })?;
        let records = records_from_reader(bytes.as_slice(), query).map_err(|e| {
            EngineError::RankingFetch {
                message: format!("CSV error in {}: {e}", self.path.display()),
            }
        })?;
        info!(
            "Loaded {} ranked players from {}",
            records.len(),
            self.path.display()
        );
        Ok(records)
    }
}

/// Aggregate rows into one record per player, best average rank first.
///
/// Rows from sources outside `query.sources` are ignored (an empty list keeps
/// every source). Malformed rows are skipped with a warning.
fn records_from_reader<R: Read>(
    rdr: R,
    query: &RankingQuery,
) -> std::result::Result<Vec<RankedPlayerRecord>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(rdr);
    let wanted: Vec<String> = query.sources.iter().map(|s| s.to_lowercase()).collect();

    let mut records: Vec<RankedPlayerRecord> = Vec::new();
    let mut index: HashMap<(String, String), usize> = HashMap::new();

    for result in reader.deserialize::<RawRankingRow>() {
        let row = match result {
            Ok(row) => row,
            Err(e) => {
                warn!("skipping malformed ranking row: {}", e);
                continue;
            }
        };
        let source = row.source.to_lowercase();
        if !wanted.is_empty() && !wanted.contains(&source) {
            continue;
        }
        if !row.score.is_finite() {
            warn!("skipping '{}' from {}: non-finite score", row.name, source);
            continue;
        }
        if let Some(position) = query.position {
            match Position::parse_draftable(&row.position) {
                Ok(p) if p == position => {}
                _ => continue,
            }
        }

        let key = (normalize_player_name(&row.name), row.team.to_ascii_uppercase());
        let idx = *index.entry(key).or_insert_with(|| {
            records.push(RankedPlayerRecord {
                name: row.name.clone(),
                position: row.position.clone(),
                team: row.team.clone(),
                bye_week: None,
                average_rank: None,
                average_score: None,
                rankings: BTreeMap::new(),
                injury_status: None,
                commentary: None,
            });
            records.len() - 1
        });

        let record = &mut records[idx];
        if record.rankings.contains_key(&source) {
            warn!(
                "duplicate {} ranking for '{}', using latest value",
                source, row.name
            );
        }
        record.rankings.insert(
            source,
            SourceRanking {
                rank: row.rank,
                score: row.score,
            },
        );
        record.bye_week = record.bye_week.or(row.bye_week.filter(|&b| b > 0));
        record.injury_status = record
            .injury_status
            .take()
            .or(row.injury_status.filter(|s| !s.is_empty()));
        record.commentary = record
            .commentary
            .take()
            .or(row.commentary.filter(|s| !s.is_empty()));
    }

    for record in &mut records {
        let n = record.rankings.len() as f64;
        if n > 0.0 {
            let rank_sum: f64 = record.rankings.values().map(|r| r.rank as f64).sum();
            let score_sum: f64 = record.rankings.values().map(|r| r.score).sum();
            record.average_rank = Some(rank_sum / n);
            record.average_score = Some(score_sum / n);
        }
    }

    records.sort_by(|a, b| {
        let ra = a.average_rank.unwrap_or(f64::MAX);
        let rb = b.average_rank.unwrap_or(f64::MAX);
        ra.partial_cmp(&rb).unwrap_or(std::cmp::Ordering::Equal)
    });
    if let Some(limit) = query.limit {
        records.truncate(limit);
    }
    Ok(records)
}

// ---------------------------------------------------------------------------
// Draft board JSON
// ---------------------------------------------------------------------------

/// Draft board read from a JSON export of the league's draft sheet.
#[derive(Debug, Clone)]
pub struct JsonBoardProvider {
    path: PathBuf,
}

impl JsonBoardProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonBoardProvider { path: path.into() }
    }
}

#[async_trait]
impl DraftStateProvider for JsonBoardProvider {
    async fn get_draft_board(&self) -> Result<DraftBoard> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|e| EngineError::DraftStateFetch {
                message: format!("failed to read {}: {e}", self.path.display()),
            })?;
        let board: DraftBoard =
            serde_json::from_slice(&bytes).map_err(|e| EngineError::DraftStateFetch {
                message: format!("invalid draft board {}: {e}", self.path.display()),
            })?;
        info!(
            "Loaded draft board: {} teams, {} picks",
            board.teams.len(),
            board.picks.len()
        );
        Ok(board)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RANKINGS: &str = "\
name,position,team,bye_week,source,rank,score,injury_status,commentary
Christian McCaffrey,RB,SFO,9,espn,1,98.0,,
Christian McCaffrey,RB,SFO,9,yahoo,3,94.0,Q,Achilles watch
Ja'Marr Chase,WR,CIN,10,espn,2,96.0,,
Ja'Marr Chase,WR,CIN,10,fantasypros,4,92.0,,
Josh Allen,QB,BUF,7,espn,12,90.0,,
Bad Row,RB,ATL,5,espn,notanumber,1.0,,
";

    fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() < eps
    }

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("gridpick_sources_{name}"));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn rows_aggregate_per_player() {
        let records = records_from_reader(RANKINGS.as_bytes(), &RankingQuery::default()).unwrap();
        assert_eq!(records.len(), 3);

        let cmc = &records[0];
        assert_eq!(cmc.name, "Christian McCaffrey");
        assert_eq!(cmc.rankings.len(), 2);
        assert!(approx_eq(cmc.average_rank.unwrap(), 2.0, 1e-9));
        assert!(approx_eq(cmc.average_score.unwrap(), 96.0, 1e-9));
        assert_eq!(cmc.injury_status.as_deref(), Some("Q"));
        assert_eq!(cmc.commentary.as_deref(), Some("Achilles watch"));

        assert_eq!(records[1].name, "Ja'Marr Chase");
        assert_eq!(records[2].name, "Josh Allen");
    }

    #[test]
    fn source_position_and_limit_filters() {
        let query = RankingQuery {
            sources: vec!["ESPN".into()],
            position: None,
            limit: Some(2),
        };
        let records = records_from_reader(RANKINGS.as_bytes(), &query).unwrap();
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.rankings.keys().all(|k| k == "espn")));

        let qbs = RankingQuery {
            position: Some(Position::Quarterback),
            ..RankingQuery::default()
        };
        let records = records_from_reader(RANKINGS.as_bytes(), &qbs).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Josh Allen");
    }

    #[tokio::test]
    async fn csv_provider_reads_file() {
        let path = temp_file("rankings.csv", RANKINGS);
        let provider = CsvRankingProvider::new(&path);
        let records = provider.get_rankings(&RankingQuery::default()).await.unwrap();
        assert_eq!(records.len(), 3);
        let player = records[0].to_player().unwrap();
        assert_eq!(player.team, "SF");
    }

    #[tokio::test]
    async fn missing_rankings_file_is_fetch_error() {
        let provider = CsvRankingProvider::new("/nonexistent/gridpick/rankings.csv");
        let err = provider
            .get_rankings(&RankingQuery::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "ranking_fetch_failed");
    }

    #[tokio::test]
    async fn board_provider_parses_json() {
        let path = temp_file(
            "draft_board.json",
            r#"{
                "teams": [{"team_name": "Gridiron Gang", "owner": "Adam"}],
                "picks": [{"round": 1, "player_name": "Bijan Robinson ATL",
                           "position": "RB", "column_team": "Gridiron Gang"}],
                "current_round": 2
            }"#,
        );
        let board = JsonBoardProvider::new(&path).get_draft_board().await.unwrap();
        assert_eq!(board.teams.len(), 1);
        assert_eq!(board.picks[0].player_cell(), Some("Bijan Robinson ATL"));
        assert_eq!(board.current_round, Some(2));
    }

    #[tokio::test]
    async fn malformed_board_is_draft_state_error() {
        let path = temp_file("bad_board.json", "{ not json");
        let err = JsonBoardProvider::new(&path)
            .get_draft_board()
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "draft_state_failed");
    }
}
