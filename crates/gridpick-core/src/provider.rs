// Provider boundary: where rankings and the live draft board come from.
//
// Scraping and spreadsheet access live behind these traits; the engine only
// sees the wire types below.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::draft::player::{InjuryStatus, Player, Position, SourceRanking};
use crate::error::Result;
use crate::names::normalize_team_code;
use crate::strategy::guidance::DraftFormat;

/// Source id used when a record carries only aggregate rank and score.
pub const CONSENSUS_SOURCE: &str = "consensus";

// ---------------------------------------------------------------------------
// Rankings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RankingQuery {
    /// Ranking source ids to aggregate. Empty means every source the
    /// provider knows.
    pub sources: Vec<String>,
    pub position: Option<Position>,
    pub limit: Option<usize>,
}

/// One player as reported by a ranking provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedPlayerRecord {
    pub name: String,
    pub position: String,
    #[serde(default)]
    pub team: String,
    #[serde(default)]
    pub bye_week: Option<u32>,
    #[serde(default)]
    pub average_rank: Option<f64>,
    #[serde(default)]
    pub average_score: Option<f64>,
    #[serde(default)]
    pub rankings: BTreeMap<String, SourceRanking>,
    #[serde(default)]
    pub injury_status: Option<String>,
    #[serde(default)]
    pub commentary: Option<String>,
}

impl RankedPlayerRecord {
    /// Convert to an engine [`Player`].
    ///
    /// Team codes are mapped onto the board's convention. A record with no
    /// per-source rankings but an aggregate rank gets a single consensus
    /// ranking so it still values correctly.
    pub fn to_player(&self) -> Result<Player> {
        let position = Position::parse_draftable(&self.position)?;
        let mut player = Player::new(
            self.name.trim(),
            position,
            &normalize_team_code(&self.team),
            self.bye_week.unwrap_or(0),
        );
        player.rankings = self.rankings.clone();
        if player.rankings.is_empty() {
            if let Some(rank) = self.average_rank {
                player.add_ranking(
                    CONSENSUS_SOURCE,
                    rank.round().max(1.0) as u32,
                    self.average_score.unwrap_or(0.0),
                );
            }
        }
        if let Some(status) = self.injury_status.as_deref() {
            player.set_injury_status(InjuryStatus::from_designation(status));
        }
        player.commentary = self
            .commentary
            .as_ref()
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());
        Ok(player)
    }
}

#[async_trait]
pub trait RankingProvider: Send + Sync {
    async fn get_rankings(&self, query: &RankingQuery) -> Result<Vec<RankedPlayerRecord>>;
}

// ---------------------------------------------------------------------------
// Draft board
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardTeam {
    pub team_name: String,
    #[serde(default)]
    pub owner: String,
}

/// A pick as recorded on the board. Boards use two naming conventions for
/// the player cell and the fantasy-team column; use the accessors rather
/// than the raw fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoardPick {
    #[serde(default)]
    pub pick: Option<u32>,
    #[serde(default)]
    pub round: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_name: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_team: Option<String>,
    #[serde(default)]
    pub bye_week: Option<u32>,
}

fn non_blank(s: &Option<String>) -> Option<&str> {
    s.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl BoardPick {
    /// Player cell, `player_name` taking precedence over `player`.
    pub fn player_cell(&self) -> Option<&str> {
        non_blank(&self.player_name).or_else(|| non_blank(&self.player))
    }

    /// Fantasy team that owns the pick, `column_team` taking precedence
    /// over `team`.
    pub fn fantasy_team(&self) -> Option<&str> {
        non_blank(&self.column_team).or_else(|| non_blank(&self.team))
    }
}

/// Auction/keeper layout as reported by the board.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoardRules {
    #[serde(default)]
    pub auction_rounds: Option<Vec<u32>>,
    #[serde(default)]
    pub keeper_round: Option<u32>,
}

impl BoardRules {
    /// Overlay the board's rules on a configured format.
    pub fn apply_to(&self, base: &DraftFormat) -> DraftFormat {
        DraftFormat {
            auction_rounds: self
                .auction_rounds
                .clone()
                .unwrap_or_else(|| base.auction_rounds.clone()),
            keeper_round: self.keeper_round.or(base.keeper_round),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DraftBoard {
    #[serde(default)]
    pub teams: Vec<BoardTeam>,
    #[serde(default)]
    pub picks: Vec<BoardPick>,
    #[serde(default)]
    pub current_round: Option<u32>,
    #[serde(default)]
    pub draft_rules: Option<BoardRules>,
}

impl DraftBoard {
    pub fn owners(&self) -> Vec<String> {
        self.teams.iter().map(|t| t.owner.clone()).collect()
    }
}

#[async_trait]
pub trait DraftStateProvider: Send + Sync {
    async fn get_draft_board(&self) -> Result<DraftBoard>;
}
