// Player identity, positions, injury status and per-source rankings.

use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Fantasy football roster positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Position {
    #[serde(rename = "QB")]
    Quarterback,
    #[serde(rename = "RB")]
    RunningBack,
    #[serde(rename = "WR")]
    WideReceiver,
    #[serde(rename = "TE")]
    TightEnd,
    #[serde(rename = "K")]
    Kicker,
    #[serde(rename = "DST", alias = "D/ST", alias = "DEF")]
    Defense,
    /// Starter slot fillable by any FLEX-eligible position.
    #[serde(rename = "FLEX")]
    Flex,
    #[serde(rename = "BE")]
    Bench,
    #[serde(rename = "IR")]
    InjuredReserve,
}

/// Positions a real player can be drafted at, in display order.
pub const DRAFTABLE_POSITIONS: [Position; 6] = [
    Position::Quarterback,
    Position::RunningBack,
    Position::WideReceiver,
    Position::TightEnd,
    Position::Kicker,
    Position::Defense,
];

impl Position {
    /// Parse a position string into a Position.
    ///
    /// Case-insensitive. Defense aliases "D/ST", "DEF" and "D" map to DST,
    /// "BN"/"BENCH" map to bench.
    pub fn from_str_pos(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "QB" => Some(Position::Quarterback),
            "RB" => Some(Position::RunningBack),
            "WR" => Some(Position::WideReceiver),
            "TE" => Some(Position::TightEnd),
            "K" => Some(Position::Kicker),
            "DST" | "D/ST" | "DEF" | "D" => Some(Position::Defense),
            "FLEX" => Some(Position::Flex),
            "BE" | "BN" | "BENCH" => Some(Position::Bench),
            "IR" => Some(Position::InjuredReserve),
            _ => None,
        }
    }

    /// Parse a position a player can actually be drafted at.
    ///
    /// Meta slots (FLEX, BE, IR) and unknown strings are configuration errors.
    pub fn parse_draftable(s: &str) -> Result<Self> {
        match Self::from_str_pos(s) {
            Some(pos) if pos.is_draftable() => Ok(pos),
            _ => Err(EngineError::InvalidPosition {
                position: s.to_string(),
            }),
        }
    }

    /// Return the display string for this position.
    pub fn display_str(&self) -> &'static str {
        match self {
            Position::Quarterback => "QB",
            Position::RunningBack => "RB",
            Position::WideReceiver => "WR",
            Position::TightEnd => "TE",
            Position::Kicker => "K",
            Position::Defense => "DST",
            Position::Flex => "FLEX",
            Position::Bench => "BE",
            Position::InjuredReserve => "IR",
        }
    }

    /// Whether this is a real playing position (not FLEX/BE/IR).
    pub fn is_draftable(&self) -> bool {
        !matches!(
            self,
            Position::Flex | Position::Bench | Position::InjuredReserve
        )
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_str())
    }
}

// ---------------------------------------------------------------------------
// Injury status
// ---------------------------------------------------------------------------

/// Standard NFL injury designations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InjuryStatus {
    #[default]
    #[serde(rename = "HEALTHY")]
    Healthy,
    #[serde(rename = "P", alias = "PROBABLE")]
    Probable,
    #[serde(rename = "Q", alias = "QUESTIONABLE")]
    Questionable,
    #[serde(rename = "D", alias = "DOUBTFUL")]
    Doubtful,
    #[serde(rename = "O", alias = "OUT")]
    Out,
    #[serde(rename = "IR")]
    InjuredReserve,
}

impl InjuryStatus {
    /// Parse a designation as reported by ranking sources. Unknown or empty
    /// strings are treated as healthy.
    pub fn from_designation(s: &str) -> Self {
        match s.trim().to_uppercase().as_str() {
            "P" | "PROBABLE" => InjuryStatus::Probable,
            "Q" | "QUESTIONABLE" => InjuryStatus::Questionable,
            "D" | "DOUBTFUL" => InjuryStatus::Doubtful,
            "O" | "OUT" => InjuryStatus::Out,
            "IR" => InjuryStatus::InjuredReserve,
            _ => InjuryStatus::Healthy,
        }
    }

    /// Whether the designation makes the player a candidate for an IR slot.
    pub fn is_injured(&self) -> bool {
        matches!(
            self,
            InjuryStatus::Questionable
                | InjuryStatus::Doubtful
                | InjuryStatus::Out
                | InjuryStatus::InjuredReserve
        )
    }
}

// ---------------------------------------------------------------------------
// Player
// ---------------------------------------------------------------------------

/// One ranking source's opinion of a player.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SourceRanking {
    pub rank: u32,
    pub score: f64,
}

/// A draftable player.
///
/// Identity is (name, team, position): two values describing the same player
/// compare equal even if their rankings or injury status differ.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub position: Position,
    /// Pro team abbreviation (e.g. "SF").
    pub team: String,
    pub bye_week: u32,
    #[serde(default)]
    pub injury_status: InjuryStatus,
    /// Ranking source identifier -> rank/score.
    #[serde(default)]
    pub rankings: BTreeMap<String, SourceRanking>,
    /// Analyst notes attached by a ranking source.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commentary: Option<String>,
}

impl Player {
    pub fn new(name: &str, position: Position, team: &str, bye_week: u32) -> Self {
        Player {
            name: name.to_string(),
            position,
            team: team.to_string(),
            bye_week,
            injury_status: InjuryStatus::Healthy,
            rankings: BTreeMap::new(),
            commentary: None,
        }
    }

    /// Builder-style variant of [`Player::add_ranking`].
    pub fn with_ranking(mut self, source: &str, rank: u32, score: f64) -> Self {
        self.add_ranking(source, rank, score);
        self
    }

    /// Record (or replace) a source's ranking.
    pub fn add_ranking(&mut self, source: &str, rank: u32, score: f64) {
        self.rankings
            .insert(source.to_string(), SourceRanking { rank, score });
    }

    pub fn set_injury_status(&mut self, status: InjuryStatus) {
        self.injury_status = status;
    }

    pub fn is_injured(&self) -> bool {
        self.injury_status.is_injured()
    }

    /// Mean rank across all sources, `None` when no source ranked the player.
    pub fn average_rank(&self) -> Option<f64> {
        if self.rankings.is_empty() {
            return None;
        }
        let total: f64 = self.rankings.values().map(|r| r.rank as f64).sum();
        Some(total / self.rankings.len() as f64)
    }

    /// Mean score across all sources, `None` when no source ranked the player.
    pub fn average_score(&self) -> Option<f64> {
        if self.rankings.is_empty() {
            return None;
        }
        let total: f64 = self.rankings.values().map(|r| r.score).sum();
        Some(total / self.rankings.len() as f64)
    }
}

impl PartialEq for Player {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.team == other.team && self.position == other.position
    }
}

impl Eq for Player {}

impl Hash for Player {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.team.hash(state);
        self.position.hash(state);
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} - {})", self.name, self.position, self.team)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
        (a - b).abs() < epsilon
    }

    #[test]
    fn from_str_pos_standard_and_aliases() {
        assert_eq!(Position::from_str_pos("qb"), Some(Position::Quarterback));
        assert_eq!(Position::from_str_pos("D/ST"), Some(Position::Defense));
        assert_eq!(Position::from_str_pos("DEF"), Some(Position::Defense));
        assert_eq!(Position::from_str_pos("bn"), Some(Position::Bench));
        assert_eq!(Position::from_str_pos("FLEX"), Some(Position::Flex));
        assert_eq!(Position::from_str_pos("LB"), None);
    }

    #[test]
    fn parse_draftable_rejects_meta_slots() {
        assert_eq!(Position::parse_draftable("te"), Ok(Position::TightEnd));
        assert!(matches!(
            Position::parse_draftable("FLEX"),
            Err(EngineError::InvalidPosition { .. })
        ));
        assert!(matches!(
            Position::parse_draftable("XX"),
            Err(EngineError::InvalidPosition { .. })
        ));
    }

    #[test]
    fn position_serializes_as_code() {
        let json = serde_json::to_string(&Position::Defense).unwrap();
        assert_eq!(json, "\"DST\"");
        let parsed: Position = serde_json::from_str("\"D/ST\"").unwrap();
        assert_eq!(parsed, Position::Defense);
    }

    #[test]
    fn averages_are_none_without_rankings() {
        let p = Player::new("Unranked Guy", Position::WideReceiver, "NYJ", 9);
        assert!(p.average_rank().is_none());
        assert!(p.average_score().is_none());
    }

    #[test]
    fn averages_over_sources() {
        let p = Player::new("Ja'Marr Chase", Position::WideReceiver, "CIN", 10)
            .with_ranking("espn", 1, 98.0)
            .with_ranking("yahoo", 3, 94.0);
        assert!(approx_eq(p.average_rank().unwrap(), 2.0, 1e-9));
        assert!(approx_eq(p.average_score().unwrap(), 96.0, 1e-9));
    }

    #[test]
    fn equality_ignores_rankings_and_injury() {
        let a = Player::new("Josh Allen", Position::Quarterback, "BUF", 7).with_ranking("espn", 2, 95.0);
        let mut b = Player::new("Josh Allen", Position::Quarterback, "BUF", 7);
        b.set_injury_status(InjuryStatus::Questionable);
        assert_eq!(a, b);

        let mut set = HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));

        let other_team = Player::new("Josh Allen", Position::Quarterback, "JAX", 7);
        assert!(!set.contains(&other_team));
    }

    #[test]
    fn injury_designations() {
        assert!(!InjuryStatus::from_designation("P").is_injured());
        assert!(InjuryStatus::from_designation("q").is_injured());
        assert!(InjuryStatus::from_designation("OUT").is_injured());
        assert_eq!(InjuryStatus::from_designation(""), InjuryStatus::Healthy);
    }

    #[test]
    fn serde_round_trip_preserves_identity_and_rankings() {
        let mut p = Player::new("Travis Kelce", Position::TightEnd, "KC", 10)
            .with_ranking("fantasysharks", 20, 80.5);
        p.commentary = Some("Aging but elite target share".into());
        p.set_injury_status(InjuryStatus::Doubtful);

        let json = serde_json::to_string(&p).unwrap();
        let back: Player = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
        assert_eq!(back.rankings, p.rankings);
        assert_eq!(back.injury_status, InjuryStatus::Doubtful);
        assert_eq!(back.commentary, p.commentary);
    }
}
