// Composite player value: rank value, scarcity and bye-week factor combined,
// plus tier labels and per-position summaries of the available pool.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::bye_week::{ByeProfile, ByeWeekImpact, ByeWeekSummary, ConflictSeverity};
use super::scarcity::{ScarcityLevel, ScarcityPolicy};
use crate::draft::player::{Player, Position, DRAFTABLE_POSITIONS};
use crate::draft::roster::Team;
use crate::rules::RosterRules;

/// Rank and score assumed for players no source ranked.
pub const UNRANKED_AVG_RANK: f64 = 999.0;
pub const UNRANKED_AVG_SCORE: f64 = 0.0;

/// Average rank at or beyond which rank value is zero.
const RANK_VALUE_CEILING: f64 = 200.0;
const SCORE_WEIGHT: f64 = 0.1;
/// A top-5 player at a position with fewer than this many left is a run.
const POSITIONAL_RUN_DEPTH: usize = 20;

// ---------------------------------------------------------------------------
// Tiers
// ---------------------------------------------------------------------------

/// Overall-rank tier. Display only; never feeds the value formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Tier {
    Elite,
    #[serde(rename = "Tier 1")]
    Tier1,
    #[serde(rename = "Tier 2")]
    Tier2,
    #[serde(rename = "Tier 3")]
    Tier3,
    #[serde(rename = "Tier 4")]
    Tier4,
    Deep,
}

impl Tier {
    pub fn from_avg_rank(avg_rank: f64) -> Self {
        if avg_rank <= 12.0 {
            Tier::Elite
        } else if avg_rank <= 36.0 {
            Tier::Tier1
        } else if avg_rank <= 60.0 {
            Tier::Tier2
        } else if avg_rank <= 100.0 {
            Tier::Tier3
        } else if avg_rank <= 150.0 {
            Tier::Tier4
        } else {
            Tier::Deep
        }
    }

    /// 1 (Elite) through 6 (Deep).
    pub fn rank(&self) -> u8 {
        match self {
            Tier::Elite => 1,
            Tier::Tier1 => 2,
            Tier::Tier2 => 3,
            Tier::Tier3 => 4,
            Tier::Tier4 => 5,
            Tier::Deep => 6,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tier::Elite => "Elite",
            Tier::Tier1 => "Tier 1",
            Tier::Tier2 => "Tier 2",
            Tier::Tier3 => "Tier 3",
            Tier::Tier4 => "Tier 4",
            Tier::Deep => "Deep",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Value
// ---------------------------------------------------------------------------

/// `max(0, 200 - avg_rank)`, zero from rank 200 on.
pub fn rank_value(avg_rank: f64) -> f64 {
    if avg_rank < RANK_VALUE_CEILING {
        (RANK_VALUE_CEILING - avg_rank).max(0.0)
    } else {
        0.0
    }
}

/// Composite value: rank value scaled by scarcity and bye factor, plus a
/// tenth of the average score.
pub fn composite_value(avg_rank: f64, avg_score: f64, scarcity: f64, bye_penalty: f64) -> f64 {
    rank_value(avg_rank) * scarcity * bye_penalty + avg_score * SCORE_WEIGHT
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueMetrics {
    pub overall_value: f64,
    pub rank_value: f64,
    pub scarcity_multiplier: f64,
    pub tier: Tier,
    pub tier_rank: u8,
    /// Rank among available players at the same position (1 = best).
    pub positional_rank: usize,
    /// Available players at the same position.
    pub position_depth: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScarcityAnalysis {
    pub position_scarcity: ScarcityLevel,
    pub available_at_position: usize,
    pub position_rank: usize,
    pub is_positional_run: bool,
}

/// Full valuation of one available player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerAnalysis {
    pub player: Player,
    pub average_rank: f64,
    pub average_score: f64,
    pub value_metrics: ValueMetrics,
    pub scarcity_analysis: ScarcityAnalysis,
    pub bye_week_analysis: ByeWeekImpact,
}

impl PlayerAnalysis {
    pub fn position(&self) -> Position {
        self.player.position
    }

    pub fn overall_value(&self) -> f64 {
        self.value_metrics.overall_value
    }

    pub fn tier(&self) -> Tier {
        self.value_metrics.tier
    }
}

/// Short reference to a player inside summaries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRef {
    pub name: String,
    pub rank: f64,
    pub value: f64,
}

impl From<&PlayerAnalysis> for PlayerRef {
    fn from(a: &PlayerAnalysis) -> Self {
        PlayerRef {
            name: a.player.name.clone(),
            rank: a.average_rank,
            value: a.overall_value(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionBreakdown {
    pub position: Position,
    pub count: usize,
    pub best_available: Option<PlayerRef>,
    pub scarcity_level: ScarcityLevel,
}

/// Names worth a look, grouped by why.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Highlights {
    pub high_value_targets: Vec<String>,
    pub scarcity_picks: Vec<String>,
    pub tier_breaks: Vec<String>,
    pub bye_week_safe: Vec<String>,
    pub bye_week_helpers: Vec<String>,
}

/// Result of [`analyze_available`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailableAnalysis {
    /// Available players considered before the limit was applied.
    pub total_available: usize,
    /// Analyses ordered by value (ties by average rank), truncated to the limit.
    pub players: Vec<PlayerAnalysis>,
    pub position_breakdown: Vec<PositionBreakdown>,
    pub bye_weeks: ByeWeekSummary,
    pub highlights: Highlights,
}

// ---------------------------------------------------------------------------
// Analysis
// ---------------------------------------------------------------------------

/// Value every available player for the analyzed team.
///
/// Bye-week factors apply only when `team` is given. `position_filter`
/// narrows the pool before anything is computed; `limit` truncates the sorted
/// result.
pub fn analyze_available(
    available: &[Player],
    team: Option<&Team>,
    rules: &RosterRules,
    policy: &ScarcityPolicy,
    position_filter: Option<Position>,
    limit: Option<usize>,
) -> AvailableAnalysis {
    let pool: Vec<&Player> = available
        .iter()
        .filter(|p| position_filter.map_or(true, |pos| p.position == pos))
        .collect();

    let positional_ranks = positional_ranks(&pool);
    let mut depth: HashMap<Position, usize> = HashMap::new();
    for p in &pool {
        *depth.entry(p.position).or_insert(0) += 1;
    }

    let profile = team.map(ByeProfile::from_team);

    let mut players: Vec<PlayerAnalysis> = pool
        .iter()
        .zip(&positional_ranks)
        .map(|(player, &pos_rank)| {
            let position_depth = depth.get(&player.position).copied().unwrap_or(0);
            let bye = match &profile {
                Some(profile) => profile.impact(player, rules),
                None => ByeWeekImpact::neutral(player.bye_week),
            };
            analyze_player(player, pos_rank, position_depth, bye, policy)
        })
        .collect();

    players.sort_by(|a, b| {
        b.overall_value()
            .partial_cmp(&a.overall_value())
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| {
                a.average_rank
                    .partial_cmp(&b.average_rank)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
    });

    let total_available = players.len();
    if let Some(limit) = limit {
        players.truncate(limit);
    }

    debug!(
        "Analyzed {} available players, keeping {}",
        total_available,
        players.len()
    );

    let bye_weeks = profile.map(|p| p.summary()).unwrap_or_default();

    AvailableAnalysis {
        total_available,
        position_breakdown: position_breakdown(&players),
        highlights: highlights(&players),
        bye_weeks,
        players,
    }
}

/// Value one player given its positional context and bye-week impact.
pub fn analyze_player(
    player: &Player,
    positional_rank: usize,
    position_depth: usize,
    bye: ByeWeekImpact,
    policy: &ScarcityPolicy,
) -> PlayerAnalysis {
    let avg_rank = player.average_rank().unwrap_or(UNRANKED_AVG_RANK);
    let avg_score = player.average_score().unwrap_or(UNRANKED_AVG_SCORE);

    let scarcity = policy.multiplier(player.position, positional_rank, avg_rank, avg_score);
    let tier = Tier::from_avg_rank(avg_rank);

    PlayerAnalysis {
        player: player.clone(),
        average_rank: avg_rank,
        average_score: avg_score,
        value_metrics: ValueMetrics {
            overall_value: composite_value(avg_rank, avg_score, scarcity, bye.penalty),
            rank_value: rank_value(avg_rank),
            scarcity_multiplier: scarcity,
            tier,
            tier_rank: tier.rank(),
            positional_rank,
            position_depth,
        },
        scarcity_analysis: ScarcityAnalysis {
            position_scarcity: ScarcityLevel::from_multiplier(scarcity),
            available_at_position: position_depth,
            position_rank: positional_rank,
            is_positional_run: positional_rank <= 5 && position_depth < POSITIONAL_RUN_DEPTH,
        },
        bye_week_analysis: bye,
    }
}

/// 1-based rank of each player among the pool at its position, ordered by
/// average rank (unranked last, input order breaks ties).
fn positional_ranks(pool: &[&Player]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..pool.len()).collect();
    let avg = |i: usize| pool[i].average_rank().unwrap_or(UNRANKED_AVG_RANK);
    order.sort_by(|&a, &b| avg(a).partial_cmp(&avg(b)).unwrap_or(std::cmp::Ordering::Equal));

    let mut ranks = vec![0; pool.len()];
    let mut seen: HashMap<Position, usize> = HashMap::new();
    for idx in order {
        let counter = seen.entry(pool[idx].position).or_insert(0);
        *counter += 1;
        ranks[idx] = *counter;
    }
    ranks
}

fn position_breakdown(players: &[PlayerAnalysis]) -> Vec<PositionBreakdown> {
    DRAFTABLE_POSITIONS
        .iter()
        .filter_map(|&position| {
            let mut at_pos = players.iter().filter(|a| a.position() == position);
            let best = at_pos.next()?;
            Some(PositionBreakdown {
                position,
                count: 1 + at_pos.count(),
                best_available: Some(PlayerRef::from(best)),
                scarcity_level: best.scarcity_analysis.position_scarcity,
            })
        })
        .collect()
}

fn highlights(players: &[PlayerAnalysis]) -> Highlights {
    let names = |filter: &dyn Fn(&PlayerAnalysis) -> bool, take: usize| -> Vec<String> {
        players
            .iter()
            .filter(|a| filter(*a))
            .take(take)
            .map(|a| a.player.name.clone())
            .collect()
    };

    Highlights {
        high_value_targets: players
            .iter()
            .take(5)
            .filter(|a| a.overall_value() > 50.0)
            .map(|a| a.player.name.clone())
            .collect(),
        scarcity_picks: names(
            &|a: &PlayerAnalysis| a.scarcity_analysis.position_scarcity == ScarcityLevel::High,
            3,
        ),
        tier_breaks: names(&|a: &PlayerAnalysis| a.value_metrics.tier_rank <= 2, 5),
        bye_week_safe: names(
            &|a: &PlayerAnalysis| a.bye_week_analysis.severity == ConflictSeverity::None,
            5,
        ),
        bye_week_helpers: names(&|a: &PlayerAnalysis| a.bye_week_analysis.helps_bye_diversity, 3),
    }
}
