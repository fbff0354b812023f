// Roster need analysis: per-position urgency and roster balance.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::draft::player::{Position, DRAFTABLE_POSITIONS};
use crate::draft::roster::Team;

// ---------------------------------------------------------------------------
// Urgency
// ---------------------------------------------------------------------------

/// How badly the roster needs another player at a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Urgency {
    /// Nobody rostered at a position with a starter requirement.
    Critical,
    /// A starter slot is still open.
    High,
    /// Starters filled, below recommended depth.
    Medium,
    /// Depth met, still below the useful maximum.
    Low,
    /// Enough already.
    None,
}

impl Urgency {
    pub fn from_counts(current: usize, target: &DepthTarget) -> Self {
        if current == 0 && target.starters > 0 {
            Urgency::Critical
        } else if current < target.starters {
            Urgency::High
        } else if current < target.recommended_depth {
            Urgency::Medium
        } else if current < target.max_useful {
            Urgency::Low
        } else {
            Urgency::None
        }
    }

    /// Score multiplier applied to candidates at this position.
    pub fn multiplier(&self) -> f64 {
        match self {
            Urgency::Critical => 2.0,
            Urgency::High => 1.5,
            Urgency::Medium => 1.2,
            Urgency::Low => 1.0,
            Urgency::None => 0.8,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Urgency::Critical => "Critical",
            Urgency::High => "High",
            Urgency::Medium => "Medium",
            Urgency::Low => "Low",
            Urgency::None => "None",
        }
    }

    /// Critical or High.
    pub fn is_pressing(&self) -> bool {
        matches!(self, Urgency::Critical | Urgency::High)
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Depth targets
// ---------------------------------------------------------------------------

/// Roster-building targets for one position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepthTarget {
    pub starters: usize,
    pub recommended_depth: usize,
    pub max_useful: usize,
}

impl DepthTarget {
    pub const fn new(starters: usize, recommended_depth: usize, max_useful: usize) -> Self {
        DepthTarget {
            starters,
            recommended_depth,
            max_useful,
        }
    }

    /// Weight of this position in the balance score.
    fn balance_weight(&self) -> f64 {
        (self.starters * 2 + 1) as f64
    }
}

/// Depth targets for every draftable position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepthTargets(BTreeMap<Position, DepthTarget>);

impl Default for DepthTargets {
    fn default() -> Self {
        DepthTargets(BTreeMap::from([
            (Position::Quarterback, DepthTarget::new(1, 2, 3)),
            (Position::RunningBack, DepthTarget::new(2, 4, 6)),
            (Position::WideReceiver, DepthTarget::new(2, 4, 6)),
            (Position::TightEnd, DepthTarget::new(1, 2, 3)),
            (Position::Kicker, DepthTarget::new(1, 1, 2)),
            (Position::Defense, DepthTarget::new(1, 1, 2)),
        ]))
    }
}

impl DepthTargets {
    pub fn get(&self, position: Position) -> Option<&DepthTarget> {
        self.0.get(&position)
    }

    pub fn set(&mut self, position: Position, target: DepthTarget) {
        self.0.insert(position, target);
    }

    pub fn iter(&self) -> impl Iterator<Item = (Position, &DepthTarget)> {
        self.0.iter().map(|(&pos, target)| (pos, target))
    }
}

// ---------------------------------------------------------------------------
// Roster analysis
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionNeed {
    pub position: Position,
    pub current_count: usize,
    pub starters_needed: usize,
    pub depth_needed: usize,
    pub urgency: Urgency,
    pub urgency_multiplier: f64,
    pub current_players: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterAnalysis {
    /// One entry per draftable position, in position order.
    pub position_needs: Vec<PositionNeed>,
    /// 0-100; 100 means every position is at recommended depth.
    pub roster_balance_score: f64,
}

impl RosterAnalysis {
    pub fn need(&self, position: Position) -> Option<&PositionNeed> {
        self.position_needs.iter().find(|n| n.position == position)
    }

    /// Urgency at `position`; `None` when no need data exists.
    pub fn urgency(&self, position: Position) -> Urgency {
        self.need(position).map_or(Urgency::None, |n| n.urgency)
    }

    /// Multiplier at `position`; neutral 1.0 when no need data exists.
    pub fn urgency_multiplier(&self, position: Position) -> f64 {
        self.need(position).map_or(1.0, |n| n.urgency_multiplier)
    }

    pub fn current_count(&self, position: Position) -> usize {
        self.need(position).map_or(0, |n| n.current_count)
    }

    pub fn has_critical_need(&self) -> bool {
        self.position_needs
            .iter()
            .any(|n| n.urgency == Urgency::Critical)
    }
}

/// Per-position needs and the balance score for `team`.
pub fn analyze_roster_needs(team: &Team, targets: &DepthTargets) -> RosterAnalysis {
    let position_needs = DRAFTABLE_POSITIONS
        .iter()
        .filter_map(|&position| {
            let target = targets.get(position)?;
            let current_players: Vec<String> = team
                .roster
                .iter()
                .filter(|p| p.position == position)
                .map(|p| p.name.clone())
                .collect();
            let current_count = current_players.len();
            let urgency = Urgency::from_counts(current_count, target);
            Some(PositionNeed {
                position,
                current_count,
                starters_needed: target.starters.saturating_sub(current_count),
                depth_needed: target.recommended_depth.saturating_sub(current_count),
                urgency,
                urgency_multiplier: urgency.multiplier(),
                current_players,
            })
        })
        .collect();

    RosterAnalysis {
        position_needs,
        roster_balance_score: roster_balance_score(team, targets),
    }
}

/// Weighted closeness to recommended depth, rounded to one decimal.
///
/// Each position scores `count / depth * 100` (capped at 100) and is weighted
/// by `starters * 2 + 1`.
pub fn roster_balance_score(team: &Team, targets: &DepthTargets) -> f64 {
    let mut total = 0.0;
    let mut weights = 0.0;

    for (position, target) in targets.iter() {
        let count = team.position_count(position);
        let score = if count >= target.recommended_depth {
            100.0
        } else {
            count as f64 / target.recommended_depth as f64 * 100.0
        };
        let weight = target.balance_weight();
        total += score * weight;
        weights += weight;
    }

    if weights > 0.0 {
        (total / weights * 10.0).round() / 10.0
    } else {
        0.0
    }
}
