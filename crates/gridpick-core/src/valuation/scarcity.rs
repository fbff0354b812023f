// Positional scarcity multipliers.
//
// A player's scarcity multiplier is a step function of how many better
// players remain at the same position. Kickers and defenses are instead keyed
// on overall rank so they are penalized when taken too early. The step tables
// are data so a league can override them from config.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::draft::player::Position;

// ---------------------------------------------------------------------------
// Scarcity levels
// ---------------------------------------------------------------------------

/// Display bucket for a scarcity multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScarcityLevel {
    High,
    Medium,
    Low,
}

impl ScarcityLevel {
    /// High above 1.3, Medium above 1.1, otherwise Low.
    pub fn from_multiplier(multiplier: f64) -> Self {
        if multiplier > 1.3 {
            ScarcityLevel::High
        } else if multiplier > 1.1 {
            ScarcityLevel::Medium
        } else {
            ScarcityLevel::Low
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScarcityLevel::High => "High",
            ScarcityLevel::Medium => "Medium",
            ScarcityLevel::Low => "Low",
        }
    }
}

impl fmt::Display for ScarcityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Policy table
// ---------------------------------------------------------------------------

/// One step of a scarcity curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScarcityStep {
    /// Upper bound of the step. Inclusive for positional rank, exclusive for
    /// overall rank.
    pub limit: f64,
    pub multiplier: f64,
    /// Step applies only when the player's average score exceeds this value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_avg_score: Option<f64>,
}

impl ScarcityStep {
    fn new(limit: f64, multiplier: f64) -> Self {
        ScarcityStep {
            limit,
            multiplier,
            min_avg_score: None,
        }
    }
}

/// Which rank a curve is keyed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScarcityBasis {
    /// Rank among available players at the same position (1 = best left).
    PositionalRank,
    /// Cross-position average rank.
    OverallRank,
}

/// Step curve for a single position. Steps are checked in order; the first
/// matching step wins, otherwise `fallback`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScarcityCurve {
    pub basis: ScarcityBasis,
    pub steps: Vec<ScarcityStep>,
    pub fallback: f64,
}

impl ScarcityCurve {
    fn positional(steps: Vec<ScarcityStep>, fallback: f64) -> Self {
        ScarcityCurve {
            basis: ScarcityBasis::PositionalRank,
            steps,
            fallback,
        }
    }

    fn overall(steps: Vec<ScarcityStep>, fallback: f64) -> Self {
        ScarcityCurve {
            basis: ScarcityBasis::OverallRank,
            steps,
            fallback,
        }
    }

    /// Evaluate the curve for one player.
    pub fn multiplier(&self, positional_rank: usize, avg_rank: f64, avg_score: f64) -> f64 {
        for step in &self.steps {
            let in_range = match self.basis {
                ScarcityBasis::PositionalRank => positional_rank as f64 <= step.limit,
                ScarcityBasis::OverallRank => avg_rank < step.limit,
            };
            let score_ok = step.min_avg_score.map_or(true, |min| avg_score > min);
            if in_range && score_ok {
                return step.multiplier;
            }
        }
        self.fallback
    }
}

/// Per-position scarcity curves. Positions without a curve get 1.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScarcityPolicy {
    curves: BTreeMap<Position, ScarcityCurve>,
}

impl Default for ScarcityPolicy {
    fn default() -> Self {
        let step = ScarcityStep::new;
        let mut curves = BTreeMap::new();

        curves.insert(
            Position::Quarterback,
            ScarcityCurve::positional(
                vec![
                    step(5.0, 1.8),
                    step(10.0, 1.4),
                    ScarcityStep {
                        limit: 20.0,
                        multiplier: 1.1,
                        min_avg_score: Some(60.0),
                    },
                ],
                0.8,
            ),
        );
        curves.insert(
            Position::RunningBack,
            ScarcityCurve::positional(vec![step(5.0, 1.6), step(15.0, 1.3), step(30.0, 1.1)], 0.9),
        );
        curves.insert(
            Position::WideReceiver,
            ScarcityCurve::positional(
                vec![step(10.0, 1.4), step(25.0, 1.2), step(50.0, 1.0)],
                0.95,
            ),
        );
        curves.insert(
            Position::TightEnd,
            ScarcityCurve::positional(vec![step(3.0, 2.0), step(8.0, 1.3), step(15.0, 1.0)], 0.8),
        );

        let late_round = ScarcityCurve::overall(vec![step(150.0, 0.3), step(200.0, 0.8)], 1.0);
        curves.insert(Position::Kicker, late_round.clone());
        curves.insert(Position::Defense, late_round);

        ScarcityPolicy { curves }
    }
}

impl ScarcityPolicy {
    /// Policy with no curves: every multiplier is 1.0.
    pub fn empty() -> Self {
        ScarcityPolicy {
            curves: BTreeMap::new(),
        }
    }

    /// Replace (or add) the curve for one position.
    pub fn with_curve(mut self, position: Position, curve: ScarcityCurve) -> Self {
        self.curves.insert(position, curve);
        self
    }

    pub fn curve(&self, position: Position) -> Option<&ScarcityCurve> {
        self.curves.get(&position)
    }

    /// Scarcity multiplier for a player at `position`.
    pub fn multiplier(
        &self,
        position: Position,
        positional_rank: usize,
        avg_rank: f64,
        avg_score: f64,
    ) -> f64 {
        self.curves
            .get(&position)
            .map_or(1.0, |curve| curve.multiplier(positional_rank, avg_rank, avg_score))
    }
}
