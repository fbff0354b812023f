// Bye-week conflict analysis for the analyzed team's roster.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::draft::player::{Player, Position};
use crate::draft::roster::Team;
use crate::rules::RosterRules;

const FLEX_CONFLICT_PENALTY: f64 = 0.7;
const FLEX_RISK_PENALTY: f64 = 0.85;
const BLACKOUT_PENALTY: f64 = 0.5;
const STARTER_CONFLICT_PENALTY: f64 = 0.75;
const DIVERSITY_BONUS: f64 = 1.05;

/// Rostered players sharing a week before that week is called out.
const PROBLEMATIC_WEEK_PLAYERS: usize = 2;
const SEVERE_WEEK_PLAYERS: usize = 3;

/// Severity bucket for a bye-week factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConflictSeverity {
    High,
    Medium,
    Low,
    None,
}

impl ConflictSeverity {
    /// High at or below 0.6, Medium at or below 0.8, Low below 1.0.
    pub fn from_penalty(penalty: f64) -> Self {
        if penalty <= 0.6 {
            ConflictSeverity::High
        } else if penalty <= 0.8 {
            ConflictSeverity::Medium
        } else if penalty < 1.0 {
            ConflictSeverity::Low
        } else {
            ConflictSeverity::None
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ConflictSeverity::High => "High",
            ConflictSeverity::Medium => "Medium",
            ConflictSeverity::Low => "Low",
            ConflictSeverity::None => "None",
        }
    }
}

impl fmt::Display for ConflictSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Bye-week effect of adding one player to the analyzed roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ByeWeekImpact {
    pub bye_week: u32,
    /// Multiplier applied to value: 1.0 neutral, below 1.0 a conflict,
    /// above 1.0 a diversity bonus.
    pub penalty: f64,
    pub severity: ConflictSeverity,
    pub conflicts_found: Vec<String>,
    pub helps_bye_diversity: bool,
}

impl ByeWeekImpact {
    pub fn neutral(bye_week: u32) -> Self {
        ByeWeekImpact::with_penalty(bye_week, 1.0, Vec::new())
    }

    fn with_penalty(bye_week: u32, penalty: f64, conflicts_found: Vec<String>) -> Self {
        ByeWeekImpact {
            bye_week,
            penalty,
            severity: ConflictSeverity::from_penalty(penalty),
            conflicts_found,
            helps_bye_diversity: penalty > 1.0,
        }
    }
}

/// One week where the roster already has several players off.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekConflict {
    pub bye_week: u32,
    pub total_players: usize,
    pub positions_affected: Vec<Position>,
    pub severity: ConflictSeverity,
}

/// Bye-week landscape of the analyzed roster.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ByeWeekSummary {
    pub current_conflicts: Vec<WeekConflict>,
    pub problematic_weeks: Vec<u32>,
    /// Rostered players per position (positions with none omitted).
    pub roster_summary: BTreeMap<Position, usize>,
}

impl ByeWeekSummary {
    pub fn has_conflicts(&self) -> bool {
        !self.problematic_weeks.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Roster profile
// ---------------------------------------------------------------------------

/// Bye-week counts for a roster, computed once per analysis.
#[derive(Debug, Clone, Default)]
pub struct ByeProfile {
    by_week: BTreeMap<u32, BTreeMap<Position, usize>>,
    counts: HashMap<Position, usize>,
}

impl ByeProfile {
    pub fn from_team(team: &Team) -> Self {
        let mut by_week: BTreeMap<u32, BTreeMap<Position, usize>> = BTreeMap::new();
        for (week, positions) in team.bye_week_profile() {
            by_week.insert(
                week,
                positions
                    .into_iter()
                    .map(|(pos, players)| (pos, players.len()))
                    .collect(),
            );
        }
        ByeProfile {
            by_week,
            counts: team.position_counts(),
        }
    }

    fn on_bye(&self, week: u32, position: Position) -> usize {
        self.by_week
            .get(&week)
            .and_then(|positions| positions.get(&position))
            .copied()
            .unwrap_or(0)
    }

    fn count(&self, position: Position) -> usize {
        self.counts.get(&position).copied().unwrap_or(0)
    }

    /// Impact of drafting `player` onto this roster.
    ///
    /// RB and WR conflicts are judged on combined RB+WR coverage since either
    /// can fill FLEX. Other positions compare players on bye against the
    /// starter requirement. A pick at a position with nobody off that week
    /// earns a small bonus while the position is still under twice its
    /// requirement.
    pub fn impact(&self, player: &Player, rules: &RosterRules) -> ByeWeekImpact {
        let week = player.bye_week;
        if week == 0 {
            return ByeWeekImpact::neutral(week);
        }

        let pos = player.position;
        let min_needed = rules.starter_requirement(pos).max(1);
        let on_bye = self.on_bye(week, pos);
        let current = self.count(pos);

        let mut penalty = 1.0;
        let mut conflicts = Vec::new();

        if on_bye > 0 {
            if matches!(pos, Position::RunningBack | Position::WideReceiver) {
                let skill_on_bye = self.on_bye(week, Position::RunningBack)
                    + self.on_bye(week, Position::WideReceiver)
                    + 1;
                let skill_players =
                    self.count(Position::RunningBack) + self.count(Position::WideReceiver) + 1;

                if skill_on_bye + 2 >= skill_players {
                    penalty = FLEX_CONFLICT_PENALTY;
                    conflicts.push(format!("FLEX conflict on bye week {week}"));
                } else if skill_on_bye + 3 >= skill_players {
                    penalty = FLEX_RISK_PENALTY;
                    conflicts.push(format!("Potential FLEX issue on bye week {week}"));
                }
            } else {
                let on_bye_after = on_bye + 1;
                let total_after = current + 1;
                if on_bye_after >= total_after {
                    penalty = BLACKOUT_PENALTY;
                    conflicts.push(format!("Complete {pos} bye week conflict on week {week}"));
                } else if on_bye_after >= min_needed {
                    penalty = STARTER_CONFLICT_PENALTY;
                    conflicts.push(format!("{pos} starter conflict on bye week {week}"));
                }
            }
        } else if current < min_needed * 2 {
            penalty = DIVERSITY_BONUS;
        }

        ByeWeekImpact::with_penalty(week, penalty, conflicts)
    }

    /// Weeks with two or more rostered players off.
    pub fn summary(&self) -> ByeWeekSummary {
        let mut summary = ByeWeekSummary::default();

        for (&week, positions) in &self.by_week {
            let total: usize = positions.values().sum();
            if total >= PROBLEMATIC_WEEK_PLAYERS {
                summary.problematic_weeks.push(week);
                summary.current_conflicts.push(WeekConflict {
                    bye_week: week,
                    total_players: total,
                    positions_affected: positions.keys().copied().collect(),
                    severity: if total >= SEVERE_WEEK_PLAYERS {
                        ConflictSeverity::High
                    } else {
                        ConflictSeverity::Medium
                    },
                });
            }
        }

        summary.roster_summary = self
            .counts
            .iter()
            .filter(|&(_, &n)| n > 0)
            .map(|(&pos, &n)| (pos, n))
            .collect();
        summary
    }
}
