// Roster construction rules: legality, position needs and FLEX eligibility.
//
// All checks are pure functions of a team's roster and the league's rule
// table; nothing here mutates a team.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::draft::player::{Player, Position};
use crate::draft::roster::Team;

/// Round before which a pick at an already-filled position is flagged.
const FILLED_POSITION_WARNING_ROUND: u32 = 8;
/// Last round in which unmet starter needs are called out.
const EARLY_ROUND_CUTOFF: u32 = 3;
/// Extra FLEX-eligible bodies recommended beyond the starting requirement.
const FLEX_DEPTH_BUFFER: usize = 2;

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// Outcome of a roster or pick validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub violations: Vec<String>,
    pub warnings: Vec<String>,
    pub total_starters: usize,
    pub total_players: usize,
}

impl ValidationResult {
    fn new() -> Self {
        ValidationResult {
            is_valid: true,
            violations: Vec::new(),
            warnings: Vec::new(),
            total_starters: 0,
            total_players: 0,
        }
    }

    fn violation(&mut self, message: String) {
        self.is_valid = false;
        self.violations.push(message);
    }
}

/// FLEX-eligible players on a roster that are not already starting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlexEligibility {
    pub eligible_players: Vec<Player>,
    pub rb_options: usize,
    pub wr_options: usize,
    pub te_options: usize,
    pub best_flex_option: Option<Player>,
}

/// Starter shortfall per position, plus optional FLEX depth shortfall.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PositionNeeds {
    /// Needed count per starter position (FLEX included). Zero when filled.
    pub needs: BTreeMap<Position, usize>,
    /// Additional FLEX-eligible players recommended for bye and injury cover.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flex_depth: Option<usize>,
}

impl PositionNeeds {
    pub fn need(&self, position: Position) -> usize {
        self.needs.get(&position).copied().unwrap_or(0)
    }

    /// Positions with a non-zero need, in position order.
    pub fn unmet(&self) -> Vec<Position> {
        self.needs
            .iter()
            .filter(|&(_, &n)| n > 0)
            .map(|(&pos, _)| pos)
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Rule table
// ---------------------------------------------------------------------------

/// A league's roster construction rules.
#[derive(Debug, Clone, PartialEq)]
pub struct RosterRules {
    starter_requirements: BTreeMap<Position, usize>,
    roster_limits: BTreeMap<Position, usize>,
    bench_slots: usize,
    ir_slots: usize,
    flex_eligible: BTreeSet<Position>,
}

impl Default for RosterRules {
    /// QB1 RB2 WR2 TE1 FLEX1 K1 DST1 starters; QB4 RB8 WR8 TE4 K3 DST3
    /// limits; 10 bench, 2 IR; FLEX = RB/WR/TE.
    fn default() -> Self {
        let starters = BTreeMap::from([
            (Position::Quarterback, 1),
            (Position::RunningBack, 2),
            (Position::WideReceiver, 2),
            (Position::TightEnd, 1),
            (Position::Flex, 1),
            (Position::Kicker, 1),
            (Position::Defense, 1),
        ]);
        let limits = BTreeMap::from([
            (Position::Quarterback, 4),
            (Position::RunningBack, 8),
            (Position::WideReceiver, 8),
            (Position::TightEnd, 4),
            (Position::Kicker, 3),
            (Position::Defense, 3),
        ]);
        let flex = BTreeSet::from([
            Position::RunningBack,
            Position::WideReceiver,
            Position::TightEnd,
        ]);
        RosterRules::new(starters, limits, 10, 2, flex)
    }
}

impl RosterRules {
    pub fn new(
        starter_requirements: BTreeMap<Position, usize>,
        roster_limits: BTreeMap<Position, usize>,
        bench_slots: usize,
        ir_slots: usize,
        flex_eligible: BTreeSet<Position>,
    ) -> Self {
        RosterRules {
            starter_requirements,
            roster_limits,
            bench_slots,
            ir_slots,
            flex_eligible,
        }
    }

    pub fn starter_requirement(&self, position: Position) -> usize {
        self.starter_requirements.get(&position).copied().unwrap_or(0)
    }

    pub fn starter_requirements(&self) -> &BTreeMap<Position, usize> {
        &self.starter_requirements
    }

    /// Copy of the per-position roster limits.
    pub fn roster_limits(&self) -> BTreeMap<Position, usize> {
        self.roster_limits.clone()
    }

    pub fn limit_for(&self, position: Position) -> Option<usize> {
        self.roster_limits.get(&position).copied()
    }

    pub fn bench_slots(&self) -> usize {
        self.bench_slots
    }

    pub fn ir_slots(&self) -> usize {
        self.ir_slots
    }

    pub fn flex_eligible_positions(&self) -> &BTreeSet<Position> {
        &self.flex_eligible
    }

    pub fn is_flex_eligible(&self, position: Position) -> bool {
        self.flex_eligible.contains(&position)
    }

    pub fn total_starter_slots(&self) -> usize {
        self.starter_requirements.values().sum()
    }

    /// Legal roster size excluding IR: all starter slots plus the bench.
    pub fn max_roster_size(&self) -> usize {
        self.total_starter_slots() + self.bench_slots
    }

    /// FLEX-eligible players needed to field the RB/WR/TE starters and the
    /// FLEX slot itself.
    fn required_flex_eligible(&self) -> usize {
        self.starter_requirement(Position::RunningBack)
            + self.starter_requirement(Position::WideReceiver)
            + self.starter_requirement(Position::TightEnd)
            + 1
    }

    fn flex_eligible_count(&self, counts: &HashMap<Position, usize>) -> usize {
        self.flex_eligible
            .iter()
            .map(|pos| counts.get(pos).copied().unwrap_or(0))
            .sum()
    }

    // -----------------------------------------------------------------------
    // Roster checks
    // -----------------------------------------------------------------------

    /// Validate a whole roster against limits, total size and IR capacity.
    pub fn is_roster_legal(&self, team: &Team, ir_slots_used: usize) -> ValidationResult {
        let mut result = ValidationResult::new();
        let counts = team.position_counts();

        for (&position, &limit) in &self.roster_limits {
            let count = counts.get(&position).copied().unwrap_or(0);
            if count > limit {
                result.violation(format!("Exceeds {position} limit: {count}/{limit}"));
            }
        }

        let total_players = team.roster.len();
        let effective_size = total_players.saturating_sub(ir_slots_used);
        let max_size = self.max_roster_size();
        if effective_size > max_size {
            result.violation(format!(
                "Exceeds roster size limit: {effective_size}/{max_size}"
            ));
        }

        if ir_slots_used > self.ir_slots {
            result.violation(format!(
                "Exceeds IR slots: {ir_slots_used}/{}",
                self.ir_slots
            ));
        }

        let injured = team.injured_count();
        if injured > ir_slots_used {
            result.warnings.push(format!(
                "Consider moving {} injured players to IR",
                injured - ir_slots_used
            ));
        }

        result.total_starters = self.total_starter_slots();
        result.total_players = total_players;
        result
    }

    /// Starter needs per position.
    ///
    /// FLEX need is 1 until the team holds enough FLEX-eligible players to
    /// cover the RB/WR/TE starters plus the FLEX slot. With
    /// `consider_flex_depth`, also reports the shortfall against that number
    /// plus two depth players.
    pub fn position_needs(&self, team: &Team, consider_flex_depth: bool) -> PositionNeeds {
        let counts = team.position_counts();
        let flex_count = self.flex_eligible_count(&counts);
        let required_flex = self.required_flex_eligible();

        let needs = self
            .starter_requirements
            .iter()
            .map(|(&position, &required)| {
                let need = if position == Position::Flex {
                    usize::from(flex_count < required_flex)
                } else {
                    required.saturating_sub(counts.get(&position).copied().unwrap_or(0))
                };
                (position, need)
            })
            .collect();

        let flex_depth = if consider_flex_depth {
            let recommended = required_flex + FLEX_DEPTH_BUFFER;
            (flex_count < recommended).then(|| recommended - flex_count)
        } else {
            None
        };

        PositionNeeds { needs, flex_depth }
    }

    /// FLEX-eligible roster players not already assigned to a starter slot.
    ///
    /// The best option is the lowest average rank among ranked eligible
    /// players, falling back to the first eligible player in roster order.
    pub fn flex_eligibility(
        &self,
        team: &Team,
        exclude_starters: Option<&HashMap<Position, Vec<Player>>>,
    ) -> FlexEligibility {
        let excluded = excluded_set(exclude_starters);
        let mut eligibility = FlexEligibility::default();

        for player in &team.roster {
            if !self.is_flex_eligible(player.position) || excluded.contains(player) {
                continue;
            }
            match player.position {
                Position::RunningBack => eligibility.rb_options += 1,
                Position::WideReceiver => eligibility.wr_options += 1,
                Position::TightEnd => eligibility.te_options += 1,
                _ => {}
            }
            eligibility.eligible_players.push(player.clone());
        }

        eligibility.best_flex_option = best_ranked_or_first(&eligibility.eligible_players).cloned();
        eligibility
    }

    /// Remaining room under each position limit, floored at zero.
    pub fn remaining_slots(&self, team: &Team) -> BTreeMap<Position, usize> {
        self.roster_limits
            .iter()
            .map(|(&position, &limit)| (position, limit.saturating_sub(team.position_count(position))))
            .collect()
    }

    /// True when the team already holds the maximum at `position`. Positions
    /// without a limit never report true.
    pub fn is_at_position_limit(&self, team: &Team, position: Position) -> bool {
        match self.limit_for(position) {
            Some(limit) => team.position_count(position) >= limit,
            None => false,
        }
    }

    /// True when adding `player` would push the team past its limit.
    pub fn would_exceed_limit(&self, team: &Team, player: &Player) -> bool {
        self.is_at_position_limit(team, player.position)
    }

    /// Best FLEX choice among `candidates`, skipping anyone already starting.
    pub fn optimal_flex_choice<'a>(
        &self,
        candidates: &'a [Player],
        current_starters: Option<&HashMap<Position, Vec<Player>>>,
    ) -> Option<&'a Player> {
        let excluded = excluded_set(current_starters);
        let eligible: Vec<&Player> = candidates
            .iter()
            .filter(|p| self.is_flex_eligible(p.position) && !excluded.contains(p))
            .collect();
        best_ranked_or_first_ref(&eligible)
    }

    /// Judge whether drafting `player` now makes sense for this roster.
    ///
    /// Only a limit breach makes the pick invalid; positional fit concerns are
    /// warnings.
    pub fn validate_draft_pick(
        &self,
        team: &Team,
        player: &Player,
        current_round: u32,
    ) -> ValidationResult {
        let mut result = ValidationResult::new();

        if self.would_exceed_limit(team, player) {
            result.violation(format!(
                "Adding {} would exceed {} limit",
                player.name, player.position
            ));
        }

        let needs = self.position_needs(team, false);
        if needs.need(player.position) == 0 && current_round < FILLED_POSITION_WARNING_ROUND {
            result.warnings.push(format!(
                "{} position may already be adequately filled",
                player.position
            ));
        }

        if current_round <= EARLY_ROUND_CUTOFF {
            let unmet = needs.unmet();
            if !unmet.is_empty() && !unmet.contains(&player.position) {
                let first_two: Vec<&str> = unmet.iter().take(2).map(|p| p.display_str()).collect();
                result.warnings.push(format!(
                    "Consider addressing {} before {}",
                    first_two.join(", "),
                    player.position
                ));
            }
        }

        result.total_starters = self.total_starter_slots();
        result.total_players = team.roster.len() + 1;
        result
    }
}

fn excluded_set(starters: Option<&HashMap<Position, Vec<Player>>>) -> HashSet<&Player> {
    starters
        .map(|map| map.values().flatten().collect())
        .unwrap_or_default()
}

fn best_ranked_or_first(players: &[Player]) -> Option<&Player> {
    let refs: Vec<&Player> = players.iter().collect();
    best_ranked_or_first_ref(&refs)
}

fn best_ranked_or_first_ref<'a>(players: &[&'a Player]) -> Option<&'a Player> {
    let best_ranked = players
        .iter()
        .filter_map(|p| p.average_rank().map(|rank| (*p, rank)))
        .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(p, _)| p);
    best_ranked.or_else(|| players.first().copied())
}
