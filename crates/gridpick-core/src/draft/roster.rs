// Team rosters: append-only player lists in pick order.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use super::player::{Player, Position};

/// A fantasy team and the players it has drafted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub name: String,
    /// 1-based slot in the first-round draft order.
    pub draft_position: usize,
    /// Drafted players in the order this team picked them.
    pub roster: Vec<Player>,
}

impl Team {
    pub fn new(name: &str, draft_position: usize) -> Self {
        Team {
            name: name.to_string(),
            draft_position,
            roster: Vec::new(),
        }
    }

    /// Append a drafted player. Players are never removed during a draft.
    pub fn add_player(&mut self, player: Player) {
        self.roster.push(player);
    }

    pub fn position_count(&self, position: Position) -> usize {
        self.roster.iter().filter(|p| p.position == position).count()
    }

    /// Count of rostered players per position.
    pub fn position_counts(&self) -> HashMap<Position, usize> {
        let mut counts = HashMap::new();
        for player in &self.roster {
            *counts.entry(player.position).or_insert(0) += 1;
        }
        counts
    }

    /// Shortfall against a requirement map, floored at zero.
    pub fn positions_needed(
        &self,
        requirements: &HashMap<Position, usize>,
    ) -> HashMap<Position, usize> {
        requirements
            .iter()
            .map(|(&pos, &required)| (pos, required.saturating_sub(self.position_count(pos))))
            .collect()
    }

    /// Rostered players grouped by bye week, then by position.
    pub fn bye_week_profile(&self) -> BTreeMap<u32, HashMap<Position, Vec<&Player>>> {
        let mut profile: BTreeMap<u32, HashMap<Position, Vec<&Player>>> = BTreeMap::new();
        for player in &self.roster {
            profile
                .entry(player.bye_week)
                .or_default()
                .entry(player.position)
                .or_default()
                .push(player);
        }
        profile
    }

    pub fn injured_count(&self) -> usize {
        self.roster.iter().filter(|p| p.is_injured()).count()
    }

    pub fn has_player(&self, player: &Player) -> bool {
        self.roster.contains(player)
    }
}
