// Draft state: pick order, team rosters, available pool, pick history.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::pick::DraftPick;
use super::player::Player;
use super::roster::Team;
use crate::error::{EngineError, Result};

/// The complete in-memory state of one draft.
///
/// `make_pick` is the only operation that mutates an in-progress draft. The
/// current round is always derived from `current_pick`, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftState {
    pub num_teams: usize,
    pub rounds_per_draft: u32,
    /// Snake drafts reverse the order every even round.
    pub is_snake: bool,
    /// Teams in draft-position order (index 0 picks first in round 1).
    pub teams: Vec<Team>,
    /// Append-only pick history.
    pub picks: Vec<DraftPick>,
    /// Undrafted players.
    pub available_players: Vec<Player>,
    /// Next pick number to be made (1-indexed).
    pub current_pick: u32,
}

impl DraftState {
    /// Create a new draft. Draft positions follow the order of `team_names`.
    pub fn new(team_names: &[&str], rounds_per_draft: u32, is_snake: bool) -> Result<Self> {
        if team_names.is_empty() {
            return Err(EngineError::InvalidDraftSetup {
                message: "a draft needs at least one team".into(),
            });
        }
        let unique: HashSet<&&str> = team_names.iter().collect();
        if unique.len() != team_names.len() {
            return Err(EngineError::InvalidDraftSetup {
                message: "team names must be unique".into(),
            });
        }

        let teams = team_names
            .iter()
            .enumerate()
            .map(|(i, name)| Team::new(name, i + 1))
            .collect();

        Ok(DraftState {
            num_teams: team_names.len(),
            rounds_per_draft,
            is_snake,
            teams,
            picks: Vec::new(),
            available_players: Vec::new(),
            current_pick: 1,
        })
    }

    /// Round the given pick number falls in.
    pub fn round_for_pick(&self, pick_number: u32) -> u32 {
        (pick_number.saturating_sub(1)) / self.num_teams as u32 + 1
    }

    pub fn current_round(&self) -> u32 {
        self.round_for_pick(self.current_pick)
    }

    /// Index into `teams` of the team that owns `pick_number`.
    ///
    /// Odd rounds run 1..N. Even rounds of a snake draft run N..1; a linear
    /// draft uses 1..N every round.
    pub fn team_index_for_pick(&self, pick_number: u32) -> usize {
        let n = self.num_teams;
        let offset = (pick_number.saturating_sub(1) as usize) % n;
        if self.is_snake && self.round_for_pick(pick_number) % 2 == 0 {
            n - 1 - offset
        } else {
            offset
        }
    }

    /// The team on the clock.
    pub fn current_team(&self) -> &Team {
        &self.teams[self.team_index_for_pick(self.current_pick)]
    }

    /// Draft `player` for the team on the clock.
    ///
    /// Fails with [`EngineError::PlayerUnavailable`] and leaves the state
    /// untouched when the player is not in the available pool.
    pub fn make_pick(&mut self, player: &Player) -> Result<DraftPick> {
        let pool_idx = self
            .available_players
            .iter()
            .position(|p| p == player)
            .ok_or_else(|| EngineError::PlayerUnavailable {
                name: player.name.clone(),
            })?;

        let team_idx = self.team_index_for_pick(self.current_pick);
        let drafted = self.available_players.remove(pool_idx);
        let pick = DraftPick::new(
            self.current_pick,
            self.current_round(),
            &self.teams[team_idx].name,
            drafted.clone(),
        );

        self.teams[team_idx].add_player(drafted);
        self.picks.push(pick.clone());
        self.current_pick += 1;

        debug!(
            "Pick {} (round {}): {} -> {}",
            pick.pick_number, pick.round_number, pick.player, pick.team_name
        );
        Ok(pick)
    }

    pub fn is_player_drafted(&self, player: &Player) -> bool {
        self.picks.iter().any(|pick| &pick.player == player)
    }

    pub fn is_player_available(&self, player: &Player) -> bool {
        self.available_players.contains(player)
    }

    pub fn team_by_name(&self, name: &str) -> Option<&Team> {
        self.teams.iter().find(|t| t.name == name)
    }

    /// Replace the available pool. Players already drafted are skipped so the
    /// pool never overlaps a roster.
    pub fn set_available_players(&mut self, players: &[Player]) {
        let before = players.len();
        self.available_players = players
            .iter()
            .filter(|p| !self.is_player_drafted(p))
            .cloned()
            .collect();
        let skipped = before - self.available_players.len();
        if skipped > 0 {
            info!("Skipped {} already-drafted players when setting pool", skipped);
        }
    }

    /// The most recent `count` picks, newest first.
    pub fn recent_picks(&self, count: usize) -> Vec<&DraftPick> {
        self.picks.iter().rev().take(count).collect()
    }

    /// Total number of picks in a full draft.
    pub fn total_picks(&self) -> u32 {
        self.num_teams as u32 * self.rounds_per_draft
    }

    pub fn is_complete(&self) -> bool {
        self.current_pick > self.total_picks()
    }

    // -----------------------------------------------------------------------
    // Snapshots
    // -----------------------------------------------------------------------

    /// Serialize the full state to a JSON value.
    pub fn to_snapshot(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Rebuild a state from [`DraftState::to_snapshot`] output.
    ///
    /// The snapshot is checked against the draft invariants before it is
    /// accepted.
    pub fn from_snapshot(value: serde_json::Value) -> Result<Self> {
        let state: DraftState = serde_json::from_value(value)?;
        state.validate()?;
        Ok(state)
    }

    /// Check the structural invariants of the draft.
    pub fn validate(&self) -> Result<()> {
        let invalid = |message: String| Err(EngineError::InvalidSnapshot { message });

        if self.num_teams == 0 || self.teams.len() != self.num_teams {
            return invalid(format!(
                "num_teams is {} but {} teams are present",
                self.num_teams,
                self.teams.len()
            ));
        }
        for (i, team) in self.teams.iter().enumerate() {
            if team.draft_position != i + 1 {
                return invalid(format!(
                    "team '{}' has draft position {} at index {}",
                    team.name, team.draft_position, i
                ));
            }
        }

        for (i, pick) in self.picks.iter().enumerate() {
            let expected = i as u32 + 1;
            if pick.pick_number != expected {
                return invalid(format!(
                    "pick numbers must be contiguous: expected {expected}, found {}",
                    pick.pick_number
                ));
            }
            if pick.round_number != self.round_for_pick(pick.pick_number) {
                return invalid(format!(
                    "pick {} is recorded in round {} but belongs to round {}",
                    pick.pick_number,
                    pick.round_number,
                    self.round_for_pick(pick.pick_number)
                ));
            }
            let Some(team) = self.team_by_name(&pick.team_name) else {
                return invalid(format!(
                    "pick {} references unknown team '{}'",
                    pick.pick_number, pick.team_name
                ));
            };
            let on_clock = &self.teams[self.team_index_for_pick(pick.pick_number)];
            if team.name != on_clock.name {
                return invalid(format!(
                    "pick {} is recorded for '{}' but '{}' was on the clock",
                    pick.pick_number, pick.team_name, on_clock.name
                ));
            }
            if !team.has_player(&pick.player) {
                return invalid(format!(
                    "pick {} drafted {} but '{}' does not roster that player",
                    pick.pick_number, pick.player, team.name
                ));
            }
        }

        if self.current_pick as usize != self.picks.len() + 1 {
            return invalid(format!(
                "current pick {} does not follow {} recorded picks",
                self.current_pick,
                self.picks.len()
            ));
        }

        let mut drafted: HashSet<&Player> = HashSet::new();
        for team in &self.teams {
            for player in &team.roster {
                if !drafted.insert(player) {
                    return invalid(format!("{player} is rostered more than once"));
                }
            }
        }
        if let Some(dup) = self.available_players.iter().find(|p| drafted.contains(p)) {
            return invalid(format!("{dup} is both drafted and available"));
        }

        Ok(())
    }
}
