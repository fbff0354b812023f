// Individual pick record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::player::Player;

/// A single completed draft pick. Created once, never modified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftPick {
    /// Sequential pick number (1-indexed) across the whole draft.
    pub pick_number: u32,
    /// Round the pick was made in (1-indexed).
    pub round_number: u32,
    /// Name of the team that made the pick.
    pub team_name: String,
    pub player: Player,
    pub timestamp: DateTime<Utc>,
}

impl DraftPick {
    pub fn new(pick_number: u32, round_number: u32, team_name: &str, player: Player) -> Self {
        DraftPick {
            pick_number,
            round_number,
            team_name: team_name.to_string(),
            player,
            timestamp: Utc::now(),
        }
    }
}
