// Roster model: players, teams, picks and the draft state machine.

pub mod pick;
pub mod player;
pub mod roster;
pub mod state;
