// Engine error taxonomy.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, EngineError>;

/// Every failure the draft engine can report.
///
/// Data-quality problems (unmatched players, unknown team codes) are not
/// errors; they are logged and defaulted at ingestion.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineError {
    #[error("{name} is not available")]
    PlayerUnavailable { name: String },

    #[error("Invalid position: {position}. Valid positions: QB, RB, WR, TE, K, DST")]
    InvalidPosition { position: String },

    #[error("Invalid strategy: {strategy}. Valid strategies: balanced, best_available, upside, safe")]
    InvalidStrategy { strategy: String },

    #[error("invalid draft setup: {message}")]
    InvalidDraftSetup { message: String },

    #[error("Failed to fetch player rankings: {message}")]
    RankingFetch { message: String },

    #[error("Failed to fetch draft state: {message}")]
    DraftStateFetch { message: String },

    #[error("Owner '{owner}' not found in draft data. Available owners: {available:?}")]
    OwnerNotFound { owner: String, available: Vec<String> },

    #[error("invalid draft snapshot: {message}")]
    InvalidSnapshot { message: String },
}

impl EngineError {
    /// Short machine-readable tag used in boundary responses.
    pub fn kind(&self) -> &'static str {
        match self {
            EngineError::PlayerUnavailable { .. } => "player_unavailable",
            EngineError::InvalidPosition { .. } => "invalid_position",
            EngineError::InvalidStrategy { .. } => "invalid_strategy",
            EngineError::InvalidDraftSetup { .. } => "invalid_draft_setup",
            EngineError::RankingFetch { .. } => "ranking_fetch_failed",
            EngineError::DraftStateFetch { .. } => "draft_state_failed",
            EngineError::OwnerNotFound { .. } => "owner_not_found",
            EngineError::InvalidSnapshot { .. } => "invalid_snapshot",
        }
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        EngineError::InvalidSnapshot {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_value() {
        let err = EngineError::InvalidStrategy {
            strategy: "yolo".into(),
        };
        assert!(err.to_string().contains("yolo"));
        assert!(err.to_string().contains("best_available"));

        let err = EngineError::PlayerUnavailable {
            name: "Bijan Robinson".into(),
        };
        assert_eq!(err.to_string(), "Bijan Robinson is not available");
    }

    #[test]
    fn kinds_are_stable() {
        assert_eq!(
            EngineError::RankingFetch {
                message: "timeout".into()
            }
            .kind(),
            "ranking_fetch_failed"
        );
        assert_eq!(
            EngineError::OwnerNotFound {
                owner: "Adam".into(),
                available: vec![]
            }
            .kind(),
            "owner_not_found"
        );
    }

    #[test]
    fn json_errors_become_snapshot_errors() {
        let json_err = serde_json::from_str::<u32>("nope").unwrap_err();
        let err: EngineError = json_err.into();
        assert_eq!(err.kind(), "invalid_snapshot");
    }
}
