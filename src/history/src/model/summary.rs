use common::model::{game::MatchWinner, messages::Id};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Record of a completed match. Never mutated once built.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MatchSummary {
    pub id: Id,
    pub format: String,
    pub winner: MatchWinner,
    pub final_score: String,
    pub rounds_played: u32,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    pub duration_seconds: u64,
}

impl MatchSummary {
    pub fn new(
        format: impl Into<String>,
        winner: MatchWinner,
        score: (u32, u32),
        rounds_played: u32,
        duration_seconds: u64,
    ) -> Self {
        MatchSummary {
            id: Id::new(),
            format: format.into(),
            winner,
            final_score: format!("{}-{}", score.0, score.1),
            rounds_played,
            timestamp: OffsetDateTime::now_utc(),
            duration_seconds,
        }
    }
}
