use serde::Serialize;

use crate::error::{GameError, Result};

pub const DEFAULT_FORMAT: &str = "best-of-3";

/// How many round wins end a match.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct MatchFormat {
    id: String,
    name: String,
    wins_required: u32,
}

impl MatchFormat {
    pub fn new(id: impl Into<String>, name: impl Into<String>, wins_required: u32) -> Result<Self> {
        let id = id.into();
        if wins_required == 0 {
            return Err(GameError::InvalidFormat { id, wins_required });
        }
        Ok(MatchFormat {
            id,
            name: name.into(),
            wins_required,
        })
    }

    /// "Best `wins_required` of `2 * wins_required - 1`".
    pub fn best_of(wins_required: u32) -> Result<Self> {
        let rounds = wins_required.saturating_mul(2).saturating_sub(1);
        Self::new(
            format!("best-of-{}", rounds),
            format!("Best {} of {}", wins_required, rounds),
            wins_required,
        )
    }

    /// Formats offered to the player.
    pub fn catalog() -> Vec<MatchFormat> {
        (2..=5).filter_map(|wins| Self::best_of(wins).ok()).collect()
    }

    pub fn find(formats: &[MatchFormat], id: &str) -> Option<MatchFormat> {
        formats.iter().find(|f| f.id == id).cloned()
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn wins_required(&self) -> u32 {
        self.wins_required
    }
}

impl Default for MatchFormat {
    fn default() -> Self {
        MatchFormat {
            id: DEFAULT_FORMAT.to_owned(),
            name: "Best 2 of 3".to_owned(),
            wins_required: 2,
        }
    }
}
