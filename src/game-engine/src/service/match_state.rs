use common::model::game::{MatchWinner, Winner};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::{
    error::{GameError, Result},
    model::{format::MatchFormat, round::RoundOutcome},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MatchPhase {
    InProgress,
    Finished { winner: MatchWinner },
}

/// Snapshot of a match for display.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct MatchState {
    pub player_score: u32,
    pub cpu_score: u32,
    pub rounds_played: u32,
    pub finished: bool,
    pub winner: Option<MatchWinner>,
}

/// Emitted once, when a match reaches its winning score.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub winner: MatchWinner,
    pub player_score: u32,
    pub cpu_score: u32,
    pub rounds_played: u32,
}

impl Completion {
    pub fn final_score(&self) -> String {
        format!("{}-{}", self.player_score, self.cpu_score)
    }
}

pub struct MatchStateMachine {
    format: MatchFormat,
    phase: MatchPhase,
    wins: (u32, u32),
    rounds_played: u32,
}

impl MatchStateMachine {
    pub fn new(format: MatchFormat) -> Self {
        MatchStateMachine {
            format,
            phase: MatchPhase::InProgress,
            wins: (0, 0),
            rounds_played: 0,
        }
    }

    pub fn format(&self) -> &MatchFormat {
        &self.format
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.phase, MatchPhase::Finished { .. })
    }

    pub fn state(&self) -> MatchState {
        let winner = match self.phase {
            MatchPhase::InProgress => None,
            MatchPhase::Finished { winner } => Some(winner),
        };
        MatchState {
            player_score: self.wins.0,
            cpu_score: self.wins.1,
            rounds_played: self.rounds_played,
            finished: winner.is_some(),
            winner,
        }
    }

    /// Tally one round. Rejected once the match is finished.
    pub fn apply_round_result(&mut self, outcome: &RoundOutcome) -> Result<()> {
        if self.is_finished() {
            warn!("Round result applied to a finished match");
            return Err(GameError::MatchFinished);
        }
        match outcome.winner {
            Winner::Player => self.wins.0 += 1,
            Winner::Cpu => self.wins.1 += 1,
            Winner::Draw => {}
        }
        self.rounds_played += 1;
        debug!(
            "Round {} to {}, score {}",
            self.rounds_played,
            outcome.winner,
            self.progress()
        );
        Ok(())
    }

    /// Finish the match the first time a score reaches the format's target.
    /// Returns the completion only on that transition.
    ///
    /// Should both scores reach the target at once, the player is the winner.
    pub fn check_completion(&mut self) -> Option<Completion> {
        if self.is_finished() {
            return None;
        }
        let target = self.format.wins_required();
        let winner = if self.wins.0 >= target {
            MatchWinner::Player
        } else if self.wins.1 >= target {
            MatchWinner::Cpu
        } else {
            return None;
        };
        self.phase = MatchPhase::Finished { winner };
        info!(
            "Match finished: {} wins {} ({})",
            winner,
            self.format.name(),
            self.progress()
        );
        Some(Completion {
            winner,
            player_score: self.wins.0,
            cpu_score: self.wins.1,
            rounds_played: self.rounds_played,
        })
    }

    /// Apply a round and check for completion in one step.
    pub fn record_round(&mut self, outcome: &RoundOutcome) -> Result<Option<Completion>> {
        self.apply_round_result(outcome)?;
        Ok(self.check_completion())
    }

    pub fn reset(&mut self, format: MatchFormat) {
        debug!("Resetting match with format {}", format.id());
        *self = MatchStateMachine::new(format);
    }

    /// Round wins the leading side still needs. Zero once the match is over.
    pub fn remaining_rounds(&self) -> u32 {
        let target = self.format.wins_required();
        target
            .saturating_sub(self.wins.0)
            .min(target.saturating_sub(self.wins.1))
    }

    /// Score as "player - cpu".
    pub fn progress(&self) -> String {
        format!("{} - {}", self.wins.0, self.wins.1)
    }

    /// Rounds the player won, as a percentage of rounds played.
    pub fn win_percentage(&self) -> f64 {
        if self.rounds_played == 0 {
            return 0.0;
        }
        self.wins.0 as f64 / self.rounds_played as f64 * 100.0
    }
}

impl Default for MatchStateMachine {
    fn default() -> Self {
        Self::new(MatchFormat::default())
    }
}
