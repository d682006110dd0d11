use common::gateway::DataGateway;
use game_engine::{Completion, GameError, GameSession, RoundOutcome, RoundReport};
use history::KeyValueStore;
use rand::Rng;
use tracing::{debug, warn};

use crate::strategy::Strategy;

/// Plays matches on a session, letting a strategy pick every move.
pub struct Client<G: DataGateway, S: KeyValueStore, R: Rng> {
    session: GameSession<G, S, R>,
    strategy: Box<dyn Strategy>,
    history: Vec<RoundOutcome>,
}

impl<G: DataGateway, S: KeyValueStore, R: Rng> Client<G, S, R> {
    pub fn new(session: GameSession<G, S, R>, strategy: Box<dyn Strategy>) -> Self {
        Client {
            session,
            strategy,
            history: Vec::new(),
        }
    }

    pub async fn play_round(&mut self) -> Result<RoundReport, GameError> {
        let next_move = self.strategy.make_move(&self.history);
        debug!("Strategy picked {}", next_move);
        let report = self.session.select_choice(&next_move.to_string()).await?;
        self.history.push(report.outcome);
        Ok(report)
    }

    /// Play until the current match finishes, handing every round to
    /// `on_round`. Gives up with `None` after `max_rounds` rounds.
    pub async fn play_match(
        &mut self,
        max_rounds: u32,
        mut on_round: impl FnMut(&RoundReport),
    ) -> Result<Option<Completion>, GameError> {
        for _ in 0..max_rounds {
            let report = self.play_round().await?;
            on_round(&report);
            if let Some(completion) = report.completion {
                return Ok(Some(completion));
            }
        }
        warn!("No winner after {} rounds", max_rounds);
        Ok(None)
    }

    /// Start a new match, forgetting the previous one's moves.
    pub fn reset(&mut self) {
        self.session.reset();
        self.history.clear();
    }

    pub fn history(&self) -> &[RoundOutcome] {
        &self.history
    }

    pub fn session(&self) -> &GameSession<G, S, R> {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut GameSession<G, S, R> {
        &mut self.session
    }
}
