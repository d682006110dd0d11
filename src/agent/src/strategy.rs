use common::model::game::Choice;
use game_engine::RoundOutcome;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Picks the player's next choice from the rounds played so far.
pub trait Strategy: Send {
    fn make_move(&mut self, history: &[RoundOutcome]) -> Choice;
}

// Trivial strategies
pub struct Always(pub Choice);
impl Strategy for Always {
    fn make_move(&mut self, _: &[RoundOutcome]) -> Choice {
        self.0
    }
}

/// Rock, paper, scissors, rock, ...
pub struct Cycle {}
impl Strategy for Cycle {
    fn make_move(&mut self, history: &[RoundOutcome]) -> Choice {
        Choice::ALL[history.len() % Choice::ALL.len()]
    }
}

/// Plays whatever beats the cpu's previous choice.
pub struct CounterLast {}
impl Strategy for CounterLast {
    fn make_move(&mut self, history: &[RoundOutcome]) -> Choice {
        match history.last() {
            Some(last) => Choice::ALL
                .into_iter()
                .find(|c| c.beats() == last.cpu_choice)
                .unwrap_or(Choice::Rock),
            None => Choice::Rock,
        }
    }
}

pub struct RandomMove {
    rng: ChaCha8Rng,
}
impl RandomMove {
    pub fn new() -> Self {
        RandomMove {
            rng: ChaCha8Rng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        RandomMove {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}
impl Default for RandomMove {
    fn default() -> Self {
        Self::new()
    }
}
impl Strategy for RandomMove {
    fn make_move(&mut self, _: &[RoundOutcome]) -> Choice {
        Choice::ALL[self.rng.gen_range(0..Choice::ALL.len())]
    }
}
