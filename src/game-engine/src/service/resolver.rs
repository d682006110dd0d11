use common::model::game::Choice;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::model::round::RoundOutcome;

/// Plays the computer's side of a round.
///
/// The random source is injected so a seeded generator makes every cpu pick
/// reproducible.
#[derive(Debug, Clone)]
pub struct Resolver<R: Rng> {
    rng: R,
}

impl Resolver<ChaCha8Rng> {
    pub fn seeded(seed: u64) -> Self {
        Resolver::new(ChaCha8Rng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Resolver::new(ChaCha8Rng::from_entropy())
    }
}

impl<R: Rng> Resolver<R> {
    pub fn new(rng: R) -> Self {
        Resolver { rng }
    }

    /// Uniform pick over rock, paper and scissors.
    pub fn pick_cpu(&mut self) -> Choice {
        Choice::ALL[self.rng.gen_range(0..Choice::ALL.len())]
    }

    pub fn resolve(&mut self, player_choice: Choice) -> RoundOutcome {
        let cpu_choice = self.pick_cpu();
        let outcome = Self::resolve_against(player_choice, cpu_choice);
        debug!(
            "Resolved {} vs {}: {}",
            outcome.player_choice, outcome.cpu_choice, outcome.winner
        );
        outcome
    }

    pub fn resolve_against(player_choice: Choice, cpu_choice: Choice) -> RoundOutcome {
        RoundOutcome::between(player_choice, cpu_choice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::model::game::Winner;
    use proptest::prelude::*;

    type SeededResolver = Resolver<ChaCha8Rng>;

    fn choice() -> impl Strategy<Value = Choice> {
        prop_oneof![Just(Choice::Rock), Just(Choice::Paper), Just(Choice::Scissors)]
    }

    #[test]
    fn rock_against_forced_cpu() {
        let against = |cpu| SeededResolver::resolve_against(Choice::Rock, cpu).winner;
        assert_eq!(against(Choice::Scissors), Winner::Player);
        assert_eq!(against(Choice::Paper), Winner::Cpu);
        assert_eq!(against(Choice::Rock), Winner::Draw);
    }

    #[test]
    fn all_nine_pairs() {
        let table = [
            (Choice::Rock, Choice::Rock, Winner::Draw),
            (Choice::Rock, Choice::Paper, Winner::Cpu),
            (Choice::Rock, Choice::Scissors, Winner::Player),
            (Choice::Paper, Choice::Rock, Winner::Player),
            (Choice::Paper, Choice::Paper, Winner::Draw),
            (Choice::Paper, Choice::Scissors, Winner::Cpu),
            (Choice::Scissors, Choice::Rock, Winner::Cpu),
            (Choice::Scissors, Choice::Paper, Winner::Player),
            (Choice::Scissors, Choice::Scissors, Winner::Draw),
        ];
        for (player, cpu, winner) in table {
            let outcome = SeededResolver::resolve_against(player, cpu);
            assert_eq!(outcome.winner, winner, "{} vs {}", player, cpu);
            assert_eq!(outcome.player_choice, player);
            assert_eq!(outcome.cpu_choice, cpu);
        }
    }

    #[test]
    fn same_seed_same_picks() {
        let mut a = Resolver::seeded(42);
        let mut b = Resolver::seeded(42);
        for _ in 0..100 {
            assert_eq!(a.resolve(Choice::Paper), b.resolve(Choice::Paper));
        }
    }

    #[test]
    fn cpu_picks_are_roughly_uniform() {
        let mut resolver = Resolver::seeded(7);
        let mut counts = [0u32; 3];
        let samples = 3000;
        for _ in 0..samples {
            let pick = resolver.pick_cpu();
            counts[Choice::ALL.iter().position(|c| *c == pick).unwrap()] += 1;
        }
        for count in counts {
            assert!(count > 850 && count < 1150, "Skewed pick count {}", count);
        }
    }

    proptest! {
        #[test]
        fn draw_iff_equal(player in choice(), cpu in choice()) {
            let winner = SeededResolver::resolve_against(player, cpu).winner;
            prop_assert_eq!(winner == Winner::Draw, player == cpu);
        }

        #[test]
        fn swapping_sides_swaps_winner(player in choice(), cpu in choice()) {
            let forward = SeededResolver::resolve_against(player, cpu).winner;
            let backward = SeededResolver::resolve_against(cpu, player).winner;
            let expected = match forward {
                Winner::Player => Winner::Cpu,
                Winner::Cpu => Winner::Player,
                Winner::Draw => Winner::Draw,
            };
            prop_assert_eq!(backward, expected);
        }

        #[test]
        fn resolve_matches_table(seed in any::<u64>(), player in choice()) {
            let mut resolver = Resolver::seeded(seed);
            let outcome = resolver.resolve(player);
            prop_assert_eq!(outcome, SeededResolver::resolve_against(player, outcome.cpu_choice));
        }
    }
}
