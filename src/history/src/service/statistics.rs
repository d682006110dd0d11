use common::model::game::MatchWinner;
use serde::Serialize;

use crate::model::summary::MatchSummary;

pub const RECENT_MATCHES: usize = 5;
pub const NO_FAVOURITE: &str = "None";

/// Aggregate figures over a set of completed matches.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Statistics {
    pub total_matches: usize,
    pub player_wins: usize,
    pub cpu_wins: usize,
    /// Share of matches the player won, in percent.
    pub success_rate: f64,
    /// Most played format; ties go to the one seen first.
    pub favourite_format: String,
    /// Newest first.
    pub recent: Vec<MatchSummary>,
}

impl Statistics {
    /// `history` must be in chronological order.
    pub fn from_history<'a>(history: impl IntoIterator<Item = &'a MatchSummary>) -> Self {
        let history: Vec<&MatchSummary> = history.into_iter().collect();

        let mut player_wins = 0;
        let mut cpu_wins = 0;
        let mut format_counts: Vec<(&str, usize)> = Vec::new();
        for summary in history.iter() {
            match summary.winner {
                MatchWinner::Player => player_wins += 1,
                MatchWinner::Cpu => cpu_wins += 1,
            }
            match format_counts
                .iter_mut()
                .find(|(format, _)| *format == summary.format)
            {
                Some((_, count)) => *count += 1,
                None => format_counts.push((summary.format.as_str(), 1)),
            }
        }

        let mut favourite_format = NO_FAVOURITE;
        let mut most_played = 0;
        for (format, count) in format_counts {
            if count > most_played {
                most_played = count;
                favourite_format = format;
            }
        }

        let total_matches = history.len();
        let success_rate = if total_matches > 0 {
            player_wins as f64 / total_matches as f64 * 100.0
        } else {
            0.0
        };

        Statistics {
            total_matches,
            player_wins,
            cpu_wins,
            success_rate,
            favourite_format: favourite_format.to_owned(),
            recent: history
                .iter()
                .rev()
                .take(RECENT_MATCHES)
                .map(|s| (*s).clone())
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(format: &str, winner: MatchWinner) -> MatchSummary {
        let score = match winner {
            MatchWinner::Player => (2, 0),
            MatchWinner::Cpu => (0, 2),
        };
        MatchSummary::new(format, winner, score, 2, 3)
    }

    #[test]
    fn empty_history() {
        let stats = Statistics::from_history(&Vec::<MatchSummary>::new());
        assert_eq!(stats.total_matches, 0);
        assert_eq!(stats.success_rate, 0.0);
        assert_eq!(stats.favourite_format, NO_FAVOURITE);
        assert!(stats.recent.is_empty());
    }

    #[test]
    fn counts_wins_and_rate() {
        let history = vec![
            summary("Best 2 of 3", MatchWinner::Player),
            summary("Best 2 of 3", MatchWinner::Cpu),
            summary("Best 3 of 5", MatchWinner::Player),
            summary("Best 3 of 5", MatchWinner::Player),
        ];
        let stats = Statistics::from_history(&history);
        assert_eq!(stats.total_matches, 4);
        assert_eq!(stats.player_wins, 3);
        assert_eq!(stats.cpu_wins, 1);
        assert_eq!(stats.success_rate, 75.0);
        // Tied at two each, the first seen wins
        assert_eq!(stats.favourite_format, "Best 2 of 3");
    }

    #[test]
    fn favourite_is_most_played() {
        let history = vec![
            summary("Best 2 of 3", MatchWinner::Player),
            summary("Best 4 of 7", MatchWinner::Cpu),
            summary("Best 4 of 7", MatchWinner::Cpu),
        ];
        assert_eq!(Statistics::from_history(&history).favourite_format, "Best 4 of 7");
    }

    #[test]
    fn recent_is_newest_five() {
        let history: Vec<MatchSummary> = (1..=7)
            .map(|rounds| MatchSummary::new("Best 2 of 3", MatchWinner::Player, (2, 0), rounds, 1))
            .collect();
        let stats = Statistics::from_history(&history);
        let rounds: Vec<u32> = stats.recent.iter().map(|s| s.rounds_played).collect();
        assert_eq!(rounds, vec![7, 6, 5, 4, 3]);
    }
}
