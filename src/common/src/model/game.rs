use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid choice: {0:?}")]
pub struct InvalidChoice(pub String);

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Choice {
    Rock,
    Paper,
    Scissors,
}

impl Choice {
    pub const ALL: [Choice; 3] = [Choice::Rock, Choice::Paper, Choice::Scissors];

    /// The choice this one defeats.
    pub fn beats(&self) -> Choice {
        match self {
            Choice::Rock => Choice::Scissors,
            Choice::Paper => Choice::Rock,
            Choice::Scissors => Choice::Paper,
        }
    }

    /// Winner of a round where `self` is the player's pick.
    pub fn against(&self, cpu: &Choice) -> Winner {
        if self == cpu {
            Winner::Draw
        } else if self.beats() == *cpu {
            Winner::Player
        } else {
            Winner::Cpu
        }
    }

    // Backend ids: 1 = rock, 2 = paper, 3 = scissors
    pub fn id(&self) -> u32 {
        match self {
            Choice::Rock => 1,
            Choice::Paper => 2,
            Choice::Scissors => 3,
        }
    }

    pub fn from_id(id: u32) -> Option<Choice> {
        match id {
            1 => Some(Choice::Rock),
            2 => Some(Choice::Paper),
            3 => Some(Choice::Scissors),
            _ => None,
        }
    }

    /// Name used by the backend catalog.
    pub fn catalog_name(&self) -> &'static str {
        match self {
            Choice::Rock => "Piedra",
            Choice::Paper => "Papel",
            Choice::Scissors => "Tijera",
        }
    }
}

impl FromStr for Choice {
    type Err = InvalidChoice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "rock" | "piedra" => Ok(Choice::Rock),
            "paper" | "papel" => Ok(Choice::Paper),
            "scissors" | "tijera" => Ok(Choice::Scissors),
            _ => Err(InvalidChoice(s.to_owned())),
        }
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Choice::Rock => "rock",
            Choice::Paper => "paper",
            Choice::Scissors => "scissors",
        };
        f.pad(name)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    Player,
    Cpu,
    Draw,
}

impl Winner {
    // Backend ids: 1 = player, 2 = cpu, 3 = draw
    pub fn id(&self) -> u32 {
        match self {
            Winner::Player => 1,
            Winner::Cpu => 2,
            Winner::Draw => 3,
        }
    }

    pub fn from_id(id: u32) -> Option<Winner> {
        match id {
            1 => Some(Winner::Player),
            2 => Some(Winner::Cpu),
            3 => Some(Winner::Draw),
            _ => None,
        }
    }
}

impl fmt::Display for Winner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Winner::Player => "player",
            Winner::Cpu => "cpu",
            Winner::Draw => "draw",
        };
        f.pad(name)
    }
}

/// Side that won a whole match. A match never ends in a draw.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MatchWinner {
    Player,
    Cpu,
}

impl From<MatchWinner> for Winner {
    fn from(winner: MatchWinner) -> Self {
        match winner {
            MatchWinner::Player => Winner::Player,
            MatchWinner::Cpu => Winner::Cpu,
        }
    }
}

impl fmt::Display for MatchWinner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Winner::from(*self).fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn beats_table_is_cyclic() {
        assert_eq!(Choice::Rock.beats(), Choice::Scissors);
        assert_eq!(Choice::Paper.beats(), Choice::Rock);
        assert_eq!(Choice::Scissors.beats(), Choice::Paper);
        for choice in Choice::ALL {
            assert_eq!(choice.beats().beats().beats(), choice);
        }
    }

    #[test]
    fn against_covers_every_pair() {
        for player in Choice::ALL {
            for cpu in Choice::ALL {
                let winner = player.against(&cpu);
                if player == cpu {
                    assert_eq!(winner, Winner::Draw);
                } else if player.beats() == cpu {
                    assert_eq!(winner, Winner::Player);
                } else {
                    assert_eq!(winner, Winner::Cpu);
                    assert_eq!(cpu.beats(), player);
                }
            }
        }
    }

    #[test]
    fn parses_english_and_catalog_names() {
        assert_eq!("rock".parse::<Choice>(), Ok(Choice::Rock));
        assert_eq!(" Papel ".parse::<Choice>(), Ok(Choice::Paper));
        assert_eq!("TIJERA".parse::<Choice>(), Ok(Choice::Scissors));
        assert_eq!(
            "lizard".parse::<Choice>(),
            Err(InvalidChoice("lizard".to_owned()))
        );
        assert!("".parse::<Choice>().is_err());
    }

    #[test]
    fn ids_match_backend_convention() {
        for choice in Choice::ALL {
            assert_eq!(Choice::from_id(choice.id()), Some(choice));
            assert_eq!(choice.catalog_name().parse::<Choice>(), Ok(choice));
        }
        assert_eq!(Choice::from_id(0), None);
        assert_eq!(Winner::from_id(1), Some(Winner::Player));
        assert_eq!(Winner::from_id(2), Some(Winner::Cpu));
        assert_eq!(Winner::from_id(3), Some(Winner::Draw));
        assert_eq!(Winner::from_id(4), None);
    }
}
