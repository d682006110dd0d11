use common::model::game::{Choice, Winner};
use serde::Serialize;

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundOutcome {
    pub player_choice: Choice,
    pub cpu_choice: Choice,
    pub winner: Winner,
}

impl RoundOutcome {
    pub fn between(player_choice: Choice, cpu_choice: Choice) -> Self {
        RoundOutcome {
            player_choice,
            cpu_choice,
            winner: player_choice.against(&cpu_choice),
        }
    }
}
