pub mod error;
pub mod model;
pub mod service;

pub use error::GameError;
pub use model::{format::MatchFormat, round::RoundOutcome};
pub use service::{
    match_state::{Completion, MatchState, MatchStateMachine},
    resolver::Resolver,
    session::{GameSession, HttpSession, RoundReport, SessionConfig},
};
