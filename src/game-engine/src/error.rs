use common::{gateway::GatewayError, model::game::InvalidChoice};
use history::StorageError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GameError {
    #[error(transparent)]
    InvalidChoice(#[from] InvalidChoice),
    #[error("format {id:?} needs at least one win, got {wins_required}")]
    InvalidFormat { id: String, wins_required: u32 },
    #[error("unknown match format {0:?}")]
    UnknownFormat(String),
    #[error("match already finished")]
    MatchFinished,
    #[error("gateway error: {0}")]
    Gateway(#[from] GatewayError),
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

pub type Result<T> = std::result::Result<T, GameError>;
