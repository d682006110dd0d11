pub mod game;
pub mod messages;
