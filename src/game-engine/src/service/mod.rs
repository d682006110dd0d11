pub mod match_state;
pub mod resolver;
pub mod session;
