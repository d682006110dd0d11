pub mod gateway;
pub mod model;
pub mod utility;

pub use reqwest;
