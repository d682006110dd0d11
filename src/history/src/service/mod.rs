pub mod history_store;
pub mod statistics;
pub mod storage;
