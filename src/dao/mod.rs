/// Persisted league and season documents.
pub mod models;
/// League and season persistence backends.
pub mod season_store;
/// Storage abstraction layer errors.
pub mod storage;
