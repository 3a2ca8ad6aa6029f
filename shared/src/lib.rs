// Wire models and helpers used by the engine and its clients.
pub mod models;
pub mod utils;
