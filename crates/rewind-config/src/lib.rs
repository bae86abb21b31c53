/// Application configuration for the rewind history tools.
pub mod config;

pub use config::{AppConfig, DATA_DIR_ENV};
