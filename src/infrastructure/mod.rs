pub mod config;
pub mod feed;

pub use config::{AppConfig, ConfigError, ServerConfig, StreamConfig};
pub use feed::SimulatedFeed;
