#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::ServiceArgs;
pub use toml_config::{Config, LocationConfig, LoggingConfig, PvOutputConfig, SerialConfig};
