pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod ffi;
pub mod launcher;
pub mod protocol;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::ServiceArgs;
pub use config::Config;

pub use adapters::{AuroraClient, PvOutputUploader};
pub use core::service::AuroraService;
pub use launcher::{DynamicLoader, Launcher, LauncherState};
pub use utils::error::{AuroraError, Result};
