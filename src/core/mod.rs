pub mod rate_limit;
pub mod service;
pub mod session;
pub mod solar;

pub use crate::domain::model::{Reading, SessionEnd, SessionSummary, UploadOutcome};
pub use crate::domain::ports::{Inverter, StatusUploader};
pub use crate::utils::error::Result;
