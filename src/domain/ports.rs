use crate::domain::model::{Reading, UploadOutcome};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Source of `(daily energy Wh, input 1 voltage V)` pairs.
#[async_trait]
pub trait Inverter: Send {
    async fn read_pair(&mut self, address: u8) -> Result<(u32, f32)>;
}

#[async_trait]
pub trait StatusUploader: Send + Sync {
    async fn upload(&self, reading: &Reading) -> Result<UploadOutcome>;
}
