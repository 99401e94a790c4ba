use crate::config::Config;
use crate::domain::model::{Reading, UploadOutcome};
use crate::domain::ports::StatusUploader;
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::time::Duration;

pub const API_KEY_HEADER: &str = "X-Pvoutput-Apikey";
pub const SYSTEM_ID_HEADER: &str = "X-Pvoutput-SystemId";

/// Uploads live status to the PVOutput `addstatus` service.
pub struct PvOutputUploader {
    client: Client,
    endpoint: String,
    system_id: String,
    api_key: String,
}

impl PvOutputUploader {
    pub fn new(endpoint: String, system_id: String, api_key: String) -> Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self {
            client,
            endpoint,
            system_id,
            api_key,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            config.pvoutput_endpoint().to_string(),
            config.pv_output.system_id.clone(),
            config.pv_output.api_key.clone(),
        )
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// `d` date, `t` time, `v1` energy generation (Wh), `v6` voltage.
pub fn status_body(reading: &Reading) -> String {
    format!(
        "d={}&t={}&v1={}&v6={}",
        reading.taken_at.format("%Y%m%d"),
        reading.taken_at.format("%H:%M"),
        reading.energy_wh,
        reading.voltage_v
    )
}

#[async_trait]
impl StatusUploader for PvOutputUploader {
    async fn upload(&self, reading: &Reading) -> Result<UploadOutcome> {
        let body = status_body(reading);
        tracing::debug!("Uploading status to {}: {}", self.endpoint, body);

        let response = self
            .client
            .post(&self.endpoint)
            .header(API_KEY_HEADER, &self.api_key)
            .header(SYSTEM_ID_HEADER, &self.system_id)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(UploadOutcome::Accepted)
        } else {
            // 單次上傳失敗不影響後續讀數
            tracing::warn!("⚠️ Failed to upload status ({}), continuing", status);
            Ok(UploadOutcome::Rejected(status.as_u16()))
        }
    }
}
