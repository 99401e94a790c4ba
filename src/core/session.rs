use crate::core::rate_limit::RateLimiter;
use crate::domain::model::{Reading, SessionEnd, SessionSummary, UploadOutcome};
use crate::domain::ports::{Inverter, StatusUploader};
use crate::utils::error::{AuroraError, Result};
use std::time::Duration;

/// Readings let through before rate limiting kicks in.
pub const INITIAL_BURST: u64 = 2;

#[derive(Debug, Clone, Copy)]
pub struct SessionSettings {
    pub address: u8,
    pub poll_interval: Duration,
    pub reading_timeout: Duration,
}

/// One connected stretch of polling: read, log, upload, repeat until dusk
/// or until the link drops.
pub struct PollingSession<'a, I, U: ?Sized> {
    inverter: I,
    uploader: &'a U,
    settings: SessionSettings,
    limiter: RateLimiter,
}

impl<'a, I, U> PollingSession<'a, I, U>
where
    I: Inverter,
    U: StatusUploader + ?Sized,
{
    pub fn new(inverter: I, uploader: &'a U, settings: SessionSettings) -> Self {
        Self {
            inverter,
            uploader,
            limiter: RateLimiter::new(settings.poll_interval, INITIAL_BURST),
            settings,
        }
    }

    /// Transient failures end the session with `SessionEnd::Interrupted`;
    /// anything else is returned as an error.
    pub async fn run<F>(mut self, still_daytime: F) -> Result<SessionSummary>
    where
        F: Fn() -> bool,
    {
        let mut readings = 0;
        let mut rejected_uploads = 0;

        let end = loop {
            // 等待後才檢查，日落後不再取樣
            self.limiter.ready().await;

            if !still_daytime() {
                tracing::info!("🌇 Daylight over, ending session");
                break SessionEnd::Nightfall;
            }

            let reading = match self.next_reading().await {
                Ok(reading) => reading,
                Err(e) if e.is_transient() => {
                    tracing::warn!("⚠️ Inverter link interrupted: {}", e);
                    break SessionEnd::Interrupted(e.to_string());
                }
                Err(e) => return Err(e),
            };
            readings += 1;
            tracing::info!("☀️ {}Wh, {}V", reading.energy_wh, reading.voltage_v);

            match self.uploader.upload(&reading).await {
                Ok(UploadOutcome::Accepted) => {}
                Ok(UploadOutcome::Rejected(_)) => rejected_uploads += 1,
                Err(e) if e.is_transient() => {
                    tracing::warn!("⚠️ Upload failed: {}", e);
                    break SessionEnd::Interrupted(e.to_string());
                }
                Err(e) => return Err(e),
            }
        };

        Ok(SessionSummary {
            readings,
            rejected_uploads,
            end,
        })
    }

    async fn next_reading(&mut self) -> Result<Reading> {
        let timeout = self.settings.reading_timeout;
        let (energy, voltage) =
            tokio::time::timeout(timeout, self.inverter.read_pair(self.settings.address))
                .await
                .map_err(|_| AuroraError::TimeoutError {
                    operation: "inverter reading".to_string(),
                    seconds: timeout.as_secs_f64(),
                })??;
        Ok(Reading::now(energy, voltage))
    }
}
