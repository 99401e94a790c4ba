use crate::adapters::{AuroraClient, PvOutputUploader};
use crate::config::Config;
use crate::core::session::{PollingSession, SessionSettings};
use crate::core::solar;
use crate::domain::model::{SessionEnd, SessionSummary};
use crate::domain::ports::StatusUploader;
use crate::utils::error::Result;
use chrono::Utc;
use std::time::Duration;

/// Re-check interval when no sunrise is due within two days (polar night).
const POLAR_RECHECK: Duration = Duration::from_secs(6 * 3600);

/// Daylight polling loop: connect to the bridge while the sun is up, sleep
/// until sunrise otherwise.
pub struct AuroraService<U = PvOutputUploader> {
    config: Config,
    uploader: U,
}

impl AuroraService<PvOutputUploader> {
    pub fn new(config: Config) -> Result<Self> {
        let uploader = PvOutputUploader::from_config(&config)?;
        Ok(Self::with_uploader(config, uploader))
    }
}

impl<U: StatusUploader> AuroraService<U> {
    pub fn with_uploader(config: Config, uploader: U) -> Self {
        Self { config, uploader }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn settings(&self) -> SessionSettings {
        SessionSettings {
            address: self.config.serial.aurora_address,
            poll_interval: self.config.poll_interval(),
            reading_timeout: self.config.reading_timeout(),
        }
    }

    /// Runs until a non-transient error occurs.
    pub async fn run(&self) -> Result<()> {
        let location = self.config.location;
        tracing::info!(
            "🚀 Starting Aurora service for inverter {} via {}",
            self.config.serial.aurora_address,
            self.config.serial.tcp_address
        );

        loop {
            let now = Utc::now();
            let daytime = solar::is_daytime(now, &location);
            tracing::debug!("Is daytime? {}", daytime);

            if !daytime {
                let wait = solar::until_next_sunrise(now, &location).unwrap_or(POLAR_RECHECK);
                tracing::info!("🌙 Night time, sleeping {:?} until sunrise", wait);
                tokio::time::sleep(wait).await;
                continue;
            }

            let pause = match self
                .run_session(|| solar::is_daytime(Utc::now(), &location))
                .await
            {
                Ok(summary) => {
                    tracing::info!(
                        "Session finished: {} readings, {} rejected uploads, {:?}",
                        summary.readings,
                        summary.rejected_uploads,
                        summary.end
                    );
                    match summary.end {
                        SessionEnd::Nightfall => None,
                        SessionEnd::Interrupted(_) => Some(self.config.reconnect_delay()),
                    }
                }
                Err(e) if e.is_transient() => {
                    tracing::warn!("⚠️ Could not start session: {}", e);
                    Some(self.config.reconnect_delay())
                }
                Err(e) => {
                    tracing::error!("❌ Service stopped: {} ({:?})", e, e.category());
                    return Err(e);
                }
            };

            if let Some(pause) = pause {
                tracing::info!("🔁 Reconnecting in {:?}", pause);
                tokio::time::sleep(pause).await;
            }
        }
    }

    /// Connects to the bridge and polls while `still_daytime` holds.
    pub async fn run_session<F>(&self, still_daytime: F) -> Result<SessionSummary>
    where
        F: Fn() -> bool,
    {
        let client =
            AuroraClient::connect(self.config.serial.tcp_address, self.config.request_timeout())
                .await?;
        PollingSession::new(client, &self.uploader, self.settings())
            .run(still_daytime)
            .await
    }
}
