use anyhow::Context;
use aurora_client_jni::config::{Config, ServiceArgs};
use aurora_client_jni::utils::{logger, validation::Validate};
use aurora_client_jni::AuroraService;
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = ServiceArgs::parse();

    // 載入 TOML 配置
    let config = Config::from_file(&args.config)
        .with_context(|| format!("failed to load config file '{}'", args.config))?;

    logger::init_from_config(config.logging.as_ref(), args.verbose);
    tracing::info!("📁 Loaded configuration from: {}", args.config);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    display_config_summary(&config);

    if args.check {
        tracing::info!("🔍 Check mode - configuration is valid, not starting the service");
        return Ok(());
    }

    let service = AuroraService::new(config).context("failed to build the service")?;
    service.run().await.context("service stopped")?;
    Ok(())
}

fn display_config_summary(config: &Config) {
    tracing::info!("📋 Configuration Summary:");
    tracing::info!("  Serial bridge: {}", config.serial.tcp_address);
    tracing::info!("  Inverter address: {}", config.serial.aurora_address);
    tracing::info!(
        "  Poll interval: {:?} (timeout {:?})",
        config.poll_interval(),
        config.reading_timeout()
    );
    tracing::info!("  PVOutput system: {}", config.pv_output.system_id);
    tracing::info!("  PVOutput endpoint: {}", config.pvoutput_endpoint());
    tracing::info!(
        "  Location: {:.4}, {:.4} ({} m)",
        config.location.latitude,
        config.location.longitude,
        config.location.elevation
    );
}
