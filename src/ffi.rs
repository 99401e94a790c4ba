//! C ABI surface of the `aurora_client_jni` shared library.

use crate::config::Config;
use crate::core::service::AuroraService;
use crate::utils::error::Result;
use crate::utils::logger;
use crate::utils::validation::Validate;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

/// Entry point resolved by the launcher (`void runService(void)`).
///
/// Neither errors nor panics cross this boundary: both are logged and the
/// function returns.
#[no_mangle]
#[allow(non_snake_case)]
pub extern "C" fn runService() {
    let outcome = panic::catch_unwind(AssertUnwindSafe(run_service));
    match outcome {
        Ok(Ok(())) => {}
        Ok(Err(e)) => {
            tracing::error!(
                "❌ Service failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
        }
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            tracing::error!("💥 Service panicked: {}", message);
            eprintln!("💥 Service panicked: {}", message);
        }
    }
}

/// Loads the configuration and runs the service to completion on a
/// current-thread runtime.
pub fn run_service() -> Result<()> {
    let path = Config::default_path();
    let config = match Config::from_file(&path).and_then(|c| c.validate().map(|_| c)) {
        Ok(config) => config,
        Err(e) => {
            logger::init_cli_logger(false);
            tracing::error!("❌ Failed to load {}: {}", path.display(), e);
            return Err(e);
        }
    };

    logger::init_from_config(config.logging.as_ref(), false);
    tracing::info!("📁 Configuration loaded from {}", path.display());

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let service = AuroraService::new(config)?;
    runtime.block_on(service.run())
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
