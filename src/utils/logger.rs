use crate::config::LoggingConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_DIRECTIVE: &str = "aurora_client_jni=info";
const VERBOSE_DIRECTIVE: &str = "aurora_client_jni=debug,info";

fn env_filter(fallback: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
}

// try_init: the native entry point may run inside a process that already
// installed a subscriber.
pub fn init_cli_logger(verbose: bool) {
    let filter = if verbose {
        env_filter(VERBOSE_DIRECTIVE)
    } else {
        env_filter(DEFAULT_DIRECTIVE)
    };

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .try_init();
}

pub fn init_json_logger(directive: &str) {
    let _ = tracing_subscriber::registry()
        .with(env_filter(directive))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .json(),
        )
        .try_init();
}

/// 依設定檔 `[logging]` 區段初始化日誌
pub fn init_from_config(logging: Option<&LoggingConfig>, verbose: bool) {
    let Some(logging) = logging else {
        init_cli_logger(verbose);
        return;
    };

    let directive = match (&logging.level, verbose) {
        (_, true) => VERBOSE_DIRECTIVE.to_string(),
        (Some(level), false) => format!("aurora_client_jni={}", level),
        (None, false) => DEFAULT_DIRECTIVE.to_string(),
    };

    if logging.is_json() {
        init_json_logger(&directive);
    } else {
        let _ = tracing_subscriber::registry()
            .with(env_filter(&directive))
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .compact(),
            )
            .try_init();
    }
}
