use aurora_client_jni::launcher::{self, MODULE_NAME};
use aurora_client_jni::utils::logger;
use std::process::ExitCode;

// 命令列參數一律忽略
fn main() -> ExitCode {
    logger::init_cli_logger(false);

    tracing::info!("Starting aurora launcher");

    let code = launcher::launch(launcher::global(), MODULE_NAME);
    if code == 0 {
        tracing::info!("✅ Service returned normally");
    }
    ExitCode::from(code)
}
