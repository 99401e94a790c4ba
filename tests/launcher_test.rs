use aurora_client_jni::launcher::{self, DynamicLoader, Launcher, LauncherState, MODULE_NAME};
use aurora_client_jni::AuroraError;
use std::env::consts::{DLL_PREFIX, DLL_SUFFIX};
use std::path::{Path, PathBuf};
use std::process::Command;

#[test]
fn test_missing_module_exits_non_zero() {
    let launcher = Launcher::new(DynamicLoader::with_search_dirs(Vec::new()));

    let code = launcher::launch(&launcher, "does_not_exist");

    assert_ne!(code, 0);
    assert_eq!(code, 2);
    assert_eq!(launcher.state(), LauncherState::Unloaded);
}

#[test]
fn test_global_launcher_bootstraps_once() {
    let launcher = launcher::global();

    let first = launcher.bootstrap("does_not_exist").unwrap_err();
    assert!(matches!(first, AuroraError::ModuleLoadError { .. }));

    // 第二次啟動一律拒絕，也不會再嘗試載入
    let second = launcher.bootstrap(MODULE_NAME).unwrap_err();
    assert!(matches!(second, AuroraError::AlreadyBootstrapped));
    assert_eq!(second.exit_code(), 4);
    assert_eq!(launcher.state(), LauncherState::Unloaded);
}

/// Finds the cdylib cargo built for this test run. `cargo test` leaves it in
/// `deps/`, possibly with a hash in the file name.
fn built_native_module(bin_dir: &Path) -> Option<PathBuf> {
    let filename = libloading::library_filename(MODULE_NAME);
    let deps = bin_dir.join("deps");

    for dir in [bin_dir, deps.as_path()] {
        let candidate = dir.join(&filename);
        if candidate.is_file() {
            return Some(candidate);
        }
    }

    let prefix = format!("{}{}-", DLL_PREFIX, MODULE_NAME);
    std::fs::read_dir(&deps)
        .ok()?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with(&prefix) && n.ends_with(DLL_SUFFIX))
        })
        .max_by_key(|path| std::fs::metadata(path).and_then(|m| m.modified()).ok())
}

fn loader_path_var() -> &'static str {
    if cfg!(target_os = "windows") {
        "PATH"
    } else if cfg!(target_os = "macos") {
        "DYLD_LIBRARY_PATH"
    } else {
        "LD_LIBRARY_PATH"
    }
}

#[test]
fn test_launcher_binary_calls_into_native_module() {
    let exe = Path::new(env!("CARGO_BIN_EXE_aurora-launcher"));
    let bin_dir = exe.parent().unwrap();
    let built = built_native_module(bin_dir).unwrap_or_else(|| {
        panic!(
            "{} was not built in {} or its deps/",
            libloading::library_filename(MODULE_NAME).to_string_lossy(),
            bin_dir.display()
        )
    });

    // 以標準檔名放到暫存目錄，並交給平台載入器搜尋
    let lib_dir = tempfile::TempDir::new().unwrap();
    let installed = lib_dir.path().join(libloading::library_filename(MODULE_NAME));
    std::fs::copy(&built, &installed).unwrap();
    let mut search_path = vec![lib_dir.path().to_path_buf()];
    if let Some(existing) = std::env::var_os(loader_path_var()) {
        search_path.extend(std::env::split_paths(&existing));
    }
    let search_path = std::env::join_paths(search_path).unwrap();

    let output = Command::new(exe)
        .arg("--ignored-flag")
        .arg("positional")
        .env(loader_path_var(), search_path)
        .env("AURORA_CONFIG", lib_dir.path().join("missing.toml"))
        .env("RUST_LOG", "aurora_client_jni=info")
        .output()
        .unwrap();

    // runService 回報設定錯誤後正常返回，啟動器以 0 結束
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr);
    assert!(stderr.contains("missing.toml"), "stderr: {}", stderr);
    assert!(!stderr.contains("Could not start the service"), "stderr: {}", stderr);
}
