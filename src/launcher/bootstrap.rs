use super::loader::{DynamicLoader, ModuleLoader, NativeModule};
use crate::utils::error::{AuroraError, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, OnceLock};

/// Native module loaded at process start.
pub const MODULE_NAME: &str = "aurora_client_jni";
/// Symbol the launcher transfers control to.
pub const ENTRY_POINT_SYMBOL: &str = "runService";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LauncherState {
    Unloaded,
    Loaded,
}

/// Loads one native module and calls into it.
///
/// The state only moves `Unloaded -> Loaded`; the module stays mapped for as
/// long as the launcher lives. `load_module` with the already-loaded name is a
/// no-op and any other name fails with `ModuleAlreadyLoaded`. `bootstrap` runs
/// at most once; later calls fail with `AlreadyBootstrapped` without touching
/// the module.
pub struct Launcher<L: ModuleLoader> {
    loader: L,
    module: OnceLock<L::Module>,
    load_lock: Mutex<()>,
    bootstrapped: AtomicBool,
}

impl<L: ModuleLoader> Launcher<L> {
    pub fn new(loader: L) -> Self {
        Self {
            loader,
            module: OnceLock::new(),
            load_lock: Mutex::new(()),
            bootstrapped: AtomicBool::new(false),
        }
    }

    pub fn state(&self) -> LauncherState {
        if self.module.get().is_some() {
            LauncherState::Loaded
        } else {
            LauncherState::Unloaded
        }
    }

    pub fn module(&self) -> Option<&L::Module> {
        self.module.get()
    }

    pub fn load_module(&self, name: &str) -> Result<&L::Module> {
        // 序列化載入，避免同一模組被開啟兩次
        let _guard = self.load_lock.lock().unwrap_or_else(|e| e.into_inner());

        if let Some(module) = self.module.get() {
            if module.name() == name {
                tracing::debug!("Module '{}' already loaded", name);
                return Ok(module);
            }
            return Err(AuroraError::ModuleAlreadyLoaded {
                loaded: module.name().to_string(),
                requested: name.to_string(),
            });
        }

        let module = self.loader.load(name)?;
        Ok(self.module.get_or_init(|| module))
    }

    /// Calls the entry point of the loaded module and blocks until it returns.
    pub fn invoke_entry_point(&self) -> Result<()> {
        let module = self
            .module
            .get()
            .ok_or_else(|| AuroraError::EntryPointUnresolvedError {
                module: String::new(),
                symbol: ENTRY_POINT_SYMBOL.to_string(),
                reason: "no module has been loaded".to_string(),
            })?;

        let entry = module.entry_point(ENTRY_POINT_SYMBOL)?;
        tracing::info!(
            "➡️ Transferring control to {}::{}",
            module.name(),
            ENTRY_POINT_SYMBOL
        );

        // SAFETY: `entry` was resolved from `module`, which `self.module` keeps
        // loaded for the rest of the launcher's life.
        unsafe { entry() };

        tracing::info!("⬅️ {} returned", ENTRY_POINT_SYMBOL);
        Ok(())
    }

    /// `load_module(name)` then `invoke_entry_point()`, at most once.
    pub fn bootstrap(&self, name: &str) -> Result<()> {
        if self.bootstrapped.swap(true, Ordering::SeqCst) {
            return Err(AuroraError::AlreadyBootstrapped);
        }
        self.load_module(name)?;
        self.invoke_entry_point()
    }
}

/// The process-wide launcher. Being a static it is never dropped, so the
/// module it loads is never unloaded before exit.
pub fn global() -> &'static Launcher<DynamicLoader> {
    static LAUNCHER: OnceLock<Launcher<DynamicLoader>> = OnceLock::new();
    LAUNCHER.get_or_init(|| Launcher::new(DynamicLoader::new()))
}

/// Runs the bootstrap sequence and maps the outcome to a process exit code.
pub fn launch<L: ModuleLoader>(launcher: &Launcher<L>, name: &str) -> u8 {
    match launcher.bootstrap(name) {
        Ok(()) => 0,
        Err(e) => {
            tracing::error!(
                "❌ Bootstrap failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            e.exit_code()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::launcher::loader::EntryPointFn;
    use std::sync::atomic::AtomicUsize;

    static CALLS: AtomicUsize = AtomicUsize::new(0);

    extern "C" fn counting_entry() {
        CALLS.fetch_add(1, Ordering::SeqCst);
    }

    #[derive(Debug)]
    struct StubModule {
        name: String,
        exports_entry: bool,
    }

    impl NativeModule for StubModule {
        fn name(&self) -> &str {
            &self.name
        }

        fn entry_point(&self, symbol: &str) -> Result<EntryPointFn> {
            if self.exports_entry && symbol == ENTRY_POINT_SYMBOL {
                Ok(counting_entry as EntryPointFn)
            } else {
                Err(AuroraError::EntryPointUnresolvedError {
                    module: self.name.clone(),
                    symbol: symbol.to_string(),
                    reason: "undefined symbol".to_string(),
                })
            }
        }
    }

    #[derive(Default)]
    struct StubLoader {
        loads: AtomicUsize,
    }

    impl ModuleLoader for StubLoader {
        type Module = StubModule;

        fn load(&self, name: &str) -> Result<StubModule> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            match name {
                "does_not_exist" => Err(AuroraError::ModuleLoadError {
                    module: name.to_string(),
                    reason: "cannot open shared object file".to_string(),
                }),
                "no_entry" => Ok(StubModule {
                    name: name.to_string(),
                    exports_entry: false,
                }),
                _ => Ok(StubModule {
                    name: name.to_string(),
                    exports_entry: true,
                }),
            }
        }
    }

    // Every test that reaches `counting_entry` lives here so CALLS stays exact.
    #[test]
    fn test_bootstrap_invokes_entry_once() {
        let launcher = Launcher::new(StubLoader::default());
        assert_eq!(launcher.state(), LauncherState::Unloaded);

        let before = CALLS.load(Ordering::SeqCst);
        assert_eq!(launch(&launcher, MODULE_NAME), 0);
        assert_eq!(CALLS.load(Ordering::SeqCst) - before, 1);
        assert_eq!(launcher.state(), LauncherState::Loaded);

        let err = launcher.bootstrap(MODULE_NAME).unwrap_err();
        assert!(matches!(err, AuroraError::AlreadyBootstrapped));
        assert_eq!(CALLS.load(Ordering::SeqCst) - before, 1);
        assert_eq!(launcher.loader.loads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_missing_module_never_invokes() {
        let launcher = Launcher::new(StubLoader::default());

        let err = launcher.bootstrap("does_not_exist").unwrap_err();
        assert!(matches!(err, AuroraError::ModuleLoadError { .. }));
        assert_eq!(launcher.state(), LauncherState::Unloaded);

        let other = Launcher::new(StubLoader::default());
        let code = launch(&other, "does_not_exist");
        assert_eq!(code, 2);
    }

    #[test]
    fn test_missing_entry_point() {
        let launcher = Launcher::new(StubLoader::default());

        assert!(launcher.load_module("no_entry").is_ok());
        assert_eq!(launcher.state(), LauncherState::Loaded);

        let err = launcher.invoke_entry_point().unwrap_err();
        assert!(matches!(err, AuroraError::EntryPointUnresolvedError { .. }));
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn test_invoke_before_load() {
        let launcher = Launcher::new(StubLoader::default());
        assert!(matches!(
            launcher.invoke_entry_point(),
            Err(AuroraError::EntryPointUnresolvedError { .. })
        ));
    }

    #[test]
    fn test_reloading_same_module_is_noop() {
        let launcher = Launcher::new(StubLoader::default());

        launcher.load_module("no_entry").unwrap();
        launcher.load_module("no_entry").unwrap();
        assert_eq!(launcher.loader.loads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_loading_a_second_module_is_refused() {
        let launcher = Launcher::new(StubLoader::default());
        launcher.load_module("no_entry").unwrap();

        let err = launcher.load_module("something_else").unwrap_err();
        match err {
            AuroraError::ModuleAlreadyLoaded { loaded, requested } => {
                assert_eq!(loaded, "no_entry");
                assert_eq!(requested, "something_else");
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(launcher.module().map(|m| m.name()), Some("no_entry"));
    }
}
