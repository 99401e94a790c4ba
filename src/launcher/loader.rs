use crate::utils::error::{AuroraError, Result};
use libloading::Library;
use std::path::{Path, PathBuf};

/// Signature of the native entry point: no arguments, no return value.
pub type EntryPointFn = unsafe extern "C" fn();

/// A native module mapped into the process.
pub trait NativeModule: Send + Sync {
    fn name(&self) -> &str;

    /// Resolves `symbol` to an entry point. The returned pointer is only
    /// valid while `self` stays alive.
    fn entry_point(&self, symbol: &str) -> Result<EntryPointFn>;
}

/// Locates and loads native modules by name.
pub trait ModuleLoader: Send + Sync {
    type Module: NativeModule;

    fn load(&self, name: &str) -> Result<Self::Module>;
}

/// Loads shared libraries with the platform loader.
///
/// A name resolves to `lib<name>.so`, `lib<name>.dylib` or `<name>.dll`. Each
/// search directory is tried first; if none holds the file, the platform's own
/// search path (`LD_LIBRARY_PATH`, `DYLD_LIBRARY_PATH`, `PATH`, system
/// directories) decides.
#[derive(Debug, Clone)]
pub struct DynamicLoader {
    search_dirs: Vec<PathBuf>,
}

impl DynamicLoader {
    /// Searches next to the running executable, then the platform path.
    pub fn new() -> Self {
        let search_dirs = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
            .into_iter()
            .collect();
        Self { search_dirs }
    }

    pub fn with_search_dirs(search_dirs: Vec<PathBuf>) -> Self {
        Self { search_dirs }
    }

    pub fn search_dirs(&self) -> &[PathBuf] {
        &self.search_dirs
    }

    /// The path handed to the platform loader for `name`.
    pub fn resolve(&self, name: &str) -> PathBuf {
        let file_name = libloading::library_filename(name);
        let local = self
            .search_dirs
            .iter()
            .map(|dir| dir.join(&file_name))
            .find(|candidate| candidate.is_file());
        local.unwrap_or_else(|| PathBuf::from(file_name))
    }
}

impl Default for DynamicLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ModuleLoader for DynamicLoader {
    type Module = DynamicModule;

    fn load(&self, name: &str) -> Result<DynamicModule> {
        let path = self.resolve(name);
        tracing::debug!("Loading native module '{}' from {}", name, path.display());

        // SAFETY: loading runs the module's initialisers; the module is trusted
        // by configuration, there is nothing further to check up front.
        let library = unsafe { Library::new(&path) }.map_err(|e| AuroraError::ModuleLoadError {
            module: name.to_string(),
            reason: e.to_string(),
        })?;

        tracing::info!("📦 Loaded native module '{}' ({})", name, path.display());
        Ok(DynamicModule {
            name: name.to_string(),
            path,
            library,
        })
    }
}

#[derive(Debug)]
pub struct DynamicModule {
    name: String,
    path: PathBuf,
    library: Library,
}

impl DynamicModule {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl NativeModule for DynamicModule {
    fn name(&self) -> &str {
        &self.name
    }

    fn entry_point(&self, symbol: &str) -> Result<EntryPointFn> {
        // SAFETY: the symbol is declared as `void symbol(void)` by the module
        // contract. The copied pointer outlives the `Symbol` guard, so callers
        // must keep the module loaded while they hold it.
        let entry = unsafe { self.library.get::<EntryPointFn>(symbol.as_bytes()) }.map_err(|e| {
            AuroraError::EntryPointUnresolvedError {
                module: self.name.clone(),
                symbol: symbol.to_string(),
                reason: e.to_string(),
            }
        })?;
        Ok(*entry)
    }
}
