// Bootstrap: load the native module by name, then hand control to its entry point.

pub mod bootstrap;
pub mod loader;

pub use bootstrap::{global, launch, Launcher, LauncherState, ENTRY_POINT_SYMBOL, MODULE_NAME};
pub use loader::{DynamicLoader, DynamicModule, EntryPointFn, ModuleLoader, NativeModule};
