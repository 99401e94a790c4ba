use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuroraError {
    #[error("Failed to load native module '{module}': {reason}")]
    ModuleLoadError { module: String, reason: String },

    #[error("Entry point '{symbol}' unresolved in module '{module}': {reason}")]
    EntryPointUnresolvedError {
        module: String,
        symbol: String,
        reason: String,
    },

    #[error("Module '{loaded}' is already loaded, refusing to load '{requested}'")]
    ModuleAlreadyLoaded { loaded: String, requested: String },

    #[error("Bootstrap sequence has already run in this process")]
    AlreadyBootstrapped,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Protocol error: {message}")]
    ProtocolError { message: String },

    #[error("Inverter rejected command {command}: {description} (state {state})")]
    InverterError {
        command: u8,
        state: u8,
        description: String,
    },

    #[error("Timed out after {seconds:.1}s waiting for {operation}")]
    TimeoutError { operation: String, seconds: f64 },
}

pub type Result<T> = std::result::Result<T, AuroraError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Bootstrap,
    Configuration,
    Network,
    Protocol,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl AuroraError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            AuroraError::ModuleLoadError { .. }
            | AuroraError::EntryPointUnresolvedError { .. }
            | AuroraError::ModuleAlreadyLoaded { .. }
            | AuroraError::AlreadyBootstrapped => ErrorCategory::Bootstrap,
            AuroraError::ConfigError { .. }
            | AuroraError::ConfigValidationError { .. }
            | AuroraError::InvalidConfigValueError { .. }
            | AuroraError::MissingConfigError { .. } => ErrorCategory::Configuration,
            AuroraError::ApiError(_) | AuroraError::TimeoutError { .. } => ErrorCategory::Network,
            AuroraError::ProtocolError { .. } | AuroraError::InverterError { .. } => {
                ErrorCategory::Protocol
            }
            AuroraError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            AuroraError::ModuleLoadError { .. }
            | AuroraError::EntryPointUnresolvedError { .. } => ErrorSeverity::Critical,
            AuroraError::ModuleAlreadyLoaded { .. } | AuroraError::AlreadyBootstrapped => {
                ErrorSeverity::High
            }
            _ if self.is_transient() => ErrorSeverity::Medium,
            _ => ErrorSeverity::High,
        }
    }

    /// 行程結束碼，啟動器以此回報失敗種類
    pub fn exit_code(&self) -> u8 {
        match self {
            AuroraError::ModuleLoadError { .. } => 2,
            AuroraError::EntryPointUnresolvedError { .. } => 3,
            AuroraError::ModuleAlreadyLoaded { .. } | AuroraError::AlreadyBootstrapped => 4,
            _ => 1,
        }
    }

    /// Errors that end a polling session but not the service: the bridge
    /// dropped, the inverter went quiet, or a frame was garbled on the line.
    pub fn is_transient(&self) -> bool {
        match self {
            AuroraError::IoError(e) => matches!(
                e.kind(),
                std::io::ErrorKind::BrokenPipe
                    | std::io::ErrorKind::ConnectionReset
                    | std::io::ErrorKind::ConnectionAborted
                    | std::io::ErrorKind::ConnectionRefused
                    | std::io::ErrorKind::UnexpectedEof
                    | std::io::ErrorKind::TimedOut
            ),
            AuroraError::ApiError(e) => e.is_timeout() || e.is_connect(),
            AuroraError::TimeoutError { .. }
            | AuroraError::ProtocolError { .. }
            | AuroraError::InverterError { .. } => true,
            _ => false,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            AuroraError::ModuleLoadError { module, .. } => format!(
                "Place {}{}{} next to the launcher or on the loader search path",
                std::env::consts::DLL_PREFIX,
                module,
                std::env::consts::DLL_SUFFIX
            ),
            AuroraError::EntryPointUnresolvedError { symbol, .. } => format!(
                "Rebuild the native module so that it exports the '{}' symbol",
                symbol
            ),
            AuroraError::ModuleAlreadyLoaded { .. } | AuroraError::AlreadyBootstrapped => {
                "Run the bootstrap sequence only once per process".to_string()
            }
            AuroraError::IoError(_) => {
                "Check that the TCP-serial bridge is reachable and the config file is readable"
                    .to_string()
            }
            AuroraError::ApiError(_) => "Check network connectivity to PVOutput".to_string(),
            AuroraError::ConfigError { .. }
            | AuroraError::ConfigValidationError { .. }
            | AuroraError::InvalidConfigValueError { .. }
            | AuroraError::MissingConfigError { .. } => {
                "Fix Config.toml and restart the service".to_string()
            }
            AuroraError::ProtocolError { .. } => {
                "Check the serial wiring and the bridge baud rate".to_string()
            }
            AuroraError::InverterError { .. } => {
                "Verify the inverter address and that the inverter is powered".to_string()
            }
            AuroraError::TimeoutError { .. } => {
                "Increase serial.timeout_multiplier or check the inverter link".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Bootstrap => format!("Could not start the service: {}", self),
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Network => format!("Network problem: {}", self),
            ErrorCategory::Protocol => format!("Inverter communication problem: {}", self),
            ErrorCategory::System => format!("System error: {}", self),
        }
    }
}
