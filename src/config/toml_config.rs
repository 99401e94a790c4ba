use crate::utils::error::{AuroraError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_CONFIG_FILE: &str = "Config.toml";
pub const CONFIG_PATH_ENV: &str = "AURORA_CONFIG";
pub const DEFAULT_PVOUTPUT_ENDPOINT: &str = "http://pvoutput.org/service/r2/addstatus.jsp";

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 5;
const DEFAULT_RECONNECT_DELAY_SECS: u64 = 30;
const MAX_POLL_INTERVAL_SECS: u64 = 86_400;
const MAX_TIMEOUT_MULTIPLIER: u32 = 100;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub serial: SerialConfig,
    pub pv_output: PvOutputConfig,
    pub location: LocationConfig,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerialConfig {
    /// Address of the TCP-to-serial bridge
    pub tcp_address: SocketAddr,
    /// Aurora bus address of the inverter
    pub aurora_address: u8,
    /// Time between readings
    pub poll_interval_secs: u64,
    /// Number of poll intervals to wait for a reading before giving up
    pub timeout_multiplier: u32,
    pub request_timeout_secs: Option<u64>,
    pub reconnect_delay_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PvOutputConfig {
    pub system_id: String,
    pub api_key: String,
    pub endpoint: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LocationConfig {
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub format: Option<String>,
    pub level: Option<String>,
}

impl LoggingConfig {
    pub fn is_json(&self) -> bool {
        self.format.as_deref() == Some("json")
    }
}

impl Config {
    /// 設定檔路徑：`AURORA_CONFIG` 環境變數，否則為工作目錄下的 Config.toml
    pub fn default_path() -> PathBuf {
        std::env::var_os(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
    }

    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| AuroraError::ConfigError {
            message: format!("cannot read {}: {}", path.as_ref().display(), e),
        })?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| AuroraError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${PVOUTPUT_API_KEY})，未設定者保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| AuroraError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.serial.poll_interval_secs)
    }

    /// How long a single reading may take before the session is abandoned.
    pub fn reading_timeout(&self) -> Duration {
        self.poll_interval().saturating_mul(self.serial.timeout_multiplier)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.serial
                .request_timeout_secs
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        )
    }

    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_secs(
            self.serial
                .reconnect_delay_secs
                .unwrap_or(DEFAULT_RECONNECT_DELAY_SECS),
        )
    }

    pub fn pvoutput_endpoint(&self) -> &str {
        self.pv_output
            .endpoint
            .as_deref()
            .unwrap_or(DEFAULT_PVOUTPUT_ENDPOINT)
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_range("serial.aurora_address", self.serial.aurora_address, 1, 254)?;
        validation::validate_range(
            "serial.poll_interval_secs",
            self.serial.poll_interval_secs,
            1,
            MAX_POLL_INTERVAL_SECS,
        )?;
        validation::validate_range(
            "serial.timeout_multiplier",
            self.serial.timeout_multiplier,
            1,
            MAX_TIMEOUT_MULTIPLIER,
        )?;
        if let Some(timeout) = self.serial.request_timeout_secs {
            validation::validate_positive_number("serial.request_timeout_secs", timeout, 1)?;
        }

        validation::validate_resolved("pv_output.system_id", &self.pv_output.system_id)?;
        validation::validate_resolved("pv_output.api_key", &self.pv_output.api_key)?;
        validation::validate_non_empty_string("pv_output.system_id", &self.pv_output.system_id)?;
        validation::validate_non_empty_string("pv_output.api_key", &self.pv_output.api_key)?;
        validation::validate_url("pv_output.endpoint", self.pvoutput_endpoint())?;

        validation::validate_range("location.latitude", self.location.latitude, -90.0, 90.0)?;
        validation::validate_range("location.longitude", self.location.longitude, -180.0, 180.0)?;
        // 海拔 (公尺)
        validation::validate_range(
            "location.elevation",
            self.location.elevation,
            -500.0,
            9_000.0,
        )?;

        if let Some(format) = self.logging.as_ref().and_then(|l| l.format.as_deref()) {
            if !["compact", "json"].contains(&format) {
                return Err(AuroraError::InvalidConfigValueError {
                    field: "logging.format".to_string(),
                    value: format.to_string(),
                    reason: "Valid formats: compact, json".to_string(),
                });
            }
        }

        Ok(())
    }
}

impl Validate for Config {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const BASIC: &str = r#"
[serial]
tcp_address = "192.168.1.20:4001"
aurora_address = 2
poll_interval_secs = 300
timeout_multiplier = 3

[pv_output]
system_id = "12345"
api_key = "secret"

[location]
latitude = 51.5
longitude = -0.12
elevation = 20.0
"#;

    #[test]
    fn test_parse_basic_toml_config() {
        let config = Config::from_toml_str(BASIC).unwrap();

        assert_eq!(config.serial.tcp_address.port(), 4001);
        assert_eq!(config.serial.aurora_address, 2);
        assert_eq!(config.poll_interval(), Duration::from_secs(300));
        assert_eq!(config.reading_timeout(), Duration::from_secs(900));
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
        assert_eq!(config.reconnect_delay(), Duration::from_secs(30));
        assert_eq!(config.pvoutput_endpoint(), DEFAULT_PVOUTPUT_ENDPOINT);
        assert!(config.logging.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("AURORA_TEST_API_KEY", "from-env");

        let content = BASIC.replace("\"secret\"", "\"${AURORA_TEST_API_KEY}\"");
        let config = Config::from_toml_str(&content).unwrap();
        assert_eq!(config.pv_output.api_key, "from-env");

        std::env::remove_var("AURORA_TEST_API_KEY");
    }

    #[test]
    fn test_unset_env_var_fails_validation() {
        let content = BASIC.replace("\"secret\"", "\"${AURORA_TEST_UNSET_VARIABLE}\"");
        let config = Config::from_toml_str(&content).unwrap();
        assert_eq!(config.pv_output.api_key, "${AURORA_TEST_UNSET_VARIABLE}");
        assert!(matches!(
            config.validate(),
            Err(AuroraError::MissingConfigError { .. })
        ));
    }

    #[test]
    fn test_config_validation() {
        let zero_address = BASIC.replace("aurora_address = 2", "aurora_address = 0");
        assert!(Config::from_toml_str(&zero_address).unwrap().validate().is_err());

        let zero_poll = BASIC.replace("poll_interval_secs = 300", "poll_interval_secs = 0");
        assert!(Config::from_toml_str(&zero_poll).unwrap().validate().is_err());

        let bad_latitude = BASIC.replace("latitude = 51.5", "latitude = 123.0");
        assert!(Config::from_toml_str(&bad_latitude).unwrap().validate().is_err());

        let bad_endpoint = BASIC.replace(
            "api_key = \"secret\"",
            "api_key = \"secret\"\nendpoint = \"ftp://pvoutput.org\"",
        );
        assert!(Config::from_toml_str(&bad_endpoint).unwrap().validate().is_err());
    }

    #[test]
    fn test_oversized_intervals_fail_validation() {
        let huge_poll = BASIC.replace(
            "poll_interval_secs = 300",
            "poll_interval_secs = 9223372036854775807",
        );
        let config = Config::from_toml_str(&huge_poll).unwrap();
        assert!(matches!(
            config.validate(),
            Err(AuroraError::InvalidConfigValueError { .. })
        ));
        assert_eq!(config.reading_timeout(), Duration::MAX);

        let huge_multiplier =
            BASIC.replace("timeout_multiplier = 3", "timeout_multiplier = 4000000000");
        assert!(Config::from_toml_str(&huge_multiplier)
            .unwrap()
            .validate()
            .is_err());

        let zero_multiplier = BASIC.replace("timeout_multiplier = 3", "timeout_multiplier = 0");
        assert!(Config::from_toml_str(&zero_multiplier)
            .unwrap()
            .validate()
            .is_err());
    }

    #[test]
    fn test_elevation_is_validated() {
        let nan = BASIC.replace("elevation = 20.0", "elevation = nan");
        let config = Config::from_toml_str(&nan).unwrap();
        assert!(config.location.elevation.is_nan());
        assert!(matches!(
            config.validate(),
            Err(AuroraError::InvalidConfigValueError { .. })
        ));

        let orbit = BASIC.replace("elevation = 20.0", "elevation = 400000.0");
        assert!(Config::from_toml_str(&orbit).unwrap().validate().is_err());

        let dead_sea = BASIC.replace("elevation = 20.0", "elevation = -430.0");
        assert!(Config::from_toml_str(&dead_sea).unwrap().validate().is_ok());
    }

    #[test]
    fn test_invalid_socket_address_is_rejected() {
        let content = BASIC.replace("192.168.1.20:4001", "not-an-address");
        assert!(matches!(
            Config::from_toml_str(&content),
            Err(AuroraError::ConfigValidationError { .. })
        ));
    }

    #[test]
    fn test_logging_section() {
        let content = format!("{}\n[logging]\nformat = \"json\"\nlevel = \"debug\"\n", BASIC);
        let config = Config::from_toml_str(&content).unwrap();
        assert!(config.logging.as_ref().unwrap().is_json());
        assert!(config.validate().is_ok());

        let content = format!("{}\n[logging]\nformat = \"pretty\"\n", BASIC);
        assert!(Config::from_toml_str(&content).unwrap().validate().is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(BASIC.as_bytes()).unwrap();

        let config = Config::from_file(temp_file.path()).unwrap();
        assert_eq!(config.pv_output.system_id, "12345");
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let err = Config::from_file("/definitely/not/here/Config.toml").unwrap_err();
        assert!(matches!(err, AuroraError::ConfigError { .. }));
    }
}
