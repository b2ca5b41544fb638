use anyhow::{anyhow, Result};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_NETWORK: &str = "inj_testnet";
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;
pub const DEFAULT_MAX_OUTPUT_BYTES: usize = 10 * 1024 * 1024;
pub const DEFAULT_TOOL: &str = "npx";

#[derive(Debug, Clone, PartialEq)]
pub struct VerifyConfig {
    pub host: String,
    pub port: u16,
    /// Hardhat network the contracts are verified against
    pub network: String,
    /// Directory holding the hardhat project
    pub workdir: PathBuf,
    pub timeout: Duration,
    /// Cap applied separately to stdout and stderr
    pub max_output_bytes: usize,
    pub tool: String,
    pub log_level: String,
    /// Daily rolling log files are written here when set
    pub log_dir: Option<PathBuf>,
}

impl Default for VerifyConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            network: DEFAULT_NETWORK.to_string(),
            workdir: PathBuf::from("."),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_output_bytes: DEFAULT_MAX_OUTPUT_BYTES,
            tool: DEFAULT_TOOL.to_string(),
            log_level: "info".to_string(),
            log_dir: None,
        }
    }
}

impl VerifyConfig {
    /// Load from `.env` and the process environment.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let port = match get("VERIFY_PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|_| anyhow!("Invalid VERIFY_PORT: '{raw}'"))?,
            None => defaults.port,
        };
        let timeout = match get("VERIFY_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(
                raw.parse::<u64>().map_err(|_| anyhow!("Invalid VERIFY_TIMEOUT_SECS: '{raw}'"))?,
            ),
            None => defaults.timeout,
        };
        let max_output_bytes = match get("VERIFY_MAX_OUTPUT_BYTES") {
            Some(raw) => raw
                .parse::<usize>()
                .map_err(|_| anyhow!("Invalid VERIFY_MAX_OUTPUT_BYTES: '{raw}'"))?,
            None => defaults.max_output_bytes,
        };

        let config = Self {
            host: get("VERIFY_HOST").unwrap_or(defaults.host),
            port,
            network: get("VERIFY_NETWORK").unwrap_or(defaults.network),
            workdir: get("VERIFY_WORKDIR").map(PathBuf::from).unwrap_or(defaults.workdir),
            timeout,
            max_output_bytes,
            tool: get("VERIFY_TOOL").unwrap_or(defaults.tool),
            log_level: get("LOG_LEVEL").unwrap_or(defaults.log_level),
            log_dir: get("VERIFY_LOG_DIR").map(PathBuf::from),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();
        if self.port == 0 {
            errors.push("VERIFY_PORT must be non-zero".to_string());
        }
        if self.network.chars().any(char::is_whitespace) || self.network.starts_with('-') {
            errors.push(format!("Invalid VERIFY_NETWORK: '{}'", self.network));
        }
        if self.timeout.is_zero() {
            errors.push("VERIFY_TIMEOUT_SECS must be greater than zero".to_string());
        }
        if self.max_output_bytes == 0 {
            errors.push("VERIFY_MAX_OUTPUT_BYTES must be greater than zero".to_string());
        }
        if self.tool.is_empty() {
            errors.push("VERIFY_TOOL must not be empty".to_string());
        }

        if !errors.is_empty() {
            return Err(anyhow!("Environment validation failed:\n{}", errors.join("\n")));
        }
        Ok(())
    }

    pub fn bind_address(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<VerifyConfig> {
        let vars: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        VerifyConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.port, 3001);
        assert_eq!(config.network, "inj_testnet");
        assert_eq!(config.timeout, Duration::from_secs(300));
        assert_eq!(config.max_output_bytes, 10 * 1024 * 1024);
        assert_eq!(config.tool, "npx");
        assert_eq!(config.log_dir, None);
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("VERIFY_PORT", "8080"),
            ("VERIFY_NETWORK", "inj_mainnet"),
            ("VERIFY_WORKDIR", "/srv/mts-token"),
            ("VERIFY_TIMEOUT_SECS", "60"),
            ("VERIFY_LOG_DIR", "logs"),
        ])
        .unwrap();
        assert_eq!(config.bind_address(), ("0.0.0.0".to_string(), 8080));
        assert_eq!(config.network, "inj_mainnet");
        assert_eq!(config.workdir, PathBuf::from("/srv/mts-token"));
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(config.log_dir, Some(PathBuf::from("logs")));
    }

    #[test]
    fn test_blank_values_fall_back_to_defaults() {
        let config = load(&[("VERIFY_NETWORK", "  "), ("VERIFY_TOOL", "")]).unwrap();
        assert_eq!(config.network, "inj_testnet");
        assert_eq!(config.tool, "npx");
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(load(&[("VERIFY_PORT", "http")]).is_err());
        assert!(load(&[("VERIFY_PORT", "0")]).is_err());
        assert!(load(&[("VERIFY_TIMEOUT_SECS", "0")]).is_err());
        assert!(load(&[("VERIFY_MAX_OUTPUT_BYTES", "-5")]).is_err());
        assert!(load(&[("VERIFY_NETWORK", "inj testnet")]).is_err());
        assert!(load(&[("VERIFY_NETWORK", "--force")]).is_err());
    }
}
