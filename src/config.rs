// src/config.rs

//! Configuration for every subcommand.
//!
//! Values come from an optional TOML file layered over built-in defaults.
//! Every section and every key is optional, so a file only needs to name what
//! it changes:
//!
//! ```toml
//! [scan]
//! target_url = "https://example.com/"
//! delay_ms = 500
//!
//! [server]
//! port = 10272
//! secret_key = "change-me"
//!
//! [watcher]
//! log_path = "/var/log/nginx/access.log"
//! ```

use crate::error::{Result, SentinelError};
use directories::ProjectDirs;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Name of the config file looked up in the platform config directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

const DEFAULT_SECURITY_HEADERS: &[&str] = &[
    "Strict-Transport-Security",
    "Content-Security-Policy",
    "X-Frame-Options",
    "X-Content-Type-Options",
    "Referrer-Policy",
    "Permissions-Policy",
];

const DEFAULT_MALWARE_PATTERNS: &[&str] = &[
    "base64_decode",
    "eval(",
    "shell_exec",
    "system(",
    "passthru(",
    "exec(",
    "obfuscate",
];

const DEFAULT_SENSITIVE_PATHS: &[&str] = &[
    "/admin",
    "/.env",
    "/phpmyadmin",
    "/config.php",
    "/backup.zip",
    "/wp-config.php",
    "/test.php",
];

const DEFAULT_PAYLOADS: &[&str] = &[
    "' OR '1'='1",
    "<script>alert(1)</script>",
    "../../etc/passwd",
    "' OR 1=1 --",
    "'; DROP TABLE users; --",
];

fn owned(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

/// Everything a single scan run needs. Passed by reference to every check.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    pub target_url: String,
    pub timeout_secs: u64,
    /// Pause after every sensitive-path and injection probe.
    pub delay_ms: u64,
    pub user_agent: String,
    pub security_headers: Vec<String>,
    pub malware_patterns: Vec<String>,
    pub sensitive_paths: Vec<String>,
    pub payloads: Vec<String>,
    pub tls_port: u16,
    pub log_file: PathBuf,
    pub html_report: PathBuf,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            target_url: "https://example.com/".to_string(),
            timeout_secs: 8,
            delay_ms: 1000,
            user_agent: format!("VanguardSentinel/{}", env!("CARGO_PKG_VERSION")),
            security_headers: owned(DEFAULT_SECURITY_HEADERS),
            malware_patterns: owned(DEFAULT_MALWARE_PATTERNS),
            sensitive_paths: owned(DEFAULT_SENSITIVE_PATHS),
            payloads: owned(DEFAULT_PAYLOADS),
            tls_port: 443,
            log_file: PathBuf::from("security_scan.log"),
            html_report: PathBuf::from("security_scan_report.html"),
        }
    }
}

impl ScanConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    /// Rejects values the pipeline cannot work with.
    pub fn validate(&self) -> Result<()> {
        let url = url::Url::parse(&self.target_url)?;
        if url.host_str().is_none() {
            return Err(SentinelError::Config(format!(
                "target_url '{}' has no host",
                self.target_url
            )));
        }
        if !matches!(url.scheme(), "http" | "https") {
            return Err(SentinelError::Config(format!(
                "target_url scheme '{}' is not http or https",
                url.scheme()
            )));
        }
        if self.timeout_secs == 0 {
            return Err(SentinelError::Config("timeout_secs must be at least 1".to_string()));
        }
        Ok(())
    }
}

/// Settings for the trigger endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub secret_key: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 10272,
            secret_key: String::new(),
        }
    }
}

/// A named regex the watcher tests every new log line against.
#[derive(Debug, Clone, Deserialize)]
pub struct PatternConfig {
    pub name: String,
    pub regex: String,
}

/// Settings for the log watcher.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WatcherConfig {
    pub log_path: PathBuf,
    pub poll_interval_secs: u64,
    /// How many recently seen lines are remembered for deduplication.
    pub dedup_capacity: usize,
    pub patterns: Vec<PatternConfig>,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        let pattern = |name: &str, regex: &str| PatternConfig {
            name: name.to_string(),
            regex: regex.to_string(),
        };
        Self {
            log_path: PathBuf::from("access.log"),
            poll_interval_secs: 5,
            dedup_capacity: 10_000,
            patterns: vec![
                pattern(
                    "sql-injection",
                    r"(?i)(union(\s|%20|\+)+select|'\s*or\s*'?1'?\s*=\s*'?1|drop(\s|%20|\+)+table)",
                ),
                pattern("xss", r"(?i)(<script|%3cscript|javascript:)"),
                pattern("path-traversal", r"(?i)(\.\./|%2e%2e%2f|/etc/passwd)"),
                pattern(
                    "scanner-probe",
                    r"(?i)(sqlmap|nikto|nmap|wpscan|/\.env|/wp-config\.php|/phpmyadmin)",
                ),
            ],
        }
    }
}

impl WatcherConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn validate(&self) -> Result<()> {
        if self.poll_interval_secs == 0 {
            return Err(SentinelError::Config("poll_interval_secs must be at least 1".to_string()));
        }
        if self.dedup_capacity == 0 {
            return Err(SentinelError::Config("dedup_capacity must be at least 1".to_string()));
        }
        if self.patterns.is_empty() {
            return Err(SentinelError::Config("watcher needs at least one pattern".to_string()));
        }
        Ok(())
    }
}

/// The full configuration file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub scan: ScanConfig,
    pub server: ServerConfig,
    pub watcher: WatcherConfig,
}

impl AppConfig {
    /// Parses a TOML document, filling anything it leaves out with defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(content)?;
        Ok(config)
    }

    /// Loads the configuration from `path`, or from the platform config
    /// directory when no path is given. Missing default files are not an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => match default_config_path() {
                Some(p) => (p, false),
                None => return Ok(Self::default()),
            },
        };

        if !explicit && !path.exists() {
            debug!(path = %path.display(), "No config file found, using defaults.");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path).map_err(|e| {
            SentinelError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        let config = Self::from_toml_str(&content)?;
        info!(path = %path.display(), "Loaded configuration file.");
        Ok(config)
    }
}

fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("com", "vanguard-sentinel", env!("CARGO_PKG_NAME"))
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_carry_the_stock_lists() {
        let config = AppConfig::default();
        assert_eq!(config.scan.security_headers.len(), 6);
        assert_eq!(config.scan.payloads.len(), 5);
        assert_eq!(config.scan.tls_port, 443);
        assert_eq!(config.scan.delay(), Duration::from_secs(1));
        assert!(config.server.secret_key.is_empty());
        assert_eq!(config.watcher.patterns.len(), 4);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config = AppConfig::from_toml_str(
            r#"
            [scan]
            target_url = "https://sami.example/"
            delay_ms = 0

            [server]
            secret_key = "s3cret"
            "#,
        )
        .unwrap();

        assert_eq!(config.scan.target_url, "https://sami.example/");
        assert_eq!(config.scan.delay_ms, 0);
        assert_eq!(config.scan.timeout_secs, 8);
        assert_eq!(config.server.secret_key, "s3cret");
        assert_eq!(config.server.port, 10272);
        assert_eq!(config.watcher.poll_interval_secs, 5);
    }

    #[test]
    fn custom_watch_patterns_replace_the_defaults() {
        let config = AppConfig::from_toml_str(
            r#"
            [watcher]
            patterns = [{ name = "probe", regex = "wp-login" }]
            "#,
        )
        .unwrap();
        assert_eq!(config.watcher.patterns.len(), 1);
        assert_eq!(config.watcher.patterns[0].name, "probe");
    }

    #[test]
    fn validate_rejects_non_http_targets() {
        let mut scan = ScanConfig::default();
        assert!(scan.validate().is_ok());

        scan.target_url = "ftp://example.com/".to_string();
        assert!(matches!(scan.validate(), Err(SentinelError::Config(_))));

        scan.target_url = "not a url".to_string();
        assert!(matches!(scan.validate(), Err(SentinelError::Url(_))));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let path = std::env::temp_dir().join("vanguard-sentinel-does-not-exist.toml");
        assert!(AppConfig::load(Some(&path)).is_err());
    }

    #[test]
    fn watcher_validation_rejects_busy_loop_and_empty_settings() {
        assert!(WatcherConfig::default().validate().is_ok());

        let busy = WatcherConfig { poll_interval_secs: 0, ..WatcherConfig::default() };
        assert!(matches!(busy.validate(), Err(SentinelError::Config(_))));

        let no_patterns = WatcherConfig { patterns: Vec::new(), ..WatcherConfig::default() };
        assert!(no_patterns.validate().is_err());

        let no_ring = WatcherConfig { dedup_capacity: 0, ..WatcherConfig::default() };
        assert!(no_ring.validate().is_err());
    }
}
