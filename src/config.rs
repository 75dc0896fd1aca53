//! Configuration file parser for tagwatch.
//!
//! The config file is optional: a missing file yields `Config::default()`,
//! which carries the built-in security feed list and keyword set.
//! Unknown keys are ignored by serde, though we log a warning when the file
//! contains potential typos.
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::util::validate_url;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config file exceeds maximum allowed size.
    #[error("Config file too large: {0}")]
    TooLarge(String),

    /// Config parsed but holds values the scanner cannot run with.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

// ============================================================================
// Defaults
// ============================================================================

const DEFAULT_SOURCES: &[&str] = &[
    "https://krebsonsecurity.com/feed/",
    "https://www.schneier.com/feed/atom/",
    "https://threatpost.com/feed/",
    "https://www.darkreading.com/rss.xml",
    "https://www.bleepingcomputer.com/feed/",
    "https://thehackernews.com/feeds/posts/default",
    "https://www.cyberscoop.com/feed/",
    "https://www.securityweek.com/rss.xml",
];

// Leading/trailing spaces on the short acronyms act as a crude word boundary.
const DEFAULT_KEYWORDS: &[&str] = &[
    "cybersecurity",
    "vulnerability",
    "IT vulnerability",
    "OT vulnerability",
    "IOT vulnerability",
    " IT ",
    " OT ",
    " IOT ",
    "zero-day exploit",
    "zero-day vulnerability",
    "zero day exploit",
    "zero day",
    "data breach",
    "breach",
    "data leak",
    "data compromise",
    "malware",
    "malware attack",
    "virus",
    "trojan",
    "worm",
    "spyware",
    "adware",
    "ransomware",
    "ransomware incident",
    "ransom",
    "critical vulnerability",
    "critical IT vulnerability",
    "critical OT vulnerability",
    "critical IOT vulnerability",
    "cyber threat intelligence",
    " CTI ",
    "threat intelligence",
    "threat intel",
    "cyber forensics",
    "digital forensics",
    "forensics",
    "incident analysis",
    "security patch",
    "patch update",
    "security update",
    "patch",
    "update",
    "phishing",
    "phishing attack",
    "spear phishing",
    "email scam",
    "social engineering",
    "cloud security",
    "cloud breach",
    "cloud data breach",
    "cloud compromise",
    "cloud hack",
];

const DEFAULT_PALETTE: &[&str] = &[
    "#1abc9c", "#3498db", "#e74c3c", "#9b59b6", "#f39c12", "#2ecc71",
];

// ============================================================================
// Configuration Structs
// ============================================================================

/// Everything a scan run needs.
///
/// All fields use `#[serde(default)]` so any subset of keys can be specified.
/// Missing keys fall back to `Default::default()`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Feed URLs, fetched and rendered in this order.
    pub sources: Vec<String>,

    /// Case-insensitive match phrases. Earlier entries win when two
    /// phrases could match at the same position.
    pub keywords: Vec<String>,

    /// Where the HTML report is written.
    pub output_path: PathBuf,

    /// Document title and top-level heading of the report.
    pub report_title: String,

    /// Section heading colors, assigned by source position modulo length.
    pub palette: Vec<String>,

    /// Abort the whole run (and write nothing) on the first failed source.
    pub fail_fast: bool,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,

    /// Retries for 429 and 5xx responses before a source is marked failed.
    pub max_retries: u32,

    /// User-Agent header sent with every feed request.
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sources: DEFAULT_SOURCES.iter().map(|s| s.to_string()).collect(),
            keywords: DEFAULT_KEYWORDS.iter().map(|s| s.to_string()).collect(),
            output_path: PathBuf::from("combined_feed_output.html"),
            report_title: "Combined RSS Feed Results".to_string(),
            palette: DEFAULT_PALETTE.iter().map(|s| s.to_string()).collect(),
            fail_fast: false,
            timeout_secs: 30,
            max_retries: 3,
            user_agent: concat!("tagwatch/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    /// Load configuration from a TOML file.
    ///
    /// - Missing file → `Ok(Config::default())`
    /// - Empty file → `Ok(Config::default())`
    /// - Invalid TOML → `Err(ConfigError::Parse)` with line number info
    /// - Unknown keys → silently accepted (serde default behavior), logged as warning
    ///
    /// The result is not validated; call [`Config::validate`] before scanning.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        // Check file size before reading to avoid slurping a huge file
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                // File deleted between metadata and read
                tracing::debug!(path = %path.display(), "Config file disappeared, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text. Blank input yields the defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            tracing::debug!("Config file is empty, using defaults");
            return Ok(Self::default());
        }

        // Parse as a raw table first to detect unknown keys
        if let Ok(raw) = content.parse::<toml::Table>() {
            let known_keys = [
                "sources",
                "keywords",
                "output_path",
                "report_title",
                "palette",
                "fail_fast",
                "timeout_secs",
                "max_retries",
                "user_agent",
            ];
            for key in raw.keys() {
                if !known_keys.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let config: Config = toml::from_str(content)?;
        tracing::info!(
            sources = config.sources.len(),
            keywords = config.keywords.len(),
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Check that the configuration can drive a scan.
    ///
    /// Rejects an empty source list, sources that are not http(s) URLs,
    /// an empty palette, and a zero timeout. An empty keyword list is
    /// allowed (every section will simply be empty), but logged.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sources.is_empty() {
            return Err(ConfigError::Invalid("no feed sources configured".into()));
        }
        for source in &self.sources {
            validate_url(source)
                .map_err(|e| ConfigError::Invalid(format!("source '{}': {}", source, e)))?;
        }
        if self.palette.is_empty() {
            return Err(ConfigError::Invalid("palette must not be empty".into()));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid("timeout_secs must be positive".into()));
        }
        if self.keywords.iter().all(|k| k.is_empty()) {
            tracing::warn!("No keywords configured, report sections will be empty");
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.sources.len(), 8);
        assert_eq!(config.sources[0], "https://krebsonsecurity.com/feed/");
        assert!(config.keywords.iter().any(|k| k == "ransomware"));
        assert!(config.keywords.iter().any(|k| k == " IT "));
        assert_eq!(
            config.output_path,
            PathBuf::from("combined_feed_output.html")
        );
        assert_eq!(config.palette.len(), 6);
        assert!(!config.fail_fast);
        assert_eq!(config.timeout_secs, 30);
        assert!(config.user_agent.starts_with("tagwatch/"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_file_returns_default() {
        let path = Path::new("/tmp/tagwatch_test_nonexistent_config.toml");
        let config = Config::load(path).unwrap();
        assert_eq!(config.report_title, "Combined RSS Feed Results");
    }

    #[test]
    fn test_empty_file_returns_default() {
        let dir = std::env::temp_dir().join("tagwatch_config_test_empty");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, "   \n  ").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.sources.len(), 8);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_partial_config_uses_defaults_for_missing() {
        let config = Config::from_toml_str("fail_fast = true\n").unwrap();
        assert!(config.fail_fast);
        assert_eq!(config.sources.len(), 8);
        assert_eq!(config.max_retries, 3);
    }

    #[test]
    fn test_full_config() {
        let content = r##"
sources = ["https://example.com/feed.xml", "https://example.org/atom"]
keywords = ["rust", "tokio"]
output_path = "out/report.html"
report_title = "Rust News"
palette = ["#000000"]
fail_fast = true
timeout_secs = 5
max_retries = 0
user_agent = "test-agent"
"##;
        let config = Config::from_toml_str(content).unwrap();
        assert_eq!(config.sources.len(), 2);
        assert_eq!(config.keywords, vec!["rust", "tokio"]);
        assert_eq!(config.output_path, PathBuf::from("out/report.html"));
        assert_eq!(config.report_title, "Rust News");
        assert_eq!(config.palette, vec!["#000000"]);
        assert!(config.fail_fast);
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.max_retries, 0);
        assert_eq!(config.user_agent, "test-agent");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_toml_returns_error() {
        let err = Config::from_toml_str("this is not [valid toml").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().contains("Invalid TOML"));
    }

    #[test]
    fn test_unknown_keys_accepted() {
        let config = Config::from_toml_str("totally_fake_key = 1\nfail_fast = true\n").unwrap();
        assert!(config.fail_fast);
    }

    #[test]
    fn test_wrong_type_returns_error() {
        assert!(Config::from_toml_str("sources = 42\n").is_err());
    }

    #[test]
    fn test_too_large_file_rejected() {
        let dir = std::env::temp_dir().join("tagwatch_config_test_too_large");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, "a".repeat(1_048_577)).unwrap();

        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::TooLarge(_)));
        assert!(err.to_string().contains("too large"));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_validate_rejects_empty_sources() {
        let config = Config {
            sources: Vec::new(),
            ..Config::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_validate_rejects_non_http_source() {
        let config = Config {
            sources: vec!["ftp://example.com/feed".into()],
            ..Config::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("ftp://example.com/feed"));
    }

    #[test]
    fn test_validate_rejects_empty_palette() {
        let config = Config {
            palette: Vec::new(),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_allows_empty_keywords() {
        let config = Config {
            keywords: Vec::new(),
            ..Config::default()
        };
        assert!(config.validate().is_ok());
    }
}
