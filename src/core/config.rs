//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.quill/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct QuillConfig {
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub reveal: RevealConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GatewayConfig {
    pub base_url: Option<String>,
    pub endpoint: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct RevealConfig {
    pub unit_delay_ms: Option<u64>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_ENDPOINT: &str = "/api/generate";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_UNIT_DELAY_MS: u64 = 10;

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub base_url: String,
    pub endpoint: String,
    pub timeout: Duration,
    /// Per-character reveal delay. Never zero.
    pub unit_delay: Duration,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            unit_delay: Duration::from_millis(DEFAULT_UNIT_DELAY_MS),
        }
    }
}

/// Values given on the command line (None = not specified).
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub base_url: Option<String>,
    pub endpoint: Option<String>,
    pub unit_delay_ms: Option<u64>,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.quill/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".quill").join("config.toml"))
}

/// Load config from `~/.quill/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `QuillConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<QuillConfig, ConfigError> {
    let Some(path) = config_path() else {
        warn!("Could not determine home directory, using default config");
        return Ok(QuillConfig::default());
    };
    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> Result<QuillConfig, ConfigError> {
    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(path);
        return Ok(QuillConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: QuillConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# Quill Configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [gateway]
# base_url = "http://127.0.0.1:8000"   # Or set QUILL_BASE_URL
# endpoint = "/api/generate"           # "/api/query" also works. Or set QUILL_ENDPOINT
# timeout_secs = 120

# [reveal]
# unit_delay_ms = 10                   # Per-character typing delay. Or set QUILL_UNIT_DELAY_MS
"#;

    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &QuillConfig, cli: &CliOverrides) -> ResolvedConfig {
    resolve_with_env(config, cli, |key| std::env::var(key).ok())
}

/// Same as [`resolve`], reading environment variables through `env`.
pub fn resolve_with_env(
    config: &QuillConfig,
    cli: &CliOverrides,
    env: impl Fn(&str) -> Option<String>,
) -> ResolvedConfig {
    // Base URL: CLI → env → config → default
    let base_url = cli
        .base_url
        .clone()
        .or_else(|| env("QUILL_BASE_URL"))
        .or_else(|| config.gateway.base_url.clone())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

    // Endpoint: CLI → env → config → default
    let endpoint = cli
        .endpoint
        .clone()
        .or_else(|| env("QUILL_ENDPOINT"))
        .or_else(|| config.gateway.endpoint.clone())
        .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());

    // Delay: CLI → env → config → default
    let env_delay = env("QUILL_UNIT_DELAY_MS").and_then(|raw| match raw.trim().parse::<u64>() {
        Ok(ms) => Some(ms),
        Err(e) => {
            warn!("Ignoring QUILL_UNIT_DELAY_MS={:?}: {}", raw, e);
            None
        }
    });
    let unit_delay_ms = cli
        .unit_delay_ms
        .or(env_delay)
        .or(config.reveal.unit_delay_ms)
        .unwrap_or(DEFAULT_UNIT_DELAY_MS)
        .max(1);

    ResolvedConfig {
        base_url,
        endpoint,
        timeout: Duration::from_secs(
            config
                .gateway
                .timeout_secs
                .unwrap_or(DEFAULT_TIMEOUT_SECS)
                .max(1),
        ),
        unit_delay: Duration::from_millis(unit_delay_ms),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_resolve_uses_defaults_when_empty() {
        let resolved = resolve_with_env(&QuillConfig::default(), &CliOverrides::default(), no_env);
        assert_eq!(resolved, ResolvedConfig::default());
    }

    #[test]
    fn test_config_values_override_defaults() {
        let config = QuillConfig {
            gateway: GatewayConfig {
                base_url: Some("http://10.0.0.2:9000".to_string()),
                endpoint: Some("/api/query".to_string()),
                timeout_secs: Some(5),
            },
            reveal: RevealConfig {
                unit_delay_ms: Some(20),
            },
        };
        let resolved = resolve_with_env(&config, &CliOverrides::default(), no_env);
        assert_eq!(resolved.base_url, "http://10.0.0.2:9000");
        assert_eq!(resolved.endpoint, "/api/query");
        assert_eq!(resolved.timeout, Duration::from_secs(5));
        assert_eq!(resolved.unit_delay, Duration::from_millis(20));
    }

    #[test]
    fn test_env_beats_config_and_cli_beats_env() {
        let config = QuillConfig {
            gateway: GatewayConfig {
                base_url: Some("http://from-config".to_string()),
                ..Default::default()
            },
            reveal: RevealConfig {
                unit_delay_ms: Some(30),
            },
        };
        let env = |key: &str| match key {
            "QUILL_BASE_URL" => Some("http://from-env".to_string()),
            "QUILL_UNIT_DELAY_MS" => Some("15".to_string()),
            _ => None,
        };

        let resolved = resolve_with_env(&config, &CliOverrides::default(), env);
        assert_eq!(resolved.base_url, "http://from-env");
        assert_eq!(resolved.unit_delay, Duration::from_millis(15));

        let cli = CliOverrides {
            base_url: Some("http://from-cli".to_string()),
            unit_delay_ms: Some(12),
            ..Default::default()
        };
        let resolved = resolve_with_env(&config, &cli, env);
        assert_eq!(resolved.base_url, "http://from-cli");
        assert_eq!(resolved.unit_delay, Duration::from_millis(12));
    }

    #[test]
    fn test_bad_env_delay_is_ignored() {
        let env = |key: &str| (key == "QUILL_UNIT_DELAY_MS").then(|| "fast".to_string());
        let resolved = resolve_with_env(&QuillConfig::default(), &CliOverrides::default(), env);
        assert_eq!(resolved.unit_delay, Duration::from_millis(DEFAULT_UNIT_DELAY_MS));
    }

    #[test]
    fn test_zero_delay_is_clamped() {
        let cli = CliOverrides {
            unit_delay_ms: Some(0),
            ..Default::default()
        };
        let resolved = resolve_with_env(&QuillConfig::default(), &cli, no_env);
        assert_eq!(resolved.unit_delay, Duration::from_millis(1));
    }

    #[test]
    fn test_zero_timeout_is_clamped() {
        let mut config = QuillConfig::default();
        config.gateway.timeout_secs = Some(0);
        let resolved = resolve_with_env(&config, &CliOverrides::default(), no_env);
        assert_eq!(resolved.timeout, Duration::from_secs(1));
    }

    #[test]
    fn test_sparse_toml_parses() {
        let toml_str = r#"
[reveal]
unit_delay_ms = 25
"#;
        let config: QuillConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.reveal.unit_delay_ms, Some(25));
        assert!(config.gateway.base_url.is_none());
        assert!(config.gateway.timeout_secs.is_none());
    }

    #[test]
    fn test_full_toml_parses() {
        let toml_str = r#"
[gateway]
base_url = "http://192.168.1.100:8000"
endpoint = "/api/query"
timeout_secs = 30

[reveal]
unit_delay_ms = 20
"#;
        let config: QuillConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(
            config.gateway.base_url.as_deref(),
            Some("http://192.168.1.100:8000")
        );
        assert_eq!(config.gateway.endpoint.as_deref(), Some("/api/query"));
        assert_eq!(config.gateway.timeout_secs, Some(30));
    }

    #[test]
    fn test_missing_file_generates_commented_default() {
        let dir = std::env::temp_dir().join(format!("quill-config-test-{}", std::process::id()));
        let path = dir.join("config.toml");
        let _ = fs::remove_file(&path);

        let config = load_config_from(&path).unwrap();
        assert!(config.gateway.base_url.is_none());

        // The generated file is all comments, so it parses back to defaults.
        let reloaded = load_config_from(&path).unwrap();
        assert!(reloaded.reveal.unit_delay_ms.is_none());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let dir = std::env::temp_dir().join(format!("quill-config-bad-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        fs::write(&path, "[reveal]\nunit_delay_ms = \"soon\"\n").unwrap();

        assert!(matches!(load_config_from(&path), Err(ConfigError::Parse(_))));

        let _ = fs::remove_dir_all(&dir);
    }
}
