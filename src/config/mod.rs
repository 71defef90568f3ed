//! Configuration management.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Web search settings
    #[serde(default)]
    pub search: SearchConfig,

    /// Document download settings
    #[serde(default)]
    pub fetch: FetchConfig,

    /// ngspice simulation settings
    #[serde(default)]
    pub simulation: SimulationConfig,
}

/// Web search configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Maximum candidate URLs to request from the search provider
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// Default number of PDF pages to extract when the caller does not say
    #[serde(default = "default_max_pages")]
    pub default_max_pages: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_results: default_max_results(),
            default_max_pages: default_max_pages(),
        }
    }
}

fn default_max_results() -> usize {
    5
}

fn default_max_pages() -> usize {
    4
}

/// Document download configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Per-request timeout for candidate downloads (seconds)
    #[serde(default = "default_fetch_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_fetch_timeout_secs(),
        }
    }
}

impl FetchConfig {
    /// Per-request timeout as a [`Duration`]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_fetch_timeout_secs() -> u64 {
    10
}

/// Simulation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Simulator binary to invoke. Defaults to `ngspice` on PATH, or the
    /// `CIRCUIT_DESIGNER_NGSPICE` environment variable when set.
    #[serde(default = "default_simulator_binary")]
    pub binary: PathBuf,

    /// Wall-clock timeout for one simulator run (milliseconds)
    #[serde(default = "default_simulation_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            binary: default_simulator_binary(),
            timeout_ms: default_simulation_timeout_ms(),
        }
    }
}

impl SimulationConfig {
    /// Simulation timeout as a [`Duration`]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

fn default_simulator_binary() -> PathBuf {
    std::env::var("CIRCUIT_DESIGNER_NGSPICE")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("ngspice"))
}

fn default_simulation_timeout_ms() -> u64 {
    2000
}

/// Errors that can occur while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let contents = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&contents)?)
}

/// Find a config file in the default locations.
///
/// Checks, in order:
/// 1. `./circuit-designer.toml`
/// 2. `<user config dir>/circuit-designer/config.toml`
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from("circuit-designer.toml");
    if local.is_file() {
        return Some(local);
    }

    if let Some(config_dir) = dirs::config_dir() {
        let path = config_dir.join("circuit-designer").join("config.toml");
        if path.is_file() {
            return Some(path);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.search.max_results, 5);
        assert_eq!(config.search.default_max_pages, 4);
        assert_eq!(config.fetch.timeout(), Duration::from_secs(10));
        assert_eq!(config.simulation.timeout(), Duration::from_millis(2000));
    }

    #[test]
    fn test_parse_partial_toml() {
        let config: Config = toml::from_str(
            r#"
            [simulation]
            binary = "/usr/local/bin/ngspice"
            timeout_ms = 5000

            [fetch]
            timeout_secs = 3
            "#,
        )
        .unwrap();

        assert_eq!(
            config.simulation.binary,
            PathBuf::from("/usr/local/bin/ngspice")
        );
        assert_eq!(config.simulation.timeout_ms, 5000);
        assert_eq!(config.fetch.timeout_secs, 3);
        // Untouched section keeps its defaults
        assert_eq!(config.search.max_results, 5);
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config(Path::new("/nonexistent/circuit-designer.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
