use serde::{Deserialize, Serialize};
use std::{fs::File, io::BufReader, path::Path, time::Duration};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to open config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiceConfig {
    #[serde(default)]
    pub simulation: SimulationConfig,

    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub store: StoreConfig,
}

impl DiceConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        if self.simulation.iterations == 0 {
            return Err(ConfigError::Invalid(
                "simulation.iterations must be positive".to_string(),
            ));
        }
        if self.simulation.timeout.is_zero() {
            return Err(ConfigError::Invalid(
                "simulation.timeout must be positive".to_string(),
            ));
        }
        if self.simulation.workers == Some(0) {
            return Err(ConfigError::Invalid(
                "simulation.workers must be positive when set".to_string(),
            ));
        }
        if self.cache.max_entries == 0 {
            return Err(ConfigError::Invalid(
                "cache.max_entries must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    #[serde(default = "default_iterations")]
    pub iterations: usize,

    #[serde(default = "default_simulation_timeout", with = "duration_ms")]
    pub timeout: Duration,

    /// Cores left free for other load when sizing the worker pool.
    #[serde(default = "default_worker_headroom")]
    pub worker_headroom: usize,

    /// Fixed worker count; overrides the headroom rule.
    #[serde(default)]
    pub workers: Option<usize>,

    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

impl SimulationConfig {
    pub fn worker_count(&self) -> usize {
        match self.workers {
            Some(workers) => workers.max(1),
            None => num_cpus::get()
                .saturating_sub(self.worker_headroom)
                .max(1),
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            iterations: default_iterations(),
            timeout: default_simulation_timeout(),
            worker_headroom: default_worker_headroom(),
            workers: None,
            channel_capacity: default_channel_capacity(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,

    #[serde(default = "default_cache_ttl", with = "duration_ms")]
    pub ttl: Duration,

    #[serde(default = "default_cache_write_timeout", with = "duration_ms")]
    pub write_timeout: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: default_max_entries(),
            ttl: default_cache_ttl(),
            write_timeout: default_cache_write_timeout(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_store_write_timeout", with = "duration_ms")]
    pub write_timeout: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            write_timeout: default_store_write_timeout(),
        }
    }
}

pub fn from_file<T: for<'de> Deserialize<'de>, P: AsRef<Path>>(path: P) -> ConfigResult<T> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let config = serde_json::from_reader(reader)?;
    Ok(config)
}

pub fn from_str<T: for<'de> Deserialize<'de>>(s: &str) -> ConfigResult<T> {
    let config = serde_json::from_str(s)?;
    Ok(config)
}

fn default_iterations() -> usize {
    1_000_000
}
fn default_simulation_timeout() -> Duration {
    Duration::from_secs(5)
}
fn default_worker_headroom() -> usize {
    4
}
fn default_channel_capacity() -> usize {
    1_000_000
}
fn default_max_entries() -> usize {
    100_000
}
fn default_cache_ttl() -> Duration {
    Duration::from_secs(24 * 60 * 60)
}
fn default_cache_write_timeout() -> Duration {
    Duration::from_millis(100)
}
fn default_store_write_timeout() -> Duration {
    Duration::from_millis(500)
}

mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let ms = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = DiceConfig::default();
        assert_eq!(config.simulation.iterations, 1_000_000);
        assert_eq!(config.simulation.timeout, Duration::from_secs(5));
        assert_eq!(config.simulation.worker_headroom, 4);
        assert_eq!(config.cache.max_entries, 100_000);
        assert_eq!(config.cache.ttl, Duration::from_secs(86_400));
        assert_eq!(config.cache.write_timeout, Duration::from_millis(100));
        assert_eq!(config.store.write_timeout, Duration::from_millis(500));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: DiceConfig = from_str(
            r#"{
                "simulation": { "iterations": 5000, "timeout": 250, "workers": 2 },
                "cache": { "max_entries": 10 }
            }"#,
        )
        .unwrap();
        assert_eq!(config.simulation.iterations, 5000);
        assert_eq!(config.simulation.timeout, Duration::from_millis(250));
        assert_eq!(config.simulation.worker_count(), 2);
        assert_eq!(config.cache.max_entries, 10);
        assert_eq!(config.cache.ttl, default_cache_ttl());
        assert_eq!(config.store, StoreConfig::default());
    }

    #[test]
    fn test_worker_count_never_zero() {
        let config = SimulationConfig {
            worker_headroom: usize::MAX,
            ..SimulationConfig::default()
        };
        assert_eq!(config.worker_count(), 1);
    }

    #[test]
    fn test_validate_rejects_zero_values() {
        let mut config = DiceConfig::default();
        config.cache.max_entries = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = DiceConfig::default();
        config.simulation.iterations = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "store": {{ "write_timeout": 750 }} }}"#).unwrap();

        let config: DiceConfig = from_file(file.path()).unwrap();
        assert_eq!(config.store.write_timeout, Duration::from_millis(750));
        assert_eq!(config.simulation, SimulationConfig::default());
    }

    #[test]
    fn test_malformed_config() {
        let result: ConfigResult<DiceConfig> = from_str("{ not json");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
        let result: ConfigResult<DiceConfig> = from_file("/nonexistent/dicestat.json");
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
