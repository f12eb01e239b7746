/*!
 * Config Loader
 *
 * Reads `config.txt` style files (`key value` per line) or JSON records.
 * Every failure degrades to the default value for the affected key.
 */

use super::types::SchedulerConfig;
use crate::core::errors::ConfigError;
use std::path::Path;
use tracing::{debug, info, warn};

/// Loads and validates scheduler configuration
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a file, falling back to defaults
    pub fn load(path: impl AsRef<Path>) -> SchedulerConfig {
        let path = path.as_ref();
        match Self::try_load(path) {
            Ok(config) => {
                info!(path = %path.display(), "Configuration loaded");
                config
            }
            Err(e) => {
                warn!(error = %e, "Using default configuration");
                SchedulerConfig::default()
            }
        }
    }

    /// Load configuration, surfacing the file-level error
    pub fn try_load(path: &Path) -> Result<SchedulerConfig, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let is_json = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        if is_json {
            Self::parse_json(&contents)
        } else {
            Ok(Self::parse(&contents))
        }
    }

    /// Parse a JSON record; missing keys take their defaults
    pub fn parse_json(contents: &str) -> Result<SchedulerConfig, ConfigError> {
        serde_json::from_str::<SchedulerConfig>(contents)
            .map(SchedulerConfig::sanitized)
            .map_err(|e| ConfigError::Json(e.to_string()))
    }

    /// Parse the key/value text format
    ///
    /// Malformed entries are skipped with a warning, so this never fails.
    pub fn parse(contents: &str) -> SchedulerConfig {
        let mut config = SchedulerConfig::default();

        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (key, value) = match line.split_once(|c: char| c == '=' || c.is_whitespace()) {
                Some((key, value)) => (key.trim(), value.trim()),
                None => (line, ""),
            };

            if let Err(e) = Self::apply(&mut config, key, value) {
                warn!(error = %e, "Ignoring config entry");
            }
        }

        config.sanitized()
    }

    fn apply(config: &mut SchedulerConfig, key: &str, value: &str) -> Result<(), ConfigError> {
        let value = value.trim_matches('"');
        if value.is_empty() {
            return Err(ConfigError::MissingValue(key.to_string()));
        }

        match key {
            "num-cpu" => config.num_cpu = number(key, value)?,
            "scheduler" => config.policy = value.parse()?,
            "quantum-cycles" => config.quantum_cycles = number(key, value)?,
            "batch-process-freq" => config.batch_process_freq = number(key, value)?,
            "min-ins" => config.min_ins = number(key, value)?,
            "max-ins" => config.max_ins = number(key, value)?,
            "delays-per-exec" | "delay-per-exec" => config.delays_per_exec = number(key, value)?,
            _ => debug!(key, "Unrecognized config key"),
        }

        Ok(())
    }
}

fn number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Policy;

    #[test]
    fn test_parse_full_file() {
        let config = ConfigLoader::parse(
            "num-cpu 2\n\
             scheduler \"rr\"\n\
             quantum-cycles 3\n\
             batch-process-freq 4\n\
             min-ins 10\n\
             max-ins 20\n\
             delays-per-exec 1\n",
        );

        assert_eq!(config.num_cpu, 2);
        assert_eq!(config.policy, Policy::RoundRobin);
        assert_eq!(config.quantum_cycles, 3);
        assert_eq!(config.batch_process_freq, 4);
        assert_eq!(config.min_ins, 10);
        assert_eq!(config.max_ins, 20);
        assert_eq!(config.delays_per_exec, 1);
    }

    #[test]
    fn test_malformed_values_keep_defaults() {
        let config = ConfigLoader::parse("num-cpu lots\nscheduler sjf\nmin-ins\n");
        let defaults = SchedulerConfig::default();

        assert_eq!(config.num_cpu, defaults.num_cpu);
        assert_eq!(config.policy, defaults.policy);
        assert_eq!(config.min_ins, defaults.min_ins);
    }

    #[test]
    fn test_unknown_keys_and_comments_ignored() {
        let config = ConfigLoader::parse("# comment\n\nfoo bar\nnum-cpu=8\n");
        assert_eq!(config.num_cpu, 8);
    }

    #[test]
    fn test_zero_cores_sanitized() {
        let config = ConfigLoader::parse("num-cpu 0\n");
        assert_eq!(config.num_cpu, 1);
    }

    #[test]
    fn test_parse_json_partial() {
        let config = ConfigLoader::parse_json(r#"{"num-cpu": 3, "scheduler": "rr"}"#).unwrap();
        assert_eq!(config.num_cpu, 3);
        assert_eq!(config.policy, Policy::RoundRobin);
        assert_eq!(config.quantum_cycles, SchedulerConfig::default().quantum_cycles);
    }

    #[test]
    fn test_parse_json_invalid() {
        assert!(matches!(
            ConfigLoader::parse_json("{not json"),
            Err(ConfigError::Json(_))
        ));
    }
}
