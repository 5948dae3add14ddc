//! Environment-driven defaults for the CLI.
//!
//! Values are read from the process environment after `.env` has been
//! loaded. Command-line flags override them.

use std::collections::HashMap;
use thiserror::Error;
use tokenomics_lab_simulation::config::MAX_AR_ORDER;

#[derive(Debug, Clone, PartialEq)]
pub struct CliConfig {
    /// Seed applied when a command does not pass `--seed`.
    pub seed: Option<u64>,
    /// Default Monte Carlo path count.
    pub mc_paths: usize,
    /// Default forecast confidence level in percent.
    pub confidence_pct: f64,
    /// Default autoregressive order.
    pub ar_order: usize,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            seed: None,
            mc_paths: 100,
            confidence_pct: 95.0,
            ar_order: 1,
        }
    }
}

impl CliConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let seed = env_map
            .get("TOKENOMICS_SEED")
            .map(|s| {
                s.parse::<u64>().map_err(|_| {
                    ConfigError::InvalidValue(
                        "TOKENOMICS_SEED".to_string(),
                        "must be a valid u64".to_string(),
                    )
                })
            })
            .transpose()?;

        let mc_paths = match env_map.get("TOKENOMICS_MC_PATHS") {
            Some(s) => s
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| {
                    ConfigError::InvalidValue(
                        "TOKENOMICS_MC_PATHS".to_string(),
                        "must be a positive integer".to_string(),
                    )
                })?,
            None => defaults.mc_paths,
        };

        let confidence_pct = match env_map.get("TOKENOMICS_CONFIDENCE") {
            Some(s) => s
                .parse::<f64>()
                .ok()
                .filter(|c| *c > 0.0 && *c < 100.0)
                .ok_or_else(|| {
                    ConfigError::InvalidValue(
                        "TOKENOMICS_CONFIDENCE".to_string(),
                        "must be strictly between 0 and 100".to_string(),
                    )
                })?,
            None => defaults.confidence_pct,
        };

        let ar_order = match env_map.get("TOKENOMICS_AR_ORDER") {
            Some(s) => s
                .parse::<usize>()
                .ok()
                .filter(|o| (1..=MAX_AR_ORDER).contains(o))
                .ok_or_else(|| {
                    ConfigError::InvalidValue(
                        "TOKENOMICS_AR_ORDER".to_string(),
                        format!("must be between 1 and {MAX_AR_ORDER}"),
                    )
                })?,
            None => defaults.ar_order,
        };

        Ok(Self {
            seed,
            mc_paths,
            confidence_pct,
            ar_order,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = CliConfig::from_env_map(HashMap::new()).unwrap();
        assert_eq!(config, CliConfig::default());
    }

    #[test]
    fn test_reads_all_values() {
        let config = CliConfig::from_env_map(env(&[
            ("TOKENOMICS_SEED", "42"),
            ("TOKENOMICS_MC_PATHS", "250"),
            ("TOKENOMICS_CONFIDENCE", "90"),
            ("TOKENOMICS_AR_ORDER", "3"),
        ]))
        .unwrap();

        assert_eq!(config.seed, Some(42));
        assert_eq!(config.mc_paths, 250);
        assert_eq!(config.confidence_pct, 90.0);
        assert_eq!(config.ar_order, 3);
    }

    #[test]
    fn test_rejects_invalid_values() {
        for (key, value) in [
            ("TOKENOMICS_SEED", "-1"),
            ("TOKENOMICS_MC_PATHS", "0"),
            ("TOKENOMICS_CONFIDENCE", "100"),
            ("TOKENOMICS_AR_ORDER", "9"),
        ] {
            let err = CliConfig::from_env_map(env(&[(key, value)])).unwrap_err();
            assert!(err.to_string().contains(key), "{err}");
        }
    }
}
