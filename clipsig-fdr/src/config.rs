use std::fs::read_to_string;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_RANDOMISATIONS, DEFAULT_SPREAD};
use crate::errors::ConfigError;

/// Which observed and null heights a base's FDR is estimated against.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum FdrScope {
    /// One null distribution pooled over every interval of the run.
    #[default]
    Pooled,
    /// Each interval against its own observed and randomised heights.
    PerInterval,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FdrConfig {
    /// Randomised profiles drawn per interval.
    pub randomisations: u32,
    /// Bases either side of a base summed into its height.
    pub spread: u32,
    /// Base seed; interval `i` draws from `seed + i`. Unseeded runs use OS
    /// entropy and are not reproducible.
    pub seed: Option<u64>,
    /// Make FDR non-increasing in height.
    pub monotone: bool,
    pub scope: FdrScope,
    /// Worker threads; `None` runs sequentially.
    pub threads: Option<usize>,
}

impl Default for FdrConfig {
    fn default() -> Self {
        FdrConfig {
            randomisations: DEFAULT_RANDOMISATIONS,
            spread: DEFAULT_SPREAD,
            seed: None,
            monotone: true,
            scope: FdrScope::Pooled,
            threads: None,
        }
    }
}

impl TryFrom<&Path> for FdrConfig {
    type Error = ConfigError;

    ///
    /// Read a config from a `.toml` file. Missing keys take their defaults.
    ///
    fn try_from(path: &Path) -> Result<Self, Self::Error> {
        let toml_str = read_to_string(path)?;
        let config: FdrConfig = toml::from_str(&toml_str)?;
        Ok(config)
    }
}

impl FdrConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.randomisations == 0 {
            return Err(ConfigError::NoRandomisations);
        }
        if self.threads == Some(0) {
            return Err(ConfigError::NoThreads);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::NamedTempFile;

    fn get_test_path(file_name: &str) -> PathBuf {
        std::env::current_dir()
            .unwrap()
            .join("../tests/data/clipsig")
            .join(file_name)
    }

    #[rstest]
    fn test_try_from_toml() {
        let path = get_test_path("sigbases.toml");
        let config = FdrConfig::try_from(path.as_path()).unwrap();

        assert_eq!(config.randomisations, 250);
        assert_eq!(config.spread, 10);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.scope, FdrScope::PerInterval);
        // not in the file
        assert_eq!(config.monotone, true);
        assert_eq!(config.threads, None);
    }

    #[rstest]
    fn test_negative_spread_is_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "spread = -1").unwrap();
        let result = FdrConfig::try_from(file.path());
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[rstest]
    fn test_unknown_key_is_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "randomizations = 5").unwrap();
        assert!(FdrConfig::try_from(file.path()).is_err());
    }

    #[rstest]
    fn test_validate() {
        assert!(FdrConfig::default().validate().is_ok());

        let config = FdrConfig {
            randomisations: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::NoRandomisations)));

        let config = FdrConfig {
            threads: Some(0),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::NoThreads)));
    }
}
