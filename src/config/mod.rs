// src/config/mod.rs
pub mod types;

pub use self::types::{
    Config, EvaluationConfig, PollingConfig, ProgressConfig, RelayConfig, StoreConfig,
};

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use std::thread;
use std::time::Duration;

use crate::error::LinkError;
use crate::store::Aggregation;

pub const DEFAULT_CONFIG_FILE: &str = "linkeval.toml";

const MAX_DEFAULT_WORKERS: usize = 8;

impl Config {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads `path`, or `linkeval.toml` from the working directory when no
    /// path is given. A missing default file yields the defaults; a missing
    /// explicit file is an error.
    ///
    /// # Errors
    /// Returns error if the file cannot be read, is not valid TOML, or fails
    /// validation.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::new(),
        };
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::parse_toml(&content).with_context(|| format!("Invalid TOML in {}", path.display()))
    }

    /// # Errors
    /// Returns error if `content` is not a valid config document.
    pub fn parse_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Validates configuration.
    ///
    /// # Errors
    /// Returns `InvalidParameter` for an EWMA factor outside `[0, 1]` or a
    /// non-positive progress pace.
    pub fn validate(&self) -> Result<()> {
        let factor = self.store.ewma_factor;
        if !(0.0..=1.0).contains(&factor) {
            return Err(LinkError::InvalidParameter(format!(
                "store.ewma_factor must be in [0, 1], got {factor}"
            ))
            .into());
        }
        let pace = self.progress.pace;
        if !pace.is_finite() || pace <= 0.0 {
            return Err(LinkError::InvalidParameter(format!(
                "progress.pace must be positive, got {pace}"
            ))
            .into());
        }
        Ok(())
    }

    /// Aggregation policy for `REAL` puts.
    ///
    /// # Errors
    /// Returns `InvalidParameter` if the EWMA factor is out of range.
    pub fn aggregation(&self) -> crate::error::Result<Aggregation> {
        self.store.aggregation.resolve(self.store.ewma_factor)
    }

    /// Worker count for evaluation, resolving 0 to the machine's parallelism.
    #[must_use]
    pub fn effective_workers(&self) -> usize {
        match self.evaluation.workers {
            0 => thread::available_parallelism()
                .map_or(1, usize::from)
                .min(MAX_DEFAULT_WORKERS),
            n => n,
        }
    }

    #[must_use]
    pub fn poll_period(&self) -> Duration {
        Duration::from_secs(self.polling.period_secs)
    }
}
