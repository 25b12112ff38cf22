//! Generator configuration.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::EntropySource;

/// Default interval between automatic accumulations, in milliseconds.
pub const DEFAULT_ACCUMULATE_INTERVAL_MS: u64 = 375;

/// Serializable generator settings.
///
/// Every field has a default, so partial documents deserialize:
///
/// ```rust
/// use fortuna::Config;
///
/// let config: Config = serde_json::from_str(r#"{ "time_based_entropy": true }"#).unwrap();
/// assert!(config.time_based_entropy);
/// assert_eq!(config.accumulate_interval_ms, 375);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Re-sample entropy on a background timer.
    pub time_based_entropy: bool,
    /// Interval between timer-driven accumulations; zero means the default.
    pub accumulate_interval_ms: u64,
    /// Validate every sample, not only the one taken at init.
    pub revalidate_entropy: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            time_based_entropy: false,
            accumulate_interval_ms: DEFAULT_ACCUMULATE_INTERVAL_MS,
            revalidate_entropy: false,
        }
    }
}

impl Config {
    /// Timer interval as a [`Duration`].
    ///
    /// An interval of zero falls back to [`DEFAULT_ACCUMULATE_INTERVAL_MS`].
    pub fn accumulate_interval(&self) -> Duration {
        match self.accumulate_interval_ms {
            0 => Duration::from_millis(DEFAULT_ACCUMULATE_INTERVAL_MS),
            ms => Duration::from_millis(ms),
        }
    }
}

/// Options passed to [`Fortuna::init`](crate::Fortuna::init).
///
/// Without an explicit source the generator falls back to
/// [`TimeEntropy`](crate::TimeEntropy).
#[derive(Clone, Default)]
pub struct Options {
    pub(crate) config: Config,
    pub(crate) entropy_source: Option<Arc<dyn EntropySource>>,
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("config", &self.config)
            .field("custom_entropy_source", &self.entropy_source.is_some())
            .finish()
    }
}

impl Options {
    /// Default options: time-based sampler, no timer, 375ms interval.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing [`Config`].
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Use `source` for every entropy sample.
    pub fn with_entropy_source<S: EntropySource + 'static>(mut self, source: S) -> Self {
        self.entropy_source = Some(Arc::new(source));
        self
    }

    /// Use an already shared source.
    pub fn with_shared_entropy_source(mut self, source: Arc<dyn EntropySource>) -> Self {
        self.entropy_source = Some(source);
        self
    }

    /// Enable or disable timer-driven accumulation.
    pub fn time_based_entropy(mut self, enabled: bool) -> Self {
        self.config.time_based_entropy = enabled;
        self
    }

    /// Set the timer interval in milliseconds; zero means the default.
    pub fn accumulate_interval_ms(mut self, interval_ms: u64) -> Self {
        self.config.accumulate_interval_ms = interval_ms;
        self
    }

    /// Validate every accumulated sample, not only the first.
    pub fn revalidate_entropy(mut self, enabled: bool) -> Self {
        self.config.revalidate_entropy = enabled;
        self
    }

    /// The settings these options carry.
    pub fn config(&self) -> &Config {
        &self.config
    }
}
