use super::coalescer::{Coalescer, Settings};
use crate::config::{load_toml_config, load_yaml_config, CoalescerConfig};
use crate::host::Host;
use tracing::info;

/// Builder for a [`Coalescer`]
#[derive(Debug, Clone, Default)]
pub struct CoalescerBuilder {
    pub(crate) config: CoalescerConfig,
}

impl CoalescerBuilder {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with settings from the `[coalescer]` table of a TOML file
    pub fn with_toml(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        Ok(Self::with_config(load_toml_config(path)?))
    }

    /// Create with settings from the `coalescer` section of a YAML file
    pub fn with_yaml(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        Ok(Self::with_config(load_yaml_config(path)?))
    }

    /// Create with an already loaded config
    pub fn with_config(config: CoalescerConfig) -> Self {
        Self { config }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.name = name.into();
        self
    }

    /// Round deadlines up to multiples of `ms` so nearby callbacks share one group
    pub fn granularity_ms(mut self, ms: u64) -> Self {
        self.config.granularity = format!("{}ms", ms);
        self
    }

    /// Warn when a group fires more than `ms` after its deadline; 0 disables
    pub fn lag_warning_ms(mut self, ms: u64) -> Self {
        self.config.lag_warning = format!("{}ms", ms);
        self
    }

    /// Build a coalescer driven by `host`
    ///
    /// Settings that fail to parse fall back to their defaults with a warning.
    pub fn build<H: Host>(self, host: H) -> Coalescer<H> {
        let defaults = CoalescerConfig::default();
        let granularity_ms = self.config.granularity_ms().unwrap_or_else(|e| {
            tracing::warn!("{}, using {}", e, defaults.granularity);
            1
        });
        let lag_warning_ms = self.config.lag_warning_ms().unwrap_or_else(|e| {
            tracing::warn!("{}, using {}", e, defaults.lag_warning);
            100
        });

        info!(
            coalescer = %self.config.name,
            granularity_ms,
            lag_warning_ms,
            "Building coalescer"
        );

        Coalescer::from_parts(
            host,
            Settings {
                name: self.config.name,
                granularity_ms,
                lag_warning_ms,
            },
        )
    }
}
