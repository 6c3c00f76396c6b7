use crate::time_unit::TimeUnit;
use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;
use std::path::Path;

/// Table the coalescer settings are read from.
pub const CONFIG_SECTION: &str = "coalescer";

/// Tunables for a [`Coalescer`](crate::Coalescer).
///
/// Durations are strings in shorthand form ("250ms", "1s") or bare millisecond counts.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CoalescerConfig {
    /// Label attached to every log event of this coalescer
    pub name: String,
    /// Deadlines are rounded up to a multiple of this
    pub granularity: String,
    /// Groups firing later than their deadline by more than this are logged; "0ms" disables
    pub lag_warning: String,
}

impl Default for CoalescerConfig {
    fn default() -> Self {
        Self {
            name: "coalescer".to_string(),
            granularity: "1ms".to_string(),
            lag_warning: "100ms".to_string(),
        }
    }
}

impl CoalescerConfig {
    /// Granularity in milliseconds, never less than 1
    pub fn granularity_ms(&self) -> Result<u64, String> {
        parse_setting("granularity", &self.granularity).map(|ms| ms.max(1))
    }

    pub fn lag_warning_ms(&self) -> Result<u64, String> {
        parse_setting("lag_warning", &self.lag_warning)
    }

    /// Read the `[coalescer]` table from an already built config, falling back to defaults
    pub fn from_config(config: &Config) -> Result<Self, Box<dyn std::error::Error>> {
        let parsed = match config.get::<CoalescerConfig>(CONFIG_SECTION) {
            Ok(parsed) => parsed,
            Err(ConfigError::NotFound(_)) => CoalescerConfig::default(),
            Err(e) => return Err(e.into()),
        };
        parsed.granularity_ms()?;
        parsed.lag_warning_ms()?;
        Ok(parsed)
    }
}

fn parse_setting(key: &str, value: &str) -> Result<u64, String> {
    TimeUnit::parse_millis(value).ok_or_else(|| format!("Invalid {} value: '{}'", key, value))
}

fn load_config<P: AsRef<Path>>(
    path: P,
    format: FileFormat,
) -> Result<CoalescerConfig, Box<dyn std::error::Error>> {
    let config = Config::builder()
        .add_source(File::from(path.as_ref()).format(format))
        .add_source(
            Environment::with_prefix("COALESCE")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;
    CoalescerConfig::from_config(&config)
}

/// Load coalescer settings from a TOML file
///
/// Environment variables override file values, e.g. `COALESCE_COALESCER__LAG_WARNING=50ms`.
pub fn load_toml_config<P: AsRef<Path>>(path: P) -> Result<CoalescerConfig, Box<dyn std::error::Error>> {
    load_config(path, FileFormat::Toml)
}

/// Load coalescer settings from a YAML file
pub fn load_yaml_config<P: AsRef<Path>>(path: P) -> Result<CoalescerConfig, Box<dyn std::error::Error>> {
    load_config(path, FileFormat::Yaml)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_str(source: &str, format: FileFormat) -> Result<CoalescerConfig, Box<dyn std::error::Error>> {
        let config = Config::builder()
            .add_source(File::from_str(source, format))
            .build()?;
        CoalescerConfig::from_config(&config)
    }

    #[test]
    fn missing_section_uses_defaults() {
        let parsed = from_str("[other]\nkey = 1\n", FileFormat::Toml).unwrap();
        assert_eq!(parsed, CoalescerConfig::default());
        assert_eq!(parsed.granularity_ms(), Ok(1));
        assert_eq!(parsed.lag_warning_ms(), Ok(100));
    }

    #[test]
    fn reads_toml_section_with_partial_overrides() {
        let parsed = from_str(
            "[coalescer]\nname = \"ui-timers\"\ngranularity = \"5ms\"\n",
            FileFormat::Toml,
        )
        .unwrap();
        assert_eq!(parsed.name, "ui-timers");
        assert_eq!(parsed.granularity_ms(), Ok(5));
        assert_eq!(parsed.lag_warning, "100ms");
    }

    #[test]
    fn reads_yaml_with_bare_numbers() {
        let parsed = from_str("coalescer:\n  granularity: 4\n  lag_warning: 0\n", FileFormat::Yaml).unwrap();
        assert_eq!(parsed.granularity_ms(), Ok(4));
        assert_eq!(parsed.lag_warning_ms(), Ok(0));
    }

    #[test]
    fn rejects_malformed_durations() {
        let err = from_str("[coalescer]\nlag_warning = \"soon\"\n", FileFormat::Toml).unwrap_err();
        assert!(err.to_string().contains("lag_warning"));
    }

    #[test]
    fn zero_granularity_means_one_millisecond() {
        let parsed = CoalescerConfig {
            granularity: "0ms".to_string(),
            ..CoalescerConfig::default()
        };
        assert_eq!(parsed.granularity_ms(), Ok(1));
    }

    #[test]
    fn loads_from_a_toml_file() {
        let path = std::env::temp_dir().join(format!("coalesce-config-{}.toml", std::process::id()));
        std::fs::write(&path, "[coalescer]\nname = \"from-file\"\ngranularity = \"2s\"\n").unwrap();

        let parsed = load_toml_config(&path);
        std::fs::remove_file(&path).ok();

        let parsed = parsed.unwrap();
        assert_eq!(parsed.name, "from-file");
        assert_eq!(parsed.granularity_ms(), Ok(2000));
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(load_yaml_config("/nonexistent/coalesce.yaml").is_err());
    }
}
