//! Runtime configuration for Calmou core
//!
//! Supports loading config from:
//! - A TOML file (`--config` on the CLI, or a path handed over by the app shell)
//! - Environment variables, which override the file

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::chart::ChartLayout;
use crate::error::ComputeError;
use crate::instruments::InstrumentCatalog;
use crate::types::LevelPolicy;

/// Environment variable overriding `level_policy`
pub const LEVEL_POLICY_ENV: &str = "CALMOU_LEVEL_POLICY";

/// Environment variable overriding `instruments`
pub const INSTRUMENTS_ENV: &str = "CALMOU_INSTRUMENTS";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalmouConfig {
    /// Surface layout used when the caller does not supply one
    #[serde(default)]
    pub chart: ChartLayout,

    /// Handling of mood levels outside 1..=5
    #[serde(default)]
    pub level_policy: LevelPolicy,

    /// Instrument definitions (JSON or TOML) replacing the built-in set
    #[serde(default)]
    pub instruments: Option<PathBuf>,
}

impl CalmouConfig {
    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self, ComputeError> {
        let config: Self = toml::from_str(content)?;
        config.chart.validate()?;
        Ok(config)
    }

    /// Load configuration with priority:
    /// 1. Environment variables (highest)
    /// 2. The given TOML file, if any
    /// 3. Defaults
    pub fn load(path: Option<&Path>) -> Result<Self, ComputeError> {
        let mut config = match path {
            Some(path) => Self::from_toml(&read(path)?)?,
            None => Self::default(),
        };
        config.apply_env();
        Ok(config)
    }

    fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply `CALMOU_*` overrides read through `lookup`.
    ///
    /// An unparseable policy is logged and ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(LEVEL_POLICY_ENV) {
            match value.parse() {
                Ok(policy) => self.level_policy = policy,
                Err(e) => tracing::warn!("ignoring {}: {}", LEVEL_POLICY_ENV, e),
            }
        }
        if let Some(path) = lookup(INSTRUMENTS_ENV) {
            self.instruments = Some(PathBuf::from(path));
        }
    }

    /// Build the instrument catalog this configuration points at
    pub fn catalog(&self) -> Result<InstrumentCatalog, ComputeError> {
        let Some(path) = &self.instruments else {
            return Ok(InstrumentCatalog::default());
        };

        let content = read(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => InstrumentCatalog::from_toml(&content),
            _ => InstrumentCatalog::from_json(&content),
        }
    }
}

fn read(path: &Path) -> Result<String, ComputeError> {
    fs::read_to_string(path)
        .map_err(|e| ComputeError::ParseError(format!("cannot read {}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::Padding;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = CalmouConfig::from_toml("").unwrap();
        assert_eq!(config, CalmouConfig::default());
        assert_eq!(config.level_policy, LevelPolicy::Reject);
        assert_eq!(config.chart.height, 240.0);
        assert_eq!(config.chart.padding.left, 40.0);
    }

    #[test]
    fn test_full_config() {
        let config = CalmouConfig::from_toml(
            r#"
            level_policy = "clamp"
            instruments = "instruments.json"

            [chart]
            width = 320.0
            height = 200.0

            [chart.padding]
            top = 10.0
            right = 10.0
            bottom = 10.0
            left = 10.0
            "#,
        )
        .unwrap();

        assert_eq!(config.level_policy, LevelPolicy::Clamp);
        assert_eq!(config.instruments, Some(PathBuf::from("instruments.json")));
        assert_eq!(config.chart.width, 320.0);
        assert_eq!(config.chart.padding, Padding::uniform(10.0));
    }

    #[test]
    fn test_chart_padding_defaults_when_omitted() {
        let config = CalmouConfig::from_toml("[chart]\nwidth = 100.0\nheight = 100.0\n").unwrap();
        assert_eq!(config.chart.padding, Padding::default());
    }

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_overrides_replace_file_values() {
        let mut config = CalmouConfig::from_toml(r#"level_policy = "reject""#).unwrap();
        config.apply_overrides(lookup_from(&[
            (LEVEL_POLICY_ENV, " Clamp "),
            (INSTRUMENTS_ENV, "/etc/calmou/instruments.toml"),
        ]));

        assert_eq!(config.level_policy, LevelPolicy::Clamp);
        assert_eq!(
            config.instruments,
            Some(PathBuf::from("/etc/calmou/instruments.toml"))
        );
    }

    #[test]
    fn test_invalid_policy_override_is_ignored() {
        let mut config = CalmouConfig::from_toml(r#"level_policy = "clamp""#).unwrap();
        config.apply_overrides(lookup_from(&[(LEVEL_POLICY_ENV, "ignore")]));

        assert_eq!(config.level_policy, LevelPolicy::Clamp);
        assert_eq!(config.instruments, None);
    }

    #[test]
    fn test_no_overrides_keeps_config() {
        let mut config = CalmouConfig::default();
        config.apply_overrides(lookup_from(&[]));
        assert_eq!(config, CalmouConfig::default());
    }

    #[test]
    fn test_non_finite_chart_size_is_rejected() {
        assert!(matches!(
            CalmouConfig::from_toml("[chart]\nwidth = inf\nheight = 240.0\n"),
            Err(ComputeError::InvalidLayout(_))
        ));
    }

    #[test]
    fn test_unknown_policy_is_config_error() {
        assert!(matches!(
            CalmouConfig::from_toml(r#"level_policy = "ignore""#),
            Err(ComputeError::ConfigError(_))
        ));
    }

    #[test]
    fn test_default_catalog_without_path() {
        let catalog = CalmouConfig::default().catalog().unwrap();
        assert_eq!(catalog.instruments().len(), 3);
    }

    #[test]
    fn test_missing_file_is_reported() {
        let result = CalmouConfig::load(Some(Path::new("/nonexistent/calmou.toml")));
        assert!(matches!(result, Err(ComputeError::ParseError(_))));
    }
}
