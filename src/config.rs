use crate::date_format::DEFAULT_DATE_FORMAT;
use crate::line_filter::Highlight;
use crate::status::{AppStatus, StatusRegions};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::LazyLock;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Date format template used to find timestamps
    pub date_format: String,
    /// Show newest lines first
    pub reverse: bool,
    /// Date marking; unset picks one suited to the output
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlight: Option<Highlight>,
    pub regions: RegionRules,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            reverse: false,
            highlight: None,
            regions: RegionRules::default(),
        }
    }
}

impl ViewerConfig {
    pub fn status_regions(&self) -> StatusRegions {
        self.regions.apply(StatusRegions::default())
    }
}

/// Per-status region overrides; unset statuses keep the standard layout
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RegionRules {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending_log: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processing_log: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub idle: Option<Vec<String>>,
}

impl RegionRules {
    pub fn apply(&self, mut regions: StatusRegions) -> StatusRegions {
        let overrides = [
            (AppStatus::PendingLog, &self.pending_log),
            (AppStatus::ProcessingLog, &self.processing_log),
            (AppStatus::Idle, &self.idle),
        ];

        for (status, ids) in overrides {
            if let Some(ids) = ids {
                regions = regions.with(status, ids.iter().map(String::as_str));
            }
        }
        regions
    }
}

pub fn load_config(path: Option<&Path>) -> Result<ViewerConfig, ConfigError> {
    if let Some(path) = path {
        load_config_from_path(path)
    } else {
        Ok(default_config().clone())
    }
}

pub fn load_config_from_path(path: &Path) -> Result<ViewerConfig, ConfigError> {
    let path_display = path.display().to_string();
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path_display.clone(),
        source,
    })?;

    let config = toml::from_str::<ViewerConfig>(&raw).map_err(|source| ConfigError::Parse {
        path: path_display,
        source,
    })?;
    tracing::debug!(path = %path.display(), date_format = %config.date_format, "loaded config");
    Ok(config)
}

pub fn default_config() -> &'static ViewerConfig {
    static DEFAULT_CONFIG: LazyLock<ViewerConfig> = LazyLock::new(ViewerConfig::default);
    &DEFAULT_CONFIG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: ViewerConfig = toml::from_str("reverse = true").unwrap();
        assert!(config.reverse);
        assert_eq!(config.date_format, DEFAULT_DATE_FORMAT);
        assert_eq!(config.highlight, None);
    }

    #[test]
    fn test_region_override_replaces_one_status() {
        let config: ViewerConfig = toml::from_str(
            r#"
            highlight = "brackets"

            [regions]
            idle = ["log-container"]
            "#,
        )
        .unwrap();

        assert_eq!(config.highlight, Some(Highlight::Brackets));
        let regions = config.status_regions();
        let idle: Vec<_> = regions
            .shown_in(AppStatus::Idle)
            .map(|r| r.as_str())
            .collect();
        assert_eq!(idle, vec!["log-container"]);
        assert!(regions.shown_in(AppStatus::PendingLog).count() > 0);
    }
}
