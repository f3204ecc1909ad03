//! Dashboard Configuration
//! Display and parsing defaults, optionally overridden from a JSON file.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable naming an optional JSON config file.
pub const CONFIG_ENV_VAR: &str = "DASHBOARD_CONFIG";

/// Tunables for loading and presenting a dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Rows shown in table previews
    pub preview_rows: usize,
    /// Rows scanned by the CSV reader to infer column types
    pub infer_schema_length: usize,
    /// Number of equal-width bins in the numeric histogram
    pub histogram_bins: usize,
    /// Maximum distinct values listed per value-counts table
    pub value_counts_limit: usize,
    /// Width and height of exported chart images
    pub chart_export_size: [u32; 2],
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            preview_rows: 5,
            infer_schema_length: 10000,
            histogram_bins: 20,
            value_counts_limit: 50,
            chart_export_size: [1200, 800],
        }
    }
}

impl DashboardConfig {
    /// Read a config file. Fields absent from the file keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        Ok(config.sanitized())
    }

    /// Load from `DASHBOARD_CONFIG` if set, otherwise use defaults.
    pub fn load() -> Self {
        let Some(path) = std::env::var_os(CONFIG_ENV_VAR) else {
            return Self::default();
        };

        match Self::from_file(Path::new(&path)) {
            Ok(config) => {
                log::info!("Loaded config from {}", Path::new(&path).display());
                config
            }
            Err(e) => {
                log::warn!("{:#}; using default settings", e);
                Self::default()
            }
        }
    }

    /// Clamp values that would make the presenter degenerate.
    fn sanitized(mut self) -> Self {
        self.preview_rows = self.preview_rows.max(1);
        self.infer_schema_length = self.infer_schema_length.max(1);
        self.histogram_bins = self.histogram_bins.max(1);
        self.value_counts_limit = self.value_counts_limit.max(1);
        self.chart_export_size = [
            self.chart_export_size[0].max(200),
            self.chart_export_size[1].max(150),
        ];
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "preview_rows": 12 }}"#).unwrap();

        let config = DashboardConfig::from_file(file.path()).unwrap();
        assert_eq!(config.preview_rows, 12);
        assert_eq!(config.histogram_bins, 20);
        assert_eq!(config.infer_schema_length, 10000);
    }

    #[test]
    fn zero_values_are_clamped() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "histogram_bins": 0, "chart_export_size": [10, 10] }}"#).unwrap();

        let config = DashboardConfig::from_file(file.path()).unwrap();
        assert_eq!(config.histogram_bins, 1);
        assert_eq!(config.chart_export_size, [200, 150]);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(DashboardConfig::from_file(file.path()).is_err());
    }
}
