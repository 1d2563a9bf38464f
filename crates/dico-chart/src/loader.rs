use std::path::Path;

use anyhow::{Result, anyhow};

use crate::chart::Chart;
use crate::fallback::fallback_chart;
use crate::location::Location;

/// Where a chart document comes from.
pub type ChartSource = Location;

impl Chart {
    pub fn load_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow!("Failed to read chart {}: {e}", path.display()))?;
        Self::from_json_str(&content)
    }

    pub fn load_url(url: &str) -> Result<Self> {
        let resp = reqwest::blocking::get(url)
            .map_err(|e| anyhow!("Chart request failed for {url}: {e}"))?;
        if !resp.status().is_success() {
            return Err(anyhow!("Chart fetch failed {url}: {}", resp.status()));
        }
        let body = resp
            .text()
            .map_err(|e| anyhow!("Failed to read chart body from {url}: {e}"))?;
        Self::from_json_str(&body)
    }

    pub fn load(source: &ChartSource) -> Result<Self> {
        match source {
            ChartSource::File(path) => Self::load_file(path),
            ChartSource::Url(url) => Self::load_url(url),
        }
    }

    /// Load a chart, substituting the generated fallback on any failure so a
    /// missing asset never blocks the session.
    pub fn load_or_fallback(source: Option<&ChartSource>) -> Self {
        let Some(source) = source else {
            log::info!("No chart configured, using fallback chart");
            return fallback_chart();
        };
        match Self::load(source) {
            Ok(chart) => {
                log::info!("Loaded chart {} ({} notes)", source, chart.len());
                chart
            }
            Err(e) => {
                log::warn!("Chart {source} unavailable, using fallback: {e}");
                fallback_chart()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn missing_file_is_an_error() {
        let source = ChartSource::File(PathBuf::from("/nonexistent/chart.json"));
        assert!(Chart::load(&source).is_err());
    }
}
