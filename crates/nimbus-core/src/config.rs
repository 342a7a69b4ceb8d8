//! Analysis configuration.
//!
//! Every cutoff and region box lives here rather than in module constants,
//! so tests and callers can substitute their own. Defaults reproduce the
//! Asia-sector product; `Preset::Regional` reproduces the broader
//! weather-system analysis with described regions.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::aggregate::{LikelihoodRules, LowRule};
use crate::classify::{ThresholdEdge, Thresholds};
use crate::error::{Error, Result};
use crate::geo::{BoundsPolicy, GeoExtent};
use crate::region::{regional_regions, sector_regions, Region};

/// Textual report layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStyle {
    /// Ranked fixed-width table plus summary.
    #[default]
    Table,
    /// Scene statistics, one block per region with its description, summary.
    Detailed,
}

/// Right-hand panel of the rendered overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlayStyle {
    /// Tier colour map of the data region.
    #[default]
    Classified,
    /// Original raster with region boxes outlined in likelihood colours.
    Annotated,
}

/// Built-in parameter sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    #[default]
    Sector,
    Regional,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub extent: GeoExtent,
    pub thresholds: Thresholds,
    pub edge: ThresholdEdge,
    pub rules: LikelihoodRules,
    pub regions: Vec<Region>,
    pub report: ReportStyle,
    pub overlay: OverlayStyle,
    pub bounds_policy: BoundsPolicy,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self::preset(Preset::Sector)
    }
}

impl AnalysisConfig {
    pub fn preset(preset: Preset) -> Self {
        match preset {
            Preset::Sector => Self {
                extent: GeoExtent::default(),
                thresholds: Thresholds::default(),
                edge: ThresholdEdge::AtOrAbove,
                rules: LikelihoodRules::default(),
                regions: sector_regions(),
                report: ReportStyle::Table,
                overlay: OverlayStyle::Classified,
                bounds_policy: BoundsPolicy::Clamp,
            },
            // Two-cutoff analysis (>180 dense, >140 medium); the low tier
            // only feeds the overlay since its LOW rule ignores thin cloud.
            Preset::Regional => Self {
                extent: GeoExtent::default(),
                thresholds: Thresholds {
                    dense: 180.0,
                    medium: 140.0,
                    low: 100.0,
                },
                edge: ThresholdEdge::Above,
                rules: LikelihoodRules {
                    low: LowRule::DenseOrMedium {
                        dense_pct: 5.0,
                        medium_pct: 20.0,
                    },
                    ..LikelihoodRules::default()
                },
                regions: regional_regions(),
                report: ReportStyle::Detailed,
                overlay: OverlayStyle::Annotated,
                bounds_policy: BoundsPolicy::Clamp,
            },
        }
    }

    /// Load a JSON config. Missing fields take the `Sector` defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&text).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.extent.validate()?;
        self.thresholds.validate()?;
        let r = &self.rules;
        if ![r.high_dense_pct, r.moderate_dense_pct, r.moderate_combined_pct]
            .iter()
            .all(|v| v.is_finite())
        {
            return Err(Error::Config("likelihood cutoffs must be finite".into()));
        }
        if r.moderate_dense_pct > r.high_dense_pct {
            return Err(Error::Config(format!(
                "moderate dense cutoff ({}) exceeds high dense cutoff ({})",
                r.moderate_dense_pct, r.high_dense_pct
            )));
        }
        for region in &self.regions {
            region.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn presets_are_valid() {
        AnalysisConfig::preset(Preset::Sector).validate().unwrap();
        AnalysisConfig::preset(Preset::Regional).validate().unwrap();
        assert_eq!(AnalysisConfig::default(), AnalysisConfig::preset(Preset::Sector));
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"thresholds": {{"dense": 220.0, "medium": 170.0, "low": 110.0}},
                "report": "detailed"}}"#
        )
        .unwrap();
        let config = AnalysisConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.thresholds.dense, 220.0);
        assert_eq!(config.report, ReportStyle::Detailed);
        assert_eq!(config.regions.len(), 10);
        assert_eq!(config.extent, GeoExtent::default());
    }

    #[test]
    fn unordered_thresholds_fail_at_load() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"thresholds": {{"dense": 100.0, "medium": 170.0, "low": 110.0}}}}"#
        )
        .unwrap();
        let res = AnalysisConfig::from_json_file(file.path());
        assert!(matches!(res, Err(Error::Config(_))));
    }

    #[test]
    fn out_of_range_region_fails_at_load() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"regions": [{{"name": "Huge", "lat_range": [0.0, 1e300], "lon_range": [60.0, 70.0]}}]}}"#
        )
        .unwrap();
        let res = AnalysisConfig::from_json_file(file.path());
        assert!(matches!(res, Err(Error::Config(_))));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        let res = AnalysisConfig::from_json_file(file.path());
        assert!(matches!(res, Err(Error::ConfigParse { .. })));
    }

    #[test]
    fn config_roundtrips_through_json() {
        let config = AnalysisConfig::preset(Preset::Regional);
        let json = serde_json::to_string_pretty(&config).unwrap();
        let back: AnalysisConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
