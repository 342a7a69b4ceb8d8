//! Pipeline orchestrator: runs all analysis stages in order.

use std::io::Write;
use std::path::Path;

use crate::aggregate::{aggregate_region, rank, scene_stats, Likelihood, RegionStats, SceneStats};
use crate::brightness::SatelliteImage;
use crate::classify::{classify, ThresholdEdge, Thresholds, TierMap};
use crate::config::AnalysisConfig;
use crate::error::{Error, Result};
use crate::geo::GeoBounds;
use crate::render::{render_overlay, save_overlay};
use crate::report::write_report;

/// Full output of one analysis run.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub bounds: GeoBounds,
    pub scene: SceneStats,
    /// Ranked: HIGH first, dense% descending within a label.
    pub regions: Vec<RegionStats>,
    /// Tiers of the header-free data region.
    pub tiers: TierMap,
    pub thresholds: Thresholds,
    pub edge: ThresholdEdge,
}

impl Analysis {
    /// Regions carrying `likelihood`, in ranked order.
    pub fn by_likelihood(&self, likelihood: Likelihood) -> impl Iterator<Item = &RegionStats> {
        self.regions.iter().filter(move |r| r.likelihood == likelihood)
    }
}

/// The main pipeline orchestrator.
#[derive(Debug, Clone)]
pub struct RainfallAnalyzer {
    config: AnalysisConfig,
}

impl RainfallAnalyzer {
    /// Validates `config` up front so no stage sees unordered cutoffs.
    pub fn new(config: AnalysisConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Run the analysis stages on a loaded image.
    ///
    /// Pipeline order:
    ///   1. Geographic bounds from image size
    ///   2. Header removal
    ///   3. Tier classification
    ///   4. Scene + per-region aggregation
    ///   5. Ranking
    pub fn analyze(&self, image: &SatelliteImage) -> Result<Analysis> {
        let cfg = &self.config;

        // ── 1. Geographic bounds ────────────────────────────────────────────
        let bounds = GeoBounds::new(&cfg.extent, image.width(), image.height())?;
        log::debug!(
            "Bounds: {:.3} px/° lat, {:.3} px/° lon",
            bounds.pixels_per_degree_lat,
            bounds.pixels_per_degree_lon
        );

        // ── 2. Header removal ───────────────────────────────────────────────
        let data = image.brightness.without_header(cfg.extent.header_height)?;
        log::info!(
            "Data region {}×{} (dropped {} header rows)",
            data.width,
            data.height,
            cfg.extent.header_height
        );

        // ── 3. Classification ───────────────────────────────────────────────
        let tiers = classify(&data, &cfg.thresholds, cfg.edge);

        // ── 4. Aggregation ──────────────────────────────────────────────────
        let scene = scene_stats(&tiers, &data);
        let mut regions = cfg
            .regions
            .iter()
            .map(|region| {
                aggregate_region(region, &bounds, &tiers, &data, &cfg.rules, cfg.bounds_policy)
            })
            .collect::<Result<Vec<_>>>()?;

        // ── 5. Ranking ──────────────────────────────────────────────────────
        rank(&mut regions);

        Ok(Analysis {
            bounds,
            scene,
            regions,
            tiers,
            thresholds: cfg.thresholds,
            edge: cfg.edge,
        })
    }

    /// Load `image_path`, analyze it, write the report to `out` and the
    /// overlay to `output_path`.
    pub fn run(
        &self,
        image_path: impl AsRef<Path>,
        output_path: impl AsRef<Path>,
        out: &mut impl Write,
    ) -> Result<Analysis> {
        let image = SatelliteImage::open(image_path)?;
        let analysis = self.analyze(&image)?;

        write_report(out, &analysis, self.config.report).map_err(|source| Error::Io {
            path: "<report>".into(),
            source,
        })?;

        let overlay = render_overlay(&image, &analysis, self.config.overlay);
        save_overlay(&overlay, output_path.as_ref())?;
        writeln!(out, "\nVisualization saved to: {}", output_path.as_ref().display()).map_err(
            |source| Error::Io {
                path: "<report>".into(),
                source,
            },
        )?;

        Ok(analysis)
    }
}
