//! Per-region tier coverage and rainfall-likelihood assessment.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::brightness::BrightnessField;
use crate::classify::{TierMap, TierPercentages};
use crate::error::Result;
use crate::geo::{BoundsPolicy, GeoBounds, PixelRect};
use crate::region::Region;

/// Rainfall likelihood label, most severe first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Likelihood {
    High,
    Moderate,
    Low,
    Unlikely,
}

impl Likelihood {
    pub const ALL: [Likelihood; 4] = [
        Likelihood::High,
        Likelihood::Moderate,
        Likelihood::Low,
        Likelihood::Unlikely,
    ];

    /// Severity rank used for ordering: 0 = HIGH … 3 = UNLIKELY.
    pub fn rank(self) -> u8 {
        match self {
            Likelihood::High => 0,
            Likelihood::Moderate => 1,
            Likelihood::Low => 2,
            Likelihood::Unlikely => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Likelihood::High => "HIGH",
            Likelihood::Moderate => "MODERATE",
            Likelihood::Low => "LOW",
            Likelihood::Unlikely => "UNLIKELY",
        }
    }

    pub fn color(self) -> [u8; 3] {
        match self {
            Likelihood::High => [255, 0, 0],
            Likelihood::Moderate => [255, 165, 0],
            Likelihood::Low => [255, 255, 0],
            Likelihood::Unlikely => [0, 128, 0],
        }
    }
}

impl fmt::Display for Likelihood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // `pad` so width/alignment specs apply in report tables.
        f.pad(self.label())
    }
}

/// Residual cutoff separating LOW from UNLIKELY.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LowRule {
    /// dense + medium + low coverage above `pct`.
    TotalCloud { pct: f32 },
    /// dense above `dense_pct`, or medium above `medium_pct`.
    DenseOrMedium { dense_pct: f32, medium_pct: f32 },
}

impl Default for LowRule {
    fn default() -> Self {
        LowRule::TotalCloud { pct: 30.0 }
    }
}

/// Fixed decision table from tier percentages to a likelihood label.
/// All comparisons are strict (`>`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LikelihoodRules {
    /// HIGH when dense% exceeds this.
    pub high_dense_pct: f32,
    /// MODERATE when dense% exceeds this …
    pub moderate_dense_pct: f32,
    /// … or dense% + medium% exceeds this.
    pub moderate_combined_pct: f32,
    pub low: LowRule,
}

impl Default for LikelihoodRules {
    fn default() -> Self {
        Self {
            high_dense_pct: 30.0,
            moderate_dense_pct: 15.0,
            moderate_combined_pct: 40.0,
            low: LowRule::default(),
        }
    }
}

impl LikelihoodRules {
    pub fn assess(&self, pct: &TierPercentages) -> Likelihood {
        if pct.dense > self.high_dense_pct {
            Likelihood::High
        } else if pct.dense > self.moderate_dense_pct
            || pct.dense + pct.medium > self.moderate_combined_pct
        {
            Likelihood::Moderate
        } else if self.low_applies(pct) {
            Likelihood::Low
        } else {
            Likelihood::Unlikely
        }
    }

    fn low_applies(&self, pct: &TierPercentages) -> bool {
        match self.low {
            LowRule::TotalCloud { pct: cutoff } => pct.cloudy() > cutoff,
            LowRule::DenseOrMedium { dense_pct, medium_pct } => {
                pct.dense > dense_pct || pct.medium > medium_pct
            }
        }
    }
}

/// Aggregated statistics for one region.
#[derive(Debug, Clone, Serialize)]
pub struct RegionStats {
    pub name: String,
    pub description: Option<String>,
    pub percentages: TierPercentages,
    pub mean_brightness: f32,
    pub likelihood: Likelihood,
    /// Crop rectangle in data-region coordinates; empty if degenerate.
    pub rect: PixelRect,
}

impl RegionStats {
    pub fn short_name(&self) -> &str {
        crate::region::short_name(&self.name)
    }

    pub fn dense_pct(&self) -> f32 {
        self.percentages.dense
    }

    pub fn medium_pct(&self) -> f32 {
        self.percentages.medium
    }
}

/// Coverage over the whole data region.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SceneStats {
    pub percentages: TierPercentages,
    pub mean_brightness: f32,
}

pub fn scene_stats(tiers: &TierMap, data: &BrightnessField) -> SceneStats {
    SceneStats {
        percentages: tiers.counts().percentages(),
        mean_brightness: data.mean(),
    }
}

/// Crop `region` out of the classified data region and summarise it.
///
/// `tiers` and `data` are header-free and share the shape
/// `bounds.width × bounds.data_height()`. A degenerate crop yields zero
/// statistics instead of an error; only `BoundsPolicy::Strict` can fail.
pub fn aggregate_region(
    region: &Region,
    bounds: &GeoBounds,
    tiers: &TierMap,
    data: &BrightnessField,
    rules: &LikelihoodRules,
    policy: BoundsPolicy,
) -> Result<RegionStats> {
    let rect = bounds.region_rect(region.lat_range, region.lon_range, policy)?;

    let (percentages, mean_brightness) = if rect.is_empty() {
        log::warn!(
            "Region '{}' crops to an empty rectangle {:?}; reporting zero coverage",
            region.short_name(),
            rect
        );
        (TierPercentages::default(), 0.0)
    } else {
        log::debug!(
            "Region '{}' → x {}..{}, y {}..{} ({} px)",
            region.short_name(),
            rect.x0,
            rect.x1,
            rect.y0,
            rect.y1,
            rect.area()
        );
        (tiers.counts_in(rect).percentages(), data.window_mean(rect))
    };

    Ok(RegionStats {
        name: region.name.clone(),
        description: region.description.clone(),
        percentages,
        mean_brightness,
        likelihood: rules.assess(&percentages),
        rect,
    })
}

/// Order by likelihood severity (HIGH first), then by dense% descending.
/// Stable, so equal keys keep their declaration order.
pub fn rank(results: &mut [RegionStats]) {
    results.sort_by(|a, b| {
        a.likelihood
            .rank()
            .cmp(&b.likelihood.rank())
            .then_with(|| b.dense_pct().total_cmp(&a.dense_pct()))
    });
}
