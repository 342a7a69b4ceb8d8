//! Pointwise cloud-tier classification of thermal-IR brightness.
//!
//! In thermal IR, bright (white) pixels are cold cloud tops. The colder the
//! top, the deeper the convection and the higher the rain potential:
//!   - Dense : deep convective cloud
//!   - Medium: moderate cloud
//!   - Low   : thin / low cloud
//!   - Clear : surface or warm cloud

use serde::{Deserialize, Serialize};

use crate::brightness::BrightnessField;
use crate::error::{Error, Result};
use crate::geo::PixelRect;

/// Ordinal cloud-density tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CloudTier {
    Clear = 0,
    Low = 1,
    Medium = 2,
    Dense = 3,
}

impl CloudTier {
    /// Densest first, the legend order.
    pub const ALL: [CloudTier; 4] = [
        CloudTier::Dense,
        CloudTier::Medium,
        CloudTier::Low,
        CloudTier::Clear,
    ];

    pub fn ordinal(self) -> u8 {
        self as u8
    }

    pub fn label(self) -> &'static str {
        match self {
            CloudTier::Dense => "DENSE",
            CloudTier::Medium => "MEDIUM",
            CloudTier::Low => "LOW",
            CloudTier::Clear => "CLEAR",
        }
    }

    /// Overlay colour: red → orange → yellow → dark green.
    pub fn color(self) -> [u8; 3] {
        match self {
            CloudTier::Dense => [255, 0, 0],
            CloudTier::Medium => [255, 165, 0],
            CloudTier::Low => [255, 255, 0],
            CloudTier::Clear => [0, 100, 0],
        }
    }
}

/// Which side of a cutoff a value equal to it falls on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdEdge {
    /// `v >= cutoff` belongs to the upper tier.
    #[default]
    AtOrAbove,
    /// `v > cutoff` belongs to the upper tier.
    Above,
}

impl ThresholdEdge {
    #[inline]
    pub fn reaches(self, v: f32, cutoff: f32) -> bool {
        match self {
            ThresholdEdge::AtOrAbove => v >= cutoff,
            ThresholdEdge::Above => v > cutoff,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            ThresholdEdge::AtOrAbove => "≥",
            ThresholdEdge::Above => ">",
        }
    }
}

/// Brightness cutoffs separating the tiers. Must satisfy `dense > medium > low`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub dense: f32,
    pub medium: f32,
    pub low: f32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            dense: 200.0,
            medium: 160.0,
            low: 120.0,
        }
    }
}

impl Thresholds {
    pub fn validate(&self) -> Result<()> {
        if ![self.dense, self.medium, self.low].iter().all(|v| v.is_finite()) {
            return Err(Error::Config("thresholds must be finite".into()));
        }
        if !(self.dense > self.medium && self.medium > self.low) {
            return Err(Error::Config(format!(
                "thresholds must be strictly ordered dense > medium > low, got {} / {} / {}",
                self.dense, self.medium, self.low
            )));
        }
        Ok(())
    }

    /// Tier of a single brightness value.
    #[inline]
    pub fn tier(&self, v: f32, edge: ThresholdEdge) -> CloudTier {
        if edge.reaches(v, self.dense) {
            CloudTier::Dense
        } else if edge.reaches(v, self.medium) {
            CloudTier::Medium
        } else if edge.reaches(v, self.low) {
            CloudTier::Low
        } else {
            CloudTier::Clear
        }
    }
}

/// Per-pixel tiers, row-major, same shape as the classified field.
#[derive(Debug, Clone)]
pub struct TierMap {
    pub tiers: Vec<CloudTier>,
    pub width: usize,
    pub height: usize,
}

impl TierMap {
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> CloudTier {
        self.tiers[row * self.width + col]
    }

    pub fn counts(&self) -> TierCounts {
        self.counts_in(PixelRect::new(0, 0, self.width, self.height))
    }

    /// Tier histogram inside `rect`. The rectangle must lie within the map.
    pub fn counts_in(&self, rect: PixelRect) -> TierCounts {
        let mut counts = TierCounts::default();
        for r in rect.y0..rect.y1 {
            let start = r * self.width;
            for &t in &self.tiers[start + rect.x0..start + rect.x1] {
                counts.add(t);
            }
        }
        counts
    }
}

/// Classify every pixel of `field`. No neighbourhood smoothing.
pub fn classify(field: &BrightnessField, thresholds: &Thresholds, edge: ThresholdEdge) -> TierMap {
    TierMap {
        tiers: field.data.iter().map(|&v| thresholds.tier(v, edge)).collect(),
        width: field.width,
        height: field.height,
    }
}

/// Pixel counts per tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TierCounts {
    pub clear: usize,
    pub low: usize,
    pub medium: usize,
    pub dense: usize,
}

impl TierCounts {
    #[inline]
    pub fn add(&mut self, tier: CloudTier) {
        match tier {
            CloudTier::Clear => self.clear += 1,
            CloudTier::Low => self.low += 1,
            CloudTier::Medium => self.medium += 1,
            CloudTier::Dense => self.dense += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.clear + self.low + self.medium + self.dense
    }

    /// Share of each tier in percent. All zero when nothing was counted.
    pub fn percentages(&self) -> TierPercentages {
        let total = self.total();
        if total == 0 {
            return TierPercentages::default();
        }
        let pct = |n: usize| n as f32 / total as f32 * 100.0;
        TierPercentages {
            clear: pct(self.clear),
            low: pct(self.low),
            medium: pct(self.medium),
            dense: pct(self.dense),
        }
    }
}

/// Tier shares in percent (0–100).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TierPercentages {
    pub clear: f32,
    pub low: f32,
    pub medium: f32,
    pub dense: f32,
}

impl TierPercentages {
    /// Dense + medium + low.
    pub fn cloudy(&self) -> f32 {
        self.dense + self.medium + self.low
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn tiers_follow_cutoffs() {
        let t = Thresholds::default();
        let e = ThresholdEdge::AtOrAbove;
        assert_eq!(t.tier(0.0, e), CloudTier::Clear);
        assert_eq!(t.tier(119.9, e), CloudTier::Clear);
        assert_eq!(t.tier(120.0, e), CloudTier::Low);
        assert_eq!(t.tier(160.0, e), CloudTier::Medium);
        assert_eq!(t.tier(200.0, e), CloudTier::Dense);
        assert_eq!(t.tier(255.0, e), CloudTier::Dense);
        assert_eq!(t.tier(255.0, e).ordinal(), 3);
        assert_eq!(t.tier(0.0, e).ordinal(), 0);
    }

    #[test]
    fn strict_edge_moves_boundary_values_down() {
        let t = Thresholds::default();
        assert_eq!(t.tier(200.0, ThresholdEdge::Above), CloudTier::Medium);
        assert_eq!(t.tier(120.0, ThresholdEdge::Above), CloudTier::Clear);
        assert_eq!(t.tier(200.5, ThresholdEdge::Above), CloudTier::Dense);
    }

    #[test]
    fn tiers_are_monotonic_in_brightness() {
        let t = Thresholds::default();
        for edge in [ThresholdEdge::AtOrAbove, ThresholdEdge::Above] {
            let mut prev = CloudTier::Clear;
            for step in 0..=2550 {
                let tier = t.tier(step as f32 / 10.0, edge);
                assert!(tier >= prev, "tier dropped at v={}", step as f32 / 10.0);
                prev = tier;
            }
        }
    }

    #[test]
    fn unordered_thresholds_are_rejected() {
        let bad = Thresholds { dense: 150.0, medium: 160.0, low: 120.0 };
        assert!(matches!(bad.validate(), Err(Error::Config(_))));
        let equal = Thresholds { dense: 160.0, medium: 160.0, low: 120.0 };
        assert!(equal.validate().is_err());
        assert!(Thresholds::default().validate().is_ok());
    }

    #[test]
    fn counts_partition_the_window() {
        let mut field = BrightnessField::new(4, 2, 0.0);
        field.data = vec![0.0, 130.0, 170.0, 210.0, 255.0, 210.0, 10.0, 165.0];
        let map = classify(&field, &Thresholds::default(), ThresholdEdge::AtOrAbove);
        let counts = map.counts();
        assert_eq!(counts, TierCounts { clear: 2, low: 1, medium: 2, dense: 3 });

        let pct = counts.percentages();
        assert_abs_diff_eq!(pct.dense + pct.medium + pct.low + pct.clear, 100.0, epsilon = 1e-4);
        assert!(pct.cloudy() <= 100.0);

        let right = map.counts_in(PixelRect::new(2, 0, 4, 2));
        assert_eq!(right, TierCounts { clear: 1, low: 0, medium: 2, dense: 1 });
    }

    #[test]
    fn empty_counts_give_zero_percentages() {
        assert_eq!(TierCounts::default().percentages(), TierPercentages::default());
    }
}
