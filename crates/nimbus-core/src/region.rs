/// Named lat/lon boxes the aggregator reports on.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Name up to the first parenthesis, e.g. "Central India (MP)" → "Central India".
pub fn short_name(name: &str) -> &str {
    name.split('(').next().unwrap_or(name).trim()
}

/// A named geographic box. Ranges are `(low, high)` in degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub name: String,
    pub lat_range: (f64, f64),
    pub lon_range: (f64, f64),
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Region {
    pub fn new(name: &str, lat_range: (f64, f64), lon_range: (f64, f64)) -> Self {
        Self {
            name: name.to_string(),
            lat_range,
            lon_range,
            description: None,
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn short_name(&self) -> &str {
        short_name(&self.name)
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Config("region name must not be empty".into()));
        }
        let (lat_lo, lat_hi) = self.lat_range;
        let (lon_lo, lon_hi) = self.lon_range;
        if ![lat_lo, lat_hi, lon_lo, lon_hi].iter().all(|v| v.is_finite()) {
            return Err(Error::Config(format!(
                "region '{}' ranges must be finite",
                self.name
            )));
        }
        if lat_lo < -90.0 || lat_hi > 90.0 {
            return Err(Error::Config(format!(
                "region '{}' latitudes must lie within ±90°, got {:?}",
                self.name, self.lat_range
            )));
        }
        if !(lat_lo < lat_hi && lon_lo < lon_hi) {
            return Err(Error::Config(format!(
                "region '{}' ranges must be (low, high), got lat {:?} lon {:?}",
                self.name, self.lat_range, self.lon_range
            )));
        }
        Ok(())
    }
}

/// Ten boxes covering the subcontinent and adjoining seas.
pub fn sector_regions() -> Vec<Region> {
    vec![
        Region::new("North India (J&K, HP, Uttarakhand)", (30.0, 40.0), (70.0, 82.0)),
        Region::new("Northwest India (Punjab, Haryana, Rajasthan)", (25.0, 32.0), (70.0, 78.0)),
        Region::new("Northeast India", (22.0, 30.0), (88.0, 98.0)),
        Region::new("Central India (MP, Chhattisgarh)", (18.0, 26.0), (76.0, 85.0)),
        Region::new("Western India (Gujarat, Maharashtra)", (15.0, 25.0), (68.0, 76.0)),
        Region::new("South India (Karnataka, TN, Kerala)", (8.0, 18.0), (74.0, 82.0)),
        Region::new("Eastern India (Odisha, WB)", (18.0, 25.0), (82.0, 90.0)),
        Region::new("Arabian Sea", (5.0, 20.0), (55.0, 72.0)),
        Region::new("Bay of Bengal", (5.0, 20.0), (80.0, 95.0)),
        Region::new("Pakistan/Afghanistan", (25.0, 38.0), (60.0, 72.0)),
    ]
}

/// Six broader weather-system boxes, each with the areas it covers.
pub fn regional_regions() -> Vec<Region> {
    vec![
        Region::new("Northern India (Western Disturbance)", (28.0, 40.0), (70.0, 95.0))
            .with_description("J&K, Himachal, Uttarakhand, Punjab"),
        Region::new("Arabian Sea (Southwest)", (5.0, 15.0), (55.0, 72.0))
            .with_description("Kerala coast, Lakshadweep"),
        Region::new("Bay of Bengal (East)", (10.0, 22.0), (85.0, 100.0))
            .with_description("Andaman Islands, Coastal Odisha/Andhra"),
        Region::new("Southern Indian Ocean", (-5.0, 5.0), (70.0, 95.0))
            .with_description("Sri Lanka, Southern Tamil Nadu"),
        Region::new("Central India", (18.0, 26.0), (74.0, 84.0))
            .with_description("Maharashtra, MP, Chhattisgarh"),
        Region::new("Western Rajasthan", (24.0, 30.0), (68.0, 76.0))
            .with_description("Rajasthan desert region"),
    ]
}
