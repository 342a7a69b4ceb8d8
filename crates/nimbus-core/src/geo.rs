/// Geographic ↔ pixel mapping for north-up equirectangular imagery.
/// All coordinate math uses f64 for precision.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A point in geographic coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    /// Latitude in degrees, positive north.
    pub lat: f64,
    /// Longitude in degrees, positive east.
    pub lon: f64,
}

impl LatLon {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Integer pixel position in full-image coordinates (header band included).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PixelCoord {
    pub x: i64,
    pub y: i64,
}

/// Half-open pixel rectangle `[x0, x1) × [y0, y1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PixelRect {
    pub x0: usize,
    pub y0: usize,
    pub x1: usize,
    pub y1: usize,
}

impl PixelRect {
    pub fn new(x0: usize, y0: usize, x1: usize, y1: usize) -> Self {
        Self { x0, y0, x1, y1 }
    }

    pub fn width(&self) -> usize {
        self.x1.saturating_sub(self.x0)
    }

    pub fn height(&self) -> usize {
        self.y1.saturating_sub(self.y0)
    }

    pub fn area(&self) -> usize {
        self.width() * self.height()
    }

    /// Zero width or zero height.
    pub fn is_empty(&self) -> bool {
        self.area() == 0
    }
}

/// Declared geographic extent of an image plus the height of its
/// non-data header band, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoExtent {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
    pub header_height: usize,
}

impl Default for GeoExtent {
    /// Asia sector thermal-IR product: 5°S–45°N, 50°E–105°E, 80 px title band.
    fn default() -> Self {
        Self {
            lat_min: -5.0,
            lat_max: 45.0,
            lon_min: 50.0,
            lon_max: 105.0,
            header_height: 80,
        }
    }
}

impl GeoExtent {
    pub fn validate(&self) -> Result<()> {
        let finite = [self.lat_min, self.lat_max, self.lon_min, self.lon_max]
            .iter()
            .all(|v| v.is_finite());
        if !finite {
            return Err(Error::Config("extent bounds must be finite".into()));
        }
        if self.lat_min >= self.lat_max {
            return Err(Error::Config(format!(
                "lat_min ({}) must be below lat_max ({})",
                self.lat_min, self.lat_max
            )));
        }
        if self.lon_min >= self.lon_max {
            return Err(Error::Config(format!(
                "lon_min ({}) must be below lon_max ({})",
                self.lon_min, self.lon_max
            )));
        }
        Ok(())
    }

    pub fn contains(&self, ll: LatLon) -> bool {
        ll.lat >= self.lat_min
            && ll.lat <= self.lat_max
            && ll.lon >= self.lon_min
            && ll.lon <= self.lon_max
    }
}

/// What to do with geographic queries that fall outside the extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundsPolicy {
    /// Snap to the nearest edge pixel.
    #[default]
    Clamp,
    /// Fail with `Error::OutOfBounds`.
    Strict,
}

/// Affine mapping between geographic and pixel coordinates for one image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoBounds {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
    pub header_height: usize,
    pub pixels_per_degree_lat: f64,
    pub pixels_per_degree_lon: f64,
    /// Full image width in pixels.
    pub width: usize,
    /// Full image height in pixels, header included.
    pub height: usize,
}

impl GeoBounds {
    /// Derive the mapping for a `width × height` image.
    /// `height` must exceed `extent.header_height`.
    pub fn new(extent: &GeoExtent, width: usize, height: usize) -> Result<Self> {
        extent.validate()?;
        if width == 0 || height <= extent.header_height {
            return Err(Error::EmptyImage {
                header_height: extent.header_height,
                height,
            });
        }
        let data_height = height - extent.header_height;
        Ok(Self {
            lat_min: extent.lat_min,
            lat_max: extent.lat_max,
            lon_min: extent.lon_min,
            lon_max: extent.lon_max,
            header_height: extent.header_height,
            pixels_per_degree_lat: data_height as f64 / (extent.lat_max - extent.lat_min),
            pixels_per_degree_lon: width as f64 / (extent.lon_max - extent.lon_min),
            width,
            height,
        })
    }

    pub fn data_height(&self) -> usize {
        self.height - self.header_height
    }

    pub fn extent(&self) -> GeoExtent {
        GeoExtent {
            lat_min: self.lat_min,
            lat_max: self.lat_max,
            lon_min: self.lon_min,
            lon_max: self.lon_max,
            header_height: self.header_height,
        }
    }

    /// Fractional pixel position (x, y) of `ll`. Not bounds-checked.
    pub fn to_pixel_f(&self, ll: LatLon) -> (f64, f64) {
        let x = (ll.lon - self.lon_min) * self.pixels_per_degree_lon;
        let y = self.header_height as f64 + (self.lat_max - ll.lat) * self.pixels_per_degree_lat;
        (x, y)
    }

    /// Pixel containing `ll`. May lie outside the image.
    pub fn to_pixel(&self, ll: LatLon) -> PixelCoord {
        let (x, y) = self.to_pixel_f(ll);
        PixelCoord {
            x: x.floor() as i64,
            y: y.floor() as i64,
        }
    }

    /// Pixel containing `ll`, snapped into the data region of the image.
    pub fn to_pixel_clamped(&self, ll: LatLon) -> PixelCoord {
        let p = self.to_pixel(ll);
        PixelCoord {
            x: p.x.clamp(0, self.width as i64 - 1),
            y: p.y.clamp(self.header_height as i64, self.height as i64 - 1),
        }
    }

    /// Pixel containing `ll`, or `Error::OutOfBounds` outside the extent.
    pub fn to_pixel_strict(&self, ll: LatLon) -> Result<PixelCoord> {
        if !self.extent().contains(ll) {
            return Err(Error::OutOfBounds {
                lat: ll.lat,
                lon: ll.lon,
            });
        }
        Ok(self.to_pixel_clamped(ll))
    }

    /// Geographic position of a (possibly fractional) pixel position.
    pub fn to_latlon_f(&self, x: f64, y: f64) -> LatLon {
        LatLon {
            lat: self.lat_max - (y - self.header_height as f64) / self.pixels_per_degree_lat,
            lon: self.lon_min + x / self.pixels_per_degree_lon,
        }
    }

    /// Geographic position of the top-left corner of pixel `p`.
    pub fn to_latlon(&self, p: PixelCoord) -> LatLon {
        self.to_latlon_f(p.x as f64, p.y as f64)
    }

    /// Crop rectangle of a lat/lon box in data-region coordinates
    /// (row 0 = first row below the header), clamped to the data region.
    ///
    /// Ranges are `(low, high)`. The result is empty when the box misses the
    /// image or its ranges are inverted.
    pub fn region_rect(
        &self,
        lat_range: (f64, f64),
        lon_range: (f64, f64),
        policy: BoundsPolicy,
    ) -> Result<PixelRect> {
        let nw = LatLon::new(lat_range.1, lon_range.0);
        let se = LatLon::new(lat_range.0, lon_range.1);

        if policy == BoundsPolicy::Strict {
            for corner in [nw, se] {
                if !self.extent().contains(corner) {
                    return Err(Error::OutOfBounds {
                        lat: corner.lat,
                        lon: corner.lon,
                    });
                }
            }
        }

        // Clamp while still in f64: far-away corners would saturate an
        // integer cast and overflow the header offset.
        let snap = |v: f64, hi: usize| v.floor().clamp(0.0, hi as f64) as usize;
        let header = self.header_height as f64;
        let (fx0, fy0) = self.to_pixel_f(nw);
        let (fx1, fy1) = self.to_pixel_f(se);

        let x0 = snap(fx0, self.width);
        let x1 = snap(fx1, self.width);
        let y0 = snap(fy0 - header, self.data_height());
        let y1 = snap(fy1 - header, self.data_height());

        Ok(PixelRect {
            x0,
            y0,
            x1: x1.max(x0),
            y1: y1.max(y0),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn sector_bounds() -> GeoBounds {
        // 1100 px wide over 55°, 1000 data rows over 50° → 20 px/° both ways.
        GeoBounds::new(&GeoExtent::default(), 1100, 1080).unwrap()
    }

    #[test]
    fn pixels_per_degree_excludes_header() {
        let b = sector_bounds();
        assert_abs_diff_eq!(b.pixels_per_degree_lon, 20.0);
        assert_abs_diff_eq!(b.pixels_per_degree_lat, 20.0);
        assert_eq!(b.data_height(), 1000);
    }

    #[test]
    fn corners_map_to_image_corners() {
        let b = sector_bounds();
        assert_eq!(b.to_pixel(LatLon::new(45.0, 50.0)), PixelCoord { x: 0, y: 80 });
        let se = b.to_pixel_f(LatLon::new(-5.0, 105.0));
        assert_abs_diff_eq!(se.0, 1100.0);
        assert_abs_diff_eq!(se.1, 1080.0);
    }

    #[test]
    fn roundtrip_within_one_pixel() {
        let b = sector_bounds();
        let mut rng_state: u64 = 42;
        let mut next = || {
            rng_state = rng_state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            rng_state as f64 / u64::MAX as f64
        };
        for _ in 0..1000 {
            // Strictly inside the extent.
            let lat = -5.0 + 0.001 + next() * 49.998;
            let lon = 50.0 + 0.001 + next() * 54.998;
            let ll = LatLon::new(lat, lon);

            let back = b.to_latlon(b.to_pixel(ll));
            assert!((back.lat - lat).abs() <= 1.0 / b.pixels_per_degree_lat + 1e-9);
            assert!((back.lon - lon).abs() <= 1.0 / b.pixels_per_degree_lon + 1e-9);

            let px = b.to_pixel(ll);
            let again = b.to_pixel(b.to_latlon(px));
            assert!((again.x - px.x).abs() <= 1, "x {} vs {}", again.x, px.x);
            assert!((again.y - px.y).abs() <= 1, "y {} vs {}", again.y, px.y);
        }
    }

    #[test]
    fn out_of_extent_points_clamp_to_edge() {
        let b = sector_bounds();
        let p = b.to_pixel_clamped(LatLon::new(80.0, 10.0));
        assert_eq!(p, PixelCoord { x: 0, y: 80 });
        let p = b.to_pixel_clamped(LatLon::new(-40.0, 170.0));
        assert_eq!(p, PixelCoord { x: 1099, y: 1079 });
    }

    #[test]
    fn strict_lookup_rejects_out_of_extent() {
        let b = sector_bounds();
        assert!(matches!(
            b.to_pixel_strict(LatLon::new(60.0, 70.0)),
            Err(Error::OutOfBounds { .. })
        ));
        assert!(b.to_pixel_strict(LatLon::new(20.0, 70.0)).is_ok());
    }

    #[test]
    fn region_rect_is_in_data_coordinates() {
        let b = sector_bounds();
        let r = b
            .region_rect((30.0, 40.0), (70.0, 82.0), BoundsPolicy::Clamp)
            .unwrap();
        assert_eq!(r, PixelRect::new(400, 100, 640, 300));
    }

    #[test]
    fn region_outside_image_is_degenerate() {
        let b = sector_bounds();
        let r = b
            .region_rect((50.0, 60.0), (70.0, 82.0), BoundsPolicy::Clamp)
            .unwrap();
        assert!(r.is_empty());
        let inverted = b
            .region_rect((40.0, 30.0), (70.0, 82.0), BoundsPolicy::Clamp)
            .unwrap();
        assert!(inverted.is_empty());
    }

    #[test]
    fn partial_overlap_is_clipped_to_data_region() {
        let b = sector_bounds();
        let north = b
            .region_rect((40.0, 50.0), (70.0, 82.0), BoundsPolicy::Clamp)
            .unwrap();
        assert_eq!(north, PixelRect::new(400, 0, 640, 100));

        let south_east = b
            .region_rect((-10.0, 0.0), (100.0, 110.0), BoundsPolicy::Clamp)
            .unwrap();
        assert_eq!(south_east, PixelRect::new(1000, 900, 1100, 1000));
    }

    #[test]
    fn extreme_ranges_clamp_without_overflow() {
        let b = sector_bounds();
        let r = b
            .region_rect((0.0, 1e300), (70.0, 82.0), BoundsPolicy::Clamp)
            .unwrap();
        assert_eq!(r, PixelRect::new(400, 0, 640, 900));

        let whole = b
            .region_rect((-1e300, 1e300), (-1e300, 1e300), BoundsPolicy::Clamp)
            .unwrap();
        assert_eq!(whole, PixelRect::new(0, 0, 1100, 1000));

        let p = b.to_pixel_clamped(LatLon::new(1e300, -1e300));
        assert_eq!(p, PixelCoord { x: 0, y: 80 });
    }

    #[test]
    fn strict_region_rect_rejects_partial_overlap() {
        let b = sector_bounds();
        let res = b.region_rect((40.0, 50.0), (70.0, 82.0), BoundsPolicy::Strict);
        assert!(matches!(res, Err(Error::OutOfBounds { .. })));
    }

    #[test]
    fn header_taller_than_image_is_rejected() {
        let res = GeoBounds::new(&GeoExtent::default(), 100, 80);
        assert!(matches!(res, Err(Error::EmptyImage { .. })));
    }
}
