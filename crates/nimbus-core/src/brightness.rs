use std::path::Path;

use image::{DynamicImage, ImageReader, RgbImage};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geo::PixelRect;

/// A 2D brightness raster, values 0–255 stored as f32, row-major.
/// Row 0 is the top (northern) edge of the image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrightnessField {
    pub data: Vec<f32>,
    pub width: usize,
    pub height: usize,
}

impl BrightnessField {
    /// Create a field filled with the given value.
    pub fn new(width: usize, height: usize, fill: f32) -> Self {
        Self {
            data: vec![fill; width * height],
            width,
            height,
        }
    }

    /// Collapse a decoded raster to one brightness scalar per pixel.
    ///
    /// Grayscale inputs use their luma channel; colour inputs use the mean
    /// of R, G and B. Alpha is ignored. 16-bit and float rasters are scaled
    /// to the 0–255 range.
    pub fn from_dynamic(img: &DynamicImage) -> Self {
        let (width, height) = (img.width() as usize, img.height() as usize);
        let data: Vec<f32> = match img {
            DynamicImage::ImageLuma8(_) | DynamicImage::ImageLumaA8(_) => img
                .to_luma8()
                .pixels()
                .map(|p| f32::from(p.0[0]))
                .collect(),
            DynamicImage::ImageLuma16(_) | DynamicImage::ImageLumaA16(_) => img
                .to_luma16()
                .pixels()
                .map(|p| f32::from(p.0[0]) / 257.0)
                .collect(),
            DynamicImage::ImageRgb8(_) | DynamicImage::ImageRgba8(_) => img
                .to_rgb8()
                .pixels()
                .map(|p| {
                    let [r, g, b] = p.0;
                    (u16::from(r) + u16::from(g) + u16::from(b)) as f32 / 3.0
                })
                .collect(),
            _ => img
                .to_rgb32f()
                .pixels()
                .map(|p| {
                    let [r, g, b] = p.0;
                    (r + g + b) / 3.0 * 255.0
                })
                .collect(),
        };
        Self { data, width, height }
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.data[row * self.width + col]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, val: f32) {
        self.data[row * self.width + col] = val;
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Mean brightness, 0 for an empty field.
    pub fn mean(&self) -> f32 {
        if self.is_empty() {
            return 0.0;
        }
        (self.data.iter().map(|&v| f64::from(v)).sum::<f64>() / self.len() as f64) as f32
    }

    /// Values inside `rect`, row by row. The rectangle must lie within the field.
    pub fn window(&self, rect: PixelRect) -> impl Iterator<Item = f32> + '_ {
        (rect.y0..rect.y1).flat_map(move |r| {
            let start = r * self.width;
            self.data[start + rect.x0..start + rect.x1].iter().copied()
        })
    }

    /// Mean brightness inside `rect`, 0 for an empty rectangle.
    pub fn window_mean(&self, rect: PixelRect) -> f32 {
        if rect.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.window(rect).map(f64::from).sum();
        (sum / rect.area() as f64) as f32
    }

    /// Drop the top `header_height` rows.
    pub fn without_header(&self, header_height: usize) -> Result<Self> {
        if header_height >= self.height {
            return Err(Error::EmptyImage {
                header_height,
                height: self.height,
            });
        }
        Ok(Self {
            data: self.data[header_height * self.width..].to_vec(),
            width: self.width,
            height: self.height - header_height,
        })
    }

    /// Render as an RGB grayscale raster.
    pub fn to_rgb_image(&self) -> RgbImage {
        let mut img = RgbImage::new(self.width as u32, self.height as u32);
        for (i, px) in img.pixels_mut().enumerate() {
            let c = self.data[i].round().clamp(0.0, 255.0) as u8;
            *px = image::Rgb([c, c, c]);
        }
        img
    }
}

/// A loaded satellite frame: the raster as decoded, for display, and its
/// full-height brightness field, header band included.
#[derive(Debug, Clone)]
pub struct SatelliteImage {
    pub original: RgbImage,
    pub brightness: BrightnessField,
}

impl SatelliteImage {
    /// Decode the image at `path`. The format is sniffed from the content.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        log::info!("Loading image: {}", path.display());
        let reader = ImageReader::open(path)
            .and_then(|r| r.with_guessed_format())
            .map_err(|source| Error::Io {
                path: path.to_path_buf(),
                source,
            })?;
        let img = reader.decode().map_err(|source| Error::Image {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("Decoded {}×{} {:?}", img.width(), img.height(), img.color());
        Ok(Self::from_dynamic(&img))
    }

    pub fn from_dynamic(img: &DynamicImage) -> Self {
        Self {
            original: img.to_rgb8(),
            brightness: BrightnessField::from_dynamic(img),
        }
    }

    /// Wrap an in-memory brightness array.
    pub fn from_gray(field: BrightnessField) -> Self {
        Self {
            original: field.to_rgb_image(),
            brightness: field,
        }
    }

    pub fn width(&self) -> usize {
        self.brightness.width
    }

    pub fn height(&self) -> usize {
        self.brightness.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use image::{GrayImage, Luma, Rgb};

    #[test]
    fn rgb_is_reduced_to_channel_mean() {
        let mut img = RgbImage::new(2, 1);
        img.put_pixel(0, 0, Rgb([30, 60, 90]));
        img.put_pixel(1, 0, Rgb([255, 255, 255]));
        let field = BrightnessField::from_dynamic(&DynamicImage::ImageRgb8(img));
        assert_abs_diff_eq!(field.get(0, 0), 60.0);
        assert_abs_diff_eq!(field.get(0, 1), 255.0);
    }

    #[test]
    fn grayscale_is_used_directly() {
        let img = GrayImage::from_pixel(3, 2, Luma([200]));
        let field = BrightnessField::from_dynamic(&DynamicImage::ImageLuma8(img));
        assert_eq!((field.width, field.height), (3, 2));
        assert!(field.data.iter().all(|&v| v == 200.0));
    }

    #[test]
    fn header_rows_are_removed() {
        let mut field = BrightnessField::new(2, 4, 0.0);
        for r in 0..4 {
            for c in 0..2 {
                field.set(r, c, r as f32);
            }
        }
        let data = field.without_header(1).unwrap();
        assert_eq!(data.height, 3);
        assert_eq!(data.len(), 6);
        assert_eq!(data.get(0, 0), 1.0);
        assert_eq!(data.get(2, 1), 3.0);
    }

    #[test]
    fn header_covering_everything_is_an_error() {
        let field = BrightnessField::new(2, 4, 0.0);
        assert!(matches!(
            field.without_header(4),
            Err(Error::EmptyImage { header_height: 4, height: 4 })
        ));
    }

    #[test]
    fn window_mean_covers_only_the_rectangle() {
        let mut field = BrightnessField::new(4, 4, 10.0);
        field.set(1, 1, 50.0);
        let rect = PixelRect::new(1, 1, 3, 3);
        assert_eq!(field.window(rect).count(), 4);
        assert_abs_diff_eq!(field.window_mean(rect), 20.0);
        assert_eq!(field.window_mean(PixelRect::new(2, 2, 2, 4)), 0.0);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let res = SatelliteImage::open("/nonexistent/frame.jpg");
        assert!(matches!(res, Err(Error::Io { .. })));
    }
}
