//! Two-panel overlay: original frame on the left, analysis on the right,
//! colour legend strip underneath.

use std::fs;
use std::path::Path;

use image::{Rgb, RgbImage};

use crate::aggregate::Likelihood;
use crate::brightness::SatelliteImage;
use crate::classify::CloudTier;
use crate::config::OverlayStyle;
use crate::error::{Error, Result};
use crate::font::{draw_text, text_width, GLYPH_H, LINE};
use crate::pipeline::Analysis;

const GUTTER: u32 = 10;
const LEGEND_HEIGHT: u32 = 24;
const SWATCH: u32 = 16;
const BOX_THICKNESS: u32 = 2;
const DASH: u32 = 6;
const TAG: u32 = 8;
const LABEL_PAD: u32 = 1;

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
const HEADER_GRAY: Rgb<u8> = Rgb([40, 40, 40]);

// ── Drawing helpers ───────────────────────────────────────────────────────────

fn blit(canvas: &mut RgbImage, src: &RgbImage, x_off: u32, y_off: u32) {
    for (x, y, px) in src.enumerate_pixels() {
        canvas.put_pixel(x + x_off, y + y_off, *px);
    }
}

/// Fill `[x0, x1) × [y0, y1)`, clipped to the canvas.
fn fill_rect(canvas: &mut RgbImage, x0: u32, y0: u32, x1: u32, y1: u32, color: Rgb<u8>) {
    let x1 = x1.min(canvas.width());
    let y1 = y1.min(canvas.height());
    for y in y0..y1 {
        for x in x0..x1 {
            canvas.put_pixel(x, y, color);
        }
    }
}

/// Dashed outline just inside `[x0, x1) × [y0, y1)`.
fn dashed_rect(canvas: &mut RgbImage, x0: u32, y0: u32, x1: u32, y1: u32, color: Rgb<u8>) {
    let x1 = x1.min(canvas.width());
    let y1 = y1.min(canvas.height());
    if x1 <= x0 || y1 <= y0 {
        return;
    }
    let on = |i: u32| (i / DASH) % 2 == 0;
    for t in 0..BOX_THICKNESS {
        for x in x0..x1 {
            if on(x - x0) {
                if y0 + t < y1 {
                    canvas.put_pixel(x, y0 + t, color);
                }
                if y1 >= y0 + t + 1 {
                    canvas.put_pixel(x, y1 - 1 - t, color);
                }
            }
        }
        for y in y0..y1 {
            if on(y - y0) {
                if x0 + t < x1 {
                    canvas.put_pixel(x0 + t, y, color);
                }
                if x1 >= x0 + t + 1 {
                    canvas.put_pixel(x1 - 1 - t, y, color);
                }
            }
        }
    }
}

/// Stacked text lines on a black backing, top-left at `(x, y)`.
fn label(canvas: &mut RgbImage, x: u32, y: u32, lines: &[&str], color: Rgb<u8>) {
    let w = lines.iter().map(|l| text_width(l)).max().unwrap_or(0);
    let h = (lines.len() as u32).saturating_sub(1) * LINE + GLYPH_H;
    fill_rect(
        canvas,
        x.saturating_sub(LABEL_PAD),
        y.saturating_sub(LABEL_PAD),
        x + w + LABEL_PAD,
        y + h + LABEL_PAD,
        BLACK,
    );
    for (i, line) in lines.iter().enumerate() {
        draw_text(canvas, x, y + i as u32 * LINE, line, color);
    }
}

/// Swatch + caption per entry, left to right along the bottom strip.
fn legend(canvas: &mut RgbImage, x_off: u32, entries: &[([u8; 3], &str)]) {
    let strip = canvas.height() - LEGEND_HEIGHT;
    let swatch_y = strip + (LEGEND_HEIGHT - SWATCH) / 2;
    let text_y = strip + (LEGEND_HEIGHT - GLYPH_H) / 2;
    let mut x = x_off + 4;
    for &(c, caption) in entries {
        fill_rect(canvas, x, swatch_y, x + SWATCH, swatch_y + SWATCH, Rgb(c));
        x += SWATCH + 4;
        draw_text(canvas, x, text_y, caption, BLACK);
        x += text_width(caption) + 10;
    }
}

// ── Panels ────────────────────────────────────────────────────────────────────

/// Tier colours under a neutral header band.
fn classified_panel(analysis: &Analysis) -> RgbImage {
    let b = &analysis.bounds;
    let header = b.header_height as u32;
    let mut panel = RgbImage::from_pixel(b.width as u32, b.height as u32, HEADER_GRAY);
    let tiers = &analysis.tiers;
    for r in 0..tiers.height {
        for c in 0..tiers.width {
            let px = Rgb(tiers.get(r, c).color());
            panel.put_pixel(c as u32, r as u32 + header, px);
        }
    }
    panel
}

/// Original frame with each region outlined in its likelihood colour and
/// labelled with its short name and likelihood.
fn annotated_panel(image: &SatelliteImage, analysis: &Analysis) -> RgbImage {
    let header = analysis.bounds.header_height as u32;
    let mut panel = image.original.clone();
    for r in &analysis.regions {
        if r.rect.is_empty() {
            continue;
        }
        let color = Rgb(r.likelihood.color());
        let (x0, y0) = (r.rect.x0 as u32, r.rect.y0 as u32 + header);
        let (x1, y1) = (r.rect.x1 as u32, r.rect.y1 as u32 + header);
        dashed_rect(&mut panel, x0, y0, x1, y1, color);
        let tag = TAG.min(x1 - x0).min(y1 - y0);
        fill_rect(&mut panel, x0, y0, x0 + tag, y0 + tag, color);
        label(
            &mut panel,
            x0 + tag + 2,
            y0 + BOX_THICKNESS + LABEL_PAD,
            &[r.short_name(), r.likelihood.label()],
            color,
        );
    }
    panel
}

/// Compose the two-panel overlay for `analysis`.
pub fn render_overlay(image: &SatelliteImage, analysis: &Analysis, style: OverlayStyle) -> RgbImage {
    let (w, h) = (image.original.width(), image.original.height());
    let mut canvas = RgbImage::from_pixel(2 * w + GUTTER, h + LEGEND_HEIGHT, WHITE);

    blit(&mut canvas, &image.original, 0, 0);

    let (panel, entries): (RgbImage, Vec<([u8; 3], &str)>) = match style {
        OverlayStyle::Classified => (
            classified_panel(analysis),
            CloudTier::ALL.iter().map(|t| (t.color(), t.label())).collect(),
        ),
        OverlayStyle::Annotated => (
            annotated_panel(image, analysis),
            Likelihood::ALL.iter().map(|l| (l.color(), l.label())).collect(),
        ),
    };
    blit(&mut canvas, &panel, w + GUTTER, 0);
    legend(&mut canvas, w + GUTTER, &entries);
    canvas
}

/// Write `img` to `path`; the format follows the extension.
pub fn save_overlay(img: &RgbImage, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| Error::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    img.save(path).map_err(|source| Error::Image {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!("Visualization saved to {}", path.display());
    Ok(())
}
