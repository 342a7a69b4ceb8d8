//! Built-in 5×7 bitmap font for overlay labels.
//!
//! Covers upper-case ASCII letters, digits and the punctuation that appears
//! in region names. Lower-case input is drawn upper-case; anything else is
//! drawn as a blank cell.

use image::{Rgb, RgbImage};

pub const GLYPH_W: u32 = 5;
pub const GLYPH_H: u32 = 7;
/// Horizontal distance between glyph origins.
pub const ADVANCE: u32 = GLYPH_W + 1;
/// Vertical distance between baselines of stacked lines.
pub const LINE: u32 = GLYPH_H + 2;

/// One row per byte, top first; bit 4 is the leftmost column.
fn glyph(c: char) -> [u8; 7] {
    match c.to_ascii_uppercase() {
        'A' => [0x0E, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'B' => [0x1E, 0x11, 0x11, 0x1E, 0x11, 0x11, 0x1E],
        'C' => [0x0E, 0x11, 0x10, 0x10, 0x10, 0x11, 0x0E],
        'D' => [0x1E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x1E],
        'E' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x1F],
        'F' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x10],
        'G' => [0x0E, 0x11, 0x10, 0x17, 0x11, 0x11, 0x0F],
        'H' => [0x11, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'I' => [0x0E, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0E],
        'J' => [0x07, 0x02, 0x02, 0x02, 0x02, 0x12, 0x0C],
        'K' => [0x11, 0x12, 0x14, 0x18, 0x14, 0x12, 0x11],
        'L' => [0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x1F],
        'M' => [0x11, 0x1B, 0x15, 0x15, 0x11, 0x11, 0x11],
        'N' => [0x11, 0x11, 0x19, 0x15, 0x13, 0x11, 0x11],
        'O' => [0x0E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'P' => [0x1E, 0x11, 0x11, 0x1E, 0x10, 0x10, 0x10],
        'Q' => [0x0E, 0x11, 0x11, 0x11, 0x15, 0x12, 0x0D],
        'R' => [0x1E, 0x11, 0x11, 0x1E, 0x14, 0x12, 0x11],
        'S' => [0x0F, 0x10, 0x10, 0x0E, 0x01, 0x01, 0x1E],
        'T' => [0x1F, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04],
        'U' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'V' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x0A, 0x04],
        'W' => [0x11, 0x11, 0x11, 0x15, 0x15, 0x15, 0x0A],
        'X' => [0x11, 0x11, 0x0A, 0x04, 0x0A, 0x11, 0x11],
        'Y' => [0x11, 0x11, 0x11, 0x0A, 0x04, 0x04, 0x04],
        'Z' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x10, 0x1F],
        '0' => [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E],
        '1' => [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E],
        '2' => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F],
        '3' => [0x1F, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0E],
        '4' => [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02],
        '5' => [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E],
        '6' => [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E],
        '7' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08],
        '8' => [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E],
        '9' => [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C],
        '/' => [0x01, 0x01, 0x02, 0x04, 0x08, 0x10, 0x10],
        '%' => [0x18, 0x19, 0x02, 0x04, 0x08, 0x13, 0x03],
        '&' => [0x0C, 0x12, 0x14, 0x08, 0x15, 0x12, 0x0D],
        '(' => [0x02, 0x04, 0x08, 0x08, 0x08, 0x04, 0x02],
        ')' => [0x08, 0x04, 0x02, 0x02, 0x02, 0x04, 0x08],
        '-' => [0x00, 0x00, 0x00, 0x1F, 0x00, 0x00, 0x00],
        '.' => [0x00, 0x00, 0x00, 0x00, 0x00, 0x0C, 0x0C],
        ',' => [0x00, 0x00, 0x00, 0x00, 0x0C, 0x04, 0x08],
        ':' => [0x00, 0x0C, 0x0C, 0x00, 0x0C, 0x0C, 0x00],
        _ => [0; 7],
    }
}

/// Pixel width of `text` drawn on one line.
pub fn text_width(text: &str) -> u32 {
    match text.chars().count() as u32 {
        0 => 0,
        n => n * ADVANCE - 1,
    }
}

/// Draw `text` with its top-left corner at `(x, y)`, clipped to the canvas.
pub fn draw_text(canvas: &mut RgbImage, x: u32, y: u32, text: &str, color: Rgb<u8>) {
    let (w, h) = canvas.dimensions();
    for (i, c) in text.chars().enumerate() {
        let gx = x + i as u32 * ADVANCE;
        if gx >= w {
            break;
        }
        for (row, bits) in glyph(c).iter().enumerate() {
            let py = y + row as u32;
            if py >= h {
                break;
            }
            for col in 0..GLYPH_W {
                let px = gx + col;
                if px < w && bits & (0x10 >> col) != 0 {
                    canvas.put_pixel(px, py, color);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
    const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

    fn lit(img: &RgbImage) -> usize {
        img.pixels().filter(|p| **p == BLACK).count()
    }

    #[test]
    fn width_counts_advance_without_trailing_gap() {
        assert_eq!(text_width(""), 0);
        assert_eq!(text_width("I"), 5);
        assert_eq!(text_width("HIGH"), 23);
    }

    #[test]
    fn glyph_bits_land_on_expected_pixels() {
        let mut img = RgbImage::from_pixel(12, 8, WHITE);
        draw_text(&mut img, 0, 0, "T-", BLACK);
        // Top bar of 'T'.
        for x in 0..5 {
            assert_eq!(*img.get_pixel(x, 0), BLACK);
        }
        assert_eq!(*img.get_pixel(2, 6), BLACK);
        assert_eq!(*img.get_pixel(0, 6), WHITE);
        // '-' starts one advance to the right, middle row only.
        assert_eq!(*img.get_pixel(6, 3), BLACK);
        assert_eq!(*img.get_pixel(6, 2), WHITE);
    }

    #[test]
    fn lowercase_matches_uppercase_and_unknown_is_blank() {
        let mut upper = RgbImage::from_pixel(30, 7, WHITE);
        let mut lower = upper.clone();
        draw_text(&mut upper, 0, 0, "STORM", BLACK);
        draw_text(&mut lower, 0, 0, "storm", BLACK);
        assert_eq!(upper, lower);

        let mut unknown = RgbImage::from_pixel(6, 7, WHITE);
        draw_text(&mut unknown, 0, 0, "#", BLACK);
        assert_eq!(lit(&unknown), 0);
    }

    #[test]
    fn text_past_the_edge_is_clipped() {
        let mut img = RgbImage::from_pixel(8, 4, WHITE);
        draw_text(&mut img, 4, 1, "MODERATE", BLACK);
        assert!(lit(&img) > 0);
        draw_text(&mut img, 100, 100, "X", BLACK);
    }
}
