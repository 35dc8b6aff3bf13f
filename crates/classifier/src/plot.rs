//! Confusion Matrix Heatmap

use crate::metrics::ConfusionMatrix;
use crate::{ensure_parent, ClassifierError};
use image::{Rgb, RgbImage};
use std::path::Path;
use tracing::info;

const CELL: u32 = 80;
const MARGIN: u32 = 12;
const GLYPH_SCALE: u32 = 4;
const GRID_COLOR: Rgb<u8> = Rgb([160, 160, 160]);
const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);

// "Blues" endpoints: empty cells are near white, the fullest cell dark blue
const LIGHT: [f64; 3] = [247.0, 251.0, 255.0];
const DARK: [f64; 3] = [8.0, 48.0, 107.0];

// 3x5 bitmaps for the digits 0-9, one row per entry, MSB is the left column
const DIGITS: [[u8; 5]; 10] = [
    [0b111, 0b101, 0b101, 0b101, 0b111],
    [0b010, 0b110, 0b010, 0b010, 0b111],
    [0b111, 0b001, 0b111, 0b100, 0b111],
    [0b111, 0b001, 0b111, 0b001, 0b111],
    [0b101, 0b101, 0b111, 0b001, 0b001],
    [0b111, 0b100, 0b111, 0b001, 0b111],
    [0b111, 0b100, 0b111, 0b101, 0b111],
    [0b111, 0b001, 0b010, 0b010, 0b010],
    [0b111, 0b101, 0b111, 0b101, 0b111],
    [0b111, 0b101, 0b111, 0b001, 0b111],
];

/// Draw the matrix as a heatmap with the count printed in each cell
pub fn draw_confusion_matrix(matrix: &ConfusionMatrix) -> RgbImage {
    let n = matrix.classes().len() as u32;
    let side = n * CELL + 2 * MARGIN;
    let mut img = RgbImage::from_pixel(side.max(1), side.max(1), BACKGROUND);
    let max = matrix.max_count().max(1) as f64;

    for (row, counts) in matrix.counts().iter().enumerate() {
        for (col, &count) in counts.iter().enumerate() {
            let intensity = count as f64 / max;
            let x0 = MARGIN + col as u32 * CELL;
            let y0 = MARGIN + row as u32 * CELL;
            fill_rect(&mut img, x0, y0, CELL, CELL, heat(intensity));

            let ink = if intensity > 0.5 {
                Rgb([255, 255, 255])
            } else {
                Rgb([0, 0, 0])
            };
            draw_number(&mut img, count, x0 + CELL / 2, y0 + CELL / 2, ink);
        }
    }

    for i in 0..=n {
        let offset = MARGIN + i * CELL;
        fill_rect(&mut img, offset.min(side - 1), MARGIN, 1, n * CELL, GRID_COLOR);
        fill_rect(&mut img, MARGIN, offset.min(side - 1), n * CELL, 1, GRID_COLOR);
    }

    img
}

/// Render the heatmap to an image file, creating parent directories
pub fn render_confusion_matrix(matrix: &ConfusionMatrix, path: &Path) -> Result<(), ClassifierError> {
    ensure_parent(path)?;
    draw_confusion_matrix(matrix).save(path)?;
    info!("Confusion matrix saved to {}", path.display());
    Ok(())
}

fn heat(intensity: f64) -> Rgb<u8> {
    let t = intensity.clamp(0.0, 1.0);
    let channel = |i: usize| (LIGHT[i] + (DARK[i] - LIGHT[i]) * t).round() as u8;
    Rgb([channel(0), channel(1), channel(2)])
}

fn fill_rect(img: &mut RgbImage, x0: u32, y0: u32, w: u32, h: u32, color: Rgb<u8>) {
    let x1 = (x0 + w).min(img.width());
    let y1 = (y0 + h).min(img.height());
    for y in y0..y1 {
        for x in x0..x1 {
            img.put_pixel(x, y, color);
        }
    }
}

// Centered on (cx, cy)
fn draw_number(img: &mut RgbImage, value: usize, cx: u32, cy: u32, ink: Rgb<u8>) {
    let digits: Vec<usize> = value
        .to_string()
        .bytes()
        .map(|b| (b - b'0') as usize)
        .collect();
    let glyph_w = 3 * GLYPH_SCALE;
    let glyph_h = 5 * GLYPH_SCALE;
    let spacing = GLYPH_SCALE;
    let total_w = digits.len() as u32 * (glyph_w + spacing) - spacing;

    let mut x = cx.saturating_sub(total_w / 2);
    let y = cy.saturating_sub(glyph_h / 2);
    for d in digits {
        for (r, bits) in DIGITS[d].iter().enumerate() {
            for c in 0..3u32 {
                if bits & (0b100 >> c) != 0 {
                    fill_rect(
                        img,
                        x + c * GLYPH_SCALE,
                        y + r as u32 * GLYPH_SCALE,
                        GLYPH_SCALE,
                        GLYPH_SCALE,
                        ink,
                    );
                }
            }
        }
        x += glyph_w + spacing;
    }
}
