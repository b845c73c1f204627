//! Keypoint overlays for visual inspection.

use std::path::{Path, PathBuf};

use image::{Rgb, RgbImage};
use kpda_core::Keypoint;

use crate::config::ClothingType;
use crate::error::{KpdaNetError, Result};

/// Distinct colour for keypoint `index` of `count`, spread around the hue circle.
pub fn keypoint_colour(index: usize, count: usize) -> Rgb<u8> {
    let hue = 6.0 * index as f32 / count.max(1) as f32;
    let sector = hue.floor() as u32 % 6;
    let rise = ((hue - hue.floor()) * 255.0) as u8;
    let fall = 255 - rise;
    match sector {
        0 => Rgb([255, rise, 0]),
        1 => Rgb([fall, 255, 0]),
        2 => Rgb([0, 255, rise]),
        3 => Rgb([0, fall, 255]),
        4 => Rgb([rise, 0, 255]),
        _ => Rgb([255, 0, fall]),
    }
}

/// Copy of `image` with a filled disk on every non-absent keypoint.
pub fn render_keypoints(image: &RgbImage, keypoints: &[Keypoint], radius: u32) -> RgbImage {
    let mut canvas = image.clone();
    let (w, h) = canvas.dimensions();
    let r = radius as i64;

    for (i, kp) in keypoints.iter().enumerate() {
        if !kp.visibility.is_present() {
            continue;
        }
        let colour = keypoint_colour(i, keypoints.len());
        let cx = kp.x.round() as i64;
        let cy = kp.y.round() as i64;
        for y in (cy - r).max(0)..=(cy + r).min(h as i64 - 1) {
            for x in (cx - r).max(0)..=(cx + r).min(w as i64 - 1) {
                let (dx, dy) = (x - cx, y - cy);
                if dx * dx + dy * dy <= r * r {
                    canvas.put_pixel(x as u32, y as u32, colour);
                }
            }
        }
    }
    canvas
}

/// Write a rendering as `<dir>/<clothes><index>.png`.
pub fn save_rendering(
    image: &RgbImage,
    dir: &Path,
    clothes: ClothingType,
    index: usize,
) -> Result<PathBuf> {
    let path = dir.join(format!("{}{}.png", clothes.as_str(), index));
    image.save(&path).map_err(|source| KpdaNetError::Image {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}
