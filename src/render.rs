use std::path::{Path, PathBuf};

use image::{Rgb, RgbImage};
use log::debug;

use crate::config::Config;
use crate::error::MapError;
use crate::extent::Extent;
use crate::photo::Photo;

/// Output width in pixels; height follows from the configured ratio.
const FRAME_WIDTH: u32 = 1920;

/// Deterministic frame file name: the capture time of the newest photo.
pub fn frame_path(export: &Path, newest: &Photo) -> PathBuf {
    let stamp = newest.date.format("%Y%m%d%H%M%S");
    export.join(format!("map_{}.png", stamp))
}

/// Draw one frame: background fill plus a disc per photo, positioned by
/// equirectangular projection into the extent. Returns the written path.
/// An already-rendered frame is left untouched so reruns resume cheaply.
pub fn render_frame(frame: &[Photo], extent: &Extent, config: &Config) -> Result<PathBuf, MapError> {
    let newest = match frame.last() {
        Some(newest) => newest,
        None => return Err(MapError::EmptyInput),
    };

    let path = frame_path(&config.export_path, newest);
    if path.exists() {
        debug!("frame {} already rendered, skipping", path.display());
        return Ok(path);
    }

    let width = FRAME_WIDTH;
    let height = (width as f64 / config.image_ratio).round().max(1.0) as u32;

    let mut img = RgbImage::from_pixel(width, height, Rgb(config.bg_color));
    for photo in frame {
        let (x, y) = project(photo.coords, extent, width, height);
        draw_marker(
            &mut img,
            x,
            y,
            config.marker_width as i64,
            Rgb(config.marker_color),
        );
    }
    img.save(&path)?;

    Ok(path)
}

/// Map (lat, lon) into pixel space; y grows downward, so latitude flips.
/// An unclamped extent can put a marker off-canvas; drawing clips per pixel.
fn project((lat, lon): (f64, f64), extent: &Extent, width: u32, height: u32) -> (i64, i64) {
    let x = (lon - extent.min_long) / extent.width() * width as f64;
    let y = (extent.max_lat - lat) / extent.height() * height as f64;
    (x.round() as i64, y.round() as i64)
}

fn draw_marker(img: &mut RgbImage, cx: i64, cy: i64, radius: i64, color: Rgb<u8>) {
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if dx * dx + dy * dy > radius * radius {
                continue;
            }
            let (x, y) = (cx + dx, cy + dy);
            if x >= 0 && y >= 0 && (x as u32) < img.width() && (y as u32) < img.height() {
                img.put_pixel(x as u32, y as u32, color);
            }
        }
    }
}
