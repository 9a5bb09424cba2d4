use image::{Rgb, RgbImage};
use rerun::RecordingStream;

use crate::segmentation::TerrainMasks;
use crate::types::RoverPointSet;
use crate::world_map::WorldGrid;

/// Vision image: red = obstacle, green = marker, blue = navigable, each 0 or 255.
pub fn vision_image(masks: &TerrainMasks) -> RgbImage {
    let layers = [&masks.obstacle, &masks.marker, &masks.navigable];
    RgbImage::from_fn(masks.navigable.width(), masks.navigable.height(), |x, y| {
        Rgb(layers.map(|m| if m.get(x, y) { 255 } else { 0 }))
    })
}

/// Renders the world map with per-channel min/max normalization.
///
/// Row 0 of the output is the largest world y, so the map reads with +y up.
pub fn render_world_map(grid: &WorldGrid) -> RgbImage {
    let size = grid.size() as u32;
    let mut ranges = [(u64::MAX, 0u64); 3];
    for (_, counts) in grid.iter_cells() {
        for c in 0..3 {
            ranges[c].0 = ranges[c].0.min(counts[c]);
            ranges[c].1 = ranges[c].1.max(counts[c]);
        }
    }
    let mut out = RgbImage::new(size, size);
    for (cell, counts) in grid.iter_cells() {
        let mut px = [0u8; 3];
        for c in 0..3 {
            let (lo, hi) = ranges[c];
            if hi > lo {
                px[c] = ((counts[c] - lo) as f64 * 255.0 / (hi - lo) as f64).round() as u8;
            }
        }
        out.put_pixel(cell.x as u32, size - 1 - cell.y as u32, Rgb(px));
    }
    out
}

/// rerun use top left corner as (0, 0)
pub fn rerun_shift(p2ds: &[(f32, f32)]) -> Vec<(f32, f32)> {
    p2ds.iter().map(|(x, y)| (*x + 0.5, *y + 0.5)).collect()
}

pub fn log_image(
    recording: &RecordingStream,
    topic: &str,
    img: &RgbImage,
) -> Result<(), rerun::RecordingStreamError> {
    recording.log(
        format!("{}/image", topic),
        &rerun::Image::from_rgb24(img.as_raw().clone(), [img.width(), img.height()]),
    )
}

/// Logs navigable rover-centric points back in rectified image coordinates.
pub fn log_navigable_points(
    recording: &RecordingStream,
    topic: &str,
    points: &RoverPointSet,
    image_w_h: (u32, u32),
) -> Result<(), rerun::RecordingStreamError> {
    let center_col = image_w_h.0 as f32 / 2.0;
    let h = image_w_h.1 as f32;
    let pts: Vec<_> = points
        .iter()
        .map(|p| (center_col - p.y as f32, h - p.x as f32))
        .collect();
    recording.log(
        format!("{}/navigable", topic),
        &rerun::Points2D::new(rerun_shift(&pts))
            .with_colors([rerun::Color::from_rgb(0, 0, 255)])
            .with_radii([rerun::Radius::new_ui_points(1.0)]),
    )
}
