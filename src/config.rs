use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::error::{PerceptionError, Result};
use crate::rectify::Rectifier;
use crate::types::ColorBands;

/// Startup configuration, normally read from JSON.
///
/// Missing fields fall back to the stock camera setup: a 320x160 camera looking
/// at a 1 m ground square that is warped to 10x10 px, and a 200x200 cell map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerceptionConfig {
    pub image_width: u32,
    pub image_height: u32,
    /// Ground square corners in the raw image: near-left, near-right, far-right, far-left.
    pub src_quad: [[f64; 2]; 4],
    /// Explicit destination corners. Derived from `dst_size` and `bottom_offset` when absent.
    pub dst_quad: Option<[[f64; 2]; 4]>,
    /// Half side of the destination square, in rectified pixels.
    pub dst_size: f64,
    /// Gap between the bottom of the image and the near edge of the destination square.
    pub bottom_offset: f64,
    /// Map side length in cells.
    pub world_size: usize,
    /// Rectified pixels per map cell.
    pub scale: f64,
    pub bands: ColorBands,
}

impl Default for PerceptionConfig {
    fn default() -> Self {
        Self {
            image_width: 320,
            image_height: 160,
            src_quad: [[14.0, 140.0], [301.0, 140.0], [200.0, 96.0], [118.0, 96.0]],
            dst_quad: None,
            dst_size: 5.0,
            bottom_offset: 6.0,
            world_size: 200,
            scale: 10.0,
            bands: ColorBands::default(),
        }
    }
}

impl PerceptionConfig {
    pub fn destination_quad(&self) -> [[f64; 2]; 4] {
        if let Some(dst) = self.dst_quad {
            return dst;
        }
        let cx = self.image_width as f64 / 2.0;
        let bottom = self.image_height as f64 - self.bottom_offset;
        let top = bottom - 2.0 * self.dst_size;
        [
            [cx - self.dst_size, bottom],
            [cx + self.dst_size, bottom],
            [cx + self.dst_size, top],
            [cx - self.dst_size, top],
        ]
    }
}

/// Validated, immutable calibration shared by every frame of a mission.
#[derive(Debug, Clone)]
pub struct Calibration {
    image_width: u32,
    image_height: u32,
    world_size: usize,
    scale: f64,
    bands: ColorBands,
    rectifier: Rectifier,
}

fn to_points(quad: &[[f64; 2]; 4]) -> [DVec2; 4] {
    quad.map(|p| DVec2::new(p[0], p[1]))
}

impl Calibration {
    pub fn from_config(config: &PerceptionConfig) -> Result<Calibration> {
        if config.image_width == 0 || config.image_height == 0 {
            return Err(PerceptionError::InvalidImageSize(
                config.image_width,
                config.image_height,
            ));
        }
        if !(config.scale.is_finite() && config.scale > 0.0) {
            return Err(PerceptionError::InvalidScale(config.scale));
        }
        if config.world_size == 0 {
            return Err(PerceptionError::InvalidWorldSize);
        }
        let src = to_points(&config.src_quad);
        let dst = to_points(&config.destination_quad());
        let rectifier = Rectifier::new(&src, &dst)?;
        log::info!(
            "calibration: {}x{} image, world {}x{} cells, scale {} px/cell",
            config.image_width,
            config.image_height,
            config.world_size,
            config.world_size,
            config.scale
        );
        log::debug!("rectifying homography:{}", rectifier.homography());
        Ok(Calibration {
            image_width: config.image_width,
            image_height: config.image_height,
            world_size: config.world_size,
            scale: config.scale,
            bands: config.bands,
            rectifier,
        })
    }

    pub fn image_w_h(&self) -> (u32, u32) {
        (self.image_width, self.image_height)
    }

    pub fn world_size(&self) -> usize {
        self.world_size
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn bands(&self) -> &ColorBands {
        &self.bands
    }

    pub fn rectifier(&self) -> &Rectifier {
        &self.rectifier
    }
}
