use glam::DVec2;
use serde::{Deserialize, Serialize};

/// RGB range used to classify rectified pixels.
///
/// A pixel matches when every channel lies strictly between `min` and `max`.
/// Bands are independent: one pixel may match several of them, or none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorBand {
    pub min: [u8; 3],
    pub max: [u8; 3],
}

impl ColorBand {
    pub const fn new(min: [u8; 3], max: [u8; 3]) -> ColorBand {
        ColorBand { min, max }
    }

    #[inline]
    pub fn contains(&self, rgb: [u8; 3]) -> bool {
        (0..3).all(|c| rgb[c] > self.min[c] && rgb[c] < self.max[c])
    }
}

/// The three configured classification rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorBands {
    pub navigable: ColorBand,
    pub obstacle: ColorBand,
    pub marker: ColorBand,
}

impl Default for ColorBands {
    fn default() -> Self {
        let path_min = [120, 120, 120];
        Self {
            navigable: ColorBand::new(path_min, [255, 255, 255]),
            obstacle: ColorBand::new([0, 0, 0], path_min),
            marker: ColorBand::new([155, 0, 0], [255, 255, 117]),
        }
    }
}

/// One navigable-terrain sample relative to the rover.
///
/// `angle` is in radians from the forward axis, counter-clockwise positive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolarPoint {
    pub distance: f64,
    pub angle: f64,
}

/// Rover-local points, +x forward and +y left, in rectified pixel units.
pub type RoverPointSet = Vec<DVec2>;
pub type PolarPointSet = Vec<PolarPoint>;

/// Index of a world map cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorldCell {
    pub x: usize,
    pub y: usize,
}

impl WorldCell {
    pub const fn new(x: usize, y: usize) -> WorldCell {
        WorldCell { x, y }
    }
}
