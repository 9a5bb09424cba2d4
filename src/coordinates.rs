//! Conversions between the rectified image, the rover-centric frame and the
//! world map.
//!
//! The rover sits at the bottom-center of the rectified image looking "up" the
//! image. Rover-centric coordinates are in rectified pixels with +x forward and
//! +y to the left; world coordinates are in map cells.

use glam::{DMat2, DVec2};
use serde::Serialize;

use crate::frame::Pose;
use crate::mask::BinaryMask;
use crate::types::{PolarPoint, PolarPointSet, RoverPointSet, WorldCell};

/// Rover-centric coordinates of every set pixel, in row-major scan order.
///
/// `x = |row - height|`, `y = -(col - width / 2)`.
pub fn rover_coords(mask: &BinaryMask) -> RoverPointSet {
    let h = mask.height() as f64;
    let center_col = mask.width() as f64 / 2.0;
    mask.iter_ones()
        .map(|(col, row)| DVec2::new((row as f64 - h).abs(), -(col as f64 - center_col)))
        .collect()
}

pub fn to_polar(points: &[DVec2]) -> PolarPointSet {
    points
        .iter()
        .map(|p| PolarPoint {
            distance: p.length(),
            angle: p.y.atan2(p.x),
        })
        .collect()
}

/// Counter-clockwise rotation by `yaw_deg` degrees.
pub fn rotate(p: DVec2, yaw_deg: f64) -> DVec2 {
    DMat2::from_angle(yaw_deg.to_radians()) * p
}

/// Scales a rotated rover-centric point into map cells and offsets it by the
/// rover position. No rounding or clipping.
pub fn translate(p_rot: DVec2, position: DVec2, scale: f64) -> DVec2 {
    position + p_rot / scale
}

/// Rounds to the nearest cell, saturating at the map edges.
///
/// Points beyond the map are pinned to the border cell rather than dropped, so
/// border cells can collect evidence from outside the map. An empty map pins
/// everything to cell (0, 0).
pub fn clip_to_cell(p: DVec2, world_size: usize) -> WorldCell {
    let max = world_size.saturating_sub(1) as f64;
    WorldCell::new(
        p.x.round().clamp(0.0, max) as usize,
        p.y.round().clamp(0.0, max) as usize,
    )
}

/// Rover-centric pixels to world map cells for one pose.
#[derive(Debug, Clone, Copy)]
pub struct WorldProjection {
    pub world_size: usize,
    pub scale: f64,
}

impl WorldProjection {
    pub fn new(world_size: usize, scale: f64) -> WorldProjection {
        WorldProjection { world_size, scale }
    }

    /// Continuous world position of a rover-centric point, before clipping.
    pub fn to_world(&self, p: DVec2, pose: &Pose) -> DVec2 {
        translate(rotate(p, pose.yaw_deg), pose.position, self.scale)
    }

    pub fn to_cell(&self, p: DVec2, pose: &Pose) -> WorldCell {
        clip_to_cell(self.to_world(p, pose), self.world_size)
    }

    pub fn project(&self, points: &[DVec2], pose: &Pose) -> Vec<WorldCell> {
        points.iter().map(|p| self.to_cell(*p, pose)).collect()
    }

    /// Inverse of [`WorldProjection::to_world`]: world position back to the
    /// rover-centric frame of `pose`.
    pub fn to_rover(&self, world: DVec2, pose: &Pose) -> DVec2 {
        rotate((world - pose.position) * self.scale, -pose.yaw_deg)
    }
}

/// Aggregate of a polar set for quick inspection by consumers.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct NavigationSummary {
    pub count: usize,
    pub mean_distance: f64,
    pub mean_angle: f64,
    pub mean_angle_deg: f64,
}

impl NavigationSummary {
    pub fn from_polar(polar: &[PolarPoint]) -> NavigationSummary {
        if polar.is_empty() {
            return NavigationSummary::default();
        }
        let n = polar.len() as f64;
        let mean_distance = polar.iter().map(|p| p.distance).sum::<f64>() / n;
        let mean_angle = polar.iter().map(|p| p.angle).sum::<f64>() / n;
        NavigationSummary {
            count: polar.len(),
            mean_distance,
            mean_angle,
            mean_angle_deg: mean_angle.to_degrees(),
        }
    }
}
