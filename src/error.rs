use glam::DVec2;

use crate::types::WorldCell;

/// Errors raised while configuring or running the perception pipeline.
#[derive(Debug, thiserror::Error)]
pub enum PerceptionError {
    #[error("degenerate {which} quad: points {a}, {b} and {c} are collinear")]
    DegenerateQuad {
        which: &'static str,
        a: DVec2,
        b: DVec2,
        c: DVec2,
    },
    #[error("homography is singular and cannot be inverted")]
    SingularHomography,
    #[error("scale must be positive and finite, got {0}")]
    InvalidScale(f64),
    #[error("world size must be at least one cell")]
    InvalidWorldSize,
    #[error("image size must be non-zero, got {0}x{1}")]
    InvalidImageSize(u32, u32),
    #[error("frame is {got_w}x{got_h} but calibration expects {expected_w}x{expected_h}")]
    FrameShape {
        expected_w: u32,
        expected_h: u32,
        got_w: u32,
        got_h: u32,
    },
    #[error("world grid is {got} cells wide but calibration expects {expected}")]
    GridSize { expected: usize, got: usize },
    #[error("cell {cell:?} lies outside a {size}x{size} world grid")]
    CellOutOfBounds { cell: WorldCell, size: usize },
    #[error("pose must be finite, got position {position} yaw {yaw_deg}")]
    NonFinitePose { position: DVec2, yaw_deg: f64 },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Image(#[from] image::ImageError),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PerceptionError>;
