pub mod config;
pub mod coordinates;
pub mod data_loader;
pub mod error;
pub mod frame;
pub mod io;
pub mod mask;
pub mod perception;
pub mod rectify;
pub mod segmentation;
pub mod types;
pub mod visualization;
pub mod world_map;

pub use config::{Calibration, PerceptionConfig};
pub use error::{PerceptionError, Result};
pub use frame::{Frame, Pose};
pub use perception::{Perception, PerceptionOutput};
pub use world_map::{MapChannel, SharedWorldGrid, WorldGrid};
