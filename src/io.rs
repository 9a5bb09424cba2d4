use std::io::Write;
use std::path::Path;

use image::RgbImage;
use serde::{Serialize, de::DeserializeOwned};

use crate::coordinates::NavigationSummary;
use crate::error::Result;
use crate::types::PolarPoint;

/// Serializes an object to a JSON file.
pub fn object_to_json<T: Serialize>(output_path: impl AsRef<Path>, object: &T) -> Result<()> {
    let j = serde_json::to_string_pretty(object)?;
    let mut file = std::fs::File::create(output_path)?;
    file.write_all(j.as_bytes())?;
    Ok(())
}

/// Deserializes an object from a JSON file.
pub fn object_from_json<T: DeserializeOwned>(file_path: impl AsRef<Path>) -> Result<T> {
    let contents = std::fs::read_to_string(file_path)?;
    Ok(serde_json::from_str(&contents)?)
}

pub fn save_image(output_path: impl AsRef<Path>, img: &RgbImage) -> Result<()> {
    img.save(output_path)?;
    Ok(())
}

#[derive(Serialize)]
struct FrameReport<'a> {
    frame: usize,
    summary: NavigationSummary,
    polar: &'a [PolarPoint],
}

/// Writes the navigable polar set of one frame with its summary.
pub fn write_polar_report(output_path: impl AsRef<Path>, frame: usize, polar: &[PolarPoint]) -> Result<()> {
    let report = FrameReport {
        frame,
        summary: NavigationSummary::from_polar(polar),
        polar,
    };
    object_to_json(output_path, &report)
}
