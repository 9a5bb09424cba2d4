use std::path::{Path, PathBuf};

use image::ImageReader;
use indicatif::{ParallelProgressIterator, ProgressBar};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::frame::{Frame, Pose};
use crate::io::object_from_json;

/// One entry of a recorded run: an image on disk and the pose it was taken at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameRecord {
    pub image: PathBuf,
    pub x: f64,
    pub y: f64,
    pub yaw: f64,
}

impl FrameRecord {
    pub fn pose(&self) -> Pose {
        Pose::new(self.x, self.y, self.yaw)
    }
}

/// Loads a JSON array of [`FrameRecord`]s.
///
/// Relative image paths are resolved against the manifest's directory.
pub fn load_manifest(manifest_path: impl AsRef<Path>) -> Result<Vec<FrameRecord>> {
    let manifest_path = manifest_path.as_ref();
    let root = manifest_path.parent().unwrap_or(Path::new("."));
    let mut records: Vec<FrameRecord> = object_from_json(manifest_path)?;
    for r in records.iter_mut() {
        if r.image.is_relative() {
            r.image = root.join(&r.image);
        }
    }
    log::trace!("{} frames listed in {}", records.len(), manifest_path.display());
    Ok(records)
}

pub fn load_frame(record: &FrameRecord) -> Result<Frame> {
    let img = ImageReader::open(&record.image)?.decode()?;
    Ok(Frame::new(img.to_rgb8(), record.pose()))
}

/// Frames decoded at once by [`load_frame_chunks`] unless told otherwise.
pub const DEFAULT_CHUNK_SIZE: usize = 64;

/// Decodes frames lazily, `chunk_size` at a time, keeping manifest order.
///
/// Each chunk is decoded in parallel when the iterator reaches it, so at most
/// one chunk of images is held in memory. Frames that fail to load are
/// returned as errors in place so the caller can skip them.
pub fn load_frame_chunks(
    records: &[FrameRecord],
    chunk_size: usize,
) -> impl Iterator<Item = Vec<Result<Frame>>> + '_ {
    let bar = ProgressBar::new(records.len() as u64);
    records.chunks(chunk_size.max(1)).map(move |chunk| {
        let frames: Vec<_> = chunk.par_iter().progress_with(bar.clone()).map(load_frame).collect();
        log::trace!("decoded {} frames", frames.len());
        frames
    })
}
