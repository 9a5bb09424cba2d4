use bitvec::prelude::*;
use image::RgbImage;

use crate::mask::BinaryMask;
use crate::types::{ColorBand, ColorBands};

/// Classifies every pixel of `img` against `band`.
pub fn segment(img: &RgbImage, band: &ColorBand) -> BinaryMask {
    let bits: BitVec = img.pixels().map(|p| band.contains(p.0)).collect();
    log::trace!(
        "segmented {}x{} image, {} px in band {:?}-{:?}",
        img.width(),
        img.height(),
        bits.count_ones(),
        band.min,
        band.max
    );
    BinaryMask::from_raw(img.width(), img.height(), bits)
}

/// Independent masks for the three configured bands.
#[derive(Debug, Clone)]
pub struct TerrainMasks {
    pub navigable: BinaryMask,
    pub obstacle: BinaryMask,
    pub marker: BinaryMask,
}

impl TerrainMasks {
    pub fn classify(img: &RgbImage, bands: &ColorBands) -> TerrainMasks {
        TerrainMasks {
            navigable: segment(img, &bands.navigable),
            obstacle: segment(img, &bands.obstacle),
            marker: segment(img, &bands.marker),
        }
    }
}
