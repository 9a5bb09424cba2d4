use glam::DVec2;
use image::{Rgb, RgbImage};
use nalgebra as na;

use crate::error::{PerceptionError, Result};

const COLLINEAR_EPS: f64 = 1e-9;

fn check_quad(which: &'static str, quad: &[DVec2; 4]) -> Result<()> {
    for (i, j, k) in [(0, 1, 2), (0, 1, 3), (0, 2, 3), (1, 2, 3)] {
        let (a, b, c) = (quad[i], quad[j], quad[k]);
        if (b - a).perp_dot(c - a).abs() <= COLLINEAR_EPS {
            return Err(PerceptionError::DegenerateQuad { which, a, b, c });
        }
    }
    Ok(())
}

/// Solves for the homography taking each `src[i]` onto `dst[i]`, with `h33 = 1`.
pub fn perspective_transform(src: &[DVec2; 4], dst: &[DVec2; 4]) -> Result<na::Matrix3<f64>> {
    check_quad("source", src)?;
    check_quad("destination", dst)?;

    let mut a = na::SMatrix::<f64, 8, 8>::zeros();
    let mut b = na::SVector::<f64, 8>::zeros();
    for (i, (s, d)) in src.iter().zip(dst).enumerate() {
        let (x, y, u, v) = (s.x, s.y, d.x, d.y);
        let r0 = 2 * i;
        let r1 = 2 * i + 1;
        a[(r0, 0)] = x;
        a[(r0, 1)] = y;
        a[(r0, 2)] = 1.0;
        a[(r0, 6)] = -x * u;
        a[(r0, 7)] = -y * u;
        b[r0] = u;

        a[(r1, 3)] = x;
        a[(r1, 4)] = y;
        a[(r1, 5)] = 1.0;
        a[(r1, 6)] = -x * v;
        a[(r1, 7)] = -y * v;
        b[r1] = v;
    }
    let h = a.lu().solve(&b).ok_or(PerceptionError::SingularHomography)?;
    Ok(na::Matrix3::new(
        h[0], h[1], h[2], //
        h[3], h[4], h[5], //
        h[6], h[7], 1.0,
    ))
}

/// Maps `p` through `h`. `None` when the point lands on the line at infinity.
pub fn project(h: &na::Matrix3<f64>, p: DVec2) -> Option<DVec2> {
    let q = h * na::Vector3::new(p.x, p.y, 1.0);
    if q.z.abs() < 1e-12 {
        None
    } else {
        Some(DVec2::new(q.x / q.z, q.y / q.z))
    }
}

/// Bilinear sample with a constant zero border.
fn sample_bilinear(img: &RgbImage, p: DVec2) -> Rgb<u8> {
    let (w, h) = (img.width() as i64, img.height() as i64);
    if !(p.x > -1.0 && p.y > -1.0 && p.x < w as f64 && p.y < h as f64) {
        return Rgb([0, 0, 0]);
    }
    let x0 = p.x.floor();
    let y0 = p.y.floor();
    let fx = p.x - x0;
    let fy = p.y - y0;
    let (x0, y0) = (x0 as i64, y0 as i64);
    let texel = |x: i64, y: i64| -> [f64; 3] {
        if x < 0 || y < 0 || x >= w || y >= h {
            [0.0; 3]
        } else {
            img.get_pixel(x as u32, y as u32).0.map(f64::from)
        }
    };
    let p00 = texel(x0, y0);
    let p10 = texel(x0 + 1, y0);
    let p01 = texel(x0, y0 + 1);
    let p11 = texel(x0 + 1, y0 + 1);
    let mut out = [0u8; 3];
    for c in 0..3 {
        let top = p00[c] * (1.0 - fx) + p10[c] * fx;
        let bottom = p01[c] * (1.0 - fx) + p11[c] * fx;
        let v = top * (1.0 - fy) + bottom * fy;
        out[c] = v.round().clamp(0.0, 255.0) as u8;
    }
    Rgb(out)
}

/// Fixed bird's-eye warp computed once from the calibration quads.
#[derive(Debug, Clone)]
pub struct Rectifier {
    homography: na::Matrix3<f64>,
    inverse: na::Matrix3<f64>,
}

impl Rectifier {
    pub fn new(src_quad: &[DVec2; 4], dst_quad: &[DVec2; 4]) -> Result<Rectifier> {
        let homography = perspective_transform(src_quad, dst_quad)?;
        let inverse = homography
            .try_inverse()
            .ok_or(PerceptionError::SingularHomography)?;
        Ok(Rectifier {
            homography,
            inverse,
        })
    }

    /// Raw image to rectified image.
    pub fn homography(&self) -> &na::Matrix3<f64> {
        &self.homography
    }

    /// Warps `src` into the top-down view. The output has the same size as the input.
    pub fn warp(&self, src: &RgbImage) -> RgbImage {
        RgbImage::from_par_fn(src.width(), src.height(), |x, y| {
            match project(&self.inverse, DVec2::new(x as f64, y as f64)) {
                Some(p) => sample_bilinear(src, p),
                None => Rgb([0, 0, 0]),
            }
        })
    }
}

/// One-off rectification. Prefer [`Rectifier`] when the quads are reused.
pub fn rectify(img: &RgbImage, src_quad: &[DVec2; 4], dst_quad: &[DVec2; 4]) -> Result<RgbImage> {
    Ok(Rectifier::new(src_quad, dst_quad)?.warp(img))
}
