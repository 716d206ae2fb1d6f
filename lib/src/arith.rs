//! Element-wise arithmetic on working images, and the conversions across the
//! boundary between byte images and working images.
//!
//! Sums and differences are kept as signed `f32`: Laplacian bands are
//! negative wherever the finer level is darker than the expanded coarse one,
//! and clamping them here would discard that. The only clamp lives in
//! [`to_rgb_clamped`].

use crate::{Dims, Error, FloatImage};

/// Element-wise `a + b`, unclamped.
pub fn safe_add(a: &FloatImage, b: &FloatImage) -> Result<FloatImage, Error> {
    zip_samples("safe_add", a, b, |x, y| x + y)
}

/// Element-wise `a - b`. The result is signed and never clamped.
pub fn safe_subtract(a: &FloatImage, b: &FloatImage) -> Result<FloatImage, Error> {
    zip_samples("safe_subtract", a, b, |x, y| x - y)
}

/// Scales every sample of `band` by the matching mask sample divided by 255.
pub(crate) fn mask_weighted(band: &FloatImage, mask: &FloatImage) -> Result<FloatImage, Error> {
    zip_samples("mask_weighted", band, mask, |v, m| v * (m / 255.0))
}

/// Scales every sample of `band` by one minus the matching mask sample
/// divided by 255.
pub(crate) fn mask_weighted_inverse(
    band: &FloatImage,
    mask: &FloatImage,
) -> Result<FloatImage, Error> {
    zip_samples("mask_weighted_inverse", band, mask, |v, m| {
        v * (1.0 - m / 255.0)
    })
}

fn zip_samples<F>(op: &'static str, a: &FloatImage, b: &FloatImage, f: F) -> Result<FloatImage, Error>
where
    F: Fn(f32, f32) -> f32,
{
    let expected = Dims::of(a);
    let actual = Dims::of(b);
    if expected != actual {
        return Err(Error::shape(op, expected, actual));
    }

    let mut out = FloatImage::new(expected.width, expected.height);
    let dst: &mut [f32] = &mut out;
    for ((d, &x), &y) in dst.iter_mut().zip(a.as_raw()).zip(b.as_raw()) {
        let v = f(x, y);
        if !v.is_finite() {
            return Err(Error::ArithmeticOverflow { op });
        }
        *d = v;
    }

    Ok(out)
}

/// Widens a byte image into a working image.
pub fn to_float(img: &image::RgbImage) -> FloatImage {
    let (width, height) = img.dimensions();
    let mut out = FloatImage::new(width, height);
    let dst: &mut [f32] = &mut out;
    for (d, &s) in dst.iter_mut().zip(img.as_raw()) {
        *d = f32::from(s);
    }
    out
}

/// Rounds every sample to the nearest integer and clamps it to `0..=255`.
/// Not-a-number samples become 0.
pub fn to_rgb_clamped(img: &FloatImage) -> image::RgbImage {
    to_rgb_offset(img, 0.0)
}

/// Renders a signed band for display by centering zero at mid-gray.
pub fn offset_band(img: &FloatImage) -> image::RgbImage {
    to_rgb_offset(img, 128.0)
}

fn to_rgb_offset(img: &FloatImage, offset: f32) -> image::RgbImage {
    let (width, height) = img.dimensions();
    let mut out = image::RgbImage::new(width, height);
    let dst: &mut [u8] = &mut out;
    for (d, &s) in dst.iter_mut().zip(img.as_raw()) {
        *d = clamp_sample(s + offset);
    }
    out
}

#[inline]
fn clamp_sample(v: f32) -> u8 {
    // f32::max discards NaN
    v.round().max(0.0).min(255.0) as u8
}
