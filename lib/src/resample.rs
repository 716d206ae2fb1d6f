//! Factor-of-two resampling with the 5-tap binomial kernel.
//!
//! Both directions extend borders with the reflect-101 rule
//! (`2 1 | 0 1 2 ... n-1 | n-2 n-3`), so that an up-sampled level is the
//! approximate inverse of the down-sampled one right up to the image edges.
//!
//! Size rule: `down_sample` keeps `(w + 1) / 2` columns and `(h + 1) / 2`
//! rows, and `up_sample` doubles. Since `2 * ceil(n / 2) >= n`, expanding a
//! coarse level always covers the finer level it came from, and
//! `up_sample_to` crops the excess from the right and bottom edges.

use crate::{Dims, FloatImage};

pub(crate) const CHANNELS: usize = 3;

const KERNEL: [f32; 5] = [
    1.0 / 16.0,
    4.0 / 16.0,
    6.0 / 16.0,
    4.0 / 16.0,
    1.0 / 16.0,
];

/// Maps a possibly out-of-range index onto `0..len` by mirroring around the
/// edge samples without repeating them. `len` must be non-zero.
#[inline]
pub(crate) fn reflect101(i: isize, len: usize) -> usize {
    debug_assert!(len > 0);
    if len == 1 {
        return 0;
    }

    let period = (2 * len - 2) as isize;
    let r = i.rem_euclid(period) as usize;
    if r < len {
        r
    } else {
        (2 * len - 2) - r
    }
}

/// Blurs `image` with the binomial kernel and keeps every even row and
/// column. A 1-pixel dimension stays 1 pixel.
pub fn down_sample(image: &FloatImage) -> FloatImage {
    let (width, height) = image.dimensions();
    let (dst_width, dst_height) = ((width + 1) / 2, (height + 1) / 2);
    let mut out = FloatImage::new(dst_width, dst_height);

    if width == 0 || height == 0 {
        return out;
    }

    let src: &[f32] = image;
    let (w, h) = (width as usize, height as usize);
    let dw = dst_width as usize;

    // horizontal pass, evaluated only at the columns we keep
    let row_len = dw * CHANNELS;
    let mut rows = vec![0.0f32; row_len * h];
    for (src_row, dst_row) in src
        .chunks_exact(w * CHANNELS)
        .zip(rows.chunks_exact_mut(row_len))
    {
        for (x, dst_px) in dst_row.chunks_exact_mut(CHANNELS).enumerate() {
            let center = (2 * x) as isize;
            for (k, &weight) in KERNEL.iter().enumerate() {
                let sx = reflect101(center + k as isize - 2, w) * CHANNELS;
                for (d, s) in dst_px.iter_mut().zip(&src_row[sx..sx + CHANNELS]) {
                    *d += weight * s;
                }
            }
        }
    }

    // vertical pass, evaluated only at the rows we keep
    let dst: &mut [f32] = &mut out;
    for (y, dst_row) in dst.chunks_exact_mut(row_len).enumerate() {
        let center = (2 * y) as isize;
        for (k, &weight) in KERNEL.iter().enumerate() {
            let sy = reflect101(center + k as isize - 2, h);
            let src_row = &rows[sy * row_len..(sy + 1) * row_len];
            for (d, s) in dst_row.iter_mut().zip(src_row) {
                *d += weight * s;
            }
        }
    }

    out
}

/// Doubles both dimensions.
///
/// Equivalent to inserting zeros between samples and filtering with the
/// down-sampling kernel scaled by 4. Per dimension that gives
/// `out[2i] = (s[i-1] + 6 s[i] + s[i+1]) / 8` and
/// `out[2i+1] = (s[i] + s[i+1]) / 2`.
pub fn up_sample(image: &FloatImage) -> FloatImage {
    let (width, height) = image.dimensions();
    let mut out = FloatImage::new(width * 2, height * 2);

    if width == 0 || height == 0 {
        return out;
    }

    let src: &[f32] = image;
    let (w, h) = (width as usize, height as usize);

    // horizontal pass: h rows of 2w pixels
    let row_len = 2 * w * CHANNELS;
    let mut rows = vec![0.0f32; row_len * h];
    for (src_row, dst_row) in src
        .chunks_exact(w * CHANNELS)
        .zip(rows.chunks_exact_mut(row_len))
    {
        for x in 0..w {
            let prev = reflect101(x as isize - 1, w) * CHANNELS;
            let next = reflect101(x as isize + 1, w) * CHANNELS;
            let cur = x * CHANNELS;
            let even = 2 * x * CHANNELS;
            let odd = even + CHANNELS;
            for c in 0..CHANNELS {
                dst_row[even + c] =
                    (src_row[prev + c] + 6.0 * src_row[cur + c] + src_row[next + c]) / 8.0;
                dst_row[odd + c] = (src_row[cur + c] + src_row[next + c]) / 2.0;
            }
        }
    }

    // vertical pass: 2h rows
    let dst: &mut [f32] = &mut out;
    for y in 0..h {
        let prev = &rows[reflect101(y as isize - 1, h) * row_len..][..row_len];
        let next = &rows[reflect101(y as isize + 1, h) * row_len..][..row_len];
        let cur = &rows[y * row_len..(y + 1) * row_len];

        let (even, odd) = dst[2 * y * row_len..(2 * y + 2) * row_len].split_at_mut(row_len);
        for i in 0..row_len {
            even[i] = (prev[i] + 6.0 * cur[i] + next[i]) / 8.0;
            odd[i] = (cur[i] + next[i]) / 2.0;
        }
    }

    out
}

/// Up-samples `image` and crops the result to `dims`, keeping the top-left
/// region.
///
/// This is how a coarse level is brought back to the exact shape of the finer
/// level it was derived from. A target larger than twice the source, which a
/// pyramid built here never asks for, is padded by repeating the last row and
/// column.
pub fn up_sample_to(image: &FloatImage, dims: Dims) -> FloatImage {
    let up = up_sample(image);
    let (up_width, up_height) = up.dimensions();
    if up_width == dims.width && up_height == dims.height {
        return up;
    }

    let mut out = FloatImage::new(dims.width, dims.height);
    if up_width == 0 || up_height == 0 || dims.is_empty() {
        return out;
    }

    let src: &[f32] = &up;
    let src_row_len = up_width as usize * CHANNELS;
    let dst_row_len = dims.width as usize * CHANNELS;
    let copy_len = src_row_len.min(dst_row_len);

    let dst: &mut [f32] = &mut out;
    for (y, dst_row) in dst.chunks_exact_mut(dst_row_len).enumerate() {
        let sy = y.min(up_height as usize - 1);
        let src_row = &src[sy * src_row_len..(sy + 1) * src_row_len];
        dst_row[..copy_len].copy_from_slice(&src_row[..copy_len]);

        let last = &src_row[src_row_len - CHANNELS..];
        for px in dst_row[copy_len..].chunks_exact_mut(CHANNELS) {
            px.copy_from_slice(last);
        }
    }

    out
}

/// Dimensions of each level of a pyramid of depth `levels` over an image of
/// size `dims`, finest first.
pub fn pyramid_dims(dims: Dims, levels: u32) -> Vec<Dims> {
    let mut chain = Vec::with_capacity(levels as usize + 1);
    let mut current = dims;
    chain.push(current);
    for _ in 0..levels {
        current = Dims::new((current.width + 1) / 2, (current.height + 1) / 2);
        chain.push(current);
    }
    chain
}

/// The deepest pyramid that can be built over `dims` without down-sampling a
/// level that is already 1x1.
pub fn max_depth(dims: Dims) -> u32 {
    let mut depth = 0;
    let (mut w, mut h) = (dims.width, dims.height);
    while w > 1 || h > 1 {
        w = (w + 1) / 2;
        h = (h + 1) / 2;
        depth += 1;
    }
    depth
}

#[cfg(test)]
mod test {
    use super::*;

    fn ramp(width: u32, height: u32) -> FloatImage {
        FloatImage::from_fn(width, height, |x, y| {
            image::Rgb([x as f32 * 3.0, y as f32 * 5.0, (x + y) as f32])
        })
    }

    #[test]
    fn reflect101_mapping() {
        let cases_len5 = [
            (-4, 4),
            (-3, 3),
            (-2, 2),
            (-1, 1),
            (0, 0),
            (4, 4),
            (5, 3),
            (6, 2),
            (8, 0),
        ];
        for (i, expected) in cases_len5.iter() {
            assert_eq!(reflect101(*i, 5), *expected, "index {}", i);
        }

        for i in -3..=3 {
            assert_eq!(reflect101(i, 1), 0);
        }

        assert_eq!(reflect101(-1, 2), 1);
        assert_eq!(reflect101(2, 2), 0);
    }

    #[test]
    fn down_sample_rounds_up() {
        assert_eq!(down_sample(&ramp(8, 6)).dimensions(), (4, 3));
        assert_eq!(down_sample(&ramp(7, 5)).dimensions(), (4, 3));
        assert_eq!(down_sample(&ramp(1, 1)).dimensions(), (1, 1));
        assert_eq!(down_sample(&FloatImage::new(0, 4)).dimensions(), (0, 2));
    }

    #[test]
    fn up_sample_doubles() {
        assert_eq!(up_sample(&ramp(4, 3)).dimensions(), (8, 6));
        assert_eq!(up_sample(&ramp(1, 1)).dimensions(), (2, 2));
    }

    #[test]
    fn constant_survives_both_directions() {
        let flat = FloatImage::from_pixel(9, 7, image::Rgb([10.0, 128.0, 255.0]));

        for img in &[down_sample(&flat), up_sample(&flat)] {
            for px in img.pixels() {
                assert!((px[0] - 10.0).abs() < 1e-4);
                assert!((px[1] - 128.0).abs() < 1e-4);
                assert!((px[2] - 255.0).abs() < 1e-4);
            }
        }
    }

    #[test]
    fn down_sample_known_values() {
        // impulse in the middle of a 5 pixel row; the outer taps of both edge
        // outputs see it twice through the mirrored border
        let mut img = FloatImage::new(5, 1);
        img.put_pixel(2, 0, image::Rgb([16.0, 0.0, 0.0]));

        let down = down_sample(&img);
        assert_eq!(down.dimensions(), (3, 1));
        assert!((down.get_pixel(0, 0)[0] - 2.0).abs() < 1e-6);
        assert!((down.get_pixel(1, 0)[0] - 6.0).abs() < 1e-6);
        assert!((down.get_pixel(2, 0)[0] - 2.0).abs() < 1e-6);
    }

    #[test]
    fn up_sample_interpolates_linear_ramp() {
        // interior samples of a linear ramp are reproduced exactly
        let img = FloatImage::from_fn(6, 1, |x, _| image::Rgb([x as f32 * 2.0, 0.0, 0.0]));
        let up = up_sample(&img);

        for x in 1..10 {
            let expected = x as f32;
            assert!(
                (up.get_pixel(x, 0)[0] - expected).abs() < 1e-5,
                "x = {}: {}",
                x,
                up.get_pixel(x, 0)[0]
            );
        }
    }

    #[test]
    fn up_sample_to_crops_top_left() {
        let coarse = down_sample(&ramp(7, 5));
        let up = up_sample(&coarse);
        let cropped = up_sample_to(&coarse, Dims::new(7, 5));

        assert_eq!(cropped.dimensions(), (7, 5));
        for (x, y, px) in cropped.enumerate_pixels() {
            assert_eq!(px, up.get_pixel(x, y));
        }
    }

    #[test]
    fn up_sample_to_pads_by_repeating_edges() {
        let img = FloatImage::from_pixel(1, 1, image::Rgb([3.0, 4.0, 5.0]));
        let padded = up_sample_to(&img, Dims::new(3, 4));
        assert_eq!(padded.dimensions(), (3, 4));
        assert!(padded.pixels().all(|px| px.0 == [3.0, 4.0, 5.0]));
    }

    #[test]
    fn size_chain() {
        assert_eq!(
            pyramid_dims(Dims::new(13, 8), 3),
            vec![
                Dims::new(13, 8),
                Dims::new(7, 4),
                Dims::new(4, 2),
                Dims::new(2, 1)
            ]
        );

        assert_eq!(max_depth(Dims::new(16, 16)), 4);
        assert_eq!(max_depth(Dims::new(100, 100)), 7);
        assert_eq!(max_depth(Dims::new(5, 1)), 3);
        assert_eq!(max_depth(Dims::new(1, 1)), 0);
    }
}
