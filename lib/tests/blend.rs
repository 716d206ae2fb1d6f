use pyramid_blend as pb;
use pyramid_blend::image::{Rgb, RgbImage};

fn textured(width: u32, height: u32, seed: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([
            ((x * 7 + y * 3 + seed) % 256) as u8,
            ((x * y + seed * 11) % 256) as u8,
            if ((x + seed) / 5 + y / 5) % 2 == 0 {
                230
            } else {
                20
            },
        ])
    })
}

fn flat(width: u32, height: u32, v: u8) -> RgbImage {
    RgbImage::from_pixel(width, height, Rgb([v, v, v]))
}

fn assert_close(actual: &RgbImage, expected: impl Fn(u32, u32, usize) -> f32, tol: f32) {
    for (x, y, px) in actual.enumerate_pixels() {
        for (c, &v) in px.0.iter().enumerate() {
            let want = expected(x, y, c);
            assert!(
                (f32::from(v) - want).abs() <= tol,
                "pixel ({}, {}) channel {}: got {}, expected {}",
                x,
                y,
                c,
                v,
                want
            );
        }
    }
}

macro_rules! mask_blend {
    ($name:ident, $mask_value:expr) => {
        #[test]
        fn $name() {
            let a = textured(48, 40, 0);
            let b = textured(48, 40, 91);
            let mask = flat(48, 40, $mask_value);

            let w = f32::from($mask_value) / 255.0;
            let out = pb::blend_images(&a, &b, &mask, 3).unwrap();

            assert_eq!(out.dimensions(), a.dimensions());
            assert_close(
                &out,
                |x, y, c| {
                    let av = f32::from(a.get_pixel(x, y).0[c]);
                    let bv = f32::from(b.get_pixel(x, y).0[c]);
                    w * bv + (1.0 - w) * av
                },
                1.0,
            );
        }
    };
}

mask_blend!(black_mask_keeps_background, 0u8);
mask_blend!(white_mask_keeps_foreground, 255u8);
mask_blend!(gray_mask_averages, 128u8);

#[test]
fn hard_seam_is_smoothed() {
    let (width, height) = (128, 64);
    let a = RgbImage::from_pixel(width, height, Rgb([30, 60, 90]));
    let b = RgbImage::from_pixel(width, height, Rgb([220, 180, 40]));
    let mask = RgbImage::from_fn(width, height, |x, _| {
        if x >= width / 2 {
            Rgb([255, 255, 255])
        } else {
            Rgb([0, 0, 0])
        }
    });

    let out = pb::blend_images(&a, &b, &mask, 3).unwrap();

    for y in 0..height {
        for x in 0..16 {
            assert_close_px(out.get_pixel(x, y), a.get_pixel(x, y));
        }
        for x in width - 16..width {
            assert_close_px(out.get_pixel(x, y), b.get_pixel(x, y));
        }

        // the seam itself lands in between the two images
        let seam = out.get_pixel(width / 2, y).0;
        assert!(seam[0] > 30 && seam[0] < 220);
        assert!(seam[1] > 60 && seam[1] < 180);
        assert!(seam[2] > 40 && seam[2] < 90);
    }
}

fn assert_close_px(actual: &Rgb<u8>, expected: &Rgb<u8>) {
    for (a, e) in actual.0.iter().zip(expected.0.iter()) {
        assert!(
            (i16::from(*a) - i16::from(*e)).abs() <= 1,
            "{:?} vs {:?}",
            actual,
            expected
        );
    }
}

#[test]
fn level_zero_is_a_per_pixel_mix() {
    let a = textured(9, 7, 3);
    let b = textured(9, 7, 50);
    let mask = RgbImage::from_fn(9, 7, |x, _| if x < 4 { Rgb([0; 3]) } else { Rgb([255; 3]) });

    let out = pb::blend_images(&a, &b, &mask, 0).unwrap();
    for (x, y, px) in out.enumerate_pixels() {
        let want = if x < 4 { a.get_pixel(x, y) } else { b.get_pixel(x, y) };
        assert_eq!(px, want);
    }
}

#[test]
fn mismatched_mask_is_rejected() {
    let err = pb::blend_images(
        &flat(100, 100, 0),
        &flat(100, 100, 255),
        &flat(50, 50, 128),
        3,
    )
    .unwrap_err();

    match err {
        pb::Error::ShapeMismatch(sm) => {
            assert_eq!(sm.expected, pb::Dims::square(100));
            assert_eq!(sm.actual, pb::Dims::square(50));
        }
        other => panic!("unexpected error {}", other),
    }
}

#[test]
fn mismatched_images_are_rejected() {
    let err =
        pb::blend_images(&flat(16, 16, 0), &flat(16, 8, 0), &flat(16, 16, 0), 1).unwrap_err();
    assert!(matches!(err, pb::Error::ShapeMismatch(_)));
}

#[test]
fn negative_level_is_rejected() {
    let img = flat(16, 16, 10);
    let err = pb::blend_images(&img, &img, &img, -1).unwrap_err();
    assert!(matches!(err, pb::Error::InvalidArgument(_)));
}

#[test]
fn too_deep_is_rejected() {
    let img = flat(8, 8, 10);
    assert!(pb::blend_images(&img, &img, &img, 3).is_ok());

    let err = pb::blend_images(&img, &img, &img, 4).unwrap_err();
    assert!(matches!(err, pb::Error::InvalidArgument(_)));
}

#[test]
fn thread_count_does_not_change_the_result() {
    let a = textured(33, 17, 1);
    let b = textured(33, 17, 77);
    let mask = RgbImage::from_fn(33, 17, |x, y| {
        let v = ((x * 255) / 32) as u8;
        Rgb([v, v, if y % 2 == 0 { 0 } else { 255 }])
    });

    let single = pb::blend_with(&a, &b, &mask, 2, 1).unwrap();
    let multi = pb::blend_with(&a, &b, &mask, 2, 4).unwrap();

    assert_eq!(single.image, multi.image);
    assert_eq!(single.bands.dims(), multi.bands.dims());
    assert_eq!(single.bands.len(), 3);
}

#[test]
fn intermediate_pyramids_are_consistent() {
    let a = textured(40, 24, 5);
    let blend = pb::blend_with(&a, &a, &flat(40, 24, 255), 2, 2).unwrap();

    let dims = pb::pyramid_dims(pb::Dims::new(40, 24), 2);
    for pyr in &[
        &blend.gaussian1,
        &blend.gaussian2,
        &blend.mask,
        &blend.laplacian1,
        &blend.laplacian2,
        &blend.bands,
    ] {
        assert_eq!(pyr.dims(), dims);
    }

    assert_eq!(blend.gaussian1[0], pb::to_float(&a));
    assert_eq!(pb::to_rgb_clamped(&blend.image), a);
}
