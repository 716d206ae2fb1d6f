use crate::{
    arith::{mask_weighted, mask_weighted_inverse, safe_add, to_float, to_rgb_clamped},
    img_pyramid::{check_level, gaussian_pyramid, laplacian_pyramid, reconstruct},
    resample::max_depth,
    Dims, Error, FloatImage, ImagePyramid,
};
use log::debug;

/// Every intermediate product of a blend, finest level first in each pyramid.
#[derive(Clone, Debug)]
pub struct Blend {
    /// Gaussian pyramid of the background image
    pub gaussian1: ImagePyramid,
    /// Gaussian pyramid of the object image
    pub gaussian2: ImagePyramid,
    /// Gaussian pyramid of the mask, which supplies the per-level weights
    pub mask: ImagePyramid,
    pub laplacian1: ImagePyramid,
    pub laplacian2: ImagePyramid,
    /// The blended bands, a Laplacian pyramid of the result
    pub bands: ImagePyramid,
    /// The reconstructed result, before clamping
    pub image: FloatImage,
}

/// Blends `image2` over `image1` through `mask` with Laplacian pyramids of
/// depth `level`.
///
/// Where the mask is 0 the result follows `image1`, where it is 255 it
/// follows `image2`. Every band is mixed with weights taken from the mask's
/// own Gaussian pyramid at that band's level, so a hard mask edge turns into a
/// transition whose width grows with the band's scale.
///
/// # Errors
///
/// * [`Error::ShapeMismatch`] if the three images don't share their size.
/// * [`Error::InvalidArgument`] if `level` is negative, the images are empty,
///   or `level` exceeds the number of times the images can be halved before
///   reaching 1x1.
pub fn blend_images(
    image1: &image::RgbImage,
    image2: &image::RgbImage,
    mask: &image::RgbImage,
    level: i32,
) -> Result<image::RgbImage, Error> {
    let blend = blend_with(image1, image2, mask, level, 1)?;
    Ok(to_rgb_clamped(&blend.image))
}

/// Same as [`blend_images`], but keeps every intermediate pyramid, and builds
/// the independent pyramids on up to `max_thread_count` threads.
pub fn blend_with(
    image1: &image::RgbImage,
    image2: &image::RgbImage,
    mask: &image::RgbImage,
    level: i32,
    max_thread_count: usize,
) -> Result<Blend, Error> {
    let dims = check_blend_inputs(image1, image2, mask, level)?;
    debug!(
        "blending {}x{} images with {} levels on up to {} threads",
        dims.width,
        dims.height,
        level,
        max_thread_count
    );

    let inputs = [to_float(image1), to_float(image2), to_float(mask)];
    let [gaussian1, gaussian2, mask] = {
        let [g1, g2, gm] = par_map(inputs, max_thread_count, |img| {
            gaussian_pyramid(img, level)
        });
        [g1?, g2?, gm?]
    };

    let [laplacian1, laplacian2] = {
        let [l1, l2] = par_map([&gaussian1, &gaussian2], max_thread_count, |g| {
            laplacian_pyramid(g)
        });
        [l1?, l2?]
    };

    let bands = blend_pyramids(&laplacian1, &laplacian2, &mask)?;
    let image = reconstruct(&bands)?;

    Ok(Blend {
        gaussian1,
        gaussian2,
        mask,
        laplacian1,
        laplacian2,
        bands,
        image,
    })
}

/// Mixes two Laplacian pyramids level by level,
/// `band = lp2 * (m / 255) + lp1 * (1 - m / 255)`, where `m` is the matching
/// level of the mask's Gaussian pyramid.
pub fn blend_pyramids(
    laplacian1: &ImagePyramid,
    laplacian2: &ImagePyramid,
    mask: &ImagePyramid,
) -> Result<ImagePyramid, Error> {
    for other in &[laplacian2, mask] {
        if other.len() != laplacian1.len() {
            return Err(Error::invalid(
                "pyramid levels",
                other.len() as i64,
                format!("must equal the {} levels of the background", laplacian1.len()),
            ));
        }
    }

    let mut bands = Vec::with_capacity(laplacian1.len());
    for ((lp1, lp2), m) in laplacian1.iter().zip(laplacian2).zip(mask) {
        let object = mask_weighted(lp2, m)?;
        let background = mask_weighted_inverse(lp1, m)?;
        bands.push(safe_add(&object, &background)?);
    }

    Ok(ImagePyramid::from_levels(bands))
}

fn check_blend_inputs(
    image1: &image::RgbImage,
    image2: &image::RgbImage,
    mask: &image::RgbImage,
    level: i32,
) -> Result<Dims, Error> {
    let dims = Dims::of(image1);
    if Dims::of(image2) != dims {
        return Err(Error::shape("object image", dims, Dims::of(image2)));
    }
    if Dims::of(mask) != dims {
        return Err(Error::shape("mask", dims, Dims::of(mask)));
    }

    let depth = check_level(level)?;
    check_depth(dims, depth)?;

    Ok(dims)
}

pub(crate) fn check_depth(dims: Dims, depth: u32) -> Result<(), Error> {
    if dims.is_empty() {
        return Err(Error::invalid(
            "image size",
            0,
            format!("is not usable, the image is {}x{}", dims.width, dims.height),
        ));
    }

    let max = max_depth(dims);
    if depth > max {
        return Err(Error::invalid(
            "levels",
            i64::from(depth),
            format!(
                "would shrink a {}x{} image below 1x1, the maximum is {}",
                dims.width, dims.height, max
            ),
        ));
    }

    Ok(())
}

/// Maps `f` over `inputs`, giving each input its own scoped thread when
/// `max_thread_count` allows all of them to run at once, and running them in
/// order on the current thread otherwise. Output order matches input order.
fn par_map<I, T, F, const N: usize>(inputs: [I; N], max_thread_count: usize, f: F) -> [T; N]
where
    I: Send,
    T: Send,
    F: Fn(&I) -> T + Sync,
{
    // for WASM we do not have threads and crossbeam panics,
    // so let's just run the calls on the current thread
    #[cfg(not(target_arch = "wasm32"))]
    {
        if N > 1 && max_thread_count >= N {
            let f = &f;
            let scoped = crossbeam_utils::thread::scope(|scope| {
                let handles = inputs.map(|input| scope.spawn(move |_| f(&input)));
                handles.map(|handle| handle.join())
            });

            return match scoped {
                Ok(joined) => {
                    joined.map(|res| res.unwrap_or_else(|panic| std::panic::resume_unwind(panic)))
                }
                Err(panic) => std::panic::resume_unwind(panic),
            };
        }
    }

    inputs.map(|input| f(&input))
}
