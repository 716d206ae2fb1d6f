use crate::{
    arith::{safe_add, safe_subtract, to_float},
    resample::{down_sample, up_sample_to},
    Dims, Error, FloatImage,
};
use log::debug;

/// An ordered stack of images, finest first.
///
/// `levels[0]` has the full resolution, and each following level has the
/// size `down_sample` produces from the one before it. The same type holds
/// Gaussian pyramids, Laplacian pyramids and blended band pyramids.
#[derive(Clone, Debug)]
pub struct ImagePyramid {
    pub(crate) levels: Vec<FloatImage>,
}

impl ImagePyramid {
    /// Wraps levels that were built elsewhere. No shape relationship between
    /// the levels is checked here; the operations consuming the pyramid check
    /// what they need.
    pub fn from_levels(levels: Vec<FloatImage>) -> Self {
        Self { levels }
    }

    /// Builds the Gaussian pyramid of a byte image.
    pub fn gaussian(img: &image::RgbImage, level: i32) -> Result<Self, Error> {
        gaussian_pyramid(&to_float(img), level)
    }

    /// Builds the Laplacian pyramid from this Gaussian pyramid.
    pub fn laplacian(&self) -> Result<Self, Error> {
        laplacian_pyramid(self)
    }

    /// Collapses this Laplacian pyramid back into a single image.
    pub fn reconstruct(&self) -> Result<FloatImage, Error> {
        reconstruct(self)
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Number of down-sampling steps, one less than the number of levels
    pub fn depth(&self) -> usize {
        self.levels.len().saturating_sub(1)
    }

    pub fn level(&self, i: usize) -> Option<&FloatImage> {
        self.levels.get(i)
    }

    /// The coarsest level
    pub fn bottom(&self) -> Option<&FloatImage> {
        self.levels.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FloatImage> {
        self.levels.iter()
    }

    pub fn dims(&self) -> Vec<Dims> {
        self.levels.iter().map(Dims::of).collect()
    }

    pub fn into_levels(self) -> Vec<FloatImage> {
        self.levels
    }
}

impl std::ops::Index<usize> for ImagePyramid {
    type Output = FloatImage;

    fn index(&self, i: usize) -> &FloatImage {
        &self.levels[i]
    }
}

impl<'a> IntoIterator for &'a ImagePyramid {
    type Item = &'a FloatImage;
    type IntoIter = std::slice::Iter<'a, FloatImage>;

    fn into_iter(self) -> Self::IntoIter {
        self.levels.iter()
    }
}

pub(crate) fn check_level(level: i32) -> Result<u32, Error> {
    if level < 0 {
        return Err(Error::invalid(
            "levels",
            i64::from(level),
            "must not be negative",
        ));
    }

    Ok(level as u32)
}

/// Builds a Gaussian pyramid with `level + 1` levels.
///
/// Level 0 is an exact copy of `img`; every further level is `down_sample`
/// of the previous one.
pub fn gaussian_pyramid(img: &FloatImage, level: i32) -> Result<ImagePyramid, Error> {
    let depth = check_level(level)?;

    let dims = Dims::of(img);
    if dims.is_empty() {
        return Err(Error::invalid(
            "image size",
            0,
            format!("is not usable, the image is {}x{}", dims.width, dims.height),
        ));
    }

    let mut levels = Vec::with_capacity(depth as usize + 1);
    levels.push(img.clone());

    for _ in 0..depth {
        let next = match levels.last() {
            Some(prev) => down_sample(prev),
            None => break,
        };
        levels.push(next);
    }

    debug!(
        "built gaussian pyramid of {}x{} with {} levels",
        dims.width,
        dims.height,
        levels.len()
    );

    Ok(ImagePyramid { levels })
}

/// Builds the Laplacian pyramid of a Gaussian pyramid.
///
/// Band `i` is level `i` minus level `i + 1` expanded to level `i`'s shape.
/// The last level is the coarsest Gaussian level itself, which carries the
/// low-frequency base rather than a difference.
pub fn laplacian_pyramid(gaussian: &ImagePyramid) -> Result<ImagePyramid, Error> {
    let coarsest = gaussian
        .bottom()
        .ok_or_else(|| Error::invalid("pyramid levels", 0, "must contain at least one level"))?;

    let mut levels = Vec::with_capacity(gaussian.len());
    for pair in gaussian.levels.windows(2) {
        let (fine, coarse) = (&pair[0], &pair[1]);
        let expanded = up_sample_to(coarse, Dims::of(fine));
        levels.push(safe_subtract(fine, &expanded)?);
    }
    levels.push(coarsest.clone());

    debug!("built laplacian pyramid with {} levels", levels.len());

    Ok(ImagePyramid { levels })
}

/// Collapses a Laplacian pyramid: starting from the coarsest level, expands
/// the running image to the next finer band's shape and adds the band.
pub fn reconstruct(laplacian: &ImagePyramid) -> Result<FloatImage, Error> {
    let (base, bands) = laplacian
        .levels
        .split_last()
        .ok_or_else(|| Error::invalid("pyramid levels", 0, "must contain at least one level"))?;

    bands.iter().rev().try_fold(base.clone(), |acc, band| {
        safe_add(&up_sample_to(&acc, Dims::of(band)), band)
    })
}
