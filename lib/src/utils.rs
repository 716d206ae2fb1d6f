use crate::{
    arith::{offset_band, to_rgb_clamped},
    Dims, Error, ImagePyramid,
};
use std::path::Path;

/// Helper type used to define the source of `ImageSource`'s data
#[derive(Clone)]
pub enum ImageSource<'a> {
    /// A raw buffer of image data, see `image::load_from_memory` for details
    /// on what is supported
    Memory(&'a [u8]),
    /// The path to an image to load from disk. The image format is inferred
    /// from the file extension, see `image::open` for details
    Path(&'a Path),
    /// An already loaded image that is passed directly to the blender
    Image(image::DynamicImage),
}

impl<'a> ImageSource<'a> {
    pub fn from_path(path: &'a Path) -> Self {
        Self::Path(path)
    }
}

impl<'a> From<image::DynamicImage> for ImageSource<'a> {
    fn from(img: image::DynamicImage) -> Self {
        Self::Image(img)
    }
}

impl<'a> From<image::RgbImage> for ImageSource<'a> {
    fn from(img: image::RgbImage) -> Self {
        Self::Image(image::DynamicImage::ImageRgb8(img))
    }
}

impl<'a, S> From<&'a S> for ImageSource<'a>
where
    S: AsRef<Path> + 'a,
{
    fn from(path: &'a S) -> Self {
        Self::Path(path.as_ref())
    }
}

pub fn load_dynamic_image(src: ImageSource<'_>) -> Result<image::DynamicImage, image::ImageError> {
    match src {
        ImageSource::Memory(data) => image::load_from_memory(data),
        ImageSource::Path(path) => image::open(path),
        ImageSource::Image(img) => Ok(img),
    }
}

/// Loads an image as 8-bit RGB, dropping any alpha channel, and optionally
/// resizes it.
pub fn load_image(src: ImageSource<'_>, resize: Option<Dims>) -> Result<image::RgbImage, Error> {
    let img = load_dynamic_image(src)?;

    let img = match resize {
        None => img.to_rgb8(),
        Some(ref size) => {
            use image::GenericImageView;

            if img.width() != size.width || img.height() != size.height {
                image::imageops::resize(
                    &img.to_rgb8(),
                    size.width,
                    size.height,
                    image::imageops::CatmullRom,
                )
            } else {
                img.to_rgb8()
            }
        }
    };

    Ok(img)
}

/// Writes every level of a Gaussian pyramid as `<prefix>_<level>.png` into
/// `dir`, clamped to bytes.
pub fn save_gaussian_levels(pyramid: &ImagePyramid, dir: &Path, prefix: &str) -> Result<(), Error> {
    std::fs::create_dir_all(dir)?;

    for (i, level) in pyramid.iter().enumerate() {
        to_rgb_clamped(level).save(dir.join(format!("{}_{}.png", prefix, i)))?;
    }

    Ok(())
}

/// Writes every level of a Laplacian pyramid as `<prefix>_<level>.png` into
/// `dir`. The signed bands are offset to mid-gray, the last level holds
/// plain intensities and is written as is.
pub fn save_laplacian_levels(
    pyramid: &ImagePyramid,
    dir: &Path,
    prefix: &str,
) -> Result<(), Error> {
    std::fs::create_dir_all(dir)?;

    let last = pyramid.depth();
    for (i, level) in pyramid.iter().enumerate() {
        let img = if i == last {
            to_rgb_clamped(level)
        } else {
            offset_band(level)
        };
        img.save(dir.join(format!("{}_{}.png", prefix, i)))?;
    }

    Ok(())
}
