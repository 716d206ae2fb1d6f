use crate::*;
use log::debug;

/// Blending session.
///
/// Calling `run()` blends the foreground over the background through the mask
/// and returns a [`BlendedImage`], consuming the session in the process.
///
/// # Example
/// ```no_run
/// let session = pyramid_blend::Session::builder()
///     .background(&"imgs/messi.jpg")
///     .foreground(&"imgs/ronaldo.jpg")
///     .mask(&"imgs/mask.jpg")
///     .levels(3)
///     .build().expect("failed to build session");
///
/// let blended = session.run().expect("failed to blend");
/// blended.save("out/blended.jpg").expect("failed to save image");
/// ```
pub struct Session {
    background: image::RgbImage,
    foreground: image::RgbImage,
    mask: image::RgbImage,
    params: Parameters,
}

impl Session {
    /// Creates a new session with default parameters.
    pub fn builder<'a>() -> SessionBuilder<'a> {
        SessionBuilder::default()
    }

    /// Runs the blend and outputs the blended image.
    pub fn run(self) -> Result<BlendedImage, Error> {
        let blend = blend_with(
            &self.background,
            &self.foreground,
            &self.mask,
            self.params.levels,
            self.params.thread_count(),
        )?;

        let image = to_rgb_clamped(&blend.image);

        Ok(BlendedImage { blend, image })
    }
}

/// Builds a session by setting parameters and adding input images, calling
/// `build` will check all of the provided inputs to verify that the blend
/// can be carried out
#[derive(Default)]
pub struct SessionBuilder<'a> {
    background: Option<ImageSource<'a>>,
    foreground: Option<ImageSource<'a>>,
    mask: Option<ImageSource<'a>>,
    params: Parameters,
}

impl<'a> SessionBuilder<'a> {
    /// Creates a new `SessionBuilder`, can also be created via
    /// `Session::builder()`
    pub fn new() -> Self {
        Self::default()
    }

    /// The image shown where the mask is black.
    pub fn background<I: Into<ImageSource<'a>>>(mut self, img: I) -> Self {
        self.background = Some(img.into());
        self
    }

    /// The image shown where the mask is white.
    pub fn foreground<I: Into<ImageSource<'a>>>(mut self, img: I) -> Self {
        self.foreground = Some(img.into());
        self
    }

    /// The blend mask. It is read as RGB, so each channel can be weighted
    /// separately, though usually it is a gray-scale image. Intermediate
    /// values give partial blends.
    pub fn mask<I: Into<ImageSource<'a>>>(mut self, img: I) -> Self {
        self.mask = Some(img.into());
        self
    }

    /// The number of times the images are halved. More levels means wider,
    /// smoother transitions for the low frequencies.
    ///
    /// Default: 3
    pub fn levels(mut self, levels: i32) -> Self {
        self.params.levels = levels;
        self
    }

    /// Resize all three input images to the same size before blending.
    /// Without it, the inputs must already share their dimensions.
    pub fn resize_input(mut self, dims: Dims) -> Self {
        self.params.resize_input = Some(dims);
        self
    }

    /// Controls the maximum number of threads used to build the independent
    /// pyramids. Each step builds at most 3 pyramids, and they are only built
    /// concurrently when every one of them can get its own thread.
    ///
    /// The output does not depend on this setting.
    ///
    /// Default: The number of logical cores on this system.
    pub fn max_thread_count(mut self, count: usize) -> Self {
        self.params.max_thread_count = Some(count);
        self
    }

    /// Creates a `Session`, or returns an error if invalid parameters or input
    /// images were specified.
    pub fn build(self) -> Result<Session, Error> {
        self.check_parameters_validity()?;

        let resize = self.params.resize_input;
        let load = |src: Option<ImageSource<'a>>, which| match src {
            Some(src) => load_image(src, resize),
            None => Err(Error::MissingInput(which)),
        };

        let background = load(self.background, "background")?;
        let foreground = load(self.foreground, "foreground")?;
        let mask = load(self.mask, "mask")?;

        check_images_validity(&background, &foreground, &mask, self.params.levels)?;

        debug!(
            "session ready: {}x{} inputs, {} levels",
            background.width(),
            background.height(),
            self.params.levels
        );

        Ok(Session {
            background,
            foreground,
            mask,
            params: self.params,
        })
    }

    fn check_parameters_validity(&self) -> Result<(), Error> {
        if self.params.levels < 0 {
            return Err(Error::invalid(
                "levels",
                i64::from(self.params.levels),
                "must not be negative",
            ));
        }

        if let Some(max_count) = self.params.max_thread_count {
            if max_count == 0 {
                return Err(Error::invalid(
                    "max-thread-count",
                    max_count as i64,
                    "must be at least 1",
                ));
            }
        }

        if let Some(dims) = self.params.resize_input {
            if dims.is_empty() {
                return Err(Error::invalid(
                    "resize-input",
                    0,
                    format!("is not usable, {}x{} is empty", dims.width, dims.height),
                ));
            }
        }

        Ok(())
    }
}

fn check_images_validity(
    background: &image::RgbImage,
    foreground: &image::RgbImage,
    mask: &image::RgbImage,
    levels: i32,
) -> Result<(), Error> {
    let dims = Dims::of(background);
    if Dims::of(foreground) != dims {
        return Err(Error::shape("foreground", dims, Dims::of(foreground)));
    }
    if Dims::of(mask) != dims {
        return Err(Error::shape("mask", dims, Dims::of(mask)));
    }

    crate::blend::check_depth(dims, levels as u32)
}

/// An image produced by `Session::run()`
pub struct BlendedImage {
    blend: Blend,
    image: image::RgbImage,
}

impl BlendedImage {
    /// Saves the blended image to the specified path
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        let path = path.as_ref();
        if let Some(parent_path) = path.parent() {
            std::fs::create_dir_all(&parent_path)?;
        }

        self.image.save(&path)?;
        Ok(())
    }

    /// Writes the blended image to the specified stream
    pub fn write<W: std::io::Write>(
        self,
        writer: &mut W,
        fmt: image::ImageOutputFormat,
    ) -> Result<(), Error> {
        let dyn_img = self.into_image();
        Ok(dyn_img.write_to(writer, fmt)?)
    }

    /// Saves the intermediate pyramids into `dir`:
    ///
    /// * `gaussian_<i>.png` - Gaussian pyramid of the background
    /// * `laplacian_<i>.png` - Laplacian pyramid of the background, bands
    ///   shifted so that zero is mid-gray
    /// * `mask_<i>.png` - Gaussian pyramid of the mask
    /// * `blended_<i>.png` - the blended bands, shifted like the Laplacian
    pub fn save_debug<P: AsRef<Path>>(&self, dir: P) -> Result<(), Error> {
        let dir = dir.as_ref();

        save_gaussian_levels(&self.blend.gaussian1, dir, "gaussian")?;
        save_laplacian_levels(&self.blend.laplacian1, dir, "laplacian")?;
        save_gaussian_levels(&self.blend.mask, dir, "mask")?;
        save_laplacian_levels(&self.blend.bands, dir, "blended")?;

        Ok(())
    }

    /// Every intermediate pyramid of the blend
    pub fn pyramids(&self) -> &Blend {
        &self.blend
    }

    /// Returns the blended output image
    pub fn into_image(self) -> image::DynamicImage {
        image::DynamicImage::ImageRgb8(self.image)
    }
}

impl AsRef<image::RgbImage> for BlendedImage {
    fn as_ref(&self) -> &image::RgbImage {
        &self.image
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn gray(dims: u32, v: u8) -> image::RgbImage {
        image::RgbImage::from_pixel(dims, dims, image::Rgb([v, v, v]))
    }

    #[test]
    fn missing_inputs() {
        let err = Session::builder()
            .background(gray(8, 0))
            .mask(gray(8, 0))
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, Error::MissingInput("foreground")));
    }

    #[test]
    fn zero_threads() {
        let err = Session::builder()
            .background(gray(8, 0))
            .foreground(gray(8, 0))
            .mask(gray(8, 0))
            .max_thread_count(0)
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn too_many_levels() {
        let err = Session::builder()
            .background(gray(8, 0))
            .foreground(gray(8, 0))
            .mask(gray(8, 0))
            .levels(4)
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn resize_input_fixes_mismatched_mask() {
        let blended = Session::builder()
            .background(gray(16, 10))
            .foreground(gray(16, 200))
            .mask(gray(4, 255))
            .resize_input(Dims::square(16))
            .levels(2)
            .build()
            .unwrap()
            .run()
            .unwrap();

        assert_eq!(blended.as_ref().dimensions(), (16, 16));
        // resampling the flat mask may land a hair below 255
        assert!(blended
            .as_ref()
            .pixels()
            .all(|px| px.0.iter().all(|&v| (199..=201).contains(&v))));
    }
}
