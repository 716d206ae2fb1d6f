use pyramid_blend::{image::Rgb, ImagePyramid};

fn main() -> Result<(), pyramid_blend::Error> {
    // decompose the image given on the command line, or a checkerboard
    let img = match std::env::args_os().nth(1) {
        Some(path) => {
            pyramid_blend::load_image(pyramid_blend::ImageSource::from_path(path.as_ref()), None)?
        }
        None => pyramid_blend::image::RgbImage::from_fn(200, 150, |x, y| {
            if (x / 10 + y / 10) % 2 == 0 {
                Rgb([255, 255, 255])
            } else {
                Rgb([0, 0, 0])
            }
        }),
    };

    let gaussian = ImagePyramid::gaussian(&img, 4)?;
    let laplacian = gaussian.laplacian()?;

    for (i, dims) in laplacian.dims().iter().enumerate() {
        println!("level {}: {}x{}", i, dims.width, dims.height);
    }

    let out = std::path::Path::new("out/02");
    pyramid_blend::save_gaussian_levels(&gaussian, out, "gaussian")?;
    pyramid_blend::save_laplacian_levels(&laplacian, out, "laplacian")?;

    // collapsing the bands gives the input back
    let back = pyramid_blend::to_rgb_clamped(&laplacian.reconstruct()?);
    assert_eq!(back, img);

    Ok(())
}
