use pyramid_blend::image::{Rgb, RgbImage};

fn main() -> Result<(), pyramid_blend::Error> {
    // two synthetic inputs, so the example runs without any assets
    let stripes = RgbImage::from_fn(256, 256, |x, _| {
        if (x / 16) % 2 == 0 {
            Rgb([230, 80, 40])
        } else {
            Rgb([250, 200, 60])
        }
    });
    let rings = RgbImage::from_fn(256, 256, |x, y| {
        let (dx, dy) = (x as f32 - 128.0, y as f32 - 128.0);
        let r = (dx * dx + dy * dy).sqrt();
        let v = (127.0 + 127.0 * (r / 6.0).sin()) as u8;
        Rgb([40, v, 255 - v])
    });

    // the right half comes from the rings
    let mask = RgbImage::from_fn(256, 256, |x, _| {
        if x < 128 {
            Rgb([0, 0, 0])
        } else {
            Rgb([255, 255, 255])
        }
    });

    let session = pyramid_blend::Session::builder()
        .background(stripes)
        .foreground(rings)
        .mask(mask)
        .levels(5)
        .build()?;

    let blended = session.run()?;

    blended.save_debug("out/01_debug")?;
    blended.save("out/01.png")
}
