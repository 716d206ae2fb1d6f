use structopt::StructOpt;

use log::info;
use pyramid_blend::{
    image::ImageOutputFormat as ImgFmt, load_image, save_gaussian_levels, save_laplacian_levels,
    Dims, Error, ImagePyramid, ImageSource, Session,
};
use std::path::{Path, PathBuf};

fn parse_size(input: &str) -> Result<(u32, u32), std::num::ParseIntError> {
    let mut i = input.splitn(2, 'x');

    let x: u32 = i.next().unwrap_or("").parse()?;
    let y: u32 = match i.next() {
        Some(num) => num.parse()?,
        None => x,
    };
    Ok((x, y))
}

fn parse_img_fmt(input: &str) -> Result<ImgFmt, String> {
    let fmt = match input {
        "png" => ImgFmt::Png,
        "jpg" => ImgFmt::Jpeg(75),
        "bmp" => ImgFmt::Bmp,
        other => {
            return Err(format!(
                "image format `{}` not one of: 'png', 'jpg', 'bmp'",
                other
            ))
        }
    };

    Ok(fmt)
}

#[derive(StructOpt)]
#[structopt(rename_all = "kebab-case")]
struct Blend {
    /// The image kept where the mask is black
    #[structopt(parse(from_os_str))]
    background: PathBuf,
    /// The image kept where the mask is white
    #[structopt(parse(from_os_str))]
    foreground: PathBuf,
    /// The blend mask, intermediate values give partial blends
    #[structopt(parse(from_os_str))]
    mask: PathBuf,
    /// The path to save the blended image to, the file extensions of the path determines
    /// the image format used. You may use `-` for stdout.
    #[structopt(long = "out", short, parse(from_os_str))]
    output_path: PathBuf,
    /// The format to save the blended image as.
    ///
    /// NOTE: this will only apply when stdout is specified via `-o -`, otherwise the image
    /// format is determined by the file extension of the path provided to `-o`
    #[structopt(
        long,
        default_value = "png",
        parse(try_from_str = parse_img_fmt)
    )]
    out_fmt: ImgFmt,
    /// A directory into which the intermediate pyramids are also saved.
    ///
    /// * `gaussian_<i>.png` - Gaussian pyramid of the background
    /// * `laplacian_<i>.png` - Laplacian pyramid of the background, shifted to mid-gray
    /// * `mask_<i>.png` - Gaussian pyramid of the mask
    /// * `blended_<i>.png` - The blended bands, shifted to mid-gray
    #[structopt(long, parse(from_os_str))]
    debug_out_dir: Option<PathBuf>,
}

#[derive(StructOpt)]
#[structopt(rename_all = "kebab-case")]
struct Pyramid {
    /// The image to decompose
    #[structopt(parse(from_os_str))]
    image: PathBuf,
    /// The directory the `gaussian_<i>.png` and `laplacian_<i>.png` levels are saved to
    #[structopt(long, default_value = ".", parse(from_os_str))]
    out_dir: PathBuf,
}

#[derive(StructOpt)]
enum Subcommand {
    /// Blends a foreground image over a background image through a mask
    #[structopt(name = "blend")]
    Blend(Blend),
    /// Saves the Gaussian and Laplacian pyramids of a single image
    #[structopt(name = "pyramid")]
    Pyramid(Pyramid),
}

#[derive(StructOpt)]
#[structopt(
    name = "pyramid-blend",
    about = "Blends images with Laplacian pyramids",
    rename_all = "kebab-case"
)]
struct Opt {
    /// The number of times the images are halved, the pyramids have one more level than this
    #[structopt(long, default_value = "3")]
    levels: i32,
    /// Resize input image(s), in `width x height`, or a single number for both dimensions
    #[structopt(long, parse(try_from_str = parse_size))]
    in_size: Option<(u32, u32)>,
    /// The maximum number of worker threads that can be active at any one time
    /// while building pyramids. Defaults to the logical core count.
    #[structopt(short = "t", long = "threads")]
    max_threads: Option<usize>,
    #[structopt(subcommand)]
    cmd: Subcommand,
}

fn main() {
    env_logger::init();

    if let Err(e) = real_main() {
        if atty::is(atty::Stream::Stderr) {
            eprintln!("\x1b[31merror\x1b[0m: {}", e);
        } else {
            eprintln!("error: {}", e);
        }

        std::process::exit(1);
    }
}

fn real_main() -> Result<(), Error> {
    let args = Opt::from_args();
    let settings = Settings {
        levels: args.levels,
        resize: args.in_size.map(|(w, h)| Dims::new(w, h)),
        max_threads: args.max_threads,
    };

    match args.cmd {
        Subcommand::Blend(blend) => run_blend(&settings, blend),
        Subcommand::Pyramid(pyr) => run_pyramid(&settings, &pyr),
    }
}

/// The options shared by every subcommand
struct Settings {
    levels: i32,
    resize: Option<Dims>,
    max_threads: Option<usize>,
}

/// Check that the extension for the path supplied by the user is one of the ones we support
fn check_output_extension(path: &Path) -> Result<(), Error> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("png") | Some("jpg") | Some("bmp") => Ok(()),
        None => Ok(()),
        Some(other) => Err(Error::UnsupportedOutputFormat(other.to_owned())),
    }
}

fn run_blend(args: &Settings, blend: Blend) -> Result<(), Error> {
    check_output_extension(&blend.output_path)?;

    let mut sb = Session::builder()
        .background(&blend.background)
        .foreground(&blend.foreground)
        .mask(&blend.mask)
        .levels(args.levels);

    if let Some(mt) = args.max_threads {
        sb = sb.max_thread_count(mt);
    }

    if let Some(dims) = args.resize {
        sb = sb.resize_input(dims);
    }

    let session = sb.build()?;
    let blended = session.run()?;

    if let Some(ref dir) = blend.debug_out_dir {
        blended.save_debug(dir)?;
        info!("saved debug pyramids to {}", dir.display());
    }

    if blend.output_path.to_str() == Some("-") {
        let out = std::io::stdout();
        let mut out = out.lock();
        blended.write(&mut out, blend.out_fmt)?;
    } else {
        // This won't respect the output format specified by the user,
        // only the extension on the path they specify
        blended.save(&blend.output_path)?;
        info!("saved blended image to {}", blend.output_path.display());
    }

    Ok(())
}

fn run_pyramid(args: &Settings, pyr: &Pyramid) -> Result<(), Error> {
    let img = load_image(ImageSource::from_path(&pyr.image), args.resize)?;

    let gaussian = ImagePyramid::gaussian(&img, args.levels)?;
    let laplacian = gaussian.laplacian()?;

    save_gaussian_levels(&gaussian, &pyr.out_dir, "gaussian")?;
    save_laplacian_levels(&laplacian, &pyr.out_dir, "laplacian")?;

    info!(
        "saved {} pyramid levels to {}",
        gaussian.len(),
        pyr.out_dir.display()
    );

    Ok(())
}
