// BEGIN - Embark standard lints v0.4
// do not change or add/remove here, but one can add exceptions after this section
// for more info see: <https://github.com/EmbarkStudios/rust-ecosystem/issues/59>
#![deny(unsafe_code)]
#![warn(
    clippy::all,
    clippy::await_holding_lock,
    clippy::char_lit_as_u8,
    clippy::checked_conversions,
    clippy::dbg_macro,
    clippy::debug_assert_with_mut_call,
    clippy::doc_markdown,
    clippy::empty_enum,
    clippy::enum_glob_use,
    clippy::exit,
    clippy::expl_impl_clone_on_copy,
    clippy::explicit_deref_methods,
    clippy::explicit_into_iter_loop,
    clippy::fallible_impl_from,
    clippy::filter_map_next,
    clippy::float_cmp_const,
    clippy::fn_params_excessive_bools,
    clippy::if_let_mutex,
    clippy::implicit_clone,
    clippy::imprecise_flops,
    clippy::inefficient_to_string,
    clippy::invalid_upcast_comparisons,
    clippy::large_types_passed_by_value,
    clippy::let_unit_value,
    clippy::linkedlist,
    clippy::lossy_float_literal,
    clippy::macro_use_imports,
    clippy::manual_ok_or,
    clippy::map_err_ignore,
    clippy::map_flatten,
    clippy::map_unwrap_or,
    clippy::match_on_vec_items,
    clippy::match_same_arms,
    clippy::match_wildcard_for_single_variants,
    clippy::mem_forget,
    clippy::mismatched_target_os,
    clippy::mut_mut,
    clippy::mutex_integer,
    clippy::needless_borrow,
    clippy::needless_continue,
    clippy::option_option,
    clippy::path_buf_push_overwrite,
    clippy::ptr_as_ptr,
    clippy::ref_option_ref,
    clippy::rest_pat_in_fully_bound_structs,
    clippy::same_functions_in_if_condition,
    clippy::semicolon_if_nothing_returned,
    clippy::string_add_assign,
    clippy::string_add,
    clippy::string_lit_as_bytes,
    clippy::string_to_string,
    clippy::todo,
    clippy::trait_duplication_in_bounds,
    clippy::unimplemented,
    clippy::unnested_or_patterns,
    clippy::unused_self,
    clippy::useless_transmute,
    clippy::verbose_file_reads,
    clippy::zero_sized_map_values,
    future_incompatible,
    nonstandard_style,
    rust_2018_idioms
)]
// END - Embark standard lints v0.4
//! `pyramid-blend` is a small API for multiresolution image blending, as
//! described by Burt and Adelson.
//!
//! Two images are each decomposed into a Laplacian pyramid, a stack of
//! band-pass images going from fine detail to a coarse low-pass base. A mask
//! is decomposed into a Gaussian pyramid, and every band of the result is the
//! mask-weighted mix of the two input bands at the same level. Collapsing the
//! blended bands gives an image where each frequency band is transitioned over
//! a distance proportional to its own scale, hiding the seam.
//!
//! The building blocks ([`down_sample`], [`up_sample`], [`gaussian_pyramid`],
//! [`laplacian_pyramid`], [`reconstruct`]) are exposed as free functions over
//! [`FloatImage`], and [`blend_images`] runs the whole pipeline on byte images.
//!
//! For loading images from disk and saving results, build a `Session` via a
//! `SessionBuilder`. Calling `build` on the builder loads all of the input
//! images and checks for various errors, and `run()` returns a `BlendedImage`
//! which can be saved, streamed, or inspected.
//!
//! ## Usage
//!
//! ```no_run
//! // Create a new session with default parameters
//! let session = pyramid_blend::Session::builder()
//!     // Specify the input images
//!     .background(&"imgs/messi.jpg")
//!     .foreground(&"imgs/ronaldo.jpg")
//!     .mask(&"imgs/mask.jpg")
//!     // Halve the images 4 times
//!     .levels(4)
//!     // Build the session
//!     .build().expect("failed to build session");
//!
//! // Blend the images
//! let blended = session.run().expect("failed to blend");
//!
//! // Save the blended image to disk
//! blended.save("my_blended_img.jpg").expect("failed to save blended image");
//! ```
mod arith;
mod blend;
mod errors;
mod img_pyramid;
mod resample;
pub mod session;
mod utils;

pub use image;
use std::path::Path;

pub use arith::{offset_band, safe_add, safe_subtract, to_float, to_rgb_clamped};
pub use blend::{blend_images, blend_pyramids, blend_with, Blend};
pub use errors::{Error, InvalidArgument, ShapeMismatch};
pub use img_pyramid::{gaussian_pyramid, laplacian_pyramid, reconstruct, ImagePyramid};
pub use resample::{down_sample, max_depth, pyramid_dims, up_sample, up_sample_to};
pub use session::{BlendedImage, Session, SessionBuilder};
pub use utils::{
    load_dynamic_image, load_image, save_gaussian_levels, save_laplacian_levels, ImageSource,
};

/// The working image type. Samples are signed and unclamped, so that
/// Laplacian bands and intermediate sums keep their full range.
pub type FloatImage = image::ImageBuffer<image::Rgb<f32>, Vec<f32>>;

/// Simple dimensions struct
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Dims {
    pub width: u32,
    pub height: u32,
}

impl Dims {
    pub fn square(size: u32) -> Self {
        Self {
            width: size,
            height: size,
        }
    }
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// The dimensions of any image
    pub fn of<I: image::GenericImageView>(img: &I) -> Self {
        let (width, height) = img.dimensions();
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

struct Parameters {
    levels: i32,
    resize_input: Option<Dims>,
    max_thread_count: Option<usize>,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            levels: 3,
            resize_input: None,
            max_thread_count: None,
        }
    }
}

impl Parameters {
    fn thread_count(&self) -> usize {
        self.max_thread_count.unwrap_or_else(num_cpus::get)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn dims_of_image() {
        let img = FloatImage::new(7, 3);
        assert_eq!(Dims::of(&img), Dims::new(7, 3));
        assert!(!Dims::of(&img).is_empty());
        assert!(Dims::new(0, 3).is_empty());
        assert!(Dims::new(3, 0).is_empty());
    }

    #[test]
    fn default_parameters() {
        let params = Parameters::default();
        assert_eq!(params.levels, 3);
        assert!(params.resize_input.is_none());
        assert!(params.thread_count() >= 1);
    }
}
