//! UFO data handling: file I/O and geometry conversions

pub mod conversions;
pub mod ufo;

pub use conversions::{affine_from_norad, contour_to_bezpath, glyph_name, scale_offset_transform};
pub use ufo::{load_ufo_from_path, save_ufo_to_path};
