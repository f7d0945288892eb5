//! Geometric Primitives and Operations

pub mod contour;
pub mod overlap;
pub mod primitives;

// Re-export commonly used items
pub use contour::{reverse_contour, signed_area, transform_contour};
pub use overlap::remove_overlap;
pub use primitives::{circle, frame, rectangle, slash, FrameShape, CIRCLE_KAPPA};
