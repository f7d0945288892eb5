//! Conversions between norad UFO types and kurbo geometry
//!
//! Bounding boxes are measured on kurbo paths, while the glyph store keeps
//! norad contours and components. This is pure data transformation logic.

use kurbo::{Affine, BezPath, Point};
use norad::{AffineTransform, Contour, PointType};

use crate::core::errors::StoreError;

/// Build a closed kurbo path from a UFO contour.
pub fn contour_to_bezpath(contour: &Contour) -> BezPath {
    let mut path = BezPath::new();
    let mut pending_offcurves: Vec<Point> = Vec::new();
    let mut first_point: Option<(Point, PointType)> = None;

    for (idx, point) in contour.points.iter().enumerate() {
        let pt = Point::new(point.x, point.y);

        // UFO contours: first point defines start position
        if idx == 0 {
            path.move_to(pt);
            first_point = Some((pt, point.typ.clone()));
            continue;
        }

        match point.typ {
            PointType::Move => path.move_to(pt),
            PointType::Line => path.line_to(pt),
            PointType::OffCurve => pending_offcurves.push(pt),
            PointType::Curve | PointType::QCurve => {
                close_segment(&mut path, &mut pending_offcurves, pt, &point.typ)
            }
        }
    }

    // The first point's type defines how to reach it from the last point
    if let Some((first_pt, first_type)) = first_point {
        match first_type {
            PointType::Move => {}
            PointType::Curve | PointType::QCurve => {
                close_segment(&mut path, &mut pending_offcurves, first_pt, &first_type)
            }
            PointType::Line | PointType::OffCurve => path.line_to(first_pt),
        }
        path.close_path();
    }
    path
}

/// Emit the segment ending at `end`, consuming any pending handles.
fn close_segment(path: &mut BezPath, pending: &mut Vec<Point>, end: Point, typ: &PointType) {
    match (typ, pending.len()) {
        (_, 0) => path.line_to(end),
        (_, 1) => path.quad_to(pending[0], end),
        (PointType::Curve, n) => path.curve_to(pending[n - 2], pending[n - 1], end),
        (_, n) => {
            // Implied on-curve points sit halfway between quadratic handles
            for i in 0..n {
                let cp = pending[i];
                let to = if i == n - 1 {
                    end
                } else {
                    cp.midpoint(pending[i + 1])
                };
                path.quad_to(cp, to);
            }
        }
    }
    pending.clear();
}

/// kurbo equivalent of a UFO component transform.
pub fn affine_from_norad(transform: &AffineTransform) -> Affine {
    Affine::new([
        transform.x_scale,
        transform.xy_scale,
        transform.yx_scale,
        transform.y_scale,
        transform.x_offset,
        transform.y_offset,
    ])
}

/// Scale-and-offset transform for a component reference.
pub fn scale_offset_transform(dx: f64, dy: f64, sx: f64, sy: f64) -> AffineTransform {
    AffineTransform {
        x_scale: sx,
        xy_scale: 0.0,
        yx_scale: 0.0,
        y_scale: sy,
        x_offset: dx,
        y_offset: dy,
    }
}

/// Validate a glyph name for use as a store key.
pub fn glyph_name(name: &str) -> Result<norad::Name, StoreError> {
    name.parse()
        .map_err(|_| StoreError::InvalidName(name.to_string()))
}
