//! Path builders for rudimentary parent glyphs
//!
//! Every builder appends closed contours to an existing glyph. Heights passed
//! to [`rectangle`] are half-heights measured from the registration point, so
//! a negative height flips the winding of the resulting contour.

use kurbo::Point;
use norad::{Contour, ContourPoint, Glyph, PointType};

/// Bezier handle length of a quarter circle, as a fraction of the radius
pub const CIRCLE_KAPPA: f64 = 0.5519;

/// Outline of a hollow frame, measured along the centre of its stroke
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameShape {
    Circle { center: Point, radius: f64 },
    /// `origin` is the left edge at vertical centre of the frame
    Rect { origin: Point, width: f64, height: f64 },
}

fn on_curve(x: f64, y: f64, typ: PointType) -> ContourPoint {
    ContourPoint::new(x, y, typ, false, None, None)
}

fn off_curve(x: f64, y: f64) -> ContourPoint {
    ContourPoint::new(x, y, PointType::OffCurve, false, None, None)
}

/// Four-point contour spanning `origin.x..origin.x + width` and
/// `origin.y - height..origin.y + height`.
pub fn rectangle_contour(origin: Point, width: f64, height: f64) -> Contour {
    let (x, y) = (origin.x, origin.y);
    let points = vec![
        on_curve(x, y - height, PointType::Line),
        on_curve(x + width, y - height, PointType::Line),
        on_curve(x + width, y + height, PointType::Line),
        on_curve(x, y + height, PointType::Line),
    ];
    Contour::new(points, None)
}

/// Closed cubic circle starting at its leftmost point, counter-clockwise.
pub fn circle_contour(center: Point, radius: f64) -> Contour {
    let (cx, cy) = (center.x, center.y);
    let sd = radius * CIRCLE_KAPPA;
    let points = vec![
        on_curve(cx - radius, cy, PointType::Curve),
        off_curve(cx - radius, cy - sd),
        off_curve(cx - sd, cy - radius),
        on_curve(cx, cy - radius, PointType::Curve),
        off_curve(cx + sd, cy - radius),
        off_curve(cx + radius, cy - sd),
        on_curve(cx + radius, cy, PointType::Curve),
        off_curve(cx + radius, cy + sd),
        off_curve(cx + sd, cy + radius),
        on_curve(cx, cy + radius, PointType::Curve),
        off_curve(cx - sd, cy + radius),
        off_curve(cx - radius, cy + sd),
    ];
    Contour::new(points, None)
}

pub fn rectangle(glyph: &mut Glyph, origin: Point, width: f64, height: f64) {
    glyph.contours.push(rectangle_contour(origin, width, height));
}

pub fn circle(glyph: &mut Glyph, center: Point, radius: f64) {
    glyph.contours.push(circle_contour(center, radius));
}

/// Slanted stroke from `origin` to `origin.x + width`.
///
/// The centreline rises by `left_height` at the left end and by
/// `right_height` at the right end; `thickness` is split evenly above and
/// below it.
pub fn slash(
    glyph: &mut Glyph,
    origin: Point,
    width: f64,
    left_height: f64,
    right_height: f64,
    thickness: f64,
) {
    let (x, y) = (origin.x, origin.y);
    let half = thickness / 2.0;
    let points = vec![
        on_curve(x, y + left_height - half, PointType::Line),
        on_curve(x + width, y + right_height - half, PointType::Line),
        on_curve(x + width, y + right_height + half, PointType::Line),
        on_curve(x, y + left_height + half, PointType::Line),
    ];
    glyph.contours.push(Contour::new(points, None));
}

/// Outer contour grown by half the stroke, inner contour shrunk by half the
/// stroke and wound the other way.
pub fn frame(glyph: &mut Glyph, shape: FrameShape, thickness: f64) {
    match shape {
        FrameShape::Circle { center, radius } => {
            glyph
                .contours
                .push(circle_contour(center, radius + thickness / 2.0));
            let inner = circle_contour(center, radius - thickness / 2.0);
            glyph
                .contours
                .push(crate::geometry::contour::reverse_contour(&inner));
        }
        FrameShape::Rect {
            origin,
            width,
            height,
        } => {
            rectangle(glyph, origin, width + thickness, (height + thickness) / 2.0);
            rectangle(
                glyph,
                Point::new(origin.x + thickness, origin.y),
                width - thickness,
                -(height - thickness) / 2.0,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::contour::signed_area;

    fn empty_glyph() -> Glyph {
        Glyph::new("test")
    }

    #[test]
    fn circle_handles_use_kappa() {
        let contour = circle_contour(Point::new(100.0, 50.0), 40.0);
        let sd = 40.0 * CIRCLE_KAPPA;
        assert_eq!(contour.points.len(), 12);

        // Each handle sits `sd` away from the on-curve point it belongs to.
        let on_curves: Vec<_> = contour
            .points
            .iter()
            .filter(|p| p.typ != PointType::OffCurve)
            .collect();
        assert_eq!(on_curves.len(), 4);
        assert_eq!(contour.points[1].y, 50.0 - sd);
        assert_eq!(contour.points[2].x, 100.0 - sd);
        assert_eq!(contour.points[4].x, 100.0 + sd);
        assert_eq!(contour.points[5].y, 50.0 - sd);
        assert_eq!(contour.points[7].y, 50.0 + sd);
        assert_eq!(contour.points[8].x, 100.0 + sd);
        assert_eq!(contour.points[10].x, 100.0 - sd);
        assert_eq!(contour.points[11].y, 50.0 + sd);

        // The closing segment runs from the last handles back to the start.
        assert_eq!(contour.points[0].typ, PointType::Curve);
        assert_eq!(contour.points[0].x, 60.0);
        assert_eq!(contour.points[11].x, 60.0);
    }

    #[test]
    fn negative_height_reverses_rectangle() {
        let forward = rectangle_contour(Point::new(0.0, 0.0), 10.0, 5.0);
        let backward = rectangle_contour(Point::new(0.0, 0.0), 10.0, -5.0);
        assert!(signed_area(&forward) > 0.0);
        assert!(signed_area(&backward) < 0.0);
        assert_eq!(signed_area(&forward), 100.0);
    }

    #[test]
    fn slash_offsets_each_end_independently() {
        let mut glyph = empty_glyph();
        slash(&mut glyph, Point::new(0.0, 100.0), 400.0, 0.0, 50.0, 20.0);
        let points = &glyph.contours[0].points;
        assert_eq!((points[0].x, points[0].y), (0.0, 90.0));
        assert_eq!((points[1].x, points[1].y), (400.0, 140.0));
        assert_eq!((points[2].x, points[2].y), (400.0, 160.0));
        assert_eq!((points[3].x, points[3].y), (0.0, 110.0));
    }

    #[test]
    fn circle_frame_has_opposite_windings() {
        let mut glyph = empty_glyph();
        let shape = FrameShape::Circle {
            center: Point::new(0.0, 0.0),
            radius: 100.0,
        };
        frame(&mut glyph, shape, 20.0);
        assert_eq!(glyph.contours.len(), 2);
        let outer = signed_area(&glyph.contours[0]);
        let inner = signed_area(&glyph.contours[1]);
        assert!(outer > 0.0);
        assert!(inner < 0.0);

        let outer_radius = glyph.contours[0].points[6].x;
        let inner_radius = glyph
            .contours[1]
            .points
            .iter()
            .map(|p| p.x)
            .fold(f64::MIN, f64::max);
        assert_eq!(outer_radius, 110.0);
        assert_eq!(inner_radius, 90.0);
    }

    #[test]
    fn rect_frame_inner_is_two_strokes_smaller() {
        let mut glyph = empty_glyph();
        let shape = FrameShape::Rect {
            origin: Point::new(0.0, 0.0),
            width: 200.0,
            height: 100.0,
        };
        frame(&mut glyph, shape, 10.0);
        let span = |contour: &Contour| {
            let xs = contour.points.iter().map(|p| p.x);
            let ys = contour.points.iter().map(|p| p.y);
            let width = xs.clone().fold(f64::MIN, f64::max) - xs.fold(f64::MAX, f64::min);
            let height = ys.clone().fold(f64::MIN, f64::max) - ys.fold(f64::MAX, f64::min);
            (width, height)
        };
        assert_eq!(span(&glyph.contours[0]), (210.0, 110.0));
        assert_eq!(span(&glyph.contours[1]), (190.0, 90.0));
        assert!(signed_area(&glyph.contours[0]) > 0.0);
        assert!(signed_area(&glyph.contours[1]) < 0.0);
    }
}
