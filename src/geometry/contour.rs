//! Contour utilities shared by the primitive builders and the glyph store

use norad::{AffineTransform, Contour, ContourPoint, PointType};

fn copy_point(point: &ContourPoint, x: f64, y: f64, typ: PointType) -> ContourPoint {
    ContourPoint::new(x, y, typ, point.smooth, point.name.clone(), None)
}

fn is_on_curve(point: &ContourPoint) -> bool {
    point.typ != PointType::OffCurve
}

/// Closed unless the first point is a move.
pub fn is_closed(contour: &Contour) -> bool {
    contour
        .points
        .first()
        .map(|p| p.typ != PointType::Move)
        .unwrap_or(true)
}

/// Reverse the direction of a contour.
///
/// In UFO contours the segment type lives on the point that ends the
/// segment, so every on-curve point takes the type of the next on-curve
/// point of the original order.
pub fn reverse_contour(contour: &Contour) -> Contour {
    let points = &contour.points;
    let count = points.len();
    if count < 2 {
        return contour.clone();
    }
    let closed = is_closed(contour);

    let mut types: Vec<PointType> = points.iter().map(|p| p.typ.clone()).collect();
    for (index, point) in points.iter().enumerate() {
        if !is_on_curve(point) {
            continue;
        }
        let next_on_curve = (1..=count)
            .map(|step| (index + step) % count)
            .take_while(|&next| closed || next > index)
            .find(|&next| is_on_curve(&points[next]));
        types[index] = match next_on_curve {
            Some(next) if next != index => points[next].typ.clone(),
            _ => PointType::Move,
        };
    }

    let order: Vec<usize> = if closed {
        std::iter::once(0).chain((1..count).rev()).collect()
    } else {
        (0..count).rev().collect()
    };

    let reversed = order
        .into_iter()
        .map(|index| {
            let point = &points[index];
            copy_point(point, point.x, point.y, types[index].clone())
        })
        .collect();
    Contour::new(reversed, None)
}

/// Apply a UFO component transform to every point of a contour.
pub fn transform_contour(contour: &Contour, transform: &AffineTransform) -> Contour {
    let points = contour
        .points
        .iter()
        .map(|point| {
            let x = transform.x_scale * point.x + transform.yx_scale * point.y + transform.x_offset;
            let y = transform.xy_scale * point.x + transform.y_scale * point.y + transform.y_offset;
            copy_point(point, x, y, point.typ.clone())
        })
        .collect();
    Contour::new(points, None)
}

/// Shoelace area over all points; positive for counter-clockwise contours.
pub fn signed_area(contour: &Contour) -> f64 {
    let points = &contour.points;
    let count = points.len();
    if count < 3 {
        return 0.0;
    }
    let twice_area: f64 = (0..count)
        .map(|i| {
            let a = &points[i];
            let b = &points[(i + 1) % count];
            a.x * b.y - b.x * a.y
        })
        .sum();
    twice_area / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::primitives::{circle_contour, rectangle_contour};
    use kurbo::Point;

    #[test]
    fn reversing_flips_area_and_keeps_start() {
        let contour = circle_contour(Point::new(0.0, 0.0), 50.0);
        let reversed = reverse_contour(&contour);
        assert_eq!(reversed.points.len(), contour.points.len());
        assert_eq!(reversed.points[0].x, contour.points[0].x);
        assert!((signed_area(&contour) + signed_area(&reversed)).abs() < 1e-6);

        // Handles stay between the same on-curve points.
        assert_eq!(reversed.points[1].typ, PointType::OffCurve);
        assert_eq!(reversed.points[3].typ, PointType::Curve);
        assert_eq!(reversed.points[3].y, 50.0);
    }

    #[test]
    fn transform_applies_scale_then_offset() {
        let contour = rectangle_contour(Point::new(0.0, 0.0), 10.0, 5.0);
        let transform = AffineTransform {
            x_scale: -1.0,
            xy_scale: 0.0,
            yx_scale: 0.0,
            y_scale: 2.0,
            x_offset: 100.0,
            y_offset: 10.0,
        };
        let moved = transform_contour(&contour, &transform);
        assert_eq!((moved.points[0].x, moved.points[0].y), (100.0, 0.0));
        assert_eq!((moved.points[2].x, moved.points[2].y), (90.0, 20.0));
    }
}
