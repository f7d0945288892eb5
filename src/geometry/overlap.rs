//! Overlap removal
//!
//! Every segment is cut where it meets another one, and a piece survives
//! when the nonzero fill differs on its two sides. Survivors are turned so
//! the filled side lies on their left and chained back into contours.
//! Neighbouring pieces of the same segment are joined again, so curves that
//! nothing crosses come out exactly as they went in.

use kurbo::{BezPath, CubicBez, Line, ParamCurve, ParamCurveNearest, PathSeg, Point, Shape, Vec2};
use norad::{Contour, ContourPoint, Glyph, PointType};

use super::contour::is_closed;
use crate::data::conversions::contour_to_bezpath;

/// Points closer than this are the same vertex
const SNAP: f64 = 1e-4;
/// Distance of the fill samples from either side of a piece
const SAMPLE_OFFSET: f64 = 1e-3;
/// Parameter step used to estimate directions along a piece
const TANGENT_STEP: f64 = 1e-3;
/// Bounding box pairs examined per pair of curves
const SUBDIVISION_BUDGET: usize = 20_000;

/// Where a piece came from: source segment and parameter range, decreasing
/// when the piece runs against the source.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Origin {
    source: usize,
    from: f64,
    to: f64,
}

#[derive(Debug, Clone, Copy)]
struct Piece {
    seg: PathSeg,
    origin: Option<Origin>,
}

impl Piece {
    fn start_direction(&self) -> Vec2 {
        self.seg.eval(TANGENT_STEP) - self.seg.start()
    }

    fn end_direction(&self) -> Vec2 {
        self.seg.end() - self.seg.eval(1.0 - TANGENT_STEP)
    }

    fn reversed(&self) -> Piece {
        Piece {
            seg: self.seg.reverse(),
            origin: self.origin.map(|o| Origin {
                source: o.source,
                from: o.to,
                to: o.from,
            }),
        }
    }
}

/// A kept piece with its end points resolved to shared vertices.
#[derive(Debug, Clone, Copy)]
struct Edge {
    piece: Piece,
    start: usize,
    end: usize,
}

fn segments_of(contours: &[&Contour]) -> Vec<PathSeg> {
    contours
        .iter()
        .flat_map(|contour| contour_to_bezpath(contour).segments().collect::<Vec<_>>())
        .filter(|seg| match seg {
            PathSeg::Line(line) => line.p0.distance(line.p1) > SNAP,
            _ => true,
        })
        .collect()
}

fn same_curve(a: &CubicBez, b: &CubicBez) -> bool {
    let close = |p: Point, q: Point| p.distance(q) <= SNAP;
    let forward = close(a.p0, b.p0) && close(a.p1, b.p1) && close(a.p2, b.p2) && close(a.p3, b.p3);
    let backward = close(a.p0, b.p3) && close(a.p1, b.p2) && close(a.p2, b.p1) && close(a.p3, b.p0);
    forward || backward
}

/// Crossings of two curves, found by halving both until their bounding
/// boxes shrink below the vertex tolerance.
fn curve_crossings(a: &CubicBez, b: &CubicBez) -> Vec<(f64, f64)> {
    let mut found = Vec::new();
    if same_curve(a, b) {
        return found;
    }
    let mut budget = SUBDIVISION_BUDGET;
    subdivide(a, (0.0, 1.0), b, (0.0, 1.0), &mut budget, &mut found);
    found
}

fn subdivide(
    a: &CubicBez,
    range_a: (f64, f64),
    b: &CubicBez,
    range_b: (f64, f64),
    budget: &mut usize,
    found: &mut Vec<(f64, f64)>,
) {
    if *budget == 0 {
        return;
    }
    *budget -= 1;
    let box_a = a.subsegment(range_a.0..range_a.1).bounding_box();
    let box_b = b.subsegment(range_b.0..range_b.1).bounding_box();
    if !box_a.overlaps(box_b) {
        return;
    }
    let mid_a = (range_a.0 + range_a.1) / 2.0;
    let mid_b = (range_b.0 + range_b.1) / 2.0;
    let small = |w: f64, h: f64| w.max(h) < SNAP;
    if small(box_a.width(), box_a.height()) && small(box_b.width(), box_b.height()) {
        found.push((mid_a, mid_b));
        return;
    }
    for half_a in [(range_a.0, mid_a), (mid_a, range_a.1)] {
        for half_b in [(range_b.0, mid_b), (mid_b, range_b.1)] {
            subdivide(a, half_a, b, half_b, budget, found);
        }
    }
}

/// Parameters at which two segments cross, on `a` and on `b`.
fn crossings(a: &PathSeg, b: &PathSeg) -> Vec<(f64, f64)> {
    match (a, b) {
        (_, PathSeg::Line(line)) => a
            .intersect_line(*line)
            .iter()
            .map(|hit| (hit.segment_t, hit.line_t))
            .collect(),
        (PathSeg::Line(line), _) => b
            .intersect_line(*line)
            .iter()
            .map(|hit| (hit.line_t, hit.segment_t))
            .collect(),
        _ => curve_crossings(&a.to_cubic(), &b.to_cubic()),
    }
}

/// Sorted interior cut parameters of every segment.
fn cut_positions(segments: &[PathSeg]) -> Vec<Vec<f64>> {
    let mut cuts = vec![Vec::new(); segments.len()];
    for i in 0..segments.len() {
        for j in (i + 1)..segments.len() {
            for (ti, tj) in crossings(&segments[i], &segments[j]) {
                cuts[i].push(ti);
                cuts[j].push(tj);
            }
        }
    }
    // Vertices resting on another segment, as in T-junctions and shared edges.
    for (i, seg) in segments.iter().enumerate() {
        for (j, other) in segments.iter().enumerate() {
            if i == j {
                continue;
            }
            for vertex in [other.start(), other.end()] {
                let nearest = seg.nearest(vertex, 1e-9);
                if nearest.distance_sq <= SNAP * SNAP {
                    cuts[i].push(nearest.t);
                }
            }
        }
    }

    segments
        .iter()
        .zip(cuts)
        .map(|(seg, mut ts)| {
            let (start, end) = (seg.start(), seg.end());
            ts.retain(|&t| {
                let point = seg.eval(t);
                t > 0.0 && t < 1.0 && point.distance(start) > SNAP && point.distance(end) > SNAP
            });
            ts.sort_by(f64::total_cmp);
            ts.dedup_by(|a, b| seg.eval(*a).distance(seg.eval(*b)) <= SNAP);
            ts
        })
        .collect()
}

fn split(segments: &[PathSeg]) -> Vec<Piece> {
    let cuts = cut_positions(segments);
    let mut pieces = Vec::new();
    for (source, (seg, ts)) in segments.iter().zip(cuts).enumerate() {
        let mut bounds = vec![0.0];
        bounds.extend(ts);
        bounds.push(1.0);
        for pair in bounds.windows(2) {
            let (from, to) = (pair[0], pair[1]);
            let part = if from == 0.0 && to == 1.0 {
                *seg
            } else {
                seg.subsegment(from..to)
            };
            pieces.push(Piece {
                seg: part,
                origin: Some(Origin { source, from, to }),
            });
        }
    }
    pieces
}

/// Orient a piece with the fill on its left, or drop it when both sides
/// agree.
fn classify(piece: &Piece, fill: &BezPath) -> Option<Piece> {
    let middle = piece.seg.eval(0.5);
    let tangent = piece.seg.eval(0.5 + TANGENT_STEP) - piece.seg.eval(0.5 - TANGENT_STEP);
    if tangent.hypot() < 1e-12 {
        return None;
    }
    let normal = tangent.normalize().turn_90() * SAMPLE_OFFSET;
    let left = fill.winding(middle + normal) != 0;
    let right = fill.winding(middle - normal) != 0;
    match (left, right) {
        (true, false) => Some(*piece),
        (false, true) => Some(piece.reversed()),
        _ => None,
    }
}

/// Index of the vertex at `point`; new vertices are crossings and get tidied.
fn vertex_index(vertices: &mut Vec<Point>, point: Point) -> usize {
    if let Some(index) = vertices.iter().position(|v| v.distance(point) <= SNAP) {
        return index;
    }
    vertices.push(Point::new(tidy(point.x), tidy(point.y)));
    vertices.len() - 1
}

fn with_ends(seg: PathSeg, start: Point, end: Point) -> PathSeg {
    match seg {
        PathSeg::Line(_) => PathSeg::Line(Line::new(start, end)),
        PathSeg::Quad(mut quad) => {
            quad.p0 = start;
            quad.p2 = end;
            PathSeg::Quad(quad)
        }
        PathSeg::Cubic(mut cubic) => {
            cubic.p0 = start;
            cubic.p3 = end;
            PathSeg::Cubic(cubic)
        }
    }
}

/// Resolve end points to shared vertices and drop duplicate edges.
fn edges_of(pieces: Vec<Piece>, segments: &[PathSeg]) -> Vec<Edge> {
    let mut vertices: Vec<Point> = Vec::new();
    for point in segments.iter().flat_map(|seg| [seg.start(), seg.end()]) {
        if !vertices.iter().any(|v| v.distance(point) <= SNAP) {
            vertices.push(point);
        }
    }
    let mut edges: Vec<Edge> = Vec::new();
    for piece in pieces {
        let start = vertex_index(&mut vertices, piece.seg.start());
        let end = vertex_index(&mut vertices, piece.seg.end());
        if start == end {
            continue;
        }
        let middle = piece.seg.eval(0.5);
        let duplicate = edges.iter().any(|edge| {
            edge.start == start
                && edge.end == end
                && edge.piece.seg.eval(0.5).distance(middle) <= SNAP
        });
        if duplicate {
            continue;
        }
        let seg = with_ends(piece.seg, vertices[start], vertices[end]);
        edges.push(Edge {
            piece: Piece { seg, ..piece },
            start,
            end,
        });
    }
    edges
}

/// Signed turn from the end of `incoming` into `outgoing`; left is positive.
fn turn(incoming: &Piece, outgoing: &Piece) -> f64 {
    let a = incoming.end_direction();
    let b = outgoing.start_direction();
    a.cross(b).atan2(a.dot(b))
}

/// Chain edges into closed loops, taking the sharpest left turn wherever
/// several edges leave a vertex.
fn chain(edges: &[Edge]) -> Vec<Vec<Piece>> {
    let mut used = vec![false; edges.len()];
    let mut loops = Vec::new();
    for first in 0..edges.len() {
        if used[first] {
            continue;
        }
        used[first] = true;
        let mut pieces = vec![edges[first].piece];
        let mut current = first;
        while edges[current].end != edges[first].start {
            let next = (0..edges.len())
                .filter(|&i| !used[i] && edges[i].start == edges[current].end)
                .max_by(|&a, &b| {
                    let turn_a = turn(&edges[current].piece, &edges[a].piece);
                    let turn_b = turn(&edges[current].piece, &edges[b].piece);
                    turn_a.total_cmp(&turn_b)
                });
            let Some(next) = next else {
                break;
            };
            used[next] = true;
            pieces.push(edges[next].piece);
            current = next;
        }
        if edges[current].end == edges[first].start {
            loops.push(pieces);
        }
    }
    loops
}

/// Join two consecutive pieces of the same segment, or two collinear lines.
fn join(a: &Piece, b: &Piece, segments: &[PathSeg]) -> Option<Piece> {
    if let (Some(first), Some(second)) = (a.origin, b.origin) {
        let forward = first.from < first.to;
        if first.source == second.source
            && first.to == second.from
            && forward == (second.from < second.to)
        {
            let source = segments[first.source];
            let (low, high) = if forward {
                (first.from, second.to)
            } else {
                (second.to, first.from)
            };
            let mut seg = if low == 0.0 && high == 1.0 {
                source
            } else {
                source.subsegment(low..high)
            };
            if !forward {
                seg = seg.reverse();
            }
            return Some(Piece {
                seg: with_ends(seg, a.seg.start(), b.seg.end()),
                origin: Some(Origin {
                    source: first.source,
                    from: first.from,
                    to: second.to,
                }),
            });
        }
    }
    if let (PathSeg::Line(first), PathSeg::Line(second)) = (a.seg, b.seg) {
        let da = first.p1 - first.p0;
        let db = second.p1 - second.p0;
        if da.cross(db).abs() <= 1e-9 * da.hypot() * db.hypot() && da.dot(db) > 0.0 {
            return Some(Piece {
                seg: PathSeg::Line(Line::new(first.p0, second.p1)),
                origin: None,
            });
        }
    }
    None
}

fn simplify(pieces: Vec<Piece>, segments: &[PathSeg]) -> Vec<Piece> {
    let mut joined: Vec<Piece> = Vec::with_capacity(pieces.len());
    for piece in pieces {
        if let Some(last) = joined.last_mut() {
            if let Some(merged) = join(last, &piece, segments) {
                *last = merged;
                continue;
            }
        }
        joined.push(piece);
    }
    while joined.len() > 1 {
        let last = joined[joined.len() - 1];
        let Some(merged) = join(&last, &joined[0], segments) else {
            break;
        };
        joined.pop();
        joined[0] = merged;
    }
    joined
}

/// Round away float noise left by intersection arithmetic.
fn tidy(value: f64) -> f64 {
    let rounded = (value * 1e6).round() / 1e6;
    if (value - rounded).abs() < 1e-9 {
        rounded
    } else {
        value
    }
}

fn point(p: Point, typ: PointType) -> ContourPoint {
    ContourPoint::new(p.x, p.y, typ, false, None, None)
}

fn to_contour(pieces: &[Piece]) -> Contour {
    let mut points = Vec::new();
    for piece in pieces {
        match piece.seg {
            PathSeg::Line(line) => points.push(point(line.p1, PointType::Line)),
            seg => {
                let cubic = seg.to_cubic();
                points.push(point(cubic.p1, PointType::OffCurve));
                points.push(point(cubic.p2, PointType::OffCurve));
                points.push(point(cubic.p3, PointType::Curve));
            }
        }
    }
    // start on the point where the closing segment ends
    points.rotate_right(1);
    Contour::new(points, None)
}

fn area(pieces: &[Piece]) -> f64 {
    let mut path = BezPath::new();
    if let Some(first) = pieces.first() {
        path.move_to(first.seg.start());
    }
    for piece in pieces {
        path.push(piece.seg.as_path_el());
    }
    path.close_path();
    path.area()
}

/// Nonzero union of closed contours, filled regions on the left of each
/// edge.
pub fn union_contours(contours: &[&Contour]) -> Vec<Contour> {
    let segments = segments_of(contours);
    if segments.is_empty() {
        return Vec::new();
    }
    let mut fill = BezPath::new();
    for contour in contours {
        for element in contour_to_bezpath(contour).elements() {
            fill.push(*element);
        }
    }

    let kept: Vec<Piece> = split(&segments)
        .iter()
        .filter_map(|piece| classify(piece, &fill))
        .collect();
    let edges = edges_of(kept, &segments);
    chain(&edges)
        .into_iter()
        .map(|pieces| simplify(pieces, &segments))
        .filter(|pieces| area(pieces).abs() > SNAP)
        .map(|pieces| to_contour(&pieces))
        .collect()
}

/// Merge the overlapping closed contours of a glyph in place.
pub fn remove_overlap(glyph: &mut Glyph) {
    let (closed, open): (Vec<&Contour>, Vec<&Contour>) =
        glyph.contours.iter().partition(|c| is_closed(c));
    if closed.is_empty() {
        return;
    }
    let mut merged = union_contours(&closed);
    merged.extend(open.into_iter().cloned());
    glyph.contours = merged;
}
