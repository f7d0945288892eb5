//! Drawing of rudimentary parent glyphs
//!
//! When a rule needs a parent that is not in the font and `[Global] draw
//! missing` is on, the parent is drawn here from configured dimensions and
//! committed like any other glyph. Registration points follow the usual
//! engraving conventions: barlines stand on the bottom staff line and span
//! four staff spaces, staff lines are centred on the baseline and stems grow
//! upward from it.

use kurbo::Point;
use norad::Glyph;
use tracing::info;

use super::dataset::{
    ACCORDION_RANKS, AUGMENTATION_DOT, BEAM, COUPLER_DOT, HAIRPIN, LONG_BEAMED_STEM, NIENTE,
    NOTEHEADS, REPEAT_DOT, SHORT_BEAMED_STEM, SQUARE_RANKS, STEM, THICK_BARLINE, THIN_BARLINE,
    TUPLET_BRACKET, X_HEIGHT_LETTERS,
};
use super::BuildContext;
use crate::core::errors::BuildError;
use crate::geometry::{circle, frame, rectangle, remove_overlap, slash, FrameShape};

const BLACK_NOTEHEAD: &str = NOTEHEADS[4];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineWidth {
    Medium,
    Wide,
    Narrow,
}

impl LineWidth {
    fn word(&self) -> &'static str {
        match self {
            LineWidth::Medium => "medium",
            LineWidth::Wide => "wide",
            LineWidth::Narrow => "narrow",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankShape {
    Round,
    Square,
}

/// Parent glyphs that can be drawn on demand
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    ThinBarline,
    ThickBarline,
    DashedBarline,
    DottedBarline,
    ShortBarline,
    TickBarline,
    RepeatDot,
    StaffLine(LineWidth),
    LegerLine(LineWidth),
    Stem,
    /// Stem of a beamed group, right-aligned on the black notehead
    BeamedStem { short: bool },
    AugmentationDot,
    Beam,
    TupletBracket,
    Hairpin,
    Niente,
    Ranks { shape: RankShape, partitions: usize },
    CouplerDot,
}

impl Primitive {
    pub fn from_name(name: &str) -> Option<Self> {
        let primitive = match name {
            THIN_BARLINE => Primitive::ThinBarline,
            THICK_BARLINE => Primitive::ThickBarline,
            "uniE036" => Primitive::DashedBarline,
            "uniE037" => Primitive::DottedBarline,
            "uniE038" => Primitive::ShortBarline,
            "uniE039" => Primitive::TickBarline,
            REPEAT_DOT => Primitive::RepeatDot,
            "uniE010" => Primitive::StaffLine(LineWidth::Medium),
            "uniE016" => Primitive::StaffLine(LineWidth::Wide),
            "uniE01C" => Primitive::StaffLine(LineWidth::Narrow),
            "uniE022" => Primitive::LegerLine(LineWidth::Medium),
            "uniE023" => Primitive::LegerLine(LineWidth::Wide),
            "uniE024" => Primitive::LegerLine(LineWidth::Narrow),
            STEM => Primitive::Stem,
            SHORT_BEAMED_STEM => Primitive::BeamedStem { short: true },
            LONG_BEAMED_STEM => Primitive::BeamedStem { short: false },
            AUGMENTATION_DOT => Primitive::AugmentationDot,
            BEAM => Primitive::Beam,
            TUPLET_BRACKET => Primitive::TupletBracket,
            HAIRPIN => Primitive::Hairpin,
            NIENTE => Primitive::Niente,
            COUPLER_DOT => Primitive::CouplerDot,
            _ => {
                let (_, partitions) = ACCORDION_RANKS.iter().find(|(rank, _)| *rank == name)?;
                let shape = if name == SQUARE_RANKS {
                    RankShape::Square
                } else {
                    RankShape::Round
                };
                Primitive::Ranks {
                    shape,
                    partitions: *partitions,
                }
            }
        };
        Some(primitive)
    }
}

/// Draw `primitive` under `name` and commit it.
pub fn draw(ctx: &mut BuildContext, name: &str, primitive: Primitive) -> Result<(), BuildError> {
    info!("drawing {name} ...");
    let mut glyph = Glyph::new(name);
    let width = match primitive {
        Primitive::ThinBarline => barline(ctx, &mut glyph, "thin barline thickness", 2.0, 2.0)?,
        Primitive::ThickBarline => barline(ctx, &mut glyph, "thick barline thickness", 2.0, 2.0)?,
        Primitive::ShortBarline => barline(ctx, &mut glyph, "thin barline thickness", 3.0, 1.0)?,
        Primitive::TickBarline => barline(ctx, &mut glyph, "thin barline thickness", 4.0, 0.5)?,
        Primitive::DashedBarline => dashed_barline(ctx, &mut glyph)?,
        Primitive::DottedBarline => dotted_barline(ctx, &mut glyph)?,
        Primitive::RepeatDot => dot(&mut glyph, ctx.units("Repeats", "repeat dot radius")?, false),
        Primitive::StaffLine(width) => staff_line(ctx, &mut glyph, width)?,
        Primitive::LegerLine(width) => leger_line(ctx, &mut glyph, width)?,
        Primitive::Stem => stem(ctx, &mut glyph)?,
        Primitive::BeamedStem { short } => beamed_stem(ctx, &mut glyph, short)?,
        Primitive::AugmentationDot => {
            dot(&mut glyph, ctx.units("Notes", "augmentation dot radius")?, false)
        }
        Primitive::Beam => beam(ctx, &mut glyph)?,
        Primitive::TupletBracket => tuplet_bracket(ctx, &mut glyph)?,
        Primitive::Hairpin => hairpin(ctx, &mut glyph)?,
        Primitive::Niente => niente(ctx, &mut glyph)?,
        Primitive::Ranks { shape, partitions } => ranks(ctx, &mut glyph, shape, partitions)?,
        Primitive::CouplerDot => {
            dot(&mut glyph, ctx.units("Accordion", "coupler dot radius")?, true)
        }
    };
    ctx.commit_drawn(glyph, width)
}

/// Solid barline centred `center` staff spaces up, `half_height` staff
/// spaces above and below.
fn barline(
    ctx: &BuildContext,
    glyph: &mut Glyph,
    thickness: &str,
    center: f64,
    half_height: f64,
) -> Result<f64, BuildError> {
    let space = ctx.space();
    let width = ctx.units("Barlines", thickness)?;
    rectangle(glyph, Point::new(0.0, space * center), width, space * half_height);
    Ok(width)
}

/// Full-height barline with reversed gap boxes merged out of it.
fn dashed_barline(ctx: &BuildContext, glyph: &mut Glyph) -> Result<f64, BuildError> {
    let space = ctx.space();
    let width = ctx.units("Barlines", "dashed barline thickness")?;
    let dash = ctx.units("Barlines", "dashed barline dash length")?;
    let gap = ctx.units("Barlines", "dashed barline gap length")?;
    let height = space * 4.0;

    rectangle(glyph, Point::new(0.0, height / 2.0), width, height / 2.0);
    if dash > 0.0 && gap > 0.0 {
        let mut bottom = dash;
        while bottom + gap < height {
            rectangle(glyph, Point::new(0.0, bottom + gap / 2.0), width, -gap / 2.0);
            bottom += dash + gap;
        }
    }
    remove_overlap(glyph);
    Ok(width)
}

/// Dots spread evenly over the height of the staff.
fn dotted_barline(ctx: &BuildContext, glyph: &mut Glyph) -> Result<f64, BuildError> {
    let radius = ctx.units("Barlines", "dotted barline dot radius")?;
    let gap = ctx.units("Barlines", "dotted barline gap length")?;
    let height = ctx.space() * 4.0;
    let positions = dotted_positions(height, radius, gap);
    for y in positions {
        circle(glyph, Point::new(radius, y), radius);
    }
    Ok(radius * 2.0)
}

/// Dot centres from `radius` to `height - radius`.
fn dotted_positions(height: f64, radius: f64, gap: f64) -> Vec<f64> {
    let unit = radius * 2.0 + gap;
    let span = height - radius * 2.0;
    if unit <= 0.0 || span <= 0.0 {
        return vec![radius];
    }
    let count = (span / unit).floor() as usize + 1;
    if count == 1 {
        return vec![radius];
    }
    let step = span / (count - 1) as f64;
    (0..count).map(|k| radius + step * k as f64).collect()
}

/// Circle of `radius` touching the left sidebearing, centred on the
/// baseline or resting on it.
fn dot(glyph: &mut Glyph, radius: f64, on_baseline: bool) -> f64 {
    let y = if on_baseline { radius } else { 0.0 };
    circle(glyph, Point::new(radius, y), radius);
    radius * 2.0
}

fn staff_line(ctx: &BuildContext, glyph: &mut Glyph, width: LineWidth) -> Result<f64, BuildError> {
    let length = ctx.units("Staves", &format!("{} staff line width", width.word()))?;
    let thickness = ctx.units("Staves", "staff line thickness")?;
    rectangle(glyph, Point::ZERO, length, thickness / 2.0);
    Ok(length)
}

/// Leger line overhanging both sidebearings.
fn leger_line(ctx: &BuildContext, glyph: &mut Glyph, width: LineWidth) -> Result<f64, BuildError> {
    let advance = ctx.units("Staves", &format!("{} leger line width", width.word()))?;
    let extension = ctx.units("Staves", "leger line extension")?;
    let thickness = ctx.units("Staves", "leger line thickness")?;
    rectangle(
        glyph,
        Point::new(-extension, 0.0),
        advance + extension * 2.0,
        thickness / 2.0,
    );
    Ok(advance)
}

fn stem(ctx: &BuildContext, glyph: &mut Glyph) -> Result<f64, BuildError> {
    let length = ctx.units("Stems", "long stem length")?;
    let thickness = ctx.units("Stems", "stem thickness")?;
    rectangle(glyph, Point::new(0.0, length / 2.0), thickness, length / 2.0);
    Ok(thickness / 2.0)
}

/// Stem on the right edge of the black notehead, retracted at the bottom.
fn beamed_stem(ctx: &BuildContext, glyph: &mut Glyph, short: bool) -> Result<f64, BuildError> {
    let note_width = ctx.width(BLACK_NOTEHEAD)?;
    let long = ctx.units("Stems", "long stem length")?;
    let thickness = ctx.units("Stems", "stem thickness")?;
    let retraction = ctx.units("Stems", "stem retraction")?;

    let mut y = long / 2.0 + retraction / 2.0;
    let mut half_height = long / 2.0 - retraction / 2.0;
    if short {
        let diff = (long - ctx.units("Stems", "short stem length")?) / 2.0;
        y -= diff;
        half_height -= diff;
    }
    rectangle(
        glyph,
        Point::new(note_width - thickness, y),
        thickness,
        half_height,
    );
    Ok(note_width)
}

fn beam(ctx: &BuildContext, glyph: &mut Glyph) -> Result<f64, BuildError> {
    let short = ctx.units("Stems", "short stem length")?;
    let thickness = ctx.units("Beams", "beam thickness")?;
    let length = ctx.units("Beams", "beam length")?;
    rectangle(
        glyph,
        Point::new(0.0, short - thickness / 2.0),
        length,
        thickness / 2.0,
    );
    Ok(length)
}

/// Horizontal bracket with a hook hanging from its left end.
fn tuplet_bracket(ctx: &BuildContext, glyph: &mut Glyph) -> Result<f64, BuildError> {
    let height = ctx.units("Beams", "tuplet height")?;
    let hook = ctx.units("Beams", "tuplet bracket hook length")?;
    let thickness = ctx.units("Beams", "tuplet bracket thickness")?;
    let length = ctx.units("Beams", "beam length")?;

    let horizontal = length - thickness;
    rectangle(
        glyph,
        Point::new(0.0, height + hook),
        horizontal,
        thickness / 2.0,
    );
    rectangle(
        glyph,
        Point::new(0.0, height + hook / 2.0),
        thickness,
        hook / 2.0,
    );
    remove_overlap(glyph);
    Ok(horizontal)
}

/// Crescendo hairpin opening to the right, centred on half the x-height.
fn hairpin(ctx: &BuildContext, glyph: &mut Glyph) -> Result<f64, BuildError> {
    let length = ctx.units("Dynamics", "hairpin length")?;
    let aperture = ctx.units("Dynamics", "hairpin aperture")?;
    let thickness = ctx.units("Dynamics", "hairpin line thickness")?;
    let offset = ctx.units("Dynamics", "hairpin height adjustment")?;

    let letter_height = X_HEIGHT_LETTERS
        .iter()
        .find_map(|letter| ctx.bbox(letter).ok())
        .map(|bbox| bbox.height() / 2.0)
        .unwrap_or(ctx.space() / 2.0);
    let origin = Point::new(0.0, letter_height + offset);

    slash(glyph, origin, length, 0.0, aperture / 2.0, thickness);
    slash(glyph, origin, length, 0.0, -aperture / 2.0, thickness);
    remove_overlap(glyph);
    Ok(length)
}

fn niente(ctx: &BuildContext, glyph: &mut Glyph) -> Result<f64, BuildError> {
    let radius = ctx.units("Dynamics", "niente radius")?;
    let thickness = ctx.units("Dynamics", "niente line thickness")?;
    frame(
        glyph,
        FrameShape::Circle {
            center: Point::new(radius + thickness / 2.0, 0.0),
            radius,
        },
        thickness,
    );
    Ok(radius * 2.0 + thickness)
}

/// Rank frame divided by horizontal partition lines.
fn ranks(
    ctx: &BuildContext,
    glyph: &mut Glyph,
    shape: RankShape,
    partitions: usize,
) -> Result<f64, BuildError> {
    let thickness = ctx.units("Accordion", "ranks line thickness")?;
    let (width, height, half_width) = match shape {
        RankShape::Round => {
            let radius = ctx.units("Accordion", "round ranks radius")?;
            let overshoot = ctx.units("Accordion", "round ranks overshoot")?;
            let center = radius + thickness / 2.0;
            frame(
                glyph,
                FrameShape::Circle {
                    center: Point::new(center, center + overshoot),
                    radius,
                },
                thickness,
            );
            (radius * 2.0, (radius + overshoot) * 2.0, radius)
        }
        RankShape::Square => {
            let width = ctx.units("Accordion", "square ranks width")?;
            let height = ctx.units("Accordion", "square ranks height")?;
            frame(
                glyph,
                FrameShape::Rect {
                    origin: Point::new(0.0, (height + thickness) / 2.0),
                    width,
                    height,
                },
                thickness,
            );
            (width, height, width / 2.0)
        }
    };

    for position in partition_positions(height, partitions, thickness) {
        let length = match shape {
            RankShape::Round => chord_length(half_width, position - half_width - thickness / 2.0),
            RankShape::Square => width,
        };
        if length <= 0.0 {
            continue;
        }
        rectangle(
            glyph,
            Point::new(thickness / 2.0 + half_width - length / 2.0, position),
            length,
            thickness / 2.0,
        );
    }
    remove_overlap(glyph);
    Ok(width + thickness)
}

/// Heights of the partition lines inside a rank frame.
fn partition_positions(height: f64, partitions: usize, thickness: f64) -> Vec<f64> {
    if partitions == 0 || height <= 0.0 {
        return Vec::new();
    }
    let increment = height / partitions as f64;
    let start = increment + thickness / 2.0;
    let end = start * partitions as f64 - thickness * 2.0;
    let mut positions = Vec::new();
    let mut position = start;
    while position < end {
        positions.push(position);
        position += increment;
    }
    positions
}

/// Length of the chord `offset` away from the centre of a circle.
fn chord_length(radius: f64, offset: f64) -> f64 {
    let squared = radius * radius - offset * offset;
    if squared <= 0.0 {
        return 0.0;
    }
    squared.sqrt() * 2.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::dataset;
    use crate::build::fixtures::{approx, box_glyph, drawing_context};
    use crate::data::conversions::contour_to_bezpath;
    use crate::geometry::contour::signed_area;
    use kurbo::Shape;
    use norad::PointType;

    #[test]
    fn known_parents_map_to_primitives() {
        assert_eq!(Primitive::from_name("uniE034"), Some(Primitive::ThickBarline));
        assert_eq!(
            Primitive::from_name("uniE023"),
            Some(Primitive::LegerLine(LineWidth::Wide))
        );
        assert_eq!(
            Primitive::from_name("uniE8C9"),
            Some(Primitive::Ranks {
                shape: RankShape::Square,
                partitions: 3
            })
        );
        assert_eq!(Primitive::from_name("uniE0A4"), None);
        assert_eq!(Primitive::from_name("uniE030.ss01"), None);
    }

    #[test]
    fn barline_and_repeat_parents_are_drawable() {
        let mut rules = dataset::barlines();
        rules.extend(dataset::repeats());
        rules.extend(dataset::repeats_alternates());
        for rule in &rules {
            for source in rule.glyph_sources() {
                assert!(Primitive::from_name(source).is_some(), "{source}");
            }
        }
        assert_eq!(Primitive::from_name(THIN_BARLINE), Some(Primitive::ThinBarline));
        assert_eq!(Primitive::from_name(NIENTE), Some(Primitive::Niente));
    }

    #[test]
    fn thin_barline_spans_the_staff() {
        let mut ctx = drawing_context(vec![]);
        draw(&mut ctx, "uniE030", Primitive::ThinBarline).unwrap();
        // 0.16 staff spaces at 1000 UPM
        assert_eq!(ctx.width("uniE030").unwrap(), 40.0);
        let bbox = ctx.bbox("uniE030").unwrap();
        assert_eq!((bbox.y0, bbox.y1), (0.0, 1000.0));
    }

    #[test]
    fn dashed_barline_is_cut_into_dashes() {
        let mut ctx = drawing_context(vec![]);
        draw(&mut ctx, "uniE036", Primitive::DashedBarline).unwrap();
        let glyph = ctx.store().glyph("uniE036").unwrap();
        // dash 125, gap 62 over a 1000 unit staff
        assert!(glyph.contours.len() > 1);
        assert!(glyph.contours.iter().all(|c| signed_area(c) > 0.0));
        let bbox = ctx.bbox("uniE036").unwrap();
        assert_eq!((bbox.y0, bbox.y1), (0.0, 1000.0));
    }

    #[test]
    fn dotted_barline_dots_touch_both_ends() {
        let positions = dotted_positions(1000.0, 31.0, 62.0);
        assert_eq!(positions.first().copied(), Some(31.0));
        assert!(approx(*positions.last().unwrap(), 969.0));
        assert_eq!(positions.len(), 8);
        assert_eq!(dotted_positions(40.0, 31.0, 62.0), vec![31.0]);
    }

    #[test]
    fn staff_and_leger_lines_use_their_widths() {
        let mut ctx = drawing_context(vec![]);
        draw(&mut ctx, "uniE016", Primitive::StaffLine(LineWidth::Wide)).unwrap();
        assert_eq!(ctx.width("uniE016").unwrap(), 375.0);
        let bbox = ctx.bbox("uniE016").unwrap();
        assert_eq!((bbox.y0, bbox.y1), (-16.0, 16.0));

        draw(&mut ctx, "uniE022", Primitive::LegerLine(LineWidth::Medium)).unwrap();
        assert_eq!(ctx.width("uniE022").unwrap(), 332.0);
        let bbox = ctx.bbox("uniE022").unwrap();
        assert_eq!((bbox.x0, bbox.x1), (-100.0, 432.0));
    }

    #[test]
    fn beamed_stems_need_the_notehead() {
        let mut ctx = drawing_context(vec![]);
        assert!(draw(&mut ctx, "uniE204", Primitive::BeamedStem { short: true }).is_err());

        let mut ctx = drawing_context(vec![box_glyph("uniE0A4", 295.0, 250.0)]);
        draw(&mut ctx, "uniE205", Primitive::BeamedStem { short: false }).unwrap();
        draw(&mut ctx, "uniE204", Primitive::BeamedStem { short: true }).unwrap();
        assert_eq!(ctx.width("uniE205").unwrap(), 295.0);
        let long = ctx.bbox("uniE205").unwrap();
        let short = ctx.bbox("uniE204").unwrap();
        assert_eq!(long.x0, 265.0);
        assert_eq!(long.y1, 875.0);
        assert_eq!(short.y1, 625.0);
        assert_eq!(long.y0, short.y0);
    }

    #[test]
    fn tuplet_bracket_merges_into_one_outline() {
        let mut ctx = drawing_context(vec![]);
        draw(&mut ctx, "uniE1FE", Primitive::TupletBracket).unwrap();
        let glyph = ctx.store().glyph("uniE1FE").unwrap();
        assert_eq!(glyph.contours.len(), 1);
        assert_eq!(glyph.width, 625.0 - 40.0);
    }

    #[test]
    fn hairpin_centres_on_half_the_x_height() {
        let mut ctx = drawing_context(vec![box_glyph("uniE521", 300.0, 400.0)]);
        draw(&mut ctx, "uniE53E", Primitive::Hairpin).unwrap();
        let glyph = ctx.store().glyph("uniE53E").unwrap();
        assert_eq!(glyph.width, 1000.0);
        // both arms merge into one outline around the closed end
        assert_eq!(glyph.contours.len(), 1);
        let outline = contour_to_bezpath(&glyph.contours[0]);
        assert_eq!(outline.winding(Point::new(5.0, 200.0)).abs(), 1);
        let bbox = ctx.bbox("uniE53E").unwrap();
        assert_eq!((bbox.y0, bbox.y1), (200.0 - 125.0 - 20.0, 200.0 + 125.0 + 20.0));
    }

    #[test]
    fn niente_is_a_ring() {
        let mut ctx = drawing_context(vec![]);
        draw(&mut ctx, "uniE541", Primitive::Niente).unwrap();
        let glyph = ctx.store().glyph("uniE541").unwrap();
        assert_eq!(glyph.contours.len(), 2);
        assert_eq!(glyph.width, 75.0 * 2.0 + 30.0);
    }

    #[test]
    fn round_rank_partitions_are_chords() {
        assert_eq!(partition_positions(750.0, 3, 40.0), vec![270.0, 520.0]);
        assert!(approx(chord_length(375.0, -125.0), 2.0 * 125_000.0_f64.sqrt()));
        assert_eq!(chord_length(10.0, 20.0), 0.0);

        let mut ctx = drawing_context(vec![]);
        draw(
            &mut ctx,
            "uniE8C6",
            Primitive::Ranks {
                shape: RankShape::Round,
                partitions: 3,
            },
        )
        .unwrap();
        let glyph = ctx.store().glyph("uniE8C6").unwrap();
        assert_eq!(glyph.width, 790.0);
        // one ring whose hole the two partitions cut into three
        let areas: Vec<f64> = glyph
            .contours
            .iter()
            .map(|c| contour_to_bezpath(c).area())
            .collect();
        assert_eq!(areas.iter().filter(|a| **a > 0.0).count(), 1);
        assert_eq!(areas.iter().filter(|a| **a < 0.0).count(), 3);
        let center = Point::new(395.0, 395.0);
        for hole in glyph.contours.iter().filter(|c| contour_to_bezpath(c).area() < 0.0) {
            for p in hole.points.iter().filter(|p| p.typ != PointType::OffCurve) {
                assert!(center.distance(Point::new(p.x, p.y)) <= 355.0 + 0.1);
            }
        }
    }

    #[test]
    fn square_rank_partitions_span_the_frame() {
        let mut ctx = drawing_context(vec![]);
        draw(
            &mut ctx,
            "uniE8C9",
            Primitive::Ranks {
                shape: RankShape::Square,
                partitions: 3,
            },
        )
        .unwrap();
        let bbox = ctx.bbox("uniE8C9").unwrap();
        assert_eq!((bbox.x0, bbox.y0), (0.0, 0.0));
        assert_eq!((bbox.x1, bbox.y1), (665.0, 790.0));
        assert_eq!(ctx.width("uniE8C9").unwrap(), 665.0);
    }

    #[test]
    fn coupler_dot_rests_on_the_baseline() {
        let mut ctx = drawing_context(vec![]);
        draw(&mut ctx, "uniE8CA", Primitive::CouplerDot).unwrap();
        let bbox = ctx.bbox("uniE8CA").unwrap();
        assert!(approx(bbox.y0, 0.0));
        assert_eq!(ctx.width("uniE8CA").unwrap(), 100.0);
    }
}
