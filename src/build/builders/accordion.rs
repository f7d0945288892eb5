//! Accordion registrations
//!
//! Each registration is a rank frame with coupler dots at fixed fractions
//! of the frame's bounding box. The fractions were measured on the SMuFL
//! reference glyphs and do not depend on the partition geometry.

use crate::build::dataset::{
    accordion_parents, AccordionRule, Placement, COUPLER_DOT, SQUARE_RANKS,
};
use crate::build::{BuildContext, RuleOutcome};
use crate::core::errors::BuildError;

use super::{ensure_parents, prepare_sources, Composite};

/// Divisors of the bounding box width and height; `None` means centred.
fn divisors(placement: Placement) -> (Option<f64>, Option<f64>) {
    match placement {
        Placement::Stop4 => (None, Some(1.219)),
        Placement::Upper8 | Placement::Master => (Some(1.3), None),
        Placement::Lower8 => (Some(4.333), None),
        Placement::Stop16 => (None, Some(5.571)),
        Placement::Soprano => (None, Some(1.1624)),
        Placement::Alto => (None, Some(1.612)),
        Placement::Tenor => (None, Some(2.635)),
        Placement::Bass => (None, Some(7.156)),
        Placement::Stop8b => (None, Some(1.352)),
        Placement::Stop16b => (None, Some(3.842)),
        Placement::Stop8c => (None, Some(5.555)),
        Placement::Stop2 => (None, Some(1.22)),
        Placement::Left8Stop => (Some(3.079), Some(5.555)),
        Placement::Right8Stop => (Some(1.481), Some(5.555)),
        Placement::Stop8 | Placement::Double8Stop => (None, None),
    }
}

/// Draw the rank frames and coupler dot, then build every registration.
pub fn build(ctx: &mut BuildContext, registrations: &[AccordionRule]) -> Result<(), BuildError> {
    for rule in accordion_parents() {
        let result = ensure_parents(ctx, &rule);
        ctx.settle(&rule.label(), result)?;
    }
    for registration in registrations {
        let target = registration.target.as_str();
        let result = if ctx.excluded(target)? {
            Ok(RuleOutcome::Excluded)
        } else {
            compose(ctx, registration)
        };
        ctx.settle(target, result)?;
    }
    Ok(())
}

fn compose(
    ctx: &mut BuildContext,
    registration: &AccordionRule,
) -> Result<RuleOutcome, BuildError> {
    let rank = registration.rank.as_str();
    if prepare_sources(ctx, [rank, COUPLER_DOT])?.is_some() {
        return Ok(ctx.incomplete(&registration.target));
    }
    let frame = ctx.bbox(rank)?;
    let dot = ctx.bbox(COUPLER_DOT)?;
    let overshoot = if rank == SQUARE_RANKS {
        0.0
    } else {
        ctx.units("Accordion", "round ranks overshoot")?
    };

    let mut composite = Composite::with_width(ctx.width(rank)?);
    composite.place(rank, 0.0, 0.0);
    for placement in &registration.placements {
        let (x_divisor, y_divisor) = divisors(*placement);
        let x = x_divisor.map_or(frame.width() / 2.0, |d| frame.width() / d);
        let y = y_divisor.map_or(frame.height() / 2.0, |d| frame.height() / d);
        composite.place(
            COUPLER_DOT,
            x - dot.width() / 2.0,
            y - dot.height() / 2.0 + overshoot,
        );
    }
    ctx.commit(&registration.target, composite)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::dataset::accordion_registrations;
    use crate::build::fixtures::{approx, box_glyph, context, drawing_context, placements};

    fn registration(target: &str) -> AccordionRule {
        accordion_registrations()
            .unwrap()
            .into_iter()
            .find(|rule| rule.target == target)
            .unwrap()
    }

    #[test]
    fn every_placement_has_divisors() {
        for placement in Placement::ALL {
            let (x, y) = divisors(placement);
            assert!(x.map_or(true, |d| d > 1.0));
            assert!(y.map_or(true, |d| d > 1.0));
        }
    }

    #[test]
    fn dots_land_on_fixed_fractions() {
        let mut ctx = context(vec![
            box_glyph("uniE8C6", 780.0, 780.0),
            box_glyph("uniE8C7", 780.0, 780.0),
            box_glyph("uniE8C8", 780.0, 780.0),
            box_glyph("uniE8C9", 625.0, 750.0),
            box_glyph(COUPLER_DOT, 100.0, 100.0),
        ]);
        build(&mut ctx, &[registration("uniE8A0"), registration("uniE8A3")]).unwrap();

        let placed = placements(&ctx, "uniE8A0");
        assert_eq!(placed[0].0, "uniE8C6");
        assert_eq!(placed[1].1, 390.0 - 50.0);
        assert!(approx(placed[1].2, 780.0 / 1.219 - 50.0));

        let placed = placements(&ctx, "uniE8A3");
        assert!(approx(placed[1].1, 780.0 / 4.333 - 50.0));
        assert_eq!(placed[1].2, 390.0 - 50.0);
        assert_eq!(ctx.width("uniE8A3").unwrap(), 780.0);
    }

    #[test]
    fn stop_combinations_place_one_dot_each() {
        let mut ctx = drawing_context(vec![]);
        build(&mut ctx, &[registration("uniE8B3"), registration("uniE8C5")]).unwrap();
        assert_eq!(placements(&ctx, "uniE8B3").len(), 6);
        let placed = placements(&ctx, "uniE8C5");
        assert_eq!(placed.len(), 4);
        assert_eq!(placed[0].0, SQUARE_RANKS);
        // left and right 8' stops share a height
        assert_eq!(placed[2].2, placed[3].2);
        assert!(placed[2].1 < placed[3].1);
    }

    #[test]
    fn missing_rank_leaves_registration_unbuilt() {
        let mut ctx = context(vec![box_glyph(COUPLER_DOT, 100.0, 100.0)]);
        build(&mut ctx, &[registration("uniE8B4")]).unwrap();
        assert!(!ctx.has_glyph("uniE8B4"));
    }
}
