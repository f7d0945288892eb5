//! Tremolo slashes and divisi dots

use crate::build::dataset::{CompositionRule, DIVISI_DOT, FINGERED_TREMOLO_SLASH};
use crate::build::{BuildContext, RuleOutcome};
use crate::core::errors::BuildError;

use super::{for_each_rule, prepare_sources, symmetric_shifts, Composite};

const SECTION: &str = "Tremolos";

pub fn build(ctx: &mut BuildContext, rules: &[CompositionRule]) -> Result<(), BuildError> {
    for_each_rule(ctx, rules, compose)
}

fn compose(
    ctx: &mut BuildContext,
    rule: &CompositionRule,
    target: &str,
) -> Result<RuleOutcome, BuildError> {
    if prepare_sources(ctx, rule.glyph_sources())?.is_some() {
        return Ok(ctx.incomplete(target));
    }
    let Some(parent) = rule.glyph_sources().next() else {
        return Ok(ctx.incomplete(target));
    };
    let count = rule.count(parent);
    let height = ctx.bbox(parent)?.height();

    let composite = if parent == DIVISI_DOT {
        let spacing = ctx.units(SECTION, "divisi dot spacing")?;
        divisi_dots(parent, count, height + spacing, spacing)
    } else {
        let option = if parent == FINGERED_TREMOLO_SLASH {
            "fingered tremolo spacing"
        } else {
            "tremolo slash spacing"
        };
        let separation = height + ctx.units(SECTION, option)?;
        let mut composite = Composite::with_width(ctx.width(parent)?);
        for shift in symmetric_shifts(count, separation) {
            composite.place(parent, 0.0, shift);
        }
        composite
    };
    ctx.commit(target, composite)
}

/// A row of dots from the origin; six dots fold into two rows of three.
fn divisi_dots(dot: &str, count: usize, separation: f64, spacing: f64) -> Composite {
    let (columns, rows) = if count == 6 { (3, 2) } else { (count, 1) };
    let mut composite = Composite::with_width(separation * columns as f64 - spacing);
    for column in 0..columns {
        for row in 0..rows {
            composite.place(dot, separation * column as f64, separation * row as f64);
        }
    }
    composite
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::dataset::{tremolos, TREMOLO_SLASH};
    use crate::build::fixtures::{box_glyph, context, placements};

    fn parents() -> Vec<norad::Glyph> {
        vec![
            box_glyph(TREMOLO_SLASH, 200.0, 100.0),
            box_glyph(FINGERED_TREMOLO_SLASH, 200.0, 100.0),
            box_glyph(DIVISI_DOT, 100.0, 100.0),
        ]
    }

    #[test]
    fn slashes_stack_about_the_centre() {
        let mut ctx = context(parents());
        build(&mut ctx, &tremolos()).unwrap();
        // slash height 100 plus spacing 62
        let offsets: Vec<f64> = placements(&ctx, "uniE222").iter().map(|p| p.2).collect();
        assert_eq!(offsets, vec![0.0, 162.0, -162.0]);
        // fingered spacing 75
        let offsets: Vec<f64> = placements(&ctx, "uniE226").iter().map(|p| p.2).collect();
        assert_eq!(offsets, vec![87.5, -87.5]);
        assert_eq!(ctx.width("uniE224").unwrap(), 200.0);
    }

    #[test]
    fn divisi_dots_run_from_the_origin() {
        let mut ctx = context(parents());
        build(&mut ctx, &tremolos()).unwrap();
        let xs: Vec<f64> = placements(&ctx, "uniE22F").iter().map(|p| p.1).collect();
        assert_eq!(xs, vec![0.0, 175.0, 350.0]);
        assert_eq!(ctx.width("uniE22F").unwrap(), 175.0 * 3.0 - 75.0);
    }

    #[test]
    fn six_dots_make_two_rows() {
        let composite = divisi_dots(DIVISI_DOT, 6, 175.0, 75.0);
        assert_eq!(composite.components.len(), 6);
        let top_row = composite
            .components
            .iter()
            .filter(|c| c.offset.y == 175.0)
            .count();
        assert_eq!(top_row, 3);
        assert_eq!(composite.width, 175.0 * 3.0 - 75.0);
    }
}
