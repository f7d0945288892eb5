//! Barlines and repeat signs
//!
//! Sources are laid out left to right by ink width. Repeat dots sit in the
//! second and third staff spaces; a dot that follows another dot is pulled
//! back on top of it so the pair forms one column.

use crate::build::dataset::{CompositionRule, REPEAT_DOT};
use crate::build::{BuildContext, RuleOutcome};
use crate::core::errors::BuildError;

use super::{for_each_rule, prepare_sources, Composite};

pub fn build(ctx: &mut BuildContext, rules: &[CompositionRule]) -> Result<(), BuildError> {
    for_each_rule(ctx, rules, compose)
}

/// Gap before each source; the first source has none.
fn separations(
    sources: &[&str],
    widths: &[f64],
    barline: f64,
    dot: f64,
) -> Vec<f64> {
    sources
        .iter()
        .enumerate()
        .map(|(i, source)| {
            if i == 0 {
                return 0.0;
            }
            let previous = sources[i - 1];
            if *source == REPEAT_DOT && previous == REPEAT_DOT {
                -widths[i]
            } else if *source == REPEAT_DOT || previous == REPEAT_DOT {
                dot
            } else {
                barline
            }
        })
        .collect()
}

fn compose(
    ctx: &mut BuildContext,
    rule: &CompositionRule,
    target: &str,
) -> Result<RuleOutcome, BuildError> {
    if prepare_sources(ctx, rule.glyph_sources())?.is_some() {
        return Ok(ctx.incomplete(target));
    }
    let sources: Vec<&str> = rule.glyph_sources().collect();
    let widths = sources
        .iter()
        .map(|source| ctx.bbox(source).map(|bbox| bbox.width()))
        .collect::<Result<Vec<_>, _>>()?;
    let gaps = separations(
        &sources,
        &widths,
        ctx.units("Barlines", "barline separation")?,
        ctx.units("Repeats", "repeat barline dot separation")?,
    );
    let space = ctx.space();

    let mut composite = Composite::default();
    let mut x = 0.0;
    for (i, source) in sources.iter().enumerate() {
        x += gaps[i];
        let y = if *source == REPEAT_DOT {
            if i % 2 == 1 {
                space * 1.5
            } else {
                space * 2.5
            }
        } else {
            0.0
        };
        composite.place(source, x, y);
        x += widths[i];
    }
    composite.width = x;
    ctx.commit(target, composite)
}
