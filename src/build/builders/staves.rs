//! Staves of two to six lines

use crate::build::dataset::CompositionRule;
use crate::build::{BuildContext, RuleOutcome};
use crate::core::errors::BuildError;

use super::{for_each_rule, prepare_sources, symmetric_shifts, Composite};

pub fn build(ctx: &mut BuildContext, rules: &[CompositionRule]) -> Result<(), BuildError> {
    for_each_rule(ctx, rules, compose)
}

/// Stack every line of the rule symmetrically about the baseline.
fn compose(
    ctx: &mut BuildContext,
    rule: &CompositionRule,
    target: &str,
) -> Result<RuleOutcome, BuildError> {
    if prepare_sources(ctx, rule.glyph_sources())?.is_some() {
        return Ok(ctx.incomplete(target));
    }
    let Some(line) = rule.glyph_sources().next() else {
        return Ok(ctx.incomplete(target));
    };
    let count = rule.glyph_sources().count();

    let mut composite = Composite::with_width(ctx.width(line)?);
    for shift in symmetric_shifts(count, ctx.space()) {
        composite.place(line, 0.0, shift);
    }
    ctx.commit(target, composite)
}
