//! Octave indications
//!
//! Letters and numerals are set side by side at their advance widths. In
//! the alta/bassa forms that carry a superscript, the trailing letters are
//! raised to the top of the numeral.

use crate::build::dataset::{
    base_name, CompositionRule, OCTAVE_BASELINE_A, OCTAVE_EIGHT, OCTAVE_LETTERS,
    SUPERSCRIPT_LETTERS, SUPERSCRIPT_TARGETS,
};
use crate::build::{BuildContext, RuleOutcome};
use crate::core::errors::BuildError;

use super::{for_each_rule, prepare_sources, Composite};

const SECTION: &str = "Octaves";

pub fn build(ctx: &mut BuildContext, rules: &[CompositionRule]) -> Result<(), BuildError> {
    for_each_rule(ctx, rules, compose)
}

/// Glyph name for a source, looking up unencoded letters in the config.
fn resolve_letter(ctx: &BuildContext, source: &str) -> Result<String, BuildError> {
    match OCTAVE_LETTERS.iter().find(|(placeholder, _)| *placeholder == source) {
        Some((_, option)) => Ok(ctx.text(SECTION, option)?),
        None => Ok(source.to_string()),
    }
}

/// Vertical lift and kern of superscript letters.
fn superscript(ctx: &BuildContext) -> Result<(f64, f64), BuildError> {
    let numeral = ctx.bbox(OCTAVE_EIGHT)?;
    let letter = ctx.bbox(OCTAVE_BASELINE_A)?;
    let adjustment = ctx.units(SECTION, "superscript height adjustment")?;
    let lift = numeral.y1 - letter.y1 + numeral.y0 + adjustment;
    Ok((lift, ctx.units(SECTION, "superscript kern")?))
}

fn compose(
    ctx: &mut BuildContext,
    rule: &CompositionRule,
    target: &str,
) -> Result<RuleOutcome, BuildError> {
    let sources = rule
        .glyph_sources()
        .map(|source| resolve_letter(ctx, source))
        .collect::<Result<Vec<_>, _>>()?;
    if prepare_sources(ctx, sources.iter().map(String::as_str))?.is_some() {
        return Ok(ctx.incomplete(target));
    }

    let raised = SUPERSCRIPT_TARGETS.contains(&base_name(target));
    let (lift, kern) = if raised {
        if prepare_sources(ctx, [OCTAVE_EIGHT, OCTAVE_BASELINE_A])?.is_some() {
            return Ok(ctx.incomplete(target));
        }
        superscript(ctx)?
    } else {
        (0.0, 0.0)
    };
    let spacing = ctx.units(SECTION, "component spacing")?;

    let mut composite = Composite::default();
    let mut x = 0.0;
    for source in &sources {
        let advance = ctx.width(source)? + spacing;
        let mut width = x + advance;
        if raised && SUPERSCRIPT_LETTERS.contains(&source.as_str()) {
            composite.place(source, x + kern, lift);
            width += kern;
        } else {
            composite.place(source, x, 0.0);
        }
        composite.width = width;
        x += advance;
    }
    ctx.commit(target, composite)
}
