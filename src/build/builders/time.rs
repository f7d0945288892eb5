//! Time signatures: cut time, fractions, mirrored numerals and the
//! numerator/denominator ligatures

use kurbo::Vec2;

use crate::build::dataset::{
    base_name, is_control_character, name_suffix, CompositionRule, DENOMINATOR_CONTROL,
};
use crate::build::{BuildContext, RuleOutcome};
use crate::core::errors::BuildError;
use crate::font_source::NEVER_DECOMPOSE;

use super::{for_each_rule, prepare_sources, ComponentPlacement, Composite};

const SECTION: &str = "Time Signatures";
const FRACTION_SCALE: f64 = 0.5;
const NUMERAL_ONE: &str = "uniE081";
const NUMERAL_FOUR: &str = "uniE084";

/// Negative-scale copy of a numeral
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mirror {
    /// Rotated by half a turn
    Turned,
    /// Flipped left to right
    Reversed,
}

/// Numerals with the vertical stroke centred over them.
pub fn build_cut_time(ctx: &mut BuildContext, rules: &[CompositionRule]) -> Result<(), BuildError> {
    for_each_rule(ctx, rules, cut_time)
}

fn cut_time(
    ctx: &mut BuildContext,
    rule: &CompositionRule,
    target: &str,
) -> Result<RuleOutcome, BuildError> {
    let Some(parent) = rule.glyph_sources().next() else {
        return Ok(ctx.incomplete(target));
    };
    let stroke = format!("{}{}", ctx.text(SECTION, "cut time stroke")?, name_suffix(parent));
    if prepare_sources(ctx, [parent, stroke.as_str()])?.is_some() {
        return Ok(ctx.incomplete(target));
    }
    let parent_box = ctx.bbox(parent)?;
    let stroke_box = ctx.bbox(&stroke)?;

    let mut composite = Composite::with_width(ctx.width(parent)?);
    composite.place(parent, 0.0, 0.0);
    composite.place(&stroke, parent_box.center().x - stroke_box.center().x, 0.0);
    ctx.commit(target, composite)
}

/// Half-size numerator and denominator around a full-size slash.
pub fn build_fractions(
    ctx: &mut BuildContext,
    rules: &[CompositionRule],
) -> Result<(), BuildError> {
    for_each_rule(ctx, rules, fraction)
}

fn fraction(
    ctx: &mut BuildContext,
    rule: &CompositionRule,
    target: &str,
) -> Result<RuleOutcome, BuildError> {
    if prepare_sources(ctx, rule.glyph_sources())?.is_some() {
        return Ok(ctx.incomplete(target));
    }
    let sources: Vec<&str> = rule.glyph_sources().collect();
    let [numerator, slash, denominator] = sources.as_slice() else {
        return Ok(ctx.incomplete(target));
    };
    let space = ctx.space();
    let sidebearings = ctx.units(SECTION, "fraction sidebearings")?;
    let spacing = ctx.units(SECTION, "fraction spacing")?;
    let one_kern = ctx.units(SECTION, "fraction one kern")?;
    let four_kern = ctx.units(SECTION, "fraction four kern")?;

    let mut numerator_width = ctx.width(numerator)? * FRACTION_SCALE + sidebearings;
    if base_name(numerator) == NUMERAL_ONE {
        numerator_width += one_kern;
    }
    let mut denominator_x = numerator_width + spacing * 2.0;
    let mut denominator_width = ctx.width(denominator)? * FRACTION_SCALE + sidebearings;
    if base_name(denominator) == NUMERAL_FOUR {
        denominator_x += four_kern;
        denominator_width += four_kern;
    }
    let slash_x = numerator_width - ctx.width(slash)? / 2.0 + spacing;

    let mut composite = Composite::with_width(numerator_width + denominator_width + spacing * 2.0);
    composite.push(ComponentPlacement::scaled(
        numerator,
        sidebearings,
        space / 2.0,
        FRACTION_SCALE,
        FRACTION_SCALE,
    ));
    composite.place(slash, slash_x, 0.0);
    composite.push(ComponentPlacement::scaled(
        denominator,
        denominator_x,
        -space / 2.0,
        FRACTION_SCALE,
        FRACTION_SCALE,
    ));
    ctx.commit(target, composite)
}

pub fn build_mirrored(
    ctx: &mut BuildContext,
    rules: &[CompositionRule],
    mirror: Mirror,
) -> Result<(), BuildError> {
    for_each_rule(ctx, rules, |ctx, rule, target| mirrored(ctx, rule, target, mirror))
}

fn mirrored(
    ctx: &mut BuildContext,
    rule: &CompositionRule,
    target: &str,
    mirror: Mirror,
) -> Result<RuleOutcome, BuildError> {
    let Some(source) = rule.glyph_sources().next() else {
        return Ok(ctx.incomplete(target));
    };
    if !ctx.prepare(source)? {
        return Ok(ctx.incomplete(target));
    }
    let width = ctx.width(source)?;
    let (offset, scale) = match mirror {
        Mirror::Turned => {
            let bbox = ctx.bbox(source)?;
            (Vec2::new(width, bbox.y0 + bbox.y1), Vec2::new(-1.0, -1.0))
        }
        Mirror::Reversed => (Vec2::new(width, 0.0), Vec2::new(-1.0, 1.0)),
    };

    let mut composite = Composite::with_width(width);
    let nested = ctx
        .store()
        .glyph(source)
        .filter(|_| NEVER_DECOMPOSE.contains(&source))
        .map(|glyph| glyph.components.clone())
        .unwrap_or_default();
    if nested.is_empty() {
        composite.push(ComponentPlacement::scaled(
            source, offset.x, offset.y, scale.x, scale.y,
        ));
    } else {
        for component in &nested {
            composite.push(ComponentPlacement::composed(
                component.base.as_str(),
                offset,
                scale,
                &component.transform,
            ));
        }
    }
    ctx.commit(target, composite)
}

pub fn build_ligatures(
    ctx: &mut BuildContext,
    rules: &[CompositionRule],
) -> Result<(), BuildError> {
    for_each_rule(ctx, rules, ligature)
}

/// Stacked numerals for a ligature named after its own tokens.
///
/// Control tokens mark the following digit as numerator or denominator and
/// are never placed themselves.
fn ligature(
    ctx: &mut BuildContext,
    rule: &CompositionRule,
    target: &str,
) -> Result<RuleOutcome, BuildError> {
    if prepare_sources(ctx, rule.glyph_sources())?.is_some() {
        return Ok(ctx.incomplete(target));
    }
    let tokens: Vec<&str> = rule.glyph_sources().collect();
    let space = ctx.space();

    let mut digits = Vec::new();
    for (i, token) in tokens.iter().enumerate() {
        if is_control_character(token) {
            continue;
        }
        let dy = if i > 0 && tokens[i - 1] == DENOMINATOR_CONTROL {
            space
        } else {
            space * 3.0
        };
        digits.push((*token, ctx.width(token)?, dy));
    }
    if digits.is_empty() {
        return Ok(ctx.incomplete(target));
    }

    let mut composite = Composite::default();
    if digits.len() > 2 {
        // two-digit numerator over a centred denominator
        let (first, first_width, first_dy) = digits[0];
        let (second, second_width, second_dy) = digits[1];
        let (last, last_width, last_dy) = digits[digits.len() - 1];
        let block = first_width + second_width;
        composite.place(first, 0.0, first_dy);
        composite.place(second, first_width, second_dy);
        composite.place(last, block / 2.0 - last_width / 2.0, last_dy);
        composite.width = block;
    } else {
        for (digit, _, dy) in &digits {
            composite.place(digit, 0.0, *dy);
        }
        composite.width = digits
            .iter()
            .map(|(_, width, _)| *width)
            .fold(0.0, f64::max);
    }
    ctx.commit(target, composite)
}
