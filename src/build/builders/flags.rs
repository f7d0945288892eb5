//! Flags for 32nd notes and shorter, stacked on the 16th flag

use crate::build::dataset::{base_name, name_suffix, CompositionRule, DOWN_FLAGS};
use crate::build::{BuildContext, RuleOutcome};
use crate::core::errors::BuildError;

use super::{for_each_rule, prepare_sources, Composite};

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
    let Some(base) = rule.glyph_sources().next() else {
        return Ok(ctx.incomplete(target));
    };
    let straight = ctx.config().include("straight flags")?
        && name_suffix(base) == format!(".{}", ctx.text("Set Suffixes", "straight flags")?);
    let option = if straight {
        "straight flag spacing"
    } else {
        "internal flag spacing"
    };
    let mut spacing = ctx.units("Flags", option)?;
    if DOWN_FLAGS.contains(&base_name(base)) {
        spacing = -spacing;
    }

    let mut composite = Composite::default();
    for (i, source) in rule.glyph_sources().enumerate() {
        composite.place(source, 0.0, spacing * (i as f64 - 1.0));
        composite.width = ctx.width(source)?;
    }
    ctx.commit(target, composite)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::dataset::flags;
    use crate::build::fixtures::{box_glyph, context, placements};
    use serde_json::Value;

    fn parents() -> Vec<norad::Glyph> {
        ["uniE242", "uniE243", "uniE250", "uniE251"]
            .iter()
            .map(|name| box_glyph(name, 250.0, 700.0))
            .collect()
    }

    #[test]
    fn up_flags_stack_upward() {
        let mut ctx = context(parents());
        build(&mut ctx, &flags()).unwrap();
        // 32nd up: 16th flag then one internal flag, spacing 187
        let offsets: Vec<f64> = placements(&ctx, "uniE244").iter().map(|p| p.2).collect();
        assert_eq!(offsets, vec![-187.0, 0.0]);
        assert_eq!(ctx.width("uniE244").unwrap(), 250.0);
    }

    #[test]
    fn down_flags_stack_downward() {
        let mut ctx = context(parents());
        build(&mut ctx, &flags()).unwrap();
        let offsets: Vec<f64> = placements(&ctx, "uniE247").iter().map(|p| p.2).collect();
        assert_eq!(offsets, vec![187.0, 0.0, -187.0]);
    }

    fn straight_rules() -> Vec<CompositionRule> {
        vec![CompositionRule::named(
            "uniE244.ss03",
            &["uniE240.ss03", "uniE240.ss03", "uniE240.ss03"],
        )]
    }

    #[test]
    fn straight_flags_use_their_own_spacing() {
        let mut ctx = context(vec![box_glyph("uniE240.ss03", 250.0, 700.0)]);
        ctx.config_mut()
            .user_mut()
            .set("Include", "straight flags", Value::from(true));
        build(&mut ctx, &straight_rules()).unwrap();
        let offsets: Vec<f64> = placements(&ctx, "uniE244.ss03").iter().map(|p| p.2).collect();
        // 0.6 staff spaces
        assert_eq!(offsets, vec![-150.0, 0.0, 150.0]);
    }

    #[test]
    fn straight_suffix_alone_keeps_internal_spacing() {
        let mut ctx = context(vec![box_glyph("uniE240.ss03", 250.0, 700.0)]);
        ctx.config_mut()
            .user_mut()
            .set("Include", "straight flags", Value::from(false));
        build(&mut ctx, &straight_rules()).unwrap();
        let offsets: Vec<f64> = placements(&ctx, "uniE244.ss03").iter().map(|p| p.2).collect();
        assert_eq!(offsets, vec![-187.0, 0.0, 187.0]);
    }
}
