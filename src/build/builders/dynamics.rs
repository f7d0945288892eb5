//! Dynamics: letter combinations and hairpins

use crate::build::dataset::{CompositionRule, DIMINUENDO, HAIRPIN};
use crate::build::{BuildContext, RuleOutcome};
use crate::core::errors::BuildError;

use super::{for_each_rule, prepare_sources, ComponentPlacement, Composite};

const SECTION: &str = "Dynamics";

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
    let composite = if rule.contains(HAIRPIN) {
        hairpins(ctx, rule, target)?
    } else {
        letters(ctx, rule)?
    };
    ctx.commit(target, composite)
}

/// Letters spaced by advance, kerning and the configured spacing.
fn letters(ctx: &BuildContext, rule: &CompositionRule) -> Result<Composite, BuildError> {
    let spacing = ctx.units(SECTION, "component spacing")?;
    let sources: Vec<&str> = rule.glyph_sources().collect();

    let mut composite = Composite::default();
    let mut x = 0.0;
    for (i, source) in sources.iter().enumerate() {
        let kern = if i == 0 {
            0.0
        } else {
            ctx.kerning(sources[i - 1], source)
        };
        composite.place(source, x + kern, 0.0);
        x += ctx.width(source)? + spacing + kern;
    }
    composite.width = x - spacing;
    Ok(composite)
}

/// Diminuendo mirrors the crescendo; messa di voce joins both.
fn hairpins(
    ctx: &BuildContext,
    rule: &CompositionRule,
    target: &str,
) -> Result<Composite, BuildError> {
    let width = ctx.width(HAIRPIN)?;
    let mut composite = Composite::with_width(width);
    if target == DIMINUENDO {
        composite.push(ComponentPlacement::scaled(HAIRPIN, width, 0.0, -1.0, 1.0));
        return Ok(composite);
    }
    for (i, source) in rule.glyph_sources().enumerate() {
        if i == 0 {
            composite.place(source, 0.0, 0.0);
        } else {
            let span = width * 2.0 + ctx.units(SECTION, "hairpin spacing")?;
            composite.push(ComponentPlacement::scaled(source, span, 0.0, -1.0, 1.0));
            composite.width = span;
        }
    }
    Ok(composite)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::dataset::dynamics;
    use crate::build::fixtures::{box_glyph, context, drawing_context, placements};
    use norad::Font;

    fn letters_font() -> Vec<norad::Glyph> {
        vec![
            box_glyph("uniE520", 300.0, 400.0),
            box_glyph("uniE521", 250.0, 400.0),
            box_glyph("uniE522", 350.0, 600.0),
        ]
    }

    fn rule_for(target: &str) -> Vec<CompositionRule> {
        dynamics()
            .into_iter()
            .filter(|rule| rule.target_name() == Some(target))
            .collect()
    }

    #[test]
    fn letters_without_kerning_touch() {
        let mut ctx = context(letters_font());
        build(&mut ctx, &rule_for("uniE52B")).unwrap();
        let xs: Vec<f64> = placements(&ctx, "uniE52B").iter().map(|p| p.1).collect();
        assert_eq!(xs, vec![0.0, 300.0]);
        assert_eq!(ctx.width("uniE52B").unwrap(), 600.0);
    }

    #[test]
    fn kerning_pulls_the_pair_together() {
        let mut font = Font::new();
        for glyph in letters_font() {
            font.default_layer_mut().insert_glyph(glyph);
        }
        let mut pairs = std::collections::BTreeMap::new();
        pairs.insert("uniE522".parse().unwrap(), -40.0);
        font.kerning.insert("uniE521".parse().unwrap(), pairs);
        let store = crate::font_source::GlyphStore::new(font);
        let config = crate::core::config::Config::with_defaults(store.units_per_em()).unwrap();
        let mut ctx = BuildContext::new(store, config).unwrap();
        build(&mut ctx, &rule_for("uniE52D")).unwrap();
        let xs: Vec<f64> = placements(&ctx, "uniE52D").iter().map(|p| p.1).collect();
        assert_eq!(xs, vec![0.0, 210.0]);
        assert_eq!(ctx.width("uniE52D").unwrap(), 250.0 + 350.0 - 40.0);
    }

    #[test]
    fn hairpins_mirror_the_crescendo() {
        let mut ctx = drawing_context(vec![box_glyph("uniE521", 250.0, 400.0)]);
        build(&mut ctx, &rule_for(DIMINUENDO)).unwrap();
        assert_eq!(
            placements(&ctx, DIMINUENDO),
            vec![(HAIRPIN.to_string(), 1000.0, 0.0, -1.0, 1.0)]
        );

        build(&mut ctx, &rule_for("uniE540")).unwrap();
        let placed = placements(&ctx, "uniE540");
        // two hairpins plus half a staff space
        assert_eq!(placed[1], (HAIRPIN.to_string(), 2125.0, 0.0, -1.0, 1.0));
        assert_eq!(ctx.width("uniE540").unwrap(), 2125.0);
    }

    #[test]
    fn niente_is_drawn_as_a_parent() {
        let mut ctx = drawing_context(vec![]);
        build(&mut ctx, &dynamics()[..1]).unwrap();
        assert!(ctx.has_glyph("uniE541"));
    }
}
