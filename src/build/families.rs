//! Family driver
//!
//! Families run in a fixed order so that every family finds the glyphs it
//! reuses from earlier ones (fractions need the numerals' cut time, notes
//! need stems, and so on). `[Include]` switches decide which families and
//! which extras run.

use tracing::info;

use super::builders::{accordion, barlines, dynamics, flags, notes, octaves, staves, time, tremolos};
use super::dataset::{self, CompositionRule, RANGES};
use super::styles::{derive_style_set, StyleSet};
use super::BuildContext;
use crate::core::errors::BuildError;

const LARGE_TIME: [StyleSet; 2] = [
    StyleSet::LargeTimeSignatures,
    StyleSet::LargeNarrowTimeSignatures,
];
const FLAG_STYLES: [StyleSet; 3] = [
    StyleSet::SmallStaff,
    StyleSet::ShortFlags,
    StyleSet::StraightFlags,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    Staves,
    Barlines,
    Repeats,
    Time,
    TimeSup,
    TurnedTime,
    ReversedTime,
    Stems,
    Tremolos,
    IndvNotes,
    BeamedNotes,
    Flags,
    Octaves,
    OctavesSup,
    Dynamics,
    Accordion,
}

impl Family {
    /// Families in the order they are built
    pub const ALL: [Family; 16] = [
        Family::Staves,
        Family::Barlines,
        Family::Repeats,
        Family::Time,
        Family::TimeSup,
        Family::TurnedTime,
        Family::ReversedTime,
        Family::Stems,
        Family::Tremolos,
        Family::IndvNotes,
        Family::BeamedNotes,
        Family::Flags,
        Family::Octaves,
        Family::OctavesSup,
        Family::Dynamics,
        Family::Accordion,
    ];

    /// Key in `[Include]`
    pub fn key(&self) -> &'static str {
        match self {
            Family::Staves => "staves",
            Family::Barlines => "barlines",
            Family::Repeats => "repeats",
            Family::Time => "time",
            Family::TimeSup => "time sup",
            Family::TurnedTime => "turned time",
            Family::ReversedTime => "reversed time",
            Family::Stems => "stems",
            Family::Tremolos => "tremolos",
            Family::IndvNotes => "indv notes",
            Family::BeamedNotes => "beamed notes",
            Family::Flags => "flags",
            Family::Octaves => "octaves",
            Family::OctavesSup => "octaves sup",
            Family::Dynamics => "dynamics",
            Family::Accordion => "accordion",
        }
    }

    /// SMuFL range description
    pub fn range(&self) -> &'static str {
        RANGES
            .iter()
            .find(|(key, _)| *key == self.key())
            .map(|(_, range)| *range)
            .unwrap_or("")
    }

    /// Whether the family has alternates, ligatures or style sets
    fn has_extras(&self) -> bool {
        matches!(
            self,
            Family::Repeats
                | Family::Time
                | Family::TimeSup
                | Family::Flags
                | Family::IndvNotes
                | Family::Octaves
        )
    }
}

/// Rules of a style set, if `[Include]` switches it on.
fn style_rules(
    ctx: &BuildContext,
    style: StyleSet,
    rules: &[CompositionRule],
) -> Result<Option<Vec<CompositionRule>>, BuildError> {
    if !ctx.config().include(style.key())? {
        return Ok(None);
    }
    let suffix = ctx.text("Set Suffixes", style.key())?;
    info!("Building {} ({suffix}) ...", style.key());
    Ok(Some(derive_style_set(style, &suffix, rules)))
}

/// Build every included family.
pub fn run(ctx: &mut BuildContext) -> Result<(), BuildError> {
    let config = ctx.config();
    let mut any_included = false;
    for option in config.options("Include") {
        any_included |= config.include(&option)?;
    }
    if !any_included {
        info!("Nothing to build: switch on a family in [Include] of the settings file");
        return Ok(());
    }
    let registrations = dataset::accordion_registrations()?;

    for family in Family::ALL {
        if !ctx.config().include(family.key())? {
            continue;
        }
        ctx.set_family(family.key());
        info!("Generating {} ...", family.range());

        if ctx.config().include("characters")? {
            characters(ctx, family, &registrations)?;
        } else {
            info!("Skipping recommended characters ...");
        }
        if family.has_extras() {
            extras(ctx, family)?;
        }
    }
    info!("All done!");
    Ok(())
}

fn characters(
    ctx: &mut BuildContext,
    family: Family,
    registrations: &[dataset::AccordionRule],
) -> Result<(), BuildError> {
    match family {
        Family::Staves => staves::build(ctx, &dataset::staves()),
        Family::Barlines => barlines::build(ctx, &dataset::barlines()),
        Family::Repeats => barlines::build(ctx, &dataset::repeats()),
        Family::Time => {
            time::build_cut_time(ctx, &dataset::cut_time())?;
            time::build_fractions(ctx, &dataset::time_fractions())
        }
        Family::TimeSup => time::build_cut_time(ctx, &dataset::cut_time_sup()),
        Family::TurnedTime => {
            time::build_mirrored(ctx, &dataset::turned_time(), time::Mirror::Turned)
        }
        Family::ReversedTime => {
            time::build_mirrored(ctx, &dataset::reversed_time(), time::Mirror::Reversed)
        }
        Family::Stems => notes::build_stems(ctx, &dataset::stems()),
        Family::Tremolos => tremolos::build(ctx, &dataset::tremolos()),
        Family::IndvNotes => notes::build_indv_notes(ctx, &dataset::indv_notes()),
        Family::BeamedNotes => notes::build_beamed_notes(ctx, &dataset::beamed_notes()),
        Family::Flags => flags::build(ctx, &dataset::flags()),
        Family::Octaves => octaves::build(ctx, &dataset::octaves()),
        Family::OctavesSup => octaves::build(ctx, &dataset::octaves_sup()),
        Family::Dynamics => dynamics::build(ctx, &dataset::dynamics()),
        Family::Accordion => accordion::build(ctx, registrations),
    }
}

/// Alternates, ligatures and style sets of a family.
fn extras(ctx: &mut BuildContext, family: Family) -> Result<(), BuildError> {
    let alternates = ctx.config().include("alternates")?;
    match family {
        Family::Repeats if alternates => barlines::build(ctx, &dataset::repeats_alternates())?,
        Family::IndvNotes if alternates => {
            notes::build_indv_notes(ctx, &dataset::indv_notes_alternates())?
        }
        Family::Octaves if alternates => octaves::build(ctx, &dataset::octaves_alternates())?,
        Family::Time => {
            if ctx.config().include("ligatures")? {
                time::build_ligatures(ctx, &dataset::time_ligatures())?;
            }
            for style in LARGE_TIME {
                if let Some(rules) = style_rules(ctx, style, &dataset::cut_time())? {
                    time::build_cut_time(ctx, &rules)?;
                }
                if let Some(rules) = style_rules(ctx, style, &dataset::time_fractions())? {
                    time::build_fractions(ctx, &rules)?;
                }
            }
        }
        Family::TimeSup => {
            for style in LARGE_TIME {
                if let Some(rules) = style_rules(ctx, style, &dataset::cut_time_sup())? {
                    time::build_cut_time(ctx, &rules)?;
                }
            }
        }
        Family::Flags => {
            for style in FLAG_STYLES {
                if let Some(rules) = style_rules(ctx, style, &dataset::flags())? {
                    flags::build(ctx, &rules)?;
                }
            }
        }
        _ => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::fixtures::{box_glyph, drawing_context};
    use serde_json::Value;

    fn only(ctx: &mut BuildContext, keys: &[&str]) {
        for family in Family::ALL {
            ctx.config_mut()
                .user_mut()
                .set("Include", family.key(), Value::from(keys.contains(&family.key())));
        }
    }

    #[test]
    fn every_family_has_a_range() {
        for family in Family::ALL {
            assert!(!family.range().is_empty(), "{:?}", family);
        }
    }

    #[test]
    fn nothing_included_builds_nothing() {
        let mut ctx = drawing_context(vec![]);
        let options = ctx.config().options("Include");
        for option in options {
            ctx.config_mut()
                .user_mut()
                .set("Include", &option, Value::from(false));
        }
        run(&mut ctx).unwrap();
        assert_eq!(ctx.store().glyph_count(), 0);
    }

    #[test]
    fn included_families_build_from_drawn_parents() {
        let mut ctx = drawing_context(vec![]);
        only(&mut ctx, &["staves", "barlines"]);
        run(&mut ctx).unwrap();
        assert!(ctx.has_glyph("uniE012"));
        assert!(ctx.has_glyph("uniE031"));
        assert!(!ctx.has_glyph("uniE1D5"));
        let staves = ctx.report().family("staves").unwrap();
        assert!(staves.synthesized.contains(&"uniE010".to_string()));
        assert_eq!(staves.appended.len(), 15);
    }

    #[test]
    fn characters_switch_skips_main_tables() {
        let mut ctx = drawing_context(vec![]);
        only(&mut ctx, &["staves"]);
        ctx.config_mut()
            .user_mut()
            .set("Include", "characters", Value::from(false));
        run(&mut ctx).unwrap();
        assert!(!ctx.has_glyph("uniE011"));
    }

    #[test]
    fn style_sets_follow_the_main_flags() {
        let mut glyphs = Vec::new();
        for name in ["uniE242", "uniE243", "uniE250", "uniE251", "uniE242.ss02", "uniE243.ss02"] {
            glyphs.push(box_glyph(name, 250.0, 700.0));
        }
        let mut ctx = drawing_context(glyphs);
        only(&mut ctx, &["flags"]);
        ctx.config_mut()
            .user_mut()
            .set("Include", "short flags", Value::from(true));
        run(&mut ctx).unwrap();
        assert!(ctx.has_glyph("uniE244"));
        assert!(ctx.has_glyph("uniE244.ss02"));
        assert!(!ctx.has_glyph("uniE244.ss03"));
    }
}
