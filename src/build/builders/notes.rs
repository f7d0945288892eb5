//! Stems, individual notes and beamed groups

use crate::build::dataset::{
    base_name, CompositionRule, Slot, BEAM, DOWN_FLAGS, DOWN_STEM_NOTES, LONG_BEAMED_STEM,
    NOTEHEADS, RIM_SHOT, SHORT_BEAMED_STEM, STEM, TUPLET_THREE,
};
use crate::build::{BuildContext, RuleOutcome};
use crate::core::errors::BuildError;

use super::{for_each_rule, prepare_sources, ComponentPlacement, Composite};

const TUPLET_SCALE: f64 = 0.72;
const TUPLET_NUMBERS: &[&str] = &["uniE1FF", "uniE202"];
const REVERSED_BRACKETS: &[&str] = &["uniE200", "uniE203"];
const LONG_STEM_TUPLETS: &[&str] = &["uniE201", "uniE202", "uniE203"];
/// Groups whose beams stack like those on a long stem
const LONG_BEAM_GROUPS: &[&str] = &["uniE1F8", "uniE1FA", "uniE1FB"];

pub fn build_stems(ctx: &mut BuildContext, rules: &[CompositionRule]) -> Result<(), BuildError> {
    for_each_rule(ctx, rules, stem_with_symbol)
}

/// Stem with a technique symbol two staff spaces up.
fn stem_with_symbol(
    ctx: &mut BuildContext,
    rule: &CompositionRule,
    target: &str,
) -> Result<RuleOutcome, BuildError> {
    if prepare_sources(ctx, rule.glyph_sources())?.is_some() {
        return Ok(ctx.incomplete(target));
    }
    let mut composite = Composite::with_width(ctx.width(STEM)?);
    composite.place(STEM, 0.0, 0.0);

    let stem_thickness = ctx.units("Stems", "stem thickness")?;
    for symbol in rule.glyph_sources().filter(|source| *source != STEM) {
        let mut dx = stem_thickness / 2.0;
        if symbol == RIM_SHOT {
            dx -= ctx.width(symbol)? / 2.0;
        }
        composite.place(symbol, dx, ctx.space() * 2.0);
    }
    ctx.commit(target, composite)
}

pub fn build_indv_notes(
    ctx: &mut BuildContext,
    rules: &[CompositionRule],
) -> Result<(), BuildError> {
    for_each_rule(ctx, rules, individual_note)
}

/// Notehead, optional stem and stacked flags.
fn individual_note(
    ctx: &mut BuildContext,
    rule: &CompositionRule,
    target: &str,
) -> Result<RuleOutcome, BuildError> {
    if prepare_sources(ctx, rule.glyph_sources())?.is_some() {
        return Ok(ctx.incomplete(target));
    }
    let stem_down = DOWN_STEM_NOTES.contains(&target);
    let long_stem = ctx.units("Stems", "long stem length")?;
    let flag_spacing = ctx.units("Flags", "internal flag spacing")?;

    let mut composite = Composite::default();
    let mut note_width = 0.0;
    let mut stem_width = 0.0;
    for (i, source) in rule.glyph_sources().enumerate() {
        let source_width = ctx.width(source)?;
        if NOTEHEADS.contains(&base_name(source)) {
            note_width = source_width;
            composite.width = note_width;
            composite.place(source, 0.0, 0.0);
        } else if source == STEM {
            stem_width = source_width;
            if stem_down {
                composite.place(source, stem_width, -long_stem);
            } else {
                composite.place(source, note_width - stem_width, 0.0);
            }
        } else {
            let dy = long_stem - flag_spacing * 2.0 + flag_spacing * i as f64;
            if DOWN_FLAGS.contains(&base_name(source)) {
                composite.place(source, 0.0, -dy);
                composite.width = note_width;
            } else {
                composite.place(source, note_width - stem_width * 2.0, dy);
                composite.width = note_width + source_width - stem_width * 2.0;
            }
        }
    }
    ctx.commit(target, composite)
}

pub fn build_beamed_notes(
    ctx: &mut BuildContext,
    rules: &[CompositionRule],
) -> Result<(), BuildError> {
    for_each_rule(ctx, rules, beamed_group)
}

/// Vertical offset of the first beam of a group.
fn first_beam_offset(rule: &CompositionRule, target: &str, separation: f64) -> f64 {
    let beams = rule.count(BEAM);
    if rule.contains(LONG_BEAMED_STEM) || LONG_BEAM_GROUPS.contains(&target) {
        match beams {
            1 => separation,
            3 => -separation,
            _ => 0.0,
        }
    } else if beams == 2 {
        -separation
    } else {
        0.0
    }
}

fn beamed_group(
    ctx: &mut BuildContext,
    rule: &CompositionRule,
    target: &str,
) -> Result<RuleOutcome, BuildError> {
    if prepare_sources(ctx, rule.glyph_sources())?.is_some() {
        return Ok(ctx.incomplete(target));
    }
    let long_stem = ctx.units("Stems", "long stem length")?;
    let short_stem = ctx.units("Stems", "short stem length")?;
    let tuplet_height = ctx.units("Beams", "tuplet height")?;
    let hook = ctx.units("Beams", "tuplet bracket hook length")?;
    let separation = ctx.units("Beams", "beam thickness")? + ctx.units("Beams", "beam spacing")?;
    let beamed = rule.contains(BEAM)
        && (rule.contains(SHORT_BEAMED_STEM) || rule.contains(LONG_BEAMED_STEM));
    let first_beam = first_beam_offset(rule, target, separation);

    let mut composite = Composite::default();
    for (i, slot) in rule.sources.iter().enumerate() {
        let Slot::Glyph(source) = slot else {
            continue;
        };
        let width = ctx.width(source)?;
        let (mut dx, mut dy, mut sx, mut sy) = (0.0, 0.0, 1.0, 1.0);

        if TUPLET_NUMBERS.contains(&target) {
            let height = ctx.bbox(source)?.height();
            sx = TUPLET_SCALE;
            sy = TUPLET_SCALE;
            dy = tuplet_height + hook - height / 2.0 * TUPLET_SCALE;
        } else if REVERSED_BRACKETS.contains(&target) {
            dx = width;
            sx = -1.0;
        }
        if LONG_STEM_TUPLETS.contains(&target) {
            dy += long_stem - short_stem;
        }

        if source == BEAM {
            let index = i.saturating_sub(2) as f64;
            composite.place(source, dx, first_beam + separation * index);
        } else if beamed {
            let dx = ctx.width(BEAM)? - width;
            composite.place(source, dx, dy);
        } else {
            composite.push(ComponentPlacement::scaled(source, dx, dy, sx, sy));
        }
        composite.width = width;
    }
    if rule.contains(TUPLET_THREE) {
        composite.width = ctx.bbox(TUPLET_THREE)?.width() * TUPLET_SCALE;
    }
    ctx.commit(target, composite)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::dataset::{beamed_notes, indv_notes, stems};
    use crate::build::fixtures::{approx, box_glyph, drawing_context, placements};
    use norad::Glyph;

    fn noteheads() -> Vec<Glyph> {
        vec![
            box_glyph("uniE0A3", 295.0, 250.0),
            box_glyph("uniE0A4", 295.0, 250.0),
            box_glyph("uniE240", 250.0, 800.0),
            box_glyph("uniE241", 250.0, 800.0),
            box_glyph("uniE242", 250.0, 800.0),
            box_glyph("uniE243", 250.0, 800.0),
            box_glyph("uniE250", 250.0, 600.0),
            box_glyph("uniE251", 250.0, 600.0),
        ]
    }

    fn rule_for(rules: Vec<CompositionRule>, target: &str) -> Vec<CompositionRule> {
        rules
            .into_iter()
            .filter(|rule| rule.target_name() == Some(target))
            .collect()
    }

    #[test]
    fn symbols_sit_two_spaces_up_the_stem() {
        let mut ctx = drawing_context(vec![
            box_glyph("uniE645", 100.0, 100.0),
            box_glyph("uniE263", 200.0, 200.0),
        ]);
        build_stems(&mut ctx, &stems()).unwrap();
        let placed = placements(&ctx, "uniE211");
        assert_eq!(placed[0].0, STEM);
        assert_eq!((placed[1].1, placed[1].2), (15.0, 500.0));
        // rim shot centred on the stem
        let placed = placements(&ctx, "uniE21E");
        assert_eq!(placed[1].1, 15.0 - 100.0);
        assert_eq!(ctx.width("uniE211").unwrap(), 15.0);
        assert!(!ctx.has_glyph("uniE212"));
    }

    #[test]
    fn up_stem_sits_on_the_right_of_the_notehead() {
        let mut ctx = drawing_context(noteheads());
        build_indv_notes(&mut ctx, &rule_for(indv_notes(), "uniE1D5")).unwrap();
        let placed = placements(&ctx, "uniE1D5");
        assert_eq!(placed[1], (STEM.to_string(), 295.0 - 15.0, 0.0, 1.0, 1.0));
        assert_eq!(ctx.width("uniE1D5").unwrap(), 295.0);
    }

    #[test]
    fn down_stem_hangs_from_the_left() {
        let mut ctx = drawing_context(noteheads());
        build_indv_notes(&mut ctx, &rule_for(indv_notes(), "uniE1D6")).unwrap();
        let placed = placements(&ctx, "uniE1D6");
        assert_eq!(placed[1], (STEM.to_string(), 15.0, -875.0, 1.0, 1.0));
    }

    #[test]
    fn flags_stack_from_the_stem_end() {
        let mut ctx = drawing_context(noteheads());
        let rules = indv_notes();
        let sixteenth_up = rules
            .iter()
            .find(|rule| rule.target_name() == Some("uniE1D9"))
            .cloned()
            .unwrap();
        build_indv_notes(&mut ctx, &[sixteenth_up]).unwrap();
        let placed = placements(&ctx, "uniE1D9");
        // long stem 875, spacing 187, flag is source 2
        assert_eq!(placed[2], ("uniE242".to_string(), 295.0 - 30.0, 875.0, 1.0, 1.0));
        assert_eq!(ctx.width("uniE1D9").unwrap(), 295.0 + 250.0 - 30.0);

        build_indv_notes(&mut ctx, &rule_for(indv_notes(), "uniE1DA")).unwrap();
        let placed = placements(&ctx, "uniE1DA");
        assert_eq!(placed[2], ("uniE243".to_string(), 0.0, -875.0, 1.0, 1.0));
        assert_eq!(ctx.width("uniE1DA").unwrap(), 295.0);
    }

    #[test]
    fn beams_stack_by_count_and_stem_length() {
        let rule = CompositionRule::named("x", &["uniE205", "uniE0A4", "uniE1F7"]);
        assert_eq!(first_beam_offset(&rule, "uniE1F3", 187.0), 187.0);
        let rule = CompositionRule::named("x", &["uniE204", "uniE0A4", "uniE1F7", "uniE1F7"]);
        assert_eq!(first_beam_offset(&rule, "uniE1F4", 187.0), -187.0);
        let rule = CompositionRule::named("x", &["uniE204", "uniE0A4", "uniE1F7"]);
        assert_eq!(first_beam_offset(&rule, "uniE1F2", 187.0), 0.0);
    }

    #[test]
    fn beamed_group_shifts_stem_and_head_under_the_beam() {
        let mut ctx = drawing_context(noteheads());
        build_beamed_notes(&mut ctx, &rule_for(beamed_notes(), "uniE1F4")).unwrap();
        let placed = placements(&ctx, "uniE1F4");
        assert_eq!(placed.len(), 4);
        // beam length 625 against the 295 wide notehead
        assert_eq!((placed[0].1, placed[1].1), (330.0, 330.0));
        // thickness 125 + spacing 62
        assert_eq!((placed[2].2, placed[3].2), (-187.0, 0.0));
        assert_eq!(ctx.width("uniE1F4").unwrap(), 625.0);
    }

    #[test]
    fn caller_slots_are_left_out() {
        let mut ctx = drawing_context(noteheads());
        build_beamed_notes(&mut ctx, &rule_for(beamed_notes(), "uniE1F9")).unwrap();
        let placed = placements(&ctx, "uniE1F9");
        assert_eq!(placed.len(), 2);
        assert!(placed.iter().all(|p| p.0 == BEAM));
        assert_eq!((placed[0].2, placed[1].2), (-187.0, 0.0));
    }

    #[test]
    fn tuplet_numbers_are_scaled_above_the_bracket() {
        let mut ctx = drawing_context(vec![box_glyph("uniE883", 300.0, 400.0)]);
        let rules = rule_for(beamed_notes(), "uniE202");
        build_beamed_notes(&mut ctx, &rules).unwrap();
        let placed = placements(&ctx, "uniE202");
        // tuplet height 1000, hook 125, lifted by long - short = 250
        let dy = 1000.0 + 125.0 - 200.0 * 0.72 + 250.0;
        assert!(approx(placed[0].2, dy));
        assert_eq!((placed[0].3, placed[0].4), (0.72, 0.72));
        assert!(approx(ctx.width("uniE202").unwrap(), 216.0));
    }

    #[test]
    fn reversed_brackets_flip_in_place() {
        let mut ctx = drawing_context(vec![]);
        build_beamed_notes(&mut ctx, &rule_for(beamed_notes(), "uniE200")).unwrap();
        let placed = placements(&ctx, "uniE200");
        assert_eq!(placed[0], ("uniE1FE".to_string(), 585.0, 0.0, -1.0, 1.0));
    }
}
