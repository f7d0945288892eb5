//! Stylistic-set variants of the composition tables
//!
//! A style set reuses a family's rules under suffixed names, so the same
//! placement code builds e.g. `uniE244.ss02` from the short 16th flag.

use super::dataset::{base_name, CompositionRule, Slot, Target, DOWN_FLAGS};

const UP_STRAIGHT: &str = "uniE240";
const DOWN_STRAIGHT: &str = "uniE241";
const SHORT_FLAGS: &[&str] = &["uniE242", "uniE243"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleSet {
    SmallStaff,
    ShortFlags,
    StraightFlags,
    LargeTimeSignatures,
    LargeNarrowTimeSignatures,
}

impl StyleSet {
    /// Key in `[Include]` and `[Set Suffixes]`
    pub fn key(&self) -> &'static str {
        match self {
            StyleSet::SmallStaff => "small staff",
            StyleSet::ShortFlags => "short flags",
            StyleSet::StraightFlags => "straight flags",
            StyleSet::LargeTimeSignatures => "large time signatures",
            StyleSet::LargeNarrowTimeSignatures => "large narrow time signatures",
        }
    }
}

fn suffixed(name: &str, suffix: &str) -> String {
    format!("{name}.{suffix}")
}

fn map_sources(rule: &CompositionRule, mut f: impl FnMut(&str) -> String) -> Vec<Slot> {
    rule.sources
        .iter()
        .map(|slot| match slot {
            Slot::Glyph(name) => Slot::Glyph(f(name)),
            Slot::Caller => Slot::Caller,
        })
        .collect()
}

fn map_target(rule: &CompositionRule, suffix: &str) -> Target {
    match &rule.target {
        Target::Named(name) => Target::Named(suffixed(name, suffix)),
        Target::ParentOnly => Target::ParentOnly,
    }
}

/// Rules for `style`, with names carrying `suffix`.
pub fn derive_style_set(
    style: StyleSet,
    suffix: &str,
    rules: &[CompositionRule],
) -> Vec<CompositionRule> {
    match style {
        StyleSet::SmallStaff
        | StyleSet::LargeTimeSignatures
        | StyleSet::LargeNarrowTimeSignatures => rules
            .iter()
            .map(|rule| CompositionRule {
                target: map_target(rule, suffix),
                sources: map_sources(rule, |name| suffixed(name, suffix)),
            })
            .collect(),
        StyleSet::ShortFlags => rules
            .iter()
            .map(|rule| CompositionRule {
                target: map_target(rule, suffix),
                sources: map_sources(rule, |name| {
                    if SHORT_FLAGS.contains(&name) {
                        suffixed(name, suffix)
                    } else {
                        name.to_string()
                    }
                }),
            })
            .collect(),
        StyleSet::StraightFlags => straight_flags(suffix, rules),
    }
}

/// Every flag becomes the straight 8th flag of its direction, with one
/// extra flag on top; the straight 16th flags lead the table.
fn straight_flags(suffix: &str, rules: &[CompositionRule]) -> Vec<CompositionRule> {
    let up = suffixed(UP_STRAIGHT, suffix);
    let down = suffixed(DOWN_STRAIGHT, suffix);
    let mut derived = vec![
        CompositionRule::named(&suffixed(SHORT_FLAGS[0], suffix), &[up.as_str()]),
        CompositionRule::named(&suffixed(SHORT_FLAGS[1], suffix), &[down.as_str()]),
    ];
    for rule in rules {
        derived.push(CompositionRule {
            target: map_target(rule, suffix),
            sources: map_sources(rule, |name| {
                if DOWN_FLAGS.contains(&base_name(name)) {
                    down.clone()
                } else {
                    up.clone()
                }
            }),
        });
    }
    for rule in &mut derived {
        if let Some(Slot::Glyph(last)) = rule.sources.last().cloned() {
            rule.sources.push(Slot::Glyph(last));
        }
    }
    derived
}
