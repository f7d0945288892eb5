//! Placement algorithms, one module per symbol family
//!
//! Builders compute a [`Composite`] for each rule and return a
//! [`RuleOutcome`](super::RuleOutcome) through the context. They never touch
//! outlines directly.

pub mod accordion;
pub mod barlines;
pub mod dynamics;
pub mod flags;
pub mod notes;
pub mod octaves;
pub mod staves;
pub mod time;
pub mod tremolos;

use kurbo::Vec2;
use norad::{AffineTransform, Component};

use crate::core::errors::{BuildError, StoreError};
use crate::data::conversions::{glyph_name, scale_offset_transform};

use super::dataset::CompositionRule;
use super::{BuildContext, RuleOutcome};

/// A reference to `base` moved by `offset` after scaling by `scale`
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentPlacement {
    pub base: String,
    pub offset: Vec2,
    pub scale: Vec2,
}

impl ComponentPlacement {
    pub fn new(base: &str, dx: f64, dy: f64) -> Self {
        Self::scaled(base, dx, dy, 1.0, 1.0)
    }

    pub fn scaled(base: &str, dx: f64, dy: f64, sx: f64, sy: f64) -> Self {
        Self {
            base: base.to_string(),
            offset: Vec2::new(dx, dy),
            scale: Vec2::new(sx, sy),
        }
    }

    /// Apply this placement on top of an existing component transform.
    ///
    /// Only the scale and offset parts of `inner` are carried over.
    pub fn composed(
        base: &str,
        outer_offset: Vec2,
        outer_scale: Vec2,
        inner: &AffineTransform,
    ) -> Self {
        Self::scaled(
            base,
            outer_scale.x * inner.x_offset + outer_offset.x,
            outer_scale.y * inner.y_offset + outer_offset.y,
            outer_scale.x * inner.x_scale,
            outer_scale.y * inner.y_scale,
        )
    }

    pub fn transform(&self) -> AffineTransform {
        scale_offset_transform(self.offset.x, self.offset.y, self.scale.x, self.scale.y)
    }

    pub fn to_component(&self) -> Result<Component, StoreError> {
        Ok(Component::new(glyph_name(&self.base)?, self.transform(), None))
    }
}

/// Components and advance width of a glyph to be committed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Composite {
    pub components: Vec<ComponentPlacement>,
    pub width: f64,
}

impl Composite {
    pub fn with_width(width: f64) -> Self {
        Self {
            components: Vec::new(),
            width,
        }
    }

    pub fn push(&mut self, placement: ComponentPlacement) {
        self.components.push(placement);
    }

    pub fn place(&mut self, base: &str, dx: f64, dy: f64) {
        self.push(ComponentPlacement::new(base, dx, dy));
    }
}

/// Offsets stacking `count` copies symmetrically about y = 0.
///
/// Even counts start half a unit off the axis. Every positive shift is
/// followed by its negative.
pub fn symmetric_shifts(count: usize, unit: f64) -> Vec<f64> {
    let baseline = if count % 2 == 0 { unit / 2.0 } else { 0.0 };
    let limit = unit * count as f64 / 2.0;
    let mut shifts = Vec::with_capacity(count);
    if unit <= 0.0 {
        return shifts;
    }
    let mut k = 0;
    loop {
        let shift = baseline + unit * k as f64;
        if shift >= limit {
            break;
        }
        shifts.push(shift);
        if shift > 0.0 {
            shifts.push(-shift);
        }
        k += 1;
    }
    shifts
}

/// Prepare every glyph source of a rule in order.
///
/// Returns the first source that is still missing.
pub(crate) fn prepare_sources<'a>(
    ctx: &mut BuildContext,
    sources: impl IntoIterator<Item = &'a str>,
) -> Result<Option<String>, BuildError> {
    for source in sources {
        if !ctx.prepare(source)? {
            return Ok(Some(source.to_string()));
        }
    }
    Ok(None)
}

/// Make the parents of a parent-only rule exist.
pub(crate) fn ensure_parents(
    ctx: &mut BuildContext,
    rule: &CompositionRule,
) -> Result<RuleOutcome, BuildError> {
    for source in rule.glyph_sources() {
        ctx.prepare(source)?;
    }
    Ok(RuleOutcome::ParentOnly)
}

/// Drive a family's rules through `build`, settling each outcome.
///
/// Excluded targets are skipped before any source is looked at.
pub(crate) fn for_each_rule<F>(
    ctx: &mut BuildContext,
    rules: &[CompositionRule],
    mut build: F,
) -> Result<(), BuildError>
where
    F: FnMut(&mut BuildContext, &CompositionRule, &str) -> Result<RuleOutcome, BuildError>,
{
    for rule in rules {
        let result = match rule.target_name() {
            None => ensure_parents(ctx, rule),
            Some(target) if ctx.excluded(target)? => Ok(RuleOutcome::Excluded),
            Some(target) => build(ctx, rule, target),
        };
        ctx.settle(&rule.label(), result)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn odd_counts_start_on_the_axis() {
        assert_eq!(symmetric_shifts(3, 250.0), vec![0.0, 250.0, -250.0]);
        assert_eq!(
            symmetric_shifts(5, 250.0),
            vec![0.0, 250.0, -250.0, 500.0, -500.0]
        );
    }

    #[test]
    fn even_counts_straddle_the_axis() {
        assert_eq!(symmetric_shifts(2, 250.0), vec![125.0, -125.0]);
        assert_eq!(
            symmetric_shifts(4, 100.0),
            vec![50.0, -50.0, 150.0, -150.0]
        );
        assert_eq!(symmetric_shifts(6, 100.0).len(), 6);
    }

    #[test]
    fn degenerate_units_yield_nothing() {
        assert!(symmetric_shifts(3, 0.0).is_empty());
    }

    #[test]
    fn composed_placements_follow_the_outer_mirror() {
        let inner = scale_offset_transform(150.0, 0.0, 1.0, 1.0);
        let placement = ComponentPlacement::composed(
            "stroke",
            Vec2::new(400.0, 0.0),
            Vec2::new(-1.0, 1.0),
            &inner,
        );
        assert_eq!(placement.offset, Vec2::new(250.0, 0.0));
        assert_eq!(placement.scale, Vec2::new(-1.0, 1.0));
    }
}
