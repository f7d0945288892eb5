//! Composite glyph construction
//!
//! A [`BuildContext`] owns the glyph store for the length of a run together
//! with the resolved configuration. Family builders in [`builders`] walk the
//! rules from [`dataset`], ask the context to prepare each source (checking
//! it, drawing it through [`makers`] when allowed, decomposing it) and hand
//! finished [`builders::Composite`]s back to be committed.

pub mod builders;
pub mod completeness;
pub mod dataset;
pub mod families;
pub mod makers;
pub mod registry;
pub mod report;
pub mod styles;

#[cfg(test)]
pub(crate) mod fixtures;

use kurbo::Rect;
use norad::Glyph;
use tracing::{info, warn};

use crate::core::config::{Config, GlobalSettings};
use crate::core::errors::{BuildError, ConfigError, StoreError};
use crate::data::conversions::glyph_name;
use crate::font_source::GlyphStore;

pub use builders::{ComponentPlacement, Composite};
pub use completeness::CompletenessChecker;
pub use families::{run, Family};
pub use makers::Primitive;
pub use registry::CommitOutcome;
pub use report::{FamilyReport, RunReport};

/// What became of a single composition rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleOutcome {
    Appended,
    SkippedExisting,
    Incomplete,
    Excluded,
    /// The rule only makes sure its parents exist
    ParentOnly,
}

impl From<CommitOutcome> for RuleOutcome {
    fn from(outcome: CommitOutcome) -> Self {
        match outcome {
            CommitOutcome::Appended => RuleOutcome::Appended,
            CommitOutcome::SkippedExisting => RuleOutcome::SkippedExisting,
        }
    }
}

pub struct BuildContext {
    store: GlyphStore,
    config: Config,
    settings: GlobalSettings,
    checker: CompletenessChecker,
    report: RunReport,
    family: String,
}

impl BuildContext {
    /// `config` must have been created for the units-per-em of `store`.
    pub fn new(store: GlyphStore, config: Config) -> Result<Self, ConfigError> {
        let settings = GlobalSettings::from_config(&config)?;
        Ok(Self {
            store,
            config,
            settings,
            checker: CompletenessChecker::new(),
            report: RunReport::default(),
            family: String::new(),
        })
    }

    pub fn store(&self) -> &GlyphStore {
        &self.store
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    pub fn settings(&self) -> &GlobalSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut GlobalSettings {
        &mut self.settings
    }

    pub fn report(&self) -> &RunReport {
        &self.report
    }

    pub fn into_parts(self) -> (GlyphStore, RunReport) {
        (self.store, self.report)
    }

    /// Family that subsequent outcomes are reported under.
    pub fn set_family(&mut self, key: &str) {
        self.family = key.to_string();
    }

    pub fn space(&self) -> f64 {
        self.config.staff_space()
    }

    pub fn units(&self, section: &str, option: &str) -> Result<f64, ConfigError> {
        self.config.units(section, option)
    }

    pub fn text(&self, section: &str, option: &str) -> Result<String, ConfigError> {
        self.config.text(section, option)
    }

    pub fn has_glyph(&self, name: &str) -> bool {
        self.store.has_glyph(name)
    }

    pub fn width(&self, name: &str) -> Result<f64, StoreError> {
        self.store
            .advance_width(name)
            .ok_or_else(|| StoreError::MissingGlyph(name.to_string()))
    }

    /// Bounding box of an existing glyph; empty glyphs have a zero box.
    pub fn bbox(&self, name: &str) -> Result<Rect, StoreError> {
        if !self.store.has_glyph(name) {
            return Err(StoreError::MissingGlyph(name.to_string()));
        }
        Ok(self.store.bounding_box(name).unwrap_or(Rect::ZERO))
    }

    pub fn kerning(&self, left: &str, right: &str) -> f64 {
        self.store.kerning(left, right)
    }

    /// Whether `[Exclude]` skips this target; logs when it does.
    pub fn excluded(&mut self, target: &str) -> Result<bool, ConfigError> {
        if self.config.is_excluded(target)? {
            info!("Skipping excluded glyph: {target}");
            return Ok(true);
        }
        Ok(false)
    }

    pub fn is_complete(&mut self, name: &str) -> bool {
        self.checker.is_complete(&self.store, name)
    }

    /// Make a source ready for use as a component.
    ///
    /// Missing sources are drawn when `[Global] draw missing` is set and the
    /// name is a known primitive. Returns `false` when the source is still
    /// missing afterwards.
    pub fn prepare(&mut self, name: &str) -> Result<bool, BuildError> {
        if !self.is_complete(name) {
            let Some(primitive) = Primitive::from_name(name) else {
                return Ok(false);
            };
            if !self.settings.draw_missing {
                return Ok(false);
            }
            makers::draw(self, name, primitive)?;
        }
        self.store.decompose(name);
        Ok(true)
    }

    /// Log and report a rule abandoned for want of a source.
    pub fn incomplete(&mut self, target: &str) -> RuleOutcome {
        info!("Skipping incomplete composite: {target}");
        RuleOutcome::Incomplete
    }

    /// Write a composite under `target` through the registry.
    pub fn commit(
        &mut self,
        target: &str,
        composite: Composite,
    ) -> Result<RuleOutcome, BuildError> {
        glyph_name(target)?;
        let mut glyph = Glyph::new(target);
        for placement in &composite.components {
            glyph.components.push(placement.to_component()?);
        }
        let outcome = registry::commit(&mut self.store, &self.settings, glyph, composite.width)?;
        Ok(outcome.into())
    }

    /// Write a freshly drawn parent glyph.
    pub(crate) fn commit_drawn(&mut self, glyph: Glyph, width: f64) -> Result<(), BuildError> {
        let name = glyph.name().to_string();
        let outcome = registry::commit(&mut self.store, &self.settings, glyph, width)?;
        if outcome == CommitOutcome::Appended {
            self.report.family_mut(&self.family).synthesized.push(name);
        }
        Ok(())
    }

    /// Record the result of one rule.
    ///
    /// Fatal errors are returned to abort the run; anything else is logged
    /// and the family moves on.
    pub fn settle(
        &mut self,
        target: &str,
        result: Result<RuleOutcome, BuildError>,
    ) -> Result<(), BuildError> {
        let family = self.report.family_mut(&self.family);
        match result {
            Ok(RuleOutcome::Appended) => family.appended.push(target.to_string()),
            Ok(RuleOutcome::SkippedExisting) => family.skipped_existing.push(target.to_string()),
            Ok(RuleOutcome::Incomplete) => family.incomplete.push(target.to_string()),
            Ok(RuleOutcome::Excluded) => family.excluded.push(target.to_string()),
            Ok(RuleOutcome::ParentOnly) => {}
            Err(error) if error.is_fatal() => return Err(error),
            Err(error) => {
                warn!("Could not build {target}: {error}");
                family.failed.push(target.to_string());
            }
        }
        Ok(())
    }
}
