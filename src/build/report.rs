//! Per-family tallies of what a run did

use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FamilyReport {
    pub appended: Vec<String>,
    pub skipped_existing: Vec<String>,
    pub incomplete: Vec<String>,
    pub excluded: Vec<String>,
    /// Parent glyphs drawn because they were missing
    pub synthesized: Vec<String>,
    /// Rules abandoned because of a store error
    pub failed: Vec<String>,
}

impl FamilyReport {
    pub fn is_empty(&self) -> bool {
        self.appended.is_empty()
            && self.skipped_existing.is_empty()
            && self.incomplete.is_empty()
            && self.excluded.is_empty()
            && self.synthesized.is_empty()
            && self.failed.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub families: BTreeMap<String, FamilyReport>,
}

impl RunReport {
    pub fn family_mut(&mut self, family: &str) -> &mut FamilyReport {
        self.families.entry(family.to_string()).or_default()
    }

    pub fn family(&self, family: &str) -> Option<&FamilyReport> {
        self.families.get(family)
    }

    pub fn appended_count(&self) -> usize {
        self.families.values().map(|f| f.appended.len()).sum()
    }

    pub fn synthesized_count(&self) -> usize {
        self.families.values().map(|f| f.synthesized.len()).sum()
    }

    pub fn incomplete_count(&self) -> usize {
        self.families.values().map(|f| f.incomplete.len()).sum()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
