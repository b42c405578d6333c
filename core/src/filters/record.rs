use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use voluma_types::{AgeBound, Dimension};

/// Initial structure selection before the backend's list arrives.
pub const DEFAULT_STRUCTURE: &str = "Aorta";

/// Which edge of the age range an edit targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgeEdge {
    Lo,
    Hi,
}

/// One logical filter selection.
///
/// Categorical selections are sets (no duplicates, order-insensitive); an
/// empty set means "no restriction" for that dimension. The age range is
/// kept inside the catalog bound with `lo <= hi`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterRecord {
    pub structure: String,
    pub smoking_status: BTreeSet<String>,
    pub gender: BTreeSet<String>,
    pub race: BTreeSet<String>,
    pub clinical_stage: BTreeSet<String>,
    /// Inclusive `[lo, hi]` age range.
    pub age_range: (u32, u32),
}

impl FilterRecord {
    pub fn new(structure: impl Into<String>, bound: AgeBound) -> Self {
        Self {
            structure: structure.into(),
            smoking_status: BTreeSet::new(),
            gender: BTreeSet::new(),
            race: BTreeSet::new(),
            clinical_stage: BTreeSet::new(),
            age_range: (bound.min, bound.max),
        }
    }

    pub fn values(&self, dimension: Dimension) -> &BTreeSet<String> {
        match dimension {
            Dimension::SmokingStatus => &self.smoking_status,
            Dimension::Gender => &self.gender,
            Dimension::Race => &self.race,
            Dimension::ClinicalStage => &self.clinical_stage,
        }
    }

    pub(crate) fn values_mut(&mut self, dimension: Dimension) -> &mut BTreeSet<String> {
        match dimension {
            Dimension::SmokingStatus => &mut self.smoking_status,
            Dimension::Gender => &mut self.gender,
            Dimension::Race => &mut self.race,
            Dimension::ClinicalStage => &mut self.clinical_stage,
        }
    }

    /// True when the age range equals the full catalog bound, in which case
    /// the age parameters are omitted from the query.
    pub fn age_is_unrestricted(&self, bound: AgeBound) -> bool {
        self.age_range == (bound.min, bound.max)
    }
}

impl Default for FilterRecord {
    fn default() -> Self {
        // Replaced on init if absent from the backend's structure list.
        Self::new(DEFAULT_STRUCTURE, AgeBound::default())
    }
}
