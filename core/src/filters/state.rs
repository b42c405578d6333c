use tracing::debug;
use voluma_types::Dimension;

use super::{AgeEdge, FilterCatalog, FilterRecord};

/// Holds the two live filter records: **draft**, mutated freely by user
/// edits, and **applied**, replaced only when the draft is committed.
///
/// Edits never touch `applied`; after a commit the two share no mutable
/// structure, so later draft edits cannot retroactively change what the
/// active fetch was issued with.
#[derive(Debug, Clone, Default)]
pub struct FilterState {
    catalog: FilterCatalog,
    draft: FilterRecord,
    applied: FilterRecord,
}

impl FilterState {
    pub fn new(catalog: FilterCatalog) -> Self {
        let draft = FilterRecord::new(super::record::DEFAULT_STRUCTURE, catalog.age_bound());
        let applied = draft.clone();
        Self {
            catalog,
            draft,
            applied,
        }
    }

    pub fn catalog(&self) -> &FilterCatalog {
        &self.catalog
    }

    pub fn draft(&self) -> &FilterRecord {
        &self.draft
    }

    pub fn applied(&self) -> &FilterRecord {
        &self.applied
    }

    /// Install a freshly loaded catalog and seed both records' age ranges to
    /// its full bound.
    pub fn seed_catalog(&mut self, catalog: FilterCatalog) {
        let bound = catalog.age_bound();
        self.draft.age_range = (bound.min, bound.max);
        self.applied.age_range = (bound.min, bound.max);
        self.catalog = catalog;
    }

    /// Reconcile the selected structure with the backend's list: if the
    /// current selection is absent, both records fall back to the list's
    /// first entry.
    pub fn adopt_structures(&mut self, structures: &[String]) {
        if structures.is_empty() || structures.contains(&self.draft.structure) {
            return;
        }
        let first = structures[0].clone();
        debug!(from = %self.draft.structure, to = %first, "structure not in catalog, replacing");
        self.draft.structure = first.clone();
        self.applied.structure = first;
    }

    pub fn set_structure(&mut self, name: impl Into<String>) {
        self.draft.structure = name.into();
    }

    /// Add or remove one categorical value in the draft. Set semantics:
    /// re-adding an included value or removing an absent one is a no-op.
    pub fn toggle_value(&mut self, dimension: Dimension, value: &str, included: bool) {
        let set = self.draft.values_mut(dimension);
        if included {
            set.insert(value.to_string());
        } else {
            set.remove(value);
        }
    }

    /// Move one age edge, clamped to the catalog bound. If the edit would
    /// break `lo <= hi`, the opposite edge is clamped along; the edit itself
    /// is never rejected.
    pub fn set_age_edge(&mut self, edge: AgeEdge, value: u32) {
        let bound = self.catalog.age_bound();
        let value = value.clamp(bound.min, bound.max);
        let (lo, hi) = &mut self.draft.age_range;
        match edge {
            AgeEdge::Lo => {
                *lo = value;
                if *hi < *lo {
                    *hi = *lo;
                }
            }
            AgeEdge::Hi => {
                *hi = value;
                if *lo > *hi {
                    *lo = *hi;
                }
            }
        }
    }

    /// Copy the draft into `applied` by value and return the committed
    /// record for the fetch coordinator.
    pub fn commit(&mut self) -> FilterRecord {
        self.applied = self.draft.clone();
        self.applied.clone()
    }
}
