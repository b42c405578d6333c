use voluma_types::{AgeBound, Dimension, FilterOptions};

/// Immutable-per-load snapshot of the legal filter values and the global age
/// bound. Replaced wholesale if the options endpoint is re-queried; never
/// mutated in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCatalog {
    smoking_status: Vec<String>,
    gender: Vec<String>,
    race: Vec<String>,
    clinical_stage: Vec<String>,
    age_bound: AgeBound,
}

impl FilterCatalog {
    /// Ordered permitted values for one dimension.
    pub fn values(&self, dimension: Dimension) -> &[String] {
        match dimension {
            Dimension::SmokingStatus => &self.smoking_status,
            Dimension::Gender => &self.gender,
            Dimension::Race => &self.race,
            Dimension::ClinicalStage => &self.clinical_stage,
        }
    }

    pub fn age_bound(&self) -> AgeBound {
        self.age_bound
    }
}

impl From<FilterOptions> for FilterCatalog {
    fn from(options: FilterOptions) -> Self {
        Self {
            smoking_status: options.smoking_status,
            gender: options.gender,
            race: options.race,
            clinical_stage: options.clinical_stage,
            age_bound: options.age_range,
        }
    }
}
