//! Shared data types for the voluma dashboard
//!
//! This crate contains serializable types shared between the dashboard core
//! (voluma-core) and its frontends: wire-format payloads from the backend
//! API, the canonical time-point ordering, and the derived plot-trace
//! projections consumed by chart renderers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ─────────────────────────────────────────────────────────────────────────────
// Wire Types (backend API payloads)
// ─────────────────────────────────────────────────────────────────────────────

/// Inclusive age bound returned by `/api/filter-options`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeBound {
    pub min: u32,
    pub max: u32,
}

impl Default for AgeBound {
    /// Built-in fallback used when the catalog endpoint is unreachable.
    fn default() -> Self {
        Self { min: 0, max: 100 }
    }
}

/// Payload of `GET /api/filter-options`: the legal values per categorical
/// dimension plus the global age bound.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterOptions {
    #[serde(default)]
    pub smoking_status: Vec<String>,
    #[serde(default)]
    pub gender: Vec<String>,
    #[serde(default)]
    pub race: Vec<String>,
    #[serde(default)]
    pub clinical_stage: Vec<String>,
    #[serde(default)]
    pub age_range: AgeBound,
}

/// One volume measurement from `GET /api/volume-data`.
///
/// Demographic fields are optional at the boundary; the single canonical
/// "missing" representation is `None`. Display fallbacks ("N/A") belong to
/// render code, never to stored rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementRow {
    #[serde(rename = "PatientID")]
    pub patient_id: String,
    pub structure: String,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub gender_description: Option<String>,
    #[serde(default)]
    pub race_description: Option<String>,
    #[serde(default)]
    pub smoking_status: Option<String>,
    #[serde(default)]
    pub clinical_stage: Option<String>,
    #[serde(rename = "ClinicalTrialTimePointID")]
    pub time_point: TimePoint,
    pub volume_ml: f64,
    #[serde(rename = "segmentationSeriesUID")]
    pub segmentation_series_uid: String,
    /// Fully-formed external viewer URL; absent when no linked imagery
    /// exists. An empty string on the wire is normalized to `None`.
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub viewer_url: Option<String>,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

// ─────────────────────────────────────────────────────────────────────────────
// Time Points
// ─────────────────────────────────────────────────────────────────────────────

/// Canonical clinical time points. The ordering is fixed by the trial design,
/// not derived from data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TimePoint {
    T0,
    T1,
    T2,
}

impl TimePoint {
    /// All time points in canonical order.
    pub const ALL: [TimePoint; 3] = [TimePoint::T0, TimePoint::T1, TimePoint::T2];

    pub fn label(&self) -> &'static str {
        match self {
            TimePoint::T0 => "T0",
            TimePoint::T1 => "T1",
            TimePoint::T2 => "T2",
        }
    }

    /// True for the first time point (drives legend visibility).
    pub fn is_first(&self) -> bool {
        *self == TimePoint::T0
    }
}

impl fmt::Display for TimePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Categorical Dimensions
// ─────────────────────────────────────────────────────────────────────────────

/// The four categorical dimensions a row can be filtered or grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Dimension {
    #[default]
    SmokingStatus,
    Gender,
    Race,
    ClinicalStage,
}

impl Dimension {
    pub const ALL: [Dimension; 4] = [
        Dimension::SmokingStatus,
        Dimension::Gender,
        Dimension::Race,
        Dimension::ClinicalStage,
    ];

    /// Query-string key for this dimension (repeatable parameter).
    pub fn query_key(&self) -> &'static str {
        match self {
            Dimension::SmokingStatus => "smoking_status",
            Dimension::Gender => "gender",
            Dimension::Race => "race",
            Dimension::ClinicalStage => "clinical_stage",
        }
    }

    /// Human-readable label for panels and legends.
    pub fn label(&self) -> &'static str {
        match self {
            Dimension::SmokingStatus => "Smoking Status",
            Dimension::Gender => "Gender",
            Dimension::Race => "Race",
            Dimension::ClinicalStage => "Clinical Stage",
        }
    }

    /// The row's value for this dimension, if present.
    pub fn value_of<'a>(&self, row: &'a MeasurementRow) -> Option<&'a str> {
        match self {
            Dimension::SmokingStatus => row.smoking_status.as_deref(),
            Dimension::Gender => row.gender_description.as_deref(),
            Dimension::Race => row.race_description.as_deref(),
            Dimension::ClinicalStage => row.clinical_stage.as_deref(),
        }
    }
}

impl FromStr for Dimension {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "smoking_status" | "smoking" => Ok(Dimension::SmokingStatus),
            "gender" => Ok(Dimension::Gender),
            "race" => Ok(Dimension::Race),
            "clinical_stage" | "stage" => Ok(Dimension::ClinicalStage),
            other => Err(format!("unknown dimension '{other}'")),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Derived Plot Projections
// ─────────────────────────────────────────────────────────────────────────────

/// Per-point ancillary bundle, index-aligned with a trace's values. Also the
/// shape of the published selection after a click resolves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointDetails {
    pub age: Option<u32>,
    pub gender: Option<String>,
    pub race: Option<String>,
    pub stage: Option<String>,
    pub volume_ml: f64,
    pub viewer_url: Option<String>,
}

impl PointDetails {
    pub fn from_row(row: &MeasurementRow) -> Self {
        Self {
            age: row.age,
            gender: row.gender_description.clone(),
            race: row.race_description.clone(),
            stage: row.clinical_stage.clone(),
            volume_ml: row.volume_ml,
            viewer_url: row.viewer_url.clone(),
        }
    }

    /// True when the point links to external imagery.
    pub fn has_imagery(&self) -> bool {
        self.viewer_url.as_deref().is_some_and(|u| !u.trim().is_empty())
    }
}

/// Role of a rendered trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TraceKind {
    /// Box-and-whisker distribution for one (group, time point) slice.
    Distribution,
    /// Oversized invisible markers guaranteeing pixel-precise click targets
    /// over the distribution geometry. One per time point, ungrouped.
    ClickTarget,
}

/// One chart trace derived from the committed row set.
///
/// Invariant: `values.len() == ancillary.len()`, and `ancillary[i]` describes
/// exactly the row that contributed `values[i]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotTrace {
    pub kind: TraceKind,
    /// Group label (legend entry) for distribution traces; empty for
    /// click-target overlays.
    pub name: String,
    pub time_point: TimePoint,
    pub values: Vec<f64>,
    pub ancillary: Vec<PointDetails>,
    pub show_legend: bool,
}

impl PlotTrace {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Viewer & Summary Types
// ─────────────────────────────────────────────────────────────────────────────

/// Phase of the embedded viewer frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ViewerPhase {
    #[default]
    Empty,
    Loading,
    Ready,
    Error,
}

impl ViewerPhase {
    pub fn label(&self) -> &'static str {
        match self {
            ViewerPhase::Empty => "empty",
            ViewerPhase::Loading => "loading",
            ViewerPhase::Ready => "ready",
            ViewerPhase::Error => "error",
        }
    }
}

/// Summary statistics over the committed row set, for header widgets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RowSetStats {
    pub row_count: usize,
    pub patient_count: usize,
    pub series_count: usize,
    pub volume_min: Option<f64>,
    pub volume_mean: Option<f64>,
    pub volume_max: Option<f64>,
}
