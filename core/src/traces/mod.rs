//! Row set → plot trace projection.
//!
//! Two families of traces are derived from the committed rows:
//!
//! - One box-and-whisker **distribution** trace per (group, time point)
//!   combination that has at least one row, grouped by a categorical
//!   dimension (smoking status by default).
//! - One oversized, invisible **click-target** trace per time point across
//!   all rows, compensating for unreliable hit-testing on box/whisker
//!   geometry: every rendered value gets a pixel-precise click target.
//!
//! Every trace carries an ancillary array index-aligned with its values so a
//! click can be resolved back to the originating row by position. Traces are
//! rebuilt from scratch whenever the rows or the grouping key change.

use voluma_types::{Dimension, MeasurementRow, PlotTrace, PointDetails, TimePoint, TraceKind};

/// Build all traces for the given rows, grouped by `group_by`.
///
/// Group order is first appearance in the rows; rows with no value for the
/// grouping dimension contribute to no group (but still get click targets).
/// Empty (group, time point) combinations emit nothing.
pub fn build_traces(rows: &[MeasurementRow], group_by: Dimension) -> Vec<PlotTrace> {
    if rows.is_empty() {
        return Vec::new();
    }

    let mut groups: Vec<&str> = Vec::new();
    for row in rows {
        if let Some(value) = group_by.value_of(row) {
            if !groups.contains(&value) {
                groups.push(value);
            }
        }
    }

    let mut traces = Vec::new();

    for group in &groups {
        for time_point in TimePoint::ALL {
            let slice: Vec<&MeasurementRow> = rows
                .iter()
                .filter(|r| r.time_point == time_point && group_by.value_of(r) == Some(*group))
                .collect();
            if slice.is_empty() {
                continue;
            }
            traces.push(PlotTrace {
                kind: TraceKind::Distribution,
                name: group.to_string(),
                time_point,
                values: slice.iter().map(|r| r.volume_ml).collect(),
                ancillary: slice.iter().map(|r| PointDetails::from_row(r)).collect(),
                // One legend entry per group, attached to its first time point.
                show_legend: time_point.is_first(),
            });
        }
    }

    for time_point in TimePoint::ALL {
        let slice: Vec<&MeasurementRow> = rows
            .iter()
            .filter(|r| r.time_point == time_point)
            .collect();
        if slice.is_empty() {
            continue;
        }
        traces.push(PlotTrace {
            kind: TraceKind::ClickTarget,
            name: String::new(),
            time_point,
            values: slice.iter().map(|r| r.volume_ml).collect(),
            ancillary: slice.iter().map(|r| PointDetails::from_row(r)).collect(),
            show_legend: false,
        });
    }

    traces
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(
        patient: &str,
        smoking: Option<&str>,
        time_point: TimePoint,
        volume: f64,
        viewer_url: Option<&str>,
    ) -> MeasurementRow {
        MeasurementRow {
            patient_id: patient.to_string(),
            structure: "Aorta".to_string(),
            age: Some(62),
            gender_description: Some("Male".to_string()),
            race_description: Some("White".to_string()),
            smoking_status: smoking.map(str::to_string),
            clinical_stage: Some("IA".to_string()),
            time_point,
            volume_ml: volume,
            segmentation_series_uid: format!("1.2.{patient}"),
            viewer_url: viewer_url.map(str::to_string),
        }
    }

    fn sample_rows() -> Vec<MeasurementRow> {
        vec![
            row("p1", Some("Current"), TimePoint::T0, 10.0, Some("http://v/1")),
            row("p2", Some("Current"), TimePoint::T0, 11.0, None),
            row("p3", Some("Former"), TimePoint::T0, 12.0, Some("http://v/3")),
            row("p4", Some("Current"), TimePoint::T1, 13.0, None),
            // no Former rows at T1 or T2, no rows at all for T2
        ]
    }

    #[test]
    fn values_and_ancillary_stay_index_aligned() {
        let rows = sample_rows();
        for trace in build_traces(&rows, Dimension::SmokingStatus) {
            assert_eq!(trace.values.len(), trace.ancillary.len());
            for (value, details) in trace.values.iter().zip(&trace.ancillary) {
                assert_eq!(*value, details.volume_ml);
            }
        }
    }

    #[test]
    fn empty_combinations_emit_no_trace() {
        let rows = sample_rows();
        let traces = build_traces(&rows, Dimension::SmokingStatus);

        let distributions: Vec<_> = traces
            .iter()
            .filter(|t| t.kind == TraceKind::Distribution)
            .collect();
        // Current×{T0,T1} and Former×{T0}; never the full 2×3 cross-product.
        assert_eq!(distributions.len(), 3);
        assert!(!distributions
            .iter()
            .any(|t| t.name == "Former" && t.time_point != TimePoint::T0));

        let overlays: Vec<_> = traces
            .iter()
            .filter(|t| t.kind == TraceKind::ClickTarget)
            .collect();
        // One per non-empty time point, ungrouped.
        assert_eq!(overlays.len(), 2);
        assert!(overlays.iter().all(|t| t.time_point != TimePoint::T2));
    }

    #[test]
    fn groups_follow_first_appearance_order() {
        let rows = sample_rows();
        let traces = build_traces(&rows, Dimension::SmokingStatus);
        let names: Vec<&str> = traces
            .iter()
            .filter(|t| t.kind == TraceKind::Distribution)
            .map(|t| t.name.as_str())
            .collect();
        assert_eq!(names, ["Current", "Current", "Former"]);
    }

    #[test]
    fn rows_without_group_value_are_skipped_from_distributions() {
        let rows = vec![
            row("p1", None, TimePoint::T0, 10.0, None),
            row("p2", Some("Current"), TimePoint::T0, 11.0, None),
        ];
        let traces = build_traces(&rows, Dimension::SmokingStatus);

        let distributions: Vec<_> = traces
            .iter()
            .filter(|t| t.kind == TraceKind::Distribution)
            .collect();
        assert_eq!(distributions.len(), 1);
        assert_eq!(distributions[0].values, [11.0]);

        // The ungrouped overlay still covers every row of the time point.
        let overlay = traces
            .iter()
            .find(|t| t.kind == TraceKind::ClickTarget)
            .unwrap();
        assert_eq!(overlay.values, [10.0, 11.0]);
    }

    #[test]
    fn legend_shows_once_per_group() {
        let rows = sample_rows();
        let traces = build_traces(&rows, Dimension::SmokingStatus);
        for trace in &traces {
            match trace.kind {
                TraceKind::Distribution => {
                    assert_eq!(trace.show_legend, trace.time_point.is_first())
                }
                TraceKind::ClickTarget => assert!(!trace.show_legend),
            }
        }
    }

    #[test]
    fn no_rows_no_traces() {
        assert!(build_traces(&[], Dimension::SmokingStatus).is_empty());
    }

    #[test]
    fn alternate_grouping_dimension() {
        let rows = sample_rows();
        let traces = build_traces(&rows, Dimension::Gender);
        let names: Vec<&str> = traces
            .iter()
            .filter(|t| t.kind == TraceKind::Distribution)
            .map(|t| t.name.as_str())
            .collect();
        assert_eq!(names, ["Male", "Male"]); // T0 and T1 slices
    }
}
