//! Summary statistics over the committed row set, for header widgets.

use std::collections::BTreeSet;

use voluma_types::{MeasurementRow, RowSetStats};

pub fn row_set_stats(rows: &[MeasurementRow]) -> RowSetStats {
    let mut patients = BTreeSet::new();
    let mut series = BTreeSet::new();
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut sum = 0.0;

    for row in rows {
        patients.insert(row.patient_id.as_str());
        series.insert(row.segmentation_series_uid.as_str());
        min = min.min(row.volume_ml);
        max = max.max(row.volume_ml);
        sum += row.volume_ml;
    }

    let has_rows = !rows.is_empty();
    RowSetStats {
        row_count: rows.len(),
        patient_count: patients.len(),
        series_count: series.len(),
        volume_min: has_rows.then_some(min),
        volume_mean: has_rows.then(|| sum / rows.len() as f64),
        volume_max: has_rows.then_some(max),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voluma_types::TimePoint;

    fn row(patient: &str, series: &str, volume: f64) -> MeasurementRow {
        MeasurementRow {
            patient_id: patient.to_string(),
            structure: "Aorta".to_string(),
            age: None,
            gender_description: None,
            race_description: None,
            smoking_status: None,
            clinical_stage: None,
            time_point: TimePoint::T0,
            volume_ml: volume,
            segmentation_series_uid: series.to_string(),
            viewer_url: None,
        }
    }

    #[test]
    fn counts_distinct_patients_and_series() {
        let rows = vec![
            row("p1", "s1", 10.0),
            row("p1", "s2", 20.0),
            row("p2", "s3", 30.0),
        ];
        let stats = row_set_stats(&rows);
        assert_eq!(stats.row_count, 3);
        assert_eq!(stats.patient_count, 2);
        assert_eq!(stats.series_count, 3);
        assert_eq!(stats.volume_min, Some(10.0));
        assert_eq!(stats.volume_mean, Some(20.0));
        assert_eq!(stats.volume_max, Some(30.0));
    }

    #[test]
    fn empty_rows_have_no_extremes() {
        let stats = row_set_stats(&[]);
        assert_eq!(stats.row_count, 0);
        assert_eq!(stats.volume_min, None);
        assert_eq!(stats.volume_mean, None);
        assert_eq!(stats.volume_max, None);
    }
}
