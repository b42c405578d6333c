use voluma_types::{AgeBound, Dimension};

use super::QueryParams;
use crate::filters::FilterRecord;

/// Build the `/api/volume-data` query for an applied filter record.
///
/// - `structure` is always present.
/// - Each selected categorical value becomes one repeated parameter; a
///   dimension with an empty selection is omitted entirely ("no filter",
///   not "exclude everything").
/// - `min_age`/`max_age` appear only when they differ from the catalog
///   extremes, keeping the request minimal and idempotent.
pub fn build_volume_query(record: &FilterRecord, bound: AgeBound) -> QueryParams {
    let mut params: QueryParams = vec![("structure", record.structure.clone())];

    for dimension in Dimension::ALL {
        for value in record.values(dimension) {
            params.push((dimension.query_key(), value.clone()));
        }
    }

    let (lo, hi) = record.age_range;
    if lo > bound.min {
        params.push(("min_age", lo.to_string()));
    }
    if hi < bound.max {
        params.push(("max_age", hi.to_string()));
    }

    params
}
