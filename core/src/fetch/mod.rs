//! Supersede-safe volume-data fetching.
//!
//! At most one in-flight request is honored at a time. Each fetch records a
//! monotonically increasing generation when it starts; starting a new fetch
//! aborts the previous task, and a completion is committed only while its
//! generation is still the latest issued one. The system therefore behaves
//! as if only the last-started fetch can ever produce an observable effect,
//! regardless of network completion order.

use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use voluma_types::MeasurementRow;

use crate::api::{ApiClient, QueryParams};

/// Terminal result of one fetch. Cancellation has no variant: an aborted
/// task never reaches `complete`, and a stale generation is discarded there.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Success(Vec<MeasurementRow>),
    Failure(String),
}

/// Point-in-time copy of the coordinator-owned view state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchSnapshot {
    pub rows: Vec<MeasurementRow>,
    pub error: Option<String>,
    pub loading: bool,
}

#[derive(Debug, Default)]
struct FetchInner {
    rows: Vec<MeasurementRow>,
    error: Option<String>,
    loading: bool,
    /// Generation of the most recently started fetch; only a completion
    /// carrying this value may commit its outcome.
    active_generation: u64,
}

/// Exclusive owner of the row set, fetch error, and loading flag. No other
/// component writes these.
#[derive(Debug, Clone, Default)]
pub struct FetchCoordinator {
    inner: Arc<RwLock<FetchInner>>,
    in_flight: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl FetchCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a new volume-data request, superseding any in-flight one.
    /// Returns the request's generation.
    pub async fn start(&self, client: ApiClient, params: QueryParams) -> u64 {
        let generation = self.begin().await;
        let coordinator = self.clone();
        let handle = tokio::spawn(async move {
            let outcome = match client.volume_data(&params).await {
                Ok(rows) => FetchOutcome::Success(rows),
                Err(err) => {
                    warn!(error = %err, generation, "volume fetch failed");
                    FetchOutcome::Failure(err.to_string())
                }
            };
            coordinator.complete(generation, outcome).await;
        });
        *self.in_flight.lock().await = Some(handle);
        generation
    }

    /// Register the start of a fetch: abort the predecessor, bump the active
    /// generation, raise the loading flag, clear any stale error.
    pub async fn begin(&self) -> u64 {
        if let Some(handle) = self.in_flight.lock().await.take() {
            handle.abort();
        }
        let mut inner = self.inner.write().await;
        inner.active_generation += 1;
        inner.loading = true;
        inner.error = None;
        inner.active_generation
    }

    /// Commit the outcome of the fetch with the given generation. A stale
    /// generation mutates nothing: the newer request's outcome governs,
    /// including the loading flag.
    pub async fn complete(&self, generation: u64, outcome: FetchOutcome) {
        let mut inner = self.inner.write().await;
        if generation != inner.active_generation {
            debug!(
                generation,
                active = inner.active_generation,
                "discarding superseded fetch outcome"
            );
            return;
        }
        match outcome {
            FetchOutcome::Success(rows) => {
                inner.rows = rows;
                inner.error = None;
            }
            FetchOutcome::Failure(message) => {
                inner.rows.clear();
                inner.error = Some(message);
            }
        }
        inner.loading = false;
    }

    pub async fn snapshot(&self) -> FetchSnapshot {
        let inner = self.inner.read().await;
        FetchSnapshot {
            rows: inner.rows.clone(),
            error: inner.error.clone(),
            loading: inner.loading,
        }
    }

    pub async fn rows(&self) -> Vec<MeasurementRow> {
        self.inner.read().await.rows.clone()
    }

    pub async fn is_loading(&self) -> bool {
        self.inner.read().await.loading
    }

    /// Abort any in-flight task without starting a successor.
    pub async fn shutdown(&self) {
        if let Some(handle) = self.in_flight.lock().await.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voluma_types::TimePoint;

    fn row(patient: &str, volume: f64) -> MeasurementRow {
        MeasurementRow {
            patient_id: patient.to_string(),
            structure: "Aorta".to_string(),
            age: Some(60),
            gender_description: Some("Female".to_string()),
            race_description: None,
            smoking_status: Some("Former".to_string()),
            clinical_stage: None,
            time_point: TimePoint::T0,
            volume_ml: volume,
            segmentation_series_uid: format!("1.2.{patient}"),
            viewer_url: None,
        }
    }

    #[tokio::test]
    async fn success_replaces_rows_and_clears_error() {
        let fetch = FetchCoordinator::new();
        let generation = fetch.begin().await;
        fetch
            .complete(generation, FetchOutcome::Failure("boom".into()))
            .await;
        assert_eq!(fetch.snapshot().await.error.as_deref(), Some("boom"));

        let generation = fetch.begin().await;
        fetch
            .complete(generation, FetchOutcome::Success(vec![row("p1", 12.5)]))
            .await;
        let snapshot = fetch.snapshot().await;
        assert_eq!(snapshot.rows.len(), 1);
        assert_eq!(snapshot.error, None);
        assert!(!snapshot.loading);
    }

    #[tokio::test]
    async fn failure_clears_rows_and_sets_error() {
        let fetch = FetchCoordinator::new();
        let generation = fetch.begin().await;
        fetch
            .complete(generation, FetchOutcome::Success(vec![row("p1", 12.5)]))
            .await;

        let generation = fetch.begin().await;
        fetch
            .complete(generation, FetchOutcome::Failure("HTTP 500".into()))
            .await;
        let snapshot = fetch.snapshot().await;
        assert!(snapshot.rows.is_empty());
        assert_eq!(snapshot.error.as_deref(), Some("HTTP 500"));
        assert!(!snapshot.loading);
    }

    #[tokio::test]
    async fn out_of_order_completion_cannot_overwrite_latest() {
        let fetch = FetchCoordinator::new();
        let first = fetch.begin().await;
        let second = fetch.begin().await;
        let third = fetch.begin().await;

        // The governing fetch resolves first; stragglers arrive later.
        fetch
            .complete(third, FetchOutcome::Success(vec![row("latest", 3.0)]))
            .await;
        fetch
            .complete(first, FetchOutcome::Success(vec![row("stale", 1.0)]))
            .await;
        fetch
            .complete(second, FetchOutcome::Failure("slow failure".into()))
            .await;

        let snapshot = fetch.snapshot().await;
        assert_eq!(snapshot.rows.len(), 1);
        assert_eq!(snapshot.rows[0].patient_id, "latest");
        assert_eq!(snapshot.error, None);
        assert!(!snapshot.loading);
    }

    #[tokio::test]
    async fn superseded_completion_does_not_end_loading() {
        let fetch = FetchCoordinator::new();
        let first = fetch.begin().await;
        let _second = fetch.begin().await;

        fetch
            .complete(first, FetchOutcome::Success(vec![row("stale", 1.0)]))
            .await;
        let snapshot = fetch.snapshot().await;
        assert!(snapshot.loading, "newer fetch is still pending");
        assert!(snapshot.rows.is_empty());
    }

    #[tokio::test]
    async fn begin_clears_previous_error() {
        let fetch = FetchCoordinator::new();
        let generation = fetch.begin().await;
        fetch
            .complete(generation, FetchOutcome::Failure("boom".into()))
            .await;

        let _next = fetch.begin().await;
        let snapshot = fetch.snapshot().await;
        assert_eq!(snapshot.error, None);
        assert!(snapshot.loading);
    }
}
