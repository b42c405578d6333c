//! Dashboard session: one explicit state container owning the core pipeline.
//!
//! Holds the filter state, fetch coordinator, selection, and viewer behind
//! the operations a frontend needs; no ambient mutable singletons. Filter
//! state, fetch state, and viewer state are disjoint, so each sits behind
//! its own lock and no cross-component locking exists.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::warn;
use voluma_types::{Dimension, PlotTrace, PointDetails, RowSetStats, ViewerPhase};

use crate::api::{ApiClient, build_volume_query};
use crate::fetch::{FetchCoordinator, FetchSnapshot};
use crate::filters::{AgeEdge, FilterCatalog, FilterRecord, FilterState};
use crate::selection::{ClickEvent, NoticeBoard, resolve_click};
use crate::stats::row_set_stats;
use crate::traces::build_traces;
use crate::viewer::ViewerController;

/// How long a transient notice stays visible.
pub const NOTICE_TTL: Duration = Duration::from_secs(3);

const NO_IMAGERY_NOTICE: &str = "No medical imagery available for this data point";

/// Shared handle to a dashboard session.
pub type SessionHandle = Arc<DashboardSession>;

/// Point-in-time view of the embedded viewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerStatus {
    pub phase: ViewerPhase,
    pub url: Option<String>,
    pub epoch: u64,
}

pub struct DashboardSession {
    client: ApiClient,
    filters: RwLock<FilterState>,
    structures: RwLock<Vec<String>>,
    fetch: FetchCoordinator,
    grouping: RwLock<Dimension>,
    selected: RwLock<Option<PointDetails>>,
    viewer: RwLock<ViewerController>,
    notices: Arc<RwLock<NoticeBoard>>,
    notice_task: Mutex<Option<JoinHandle<()>>>,
}

impl DashboardSession {
    pub fn new(client: ApiClient) -> SessionHandle {
        Arc::new(Self {
            client,
            filters: RwLock::new(FilterState::new(FilterCatalog::default())),
            structures: RwLock::new(Vec::new()),
            fetch: FetchCoordinator::new(),
            grouping: RwLock::new(Dimension::default()),
            selected: RwLock::new(None),
            viewer: RwLock::new(ViewerController::new()),
            notices: Arc::new(RwLock::new(NoticeBoard::default())),
            notice_task: Mutex::new(None),
        })
    }

    // ─────────────────────────────────────────────────────────────────────
    // Catalog loading
    // ─────────────────────────────────────────────────────────────────────

    /// One-shot initialization: load the filter catalog and the structure
    /// list, seed the filter records, then fire the initial fetch. Either
    /// load failing is non-fatal; built-in defaults keep the session usable.
    pub async fn init(&self) -> u64 {
        match self.client.filter_options().await {
            Ok(options) => {
                self.filters
                    .write()
                    .await
                    .seed_catalog(FilterCatalog::from(options));
            }
            Err(err) => {
                warn!(error = %err, "failed to load filter options, keeping defaults");
            }
        }

        match self.client.structures().await {
            Ok(list) => {
                self.filters.write().await.adopt_structures(&list);
                *self.structures.write().await = list;
            }
            Err(err) => {
                warn!(error = %err, "failed to load structures, keeping defaults");
            }
        }

        self.apply().await
    }

    // ─────────────────────────────────────────────────────────────────────
    // Filter edits (draft only) and commit
    // ─────────────────────────────────────────────────────────────────────

    pub async fn set_structure(&self, name: &str) {
        self.filters.write().await.set_structure(name);
    }

    pub async fn toggle_value(&self, dimension: Dimension, value: &str, included: bool) {
        self.filters
            .write()
            .await
            .toggle_value(dimension, value, included);
    }

    pub async fn set_age_edge(&self, edge: AgeEdge, value: u32) {
        self.filters.write().await.set_age_edge(edge, value);
    }

    /// Commit the draft and start the fetch for the freshly applied record.
    /// Returns the fetch generation. Selection and viewer state are left
    /// untouched; they persist until a new click or explicit close.
    pub async fn apply(&self) -> u64 {
        let (record, bound) = {
            let mut filters = self.filters.write().await;
            let record = filters.commit();
            (record, filters.catalog().age_bound())
        };
        let params = build_volume_query(&record, bound);
        self.fetch.start(self.client.clone(), params).await
    }

    // ─────────────────────────────────────────────────────────────────────
    // Derived views
    // ─────────────────────────────────────────────────────────────────────

    pub async fn traces(&self) -> Vec<PlotTrace> {
        let rows = self.fetch.rows().await;
        build_traces(&rows, *self.grouping.read().await)
    }

    pub async fn stats(&self) -> RowSetStats {
        row_set_stats(&self.fetch.rows().await)
    }

    pub async fn fetch_snapshot(&self) -> FetchSnapshot {
        self.fetch.snapshot().await
    }

    // ─────────────────────────────────────────────────────────────────────
    // Click → selection → viewer
    // ─────────────────────────────────────────────────────────────────────

    /// Resolve a plot click. Unresolvable events are silently ignored. A
    /// resolved click always publishes the selection; the viewer only
    /// engages when the point links to imagery, otherwise a transient
    /// notice is raised.
    pub async fn click(&self, event: ClickEvent) {
        let traces = self.traces().await;
        let Some(details) = resolve_click(&traces, event) else {
            return;
        };

        *self.selected.write().await = Some(details.clone());

        match details
            .viewer_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
        {
            Some(url) => {
                self.viewer.write().await.open(url);
            }
            None => self.raise_notice(NO_IMAGERY_NOTICE).await,
        }
    }

    async fn raise_notice(&self, text: &str) {
        let epoch = self.notices.write().await.raise(text);
        let notices = Arc::clone(&self.notices);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(NOTICE_TTL).await;
            notices.write().await.clear_if(epoch);
        });
        if let Some(previous) = self.notice_task.lock().await.replace(handle) {
            previous.abort();
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Viewer lifecycle
    // ─────────────────────────────────────────────────────────────────────

    pub async fn close_viewer(&self) {
        self.viewer.write().await.close();
    }

    pub async fn viewer_frame_loaded(&self, epoch: u64) {
        self.viewer.write().await.frame_loaded(epoch);
    }

    pub async fn viewer_frame_failed(&self, epoch: u64) {
        self.viewer.write().await.frame_failed(epoch);
    }

    pub async fn viewer_status(&self) -> ViewerStatus {
        let viewer = self.viewer.read().await;
        ViewerStatus {
            phase: viewer.phase(),
            url: viewer.url().map(str::to_string),
            epoch: viewer.epoch(),
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────

    pub fn fetch(&self) -> &FetchCoordinator {
        &self.fetch
    }

    pub async fn draft(&self) -> FilterRecord {
        self.filters.read().await.draft().clone()
    }

    pub async fn applied(&self) -> FilterRecord {
        self.filters.read().await.applied().clone()
    }

    pub async fn catalog(&self) -> FilterCatalog {
        self.filters.read().await.catalog().clone()
    }

    pub async fn structures(&self) -> Vec<String> {
        self.structures.read().await.clone()
    }

    pub async fn grouping(&self) -> Dimension {
        *self.grouping.read().await
    }

    pub async fn set_grouping(&self, dimension: Dimension) {
        *self.grouping.write().await = dimension;
    }

    pub async fn selected(&self) -> Option<PointDetails> {
        self.selected.read().await.clone()
    }

    pub async fn notice(&self) -> Option<String> {
        self.notices.read().await.text().map(str::to_string)
    }

    /// Abort background work (in-flight fetch, pending notice expiry).
    pub async fn shutdown(&self) {
        self.fetch.shutdown().await;
        if let Some(handle) = self.notice_task.lock().await.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::FetchOutcome;
    use crate::filters::DEFAULT_STRUCTURE;
    use voluma_types::{AgeBound, MeasurementRow, TimePoint, TraceKind};

    fn session() -> SessionHandle {
        DashboardSession::new(ApiClient::new("http://localhost:1"))
    }

    fn row(
        patient: &str,
        smoking: &str,
        volume: f64,
        viewer_url: Option<&str>,
    ) -> MeasurementRow {
        MeasurementRow {
            patient_id: patient.to_string(),
            structure: "Aorta".to_string(),
            age: Some(64),
            gender_description: Some("Female".to_string()),
            race_description: None,
            smoking_status: Some(smoking.to_string()),
            clinical_stage: Some("IA".to_string()),
            time_point: TimePoint::T0,
            volume_ml: volume,
            segmentation_series_uid: format!("1.2.{patient}"),
            viewer_url: viewer_url.map(str::to_string),
        }
    }

    async fn inject_rows(session: &DashboardSession, rows: Vec<MeasurementRow>) {
        let generation = session.fetch().begin().await;
        session
            .fetch()
            .complete(generation, FetchOutcome::Success(rows))
            .await;
    }

    async fn settled_snapshot(session: &DashboardSession) -> FetchSnapshot {
        for _ in 0..200 {
            let snapshot = session.fetch_snapshot().await;
            if !snapshot.loading {
                return snapshot;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        session.fetch_snapshot().await
    }

    #[tokio::test]
    async fn init_against_unreachable_backend_keeps_defaults_usable() {
        let session = session();
        session.init().await;

        // Both catalog loads failed; the built-in defaults stand.
        let catalog = session.catalog().await;
        assert_eq!(catalog.age_bound(), AgeBound { min: 0, max: 100 });
        assert_eq!(session.draft().await.structure, DEFAULT_STRUCTURE);
        assert!(session.structures().await.is_empty());

        // Only the volume fetch surfaces an error.
        let snapshot = settled_snapshot(&session).await;
        assert!(snapshot.error.is_some());
        assert!(snapshot.rows.is_empty());

        // The session stays editable afterward.
        session.set_age_edge(AgeEdge::Lo, 30).await;
        assert_eq!(session.draft().await.age_range, (30, 100));
    }

    #[tokio::test]
    async fn click_publishes_selection_and_opens_viewer() {
        let session = session();
        inject_rows(
            &session,
            vec![row("p1", "Current", 10.0, Some("http://viewer/p1"))],
        )
        .await;

        // Trace 0 is the distribution, trace 1 the click-target overlay.
        let traces = session.traces().await;
        assert_eq!(traces[1].kind, TraceKind::ClickTarget);
        session.click(ClickEvent { trace: 1, point: 0 }).await;

        let selected = session.selected().await.expect("selection published");
        assert_eq!(selected.volume_ml, 10.0);

        let status = session.viewer_status().await;
        assert_eq!(status.phase, ViewerPhase::Loading);
        assert_eq!(status.url.as_deref(), Some("http://viewer/p1"));
        assert_eq!(session.notice().await, None);
    }

    #[tokio::test]
    async fn click_without_imagery_raises_notice_and_keeps_viewer_empty() {
        let session = session();
        inject_rows(&session, vec![row("p1", "Current", 10.0, None)]).await;

        session.click(ClickEvent { trace: 0, point: 0 }).await;

        // Selection is published regardless of imagery.
        assert!(session.selected().await.is_some());
        assert_eq!(session.viewer_status().await.phase, ViewerPhase::Empty);
        assert_eq!(session.notice().await.as_deref(), Some(NO_IMAGERY_NOTICE));
    }

    #[tokio::test]
    async fn unresolvable_click_is_silently_ignored() {
        let session = session();
        inject_rows(&session, vec![row("p1", "Current", 10.0, None)]).await;

        session.click(ClickEvent { trace: 9, point: 0 }).await;
        session.click(ClickEvent { trace: 0, point: 9 }).await;

        assert_eq!(session.selected().await, None);
        assert_eq!(session.notice().await, None);
        assert_eq!(session.viewer_status().await.phase, ViewerPhase::Empty);
    }

    #[tokio::test(start_paused = true)]
    async fn notice_auto_dismisses() {
        let session = session();
        inject_rows(&session, vec![row("p1", "Current", 10.0, None)]).await;

        session.click(ClickEvent { trace: 0, point: 0 }).await;
        assert!(session.notice().await.is_some());

        // Let the spawned expiry task register its sleep before the clock moves.
        tokio::task::yield_now().await;
        tokio::time::advance(NOTICE_TTL + Duration::from_millis(50)).await;
        for _ in 0..5 {
            tokio::task::yield_now().await;
        }
        assert_eq!(session.notice().await, None);
        // The selection outlives the notice.
        assert!(session.selected().await.is_some());
    }

    #[tokio::test]
    async fn reapplying_filters_preserves_selection_and_viewer() {
        let session = session();
        inject_rows(
            &session,
            vec![row("p1", "Current", 10.0, Some("http://viewer/p1"))],
        )
        .await;
        session.click(ClickEvent { trace: 0, point: 0 }).await;
        let viewer_before = session.viewer_status().await;

        // The fetch against the unreachable test endpoint fails, but the
        // selection and viewer are owned elsewhere and must persist.
        session.apply().await;
        assert!(session.selected().await.is_some());
        assert_eq!(session.viewer_status().await, viewer_before);
    }

    #[tokio::test]
    async fn same_point_reclick_forces_fresh_viewer_load() {
        let session = session();
        inject_rows(
            &session,
            vec![row("p1", "Current", 10.0, Some("http://viewer/p1"))],
        )
        .await;

        session.click(ClickEvent { trace: 0, point: 0 }).await;
        let first = session.viewer_status().await;
        session.viewer_frame_loaded(first.epoch).await;
        assert_eq!(session.viewer_status().await.phase, ViewerPhase::Ready);

        session.click(ClickEvent { trace: 0, point: 0 }).await;
        let second = session.viewer_status().await;
        assert_eq!(second.phase, ViewerPhase::Loading);
        assert_ne!(second.epoch, first.epoch);
    }
}
