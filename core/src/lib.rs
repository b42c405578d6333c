pub mod api;
pub mod fetch;
pub mod filters;
pub mod selection;
pub mod session;
pub mod stats;
pub mod traces;
pub mod viewer;

// Re-exports for convenience
pub use api::{ApiClient, ApiError, QueryParams, build_volume_query};
pub use fetch::{FetchCoordinator, FetchOutcome, FetchSnapshot};
pub use filters::{AgeEdge, FilterCatalog, FilterRecord, FilterState};
pub use selection::{ClickEvent, Notice, NoticeBoard, resolve_click};
pub use session::{DashboardSession, NOTICE_TTL, SessionHandle, ViewerStatus};
pub use stats::row_set_stats;
pub use traces::build_traces;
pub use viewer::ViewerController;

pub use voluma_types::{
    AgeBound, Dimension, FilterOptions, MeasurementRow, PlotTrace, PointDetails, RowSetStats,
    TimePoint, TraceKind, ViewerPhase,
};
