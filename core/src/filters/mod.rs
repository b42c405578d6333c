//! Filter state: the legal-value catalog and the draft/applied record pair.

mod catalog;
mod record;
mod state;

pub use catalog::FilterCatalog;
pub use record::{AgeEdge, DEFAULT_STRUCTURE, FilterRecord};
pub use state::FilterState;
