//! Click resolution and transient notices.
//!
//! A plot click arrives as a (trace index, point index) pair. Resolution is
//! a positional lookup into the clicked trace's ancillary array; the
//! index-alignment contract of the trace builder makes entry `i` exactly the
//! row that produced value `i`. Events that cannot be resolved are silently
//! ignored.

use serde::{Deserialize, Serialize};
use voluma_types::{PlotTrace, PointDetails};

/// A click on a rendered trace, already mapped by the chart layer to the
/// trace's index in the rendered list and the point's positional index
/// within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClickEvent {
    pub trace: usize,
    pub point: usize,
}

/// Resolve a click to the originating row's detail bundle. `None` for any
/// out-of-range trace or point index; never panics.
pub fn resolve_click(traces: &[PlotTrace], event: ClickEvent) -> Option<PointDetails> {
    traces
        .get(event.trace)
        .and_then(|trace| trace.ancillary.get(event.point))
        .cloned()
}

// ─────────────────────────────────────────────────────────────────────────────
// Transient Notices
// ─────────────────────────────────────────────────────────────────────────────

/// A user-visible, auto-dismissing message ("no imagery available ...").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
    epoch: u64,
}

/// Holder for the current transient notice. Each raise bumps an epoch so an
/// expiry timer from an older notice can never clear a newer one.
#[derive(Debug, Default)]
pub struct NoticeBoard {
    current: Option<Notice>,
    epoch: u64,
}

impl NoticeBoard {
    /// Replace the current notice; returns the epoch to pass to `clear_if`
    /// when the display period ends.
    pub fn raise(&mut self, text: impl Into<String>) -> u64 {
        self.epoch += 1;
        self.current = Some(Notice {
            text: text.into(),
            epoch: self.epoch,
        });
        self.epoch
    }

    /// Clear the notice only if it is still the one raised at `epoch`.
    pub fn clear_if(&mut self, epoch: u64) {
        if self
            .current
            .as_ref()
            .is_some_and(|notice| notice.epoch == epoch)
        {
            self.current = None;
        }
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    pub fn text(&self) -> Option<&str> {
        self.current.as_ref().map(|notice| notice.text.as_str())
    }
}
