//! Embedded viewer state machine.
//!
//! `Empty → Loading → {Ready | Error}`. Supplying a URL from any state
//! re-enters `Loading`, including when the same URL is re-clicked, so a frame that
//! failed once is retried cleanly rather than reusing cached display state.
//! Each open tears the previous frame down (back through `Empty`) before the
//! new load starts, so a stale frame is never visible under a loading
//! overlay; the frame epoch is the embed's identity and lets events from a
//! torn-down frame be discarded.

use tracing::debug;
use voluma_types::ViewerPhase;

#[derive(Debug, Default)]
pub struct ViewerController {
    phase: ViewerPhase,
    url: Option<String>,
    /// Identity of the current frame; bumped on every open.
    epoch: u64,
}

impl ViewerController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> ViewerPhase {
        self.phase
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Target a new URL. The current frame is dropped first (momentary pass
    /// through `Empty`), then a fresh load cycle starts under a new epoch.
    /// Returns the epoch the frame host must report its load outcome with.
    pub fn open(&mut self, url: impl Into<String>) -> u64 {
        self.phase = ViewerPhase::Empty;
        self.url = None;

        self.epoch += 1;
        self.url = Some(url.into());
        self.phase = ViewerPhase::Loading;
        debug!(epoch = self.epoch, "viewer loading");
        self.epoch
    }

    /// Explicit close; also the path taken when the current URL is cleared.
    pub fn close(&mut self) {
        self.phase = ViewerPhase::Empty;
        self.url = None;
    }

    /// The frame for `epoch` finished loading. Stale or out-of-phase events
    /// are ignored.
    pub fn frame_loaded(&mut self, epoch: u64) {
        if epoch == self.epoch && self.phase == ViewerPhase::Loading {
            self.phase = ViewerPhase::Ready;
        }
    }

    /// The frame for `epoch` failed to load. Terminal until a new URL is
    /// supplied or the viewer is closed; there is no automatic retry.
    pub fn frame_failed(&mut self, epoch: u64) {
        if epoch == self.epoch && self.phase == ViewerPhase::Loading {
            self.phase = ViewerPhase::Error;
        }
    }
}
