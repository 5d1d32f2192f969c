//! Per-frame debounce of decal rebuilds and canvas redraws.

use garmentkit_core::ZoneKey;
use std::collections::BTreeSet;

/// Collects rebuild and redraw requests until the next animation frame.
///
/// Any number of requests for one zone within a frame collapse into a
/// single rebuild.
#[derive(Debug, Default)]
pub struct FrameScheduler {
    pending_rebuilds: BTreeSet<ZoneKey>,
    redraw_pending: bool,
    frames: u64,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the zone was not already scheduled.
    pub fn request_rebuild(&mut self, zone: ZoneKey) -> bool {
        self.pending_rebuilds.insert(zone)
    }

    pub fn request_redraw(&mut self) {
        self.redraw_pending = true;
    }

    pub fn is_rebuild_pending(&self, zone: ZoneKey) -> bool {
        self.pending_rebuilds.contains(&zone)
    }

    pub fn is_redraw_pending(&self) -> bool {
        self.redraw_pending
    }

    pub fn cancel_rebuild(&mut self, zone: ZoneKey) {
        self.pending_rebuilds.remove(&zone);
    }

    /// Starts a frame: drains scheduled zones and the redraw flag.
    pub fn begin_frame(&mut self) -> (Vec<ZoneKey>, bool) {
        self.frames += 1;
        let zones = std::mem::take(&mut self.pending_rebuilds).into_iter().collect();
        let redraw = std::mem::replace(&mut self.redraw_pending, false);
        (zones, redraw)
    }

    pub fn frame_count(&self) -> u64 {
        self.frames
    }
}
