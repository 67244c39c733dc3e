//! Headless render backend
//!
//! Renders nothing and opens no window, it just counts frames. This is
//! the default backend, which keeps the service fully functional (and the
//! whole command pipeline exercised) on machines with no display: CI,
//! servers, tests. A cloned [`HeadlessProbe`] lets tests observe progress
//! from outside the render thread, and the scripted knobs simulate the
//! failure and close paths of a real platform backend.

use crate::config::WindowOptions;
use crate::error::{Result, TelevisError};
use crate::model::Visualizer;
use crate::render::{FrameInput, RenderBackend};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Shared observation handle for a [`HeadlessBackend`]
#[derive(Debug, Clone, Default)]
pub struct HeadlessProbe {
    frames: Arc<AtomicU64>,
}

impl HeadlessProbe {
    /// Number of frames rendered so far
    pub fn frames(&self) -> u64 {
        self.frames.load(Ordering::SeqCst)
    }
}

/// A windowless [`RenderBackend`]
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    probe: HeadlessProbe,
    last_frame: Option<Instant>,
    close_after: Option<u64>,
    fail_init: bool,
}

impl HeadlessBackend {
    /// Create a backend that runs until the service is stopped
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a platform close after `frames` rendered frames
    pub fn close_after(mut self, frames: u64) -> Self {
        self.close_after = Some(frames);
        self
    }

    /// Make `init` fail, simulating window/context setup failure
    pub fn fail_init(mut self) -> Self {
        self.fail_init = true;
        self
    }

    /// Get a handle for observing this backend from another thread
    pub fn probe(&self) -> HeadlessProbe {
        self.probe.clone()
    }
}

impl RenderBackend for HeadlessBackend {
    fn init(&mut self, window: &WindowOptions) -> Result<()> {
        if self.fail_init {
            return Err(TelevisError::Init("headless init failure".to_string()));
        }
        tracing::debug!(title = %window.title, "headless backend ready");
        Ok(())
    }

    fn poll(&mut self) -> FrameInput {
        let now = Instant::now();
        let delta = self
            .last_frame
            .map(|last| now - last)
            .unwrap_or(Duration::ZERO);
        self.last_frame = Some(now);

        let close_requested = self
            .close_after
            .is_some_and(|limit| self.probe.frames() >= limit);
        FrameInput {
            delta,
            close_requested,
        }
    }

    fn render(&mut self, _root: &mut Visualizer) -> Result<()> {
        self.probe.frames.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
