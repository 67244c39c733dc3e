//! Render backend boundary
//!
//! The core never touches pixels or platform windows itself. Everything a
//! platform integration must supply is behind the [`RenderBackend`] trait:
//! create the surface, poll events, draw the visualizer tree, present.
//! The render thread constructs the backend *inside* itself (GL/Metal
//! contexts are thread-affine) via the factory given to
//! [`RenderService::with_backend`](crate::service::RenderService::with_backend).
//!
//! Two implementations ship with the crate:
//!
//! - [`HeadlessBackend`] - no window, no drawing; the default backend and
//!   the one used in tests and CI
//! - [`draw`] - egui widget code that turns the tree into windows, tab
//!   strips, plots, and collapsible structure trees, for backends built on
//!   any egui platform integration
//!
//! # Visibility feedback
//!
//! A backend that shows real windows must write the user's close action
//! back into [`Visualizer::set_visible`]; this is the only UI-to-core
//! feedback channel. [`draw::show`] does this for egui windows.

pub mod draw;
pub mod headless;

pub use headless::{HeadlessBackend, HeadlessProbe};

use crate::config::WindowOptions;
use crate::error::Result;
use crate::model::Visualizer;
use std::time::Duration;

/// Per-frame platform input handed to the render loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameInput {
    /// Wall-clock time since the previous frame
    pub delta: Duration,
    /// Whether the platform asked the whole service to shut down
    /// (e.g. the last OS window was closed)
    pub close_requested: bool,
}

impl FrameInput {
    /// An input with the given delta and no close request
    pub fn tick(delta: Duration) -> Self {
        Self {
            delta,
            close_requested: false,
        }
    }
}

/// Platform/rendering collaborator driven by the render thread
///
/// Implementations must be `Send`: the backend is constructed and used on
/// the render thread, but the factory that builds it crosses threads.
///
/// All methods are called from the render thread only, in the fixed order
/// `init` once, then `poll` → `render` per frame, then `shutdown` once.
#[cfg_attr(test, mockall::automock)]
pub trait RenderBackend: Send {
    /// Create the window/surface. An error here stops the service before
    /// its first frame; producers only ever observe `is_running() == false`.
    fn init(&mut self, window: &WindowOptions) -> Result<()>;

    /// Pump platform events and report per-frame input
    fn poll(&mut self) -> FrameInput;

    /// Draw and present one frame of the tree
    ///
    /// Takes the tree mutably so user window-close actions can be written
    /// back into visibility flags.
    fn render(&mut self, root: &mut Visualizer) -> Result<()>;

    /// Tear down the window/surface. Called exactly once, also on the
    /// failure paths after a successful `init`.
    fn shutdown(&mut self) {}
}
