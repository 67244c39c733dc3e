//! Configuration for televis-rs
//!
//! Plain-data option structs handed to [`RenderService`](crate::service::RenderService)
//! at construction. Both are serde-derived so an embedding application can
//! load them from whatever config file format it already uses; all fields
//! have sensible defaults and nothing here is validated; degenerate values
//! degrade gracefully rather than erroring (a `frame_rate_hz` of 0 means
//! "no pacing, yield only").

use serde::{Deserialize, Serialize};

/// Default window width in pixels
pub const DEFAULT_WINDOW_WIDTH: u32 = 1280;

/// Default window height in pixels
pub const DEFAULT_WINDOW_HEIGHT: u32 = 720;

/// Default window title
pub const DEFAULT_WINDOW_TITLE: &str = "Telemetry";

/// Default render loop pacing in frames per second
pub const DEFAULT_FRAME_RATE_HZ: u32 = 60;

/// Window parameters passed through to the render backend
///
/// The core never interprets these beyond handing them to
/// [`RenderBackend::init`](crate::render::RenderBackend::init); what a
/// "window" is (native surface, offscreen target, nothing at all for the
/// headless backend) is the backend's business.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowOptions {
    /// Initial window width in pixels
    pub width: u32,
    /// Initial window height in pixels
    pub height: u32,
    /// Initial window title
    pub title: String,
    /// Whether the backend should synchronize presentation to the display
    pub vsync: bool,
}

impl Default for WindowOptions {
    fn default() -> Self {
        Self {
            width: DEFAULT_WINDOW_WIDTH,
            height: DEFAULT_WINDOW_HEIGHT,
            title: DEFAULT_WINDOW_TITLE.to_string(),
            vsync: true,
        }
    }
}

/// Options for the render service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceOptions {
    /// Window parameters for the backend
    pub window: WindowOptions,
    /// Target frame rate for the render loop (0 = unpaced)
    pub frame_rate_hz: u32,
}

impl Default for ServiceOptions {
    fn default() -> Self {
        Self {
            window: WindowOptions::default(),
            frame_rate_hz: DEFAULT_FRAME_RATE_HZ,
        }
    }
}
