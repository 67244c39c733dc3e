//! # televis-rs: in-process telemetry visualizer
//!
//! A telemetry aggregation engine for instrumented applications: producer
//! threads publish named scalars, bounded graph samples, and rebuildable
//! structure trees through a fire-and-forget handle, and one dedicated
//! render thread owns the resulting state tree and draws it.
//!
//! ## Architecture
//!
//! - **Model** ([`model`]): the state tree: [`Visualizer`] windows holding
//!   ordered [`Tab`]s of scalars, [`GraphSeries`] ring buffers, and
//!   structure entries, with recursively nested child visualizers (tiles)
//! - **Service** ([`service`]): the thread bridge: typed updates become
//!   commands on a crossbeam channel; the render thread drains the whole
//!   queue once per frame and applies it in FIFO order
//! - **Render** ([`render`]): the platform boundary: a [`RenderBackend`]
//!   trait the embedding application implements, egui widget code for the
//!   tree in [`render::draw`], and a windowless [`HeadlessBackend`]
//!
//! Exactly one thread mutates the tree after construction. Producers never
//! block on render work and no update call can fail; reads happen on the
//! render thread, inside the frame hook.
//!
//! ## Example
//!
//! ```
//! use televis_rs::{RenderService, ServiceOptions};
//!
//! let service = RenderService::new(ServiceOptions::default());
//! let handle = service.handle();
//!
//! // From any thread, without starting anything explicitly:
//! handle.value("score", 42);
//! handle.tab("physics").sample("gravity", 9.81);
//! handle.structure("player", |b| {
//!     b.field("health", 97);
//!     let mut position = b.nested("position");
//!     position.field("x", 1.0f32);
//!     position.field("y", 2.0f32);
//! });
//!
//! service.stop();
//! ```

pub mod config;
pub mod error;
pub mod model;
pub mod render;
pub mod service;
pub mod types;

// Re-export commonly used types
pub use config::{ServiceOptions, WindowOptions};
pub use error::{Result, TelevisError};
pub use model::{
    GraphConfig, GraphSeries, StructureBuilder, StructureEntry, StructureNode, Tab, Visualizer,
    WindowFlags, DEFAULT_TAB_ID,
};
pub use render::{FrameInput, HeadlessBackend, HeadlessProbe, RenderBackend};
pub use service::{FrameContext, RenderService, ServiceHandle, Status, TabHandle};
pub use types::ScalarValue;
