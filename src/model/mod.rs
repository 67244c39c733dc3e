//! The telemetry data model
//!
//! A hierarchical state tree owned, after construction, by exactly one
//! thread (the render thread, see [`crate::service`]):
//!
//! - [`Visualizer`] - one window: ordered [`Tab`]s plus recursively nested
//!   child visualizers ("tiles")
//! - [`Tab`] - keyed maps of scalars, [`GraphSeries`], and structure
//!   entries, created lazily on first write
//! - [`GraphSeries`] - bounded ring buffer of samples with plot config
//! - [`StructureEntry`] / [`StructureBuilder`] - wholesale-rebuildable
//!   labeled trees
//!
//! Everything here is plain single-threaded data; the thread-safety story
//! lives entirely in the service layer.

pub mod graph;
pub mod structure;
pub mod tab;
pub mod visualizer;

pub use graph::{GraphConfig, GraphSeries, DEFAULT_MAX_SAMPLES};
pub use structure::{StructureBuilder, StructureEntry, StructureNode};
pub use tab::Tab;
pub use visualizer::{Visualizer, WindowFlags, DEFAULT_TAB_ID};
