//! Error handling for televis-rs
//!
//! The public mutation surface is deliberately total: publishing a value,
//! pushing a sample, or rebuilding a structure never fails loudly. Errors
//! exist only at the render-backend seam, where window or GPU setup can
//! genuinely go wrong, and they stay on the render thread; producers only
//! ever observe `is_running()` flipping to false.

use thiserror::Error;

/// Main error type for televis-rs operations
#[derive(Error, Debug)]
pub enum TelevisError {
    /// Render backend failed to initialize (window/context creation)
    #[error("Backend initialization failed: {0}")]
    Init(String),

    /// Render backend failed while drawing or presenting a frame
    #[error("Backend error: {0}")]
    Backend(String),
}

/// Result type alias for televis-rs operations
pub type Result<T> = std::result::Result<T, TelevisError>;
