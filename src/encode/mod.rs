//! Still-image export.
//!
//! Export reads the most recent frame and never touches render state.

/// PNG encoding and data-URL payloads.
pub mod png;
