//! Editing session on top of the compositor.
//!
//! [`editor::EditorSession`] is the stateful front: it owns the parameters, the loaded images and
//! the pan gesture, and redraws on every change. [`coalesce`] holds the small synchronization
//! helpers used to decouple input from rendering.

pub mod coalesce;
pub mod editor;
