//! Postframe composes a single social-media image from a base photo, two text blocks and a logo.
//!
//! The public API is session-oriented:
//!
//! - Describe the post with [`CompositionParams`] (JSON-loadable)
//! - Create an [`EditorSession`] (or drive a [`Compositor`] directly)
//! - Feed it a base image and an optional logo, edit parameters, drag to pan
//! - Export the latest frame with [`EditorSession::export`] or [`export_png`]
//!
//! Every change triggers a full redraw of the canvas. There is no incremental invalidation.
#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod assets;
mod foundation;

/// Caption/illustration provider contracts and the planned-post record.
pub mod collab;
/// Still-image export.
pub mod encode;
/// Layer renderers and the compositor.
pub mod render;
/// Composition parameter model.
pub mod scene;
/// Interactive editing session.
pub mod session;

pub use crate::foundation::core::{Affine, Canvas, Point, Rect, Size, Vec2};
pub use crate::foundation::error::{ComposeError, ComposeResult};

pub use crate::assets::color::Rgba8;
pub use crate::assets::decode::{
    ImageSource, RasterImage, decode_data_url, decode_image, load_source,
};
pub use crate::assets::fonts::FontBook;
pub use crate::collab::generation::{
    CannedGenerator, ContentGenerator, GenerationError, GeneratorConfig, ImageStyle, Summary, Tone,
    parse_summary_response,
};
pub use crate::collab::post::{PostRecord, PostStatus};
pub use crate::encode::png::{ExportedImage, export_png};
pub use crate::render::base::BasePlacement;
pub use crate::render::compositor::{
    Compositor, CompositorOpts, Frame, LayerKind, RenderReport, Scene, SkipReason,
};
pub use crate::render::logo::LogoPlacement;
pub use crate::render::shadow::DropShadow;
pub use crate::render::surface::SurfaceStats;
pub use crate::render::text::TextBlockLayout;
pub use crate::scene::model::{
    BaseTransform, CanvasPreset, CompositionParams, FilterSet, FontChoice, FontPreset, LayerOrder,
    LogoFit, LogoShape, LogoSpec, TextLayer,
};
pub use crate::session::coalesce::{Debounce, LatestWins};
pub use crate::session::editor::{
    DragOpts, DragState, EditorSession, LoadOutcome, LoadSlot, LoadTicket, SessionOpts,
    SessionStats, SessionStatus,
};
