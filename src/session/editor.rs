//! Interactive editing session: parameter edits, drag-to-pan, image load lifecycle and export.
//!
//! The session owns one [`Compositor`] and redraws synchronously on every change. Image loads
//! are modeled as ticketed one-shot operations so a late result from a superseded load is
//! discarded instead of overwriting a newer image.

use std::time::{Duration, Instant};

use crate::assets::decode::{ImageSource, RasterImage, load_source};
use crate::encode::png::ExportedImage;
use crate::foundation::core::{Point, Vec2};
use crate::foundation::error::{ComposeError, ComposeResult};
use crate::render::compositor::{Compositor, CompositorOpts, Frame, RenderReport, Scene};
use crate::scene::model::{BaseTransform, CanvasPreset, CompositionParams};
use crate::session::coalesce::Debounce;

/// Pointer drag tuning.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragOpts {
    /// Pan pixels per pointer pixel, before the display scale.
    pub sensitivity: f64,
}

impl Default for DragOpts {
    fn default() -> Self {
        Self { sensitivity: 2.0 }
    }
}

/// Session configuration.
#[derive(Clone, Debug, Default)]
pub struct SessionOpts {
    /// Compositor configuration.
    pub compositor: CompositorOpts,
    /// Drag tuning.
    pub drag: DragOpts,
    /// Quiet period after the last render before [`EditorSession::poll_autosave`] exports.
    /// `None` disables auto-export.
    pub autosave_delay: Option<Duration>,
}

/// Pan gesture state.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum DragState {
    /// No gesture in progress.
    #[default]
    Idle,
    /// Pointer is held; `last` is the previous pointer position.
    Dragging {
        /// Pointer position at the previous event.
        last: Point,
    },
}

/// The two independent image slots.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LoadSlot {
    /// Base photo.
    Base,
    /// Logo.
    Logo,
}

/// Handle for one in-flight image load.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LoadTicket {
    slot: LoadSlot,
    generation: u64,
}

impl LoadTicket {
    /// Slot this load fills.
    pub fn slot(&self) -> LoadSlot {
        self.slot
    }

    /// Monotonic load number within the slot.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Result of finishing a load.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The image was installed.
    Applied,
    /// A newer load superseded this one; the result was discarded.
    Stale,
    /// The logo failed to load; the session continues without a logo.
    Dropped,
}

/// Readiness of the session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionStatus {
    /// No base image has been delivered yet.
    Empty,
    /// At least one load is in flight; renders are deferred.
    Loading,
    /// Renders run immediately.
    Ready,
    /// The base image failed to load; nothing can be rendered until a new base arrives.
    CannotRender(String),
}

/// Counters for observing session behavior.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Completed renders.
    pub renders: u64,
    /// Render requests postponed because a load was in flight.
    pub deferred: u64,
    /// Load results discarded as stale.
    pub stale_loads: u64,
}

#[derive(Clone, Copy, Debug, Default)]
struct SlotState {
    generation: u64,
    pending: bool,
}

impl SlotState {
    fn begin(&mut self, slot: LoadSlot) -> LoadTicket {
        self.generation = self.generation.wrapping_add(1);
        self.pending = true;
        LoadTicket {
            slot,
            generation: self.generation,
        }
    }

    fn is_current(&self, ticket: LoadTicket) -> bool {
        self.pending && ticket.generation == self.generation
    }

    fn invalidate(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.pending = false;
    }
}

/// One editing session over a base photo, an optional logo and a parameter set.
#[derive(Debug)]
pub struct EditorSession {
    compositor: Compositor,
    params: CompositionParams,
    base: Option<RasterImage>,
    logo: Option<RasterImage>,
    base_slot: SlotState,
    logo_slot: SlotState,
    base_error: Option<String>,
    drag: DragState,
    drag_opts: DragOpts,
    display_scale: f64,
    autosave: Option<Debounce>,
    stats: SessionStats,
    /// The last frame no longer reflects the current images and parameters.
    frame_stale: bool,
}

impl EditorSession {
    /// Create a session with default parameters and no images.
    pub fn new(opts: SessionOpts) -> Self {
        Self {
            compositor: Compositor::new(opts.compositor),
            params: CompositionParams::default(),
            base: None,
            logo: None,
            base_slot: SlotState::default(),
            logo_slot: SlotState::default(),
            base_error: None,
            drag: DragState::Idle,
            drag_opts: opts.drag,
            display_scale: 1.0,
            autosave: opts.autosave_delay.map(Debounce::new),
            stats: SessionStats::default(),
            frame_stale: false,
        }
    }

    /// Current (sanitized) parameters.
    pub fn params(&self) -> &CompositionParams {
        &self.params
    }

    /// Current readiness.
    pub fn status(&self) -> SessionStatus {
        if self.base_slot.pending || self.logo_slot.pending {
            SessionStatus::Loading
        } else if let Some(msg) = &self.base_error {
            SessionStatus::CannotRender(msg.clone())
        } else if self.base.is_none() {
            SessionStatus::Empty
        } else {
            SessionStatus::Ready
        }
    }

    /// Current pan gesture state.
    pub fn drag_state(&self) -> DragState {
        self.drag
    }

    /// Loaded base image.
    pub fn base(&self) -> Option<&RasterImage> {
        self.base.as_ref()
    }

    /// Loaded logo.
    pub fn logo(&self) -> Option<&RasterImage> {
        self.logo.as_ref()
    }

    /// Behavior counters.
    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    /// Underlying compositor.
    pub fn compositor(&self) -> &Compositor {
        &self.compositor
    }

    /// Underlying compositor, e.g. to register fonts.
    pub fn compositor_mut(&mut self) -> &mut Compositor {
        &mut self.compositor
    }

    /// Most recent frame. May predate a failed base load; check [`EditorSession::status`].
    pub fn last_frame(&self) -> Option<&Frame> {
        self.compositor.last_frame()
    }

    /// Layer report of the most recent frame.
    pub fn last_report(&self) -> &RenderReport {
        self.compositor.last_report()
    }

    /// Start loading a new base image. Any earlier base load becomes stale.
    pub fn begin_base_load(&mut self) -> LoadTicket {
        let t = self.base_slot.begin(LoadSlot::Base);
        tracing::debug!(generation = t.generation, "base load started");
        t
    }

    /// Start loading a new logo. Any earlier logo load becomes stale.
    pub fn begin_logo_load(&mut self) -> LoadTicket {
        let t = self.logo_slot.begin(LoadSlot::Logo);
        tracing::debug!(generation = t.generation, "logo load started");
        t
    }

    /// Deliver the result of a base load.
    ///
    /// A new base resets the transform to identity and re-renders once no load is pending. A
    /// failure leaves the session in [`SessionStatus::CannotRender`] and is returned as
    /// [`ComposeError::BaseImage`].
    pub fn finish_base_load(
        &mut self,
        ticket: LoadTicket,
        result: ComposeResult<RasterImage>,
    ) -> ComposeResult<LoadOutcome> {
        if ticket.slot != LoadSlot::Base || !self.base_slot.is_current(ticket) {
            return Ok(self.stale(ticket));
        }
        self.base_slot.pending = false;
        match result {
            Ok(image) => {
                tracing::debug!(
                    width = image.width,
                    height = image.height,
                    "base image installed"
                );
                self.base = Some(image);
                self.base_error = None;
                self.params.transform = BaseTransform::IDENTITY;
                self.drag = DragState::Idle;
                self.frame_stale = true;
                self.settle()?;
                Ok(LoadOutcome::Applied)
            }
            Err(err) => {
                let msg = match err {
                    ComposeError::BaseImage(m) => m,
                    other => other.to_string(),
                };
                tracing::warn!(error = %msg, "base image unusable, rendering disabled");
                self.base = None;
                self.base_error = Some(msg.clone());
                self.drag = DragState::Idle;
                if let Some(d) = &mut self.autosave {
                    d.cancel();
                }
                Err(ComposeError::base_image(msg))
            }
        }
    }

    /// Deliver the result of a logo load. Failures degrade to "no logo".
    pub fn finish_logo_load(
        &mut self,
        ticket: LoadTicket,
        result: ComposeResult<RasterImage>,
    ) -> ComposeResult<LoadOutcome> {
        if ticket.slot != LoadSlot::Logo || !self.logo_slot.is_current(ticket) {
            return Ok(self.stale(ticket));
        }
        self.logo_slot.pending = false;
        let outcome = match result {
            Ok(image) => {
                self.logo = Some(image);
                LoadOutcome::Applied
            }
            Err(err) => {
                tracing::warn!(error = %err, "logo unusable, continuing without logo");
                self.logo = None;
                LoadOutcome::Dropped
            }
        };
        self.frame_stale = true;
        self.settle()?;
        Ok(outcome)
    }

    fn stale(&mut self, ticket: LoadTicket) -> LoadOutcome {
        self.stats.stale_loads = self.stats.stale_loads.saturating_add(1);
        tracing::debug!(
            slot = ?ticket.slot,
            generation = ticket.generation,
            "discarding stale load result"
        );
        LoadOutcome::Stale
    }

    /// Read, decode and install a base image in one step.
    pub fn load_base(&mut self, source: &ImageSource) -> ComposeResult<LoadOutcome> {
        let ticket = self.begin_base_load();
        let result = load_source(source).map_err(|e| ComposeError::base_image(e.to_string()));
        self.finish_base_load(ticket, result)
    }

    /// Read, decode and install a logo in one step.
    pub fn load_logo(&mut self, source: &ImageSource) -> ComposeResult<LoadOutcome> {
        let ticket = self.begin_logo_load();
        let result = load_source(source).map_err(|e| ComposeError::logo(e.to_string()));
        self.finish_logo_load(ticket, result)
    }

    /// Remove the logo, cancelling any in-flight logo load.
    pub fn clear_logo(&mut self) -> ComposeResult<Option<&Frame>> {
        self.logo_slot.invalidate();
        self.logo = None;
        self.redraw()
    }

    /// Apply a parameter edit and redraw.
    ///
    /// Values are clamped into their domains. Switching the canvas preset resets the transform.
    /// Returns `None` when the redraw is deferred or no base image exists yet.
    pub fn update(
        &mut self,
        edit: impl FnOnce(&mut CompositionParams),
    ) -> ComposeResult<Option<&Frame>> {
        let preset = self.params.preset;
        edit(&mut self.params);
        self.params = self.params.sanitized();
        if self.params.preset != preset {
            tracing::debug!(
                from = preset.name(),
                to = self.params.preset.name(),
                "canvas preset changed, resetting transform"
            );
            self.params.transform = BaseTransform::IDENTITY;
        }
        self.redraw()
    }

    /// Replace the whole parameter set and redraw.
    ///
    /// The supplied transform is kept as given (after clamping), even when the preset differs
    /// from the current one. Use [`EditorSession::set_preset`] to switch presets interactively.
    pub fn set_params(&mut self, params: CompositionParams) -> ComposeResult<Option<&Frame>> {
        self.params = params.sanitized();
        self.redraw()
    }

    /// Switch the canvas preset.
    pub fn set_preset(&mut self, preset: CanvasPreset) -> ComposeResult<Option<&Frame>> {
        self.update(|p| p.preset = preset)
    }

    /// Set canvas pixels per viewport pixel, used to map pointer deltas onto the canvas.
    pub fn set_display_scale(&mut self, scale: f64) -> ComposeResult<()> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(ComposeError::validation(
                "display scale must be finite and > 0",
            ));
        }
        self.display_scale = scale;
        Ok(())
    }

    /// Pointer pressed over the canvas.
    pub fn pointer_down(&mut self, at: Point) {
        self.drag = DragState::Dragging { last: at };
    }

    /// Pointer moved. While dragging, pans by the delta from the previous position.
    pub fn pointer_move(&mut self, at: Point) -> ComposeResult<Option<&Frame>> {
        let DragState::Dragging { last } = self.drag else {
            return Ok(None);
        };
        self.drag = DragState::Dragging { last: at };
        let delta: Vec2 = (at - last) * (self.drag_opts.sensitivity * self.display_scale);
        if delta.x == 0.0 && delta.y == 0.0 {
            return Ok(None);
        }
        self.params.transform.pan_x += delta.x;
        self.params.transform.pan_y += delta.y;
        self.redraw()
    }

    /// Pointer released.
    pub fn pointer_up(&mut self) {
        self.drag = DragState::Idle;
    }

    /// Pointer left the canvas; ends the gesture like a release.
    pub fn pointer_leave(&mut self) {
        self.drag = DragState::Idle;
    }

    /// Render now.
    ///
    /// Returns `None` when the render is deferred behind a pending load, and
    /// [`ComposeError::NotReady`] when there is no usable base image.
    pub fn render(&mut self) -> ComposeResult<Option<&Frame>> {
        if self.base.is_none() && self.base_error.is_none() && !self.base_slot.pending {
            return Err(ComposeError::not_ready("no base image loaded"));
        }
        self.redraw()
    }

    /// Encode the most recent frame as PNG. Never re-renders.
    ///
    /// Refuses with [`ComposeError::NotReady`] while a render is deferred behind a pending load,
    /// since the last frame would not show the latest edits.
    pub fn export(&mut self) -> ComposeResult<ExportedImage> {
        if let Some(msg) = &self.base_error {
            return Err(ComposeError::export(format!(
                "no current frame, base image unusable: {msg}"
            )));
        }
        if self.frame_stale {
            return Err(ComposeError::not_ready(
                "latest changes are waiting on a pending load",
            ));
        }
        let out = self.compositor.export_png()?;
        if let Some(d) = &mut self.autosave {
            d.cancel();
        }
        Ok(out)
    }

    /// Export once the configured quiet period after the last render has elapsed.
    pub fn poll_autosave(&mut self, now: Instant) -> ComposeResult<Option<ExportedImage>> {
        let Some(d) = &mut self.autosave else {
            return Ok(None);
        };
        if !d.poll(now) {
            return Ok(None);
        }
        tracing::debug!("auto-exporting settled frame");
        self.export().map(Some)
    }

    fn settle(&mut self) -> ComposeResult<()> {
        if self.base_slot.pending || self.logo_slot.pending || self.base.is_none() {
            return Ok(());
        }
        self.redraw().map(|_| ())
    }

    fn redraw(&mut self) -> ComposeResult<Option<&Frame>> {
        if let Some(msg) = &self.base_error
            && !self.base_slot.pending
        {
            return Err(ComposeError::not_ready(format!(
                "base image unusable: {msg}"
            )));
        }
        if self.base_slot.pending || self.logo_slot.pending {
            self.stats.deferred = self.stats.deferred.saturating_add(1);
            self.frame_stale = true;
            tracing::debug!("render deferred until pending loads finish");
            return Ok(None);
        }
        let Some(base) = &self.base else {
            return Ok(None);
        };
        let scene = Scene {
            base,
            logo: self.logo.as_ref(),
            params: &self.params,
        };
        let frame = self.compositor.render(&scene)?;
        self.frame_stale = false;
        self.stats.renders = self.stats.renders.saturating_add(1);
        if let Some(d) = &mut self.autosave {
            d.arm(Instant::now());
        }
        Ok(Some(frame))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/editor.rs"]
mod tests;
