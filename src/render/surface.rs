use crate::foundation::core::Canvas;
use crate::foundation::error::ComposeResult;
use crate::render::shadow::ShadowScratch;

/// Allocation counters for the persistent surfaces.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SurfaceStats {
    /// Times the pixmaps were (re)allocated.
    pub allocations: u64,
    /// Frames served from already-allocated pixmaps.
    pub reuses: u64,
}

/// Canvas pixmap, layer scratch pixmap and shadow buffers, kept across frames.
///
/// Pixmaps are reallocated only when the canvas size changes.
pub(crate) struct Surfaces {
    canvas_size: Canvas,
    pub(crate) canvas: vello_cpu::Pixmap,
    pub(crate) layer: vello_cpu::Pixmap,
    pub(crate) shadow: ShadowScratch,
    stats: SurfaceStats,
}

impl Surfaces {
    pub(crate) fn new(canvas: Canvas) -> ComposeResult<Self> {
        let (w, h) = canvas.surface_dims()?;
        Ok(Self {
            canvas_size: canvas,
            canvas: vello_cpu::Pixmap::new(w, h),
            layer: vello_cpu::Pixmap::new(w, h),
            shadow: ShadowScratch::default(),
            stats: SurfaceStats {
                allocations: 1,
                reuses: 0,
            },
        })
    }

    /// Make sure the pixmaps match `canvas`; returns `true` when they were reallocated.
    pub(crate) fn ensure(&mut self, canvas: Canvas) -> ComposeResult<bool> {
        if self.canvas_size == canvas {
            self.stats.reuses = self.stats.reuses.saturating_add(1);
            return Ok(false);
        }
        let (w, h) = canvas.surface_dims()?;
        tracing::debug!(
            width = canvas.width,
            height = canvas.height,
            "reallocating surfaces"
        );
        self.canvas = vello_cpu::Pixmap::new(w, h);
        self.layer = vello_cpu::Pixmap::new(w, h);
        self.canvas_size = canvas;
        self.stats.allocations = self.stats.allocations.saturating_add(1);
        Ok(true)
    }

    pub(crate) fn canvas_size(&self) -> Canvas {
        self.canvas_size
    }

    pub(crate) fn stats(&self) -> SurfaceStats {
        self.stats
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
