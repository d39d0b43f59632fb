//! Full-redraw layer compositor.
//!
//! Every [`Compositor::render`] call repaints the whole canvas: clear, base image, then the text
//! layers and the logo in the order chosen by [`LayerOrder`]. Overlay layers are rasterized one at
//! a time into a scratch pixmap so each can carry its own drop shadow, then blended onto the
//! persistent canvas pixmap.

use std::path::PathBuf;

use crate::assets::color::Rgba8;
use crate::assets::decode::RasterImage;
use crate::assets::fonts::FontBook;
use crate::encode::png::{ExportedImage, export_png};
use crate::foundation::core::Canvas;
use crate::foundation::error::{ComposeError, ComposeResult};
use crate::foundation::math::hash64;
use crate::render::base::{BasePlacement, FilteredBaseCache};
use crate::render::logo::{LogoPlacement, paint_logo};
use crate::render::pixels::{
    affine_to_cpu, alpha_bounds, clear_to, image_paint, pixmap_from_raster, premul_over_in_rect,
    rect_to_cpu,
};
use crate::render::shadow::{DropShadow, paint_shadow};
use crate::render::surface::{SurfaceStats, Surfaces};
use crate::render::text::{cpu_color, paint_text_layer};
use crate::scene::model::{CompositionParams, LayerOrder, LogoSpec, TextLayer};

/// Compositor configuration.
#[derive(Clone, Debug)]
pub struct CompositorOpts {
    /// Color painted under the base image; `None` leaves uncovered pixels transparent.
    pub clear_rgba: Option<Rgba8>,
    /// Seed the font book with the system fonts.
    pub system_fonts: bool,
    /// Extra directories scanned for font files.
    pub font_dirs: Vec<PathBuf>,
    /// Shadow under each text layer.
    pub text_shadow: DropShadow,
    /// Shadow under the logo.
    pub logo_shadow: DropShadow,
}

impl Default for CompositorOpts {
    fn default() -> Self {
        Self {
            clear_rgba: None,
            system_fonts: true,
            font_dirs: Vec::new(),
            text_shadow: DropShadow::TEXT,
            logo_shadow: DropShadow::LOGO,
        }
    }
}

/// Inputs of one render. The base raster is mandatory; the logo is optional.
#[derive(Clone, Copy, Debug)]
pub struct Scene<'a> {
    /// Decoded base photo.
    pub base: &'a RasterImage,
    /// Decoded logo, if any.
    pub logo: Option<&'a RasterImage>,
    /// Composition parameters; sanitized before use.
    pub params: &'a CompositionParams,
}

/// Rendered canvas in premultiplied RGBA8.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Premultiplied RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Hash of every input that produced this frame.
    pub fingerprint: u64,
}

impl Frame {
    /// Pixel at `(x, y)`, premultiplied.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + x as usize) * 4;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Frame size as a canvas.
    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }
}

/// Layers the compositor knows about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LayerKind {
    /// Filtered, transformed base photo.
    Base,
    /// First text layer.
    Headline,
    /// Second text layer.
    Subtitle,
    /// Clipped logo.
    Logo,
}

/// Why a layer contributed no pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SkipReason {
    /// Layer is switched off.
    Disabled,
    /// Text content is empty or whitespace.
    EmptyText,
    /// No font face is available.
    NoFont,
    /// No logo raster is loaded.
    NoLogo,
    /// Layer was painted entirely outside the canvas.
    Offscreen,
}

/// What the last render painted, in paint order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderReport {
    /// Layers that reached the canvas.
    pub drawn: Vec<LayerKind>,
    /// Layers that were skipped.
    pub skipped: Vec<(LayerKind, SkipReason)>,
}

impl RenderReport {
    /// Return `true` when `kind` reached the canvas.
    pub fn was_drawn(&self, kind: LayerKind) -> bool {
        self.drawn.contains(&kind)
    }

    fn record(&mut self, kind: LayerKind, outcome: Result<(), SkipReason>) {
        match outcome {
            Ok(()) => {
                tracing::debug!(layer = ?kind, "layer drawn");
                self.drawn.push(kind);
            }
            Err(reason) => {
                if reason == SkipReason::NoFont {
                    tracing::warn!(layer = ?kind, "no font available, text layer skipped");
                } else {
                    tracing::debug!(layer = ?kind, ?reason, "layer skipped");
                }
                self.skipped.push((kind, reason));
            }
        }
    }
}

/// Owns the render surfaces, font book and paint caches of one editing session.
pub struct Compositor {
    opts: CompositorOpts,
    fonts: FontBook,
    ctx: Option<vello_cpu::RenderContext>,
    surfaces: Option<Surfaces>,
    base_cache: FilteredBaseCache,
    logo_cache: Option<(u64, vello_cpu::Image)>,
    frame: Option<Frame>,
    report: RenderReport,
}

impl std::fmt::Debug for Compositor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Compositor")
            .field("opts", &self.opts)
            .field("fonts", &self.fonts)
            .field("has_frame", &self.frame.is_some())
            .finish()
    }
}

impl Compositor {
    /// Create a compositor and load its fonts.
    pub fn new(opts: CompositorOpts) -> Self {
        let mut fonts = if opts.system_fonts {
            FontBook::with_system_fonts()
        } else {
            FontBook::empty()
        };
        for dir in &opts.font_dirs {
            fonts.load_fonts_dir(dir);
        }
        Self {
            opts,
            fonts,
            ctx: None,
            surfaces: None,
            base_cache: FilteredBaseCache::default(),
            logo_cache: None,
            frame: None,
            report: RenderReport::default(),
        }
    }

    /// Options this compositor was built with.
    pub fn opts(&self) -> &CompositorOpts {
        &self.opts
    }

    /// Font book used for text layers; add faces here before rendering.
    pub fn fonts_mut(&mut self) -> &mut FontBook {
        &mut self.fonts
    }

    /// The most recent frame, if any render succeeded.
    pub fn last_frame(&self) -> Option<&Frame> {
        self.frame.as_ref()
    }

    /// Layer report of the most recent render.
    pub fn last_report(&self) -> &RenderReport {
        &self.report
    }

    /// Allocation counters of the persistent surfaces.
    pub fn surface_stats(&self) -> SurfaceStats {
        self.surfaces
            .as_ref()
            .map(Surfaces::stats)
            .unwrap_or_default()
    }

    /// Encode the most recent frame as PNG.
    pub fn export_png(&self) -> ComposeResult<ExportedImage> {
        let frame = self
            .frame
            .as_ref()
            .ok_or_else(|| ComposeError::export("nothing has been rendered yet"))?;
        export_png(frame)
    }

    /// Repaint the whole canvas for `scene`.
    #[tracing::instrument(
        skip_all,
        fields(preset = scene.params.preset.name(), logo = scene.logo.is_some())
    )]
    pub fn render(&mut self, scene: &Scene<'_>) -> ComposeResult<&Frame> {
        let params = scene.params.sanitized();
        let canvas = params.canvas();
        let (w, h) = canvas.surface_dims()?;
        match &mut self.surfaces {
            Some(s) => {
                s.ensure(canvas)?;
            }
            None => self.surfaces = Some(Surfaces::new(canvas)?),
        }

        let mut report = RenderReport::default();
        self.with_ctx_mut(w, h, |this, ctx| {
            this.paint_base(ctx, scene.base, &params, canvas)
        })?;
        report.record(LayerKind::Base, Ok(()));

        match params.layer_order {
            LayerOrder::LogoOverText => {
                self.render_text(LayerKind::Headline, &params.headline, canvas, &mut report)?;
                self.render_text(LayerKind::Subtitle, &params.subtitle, canvas, &mut report)?;
                self.render_logo(scene.logo, &params.logo, canvas, &mut report)?;
            }
            LayerOrder::TextOverLogo => {
                self.render_logo(scene.logo, &params.logo, canvas, &mut report)?;
                self.render_text(LayerKind::Headline, &params.headline, canvas, &mut report)?;
                self.render_text(LayerKind::Subtitle, &params.subtitle, canvas, &mut report)?;
            }
        }

        let fingerprint = self.fingerprint(scene, &params);
        let surfaces = self
            .surfaces
            .as_ref()
            .ok_or_else(|| ComposeError::not_ready("render surfaces missing"))?;
        let pixels = surfaces.canvas.data_as_u8_slice();
        let frame = self.frame.get_or_insert_with(|| Frame {
            width: 0,
            height: 0,
            data: Vec::new(),
            fingerprint: 0,
        });
        frame.width = canvas.width;
        frame.height = canvas.height;
        frame.data.clear();
        frame.data.extend_from_slice(pixels);
        frame.fingerprint = fingerprint;
        self.report = report;
        Ok(frame)
    }

    fn fingerprint(&self, scene: &Scene<'_>, params: &CompositionParams) -> u64 {
        let mut key = Vec::with_capacity(36);
        key.extend_from_slice(&params.fingerprint().to_le_bytes());
        key.extend_from_slice(&scene.base.content_hash.to_le_bytes());
        key.extend_from_slice(&scene.logo.map_or(0, |l| l.content_hash).to_le_bytes());
        key.extend_from_slice(&self.opts.clear_rgba.map_or([0; 4], Rgba8::premultiplied));
        hash64(&key)
    }

    fn with_ctx_mut<R>(
        &mut self,
        width: u16,
        height: u16,
        f: impl FnOnce(&mut Self, &mut vello_cpu::RenderContext) -> ComposeResult<R>,
    ) -> ComposeResult<R> {
        let mut ctx = match self.ctx.take() {
            None => vello_cpu::RenderContext::new(width, height),
            Some(ctx) if ctx.width() == width && ctx.height() == height => ctx,
            Some(_) => vello_cpu::RenderContext::new(width, height),
        };
        ctx.reset();
        let out = f(self, &mut ctx);
        self.ctx = Some(ctx);
        out
    }

    fn paint_base(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        base: &RasterImage,
        params: &CompositionParams,
        canvas: Canvas,
    ) -> ComposeResult<()> {
        let paint = self
            .base_cache
            .paint_for(base, &params.filters)
            .map_err(|e| ComposeError::base_image(e.to_string()))?;
        let placement = BasePlacement::compute(base.size(), canvas, &params.transform);

        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        if let Some(clear) = self.opts.clear_rgba {
            ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
            ctx.set_paint(cpu_color(clear));
            ctx.fill_rect(&rect_to_cpu(canvas.rect()));
        }
        ctx.set_transform(affine_to_cpu(placement.affine()));
        ctx.set_paint(paint);
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(base.width),
            f64::from(base.height),
        ));
        ctx.flush();

        let surfaces = self
            .surfaces
            .as_mut()
            .ok_or_else(|| ComposeError::not_ready("render surfaces missing"))?;
        clear_to(surfaces.canvas.data_as_u8_slice_mut(), [0, 0, 0, 0]);
        ctx.render_to_pixmap(&mut surfaces.canvas);
        Ok(())
    }

    fn render_text(
        &mut self,
        kind: LayerKind,
        layer: &TextLayer,
        canvas: Canvas,
        report: &mut RenderReport,
    ) -> ComposeResult<()> {
        let (w, h) = canvas.surface_dims()?;
        let shadow = self.opts.text_shadow;
        let outcome = self.with_ctx_mut(w, h, |this, ctx| {
            match paint_text_layer(ctx, &mut this.fonts, layer, canvas)? {
                Err(reason) => Ok(Err(reason)),
                Ok(0) => Ok(Err(SkipReason::EmptyText)),
                Ok(_) => this.composite_overlay(ctx, &shadow),
            }
        })?;
        report.record(kind, outcome);
        Ok(())
    }

    fn render_logo(
        &mut self,
        logo: Option<&RasterImage>,
        spec: &LogoSpec,
        canvas: Canvas,
        report: &mut RenderReport,
    ) -> ComposeResult<()> {
        let Some(logo) = logo else {
            report.record(LayerKind::Logo, Err(SkipReason::NoLogo));
            return Ok(());
        };
        let paint = match self.logo_paint(logo) {
            Ok(p) => p,
            Err(err) => {
                tracing::warn!(error = %err, "logo raster unusable, continuing without logo");
                report.record(LayerKind::Logo, Err(SkipReason::NoLogo));
                return Ok(());
            }
        };
        let placement = LogoPlacement::compute(spec, logo.size(), canvas);
        let (w, h) = canvas.surface_dims()?;
        let shadow = self.opts.logo_shadow;
        let outcome = self.with_ctx_mut(w, h, |this, ctx| {
            paint_logo(ctx, paint, logo.size(), &placement);
            this.composite_overlay(ctx, &shadow)
        })?;
        report.record(LayerKind::Logo, outcome);
        Ok(())
    }

    fn logo_paint(&mut self, logo: &RasterImage) -> ComposeResult<vello_cpu::Image> {
        if let Some((hash, paint)) = &self.logo_cache
            && *hash == logo.content_hash
        {
            return Ok(paint.clone());
        }
        let pixmap = pixmap_from_raster(logo).map_err(|e| ComposeError::logo(e.to_string()))?;
        let paint = image_paint(pixmap);
        self.logo_cache = Some((logo.content_hash, paint.clone()));
        Ok(paint)
    }

    /// Rasterize what `ctx` recorded into the layer pixmap, then paint its shadow and the layer
    /// itself onto the canvas.
    fn composite_overlay(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        shadow: &DropShadow,
    ) -> ComposeResult<Result<(), SkipReason>> {
        ctx.flush();
        let Surfaces {
            canvas,
            layer,
            shadow: scratch,
            ..
        } = self
            .surfaces
            .as_mut()
            .ok_or_else(|| ComposeError::not_ready("render surfaces missing"))?;
        clear_to(layer.data_as_u8_slice_mut(), [0, 0, 0, 0]);
        ctx.render_to_pixmap(layer);

        let (w, h) = (u32::from(layer.width()), u32::from(layer.height()));
        let Some(bounds) = alpha_bounds(layer.data_as_u8_slice(), w, h) else {
            return Ok(Err(SkipReason::Offscreen));
        };
        paint_shadow(
            canvas.data_as_u8_slice_mut(),
            layer.data_as_u8_slice(),
            w,
            h,
            bounds,
            shadow,
            scratch,
        )?;
        premul_over_in_rect(
            canvas.data_as_u8_slice_mut(),
            layer.data_as_u8_slice(),
            w,
            bounds,
        );
        Ok(Ok(()))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
