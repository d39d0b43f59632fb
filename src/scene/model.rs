//! Parameter set for one composition: canvas preset, base transform and filters, the two text
//! layers, the logo descriptor and the layer order.
//!
//! Everything here is plain data. Values arrive from bounded editor controls or from JSON
//! documents; [`CompositionParams::sanitized`] clamps them into their documented domains before
//! rendering.

use crate::assets::color::Rgba8;
use crate::foundation::core::Canvas;
use crate::foundation::math::{clamp_finite, finite_or};
use serde::{Deserialize, Serialize};

/// Output aspect-ratio choice. Each preset maps to a fixed raster size.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanvasPreset {
    /// 1080×1080.
    #[default]
    Square,
    /// 1080×1350.
    Portrait,
    /// 1080×1500.
    PortraitLong,
    /// 1280×720.
    Landscape,
}

impl CanvasPreset {
    /// All presets in display order.
    pub const ALL: [CanvasPreset; 4] = [
        CanvasPreset::Square,
        CanvasPreset::Portrait,
        CanvasPreset::PortraitLong,
        CanvasPreset::Landscape,
    ];

    /// Target raster size for this preset.
    pub fn canvas(self) -> Canvas {
        let (width, height) = match self {
            CanvasPreset::Square => (1080, 1080),
            CanvasPreset::Portrait => (1080, 1350),
            CanvasPreset::PortraitLong => (1080, 1500),
            CanvasPreset::Landscape => (1280, 720),
        };
        Canvas { width, height }
    }

    /// Stable snake_case name, as used in JSON.
    pub fn name(self) -> &'static str {
        match self {
            CanvasPreset::Square => "square",
            CanvasPreset::Portrait => "portrait",
            CanvasPreset::PortraitLong => "portrait_long",
            CanvasPreset::Landscape => "landscape",
        }
    }
}

/// Placement of the base image on top of its cover fit.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaseTransform {
    /// Horizontal offset in canvas pixels. Unbounded.
    pub pan_x: f64,
    /// Vertical offset in canvas pixels. Unbounded.
    pub pan_y: f64,
    /// Multiplier on the cover-fit scale, in `[ZOOM_MIN, ZOOM_MAX]`.
    pub zoom: f64,
}

impl BaseTransform {
    /// Smallest accepted zoom.
    pub const ZOOM_MIN: f64 = 0.5;
    /// Largest accepted zoom.
    pub const ZOOM_MAX: f64 = 3.0;
    /// No pan, zoom 1.
    pub const IDENTITY: Self = Self {
        pan_x: 0.0,
        pan_y: 0.0,
        zoom: 1.0,
    };

    /// Return `true` when this is exactly [`BaseTransform::IDENTITY`].
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    fn sanitized(self) -> Self {
        Self {
            pan_x: finite_or(self.pan_x, 0.0),
            pan_y: finite_or(self.pan_y, 0.0),
            zoom: clamp_finite(self.zoom, Self::ZOOM_MIN, Self::ZOOM_MAX, 1.0),
        }
    }
}

impl Default for BaseTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Brightness/contrast/saturation percentages applied to the base layer only.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSet {
    /// Brightness percentage, 100 = unchanged.
    pub brightness: f64,
    /// Contrast percentage, 100 = unchanged.
    pub contrast: f64,
    /// Saturation percentage, 100 = unchanged.
    pub saturation: f64,
}

impl FilterSet {
    /// Upper bound for every filter percentage.
    pub const MAX_PERCENT: f64 = 200.0;
    /// All filters at 100%.
    pub const IDENTITY: Self = Self {
        brightness: 100.0,
        contrast: 100.0,
        saturation: 100.0,
    };

    /// Return `true` when drawing with this filter set leaves pixels unchanged.
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    fn sanitized(self) -> Self {
        let c = |v: f64| clamp_finite(v, 0.0, Self::MAX_PERCENT, 100.0);
        Self {
            brightness: c(self.brightness),
            contrast: c(self.contrast),
            saturation: c(self.saturation),
        }
    }
}

impl Default for FilterSet {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Font families offered by the editor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FontPreset {
    /// Modern display face for headlines.
    Mitr,
    /// Highly legible text face.
    Anuphan,
    /// Formal text face.
    Sarabun,
    /// Handwriting style.
    Pattaya,
    /// Vintage display face.
    Chonburi,
    /// Latin UI face.
    Inter,
}

impl FontPreset {
    /// Family name looked up in the font database.
    pub fn family(self) -> &'static str {
        match self {
            FontPreset::Mitr => "Mitr",
            FontPreset::Anuphan => "Anuphan",
            FontPreset::Sarabun => "Sarabun",
            FontPreset::Pattaya => "Pattaya",
            FontPreset::Chonburi => "Chonburi",
            FontPreset::Inter => "Inter",
        }
    }
}

/// A preset family or a free-text family name typed by the user.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontChoice {
    /// One of the offered families.
    Preset(FontPreset),
    /// Any installed family; an empty name means generic sans-serif.
    Custom(String),
}

impl FontChoice {
    /// Generic family used when a name is empty or not installed.
    pub const FALLBACK_FAMILY: &'static str = "sans-serif";

    /// Requested family name, or `None` for the generic fallback.
    pub fn family(&self) -> Option<&str> {
        match self {
            FontChoice::Preset(p) => Some(p.family()),
            FontChoice::Custom(name) => {
                let name = name.trim();
                (!name.is_empty()).then_some(name)
            }
        }
    }
}

/// One independently toggled block of multi-line text.
///
/// Fields missing from a JSON document take the headline defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextLayer {
    /// Whether the layer is painted at all.
    pub enabled: bool,
    /// Text content; `\n` separates lines.
    pub content: String,
    /// Font family choice. Weight is always bold.
    pub font: FontChoice,
    /// Font size as a percentage of canvas width.
    pub size_percent: f64,
    /// Glyph fill color.
    pub fill: Rgba8,
    /// Outline color, used when `stroke_enabled`.
    pub stroke: Rgba8,
    /// Draw an outline under the fill.
    pub stroke_enabled: bool,
    /// Horizontal center of every line, percent of canvas width.
    pub anchor_x: f64,
    /// Vertical center of the whole block, percent of canvas height.
    pub anchor_y: f64,
}

impl TextLayer {
    /// Largest accepted font size percentage.
    pub const SIZE_MAX: f64 = 100.0;

    /// Default headline: large, outlined, centered.
    pub fn headline_default() -> Self {
        Self {
            enabled: false,
            content: String::new(),
            font: FontChoice::Preset(FontPreset::Mitr),
            size_percent: 8.0,
            fill: Rgba8::WHITE,
            stroke: Rgba8::BLACK,
            stroke_enabled: true,
            anchor_x: 50.0,
            anchor_y: 50.0,
        }
    }

    /// Default subtitle: smaller, no outline, below the center.
    pub fn subtitle_default() -> Self {
        Self {
            enabled: false,
            content: String::new(),
            font: FontChoice::Preset(FontPreset::Anuphan),
            size_percent: 5.0,
            fill: Rgba8::WHITE,
            stroke: Rgba8::BLACK,
            stroke_enabled: false,
            anchor_x: 50.0,
            anchor_y: 65.0,
        }
    }

    /// Return `true` when the layer would paint anything.
    ///
    /// Disabled layers and empty or whitespace-only content render nothing.
    pub fn is_visible(&self) -> bool {
        self.enabled && !self.content.trim().is_empty() && self.size_percent > 0.0
    }

    /// Content split into painted lines.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.content.split('\n').map(|l| l.trim_end_matches('\r'))
    }

    fn sanitized(mut self, fallback_size: f64) -> Self {
        self.size_percent = if self.size_percent.is_finite() {
            self.size_percent.min(Self::SIZE_MAX).max(0.0)
        } else {
            fallback_size
        };
        self.anchor_x = clamp_finite(self.anchor_x, 0.0, 100.0, 50.0);
        self.anchor_y = clamp_finite(self.anchor_y, 0.0, 100.0, 50.0);
        self
    }
}

impl Default for TextLayer {
    fn default() -> Self {
        Self::headline_default()
    }
}

/// Clip region shape of the logo.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogoShape {
    /// Circle with diameter = logo area size.
    #[default]
    Circle,
    /// Square with side = logo area size.
    Square,
}

/// How the logo raster is scaled into its clip region.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogoFit {
    /// Smaller side fills the area; overflow is clipped.
    Cover,
    /// Larger side fills the area; the whole logo stays visible.
    #[default]
    Contain,
}

/// Logo placement parameters. The raster itself is supplied separately.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogoSpec {
    /// Clip shape.
    pub shape: LogoShape,
    /// Fit policy.
    pub fit: LogoFit,
    /// Diameter or side length as a percentage of canvas width.
    pub size_percent: f64,
    /// Zoom of the logo raster inside its clip region.
    pub inner_scale: f64,
    /// Center X, percent of canvas width.
    pub anchor_x: f64,
    /// Center Y, percent of canvas height.
    pub anchor_y: f64,
}

impl LogoSpec {
    /// Smallest accepted area size percentage.
    pub const SIZE_MIN: f64 = 1.0;
    /// Largest accepted area size percentage.
    pub const SIZE_MAX: f64 = 100.0;
    /// Smallest accepted inner scale.
    pub const INNER_SCALE_MIN: f64 = 0.1;
    /// Largest accepted inner scale.
    pub const INNER_SCALE_MAX: f64 = 3.0;

    fn sanitized(self) -> Self {
        let d = Self::default();
        Self {
            shape: self.shape,
            fit: self.fit,
            size_percent: clamp_finite(
                self.size_percent,
                Self::SIZE_MIN,
                Self::SIZE_MAX,
                d.size_percent,
            ),
            inner_scale: clamp_finite(
                self.inner_scale,
                Self::INNER_SCALE_MIN,
                Self::INNER_SCALE_MAX,
                d.inner_scale,
            ),
            anchor_x: clamp_finite(self.anchor_x, 0.0, 100.0, d.anchor_x),
            anchor_y: clamp_finite(self.anchor_y, 0.0, 100.0, d.anchor_y),
        }
    }
}

impl Default for LogoSpec {
    fn default() -> Self {
        Self {
            shape: LogoShape::Circle,
            fit: LogoFit::Contain,
            size_percent: 20.0,
            inner_scale: 1.0,
            anchor_x: 85.0,
            anchor_y: 15.0,
        }
    }
}

/// Paint order of the logo relative to the (always adjacent) text layers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerOrder {
    /// Text first, logo on top.
    #[default]
    LogoOverText,
    /// Logo first, text on top.
    TextOverLogo,
}

/// Complete parameter set for one render.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompositionParams {
    /// Output size preset.
    pub preset: CanvasPreset,
    /// Base image pan/zoom.
    pub transform: BaseTransform,
    /// Base image color filters.
    pub filters: FilterSet,
    /// First text layer.
    pub headline: TextLayer,
    /// Second text layer, painted after the headline.
    pub subtitle: TextLayer,
    /// Logo placement.
    pub logo: LogoSpec,
    /// Logo vs text paint order.
    pub layer_order: LayerOrder,
}

impl Default for CompositionParams {
    fn default() -> Self {
        Self {
            preset: CanvasPreset::default(),
            transform: BaseTransform::IDENTITY,
            filters: FilterSet::IDENTITY,
            headline: TextLayer::headline_default(),
            subtitle: TextLayer::subtitle_default(),
            logo: LogoSpec::default(),
            layer_order: LayerOrder::default(),
        }
    }
}

impl CompositionParams {
    /// Active canvas size.
    pub fn canvas(&self) -> Canvas {
        self.preset.canvas()
    }

    /// Copy with every value clamped into its documented domain.
    ///
    /// Non-finite numbers are replaced by their defaults. Pan is never clamped.
    pub fn sanitized(&self) -> Self {
        Self {
            preset: self.preset,
            transform: self.transform.sanitized(),
            filters: self.filters.sanitized(),
            headline: self.headline.clone().sanitized(8.0),
            subtitle: self.subtitle.clone().sanitized(5.0),
            logo: self.logo.sanitized(),
            layer_order: self.layer_order,
        }
    }

    /// Stable 64-bit fingerprint of the parameter values.
    pub fn fingerprint(&self) -> u64 {
        // Serialization of plain data with string keys cannot fail.
        let bytes = serde_json::to_vec(self).unwrap_or_default();
        crate::foundation::math::hash64(&bytes)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/model.rs"]
mod tests;
