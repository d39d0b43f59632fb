use std::borrow::Cow;
use std::collections::HashMap;
use std::path::Path;

use usvg::fontdb;

use crate::foundation::error::{ComposeError, ComposeResult};
use crate::scene::model::FontChoice;

/// A bold face picked for a [`FontChoice`], ready for shaping and glyph painting.
#[derive(Clone, Debug)]
pub(crate) struct ResolvedFont {
    /// Family name under which the face was registered with parley.
    pub(crate) family: String,
    /// Face bytes for the rasterizer.
    pub(crate) data: vello_cpu::peniko::FontData,
}

/// One shaped line of text in layout space (origin at the line box top-left).
#[derive(Clone, Debug, Default)]
pub(crate) struct ShapedLine {
    pub(crate) glyphs: Vec<vello_cpu::Glyph>,
    pub(crate) width: f32,
    pub(crate) ascent: f32,
    pub(crate) descent: f32,
    pub(crate) baseline: f32,
}

impl ShapedLine {
    /// Y of the em-box middle in layout space (the canvas `middle` text baseline).
    pub(crate) fn middle_y(&self) -> f32 {
        self.baseline - (self.ascent - self.descent) / 2.0
    }
}

/// Font database plus shaping contexts.
///
/// Faces come from the system font directories and from caller-supplied directories or bytes.
/// Resolution results are cached per requested family, so each face is registered with the
/// shaper once.
pub struct FontBook {
    db: fontdb::Database,
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<()>,
    resolved: HashMap<Option<String>, Option<ResolvedFont>>,
}

impl Default for FontBook {
    fn default() -> Self {
        Self::empty()
    }
}

impl std::fmt::Debug for FontBook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontBook")
            .field("faces", &self.db.len())
            .field("resolved", &self.resolved.len())
            .finish()
    }
}

impl FontBook {
    /// A font book with no faces; text layers are skipped until fonts are added.
    pub fn empty() -> Self {
        Self {
            db: fontdb::Database::new(),
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            resolved: HashMap::new(),
        }
    }

    /// A font book seeded with the system fonts.
    pub fn with_system_fonts() -> Self {
        let mut book = Self::empty();
        book.db.load_system_fonts();
        tracing::debug!(faces = book.db.len(), "loaded system fonts");
        book
    }

    /// Add every font file found under `dir`.
    pub fn load_fonts_dir(&mut self, dir: &Path) {
        let before = self.db.len();
        self.db.load_fonts_dir(dir);
        tracing::debug!(
            dir = %dir.display(),
            added = self.db.len().saturating_sub(before),
            "loaded font directory"
        );
        self.resolved.clear();
    }

    /// Add a font file (TTF/OTF/TTC) from memory.
    pub fn register_font_bytes(&mut self, bytes: Vec<u8>) -> ComposeResult<()> {
        let before = self.db.len();
        self.db.load_font_data(bytes);
        if self.db.len() == before {
            return Err(ComposeError::font("font bytes contain no usable faces"));
        }
        self.resolved.clear();
        Ok(())
    }

    /// Number of faces known to the database.
    pub fn face_count(&self) -> usize {
        self.db.len()
    }

    /// Pick a bold face for `choice`, falling back to sans-serif and then to any face.
    ///
    /// Returns `None` only when the database has no faces at all.
    pub(crate) fn resolve(&mut self, choice: &FontChoice) -> ComposeResult<Option<ResolvedFont>> {
        let key = choice.family().map(str::to_owned);
        if let Some(hit) = self.resolved.get(&key) {
            return Ok(hit.clone());
        }

        let resolved = self.resolve_uncached(key.as_deref())?;
        self.resolved.insert(key, resolved.clone());
        Ok(resolved)
    }

    fn resolve_uncached(&mut self, family: Option<&str>) -> ComposeResult<Option<ResolvedFont>> {
        let mut families = Vec::<fontdb::Family<'_>>::with_capacity(2);
        if let Some(name) = family {
            families.push(fontdb::Family::Name(name));
        }
        families.push(fontdb::Family::SansSerif);

        let query = fontdb::Query {
            families: &families,
            weight: fontdb::Weight::BOLD,
            stretch: fontdb::Stretch::Normal,
            style: fontdb::Style::Normal,
        };
        let Some(id) = self
            .db
            .query(&query)
            .or_else(|| self.db.faces().next().map(|f| f.id))
        else {
            return Ok(None);
        };

        if let (Some(name), Some(face)) = (family, self.db.face(id))
            && !face.families.iter().any(|(f, _)| f.eq_ignore_ascii_case(name))
        {
            tracing::warn!(
                requested = name,
                using = face.families.first().map(|(f, _)| f.as_str()).unwrap_or("?"),
                "font family not installed, falling back"
            );
        }

        let (bytes, index) = self
            .db
            .with_face_data(id, |data, index| (data.to_vec(), index))
            .ok_or_else(|| ComposeError::font("font face data unavailable"))?;

        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(bytes.clone()), None);
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| ComposeError::font("no font families registered from font bytes"))?;
        let family_name = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| ComposeError::font("registered font family has no name"))?
            .to_string();

        let data = vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(bytes), index);
        Ok(Some(ResolvedFont {
            family: family_name,
            data,
        }))
    }

    /// Shape a single line (no wrapping) at `size_px`.
    pub(crate) fn shape_line(
        &mut self,
        font: &ResolvedFont,
        text: &str,
        size_px: f32,
    ) -> ComposeResult<ShapedLine> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(ComposeError::validation(
                "text size_px must be finite and > 0",
            ));
        }

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(format!("\"{}\"", font.family))),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));

        let mut layout: parley::Layout<()> = builder.build(text);
        layout.break_all_lines(None);

        let mut out = ShapedLine {
            width: layout.width(),
            ..ShapedLine::default()
        };
        if let Some(line) = layout.lines().next() {
            let m = line.metrics();
            out.ascent = m.ascent;
            out.descent = m.descent;
            out.baseline = m.baseline;
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                out.glyphs
                    .extend(run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                        id: g.id,
                        x: g.x,
                        y: g.y,
                    }));
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fonts.rs"]
mod tests;
