use std::{fmt, sync::Arc};

use glam::{vec2, Vec2};
use owned_ttf_parser::{AsFaceRef, Face, GlyphId, OutlineBuilder, OwnedFace};

use crate::Path;

#[derive(Debug, thiserror::Error)]
#[error("failed to parse font as TTF/OTF font data")]
pub struct MalformedFont;

/// A parsed TTF/OTF font. Cheap to clone.
#[derive(Clone)]
pub struct Font(Arc<OwnedFace>);

impl Font {
    /// Parses the first face in `data`.
    pub fn from_data(data: Vec<u8>) -> Result<Self, MalformedFont> {
        let face = OwnedFace::from_vec(data, 0).map_err(|_| MalformedFont)?;
        Ok(Self(Arc::new(face)))
    }

    fn face(&self) -> &Face<'_> {
        self.0.as_face_ref()
    }

    fn units_per_em(&self) -> f32 {
        self.face().units_per_em().max(1) as f32
    }

    fn glyph(&self, c: char) -> GlyphId {
        self.face().glyph_index(c).unwrap_or(GlyphId(0))
    }

    /// The sum of glyph advances for `text` at `size`.
    pub fn advance_width(&self, text: &str, size: f32) -> f32 {
        let scale = size / self.units_per_em();
        text.chars()
            .map(|c| self.face().glyph_hor_advance(self.glyph(c)).unwrap_or(0) as f32 * scale)
            .sum()
    }

    /// Appends the glyph outlines of `text` to `path`.
    ///
    /// `origin` is the left end of the alphabetic baseline.
    /// Advances and outlines are scaled horizontally by `horizontal_scale`.
    pub fn outline_text(
        &self,
        path: &mut Path,
        text: &str,
        origin: Vec2,
        size: f32,
        horizontal_scale: f32,
    ) {
        let scale = size / self.units_per_em();
        let scale = vec2(scale * horizontal_scale, scale);
        let mut pen = origin;
        for c in text.chars() {
            let glyph = self.glyph(c);
            let mut outliner = GlyphOutliner {
                path: &mut *path,
                origin: pen,
                scale,
            };
            self.face().outline_glyph(glyph, &mut outliner);
            pen.x += self.face().glyph_hor_advance(glyph).unwrap_or(0) as f32 * scale.x;
        }
    }
}

impl fmt::Debug for Font {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Font")
            .field("units_per_em", &self.units_per_em())
            .field("glyphs", &self.face().number_of_glyphs())
            .finish()
    }
}

impl PartialEq for Font {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// Writes font-space outlines into a path. Font space has Y up.
struct GlyphOutliner<'a> {
    path: &'a mut Path,
    origin: Vec2,
    scale: Vec2,
}

impl GlyphOutliner<'_> {
    fn point(&self, x: f32, y: f32) -> Vec2 {
        self.origin + vec2(x * self.scale.x, -y * self.scale.y)
    }
}

impl OutlineBuilder for GlyphOutliner<'_> {
    fn move_to(&mut self, x: f32, y: f32) {
        let p = self.point(x, y);
        self.path.move_to(p);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let p = self.point(x, y);
        self.path.line_to(p);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let (control, end) = (self.point(x1, y1), self.point(x, y));
        self.path.quad_to(control, end);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let (control1, control2, end) = (self.point(x1, y1), self.point(x2, y2), self.point(x, y));
        self.path.cubic_to(control1, control2, end);
    }

    fn close(&mut self) {
        self.path.close();
    }
}
