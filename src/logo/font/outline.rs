//! Vector fonts read with `ttf-parser` and filled on the canvas.

use std::path::{Path, PathBuf};

use tiny_skia::PathBuilder;
use ttf_parser::{Face, GlyphId, OutlineBuilder};

use super::TextBounds;
use crate::logo::canvas::{Canvas, Rgba};

/// A TrueType/OpenType face at a fixed pixel size.
///
/// Layout is a plain advance-width walk: no kerning, no shaping.
pub struct OutlineFont {
    path: PathBuf,
    data: Vec<u8>,
    size: f32,
}

impl OutlineFont {
    /// Read and validate a font file. Collections use their first face.
    ///
    /// # Errors
    ///
    /// Returns a description of the failure if the file cannot be read or
    /// is not a usable font.
    pub fn open(path: &Path, size: f32) -> Result<Self, String> {
        let data = std::fs::read(path).map_err(|e| e.to_string())?;
        let face = Face::parse(&data, 0).map_err(|e| e.to_string())?;
        if face.units_per_em() == 0 {
            return Err("font reports zero units per em".into());
        }
        Ok(Self { path: path.to_path_buf(), data, size })
    }

    /// Em size in pixels.
    pub fn size(&self) -> f32 {
        self.size
    }

    /// File the face was read from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub(super) fn measure(&self, text: &str) -> TextBounds {
        let Some(face) = self.face() else {
            return TextBounds::default();
        };
        let scale = self.scale(&face);
        let ascent = f32::from(face.ascender()) * scale;

        let mut bounds: Option<TextBounds> = None;
        for (gid, pen) in layout(&face, text, scale) {
            let Some(rect) = face.glyph_bounding_box(gid) else {
                continue;
            };
            let glyph = TextBounds {
                left: pen + f32::from(rect.x_min) * scale,
                top: ascent - f32::from(rect.y_max) * scale,
                right: pen + f32::from(rect.x_max) * scale,
                bottom: ascent - f32::from(rect.y_min) * scale,
            };
            bounds = Some(bounds.map_or(glyph, |b| b.union(glyph)));
        }
        bounds.unwrap_or_default()
    }

    pub(super) fn draw(&self, canvas: &mut Canvas, text: &str, origin: (f32, f32), color: Rgba) {
        let Some(face) = self.face() else {
            return;
        };
        let scale = self.scale(&face);
        let baseline = origin.1 + f32::from(face.ascender()) * scale;

        let mut sink = GlyphSink { builder: PathBuilder::new(), x: origin.0, y: baseline, scale };
        for (gid, pen) in layout(&face, text, scale) {
            sink.x = origin.0 + pen;
            face.outline_glyph(gid, &mut sink);
        }
        if let Some(path) = sink.builder.finish() {
            canvas.fill_path(&path, color);
        }
    }

    fn face(&self) -> Option<Face<'_>> {
        Face::parse(&self.data, 0).ok()
    }

    fn scale(&self, face: &Face<'_>) -> f32 {
        self.size / f32::from(face.units_per_em())
    }
}

/// Glyph ids paired with their pen x offset in pixels.
fn layout(face: &Face<'_>, text: &str, scale: f32) -> Vec<(GlyphId, f32)> {
    let mut pen = 0.0;
    text.chars()
        .map(|ch| {
            let gid = face.glyph_index(ch).unwrap_or(GlyphId(0));
            let at = pen;
            pen += f32::from(face.glyph_hor_advance(gid).unwrap_or(0)) * scale;
            (gid, at)
        })
        .collect()
}

/// Receives font-unit outlines (y up) and writes canvas coordinates (y down).
struct GlyphSink {
    builder: PathBuilder,
    x: f32,
    y: f32,
    scale: f32,
}

impl GlyphSink {
    fn map(&self, x: f32, y: f32) -> (f32, f32) {
        (self.x + x * self.scale, self.y - y * self.scale)
    }
}

impl OutlineBuilder for GlyphSink {
    fn move_to(&mut self, x: f32, y: f32) {
        let (x, y) = self.map(x, y);
        self.builder.move_to(x, y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let (x, y) = self.map(x, y);
        self.builder.line_to(x, y);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let (x1, y1) = self.map(x1, y1);
        let (x, y) = self.map(x, y);
        self.builder.quad_to(x1, y1, x, y);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let (x1, y1) = self.map(x1, y1);
        let (x2, y2) = self.map(x2, y2);
        let (x, y) = self.map(x, y);
        self.builder.cubic_to(x1, y1, x2, y2, x, y);
    }

    fn close(&mut self) {
        self.builder.close();
    }
}
