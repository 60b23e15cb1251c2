//! Drawing surface for the logo artwork.
//!
//! Shapes are written the way a paint program's pencil works: the new color
//! replaces what is underneath, blended only by anti-aliasing coverage.
//! Pasting one canvas onto another composites with ordinary source-over.

use image::imageops::{self, FilterType};
use image::{ImageBuffer, Rgb, RgbImage, Rgba as ImageRgba, RgbaImage};
use tiny_skia::{
    BlendMode, FillRule, LineCap, Paint, Path, PathBuilder, Pixmap, PixmapPaint, Stroke, Transform,
};

use crate::error::SiteError;

/// Straight (non-premultiplied) RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
    /// Alpha; 0 is fully transparent.
    pub a: u8,
}

impl Rgba {
    /// Build a color from its four channels.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// The same color with a different alpha.
    #[must_use]
    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }
}

/// An RGBA pixel buffer owned by one drawing procedure.
#[derive(Clone)]
pub struct Canvas {
    pixmap: Pixmap,
}

impl Canvas {
    /// A fully transparent canvas.
    ///
    /// # Errors
    ///
    /// Returns an error if either dimension is zero.
    pub fn new(width: u32, height: u32) -> Result<Self, SiteError> {
        let pixmap = Pixmap::new(width, height)
            .ok_or_else(|| SiteError::Image(format!("Cannot allocate a {width}x{height} canvas")))?;
        Ok(Self { pixmap })
    }

    /// A canvas filled with one color.
    ///
    /// # Errors
    ///
    /// Returns an error if either dimension is zero.
    pub fn filled(width: u32, height: u32, color: Rgba) -> Result<Self, SiteError> {
        let mut canvas = Self::new(width, height)?;
        canvas.pixmap.fill(tiny_skia::Color::from_rgba8(color.r, color.g, color.b, color.a));
        Ok(canvas)
    }

    /// Width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    /// Height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Outline of a circle. The stroke grows inward from `radius`.
    pub fn ring(&mut self, cx: f32, cy: f32, radius: f32, color: Rgba, width: f32) {
        if width <= 0.0 || radius <= 0.0 {
            return;
        }
        let inset = (radius - width / 2.0).max(width / 2.0);
        if let Some(path) = PathBuilder::from_circle(cx, cy, inset) {
            self.stroke(&path, color, width);
        }
    }

    /// Filled circle.
    pub fn disc(&mut self, cx: f32, cy: f32, radius: f32, color: Rgba) {
        if let Some(path) = PathBuilder::from_circle(cx, cy, radius) {
            self.fill_path(&path, color);
        }
    }

    /// Circular arc, angles in degrees clockwise from three o'clock.
    ///
    /// An `end` smaller than `start` wraps past 360°. The stroke grows
    /// inward from `radius`.
    #[allow(clippy::too_many_arguments)]
    pub fn arc(&mut self, cx: f32, cy: f32, radius: f32, start: f32, end: f32, color: Rgba, width: f32) {
        if width <= 0.0 || radius <= 0.0 {
            return;
        }
        let inset = (radius - width / 2.0).max(width / 2.0);
        if let Some(path) = arc_path(cx, cy, inset, start, end) {
            self.stroke(&path, color, width);
        }
    }

    /// Straight segment with flat ends.
    pub fn line(&mut self, from: (f32, f32), to: (f32, f32), color: Rgba, width: f32) {
        if width <= 0.0 {
            return;
        }
        let mut pb = PathBuilder::new();
        pb.move_to(from.0, from.1);
        pb.line_to(to.0, to.1);
        if let Some(path) = pb.finish() {
            self.stroke(&path, color, width);
        }
    }

    /// Fill an arbitrary path with the nonzero rule.
    pub fn fill_path(&mut self, path: &Path, color: Rgba) {
        self.pixmap.fill_path(path, &paint(color), FillRule::Winding, Transform::identity(), None);
    }

    /// Composite `other` over this canvas with its top-left corner at `(x, y)`.
    pub fn paste(&mut self, other: &Canvas, x: i32, y: i32) {
        self.pixmap.draw_pixmap(
            x,
            y,
            other.pixmap.as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );
    }

    /// Straight-alpha color of one pixel, or `None` outside the canvas.
    #[cfg(test)]
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        // tiny-skia only checks the flat index, so (width, 0) would wrap.
        if x >= self.width() || y >= self.height() {
            return None;
        }
        let c = self.pixmap.pixel(x, y)?.demultiply();
        Some(Rgba::new(c.red(), c.green(), c.blue(), c.alpha()))
    }

    /// Copy out as a straight-alpha RGBA image.
    #[must_use]
    pub fn to_rgba_image(&self) -> RgbaImage {
        let mut out = RgbaImage::new(self.width(), self.height());
        for (dst, src) in out.pixels_mut().zip(self.pixmap.pixels()) {
            let c = src.demultiply();
            *dst = ImageRgba([c.red(), c.green(), c.blue(), c.alpha()]);
        }
        out
    }

    /// Composite over an opaque background and drop the alpha channel.
    ///
    /// # Errors
    ///
    /// Returns an error if the background canvas cannot be allocated.
    pub fn flatten(&self, background: Rgba) -> Result<RgbImage, SiteError> {
        let mut base = Self::filled(self.width(), self.height(), background.with_alpha(255))?;
        base.paste(self, 0, 0);
        let mut out = RgbImage::new(self.width(), self.height());
        for (dst, src) in out.pixels_mut().zip(base.pixmap.pixels()) {
            *dst = Rgb([src.red(), src.green(), src.blue()]);
        }
        Ok(out)
    }

    /// Lanczos3 resample to `width`×`height`.
    ///
    /// Filtering runs on premultiplied pixels so fully transparent
    /// neighbours cannot darken soft edges.
    ///
    /// # Errors
    ///
    /// Returns an error if the pixel buffer does not match the canvas size.
    pub fn resized(&self, width: u32, height: u32) -> Result<RgbaImage, SiteError> {
        let premultiplied: RgbaImage =
            ImageBuffer::from_raw(self.width(), self.height(), self.pixmap.data().to_vec())
                .ok_or_else(|| SiteError::Image("Canvas buffer has unexpected length".into()))?;
        let mut out = imageops::resize(&premultiplied, width, height, FilterType::Lanczos3);
        for px in out.pixels_mut() {
            *px = demultiply(*px);
        }
        Ok(out)
    }

    fn stroke(&mut self, path: &Path, color: Rgba, width: f32) {
        let stroke = Stroke { width, line_cap: LineCap::Butt, ..Stroke::default() };
        self.pixmap.stroke_path(path, &paint(color), &stroke, Transform::identity(), None);
    }
}

fn paint(color: Rgba) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.r, color.g, color.b, color.a);
    paint.anti_alias = true;
    paint.blend_mode = BlendMode::Source;
    paint
}

/// Undo premultiplication after filtering. Ringing can push a color channel
/// above alpha, so channels are clamped first.
fn demultiply(px: ImageRgba<u8>) -> ImageRgba<u8> {
    let [r, g, b, a] = px.0;
    if a == 0 {
        return ImageRgba([0, 0, 0, 0]);
    }
    let scale = |c: u8| -> u8 {
        let c = u32::from(c.min(a));
        let a = u32::from(a);
        // c <= a, so the quotient is at most 255.
        u8::try_from((c * 255 + a / 2) / a).unwrap_or(u8::MAX)
    };
    ImageRgba([scale(r), scale(g), scale(b), a])
}

/// Path along a circle from `start` to `end` degrees, built from cubic
/// segments of at most 90°.
fn arc_path(cx: f32, cy: f32, radius: f32, start: f32, end: f32) -> Option<Path> {
    let mut end = end;
    while end < start {
        end += 360.0;
    }
    let sweep = (end - start).min(360.0);
    if sweep <= 0.0 {
        return None;
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let segments = (sweep / 90.0).ceil().max(1.0) as u32;
    #[allow(clippy::cast_precision_loss)]
    let step = sweep.to_radians() / segments as f32;
    let k = 4.0 / 3.0 * (step / 4.0).tan();
    let point = |angle: f32| (cx + radius * angle.cos(), cy + radius * angle.sin());

    let mut pb = PathBuilder::new();
    let mut a0 = start.to_radians();
    let (x0, y0) = point(a0);
    pb.move_to(x0, y0);
    for _ in 0..segments {
        let a1 = a0 + step;
        let (x1, y1) = point(a0);
        let (x2, y2) = point(a1);
        pb.cubic_to(
            x1 - k * radius * a0.sin(),
            y1 + k * radius * a0.cos(),
            x2 + k * radius * a1.sin(),
            y2 - k * radius * a1.cos(),
            x2,
            y2,
        );
        a0 = a1;
    }
    pb.finish()
}
