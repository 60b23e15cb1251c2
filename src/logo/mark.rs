//! The square emblem: rings, arc segments, ticks, nodes, and centered initials.

use super::canvas::{Canvas, Rgba};
use super::font::{Font, FontSource, TextBounds, Weight};
use super::palette::{CYAN, CYAN_SOFT, NAVY, NAVY_SOFT, PLATE_FILL, PLATE_OUTLINE, STEEL, STEEL_SOFT};
use super::part;
use crate::error::SiteError;

/// A concentric ring outline.
struct RingSpec {
    radius: f64,
    color: Rgba,
    width: f64,
}

/// One arc segment, angles in degrees clockwise from three o'clock.
struct ArcSpec {
    start: f32,
    end: f32,
    color: Rgba,
    radius: f64,
    width: f64,
}

const OUTER: f64 = 0.40;
const MID: f64 = 0.34;
const INNER: f64 = 0.27;

const BOLD_ARC: f64 = 0.012;
const FINE_ARC: f64 = 0.009;

const RINGS: [RingSpec; 3] = [
    RingSpec { radius: OUTER, color: CYAN_SOFT, width: 0.012 },
    RingSpec { radius: MID, color: STEEL_SOFT, width: 0.010 },
    RingSpec { radius: INNER, color: NAVY_SOFT, width: 0.010 },
];

const ARCS: [ArcSpec; 6] = [
    ArcSpec { start: 300.0, end: 30.0, color: CYAN, radius: OUTER, width: BOLD_ARC },
    ArcSpec { start: 120.0, end: 200.0, color: STEEL, radius: OUTER, width: FINE_ARC },
    ArcSpec { start: 220.0, end: 280.0, color: CYAN, radius: MID, width: FINE_ARC },
    ArcSpec { start: 40.0, end: 95.0, color: STEEL, radius: MID, width: FINE_ARC },
    ArcSpec { start: 155.0, end: 205.0, color: NAVY, radius: INNER, width: FINE_ARC },
    ArcSpec { start: 255.0, end: 320.0, color: CYAN, radius: INNER, width: FINE_ARC },
];

const NODE_ANGLES: [f64; 6] = [15.0, 75.0, 135.0, 195.0, 255.0, 315.0];

const TICK_STEP: usize = 30;
const TICK_INSIDE: f64 = 0.03;
const TICK_OUTSIDE: f64 = 0.008;
const TICK_WIDTH: f64 = 0.006;
const NODE_RADIUS: f64 = 0.010;
const PLATE_RADIUS: f64 = 0.21;
const PLATE_OUTLINE_WIDTH: f64 = 0.004;
const INITIALS_SIZE: f64 = 0.17;
/// Optical nudge: initials sit slightly below true center.
const INITIALS_DROP: f64 = 0.01;

/// Draw the square emblem at `size`×`size` on a transparent background.
///
/// # Errors
///
/// Returns an error if `size` is zero.
#[allow(clippy::cast_possible_truncation)]
pub fn draw_square_mark(size: u32, initials: &str, fonts: &dyn FontSource) -> Result<Canvas, SiteError> {
    let mut canvas = Canvas::new(size, size)?;
    let c = f64::from(size / 2);
    let (cx, cy) = (c as f32, c as f32);
    let r_outer = f64::from(part(size, OUTER));

    for ring in &RINGS {
        canvas.ring(cx, cy, px(size, ring.radius), ring.color, px(size, ring.width));
    }

    for arc in &ARCS {
        canvas.arc(cx, cy, px(size, arc.radius), arc.start, arc.end, arc.color, px(size, arc.width));
    }

    let inner_end = r_outer - f64::from(part(size, TICK_INSIDE));
    let outer_end = r_outer + f64::from(part(size, TICK_OUTSIDE));
    for deg in (0..360).step_by(TICK_STEP) {
        let color = if deg % 60 == 0 { CYAN_SOFT } else { STEEL_SOFT };
        let angle = f64::from(deg).to_radians();
        canvas.line(polar(c, inner_end, angle), polar(c, outer_end, angle), color, px(size, TICK_WIDTH));
    }

    let node_r = px(size, NODE_RADIUS);
    for deg in NODE_ANGLES {
        let (x, y) = polar(c, r_outer, deg.to_radians());
        canvas.disc(x, y, node_r, CYAN);
    }

    let plate_r = px(size, PLATE_RADIUS);
    canvas.disc(cx, cy, plate_r, PLATE_FILL);
    canvas.ring(cx, cy, plate_r, PLATE_OUTLINE, px(size, PLATE_OUTLINE_WIDTH));

    let font = fonts.load(px(size, INITIALS_SIZE), Weight::Bold);
    tracing::debug!(font = ?font.source(), size = font.size(), "drawing initials");
    draw_centered(&mut canvas, &font, initials, (cx, cy + px(size, INITIALS_DROP)), NAVY);

    Ok(canvas)
}

/// Draw `text` so its ink box is centered on `center`.
fn draw_centered(canvas: &mut Canvas, font: &Font, text: &str, center: (f32, f32), color: Rgba) {
    let origin = centered_origin(font.measure(text), center);
    font.draw(canvas, text, origin, color);
}

/// Draw origin that puts an ink box measured from (0, 0) at `center`.
///
/// The box's own offset from the origin is subtracted so fonts whose ink
/// starts away from the pen position still land centered.
fn centered_origin(bounds: TextBounds, center: (f32, f32)) -> (f32, f32) {
    (
        center.0 - bounds.width() / 2.0 - bounds.left,
        center.1 - bounds.height() / 2.0 - bounds.top,
    )
}

/// `fraction` of `size`, truncated to whole pixels, as a drawing length.
#[allow(clippy::cast_precision_loss)]
fn px(size: u32, fraction: f64) -> f32 {
    part(size, fraction) as f32
}

/// Point at `radius` from the center along `angle`, with each offset
/// truncated toward zero to whole pixels.
#[allow(clippy::cast_possible_truncation)]
fn polar(center: f64, radius: f64, angle: f64) -> (f32, f32) {
    let x = center + (radius * angle.cos()).trunc();
    let y = center + (radius * angle.sin()).trunc();
    (x as f32, y as f32)
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::logo::font::{BitmapFont, BuiltinFonts, OutlineFont};

    /// Pixel-space box of every pixel with any alpha: (min_x, min_y, max_x, max_y).
    fn ink_box(canvas: &Canvas) -> (u32, u32, u32, u32) {
        let mut b = (u32::MAX, u32::MAX, 0, 0);
        for y in 0..canvas.height() {
            for x in 0..canvas.width() {
                if canvas.pixel(x, y).is_some_and(|p| p.a > 0) {
                    b = (b.0.min(x), b.1.min(y), b.2.max(x), b.3.max(y));
                }
            }
        }
        b
    }

    #[test]
    fn same_inputs_give_identical_pixels() {
        let a = draw_square_mark(256, "IGP", &BuiltinFonts).unwrap().to_rgba_image();
        let b = draw_square_mark(256, "IGP", &BuiltinFonts).unwrap().to_rgba_image();
        assert_eq!(a.as_raw(), b.as_raw());
    }

    #[test]
    fn centered_origin_compensates_ink_offset() {
        let bounds = TextBounds { left: 3.0, top: -2.0, right: 43.0, bottom: 18.0 };
        let origin = centered_origin(bounds, (100.0, 50.0));
        // Ink then spans 80..120 horizontally and 40..60 vertically.
        assert!((origin.0 + bounds.left - 80.0).abs() < 1e-4);
        assert!((origin.1 + bounds.top - 40.0).abs() < 1e-4);
    }

    #[test]
    fn rendered_initials_are_centered_within_a_pixel() {
        let size = 1024;
        let font = Font::Builtin(BitmapFont::new(px(size, INITIALS_SIZE)));
        let mut canvas = Canvas::new(size, size).unwrap();
        let target = (512.0_f32, 512.0_f32);
        draw_centered(&mut canvas, &font, "IGP", target, NAVY);

        let (x0, y0, x1, y1) = ink_box(&canvas);
        let mid_x = (x0 + x1 + 1) as f32 / 2.0;
        let mid_y = (y0 + y1 + 1) as f32 / 2.0;
        assert!((mid_x - target.0).abs() <= 1.0, "horizontal center {mid_x}");
        assert!((mid_y - target.1).abs() <= 1.0, "vertical center {mid_y}");
    }

    #[test]
    fn outline_initials_are_centered_within_a_pixel() {
        let size = 1024;
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("test_fixtures/fonts/DejaVuSans-Bold.ttf");
        let font = Font::Outline(OutlineFont::open(&path, px(size, INITIALS_SIZE)).unwrap());
        // Real glyphs start right of and below the origin.
        let bounds = font.measure("IGP");
        assert!(bounds.left > 0.0 && bounds.top > 0.0, "{bounds:?}");

        let mut canvas = Canvas::new(size, size).unwrap();
        let target = (512.0_f32, 522.0_f32);
        draw_centered(&mut canvas, &font, "IGP", target, NAVY);

        let (x0, y0, x1, y1) = ink_box(&canvas);
        let mid_x = (x0 + x1 + 1) as f32 / 2.0;
        let mid_y = (y0 + y1 + 1) as f32 / 2.0;
        assert!((mid_x - target.0).abs() <= 1.0, "horizontal center {mid_x}");
        assert!((mid_y - target.1).abs() <= 1.0, "vertical center {mid_y}");
    }

    #[test]
    fn nodes_sit_on_the_outer_ring() {
        let canvas = draw_square_mark(1000, "IGP", &BuiltinFonts).unwrap();
        // 15° on a 400px radius around (500, 500), offsets truncated.
        assert_eq!(canvas.pixel(886, 603), Some(CYAN));
    }

    #[test]
    fn plate_is_translucent_white() {
        let canvas = draw_square_mark(1000, "IGP", &BuiltinFonts).unwrap();
        assert_eq!(canvas.pixel(680, 500), Some(PLATE_FILL));
    }

    #[test]
    fn corners_stay_transparent() {
        let canvas = draw_square_mark(512, "IGP", &BuiltinFonts).unwrap();
        assert_eq!(canvas.pixel(0, 0).map(|p| p.a), Some(0));
        assert_eq!(canvas.pixel(511, 511).map(|p| p.a), Some(0));
    }

    #[test]
    fn polar_truncates_toward_zero() {
        // cos(135°) * 100 = -70.71 → -70, not -71.
        let (x, y) = polar(500.0, 100.0, 135f64.to_radians());
        assert!((x - 430.0).abs() < f32::EPSILON);
        assert!((y - 570.0).abs() < f32::EPSILON);
    }
}
