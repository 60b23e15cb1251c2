//! Horizontal lockup: the square mark followed by name, accent rule, and role.

use super::canvas::Canvas;
use super::font::{FontSource, Weight};
use super::mark::draw_square_mark;
use super::palette::{CYAN, NAVY, ROLE};
use super::{part, LogoSpec};
use crate::error::SiteError;

const MARGIN: f64 = 0.05;
const MARK: f64 = 0.90;
const GAP: f64 = 0.07;
const NAME_SIZE: f64 = 0.20;
const ROLE_SIZE: f64 = 0.09;
const RULE_OFFSET: f64 = 0.02;
const RULE_WIDTH: f64 = 0.02;
const RULE_LENGTH: f64 = 0.55;
const ROLE_OFFSET: f64 = 0.04;

/// Draw the lockup at `lockup_width`×`lockup_height` on a transparent background.
///
/// All wordmark lengths scale with the height.
///
/// # Errors
///
/// Returns an error if a canvas cannot be allocated.
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
pub fn draw_lockup(spec: &LogoSpec, fonts: &dyn FontSource) -> Result<Canvas, SiteError> {
    let (width, height) = (spec.lockup_width, spec.lockup_height);
    let mut canvas = Canvas::new(width, height)?;

    let margin = part(height, MARGIN);
    let mark_size = part(height, MARK);
    let mark = draw_square_mark(mark_size, &spec.initials, fonts)?;
    let mark_y = height.saturating_sub(mark_size) / 2;
    canvas.paste(&mark, margin as i32, mark_y as i32);

    let x0 = (margin + mark_size + part(height, GAP)) as f32;
    let yc = height as f32 / 2.0;

    let name_font = fonts.load(part(height, NAME_SIZE) as f32, Weight::Bold);
    let name_ink = name_font.measure(&spec.name);
    name_font.draw(&mut canvas, &spec.name, (x0, yc - name_ink.height()), NAVY);

    let line_y = yc + part(height, RULE_OFFSET) as f32;
    let rule_length = (f64::from(name_ink.width()) * RULE_LENGTH).trunc() as f32;
    canvas.line((x0, line_y), (x0 + rule_length, line_y), CYAN, part(height, RULE_WIDTH) as f32);

    let role_font = fonts.load(part(height, ROLE_SIZE) as f32, Weight::Regular);
    role_font.draw(&mut canvas, &spec.role, (x0, line_y + part(height, ROLE_OFFSET) as f32), ROLE);

    Ok(canvas)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logo::font::BuiltinFonts;

    fn lockup() -> Canvas {
        draw_lockup(&LogoSpec::default(), &BuiltinFonts).unwrap()
    }

    #[test]
    fn lockup_has_requested_dimensions() {
        let canvas = lockup();
        assert_eq!((canvas.width(), canvas.height()), (1400, 420));
    }

    #[test]
    fn accent_rule_starts_at_wordmark_origin() {
        // x0 = 21 + 378 + 29, rule centered on 210 + 8 with width 8.
        let canvas = lockup();
        assert_eq!(canvas.pixel(430, 218), Some(CYAN));
        assert_eq!(canvas.pixel(426, 218).map(|p| p.a), Some(0));
    }

    #[test]
    fn mark_is_pasted_at_left_margin() {
        let canvas = lockup();
        let mark = draw_square_mark(378, "IGP", &BuiltinFonts).unwrap();
        // A node of the 378px mark lands at the same spot shifted by (21, 21).
        assert_eq!(mark.pixel(334, 228), Some(CYAN));
        assert_eq!(canvas.pixel(21 + 334, 21 + 228), mark.pixel(334, 228));
    }

    #[test]
    fn name_ink_sits_above_the_rule() {
        let canvas = lockup();
        let inked = (428..1400).any(|x| (140..210).any(|y| canvas.pixel(x, y).is_some_and(|p| p.a > 0)));
        assert!(inked);
    }

    #[test]
    fn role_is_drawn_below_the_rule() {
        let canvas = lockup();
        let inked = (428..1400).any(|x| (234..300).any(|y| canvas.pixel(x, y).is_some_and(|p| p.a == ROLE.a)));
        assert!(inked);
    }
}
