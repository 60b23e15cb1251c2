//! Brand colors.

use super::canvas::Rgba;

/// Deep navy used for the initials and wordmark.
pub const NAVY: Rgba = Rgba::new(10, 32, 56, 255);
/// Accent cyan.
pub const CYAN: Rgba = Rgba::new(30, 144, 255, 255);
/// Neutral steel grey.
pub const STEEL: Rgba = Rgba::new(120, 140, 160, 255);

pub const CYAN_SOFT: Rgba = CYAN.with_alpha(120);
pub const STEEL_SOFT: Rgba = STEEL.with_alpha(110);
pub const NAVY_SOFT: Rgba = NAVY.with_alpha(120);

/// Role line under the name.
pub const ROLE: Rgba = NAVY.with_alpha(200);

/// Translucent plate behind the initials.
pub const PLATE_FILL: Rgba = Rgba::new(255, 255, 255, 20);
pub const PLATE_OUTLINE: Rgba = Rgba::new(255, 255, 255, 35);

/// Background of the flattened square variant.
pub const WHITE: Rgba = Rgba::new(255, 255, 255, 255);
