//! Geometric logo artwork: the square mark, the horizontal lockup, and the
//! drawing surface and fonts they are built from.
//!
//! Every length in the layout is a fraction of the image size truncated to
//! whole pixels, so the same inputs always produce the same pixels.

pub mod canvas;
pub mod font;
pub mod lockup;
pub mod mark;
#[allow(missing_docs)]
pub mod palette;

use crate::config::LogoConfig;

/// Default square mark size.
pub const DEFAULT_SIZE: u32 = 1024;
/// Default lockup width.
pub const LOCKUP_WIDTH: u32 = 1400;
/// Default lockup height.
pub const LOCKUP_HEIGHT: u32 = 420;

/// Everything the generator draws, fixed for the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogoSpec {
    /// Text inside the center plate.
    pub initials: String,
    /// Wordmark name, drawn in bold.
    pub name: String,
    /// Smaller line under the name.
    pub role: String,
    /// Edge length of the square mark.
    pub size: u32,
    /// Lockup width.
    pub lockup_width: u32,
    /// Lockup height.
    pub lockup_height: u32,
}

impl LogoSpec {
    /// Artwork settings from the `[logo]` config section with the default lockup size.
    #[must_use]
    pub fn from_config(config: &LogoConfig) -> Self {
        Self {
            initials: config.initials.clone(),
            name: config.name.clone(),
            role: config.role.clone(),
            size: config.size,
            lockup_width: LOCKUP_WIDTH,
            lockup_height: LOCKUP_HEIGHT,
        }
    }
}

impl Default for LogoSpec {
    fn default() -> Self {
        Self::from_config(&LogoConfig::default())
    }
}

/// `fraction` of `size`, truncated toward zero.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn part(size: u32, fraction: f64) -> u32 {
    (f64::from(size) * fraction) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn part_truncates() {
        assert_eq!(part(1024, 0.40), 409);
        assert_eq!(part(420, 0.05), 21);
        assert_eq!(part(420, 0.90), 378);
        assert_eq!(part(99, 0.0), 0);
    }

    #[test]
    fn default_spec_matches_brand() {
        let spec = LogoSpec::default();
        assert_eq!(spec.initials, "IGP");
        assert_eq!(spec.size, DEFAULT_SIZE);
        assert_eq!((spec.lockup_width, spec.lockup_height), (1400, 420));
    }
}
