//! Writing the logo artifacts to disk.

use std::path::{Path, PathBuf};

use crate::error::SiteError;
use crate::logo::font::FontSource;
use crate::logo::lockup::draw_lockup;
use crate::logo::mark::draw_square_mark;
use crate::logo::palette::WHITE;
use crate::logo::LogoSpec;

/// Transparent square mark.
pub const SQUARE: &str = "logo_square.png";
/// Square mark flattened onto white.
pub const SQUARE_WHITE: &str = "logo_square_white.png";
/// Horizontal lockup.
pub const HORIZONTAL: &str = "logo_horizontal.png";
/// Large favicon.
pub const FAVICON_512: &str = "favicon_512.png";
/// Small favicon.
pub const FAVICON_256: &str = "favicon_256.png";

/// Every file [`export`] writes, in write order.
pub const ARTIFACTS: [&str; 5] = [SQUARE, SQUARE_WHITE, HORIZONTAL, FAVICON_512, FAVICON_256];

/// Draw the artwork and write all five PNGs into `out_dir`.
///
/// The directory is created when missing and existing files are
/// overwritten. Returns the written paths in [`ARTIFACTS`] order.
///
/// # Errors
///
/// Returns an error if drawing fails or a file cannot be written.
pub fn export(spec: &LogoSpec, fonts: &dyn FontSource, out_dir: &Path) -> Result<Vec<PathBuf>, SiteError> {
    std::fs::create_dir_all(out_dir)?;
    let path = |name: &str| out_dir.join(name);

    let square = draw_square_mark(spec.size, &spec.initials, fonts)?;
    square.to_rgba_image().save(path(SQUARE))?;
    square.flatten(WHITE)?.save(path(SQUARE_WHITE))?;

    draw_lockup(spec, fonts)?.to_rgba_image().save(path(HORIZONTAL))?;

    square.resized(512, 512)?.save(path(FAVICON_512))?;
    square.resized(256, 256)?.save(path(FAVICON_256))?;

    let written: Vec<PathBuf> = ARTIFACTS.iter().map(|&name| path(name)).collect();
    for file in &written {
        tracing::debug!(path = %file.display(), "wrote artifact");
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logo::font::BuiltinFonts;

    fn small_spec() -> LogoSpec {
        LogoSpec { size: 128, lockup_width: 400, lockup_height: 120, ..LogoSpec::default() }
    }

    #[test]
    fn writes_all_artifacts() {
        let dir = std::env::temp_dir().join("sitekit_export_all_test");
        let _ = std::fs::remove_dir_all(&dir);

        let written = export(&small_spec(), &BuiltinFonts, &dir).unwrap();
        assert_eq!(written.len(), 5);
        for name in ARTIFACTS {
            let meta = std::fs::metadata(dir.join(name)).unwrap();
            assert!(meta.len() > 0, "{name} is empty");
        }

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn artifacts_have_expected_shapes() {
        let dir = std::env::temp_dir().join("sitekit_export_shape_test");
        let _ = std::fs::remove_dir_all(&dir);
        export(&small_spec(), &BuiltinFonts, &dir).unwrap();

        let square = image::open(dir.join(SQUARE)).unwrap();
        assert_eq!((square.width(), square.height()), (128, 128));
        assert!(square.color().has_alpha());

        let white = image::open(dir.join(SQUARE_WHITE)).unwrap();
        assert!(!white.color().has_alpha());
        let corner = white.to_rgb8().get_pixel(0, 0).0;
        assert_eq!(corner, [255, 255, 255]);

        let lockup = image::open(dir.join(HORIZONTAL)).unwrap();
        assert_eq!((lockup.width(), lockup.height()), (400, 120));

        let fav = image::open(dir.join(FAVICON_256)).unwrap();
        assert_eq!((fav.width(), fav.height()), (256, 256));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn existing_files_are_overwritten() {
        let dir = std::env::temp_dir().join("sitekit_export_overwrite_test");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(SQUARE), b"stale").unwrap();

        export(&small_spec(), &BuiltinFonts, &dir).unwrap();
        assert!(image::open(dir.join(SQUARE)).is_ok());

        let _ = std::fs::remove_dir_all(&dir);
    }
}
