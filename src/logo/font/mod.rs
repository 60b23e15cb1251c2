//! Font loading with an ordered fallback chain.
//!
//! [`FontLoader`] walks a list of font files and takes the first one that
//! exists and parses; when none do it hands out the built-in bitmap font,
//! so loading never fails.
//!
//! Text is positioned the way common raster drawing libraries do it: the
//! origin passed to [`Font::draw`] is the left end of the ascender line, and
//! [`Font::measure`] reports the ink box relative to that same origin. The
//! ink box may start right of (or left of) the origin, which is why callers
//! that want exact centering subtract [`TextBounds::left`] and
//! [`TextBounds::top`].

mod bitmap;
mod outline;

use std::path::{Path, PathBuf};

pub use bitmap::BitmapFont;
pub use outline::OutlineFont;

use super::canvas::{Canvas, Rgba};

/// Requested stroke weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Weight {
    /// Book weight.
    Regular,
    /// Bold weight.
    Bold,
}

/// Ink bounding box of a piece of text, relative to the draw origin.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TextBounds {
    /// Leftmost inked x.
    pub left: f32,
    /// Topmost inked y.
    pub top: f32,
    /// Rightmost inked x.
    pub right: f32,
    /// Bottommost inked y.
    pub bottom: f32,
}

impl TextBounds {
    /// Horizontal extent of the ink.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    /// Vertical extent of the ink.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    /// Smallest box containing both.
    fn union(self, other: TextBounds) -> TextBounds {
        TextBounds {
            left: self.left.min(other.left),
            top: self.top.min(other.top),
            right: self.right.max(other.right),
            bottom: self.bottom.max(other.bottom),
        }
    }
}

/// A font bound to a pixel size.
pub enum Font {
    /// TrueType/OpenType outlines read from a file.
    Outline(OutlineFont),
    /// The built-in bitmap font.
    Builtin(BitmapFont),
}

impl Font {
    /// Em size in pixels.
    #[must_use]
    pub fn size(&self) -> f32 {
        match self {
            Font::Outline(f) => f.size(),
            Font::Builtin(f) => f.size(),
        }
    }

    /// Ink box of `text` relative to the draw origin. Text without ink
    /// (empty, spaces) yields an all-zero box.
    #[must_use]
    pub fn measure(&self, text: &str) -> TextBounds {
        match self {
            Font::Outline(f) => f.measure(text),
            Font::Builtin(f) => f.measure(text),
        }
    }

    /// Render `text` with the ascender line's left end at `origin`.
    pub fn draw(&self, canvas: &mut Canvas, text: &str, origin: (f32, f32), color: Rgba) {
        match self {
            Font::Outline(f) => f.draw(canvas, text, origin, color),
            Font::Builtin(f) => f.draw(canvas, text, origin, color),
        }
    }

    /// File the font was read from; `None` for the built-in font.
    #[must_use]
    pub fn source(&self) -> Option<&Path> {
        match self {
            Font::Outline(f) => Some(f.path()),
            Font::Builtin(_) => None,
        }
    }
}

/// The "load font" capability the artwork is drawn with.
pub trait FontSource {
    /// A font at `size` pixels in the requested weight. Never fails.
    fn load(&self, size: f32, weight: Weight) -> Font;
}

/// Always hands out the built-in bitmap font, for output that does not
/// depend on the fonts installed on the host.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinFonts;

impl FontSource for BuiltinFonts {
    fn load(&self, size: f32, _weight: Weight) -> Font {
        Font::Builtin(BitmapFont::new(size))
    }
}

/// Tries configured font files, then well-known system locations.
#[derive(Debug, Clone)]
pub struct FontLoader {
    preferred: Vec<PathBuf>,
    include_system: bool,
}

impl Default for FontLoader {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl FontLoader {
    /// A loader that tries `preferred` before the system candidates.
    #[must_use]
    pub fn new(preferred: Vec<PathBuf>) -> Self {
        Self { preferred, include_system: true }
    }

    /// Every file tried for `weight`, in order.
    #[must_use]
    pub fn candidates(&self, weight: Weight) -> Vec<PathBuf> {
        let system: &[&str] = if self.include_system { system_candidates(weight) } else { &[] };
        self.preferred.iter().cloned().chain(system.iter().map(PathBuf::from)).collect()
    }
}

impl FontSource for FontLoader {
    fn load(&self, size: f32, weight: Weight) -> Font {
        for path in self.candidates(weight) {
            if !path.is_file() {
                continue;
            }
            match OutlineFont::open(&path, size) {
                Ok(font) => {
                    tracing::debug!(path = %path.display(), size, ?weight, "loaded font");
                    return Font::Outline(font);
                }
                Err(e) => tracing::debug!(path = %path.display(), error = %e, "skipping font"),
            }
        }
        tracing::warn!(?weight, "no usable font file found, using built-in bitmap font");
        Font::Builtin(BitmapFont::new(size))
    }
}

fn system_candidates(weight: Weight) -> &'static [&'static str] {
    match weight {
        Weight::Bold => &[
            "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
            "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
            "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
            "/System/Library/Fonts/Helvetica.ttc",
            r"C:\Windows\Fonts\arialbd.ttf",
            r"C:\Windows\Fonts\segoeuib.ttf",
        ],
        Weight::Regular => &[
            "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
            "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
            "/System/Library/Fonts/Supplemental/Arial.ttf",
            "/System/Library/Fonts/Helvetica.ttc",
            r"C:\Windows\Fonts\arial.ttf",
            r"C:\Windows\Fonts\segoeui.ttf",
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preferred_fonts_come_first() {
        let loader = FontLoader::new(vec![PathBuf::from("/opt/brand/Display-Bold.otf")]);
        let candidates = loader.candidates(Weight::Bold);
        assert_eq!(candidates[0], PathBuf::from("/opt/brand/Display-Bold.otf"));
        assert_eq!(
            candidates[1],
            PathBuf::from("/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf")
        );
        assert_eq!(candidates.len(), 7);
    }

    #[test]
    fn weights_pick_different_files() {
        let loader = FontLoader::default();
        assert_ne!(loader.candidates(Weight::Bold)[0], loader.candidates(Weight::Regular)[0]);
    }

    #[test]
    fn unusable_candidates_fall_back_to_builtin() {
        let dir = std::env::temp_dir().join("sitekit_font_fallback_test");
        std::fs::create_dir_all(&dir).unwrap();
        let garbage = dir.join("broken.ttf");
        std::fs::write(&garbage, b"not a font").unwrap();

        let loader = FontLoader {
            preferred: vec![dir.join("missing.ttf"), garbage],
            include_system: false,
        };
        let font = loader.load(20.0, Weight::Bold);
        assert!(font.source().is_none());
        assert!((font.size() - 20.0).abs() < f32::EPSILON);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn first_usable_candidate_wins() {
        let fixture = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("test_fixtures/fonts/DejaVuSans-Bold.ttf");
        let loader = FontLoader {
            preferred: vec![PathBuf::from("/nonexistent/font.ttf"), fixture.clone()],
            include_system: false,
        };
        let font = loader.load(40.0, Weight::Bold);
        assert_eq!(font.source(), Some(fixture.as_path()));
        assert!((font.size() - 40.0).abs() < f32::EPSILON);
    }

    #[test]
    fn loading_never_fails() {
        let font = FontLoader::new(vec![PathBuf::from("/nonexistent/font.ttf")]).load(32.0, Weight::Regular);
        assert!(font.measure("IGP").width() > 0.0);
    }
}
