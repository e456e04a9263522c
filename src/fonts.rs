//! Font resolution with ordered fallback.
//!
//! Each text role (bold title, regular body) has a prioritized list of
//! candidates: fixed font files first, then families looked up in the system
//! font database. The first candidate that loads wins. When every candidate
//! fails, the built-in 8x8 bitmap font is used, so resolution itself never
//! fails.

use std::path::PathBuf;

use font8x8::UnicodeFonts;
use log::{debug, warn};
use rusttype::{point, Font, Scale};

use crate::rendering::layout::TextExtent;
use crate::{Error, Result};

/// Pixel size requested for the title.
pub const TITLE_FONT_PX: f32 = 100.0;
/// Pixel size requested for the subtitle and badge labels.
pub const BODY_FONT_PX: f32 = 45.0;
/// Cell size of the built-in bitmap font. Size requests do not apply to it.
pub const BUILTIN_CELL: i32 = 8;

/// Where a candidate font comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum FontSource {
    /// A font file on disk. Relative paths resolve against the working directory.
    File(PathBuf),
    /// A named family from the system font database.
    SystemFamily { name: String, bold: bool },
    /// Whatever the system considers its sans-serif face.
    SystemSansSerif { bold: bool },
}

/// One entry of a fallback list.
#[derive(Debug, Clone, PartialEq)]
pub struct FontCandidate {
    pub source: FontSource,
    pub px: f32,
}

impl FontCandidate {
    pub fn file(path: impl Into<PathBuf>, px: f32) -> Self {
        Self {
            source: FontSource::File(path.into()),
            px,
        }
    }

    pub fn family(name: &str, bold: bool, px: f32) -> Self {
        Self {
            source: FontSource::SystemFamily {
                name: name.to_string(),
                bold,
            },
            px,
        }
    }

    pub fn sans_serif(bold: bool, px: f32) -> Self {
        Self {
            source: FontSource::SystemSansSerif { bold },
            px,
        }
    }
}

/// Fallback list for the bold title face.
pub fn title_candidates() -> Vec<FontCandidate> {
    vec![
        FontCandidate::file("C:/Windows/Fonts/arialbd.ttf", TITLE_FONT_PX),
        FontCandidate::file("arial.ttf", TITLE_FONT_PX),
        FontCandidate::file("arialbd.ttf", TITLE_FONT_PX),
        FontCandidate::family("Arial", true, TITLE_FONT_PX),
        FontCandidate::family("Liberation Sans", true, TITLE_FONT_PX),
        FontCandidate::family("DejaVu Sans", true, TITLE_FONT_PX),
        FontCandidate::sans_serif(true, TITLE_FONT_PX),
    ]
}

/// Fallback list for the regular body face.
pub fn body_candidates() -> Vec<FontCandidate> {
    vec![
        FontCandidate::file("arial.ttf", BODY_FONT_PX),
        FontCandidate::file("C:/Windows/Fonts/arial.ttf", BODY_FONT_PX),
        FontCandidate::family("Arial", false, BODY_FONT_PX),
        FontCandidate::family("Liberation Sans", false, BODY_FONT_PX),
        FontCandidate::family("DejaVu Sans", false, BODY_FONT_PX),
        FontCandidate::sans_serif(false, BODY_FONT_PX),
    ]
}

/// A usable font handle.
pub enum LoadedFont {
    /// A scalable outline font rendered at `px`.
    Outline {
        font: Font<'static>,
        px: f32,
        origin: String,
    },
    /// The built-in 8x8 bitmap font.
    Builtin,
}

impl std::fmt::Debug for LoadedFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.describe())
    }
}

impl LoadedFont {
    pub fn is_builtin(&self) -> bool {
        matches!(self, LoadedFont::Builtin)
    }

    /// Human readable origin, for logs.
    pub fn describe(&self) -> String {
        match self {
            LoadedFont::Outline { px, origin, .. } => format!("{} @ {}px", origin, px),
            LoadedFont::Builtin => "built-in 8x8 bitmap font".to_string(),
        }
    }

    /// Pixel bounding box of `text` drawn at `(0, 0)`.
    pub fn measure(&self, text: &str) -> TextExtent {
        match self {
            LoadedFont::Outline { font, px, .. } => {
                let scale = Scale::uniform(*px);
                let ascent = font.v_metrics(scale).ascent;
                let mut bounds: Option<TextExtent> = None;
                for glyph in font.layout(text, scale, point(0.0, ascent)) {
                    if let Some(bb) = glyph.pixel_bounding_box() {
                        let b = bounds.get_or_insert(TextExtent {
                            left: bb.min.x as f32,
                            top: bb.min.y as f32,
                            right: bb.max.x as f32,
                            bottom: bb.max.y as f32,
                        });
                        b.left = b.left.min(bb.min.x as f32);
                        b.top = b.top.min(bb.min.y as f32);
                        b.right = b.right.max(bb.max.x as f32);
                        b.bottom = b.bottom.max(bb.max.y as f32);
                    }
                }
                bounds.unwrap_or_default()
            }
            LoadedFont::Builtin => {
                let chars = text.chars().count() as f32;
                if chars == 0.0 {
                    return TextExtent::default();
                }
                TextExtent {
                    left: 0.0,
                    top: 0.0,
                    right: chars * BUILTIN_CELL as f32,
                    bottom: BUILTIN_CELL as f32,
                }
            }
        }
    }

    /// Rasterize `text` with the top of its line box at `(x, y)`.
    ///
    /// `plot` receives every covered pixel with a coverage in `0.0..=1.0`;
    /// pixels may lie outside the canvas and must be clipped by the caller.
    pub fn rasterize(&self, text: &str, x: f32, y: f32, mut plot: impl FnMut(i32, i32, f32)) {
        match self {
            LoadedFont::Outline { font, px, .. } => {
                let scale = Scale::uniform(*px);
                let ascent = font.v_metrics(scale).ascent;
                for glyph in font.layout(text, scale, point(x, y + ascent)) {
                    if let Some(bb) = glyph.pixel_bounding_box() {
                        glyph.draw(|gx, gy, v| {
                            plot(bb.min.x + gx as i32, bb.min.y + gy as i32, v);
                        });
                    }
                }
            }
            LoadedFont::Builtin => {
                let x0 = x.round() as i32;
                let y0 = y.round() as i32;
                for (i, ch) in text.chars().enumerate() {
                    let Some(rows) = builtin_glyph(ch) else {
                        continue;
                    };
                    let cell_x = x0 + i as i32 * BUILTIN_CELL;
                    for (row, bits) in rows.iter().enumerate() {
                        for col in 0..BUILTIN_CELL {
                            if bits & (1 << col) != 0 {
                                plot(cell_x + col, y0 + row as i32, 1.0);
                            }
                        }
                    }
                }
            }
        }
    }
}

fn builtin_glyph(ch: char) -> Option<[u8; 8]> {
    font8x8::BASIC_FONTS
        .get(ch)
        .or_else(|| font8x8::BASIC_FONTS.get('?'))
}

/// Lazily loaded system font database. The full scan only happens if a
/// candidate actually asks for a system family.
#[derive(Default)]
struct SystemFonts {
    #[cfg(feature = "system-fonts")]
    db: Option<fontdb::Database>,
}

impl SystemFonts {
    #[cfg(feature = "system-fonts")]
    fn load(&mut self, family: Option<&str>, bold: bool) -> Result<(Vec<u8>, u32)> {
        use fontdb::{Database, Family, Query, Weight};

        let db = self.db.get_or_insert_with(|| {
            let mut db = Database::new();
            db.load_system_fonts();
            debug!("System font database loaded: {} faces", db.len());
            db
        });

        let families = [match family {
            Some(name) => Family::Name(name),
            None => Family::SansSerif,
        }];
        let query = Query {
            families: &families,
            weight: if bold { Weight::BOLD } else { Weight::NORMAL },
            ..Query::default()
        };
        let id = db
            .query(&query)
            .ok_or_else(|| Error::FontError(format!("no system face for {:?}", families[0])))?;
        db.with_face_data(id, |data, index| (data.to_vec(), index))
            .ok_or_else(|| Error::FontError(format!("face data unavailable for {:?}", families[0])))
    }

    #[cfg(not(feature = "system-fonts"))]
    fn load(&mut self, family: Option<&str>, _bold: bool) -> Result<(Vec<u8>, u32)> {
        Err(Error::FontError(format!(
            "system font lookup is not compiled in (family {:?})",
            family.unwrap_or("sans-serif")
        )))
    }
}

fn load_candidate(candidate: &FontCandidate, system: &mut SystemFonts) -> Result<LoadedFont> {
    let (data, index, origin) = match &candidate.source {
        FontSource::File(path) => {
            let data = std::fs::read(path)
                .map_err(|e| Error::FontError(format!("{}: {}", path.display(), e)))?;
            (data, 0, path.display().to_string())
        }
        FontSource::SystemFamily { name, bold } => {
            let (data, index) = system.load(Some(name), *bold)?;
            (data, index, format!("system family '{}'", name))
        }
        FontSource::SystemSansSerif { bold } => {
            let (data, index) = system.load(None, *bold)?;
            (data, index, "system sans-serif".to_string())
        }
    };

    let font = Font::try_from_vec_and_index(data, index)
        .ok_or_else(|| Error::FontError(format!("{} is not a usable font", origin)))?;
    Ok(LoadedFont::Outline {
        font,
        px: candidate.px,
        origin,
    })
}

/// Try `candidates` in order; the first that loads wins. Never fails.
pub fn resolve(candidates: &[FontCandidate]) -> LoadedFont {
    let mut system = SystemFonts::default();
    resolve_with(candidates, &mut system)
}

fn resolve_with(candidates: &[FontCandidate], system: &mut SystemFonts) -> LoadedFont {
    for candidate in candidates {
        match load_candidate(candidate, system) {
            Ok(font) => {
                debug!("Resolved font: {}", font.describe());
                return font;
            }
            Err(e) => debug!("Font candidate {:?} rejected: {}", candidate.source, e),
        }
    }
    warn!("No font candidate could be loaded; using the built-in bitmap font");
    LoadedFont::Builtin
}

/// Text roles used by the design.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontRole {
    Title,
    Body,
}

/// The resolved title and body faces.
#[derive(Debug)]
pub struct FontSet {
    pub title: LoadedFont,
    pub body: LoadedFont,
}

impl FontSet {
    /// Resolve both roles from their default candidate lists.
    pub fn resolve() -> Self {
        let mut system = SystemFonts::default();
        Self {
            title: resolve_with(&title_candidates(), &mut system),
            body: resolve_with(&body_candidates(), &mut system),
        }
    }

    /// Both roles on the built-in font. Output is independent of installed fonts.
    pub fn builtin() -> Self {
        Self {
            title: LoadedFont::Builtin,
            body: LoadedFont::Builtin,
        }
    }

    pub fn get(&self, role: FontRole) -> &LoadedFont {
        match role {
            FontRole::Title => &self.title,
            FontRole::Body => &self.body,
        }
    }
}
