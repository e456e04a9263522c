//! Promo thumbnail generator
//!
//! Procedurally renders the "Ai Learning Language" promotional thumbnail
//! (gradient background, decorative circles, a centered title and subtitle
//! with drop shadows, and a row of language badges) and writes it as a PNG
//! and a JPEG.
//!
//! # Pipeline
//!
//! - **Fonts**: a bold title face and a regular body face are resolved from
//!   ordered candidate lists, falling back to a built-in bitmap font
//! - **Layout / Paint**: the fixed design becomes an ordered display list
//! - **Raster**: the display list is executed on one owned canvas
//! - **Export**: the canvas is encoded losslessly and lossy, sizes are checked
//!
//! # Example
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let report = promo_thumbnail::generate()?;
//! for line in report.lines() {
//!     println!("{}", line);
//! }
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

pub mod error;
pub use error::{Error, Result};

pub mod export;
pub mod fonts;
pub mod rendering;

pub use export::{GenerationReport, OutputFile};
pub use fonts::FontSet;

/// Default warning threshold for each output file: 5 MB.
pub const DEFAULT_SIZE_LIMIT_BYTES: u64 = 5 * 1024 * 1024;

/// Canvas dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1500,
            height: 1000,
        }
    }
}

/// Output configuration for a generator run
///
/// The design itself is fixed; this only controls where and how the result
/// is written. The defaults reproduce the stock behavior: both files in the
/// working directory, optimized PNG, JPEG at quality 92, 5 MB warning limit.
///
/// # Examples
///
/// ```
/// let cfg = promo_thumbnail::ThumbnailConfig::default();
/// assert_eq!(cfg.jpeg_quality, 92);
/// assert_eq!(cfg.png_path().to_str(), Some("project_thumbnail.png"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThumbnailConfig {
    /// Canvas dimensions
    pub viewport: Viewport,
    /// Directory both files are written to; empty means the working directory
    pub output_dir: PathBuf,
    /// File name of the lossless output
    pub png_file_name: String,
    /// File name of the lossy output
    pub jpeg_file_name: String,
    /// JPEG quality, 1-100
    pub jpeg_quality: u8,
    /// Use the slowest, smallest PNG encoding
    pub optimize_png: bool,
    /// Files above this size produce a warning (they are still kept)
    pub size_limit_bytes: u64,
}

impl Default for ThumbnailConfig {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            output_dir: PathBuf::new(),
            png_file_name: "project_thumbnail.png".to_string(),
            jpeg_file_name: "project_thumbnail.jpg".to_string(),
            jpeg_quality: 92,
            optimize_png: true,
            size_limit_bytes: DEFAULT_SIZE_LIMIT_BYTES,
        }
    }
}

impl ThumbnailConfig {
    pub fn png_path(&self) -> PathBuf {
        self.output_dir.join(&self.png_file_name)
    }

    pub fn jpeg_path(&self) -> PathBuf {
        self.output_dir.join(&self.jpeg_file_name)
    }

    /// Reject settings that would fail halfway through a run.
    pub fn validate(&self) -> Result<()> {
        if self.viewport.width == 0 || self.viewport.height == 0 {
            return Err(Error::ConfigError(format!(
                "viewport must be non-empty, got {}x{}",
                self.viewport.width, self.viewport.height
            )));
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(Error::ConfigError(format!(
                "jpeg_quality must be 1-100, got {}",
                self.jpeg_quality
            )));
        }
        if self.png_file_name.trim().is_empty() || self.jpeg_file_name.trim().is_empty() {
            return Err(Error::ConfigError("output file names must not be empty".into()));
        }
        if self.png_file_name == self.jpeg_file_name {
            return Err(Error::ConfigError(format!(
                "PNG and JPEG outputs share the file name '{}'",
                self.png_file_name
            )));
        }
        Ok(())
    }
}

/// Generate the thumbnail with default settings.
///
/// Writes `project_thumbnail.png` and `project_thumbnail.jpg` into the
/// working directory, overwriting existing files.
pub fn generate() -> Result<GenerationReport> {
    generate_with(&ThumbnailConfig::default())
}

/// Generate the thumbnail with the given output settings, resolving fonts
/// from the default candidate lists.
///
/// An invalid configuration fails before the system font database is scanned.
pub fn generate_with(config: &ThumbnailConfig) -> Result<GenerationReport> {
    config.validate()?;
    let fonts = FontSet::resolve();
    debug!("Title font: {}, body font: {}", fonts.title.describe(), fonts.body.describe());
    render_and_write(config, &fonts)
}

/// Generate the thumbnail with already resolved fonts.
pub fn generate_with_fonts(config: &ThumbnailConfig, fonts: &FontSet) -> Result<GenerationReport> {
    config.validate()?;
    render_and_write(config, fonts)
}

// Expects a validated config.
fn render_and_write(config: &ThumbnailConfig, fonts: &FontSet) -> Result<GenerationReport> {
    let canvas = rendering::render(config.viewport, fonts)?;
    let image = canvas.to_rgb_image()?;

    if !config.output_dir.as_os_str().is_empty() {
        std::fs::create_dir_all(&config.output_dir)?;
    }
    let png = export::write_png(&image, &config.png_path(), config.optimize_png)?;
    let jpeg = export::write_jpeg(&image, &config.jpeg_path(), config.jpeg_quality)?;

    let report = GenerationReport {
        png,
        jpeg,
        width: canvas.width(),
        height: canvas.height(),
        aspect_ratio: export::aspect_ratio(canvas.width(), canvas.height()),
        size_limit_bytes: config.size_limit_bytes,
        canvas_sha256: canvas.digest(),
    };
    if report.has_warnings() {
        for note in report.size_notes().iter().filter(|n| n.starts_with("Warning")) {
            warn!("{}", note);
        }
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ThumbnailConfig::default();
        assert_eq!(config.viewport, Viewport { width: 1500, height: 1000 });
        assert_eq!(config.jpeg_quality, 92);
        assert!(config.optimize_png);
        assert_eq!(config.size_limit_bytes, 5 * 1024 * 1024);
        assert_eq!(config.jpeg_path(), PathBuf::from("project_thumbnail.jpg"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn output_dir_prefixes_paths() {
        let config = ThumbnailConfig {
            output_dir: PathBuf::from("out"),
            ..Default::default()
        };
        assert_eq!(config.png_path(), PathBuf::from("out").join("project_thumbnail.png"));
    }

    #[test]
    fn invalid_configs_are_rejected() {
        let bad_quality = ThumbnailConfig {
            jpeg_quality: 0,
            ..Default::default()
        };
        assert!(matches!(bad_quality.validate(), Err(Error::ConfigError(_))));

        let empty_viewport = ThumbnailConfig {
            viewport: Viewport { width: 0, height: 1000 },
            ..Default::default()
        };
        assert!(matches!(empty_viewport.validate(), Err(Error::ConfigError(_))));

        let same_name = ThumbnailConfig {
            jpeg_file_name: "project_thumbnail.png".into(),
            ..Default::default()
        };
        assert!(matches!(same_name.validate(), Err(Error::ConfigError(_))));

        let blank = ThumbnailConfig {
            png_file_name: "  ".into(),
            ..Default::default()
        };
        assert!(blank.validate().is_err());
    }

    #[test]
    fn invalid_config_fails_before_writing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = ThumbnailConfig {
            output_dir: dir.path().join("never-created"),
            jpeg_quality: 101,
            ..Default::default()
        };
        assert!(generate_with_fonts(&config, &FontSet::builtin()).is_err());
        assert!(!config.output_dir.exists());
    }

    #[test]
    fn generate_with_rejects_invalid_config_before_rendering() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = ThumbnailConfig {
            output_dir: dir.path().join("never-created"),
            viewport: Viewport { width: 1500, height: 0 },
            ..Default::default()
        };
        let err = generate_with(&config).err().expect("invalid config");
        assert!(matches!(err, Error::ConfigError(_)));
        assert!(!config.output_dir.exists());
    }

    #[test]
    fn config_round_trips_through_json() {
        let cfg = ThumbnailConfig::default();
        let json = serde_json::to_string(&cfg).expect("serialize");
        let back: ThumbnailConfig = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back.png_file_name, cfg.png_file_name);
        assert_eq!(back.viewport, cfg.viewport);
    }
}
