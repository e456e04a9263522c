//! Writing the canvas to disk and reporting on the result.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ExtendedColorType, ImageEncoder, RgbImage};
use jpeg_encoder::{ColorType, Encoder, SamplingFactor};
use log::info;
use serde::Serialize;

use crate::{Error, Result};

const MIB: f64 = 1024.0 * 1024.0;

/// A file written by the generator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputFile {
    pub path: PathBuf,
    pub size_bytes: u64,
}

impl OutputFile {
    fn from_disk(path: &Path) -> Result<Self> {
        let size_bytes = std::fs::metadata(path)?.len();
        info!("Wrote {} ({} bytes)", path.display(), size_bytes);
        Ok(Self {
            path: path.to_path_buf(),
            size_bytes,
        })
    }

    pub fn size_mb(&self) -> f64 {
        self.size_bytes as f64 / MIB
    }

    pub fn exceeds(&self, limit_bytes: u64) -> bool {
        self.size_bytes > limit_bytes
    }
}

/// Write `image` as PNG. `optimize` selects the slowest, smallest encoding.
pub fn write_png(image: &RgbImage, path: &Path, optimize: bool) -> Result<OutputFile> {
    let (compression, filter) = if optimize {
        (CompressionType::Best, FilterType::Adaptive)
    } else {
        (CompressionType::Fast, FilterType::NoFilter)
    };
    let mut writer = BufWriter::new(File::create(path)?);
    PngEncoder::new_with_quality(&mut writer, compression, filter).write_image(
        image.as_raw(),
        image.width(),
        image.height(),
        ExtendedColorType::Rgb8,
    )?;
    writer.flush()?;
    OutputFile::from_disk(path)
}

/// Write `image` as JPEG at `quality` (1-100) with optimized Huffman tables
/// and 4:2:0 chroma subsampling.
pub fn write_jpeg(image: &RgbImage, path: &Path, quality: u8) -> Result<OutputFile> {
    let (width, height) = jpeg_dimensions(image)?;
    let mut writer = BufWriter::new(File::create(path)?);
    let mut encoder = Encoder::new(&mut writer, quality);
    encoder.set_optimized_huffman_tables(true);
    encoder.set_sampling_factor(SamplingFactor::R_4_2_0);
    encoder.encode(image.as_raw(), width, height, ColorType::Rgb)?;
    writer.flush()?;
    OutputFile::from_disk(path)
}

fn jpeg_dimensions(image: &RgbImage) -> Result<(u16, u16)> {
    match (u16::try_from(image.width()), u16::try_from(image.height())) {
        (Ok(w), Ok(h)) => Ok((w, h)),
        _ => Err(Error::RenderError(format!(
            "{}x{} exceeds the JPEG size limit of 65535x65535",
            image.width(),
            image.height()
        ))),
    }
}

fn gcd(a: u32, b: u32) -> u32 {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}

/// Reduced aspect ratio, e.g. `1500x1000` -> `"3:2"`.
pub fn aspect_ratio(width: u32, height: u32) -> String {
    let d = gcd(width, height).max(1);
    format!("{}:{}", width / d, height / d)
}

fn limit_label(limit_bytes: u64) -> String {
    let mb = limit_bytes as f64 / MIB;
    if mb.fract() == 0.0 {
        format!("{}MB", mb as u64)
    } else {
        format!("{:.2}MB", mb)
    }
}

/// Outcome of one generator run.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationReport {
    pub png: OutputFile,
    pub jpeg: OutputFile,
    pub width: u32,
    pub height: u32,
    pub aspect_ratio: String,
    pub size_limit_bytes: u64,
    /// SHA-256 of the raw RGB canvas, before encoding.
    pub canvas_sha256: String,
}

impl GenerationReport {
    /// Paths of the lossless and the lossy output.
    pub fn paths(&self) -> (&Path, &Path) {
        (self.png.path.as_path(), self.jpeg.path.as_path())
    }

    /// Size-limit warnings. Only the JPEG gets a confirming line when it is
    /// within the limit; the PNG branch stays silent.
    pub fn size_notes(&self) -> Vec<String> {
        let limit = limit_label(self.size_limit_bytes);
        let mut notes = Vec::new();
        if self.png.exceeds(self.size_limit_bytes) {
            notes.push(format!("Warning: PNG file exceeds {} limit", limit));
        }
        if self.jpeg.exceeds(self.size_limit_bytes) {
            notes.push(format!("Warning: JPG file exceeds {} limit", limit));
        } else {
            notes.push(format!("JPG file is under {} limit - recommended for upload", limit));
        }
        notes
    }

    pub fn has_warnings(&self) -> bool {
        self.png.exceeds(self.size_limit_bytes) || self.jpeg.exceeds(self.size_limit_bytes)
    }

    /// Console lines, in print order.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![
            "Thumbnail created successfully!".to_string(),
            format!("PNG: {} ({:.2} MB)", self.png.path.display(), self.png.size_mb()),
            format!("JPG: {} ({:.2} MB)", self.jpeg.path.display(), self.jpeg.size_mb()),
            format!(
                "Dimensions: {}x{} ({} ratio)",
                self.width, self.height, self.aspect_ratio
            ),
        ];
        lines.extend(self.size_notes());
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(png: u64, jpeg: u64, limit: u64) -> GenerationReport {
        GenerationReport {
            png: OutputFile {
                path: PathBuf::from("project_thumbnail.png"),
                size_bytes: png,
            },
            jpeg: OutputFile {
                path: PathBuf::from("project_thumbnail.jpg"),
                size_bytes: jpeg,
            },
            width: 1500,
            height: 1000,
            aspect_ratio: aspect_ratio(1500, 1000),
            size_limit_bytes: limit,
            canvas_sha256: String::new(),
        }
    }

    const FIVE_MB: u64 = 5 * 1024 * 1024;

    #[test]
    fn aspect_ratio_is_reduced() {
        assert_eq!(aspect_ratio(1500, 1000), "3:2");
        assert_eq!(aspect_ratio(1920, 1080), "16:9");
        assert_eq!(aspect_ratio(7, 3), "7:3");
    }

    #[test]
    fn lines_within_limit() {
        let lines = report(180_000, 95_000, FIVE_MB).lines();
        assert_eq!(lines[0], "Thumbnail created successfully!");
        assert_eq!(lines[1], "PNG: project_thumbnail.png (0.17 MB)");
        assert_eq!(lines[2], "JPG: project_thumbnail.jpg (0.09 MB)");
        assert_eq!(lines[3], "Dimensions: 1500x1000 (3:2 ratio)");
        assert_eq!(lines[4], "JPG file is under 5MB limit - recommended for upload");
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn png_over_limit_warns_without_confirmation() {
        let r = report(FIVE_MB + 1, 1000, FIVE_MB);
        let notes = r.size_notes();
        assert_eq!(
            notes,
            vec![
                "Warning: PNG file exceeds 5MB limit".to_string(),
                "JPG file is under 5MB limit - recommended for upload".to_string(),
            ]
        );
        assert!(r.has_warnings());
    }

    #[test]
    fn both_over_limit() {
        let notes = report(FIVE_MB * 2, FIVE_MB * 2, FIVE_MB).size_notes();
        assert_eq!(notes.len(), 2);
        assert!(notes.iter().all(|n| n.starts_with("Warning:")));
    }

    #[test]
    fn exactly_at_limit_is_not_a_warning() {
        let r = report(FIVE_MB, FIVE_MB, FIVE_MB);
        assert!(!r.has_warnings());
    }

    #[test]
    fn fractional_limit_label() {
        let notes = report(10, 2_000_000, 1024 * 1024 + 512 * 1024).size_notes();
        assert_eq!(notes[0], "Warning: JPG file exceeds 1.50MB limit");
    }

    #[test]
    fn report_serializes_to_json() {
        let json = serde_json::to_value(report(10, 20, FIVE_MB)).expect("json");
        assert_eq!(json["png"]["size_bytes"], 10);
        assert_eq!(json["jpeg"]["path"], "project_thumbnail.jpg");
        assert_eq!(json["aspect_ratio"], "3:2");
    }

    #[test]
    fn encoders_write_readable_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        let image = RgbImage::from_pixel(32, 16, image::Rgb([33, 150, 243]));

        let png = write_png(&image, &dir.path().join("t.png"), true).expect("png");
        let jpg = write_jpeg(&image, &dir.path().join("t.jpg"), 92).expect("jpg");
        assert!(png.size_bytes > 0);
        assert!(jpg.size_bytes > 0);

        let bytes = std::fs::read(&png.path).expect("read png");
        assert_eq!(&bytes[0..8], b"\x89PNG\r\n\x1a\n");
        let bytes = std::fs::read(&jpg.path).expect("read jpg");
        assert_eq!(&bytes[0..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn optimized_jpeg_beats_plain_baseline_encoding() {
        let dir = tempfile::tempdir().expect("tempdir");
        let image = RgbImage::from_fn(300, 200, |x, y| {
            image::Rgb([(x % 256) as u8, (y * 3 % 256) as u8, ((x + y) % 256) as u8])
        });

        let optimized = write_jpeg(&image, &dir.path().join("opt.jpg"), 92).expect("jpeg");

        let mut plain = Vec::new();
        image::codecs::jpeg::JpegEncoder::new_with_quality(&mut plain, 92)
            .write_image(image.as_raw(), 300, 200, ExtendedColorType::Rgb8)
            .expect("plain jpeg");

        assert!(
            optimized.size_bytes < plain.len() as u64,
            "optimized {} vs plain {}",
            optimized.size_bytes,
            plain.len()
        );
        let decoded = image::open(&optimized.path).expect("decode").to_rgb8();
        assert_eq!(decoded.dimensions(), (300, 200));
    }

    #[test]
    fn oversized_jpeg_is_rejected_before_writing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("wide.jpg");
        let image = RgbImage::new(70_000, 1);
        assert!(matches!(write_jpeg(&image, &path, 92), Err(crate::Error::RenderError(_))));
        assert!(!path.exists());
    }

    #[test]
    fn write_into_missing_directory_fails() {
        let dir = tempfile::tempdir().expect("tempdir");
        let image = RgbImage::new(4, 4);
        let err = write_png(&image, &dir.path().join("nope/t.png"), true);
        assert!(matches!(err, Err(crate::Error::Io(_))));
    }
}
