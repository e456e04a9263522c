//! Rasterizer: executes a display list on an owned canvas.

use image::RgbImage;
use sha2::{Digest, Sha256};
use tiny_skia::{Paint, PathBuilder, Pixmap, Stroke, Transform};

use crate::fonts::{FontSet, LoadedFont};
use crate::rendering::layout::Rect;
use crate::rendering::paint::{PaintCommand, Rgb, VerticalGradient};
use crate::{Error, Result, Viewport};

/// An opaque RGB drawing surface.
///
/// Backed by a tiny-skia pixmap whose alpha channel stays at 255, so the
/// premultiplied bytes equal the straight RGB values.
pub struct Canvas {
    pixmap: Pixmap,
}

impl Canvas {
    /// Allocate a canvas filled with white.
    pub fn new(viewport: Viewport) -> Result<Self> {
        let mut pixmap = Pixmap::new(viewport.width, viewport.height).ok_or_else(|| {
            Error::CanvasError(format!(
                "cannot allocate a {}x{} canvas",
                viewport.width, viewport.height
            ))
        })?;
        pixmap.fill(tiny_skia::Color::WHITE);
        Ok(Self { pixmap })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb> {
        self.pixmap
            .pixel(x, y)
            .map(|p| Rgb(p.red(), p.green(), p.blue()))
    }

    /// Overwrite row `y` with a solid color.
    pub fn fill_row(&mut self, y: u32, color: Rgb) {
        if y >= self.height() {
            return;
        }
        let stride = self.width() as usize * 4;
        let start = y as usize * stride;
        for px in self.pixmap.data_mut()[start..start + stride].chunks_exact_mut(4) {
            px.copy_from_slice(&[color.0, color.1, color.2, 255]);
        }
    }

    pub fn fill_gradient(&mut self, gradient: &VerticalGradient) {
        let height = self.height();
        for y in 0..height {
            self.fill_row(y, gradient.color_at_row(y, height));
        }
    }

    /// Fill a rectangle without anti-aliasing. Empty or off-canvas rectangles are a no-op.
    pub fn fill_rect(&mut self, rect: &Rect, color: Rgb) {
        let Some(r) = tiny_skia::Rect::from_xywh(rect.x, rect.y, rect.width, rect.height) else {
            return;
        };
        let mut paint = Paint::default();
        paint.set_color_rgba8(color.0, color.1, color.2, 255);
        paint.anti_alias = false;
        self.pixmap.fill_rect(r, &paint, Transform::identity(), None);
    }

    /// Draw a `width`-pixel outline along the inside of `rect`.
    pub fn outline_rect(&mut self, rect: &Rect, color: Rgb, width: u32) {
        let w = width as f32;
        if rect.width <= 2.0 * w || rect.height <= 2.0 * w {
            self.fill_rect(rect, color);
            return;
        }
        let (l, t, r, b) = (rect.x, rect.y, rect.right(), rect.bottom());
        for strip in [
            Rect::from_ltrb(l, t, r, t + w),
            Rect::from_ltrb(l, b - w, r, b),
            Rect::from_ltrb(l, t + w, l + w, b - w),
            Rect::from_ltrb(r - w, t + w, r, b - w),
        ] {
            self.fill_rect(&strip, color);
        }
    }

    /// Anti-aliased ellipse outline whose stroke stays inside `bounds`.
    pub fn stroke_ellipse(&mut self, bounds: &Rect, color: Rgb, width: f32) -> Result<()> {
        let inset = width / 2.0;
        let oval = tiny_skia::Rect::from_ltrb(
            bounds.x + inset,
            bounds.y + inset,
            bounds.right() - inset,
            bounds.bottom() - inset,
        )
        .ok_or_else(|| Error::RenderError(format!("ellipse bounds too small: {:?}", bounds)))?;
        let path = PathBuilder::from_oval(oval)
            .ok_or_else(|| Error::RenderError(format!("cannot build ellipse path: {:?}", bounds)))?;

        let mut paint = Paint::default();
        paint.set_color_rgba8(color.0, color.1, color.2, 255);
        paint.anti_alias = true;
        let stroke = Stroke {
            width,
            ..Stroke::default()
        };
        self.pixmap
            .stroke_path(&path, &paint, &stroke, Transform::identity(), None);
        Ok(())
    }

    /// Source-over blend of an opaque color at the given coverage.
    pub fn blend(&mut self, x: i32, y: i32, color: Rgb, coverage: f32) {
        if x < 0 || y < 0 || x as u32 >= self.width() || y as u32 >= self.height() {
            return;
        }
        let a = coverage.clamp(0.0, 1.0);
        if a == 0.0 {
            return;
        }
        let idx = (y as usize * self.width() as usize + x as usize) * 4;
        let px = &mut self.pixmap.data_mut()[idx..idx + 3];
        for (dst, src) in px.iter_mut().zip([color.0, color.1, color.2]) {
            *dst = (src as f32 * a + *dst as f32 * (1.0 - a)).round() as u8;
        }
    }

    pub fn draw_text(&mut self, font: &LoadedFont, text: &str, x: f32, y: f32, color: Rgb) {
        font.rasterize(text, x, y, |px, py, v| self.blend(px, py, color, v));
    }

    /// Raw RGB bytes, row-major, alpha dropped.
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        self.pixmap
            .data()
            .chunks_exact(4)
            .flat_map(|px| [px[0], px[1], px[2]])
            .collect()
    }

    pub fn to_rgb_image(&self) -> Result<RgbImage> {
        RgbImage::from_raw(self.width(), self.height(), self.to_rgb_bytes())
            .ok_or_else(|| Error::RenderError("canvas buffer does not match its dimensions".into()))
    }

    /// Hex SHA-256 of the RGB contents. Identical renders give identical digests.
    pub fn digest(&self) -> String {
        hex::encode(Sha256::digest(self.to_rgb_bytes()))
    }
}

/// Execute `commands` in order on `canvas`.
pub fn rasterize(canvas: &mut Canvas, commands: &[PaintCommand], fonts: &FontSet) -> Result<()> {
    for command in commands {
        match command {
            PaintCommand::Gradient(gradient) => canvas.fill_gradient(gradient),
            PaintCommand::EllipseOutline { bounds, color, width } => {
                canvas.stroke_ellipse(bounds, *color, *width)?
            }
            PaintCommand::Rect { rect, fill, outline } => {
                if let Some(fill) = fill {
                    canvas.fill_rect(rect, *fill);
                }
                if let Some((color, width)) = outline {
                    canvas.outline_rect(rect, *color, *width);
                }
            }
            PaintCommand::Text { x, y, text, font, color } => {
                canvas.draw_text(fonts.get(*font), text, *x, *y, *color)
            }
        }
    }
    Ok(())
}
