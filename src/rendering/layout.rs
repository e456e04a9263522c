//! Geometry for the thumbnail design: circles, centered text, badge boxes.
//!
//! Everything here is plain arithmetic over the viewport and measured text
//! extents, so it can be tested without a canvas or any font files.

use crate::fonts::BODY_FONT_PX;
use crate::Viewport;

/// Number of decorative circles.
pub const CIRCLE_COUNT: usize = 5;
/// Stroke width of the decorative circles.
pub const CIRCLE_STROKE: f32 = 4.0;
/// Vertical position of the title, as a fraction of the viewport height.
pub const TITLE_Y_RATIO: f32 = 0.35;
/// Gap between the bottom of the title and the subtitle.
pub const SUBTITLE_GAP: f32 = 25.0;
/// Vertical position of the badge text, as a fraction of the viewport height.
pub const BADGE_Y_RATIO: f32 = 0.75;
/// Padding between badge text and the badge edge.
pub const BADGE_PADDING: f32 = 20.0;

/// Axis-aligned rectangle in canvas pixels. Right and bottom edges are exclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn from_ltrb(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            x: left,
            y: top,
            width: right - left,
            height: bottom - top,
        }
    }

    /// Rectangle covering the pixels from `(x0, y0)` through `(x1, y1)`,
    /// both corners included.
    pub fn from_corners(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self::from_ltrb(x0, y0, x1 + 1.0, y1 + 1.0)
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Same size, moved by `(dx, dy)`.
    pub fn offset(&self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }
}

/// Pixel bounding box of a string drawn at origin `(0, 0)`, where y=0 is the
/// top of the line box. `left`/`top` may be non-zero because of side bearings
/// and the gap between ascent and the tallest glyph.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TextExtent {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl TextExtent {
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }
}

/// A decorative circle, described by its center and diameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub cx: f32,
    pub cy: f32,
    pub size: f32,
}

impl Circle {
    /// Bounding box of the circle; the outline is drawn inside it.
    pub fn bounds(&self) -> Rect {
        let r = self.size / 2.0;
        Rect::from_ltrb(self.cx - r, self.cy - r, self.cx + r, self.cy + r)
    }
}

/// Circle `i` alternates between an upper and a lower band while walking
/// right and growing by 15px per step.
pub fn decorative_circle(viewport: Viewport, i: usize) -> Circle {
    let w = viewport.width as f32;
    let h = viewport.height as f32;
    Circle {
        cx: w * (0.2 + 0.15 * i as f32),
        cy: h * (0.3 + 0.4 * (i % 2) as f32),
        size: 120.0 + 15.0 * i as f32,
    }
}

pub fn decorative_circles(viewport: Viewport) -> Vec<Circle> {
    (0..CIRCLE_COUNT)
        .map(|i| decorative_circle(viewport, i))
        .collect()
}

/// Where a line of text is drawn, together with the extent used to place it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextPlacement {
    pub x: f32,
    pub y: f32,
    pub extent: TextExtent,
}

/// X coordinate that centers text of the given extent in the viewport.
pub fn center_x(viewport: Viewport, extent: &TextExtent) -> f32 {
    (viewport.width as f32 - extent.width()) / 2.0
}

pub fn title_placement(viewport: Viewport, extent: TextExtent) -> TextPlacement {
    TextPlacement {
        x: center_x(viewport, &extent),
        y: viewport.height as f32 * TITLE_Y_RATIO,
        extent,
    }
}

/// The subtitle sits `SUBTITLE_GAP` below the title's rendered height.
pub fn subtitle_placement(
    viewport: Viewport,
    title: &TextPlacement,
    extent: TextExtent,
) -> TextPlacement {
    TextPlacement {
        x: center_x(viewport, &extent),
        y: title.y + title.extent.height() + SUBTITLE_GAP,
        extent,
    }
}

/// A language badge: the label's draw origin and the box around it.
#[derive(Debug, Clone, PartialEq)]
pub struct Badge {
    pub label: String,
    pub text_x: f32,
    pub text_y: f32,
    pub text_width: f32,
    pub rect: Rect,
}

impl Badge {
    /// Horizontal center of the label text.
    pub fn text_center_x(&self) -> f32 {
        self.text_x + self.text_width / 2.0
    }
}

/// Lay out one badge per label, evenly spaced across the width.
///
/// The box height is derived from the nominal body font size, not from the
/// measured text, so badges keep the same height whatever font was resolved.
/// Box corners are inclusive: the box spans `padding` pixels either side of
/// the label plus the corner pixel itself.
pub fn badge_row(viewport: Viewport, labels: &[(&str, TextExtent)]) -> Vec<Badge> {
    let spacing = viewport.width as f32 / (labels.len() + 1) as f32;
    let y = viewport.height as f32 * BADGE_Y_RATIO;
    let box_height = BODY_FONT_PX + BADGE_PADDING * 2.0;

    labels
        .iter()
        .enumerate()
        .map(|(i, (label, extent))| {
            let width = extent.width();
            let x = spacing * (i + 1) as f32 - width / 2.0;
            Badge {
                label: label.to_string(),
                text_x: x,
                text_y: y,
                text_width: width,
                rect: Rect::from_corners(
                    x - BADGE_PADDING,
                    y - BADGE_PADDING,
                    x + width + BADGE_PADDING,
                    y + box_height - BADGE_PADDING,
                ),
            }
        })
        .collect()
}
