//! Paint command set and the thumbnail's display list.
//!
//! The display list is ordered: commands are rasterized front to back in the
//! order they appear, so every shadow precedes the shape it sits under.

use crate::fonts::{FontRole, FontSet};
use crate::rendering::layout::{self, Rect, TextPlacement};
use crate::Viewport;

/// Opaque 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Rgb = Rgb(0xFF, 0xFF, 0xFF);
}

/// Dark ink for text drop shadows (#1a1a2e).
pub const TEXT_SHADOW: Rgb = Rgb(0x1A, 0x1A, 0x2E);
/// Light gray under each badge (#E0E0E0).
pub const BADGE_SHADOW: Rgb = Rgb(0xE0, 0xE0, 0xE0);
/// Badge border and label color (#2196F3).
pub const ACCENT: Rgb = Rgb(0x21, 0x96, 0xF3);

pub const TITLE: &str = "Ai Learning Language";
pub const SUBTITLE: &str = "AI-Powered Language Learning";
pub const LANGUAGES: [&str; 4] = ["Japanese", "English", "Chinese", "Korean"];

pub const TITLE_SHADOW_OFFSET: f32 = 3.0;
pub const SUBTITLE_SHADOW_OFFSET: f32 = 2.0;
pub const BADGE_SHADOW_OFFSET: f32 = 2.0;

/// Vertical two-color gradient, evaluated per row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerticalGradient {
    pub start: Rgb,
    pub end: Rgb,
}

/// Blue (33,150,243) blended towards purple (128,43,131) at the top.
pub const BACKGROUND: VerticalGradient = VerticalGradient {
    start: Rgb(33, 150, 243),
    end: Rgb(128, 43, 131),
};

impl VerticalGradient {
    /// Color of row `y`: `start + (end - start) * (1 - y / height)`, each
    /// channel truncated to an integer. Row 0 is `end`.
    pub fn color_at_row(&self, y: u32, height: u32) -> Rgb {
        let ratio = y as f64 / height as f64;
        let blend = |s: u8, e: u8| (s as f64 + (e as f64 - s as f64) * (1.0 - ratio)) as u8;
        Rgb(
            blend(self.start.0, self.end.0),
            blend(self.start.1, self.end.1),
            blend(self.start.2, self.end.2),
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PaintCommand {
    /// Fill every row of the canvas.
    Gradient(VerticalGradient),
    /// Unfilled ellipse; the stroke lies inside `bounds`.
    EllipseOutline {
        bounds: Rect,
        color: Rgb,
        width: f32,
    },
    /// Rectangle with optional fill and an optional inner outline of `width` pixels.
    Rect {
        rect: Rect,
        fill: Option<Rgb>,
        outline: Option<(Rgb, u32)>,
    },
    /// A single line of text with the top of its line box at `(x, y)`.
    Text {
        x: f32,
        y: f32,
        text: String,
        font: FontRole,
        color: Rgb,
    },
}

fn text(placement: &TextPlacement, offset: f32, text: &str, font: FontRole, color: Rgb) -> PaintCommand {
    PaintCommand::Text {
        x: placement.x + offset,
        y: placement.y + offset,
        text: text.to_string(),
        font,
        color,
    }
}

/// Build the complete, ordered display list for the thumbnail.
pub fn thumbnail_display_list(viewport: Viewport, fonts: &FontSet) -> Vec<PaintCommand> {
    let mut commands = vec![PaintCommand::Gradient(BACKGROUND)];

    for circle in layout::decorative_circles(viewport) {
        commands.push(PaintCommand::EllipseOutline {
            bounds: circle.bounds(),
            color: Rgb::WHITE,
            width: layout::CIRCLE_STROKE,
        });
    }

    let title = layout::title_placement(viewport, fonts.title.measure(TITLE));
    commands.push(text(&title, TITLE_SHADOW_OFFSET, TITLE, FontRole::Title, TEXT_SHADOW));
    commands.push(text(&title, 0.0, TITLE, FontRole::Title, Rgb::WHITE));

    let subtitle = layout::subtitle_placement(viewport, &title, fonts.body.measure(SUBTITLE));
    commands.push(text(&subtitle, SUBTITLE_SHADOW_OFFSET, SUBTITLE, FontRole::Body, TEXT_SHADOW));
    commands.push(text(&subtitle, 0.0, SUBTITLE, FontRole::Body, Rgb::WHITE));

    let labels: Vec<_> = LANGUAGES
        .iter()
        .map(|lang| (*lang, fonts.body.measure(lang)))
        .collect();
    for badge in layout::badge_row(viewport, &labels) {
        commands.push(PaintCommand::Rect {
            rect: badge.rect,
            fill: Some(Rgb::WHITE),
            outline: Some((Rgb::WHITE, 2)),
        });
        commands.push(PaintCommand::Rect {
            rect: badge.rect.offset(BADGE_SHADOW_OFFSET, BADGE_SHADOW_OFFSET),
            fill: Some(BADGE_SHADOW),
            outline: None,
        });
        commands.push(PaintCommand::Rect {
            rect: badge.rect,
            fill: Some(Rgb::WHITE),
            outline: Some((ACCENT, 3)),
        });
        commands.push(PaintCommand::Text {
            x: badge.text_x,
            y: badge.text_y,
            text: badge.label,
            font: FontRole::Body,
            color: ACCENT,
        });
    }

    commands
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gradient_endpoints_and_truncation() {
        let h = 1000;
        assert_eq!(BACKGROUND.color_at_row(0, h), Rgb(128, 43, 131));
        // ratio 0.5: 33 + 95 * 0.5 = 80.5, 150 - 107 * 0.5 = 96.5, 243 - 112 * 0.5 = 187
        assert_eq!(BACKGROUND.color_at_row(500, h), Rgb(80, 96, 187));
        // ratio 0.999: 33.095, 149.893, 242.888
        assert_eq!(BACKGROUND.color_at_row(999, h), Rgb(33, 149, 242));
    }

    #[test]
    fn gradient_matches_formula_for_every_row() {
        let h = 1000u32;
        for y in 0..h {
            let ratio = y as f64 / h as f64;
            let expected = Rgb(
                (33.0 + 95.0 * (1.0 - ratio)) as u8,
                (150.0 - 107.0 * (1.0 - ratio)) as u8,
                (243.0 - 112.0 * (1.0 - ratio)) as u8,
            );
            assert_eq!(BACKGROUND.color_at_row(y, h), expected, "row {}", y);
        }
    }

    #[test]
    fn display_list_order() {
        let viewport = Viewport::default();
        let list = thumbnail_display_list(viewport, &FontSet::builtin());

        assert!(matches!(list[0], PaintCommand::Gradient(_)));
        let ellipses = list
            .iter()
            .filter(|c| matches!(c, PaintCommand::EllipseOutline { .. }))
            .count();
        assert_eq!(ellipses, layout::CIRCLE_COUNT);

        let texts: Vec<_> = list
            .iter()
            .filter_map(|c| match c {
                PaintCommand::Text { text, color, x, y, .. } => Some((text.as_str(), *color, *x, *y)),
                _ => None,
            })
            .collect();
        // shadow, then the white copy at the un-offset position
        assert_eq!(texts[0].0, TITLE);
        assert_eq!(texts[0].1, TEXT_SHADOW);
        assert_eq!(texts[1].1, Rgb::WHITE);
        assert_eq!(texts[0].2 - texts[1].2, TITLE_SHADOW_OFFSET);
        assert_eq!(texts[0].3 - texts[1].3, TITLE_SHADOW_OFFSET);
        assert_eq!(texts[2].0, SUBTITLE);
        assert_eq!(texts[2].2 - texts[3].2, SUBTITLE_SHADOW_OFFSET);
        assert_eq!(texts[3].1, Rgb::WHITE);

        let labels: Vec<_> = texts[4..].iter().map(|t| t.0).collect();
        assert_eq!(labels, LANGUAGES);
        assert!(texts[4..].iter().all(|t| t.1 == ACCENT));
    }

    #[test]
    fn badge_commands_draw_shadow_between_boxes() {
        let list = thumbnail_display_list(Viewport::default(), &FontSet::builtin());
        let first_rect = list
            .iter()
            .position(|c| matches!(c, PaintCommand::Rect { .. }))
            .expect("badge rects");

        match (&list[first_rect], &list[first_rect + 1], &list[first_rect + 2]) {
            (
                PaintCommand::Rect { rect: a, outline: Some((Rgb::WHITE, 2)), .. },
                PaintCommand::Rect { rect: shadow, fill: Some(BADGE_SHADOW), outline: None },
                PaintCommand::Rect { rect: b, outline: Some((ACCENT, 3)), .. },
            ) => {
                assert_eq!(a, b);
                assert_eq!(shadow.x - a.x, BADGE_SHADOW_OFFSET);
                assert_eq!(shadow.width, a.width);
            }
            other => panic!("unexpected badge sequence: {:?}", other),
        }
        assert!(matches!(list[first_rect + 3], PaintCommand::Text { color: ACCENT, .. }));
    }

    #[test]
    fn builtin_title_is_centered() {
        let fonts = FontSet::builtin();
        let list = thumbnail_display_list(Viewport::default(), &fonts);
        let width = fonts.title.measure(TITLE).width();
        let x = list
            .iter()
            .find_map(|c| match c {
                PaintCommand::Text { color: Rgb::WHITE, x, .. } => Some(*x),
                _ => None,
            })
            .expect("title text");
        assert_eq!((1500.0 - width) / 2.0 - x, 0.0);
    }
}
