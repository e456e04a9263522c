//! Rendering pipeline: layout -> display list -> raster

pub mod layout;
pub mod paint;
pub mod raster;

pub use paint::{PaintCommand, Rgb};
pub use raster::Canvas;

use crate::fonts::FontSet;
use crate::{Result, Viewport};

/// Render the thumbnail design onto a fresh canvas.
pub fn render(viewport: Viewport, fonts: &FontSet) -> Result<Canvas> {
    let mut canvas = Canvas::new(viewport)?;
    let commands = paint::thumbnail_display_list(viewport, fonts);
    log::debug!("Rasterizing {} paint commands", commands.len());
    raster::rasterize(&mut canvas, &commands, fonts)?;
    Ok(canvas)
}
