//! Vertical layout cursor
//!
//! Owned by a single render call and threaded through every section, so
//! concurrent renders never share placement state.

use log::debug;

use crate::error::RendererResult;
use crate::surface::DocumentSurface;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutCursor {
    y: f64,
    /// Where content restarts on a fresh page
    top: f64,
    /// Lowest y content may reach
    bottom: f64,
}

impl LayoutCursor {
    pub fn new(start_y: f64, top: f64, bottom: f64) -> Self {
        Self { y: start_y, top, bottom }
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn advance(&mut self, dy: f64) {
        self.y += dy;
    }

    pub fn move_to(&mut self, y: f64) {
        self.y = y;
    }

    pub fn remaining(&self) -> f64 {
        self.bottom - self.y
    }

    /// Start a new page unless `needed` millimetres fit below the cursor.
    /// Returns whether a page was added.
    pub fn ensure_space<S: DocumentSurface>(&mut self, surface: &mut S, needed: f64) -> RendererResult<bool> {
        if self.remaining() >= needed {
            return Ok(false);
        }
        let page = surface.add_page()?;
        debug!("page break before {:.1} mm block, continuing on page {}", needed, page);
        self.y = self.top;
        Ok(true)
    }
}
