//! In-memory character grid
//!
//! Headless display used by tests: keeps every cell plus the bell count and
//! cursor visibility so assertions can inspect what the game drew. It can
//! also pretend to be mid-transmission for a number of availability polls.

use std::cell::Cell;

use super::{Display, Glyph};

#[derive(Debug, Clone)]
pub struct GridBuffer {
    width: u16,
    height: u16,
    cells: Vec<Glyph>,
    bells: u32,
    cursor_visible: bool,
    busy_polls: Cell<u32>,
}

impl GridBuffer {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![' '; usize::from(width) * usize::from(height)],
            bells: 0,
            cursor_visible: true,
            busy_polls: Cell::new(0),
        }
    }

    fn index(&self, x: u16, y: u16) -> Option<usize> {
        (x < self.width && y < self.height)
            .then(|| usize::from(y) * usize::from(self.width) + usize::from(x))
    }

    /// Glyph at a cell (blank outside the grid)
    pub fn glyph_at(&self, x: u16, y: u16) -> Glyph {
        self.index(x, y).map(|i| self.cells[i]).unwrap_or(' ')
    }

    /// A full row with trailing blanks trimmed
    pub fn row_text(&self, y: u16) -> String {
        let row: String = (0..self.width).map(|x| self.glyph_at(x, y)).collect();
        row.trim_end().to_string()
    }

    pub fn bells(&self) -> u32 {
        self.bells
    }

    pub fn cursor_visible(&self) -> bool {
        self.cursor_visible
    }

    /// Report busy for the next `polls` calls to `is_transmitting`
    pub fn set_busy_polls(&mut self, polls: u32) {
        self.busy_polls.set(polls);
    }

    /// Busy polls still outstanding
    pub fn busy_polls(&self) -> u32 {
        self.busy_polls.get()
    }
}

impl Display for GridBuffer {
    fn set_glyph(&mut self, glyph: Glyph, x: u16, y: u16) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = glyph;
        }
    }

    fn print_at(&mut self, text: &str, x: u16, y: u16) {
        for (offset, ch) in text.chars().enumerate() {
            let Ok(offset) = u16::try_from(offset) else {
                break;
            };
            self.set_glyph(ch, x.saturating_add(offset), y);
        }
    }

    fn clear(&mut self) {
        self.cells.fill(' ');
    }

    fn show_cursor(&mut self) {
        self.cursor_visible = true;
    }

    fn hide_cursor(&mut self) {
        self.cursor_visible = false;
    }

    fn bell(&mut self) {
        self.bells += 1;
    }

    fn is_transmitting(&self) -> bool {
        let polls = self.busy_polls.get();
        self.busy_polls.set(polls.saturating_sub(1));
        polls > 0
    }
}
