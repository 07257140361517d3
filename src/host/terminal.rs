//! Crossterm-backed terminal display
//!
//! Writes are queued and only go out on `flush`, which the driver calls once
//! per frame.

use std::io::{self, Stdout, Write};

use crossterm::{
    cursor, execute, queue,
    style::Print,
    terminal::{self, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};

use super::{Display, Glyph};

pub struct Terminal {
    out: Stdout,
    raw: bool,
}

impl Terminal {
    /// Take over stdout: raw mode plus the alternate screen
    pub fn enter() -> io::Result<Self> {
        let mut out = io::stdout();
        terminal::enable_raw_mode()?;
        execute!(out, EnterAlternateScreen, terminal::DisableLineWrap)?;
        Ok(Self { out, raw: true })
    }

    /// Hand the terminal back in the state we found it
    pub fn restore(&mut self) -> io::Result<()> {
        if !self.raw {
            return Ok(());
        }
        self.raw = false;
        execute!(
            self.out,
            cursor::Show,
            terminal::EnableLineWrap,
            LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    fn report(result: io::Result<()>) {
        if let Err(err) = result {
            log::warn!("terminal write failed: {err}");
        }
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        Self::report(self.restore());
    }
}

impl Display for Terminal {
    fn set_glyph(&mut self, glyph: Glyph, x: u16, y: u16) {
        Self::report(queue!(self.out, cursor::MoveTo(x, y), Print(glyph)));
    }

    fn print_at(&mut self, text: &str, x: u16, y: u16) {
        Self::report(queue!(self.out, cursor::MoveTo(x, y), Print(text)));
    }

    fn clear(&mut self) {
        Self::report(queue!(self.out, terminal::Clear(ClearType::All)));
    }

    fn show_cursor(&mut self) {
        Self::report(queue!(self.out, cursor::Show));
    }

    fn hide_cursor(&mut self) {
        Self::report(queue!(self.out, cursor::Hide));
    }

    fn bell(&mut self) {
        Self::report(queue!(self.out, Print('\x07')));
    }
}
