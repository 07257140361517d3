//! Host environment contracts
//!
//! The game never touches the terminal, clock or RNG directly. Everything it
//! borrows from the surrounding multi-game host goes through these traits:
//! - `Display`: character-grid output
//! - `Scheduler`: cooperative periodic tasks
//! - `RandomRange`: inclusive random ranges
//! - `InputPort`: single-character receiver registration
//! - `GameDirectory`: the host's game menu
//!
//! The submodules provide in-process implementations of each.

pub mod console;
pub mod directory;
pub mod grid;
pub mod random;
pub mod scheduler;
pub mod terminal;

pub use console::Console;
pub use directory::Directory;
pub use grid::GridBuffer;
pub use random::PcgRandom;
pub use scheduler::TaskQueue;
pub use terminal::Terminal;

use crate::sim::Task;

/// One character cell's content
pub type Glyph = char;

/// Character-grid output surface
pub trait Display {
    /// Overwrite one grid cell
    fn set_glyph(&mut self, glyph: Glyph, x: u16, y: u16);
    /// Write a line of text starting at a cell
    fn print_at(&mut self, text: &str, x: u16, y: u16);
    fn clear(&mut self);
    fn show_cursor(&mut self);
    fn hide_cursor(&mut self);
    /// Audible alert
    fn bell(&mut self);
    /// True while earlier writes are still going out
    fn is_transmitting(&self) -> bool {
        false
    }
}

/// Opaque handle returned at schedule time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskHandle(u64);

impl TaskHandle {
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Cooperative periodic-task scheduler
///
/// Callbacks run one at a time and to completion, so a task may schedule or
/// cancel other tasks (itself included) while it runs.
pub trait Scheduler {
    /// Run `task` after `delay_ms`, then every `period_ms` (0 = one-shot)
    fn schedule(&mut self, task: Task, delay_ms: u32, period_ms: u32) -> TaskHandle;
    /// Cancel a scheduled task. Returns false if it was not scheduled.
    fn cancel(&mut self, handle: TaskHandle) -> bool;
}

/// Random number source
pub trait RandomRange {
    /// Uniform value in `[min, max]`
    fn uniform(&mut self, min: u32, max: u32) -> u32;
}

/// Single-character input delivery
pub trait InputPort {
    fn register_receiver(&mut self);
    fn unregister_receiver(&mut self);
}

/// Everything a running game needs from the host
pub trait Host: Display + Scheduler + RandomRange + InputPort {}

impl<T: Display + Scheduler + RandomRange + InputPort + ?Sized> Host for T {}

/// Id handed out by the game directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GameId(pub u8);

/// Menu entry registered by a game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameEntry {
    pub name: &'static str,
    pub description: &'static str,
}

/// The host's game menu
pub trait GameDirectory {
    fn register(&mut self, entry: GameEntry) -> GameId;
}
