//! Host bundle
//!
//! Ties one display to a scheduler, an RNG and the receiver flag, and pumps
//! due tasks into the game one callback at a time.

use super::{Display, Glyph, InputPort, PcgRandom, RandomRange, Scheduler, TaskHandle, TaskQueue};
use crate::sim::{StickRun, Task};

pub struct Console<D: Display> {
    display: D,
    scheduler: TaskQueue,
    random: PcgRandom,
    receiver: bool,
}

impl<D: Display> Console<D> {
    pub fn new(display: D, seed: u64) -> Self {
        Self {
            display,
            scheduler: TaskQueue::new(),
            random: PcgRandom::new(seed),
            receiver: false,
        }
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    pub fn scheduler(&self) -> &TaskQueue {
        &self.scheduler
    }

    /// Whether keypresses should be forwarded to the game
    pub fn receiver_registered(&self) -> bool {
        self.receiver
    }

    /// Run every task due up to `now_ms` (game clock, ms since start)
    pub fn run_until(&mut self, game: &mut StickRun, now_ms: u64) {
        while let Some(task) = self.scheduler.pop_due(now_ms) {
            game.dispatch(task, self);
        }
    }
}

impl<D: Display> Display for Console<D> {
    fn set_glyph(&mut self, glyph: Glyph, x: u16, y: u16) {
        self.display.set_glyph(glyph, x, y);
    }

    fn print_at(&mut self, text: &str, x: u16, y: u16) {
        self.display.print_at(text, x, y);
    }

    fn clear(&mut self) {
        self.display.clear();
    }

    fn show_cursor(&mut self) {
        self.display.show_cursor();
    }

    fn hide_cursor(&mut self) {
        self.display.hide_cursor();
    }

    fn bell(&mut self) {
        self.display.bell();
    }

    fn is_transmitting(&self) -> bool {
        self.display.is_transmitting()
    }
}

impl<D: Display> Scheduler for Console<D> {
    fn schedule(&mut self, task: Task, delay_ms: u32, period_ms: u32) -> TaskHandle {
        self.scheduler.schedule(task, delay_ms, period_ms)
    }

    fn cancel(&mut self, handle: TaskHandle) -> bool {
        self.scheduler.cancel(handle)
    }
}

impl<D: Display> RandomRange for Console<D> {
    fn uniform(&mut self, min: u32, max: u32) -> u32 {
        self.random.uniform(min, max)
    }
}

impl<D: Display> InputPort for Console<D> {
    fn register_receiver(&mut self) {
        self.receiver = true;
    }

    fn unregister_receiver(&mut self) {
        self.receiver = false;
    }
}
