//! StickRun - A side-scrolling run and jump minigame
//!
//! Core modules:
//! - `sim`: Entity simulation (spawning, motion, collisions, jump, session)
//! - `host`: Contracts for the surrounding multi-game host plus in-process
//!   implementations (scheduler, RNG, terminal and in-memory displays)
//! - `settings`: Data-driven game tuning

pub mod host;
pub mod settings;
pub mod sim;

pub use settings::Settings;
pub use sim::StickRun;

/// Game configuration constants
pub mod consts {
    use crate::host::Glyph;

    /// Play field dimensions (border included)
    pub const MAP_WIDTH: u16 = 80;
    pub const MAP_HEIGHT: u16 = 6;

    /// Row the player runs on and obstacles roll along
    pub const GROUND_ROW: u16 = MAP_HEIGHT - 1;
    /// Rows climbed during a jump
    pub const JUMP_HEIGHT: u16 = 3;
    /// Topmost row of a jump
    pub const APEX_ROW: u16 = GROUND_ROW - JUMP_HEIGHT;
    /// Bonuses float at jump height
    pub const BONUS_ROW: u16 = APEX_ROW;

    /// Column new entities appear in
    pub const SPAWN_X: u16 = MAP_WIDTH - 1;
    /// Entities reaching this column are retired on their next tick
    pub const LEFT_BOUNDARY: u16 = 1;
    /// Fixed player column
    pub const PLAYER_X: u16 = 10;

    /// Slot capacities (cap on-screen entity count)
    pub const MAX_OBSTACLES: usize = 8;
    pub const MAX_BONUSES: usize = 2;

    /// Score header position
    pub const SCORE_X: u16 = 1;
    pub const SCORE_Y: u16 = 1;

    pub const PLAYER_GLYPH: Glyph = '▓';
    pub const OBSTACLE_GLYPH: Glyph = 'o';
    pub const BONUS_GLYPH: Glyph = '*';
    pub const BLANK: Glyph = ' ';

    /// Border box-drawing glyphs
    pub const BORDER_TOP_LEFT: Glyph = '╔';
    pub const BORDER_TOP_RIGHT: Glyph = '╗';
    pub const BORDER_BOTTOM_RIGHT: Glyph = '╝';
    pub const BORDER_BOTTOM_LEFT: Glyph = '╚';
    pub const BORDER_HORIZONTAL: Glyph = '═';
    pub const BORDER_VERTICAL: Glyph = '║';

    /// The only key the game reacts to
    pub const JUMP_KEY: char = ' ';

    pub const GAME_NAME: &str = "StickRun";
    pub const GAME_DESCRIPTION: &str = "A run and jump game...fun...";
    pub const HELP_TEXT: &str = "Press SPACEBAR to jump over obstacles as they appear.";
}

/// A cell on the character grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub x: u16,
    pub y: u16,
}

impl Position {
    #[inline]
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }

    /// One cell to the left (saturates at column 0)
    #[inline]
    pub const fn left(self) -> Self {
        Self {
            x: self.x.saturating_sub(1),
            y: self.y,
        }
    }
}
