//! Session state and core simulation types
//!
//! One `Session` owns everything a running game mutates; every component
//! operation takes it by reference.

use super::store::{SlotId, Slots, Sprite};
use crate::Position;
use crate::consts::*;
use crate::host::{Glyph, TaskHandle};
use crate::settings::Settings;

/// Callbacks the game hands to the scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Task {
    /// Spawn an obstacle and re-chain
    SpawnObstacle,
    /// Spawn a bonus and re-chain
    SpawnBonus,
    /// Step one obstacle left
    MoveObstacle(SlotId),
    /// Step one bonus left
    MoveBonus(SlotId),
    /// Jump: one row up
    Rise,
    /// Jump: one row down
    Fall,
}

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    /// Registered, never started
    #[default]
    Idle,
    /// Active gameplay
    Running,
    /// Session ended, waiting for a restart
    Over,
}

/// Jump state machine; airborne states carry the motion task driving them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JumpState {
    #[default]
    Ground,
    Rising(TaskHandle),
    Falling(TaskHandle),
}

impl JumpState {
    pub fn is_airborne(&self) -> bool {
        !matches!(self, JumpState::Ground)
    }

    /// Task currently driving the jump, if any
    pub fn task(&self) -> Option<TaskHandle> {
        match self {
            JumpState::Ground => None,
            JumpState::Rising(handle) | JumpState::Falling(handle) => Some(*handle),
        }
    }
}

/// The player
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub pos: Position,
    pub glyph: Glyph,
    /// Score for the round
    pub score: u32,
    /// Obstacles cleared (drives difficulty)
    pub obstacles_passed: u32,
    pub jump: JumpState,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: Position::new(PLAYER_X, GROUND_ROW),
            glyph: PLAYER_GLYPH,
            score: 0,
            obstacles_passed: 0,
            jump: JumpState::Ground,
        }
    }
}

/// An obstacle rolling toward the player
#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    pub pos: Position,
    pub glyph: Glyph,
    /// Pending motion tick
    pub motion: Option<TaskHandle>,
}

impl Obstacle {
    pub fn new(pos: Position) -> Self {
        Self {
            pos,
            glyph: OBSTACLE_GLYPH,
            motion: None,
        }
    }
}

/// A floating bonus worth `value` points
#[derive(Debug, Clone, PartialEq)]
pub struct Bonus {
    pub pos: Position,
    pub glyph: Glyph,
    pub value: u32,
    /// Pending motion tick
    pub motion: Option<TaskHandle>,
}

impl Bonus {
    pub fn new(pos: Position, value: u32) -> Self {
        Self {
            pos,
            glyph: BONUS_GLYPH,
            value,
            motion: None,
        }
    }
}

impl Sprite for Obstacle {
    fn position(&self) -> Position {
        self.pos
    }

    fn glyph(&self) -> Glyph {
        self.glyph
    }
}

impl Sprite for Bonus {
    fn position(&self) -> Position {
        self.pos
    }

    fn glyph(&self) -> Glyph {
        self.glyph
    }
}

/// Pending spawner tasks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Spawners {
    pub obstacle: Option<TaskHandle>,
    pub bonus: Option<TaskHandle>,
}

/// Complete session context
#[derive(Debug, Clone)]
pub struct Session {
    pub settings: Settings,
    pub phase: SessionPhase,
    pub player: Player,
    pub obstacles: Slots<Obstacle, MAX_OBSTACLES>,
    pub bonuses: Slots<Bonus, MAX_BONUSES>,
    /// Shared tick period of every obstacle in flight
    pub obstacle_period_ms: u32,
    /// Shared tick period of every bonus in flight
    pub bonus_period_ms: u32,
    pub spawners: Spawners,
}

impl Session {
    pub fn new(settings: Settings) -> Self {
        let settings = settings.validated();
        let base = settings.base_move_period_ms;
        Self {
            settings,
            phase: SessionPhase::Idle,
            player: Player::default(),
            obstacles: Slots::new(),
            bonuses: Slots::new(),
            obstacle_period_ms: base,
            bonus_period_ms: base,
            spawners: Spawners::default(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase == SessionPhase::Running
    }

    /// Back to the start-of-session values (slots must already be empty)
    pub fn reset(&mut self) {
        self.player = Player::default();
        self.obstacle_period_ms = self.settings.base_move_period_ms;
        self.bonus_period_ms = self.settings.base_move_period_ms;
        self.spawners = Spawners::default();
    }
}
