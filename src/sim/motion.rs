//! Entity motion and collision
//!
//! Each motion tick moves one entity one cell left and checks the new cell
//! against the player. There is no swept collision: a player and an entity
//! that swap cells within one tick never touch, and the "just passed" check
//! one column behind the player covers the common lane-aligned case.

use super::session;
use super::state::{Session, Task};
use super::store::SlotId;
use crate::Position;
use crate::consts::*;
use crate::host::{Display, Host};

/// Result of checking an entity's new cell against the player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    None,
    /// Obstacle on the player's cell
    Fatal,
    /// Obstacle just left the player's column behind
    Passed,
    /// Bonus on the player's cell
    Pickup,
}

pub fn check_obstacle(obstacle: Position, player: Position) -> Contact {
    if obstacle == player {
        Contact::Fatal
    } else if obstacle.x + 1 == player.x {
        Contact::Passed
    } else {
        Contact::None
    }
}

pub fn check_bonus(bonus: Position, player: Position) -> Contact {
    if bonus == player {
        Contact::Pickup
    } else {
        Contact::None
    }
}

/// Blank a cell, unless the player is standing in it
fn erase(session: &Session, display: &mut impl Display, pos: Position) {
    let glyph = if pos == session.player.pos {
        session.player.glyph
    } else {
        BLANK
    };
    display.set_glyph(glyph, pos.x, pos.y);
}

pub fn advance_obstacle(session: &mut Session, slot: SlotId, host: &mut impl Host) {
    let Some(obstacle) = session.obstacles.get(slot) else {
        log::debug!("stale obstacle tick for slot {}", slot.index());
        return;
    };
    let (old, glyph) = (obstacle.pos, obstacle.glyph);

    if old.x <= LEFT_BOUNDARY {
        retire_obstacle(session, slot, host);
        return;
    }

    erase(session, host, old);
    let new = old.left();
    if let Some(obstacle) = session.obstacles.get_mut(slot) {
        obstacle.pos = new;
    }
    host.set_glyph(glyph, new.x, new.y);

    match check_obstacle(new, session.player.pos) {
        Contact::Fatal => {
            log::info!("obstacle hit the player at ({}, {})", new.x, new.y);
            session::game_over(session, host);
            return;
        }
        Contact::Passed => {
            session::score(session, host, 1);
            session.player.obstacles_passed += 1;
        }
        Contact::None | Contact::Pickup => {}
    }

    // Re-arm at the shared speed so retunes reach obstacles already in flight
    let handle = host.schedule(Task::MoveObstacle(slot), session.obstacle_period_ms, 0);
    if let Some(obstacle) = session.obstacles.get_mut(slot) {
        // At most one pending tick per slot
        if let Some(previous) = obstacle.motion.replace(handle) {
            host.cancel(previous);
        }
    }
}

pub fn advance_bonus(session: &mut Session, slot: SlotId, host: &mut impl Host) {
    let Some(bonus) = session.bonuses.get(slot) else {
        log::debug!("stale bonus tick for slot {}", slot.index());
        return;
    };
    let (old, glyph, value) = (bonus.pos, bonus.glyph, bonus.value);

    if old.x <= LEFT_BOUNDARY {
        retire_bonus(session, slot, host);
        return;
    }

    erase(session, host, old);
    let new = old.left();
    if let Some(bonus) = session.bonuses.get_mut(slot) {
        bonus.pos = new;
    }
    host.set_glyph(glyph, new.x, new.y);

    if check_bonus(new, session.player.pos) == Contact::Pickup {
        session::score(session, host, value);
        retire_bonus(session, slot, host);
        let player = &session.player;
        host.set_glyph(player.glyph, player.pos.x, player.pos.y);
        host.bell();
        log::debug!("bonus picked up (+{value})");
        return;
    }

    let handle = host.schedule(Task::MoveBonus(slot), session.bonus_period_ms, 0);
    if let Some(bonus) = session.bonuses.get_mut(slot) {
        if let Some(previous) = bonus.motion.replace(handle) {
            host.cancel(previous);
        }
    }
}

/// Free an obstacle slot and drop its pending tick
pub fn retire_obstacle(session: &mut Session, slot: SlotId, host: &mut impl Host) {
    if let Some(obstacle) = session.obstacles.release(slot, host) {
        if let Some(handle) = obstacle.motion {
            host.cancel(handle);
        }
        log::debug!("obstacle retired from slot {}", slot.index());
    }
}

/// Free a bonus slot and drop its pending tick
pub fn retire_bonus(session: &mut Session, slot: SlotId, host: &mut impl Host) {
    if let Some(bonus) = session.bonuses.release(slot, host) {
        if let Some(handle) = bonus.motion {
            host.cancel(handle);
        }
        log::debug!("bonus retired from slot {}", slot.index());
    }
}
