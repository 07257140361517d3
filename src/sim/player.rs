//! Jump controller
//!
//! Ground -> Rising -> Falling -> Ground. Each airborne state is driven by
//! one recurring task; only one of them exists at a time.

use super::state::{JumpState, Session, Task};
use crate::consts::*;
use crate::host::Host;

/// Start a jump (ignored unless standing on the ground)
pub fn jump(session: &mut Session, host: &mut impl Host) {
    if session.player.jump.is_airborne() {
        log::debug!("jump ignored while airborne");
        return;
    }
    let period = session.settings.jump_period_ms;
    let handle = host.schedule(Task::Rise, 0, period);
    session.player.jump = JumpState::Rising(handle);
}

/// Move the player one row, redrawing both cells
fn step(session: &mut Session, host: &mut impl Host, up: bool) {
    let player = &mut session.player;
    host.set_glyph(BLANK, player.pos.x, player.pos.y);
    player.pos.y = if up {
        player.pos.y.saturating_sub(1).max(APEX_ROW)
    } else {
        (player.pos.y + 1).min(GROUND_ROW)
    };
    host.set_glyph(player.glyph, player.pos.x, player.pos.y);
}

pub fn rise(session: &mut Session, host: &mut impl Host) {
    let JumpState::Rising(handle) = session.player.jump else {
        log::debug!("stale rise tick");
        return;
    };
    step(session, host, true);

    if session.player.pos.y <= APEX_ROW {
        host.cancel(handle);
        let settings = &session.settings;
        let fall = host.schedule(Task::Fall, settings.apex_hang_ms, settings.jump_period_ms);
        session.player.jump = JumpState::Falling(fall);
    }
}

pub fn fall(session: &mut Session, host: &mut impl Host) {
    let JumpState::Falling(handle) = session.player.jump else {
        log::debug!("stale fall tick");
        return;
    };
    step(session, host, false);

    if session.player.pos.y >= GROUND_ROW {
        host.cancel(handle);
        session.player.jump = JumpState::Ground;
    }
}
