//! Obstacle and bonus spawning
//!
//! Each spawner retunes the shared speed for its entity kind, places a new
//! entity if a slot is free, then re-chains itself after a random delay.

use super::state::{Bonus, Obstacle, Session, Task};
use crate::Position;
use crate::consts::*;
use crate::host::Host;
use crate::settings::Settings;

/// Move period for the current difficulty, never below the configured floor
pub fn move_period(settings: &Settings, obstacles_passed: u32) -> u32 {
    let speedup = settings.difficulty_step_ms.saturating_mul(obstacles_passed);
    settings
        .base_move_period_ms
        .saturating_sub(speedup)
        .max(settings.min_move_period_ms)
        .max(1)
}

pub fn spawn_obstacle(session: &mut Session, host: &mut impl Host) {
    let period = move_period(&session.settings, session.player.obstacles_passed);
    // Obstacles already in flight pick this up on their next tick
    session.obstacle_period_ms = period;

    let pos = Position::new(SPAWN_X, GROUND_ROW);
    match session.obstacles.allocate(Obstacle::new(pos)) {
        Ok(slot) => {
            let handle = host.schedule(Task::MoveObstacle(slot), period, 0);
            if let Some(obstacle) = session.obstacles.get_mut(slot) {
                obstacle.motion = Some(handle);
            }
            host.set_glyph(OBSTACLE_GLYPH, pos.x, pos.y);
            log::debug!("obstacle spawned in slot {} (period {period} ms)", slot.index());
        }
        Err(_) => log::debug!("obstacle slots full, spawn skipped"),
    }

    let delay = host.uniform(
        session.settings.min_obstacle_rate_ms,
        session.settings.max_obstacle_rate_ms,
    );
    session.spawners.obstacle = Some(host.schedule(Task::SpawnObstacle, delay, 0));
}

pub fn spawn_bonus(session: &mut Session, host: &mut impl Host) {
    let period = move_period(&session.settings, session.player.obstacles_passed);
    session.bonus_period_ms = period;

    let pos = Position::new(SPAWN_X, BONUS_ROW);
    let value = session.settings.bonus_value;
    match session.bonuses.allocate(Bonus::new(pos, value)) {
        Ok(slot) => {
            let handle = host.schedule(Task::MoveBonus(slot), period, 0);
            if let Some(bonus) = session.bonuses.get_mut(slot) {
                bonus.motion = Some(handle);
            }
            host.set_glyph(BONUS_GLYPH, pos.x, pos.y);
            log::debug!("bonus spawned in slot {} (period {period} ms)", slot.index());
        }
        Err(_) => log::debug!("bonus slots full, spawn skipped"),
    }

    let delay = host.uniform(
        session.settings.min_bonus_rate_ms,
        session.settings.max_bonus_rate_ms,
    );
    session.spawners.bonus = Some(host.schedule(Task::SpawnBonus, delay, 0));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{Console, GridBuffer};
    use crate::sim::state::SessionPhase;

    fn running() -> (Session, Console<GridBuffer>) {
        let mut session = Session::new(Settings::default());
        session.phase = SessionPhase::Running;
        (session, Console::new(GridBuffer::new(90, 10), 12345))
    }

    #[test]
    fn test_move_period_ramps_and_clamps() {
        let settings = Settings::default();
        assert_eq!(move_period(&settings, 0), 250);
        assert_eq!(move_period(&settings, 1), 248);
        assert_eq!(move_period(&settings, 100), 50);
        assert_eq!(move_period(&settings, 125), 1);
        assert_eq!(move_period(&settings, 10_000), 1);
        assert_eq!(move_period(&settings, u32::MAX), 1);

        let floored = Settings {
            min_move_period_ms: 60,
            ..Settings::default()
        };
        assert_eq!(move_period(&floored, 100), 60);
    }

    #[test]
    fn test_spawn_obstacle_places_and_rechains() {
        let (mut session, mut host) = running();
        spawn_obstacle(&mut session, &mut host);

        let (slot, obstacle) = session.obstacles.active().next().unwrap();
        assert_eq!(slot.index(), 0);
        assert_eq!(obstacle.pos, Position::new(79, 5));
        assert!(obstacle.motion.is_some());
        assert_eq!(host.display().glyph_at(79, 5), 'o');

        let queue = host.scheduler();
        assert_eq!(queue.count_matching(|t| matches!(t, Task::MoveObstacle(_))), 1);
        assert_eq!(queue.count_matching(|t| *t == Task::SpawnObstacle), 1);
        assert!(queue.contains(session.spawners.obstacle.unwrap()));
    }

    #[test]
    fn test_spawn_retunes_shared_speed() {
        let (mut session, mut host) = running();
        spawn_obstacle(&mut session, &mut host);
        assert_eq!(session.obstacle_period_ms, 250);

        session.player.obstacles_passed = 10;
        spawn_obstacle(&mut session, &mut host);
        assert_eq!(session.obstacle_period_ms, 230);
        assert_eq!(session.obstacles.active_count(), 2);
    }

    #[test]
    fn test_full_store_still_retunes_and_rechains() {
        let (mut session, mut host) = running();
        for _ in 0..MAX_OBSTACLES {
            spawn_obstacle(&mut session, &mut host);
        }
        assert!(session.obstacles.is_full());

        session.player.obstacles_passed = 5;
        let previous = session.spawners.obstacle;
        spawn_obstacle(&mut session, &mut host);

        assert_eq!(session.obstacles.active_count(), MAX_OBSTACLES);
        assert_eq!(session.obstacle_period_ms, 240);
        assert_ne!(session.spawners.obstacle, previous);
        let queue = host.scheduler();
        assert_eq!(
            queue.count_matching(|t| matches!(t, Task::MoveObstacle(_))),
            MAX_OBSTACLES
        );
    }

    #[test]
    fn test_spawn_bonus_floats_at_apex() {
        let (mut session, mut host) = running();
        spawn_bonus(&mut session, &mut host);
        spawn_bonus(&mut session, &mut host);
        spawn_bonus(&mut session, &mut host);

        assert_eq!(session.bonuses.active_count(), MAX_BONUSES);
        for (_, bonus) in session.bonuses.active() {
            assert_eq!(bonus.pos, Position::new(79, 2));
            assert_eq!(bonus.value, 10);
        }
        assert_eq!(host.display().glyph_at(79, 2), '*');
    }
}
