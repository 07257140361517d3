//! Session lifecycle
//!
//! `start` and `game_over` are the only places the player is reset or
//! finalized. `game_over` is the single teardown path and may be called from
//! inside a motion callback.

use super::motion;
use super::player;
use super::spawner;
use super::state::{JumpState, Session, SessionPhase, Task};
use crate::Position;
use crate::consts::*;
use crate::host::{Display, GameDirectory, GameEntry, GameId, Host};
use crate::settings::Settings;

/// Draw the play field border, corners first on each edge
fn draw_border(display: &mut impl Display, min: Position, max: Position) {
    display.set_glyph(BORDER_TOP_LEFT, min.x, min.y);
    for x in min.x + 1..max.x {
        display.set_glyph(BORDER_HORIZONTAL, x, min.y);
    }
    display.set_glyph(BORDER_TOP_RIGHT, max.x, min.y);
    for y in min.y + 1..max.y {
        display.set_glyph(BORDER_VERTICAL, max.x, y);
    }

    // Let the first half drain before the second burst of writes
    while display.is_transmitting() {
        std::thread::yield_now();
    }

    display.set_glyph(BORDER_BOTTOM_RIGHT, max.x, max.y);
    for x in min.x + 1..max.x {
        display.set_glyph(BORDER_HORIZONTAL, x, max.y);
    }
    display.set_glyph(BORDER_BOTTOM_LEFT, min.x, max.y);
    for y in min.y + 1..max.y {
        display.set_glyph(BORDER_VERTICAL, min.x, y);
    }
}

fn draw_score(session: &Session, display: &mut impl Display) {
    let text = format!("Score: {}", session.player.score);
    display.print_at(&text, SCORE_X, SCORE_Y);
}

/// Cancel every outstanding task and empty the slots
fn teardown(session: &mut Session, host: &mut impl Host) {
    for obstacle in session.obstacles.release_all(host) {
        if let Some(handle) = obstacle.motion {
            host.cancel(handle);
        }
    }
    for bonus in session.bonuses.release_all(host) {
        if let Some(handle) = bonus.motion {
            host.cancel(handle);
        }
    }
    let spawners = std::mem::take(&mut session.spawners);
    for handle in [spawners.obstacle, spawners.bonus].into_iter().flatten() {
        host.cancel(handle);
    }
    if let Some(handle) = session.player.jump.task() {
        host.cancel(handle);
    }
    // The player stays where it was; only the motion driving it is gone
    session.player.jump = JumpState::Ground;

    // Releasing an entity on the player's cell blanked it
    let player = &session.player;
    host.set_glyph(player.glyph, player.pos.x, player.pos.y);
}

/// Begin a fresh session
pub fn start(session: &mut Session, host: &mut impl Host) {
    if session.is_running() {
        log::warn!("restarting a running session");
        teardown(session, host);
    }
    session.reset();

    host.clear();
    draw_border(host, Position::new(0, 0), Position::new(MAP_WIDTH, MAP_HEIGHT));

    let player = &session.player;
    host.set_glyph(player.glyph, player.pos.x, player.pos.y);
    draw_score(session, host);

    host.register_receiver();
    host.hide_cursor();

    let settings = &session.settings;
    let first_obstacle = host.schedule(Task::SpawnObstacle, settings.first_obstacle_delay_ms, 0);
    let first_bonus_delay = host.uniform(settings.min_bonus_rate_ms, settings.max_bonus_rate_ms);
    let first_bonus = host.schedule(Task::SpawnBonus, first_bonus_delay, 0);
    session.spawners.obstacle = Some(first_obstacle);
    session.spawners.bonus = Some(first_bonus);

    session.phase = SessionPhase::Running;
    log::info!("session started (first bonus in {first_bonus_delay} ms)");
}

/// Award points and redraw the score header
pub fn score(session: &mut Session, display: &mut impl Display, points: u32) {
    session.player.score = session.player.score.saturating_add(points);
    draw_score(session, display);
}

/// End the session. Safe to call more than once.
pub fn game_over(session: &mut Session, host: &mut impl Host) {
    if !session.is_running() {
        return;
    }
    session.phase = SessionPhase::Over;
    teardown(session, host);

    host.bell();
    let text = format!("Game Over! Final score: {}", session.player.score);
    host.print_at(&text, 0, MAP_HEIGHT + 1);
    host.unregister_receiver();
    host.show_cursor();

    log::info!(
        "game over: score {} after {} obstacles",
        session.player.score,
        session.player.obstacles_passed
    );
}

/// The registered game: identity in the host menu plus its session
#[derive(Debug, Clone)]
pub struct StickRun {
    id: GameId,
    session: Session,
}

impl StickRun {
    /// Register with the host's game directory
    pub fn init(directory: &mut impl GameDirectory, settings: Settings) -> Self {
        let id = directory.register(GameEntry {
            name: GAME_NAME,
            description: GAME_DESCRIPTION,
        });
        Self {
            id,
            session: Session::new(settings),
        }
    }

    pub fn id(&self) -> GameId {
        self.id
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Start callback
    pub fn play(&mut self, host: &mut impl Host) {
        start(&mut self.session, host);
    }

    /// Help callback
    pub fn help(&self, display: &mut impl Display, x: u16, y: u16) {
        display.print_at(HELP_TEXT, x, y);
    }

    /// Input receiver; only the jump key does anything
    pub fn receive(&mut self, key: char, host: &mut impl Host) {
        if self.session.is_running() && key == JUMP_KEY {
            player::jump(&mut self.session, host);
        }
    }

    /// End the session from outside (host quitting mid-game)
    pub fn game_over(&mut self, host: &mut impl Host) {
        game_over(&mut self.session, host);
    }

    /// Scheduler entry point
    pub fn dispatch(&mut self, task: Task, host: &mut impl Host) {
        if !self.session.is_running() {
            log::debug!("dropping {task:?} outside a running session");
            return;
        }
        let session = &mut self.session;
        match task {
            Task::SpawnObstacle => spawner::spawn_obstacle(session, host),
            Task::SpawnBonus => spawner::spawn_bonus(session, host),
            Task::MoveObstacle(slot) => motion::advance_obstacle(session, slot, host),
            Task::MoveBonus(slot) => motion::advance_bonus(session, slot, host),
            Task::Rise => player::rise(session, host),
            Task::Fall => player::fall(session, host),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{Console, Directory, GridBuffer};
    use proptest::prelude::*;

    fn new_game(seed: u64) -> (StickRun, Console<GridBuffer>) {
        let mut directory = Directory::new();
        let game = StickRun::init(&mut directory, Settings::default());
        (game, Console::new(GridBuffer::new(90, 12), seed))
    }

    #[test]
    fn test_registration() {
        let mut directory = Directory::new();
        let game = StickRun::init(&mut directory, Settings::default());
        let entry = directory.get(game.id()).unwrap();
        assert_eq!(entry.name, "StickRun");
        assert_eq!(entry.description, "A run and jump game...fun...");
    }

    #[test]
    fn test_help_text() {
        let (game, mut host) = new_game(1);
        game.help(&mut host, 0, 0);
        assert_eq!(
            host.display().row_text(0),
            "Press SPACEBAR to jump over obstacles as they appear."
        );
    }

    #[test]
    fn test_start_draws_field() {
        let (mut game, mut host) = new_game(1);
        game.play(&mut host);
        let grid = host.display();

        assert_eq!(grid.glyph_at(0, 0), '╔');
        assert_eq!(grid.glyph_at(80, 0), '╗');
        assert_eq!(grid.glyph_at(80, 6), '╝');
        assert_eq!(grid.glyph_at(0, 6), '╚');
        assert_eq!(grid.glyph_at(40, 0), '═');
        assert_eq!(grid.glyph_at(0, 3), '║');
        assert_eq!(grid.glyph_at(PLAYER_X, GROUND_ROW), PLAYER_GLYPH);
        assert!(grid.row_text(1).starts_with("║Score: 0"));
        assert!(!grid.cursor_visible());
        assert!(host.receiver_registered());

        let session = game.session();
        assert_eq!(session.phase, SessionPhase::Running);
        assert_eq!(session.player.pos, Position::new(10, 5));
        let queue = host.scheduler();
        assert_eq!(queue.len(), 2);
        assert!(queue.contains(session.spawners.obstacle.unwrap()));
        assert!(queue.contains(session.spawners.bonus.unwrap()));
    }

    #[test]
    fn test_first_obstacle_after_five_seconds() {
        let (mut game, mut host) = new_game(1);
        game.play(&mut host);

        host.run_until(&mut game, 4999);
        assert_eq!(game.session().obstacles.active_count(), 0);
        host.run_until(&mut game, 5000);
        assert_eq!(game.session().obstacles.active_count(), 1);
        assert_eq!(host.display().glyph_at(SPAWN_X, GROUND_ROW), 'o');
    }

    #[test]
    fn test_standing_still_loses() {
        let (mut game, mut host) = new_game(7);
        game.play(&mut host);

        host.run_until(&mut game, 120_000);
        let session = game.session();
        assert_eq!(session.phase, SessionPhase::Over);
        assert_eq!(session.obstacles.active_count(), 0);
        assert_eq!(session.bonuses.active_count(), 0);
        assert!(host.scheduler().is_empty(), "no task may outlive the session");
        assert!(!host.receiver_registered());
        assert!(host.display().cursor_visible());
        assert!(host.display().row_text(MAP_HEIGHT + 1).starts_with("Game Over! Final score: "));
        assert!(host.display().bells() >= 1);
    }

    #[test]
    fn test_game_over_is_idempotent() {
        let (mut game, mut host) = new_game(3);
        game.play(&mut host);
        game.receive(JUMP_KEY, &mut host);
        host.run_until(&mut game, 100);

        game.game_over(&mut host);
        let bells = host.display().bells();
        let score = game.session().player.score;
        assert!(host.scheduler().is_empty());

        game.game_over(&mut host);
        assert_eq!(host.display().bells(), bells);
        assert_eq!(game.session().player.score, score);
        assert!(host.scheduler().is_empty());
    }

    #[test]
    fn test_game_over_mid_jump_drops_jump_task() {
        let (mut game, mut host) = new_game(3);
        game.play(&mut host);
        game.receive(JUMP_KEY, &mut host);
        host.run_until(&mut game, 100);
        assert!(matches!(game.session().player.jump, JumpState::Rising(_)));

        game.game_over(&mut host);
        let player = &game.session().player;
        assert_eq!(player.jump, JumpState::Ground);
        assert_eq!(player.pos.y, 3);
        assert_eq!(host.display().glyph_at(PLAYER_X, 3), PLAYER_GLYPH);
        assert!(host.scheduler().is_empty());
    }

    #[test]
    fn test_border_waits_for_busy_display() {
        let (mut game, mut host) = new_game(1);
        host.display_mut().set_busy_polls(3);
        game.play(&mut host);

        let grid = host.display();
        assert_eq!(grid.busy_polls(), 0, "drain loop polled until idle");
        assert_eq!(grid.glyph_at(80, 6), '╝');
        assert_eq!(grid.glyph_at(0, 6), '╚');
        assert_eq!(grid.glyph_at(0, 3), '║');
    }

    #[test]
    fn test_input_ignored_after_game_over() {
        let (mut game, mut host) = new_game(3);
        game.play(&mut host);
        game.game_over(&mut host);

        game.receive(JUMP_KEY, &mut host);
        assert!(host.scheduler().is_empty());
        assert_eq!(game.session().player.jump, JumpState::Ground);
    }

    #[test]
    fn test_restart_resets_session() {
        let (mut game, mut host) = new_game(9);
        game.play(&mut host);
        host.run_until(&mut game, 120_000);
        assert_eq!(game.session().phase, SessionPhase::Over);

        game.play(&mut host);
        let session = game.session();
        assert_eq!(session.phase, SessionPhase::Running);
        assert_eq!(session.player.score, 0);
        assert_eq!(session.player.obstacles_passed, 0);
        assert_eq!(session.obstacle_period_ms, 250);
        assert_eq!(host.scheduler().len(), 2);
        assert_eq!(host.display().row_text(MAP_HEIGHT + 1), "");
    }

    #[test]
    fn test_restart_while_running_drops_old_tasks() {
        let (mut game, mut host) = new_game(9);
        game.play(&mut host);
        host.run_until(&mut game, 6000);
        game.receive(JUMP_KEY, &mut host);

        game.play(&mut host);
        assert_eq!(host.scheduler().len(), 2);
        assert_eq!(game.session().obstacles.active_count(), 0);
        assert_eq!(host.display().bells(), 0);
    }

    #[test]
    fn test_same_seed_same_session() {
        let (mut a, mut host_a) = new_game(99999);
        let (mut b, mut host_b) = new_game(99999);
        a.play(&mut host_a);
        b.play(&mut host_b);

        for now in (0..60_000).step_by(50) {
            if now % 700 == 0 {
                a.receive(JUMP_KEY, &mut host_a);
                b.receive(JUMP_KEY, &mut host_b);
            }
            host_a.run_until(&mut a, now);
            host_b.run_until(&mut b, now);
        }

        assert_eq!(a.session().player, b.session().player);
        assert_eq!(a.session().phase, b.session().phase);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_session_invariants(
            seed in any::<u64>(),
            jumps in prop::collection::vec(0u64..60_000, 0..80),
        ) {
            let (mut game, mut host) = new_game(seed);
            game.play(&mut host);

            let mut last_score = 0;
            let mut last_x: Vec<Option<u16>> = vec![None; MAX_OBSTACLES];
            let mut bells_at_over = None;

            for now in (0..60_000u64).step_by(10) {
                if jumps.iter().any(|t| t / 10 == now / 10) {
                    game.receive(JUMP_KEY, &mut host);
                }
                host.run_until(&mut game, now);
                let session = game.session();

                prop_assert!(session.player.score >= last_score);
                last_score = session.player.score;

                let y = session.player.pos.y;
                prop_assert!((APEX_ROW..=GROUND_ROW).contains(&y));
                if session.is_running() {
                    match session.player.jump {
                        JumpState::Ground => {
                            prop_assert_eq!(y, GROUND_ROW);
                        }
                        JumpState::Rising(_) => {
                            prop_assert!(y > APEX_ROW);
                        }
                        JumpState::Falling(_) => {
                            prop_assert!(y < GROUND_ROW);
                        }
                    }
                }
                let airborne = host.scheduler().count_matching(|t| matches!(t, Task::Rise | Task::Fall));
                prop_assert!(airborne <= 1);

                for (slot, obstacle) in session.obstacles.active() {
                    prop_assert!(obstacle.pos.x >= LEFT_BOUNDARY);
                    if let Some(prev) = last_x[slot.index()] {
                        // A slot freed at the boundary may be refilled at the spawn column
                        let respawned = prev == LEFT_BOUNDARY && obstacle.pos.x == SPAWN_X;
                        prop_assert!(obstacle.pos.x <= prev || respawned);
                    }
                }
                last_x = vec![None; MAX_OBSTACLES];
                for (slot, obstacle) in session.obstacles.active() {
                    last_x[slot.index()] = Some(obstacle.pos.x);
                }
                for (_, bonus) in session.bonuses.active() {
                    prop_assert!(bonus.pos.x >= LEFT_BOUNDARY);
                }

                if session.phase == SessionPhase::Over {
                    let bells = host.display().bells();
                    match bells_at_over {
                        None => bells_at_over = Some(bells),
                        Some(expected) => {
                            prop_assert_eq!(bells, expected);
                        }
                    }
                    prop_assert!(host.scheduler().is_empty());
                }
            }
        }
    }
}
