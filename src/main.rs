//! StickRun entry point
//!
//! Plays the part of the host: owns the terminal, lists the game menu,
//! forwards keypresses and pumps the scheduler from the wall clock.
//!
//! Logs go to a file (`STICKRUN_LOG`, default `stickrun.log`) because stderr
//! shares the raw-mode screen with the game.

use std::ffi::OsString;
use std::fs::File;
use std::path::PathBuf;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::Context;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use stickrun::consts::MAP_HEIGHT;
use stickrun::host::{Console, Directory, Display, Terminal};
use stickrun::{Settings, StickRun};

/// Input poll timeout (also the frame pacing)
const POLL_INTERVAL: Duration = Duration::from_millis(5);

const DEFAULT_LOG_FILE: &str = "stickrun.log";

fn log_path(var: Option<OsString>) -> PathBuf {
    var.filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE))
}

fn init_logging() {
    let mut builder = env_logger::Builder::from_default_env();
    let path = log_path(std::env::var_os("STICKRUN_LOG"));
    match File::options().create(true).append(true).open(&path) {
        Ok(file) => {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
        Err(err) => {
            // Raw mode is not on yet, so stderr is still readable
            eprintln!("logging disabled: cannot open {}: {err}", path.display());
            builder.filter_level(log::LevelFilter::Off);
        }
    }
    builder.init();
}

enum Action {
    Key(char),
    Restart,
    Quit,
    None,
}

fn read_action() -> anyhow::Result<Action> {
    if !event::poll(POLL_INTERVAL)? {
        return Ok(Action::None);
    }
    let Event::Key(KeyEvent {
        code,
        modifiers,
        kind: KeyEventKind::Press,
        ..
    }) = event::read()?
    else {
        return Ok(Action::None);
    };

    Ok(match code {
        KeyCode::Esc => Action::Quit,
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => Action::Quit,
        KeyCode::Enter => Action::Restart,
        KeyCode::Char(c) => Action::Key(c),
        _ => Action::None,
    })
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0x5eed)
}

fn show_menu(console: &mut Console<Terminal>, directory: &Directory, game: &StickRun) {
    console.clear();
    for (row, entry) in (0u16..).zip(directory.entries()) {
        console.print_at(&format!("{}. {} - {}", row + 1, entry.name, entry.description), 0, row);
    }
    let row = directory.entries().len() as u16 + 1;
    game.help(console, 0, row);
    console.print_at("Press any key to start, Esc to quit.", 0, row + 2);
}

fn run(console: &mut Console<Terminal>, directory: &Directory, game: &mut StickRun) -> anyhow::Result<()> {
    show_menu(console, directory, game);
    console.display_mut().flush()?;
    loop {
        match read_action()? {
            Action::Quit => return Ok(()),
            Action::None => continue,
            Action::Key(_) | Action::Restart => break,
        }
    }

    let clock = Instant::now();
    game.play(console);

    loop {
        let now_ms = clock.elapsed().as_millis() as u64;
        console.run_until(game, now_ms);

        match read_action()? {
            Action::Quit => break,
            Action::Key('q') if !console.receiver_registered() => break,
            Action::Key('r') | Action::Restart if !console.receiver_registered() => {
                game.play(console);
            }
            Action::Key(c) if console.receiver_registered() => game.receive(c, console),
            _ => {}
        }

        console.display_mut().flush()?;
    }

    game.game_over(console);
    console.print_at("Bye!", 0, MAP_HEIGHT + 2);
    console.display_mut().flush()?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    init_logging();
    log::info!("StickRun starting...");

    let settings = Settings::load();
    let seed = settings.seed.unwrap_or_else(clock_seed);

    let mut directory = Directory::new();
    let mut game = StickRun::init(&mut directory, settings);

    let terminal = Terminal::enter().context("failed to take over the terminal")?;
    let mut console = Console::new(terminal, seed);

    let result = run(&mut console, &directory, &mut game);
    console.display_mut().restore().context("failed to restore the terminal")?;
    result
}
