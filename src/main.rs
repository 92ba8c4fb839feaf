use std::{fs, io, thread, time::{Duration, Instant}};

use anyhow::{Context, Result};
use crossterm::{
    cursor::{Hide, Show},
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use dungeon::{layout::default_floors, Registry};
use hero::GameRng;
use save::{FileStore, SaveSystem};
use scopeguard::defer;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use tiny_dungeon_rpg::{
    render::{self, LogAudio},
    terminal::{TerminalInput, TerminalScreen},
    Game, GameConfig,
};

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let config = GameConfig::from_env();
    let _log_guard = setup_logging()?;
    info!(save = %config.storage.save_path.display(), fps = config.fps, "starting");

    let dice = config.seed.map_or_else(GameRng::from_entropy, GameRng::new);
    info!(seed = dice.seed(), "dice seeded, set DRPG_SEED to replay");
    let saves = SaveSystem::new(FileStore::new(&config.storage.save_path));
    let mut game = Game::new(
        config.clone(),
        Registry::standard(),
        Box::new(default_floors()),
        Box::new(LogAudio),
        saves,
        dice,
    );

    enable_raw_mode().context("Failed to enable raw mode")?;
    defer! {
        let _ = disable_raw_mode();
    }
    execute!(io::stdout(), EnterAlternateScreen, Hide).context("Failed to enter alternate screen")?;
    defer! {
        let _ = execute!(io::stdout(), Show, LeaveAlternateScreen);
    }
    let release_events = supports_keyboard_enhancement().unwrap_or(false);
    if release_events {
        execute!(
            io::stdout(),
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        )
        .context("Failed to enable key release events")?;
    }
    defer! {
        if release_events {
            let _ = execute!(io::stdout(), PopKeyboardEnhancementFlags);
        }
    }

    let mut screen = TerminalScreen::new()?;
    let mut input = TerminalInput::new(Duration::from_millis(config.input.hold_window_ms), release_events);
    let frame_time = Duration::from_secs(1) / config.fps.max(1);

    while !game.should_quit() {
        let started = Instant::now();
        let buttons = input.sample()?;
        if input.quit_requested() {
            break;
        }
        game.tick(buttons);
        render::draw(&game, &mut screen);
        screen.present()?;
        if let Some(rest) = frame_time.checked_sub(started.elapsed()) {
            thread::sleep(rest);
        }
    }

    info!(frames = game.session().frames, "exiting");
    Ok(())
}

/// Logs go to a file; the terminal belongs to the game.
fn setup_logging() -> Result<WorkerGuard> {
    let log_dir = GameConfig::log_dir();
    fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;

    let file_appender = tracing_appender::rolling::never(&log_dir, "tiny-dungeon.log");
    let (writer, guard) = tracing_appender::non_blocking(file_appender);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .try_init()
        .context("Failed to install log subscriber")?;
    Ok(guard)
}
