mod display;

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{stdout, BufWriter, Write};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, KeyboardEnhancementFlags, MouseButton, MouseEvent, MouseEventKind,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use space_shooter::assets::Assets;
use space_shooter::config::Config;
use space_shooter::entities::GameState;
use space_shooter::game::Game;
use space_shooter::input::FrameInput;
use space_shooter::save::{FileStore, MemoryStore, Save, SaveStore, SAVE_FOLDER};
use space_shooter::timer::TICKS_PER_SECOND;

use display::TerminalSurface;

const DEFAULT_CONFIG_PATH: &str = "configs/configs.env";

const FRAME: Duration = Duration::from_micros(1_000_000 / TICKS_PER_SECOND as u64);

// ── Simultaneous-input constants ──────────────────────────────────────────────

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames. Covers terminals that don't emit key-release events:
/// OS key repeat is at least 15 Hz, so 8 frames at 60 FPS (≈133 ms) is
/// refreshed before it expires.
const HOLD_WINDOW: u64 = 8;

fn is_held(key_frame: &HashMap<KeyCode, u64>, keys: &[KeyCode], frame: u64) -> bool {
    keys.iter().any(|key| {
        key_frame
            .get(key)
            .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
            .unwrap_or(false)
    })
}

// ── Logging ───────────────────────────────────────────────────────────────────

/// Logs go to a file next to the save; the terminal belongs to the game.
fn init_logging() -> Result<()> {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    let dir = PathBuf::from(home).join(".config").join(SAVE_FOLDER);
    fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;
    let file = File::create(dir.join("space-shooter.log")).context("creating log file")?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("space_shooter=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn open_save(config: &Config) -> Save {
    let store: Box<dyn SaveStore> = match FileStore::in_user_config(&config.save_file_name) {
        Ok(store) => {
            info!(path = %store.path().display(), "using save file");
            Box::new(store)
        }
        Err(err) => {
            warn!(error = %err, "save file unavailable, high score will not persist");
            Box::new(MemoryStore::default())
        }
    };
    Save::new(store)
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Input model: a `key_frame` map records the frame of the last press/repeat
/// event for every key, so movement and fire can be held together. Edge
/// actions (pause, confirm, menu) fire once per press.
fn game_loop<W: Write>(
    out: &mut W,
    game: &mut Game,
    surface: &mut TerminalSurface,
    rx: &mpsc::Receiver<Event>,
) -> std::io::Result<()> {
    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut cursor_at = game.arena.center();
    let mut mouse_fire = false;
    let mut frame: u64 = 0;

    loop {
        let frame_start = Instant::now();
        frame += 1;

        let mut input = FrameInput::idle_at(cursor_at);

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            match ev {
                Event::Key(KeyEvent {
                    code,
                    kind,
                    modifiers,
                    ..
                }) => match kind {
                    KeyEventKind::Press => {
                        key_frame.insert(code, frame);
                        match code {
                            KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(()),
                            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                                return Ok(());
                            }
                            KeyCode::Esc
                                if matches!(game.state, GameState::Initial | GameState::Death) =>
                            {
                                return Ok(());
                            }
                            KeyCode::Esc => input.pause_pressed = true,
                            KeyCode::Char(' ') | KeyCode::Enter => input.confirm_pressed = true,
                            KeyCode::Char('m') | KeyCode::Char('M') => input.menu_pressed = true,
                            _ => {}
                        }
                    }
                    KeyEventKind::Repeat => {
                        key_frame.insert(code, frame);
                    }
                    KeyEventKind::Release => {
                        key_frame.remove(&code);
                    }
                },
                Event::Mouse(MouseEvent {
                    kind, column, row, ..
                }) => {
                    cursor_at = surface.cell_to_arena(column, row);
                    match kind {
                        MouseEventKind::Down(MouseButton::Left) => mouse_fire = true,
                        MouseEventKind::Up(MouseButton::Left) => mouse_fire = false,
                        _ => {}
                    }
                }
                Event::Resize(cols, rows) => surface.resize(cols, rows),
                _ => {}
            }
        }

        input.cursor = cursor_at;
        input.up = is_held(&key_frame, &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')], frame);
        input.down = is_held(&key_frame, &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')], frame);
        input.left = is_held(&key_frame, &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')], frame);
        input.right = is_held(&key_frame, &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')], frame);
        // Space both confirms in menus and fires while playing.
        input.fire = mouse_fire || is_held(&key_frame, &[KeyCode::Char(' ')], frame);

        game.update(&input);

        surface.clear();
        game.draw(surface);
        surface.present(out)?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            thread::sleep(FRAME - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    init_logging()?;

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let config = Config::load(&config_path)
        .with_context(|| format!("loading configuration from {config_path}"))?;
    info!(path = %config_path, "configuration loaded");

    let save = open_save(&config);
    let mut game = Game::new(config, Assets::builtin(), save).context("starting game")?;

    let mut out = BufWriter::new(stdout());

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;
    out.execute(EnableMouseCapture)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread to blocking event reads so the game loop never blocks on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break;
                }
            }
            Err(_) => break,
        }
    });

    let (cols, rows) = terminal::size()?;
    let mut surface = TerminalSurface::new(cols, rows, game.arena);
    let result = game_loop(&mut out, &mut game, &mut surface, &rx);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(DisableMouseCapture);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    info!(best = game.score.best, "exiting");
    result.context("terminal I/O")
}
