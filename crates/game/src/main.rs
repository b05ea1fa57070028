mod level_file;
mod platform;
mod player;
mod session;

use std::path::Path;
use std::process::ExitCode;

use engine::{Button, DrawSink, InputSnapshot, RenderableDesc, Vec2, TICKS_PER_SECOND};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use level_file::{load_level_file, LevelDef, PlatformDef};
use session::Session;

const SIMULATION_SECONDS: u64 = 10;

fn main() -> ExitCode {
    init_tracing();
    info!("=== Platformer Sim Startup ===");

    let def = match std::env::args().nth(1) {
        Some(path) => match load_level_file(Path::new(&path)) {
            Ok(def) => def,
            Err(err) => {
                error!(error = %err, path, "level_load_failed");
                return ExitCode::FAILURE;
            }
        },
        None => default_level(),
    };

    let mut session = match Session::from_def(&def) {
        Ok(session) => session,
        Err(err) => {
            error!(error = %err, "session_build_failed");
            return ExitCode::FAILURE;
        }
    };

    let total_ticks = SIMULATION_SECONDS * TICKS_PER_SECOND as u64;
    for tick in 0..total_ticks {
        session.step(scripted_input(tick));
        if (tick + 1) % TICKS_PER_SECOND as u64 == 0 {
            match session.player_position() {
                Some(position) => info!(
                    second = (tick + 1) / TICKS_PER_SECOND as u64,
                    x = position.x,
                    y = position.y,
                    "player_position"
                ),
                None => {
                    info!(second = (tick + 1) / TICKS_PER_SECOND as u64, "player_gone");
                    break;
                }
            }
        }
    }

    let mut sink = CountingSink::default();
    session.draw(&mut sink);
    info!(draw_calls = sink.calls, "simulation_complete");
    ExitCode::SUCCESS
}

/// A fixed demo input script: run right, hop periodically, dash once in a
/// while. Deterministic, so repeated runs log identical trajectories.
fn scripted_input(tick: u64) -> InputSnapshot {
    let mut input = InputSnapshot::empty().with_button_down(Button::Right, true);
    // Hold jump for a third of a second out of every two seconds.
    if tick % 120 < 20 {
        input = input.with_button_down(Button::Jump, true);
    }
    // One dash press every five seconds.
    if tick % 300 == 150 {
        input = input.with_button_down(Button::Dash, true);
    }
    input
}

fn default_level() -> LevelDef {
    let mut grid = vec![vec![-1; 40]; 11];
    for cell in grid[10].iter_mut() {
        *cell = 0;
    }
    // A low wall two-thirds of the way across.
    grid[9][30] = 0;
    grid[8][30] = 0;
    LevelDef {
        tile_size: 8,
        tiles_per_row: 4,
        tileset_sprite: None,
        grid,
        player_spawn: Vec2::new(24.0, 74.0),
        platforms: vec![PlatformDef {
            position: Vec2::new(120.0, 56.0),
            width: 24,
            height: 4,
            target: Vec2::new(180.0, 56.0),
            speed: 40.0,
        }],
    }
}

#[derive(Default)]
struct CountingSink {
    calls: usize,
}

impl DrawSink for CountingSink {
    fn draw(&mut self, _desc: &RenderableDesc, _position: Vec2) {
        self.calls += 1;
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}
