mod frame_input;
mod render;
mod window_config;

use std::env;
use std::path::Path;
use std::process;

use frame_input::{DragState, capture_frame_input};
use labyrinth_app::data_paths::{self, LAST_SESSION_FILE};
use labyrinth_app::last_session_file::LastSessionFile;
use labyrinth_app::launch_args::{generate_runtime_seed, resolve_launch_args};
use labyrinth_app::{app_loop::AppState, format_snapshot_hash};
use labyrinth_core::{
    DEFAULT_LEADERBOARD_LIMIT, GameSession, InputJournal, JournalWriter, LeaderboardEntry,
    open_store,
};
use macroquad::prelude::{get_frame_time, next_frame};
use macroquad::window::Conf;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Frames longer than this (window drags, breakpoints) are clamped so timers do not burst.
const MAX_FRAME_MS: u64 = 250;

fn window_conf() -> Conf {
    window_config::build_window_conf()
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).compact().init();
}

#[macroquad::main(window_conf)]
async fn main() {
    init_tracing();

    let args: Vec<String> = env::args().collect();
    let launch = match resolve_launch_args(&args, generate_runtime_seed()) {
        Ok(launch) => launch,
        Err(err) => {
            error!(error = %err, "startup_failed");
            process::exit(2);
        }
    };
    let data_dir = data_paths::data_dir();
    let rules = match data_paths::resolve_rules(launch.rules_path.as_deref(), data_dir.as_deref())
    {
        Ok(rules) => rules,
        Err(err) => {
            error!(error = %err, "startup_failed");
            process::exit(1);
        }
    };

    let previous = data_dir.as_deref().and_then(load_last_session);

    let seed = launch.seed.value();
    let store = open_store(&rules.progress_store, &launch.player);
    let mut session = GameSession::new(seed, rules, store);
    info!(seed, player = %launch.player, level = session.state().level, "session_started");

    let header = InputJournal::new(seed, session.state().level, session.state().coins);
    let mut journal = data_dir.as_deref().and_then(|dir| {
        let path = data_paths::journal_path(dir, seed);
        match JournalWriter::create(&path, &header) {
            Ok(writer) => {
                info!(path = %path.display(), "journal_opened");
                Some(writer)
            }
            Err(err) => {
                warn!(error = %err, "journal_unavailable");
                None
            }
        }
    });

    let mut app = AppState::new();
    let mut drag = DragState::default();
    let mut leaderboard: Option<Vec<LeaderboardEntry>> = None;

    loop {
        let input = capture_frame_input(&mut drag);
        if input.quit {
            break;
        }
        if input.toggle_leaderboard {
            leaderboard = match leaderboard {
                Some(_) => None,
                None => match session.leaderboard(DEFAULT_LEADERBOARD_LIMIT) {
                    Ok(entries) => Some(entries),
                    Err(err) => {
                        warn!(error = %err, "leaderboard_unavailable");
                        None
                    }
                },
            };
        }

        let dt_ms = ((get_frame_time() * 1000.0).round() as u64).min(MAX_FRAME_MS);
        app.tick(&mut session, &input.controls, dt_ms);

        if let Some(writer) = journal.as_mut() {
            let written: Result<(), _> = app
                .accepted_inputs
                .drain(..)
                .try_for_each(|accepted| writer.append(accepted.at_ms, &accepted.payload));
            if let Err(err) = written {
                warn!(error = %err, "journal_write_failed");
                journal = None;
            }
        }

        render::draw_frame(&session, leaderboard.as_deref(), previous.as_deref());
        next_frame().await;
    }

    save_last_session(&session, &launch.player, data_dir.as_deref());
}

/// Recap line for the previous session, if one was saved.
fn load_last_session(dir: &Path) -> Option<String> {
    match LastSessionFile::load_previous(&dir.join(LAST_SESSION_FILE)) {
        Ok(Some(summary)) => {
            info!(level = summary.level, coins = summary.coins, "last_session_loaded");
            Some(summary.summary_line())
        }
        Ok(None) => None,
        Err(err) => {
            warn!(error = %err, "last_session_unreadable");
            None
        }
    }
}

fn save_last_session(session: &GameSession, player: &str, data_dir: Option<&Path>) {
    let Some(dir) = data_dir else {
        return;
    };
    let state = session.state();
    let summary = LastSessionFile {
        format_version: 1,
        player: player.to_string(),
        seed: session.seed(),
        level: state.level,
        coins: state.coins,
        status: format!("{:?}", state.status),
        snapshot_hash_hex: format_snapshot_hash(session.snapshot_hash()),
        session_ms: session.now_ms(),
    };
    match summary.write_atomic(&dir.join(LAST_SESSION_FILE)) {
        Ok(()) => info!(level = summary.level, coins = summary.coins, "last_session_saved"),
        Err(err) => warn!(error = %err, "last_session_save_failed"),
    }
}
