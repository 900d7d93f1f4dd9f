pub mod app_loop;
pub mod data_paths;
pub mod joystick;
pub mod last_session_file;
pub mod launch_args;

use labyrinth_core::SessionStatus;

pub const APP_NAME: &str = "Labyrinth";

/// Format a seed as an exact decimal string with no prefix or suffix.
pub fn format_seed(seed: u64) -> String {
    seed.to_string()
}

/// Format a snapshot hash as `0x` followed by exactly 16 lowercase hex digits.
pub fn format_snapshot_hash(hash: u64) -> String {
    format!("0x{hash:016x}")
}

/// Banner text shown over the maze for each session status.
pub fn status_banner(status: SessionStatus, coins_awarded: Option<u64>) -> Option<String> {
    match status {
        SessionStatus::Running => None,
        SessionStatus::Paused => Some("Paused - press P to resume".to_string()),
        SessionStatus::Won => Some(match coins_awarded {
            Some(coins) => format!("You Win! +{coins} coins"),
            None => "You Win!".to_string(),
        }),
        SessionStatus::Lost => Some("Game Over - press N for a new run".to_string()),
    }
}
