//! Window configuration for the desktop app.

use labyrinth_app::APP_NAME;
use macroquad::window::Conf;

const DEFAULT_WINDOW_WIDTH: i32 = 720;
const DEFAULT_WINDOW_HEIGHT: i32 = 800;

pub fn build_window_conf() -> Conf {
    Conf {
        window_title: APP_NAME.to_owned(),
        window_width: DEFAULT_WINDOW_WIDTH,
        window_height: DEFAULT_WINDOW_HEIGHT,
        // Linux desktop sessions may not scale low-DPI framebuffers automatically.
        high_dpi: true,
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::build_window_conf;

    #[test]
    fn enables_high_dpi_rendering() {
        let conf = build_window_conf();
        assert!(conf.high_dpi);
    }

    #[test]
    fn leaves_room_for_the_hud_under_a_square_maze() {
        let conf = build_window_conf();
        assert_eq!(conf.window_width, 720);
        assert!(conf.window_height > conf.window_width);
    }
}
