//! Keyboard and mouse-drag input collection for one rendered frame.

use labyrinth_app::app_loop::FrameControls;
use labyrinth_app::joystick::direction_from_drag;
use macroquad::prelude::{
    KeyCode, MouseButton, Vec2, is_key_pressed, is_mouse_button_down, is_mouse_button_pressed,
    mouse_position,
};

const ACTION_KEYS: [KeyCode; 13] = [
    KeyCode::Up,
    KeyCode::Down,
    KeyCode::Left,
    KeyCode::Right,
    KeyCode::W,
    KeyCode::A,
    KeyCode::S,
    KeyCode::D,
    KeyCode::P,
    KeyCode::Space,
    KeyCode::R,
    KeyCode::N,
    KeyCode::L,
];

/// Where the current mouse drag started, if a drag is in progress.
#[derive(Default)]
pub struct DragState {
    origin: Option<Vec2>,
}

pub struct FrameInput {
    pub controls: FrameControls,
    pub toggle_leaderboard: bool,
    pub quit: bool,
}

pub fn capture_frame_input(drag: &mut DragState) -> FrameInput {
    let mut keys_pressed = Vec::with_capacity(ACTION_KEYS.len());
    for key in ACTION_KEYS {
        if is_key_pressed(key) {
            keys_pressed.push(key);
        }
    }

    let (x, y) = mouse_position();
    if is_mouse_button_pressed(MouseButton::Left) {
        drag.origin = Some(Vec2::new(x, y));
    } else if !is_mouse_button_down(MouseButton::Left) {
        drag.origin = None;
    }
    let joystick = drag.origin.and_then(|origin| direction_from_drag(x - origin.x, y - origin.y));

    let toggle_leaderboard = keys_pressed.contains(&KeyCode::L);
    FrameInput {
        controls: FrameControls { keys_pressed, joystick },
        toggle_leaderboard,
        quit: is_key_pressed(KeyCode::Escape),
    }
}
