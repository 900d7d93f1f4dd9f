//! On-screen joystick: drag vectors become directions, and a held direction repeats.

use labyrinth_core::Direction;

/// Drags shorter than this many pixels are ignored.
pub const DRAG_THRESHOLD_PX: f32 = 20.0;
/// Interval between repeated moves while a direction is held.
pub const REPEAT_INTERVAL_MS: u64 = 150;

/// Maps a drag vector (screen coordinates, y grows downward) to a direction.
///
/// Angles in `[-45, 45)` degrees map to right, `[45, 135)` to down, `[-135, -45)` to up,
/// and everything else to left.
pub fn direction_from_drag(dx: f32, dy: f32) -> Option<Direction> {
    if dx.hypot(dy) < DRAG_THRESHOLD_PX {
        return None;
    }
    let angle = dy.atan2(dx).to_degrees();
    let direction = if (-45.0..45.0).contains(&angle) {
        Direction::Right
    } else if (45.0..135.0).contains(&angle) {
        Direction::Down
    } else if (-135.0..-45.0).contains(&angle) {
        Direction::Up
    } else {
        Direction::Left
    };
    Some(direction)
}

/// Turns a held joystick direction into discrete move requests.
#[derive(Debug, Default)]
pub struct JoystickRepeat {
    held: Option<(Direction, u64)>,
}

impl JoystickRepeat {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports the direction held at `now_ms`. Returns a direction when a move should fire:
    /// immediately on a new direction, then once per interval while it stays held.
    pub fn update(&mut self, held: Option<Direction>, now_ms: u64) -> Option<Direction> {
        let Some(direction) = held else {
            self.held = None;
            return None;
        };
        match self.held {
            Some((current, next_fire_ms)) if current == direction => {
                if now_ms < next_fire_ms {
                    return None;
                }
                self.held = Some((direction, next_fire_ms + REPEAT_INTERVAL_MS));
            }
            _ => self.held = Some((direction, now_ms + REPEAT_INTERVAL_MS)),
        }
        Some(direction)
    }

    pub fn is_held(&self) -> bool {
        self.held.is_some()
    }
}
