use labyrinth_core::replay::apply_input;
use labyrinth_core::{Direction, GameSession, InputPayload, LogEvent};
use macroquad::prelude::KeyCode;

use crate::joystick::JoystickRepeat;

/// An input that was accepted by the session this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AcceptedInput {
    pub at_ms: u64,
    pub payload: InputPayload,
}

/// Controls sampled for one rendered frame.
#[derive(Debug, Default, Clone)]
pub struct FrameControls {
    pub keys_pressed: Vec<KeyCode>,
    /// Direction the on-screen joystick is currently dragged towards.
    pub joystick: Option<Direction>,
}

#[derive(Default)]
pub struct AppState {
    joystick: JoystickRepeat,
    wall_clock_ms: u64,
    /// Inputs accepted during the current frame's `tick()` call.
    /// Drained by the caller after each tick to persist to the journal file.
    pub accepted_inputs: Vec<AcceptedInput>,
}

fn key_direction(key: KeyCode) -> Option<Direction> {
    match key {
        KeyCode::Up | KeyCode::W => Some(Direction::Up),
        KeyCode::Down | KeyCode::S => Some(Direction::Down),
        KeyCode::Left | KeyCode::A => Some(Direction::Left),
        KeyCode::Right | KeyCode::D => Some(Direction::Right),
        _ => None,
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply this frame's controls, then let `dt_ms` of game time pass.
    ///
    /// Inputs are applied at the session's current time so the journal can replay them
    /// at exactly the same point.
    pub fn tick(&mut self, session: &mut GameSession, controls: &FrameControls, dt_ms: u64) {
        self.accepted_inputs.clear();

        for key in &controls.keys_pressed {
            let payload = match key {
                KeyCode::P | KeyCode::Space => InputPayload::TogglePause,
                KeyCode::R => InputPayload::RestartLevel,
                KeyCode::N => InputPayload::NewRun { resume: None },
                other => match key_direction(*other) {
                    Some(direction) => InputPayload::Move { direction },
                    None => continue,
                },
            };
            self.apply_and_record(session, payload);
        }

        if let Some(direction) = self.joystick.update(controls.joystick, self.wall_clock_ms) {
            self.apply_and_record(session, InputPayload::Move { direction });
        }

        self.wall_clock_ms += dt_ms;
        session.advance_clock(dt_ms);
    }

    /// Coins awarded by the most recent win, for the win banner.
    pub fn last_award(session: &GameSession) -> Option<u64> {
        session.log().iter().rev().find_map(|event| match event {
            LogEvent::LevelWon { coins_awarded, .. } => Some(*coins_awarded),
            _ => None,
        })
    }

    fn apply_and_record(&mut self, session: &mut GameSession, payload: InputPayload) {
        let at_ms = session.now_ms();
        if let Ok(journaled) = apply_input(session, payload) {
            self.accepted_inputs.push(AcceptedInput { at_ms, payload: journaled });
        }
    }
}
