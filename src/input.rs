use crossterm::event::KeyCode;
use tracing::{debug, warn};

use crate::game::GameLoop;
use crate::scheduler::Scheduler;
use crate::snake::Direction::{self, *};
use crate::timer::RoundTimer;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum InputState {
    AwaitingFirstInput,
    DirectionActive(Direction),
}

/// Arrow keys or WASD. Everything else is not a direction.
pub fn direction_for(code: KeyCode) -> Option<Direction> {
    match code {
        KeyCode::Char('w') | KeyCode::Char('W') | KeyCode::Up => Some(Up),
        KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Left => Some(Left),
        KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Down => Some(Down),
        KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Right => Some(Right),
        _ => None,
    }
}

/// Turns key presses into loop runs, refusing to reverse onto the same axis.
pub struct InputRouter {
    state: InputState,
}

impl InputRouter {
    pub fn new() -> Self {
        InputRouter { state: InputState::AwaitingFirstInput }
    }

    #[cfg(test)]
    pub fn state(&self) -> InputState {
        self.state
    }

    /// Returns whether the key changed what the loop is doing.
    pub fn on_direction_input<S: Scheduler + ?Sized>(
        &mut self,
        code: KeyCode,
        game_loop: &mut GameLoop,
        timer: &mut RoundTimer,
        scheduler: &mut S,
    ) -> bool {
        let direction = match direction_for(code) {
            Some(direction) => direction,
            None => return false,
        };

        match self.state {
            InputState::AwaitingFirstInput => {
                timer.run(scheduler);
            }
            InputState::DirectionActive(last) if direction == last.opposite() => {
                warn!(?last, ?direction, "reversal rejected");
                return false;
            }
            InputState::DirectionActive(last) => {
                debug!(?last, ?direction, "direction change");
            }
        }

        game_loop.run(direction, scheduler);
        self.state = InputState::DirectionActive(direction);
        true
    }

    pub fn reload<S: Scheduler + ?Sized>(&mut self, game_loop: &mut GameLoop, scheduler: &mut S) {
        game_loop.stop(scheduler);
        self.state = InputState::AwaitingFirstInput;
    }
}
