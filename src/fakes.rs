//! Test doubles for the canvas, HUD and scheduler capabilities.

use std::time::Duration;

use clap::Parser;
use crossterm::style::Color;

use crate::config::GameConfig;
use crate::geometry::{Position, Size};
use crate::render::{Canvas, Hud};
use crate::scheduler::{Fired, Scheduler, TickHandle};

#[derive(Default)]
pub struct RecordingCanvas {
    pub draws: Vec<(Position, Size, Color)>,
    pub clears: Vec<(Position, Size)>,
    pub score_text: Option<String>,
    pub time: Option<(u32, String)>,
}

impl RecordingCanvas {
    pub fn draws_in(&self, color: Color) -> Vec<Position> {
        self.draws.iter().filter(|d| d.2 == color).map(|d| d.0).collect()
    }
}

impl Canvas for RecordingCanvas {
    fn draw_rect(&mut self, position: Position, size: Size, color: Color) {
        self.draws.push((position, size, color));
    }

    fn clear_rect(&mut self, position: Position, size: Size) {
        self.clears.push((position, size));
    }
}

impl Hud for RecordingCanvas {
    fn show_score(&mut self, text: &str) {
        self.score_text = Some(text.to_string());
    }

    fn show_time(&mut self, seconds: u32, percentage: &str) {
        self.time = Some((seconds, percentage.to_string()));
    }
}

/// Fires frames and seconds only when a test asks for them.
#[derive(Default)]
pub struct ManualScheduler {
    next_id: u64,
    pub frames: Vec<TickHandle>,
    pub intervals: Vec<TickHandle>,
}

impl ManualScheduler {
    /// Drains the pending frame requests, like one display refresh.
    pub fn next_frame(&mut self) -> Vec<Fired> {
        self.frames.drain(..).map(Fired::Frame).collect()
    }

    /// One second of wall clock for every armed interval.
    pub fn next_second(&mut self) -> Vec<Fired> {
        self.intervals.iter().copied().map(Fired::Interval).collect()
    }

    fn next_handle(&mut self) -> TickHandle {
        self.next_id += 1;
        TickHandle::new(self.next_id)
    }
}

impl Scheduler for ManualScheduler {
    fn request_tick(&mut self) -> TickHandle {
        let handle = self.next_handle();
        self.frames.push(handle);
        handle
    }

    fn cancel_tick(&mut self, handle: TickHandle) {
        self.frames.retain(|h| *h != handle);
    }

    fn set_interval(&mut self, _period: Duration) -> TickHandle {
        let handle = self.next_handle();
        self.intervals.push(handle);
        handle
    }

    fn clear_interval(&mut self, handle: TickHandle) {
        self.intervals.retain(|h| *h != handle);
    }
}

/// Defaults from the command line, on a 500x500 canvas.
pub fn test_config() -> GameConfig {
    let mut config = GameConfig::parse_from(["arcade-snake"]);
    config.canvas_width = 500;
    config.canvas_height = 500;
    config.seed = Some(1);
    config
}
