use std::time::Duration;

use tracing::info;

use crate::render::Hud;
use crate::scheduler::{Scheduler, TickHandle};

const ONE_SECOND: Duration = Duration::from_secs(1);

/// Round countdown, decremented by a recurring one-second interval.
pub struct RoundTimer {
    default_second: u32,
    second: u32,
    playing: bool,
    interval: Option<TickHandle>,
}

impl RoundTimer {
    pub fn new(default_second: u32) -> Self {
        RoundTimer { default_second, second: default_second, playing: true, interval: None }
    }

    pub fn second(&self) -> u32 {
        self.second
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Whether the countdown interval is armed.
    #[cfg(test)]
    pub fn is_running(&self) -> bool {
        self.interval.is_some()
    }

    pub fn run<S: Scheduler + ?Sized>(&mut self, scheduler: &mut S) {
        if self.interval.is_none() && self.playing {
            self.interval = Some(scheduler.set_interval(ONE_SECOND));
        }
    }

    pub fn stop<S: Scheduler + ?Sized>(&mut self, scheduler: &mut S) {
        if let Some(handle) = self.interval.take() {
            scheduler.clear_interval(handle);
        }
    }

    pub fn on_interval<H, S>(&mut self, handle: TickHandle, hud: &mut H, scheduler: &mut S)
    where
        H: Hud + ?Sized,
        S: Scheduler + ?Sized,
    {
        if self.interval != Some(handle) {
            return;
        }

        self.second = self.second.saturating_sub(1);
        self.render(hud);

        if self.second == 0 {
            self.stop(scheduler);
            self.playing = false;
            info!("round time is up");
        }
    }

    /// Remaining share of the round, e.g. `"83.33"`.
    pub fn percentage(&self) -> String {
        let percentage = self.second as f64 / self.default_second as f64 * 100.0;
        format!("{:.2}", percentage)
    }

    pub fn render<H: Hud + ?Sized>(&self, hud: &mut H) {
        hud.show_time(self.second, &self.percentage());
    }

    /// Back to a full round; the countdown waits for the next `run`.
    pub fn reload<H, S>(&mut self, hud: &mut H, scheduler: &mut S)
    where
        H: Hud + ?Sized,
        S: Scheduler + ?Sized,
    {
        self.stop(scheduler);
        self.playing = true;
        self.second = self.default_second;
        self.render(hud);
    }
}
