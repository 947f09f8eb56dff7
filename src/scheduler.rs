use std::time::{Duration, Instant};

use tracing::trace;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct TickHandle(u64);

impl TickHandle {
    #[cfg(test)]
    pub fn new(id: u64) -> Self {
        TickHandle(id)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Fired {
    Frame(TickHandle),
    Interval(TickHandle),
}

/// Cancelling a handle that already fired or was already cancelled is a no-op.
pub trait Scheduler {
    fn request_tick(&mut self) -> TickHandle;
    fn cancel_tick(&mut self, handle: TickHandle);
    fn set_interval(&mut self, period: Duration) -> TickHandle;
    fn clear_interval(&mut self, handle: TickHandle);
}

struct Interval {
    handle: TickHandle,
    period: Duration,
    next_due: Instant,
}

/// Pending frames fire together once per frame period. Intervals count
/// from the last time the clock was polled.
pub struct FrameClock {
    next_id: u64,
    now: Instant,
    frame_period: Duration,
    next_frame: Instant,
    pending_frames: Vec<TickHandle>,
    intervals: Vec<Interval>,
}

impl FrameClock {
    pub fn new(fps: u32) -> Self {
        Self::starting_at(Instant::now(), fps)
    }

    pub fn starting_at(now: Instant, fps: u32) -> Self {
        let frame_period = Duration::from_nanos(1_000_000_000 / u64::from(fps.max(1)));
        FrameClock {
            next_id: 0,
            now,
            frame_period,
            next_frame: now + frame_period,
            pending_frames: vec![],
            intervals: vec![],
        }
    }

    pub fn time_until_due(&self, now: Instant) -> Duration {
        let mut deadline = self.next_frame;
        for interval in &self.intervals {
            deadline = deadline.min(interval.next_due);
        }
        deadline.saturating_duration_since(now)
    }

    /// Frames first, then intervals.
    pub fn fire_due(&mut self, now: Instant) -> Vec<Fired> {
        let mut fired = vec![];
        self.now = now;

        if now >= self.next_frame {
            fired.extend(self.pending_frames.drain(..).map(Fired::Frame));
            self.next_frame += self.frame_period;
            if self.next_frame <= now {
                // Fell behind, don't try to catch up on missed frames
                self.next_frame = now + self.frame_period;
            }
        }

        for interval in self.intervals.iter_mut() {
            if now >= interval.next_due {
                fired.push(Fired::Interval(interval.handle));
                interval.next_due += interval.period;
            }
        }

        fired
    }

    fn next_handle(&mut self) -> TickHandle {
        self.next_id += 1;
        TickHandle(self.next_id)
    }
}

impl Scheduler for FrameClock {
    fn request_tick(&mut self) -> TickHandle {
        let handle = self.next_handle();
        self.pending_frames.push(handle);
        handle
    }

    fn cancel_tick(&mut self, handle: TickHandle) {
        self.pending_frames.retain(|h| *h != handle);
    }

    fn set_interval(&mut self, period: Duration) -> TickHandle {
        let handle = self.next_handle();
        let next_due = self.now + period;
        trace!(?handle, ?period, "interval armed");
        self.intervals.push(Interval { handle, period, next_due });
        handle
    }

    fn clear_interval(&mut self, handle: TickHandle) {
        self.intervals.retain(|i| i.handle != handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_fire_once_per_period() {
        let start = Instant::now();
        let mut clock = FrameClock::starting_at(start, 50);
        let handle = clock.request_tick();

        assert!(clock.fire_due(start).is_empty());
        assert_eq!(clock.fire_due(start + Duration::from_millis(20)), vec![Fired::Frame(handle)]);
        assert!(clock.fire_due(start + Duration::from_millis(40)).is_empty());
    }

    #[test]
    fn cancelled_frame_never_fires_and_double_cancel_is_harmless() {
        let start = Instant::now();
        let mut clock = FrameClock::starting_at(start, 50);
        let stale = clock.request_tick();
        let live = clock.request_tick();

        clock.cancel_tick(stale);
        clock.cancel_tick(stale);

        assert_eq!(clock.fire_due(start + Duration::from_millis(25)), vec![Fired::Frame(live)]);
        clock.cancel_tick(live);
    }

    #[test]
    fn handles_are_unique() {
        let mut clock = FrameClock::new(60);
        let a = clock.request_tick();
        let b = clock.set_interval(Duration::from_secs(1));
        let c = clock.request_tick();
        assert_ne!(a, b);
        assert_ne!(b, c);
        assert_ne!(a, c);
    }

    #[test]
    fn interval_recurs_until_cleared() {
        let start = Instant::now();
        let mut clock = FrameClock::starting_at(start, 60);
        let handle = clock.set_interval(Duration::from_millis(100));
        let at = |ms| start + Duration::from_millis(ms);

        assert!(!clock.fire_due(at(99)).contains(&Fired::Interval(handle)));
        assert!(clock.fire_due(at(100)).contains(&Fired::Interval(handle)));
        assert!(!clock.fire_due(at(150)).contains(&Fired::Interval(handle)));
        assert!(clock.fire_due(at(200)).contains(&Fired::Interval(handle)));

        clock.clear_interval(handle);
        clock.clear_interval(handle);
        assert!(!clock.fire_due(at(500)).contains(&Fired::Interval(handle)));
    }

    #[test]
    fn intervals_start_from_the_last_poll() {
        let start = Instant::now();
        let mut clock = FrameClock::starting_at(start, 60);
        clock.fire_due(start + Duration::from_secs(5));

        let handle = clock.set_interval(Duration::from_secs(1));

        assert_eq!(clock.time_until_due(start + Duration::from_secs(5)), Duration::from_nanos(1_000_000_000 / 60));
        assert!(!clock.fire_due(start + Duration::from_millis(5_500)).contains(&Fired::Interval(handle)));
        assert!(clock.fire_due(start + Duration::from_secs(6)).contains(&Fired::Interval(handle)));
    }

    #[test]
    fn waits_no_longer_than_the_next_frame() {
        let start = Instant::now();
        let clock = FrameClock::starting_at(start, 10);
        assert_eq!(clock.time_until_due(start), Duration::from_millis(100));
        assert_eq!(clock.time_until_due(start + Duration::from_secs(1)), Duration::ZERO);
    }
}
