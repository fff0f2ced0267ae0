use std::time::{Duration, Instant};

use crossterm::event;

use crate::tui::event::TuiEvent;

const DEFAULT_TICK_INTERVAL: Duration = Duration::from_micros(16_667);

/// Produces ticks at a fixed interval, a render after anything that changed the
/// app, and the terminal events in between.
#[derive(Debug)]
pub(super) struct EventLoop {
    tick_interval: Duration,
    last_tick: Instant,
    dirty: bool,
}

impl Default for EventLoop {
    fn default() -> Self {
        Self {
            tick_interval: DEFAULT_TICK_INTERVAL,
            last_tick: Instant::now(),
            dirty: true,
        }
    }
}

impl EventLoop {
    /// Sets the tick interval and restarts the tick clock, so the next tick does
    /// not include the time spent before this call.
    pub(super) fn set_tick_interval(&mut self, interval: Duration) {
        self.tick_interval = interval;
        self.last_tick = Instant::now();
    }

    fn time_until_tick(&self, now: Instant) -> Duration {
        (self.last_tick + self.tick_interval).saturating_duration_since(now)
    }

    /// Blocks until the next tick is due or a terminal event arrives.
    pub(super) fn next(&mut self) -> anyhow::Result<TuiEvent> {
        loop {
            let now = Instant::now();
            let timeout = self.time_until_tick(now);
            if timeout.is_zero() {
                let elapsed = now.duration_since(self.last_tick);
                self.last_tick = now;
                self.dirty = true;
                return Ok(TuiEvent::Tick(elapsed));
            }

            if self.dirty {
                self.dirty = false;
                return Ok(TuiEvent::Render);
            }

            if event::poll(timeout)? {
                self.dirty = true;
                return Ok(event::read()?.into());
            }
        }
    }
}
