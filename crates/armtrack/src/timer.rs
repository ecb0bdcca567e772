//! Performance measurement tools.

use std::{
    fmt, mem,
    sync::Mutex,
    time::{Duration, Instant},
};

use itertools::Itertools;

use crate::filter::{
    ema::{Ema, EmaState},
    Filter,
};

const EMA_ALPHA: f32 = 0.3;

/// Measures and averages the time an operation takes.
///
/// Collected timings are reset whenever the timer is displayed using `{}`.
pub struct Timer {
    name: &'static str,
    ema: Ema,
    state: Mutex<TimerState>,
}

#[derive(Default)]
struct TimerState {
    ema_state: EmaState,
    /// Smoothed duration in seconds.
    avg: f32,
    /// Number of measurements since the timer was last displayed.
    count: usize,
}

impl Timer {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            ema: Ema::new(EMA_ALPHA),
            state: Mutex::new(TimerState::default()),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Invokes a closure, measuring and recording the time it takes.
    pub fn time<T>(&self, timee: impl FnOnce() -> T) -> T {
        let _guard = self.start();
        timee()
    }

    /// Starts timing an operation. The time is recorded when the returned guard is dropped.
    pub fn start(&self) -> TimerGuard<'_> {
        TimerGuard {
            start: Instant::now(),
            timer: self,
        }
    }

    /// Returns how many measurements were recorded since the timer was last displayed.
    pub fn count(&self) -> usize {
        self.lock().count
    }

    fn record(&self, duration: Duration) {
        let mut state = self.lock();
        let state = &mut *state;
        state.avg = self.ema.filter(&mut state.ema_state, duration.as_secs_f32());
        state.count += 1;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, TimerState> {
        // The state is always left consistent, so a poisoned lock can be reused.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Displays the average recorded time and resets it.
impl fmt::Display for Timer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = mem::take(&mut *self.lock());
        let avg_ms = state.avg * 1000.0;
        write!(f, "{}: {}x{avg_ms:.01}ms", self.name, state.count)
    }
}

/// Guard returned by [`Timer::start`].
pub struct TimerGuard<'a> {
    start: Instant,
    timer: &'a Timer,
}

impl Drop for TimerGuard<'_> {
    fn drop(&mut self) {
        self.timer.record(self.start.elapsed());
    }
}

/// Logs the number of processed frames per second.
pub struct FpsCounter {
    name: String,
    frames: u32,
    start: Instant,
}

impl FpsCounter {
    pub fn new<N: Into<String>>(name: N) -> Self {
        Self {
            name: name.into(),
            frames: 0,
            start: Instant::now(),
        }
    }

    /// Counts a frame, logging the frame rate once per second.
    pub fn tick(&mut self) {
        self.tick_with(std::iter::empty::<&Timer>());
    }

    /// Counts a frame, logging the frame rate and `extra` data once per second.
    pub fn tick_with<D: fmt::Display, I: IntoIterator<Item = D>>(&mut self, extra: I) {
        self.frames += 1;
        if self.start.elapsed() < Duration::from_secs(1) {
            return;
        }

        let extra = extra.into_iter().collect::<Vec<_>>();
        if extra.is_empty() {
            log::debug!("{}: {} FPS", self.name, self.frames);
        } else {
            log::debug!(
                "{}: {} FPS ({})",
                self.name,
                self.frames,
                extra.iter().format(", ")
            );
        }

        self.frames = 0;
        self.start = Instant::now();
    }
}
