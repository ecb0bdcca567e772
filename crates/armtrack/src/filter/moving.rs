//! Windowed moving average.

use std::collections::VecDeque;

use crate::error::ConfigError;

use super::{Filter, FilterBase, SimpleFilter};

/// Moving Average over a fixed window of recent values (FIR filter).
///
/// All values in the window are weighted equally. Once the window is full, every new value evicts
/// the oldest one.
#[derive(Debug, Clone, Copy)]
pub struct MovingAvg {
    /// Max. number of values to keep in the history.
    window_size: usize,
}

impl MovingAvg {
    /// Creates a moving average that averages the last `window_size` values.
    ///
    /// Returns [`ConfigError::ZeroWindow`] if `window_size` is 0.
    pub fn new(window_size: usize) -> Result<Self, ConfigError> {
        if window_size == 0 {
            return Err(ConfigError::ZeroWindow);
        }
        Ok(Self { window_size })
    }

    #[inline]
    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Appends `value` to the history in `state`, evicting the oldest value if the window is
    /// exceeded.
    ///
    /// Non-finite values are not rejected. They are averaged like any other value.
    pub fn add_value(&self, state: &mut MovingAvgState, value: f32) {
        state.history.push_back(value);
        while state.history.len() > self.window_size {
            state.history.pop_front();
        }
    }
}

/// The values currently inside a [`MovingAvg`] window.
#[derive(Debug, Default, Clone)]
pub struct MovingAvgState {
    history: VecDeque<f32>,
}

impl MovingAvgState {
    /// Returns the arithmetic mean of the buffered values, or 0.0 if there are none.
    pub fn mean(&self) -> f32 {
        if self.history.is_empty() {
            return 0.0;
        }
        self.history.iter().sum::<f32>() / self.history.len() as f32
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Iterates over the buffered values, oldest first.
    pub fn values(&self) -> impl Iterator<Item = f32> + '_ {
        self.history.iter().copied()
    }
}

impl FilterBase<f32> for MovingAvg {
    type State = MovingAvgState;
}

impl Filter<f32> for MovingAvg {
    fn filter(&self, state: &mut Self::State, value: f32) -> f32 {
        self.add_value(state, value);
        state.mean()
    }
}

/// A [`MovingAvg`] bundled with its own window, used for one stream of measurements.
pub type WindowedAverage = SimpleFilter<MovingAvg>;

impl SimpleFilter<MovingAvg> {
    /// Creates a windowed average over the last `window_size` values.
    pub fn with_window(window_size: usize) -> Result<Self, ConfigError> {
        MovingAvg::new(window_size).map(Self::new)
    }

    /// Pushes `value` into the window without computing the mean.
    pub fn add_value(&mut self, value: f32) {
        self.filter.add_value(&mut self.state, value);
    }

    /// Returns the mean of the current window, or 0.0 if no value was pushed yet.
    pub fn get_filtered_value(&self) -> f32 {
        self.state().mean()
    }

    pub fn len(&self) -> usize {
        self.state().len()
    }

    pub fn is_empty(&self) -> bool {
        self.state().is_empty()
    }

    /// Iterates over the values in the window, oldest first.
    pub fn values(&self) -> impl Iterator<Item = f32> + '_ {
        self.state().values()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn test_moving_avg() {
        let mut moving_avg = WindowedAverage::with_window(2).unwrap();
        assert_eq!(moving_avg.filter(1.0), 1.0);
        assert_eq!(moving_avg.filter(1.0), 1.0);
        assert_eq!(moving_avg.filter(0.0), 0.5);
        assert_eq!(moving_avg.filter(0.0), 0.0);
    }

    #[test]
    fn empty_window_is_zero() {
        let avg = WindowedAverage::with_window(4).unwrap();
        assert!(avg.is_empty());
        assert_eq!(avg.get_filtered_value(), 0.0);
    }

    #[test]
    fn single_value_reads_back() {
        let mut avg = WindowedAverage::with_window(1).unwrap();
        avg.add_value(-12.5);
        assert_eq!(avg.get_filtered_value(), -12.5);

        let mut avg = WindowedAverage::with_window(10).unwrap();
        avg.add_value(317.25);
        assert_eq!(avg.get_filtered_value(), 317.25);
    }

    #[test]
    fn evicts_oldest_first() {
        let mut avg = WindowedAverage::with_window(3).unwrap();
        for v in [10.0, 20.0, 30.0, 40.0] {
            avg.add_value(v);
        }
        assert_eq!(avg.values().collect::<Vec<_>>(), [20.0, 30.0, 40.0]);
        assert_eq!(avg.get_filtered_value(), 30.0);
    }

    #[test]
    fn holds_last_window_values() {
        for _ in 0..50 {
            let window = fastrand::usize(1..16);
            let count = window + fastrand::usize(0..40);
            let pushed = (0..count)
                .map(|_| fastrand::f32() * 720.0 - 360.0)
                .collect::<Vec<_>>();

            let mut avg = WindowedAverage::with_window(window).unwrap();
            for &v in &pushed {
                avg.add_value(v);
                assert!(avg.len() <= window);
            }

            let expected = &pushed[count - window..];
            assert_eq!(avg.values().collect::<Vec<_>>(), expected);

            let mean = expected.iter().sum::<f32>() / window as f32;
            assert_relative_eq!(avg.get_filtered_value(), mean, max_relative = 1e-5);
        }
    }

    #[test]
    fn nan_propagates() {
        let mut avg = WindowedAverage::with_window(3).unwrap();
        avg.add_value(1.0);
        avg.add_value(f32::NAN);
        assert!(avg.get_filtered_value().is_nan());

        // Evicted once it leaves the window.
        avg.add_value(2.0);
        avg.add_value(3.0);
        assert!(avg.get_filtered_value().is_nan());
        avg.add_value(4.0);
        assert_eq!(avg.get_filtered_value(), 3.0);
    }

    #[test]
    fn reset_clears_window() {
        let mut avg = WindowedAverage::with_window(3).unwrap();
        avg.add_value(5.0);
        avg.reset();
        assert!(avg.is_empty());
        assert_eq!(avg.params().window_size(), 3);
    }

    #[test]
    fn zero_window_is_rejected() {
        assert_eq!(MovingAvg::new(0).unwrap_err(), ConfigError::ZeroWindow);
        assert!(WindowedAverage::with_window(0).is_err());
    }
}
