//! Exponential Moving Average.

use super::{Filter, FilterBase};

/// An Exponential Moving Average (EMA) filter.
///
/// Used to smooth profiling measurements, see [`Timer`][crate::timer::Timer].
#[derive(Debug, Clone, Copy)]
pub struct Ema {
    alpha: f32,
}

impl Ema {
    /// Creates a new Exponential Moving Average filter.
    ///
    /// `alpha` defines how quickly the weight of older values decays. Values closer to 1.0 favor
    /// recent values, values closer to 0.0 keep more of the history.
    ///
    /// # Panics
    ///
    /// This method will panic if `alpha` is not in between 0.0 and 1.0.
    pub fn new(alpha: f32) -> Self {
        assert!((0.0..=1.0).contains(&alpha), "EMA alpha out of range: {alpha}");
        Self { alpha }
    }
}

/// Filter state for [`Ema`] filters.
#[derive(Debug, Default, Clone)]
pub struct EmaState {
    last: Option<f32>,
}

impl FilterBase<f32> for Ema {
    type State = EmaState;
}

impl Filter<f32> for Ema {
    fn filter(&self, state: &mut Self::State, value: f32) -> f32 {
        let avg = match state.last {
            Some(last) => self.alpha * value + (1.0 - self.alpha) * last,
            None => value,
        };
        state.last = Some(avg);
        avg
    }
}
