//! Data filtering, averaging and smoothing.
//!
//! Filters are split into two parts: the filter itself, which holds the (immutable) filter
//! parameters, and its [`FilterBase::State`], which holds the history accumulated from previous
//! values. This allows a single set of parameters to be shared by any number of independent
//! measurement streams, each owning its own state.
//!
//! [`SimpleFilter`] bundles a filter with a single state for the common case of filtering one
//! stream of values.

pub mod ema;
pub mod moving;

pub use moving::{MovingAvg, WindowedAverage};

/// Base trait for filters, defining the state type they operate on.
pub trait FilterBase<V> {
    /// Per-stream filter state.
    ///
    /// The [`Default`] value represents a filter that has not seen any values yet.
    type State: Default;
}

/// A filter for values of type `V`.
pub trait Filter<V>: FilterBase<V> {
    /// Adds `value` to the history in `state`, returning the filtered value.
    fn filter(&self, state: &mut Self::State, value: V) -> V;
}

/// Combines a [`Filter`] with its state.
#[derive(Debug, Clone)]
pub struct SimpleFilter<F: FilterBase<f32>> {
    filter: F,
    state: F::State,
}

impl<F: Filter<f32>> SimpleFilter<F> {
    pub fn new(filter: F) -> Self {
        Self {
            filter,
            state: F::State::default(),
        }
    }

    /// Returns the filter parameters.
    pub fn params(&self) -> &F {
        &self.filter
    }

    /// Returns the accumulated filter state.
    pub fn state(&self) -> &F::State {
        &self.state
    }

    /// Pushes `value` into the filter, returning the filtered value.
    pub fn filter(&mut self, value: f32) -> f32 {
        self.filter.filter(&mut self.state, value)
    }

    /// Resets the accumulated history to the state just after construction.
    pub fn reset(&mut self) {
        self.state = F::State::default();
    }
}
