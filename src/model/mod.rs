//! The generative sequence model boundary.
//!
//! The pipeline never looks inside a model. It asks for an initial
//! state, folds tokens through `update`, and asks for a distribution to
//! sample the next token from. Any sequence model that can do those four
//! things plugs in here.

mod momentum;

pub use momentum::{MomentumModel, MomentumParams, MomentumState, StepDistribution};

use crate::stroke::StrokeToken;

/// A stroke-5 sequence model.
pub trait SequenceModel {
    /// Hidden state, threaded through every call.
    type State;
    /// Next-token distribution computed from a state.
    type Distribution;

    fn zero_state(&self) -> Self::State;

    /// The token fed once before any real input.
    fn zero_input(&self) -> StrokeToken;

    /// Condition the state on one more token.
    fn update(&self, state: Self::State, token: &StrokeToken) -> Self::State;

    fn distribution(&self, state: &Self::State) -> Self::Distribution;

    /// Draw the next token as a raw stroke-5 row. Lower temperatures
    /// concentrate the draw around the most likely outcome.
    fn sample(&mut self, distribution: &Self::Distribution, temperature: f64) -> [f64; 5];

    /// Scale between drawing units and model units. Models that work
    /// directly in drawing units can ignore it.
    fn set_pixel_factor(&mut self, _factor: f64) {}
}
