//! A small stochastic stroke model.
//!
//! Each step continues roughly in the direction and at the speed of the
//! recent strokes, with Gaussian jitter on both. Pen lifts and the end of
//! the drawing are fixed per-step probabilities. It is a stand-in for a
//! trained sequence model: cheap, seedable and good enough to extend a
//! sketch with plausible scribbles.

use std::f64::consts::TAU;
use std::path::Path;

use kurbo::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::SequenceModel;
use crate::error::{SketchError, SketchResult};
use crate::stroke::{Pen, StrokeToken};

/// Tunable parameters, loadable from JSON. Missing fields take defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MomentumParams {
    /// Initial step length in model units.
    pub step_length: f64,
    /// Relative standard deviation of the step length.
    pub step_jitter: f64,
    /// Standard deviation of the heading change per step (radians).
    pub turn_jitter: f64,
    /// How much of the previous heading/speed survives each update (0..1).
    pub momentum: f64,
    /// Length of the jump to a new sub-path after a pen lift.
    pub lift_jump: f64,
    pub pen_up_probability: f64,
    pub end_probability: f64,
}

impl Default for MomentumParams {
    fn default() -> Self {
        Self {
            step_length: 6.0,
            step_jitter: 0.35,
            turn_jitter: 0.5,
            momentum: 0.7,
            lift_jump: 20.0,
            pen_up_probability: 0.04,
            end_probability: 0.01,
        }
    }
}

impl MomentumParams {
    fn validate(&self) -> SketchResult<()> {
        let probability = |value: f64| (0.0..=1.0).contains(&value);
        if !probability(self.pen_up_probability)
            || !probability(self.end_probability)
            || self.pen_up_probability + self.end_probability > 1.0
        {
            return Err(SketchError::ModelLoad(format!(
                "pen probabilities out of range: up={} end={}",
                self.pen_up_probability, self.end_probability
            )));
        }
        if !probability(self.momentum) {
            return Err(SketchError::ModelLoad(format!(
                "momentum must be in [0, 1], got {}",
                self.momentum
            )));
        }
        let lengths = [
            self.step_length,
            self.step_jitter,
            self.turn_jitter,
            self.lift_jump,
        ];
        if lengths.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(SketchError::ModelLoad(
                "lengths and jitters must be finite and non-negative".into(),
            ));
        }
        Ok(())
    }
}

/// Hidden state: where the pen is heading and how fast.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MomentumState {
    pub heading: f64,
    pub speed: f64,
    pub lifted: bool,
    pub steps: usize,
}

/// Distribution over the next step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepDistribution {
    pub heading: f64,
    pub length: f64,
    pub turn_sigma: f64,
    pub length_sigma: f64,
    /// Probabilities of pen down, pen up, end. Sums to 1.
    pub pen: [f64; 3],
}

pub struct MomentumModel {
    params: MomentumParams,
    pixel_factor: f64,
    rng: StdRng,
}

impl MomentumModel {
    pub fn new(params: MomentumParams, seed: u64) -> SketchResult<Self> {
        params.validate()?;
        Ok(Self {
            params,
            pixel_factor: 1.0,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    pub fn from_json(text: &str, seed: u64) -> SketchResult<Self> {
        let params: MomentumParams =
            serde_json::from_str(text).map_err(|e| SketchError::ModelLoad(e.to_string()))?;
        Self::new(params, seed)
    }

    pub fn load(path: &Path, seed: u64) -> SketchResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text, seed)
    }

    pub fn params(&self) -> &MomentumParams {
        &self.params
    }

    /// One standard normal draw (Box-Muller).
    fn standard_normal(&mut self) -> f64 {
        let u1: f64 = 1.0 - self.rng.gen::<f64>();
        let u2: f64 = self.rng.gen::<f64>();
        (-2.0 * u1.ln()).sqrt() * (TAU * u2).cos()
    }

    fn sample_pen(&mut self, pen: [f64; 3], temperature: f64) -> Pen {
        let weights = adjust_temperature(pen, temperature);
        let mut draw: f64 = self.rng.gen();
        for (weight, pen) in weights.iter().zip([Pen::Down, Pen::Up, Pen::End]) {
            if draw < *weight {
                return pen;
            }
            draw -= weight;
        }
        Pen::Down
    }
}

impl SequenceModel for MomentumModel {
    type State = MomentumState;
    type Distribution = StepDistribution;

    fn zero_state(&self) -> MomentumState {
        MomentumState {
            heading: 0.0,
            speed: self.params.step_length,
            lifted: true,
            steps: 0,
        }
    }

    fn zero_input(&self) -> StrokeToken {
        StrokeToken::down(0.0, 0.0)
    }

    fn update(&self, state: MomentumState, token: &StrokeToken) -> MomentumState {
        let offset = token.offset() / self.pixel_factor;
        let length = offset.hypot();
        let keep = self.params.momentum;

        let (heading, speed) = if length > 0.0 && !state.lifted {
            let previous = Vec2::from_angle(state.heading);
            let blended = previous * keep + (offset / length) * (1.0 - keep);
            let heading = if blended.hypot2() > 0.0 {
                blended.atan2()
            } else {
                offset.atan2()
            };
            (heading, state.speed * keep + length * (1.0 - keep))
        } else if length > 0.0 {
            // the jump after a lift sets direction but not pace
            (offset.atan2(), state.speed)
        } else {
            (state.heading, state.speed)
        };

        MomentumState {
            heading,
            speed,
            lifted: token.pen == Pen::Up,
            steps: state.steps + 1,
        }
    }

    fn distribution(&self, state: &MomentumState) -> StepDistribution {
        let up = self.params.pen_up_probability;
        let end = self.params.end_probability;
        let length = if state.lifted {
            self.params.lift_jump
        } else {
            state.speed
        };
        StepDistribution {
            heading: state.heading,
            length,
            turn_sigma: if state.lifted { TAU } else { self.params.turn_jitter },
            length_sigma: self.params.step_jitter,
            pen: [1.0 - up - end, up, end],
        }
    }

    fn sample(&mut self, distribution: &StepDistribution, temperature: f64) -> [f64; 5] {
        let spread = temperature.sqrt();
        let angle = distribution.heading + self.standard_normal() * distribution.turn_sigma * spread;
        let stretch = 1.0 + self.standard_normal() * distribution.length_sigma * spread;
        let length = (distribution.length * stretch).max(0.0);
        let offset = Vec2::from_angle(angle) * length * self.pixel_factor;

        let pen = self.sample_pen(distribution.pen, temperature);
        StrokeToken::new(offset.x, offset.y, pen).to_row()
    }

    fn set_pixel_factor(&mut self, factor: f64) {
        self.pixel_factor = factor;
    }
}

/// Sharpen (T < 1) or flatten (T > 1) a categorical distribution.
fn adjust_temperature(probabilities: [f64; 3], temperature: f64) -> [f64; 3] {
    let scaled = probabilities.map(|p| if p > 0.0 { p.powf(1.0 / temperature) } else { 0.0 });
    let total: f64 = scaled.iter().sum();
    if total > 0.0 {
        scaled.map(|p| p / total)
    } else {
        [1.0, 0.0, 0.0]
    }
}
