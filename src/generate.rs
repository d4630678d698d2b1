//! Sequence generation: prime a model with a prefix, then sample until
//! it ends the drawing.

use crate::error::{SketchError, SketchResult};
use crate::model::SequenceModel;
use crate::stroke::{PenState, StrokeSequence, StrokeToken};

/// Knobs for one generation run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationOptions {
    pub temperature: f64,
    /// Stop after this many sampled tokens. `None` = no bound.
    pub max_tokens: Option<usize>,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            temperature: 0.25,
            max_tokens: Some(512),
        }
    }
}

/// A completed sequence and how it got there.
#[derive(Debug, Clone, PartialEq)]
pub struct Generation {
    /// Prefix followed by every sampled token; always ends with `Pen::End`.
    pub sequence: StrokeSequence,
    pub prefix_len: usize,
    pub sampled: usize,
    /// The bound was hit and the end token was appended by the driver.
    pub truncated: bool,
}

/// Fold `zero_input` and then every prefix token through the model.
pub fn prime<M: SequenceModel>(model: &M, prefix: &StrokeSequence) -> SketchResult<M::State> {
    let mut state = model.update(model.zero_state(), &model.zero_input());
    let mut pen = PenState::default();
    for (index, token) in prefix.iter().enumerate() {
        if token.is_end() {
            return Err(SketchError::PrefixTerminated(index));
        }
        state = model.update(state, token);
        pen = pen.advance(token);
    }
    log::debug!("primed model with {} tokens, pen {:?}", prefix.len(), pen);
    Ok(state)
}

/// Complete `prefix` by sampling from `model`.
///
/// Sampling stops on the first end token, which is kept. When
/// `max_tokens` is reached first, a zero-offset end token is appended so
/// the result is still a finished sequence.
pub fn generate<M: SequenceModel>(
    model: &mut M,
    prefix: &StrokeSequence,
    options: &GenerationOptions,
) -> SketchResult<Generation> {
    if !options.temperature.is_finite() || options.temperature <= 0.0 {
        return Err(SketchError::InvalidConfig(format!(
            "temperature must be positive, got {}",
            options.temperature
        )));
    }

    let mut state = prime(model, prefix)?;
    let mut sequence = prefix.clone();
    let mut pen = prefix.pen_state();
    let mut sampled = 0;
    let mut truncated = false;

    while !pen.is_done() {
        if options.max_tokens.is_some_and(|max| sampled >= max) {
            log::warn!(
                "model did not end the drawing within {} tokens; ending it",
                sampled
            );
            sequence.push(StrokeToken::end())?;
            truncated = true;
            break;
        }

        let distribution = model.distribution(&state);
        let row = model.sample(&distribution, options.temperature);
        let token = StrokeToken::from_row(row).map_err(|e| {
            SketchError::ModelProtocol(format!("sample #{} is not a stroke-5 row: {}", sampled, e))
        })?;

        sequence.push(token)?;
        sampled += 1;
        pen = pen.advance(&token);
        if !pen.is_done() {
            state = model.update(state, &token);
        }
    }

    log::debug!(
        "generated {} tokens after a {}-token prefix{}",
        sampled,
        prefix.len(),
        if truncated { " (truncated)" } else { "" }
    );

    Ok(Generation {
        sequence,
        prefix_len: prefix.len(),
        sampled,
        truncated,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    /// Replays fixed rows. The state records every token it was fed, and
    /// each sample notes how long the state was when it was drawn.
    struct Scripted {
        rows: Vec<[f64; 5]>,
        next: usize,
        seen: Vec<usize>,
        updates: Cell<usize>,
    }

    impl Scripted {
        fn new(rows: Vec<[f64; 5]>) -> Self {
            Self {
                rows,
                next: 0,
                seen: Vec::new(),
                updates: Cell::new(0),
            }
        }
    }

    impl SequenceModel for Scripted {
        type State = Vec<StrokeToken>;
        type Distribution = usize;

        fn zero_state(&self) -> Vec<StrokeToken> {
            Vec::new()
        }

        fn zero_input(&self) -> StrokeToken {
            StrokeToken::down(0.0, 0.0)
        }

        fn update(&self, mut state: Vec<StrokeToken>, token: &StrokeToken) -> Vec<StrokeToken> {
            self.updates.set(self.updates.get() + 1);
            state.push(*token);
            state
        }

        fn distribution(&self, state: &Vec<StrokeToken>) -> usize {
            state.len()
        }

        fn sample(&mut self, distribution: &usize, _temperature: f64) -> [f64; 5] {
            self.seen.push(*distribution);
            let row = self.rows[self.next % self.rows.len()];
            self.next += 1;
            row
        }
    }

    fn prefix() -> StrokeSequence {
        StrokeSequence::from_tokens(vec![StrokeToken::down(1.0, 0.0), StrokeToken::up(0.0, 1.0)])
            .unwrap()
    }

    #[test]
    fn output_is_prefix_then_samples_ending_once() {
        let mut model = Scripted::new(vec![
            [2.0, 0.0, 1.0, 0.0, 0.0],
            [0.0, 2.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 0.0, 1.0],
        ]);
        let generation = generate(&mut model, &prefix(), &GenerationOptions::default()).unwrap();

        let tokens = generation.sequence.tokens();
        assert_eq!(&tokens[..2], prefix().tokens());
        assert_eq!(tokens.len(), 5);
        assert_eq!(tokens.iter().filter(|t| t.is_end()).count(), 1);
        assert!(tokens.last().unwrap().is_end());
        assert_eq!(generation.sampled, 3);
        assert!(!generation.truncated);
    }

    #[test]
    fn primes_with_zero_input_then_prefix() {
        let model = Scripted::new(vec![[0.0, 0.0, 0.0, 0.0, 1.0]]);
        let state = prime(&model, &prefix()).unwrap();
        assert_eq!(state.len(), 3);
        assert_eq!(state[0], StrokeToken::down(0.0, 0.0));
        assert_eq!(&state[1..], prefix().tokens());
    }

    #[test]
    fn each_sample_is_fed_back_before_the_next_draw() {
        let mut model = Scripted::new(vec![
            [2.0, 0.0, 1.0, 0.0, 0.0],
            [0.0, 2.0, 0.0, 1.0, 0.0],
            [1.0, 1.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 0.0, 0.0, 1.0],
        ]);
        generate(&mut model, &prefix(), &GenerationOptions::default()).unwrap();

        // zero input + two prefix tokens, then one more per sampled token
        assert_eq!(model.seen, vec![3, 4, 5, 6]);
    }

    #[test]
    fn end_token_is_not_fed_to_the_model() {
        let mut model = Scripted::new(vec![
            [4.0, 0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 0.0, 0.0, 1.0],
        ]);
        let generation = generate(&mut model, &prefix(), &GenerationOptions::default()).unwrap();
        assert_eq!(generation.sampled, 2);
        assert_eq!(model.seen, vec![3, 4]);
        // zero input, two prefix tokens, one sampled move; not the end
        assert_eq!(model.updates.get(), 4);
    }

    #[test]
    fn bound_appends_end_token() {
        let mut model = Scripted::new(vec![[1.0, 1.0, 1.0, 0.0, 0.0]]);
        let options = GenerationOptions {
            max_tokens: Some(10),
            ..GenerationOptions::default()
        };
        let generation = generate(&mut model, &prefix(), &options).unwrap();
        assert!(generation.truncated);
        assert_eq!(generation.sampled, 10);
        assert_eq!(generation.sequence.len(), 13);
        assert_eq!(generation.sequence.tokens().last(), Some(&StrokeToken::end()));
    }

    #[test]
    fn malformed_sample_is_fatal() {
        let mut model = Scripted::new(vec![[1.0, 1.0, 1.0, 1.0, 0.0]]);
        let result = generate(&mut model, &prefix(), &GenerationOptions::default());
        assert!(matches!(result, Err(SketchError::ModelProtocol(_))));
    }

    #[test]
    fn terminated_prefix_is_rejected() {
        let mut model = Scripted::new(vec![[0.0, 0.0, 0.0, 0.0, 1.0]]);
        let done = StrokeSequence::from_tokens(vec![StrokeToken::down(1.0, 0.0), StrokeToken::end()])
            .unwrap();
        let result = generate(&mut model, &done, &GenerationOptions::default());
        assert!(matches!(result, Err(SketchError::PrefixTerminated(1))));
    }

    #[test]
    fn empty_prefix_still_generates() {
        let mut model = Scripted::new(vec![[3.0, 4.0, 1.0, 0.0, 0.0], [0.0, 0.0, 0.0, 0.0, 1.0]]);
        let generation =
            generate(&mut model, &StrokeSequence::new(), &GenerationOptions::default()).unwrap();
        assert_eq!(generation.sequence.len(), 2);
        assert_eq!(generation.prefix_len, 0);
    }
}
