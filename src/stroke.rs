//! Stroke-5 tokens and sequences.
//!
//! A token is `(dx, dy, pen_down, pen_up, pen_end)`: an offset from the
//! previous absolute point plus the pen state for the *next* segment.
//! Exactly one pen flag is set. `pen_end` closes the sequence.

use std::fmt;

use kurbo::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::{SketchError, SketchResult};

/// Pen state carried by a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pen {
    /// The next segment continues the current sub-path.
    Down,
    /// The next segment starts a new sub-path.
    Up,
    /// The sequence is complete.
    End,
}

/// One step of a drawing sequence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[f64; 5]", into = "[f64; 5]")]
pub struct StrokeToken {
    pub dx: f64,
    pub dy: f64,
    pub pen: Pen,
}

impl StrokeToken {
    pub fn new(dx: f64, dy: f64, pen: Pen) -> Self {
        Self { dx, dy, pen }
    }

    pub fn down(dx: f64, dy: f64) -> Self {
        Self::new(dx, dy, Pen::Down)
    }

    pub fn up(dx: f64, dy: f64) -> Self {
        Self::new(dx, dy, Pen::Up)
    }

    /// A zero-offset terminal token.
    pub fn end() -> Self {
        Self::new(0.0, 0.0, Pen::End)
    }

    pub fn offset(&self) -> Vec2 {
        Vec2::new(self.dx, self.dy)
    }

    pub fn is_end(&self) -> bool {
        self.pen == Pen::End
    }

    /// The stroke-5 wire row `[dx, dy, pen_down, pen_up, pen_end]`.
    pub fn to_row(&self) -> [f64; 5] {
        let (down, up, end) = match self.pen {
            Pen::Down => (1.0, 0.0, 0.0),
            Pen::Up => (0.0, 1.0, 0.0),
            Pen::End => (0.0, 0.0, 1.0),
        };
        [self.dx, self.dy, down, up, end]
    }

    /// Parse a stroke-5 wire row.
    ///
    /// Flags must be 0 or 1. With `pen_end` set the other flags are
    /// ignored; otherwise exactly one of `pen_down`/`pen_up` must be set.
    pub fn from_row(row: [f64; 5]) -> SketchResult<Self> {
        let [dx, dy, down, up, end] = row;
        if !dx.is_finite() || !dy.is_finite() {
            return Err(SketchError::InvalidToken(format!(
                "non-finite offset ({}, {})",
                dx, dy
            )));
        }
        let flag = |value: f64, name: &str| -> SketchResult<bool> {
            if value == 0.0 {
                Ok(false)
            } else if value == 1.0 {
                Ok(true)
            } else {
                Err(SketchError::InvalidToken(format!(
                    "{} flag must be 0 or 1, got {}",
                    name, value
                )))
            }
        };
        let down = flag(down, "pen_down")?;
        let up = flag(up, "pen_up")?;
        let end = flag(end, "pen_end")?;

        let pen = match (down, up, end) {
            (_, _, true) => Pen::End,
            (true, false, false) => Pen::Down,
            (false, true, false) => Pen::Up,
            _ => {
                return Err(SketchError::InvalidToken(format!(
                    "pen_down and pen_up must be one-hot, got [{}, {}, {}]",
                    down as u8, up as u8, end as u8
                )))
            }
        };
        Ok(Self { dx, dy, pen })
    }
}

impl From<StrokeToken> for [f64; 5] {
    fn from(token: StrokeToken) -> Self {
        token.to_row()
    }
}

impl TryFrom<[f64; 5]> for StrokeToken {
    type Error = SketchError;

    fn try_from(row: [f64; 5]) -> Result<Self, Self::Error> {
        StrokeToken::from_row(row)
    }
}

impl fmt::Display for StrokeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [dx, dy, down, up, end] = self.to_row();
        write!(f, "({}, {}, {}, {}, {})", dx, dy, down, up, end)
    }
}

/// Pen state observed while walking a sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PenState {
    /// Pen not yet placed, or lifted between sub-paths.
    #[default]
    Lifted,
    Drawing,
    /// Terminal: no further tokens may be consumed.
    Done,
}

impl PenState {
    /// Transition on one token. `Done` has no outgoing transitions.
    pub fn advance(self, token: &StrokeToken) -> PenState {
        match (self, token.pen) {
            (PenState::Done, _) => PenState::Done,
            (_, Pen::Down) => PenState::Drawing,
            (_, Pen::Up) => PenState::Lifted,
            (_, Pen::End) => PenState::Done,
        }
    }

    pub fn is_done(self) -> bool {
        self == PenState::Done
    }
}

/// Ordered stroke tokens. Append-only; nothing may follow an end token.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<StrokeToken>", into = "Vec<StrokeToken>")]
pub struct StrokeSequence {
    tokens: Vec<StrokeToken>,
}

impl StrokeSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a sequence, checking that an end token (if any) comes last.
    pub fn from_tokens(tokens: Vec<StrokeToken>) -> SketchResult<Self> {
        let mut sequence = Self::with_capacity(tokens.len());
        for token in tokens {
            sequence.push(token)?;
        }
        Ok(sequence)
    }

    /// Wrap tokens known to contain no end token.
    pub(crate) fn from_unterminated(tokens: Vec<StrokeToken>) -> Self {
        debug_assert!(!tokens.iter().any(StrokeToken::is_end));
        Self { tokens }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            tokens: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, token: StrokeToken) -> SketchResult<()> {
        if self.is_finished() {
            return Err(SketchError::SequenceFinished);
        }
        self.tokens.push(token);
        Ok(())
    }

    /// True once the last token is an end token.
    pub fn is_finished(&self) -> bool {
        self.tokens.last().is_some_and(StrokeToken::is_end)
    }

    pub fn tokens(&self) -> &[StrokeToken] {
        &self.tokens
    }

    pub fn iter(&self) -> std::slice::Iter<'_, StrokeToken> {
        self.tokens.iter()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// The pen state after walking every token.
    pub fn pen_state(&self) -> PenState {
        self.tokens
            .iter()
            .fold(PenState::default(), |state, token| state.advance(token))
    }

    /// All tokens as stroke-5 rows.
    pub fn to_rows(&self) -> Vec<[f64; 5]> {
        self.tokens.iter().map(StrokeToken::to_row).collect()
    }
}

impl TryFrom<Vec<StrokeToken>> for StrokeSequence {
    type Error = SketchError;

    fn try_from(tokens: Vec<StrokeToken>) -> Result<Self, Self::Error> {
        StrokeSequence::from_tokens(tokens)
    }
}

impl From<StrokeSequence> for Vec<StrokeToken> {
    fn from(sequence: StrokeSequence) -> Self {
        sequence.tokens
    }
}

impl<'a> IntoIterator for &'a StrokeSequence {
    type Item = &'a StrokeToken;
    type IntoIter = std::slice::Iter<'a, StrokeToken>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_rows_are_one_hot() {
        assert_eq!(StrokeToken::down(1.0, 2.0).to_row(), [1.0, 2.0, 1.0, 0.0, 0.0]);
        assert_eq!(StrokeToken::up(1.0, 2.0).to_row(), [1.0, 2.0, 0.0, 1.0, 0.0]);
        assert_eq!(StrokeToken::end().to_row(), [0.0, 0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn end_flag_wins_over_other_flags() {
        let token = StrokeToken::from_row([3.0, 4.0, 1.0, 0.0, 1.0]).unwrap();
        assert_eq!(token.pen, Pen::End);
    }

    #[test]
    fn malformed_rows_are_rejected() {
        assert!(StrokeToken::from_row([0.0, 0.0, 1.0, 1.0, 0.0]).is_err());
        assert!(StrokeToken::from_row([0.0, 0.0, 0.0, 0.0, 0.0]).is_err());
        assert!(StrokeToken::from_row([0.0, 0.0, 0.5, 0.5, 0.0]).is_err());
        assert!(StrokeToken::from_row([f64::NAN, 0.0, 1.0, 0.0, 0.0]).is_err());
    }

    #[test]
    fn pen_state_machine() {
        let mut state = PenState::default();
        assert_eq!(state, PenState::Lifted);
        state = state.advance(&StrokeToken::down(1.0, 0.0));
        assert_eq!(state, PenState::Drawing);
        state = state.advance(&StrokeToken::up(1.0, 0.0));
        assert_eq!(state, PenState::Lifted);
        state = state.advance(&StrokeToken::end());
        assert!(state.is_done());
        state = state.advance(&StrokeToken::down(1.0, 0.0));
        assert!(state.is_done());
    }

    #[test]
    fn nothing_follows_an_end_token() {
        let mut sequence = StrokeSequence::new();
        sequence.push(StrokeToken::down(1.0, 1.0)).unwrap();
        sequence.push(StrokeToken::end()).unwrap();
        assert!(sequence.is_finished());
        assert!(matches!(
            sequence.push(StrokeToken::down(1.0, 1.0)),
            Err(SketchError::SequenceFinished)
        ));
        assert_eq!(sequence.len(), 2);
    }

    #[test]
    fn json_uses_stroke5_rows() {
        let sequence =
            StrokeSequence::from_tokens(vec![StrokeToken::up(10.0, -2.5), StrokeToken::end()])
                .unwrap();
        let json = serde_json::to_string(&sequence).unwrap();
        assert_eq!(json, "[[10.0,-2.5,0.0,1.0,0.0],[0.0,0.0,0.0,0.0,1.0]]");

        let parsed: StrokeSequence = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, sequence);

        let trailing = "[[0,0,0,0,1],[1,1,1,0,0]]";
        assert!(serde_json::from_str::<StrokeSequence>(trailing).is_err());
    }
}
