//! Stroke decoding: stroke-5 tokens → absolute sub-paths.

use kurbo::{Point, Rect};

use crate::stroke::{Pen, StrokeSequence, StrokeToken};

/// Polylines recovered from a sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedStrokes {
    /// One polyline per pen-down run, in drawing order. Never empty.
    pub sub_paths: Vec<Vec<Point>>,
    /// Bounds of every sub-path point; `None` when nothing was drawn.
    pub bounds: Option<Rect>,
}

/// Decode a sequence starting with the cursor at `start`.
///
/// A token's offset is drawn only if the *previous* token left the pen
/// down; a token with `Pen::Up` finishes the current sub-path. The first
/// token counts as following a pen-down. Decoding stops right after the
/// first end token.
pub fn decode(sequence: &StrokeSequence, start: Point) -> DecodedStrokes {
    decode_tokens(sequence.tokens(), start)
}

pub fn decode_tokens(tokens: &[StrokeToken], start: Point) -> DecodedStrokes {
    let mut sub_paths = Vec::new();
    let mut current: Vec<Point> = Vec::new();
    let mut cursor = start;
    let mut previous = Pen::Down;

    for token in tokens {
        if previous == Pen::End {
            break;
        }

        let next = cursor + token.offset();
        if previous == Pen::Down {
            if current.is_empty() {
                current.push(cursor);
            }
            current.push(next);
        }

        if token.pen == Pen::Up && !current.is_empty() {
            sub_paths.push(std::mem::take(&mut current));
        }

        cursor = next;
        previous = token.pen;
    }
    if !current.is_empty() {
        sub_paths.push(current);
    }

    let bounds = bounds_of(&sub_paths);
    log::debug!(
        "decoded {} sub-paths, {} points",
        sub_paths.len(),
        sub_paths.iter().map(Vec::len).sum::<usize>()
    );
    DecodedStrokes { sub_paths, bounds }
}

fn bounds_of(sub_paths: &[Vec<Point>]) -> Option<Rect> {
    let mut points = sub_paths.iter().flatten();
    let first = points.next()?;
    Some(points.fold(Rect::from_points(*first, *first), |rect, p| rect.union_pt(*p)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::encode;
    use crate::flatten::FlattenedPath;

    fn seq(rows: &[[f64; 5]]) -> StrokeSequence {
        StrokeSequence::from_tokens(
            rows.iter()
                .map(|row| StrokeToken::from_row(*row).unwrap())
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn stops_after_end_token() {
        let tokens: Vec<StrokeToken> = vec![
            StrokeToken::down(5.0, 0.0),
            StrokeToken::up(0.0, 5.0),
            StrokeToken::end(),
            StrokeToken::down(100.0, 100.0),
        ];
        let decoded = decode_tokens(&tokens, Point::ORIGIN);
        assert_eq!(
            decoded.sub_paths,
            vec![vec![Point::new(0.0, 0.0), Point::new(5.0, 0.0), Point::new(5.0, 5.0)]]
        );
        assert_eq!(decoded.bounds, Some(Rect::new(0.0, 0.0, 5.0, 5.0)));
    }

    #[test]
    fn pen_up_starts_a_new_sub_path() {
        let decoded = decode(
            &seq(&[
                [1.0, 0.0, 0.0, 1.0, 0.0],
                [10.0, 0.0, 1.0, 0.0, 0.0],
                [1.0, 1.0, 1.0, 0.0, 0.0],
                [0.0, 0.0, 0.0, 0.0, 1.0],
            ]),
            Point::ORIGIN,
        );
        assert_eq!(decoded.sub_paths.len(), 2);
        assert_eq!(decoded.sub_paths[0], vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0)]);
        assert_eq!(
            decoded.sub_paths[1],
            vec![Point::new(11.0, 0.0), Point::new(12.0, 1.0), Point::new(12.0, 1.0)]
        );
    }

    #[test]
    fn polyline_round_trips() {
        let original = vec![
            Point::new(12.5, -3.0),
            Point::new(20.0, 4.25),
            Point::new(31.0, 4.0),
            Point::new(18.0, 30.0),
        ];
        let encoded = encode(&[FlattenedPath::open(original.clone())]);
        let decoded = decode(&encoded.sequence, encoded.origin);

        assert_eq!(decoded.sub_paths.len(), 1);
        let points = &decoded.sub_paths[0];
        assert_eq!(points.len(), original.len());
        for (a, b) in points.iter().zip(&original) {
            assert!(a.distance(*b) < 1e-9, "{:?} != {:?}", a, b);
        }
    }

    #[test]
    fn nothing_drawn_has_no_bounds() {
        let decoded = decode(&seq(&[[0.0, 0.0, 0.0, 0.0, 1.0]]), Point::ORIGIN);
        assert!(decoded.sub_paths.is_empty());
        assert_eq!(decoded.bounds, None);
    }
}
