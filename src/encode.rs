//! Stroke encoding: flattened polylines → stroke-5 tokens.
//!
//! Every token is an offset from the running cursor. The first point of
//! the drawing only places the cursor; later sub-paths are entered with a
//! move from wherever the previous one ended. The pen flag on a token
//! describes the segment that *follows* it, so the last point of an open
//! path lifts the pen.

use kurbo::Point;

use crate::flatten::FlattenedPath;
use crate::stroke::{Pen, StrokeSequence, StrokeToken};

/// Running "last point" accumulator threaded through encoding.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Cursor {
    /// `None` until the first drawable point has been seen.
    position: Option<Point>,
}

impl Cursor {
    /// A cursor already placed at `point`.
    pub fn at(point: Point) -> Self {
        Self {
            position: Some(point),
        }
    }

    pub fn position(&self) -> Option<Point> {
        self.position
    }
}

/// Result of encoding a drawing.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedDrawing {
    /// Absolute position of the first point. Decoding from here puts the
    /// strokes back where they came from.
    pub origin: Point,
    pub sequence: StrokeSequence,
}

/// Encode flattened paths in order.
pub fn encode(paths: &[FlattenedPath]) -> EncodedDrawing {
    let mut tokens = Vec::new();
    let mut cursor = Cursor::default();
    for path in paths {
        cursor = encode_path(path, cursor, &mut tokens);
    }
    let origin = first_drawn_point(paths).unwrap_or(Point::ORIGIN);

    log::debug!(
        "encoded {} paths into {} tokens starting at ({:.1}, {:.1})",
        paths.len(),
        tokens.len(),
        origin.x,
        origin.y
    );

    EncodedDrawing {
        origin,
        sequence: StrokeSequence::from_unterminated(tokens),
    }
}

/// Encode one sub-path, appending to `out`. Returns the advanced cursor.
///
/// Degenerate (single-point or empty) paths emit nothing and leave the
/// cursor where it was.
pub fn encode_path(path: &FlattenedPath, cursor: Cursor, out: &mut Vec<StrokeToken>) -> Cursor {
    if path.is_degenerate() {
        return cursor;
    }
    let points = &path.points;
    let last_index = points.len() - 1;

    let mut last = match cursor.position {
        Some(last) => {
            // Move to the start of this sub-path. Whether that move draws
            // was decided by the previous token's pen flag.
            out.push(delta(last, points[0], Pen::Down));
            points[0]
        }
        None => points[0],
    };

    for (i, &point) in points.iter().enumerate().skip(1) {
        let pen = if !path.closed && i == last_index {
            Pen::Up
        } else {
            Pen::Down
        };
        out.push(delta(last, point, pen));
        last = point;
    }

    if path.closed {
        out.push(delta(last, points[0], Pen::Down));
        last = points[0];
    }

    Cursor::at(last)
}

fn delta(from: Point, to: Point, pen: Pen) -> StrokeToken {
    StrokeToken::new(to.x - from.x, to.y - from.y, pen)
}

fn first_drawn_point(paths: &[FlattenedPath]) -> Option<Point> {
    paths
        .iter()
        .find(|path| !path.is_degenerate())
        .map(|path| path.points[0])
}
