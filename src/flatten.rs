//! Curve flattening: BezPaths → polylines within a tolerance.

use kurbo::{BezPath, PathEl, Point};

use crate::document::Document;
use crate::error::{SketchError, SketchResult};

/// Tolerance used when the caller asks for zero or a non-finite value.
/// Line segments are exact at any tolerance; only curves depend on it.
const MIN_TOLERANCE: f64 = 1e-3;

/// A closed sub-path's last point this close to its first is a duplicate.
const CLOSE_EPSILON: f64 = 1e-9;

/// One contiguous sub-path after flattening.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FlattenedPath {
    pub points: Vec<Point>,
    pub closed: bool,
}

impl FlattenedPath {
    pub fn open(points: Vec<Point>) -> Self {
        Self {
            points,
            closed: false,
        }
    }

    pub fn closed(points: Vec<Point>) -> Self {
        Self {
            points,
            closed: true,
        }
    }

    /// Fewer than two points: nothing to draw.
    pub fn is_degenerate(&self) -> bool {
        self.points.len() < 2
    }

    fn length(&self) -> f64 {
        let open: f64 = self.points.windows(2).map(|w| w[0].distance(w[1])).sum();
        match (self.closed, self.points.first(), self.points.last()) {
            (true, Some(&first), Some(&last)) => open + last.distance(first),
            _ => open,
        }
    }
}

/// Flatten every drawable path of a document, in traversal order.
///
/// Paths that fail to flatten are logged and skipped; their siblings
/// are still processed.
pub fn flatten_document(document: &Document, tolerance: f64) -> Vec<FlattenedPath> {
    let mut result = Vec::new();
    for (index, item) in document.drawable_paths().enumerate() {
        match flatten(&item.path, tolerance) {
            Ok(paths) => result.extend(paths),
            Err(e) => log::warn!("skipping path #{}: {}", index, e),
        }
    }
    result
}

/// Flatten one BezPath into one polyline per sub-path.
///
/// Each `MoveTo` starts a new sub-path; `ClosePath` marks it closed.
/// Drawing that continues after a `ClosePath` without a `MoveTo` starts a
/// new sub-path at the closed one's start point. Zero-length sub-paths
/// come back with no points.
pub fn flatten(path: &BezPath, tolerance: f64) -> SketchResult<Vec<FlattenedPath>> {
    validate(path)?;

    let tolerance = if tolerance.is_finite() && tolerance > 0.0 {
        tolerance
    } else {
        MIN_TOLERANCE
    };

    let mut result = Vec::new();
    let mut current = FlattenedPath::default();
    // Start of the last closed sub-path; drawing after `Z` resumes there.
    let mut reopen_at: Option<Point> = None;
    kurbo::flatten(path.iter(), tolerance, |el| match el {
        PathEl::MoveTo(p) => {
            if !current.points.is_empty() {
                result.push(std::mem::take(&mut current));
            }
            reopen_at = None;
            current.points.push(p);
        }
        PathEl::LineTo(p) => {
            if current.points.is_empty() {
                current.points.extend(reopen_at.take());
            }
            current.points.push(p);
        }
        PathEl::ClosePath => {
            if current.points.is_empty() {
                return;
            }
            reopen_at = current.points.first().copied();
            current.closed = true;
            result.push(std::mem::take(&mut current));
        }
        // flatten only emits lines
        PathEl::QuadTo(..) | PathEl::CurveTo(..) => {}
    });
    if !current.points.is_empty() {
        result.push(current);
    }

    for sub_path in &mut result {
        finish_sub_path(sub_path);
    }
    Ok(result)
}

/// Drop the duplicated start point of closed paths and empty zero-length ones.
fn finish_sub_path(sub_path: &mut FlattenedPath) {
    if sub_path.closed && sub_path.points.len() > 1 {
        let first = sub_path.points[0];
        if sub_path
            .points
            .last()
            .is_some_and(|&last| last.distance(first) < CLOSE_EPSILON)
        {
            sub_path.points.pop();
        }
    }
    if sub_path.length() == 0.0 {
        sub_path.points.clear();
    }
}

fn validate(path: &BezPath) -> SketchResult<()> {
    let check = |p: &Point| -> SketchResult<()> {
        if p.x.is_finite() && p.y.is_finite() {
            Ok(())
        } else {
            Err(SketchError::Geometry(format!(
                "non-finite coordinate ({}, {})",
                p.x, p.y
            )))
        }
    };

    let mut started = false;
    for el in path.elements() {
        match el {
            PathEl::MoveTo(p) => {
                started = true;
                check(p)?;
            }
            PathEl::ClosePath => continue,
            _ if !started => {
                return Err(SketchError::Geometry("path does not start with MoveTo".into()));
            }
            PathEl::LineTo(p) => check(p)?,
            PathEl::QuadTo(c, p) => {
                check(c)?;
                check(p)?;
            }
            PathEl::CurveTo(c1, c2, p) => {
                check(c1)?;
                check(c2)?;
                check(p)?;
            }
        }
    }
    Ok(())
}
