use kurbo::{BezPath, Point};

/// Smooth a polyline into cubic segments through every point (uniform
/// Catmull-Rom). The end points are repeated so the curve starts and
/// stops on the first and last point.
pub fn catmull_rom(points: &[Point]) -> BezPath {
    let mut path = BezPath::new();
    match points.len() {
        0 => {}
        1 => path.move_to(points[0]),
        2 => {
            path.move_to(points[0]);
            path.line_to(points[1]);
        }
        count => {
            path.move_to(points[0]);
            for i in 0..count - 1 {
                let p0 = points[i.saturating_sub(1)];
                let p1 = points[i];
                let p2 = points[i + 1];
                let p3 = points[(i + 2).min(count - 1)];
                let c1 = p1 + (p2 - p0) / 6.0;
                let c2 = p2 - (p3 - p1) / 6.0;
                path.curve_to(c1, c2, p2);
            }
        }
    }
    path
}

/// Straight segments through every point.
pub fn polyline(points: &[Point]) -> BezPath {
    let mut path = BezPath::new();
    if let Some((first, rest)) = points.split_first() {
        path.move_to(*first);
        for p in rest {
            path.line_to(*p);
        }
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::PathEl;

    #[test]
    fn curve_passes_through_every_point() {
        let points = [
            Point::new(0.0, 0.0),
            Point::new(10.0, 5.0),
            Point::new(20.0, 0.0),
            Point::new(30.0, 8.0),
        ];
        let path = catmull_rom(&points);
        let ends: Vec<Point> = path.elements().iter().filter_map(|el| el.end_point()).collect();
        assert_eq!(ends, points.to_vec());
        assert!(matches!(path.elements()[1], PathEl::CurveTo(..)));
    }

    #[test]
    fn two_points_stay_a_line() {
        let path = catmull_rom(&[Point::new(0.0, 0.0), Point::new(3.0, 4.0)]);
        assert!(matches!(path.elements()[1], PathEl::LineTo(_)));
    }

    #[test]
    fn collinear_points_stay_straight() {
        let path = catmull_rom(&[Point::new(0.0, 0.0), Point::new(5.0, 0.0), Point::new(10.0, 0.0)]);
        for el in path.elements() {
            if let PathEl::CurveTo(c1, c2, _) = el {
                assert_eq!(c1.y, 0.0);
                assert_eq!(c2.y, 0.0);
            }
        }
    }
}
