/// Circle and line-segment intersection in the 2D sketch plane
use std::fmt;

use nalgebra::{Point2, Vector2};

/// Discriminants this close to zero (relative to B²) are rounding noise
/// around an exact tangent.
const TANGENT_EPSILON: f64 = 1e-12;

/// Slack on the `[0, 1]` parameter range so endpoints lying on the rim count as hits.
/// Accepted roots are clamped back onto the segment.
const PARAM_EPSILON: f64 = 1e-9;

/// A circle in normalized device coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: Point2<f64>,
    pub radius: f64,
}

impl Circle {
    pub fn new(center: Point2<f64>, radius: f64) -> Self {
        Self {
            center,
            radius: radius.abs(),
        }
    }

    /// Circle centred on the press point whose rim passes through the release point
    pub fn from_drag(center: Point2<f64>, rim: Point2<f64>) -> Self {
        Self::new(center, (rim - center).norm())
    }

    /// Points around the circumference, suitable for a line-loop draw
    pub fn outline(&self, segments: usize) -> Vec<Point2<f64>> {
        (0..segments)
            .map(|i| {
                let angle = (i as f64 / segments as f64) * std::f64::consts::TAU;
                self.center + Vector2::new(angle.cos(), angle.sin()) * self.radius
            })
            .collect()
    }

    pub fn contains_on_boundary(&self, point: &Point2<f64>, tolerance: f64) -> bool {
        ((point - self.center).norm() - self.radius).abs() <= tolerance
    }
}

/// A line segment between two committed points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: Point2<f64>,
    pub end: Point2<f64>,
}

impl Segment {
    pub fn new(start: Point2<f64>, end: Point2<f64>) -> Self {
        Self { start, end }
    }

    pub fn direction(&self) -> Vector2<f64> {
        self.end - self.start
    }

    pub fn length_squared(&self) -> f64 {
        self.direction().norm_squared()
    }

    /// `P(t) = start + t * (end - start)`
    pub fn point_at(&self, t: f64) -> Point2<f64> {
        self.start + self.direction() * t
    }
}

/// Result of intersecting a circle with a segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Intersection {
    None,
    One(Point2<f64>),
    /// Larger-parameter point first.
    Two(Point2<f64>, Point2<f64>),
}

impl Intersection {
    pub fn count(&self) -> usize {
        match self {
            Intersection::None => 0,
            Intersection::One(_) => 1,
            Intersection::Two(..) => 2,
        }
    }

    pub fn points(&self) -> Vec<Point2<f64>> {
        match *self {
            Intersection::None => Vec::new(),
            Intersection::One(p) => vec![p],
            Intersection::Two(p1, p2) => vec![p1, p2],
        }
    }

    /// Interleaved `x, y` coordinates for a point-list draw
    pub fn flat_points(&self) -> Vec<f32> {
        self.points()
            .iter()
            .flat_map(|p| [p.x as f32, p.y as f32])
            .collect()
    }
}

impl fmt::Display for Intersection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Intersection::None => write!(f, "No intersection"),
            Intersection::One(p) => write!(
                f,
                "Intersection Points: 1 | Point 1: ({:.2}, {:.2})",
                p.x, p.y
            ),
            Intersection::Two(p1, p2) => write!(
                f,
                "Intersection Points: 2 | Point 1: ({:.2}, {:.2}) | Point 2: ({:.2}, {:.2})",
                p1.x, p1.y, p2.x, p2.y
            ),
        }
    }
}

fn in_unit_range(t: f64) -> bool {
    (-PARAM_EPSILON..=1.0 + PARAM_EPSILON).contains(&t)
}

/// Intersect a circle with a segment by solving `|P(t) - c|² = r²` for `t ∈ [0, 1]`.
///
/// Zero-length and non-finite segments never intersect. A zero discriminant
/// always reports its single root, even when that touch point lies on the
/// carrier line beyond the segment's endpoints.
pub fn intersect(circle: &Circle, segment: &Segment) -> Intersection {
    let d = segment.direction();
    let f = segment.start - circle.center;

    let a = d.norm_squared();
    if a == 0.0 || !a.is_finite() {
        return Intersection::None;
    }
    let b = 2.0 * f.dot(&d);
    let c = f.norm_squared() - circle.radius * circle.radius;

    let mut disc = b * b - 4.0 * a * c;
    if disc < 0.0 && -disc <= TANGENT_EPSILON * b * b {
        disc = 0.0;
    }
    if disc < 0.0 || !disc.is_finite() {
        return Intersection::None;
    }

    let sqrt_disc = disc.sqrt();
    let t1 = (-b + sqrt_disc) / (2.0 * a);
    let t2 = (-b - sqrt_disc) / (2.0 * a);
    let (in1, in2) = (in_unit_range(t1), in_unit_range(t2));

    let on_segment = |t: f64| segment.point_at(t.clamp(0.0, 1.0));

    if disc > 0.0 && in1 && in2 {
        Intersection::Two(on_segment(t1), on_segment(t2))
    } else if disc == 0.0 || in1 || in2 {
        let point = if in1 {
            on_segment(t1)
        } else if in2 {
            on_segment(t2)
        } else {
            segment.point_at(t2)
        };
        Intersection::One(point)
    } else {
        Intersection::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_circle() -> Circle {
        Circle::new(Point2::origin(), 1.0)
    }

    #[test]
    fn test_horizontal_chord_through_center() {
        let seg = Segment::new(Point2::new(-2.0, 0.0), Point2::new(2.0, 0.0));
        match intersect(&unit_circle(), &seg) {
            Intersection::Two(p1, p2) => {
                assert_relative_eq!(p1, Point2::new(1.0, 0.0), epsilon = 1e-12);
                assert_relative_eq!(p2, Point2::new(-1.0, 0.0), epsilon = 1e-12);
            }
            other => panic!("expected two points, got {:?}", other),
        }
    }

    #[test]
    fn test_tangent_line_gives_one_point() {
        let seg = Segment::new(Point2::new(-2.0, 1.0), Point2::new(2.0, 1.0));
        match intersect(&unit_circle(), &seg) {
            Intersection::One(p) => {
                assert_relative_eq!(p, Point2::new(0.0, 1.0), epsilon = 1e-12);
            }
            other => panic!("expected one point, got {:?}", other),
        }
    }

    #[test]
    fn test_line_above_circle_misses() {
        let seg = Segment::new(Point2::new(-2.0, 1.5), Point2::new(2.0, 1.5));
        assert_eq!(intersect(&unit_circle(), &seg), Intersection::None);
    }

    #[test]
    fn test_segment_ending_inside_gives_entry_point() {
        // Ends at the centre, so the far root falls past t = 1.
        let seg = Segment::new(Point2::new(-2.0, 0.0), Point2::new(0.0, 0.0));
        match intersect(&unit_circle(), &seg) {
            Intersection::One(p) => assert_relative_eq!(p, Point2::new(-1.0, 0.0), epsilon = 1e-12),
            other => panic!("expected one point, got {:?}", other),
        }
    }

    #[test]
    fn test_segment_inside_circle_misses() {
        let seg = Segment::new(Point2::new(-0.5, 0.0), Point2::new(0.5, 0.0));
        assert_eq!(intersect(&unit_circle(), &seg), Intersection::None);
    }

    #[test]
    fn test_zero_length_segment_is_none() {
        let p = Point2::new(1.0, 0.0);
        assert_eq!(intersect(&unit_circle(), &Segment::new(p, p)), Intersection::None);
    }

    #[test]
    fn test_tangent_beyond_segment_reports_touch_point_off_segment() {
        // The line y = 1 touches at t = -2, outside the drawn segment.
        let seg = Segment::new(Point2::new(2.0, 1.0), Point2::new(3.0, 1.0));
        assert_eq!(
            intersect(&unit_circle(), &seg),
            Intersection::One(Point2::new(0.0, 1.0))
        );
    }

    #[test]
    fn test_root_just_past_end_is_clamped_onto_segment() {
        let seg = Segment::new(Point2::origin(), Point2::new(1.0 - 5e-10, 0.0));
        assert_eq!(intersect(&unit_circle(), &seg), Intersection::One(seg.end));
    }

    #[test]
    fn test_from_drag_radius() {
        let circle = Circle::from_drag(Point2::new(0.1, 0.2), Point2::new(0.4, 0.6));
        assert_relative_eq!(circle.radius, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_outline_lies_on_circle() {
        let circle = Circle::new(Point2::new(0.3, -0.2), 0.4);
        let outline = circle.outline(100);
        assert_eq!(outline.len(), 100);
        assert!(outline.iter().all(|p| circle.contains_on_boundary(p, 1e-12)));
    }

    #[test]
    fn test_overlay_text() {
        let two = Intersection::Two(Point2::new(1.0, 0.0), Point2::new(-1.0, 0.0));
        assert_eq!(
            two.to_string(),
            "Intersection Points: 2 | Point 1: (1.00, 0.00) | Point 2: (-1.00, 0.00)"
        );
        assert_eq!(
            Intersection::One(Point2::new(0.0, 1.0)).to_string(),
            "Intersection Points: 1 | Point 1: (0.00, 1.00)"
        );
        assert_eq!(Intersection::None.to_string(), "No intersection");
    }

    #[test]
    fn test_flat_points() {
        let two = Intersection::Two(Point2::new(1.0, 0.5), Point2::new(-1.0, 0.25));
        assert_eq!(two.flat_points(), vec![1.0, 0.5, -1.0, 0.25]);
        assert_eq!(two.count(), 2);
    }
}
