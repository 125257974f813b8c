/// Pointer-driven circle and segment sketch
///
/// The first drag places a circle (press = centre, release = rim), the second
/// drag places a segment, and the intersection is computed once on release.
use nalgebra::Point2;

use crate::intersect::{intersect, Circle, Intersection, Segment};

/// Progress through the two-drag sequence
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SketchState {
    Idle,
    DraggingCircle {
        center: Point2<f64>,
        rim: Option<Point2<f64>>,
    },
    CircleCommitted,
    DraggingSegment {
        start: Point2<f64>,
        end: Option<Point2<f64>>,
    },
    Complete,
}

/// Shape under construction, drawn as a rubber band while dragging
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Preview {
    Circle(Circle),
    Segment(Segment),
}

/// What a pointer release committed
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SketchEvent {
    CircleCommitted(Circle),
    SegmentCommitted(Segment, Intersection),
}

/// Convert canvas pixel coordinates to normalized device coordinates (y up)
pub fn canvas_to_ndc(x: f64, y: f64, width: f64, height: f64) -> Point2<f64> {
    Point2::new((x / width) * 2.0 - 1.0, -((y / height) * 2.0 - 1.0))
}

#[derive(Debug, Clone)]
pub struct Sketch {
    state: SketchState,
    circle: Option<Circle>,
    segment: Option<Segment>,
    intersection: Option<Intersection>,
}

impl Sketch {
    pub fn new() -> Self {
        Self {
            state: SketchState::Idle,
            circle: None,
            segment: None,
            intersection: None,
        }
    }

    pub fn state(&self) -> SketchState {
        self.state
    }

    pub fn circle(&self) -> Option<&Circle> {
        self.circle.as_ref()
    }

    pub fn segment(&self) -> Option<&Segment> {
        self.segment.as_ref()
    }

    pub fn intersection(&self) -> Option<&Intersection> {
        self.intersection.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        matches!(
            self.state,
            SketchState::DraggingCircle { .. } | SketchState::DraggingSegment { .. }
        )
    }

    pub fn pointer_down(&mut self, point: Point2<f64>) {
        self.state = match self.state {
            SketchState::Idle => SketchState::DraggingCircle {
                center: point,
                rim: None,
            },
            SketchState::CircleCommitted => SketchState::DraggingSegment {
                start: point,
                end: None,
            },
            other => other,
        };
    }

    pub fn pointer_move(&mut self, point: Point2<f64>) {
        match &mut self.state {
            SketchState::DraggingCircle { rim, .. } => *rim = Some(point),
            SketchState::DraggingSegment { end, .. } => *end = Some(point),
            _ => {}
        }
    }

    /// Commit the current drag. A press released without any movement commits nothing.
    pub fn pointer_up(&mut self) -> Option<SketchEvent> {
        match self.state {
            SketchState::DraggingCircle { center, rim } => match rim {
                Some(rim) => {
                    let circle = Circle::from_drag(center, rim);
                    log::debug!(
                        "circle committed: center ({:.2}, {:.2}) radius {:.2}",
                        circle.center.x,
                        circle.center.y,
                        circle.radius
                    );
                    self.circle = Some(circle);
                    self.state = SketchState::CircleCommitted;
                    Some(SketchEvent::CircleCommitted(circle))
                }
                None => {
                    self.state = SketchState::Idle;
                    None
                }
            },
            SketchState::DraggingSegment { start, end } => {
                let (Some(end), Some(circle)) = (end, self.circle) else {
                    self.state = SketchState::CircleCommitted;
                    return None;
                };
                let segment = Segment::new(start, end);
                let hit = intersect(&circle, &segment);
                log::debug!("segment committed, {} intersection point(s)", hit.count());
                self.segment = Some(segment);
                self.intersection = Some(hit);
                self.state = SketchState::Complete;
                Some(SketchEvent::SegmentCommitted(segment, hit))
            }
            _ => None,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn preview(&self) -> Option<Preview> {
        match self.state {
            SketchState::DraggingCircle {
                center,
                rim: Some(rim),
            } => Some(Preview::Circle(Circle::from_drag(center, rim))),
            SketchState::DraggingSegment {
                start,
                end: Some(end),
            } => Some(Preview::Segment(Segment::new(start, end))),
            _ => None,
        }
    }

    /// Overlay text lines for the committed shapes, in display order
    pub fn overlay_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if let Some(c) = &self.circle {
            lines.push(format!(
                "Circle: center({:.2}, {:.2}) radius = {:.2}",
                c.center.x, c.center.y, c.radius
            ));
        }
        if let Some(s) = &self.segment {
            lines.push(format!(
                "Line segment: ({:.2}, {:.2}) ~ ({:.2}, {:.2})",
                s.start.x, s.start.y, s.end.x, s.end.y
            ));
        }
        if let Some(hit) = &self.intersection {
            lines.push(hit.to_string());
        }
        lines
    }
}

impl Default for Sketch {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drag(sketch: &mut Sketch, from: (f64, f64), to: (f64, f64)) -> Option<SketchEvent> {
        sketch.pointer_down(Point2::new(from.0, from.1));
        sketch.pointer_move(Point2::new(to.0, to.1));
        sketch.pointer_up()
    }

    #[test]
    fn test_canvas_to_ndc() {
        assert_eq!(canvas_to_ndc(0.0, 0.0, 700.0, 700.0), Point2::new(-1.0, 1.0));
        assert_eq!(canvas_to_ndc(350.0, 350.0, 700.0, 700.0), Point2::new(0.0, 0.0));
        assert_eq!(canvas_to_ndc(700.0, 700.0, 700.0, 700.0), Point2::new(1.0, -1.0));
    }

    #[test]
    fn test_full_sequence() {
        let mut sketch = Sketch::new();
        assert_eq!(sketch.state(), SketchState::Idle);

        let event = drag(&mut sketch, (0.0, 0.0), (0.5, 0.0));
        assert!(matches!(event, Some(SketchEvent::CircleCommitted(_))));
        assert_eq!(sketch.state(), SketchState::CircleCommitted);

        let event = drag(&mut sketch, (-1.0, 0.0), (1.0, 0.0));
        match event {
            Some(SketchEvent::SegmentCommitted(_, hit)) => assert_eq!(hit.count(), 2),
            other => panic!("unexpected event {:?}", other),
        }
        assert_eq!(sketch.state(), SketchState::Complete);
        assert_eq!(
            sketch.overlay_lines(),
            vec![
                "Circle: center(0.00, 0.00) radius = 0.50".to_string(),
                "Line segment: (-1.00, 0.00) ~ (1.00, 0.00)".to_string(),
                "Intersection Points: 2 | Point 1: (0.50, 0.00) | Point 2: (-0.50, 0.00)".to_string(),
            ]
        );
    }

    #[test]
    fn test_click_without_drag_commits_nothing() {
        let mut sketch = Sketch::new();
        sketch.pointer_down(Point2::new(0.1, 0.1));
        assert!(sketch.is_dragging());
        assert_eq!(sketch.pointer_up(), None);
        assert_eq!(sketch.state(), SketchState::Idle);
        assert!(sketch.circle().is_none());
    }

    #[test]
    fn test_input_after_complete_is_ignored() {
        let mut sketch = Sketch::new();
        drag(&mut sketch, (0.0, 0.0), (0.5, 0.0));
        drag(&mut sketch, (-1.0, 0.9), (1.0, 0.9));
        let before = sketch.segment().copied();

        assert_eq!(drag(&mut sketch, (0.0, 0.0), (0.2, 0.2)), None);
        assert_eq!(sketch.segment().copied(), before);
        assert_eq!(sketch.intersection(), Some(&Intersection::None));

        sketch.reset();
        assert_eq!(sketch.state(), SketchState::Idle);
        assert!(sketch.overlay_lines().is_empty());
    }

    #[test]
    fn test_preview_follows_pointer() {
        let mut sketch = Sketch::new();
        sketch.pointer_down(Point2::new(0.0, 0.0));
        assert_eq!(sketch.preview(), None);
        sketch.pointer_move(Point2::new(0.0, 0.3));
        match sketch.preview() {
            Some(Preview::Circle(c)) => assert!((c.radius - 0.3).abs() < 1e-12),
            other => panic!("unexpected preview {:?}", other),
        }
    }
}
