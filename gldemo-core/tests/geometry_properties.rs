//! Behavioural checks for circle/segment intersection and normal smoothing.

use approx::assert_relative_eq;
use gldemo_core::{
    intersect, smooth_normals, Circle, CoincidenceTable, Intersection, MeshOptions, NormalSet,
    PolyhedronMesh, Segment, Shape,
};
use nalgebra::{Point2, Vector3};

fn unit_circle() -> Circle {
    Circle::new(Point2::origin(), 1.0)
}

#[test]
fn chord_with_endpoints_on_circle_returns_both_endpoints() {
    let circles = [
        Circle::new(Point2::new(0.0, 0.0), 1.0),
        Circle::new(Point2::new(0.3, -0.2), 0.45),
        Circle::new(Point2::new(-0.5, 0.5), 0.1),
    ];
    let angle_pairs = [(0.0, 2.0), (0.4, 3.5), (1.0, 5.5), (2.2, 4.0)];

    for circle in &circles {
        for &(a, b) in &angle_pairs {
            let on_rim = |angle: f64| {
                Point2::new(
                    circle.center.x + circle.radius * f64::cos(angle),
                    circle.center.y + circle.radius * f64::sin(angle),
                )
            };
            let segment = Segment::new(on_rim(a), on_rim(b));
            match intersect(circle, &segment) {
                Intersection::Two(p1, p2) => {
                    assert_relative_eq!(p1, segment.end, epsilon = 1e-9);
                    assert_relative_eq!(p2, segment.start, epsilon = 1e-9);
                }
                other => panic!("expected both endpoints for {:?}, got {:?}", segment, other),
            }
        }
    }
}

#[test]
fn segment_fully_outside_has_no_intersection() {
    let misses = [
        Segment::new(Point2::new(-2.0, 1.0001), Point2::new(2.0, 1.0001)),
        Segment::new(Point2::new(1.5, -1.0), Point2::new(1.5, 1.0)),
        // on a secant line, but stops short of the circle
        Segment::new(Point2::new(-3.0, 0.0), Point2::new(-2.0, 0.0)),
    ];
    for segment in &misses {
        assert_eq!(intersect(&unit_circle(), segment), Intersection::None);
    }
}

#[test]
fn tangent_segment_touches_boundary_once() {
    let circle = Circle::new(Point2::new(0.25, 0.5), 0.5);
    let segment = Segment::new(Point2::new(-1.0, 1.0), Point2::new(1.0, 1.0));
    match intersect(&circle, &segment) {
        Intersection::One(p) => {
            assert!(circle.contains_on_boundary(&p, 1e-9));
            assert_relative_eq!(p, Point2::new(0.25, 1.0), epsilon = 1e-9);
        }
        other => panic!("expected a tangent point, got {:?}", other),
    }
}

#[test]
fn degenerate_segment_is_none() {
    for p in [Point2::new(0.0, 0.0), Point2::new(1.0, 0.0), Point2::new(5.0, 5.0)] {
        assert_eq!(intersect(&unit_circle(), &Segment::new(p, p)), Intersection::None);
    }
}

#[test]
fn unit_circle_scenarios() {
    let through = Segment::new(Point2::new(-2.0, 0.0), Point2::new(2.0, 0.0));
    assert_eq!(
        intersect(&unit_circle(), &through),
        Intersection::Two(Point2::new(1.0, 0.0), Point2::new(-1.0, 0.0))
    );

    let tangent = Segment::new(Point2::new(-2.0, 1.0), Point2::new(2.0, 1.0));
    assert_eq!(
        intersect(&unit_circle(), &tangent),
        Intersection::One(Point2::new(0.0, 1.0))
    );
}

#[test]
fn singleton_table_keeps_face_normals() {
    let mesh = PolyhedronMesh::pyramid(MeshOptions::default());
    let singletons = CoincidenceTable::singletons(mesh.slot_count());
    let smoothed = smooth_normals(mesh.face_normals(), &singletons).unwrap();
    assert_eq!(smoothed, mesh.face_normals());
}

#[test]
fn three_axis_faces_average_to_a_third() {
    let normals = [Vector3::x(), Vector3::x(), Vector3::y(), Vector3::y(), Vector3::z(), Vector3::z()];
    let table = CoincidenceTable::new(vec![vec![0, 2, 4], vec![1], vec![3], vec![5]], 6).unwrap();
    let smoothed = smooth_normals(&normals, &table).unwrap();

    let third = Vector3::repeat(1.0 / 3.0);
    for slot in [0, 2, 4] {
        assert_relative_eq!(smoothed[slot], third, epsilon = 1e-6);
    }
    assert_eq!(smoothed[1], Vector3::x());
    assert_eq!(smoothed[3], Vector3::y());
    assert_eq!(smoothed[5], Vector3::z());
}

#[test]
fn every_shape_swaps_buffers_without_touching_geometry() {
    for shape in [Shape::Pyramid, Shape::Octahedron] {
        let mut mesh = shape.build(MeshOptions::default());
        let positions = mesh.position_buffer();

        mesh.set_active_normal_set(NormalSet::Smooth);
        let smooth = mesh.take_normals_update().unwrap();
        mesh.set_active_normal_set(NormalSet::Flat);
        let flat = mesh.take_normals_update().unwrap();

        assert_ne!(smooth, flat);
        assert_eq!(mesh.position_buffer(), positions);
        assert_eq!(flat.len(), positions.len());
    }
}
