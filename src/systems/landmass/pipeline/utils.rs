// UTILS

use bevy::prelude::*;
use crate::systems::landmass::Polygon;

/// Computes the signed area of a polygon (shoelace formula)
/// # Returns the polygon's area as an `f32`. Returns 0.0 for polygons with fewer than 3 vertices.
pub fn polygon_area(polygon: &[Vec2]) -> f32 {
    if polygon.len() < 3 {
        return 0.0;
    }

    let n = polygon.len();
    let mut area = 0.0;

    for i in 0..n {
        let j = (i + 1) % n;
        area += polygon[i].x * polygon[j].y - polygon[j].x * polygon[i].y;
    }

    area / 2.0
}

/// Determines whether a point is inside a polygon using the ray-casting algorithm.
/// # Returns `true` if the point is inside the polygon, otherwise `false`.
pub fn point_in_polygon(point: &Vec2, polygon: &[Vec2]) -> bool {
    if polygon.len() < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = polygon.len() - 1;

    for i in 0..polygon.len() {
        let yi = polygon[i].y;
        let yj = polygon[j].y;
        let xi = polygon[i].x;
        let xj = polygon[j].x;

        if ((yi > point.y) != (yj > point.y)) &&
           (point.x < (xj - xi) * (point.y - yi) / (yj - yi) + xi) {
            inside = !inside;
        }
        j = i;
    }

    inside
}

// project onto the XZ plane, the landmass is always built Y-up in its local frame
pub fn flatten(point: Vec3) -> Vec2 {
    Vec2::new(point.x, point.z)
}

pub fn flatten_all(points: &[Vec3]) -> Polygon {
    points.iter().copied().map(flatten).collect()
}

/// Distance between two points ignoring their offset along `up`
pub fn horizontal_distance(a: Vec3, b: Vec3, up: Vec3) -> f32 {
    let d = b - a;
    (d - up * d.dot(up)).length()
}

/// Unsigned area of the triangle (a, b, c) projected onto XZ
pub fn planar_triangle_area(a: Vec3, b: Vec3, c: Vec3) -> f32 {
    let ab = flatten(b - a);
    let ac = flatten(c - a);
    0.5 * ab.perp_dot(ac).abs()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_square() -> Polygon {
        vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(0.0, 1.0),
        ]
    }

    #[test]
    fn test_polygon_area_winding() {
        let square = unit_square();
        assert!((polygon_area(&square) - 1.0).abs() < 1e-6);

        let reversed: Polygon = square.into_iter().rev().collect();
        assert!((polygon_area(&reversed) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_polygon_area_degenerate() {
        assert_eq!(polygon_area(&[Vec2::ZERO, Vec2::X]), 0.0);
    }

    #[test]
    fn test_point_in_polygon() {
        let square = unit_square();
        assert!(point_in_polygon(&Vec2::new(0.5, 0.5), &square));
        assert!(!point_in_polygon(&Vec2::new(1.5, 0.5), &square));
    }

    #[test]
    fn test_horizontal_distance_ignores_up_offset() {
        let a = Vec3::new(0.0, 0.0, 0.0);
        let b = Vec3::new(3.0, 10.0, 4.0);
        assert!((horizontal_distance(a, b, Vec3::Y) - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_planar_triangle_area() {
        let area = planar_triangle_area(
            Vec3::ZERO,
            Vec3::new(2.0, 5.0, 0.0),
            Vec3::new(0.0, -1.0, 2.0),
        );
        assert!((area - 2.0).abs() < 1e-6);
    }
}
