// recovers the flat top of the landmass as an ordered, inset rim polygon

use bevy::prelude::*;

use crate::config::*;
use super::mesh_gen::{LandmassMesh, ShapeParameters};
use super::utils::{flatten, flatten_all, polygon_area};

/// Boundary loop of the top cap, sorted by angle around `centroid`.
///
/// Points lie on the top plane; no two consecutive points coincide.
#[derive(Clone, Debug, PartialEq)]
pub struct RimPolygon {
    pub points: Vec<Vec3>,
    pub centroid: Vec3,
}

impl RimPolygon {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn top_y(&self) -> f32 {
        self.centroid.y
    }

    /// Consecutive rim pairs, wrapping around
    pub fn edges(&self) -> impl Iterator<Item = (Vec3, Vec3)> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| (self.points[i], self.points[(i + 1) % n]))
    }

    /// True area via the shoelace formula on the XZ projection
    pub fn area(&self) -> f32 {
        polygon_area(&flatten_all(&self.points)).abs()
    }
}

// tolerances scale with the top radius so tiny and huge landmasses behave alike
fn scaled(fraction: f32, top_radius: f32) -> f32 {
    (fraction * top_radius).max(TOLERANCE_FLOOR)
}

/// Extract the inset top polygon.
/// # Returns `None` when fewer than 3 distinct rim points survive (degenerate surface).
pub fn extract(mesh: &LandmassMesh, params: &ShapeParameters, edge_margin: f32) -> Option<RimPolygon> {
    if mesh.is_empty() {
        return None;
    }

    let top_radius = params.sanitized().top_radius;
    let plane_eps = scaled(TOP_PLANE_EPS_FRACTION, top_radius);
    let dedup_eps = scaled(DEDUP_EPS_FRACTION, top_radius);
    let min_rim_radius = MIN_RIM_RADIUS_ABS.max(MIN_RIM_RADIUS_FRACTION * top_radius);

    let max_y = mesh
        .positions
        .iter()
        .map(|p| p.y)
        .fold(f32::NEG_INFINITY, f32::max);

    // collect the top plane, dropping horizontal duplicates
    let mut top: Vec<Vec3> = Vec::new();
    for p in mesh.positions.iter().filter(|p| (max_y - p.y).abs() <= plane_eps) {
        let duplicate = top
            .iter()
            .any(|q| flatten(*q).distance(flatten(*p)) <= dedup_eps);
        if !duplicate {
            top.push(*p);
        }
    }

    if top.is_empty() {
        return None;
    }

    let centroid = top.iter().copied().sum::<Vec3>() / top.len() as f32;
    let center = flatten(centroid);

    // the apex sits on the top plane too, drop anything hugging the centroid
    let mut rim: Vec<Vec3> = top
        .into_iter()
        .filter(|p| flatten(*p).distance(center) >= min_rim_radius)
        .collect();

    if rim.len() < 3 {
        debug!("top surface degenerate: {} rim points before inset", rim.len());
        return None;
    }

    rim.sort_by(|a, b| {
        let angle_a = (a.z - centroid.z).atan2(a.x - centroid.x);
        let angle_b = (b.z - centroid.z).atan2(b.x - centroid.x);
        angle_a.total_cmp(&angle_b)
    });

    let inset: Vec<Vec3> = rim
        .into_iter()
        .map(|p| inset_point(p, centroid, edge_margin))
        .collect();

    // insetting can collapse neighbours together, drop coincident consecutive points
    let mut points: Vec<Vec3> = Vec::with_capacity(inset.len());
    for p in inset {
        match points.last() {
            Some(last) if flatten(*last).distance(flatten(p)) <= dedup_eps => {}
            _ => points.push(p),
        }
    }
    while points.len() > 1 {
        let first = flatten(points[0]);
        let last = flatten(points[points.len() - 1]);
        if first.distance(last) <= dedup_eps {
            points.pop();
        } else {
            break;
        }
    }

    if points.len() < 3 {
        debug!("top surface degenerate: edge margin {edge_margin} collapsed the rim");
        return None;
    }

    Some(RimPolygon { points, centroid })
}

/// Move `point` toward `centroid` by `margin`, never past it
pub fn inset_point(point: Vec3, centroid: Vec3, margin: f32) -> Vec3 {
    let offset = Vec3::new(point.x - centroid.x, 0.0, point.z - centroid.z);
    let length = offset.length();
    if length <= f32::EPSILON {
        return point;
    }

    let shrink = margin.max(0.0).min(length);
    point - offset / length * shrink
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::landmass::pipeline::mesh_gen::build;

    fn params(rim_noise: f32) -> ShapeParameters {
        ShapeParameters {
            segments: 32,
            height: 60.0,
            top_radius: 35.0,
            bottom_radius: 8.0,
            rim_noise,
            seed: 1,
        }
    }

    #[test]
    fn test_extract_removes_apex() {
        let p = params(0.0);
        let mesh = build(&p);
        let rim = extract(&mesh, &p, 0.0).expect("rim should extract");
        assert_eq!(rim.len(), 32);
        assert!((rim.top_y() - 60.0).abs() < 1e-4);
        for point in &rim.points {
            assert!(flatten(*point).distance(flatten(rim.centroid)) > 1.0);
        }
    }

    #[test]
    fn test_noise_free_rim_equidistant() {
        let p = params(0.0);
        let mesh = build(&p);
        let rim = extract(&mesh, &p, 0.0).expect("rim should extract");
        let center = flatten(rim.centroid);
        for point in &rim.points {
            assert!((flatten(*point).distance(center) - 35.0).abs() < 1e-3);
        }

        let circle = std::f32::consts::PI * 35.0 * 35.0;
        assert!((rim.area() - circle).abs() / circle < 0.01);
    }

    #[test]
    fn test_points_sorted_by_angle() {
        let p = params(0.45);
        let mesh = build(&p);
        let rim = extract(&mesh, &p, 2.0).expect("rim should extract");
        let angles: Vec<f32> = rim
            .points
            .iter()
            .map(|q| (q.z - rim.centroid.z).atan2(q.x - rim.centroid.x))
            .collect();
        assert!(angles.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_edge_margin_insets_rim() {
        let p = params(0.0);
        let mesh = build(&p);
        let rim = extract(&mesh, &p, 5.0).expect("rim should extract");
        let center = flatten(rim.centroid);
        for point in &rim.points {
            assert!((flatten(*point).distance(center) - 30.0).abs() < 1e-3);
        }
    }

    #[test]
    fn test_margin_beyond_radius_is_degenerate() {
        let p = params(0.0);
        let mesh = build(&p);
        assert!(extract(&mesh, &p, 35.0).is_none());
        assert!(extract(&mesh, &p, 100.0).is_none());
    }

    #[test]
    fn test_zero_radius_is_degenerate() {
        let mut p = params(0.0);
        p.top_radius = 0.0;
        let mesh = build(&p);
        assert!(extract(&mesh, &p, 0.0).is_none());
    }

    #[test]
    fn test_empty_mesh_is_degenerate() {
        assert!(extract(&LandmassMesh::default(), &params(0.0), 0.0).is_none());
    }

    #[test]
    fn test_inset_point_guards() {
        let c = Vec3::new(1.0, 5.0, 1.0);
        assert_eq!(inset_point(c, c, 3.0), c);

        let p = Vec3::new(4.0, 5.0, 1.0);
        let moved = inset_point(p, c, 10.0);
        assert!(moved.distance(c) < 1e-5);

        let moved = inset_point(p, c, 1.0);
        assert!((moved.x - 3.0).abs() < 1e-5);
    }
}
