// area-weighted sampling over the rim polygon, or a disk when the polygon is unusable

use bevy::prelude::*;
use rand::Rng;

use crate::config::*;
use super::surface::RimPolygon;
use super::utils::planar_triangle_area;

/// One triangle of the fan (centroid, a, b)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FanTriangle {
    pub a: Vec3,
    pub b: Vec3,
    pub area: f32,
}

/// Disk used when no polygon can be built
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FallbackDisk {
    pub center: Vec3,
    pub radius: f32,
}

impl FallbackDisk {
    /// Disk on the top plane, radius `max(0.1, top_radius - edge_margin)`
    pub fn for_top(center: Vec3, top_radius: f32, edge_margin: f32) -> Self {
        Self {
            center,
            radius: (top_radius - edge_margin).max(MIN_FALLBACK_RADIUS),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum PolygonSampler {
    Fan {
        centroid: Vec3,
        triangles: Vec<FanTriangle>,
        // running sum of triangle areas, same length as `triangles`
        cumulative: Vec<f32>,
        total_area: f32,
    },
    Disk(FallbackDisk),
}

impl PolygonSampler {
    /// Build the triangle fan; degrades to `fallback` if the polygon is missing or has no area
    pub fn prepare(polygon: Option<&RimPolygon>, fallback: FallbackDisk) -> Self {
        let Some(polygon) = polygon.filter(|p| p.len() >= 3) else {
            debug!("sampler using fallback disk, radius {}", fallback.radius);
            return Self::Disk(fallback);
        };

        let centroid = polygon.centroid;
        let mut triangles = Vec::with_capacity(polygon.len());
        let mut cumulative = Vec::with_capacity(polygon.len());
        let mut total_area = 0.0;

        for (a, b) in polygon.edges() {
            let area = planar_triangle_area(centroid, a, b);
            if area > MIN_TRIANGLE_AREA {
                total_area += area;
                triangles.push(FanTriangle { a, b, area });
                cumulative.push(total_area);
            }
        }

        if triangles.is_empty() || total_area <= MIN_TRIANGLE_AREA {
            debug!("sampler polygon has no area, using fallback disk");
            return Self::Disk(fallback);
        }

        Self::Fan {
            centroid,
            triangles,
            cumulative,
            total_area,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Disk(_))
    }

    pub fn area(&self) -> f32 {
        match self {
            Self::Fan { total_area, .. } => *total_area,
            Self::Disk(disk) => std::f32::consts::PI * disk.radius * disk.radius,
        }
    }

    /// Uniform-by-area point on the top plane, local frame
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec3 {
        match self {
            Self::Fan { centroid, triangles, cumulative, total_area } => {
                let target = rng.random::<f32>() * total_area;
                let idx = cumulative
                    .partition_point(|&c| c <= target)
                    .min(triangles.len() - 1);
                let tri = &triangles[idx];

                // square-root barycentric transform, avoids clustering at the centroid
                let r1 = rng.random::<f32>().sqrt();
                let r2 = rng.random::<f32>();
                let u = 1.0 - r1;
                let v = r1 * (1.0 - r2);
                let w = r1 * r2;
                *centroid * u + tri.a * v + tri.b * w
            }
            Self::Disk(disk) => {
                let r = rng.random::<f32>().sqrt() * disk.radius;
                let angle = rng.random::<f32>() * std::f32::consts::TAU;
                disk.center + Vec3::new(angle.cos() * r, 0.0, angle.sin() * r)
            }
        }
    }
}
