// surface-membership / slope query against the landmass's own triangles

use bevy::prelude::*;

use crate::config::PROBE_HEIGHT;
use super::mesh_gen::{face_normal, LandmassMesh};

/// Where a downward probe met the surface, in world space
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceHit {
    pub point: Vec3,
    pub normal: Vec3,
}

/// Query shared by scatter validation and external placement tooling
pub trait SurfaceProbe {
    /// Cast down from just above `point`. `None` if nothing is hit within range.
    fn probe(&self, point: Vec3) -> Option<SurfaceHit>;

    /// The surface's own up axis, slope is measured against this
    fn up(&self) -> Vec3 {
        Vec3::Y
    }
}

/// Ray with a normalized direction
#[derive(Clone, Copy, Debug)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Möller–Trumbore, double sided
    /// # Returns the ray parameter `t` of the hit
    pub fn intersect_triangle(&self, tri: &[Vec3; 3]) -> Option<f32> {
        const EPS: f32 = 1e-7;
        let e1 = tri[1] - tri[0];
        let e2 = tri[2] - tri[0];
        let p = self.direction.cross(e2);
        let det = e1.dot(p);
        if det.abs() < EPS {
            return None; // parallel
        }

        let inv_det = 1.0 / det;
        let s = self.origin - tri[0];
        let u = s.dot(p) * inv_det;
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(e1);
        let v = self.direction.dot(q) * inv_det;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = e2.dot(q) * inv_det;
        (t >= 0.0).then_some(t)
    }
}

/// Probe scoped to one landmass mesh placed at `frame`
pub struct LandmassProbe<'a> {
    mesh: &'a LandmassMesh,
    frame: Transform,
    probe_height: f32,
}

impl<'a> LandmassProbe<'a> {
    pub fn new(mesh: &'a LandmassMesh, frame: Transform) -> Self {
        Self {
            mesh,
            frame,
            probe_height: PROBE_HEIGHT,
        }
    }

    pub fn with_probe_height(mut self, probe_height: f32) -> Self {
        self.probe_height = probe_height.max(0.0);
        self
    }
}

impl SurfaceProbe for LandmassProbe<'_> {
    fn probe(&self, point: Vec3) -> Option<SurfaceHit> {
        // work in the mesh's local frame, the frame only adds rotation/translation/scale
        let local = self.frame.compute_affine().inverse().transform_point3(point);
        let ray = Ray::new(local + Vec3::Y * self.probe_height, Vec3::NEG_Y);
        let max_t = self.probe_height * 2.0;

        let (t, tri) = self
            .mesh
            .triangles()
            .filter_map(|tri| ray.intersect_triangle(&tri).map(|t| (t, tri)))
            .filter(|(t, _)| *t <= max_t)
            .min_by(|a, b| a.0.total_cmp(&b.0))?;

        let normal = face_normal(&tri)?;
        Some(SurfaceHit {
            point: self.frame.transform_point(ray.at(t)),
            normal: (self.frame.rotation * normal).normalize(),
        })
    }

    fn up(&self) -> Vec3 {
        self.frame.rotation * Vec3::Y
    }
}

/// Angle in degrees between `normal` and `up`
pub fn slope_degrees(normal: Vec3, up: Vec3) -> f32 {
    normal.angle_between(up).to_degrees()
}
