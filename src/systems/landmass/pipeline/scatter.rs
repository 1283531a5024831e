// constrained rejection-sampling scatter of object categories over the top surface

use bevy::prelude::*;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::TRIES_PER_OBJECT;
use super::probe::{slope_degrees, SurfaceProbe};
use super::sampler::PolygonSampler;
use super::utils::horizontal_distance;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlignMode {
    /// Upright along the landmass up axis
    #[default]
    Flat,
    /// Tilted to the surface normal under the instance
    SurfaceNormal,
}

/// One object category to scatter
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlacementSpec {
    pub category: String,
    /// Categories naming the same bucket repel each other
    #[serde(default)]
    pub bucket: Option<String>,
    pub variants: Vec<String>,
    pub count: usize,
    pub min_spacing: f32,
    pub scale_range: (f32, f32),
    #[serde(default)]
    pub align: AlignMode,
    #[serde(default = "default_tries")]
    pub tries_per_object: usize,
    /// Overrides the global slope limit, degrees
    #[serde(default)]
    pub max_slope_deg: Option<f32>,
}

fn default_tries() -> usize {
    TRIES_PER_OBJECT
}

impl PlacementSpec {
    pub fn new(category: impl Into<String>, variants: &[&str], count: usize, min_spacing: f32) -> Self {
        Self {
            category: category.into(),
            bucket: None,
            variants: variants.iter().map(|v| v.to_string()).collect(),
            count,
            min_spacing,
            scale_range: (1.0, 1.0),
            align: AlignMode::Flat,
            tries_per_object: TRIES_PER_OBJECT,
            max_slope_deg: None,
        }
    }

    pub fn with_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.bucket = Some(bucket.into());
        self
    }

    pub fn with_scale(mut self, min: f32, max: f32) -> Self {
        self.scale_range = (min, max);
        self
    }

    pub fn with_align(mut self, align: AlignMode) -> Self {
        self.align = align;
        self
    }

    pub fn with_max_slope(mut self, degrees: f32) -> Self {
        self.max_slope_deg = Some(degrees);
        self
    }

    pub fn with_tries(mut self, tries_per_object: usize) -> Self {
        self.tries_per_object = tries_per_object;
        self
    }

    /// Bucket name, a category without one repels only itself
    pub fn bucket_name(&self) -> &str {
        self.bucket.as_deref().unwrap_or(&self.category)
    }

    pub fn try_budget(&self) -> usize {
        self.tries_per_object.saturating_mul(self.count)
    }
}

/// A committed placement, world space
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedInstance {
    pub category: String,
    pub variant: String,
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: f32,
    /// Whether the surface probe found the landmass under this instance
    pub grounded: bool,
}

impl PlacedInstance {
    pub fn transform(&self) -> Transform {
        Transform::from_translation(self.position)
            .with_rotation(self.rotation)
            .with_scale(Vec3::splat(self.scale))
    }
}

/// Accepted points per spacing bucket, owned by one generation run
#[derive(Clone, Debug, Default)]
pub struct SpacingBuckets {
    names: Vec<String>,
    points: Vec<Vec<Vec3>>,
}

impl SpacingBuckets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn index_of(&mut self, bucket: &str) -> usize {
        if let Some(idx) = self.names.iter().position(|n| n == bucket) {
            return idx;
        }
        self.names.push(bucket.to_string());
        self.points.push(Vec::new());
        self.names.len() - 1
    }

    pub fn points(&self, bucket: &str) -> &[Vec3] {
        self.names
            .iter()
            .position(|n| n == bucket)
            .map(|idx| self.points[idx].as_slice())
            .unwrap_or(&[])
    }

    fn is_clear(&self, idx: usize, candidate: Vec3, min_spacing: f32, up: Vec3) -> bool {
        self.points[idx]
            .iter()
            .all(|p| horizontal_distance(*p, candidate, up) >= min_spacing)
    }

    fn insert(&mut self, idx: usize, point: Vec3) {
        self.points[idx].push(point);
    }
}

/// Outcome of one category pass
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScatterReport {
    pub category: String,
    pub requested: usize,
    pub placed: usize,
    pub attempts: usize,
}

impl ScatterReport {
    pub fn is_partial(&self) -> bool {
        self.placed < self.requested
    }
}

/// Runs scatter passes over one prepared surface
pub struct ScatterEngine<'a, P: SurfaceProbe> {
    sampler: &'a PolygonSampler,
    probe: &'a P,
    // sampler output is local, this places it in the world
    frame: Transform,
    max_slope_deg: f32,
}

impl<'a, P: SurfaceProbe> ScatterEngine<'a, P> {
    pub fn new(sampler: &'a PolygonSampler, probe: &'a P, frame: Transform, max_slope_deg: f32) -> Self {
        Self {
            sampler,
            probe,
            frame,
            max_slope_deg,
        }
    }

    /// Scatter one category. Running out of tries returns whatever was placed.
    pub fn scatter<R: Rng + ?Sized>(
        &self,
        spec: &PlacementSpec,
        buckets: &mut SpacingBuckets,
        rng: &mut R,
        out: &mut Vec<PlacedInstance>,
    ) -> ScatterReport {
        let mut report = ScatterReport {
            category: spec.category.clone(),
            requested: spec.count,
            placed: 0,
            attempts: 0,
        };

        if spec.variants.is_empty() || spec.count == 0 {
            return report;
        }

        let up = self.probe.up();
        let max_slope = spec.max_slope_deg.unwrap_or(self.max_slope_deg);
        let bucket = buckets.index_of(spec.bucket_name());
        let budget = spec.try_budget();

        while report.placed < spec.count && report.attempts < budget {
            report.attempts += 1;

            let candidate = self.frame.transform_point(self.sampler.sample(rng));

            // an unprojected candidate is assumed to face straight up
            let hit = self.probe.probe(candidate);
            let (position, normal) = match hit {
                Some(hit) => (hit.point, hit.normal),
                None => (candidate, up),
            };

            if slope_degrees(normal, up) > max_slope {
                continue;
            }

            if !buckets.is_clear(bucket, position, spec.min_spacing, up) {
                continue;
            }

            let variant = spec.variants[rng.random_range(0..spec.variants.len())].clone();

            let yaw = Quat::from_axis_angle(up, rng.random::<f32>() * std::f32::consts::TAU);
            let upright = yaw * self.frame.rotation;
            let rotation = match spec.align {
                AlignMode::Flat => upright,
                AlignMode::SurfaceNormal => Quat::from_rotation_arc(up, normal) * upright,
            };

            let (min_scale, max_scale) = spec.scale_range;
            let scale = min_scale + (max_scale - min_scale) * rng.random::<f32>();

            buckets.insert(bucket, position);
            out.push(PlacedInstance {
                category: spec.category.clone(),
                variant,
                position,
                rotation,
                scale,
                grounded: hit.is_some(),
            });
            report.placed += 1;
        }

        if report.is_partial() {
            info!(
                "scatter '{}' placed {}/{} after {} attempts",
                report.category, report.placed, report.requested, report.attempts
            );
        }

        report
    }
}
