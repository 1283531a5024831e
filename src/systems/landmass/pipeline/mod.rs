// landmass generation core: mesh -> top surface -> sampler -> scatter

use bevy::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::*;

pub mod mesh_gen;
pub mod probe;
pub mod sampler;
pub mod scatter;
pub mod surface;
pub mod utils;

pub use mesh_gen::{LandmassMesh, ShapeParameters};
pub use probe::{LandmassProbe, SurfaceHit, SurfaceProbe};
pub use sampler::{FallbackDisk, PolygonSampler};
pub use scatter::{AlignMode, PlacedInstance, PlacementSpec, ScatterEngine, ScatterReport, SpacingBuckets};
pub use surface::RimPolygon;

/// Global scatter constraints
#[derive(Clone, Debug, PartialEq)]
pub struct ScatterSettings {
    pub edge_margin: f32,
    pub max_slope_deg: f32,
    /// Placement of the landmass in the world
    pub frame: Transform,
}

impl Default for ScatterSettings {
    fn default() -> Self {
        Self {
            edge_margin: EDGE_MARGIN,
            max_slope_deg: MAX_SLOPE_DEG,
            frame: Transform::IDENTITY,
        }
    }
}

/// Everything one generation run produces. Replaced wholesale on regeneration.
#[derive(Clone, Debug)]
pub struct Generation {
    pub mesh: LandmassMesh,
    /// `None` when the top surface was degenerate and the sampler fell back to a disk
    pub surface: Option<RimPolygon>,
    pub sampler: PolygonSampler,
    pub instances: Vec<PlacedInstance>,
    pub reports: Vec<ScatterReport>,
}

impl Generation {
    pub fn probe(&self, frame: Transform) -> LandmassProbe<'_> {
        LandmassProbe::new(&self.mesh, frame)
    }

    pub fn placed_count(&self) -> usize {
        self.instances.len()
    }
}

/// Full rebuild. `params.seed` shapes the mesh, `seed` drives the scatter stream.
pub fn generate(
    params: &ShapeParameters,
    settings: &ScatterSettings,
    specs: &[PlacementSpec],
    seed: u64,
) -> Generation {
    let params = params.sanitized();
    let mesh = mesh_gen::build(&params);
    let surface = surface::extract(&mesh, &params, settings.edge_margin);

    let top_center = Vec3::new(0.0, params.height, 0.0);
    let fallback = FallbackDisk::for_top(top_center, params.top_radius, settings.edge_margin);
    let sampler = PolygonSampler::prepare(surface.as_ref(), fallback);

    let probe = LandmassProbe::new(&mesh, settings.frame);
    let engine = ScatterEngine::new(&sampler, &probe, settings.frame, settings.max_slope_deg);

    // one stream consumed in catalog order keeps runs reproducible
    let mut rng = StdRng::seed_from_u64(seed);
    let mut buckets = SpacingBuckets::new();
    let mut instances = Vec::new();
    let reports: Vec<ScatterReport> = specs
        .iter()
        .map(|spec| engine.scatter(spec, &mut buckets, &mut rng, &mut instances))
        .collect();

    debug!(
        "generated landmass: {} vertices, {} instances, fallback={}",
        mesh.vertex_count(),
        instances.len(),
        sampler.is_fallback()
    );

    Generation {
        mesh,
        surface,
        sampler,
        instances,
        reports,
    }
}

/// Same as [`generate`] with the landmass placed at `frame`
pub fn generate_in_frame(
    params: &ShapeParameters,
    settings: &ScatterSettings,
    specs: &[PlacementSpec],
    seed: u64,
    frame: Transform,
) -> Generation {
    let settings = ScatterSettings {
        frame,
        ..settings.clone()
    };
    generate(params, &settings, specs, seed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::landmass::pipeline::probe::slope_degrees;
    use crate::systems::landmass::pipeline::utils::horizontal_distance;

    fn specs() -> Vec<PlacementSpec> {
        vec![
            PlacementSpec::new("tree", &["pine", "oak"], 25, 4.0).with_scale(0.8, 1.4),
            PlacementSpec::new("rock", &["boulder"], 15, 3.0).with_align(AlignMode::SurfaceNormal),
            PlacementSpec::new("flower", &["daisy", "poppy"], 40, 1.0).with_bucket("small_plants"),
            PlacementSpec::new("grass", &["tuft"], 40, 1.0).with_bucket("small_plants"),
        ]
    }

    fn params() -> ShapeParameters {
        ShapeParameters {
            rim_noise: 0.25,
            seed: 7,
            ..ShapeParameters::default()
        }
    }

    #[test]
    fn test_generate_is_deterministic() {
        let settings = ScatterSettings::default();
        let a = generate(&params(), &settings, &specs(), 7);
        let b = generate(&params(), &settings, &specs(), 7);
        assert_eq!(a.mesh, b.mesh);
        assert_eq!(a.instances, b.instances);
        assert_eq!(a.reports, b.reports);

        let c = generate(&params(), &settings, &specs(), 8);
        assert_ne!(a.instances, c.instances);
    }

    #[test]
    fn test_generate_invariants() {
        let settings = ScatterSettings::default();
        let specs = specs();
        let generation = generate(&params(), &settings, &specs, 3);
        assert!(generation.surface.is_some());
        assert!(!generation.sampler.is_fallback());

        for (spec, report) in specs.iter().zip(&generation.reports) {
            assert!(report.attempts <= spec.try_budget());
            assert!(report.placed <= spec.count);
        }

        // spacing within each bucket
        for spec in &specs {
            let members: Vec<&PlacedInstance> = generation
                .instances
                .iter()
                .filter(|i| {
                    specs
                        .iter()
                        .find(|s| s.category == i.category)
                        .map(|s| s.bucket_name() == spec.bucket_name())
                        .unwrap_or(false)
                })
                .collect();
            for (i, a) in members.iter().enumerate() {
                for b in &members[i + 1..] {
                    let d = horizontal_distance(a.position, b.position, Vec3::Y);
                    assert!(d >= spec.min_spacing - 1e-4);
                }
            }
        }

        // everything sits on the flat cap
        let probe = generation.probe(settings.frame);
        for instance in &generation.instances {
            assert!(instance.grounded);
            let hit = probe.probe(instance.position).expect("instance should be over the cap");
            assert!(slope_degrees(hit.normal, probe.up()) <= settings.max_slope_deg);
        }
    }

    #[test]
    fn test_margin_collapse_falls_back_to_disk() {
        let shape = ShapeParameters {
            rim_noise: 0.0,
            ..params()
        };
        let settings = ScatterSettings {
            edge_margin: shape.top_radius,
            ..ScatterSettings::default()
        };
        let generation = generate(&shape, &settings, &specs(), 1);
        assert!(generation.surface.is_none());
        assert!(generation.sampler.is_fallback());
        assert!(matches!(generation.sampler, PolygonSampler::Disk(d) if d.radius == MIN_FALLBACK_RADIUS));
    }

    #[test]
    fn test_generate_in_frame_moves_instances_with_frame() {
        let settings = ScatterSettings::default();
        let frame = Transform::from_xyz(40.0, -60.0, -12.0);
        let local = generate(&params(), &settings, &specs(), 9);
        let placed = generate_in_frame(&params(), &settings, &specs(), 9, frame);

        assert_eq!(local.mesh, placed.mesh);
        assert_eq!(local.placed_count(), placed.placed_count());
        for (a, b) in local.instances.iter().zip(&placed.instances) {
            assert!((frame.transform_point(a.position) - b.position).length() < 1e-3);
            assert_eq!(a.variant, b.variant);
        }
    }

    #[test]
    fn test_tilted_frame_places_on_landmass() {
        let settings = ScatterSettings {
            frame: Transform::from_xyz(10.0, -5.0, 3.0).with_rotation(Quat::from_rotation_x(0.4)),
            ..ScatterSettings::default()
        };
        let generation = generate(&params(), &settings, &specs(), 5);
        let probe = generation.probe(settings.frame);
        assert!(!generation.instances.is_empty());
        for instance in &generation.instances {
            let hit = probe.probe(instance.position).expect("instance should be over the cap");
            assert!(slope_degrees(hit.normal, probe.up()) <= settings.max_slope_deg);
        }
    }
}
