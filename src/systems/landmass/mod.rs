// this is the entry point for the landmass generation plugin
use bevy::prelude::*;

use crate::config::*;

pub mod catalog;
pub mod pipeline;
pub mod island;

use catalog::ScatterCatalog;
use pipeline::{Generation, ScatterSettings, ShapeParameters};

// my 2d polygon datatype, the top surface projected onto XZ
pub type Polygon = Vec<Vec2>;

// resources
#[derive(Resource)]
pub struct Seed(pub u64);

#[derive(Resource, Clone, Debug)]
pub struct LandmassParams {
    pub shape: ShapeParameters,
    pub scatter: ScatterSettings,
}

impl Default for LandmassParams {
    fn default() -> Self {
        let shape = ShapeParameters::default();
        // sink the landmass so its top surface sits on the camera's ground plane
        let scatter = ScatterSettings {
            frame: Transform::from_xyz(0.0, -shape.height, 0.0),
            ..ScatterSettings::default()
        };
        Self { shape, scatter }
    }
}

/// Latest generation output, replaced wholesale on every regeneration
#[derive(Resource)]
pub struct GeneratedLandmass(pub Generation);

#[derive(Resource)]
pub struct GizmosVisible(pub bool);

// Event for regeneration
#[derive(Event)]
pub struct RegenerateEvent {
    pub seed: u64,
}

// main plugin for generation
pub struct LandmassGenerationPlugin;

impl Plugin for LandmassGenerationPlugin {
    fn build(&self, app: &mut App) {
        app
            .insert_resource(Seed(INITIAL_SEED))
            .insert_resource(LandmassParams::default())
            .insert_resource(ScatterCatalog::load_or_default(CATALOG_PATH))
            .insert_resource(GizmosVisible(true))

            .add_event::<RegenerateEvent>()
            .add_event::<crate::systems::export::ExportEvent>()

            .add_systems(Startup, island::setup_landmass)
            .add_systems(Update, (
                island::handle_regeneration,
                crate::systems::export::handle_export,
                crate::systems::input::key_input,
                debug_gizmos,
            ));
    }
}

// stable per-category hue so the same category keeps its color across seeds
fn category_color(category: &str) -> Color {
    let hash = category
        .bytes()
        .fold(2166136261u32, |h, b| (h ^ b as u32).wrapping_mul(16777619));
    Color::hsl((hash % 360) as f32, 0.7, 0.55)
}

fn debug_gizmos(
    mut gizmos: Gizmos,
    landmass: Option<Res<GeneratedLandmass>>,
    params: Res<LandmassParams>,
    gizmos_visible: Res<GizmosVisible>,
) {
    if !gizmos_visible.0 {
        return;
    }
    let Some(landmass) = landmass else {
        return;
    };

    let frame = params.scatter.frame;
    let up = frame.rotation * Vec3::Y;
    let lift = up * 0.05;

    // placement polygon (or fallback disk)
    match &landmass.0.surface {
        Some(rim) => {
            for (start, end) in rim.edges() {
                gizmos.line(
                    frame.transform_point(start) + lift,
                    frame.transform_point(end) + lift,
                    Color::srgba(0.71, 0.24, 0.24, 0.9),
                );
            }
        }
        None => {
            if let pipeline::PolygonSampler::Disk(disk) = &landmass.0.sampler {
                gizmos.circle(
                    Isometry3d::new(
                        frame.transform_point(disk.center) + lift,
                        frame.rotation * Quat::from_rotation_x(std::f32::consts::FRAC_PI_2),
                    ),
                    disk.radius,
                    Color::srgba(0.9, 0.6, 0.1, 0.9),
                );
            }
        }
    }

    // placed instances: a stalk along the instance's up, sized by scale
    for instance in &landmass.0.instances {
        let color = category_color(&instance.category);
        let top = instance.position + instance.rotation * Vec3::Y * instance.scale;
        gizmos.line(instance.position, top, color);
        gizmos.sphere(top, 0.15 * instance.scale, color);
    }
}
