use bevy::prelude::*;

use super::*;
use super::pipeline::{generate, Generation, PlacedInstance};

// entity hierarchy components
#[derive(Component)]
pub struct Landmass {
    pub seed: u64,
}

/// Hand-off point for whatever instantiates the visual content
#[derive(Component, Clone, Debug)]
pub struct ScatteredObject {
    pub category: String,
    pub variant: String,
}

impl From<&PlacedInstance> for ScatteredObject {
    fn from(instance: &PlacedInstance) -> Self {
        Self {
            category: instance.category.clone(),
            variant: instance.variant.clone(),
        }
    }
}

/// Run the whole pipeline for one seed
pub fn generate_landmass(params: &LandmassParams, catalog: &ScatterCatalog, seed: u64) -> Generation {
    let shape = ShapeParameters {
        seed,
        ..params.shape.clone()
    };
    let generation = generate(&shape, &params.scatter, &catalog.categories, seed);

    let requested = catalog.total_requested();
    info!(
        "landmass seed {}: placed {}/{} objects{}",
        seed,
        generation.placed_count(),
        requested,
        if generation.sampler.is_fallback() { " (fallback disk)" } else { "" }
    );

    generation
}

pub fn spawn_landmass(
    commands: &mut Commands,
    meshes: &mut ResMut<Assets<Mesh>>,
    materials: &mut ResMut<Assets<StandardMaterial>>,
    generation: &Generation,
    frame: Transform,
    seed: u64,
) -> Entity {
    let root = commands.spawn((
        Landmass { seed },
        Transform::default(),
        Visibility::Visible,
    )).id();

    let mesh_handle = meshes.add(generation.mesh.to_bevy_mesh());
    let material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.42, 0.55, 0.32),
        perceptual_roughness: 0.9,
        ..default()
    });

    let surface = commands.spawn((
        Mesh3d(mesh_handle),
        MeshMaterial3d(material),
        frame,
        Visibility::Visible,
    )).id();

    // instances are already in world space, root is the identity
    let objects: Vec<Entity> = generation.instances.iter()
        .map(|instance| {
            commands.spawn((
                ScatteredObject::from(instance),
                instance.transform(),
                Visibility::Visible,
            )).id()
        })
        .collect();

    commands.entity(root).add_children(&[surface]);
    commands.entity(root).add_children(&objects);

    root
}

pub fn setup_landmass(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    seed: Res<Seed>,
    params: Res<LandmassParams>,
    catalog: Res<ScatterCatalog>,
) {
    let generation = generate_landmass(&params, &catalog, seed.0);
    spawn_landmass(&mut commands, &mut meshes, &mut materials, &generation, params.scatter.frame, seed.0);
    commands.insert_resource(GeneratedLandmass(generation));
}

pub fn handle_regeneration(
    mut commands: Commands,
    mut events: EventReader<RegenerateEvent>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut seed: ResMut<Seed>,
    params: Res<LandmassParams>,
    catalog: Res<ScatterCatalog>,
    query: Query<Entity, With<Landmass>>,
) {
    // only the newest request matters, each run is a full rebuild
    let Some(event) = events.read().last() else {
        return;
    };

    // cleanup existing landmass, children go with it
    for entity in query.iter() {
        commands.entity(entity).try_despawn();
    }

    seed.0 = event.seed;
    let generation = generate_landmass(&params, &catalog, event.seed);
    spawn_landmass(&mut commands, &mut meshes, &mut materials, &generation, params.scatter.frame, event.seed);
    commands.insert_resource(GeneratedLandmass(generation));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_landmass_uses_seed_for_shape() {
        let params = LandmassParams::default();
        let catalog = ScatterCatalog::default();
        let a = generate_landmass(&params, &catalog, 10);
        let b = generate_landmass(&params, &catalog, 11);
        assert_ne!(a.mesh.positions, b.mesh.positions);
        assert_eq!(a.mesh, generate_landmass(&params, &catalog, 10).mesh);
    }

    #[test]
    fn test_default_frame_puts_top_at_ground() {
        let params = LandmassParams::default();
        let generation = generate_landmass(&params, &ScatterCatalog::default(), 2);
        assert!(!generation.instances.is_empty());
        for instance in &generation.instances {
            assert!(instance.position.y.abs() < 1e-3);
        }
    }

    #[test]
    fn test_regeneration_replaces_landmass() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .init_resource::<Assets<Mesh>>()
            .init_resource::<Assets<StandardMaterial>>()
            .insert_resource(Seed(1))
            .insert_resource(LandmassParams::default())
            .insert_resource(ScatterCatalog::default())
            .add_event::<RegenerateEvent>()
            .add_systems(Startup, setup_landmass)
            .add_systems(Update, handle_regeneration);

        app.update();
        let first = app.world().resource::<GeneratedLandmass>().0.instances.clone();

        app.world_mut().send_event(RegenerateEvent { seed: 5 });
        app.update();

        let world = app.world_mut();
        assert_eq!(world.resource::<Seed>().0, 5);
        assert_ne!(world.resource::<GeneratedLandmass>().0.instances, first);

        let mut roots = world.query::<&Landmass>();
        let seeds: Vec<u64> = roots.iter(world).map(|l| l.seed).collect();
        assert_eq!(seeds, vec![5]);

        let expected = world.resource::<GeneratedLandmass>().0.placed_count();
        let mut objects = world.query::<&ScatteredObject>();
        assert_eq!(objects.iter(world).count(), expected);
    }
}
