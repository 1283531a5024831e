use bevy::prelude::*;
use bevy::render::mesh::{Indices, PrimitiveTopology};
use bevy::render::render_asset::RenderAssetUsages;
use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::config::*;

/// Shape of the frustum landmass. Immutable for one generation run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShapeParameters {
    pub segments: usize,
    pub height: f32,
    pub top_radius: f32,
    pub bottom_radius: f32,
    /// Multiplicative rim irregularity, a factor in `[1 - rim_noise, 1 + rim_noise]` per segment
    pub rim_noise: f32,
    pub seed: u64,
}

impl Default for ShapeParameters {
    fn default() -> Self {
        Self {
            segments: SEGMENTS,
            height: HEIGHT,
            top_radius: TOP_RADIUS,
            bottom_radius: BOTTOM_RADIUS,
            rim_noise: RIM_NOISE,
            seed: INITIAL_SEED,
        }
    }
}

impl ShapeParameters {
    /// Clamp every field into its valid range; building never rejects parameters
    pub fn sanitized(&self) -> Self {
        Self {
            segments: self.segments.max(MIN_SEGMENTS),
            height: self.height.max(0.0),
            top_radius: self.top_radius.max(0.0),
            bottom_radius: self.bottom_radius.max(0.0),
            rim_noise: self.rim_noise.clamp(0.0, MAX_RIM_NOISE),
            seed: self.seed,
        }
    }
}

/// Generated landmass geometry in its local, Y-up frame.
///
/// Vertex layout: index 0 is the apex at the top center, followed by
/// `segments` top-rim vertices and then `segments` bottom-rim vertices.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LandmassMesh {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    /// Top fan, faces point up
    pub cap: Vec<u32>,
    /// Side walls, faces point radially outward
    pub walls: Vec<u32>,
}

impl LandmassMesh {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// All triangles, cap first then walls
    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.cap
            .chunks_exact(3)
            .chain(self.walls.chunks_exact(3))
            .map(|tri| {
                [
                    self.positions[tri[0] as usize],
                    self.positions[tri[1] as usize],
                    self.positions[tri[2] as usize],
                ]
            })
    }

    pub fn cap_triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.cap.chunks_exact(3).map(|tri| {
            [
                self.positions[tri[0] as usize],
                self.positions[tri[1] as usize],
                self.positions[tri[2] as usize],
            ]
        })
    }

    pub fn wall_triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.walls.chunks_exact(3).map(|tri| {
            [
                self.positions[tri[0] as usize],
                self.positions[tri[1] as usize],
                self.positions[tri[2] as usize],
            ]
        })
    }

    // convert to a render mesh, cap and wall indices share one buffer
    pub fn to_bevy_mesh(&self) -> Mesh {
        let positions: Vec<[f32; 3]> = self.positions.iter().map(|p| p.to_array()).collect();
        let normals: Vec<[f32; 3]> = self.normals.iter().map(|n| n.to_array()).collect();
        let uvs: Vec<[f32; 2]> = self.uvs.iter().map(|uv| uv.to_array()).collect();

        let mut indices = Vec::with_capacity(self.cap.len() + self.walls.len());
        indices.extend_from_slice(&self.cap);
        indices.extend_from_slice(&self.walls);

        let mut mesh = Mesh::new(
            PrimitiveTopology::TriangleList,
            RenderAssetUsages::MAIN_WORLD | RenderAssetUsages::RENDER_WORLD,
        );

        mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
        mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
        mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, uvs);
        mesh.insert_indices(Indices::U32(indices));

        mesh
    }
}

/// Build the landmass mesh. Identical parameters always give identical output.
pub fn build(params: &ShapeParameters) -> LandmassMesh {
    let params = params.sanitized();
    let n = params.segments;
    let mut rng = StdRng::seed_from_u64(params.seed);

    // one noise factor per angular slot, shared by the top and bottom rims
    let noise: Vec<f32> = (0..n)
        .map(|_| 1.0 + rng.random_range(-1.0_f32..=1.0) * params.rim_noise)
        .collect();

    let mut positions = Vec::with_capacity(1 + 2 * n);
    let mut uvs = Vec::with_capacity(1 + 2 * n);

    // planar cap projection, centered and normalized by top diameter
    let diameter = (params.top_radius * 2.0).max(f32::EPSILON);
    let planar_uv = |p: Vec3| Vec2::new(0.5 + p.x / diameter, 0.5 + p.z / diameter);

    let apex = Vec3::new(0.0, params.height, 0.0);
    positions.push(apex);
    uvs.push(planar_uv(apex));

    for (i, factor) in noise.iter().enumerate() {
        let angle = (i as f32 / n as f32) * std::f32::consts::TAU;
        let r = params.top_radius * factor;
        let p = Vec3::new(angle.cos() * r, params.height, angle.sin() * r);
        positions.push(p);
        uvs.push(planar_uv(p));
    }

    for (i, factor) in noise.iter().enumerate() {
        let angle = (i as f32 / n as f32) * std::f32::consts::TAU;
        let r = params.bottom_radius * factor;
        positions.push(Vec3::new(angle.cos() * r, 0.0, angle.sin() * r));
        // cylindrical unwrap, no seam vertex so the last wall quad wraps U from (n-1)/n back to 0
        uvs.push(Vec2::new(i as f32 / n as f32, 0.0));
    }

    let apex_idx = 0u32;
    let top = |i: usize| (1 + i) as u32;
    let bottom = |i: usize| (1 + n + i) as u32;

    let mut cap = Vec::with_capacity(3 * n);
    let mut walls = Vec::with_capacity(6 * n);

    for i in 0..n {
        let next = (i + 1) % n;

        // counter-clockwise seen from above
        cap.extend([apex_idx, top(next), top(i)]);

        // wall quad
        walls.extend([top(i), top(next), bottom(i)]);
        walls.extend([bottom(i), top(next), bottom(next)]);
    }

    let normals = compute_normals(&positions, cap.iter().chain(walls.iter()).copied());

    LandmassMesh {
        positions,
        normals,
        uvs,
        cap,
        walls,
    }
}

// area-weighted face normals summed at shared vertices
fn compute_normals(positions: &[Vec3], indices: impl Iterator<Item = u32>) -> Vec<Vec3> {
    let mut normals = vec![Vec3::ZERO; positions.len()];
    let indices: Vec<u32> = indices.collect();

    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        let face = (positions[b] - positions[a]).cross(positions[c] - positions[a]);
        normals[a] += face;
        normals[b] += face;
        normals[c] += face;
    }

    normals
        .into_iter()
        .map(|n| n.try_normalize().unwrap_or(Vec3::Y))
        .collect()
}

/// Outward face normal from winding, or `None` for a degenerate triangle
pub fn face_normal(tri: &[Vec3; 3]) -> Option<Vec3> {
    (tri[1] - tri[0]).cross(tri[2] - tri[0]).try_normalize()
}
