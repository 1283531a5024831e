// Configuration file, All measurements in real-world meters (1 unit = 1 meter)
// This controls the initial generation parameter settings

pub const INITIAL_SEED: u64 = 1;

// Landmass shape
pub const SEGMENTS: usize = 32;
pub const MIN_SEGMENTS: usize = 6;
pub const HEIGHT: f32 = 60.0;
pub const TOP_RADIUS: f32 = 35.0;
pub const BOTTOM_RADIUS: f32 = 8.0;
pub const RIM_NOISE: f32 = 0.12;       // fraction of radius, clamped to 0..0.5
pub const MAX_RIM_NOISE: f32 = 0.5;

// Scatter defaults
pub const EDGE_MARGIN: f32 = 1.5;       // inset from the rim before sampling
pub const MAX_SLOPE_DEG: f32 = 35.0;    // global slope limit, categories may override
pub const TRIES_PER_OBJECT: usize = 20; // try budget = tries * target count

// Fallback disk when the top polygon cannot be built
pub const MIN_FALLBACK_RADIUS: f32 = 0.1;

// Top surface extraction tolerances (relative to top radius)
pub const TOP_PLANE_EPS_FRACTION: f32 = 1e-3;
pub const DEDUP_EPS_FRACTION: f32 = 1e-4;
pub const MIN_RIM_RADIUS_ABS: f32 = 0.01;
pub const MIN_RIM_RADIUS_FRACTION: f32 = 0.05;
pub const TOLERANCE_FLOOR: f32 = 1e-5;  // absolute floor for the scaled epsilons

// Fan triangles below this area are dropped from the sampler
pub const MIN_TRIANGLE_AREA: f32 = 1e-6;

// Downward surface probe, measured along the landmass up axis
pub const PROBE_HEIGHT: f32 = 2.0;

// Scatter catalog location, read once at startup
pub const CATALOG_PATH: &str = "assets/scatter_catalog.json";
pub const EXPORT_PATH: &str = "landmass.obj";
