pub mod config;
pub mod error;
pub mod systems;

pub use error::{Error, Result};
pub use systems::landmass::pipeline::{generate, generate_in_frame, Generation, PlacedInstance, PlacementSpec, ScatterSettings, ShapeParameters};
