// scatter categories, loaded from json with a built-in fallback

use std::path::Path;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use super::pipeline::{AlignMode, PlacementSpec};

/// Ordered category list, scatter passes run in this order
#[derive(Resource, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScatterCatalog {
    pub categories: Vec<PlacementSpec>,
}

impl Default for ScatterCatalog {
    fn default() -> Self {
        Self {
            categories: vec![
                PlacementSpec::new("tree", &["pine", "oak", "birch"], 30, 5.0)
                    .with_scale(0.8, 1.4),
                PlacementSpec::new("rock", &["boulder", "slab", "pebble_pile"], 20, 3.0)
                    .with_scale(0.6, 1.8)
                    .with_align(AlignMode::SurfaceNormal),
                PlacementSpec::new("bush", &["shrub", "fern"], 25, 2.5)
                    .with_scale(0.7, 1.2),
                // small plants share one bucket so flowers and grass never overlap
                PlacementSpec::new("flower", &["daisy", "poppy", "bluebell"], 60, 1.0)
                    .with_bucket("small_plants")
                    .with_scale(0.8, 1.1)
                    .with_align(AlignMode::SurfaceNormal),
                PlacementSpec::new("grass", &["tuft", "tall_tuft"], 80, 1.0)
                    .with_bucket("small_plants")
                    .with_scale(0.6, 1.3)
                    .with_align(AlignMode::SurfaceNormal),
            ],
        }
    }
}

impl ScatterCatalog {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Missing or broken catalogs fall back to the built-in categories
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            debug!("no scatter catalog at {}, using defaults", path.display());
            return Self::default();
        }

        match Self::load(path) {
            Ok(catalog) => {
                info!("loaded {} scatter categories from {}", catalog.categories.len(), path.display());
                catalog
            }
            Err(e) => {
                warn!("failed to load scatter catalog {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn total_requested(&self) -> usize {
        self.categories.iter().map(|c| c.count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_catalog_buckets() {
        let catalog = ScatterCatalog::default();
        let buckets: Vec<&str> = catalog.categories.iter().map(|c| c.bucket_name()).collect();
        assert_eq!(buckets, ["tree", "rock", "bush", "small_plants", "small_plants"]);
        assert!(catalog.total_requested() > 0);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"categories": [{{"category": "crystal", "variants": ["blue"], "count": 3,
                "min_spacing": 2.0, "scale_range": [1.0, 2.0], "max_slope_deg": 10.0}}]}}"#
        )
        .unwrap();

        let catalog = ScatterCatalog::load(file.path()).unwrap();
        assert_eq!(catalog.categories.len(), 1);
        assert_eq!(catalog.categories[0].max_slope_deg, Some(10.0));
    }

    #[test]
    fn test_broken_file_falls_back() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        assert!(ScatterCatalog::load(file.path()).is_err());
        assert_eq!(ScatterCatalog::load_or_default(file.path()), ScatterCatalog::default());
    }

    #[test]
    fn test_missing_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = ScatterCatalog::load_or_default(dir.path().join("missing.json"));
        assert_eq!(catalog, ScatterCatalog::default());
    }

    #[test]
    fn test_shipped_catalog_matches_defaults() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join(crate::config::CATALOG_PATH);
        assert_eq!(ScatterCatalog::load(path).unwrap(), ScatterCatalog::default());
    }
}
