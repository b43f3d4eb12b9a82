use serde::Deserialize;

use crate::addr::GeometryError;
use crate::cache::Cache;
use crate::memory::MemorySystem;

/// A cache hierarchy configuration with one entry per level, nearest first
#[derive(Debug, Deserialize)]
pub struct HierarchyConfig {
    pub caches: Vec<LevelConfig>,
}

/// A configuration for a single cache level. All sizes in bytes
#[derive(Debug, Deserialize)]
pub struct LevelConfig {
    pub name: String,
    pub total_size: u64,
    pub block_size: u64,
    pub associativity: u64,
}

impl HierarchyConfig {
    /// Constructs the configured hierarchy, validating each level's geometry
    pub fn build(&self) -> Result<MemorySystem<Cache>, GeometryError> {
        let mut system = MemorySystem::new();
        for level in &self.caches {
            system.add_cache(Cache::with_label(
                level.total_size,
                level.block_size,
                level.associativity,
                level.name.clone(),
            )?);
        }
        Ok(system)
    }
}
