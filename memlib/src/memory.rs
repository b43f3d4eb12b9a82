use log::info;

use crate::cache::{Cache, CacheModel};

/// A handle to one simulated allocation: an address bound to the memory
/// system that handed it out
///
/// The handle does not own or borrow the system; every operation takes the
/// owning [`MemorySystem`] explicitly, so a variable can never extend the
/// system's lifetime. Two variables with the same address behave identically
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Variable {
    address: u64,
}

impl Variable {
    pub fn address(&self) -> u64 {
        self.address
    }

    /// Simulates one read of this variable
    pub fn read<C: CacheModel>(&self, system: &mut MemorySystem<C>) {
        system.perform_access(self.address);
    }

    /// Simulates one write of this variable. Writes have the same cache
    /// effects as reads; there is no dirty-bit or write-back modelling
    pub fn write<C: CacheModel>(&self, system: &mut MemorySystem<C>) {
        self.read(system);
    }
}

/// An ordered cache hierarchy plus an allocation cursor for simulated
/// variables
///
/// Level 0 is closest to the accessor. The cursor guarantees that all
/// variables allocated by one system have pairwise-disjoint, increasing
/// address ranges; it is per-instance state, never process-wide
pub struct MemorySystem<C: CacheModel = Cache> {
    caches: Vec<C>,
    cursor: u64,
}

impl<C: CacheModel> MemorySystem<C> {
    pub fn new() -> Self {
        Self {
            caches: Vec::new(),
            cursor: 0,
        }
    }

    /// Appends a cache as the next-farther level. Order is fixed once added
    pub fn add_cache(&mut self, cache: C) {
        info!("level {}: {}", self.caches.len(), cache.label());
        self.caches.push(cache);
    }

    /// The hierarchy in level order
    pub fn caches(&self) -> &[C] {
        &self.caches
    }

    /// Hands out `count` variables of `bytes_per_element` bytes each, laid
    /// out contiguously from the current cursor
    pub fn allocate(&mut self, count: usize, bytes_per_element: u64) -> Vec<Variable> {
        let variables = (0..count as u64)
            .map(|index| Variable {
                address: self.cursor + index * bytes_per_element,
            })
            .collect();
        self.cursor += count as u64 * bytes_per_element;
        variables
    }

    /// Allocates `count` contiguous 4-byte elements
    pub fn create_floats(&mut self, count: usize) -> Vec<Variable> {
        self.allocate(count, 4)
    }

    /// Allocates `count` contiguous 8-byte elements
    pub fn create_doubles(&mut self, count: usize) -> Vec<Variable> {
        self.allocate(count, 8)
    }

    /// Routes one read or write through the hierarchy
    ///
    /// Each level first records whether the address was resident before its
    /// own state is touched, then performs the access. The first level that
    /// was already holding the address stops propagation, so a hit near the
    /// accessor never disturbs the statistics of farther levels. A miss
    /// everywhere touches every level, with the last one also recording the
    /// insertion. An empty hierarchy makes this a no-op
    pub fn perform_access(&mut self, address: u64) {
        for cache in &mut self.caches {
            let was_cached = cache.contains(address);
            cache.access(address);
            if was_cached {
                break;
            }
        }
    }
}

impl<C: CacheModel> Default for MemorySystem<C> {
    fn default() -> Self {
        Self::new()
    }
}
