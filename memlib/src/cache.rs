use log::debug;
use serde::{Deserialize, Serialize};

use crate::addr::{Decomposition, Geometry, GeometryError};

/// A generic trait for cache levels usable in a memory system
///
/// The hierarchy routing in [`crate::memory::MemorySystem`] only goes through
/// this trait, so alternative replacement policies or cache organisations can
/// be slotted in without touching the routing code. We rely on
/// monomorphisation rather than `dyn` dispatch; the per-access loop is the hot
/// path of every simulation
pub trait CacheModel {
    /// Whether the block containing `address` is currently resident
    ///
    /// Pure with respect to statistics and recency; checking residency is not
    /// an access
    fn contains(&self, address: u64) -> bool;

    /// Simulates one reference to `address`, updating recency, residency, and
    /// statistics. Reads and writes are indistinguishable to the engine
    fn access(&mut self, address: u64);

    /// Accumulated counters as of the last `access`
    fn stats(&self) -> Stats;

    /// Display name for reports
    fn label(&self) -> &str;
}

/// Hit/miss counters for one cache level
///
/// `accesses == hits + misses` after every operation
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub hits: u64,
    pub misses: u64,
    pub accesses: u64,
}

impl Stats {
    /// Fraction of accesses that missed, 0 for an untouched cache
    pub fn miss_rate(&self) -> f64 {
        if self.accesses == 0 {
            0.0
        } else {
            self.misses as f64 / self.accesses as f64
        }
    }
}

/// One resident block: which tag occupies the way and when it was last touched
#[derive(Debug, Clone, Copy)]
struct CacheLine {
    tag: u64,
    timestamp: u64,
}

/// One associative set, holding at most `capacity` resident tags
///
/// Timestamps come from the owning cache's logical clock and are globally
/// unique, so the least-recently-used line is always unambiguous
#[derive(Debug)]
pub(crate) struct CacheSet {
    ways: Vec<CacheLine>,
    capacity: usize,
}

impl CacheSet {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            ways: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub(crate) fn contains(&self, tag: u64) -> bool {
        self.ways.iter().any(|line| line.tag == tag)
    }

    /// Records a reference to `tag` at `timestamp`
    ///
    /// A resident tag only has its timestamp refreshed. A new tag fills a
    /// spare way if one exists, otherwise it replaces the line with the
    /// smallest timestamp
    pub(crate) fn touch(&mut self, tag: u64, timestamp: u64) {
        if let Some(line) = self.ways.iter_mut().find(|line| line.tag == tag) {
            line.timestamp = timestamp;
            return;
        }
        let line = CacheLine { tag, timestamp };
        if self.ways.len() < self.capacity {
            self.ways.push(line);
            return;
        }
        let mut victim = 0;
        for (index, candidate) in self.ways.iter().enumerate() {
            if candidate.timestamp < self.ways[victim].timestamp {
                victim = index;
            }
        }
        debug!(
            "evicting tag {:#x} (last used {}) for tag {tag:#x}",
            self.ways[victim].tag, self.ways[victim].timestamp
        );
        self.ways[victim] = line;
    }

    pub(crate) fn len(&self) -> usize {
        self.ways.len()
    }
}

/// A set-associative cache with least-recently-used replacement
///
/// Owns its geometry, one [`CacheSet`] per set, a logical clock for recency
/// bookkeeping, and the accumulated [`Stats`]. All mutation happens through
/// [`CacheModel::access`]
pub struct Cache {
    label: String,
    geometry: Geometry,
    sets: Vec<CacheSet>,
    clock: u64,
    stats: Stats,
}

impl Cache {
    /// Creates a cache from its total size, block size, and associativity,
    /// all in bytes except the way count
    ///
    /// Fails with [`GeometryError`] when any parameter is not a power of two
    /// or the derived set count would be zero. No other validation occurs
    pub fn new(total_size: u64, block_size: u64, associativity: u64) -> Result<Self, GeometryError> {
        let label = format!("{total_size}B/{block_size}B/{associativity}-way");
        Self::with_label(total_size, block_size, associativity, label)
    }

    /// Like [`Cache::new`] with an explicit display name for reports
    pub fn with_label(
        total_size: u64,
        block_size: u64,
        associativity: u64,
        label: impl Into<String>,
    ) -> Result<Self, GeometryError> {
        let geometry = Geometry::new(total_size, block_size, associativity)?;
        let sets = (0..geometry.num_sets())
            .map(|_| CacheSet::new(associativity as usize))
            .collect();
        Ok(Self {
            label: label.into(),
            geometry,
            sets,
            clock: 0,
            stats: Stats::default(),
        })
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Reconstructed capacity in bytes, `sets x ways x block size`. Always
    /// equals the configured total size
    pub fn total_size(&self) -> u64 {
        self.geometry.num_sets() * self.geometry.associativity() * self.geometry.block_size()
    }

    /// Resident line count per set, in set order. Useful for analysing cache
    /// utilisation or debugging
    pub fn set_occupancies(&self) -> Vec<usize> {
        self.sets.iter().map(CacheSet::len).collect()
    }

    /// Number of ways holding no line yet
    pub fn empty_line_count(&self) -> usize {
        self.sets
            .iter()
            .map(|set| set.capacity - set.len())
            .sum()
    }
}

impl CacheModel for Cache {
    fn contains(&self, address: u64) -> bool {
        let Decomposition { set_index, tag, .. } = self.geometry.decompose(address);
        self.sets[set_index as usize].contains(tag)
    }

    fn access(&mut self, address: u64) {
        self.clock += 1;
        let Decomposition { set_index, tag, .. } = self.geometry.decompose(address);
        let set = &mut self.sets[set_index as usize];
        // Hit or miss is decided before the touch mutates the set
        if set.contains(tag) {
            self.stats.hits += 1;
        } else {
            self.stats.misses += 1;
        }
        self.stats.accesses += 1;
        set.touch(tag, self.clock);
    }

    fn stats(&self) -> Stats {
        self.stats
    }

    fn label(&self) -> &str {
        &self.label
    }
}
