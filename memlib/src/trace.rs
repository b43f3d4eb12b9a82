use std::time::{Duration, Instant};

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::addr::GeometryError;
use crate::cache::{Cache, CacheModel};
use crate::config::HierarchyConfig;
use crate::memory::MemorySystem;

lazy_static! {
    // One access per line: an operation letter and a hex address. The width
    // bound keeps the parsed value inside u64
    static ref ACCESS_LINE: Regex =
        Regex::new(r"^(?P<op>[RWrw])\s+(?:0x)?(?P<addr>[0-9a-fA-F]{1,16})$").unwrap();
}

/// Raised when a trace cannot be replayed
#[derive(Debug, Error)]
pub enum TraceError {
    #[error("trace is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),
    #[error("malformed trace line {line_number}: {line:?}")]
    MalformedLine { line_number: usize, line: String },
}

/// Replays textual access traces against a configured hierarchy and collects
/// results
///
/// Supports calling [`Simulator::simulate`] multiple times; statistics and the
/// time taken accumulate across calls
pub struct Simulator {
    system: MemorySystem<Cache>,
    simulation_time: Duration,
}

/// The result of a simulation. Serialises to the output format
#[derive(Debug, Serialize, Deserialize, Eq, PartialEq)]
pub struct SimulationResult {
    main_memory_accesses: u64,
    caches: Vec<LevelResult>,
}

/// The result for an individual cache level
#[derive(Debug, Serialize, Deserialize, Eq, PartialEq)]
pub struct LevelResult {
    name: String,
    hits: u64,
    misses: u64,
    accesses: u64,
}

impl Simulator {
    /// Creates a simulator for a given configuration
    pub fn new(config: &HierarchyConfig) -> Result<Self, GeometryError> {
        Ok(Self::from_system(config.build()?))
    }

    /// Wraps an already-built hierarchy
    pub fn from_system(system: MemorySystem<Cache>) -> Self {
        Self {
            system,
            simulation_time: Duration::ZERO,
        }
    }

    /// Replays a trace and returns the accumulated results
    ///
    /// The trace is line oriented: `R <hex address>` or `W <hex address>`,
    /// with an optional `0x` prefix. Blank lines and lines starting with `#`
    /// are skipped. Reads and writes are validated separately but have
    /// identical cache effects
    ///
    /// # Examples
    ///
    /// ```
    /// use memlib::cache::Cache;
    /// use memlib::memory::MemorySystem;
    /// use memlib::trace::Simulator;
    ///
    /// let mut system = MemorySystem::new();
    /// system.add_cache(Cache::with_label(64, 8, 2, "L1").unwrap());
    /// let mut simulator = Simulator::from_system(system);
    /// let result = simulator.simulate(b"R 0x10\nW 0x10\n").unwrap();
    /// assert_eq!(result.main_memory_accesses(), 1);
    /// ```
    pub fn simulate(&mut self, bytes: &[u8]) -> Result<SimulationResult, TraceError> {
        let text = std::str::from_utf8(bytes)?;
        let start = Instant::now();
        for (index, line) in text.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let malformed = || TraceError::MalformedLine {
                line_number: index + 1,
                line: line.to_string(),
            };
            let captures = ACCESS_LINE.captures(trimmed).ok_or_else(|| malformed())?;
            let address =
                u64::from_str_radix(&captures["addr"], 16).map_err(|_| malformed())?;
            self.system.perform_access(address);
        }
        self.simulation_time += start.elapsed();
        Ok(self.result())
    }

    /// The results as of the last `simulate` call
    pub fn result(&self) -> SimulationResult {
        let caches: Vec<LevelResult> = self
            .system
            .caches()
            .iter()
            .map(|cache| {
                let stats = cache.stats();
                LevelResult {
                    name: cache.label().to_string(),
                    hits: stats.hits,
                    misses: stats.misses,
                    accesses: stats.accesses,
                }
            })
            .collect();
        SimulationResult {
            // Main memory sees whatever misses the last level
            main_memory_accesses: caches.last().map_or(0, |level| level.misses),
            caches,
        }
    }

    /// Gets the wall-clock execution time for replaying, accumulated across
    /// `simulate` calls
    pub fn get_execution_time(&self) -> Duration {
        self.simulation_time
    }

    /// Gets the number of still-empty lines for each cache level
    pub fn get_empty_line_counts(&self) -> Vec<u64> {
        self.system
            .caches()
            .iter()
            .map(|cache| cache.empty_line_count() as u64)
            .collect()
    }

    pub fn system(&self) -> &MemorySystem<Cache> {
        &self.system
    }
}

impl SimulationResult {
    pub fn main_memory_accesses(&self) -> u64 {
        self.main_memory_accesses
    }

    pub fn caches(&self) -> &[LevelResult] {
        &self.caches
    }
}

impl LevelResult {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }

    pub fn accesses(&self) -> u64 {
        self.accesses
    }
}
