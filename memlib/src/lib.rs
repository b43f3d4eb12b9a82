//! # Memlib
//!
//! Memlib is a library for simulating set-associative CPU caches and
//! multi-level cache hierarchies
//!
//! It models real cache semantics (tag/set/offset decomposition,
//! associativity, least-recently-used replacement, hit-stop multi-level
//! routing) precisely enough to reason about the locality behaviour of an
//! access pattern, and provides a simulator for replaying textual access
//! traces against a configured hierarchy
//!
//! The engine is deterministic and single threaded; replaying the same trace
//! against an identically configured hierarchy reproduces identical
//! statistics every time

/// Contains the address codec and the validated cache geometry
pub mod addr;

/// Contains the set-associative cache, its statistics, and the trait cache
/// levels expose to a memory system
pub mod cache;

/// Contains definitions for the JSON hierarchy configuration format
pub mod config;

/// Contains helpers for reading trace files
pub mod io;

/// Contains the memory system hierarchy routing and variable allocation
pub mod memory;

/// Contains the simulator used to replay an access trace against a hierarchy
pub mod trace;

#[cfg(test)]
mod test;

/// Contains synthetic workloads for tests and benchmarks
pub mod util;
