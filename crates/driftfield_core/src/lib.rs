//! # DRIFTFIELD Core
//!
//! Instance memory for the DRIFTFIELD world pipeline.
//!
//! ## Architecture Rules
//!
//! 1. **Reuse before allocate** - live instances come from a pool
//! 2. **Bounded growth** - pools grow in fixed steps up to a hard size
//! 3. **Soft exhaustion** - past the hard size, untracked overflow instances
//!    are handed out and reported, never refused
//!
//! ## Example
//!
//! ```rust,ignore
//! use driftfield_core::{ObjectPool, PoolConfig};
//!
//! let mut pool = ObjectPool::new(PoolConfig::default(), Rock::inert)?;
//! let rock = pool.acquire();
//! pool.release(rock);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod memory;

pub use memory::{
    InstanceId, ObjectPool, PoolConfig, PoolConfigError, PoolState, PoolStats, Poolable,
    ReleaseOutcome,
};
