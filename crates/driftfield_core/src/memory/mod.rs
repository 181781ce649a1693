//! # Memory Management
//!
//! Pooled live instances.
//!
//! ## Design Philosophy
//!
//! Live instances are expensive to build and are created and dropped
//! constantly as sectors load and unload. The pool keeps inert instances
//! around so that:
//! - Spawning reuses an existing instance
//! - Growth is stepwise and capped
//! - Exhaustion degrades gracefully

mod pool;

pub use pool::{
    InstanceId, ObjectPool, PoolConfig, PoolConfigError, PoolState, PoolStats, Poolable,
    ReleaseOutcome,
};
