//! # shmring - Process-Shared SPSC Ring Buffer
//!
//! shmring is a single-producer/single-consumer ring buffer stored in a
//! named shared memory region, letting one process publish fixed-size
//! integer items that other processes consume without copying through a
//! broker or socket.
//!
//! ## Features
//!
//! - **Named shared regions**: POSIX shm and file-backed profiles
//! - **Fixed wire layout**: big-endian slots plus an inline write pointer,
//!   bit-exact across independent implementations
//! - **Overwrite-on-full**: pushes never block; the oldest unread slot is
//!   sacrificed instead
//! - **Broadcast reads**: every attached reader drains the stream with its
//!   own private read pointer
//! - **RAII cleanup**: regions detach on drop, the creator unlinks the name
//!
//! ## Layout
//!
//! ```text
//! ┌───────────────────────────────────────────────┬────────────────┐
//! │ data ring: length slots of item_size bytes    │ write pointer  │
//! │ (big-endian unsigned integer per slot)        │ (big-endian,   │
//! │                                               │ minimal width) │
//! └───────────────────────────────────────────────┴────────────────┘
//! 0                                          data_size      region_size
//! ```
//!
//! All instances attached to one name must agree on `item_size` and
//! `length`; the region carries no header describing them.
//!
//! ## Consistency caveat
//!
//! The write pointer is advanced and persisted before the slot bytes are
//! written, with no fence in between. A concurrent reader can observe the
//! new pointer before the new slot contents. Hosts that need stronger
//! ordering must layer it externally; the buffer itself never locks, waits,
//! or fences.

// Core modules
pub mod error;
pub mod layout;
pub mod memory;
pub mod ring;

// Main API re-exports
pub use error::{Result, ShmRingError};
pub use layout::RingLayout;
pub use memory::{BackingType, RegionConfig, SharedMemoryRegion};
pub use ring::{RingBuffer, RingConfig, RingStats, Role};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default configuration constants
pub mod config {
    /// Default bytes per slot
    pub const DEFAULT_ITEM_SIZE: usize = 1;

    /// Default number of slots (the smallest valid ring)
    pub const DEFAULT_LENGTH: usize = 2;

    /// Default Unix permissions for backing regions
    pub const DEFAULT_PERMISSIONS: u32 = 0o600;
}
