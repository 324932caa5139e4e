//! Ring buffer over a named shared memory region
//!
//! One process creates the region and becomes the sole writer; any number of
//! other processes attach as readers, each draining the stream independently
//! with a private read pointer. All operations are synchronous and
//! non-blocking: an empty buffer pops `None`, a full buffer overwrites the
//! oldest unread slot.
//!
//! The shared state is plain bytes with no lock, atomic, or fence around the
//! pointer update and the slot write. A reader can observe an advanced write
//! pointer before the slot bytes it covers; hosts that cannot tolerate that
//! window must layer their own synchronization on top.

use std::fmt;

use crate::error::{Result, ShmRingError};
use crate::layout::RingLayout;
use crate::memory::{RegionConfig, SharedMemoryRegion};

use super::config::RingConfig;

/// Access role of one attached instance, fixed at construction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Created the region; may push, owns the allocation's destruction
    Writer,
    /// Attached to the region; may pop, detaches without destroying
    Reader,
}

/// Single-producer single-consumer ring buffer in named shared memory
///
/// Items are fixed-size unsigned integers stored big-endian, one per slot.
/// The next-slot write pointer lives inline at the end of the region so all
/// attached instances observe it; read pointers are private per instance.
#[derive(Debug)]
pub struct RingBuffer {
    name: String,
    layout: RingLayout,
    role: Role,
    read_pointer: usize,
    region: Option<SharedMemoryRegion>,
}

impl RingBuffer {
    /// Create or attach a ring buffer according to `config`.
    ///
    /// `config.create == true` allocates the named region (zeroed, write
    /// pointer at 0) and fixes the instance as the writer; it fails with
    /// `BufferAlreadyExists` when the name is taken. `config.create ==
    /// false` attaches to an existing region as a reader and fails with
    /// `BufferNotFound` when there is none. Geometry agreement between
    /// instances is the caller's responsibility and is not checked.
    pub fn new(config: RingConfig) -> Result<Self> {
        let layout = config.layout()?;

        let mut region_config = RegionConfig::new(&config.name, layout.region_size())
            .with_backing_type(config.backing_type)
            .with_permissions(config.permissions);
        if let Some(path) = &config.file_path {
            region_config = region_config.with_file_path(path);
        }

        let (region, role) = if config.create {
            (SharedMemoryRegion::create(&region_config)?, Role::Writer)
        } else {
            (SharedMemoryRegion::attach(&region_config)?, Role::Reader)
        };

        Ok(Self {
            name: config.name,
            layout,
            role,
            read_pointer: 0,
            region: Some(region),
        })
    }

    /// Push one item into the buffer.
    ///
    /// Advances the shared write pointer by one slot, persists it, then
    /// writes the item's big-endian bytes into the slot ending at the new
    /// pointer value. The pointer therefore always denotes the next slot
    /// boundary to be written, and a full ring silently overwrites its
    /// oldest unread slot rather than blocking or failing.
    ///
    /// Fails with `WriteForbidden` on a reader instance and with
    /// `ValueOutOfRange`, before any state changes, when `item` does not
    /// fit in `item_size` bytes.
    pub fn push(&mut self, item: u64) -> Result<()> {
        if self.role != Role::Writer {
            return Err(ShmRingError::write_forbidden(&self.name));
        }
        self.layout.check_item(item)?;

        let layout = self.layout;
        let region = match &mut self.region {
            Some(region) => region,
            None => return Err(ShmRingError::platform("ring buffer is detached")),
        };
        let bytes = region.as_mut_slice();

        let next = layout.advance(layout.load_write_pointer(bytes));
        layout.store_write_pointer(bytes, next);

        let end = layout.slot_end(next);
        layout.encode_item(item, &mut bytes[end - layout.item_size()..end]);
        Ok(())
    }

    /// Pop the oldest unread item, or `None` when the buffer is empty.
    ///
    /// Never blocks; emptiness (read pointer caught up with the shared
    /// write pointer) is an ordinary outcome, not an error. Fails with
    /// `ReadForbidden` on a writer instance.
    pub fn pop(&mut self) -> Result<Option<u64>> {
        if self.role != Role::Reader {
            return Err(ShmRingError::read_forbidden(&self.name));
        }

        let layout = self.layout;
        let region = match &self.region {
            Some(region) => region,
            None => return Err(ShmRingError::platform("ring buffer is detached")),
        };
        let bytes = region.as_slice();

        if self.read_pointer == layout.load_write_pointer(bytes) {
            return Ok(None);
        }
        self.read_pointer = layout.advance(self.read_pointer);

        let end = layout.slot_end(self.read_pointer);
        Ok(Some(
            layout.decode_item(&bytes[end - layout.item_size()..end]),
        ))
    }

    /// Pop up to `n` items, stopping early at the first empty pop.
    ///
    /// Items come back in pop order, oldest first. Fails with
    /// `ReadForbidden` on a writer instance.
    pub fn pop_many(&mut self, n: usize) -> Result<Vec<u64>> {
        if self.role != Role::Reader {
            return Err(ShmRingError::read_forbidden(&self.name));
        }

        let mut items = Vec::with_capacity(n.min(self.layout.length()));
        for _ in 0..n {
            match self.pop()? {
                Some(item) => items.push(item),
                None => break,
            }
        }
        Ok(items)
    }

    /// Count of unread items as seen from this instance's read pointer.
    ///
    /// A read pointer numerically ahead of the write pointer means the ring
    /// has wrapped since this reader last caught up. Only meaningful for
    /// readers; a writer's read pointer never moves, so the writer sees the
    /// number of items pushed modulo wraparound.
    pub fn usage(&self) -> usize {
        let Some(region) = &self.region else { return 0 };
        let write_pointer = self.layout.load_write_pointer(region.as_slice());

        if self.read_pointer > write_pointer {
            self.layout.length() - self.read_pointer / self.layout.item_size()
                + write_pointer / self.layout.item_size()
        } else {
            (write_pointer - self.read_pointer) / self.layout.item_size()
        }
    }

    /// Snapshot of the buffer's identity and backlog
    pub fn stats(&self) -> RingStats {
        RingStats {
            name: self.name.clone(),
            item_size: self.layout.item_size(),
            length: self.layout.length(),
            unread: self.usage(),
        }
    }

    /// Release the shared region.
    ///
    /// Idempotent. Readers only detach; the writer additionally destroys
    /// the named allocation so the name becomes reusable. Runs from `Drop`
    /// as well, so the guarantee is "on clean scope exit": after a crash or
    /// SIGKILL the allocation leaks and blocks future creates with
    /// `BufferAlreadyExists` until removed out of band.
    pub fn cleanup(&mut self) -> Result<()> {
        match self.region.take() {
            Some(region) => {
                if self.role == Role::Writer {
                    region.destroy()
                } else {
                    region.close();
                    Ok(())
                }
            }
            None => Ok(()),
        }
    }

    /// Name of the backing region
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Bytes per slot
    pub fn item_size(&self) -> usize {
        self.layout.item_size()
    }

    /// Number of slots
    pub fn length(&self) -> usize {
        self.layout.length()
    }

    /// Region geometry
    pub fn layout(&self) -> RingLayout {
        self.layout
    }

    /// Access role of this instance
    pub fn role(&self) -> Role {
        self.role
    }

    /// Whether this instance created the region and may push
    pub fn is_writer(&self) -> bool {
        self.role == Role::Writer
    }

    /// Whether this instance attached to the region and may pop
    pub fn is_reader(&self) -> bool {
        self.role == Role::Reader
    }
}

impl fmt::Display for RingBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.role {
            Role::Writer => write!(f, "RingBuffer ({})", self.name),
            Role::Reader => write!(
                f,
                "RingBuffer ({}) ({:.2}% full)",
                self.name,
                (self.usage() as f64 / self.layout.length() as f64) * 100.0
            ),
        }
    }
}

impl Drop for RingBuffer {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}

/// Point-in-time view of a ring buffer's backlog
#[derive(Debug, Clone)]
pub struct RingStats {
    pub name: String,
    pub item_size: usize,
    pub length: usize,
    pub unread: usize,
}

impl RingStats {
    /// Fraction of slots holding unread items, in `[0.0, 1.0]`
    pub fn fill_ratio(&self) -> f64 {
        self.unread as f64 / self.length as f64
    }
}
