//! Configuration for ring buffer instances

use std::path::PathBuf;

use crate::config::{DEFAULT_ITEM_SIZE, DEFAULT_LENGTH, DEFAULT_PERMISSIONS};
use crate::error::Result;
use crate::layout::RingLayout;
use crate::memory::BackingType;

/// Configuration for creating or attaching a [`RingBuffer`](super::RingBuffer)
///
/// Every instance attached to the same name must be built with identical
/// `item_size` and `length`. Nothing in the shared region records these
/// parameters, so a mismatch is not detected; it silently corrupts reads.
#[derive(Debug, Clone)]
pub struct RingConfig {
    /// Name of the shared region backing the buffer
    pub name: String,
    /// Create the region (writer role) instead of attaching (reader role)
    pub create: bool,
    /// Bytes per slot
    pub item_size: usize,
    /// Number of slots
    pub length: usize,
    /// Backing type for the shared region
    pub backing_type: BackingType,
    /// Optional file path override for file-backed regions
    pub file_path: Option<PathBuf>,
    /// Permissions for the region (Unix permissions)
    pub permissions: u32,
}

impl Default for RingConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            create: false,
            item_size: DEFAULT_ITEM_SIZE,
            length: DEFAULT_LENGTH,
            backing_type: BackingType::default(),
            file_path: None,
            permissions: DEFAULT_PERMISSIONS,
        }
    }
}

impl RingConfig {
    /// Create a configuration with default geometry (1-byte items, 2 slots)
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Set whether this instance creates the region (writer) or attaches (reader)
    pub fn with_create(mut self, create: bool) -> Self {
        self.create = create;
        self
    }

    /// Set the bytes per slot
    pub fn with_item_size(mut self, item_size: usize) -> Self {
        self.item_size = item_size;
        self
    }

    /// Set the number of slots
    pub fn with_length(mut self, length: usize) -> Self {
        self.length = length;
        self
    }

    /// Set the backing type
    pub fn with_backing_type(mut self, backing_type: BackingType) -> Self {
        self.backing_type = backing_type;
        self
    }

    /// Set the file path for file-backed regions
    pub fn with_file_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.file_path = Some(path.into());
        self
    }

    /// Set the permissions for the region
    pub fn with_permissions(mut self, permissions: u32) -> Self {
        self.permissions = permissions;
        self
    }

    /// Validate the geometry and derive the region layout
    pub fn layout(&self) -> Result<RingLayout> {
        RingLayout::new(self.item_size, self.length)
    }
}
