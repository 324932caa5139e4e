//! Configuration types for shared memory regions

use std::path::PathBuf;

use crate::error::{Result, ShmRingError};

/// Longest POSIX shared memory object name, leading slash included
const POSIX_NAME_MAX: usize = 255;

/// Types of shared memory backing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackingType {
    /// POSIX shared memory object (`shm_open`)
    Posix,
    /// File-backed shared memory
    FileBacked,
}

impl Default for BackingType {
    fn default() -> Self {
        Self::Posix
    }
}

impl BackingType {
    /// Check if this backing type is supported on the current platform
    pub fn is_supported(&self) -> bool {
        match self {
            BackingType::Posix => cfg!(unix),
            BackingType::FileBacked => true,
        }
    }

    /// Get a human-readable name for the backing type
    pub fn name(&self) -> &'static str {
        match self {
            BackingType::Posix => "posix-shm",
            BackingType::FileBacked => "file-backed",
        }
    }
}

/// Configuration for creating or attaching to a shared memory region
#[derive(Debug, Clone)]
pub struct RegionConfig {
    /// Name of the shared memory region
    pub name: String,
    /// Total size of the region in bytes
    pub size: usize,
    /// Backing type for the shared memory
    pub backing_type: BackingType,
    /// Optional file path for file-backed regions
    pub file_path: Option<PathBuf>,
    /// Permissions for the region (Unix permissions)
    pub permissions: u32,
}

impl Default for RegionConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            size: 0,
            backing_type: BackingType::default(),
            file_path: None,
            permissions: 0o600,
        }
    }
}

impl RegionConfig {
    /// Create a new region configuration
    pub fn new(name: impl Into<String>, size: usize) -> Self {
        Self {
            name: name.into(),
            size,
            ..Default::default()
        }
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

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(ShmRingError::invalid_configuration(
                "name",
                "region name cannot be empty",
            ));
        }

        if self.size == 0 {
            return Err(ShmRingError::invalid_configuration(
                "size",
                "region size must be greater than 0",
            ));
        }

        if !self.backing_type.is_supported() {
            return Err(ShmRingError::invalid_configuration(
                "backing_type",
                format!(
                    "backing type {} is not supported on this platform",
                    self.backing_type.name()
                ),
            ));
        }

        if self.backing_type == BackingType::Posix {
            if self.name.contains('/') {
                return Err(ShmRingError::invalid_configuration(
                    "name",
                    "POSIX region names must not contain '/'",
                ));
            }
            if self.name.len() + 1 > POSIX_NAME_MAX {
                return Err(ShmRingError::invalid_configuration(
                    "name",
                    "POSIX region names must fit in 255 bytes",
                ));
            }
        }

        Ok(())
    }

    /// POSIX object name for this region (leading slash, no other slashes)
    pub fn shm_name(&self) -> String {
        format!("/{}", self.name)
    }

    /// Get the backing file path for file-backed regions
    pub fn default_file_path(&self) -> PathBuf {
        self.file_path
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join(format!("shmring_{}", self.name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = RegionConfig::default();
        assert_eq!(config.backing_type, BackingType::Posix);
        assert_eq!(config.permissions, 0o600);
        assert!(config.file_path.is_none());
    }

    #[test]
    fn test_config_validation() {
        assert!(RegionConfig::new("", 16).validate().is_err());
        assert!(RegionConfig::new("ring", 0).validate().is_err());
        assert!(RegionConfig::new("a/b", 16).validate().is_err());
        assert!(RegionConfig::new("ring", 16).validate().is_ok());

        // Slashes are fine for file-backed regions
        let config = RegionConfig::new("a/b", 16).with_backing_type(BackingType::FileBacked);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_shm_name() {
        let config = RegionConfig::new("ring", 16);
        assert_eq!(config.shm_name(), "/ring");
    }
}
