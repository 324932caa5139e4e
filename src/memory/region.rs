//! Shared memory region implementation
//!
//! A region is a named byte range visible to every process that attaches to
//! the same name. The creator owns the name: dropping or destroying a
//! creator-side region unlinks it, while attached regions only unmap.

use std::fs::{File, OpenOptions};
use std::io::ErrorKind;
use std::os::unix::fs::OpenOptionsExt;
use std::path::PathBuf;

use memmap2::{MmapMut, MmapOptions};
use nix::errno::Errno;
use nix::fcntl::OFlag;
use nix::sys::mman::{shm_open, shm_unlink};
use nix::sys::stat::Mode;

use crate::error::{Result, ShmRingError};

use super::config::{BackingType, RegionConfig};

/// A mapped shared memory region
#[derive(Debug)]
pub struct SharedMemoryRegion {
    name: String,
    backing_type: BackingType,
    /// POSIX object name, set for `BackingType::Posix`
    shm_name: Option<String>,
    /// Backing file path, set for `BackingType::FileBacked`
    file_path: Option<PathBuf>,
    owner: bool,
    mmap: MmapMut,
    _file: File,
}

impl SharedMemoryRegion {
    /// Allocate a new named region of exactly `config.size` bytes.
    ///
    /// The allocation is exclusive: a region whose name is already taken
    /// fails with `BufferAlreadyExists`. New regions are zero-initialized.
    pub fn create(config: &RegionConfig) -> Result<Self> {
        config.validate()?;

        match config.backing_type {
            BackingType::Posix => {
                let shm_name = config.shm_name();
                let fd = shm_open(
                    shm_name.as_str(),
                    OFlag::O_CREAT | OFlag::O_EXCL | OFlag::O_RDWR,
                    Mode::from_bits_truncate(config.permissions as nix::libc::mode_t),
                )
                .map_err(|errno| match errno {
                    Errno::EEXIST => ShmRingError::buffer_already_exists(&config.name),
                    errno => ShmRingError::platform(format!(
                        "shm_open failed for {}: {}",
                        shm_name, errno
                    )),
                })?;
                let file = File::from(fd);

                if let Err(err) = file.set_len(config.size as u64) {
                    let _ = shm_unlink(shm_name.as_str());
                    return Err(ShmRingError::from_io(err, "failed to size region"));
                }
                let mmap = match unsafe { MmapOptions::new().len(config.size).map_mut(&file) } {
                    Ok(mmap) => mmap,
                    Err(err) => {
                        let _ = shm_unlink(shm_name.as_str());
                        return Err(ShmRingError::from_io(err, "failed to map region"));
                    }
                };

                Ok(Self {
                    name: config.name.clone(),
                    backing_type: config.backing_type,
                    shm_name: Some(shm_name),
                    file_path: None,
                    owner: true,
                    mmap,
                    _file: file,
                })
            }
            BackingType::FileBacked => {
                let path = config.default_file_path();
                let file = OpenOptions::new()
                    .read(true)
                    .write(true)
                    .create_new(true)
                    .mode(config.permissions)
                    .open(&path)
                    .map_err(|err| match err.kind() {
                        ErrorKind::AlreadyExists => {
                            ShmRingError::buffer_already_exists(&config.name)
                        }
                        _ => ShmRingError::from_io(err, "failed to create region file"),
                    })?;

                if let Err(err) = file.set_len(config.size as u64) {
                    let _ = std::fs::remove_file(&path);
                    return Err(ShmRingError::from_io(err, "failed to size region file"));
                }
                let mmap = match unsafe { MmapOptions::new().len(config.size).map_mut(&file) } {
                    Ok(mmap) => mmap,
                    Err(err) => {
                        let _ = std::fs::remove_file(&path);
                        return Err(ShmRingError::from_io(err, "failed to map region file"));
                    }
                };

                Ok(Self {
                    name: config.name.clone(),
                    backing_type: config.backing_type,
                    shm_name: None,
                    file_path: Some(path),
                    owner: true,
                    mmap,
                    _file: file,
                })
            }
        }
    }

    /// Attach to an existing named region.
    ///
    /// Fails with `BufferNotFound` when no region carries the name. The
    /// mapping covers the region's actual size; `config.size` is NOT checked
    /// against it. Instances constructed with parameters that disagree with
    /// the creator's read garbage, which is the documented cost of keeping
    /// regions free of any self-describing header.
    pub fn attach(config: &RegionConfig) -> Result<Self> {
        config.validate()?;

        let (file, shm_name, file_path) = match config.backing_type {
            BackingType::Posix => {
                let shm_name = config.shm_name();
                let fd = shm_open(shm_name.as_str(), OFlag::O_RDWR, Mode::empty()).map_err(
                    |errno| match errno {
                        Errno::ENOENT => ShmRingError::buffer_not_found(&config.name),
                        errno => ShmRingError::platform(format!(
                            "shm_open failed for {}: {}",
                            shm_name, errno
                        )),
                    },
                )?;
                (File::from(fd), Some(shm_name), None)
            }
            BackingType::FileBacked => {
                let path = config.default_file_path();
                let file = OpenOptions::new()
                    .read(true)
                    .write(true)
                    .open(&path)
                    .map_err(|err| match err.kind() {
                        ErrorKind::NotFound => ShmRingError::buffer_not_found(&config.name),
                        _ => ShmRingError::from_io(err, "failed to open region file"),
                    })?;
                (file, None, Some(path))
            }
        };

        let actual_size = file
            .metadata()
            .map_err(|err| ShmRingError::from_io(err, "failed to stat region"))?
            .len() as usize;
        if actual_size == 0 {
            return Err(ShmRingError::platform(format!(
                "region {} has zero size",
                config.name
            )));
        }

        let mmap = unsafe {
            MmapOptions::new()
                .len(actual_size)
                .map_mut(&file)
                .map_err(|err| ShmRingError::from_io(err, "failed to map region"))?
        };

        Ok(Self {
            name: config.name.clone(),
            backing_type: config.backing_type,
            shm_name,
            file_path,
            owner: false,
            mmap,
            _file: file,
        })
    }

    /// Get the name of the region
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the mapped size of the region
    pub fn size(&self) -> usize {
        self.mmap.len()
    }

    /// Get the backing type of the region
    pub fn backing_type(&self) -> BackingType {
        self.backing_type
    }

    /// Whether this instance created (and therefore owns) the allocation
    pub fn is_owner(&self) -> bool {
        self.owner
    }

    /// Get the raw memory slice (read-only)
    pub fn as_slice(&self) -> &[u8] {
        &self.mmap
    }

    /// Get the raw memory slice (mutable)
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.mmap
    }

    /// Detach from the region without touching the named allocation.
    pub fn close(self) {
        drop(self);
    }

    /// Detach from the region and remove the named allocation.
    ///
    /// After this returns the name is free for reuse; attached instances
    /// keep their mappings until they close.
    pub fn destroy(self) -> Result<()> {
        match self.backing_type {
            BackingType::Posix => {
                if let Some(shm_name) = &self.shm_name {
                    shm_unlink(shm_name.as_str()).map_err(|errno| {
                        ShmRingError::platform(format!(
                            "shm_unlink failed for {}: {}",
                            shm_name, errno
                        ))
                    })?;
                }
                Ok(())
            }
            BackingType::FileBacked => {
                if let Some(path) = &self.file_path {
                    std::fs::remove_file(path)
                        .map_err(|err| ShmRingError::from_io(err, "failed to remove region"))?;
                }
                Ok(())
            }
        }
    }
}
