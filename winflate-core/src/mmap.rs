//! Memory-mapped compressed input.
//!
//! The inflate engine reads from a borrowed byte slice, so a whole input
//! file has to be addressable at once. [`MappedInput`] maps the file
//! read-only and exposes it as `&[u8]`, letting the operating system page
//! the data in as the bit reader walks forward.
//!
//! # Example
//!
//! ```no_run
//! use winflate_core::mmap::MappedInput;
//!
//! let input = MappedInput::open("payload.deflate")?;
//! println!("{} compressed bytes", input.len());
//! # Ok::<(), winflate_core::error::InflateError>(())
//! ```
//!
//! # Safety
//!
//! A mapped file that another process truncates or rewrites while mapped
//! can change underneath the reader. Mappings are read-only and callers are
//! expected not to modify the file during a session.

use crate::error::Result;
use memmap2::Mmap;
use std::fs::File;
use std::ops::Deref;
use std::path::Path;

/// Read-only view of an input file.
#[derive(Debug)]
pub struct MappedInput {
    /// `None` for empty files, which cannot be mapped.
    mmap: Option<Mmap>,
}

impl MappedInput {
    /// Open and map the file at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Self::from_file(&file)
    }

    /// Map an already-open file.
    pub fn from_file(file: &File) -> Result<Self> {
        if file.metadata()?.len() == 0 {
            return Ok(Self { mmap: None });
        }

        // SAFETY: read-only mapping; the file must not be modified while mapped.
        let mmap = unsafe { Mmap::map(file)? };
        Ok(Self { mmap: Some(mmap) })
    }

    /// The mapped bytes.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        match &self.mmap {
            Some(mmap) => mmap,
            None => &[],
        }
    }

    /// File size in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    /// True for an empty file.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Deref for MappedInput {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl AsRef<[u8]> for MappedInput {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}
