//! Random access to the postings blob.
//!
//! Two backends sit behind [`PostingsStore`]: a single shared file handle
//! whose seek+read pair runs under a lock, and a read-only memory map that
//! serves independent offset reads.

use crate::index::types::{DictEntry, DocId, PostingsAccess};
use crate::utils::decode_postings;
use anyhow::{Context, Result};
use memmap2::Mmap;
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;
use std::sync::Mutex;

/// Source of posting lists addressed by dictionary entries
pub trait PostingsStore: Send + Sync {
    /// Read the posting list delimited by `entry`, in storage order
    fn read(&self, entry: &DictEntry) -> io::Result<Vec<DocId>>;

    /// Total size of the blob in bytes
    fn len(&self) -> u64;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Open the postings blob with the requested backend
pub fn open_store(path: &Path, access: PostingsAccess) -> Result<Box<dyn PostingsStore>> {
    let store: Box<dyn PostingsStore> = match access {
        PostingsAccess::File => Box::new(FilePostings::open(path)?),
        PostingsAccess::Mmap => Box::new(MmapPostings::open(path)?),
    };
    Ok(store)
}

/// Shared, repositionable file handle
pub struct FilePostings {
    file: Mutex<File>,
    len: u64,
}

impl FilePostings {
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Cannot open postings: {}", path.display()))?;
        let len = file
            .metadata()
            .with_context(|| format!("Cannot stat postings: {}", path.display()))?
            .len();

        Ok(Self {
            file: Mutex::new(file),
            len,
        })
    }
}

impl PostingsStore for FilePostings {
    fn read(&self, entry: &DictEntry) -> io::Result<Vec<DocId>> {
        if entry.length == 0 {
            return Ok(Vec::new());
        }

        let mut buf = vec![0u8; entry.length as usize];
        {
            // Seek and read must not interleave with another lookup
            let mut file = self
                .file
                .lock()
                .map_err(|_| io::Error::other("postings handle lock poisoned"))?;
            file.seek(SeekFrom::Start(entry.offset))?;
            file.read_exact(&mut buf)?;
        }

        Ok(decode_postings(&buf))
    }

    fn len(&self) -> u64 {
        self.len
    }
}

/// Read-only memory map of the blob
pub struct MmapPostings {
    // Empty files cannot be mapped on every platform
    map: Option<Mmap>,
}

impl MmapPostings {
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Cannot open postings: {}", path.display()))?;
        let len = file.metadata()?.len();

        let map = if len == 0 {
            None
        } else {
            // The index is immutable while a session is serving it
            let map = unsafe { Mmap::map(&file) }
                .with_context(|| format!("Cannot map postings: {}", path.display()))?;
            Some(map)
        };

        Ok(Self { map })
    }

    fn bytes(&self) -> &[u8] {
        self.map.as_deref().unwrap_or(&[])
    }
}

impl PostingsStore for MmapPostings {
    fn read(&self, entry: &DictEntry) -> io::Result<Vec<DocId>> {
        let bytes = self.bytes();
        let start = entry.offset as usize;
        let end = start
            .checked_add(entry.length as usize)
            .filter(|&end| end <= bytes.len())
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    format!("postings range {}+{} past end of blob", entry.offset, entry.length),
                )
            })?;

        Ok(decode_postings(&bytes[start..end]))
    }

    fn len(&self) -> u64 {
        self.bytes().len() as u64
    }
}
