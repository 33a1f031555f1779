//! BLAKE3 file hasher with streaming support.
//!
//! # Overview
//!
//! The [`Hasher`] computes two kinds of content signature:
//!
//! - **Partial**: the digest of the first `PARTIAL_BLOCKS` blocks of
//!   `BLOCK_SIZE` bytes (81,920 bytes by default), or the whole file when it
//!   is shorter. Cheap, used to rule out same-size files that differ early.
//! - **Full**: the digest of the entire byte stream.
//!
//! Both read through a fixed-size buffer, so memory use does not depend on
//! file size.
//!
//! # Example
//!
//! ```no_run
//! use filedupes::scanner::{hash_to_hex, Hasher};
//! use std::path::Path;
//!
//! let hasher = Hasher::new();
//! let partial = hasher.partial(Path::new("a.bin")).unwrap();
//! let full = hasher.full(Path::new("a.bin")).unwrap();
//! println!("{} {}", hash_to_hex(&partial), hash_to_hex(&full));
//! ```

use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

use super::HashError;

/// A 32-byte BLAKE3 digest.
pub type Hash = [u8; 32];

/// Size of one read block in bytes.
pub const BLOCK_SIZE: usize = 8192;

/// Number of blocks hashed for a partial signature.
pub const PARTIAL_BLOCKS: usize = 10;

/// Maximum number of bytes covered by a partial signature.
pub const PARTIAL_SIZE: u64 = (BLOCK_SIZE * PARTIAL_BLOCKS) as u64;

/// Streaming BLAKE3 hasher.
#[derive(Debug, Clone)]
pub struct Hasher {
    block_size: usize,
}

impl Default for Hasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher {
    /// Create a hasher with the default block size and partial block count.
    #[must_use]
    pub fn new() -> Self {
        Self {
            block_size: BLOCK_SIZE,
        }
    }

    /// Number of bytes a partial signature covers.
    #[must_use]
    pub fn partial_len(&self) -> u64 {
        (self.block_size * PARTIAL_BLOCKS) as u64
    }

    /// Compute the bounded-prefix signature of a file.
    ///
    /// # Errors
    ///
    /// Returns [`HashError`] if the file cannot be opened or read.
    pub fn partial(&self, path: &Path) -> Result<Hash, HashError> {
        let file = File::open(path).map_err(|e| HashError::from_io(path, e))?;
        self.hash_reader(file.take(self.partial_len()), path)
    }

    /// Compute the signature of the whole file.
    ///
    /// # Errors
    ///
    /// Returns [`HashError`] if the file cannot be opened or read.
    pub fn full(&self, path: &Path) -> Result<Hash, HashError> {
        let file = File::open(path).map_err(|e| HashError::from_io(path, e))?;
        self.hash_reader(file, path)
    }

    /// Hash everything a reader yields, block by block.
    fn hash_reader<R: Read>(&self, mut reader: R, path: &Path) -> Result<Hash, HashError> {
        let mut hasher = blake3::Hasher::new();
        let mut buffer = vec![0u8; self.block_size];

        loop {
            match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => {
                    hasher.update(&buffer[..n]);
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(HashError::from_io(path, e)),
            }
        }

        Ok(*hasher.finalize().as_bytes())
    }
}

/// Encode a hash as lowercase hexadecimal.
#[must_use]
pub fn hash_to_hex(hash: &Hash) -> String {
    use std::fmt::Write;
    hash.iter().fold(String::with_capacity(64), |mut out, b| {
        let _ = write!(out, "{b:02x}");
        out
    })
}
