//! Location classification and raw byte access
//!
//! A location is an opaque string naming either a local path or a remote
//! URL; [`Source::classify`] decides which, and the helpers here produce
//! readers over the raw bytes without interpreting them. Remote resources
//! are always retrieved whole, synchronously, before any reader is handed
//! out: there is no streaming-while-downloading and no partial access, so
//! a fetch either completes or fails before the first stream exists.

use std::fs::File;
use std::io::{BufRead, BufReader, Cursor, Read, Seek};
use std::path::{Path, PathBuf};

use bytes::Bytes;
use memmap2::Mmap;

use crate::error::Result;

/// Memory-mapped file threshold (50 MB)
///
/// Local files at or above this size are served from a memory map instead
/// of buffered reads; smaller files are cheaper through a plain
/// `BufReader`.
pub const MMAP_THRESHOLD: u64 = 50 * 1024 * 1024;

/// A classified location: local filesystem path or remote URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// Local file or directory path
    Local(PathBuf),
    /// Remote URL, retrieved whole when opened
    Remote(String),
}

impl Source {
    /// Classify a location string without touching the resource
    pub fn classify(location: &str) -> Self {
        if is_remote_url(location) {
            Source::Remote(location.to_string())
        } else {
            Source::Local(PathBuf::from(location))
        }
    }
}

/// Test whether a location string is a remote URL
///
/// A location is remote iff it carries a scheme, a network authority, and
/// a non-empty path, all three present. Anything that fails to parse that
/// way is a local path, never an error.
pub fn is_remote_url(location: &str) -> bool {
    let Some((scheme, rest)) = location.split_once("://") else {
        return false;
    };
    let mut chars = scheme.chars();
    let scheme_ok = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    if !scheme_ok {
        return false;
    }
    match rest.split_once('/') {
        Some((authority, _)) => !authority.is_empty(),
        None => false,
    }
}

/// Synchronous whole-resource retrieval
///
/// Blocks until the entire resource is in memory. A non-success status
/// surfaces as [`BiosourceError::Http`], a transport failure as
/// [`BiosourceError::Network`]; neither is retried.
///
/// [`BiosourceError::Http`]: crate::BiosourceError::Http
/// [`BiosourceError::Network`]: crate::BiosourceError::Network
#[cfg(feature = "network")]
pub fn fetch_bytes(url: &str) -> Result<Bytes> {
    use crate::error::BiosourceError;

    let response =
        reqwest::blocking::get(url).map_err(|err| BiosourceError::Network(err.to_string()))?;
    let status = response.status();
    if !status.is_success() {
        return Err(BiosourceError::Http {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }
    response
        .bytes()
        .map_err(|err| BiosourceError::Network(err.to_string()))
}

/// Stub used when the crate is built without the `network` feature
#[cfg(not(feature = "network"))]
pub fn fetch_bytes(url: &str) -> Result<Bytes> {
    Err(crate::error::BiosourceError::Network(format!(
        "built without the `network` feature, cannot fetch {url}"
    )))
}

/// Open a buffered reader over a location's raw bytes
///
/// Local paths go through [`open_local_reader`]; remote URLs are fetched
/// whole and served from memory.
pub(crate) fn open_reader(location: &str) -> Result<Box<dyn BufRead + Send>> {
    match Source::classify(location) {
        Source::Local(path) => open_local_reader(&path),
        Source::Remote(url) => Ok(Box::new(Cursor::new(fetch_bytes(&url)?))),
    }
}

/// Open a local file, memory-mapping it past [`MMAP_THRESHOLD`]
pub(crate) fn open_local_reader(path: &Path) -> Result<Box<dyn BufRead + Send>> {
    let metadata = std::fs::metadata(path)?;
    if metadata.len() >= MMAP_THRESHOLD {
        let file = File::open(path)?;
        // Safety: the map is read-only and dropped with the reader.
        let mmap = unsafe { Mmap::map(&file)? };
        Ok(Box::new(Cursor::new(mmap)))
    } else {
        Ok(Box::new(BufReader::new(File::open(path)?)))
    }
}

/// Read + Seek object currency for archive readers
pub(crate) trait ReadSeek: Read + Seek + Send {}

impl<T: Read + Seek + Send> ReadSeek for T {}

/// Open a seekable reader over a location's raw bytes
///
/// Archives need random access, so the remote side is a cursor over the
/// fully fetched resource and the local side is the file itself.
pub(crate) fn open_seekable(location: &str) -> Result<Box<dyn ReadSeek>> {
    match Source::classify(location) {
        Source::Local(path) => Ok(Box::new(File::open(path)?)),
        Source::Remote(url) => Ok(Box::new(Cursor::new(fetch_bytes(&url)?))),
    }
}
