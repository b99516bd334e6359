//! biosource: uniform readable-content resolution for packaged text data
//!
//! # Overview
//!
//! biosource reads text content regardless of how it is packaged: a single
//! file, a directory tree, a compressed file, a zip or tar archive
//! (optionally compressed), or a remote URL pointing at any of the above.
//! Callers ask for "the readable contents matching these types at this
//! location" and get one independent stream per matching member, without
//! branching on the storage shape.
//!
//! Resolution is an ordered list of opener strategies. Each strategy can
//! cheaply test whether it handles a location and lazily produce the
//! content streams from it; the first positive test wins and later
//! strategies are never consulted. Content-type filtering is driven by a
//! name-based media type registry that callers extend per call.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::io::BufRead;
//! use biosource::open_location;
//!
//! # fn main() -> biosource::Result<()> {
//! // One handle per .cif member, whether the location turns out to be a
//! // file, a directory, an archive, or a URL.
//! for handle in open_location("archive.zip", &[("cif", "text/cif")]) {
//!     let mut handle = handle?;
//!     let mut first_line = String::new();
//!     handle.read_line(&mut first_line)?;
//!     println!("{}: {}", handle.source(), first_line.trim_end());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Resource Model
//!
//! Production is pull-based: nothing is opened, walked, fetched, or
//! decompressed until the consumer asks for the next handle. Every yielded
//! [`ContentHandle`] is exclusively owned by the consumer and closes on
//! drop, so abandoning iteration early (including via a consumer error
//! mid-loop) releases every open resource. Remote resources are retrieved
//! whole and synchronously before any stream is produced; fetches are
//! never cached, ranged, or retried.
//!
//! Skip/include decisions and strategy selection are reported as
//! [`tracing`] debug events and never affect control flow.
//!
//! # Module Organization
//!
//! - [`mediatype`]: extension-to-mimetype registry and name inference
//! - [`source`]: local/remote location classification and raw byte access
//! - [`openers`]: the strategy family (directory, zip, tar, compressed,
//!   extensionless, plain text)
//! - [`resolver`]: ordered dispatch and the lazy handle iterator
//! - [`handle`]: the per-entry readable handle
//! - [`error`]: error surface

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod handle;
pub mod mediatype;
pub mod openers;
pub mod resolver;
pub mod source;

// Re-export commonly used types
pub use error::{BiosourceError, Result};
pub use handle::ContentHandle;
pub use mediatype::{MediaTypes, TypeGuess};
pub use resolver::{open_location, Handles, Resolver};
pub use source::{is_remote_url, Source};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
