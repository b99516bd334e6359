//! Opener strategies: recognize a location shape, produce its streams
//!
//! Each opener is a stateless strategy with two operations: a cheap,
//! side-effect-free [`test`] that decides whether the opener handles a
//! location, and an [`open`] that lazily produces one [`ContentHandle`]
//! per matching entry. The accepted-mimetype set and the media type
//! registry arrive through [`OpenContext`] at call time.
//!
//! The default registration order is fixed and is the tie-break when
//! several `test` predicates would match (a compressed tar archive, for
//! instance, carries both a tar mimetype and a gzip encoding):
//!
//! 1. [`Directory`]
//! 2. [`ZipArchive`]
//! 3. [`TarArchive`]
//! 4. [`CompressedFile`]
//! 5. [`UntypedFile`]
//! 6. [`TextFile`]
//!
//! [`test`]: Opener::test
//! [`open`]: Opener::open

mod compressed;
mod directory;
mod single;
mod tar;
mod zip;

pub use self::compressed::CompressedFile;
pub use self::directory::Directory;
pub use self::single::{TextFile, UntypedFile};
pub use self::tar::TarArchive;
pub use self::zip::ZipArchive;

use std::sync::Arc;

use tracing::debug;

use crate::error::Result;
use crate::handle::ContentHandle;
use crate::mediatype::MediaTypes;

/// Lazy sequence of content handles produced by one opener
pub type HandleIter = Box<dyn Iterator<Item = Result<ContentHandle>> + Send>;

/// Per-call context handed to every opener operation
///
/// Carries the media type registry (already merged with the call's
/// registrations) and the accepted mimetype set derived from them.
#[derive(Debug, Clone, Copy)]
pub struct OpenContext<'a> {
    /// Registry consulted for every name-based inference
    pub types: &'a MediaTypes,
    /// Mimetypes whose content the caller wants
    pub accepted: &'a [String],
}

impl OpenContext<'_> {
    /// Membership test against the accepted set; an absent mimetype is
    /// never accepted.
    pub fn accepts(&self, mimetype: Option<&str>) -> bool {
        mimetype.is_some_and(|m| self.accepted.iter().any(|a| a == m))
    }
}

/// Accept/skip decision with its diagnostic side effect
///
/// Every decision is reported; none of the reporting affects control flow.
pub(crate) fn accept_or_skip(accepted: &[String], source: &str, mimetype: Option<&str>) -> bool {
    let keep = mimetype.is_some_and(|m| accepted.iter().any(|a| a == m));
    if keep {
        debug!(file = source, "processing file");
    } else {
        debug!(file = source, "skipping file");
    }
    keep
}

/// A strategy that recognizes applicable locations and produces content
/// streams from them
pub trait Opener: Send + Sync {
    /// Strategy name used in diagnostics
    fn name(&self) -> &'static str;

    /// Cheap predicate: does this opener handle the location?
    ///
    /// Must not open the resource; classification uses only the location
    /// string and the registry in `ctx`.
    fn test(&self, location: &str, ctx: &OpenContext<'_>) -> bool;

    /// Produce the lazy handle sequence for the location
    ///
    /// Single consumption: re-invoking runs the traversal again from
    /// scratch. Calling `open` without a positive [`test`] is allowed but
    /// may error where `test` would simply have declined.
    ///
    /// [`test`]: Opener::test
    fn open(&self, location: &str, ctx: &OpenContext<'_>) -> Result<HandleIter>;
}

/// The default opener list in its fixed registration order
pub fn default_openers() -> Vec<Arc<dyn Opener>> {
    vec![
        Arc::new(Directory),
        Arc::new(ZipArchive),
        Arc::new(TarArchive),
        Arc::new(CompressedFile),
        Arc::new(UntypedFile),
        Arc::new(TextFile),
    ]
}
