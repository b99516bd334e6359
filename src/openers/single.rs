//! Single-file openers: extensionless and plain text

use tracing::debug;

use crate::error::Result;
use crate::handle::ContentHandle;
use crate::openers::{accept_or_skip, HandleIter, OpenContext, Opener};
use crate::source::open_reader;

/// Opener for files whose name carries no recognizable suffix
///
/// Selected when inference yields neither a mimetype nor an encoding.
/// With nothing inferred there is nothing to filter on, so the raw
/// content is yielded unconditionally.
pub struct UntypedFile;

impl Opener for UntypedFile {
    fn name(&self) -> &'static str {
        "UntypedFile"
    }

    fn test(&self, location: &str, ctx: &OpenContext<'_>) -> bool {
        let guess = ctx.types.guess(location);
        guess.mimetype.is_none() && guess.encoding.is_none()
    }

    fn open(&self, location: &str, _ctx: &OpenContext<'_>) -> Result<HandleIter> {
        debug!(file = location, "processing file");
        let handle = ContentHandle::new(location.to_string(), open_reader(location)?);
        Ok(Box::new(std::iter::once(Ok(handle))))
    }
}

/// Opener for single text files
///
/// Selected when the inferred mimetype's top-level category is `text`;
/// yields the content iff that mimetype is in the accepted set.
pub struct TextFile;

impl Opener for TextFile {
    fn name(&self) -> &'static str {
        "TextFile"
    }

    fn test(&self, location: &str, ctx: &OpenContext<'_>) -> bool {
        ctx.types
            .guess(location)
            .mimetype
            .as_deref()
            .is_some_and(|mimetype| mimetype.starts_with("text/"))
    }

    fn open(&self, location: &str, ctx: &OpenContext<'_>) -> Result<HandleIter> {
        let guess = ctx.types.guess(location);
        if !accept_or_skip(ctx.accepted, location, guess.mimetype.as_deref()) {
            return Ok(Box::new(std::iter::empty()));
        }
        let handle = ContentHandle::new(location.to_string(), open_reader(location)?);
        Ok(Box::new(std::iter::once(Ok(handle))))
    }
}
