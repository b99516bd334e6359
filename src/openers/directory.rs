//! Directory opener: recursive walk with per-file filtering

use std::path::Path;

use walkdir::WalkDir;

use crate::error::{BiosourceError, Result};
use crate::handle::ContentHandle;
use crate::openers::{accept_or_skip, HandleIter, OpenContext, Opener};
use crate::source::open_local_reader;

/// Opener for local directory trees
///
/// Walks every file under the directory in the filesystem's listing order
/// (deterministic per traversal, not guaranteed alphabetical), infers each
/// file's type from its name, and yields a lazily opened stream per
/// accepted file. Files are opened only when their turn comes up, never
/// ahead of demand.
pub struct Directory;

impl Opener for Directory {
    fn name(&self) -> &'static str {
        "Directory"
    }

    fn test(&self, location: &str, _ctx: &OpenContext<'_>) -> bool {
        Path::new(location).is_dir()
    }

    fn open(&self, location: &str, ctx: &OpenContext<'_>) -> Result<HandleIter> {
        let types = ctx.types.clone();
        let accepted = ctx.accepted.to_vec();
        let walker = WalkDir::new(location).into_iter();

        Ok(Box::new(walker.filter_map(move |entry| {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => return Some(Err(BiosourceError::Io(err.into()))),
            };
            if !entry.file_type().is_file() {
                return None;
            }
            let name = entry.file_name().to_string_lossy();
            let guess = types.guess(&name);
            let display = entry.path().display().to_string();
            if !accept_or_skip(&accepted, &display, guess.mimetype.as_deref()) {
                return None;
            }
            match open_local_reader(entry.path()) {
                Ok(reader) => Some(Ok(ContentHandle::new(display, reader))),
                Err(err) => Some(Err(err)),
            }
        })))
    }
}
