//! Zip archive opener

use std::io::{Cursor, Read};

use crate::error::Result;
use crate::handle::ContentHandle;
use crate::mediatype::{MediaTypes, ZIP_MIMETYPE};
use crate::openers::{accept_or_skip, HandleIter, OpenContext, Opener};
use crate::source::{open_seekable, ReadSeek};

/// Opener for zip archives, local or remote
///
/// Remote archives are fetched whole into memory before the archive reader
/// sees them; local archives are read in place. Entries come out in
/// archive order. An entry is a directory iff its name ends with `/`,
/// zip's name convention, deliberately distinct from tar's type flag.
pub struct ZipArchive;

impl Opener for ZipArchive {
    fn name(&self) -> &'static str {
        "ZipArchive"
    }

    fn test(&self, location: &str, ctx: &OpenContext<'_>) -> bool {
        ctx.types.guess(location).mimetype.as_deref() == Some(ZIP_MIMETYPE)
    }

    fn open(&self, location: &str, ctx: &OpenContext<'_>) -> Result<HandleIter> {
        let archive = zip::ZipArchive::new(open_seekable(location)?)?;
        Ok(Box::new(ZipEntries {
            archive,
            index: 0,
            location: location.to_string(),
            types: ctx.types.clone(),
            accepted: ctx.accepted.to_vec(),
        }))
    }
}

/// Lazy walk over one zip archive's entries
///
/// Each accepted entry is decompressed on demand in a single pull and
/// yielded as an in-memory handle; nothing past the current entry is read.
struct ZipEntries {
    archive: zip::ZipArchive<Box<dyn ReadSeek>>,
    index: usize,
    location: String,
    types: MediaTypes,
    accepted: Vec<String>,
}

impl Iterator for ZipEntries {
    type Item = Result<ContentHandle>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.index < self.archive.len() {
            let index = self.index;
            self.index += 1;

            let mut entry = match self.archive.by_index(index) {
                Ok(entry) => entry,
                Err(err) => return Some(Err(err.into())),
            };
            let name = entry.name().to_string();
            if name.ends_with('/') {
                continue;
            }
            let guess = self.types.guess(&name);
            let display = format!("{}/{}", self.location, name);
            if !accept_or_skip(&self.accepted, &display, guess.mimetype.as_deref()) {
                continue;
            }

            let mut content = Vec::with_capacity(entry.size() as usize);
            if let Err(err) = entry.read_to_end(&mut content) {
                return Some(Err(err.into()));
            }
            return Some(Ok(ContentHandle::new(
                display,
                Box::new(Cursor::new(content)),
            )));
        }
        None
    }
}
