//! Tar archive opener

use std::io::{Cursor, Read};

use crate::error::{BiosourceError, Result};
use crate::handle::ContentHandle;
use crate::mediatype::TAR_MIMETYPE;
use crate::openers::compressed::decoder_for;
use crate::openers::{accept_or_skip, HandleIter, OpenContext, Opener};
use crate::source::open_reader;

/// Opener for tar archives, plain or compressed, local or remote
///
/// The location's inferred encoding (gzip, bzip2, or xz, from names like
/// `archive.tar.gz`) selects a decompression wrapper over the raw bytes
/// before the tar reader sees them. An entry is a file iff the tar header
/// says so: the format's own type flag, not a name convention.
///
/// Tar permits only one sequential pass and its entry readers borrow the
/// archive, so `open` runs the pass up front and buffers the accepted
/// entries in memory; the dispatcher still defers the call until the
/// consumer's first pull.
pub struct TarArchive;

impl Opener for TarArchive {
    fn name(&self) -> &'static str {
        "TarArchive"
    }

    fn test(&self, location: &str, ctx: &OpenContext<'_>) -> bool {
        ctx.types.guess(location).mimetype.as_deref() == Some(TAR_MIMETYPE)
    }

    fn open(&self, location: &str, ctx: &OpenContext<'_>) -> Result<HandleIter> {
        let guess = ctx.types.guess(location);
        let decode = guess
            .encoding
            .as_deref()
            .map(decoder_for)
            .transpose()?;
        let raw: Box<dyn Read + Send> = Box::new(open_reader(location)?);
        let reader = match decode {
            Some(decode) => decode(raw),
            None => raw,
        };

        let mut archive = tar::Archive::new(reader);
        let mut accepted_entries = Vec::new();
        let entries = archive.entries().map_err(malformed)?;
        for entry in entries {
            let mut entry = entry.map_err(malformed)?;
            if !entry.header().entry_type().is_file() {
                continue;
            }
            let name = String::from_utf8_lossy(&entry.path_bytes()).into_owned();
            let entry_guess = ctx.types.guess(&name);
            let display = format!("{location}/{name}");
            if !accept_or_skip(ctx.accepted, &display, entry_guess.mimetype.as_deref()) {
                continue;
            }
            let mut content = Vec::with_capacity(entry.size() as usize);
            entry.read_to_end(&mut content)?;
            accepted_entries.push((display, content));
        }

        Ok(Box::new(accepted_entries.into_iter().map(
            |(display, content)| {
                Ok(ContentHandle::new(display, Box::new(Cursor::new(content))))
            },
        )))
    }
}

fn malformed(err: std::io::Error) -> BiosourceError {
    BiosourceError::MalformedArchive {
        kind: "tar",
        msg: err.to_string(),
    }
}
