//! Single compressed file opener and the decompression primitives

use std::io::{BufReader, Read};

use bzip2::read::BzDecoder;
use flate2::read::GzDecoder;
use xz2::read::XzDecoder;

use crate::error::{BiosourceError, Result};
use crate::handle::ContentHandle;
use crate::openers::{accept_or_skip, HandleIter, OpenContext, Opener};
use crate::source::open_reader;

/// Stream transform produced by [`decoder_for`]
pub(crate) type DecoderFn = fn(Box<dyn Read + Send>) -> Box<dyn Read + Send>;

/// Map a transfer encoding to its decompression primitive
///
/// Exactly three encodings have primitives: `gzip`, `bzip2`, and `xz`.
/// Anything else the registry can infer (`compress`, `br`) is recognized
/// but not openable and errors with
/// [`BiosourceError::UnsupportedEncoding`]. Selection happens before any
/// byte of the source is read.
pub(crate) fn decoder_for(encoding: &str) -> Result<DecoderFn> {
    match encoding {
        "gzip" => Ok(|reader| Box::new(GzDecoder::new(reader))),
        "bzip2" => Ok(|reader| Box::new(BzDecoder::new(reader))),
        "xz" => Ok(|reader| Box::new(XzDecoder::new(reader))),
        other => Err(BiosourceError::UnsupportedEncoding(other.to_string())),
    }
}

fn has_decoder(encoding: &str) -> bool {
    matches!(encoding, "gzip" | "bzip2" | "xz")
}

/// Opener for a single compressed file
///
/// The inferred *encoding* selects this opener and the decompression
/// primitive; the inferred *mimetype* (from the outer name, independent of
/// the encoding axis) gates whether the decompressed stream is yielded at
/// all. A rejected mimetype yields nothing, as a designed skip rather
/// than an error, though the decoder is still constructed.
pub struct CompressedFile;

impl Opener for CompressedFile {
    fn name(&self) -> &'static str {
        "CompressedFile"
    }

    fn test(&self, location: &str, ctx: &OpenContext<'_>) -> bool {
        ctx.types
            .guess(location)
            .encoding
            .as_deref()
            .is_some_and(has_decoder)
    }

    fn open(&self, location: &str, ctx: &OpenContext<'_>) -> Result<HandleIter> {
        let guess = ctx.types.guess(location);
        let encoding = guess
            .encoding
            .ok_or_else(|| BiosourceError::UnsupportedEncoding("(none inferred)".to_string()))?;
        let decode = decoder_for(&encoding)?;

        let decoded = decode(Box::new(open_reader(location)?));
        if !accept_or_skip(ctx.accepted, location, guess.mimetype.as_deref()) {
            return Ok(Box::new(std::iter::empty()));
        }
        let handle = ContentHandle::new(location.to_string(), Box::new(BufReader::new(decoded)));
        Ok(Box::new(std::iter::once(Ok(handle))))
    }
}
