//! Readable handle bound to one logical entry

use std::fmt;
use std::io::{BufRead, Read};

/// One readable unit of content, bound to exactly one file-like entry
///
/// A handle is yielded at most once and owned exclusively by the consumer;
/// dropping it closes the underlying reader. The producing iterator never
/// retains yielded handles, so abandoning iteration early releases every
/// resource that was opened.
///
/// # Example
///
/// ```no_run
/// use std::io::BufRead;
/// use biosource::open_location;
///
/// # fn main() -> biosource::Result<()> {
/// for handle in open_location("2rpv.cif", &[("cif", "text/cif")]) {
///     let mut handle = handle?;
///     let mut first_line = String::new();
///     handle.read_line(&mut first_line)?;
///     println!("{}: {}", handle.source(), first_line.trim_end());
/// }
/// # Ok(())
/// # }
/// ```
pub struct ContentHandle {
    source: String,
    reader: Box<dyn BufRead + Send>,
}

impl ContentHandle {
    pub(crate) fn new(source: String, reader: Box<dyn BufRead + Send>) -> Self {
        Self { source, reader }
    }

    /// Display name of the entry this handle reads from
    ///
    /// A path for local files, a URL for remote ones, and
    /// `archive/member` for archive entries.
    pub fn source(&self) -> &str {
        &self.source
    }
}

impl Read for ContentHandle {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.reader.read(buf)
    }
}

impl BufRead for ContentHandle {
    fn fill_buf(&mut self) -> std::io::Result<&[u8]> {
        self.reader.fill_buf()
    }

    fn consume(&mut self, amt: usize) {
        self.reader.consume(amt)
    }
}

impl fmt::Debug for ContentHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentHandle")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}
