//! Name-based media type inference
//!
//! Classification is suffix-based and never touches the resource itself:
//! a name maps to an optional mimetype and an optional transfer encoding,
//! two independent axes. The encoding decides *how* a compressed source is
//! opened; the mimetype decides *whether* its content is wanted.
//!
//! # Example
//!
//! ```
//! use biosource::MediaTypes;
//!
//! let mut types = MediaTypes::new();
//! types.register("cif", "text/cif");
//!
//! let guess = types.guess("2rpv.cif.gz");
//! assert_eq!(guess.mimetype.as_deref(), Some("text/cif"));
//! assert_eq!(guess.encoding.as_deref(), Some("gzip"));
//! ```

use std::collections::HashMap;

/// Mimetype that selects the zip archive opener
pub const ZIP_MIMETYPE: &str = "application/zip";

/// Mimetype that selects the tar archive opener
pub const TAR_MIMETYPE: &str = "application/x-tar";

/// Result of a name lookup: both axes are optional and independent
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeGuess {
    /// Content classification, e.g. `text/cif` for `2rpv.cif.gz`
    pub mimetype: Option<String>,
    /// Transfer/compression classification, e.g. `gzip` for `2rpv.cif.gz`
    pub encoding: Option<String>,
}

/// Extension-to-mimetype registry consulted by every opener
///
/// The registry is owned state, not a process-wide table: each [`Resolver`]
/// carries its own clone, so concurrent resolvers with different
/// registrations never observe each other. Entries are additive and
/// re-registering an extension overwrites its mimetype; there is no removal.
///
/// [`Resolver`]: crate::Resolver
#[derive(Debug, Clone)]
pub struct MediaTypes {
    types: HashMap<String, String>,
    encodings: HashMap<String, String>,
    aliases: HashMap<String, String>,
}

impl MediaTypes {
    /// Create a registry seeded with the built-in extension tables
    pub fn new() -> Self {
        let mut types = HashMap::new();
        for (extension, mimetype) in [
            ("txt", "text/plain"),
            ("text", "text/plain"),
            ("csv", "text/csv"),
            ("tsv", "text/tab-separated-values"),
            ("html", "text/html"),
            ("htm", "text/html"),
            ("xml", "text/xml"),
            ("json", "application/json"),
            ("pdf", "application/pdf"),
            ("zip", ZIP_MIMETYPE),
            ("tar", TAR_MIMETYPE),
            ("gtar", TAR_MIMETYPE),
        ] {
            types.insert(extension.to_string(), mimetype.to_string());
        }

        // Transfer encodings stripped before the mimetype lookup. The
        // `compress` and `br` entries are recognized here but have no
        // decompression primitive.
        let mut encodings = HashMap::new();
        for (extension, encoding) in [
            ("gz", "gzip"),
            ("bz2", "bzip2"),
            ("xz", "xz"),
            ("z", "compress"),
            ("br", "br"),
        ] {
            encodings.insert(extension.to_string(), encoding.to_string());
        }

        let mut aliases = HashMap::new();
        for (alias, expansion) in [
            ("tgz", "tar.gz"),
            ("taz", "tar.gz"),
            ("tbz2", "tar.bz2"),
            ("txz", "tar.xz"),
        ] {
            aliases.insert(alias.to_string(), expansion.to_string());
        }

        Self {
            types,
            encodings,
            aliases,
        }
    }

    /// Register a mimetype for an extension (with or without leading dot)
    ///
    /// Re-registering the same extension overwrites the previous mimetype;
    /// registering the same pair twice is a no-op.
    pub fn register(&mut self, extension: &str, mimetype: &str) {
        let extension = extension.trim_start_matches('.').to_ascii_lowercase();
        self.types.insert(extension, mimetype.to_string());
    }

    /// Infer `(mimetype, encoding)` from a file name, path, or URL
    ///
    /// The lookup is case-insensitive, uses only the final path segment,
    /// ignores URL query/fragment suffixes, expands multi-suffix aliases
    /// (`.tgz` is `.tar.gz`), and strips stacked encoding suffixes before
    /// mapping the remaining extension. Names with no recognizable suffix
    /// produce a guess with both axes `None`.
    pub fn guess(&self, name: &str) -> TypeGuess {
        let name = name.rsplit(['/', '\\']).next().unwrap_or(name);
        let name = name.split(['?', '#']).next().unwrap_or(name);
        let mut name = name.to_ascii_lowercase();

        for (alias, expansion) in &self.aliases {
            let suffix = format!(".{alias}");
            if name.len() > suffix.len() && name.ends_with(&suffix) {
                name.truncate(name.len() - alias.len());
                name.push_str(expansion);
                break;
            }
        }

        let mut encoding = None;
        while let Some(idx) = name.rfind('.') {
            if idx == 0 {
                break;
            }
            match self.encodings.get(&name[idx + 1..]) {
                Some(found) => {
                    encoding = Some(found.clone());
                    name.truncate(idx);
                }
                None => break,
            }
        }

        let mimetype = match name.rfind('.') {
            Some(idx) if idx > 0 => self.types.get(&name[idx + 1..]).cloned(),
            _ => None,
        };

        TypeGuess { mimetype, encoding }
    }
}

impl Default for MediaTypes {
    fn default() -> Self {
        Self::new()
    }
}
