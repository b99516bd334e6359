//! Opener registry and dispatch
//!
//! The resolver owns the ordered opener list, the media type registry, and
//! the accepted-mimetype set. Dispatch is demand-driven: constructing the
//! [`Handles`] iterator does nothing, the first pull tests the strategies
//! in registration order, and the first positive test wins outright: its
//! sequence is relayed to exhaustion and no later strategy is ever
//! consulted, even when the winner yields nothing.

use std::sync::Arc;

use tracing::debug;

use crate::error::Result;
use crate::handle::ContentHandle;
use crate::mediatype::MediaTypes;
use crate::openers::{default_openers, HandleIter, OpenContext, Opener};

/// Resolves locations to sequences of readable content handles
///
/// # Example
///
/// ```no_run
/// use biosource::Resolver;
///
/// # fn main() -> biosource::Result<()> {
/// let mut resolver = Resolver::new();
/// resolver
///     .register_type("cif", "text/cif")
///     .register_type("str", "text/nmrstar");
///
/// for handle in resolver.open("structures/") {
///     let handle = handle?;
///     println!("{}", handle.source());
/// }
/// # Ok(())
/// # }
/// ```
pub struct Resolver {
    types: MediaTypes,
    accepted: Vec<String>,
    openers: Vec<Arc<dyn Opener>>,
}

impl Resolver {
    /// Resolver with the default opener order and built-in media types
    pub fn new() -> Self {
        Self::with_openers(default_openers())
    }

    /// Resolver with a caller-supplied opener list
    ///
    /// The list order is the dispatch order; the first opener whose test
    /// succeeds handles the whole call.
    pub fn with_openers(openers: Vec<Arc<dyn Opener>>) -> Self {
        Self {
            types: MediaTypes::new(),
            accepted: Vec::new(),
            openers,
        }
    }

    /// Register an extension-to-mimetype mapping and accept that mimetype
    ///
    /// Registration feeds both sides of filtering: name inference will map
    /// the extension to the mimetype, and content carrying the mimetype
    /// passes the accept/skip filter. Registrations persist for the
    /// resolver's lifetime and happen strictly before any strategy test
    /// runs. Registering the same pair twice is a no-op; a new mimetype
    /// for a known extension overwrites the inference side and widens the
    /// accepted set.
    pub fn register_type(&mut self, extension: &str, mimetype: &str) -> &mut Self {
        self.types.register(extension, mimetype);
        if !self.accepted.iter().any(|m| m == mimetype) {
            self.accepted.push(mimetype.to_string());
        }
        self
    }

    /// The registry this resolver consults for name inference
    pub fn media_types(&self) -> &MediaTypes {
        &self.types
    }

    /// Lazily open every accepted content stream at a location
    ///
    /// Returns immediately; strategy selection and all I/O happen on the
    /// first pull of the returned iterator. A location no strategy accepts
    /// produces an empty sequence, not an error.
    pub fn open(&self, location: &str) -> Handles {
        Handles {
            location: location.to_string(),
            types: self.types.clone(),
            accepted: self.accepted.clone(),
            openers: self.openers.clone(),
            state: State::Pending,
        }
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new()
    }
}

/// One-shot convenience around [`Resolver`]
///
/// Registers each `(extension, mimetype)` pair and opens the location,
/// mirroring the common call shape:
///
/// ```no_run
/// # fn main() -> biosource::Result<()> {
/// for handle in biosource::open_location("archive.zip", &[("cif", "text/cif")]) {
///     let handle = handle?;
///     println!("{}", handle.source());
/// }
/// # Ok(())
/// # }
/// ```
pub fn open_location(location: &str, types: &[(&str, &str)]) -> Handles {
    let mut resolver = Resolver::new();
    for (extension, mimetype) in types {
        resolver.register_type(extension, mimetype);
    }
    resolver.open(location)
}

enum State {
    Pending,
    Relaying(HandleIter),
    Finished,
}

/// Lazy sequence of content handles for one dispatched location
///
/// Yields `Result<ContentHandle>`; an `Err` item aborts the traversal and
/// the iterator is exhausted afterwards. Dropping the iterator early
/// releases whatever the selected opener still holds; handles already
/// yielded belong to the consumer and close when dropped.
pub struct Handles {
    location: String,
    types: MediaTypes,
    accepted: Vec<String>,
    openers: Vec<Arc<dyn Opener>>,
    state: State,
}

impl Iterator for Handles {
    type Item = Result<ContentHandle>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match &mut self.state {
                State::Pending => {
                    let ctx = OpenContext {
                        types: &self.types,
                        accepted: &self.accepted,
                    };
                    let selected = self
                        .openers
                        .iter()
                        .find(|opener| opener.test(&self.location, &ctx));
                    let Some(opener) = selected else {
                        debug!(location = %self.location, "no opener accepts location");
                        self.state = State::Finished;
                        return None;
                    };
                    debug!(location = %self.location, opener = opener.name(), "opener selected");
                    match opener.open(&self.location, &ctx) {
                        Ok(handles) => self.state = State::Relaying(handles),
                        Err(err) => {
                            self.state = State::Finished;
                            return Some(Err(err));
                        }
                    }
                }
                State::Relaying(handles) => match handles.next() {
                    Some(Ok(handle)) => return Some(Ok(handle)),
                    Some(Err(err)) => {
                        self.state = State::Finished;
                        return Some(Err(err));
                    }
                    None => {
                        self.state = State::Finished;
                        return None;
                    }
                },
                State::Finished => return None,
            }
        }
    }
}

impl std::iter::FusedIterator for Handles {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::openers::HandleIter;

    struct Recording {
        name: &'static str,
        matches: bool,
    }

    impl Opener for Recording {
        fn name(&self) -> &'static str {
            self.name
        }

        fn test(&self, _location: &str, _ctx: &OpenContext<'_>) -> bool {
            self.matches
        }

        fn open(&self, location: &str, _ctx: &OpenContext<'_>) -> Result<HandleIter> {
            let handle = ContentHandle::new(
                format!("{}:{}", self.name, location),
                Box::new(std::io::Cursor::new(Vec::new())),
            );
            Ok(Box::new(std::iter::once(Ok(handle))))
        }
    }

    #[test]
    fn first_matching_opener_wins() {
        let resolver = Resolver::with_openers(vec![
            Arc::new(Recording {
                name: "first",
                matches: false,
            }),
            Arc::new(Recording {
                name: "second",
                matches: true,
            }),
            Arc::new(Recording {
                name: "third",
                matches: true,
            }),
        ]);
        let sources: Vec<String> = resolver
            .open("anything")
            .map(|handle| handle.unwrap().source().to_string())
            .collect();
        assert_eq!(sources, vec!["second:anything"]);
    }

    #[test]
    fn no_match_is_empty_not_an_error() {
        let resolver = Resolver::with_openers(vec![Arc::new(Recording {
            name: "never",
            matches: false,
        })]);
        assert_eq!(resolver.open("anything").count(), 0);
    }

    #[test]
    fn empty_winner_does_not_fall_through() {
        struct EmptyWinner;
        impl Opener for EmptyWinner {
            fn name(&self) -> &'static str {
                "empty"
            }
            fn test(&self, _location: &str, _ctx: &OpenContext<'_>) -> bool {
                true
            }
            fn open(&self, _location: &str, _ctx: &OpenContext<'_>) -> Result<HandleIter> {
                Ok(Box::new(std::iter::empty()))
            }
        }
        let resolver = Resolver::with_openers(vec![
            Arc::new(EmptyWinner),
            Arc::new(Recording {
                name: "shadowed",
                matches: true,
            }),
        ]);
        assert_eq!(resolver.open("anything").count(), 0);
    }
}
