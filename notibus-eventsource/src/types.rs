//! Core types for the notibus-eventsource crate.

use notibus_session::StreamName;

/// Outcome of a join-topic request.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum JoinStatus {
    /// At least one stream received a registration for the topic
    Up,
    /// Nothing matched or nothing could be registered
    Down,
}

/// Ordered mapping from namespace prefix to the stream that owns it.
///
/// Resolution is first-match-wins by string prefix: the first entry whose
/// prefix is a prefix of a notification type's namespace names the owning
/// stream. Entry order is exactly the order supplied at construction, so
/// callers control precedence when prefixes overlap (put the more specific
/// prefix first). Read-only after construction.
#[derive(Debug, Clone)]
pub struct NamespacePrefixMap {
    entries: Vec<(String, StreamName)>,
}

impl NamespacePrefixMap {
    /// Build a prefix map from ordered (prefix, stream) entries.
    pub fn new<I, P, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (P, S)>,
        P: Into<String>,
        S: Into<StreamName>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(prefix, stream)| (prefix.into(), stream.into()))
                .collect(),
        }
    }

    /// Resolve the stream owning the given namespace, first match wins.
    pub fn resolve(&self, namespace: &str) -> Option<&StreamName> {
        self.entries
            .iter()
            .find(|(prefix, _)| namespace.starts_with(prefix.as_str()))
            .map(|(_, stream)| stream)
    }

    /// Iterate the mapped stream names in entry order.
    ///
    /// Several prefixes may map to the same stream, so names can repeat.
    pub fn stream_names(&self) -> impl Iterator<Item = &StreamName> {
        self.entries.iter().map(|(_, stream)| stream)
    }

    /// Number of prefix entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
