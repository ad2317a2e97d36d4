//! Error types for the topic trie.

/// Errors produced while looking up a topic segment.
///
/// There is no `InvalidInput` variant: the validator (see
/// [`crate::validate`]) only ever returns a plain `bool`, and insertion
/// never re-validates, so there is nothing for this type to carry for that
/// case. There is no out-of-memory variant either: Rust's global allocator
/// aborts the process on allocation failure rather than returning an
/// error, so there is no recoverable path to model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// `Trie::get` walked off the end of the tree: some segment of the
    /// path has no matching child.
    #[error("topic segment not found")]
    NotFound,
}
