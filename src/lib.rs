//! An in-memory hierarchical topic index for publish/subscribe systems.
//!
//! Topics are `/`-delimited strings, optionally containing the MQTT-style
//! wildcards `+` (one level) and `#` (zero or more trailing levels). The
//! index supports insertion with caller-owned payloads, removal that
//! collapses empty interior segments, full traversal, and — the
//! distinguishing feature — *symmetric* pattern-vs-pattern match iteration:
//! both the query and the stored topics may contain wildcards, and a stored
//! `+/c` matches a query `b/c` just as a stored `b/c` matches a query
//! `+/c`.
//!
//! # Example
//!
//! ```rust
//! use topic_trie::Trie;
//!
//! let mut trie = Trie::<&str>::new();
//!
//! let sensor = trie.get_or_insert("home/kitchen/temperature");
//! trie.set_payload(sensor, "handler1");
//!
//! let wildcard = trie.get_or_insert("home/+/temperature");
//! trie.set_payload(wildcard, "handler2");
//!
//! let mut hits = Vec::new();
//! trie.matching_iter("home/kitchen/temperature", |topic, _| {
//!     hits.push(topic.to_string());
//! });
//! hits.sort();
//! assert_eq!(hits, ["home/+/temperature", "home/kitchen/temperature"]);
//! ```

mod error;
mod matcher;
mod trie;
mod validate;

pub use error::Error;
pub use trie::{SegmentId, Trie};
pub use validate::validate;

#[cfg(test)]
mod tests;
