//! The trie itself: segment storage, insertion, lookup, and removal.
//!
//! Segments live in a flat arena (`Vec<Option<Node<T>>>`) addressed by
//! [`SegmentId`] rather than linked through `Rc`/`RefCell`, so that removal
//! can walk parent back-references without fighting the borrow checker.
//! Freed slots are recycled through a free list, the same shape as a
//! generic slab allocator.

use std::collections::BTreeMap;

use crate::error::Error;

/// Opaque handle to a segment in a [`Trie`].
///
/// Handles are only ever valid for the `Trie` that produced them; using one
/// with a different trie (or after the segment has been removed) is a
/// logic error. Nothing in the public API makes that unsafe — stale
/// handles simply won't resolve to useful data — but callers should treat
/// them as scoped to their originating trie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SegmentId(pub(crate) usize);

/// Index of the sentinel root within the arena. The root is created once
/// in [`Trie::new`] and is never freed or recycled.
const ROOT: usize = 0;

struct Node<T> {
    /// `None` only for the sentinel root.
    label: Option<String>,
    /// `None` only for the sentinel root.
    parent: Option<usize>,
    /// Ordered by label so traversal order is deterministic and stable
    /// across runs on the same tree.
    children: BTreeMap<String, usize>,
    payload: Option<T>,
}

impl<T> Node<T> {
    fn retained(&self) -> bool {
        self.payload.is_some() || !self.children.is_empty()
    }
}

/// A rooted trie of `/`-delimited topic segments with MQTT-style wildcard
/// matching. See the crate root documentation for the full semantics.
pub struct Trie<T> {
    nodes: Vec<Option<Node<T>>>,
    free: Vec<usize>,
}

impl<T> Default for Trie<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Trie<T> {
    /// Creates a new trie containing only the sentinel root.
    pub fn new() -> Self {
        let root = Node {
            label: None,
            parent: None,
            children: BTreeMap::new(),
            payload: None,
        };
        Trie {
            nodes: vec![Some(root)],
            free: Vec::new(),
        }
    }

    /// Returns the handle of the sentinel root.
    ///
    /// The root never carries payload and is never removed; it is the
    /// anchor every topic is reconstructed relative to. Unlike every other
    /// segment it cannot be reached by looking up a topic string — not
    /// even the empty string, which resolves to an ordinary one-segment
    /// topic (see crate docs, "empty topic").
    pub fn root(&self) -> SegmentId {
        SegmentId(ROOT)
    }

    fn node(&self, id: SegmentId) -> &Node<T> {
        self.nodes[id.0].as_ref().expect("stale SegmentId")
    }

    fn node_mut(&mut self, id: SegmentId) -> &mut Node<T> {
        self.nodes[id.0].as_mut().expect("stale SegmentId")
    }

    fn alloc(&mut self, node: Node<T>) -> usize {
        if let Some(idx) = self.free.pop() {
            self.nodes[idx] = Some(node);
            idx
        } else {
            self.nodes.push(Some(node));
            self.nodes.len() - 1
        }
    }

    fn child_or_create(&mut self, parent: usize, label: &str) -> usize {
        if let Some(&existing) = self.nodes[parent]
            .as_ref()
            .expect("stale SegmentId")
            .children
            .get(label)
        {
            return existing;
        }
        let child = self.alloc(Node {
            label: Some(label.to_string()),
            parent: Some(parent),
            children: BTreeMap::new(),
            payload: None,
        });
        self.nodes[parent]
            .as_mut()
            .expect("stale SegmentId")
            .children
            .insert(label.to_string(), child);
        child
    }

    /// Looks up `path`, creating any missing segments along the way.
    ///
    /// `path` is split on `/` exactly like any other topic string (the
    /// empty string yields the single empty-label segment, not the root —
    /// see crate docs). Splitting does not borrow or mutate the caller's
    /// string, so there is nothing to roll back on the caller's side; this
    /// method never fails (Rust's global allocator aborts the process on
    /// allocation failure rather than returning an error, so there is no
    /// partial-insert state to unwind — see [`Error`]).
    pub fn get_or_insert(&mut self, path: &str) -> SegmentId {
        let mut idx = ROOT;
        for segment in path.split('/') {
            idx = self.child_or_create(idx, segment);
        }
        SegmentId(idx)
    }

    /// Looks up `path` without creating anything.
    ///
    /// Fails with [`Error::NotFound`] as soon as some segment of `path` has
    /// no matching child; nothing is mutated along the way.
    pub fn get(&self, path: &str) -> Result<SegmentId, Error> {
        let mut idx = ROOT;
        for segment in path.split('/') {
            idx = *self.nodes[idx]
                .as_ref()
                .expect("stale SegmentId")
                .children
                .get(segment)
                .ok_or(Error::NotFound)?;
        }
        Ok(SegmentId(idx))
    }

    /// Returns the payload stored at `id`, if any.
    pub fn payload(&self, id: SegmentId) -> Option<&T> {
        self.node(id).payload.as_ref()
    }

    /// Returns a mutable reference to the payload stored at `id`, if any.
    pub fn payload_mut(&mut self, id: SegmentId) -> Option<&mut T> {
        self.node_mut(id).payload.as_mut()
    }

    /// Stores `value` at `id`, returning whatever payload was there before.
    ///
    /// Setting a payload is what turns an interior segment into a stored
    /// entry — presence of payload is the only thing that distinguishes
    /// the two.
    pub fn set_payload(&mut self, id: SegmentId, value: T) -> Option<T> {
        self.node_mut(id).payload.replace(value)
    }

    /// Clears and returns the payload stored at `id`, if any.
    ///
    /// Callers that want [`Trie::remove`] to collapse a segment must clear
    /// its payload first — `remove` only ever unlinks segments that are
    /// already non-retained.
    pub fn take_payload(&mut self, id: SegmentId) -> Option<T> {
        self.node_mut(id).payload.take()
    }

    /// Removes `id` if it is no longer retained (no payload, no
    /// children), then walks up collapsing non-retained ancestors.
    ///
    /// A no-op on the sentinel root, and a no-op on any segment that still
    /// carries payload or has children.
    pub fn remove(&mut self, id: SegmentId) {
        let mut idx = id.0;
        loop {
            if idx == ROOT {
                return;
            }
            if self.nodes[idx].as_ref().expect("stale SegmentId").retained() {
                return;
            }
            let freed = self.nodes[idx].take().expect("stale SegmentId");
            self.free.push(idx);
            let parent = freed.parent.expect("non-root has a parent");
            self.nodes[parent]
                .as_mut()
                .expect("stale SegmentId")
                .children
                .remove(freed.label.as_deref().expect("non-root has a label"));
            idx = parent;
        }
    }

    /// Visits every segment in the tree — stored entries and bare interior
    /// nodes alike — in deterministic pre-order, reporting each one's full
    /// topic string. The sentinel root itself is never visited; see
    /// DESIGN.md for why `iter` surfaces interior segments too.
    pub fn iter<F>(&self, mut cb: F)
    where
        F: FnMut(&str, SegmentId),
    {
        let mut buf = String::new();
        self.walk_subtree(ROOT, &mut buf, 0, false, false, &mut cb);
    }

    /// Shared DFS used by both [`Trie::iter`] (all segments) and the `#`
    /// case of [`crate::matcher`] matching (stored segments only).
    ///
    /// `depth` is the number of labels already appended to `buf` along the
    /// path from the root to `start` — needed so `push_label` can tell
    /// apart "nothing pushed yet" from "the empty-string label was just
    /// pushed", which an empty `buf` alone cannot distinguish.
    ///
    /// `skip_dollar` hides `$`-prefixed *direct* children of `start` — it
    /// never applies below the first level, regardless of recursion depth.
    pub(crate) fn walk_subtree<F>(
        &self,
        start: usize,
        buf: &mut String,
        depth: usize,
        skip_dollar: bool,
        only_stored: bool,
        cb: &mut F,
    ) where
        F: FnMut(&str, SegmentId),
    {
        self.walk_subtree_at(start, buf, depth, skip_dollar, only_stored, cb, true)
    }

    fn walk_subtree_at<F>(
        &self,
        node_idx: usize,
        buf: &mut String,
        depth: usize,
        skip_dollar: bool,
        only_stored: bool,
        cb: &mut F,
        first_level: bool,
    ) where
        F: FnMut(&str, SegmentId),
    {
        let node = self.nodes[node_idx].as_ref().expect("stale SegmentId");
        for (label, &child_idx) in node.children.iter() {
            if first_level && skip_dollar && label.starts_with('$') {
                continue;
            }
            let mark = buf.len();
            push_label(buf, label, depth);
            let child = self.nodes[child_idx].as_ref().expect("stale SegmentId");
            if !only_stored || child.payload.is_some() {
                cb(buf, SegmentId(child_idx));
            }
            self.walk_subtree_at(child_idx, buf, depth + 1, skip_dollar, only_stored, cb, false);
            buf.truncate(mark);
        }
    }

    pub(crate) fn children(&self, id: SegmentId) -> &BTreeMap<String, usize> {
        &self.node(id).children
    }

    pub(crate) fn is_root(&self, idx: usize) -> bool {
        idx == ROOT
    }

    pub(crate) fn has_payload(&self, idx: usize) -> bool {
        self.nodes[idx]
            .as_ref()
            .expect("stale SegmentId")
            .payload
            .is_some()
    }
}

/// Appends `label` to `buf`, joining with `/` unless this is the first
/// label of the whole topic.
///
/// `depth` — the count of labels already pushed along this path — is the
/// source of truth for "first label", not `buf`'s length: a topic whose
/// leading segments are themselves empty strings (`""`, `/`, `//`, ...)
/// leaves `buf` empty after several pushes, which would make an
/// `is_empty()` check misjudge a later empty segment as the first one and
/// collapse distinct topics onto the same reconstructed string.
pub(crate) fn push_label(buf: &mut String, label: &str, depth: usize) {
    if depth > 0 {
        buf.push('/');
    }
    buf.push_str(label);
}
