//! Pattern-vs-pattern matching: `matching_iter` and the recursive walker
//! behind it.
//!
//! This is the dominant piece of the crate. The tricky part isn't matching
//! a literal topic against a stored pattern (ordinary MQTT subscription
//! matching) — it's that *stored* topics may themselves contain `+`/`#`,
//! so a query pattern must be walked against wildcards on both sides at
//! once.

use crate::trie::{push_label, SegmentId, Trie};

impl<T> Trie<T> {
    /// Visits every stored entry whose topic set intersects the set
    /// denoted by `pattern`.
    ///
    /// `pattern` may itself contain `+`/`#`; so may the stored topics.
    /// Emission order is a stable DFS for a given tree shape, but it is not
    /// part of the contract — treat results as a set.
    pub fn matching_iter<F>(&self, pattern: &str, mut cb: F)
    where
        F: FnMut(&str, SegmentId),
    {
        let segments: Vec<&str> = pattern.split('/').collect();
        let mut buf = String::new();
        self.match_rec(self.root().0, &segments, &mut buf, 0, &mut cb);
    }

    /// `depth` is the number of labels already appended to `buf` along the
    /// path from the root to `idx` — threaded through so `push_label` can
    /// tell a genuinely empty `buf` apart from one that merely accumulated
    /// empty-string labels.
    fn match_rec<F>(&self, idx: usize, pattern: &[&str], buf: &mut String, depth: usize, cb: &mut F)
    where
        F: FnMut(&str, SegmentId),
    {
        let Some((&first, rest)) = pattern.split_first() else {
            // Pattern exhausted: the current node itself is a match, and
            // so is a stored `#` child (it matches the terminating
            // position of the query).
            cb(buf, SegmentId(idx));
            if let Some(&hash) = self.children(SegmentId(idx)).get("#") {
                let mark = buf.len();
                push_label(buf, "#", depth);
                cb(buf, SegmentId(hash));
                buf.truncate(mark);
            }
            return;
        };

        match first {
            "#" => self.match_hash(idx, buf, depth, cb),
            "+" => self.match_plus(idx, rest, buf, depth, cb),
            literal => self.match_literal(idx, literal, rest, buf, depth, cb),
        }
    }

    /// `#` matches the current node's own topic plus every stored
    /// descendant. `$`-prefixed top-level children are invisible to a
    /// bare `#` only when `idx` is the sentinel.
    fn match_hash<F>(&self, idx: usize, buf: &mut String, depth: usize, cb: &mut F)
    where
        F: FnMut(&str, SegmentId),
    {
        if !self.is_root(idx) {
            cb(buf, SegmentId(idx));
        }
        let skip_dollar = self.is_root(idx);
        self.walk_subtree(idx, buf, depth, skip_dollar, true, cb);
    }

    /// `+` forks into every child of the current node and continues
    /// matching the remainder of the pattern against each. `$`-prefixed
    /// children are excluded from the fork only at the sentinel.
    fn match_plus<F>(&self, idx: usize, rest: &[&str], buf: &mut String, depth: usize, cb: &mut F)
    where
        F: FnMut(&str, SegmentId),
    {
        let skip_dollar = self.is_root(idx);
        for (label, &child) in self.children(SegmentId(idx)).iter() {
            if skip_dollar && label.starts_with('$') {
                continue;
            }
            let mark = buf.len();
            push_label(buf, label, depth);
            self.match_rec(child, rest, buf, depth + 1, cb);
            buf.truncate(mark);
        }
    }

    /// A literal pattern segment (including the empty segment between two
    /// consecutive `/`) forks into up to three independent continuations:
    /// a stored `+` child (the stored wildcard matches our literal), a
    /// stored `#` child (emitted directly, no further descent), and a
    /// child labeled exactly `literal`. No `$` filtering applies here — the
    /// sysspace rule only hides wildcard positions, not literal ones.
    fn match_literal<F>(
        &self,
        idx: usize,
        literal: &str,
        rest: &[&str],
        buf: &mut String,
        depth: usize,
        cb: &mut F,
    ) where
        F: FnMut(&str, SegmentId),
    {
        if let Some(&plus) = self.children(SegmentId(idx)).get("+") {
            let mark = buf.len();
            push_label(buf, "+", depth);
            self.match_rec(plus, rest, buf, depth + 1, cb);
            buf.truncate(mark);
        }
        if let Some(&hash) = self.children(SegmentId(idx)).get("#") {
            let mark = buf.len();
            push_label(buf, "#", depth);
            cb(buf, SegmentId(hash));
            buf.truncate(mark);
        }
        if let Some(&exact) = self.children(SegmentId(idx)).get(literal) {
            let mark = buf.len();
            push_label(buf, literal, depth);
            self.match_rec(exact, rest, buf, depth + 1, cb);
            buf.truncate(mark);
        }
    }
}
