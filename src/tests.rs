//! Crate-level integration tests: the worked end-to-end scenario, the full
//! traversal segment count, and the symmetric-matching property.

use std::collections::{BTreeSet, HashMap};

use crate::Trie;

/// The 23-topic fixture, index-to-topic as given.
const TOPICS: &[(usize, &str)] = &[
    (0, ""),
    (1, "/"),
    (2, "a"),
    (3, "a/b"),
    (4, "a/c"),
    (5, "b"),
    (6, "b/c"),
    (7, "b/d"),
    (8, "b/c/zoo"),
    (9, "//"),
    (10, "///"),
    (11, "+/c"),
    (12, "b/#"),
    (13, "+/b"),
    (14, "+"),
    (15, "foo"),
    (16, "foo/#"),
    (17, "foo/+"),
    (18, "foo/+/baz"),
    (19, "foo/+/baz/#"),
    (20, "$SYS/test"),
    (21, "$BAD/test"),
    (22, "b/$SYS"),
];

fn build_fixture() -> (Trie<usize>, HashMap<String, usize>) {
    let mut trie = Trie::new();
    let mut index_by_topic = HashMap::new();
    for &(idx, topic) in TOPICS {
        let seg = trie.get_or_insert(topic);
        trie.set_payload(seg, idx);
        index_by_topic.insert(topic.to_string(), idx);
    }
    (trie, index_by_topic)
}

fn matches(trie: &Trie<usize>, pattern: &str) -> BTreeSet<usize> {
    let mut hits = BTreeSet::new();
    trie.matching_iter(pattern, |_, seg| {
        if let Some(&idx) = trie.payload(seg) {
            hits.insert(idx);
        }
    });
    hits
}

#[test]
fn worked_scenario_matches_expected_sets() {
    let (trie, _) = build_fixture();

    let cases: &[(&str, &[usize])] = &[
        ("", &[0, 14]),
        ("+", &[0, 2, 5, 12, 14, 15, 16]),
        (
            "#",
            &[
                0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 22,
            ],
        ),
        ("/z", &[]),
        ("b/c", &[6, 11, 12]),
        ("+/c", &[4, 6, 11, 12, 16, 17]),
        ("b/+/zoo", &[8]),
        ("b/+", &[6, 7, 11, 12, 13, 22]),
        ("b/#", &[5, 6, 7, 8, 11, 12, 13, 14, 22]),
        ("foo/bar/baz", &[16, 18, 19]),
    ];

    for (pattern, expected) in cases {
        let expected: BTreeSet<usize> = expected.iter().copied().collect();
        assert_eq!(
            matches(&trie, pattern),
            expected,
            "pattern {pattern:?} mismatched"
        );
    }
}

#[test]
fn full_iter_visits_every_segment_once() {
    let (trie, _) = build_fixture();

    let mut topics = Vec::new();
    trie.iter(|topic, _| topics.push(topic.to_string()));

    assert_eq!(
        topics.len(),
        25,
        "expected 25 visited segments, got {topics:?}"
    );
    let unique: BTreeSet<&str> = topics.iter().map(String::as_str).collect();
    assert_eq!(unique.len(), topics.len(), "iter revisited a segment");
}

#[test]
fn validator_accept_reject_vectors_match_appendix() {
    use crate::validate;

    for topic in [
        "/",
        "aa/bb",
        "+",
        "+/xyz",
        "xyz/+",
        "xyz/+/abc",
        "#",
        "abc/#",
        "test////a//topic",
    ] {
        assert!(validate(topic));
    }
    for topic in ["", "#/abc", "a+", "f#", "/#a", "/+a"] {
        assert!(!validate(topic));
    }
}

fn matches_any(trie: &Trie<()>, pattern: &str) -> bool {
    let mut hit = false;
    trie.matching_iter(pattern, |_, _| hit = true);
    hit
}

/// `matching_iter(insert(t), p)` hits iff `matching_iter(insert(p), t)`
/// hits: matching is symmetric in which side carries the wildcard.
#[test]
fn matching_is_symmetric_in_pattern_and_topic() {
    let pairs = [
        ("b/c", "+/c"),
        ("b/c", "b/+"),
        ("b/c/zoo", "b/+/zoo"),
        ("foo/bar/baz", "foo/+/baz"),
        ("foo/bar/baz/extra", "foo/#"),
        ("a/c", "+/c"),
        ("$SYS/test", "#"),
        ("b/$SYS", "#"),
    ];

    for (t, p) in pairs {
        let mut by_t = Trie::new();
        let seg = by_t.get_or_insert(t);
        by_t.set_payload(seg, ());
        let t_hit_by_p = matches_any(&by_t, p);

        let mut by_p = Trie::new();
        let seg = by_p.get_or_insert(p);
        by_p.set_payload(seg, ());
        let p_hit_by_t = matches_any(&by_p, t);

        assert_eq!(
            t_hit_by_p, p_hit_by_t,
            "asymmetric result for stored {t:?} vs pattern {p:?}"
        );
    }
}

#[test]
fn insert_then_uninsert_restores_prior_shape() {
    let mut trie: Trie<i32> = Trie::new();

    let mut before = Vec::new();
    trie.iter(|topic, _| before.push(topic.to_string()));

    let seg = trie.get_or_insert("a/b/c");
    trie.set_payload(seg, 1);
    trie.take_payload(seg);
    trie.remove(seg);

    let mut after = Vec::new();
    trie.iter(|topic, _| after.push(topic.to_string()));

    assert_eq!(before, after);
}

#[test]
fn remove_stops_at_retained_ancestor() {
    let mut trie = Trie::new();

    let parent = trie.get_or_insert("a");
    trie.set_payload(parent, "parent");
    let child = trie.get_or_insert("a/b");
    trie.set_payload(child, "child");

    trie.take_payload(child);
    trie.remove(child);

    assert!(trie.get("a/b").is_err());
    assert!(trie.get("a").is_ok());
}

#[test]
fn remove_is_noop_while_retained() {
    let mut trie = Trie::new();

    let leaf = trie.get_or_insert("a/b");
    trie.set_payload(leaf, 1);
    // no take_payload: the segment is still retained
    trie.remove(leaf);

    assert!(trie.get("a/b").is_ok());
}

#[test]
fn lookup_without_create_reports_not_found() {
    let mut trie: Trie<i32> = Trie::new();
    let seg = trie.get_or_insert("a/b");
    trie.set_payload(seg, 1);

    assert!(trie.get("a/b").is_ok());
    assert!(trie.get("a/b/c").is_err());
    assert!(trie.get("x").is_err());
}

#[test]
fn empty_topic_is_a_distinct_ordinary_segment() {
    let mut trie: Trie<i32> = Trie::new();
    let empty = trie.get_or_insert("");
    trie.set_payload(empty, 1);

    assert_ne!(empty, trie.root());
    assert!(trie.get("").is_ok());
}
