//! Prefix Iterator Tests

use crate::common::*;
use stash::{Command, IteratorId, Output};

fn open(executor: &stash::Executor, prefix: &[u8]) -> IteratorId {
    match executor
        .execute(
            &ctx(),
            Command::NewIterator {
                prefix: prefix.to_vec(),
            },
        )
        .unwrap()
    {
        Output::Iterator(id) => id,
        other => panic!("Expected Iterator output, got {:?}", other),
    }
}

fn next(executor: &stash::Executor, id: IteratorId) -> stash::Result<Output> {
    executor.execute(&ctx(), Command::IteratorNext { iterator: id })
}

// ============================================================================
// Ordering and Filtering
// ============================================================================

#[test]
fn yields_matching_keys_in_order() {
    let (executor, _dir) = create_persistent_executor();
    for key in [&b"user:3"[..], b"user:1", b"admin:1", b"user:2", b"user"] {
        put(&executor, key, b"v");
    }

    let keys: Vec<_> = scan(&executor, b"user:").into_iter().map(|(k, _)| k).collect();
    assert_eq!(
        keys,
        vec![b"user:1".to_vec(), b"user:2".to_vec(), b"user:3".to_vec()]
    );
}

#[test]
fn byte_order_not_numeric_order() {
    let executor = create_executor();
    for key in [&b"k10"[..], b"k9", b"k1"] {
        put(&executor, key, b"");
    }

    let keys: Vec<_> = scan(&executor, b"k").into_iter().map(|(k, _)| k).collect();
    assert_eq!(keys, vec![b"k1".to_vec(), b"k10".to_vec(), b"k9".to_vec()]);
}

#[test]
fn empty_prefix_yields_everything() {
    let executor = create_executor();
    put(&executor, b"a", b"1");
    put(&executor, b"\xff", b"2");

    assert_eq!(scan(&executor, b"").len(), 2);
}

#[test]
fn high_byte_prefix() {
    let (executor, _dir) = create_persistent_executor();
    put(&executor, b"\xff\xff", b"1");
    put(&executor, b"\xff\xfe", b"2");
    put(&executor, b"\xfe", b"3");

    let keys: Vec<_> = scan(&executor, b"\xff").into_iter().map(|(k, _)| k).collect();
    assert_eq!(keys, vec![b"\xff\xfe".to_vec(), b"\xff\xff".to_vec()]);
}

#[test]
fn no_match_is_immediately_exhausted() {
    let executor = create_executor();
    put(&executor, b"a", b"1");

    let id = open(&executor, b"zzz");
    assert_eq!(next(&executor, id).unwrap(), Output::Entry(None));
}

// ============================================================================
// Cursor Lifecycle
// ============================================================================

#[test]
fn exhausted_iterator_keeps_returning_none() {
    let executor = create_executor();
    put(&executor, b"p", b"v");

    let id = open(&executor, b"p");
    assert!(matches!(next(&executor, id).unwrap(), Output::Entry(Some(_))));
    for _ in 0..3 {
        assert_eq!(next(&executor, id).unwrap(), Output::Entry(None));
    }
}

#[test]
fn released_iterator_is_invalid_argument() {
    let executor = create_executor();
    let id = open(&executor, b"");

    executor
        .execute(&ctx(), Command::IteratorRelease { iterator: id })
        .unwrap();

    assert!(next(&executor, id).unwrap_err().is_invalid_argument());
    let err = executor
        .execute(&ctx(), Command::IteratorRelease { iterator: id })
        .unwrap_err();
    assert_eq!(err.code(), "InvalidArgument");
}

#[test]
fn unknown_iterator_is_invalid_argument() {
    let executor = create_executor();
    let err = next(&executor, IteratorId::new(4242)).unwrap_err();
    assert!(err.is_invalid_argument());
}

#[test]
fn iterators_are_independent() {
    let executor = create_executor();
    put(&executor, b"a", b"1");
    put(&executor, b"b", b"2");

    let first = open(&executor, b"");
    let second = open(&executor, b"");

    next(&executor, first).unwrap();
    next(&executor, first).unwrap();
    assert_eq!(
        next(&executor, second).unwrap(),
        Output::Entry(Some((b"a".to_vec(), b"1".to_vec())))
    );
}

#[test]
fn iterator_reads_snapshot() {
    let (executor, _dir) = create_persistent_executor();
    put(&executor, b"s1", b"old");

    let id = open(&executor, b"s");
    put(&executor, b"s1", b"new");
    put(&executor, b"s2", b"added");

    assert_eq!(
        next(&executor, id).unwrap(),
        Output::Entry(Some((b"s1".to_vec(), b"old".to_vec())))
    );
    assert_eq!(next(&executor, id).unwrap(), Output::Entry(None));
}

#[test]
fn typed_prefix_iter_releases_on_drop() {
    let db = stash::Stash::ephemeral().unwrap();
    db.put(b"x1", b"1").unwrap();
    db.put(b"x2", b"2").unwrap();

    let id = {
        let mut iter = db.scan_prefix(b"x").unwrap();
        assert_eq!(iter.next().unwrap().unwrap().0, b"x1".to_vec());
        iter.id()
    };

    let err = db
        .executor()
        .execute(db.context(), Command::IteratorNext { iterator: id })
        .unwrap_err();
    assert!(err.is_invalid_argument());
}

#[test]
fn typed_prefix_iter_collects() {
    let db = stash::Stash::ephemeral().unwrap();
    for i in 0..10u8 {
        db.put([b'n', i], [i]).unwrap();
    }

    let pairs: Vec<_> = db
        .scan_prefix(b"n")
        .unwrap()
        .collect::<stash::Result<_>>()
        .unwrap();
    assert_eq!(pairs.len(), 10);
    assert!(pairs.windows(2).all(|w| w[0].0 < w[1].0));
}
