//! Command Dispatch Tests
//!
//! Tests that the Executor correctly dispatches all Command variants
//! and returns the appropriate Output types.

use crate::common::*;
use stash::{Command, Output};

// ============================================================================
// KV Commands
// ============================================================================

#[test]
fn put_returns_unit() {
    let executor = create_executor();

    let output = executor
        .execute(
            &ctx(),
            Command::Put {
                key: b"k".to_vec(),
                value: b"v".to_vec(),
            },
        )
        .unwrap();
    assert_eq!(output, Output::Unit);
}

#[test]
fn get_returns_stored_value() {
    let executor = create_executor();
    put(&executor, b"k", b"v");

    assert_eq!(get(&executor, b"k"), b"v".to_vec());
}

#[test]
fn put_overwrites() {
    let executor = create_executor();
    put(&executor, b"k", b"v1");
    put(&executor, b"k", b"v2");

    assert_eq!(get(&executor, b"k"), b"v2".to_vec());
}

#[test]
fn get_absent_key_returns_empty_value() {
    let executor = create_executor();

    let output = executor
        .execute(
            &ctx(),
            Command::Get {
                key: b"nope".to_vec(),
            },
        )
        .unwrap();
    assert_eq!(output, Output::Value(Vec::new()));
}

#[test]
fn has_distinguishes_absent_from_stored_empty() {
    let executor = create_executor();
    put(&executor, b"empty", b"");

    assert_eq!(get(&executor, b"empty"), get(&executor, b"absent"));
    assert!(has(&executor, b"empty"));
    assert!(!has(&executor, b"absent"));
}

#[test]
fn delete_removes_key() {
    let executor = create_executor();
    put(&executor, b"k", b"v");

    let output = executor
        .execute(&ctx(), Command::Delete { key: b"k".to_vec() })
        .unwrap();
    assert_eq!(output, Output::Unit);
    assert!(!has(&executor, b"k"));
    assert!(get(&executor, b"k").is_empty());
}

#[test]
fn delete_absent_key_succeeds() {
    let executor = create_executor();

    let output = executor
        .execute(
            &ctx(),
            Command::Delete {
                key: b"never".to_vec(),
            },
        )
        .unwrap();
    assert_eq!(output, Output::Unit);
}

#[test]
fn binary_keys_and_values() {
    let executor = create_executor();
    let key = [0u8, 0xff, 0x00, 0x7f];
    let value = [0xffu8; 300];
    put(&executor, &key, &value);

    assert_eq!(get(&executor, &key), value.to_vec());
}

// ============================================================================
// Batch Commands
// ============================================================================

#[test]
fn new_batch_returns_handle() {
    let executor = create_executor();

    let first = executor.execute(&ctx(), Command::NewBatch).unwrap();
    let second = executor.execute(&ctx(), Command::NewBatch).unwrap();

    match (first, second) {
        (Output::Batch(a), Output::Batch(b)) => assert_ne!(a, b),
        other => panic!("Expected Batch outputs, got {:?}", other),
    }
}

#[test]
fn batch_commands_return_unit() {
    let executor = create_executor();

    for cmd in [
        Command::BatchPut {
            batch: None,
            key: b"a".to_vec(),
            value: b"1".to_vec(),
        },
        Command::BatchDelete {
            batch: None,
            key: b"b".to_vec(),
        },
        Command::BatchCommit { batch: None },
    ] {
        assert_eq!(executor.execute(&ctx(), cmd).unwrap(), Output::Unit);
    }
    assert_eq!(get(&executor, b"a"), b"1".to_vec());
}

// ============================================================================
// Iterator Commands
// ============================================================================

#[test]
fn iterator_commands_return_expected_outputs() {
    let executor = create_executor();
    put(&executor, b"p1", b"v");

    let id = match executor
        .execute(
            &ctx(),
            Command::NewIterator {
                prefix: b"p".to_vec(),
            },
        )
        .unwrap()
    {
        Output::Iterator(id) => id,
        other => panic!("Expected Iterator output, got {:?}", other),
    };

    assert_eq!(
        executor
            .execute(&ctx(), Command::IteratorNext { iterator: id })
            .unwrap(),
        Output::Entry(Some((b"p1".to_vec(), b"v".to_vec())))
    );
    assert_eq!(
        executor
            .execute(&ctx(), Command::IteratorNext { iterator: id })
            .unwrap(),
        Output::Entry(None)
    );
    assert_eq!(
        executor
            .execute(&ctx(), Command::IteratorRelease { iterator: id })
            .unwrap(),
        Output::Unit
    );
}

// ============================================================================
// Engine Failures
// ============================================================================

#[test]
fn engine_failure_surfaces_and_module_stays_usable() {
    let (executor, engine) = create_faulty_executor();

    engine.fail_writes(true);
    let err = executor
        .execute(
            &ctx(),
            Command::Put {
                key: b"k".to_vec(),
                value: b"v".to_vec(),
            },
        )
        .unwrap_err();
    assert_eq!(err.code(), "EngineFailure");

    engine.fail_writes(false);
    put(&executor, b"k", b"v");
    assert_eq!(get(&executor, b"k"), b"v".to_vec());
}

#[test]
fn read_failure_is_not_normalized() {
    let (executor, engine) = create_faulty_executor();
    engine.fail_reads(true);

    let err = executor
        .execute(&ctx(), Command::Get { key: b"k".to_vec() })
        .unwrap_err();
    assert!(err.is_engine_failure());

    let err = executor
        .execute(&ctx(), Command::Has { key: b"k".to_vec() })
        .unwrap_err();
    assert!(err.is_engine_failure());
}
