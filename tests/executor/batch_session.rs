//! Batch Session Tests
//!
//! The batch session state machine: queueing, atomic commit, reset on
//! NewBatch, stale handles, and aborted commits.

use crate::common::*;
use stash::{BatchId, Command, Output};

fn new_batch(executor: &stash::Executor) -> BatchId {
    match executor.execute(&ctx(), Command::NewBatch).unwrap() {
        Output::Batch(id) => id,
        other => panic!("Expected Batch output, got {:?}", other),
    }
}

fn batch_put(executor: &stash::Executor, batch: BatchId, key: &[u8], value: &[u8]) {
    executor
        .execute(
            &ctx(),
            Command::BatchPut {
                batch: Some(batch),
                key: key.to_vec(),
                value: value.to_vec(),
            },
        )
        .unwrap();
}

fn batch_delete(executor: &stash::Executor, batch: BatchId, key: &[u8]) {
    executor
        .execute(
            &ctx(),
            Command::BatchDelete {
                batch: Some(batch),
                key: key.to_vec(),
            },
        )
        .unwrap();
}

fn commit(executor: &stash::Executor, batch: BatchId) -> stash::Result<Output> {
    executor.execute(&ctx(), Command::BatchCommit { batch: Some(batch) })
}

// ============================================================================
// Visibility
// ============================================================================

#[test]
fn pending_writes_are_invisible_until_commit() {
    let executor = create_executor();
    put(&executor, b"b", b"old");

    let batch = new_batch(&executor);
    batch_put(&executor, batch, b"a", b"1");
    batch_delete(&executor, batch, b"b");

    assert!(!has(&executor, b"a"));
    assert_eq!(get(&executor, b"b"), b"old".to_vec());

    commit(&executor, batch).unwrap();

    assert_eq!(get(&executor, b"a"), b"1".to_vec());
    assert!(!has(&executor, b"b"));
}

#[test]
fn last_write_wins_inside_a_batch() {
    let executor = create_executor();

    let batch = new_batch(&executor);
    batch_put(&executor, batch, b"k", b"1");
    batch_delete(&executor, batch, b"k");
    batch_put(&executor, batch, b"k", b"2");
    commit(&executor, batch).unwrap();

    assert_eq!(get(&executor, b"k"), b"2".to_vec());
}

#[test]
fn delete_last_removes_key() {
    let executor = create_executor();
    put(&executor, b"k", b"0");

    let batch = new_batch(&executor);
    batch_put(&executor, batch, b"k", b"1");
    batch_delete(&executor, batch, b"k");
    commit(&executor, batch).unwrap();

    assert!(!has(&executor, b"k"));
}

// ============================================================================
// Session State Machine
// ============================================================================

#[test]
fn batch_put_without_new_batch_uses_initial_session() {
    let executor = create_executor();

    executor
        .execute(
            &ctx(),
            Command::BatchPut {
                batch: None,
                key: b"k".to_vec(),
                value: b"v".to_vec(),
            },
        )
        .unwrap();
    executor
        .execute(&ctx(), Command::BatchCommit { batch: None })
        .unwrap();

    assert_eq!(get(&executor, b"k"), b"v".to_vec());
}

#[test]
fn new_batch_discards_pending_operations() {
    let executor = create_executor();

    let first = new_batch(&executor);
    batch_put(&executor, first, b"dropped", b"x");

    let second = new_batch(&executor);
    batch_put(&executor, second, b"kept", b"y");
    commit(&executor, second).unwrap();

    assert!(!has(&executor, b"dropped"));
    assert_eq!(get(&executor, b"kept"), b"y".to_vec());
}

#[test]
fn stale_batch_id_is_invalid_argument() {
    let executor = create_executor();

    let stale = new_batch(&executor);
    let _fresh = new_batch(&executor);

    let err = executor
        .execute(
            &ctx(),
            Command::BatchPut {
                batch: Some(stale),
                key: b"k".to_vec(),
                value: b"v".to_vec(),
            },
        )
        .unwrap_err();
    assert_eq!(err.code(), "InvalidArgument");
    assert!(commit(&executor, stale).unwrap_err().is_invalid_argument());
    assert!(!has(&executor, b"k"));
}

#[test]
fn session_is_reusable_after_commit() {
    let executor = create_executor();
    let batch = new_batch(&executor);

    batch_put(&executor, batch, b"a", b"1");
    commit(&executor, batch).unwrap();

    batch_put(&executor, batch, b"b", b"2");
    commit(&executor, batch).unwrap();

    assert_eq!(get(&executor, b"a"), b"1".to_vec());
    assert_eq!(get(&executor, b"b"), b"2".to_vec());
}

#[test]
fn commit_does_not_replay() {
    let executor = create_executor();
    let batch = new_batch(&executor);

    batch_put(&executor, batch, b"k", b"batched");
    commit(&executor, batch).unwrap();

    put(&executor, b"k", b"direct");
    commit(&executor, batch).unwrap();

    assert_eq!(get(&executor, b"k"), b"direct".to_vec());
}

#[test]
fn empty_commit_succeeds() {
    let executor = create_executor();
    let batch = new_batch(&executor);

    assert_eq!(commit(&executor, batch).unwrap(), Output::Unit);
}

// ============================================================================
// Aborted Commits
// ============================================================================

#[test]
fn rejected_commit_applies_nothing_and_clears_session() {
    let (executor, engine) = create_faulty_executor();
    let batch = new_batch(&executor);

    batch_put(&executor, batch, b"a", b"1");
    batch_put(&executor, batch, b"b", b"2");

    engine.fail_writes(true);
    let err = commit(&executor, batch).unwrap_err();
    assert_eq!(err.code(), "EngineFailure");
    engine.fail_writes(false);

    assert!(!has(&executor, b"a"));
    assert!(!has(&executor, b"b"));

    // The session was cleared; committing again applies nothing
    commit(&executor, batch).unwrap();
    assert!(engine.inner().is_empty());
}

#[test]
fn commit_failing_partway_applies_nothing() {
    let (executor, engine) = create_faulty_executor();
    put(&executor, b"b", b"old");

    let batch = new_batch(&executor);
    batch_put(&executor, batch, b"a", b"1");
    batch_delete(&executor, batch, b"b");
    batch_put(&executor, batch, b"c", b"3");

    engine.fail_batch_at(Some(3));
    let err = commit(&executor, batch).unwrap_err();
    assert_eq!(err.code(), "EngineFailure");
    engine.fail_batch_at(None);

    // The engine saw the whole batch and got through two ops before failing
    assert_eq!(engine.batches_seen(), 1);
    assert_eq!(engine.ops_staged(), 2);

    assert!(!has(&executor, b"a"));
    assert_eq!(get(&executor, b"b"), b"old".to_vec());
    assert!(!has(&executor, b"c"));

    // Nothing is left queued for a retry
    commit(&executor, batch).unwrap();
    assert_eq!(engine.batches_seen(), 1);
    assert!(!has(&executor, b"a"));
    assert_eq!(engine.inner().len(), 1);
}

// ============================================================================
// Persistence
// ============================================================================

#[test]
fn committed_batch_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let config = stash::StorageConfig::new(dir.path().join("store"));

    {
        let module = std::sync::Arc::new(stash::StorageModule::new());
        module.init(&config).unwrap();
        let executor = stash::Executor::new(module.clone());

        let batch = new_batch(&executor);
        batch_put(&executor, batch, b"a", b"1");
        batch_put(&executor, batch, b"b", b"2");
        commit(&executor, batch).unwrap();
        module.close().unwrap();
    }

    let module = std::sync::Arc::new(stash::StorageModule::new());
    module.init(&config).unwrap();
    let executor = stash::Executor::new(module);
    assert_eq!(get(&executor, b"a"), b"1".to_vec());
    assert_eq!(get(&executor, b"b"), b"2".to_vec());
}
