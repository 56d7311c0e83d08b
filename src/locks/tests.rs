//! Tests for the run lock.

use super::*;
use crate::context::DemoContext;
use crate::error::DemoError;
use chrono::{Duration, Utc};
use tempfile::TempDir;

fn create_test_context() -> (TempDir, DemoContext) {
    let temp_dir = TempDir::new().unwrap();
    let ctx = DemoContext::resolve_from(temp_dir.path()).unwrap();
    (temp_dir, ctx)
}

fn metadata_aged(minutes: i64) -> LockMetadata {
    let mut meta = LockMetadata::new("HR Assistant");
    meta.created_at = Utc::now() - Duration::minutes(minutes);
    meta
}

#[test]
fn test_lock_metadata_creation() {
    let meta = LockMetadata::new("Finance Processor");

    assert!(!meta.owner.is_empty());
    assert_eq!(meta.pid, Some(std::process::id()));
    assert_eq!(meta.agent, "Finance Processor");
    assert!(meta.age().num_minutes() < 1);
}

#[test]
fn test_lock_metadata_json_fields() {
    let json = LockMetadata::new("HR Assistant").to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert!(value["owner"].is_string());
    assert!(value["pid"].is_number());
    assert!(value["created_at"].is_string());
    assert_eq!(value["agent"], "HR Assistant");
}

#[test]
fn test_lock_metadata_age_string() {
    assert_eq!(metadata_aged(5).age_string(), "5m");
    assert_eq!(metadata_aged(130).age_string(), "2h 10m");
    assert_eq!(metadata_aged(60 * 27).age_string(), "1d 3h");
}

#[test]
fn test_lock_metadata_is_stale() {
    assert!(!metadata_aged(5).is_stale());
    assert!(metadata_aged(STALE_AFTER_MINUTES + 5).is_stale());
}

#[test]
fn test_acquire_run_lock_writes_metadata() {
    let (_temp_dir, ctx) = create_test_context();

    let guard = acquire_run_lock(&ctx, "Check-in Processor").unwrap();
    assert_eq!(guard.path(), ctx.run_lock_path());

    let info = read_run_lock(&ctx).unwrap().unwrap();
    assert_eq!(info.metadata.agent, "Check-in Processor");
    assert!(!info.is_stale);

    drop(guard);
    assert!(!ctx.run_lock_path().exists());
}

#[test]
fn test_second_acquire_fails_with_holder() {
    let (_temp_dir, ctx) = create_test_context();

    let _guard = acquire_run_lock(&ctx, "HR Assistant").unwrap();
    let err = acquire_run_lock(&ctx, "Finance Processor").unwrap_err();

    match &err {
        DemoError::LockError(message) => {
            assert!(message.contains("another run is active"));
            assert!(message.contains("'HR Assistant'"));
            assert!(message.contains("unlock --force"));
        }
        other => panic!("expected LockError, got {:?}", other),
    }
    assert_eq!(err.exit_code(), crate::exit_codes::LOCK_FAILURE);
}

#[test]
fn test_acquire_after_release_succeeds() {
    let (_temp_dir, ctx) = create_test_context();

    acquire_run_lock(&ctx, "HR Assistant")
        .unwrap()
        .release()
        .unwrap();
    let _guard = acquire_run_lock(&ctx, "HR Assistant").unwrap();
}

#[test]
fn test_read_run_lock_none_when_free() {
    let (_temp_dir, ctx) = create_test_context();
    assert!(read_run_lock(&ctx).unwrap().is_none());
}

#[test]
fn test_clear_requires_force() {
    let (_temp_dir, ctx) = create_test_context();
    let guard = acquire_run_lock(&ctx, "HR Assistant").unwrap();

    let err = clear_run_lock(&ctx, false).unwrap_err();
    assert!(err.to_string().contains("without --force"));
    assert!(ctx.run_lock_path().exists());

    let cleared = clear_run_lock(&ctx, true).unwrap().unwrap();
    assert_eq!(cleared.metadata.agent, "HR Assistant");
    assert!(!ctx.run_lock_path().exists());

    // The guard's own delete now fails; it only warns.
    drop(guard);
}

#[test]
fn test_clear_missing_lock_fails() {
    let (_temp_dir, ctx) = create_test_context();
    let err = clear_run_lock(&ctx, true).unwrap_err();
    assert!(err.to_string().contains("no run lock exists"));
}

#[test]
fn test_clear_corrupt_lock_with_force() {
    let (_temp_dir, ctx) = create_test_context();
    std::fs::create_dir_all(&ctx.state_dir).unwrap();
    std::fs::write(ctx.run_lock_path(), "not json").unwrap();

    assert!(read_run_lock(&ctx).is_err());
    assert!(clear_run_lock(&ctx, true).unwrap().is_none());
    assert!(!ctx.run_lock_path().exists());
}

#[test]
fn test_run_lock_info_display() {
    let info = RunLockInfo {
        path: "run.lock".into(),
        metadata: metadata_aged(STALE_AFTER_MINUTES + 1),
        is_stale: true,
    };
    let text = info.to_string();
    assert!(text.contains("'HR Assistant'"));
    assert!(text.ends_with("(STALE)"));
}

#[test]
fn test_owner_string_has_user_and_host() {
    let owner = owner_string();
    assert!(owner.contains('@'));
}
