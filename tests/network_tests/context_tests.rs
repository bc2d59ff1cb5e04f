//! Tests for Context
//!
//! These tests verify:
//! - Deadline arithmetic and tightening
//! - Cancellation through the handle (explicit and on drop)
//! - Combining local bounds with the context deadline

use std::thread;
use std::time::{Duration, Instant};

use byond_topic::Context;

// =============================================================================
// Deadline Tests
// =============================================================================

#[test]
fn test_background_has_no_deadline() {
    let ctx = Context::background();

    assert_eq!(ctx.deadline(), None);
    assert_eq!(ctx.remaining(), None);
    assert!(!ctx.is_expired());
    assert!(!ctx.is_cancelled());
}

#[test]
fn test_with_timeout_sets_deadline() {
    let ctx = Context::with_timeout(Duration::from_secs(60));
    let remaining = ctx.remaining().unwrap();

    assert!(remaining <= Duration::from_secs(60));
    assert!(remaining > Duration::from_secs(59));
}

#[test]
fn test_past_deadline_is_expired() {
    let ctx = Context::with_deadline(Instant::now() - Duration::from_millis(1));

    assert!(ctx.is_expired());
    assert_eq!(ctx.remaining(), Some(Duration::ZERO));
}

#[test]
fn test_earlier_deadline_wins() {
    let soon = Instant::now() + Duration::from_secs(1);
    let later = soon + Duration::from_secs(10);

    assert_eq!(Context::with_deadline(soon).deadline_at(later).deadline(), Some(soon));
    assert_eq!(Context::with_deadline(later).deadline_at(soon).deadline(), Some(soon));
}

#[test]
fn test_unrepresentable_timeout_means_no_deadline() {
    let ctx = Context::with_timeout(Duration::MAX);
    assert_eq!(ctx.deadline(), None);
    assert!(!ctx.is_expired());

    let soon = Instant::now() + Duration::from_secs(1);
    let ctx = Context::with_deadline(soon).timeout(Duration::MAX);
    assert_eq!(ctx.deadline(), Some(soon));
}

#[test]
fn test_bound_takes_tighter_limit() {
    let background = Context::background();
    assert_eq!(background.bound(None), None);
    assert_eq!(
        background.bound(Some(Duration::from_millis(5))),
        Some(Duration::from_millis(5))
    );

    let ctx = Context::with_timeout(Duration::from_secs(30));
    assert_eq!(
        ctx.bound(Some(Duration::from_millis(5))),
        Some(Duration::from_millis(5))
    );
    assert!(ctx.bound(Some(Duration::from_secs(120))).unwrap() <= Duration::from_secs(30));
    assert!(ctx.bound(None).unwrap() <= Duration::from_secs(30));
}

// =============================================================================
// Cancellation Tests
// =============================================================================

#[test]
fn test_cancel_reaches_clones() {
    let (ctx, handle) = Context::with_cancel();
    let clone = ctx.clone();

    assert!(!ctx.is_cancelled());
    handle.cancel();

    assert!(ctx.is_cancelled());
    assert!(clone.is_cancelled());
}

#[test]
fn test_dropping_handle_cancels() {
    let (ctx, handle) = Context::with_cancel();
    drop(handle);
    assert!(ctx.is_cancelled());
}

#[test]
fn test_done_wakes_waiter() {
    let (ctx, handle) = Context::with_cancel();

    let waiter = thread::spawn(move || {
        // A disconnected receiver returns Err immediately
        ctx.done().recv().is_err()
    });

    thread::sleep(Duration::from_millis(20));
    handle.cancel();

    assert!(waiter.join().unwrap());
}

#[test]
fn test_cancel_keeps_deadline() {
    let (ctx, _handle) = Context::with_cancel();
    let ctx = ctx.timeout(Duration::from_secs(5));

    assert!(ctx.deadline().is_some());
    assert!(!ctx.is_cancelled());
}
