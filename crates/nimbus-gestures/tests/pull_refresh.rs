//! End-to-end tests for the sampler feeding the gesture controllers.
//!
//! These drive raw pointer events through the pipeline and await the refresh
//! future the way an owning screen would.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use nimbus_gestures::{
    refresh_callback, GestureRecognizer, PointerKind, PullConfig, PullPhase,
    PullToRefreshController, RawPointerEvent, SemanticEvent, SwipeDirection,
    SwipeNavigationController, TouchSampler,
};

fn raw(kind: PointerKind, x: f64, y: f64, ms: u64) -> RawPointerEvent {
    RawPointerEvent::new(kind, x, y, Duration::from_millis(ms))
}

fn feed_all(
    sampler: &mut TouchSampler,
    recognizer: &mut dyn GestureRecognizer,
    events: &[RawPointerEvent],
) -> Vec<SemanticEvent> {
    events
        .iter()
        .filter_map(|e| sampler.feed(*e))
        .filter_map(|e| recognizer.feed(&e))
        .collect()
}

#[tokio::test]
async fn test_pull_gesture_drives_refresh_to_completion() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();

    let mut sampler = TouchSampler::default();
    let mut pull = PullToRefreshController::new(PullConfig::default(), Arc::new(|| true));
    pull.set_on_refresh(refresh_callback(move || {
        let counter = counter.clone();
        async move {
            tokio::task::yield_now().await;
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }));

    let events = feed_all(
        &mut sampler,
        &mut pull,
        &[
            raw(PointerKind::Start, 50., 10., 0),
            raw(PointerKind::Move, 50., 60., 16),
            raw(PointerKind::Move, 50., 130., 32),
            raw(PointerKind::Move, 50., 190., 48),
            raw(PointerKind::End, 50., 190., 64),
        ],
    );

    assert!(events.contains(&SemanticEvent::PullTriggered));
    assert_eq!(
        events
            .iter()
            .filter(|e| matches!(e, SemanticEvent::PullReady { .. }))
            .count(),
        1
    );

    let future = pull.take_refresh().expect("refresh should be pending");
    let result = future.await;
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    assert_eq!(
        pull.finish_refresh(result),
        Some(SemanticEvent::RefreshResolved { ok: true })
    );
    assert_eq!(pull.phase(), PullPhase::Idle);
}

#[tokio::test]
async fn test_failed_refresh_resolves_not_ok() {
    let mut pull = PullToRefreshController::new(PullConfig::default(), Arc::new(|| true));
    pull.set_on_refresh(refresh_callback(|| async {
        Err(anyhow::anyhow!("forecast endpoint unreachable"))
    }));

    pull.trigger();
    let result = pull.take_refresh().expect("refresh should be pending").await;

    assert_eq!(
        pull.finish_refresh(result),
        Some(SemanticEvent::RefreshResolved { ok: false })
    );
    assert!(!pull.is_refreshing());
}

#[test]
fn test_swipe_through_sampler() {
    let mut sampler = TouchSampler::default();
    let mut swipe = SwipeNavigationController::default();

    let events = feed_all(
        &mut sampler,
        &mut swipe,
        &[
            raw(PointerKind::Start, 300., 400., 0),
            raw(PointerKind::Move, 260., 402., 40),
            raw(PointerKind::Move, 200., 405., 90),
            raw(PointerKind::End, 180., 405., 120),
        ],
    );

    assert_eq!(events.len(), 1);
    match &events[0] {
        SemanticEvent::SwipeDetected(result) => {
            assert_eq!(result.direction, Some(SwipeDirection::Left));
            assert_eq!(result.distance, 120.);
            assert_eq!(result.velocity, 1000.);
        }
        other => panic!("unexpected event: {other:?}"),
    }

    let json = serde_json::to_value(&events[0]).unwrap();
    assert_eq!(json["event"], "swipe_detected");
    assert_eq!(json["direction"], "left");
}

#[test]
fn test_stray_end_does_not_reach_controllers() {
    let mut sampler = TouchSampler::default();
    let mut swipe = SwipeNavigationController::default();

    let events = feed_all(
        &mut sampler,
        &mut swipe,
        &[raw(PointerKind::End, 10., 10., 5), raw(PointerKind::Cancel, 10., 10., 6)],
    );
    assert!(events.is_empty());
}
