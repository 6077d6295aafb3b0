#[allow(dead_code)]
mod common;

use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use chrono::Local;
use common::{flat_body, nested_body, ActionMode, FakeBackend, StatusMode};
use serde_json::json;
use tokio_util::sync::CancellationToken;

use devcare::actions::{ActionDispatcher, ActionOutcome, AssumeYes, Confirm};
use devcare::client::{PayloadShape, SharedBackend};
use devcare::config::Config;
use devcare::notification::NotificationTray;
use devcare::poller::{PollOutcome, StatusPoller};
use devcare::session::DashboardSession;
use devcare::view::{DashboardView, PostureBand, CONNECTED_LABEL, DISCONNECTED_LABEL};

struct Decline;

#[async_trait::async_trait]
impl Confirm for Decline {
    async fn confirm(&mut self, _prompt: &str) -> bool {
        false
    }
}

fn backend(server: &FakeBackend, shape: PayloadShape) -> SharedBackend {
    Arc::new(server.client(shape))
}

async fn next_outcome(rx: &mut tokio::sync::mpsc::UnboundedReceiver<PollOutcome>) -> PollOutcome {
    tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("no poll outcome within 5s")
        .expect("poller channel closed")
}

#[tokio::test]
async fn poor_posture_renders_with_server_label() {
    let server = FakeBackend::nested(nested_body(45.0)).await;
    let (poller, mut rx) =
        StatusPoller::new(backend(&server, PayloadShape::Auto), Duration::from_secs(1));

    let handle = poller.start();
    let outcome = next_outcome(&mut rx).await;
    handle.stop().await;

    let mut view = DashboardView::new();
    view.apply(&outcome, Local::now());

    assert_eq!(view.posture_score, "45/100");
    assert_eq!(view.posture_band, PostureBand::Poor);
    assert_eq!(view.posture_bar_width, 45.0);
    assert!(view.posture_bar_classes.contains(&"poor"));
    assert_eq!(view.posture_status, "Needs improvement");
    assert_eq!(view.connection_status, CONNECTED_LABEL);
}

#[tokio::test]
async fn legacy_backend_renders_band_message() {
    let server = FakeBackend::flat(flat_body(85.0)).await;
    let client = server.client(PayloadShape::Auto);
    let outcome = StatusPoller::fetch(&client).await;

    let mut view = DashboardView::new();
    view.apply(&outcome, Local::now());

    assert_eq!(view.posture_band, PostureBand::Excellent);
    assert_eq!(view.posture_status, "Excellent posture");
    assert_eq!(view.coding_time, "12 min");
    assert_eq!(view.typing_speed, "240 keys/min");
    assert!(view.break_suggested);
}

#[tokio::test]
async fn outage_keeps_last_values_then_recovers() {
    let server = FakeBackend::nested(nested_body(82.0)).await;
    let (poller, mut rx) =
        StatusPoller::new(backend(&server, PayloadShape::Auto), Duration::from_millis(100));
    let mut view = DashboardView::new();

    let handle = poller.start();
    view.apply(&next_outcome(&mut rx).await, Local::now());
    assert_eq!(view.posture_band, PostureBand::Excellent);

    server
        .state
        .set_status(StatusMode::Error(StatusCode::INTERNAL_SERVER_ERROR));
    loop {
        let outcome = next_outcome(&mut rx).await;
        view.apply(&outcome, Local::now());
        if !outcome.is_connected() {
            break;
        }
    }
    assert_eq!(view.connection_status, DISCONNECTED_LABEL);
    assert!(view.indicator_classes.contains(&"disconnected"));
    assert_eq!(view.posture_score, "82/100");

    server.state.set_status(StatusMode::Json(nested_body(61.0)));
    loop {
        let outcome = next_outcome(&mut rx).await;
        view.apply(&outcome, Local::now());
        if outcome.is_connected() {
            break;
        }
    }
    handle.stop().await;

    assert_eq!(view.connection_status, CONNECTED_LABEL);
    assert_eq!(view.posture_band, PostureBand::Good);
}

#[tokio::test]
async fn malformed_body_counts_as_disconnected() {
    let server = FakeBackend::start("/api", StatusMode::Malformed).await;
    let (poller, mut rx) =
        StatusPoller::new(backend(&server, PayloadShape::Auto), Duration::from_secs(1));

    poller.poll_once();
    assert!(!next_outcome(&mut rx).await.is_connected());
}

#[tokio::test]
async fn empty_payload_renders_defaults() {
    let server = FakeBackend::nested(json!({})).await;
    let (poller, mut rx) =
        StatusPoller::new(backend(&server, PayloadShape::Auto), Duration::from_secs(1));

    poller.poll_once();
    let mut view = DashboardView::new();
    view.apply(&next_outcome(&mut rx).await, Local::now());

    assert_eq!(view.posture_score, "0/100");
    assert_eq!(view.posture_band, PostureBand::Calibrating);
    assert_eq!(view.coding_time, "0 min");
    assert_eq!(view.stress_level, "Low");
    assert_eq!(view.breaks_taken, "0");
    assert_eq!(view.typing_speed, "0 keys/min");
}

#[tokio::test]
async fn break_posts_once_notifies_and_repolls_once() {
    let server = FakeBackend::nested(nested_body(70.0)).await;
    let shared = backend(&server, PayloadShape::Auto);
    let (poller, mut rx) = StatusPoller::new(shared.clone(), Duration::from_secs(60));
    let tray = NotificationTray::new(Duration::from_secs(3));
    let dispatcher = ActionDispatcher::new(shared, poller, tray.clone());

    assert_eq!(dispatcher.take_break().await, ActionOutcome::Completed);
    assert_eq!(tray.active().await, vec!["Break recorded!"]);

    assert!(next_outcome(&mut rx).await.is_connected());
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(rx.try_recv().is_err());

    assert_eq!(server.state.break_calls(), 1);
    assert_eq!(server.state.status_calls(), 1);
}

#[tokio::test]
async fn unsuccessful_break_shows_nothing() {
    let server = FakeBackend::nested(nested_body(70.0)).await;
    server.state.set_action(ActionMode::Unavailable);
    let shared = backend(&server, PayloadShape::Auto);
    let (poller, mut rx) = StatusPoller::new(shared.clone(), Duration::from_secs(60));
    let tray = NotificationTray::new(Duration::from_secs(3));
    let dispatcher = ActionDispatcher::new(shared, poller, tray.clone());

    let outcome = dispatcher.take_break().await;
    assert!(matches!(outcome, ActionOutcome::Rejected { .. }));

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(tray.is_empty().await);
    assert!(rx.try_recv().is_err());
    assert_eq!(server.state.status_calls(), 0);
}

#[tokio::test]
async fn reset_requires_confirmation() {
    let server = FakeBackend::nested(nested_body(70.0)).await;
    let shared = backend(&server, PayloadShape::Auto);
    let (poller, mut rx) = StatusPoller::new(shared.clone(), Duration::from_secs(60));
    let tray = NotificationTray::new(Duration::from_secs(3));
    let dispatcher = ActionDispatcher::new(shared, poller, tray.clone());

    assert_eq!(dispatcher.reset_stats(&mut Decline).await, ActionOutcome::Declined);
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(server.state.reset_calls(), 0);
    assert!(tray.is_empty().await);

    assert!(dispatcher.reset_stats(&mut AssumeYes).await.is_completed());
    assert_eq!(tray.active().await, vec!["Stats reset!"]);
    assert!(next_outcome(&mut rx).await.is_connected());
    assert_eq!(server.state.reset_calls(), 1);
}

#[tokio::test]
async fn watch_session_over_http() {
    let server = FakeBackend::nested(nested_body(65.0)).await;
    let mut config = Config::default();
    config.poller.interval_ms = 50;

    let session = DashboardSession::new(backend(&server, PayloadShape::Auto), &config, Vec::new());
    let shutdown = CancellationToken::new();
    let trigger = shutdown.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(400)).await;
        trigger.cancel();
    });

    let input: &[u8] = b"b\nr\ny\n";
    let view = tokio::time::timeout(Duration::from_secs(5), session.run(input, shutdown))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(view.connected, Some(true));
    assert_eq!(view.posture_band, PostureBand::Good);
    assert_eq!(server.state.break_calls(), 1);
    assert_eq!(server.state.reset_calls(), 1);
    assert!(server.state.status_calls() >= 3);
}
