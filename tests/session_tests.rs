// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for the capture session and its view

mod common;

use common::{HEIGHT, RecordingUploader, WIDTH, app, config, send};
use std::sync::Arc;
use stillcam::app::{Command, Control, Message, PermissionState, Presentation, StatusLine};
use stillcam::backends::camera::{FacingMode, MediaStream, StreamConstraints};
use stillcam::backends::camera::test_pattern::TestPatternProvider;
use stillcam::config::{AcquireTrigger, Config};
use stillcam::constants::CAMERA_UNAVAILABLE_MESSAGE;

#[tokio::test]
async fn test_stream_present_iff_granted() {
    let dir = tempfile::tempdir().unwrap();
    let provider = TestPatternProvider::new(WIDTH, HEIGHT).gated();
    let mut app = app(
        &provider,
        Arc::new(RecordingUploader::default()),
        &config(dir.path(), AcquireTrigger::OnStart),
    );

    let check = |app: &stillcam::CaptureApp<TestPatternProvider>| {
        let session = app.session();
        assert_eq!(
            session.stream().is_some(),
            session.permission() == PermissionState::Granted
        );
    };

    check(&app);
    assert_eq!(app.session().permission(), PermissionState::NotRequested);

    let Command::Acquire(request) = app.update(Message::Start) else {
        panic!("start should request the camera");
    };
    assert_eq!(app.session().permission(), PermissionState::Requesting);
    check(&app);

    provider.release();
    let (ticket, result) = request.resolve().await;
    let _ = app.update(Message::CameraAcquired(ticket, result));
    assert_eq!(app.session().permission(), PermissionState::Granted);
    check(&app);

    send(&mut app, Message::Close).await;
    assert_eq!(app.session().permission(), PermissionState::NotRequested);
    check(&app);
}

#[tokio::test]
async fn test_denied_shows_fixed_message_without_take_still() {
    let dir = tempfile::tempdir().unwrap();
    let provider = TestPatternProvider::new(WIDTH, HEIGHT).failing();
    let mut app = app(
        &provider,
        Arc::new(RecordingUploader::default()),
        &config(dir.path(), AcquireTrigger::OnStart),
    );

    send(&mut app, Message::Start).await;

    assert_eq!(app.session().permission(), PermissionState::Denied);
    assert!(app.session().stream().is_none());
    let view = app.view();
    assert_eq!(
        view.status,
        Some(StatusLine::Error(CAMERA_UNAVAILABLE_MESSAGE.to_string()))
    );
    assert!(!view.has_control(Control::TakeStill));
    assert!(view.has_control(Control::OpenCamera));
    assert_eq!(view.preview, None);
}

#[tokio::test]
async fn test_capture_outside_grant_yields_nothing() {
    let dir = tempfile::tempdir().unwrap();

    // Idle
    let provider = TestPatternProvider::new(WIDTH, HEIGHT);
    let mut idle = app(
        &provider,
        Arc::new(RecordingUploader::default()),
        &config(dir.path(), AcquireTrigger::OnDemand),
    );
    send(&mut idle, Message::Start).await;
    send(&mut idle, Message::TakeStill).await;
    assert!(idle.pending_frame().is_none());
    assert!(idle.toasts().is_empty());

    // Requesting
    let gated = TestPatternProvider::new(WIDTH, HEIGHT).gated();
    let mut requesting = app(
        &gated,
        Arc::new(RecordingUploader::default()),
        &config(dir.path(), AcquireTrigger::OnStart),
    );
    let _pending = requesting.update(Message::Start);
    let _ = requesting.update(Message::TakeStill);
    assert!(requesting.pending_frame().is_none());

    // Denied
    let failing = TestPatternProvider::new(WIDTH, HEIGHT).failing();
    let mut denied = app(
        &failing,
        Arc::new(RecordingUploader::default()),
        &config(dir.path(), AcquireTrigger::OnStart),
    );
    send(&mut denied, Message::Start).await;
    send(&mut denied, Message::TakeStill).await;
    assert!(denied.pending_frame().is_none());
    assert!(denied.toasts().is_empty());
}

#[tokio::test]
async fn test_capture_matches_stream_resolution() {
    let dir = tempfile::tempdir().unwrap();
    let provider = TestPatternProvider::new(WIDTH, HEIGHT);
    let mut app = app(
        &provider,
        Arc::new(RecordingUploader::default()),
        &config(dir.path(), AcquireTrigger::OnStart),
    );
    send(&mut app, Message::Start).await;
    send(&mut app, Message::TakeStill).await;

    let settings = app.session().stream().unwrap().settings();
    let still = app.pending_frame().unwrap();
    let decoded = image::load_from_memory(&still.png).unwrap();

    assert_eq!(
        (decoded.width(), decoded.height()),
        (settings.width, settings.height)
    );
    assert!(still.data_url().starts_with("data:image/png;base64,"));
}

#[tokio::test]
async fn test_capture_toasts_and_keeps_stream_running() {
    let dir = tempfile::tempdir().unwrap();
    let provider = TestPatternProvider::new(WIDTH, HEIGHT);
    let mut app = app(
        &provider,
        Arc::new(RecordingUploader::default()),
        &config(dir.path(), AcquireTrigger::OnStart),
    );
    send(&mut app, Message::Start).await;
    assert!(app.view().has_control(Control::TakeStill));

    send(&mut app, Message::TakeStill).await;
    assert_eq!(app.toasts().len(), 1);
    assert!(app.toasts().front().unwrap().action.is_some());
    assert_eq!(provider.live_track_count(), 1);
    let first = app.pending_frame().unwrap().id;

    send(&mut app, Message::TakeStill).await;
    assert_ne!(app.pending_frame().unwrap().id, first);
    assert_eq!(app.toasts().len(), 1);
    assert_eq!(app.session().permission(), PermissionState::Granted);
}

#[tokio::test]
async fn test_close_from_full_screen_returns_to_inline_idle() {
    let dir = tempfile::tempdir().unwrap();
    let provider = TestPatternProvider::new(WIDTH, HEIGHT);
    let mut app = app(
        &provider,
        Arc::new(RecordingUploader::default()),
        &config(dir.path(), AcquireTrigger::OnStart),
    );
    send(&mut app, Message::Start).await;
    assert_eq!(app.session().presentation(), Presentation::FullScreen);
    assert_eq!(
        app.view().controls,
        vec![Control::TakeStill, Control::Close]
    );

    send(&mut app, Message::Close).await;

    assert_eq!(provider.live_track_count(), 0);
    assert_eq!(app.session().presentation(), Presentation::Inline);
    let view = app.view();
    assert_eq!(view.controls, vec![Control::OpenCamera]);
    assert_eq!(view.preview, None);
}

#[tokio::test]
async fn test_teardown_stops_tracks_from_every_state() {
    let dir = tempfile::tempdir().unwrap();

    // Granted, then shut down
    let provider = TestPatternProvider::new(WIDTH, HEIGHT);
    let mut granted = app(
        &provider,
        Arc::new(RecordingUploader::default()),
        &config(dir.path(), AcquireTrigger::OnStart),
    );
    send(&mut granted, Message::Start).await;
    assert_eq!(provider.live_track_count(), 1);
    send(&mut granted, Message::Shutdown).await;
    assert_eq!(provider.live_track_count(), 0);

    // Granted, then dropped
    let provider = TestPatternProvider::new(WIDTH, HEIGHT);
    let mut dropped = app(
        &provider,
        Arc::new(RecordingUploader::default()),
        &config(dir.path(), AcquireTrigger::OnStart),
    );
    send(&mut dropped, Message::Start).await;
    drop(dropped);
    assert_eq!(provider.live_track_count(), 0);

    // Requesting, shut down, then the grant arrives late
    let gated = TestPatternProvider::new(WIDTH, HEIGHT).gated();
    let mut pending = app(
        &gated,
        Arc::new(RecordingUploader::default()),
        &config(dir.path(), AcquireTrigger::OnStart),
    );
    let Command::Acquire(request) = pending.update(Message::Start) else {
        panic!("start should request the camera");
    };
    send(&mut pending, Message::Shutdown).await;
    gated.release();
    let (ticket, result) = request.resolve().await;
    let _ = pending.update(Message::CameraAcquired(ticket, result));

    assert_eq!(gated.live_track_count(), 0);
    assert_eq!(pending.session().permission(), PermissionState::NotRequested);
}

#[tokio::test]
async fn test_on_demand_waits_for_open_camera() {
    let dir = tempfile::tempdir().unwrap();
    let provider = TestPatternProvider::new(WIDTH, HEIGHT);
    let mut app = app(
        &provider,
        Arc::new(RecordingUploader::default()),
        &config(dir.path(), AcquireTrigger::OnDemand),
    );

    assert!(app.update(Message::Start).is_none());
    assert_eq!(provider.acquisitions(), 0);
    assert_eq!(app.view().controls, vec![Control::OpenCamera]);

    send(&mut app, Message::OpenCamera).await;
    assert_eq!(app.session().permission(), PermissionState::Granted);
    assert_eq!(provider.acquisitions(), 1);

    // Re-requesting while granted is a no-op
    assert!(app.update(Message::OpenCamera).is_none());
    assert_eq!(provider.acquisitions(), 1);
}

#[tokio::test]
async fn test_requesting_view_has_status_and_no_controls() {
    let dir = tempfile::tempdir().unwrap();
    let provider = TestPatternProvider::new(WIDTH, HEIGHT).gated();
    let mut app = app(
        &provider,
        Arc::new(RecordingUploader::default()),
        &config(dir.path(), AcquireTrigger::OnStart),
    );
    let _request = app.update(Message::Start);

    let view = app.view();
    assert_eq!(view.status, Some(StatusLine::Requesting));
    assert!(view.controls.is_empty());
    assert_eq!(view.title, "Camera Access");
}

#[tokio::test]
async fn test_default_constraints_reach_the_provider() {
    let dir = tempfile::tempdir().unwrap();
    let provider = TestPatternProvider::new(WIDTH, HEIGHT);
    let mut app = app(
        &provider,
        Arc::new(RecordingUploader::default()),
        &config(dir.path(), AcquireTrigger::OnStart),
    );
    assert_eq!(provider.last_constraints(), None);

    send(&mut app, Message::Start).await;

    assert_eq!(
        provider.last_constraints(),
        Some(StreamConstraints {
            facing_mode: FacingMode::Environment,
            continuous_focus: true,
        })
    );
}

#[tokio::test]
async fn test_configured_constraints_reach_the_provider() {
    let dir = tempfile::tempdir().unwrap();
    let provider = TestPatternProvider::new(WIDTH, HEIGHT);
    let config = Config {
        facing_mode: FacingMode::User,
        continuous_focus: false,
        ..config(dir.path(), AcquireTrigger::OnDemand)
    };
    let mut app = app(&provider, Arc::new(RecordingUploader::default()), &config);

    send(&mut app, Message::OpenCamera).await;

    assert_eq!(app.session().permission(), PermissionState::Granted);
    assert_eq!(
        provider.last_constraints(),
        Some(StreamConstraints {
            facing_mode: FacingMode::User,
            continuous_focus: false,
        })
    );
}

#[tokio::test]
async fn test_exit_full_screen_keeps_stream() {
    let dir = tempfile::tempdir().unwrap();
    let provider = TestPatternProvider::new(WIDTH, HEIGHT);
    let mut app = app(
        &provider,
        Arc::new(RecordingUploader::default()),
        &config(dir.path(), AcquireTrigger::OnStart),
    );
    send(&mut app, Message::Start).await;
    assert_eq!(app.view().preview, Some(Presentation::FullScreen));

    send(&mut app, Message::ExitFullScreen).await;

    assert_eq!(app.view().preview, Some(Presentation::Inline));
    assert_eq!(
        app.view().controls,
        vec![Control::TakeStill, Control::EnterFullScreen, Control::Close]
    );
    assert_eq!(provider.live_track_count(), 1);
}
