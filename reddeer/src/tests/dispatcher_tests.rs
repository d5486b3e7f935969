//! Tests for UI-thread dispatch

use super::DisplayFixture;
use crate::{Matcher, RedDeerError, WidgetKind, WidgetSpec};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[test]
fn test_write_then_read_round_trip() {
    let fixture = DisplayFixture::new();
    fixture.open(WidgetSpec::shell("Editor").child(WidgetSpec::text("")));
    let text = fixture.session.find(Matcher::kind(WidgetKind::Text)).unwrap();
    let widgets = fixture.session.widgets();

    widgets.set_text(&text, "hello").unwrap();
    assert_eq!(widgets.text(&text).unwrap(), "hello");

    // Same widget read from another test thread.
    let other = {
        let widgets = widgets.clone();
        let text = text.clone();
        thread::spawn(move || widgets.text(&text)).join().unwrap()
    };
    assert_eq!(other.unwrap(), "hello");
}

#[test]
fn test_operations_run_on_ui_thread() {
    let fixture = DisplayFixture::new();
    let engine = fixture.session.engine().clone();
    assert!(!fixture.session.dispatcher().is_ui_thread());
    let (on_ui, name) = fixture
        .session
        .run_on_ui_thread(move || {
            Ok((
                engine.is_ui_thread(),
                thread::current().name().map(str::to_string),
            ))
        })
        .unwrap();
    assert!(on_ui);
    assert_eq!(name.as_deref(), Some("reddeer-ui"));
}

#[test]
fn test_raw_access_off_ui_thread_is_rejected() {
    let fixture = DisplayFixture::new();
    let shell = fixture.open(WidgetSpec::shell("Raw"));
    assert!(matches!(
        shell.raw().text(),
        Err(RedDeerError::InvalidThreadAccess(_))
    ));
}

#[test]
fn test_errors_cross_back_unchanged() {
    let fixture = DisplayFixture::new();
    let result: Result<(), _> = fixture.session.run_on_ui_thread(|| {
        Err(RedDeerError::WidgetNotFound("from the UI thread".to_string()))
    });
    match result {
        Err(RedDeerError::WidgetNotFound(message)) => assert_eq!(message, "from the UI thread"),
        other => panic!("expected WidgetNotFound, got {other:?}"),
    }
}

#[test]
fn test_panic_becomes_error_and_loop_survives() {
    let fixture = DisplayFixture::new();
    let result: Result<(), _> = fixture
        .session
        .run_on_ui_thread(|| panic!("boom in handler"));
    match result {
        Err(RedDeerError::OperationPanicked(message)) => assert!(message.contains("boom in handler")),
        other => panic!("expected OperationPanicked, got {other:?}"),
    }
    assert_eq!(fixture.session.run_on_ui_thread(|| Ok(7)).unwrap(), 7);
}

#[test]
fn test_nested_dispatch_runs_inline() {
    let fixture = DisplayFixture::new();
    let dispatcher = fixture.session.dispatcher().clone();
    let value = fixture
        .session
        .run_on_ui_thread(move || dispatcher.run_on_ui_thread(|| Ok(41)).map(|v| v + 1))
        .unwrap();
    assert_eq!(value, 42);
}

#[test]
fn test_submission_order_is_preserved() {
    let fixture = DisplayFixture::new();
    let seen = Arc::new(Mutex::new(Vec::new()));
    for i in 0..20 {
        let seen = seen.clone();
        fixture
            .session
            .post_on_ui_thread(move || {
                seen.lock().unwrap().push(i);
                Ok(())
            })
            .unwrap();
    }
    // A synchronous call queued after the posts sees all of them done.
    let snapshot = {
        let seen = seen.clone();
        fixture
            .session
            .run_on_ui_thread(move || Ok(seen.lock().unwrap().clone()))
            .unwrap()
    };
    assert_eq!(snapshot, (0..20).collect::<Vec<_>>());
}

#[test]
fn test_post_returns_before_completion() {
    let fixture = DisplayFixture::new();
    let done = Arc::new(AtomicUsize::new(0));
    let flag = done.clone();
    fixture
        .session
        .post_on_ui_thread(move || {
            thread::sleep(Duration::from_millis(200));
            flag.store(1, Ordering::SeqCst);
            Ok(())
        })
        .unwrap();
    assert_eq!(done.load(Ordering::SeqCst), 0);
    fixture.session.run_on_ui_thread(|| Ok(())).unwrap();
    assert_eq!(done.load(Ordering::SeqCst), 1);
}

#[test]
fn test_disposed_display_is_unavailable() {
    let fixture = DisplayFixture::new();
    let shell = fixture.open(WidgetSpec::shell("Gone"));
    fixture.display.dispose();

    let result = fixture.session.run_on_ui_thread(|| Ok(()));
    let err = result.unwrap_err();
    assert!(matches!(err, RedDeerError::DisplayUnavailable(_)));
    assert!(err.is_fatal());
    assert!(matches!(
        fixture.session.post_on_ui_thread(|| Ok(())),
        Err(RedDeerError::DisplayUnavailable(_))
    ));
    assert!(shell.is_disposed());
}
