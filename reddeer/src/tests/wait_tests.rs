//! Tests for the polling wait engine and the stock conditions

use super::DisplayFixture;
use crate::wait::{
    FnCondition, Not, ShellIsActive, ShellIsAvailable, WaitState, WidgetIsFound,
    WidgetTextMatches,
};
use crate::{
    Matcher, RedDeerError, Selector, TextMatcher, TimePeriod, WaitCondition, WaitUntil,
    WaitWhile, WidgetKind, WidgetSpec,
};
use std::time::{Duration, Instant};

#[test]
fn test_satisfied_condition_returns_without_sleeping() {
    let mut polls = 0;
    let started = Instant::now();
    let mut wait = WaitUntil::new(FnCondition::new("always true", || {
        polls += 1;
        true
    }))
    .timeout(TimePeriod::LONG)
    .poll_interval(Duration::from_secs(5));
    assert_eq!(wait.state(), WaitState::Idle);
    assert!(wait.wait().unwrap());
    assert_eq!(wait.state(), WaitState::Satisfied);
    drop(wait);
    assert_eq!(polls, 1);
    assert!(started.elapsed() < Duration::from_secs(1));
}

#[test]
fn test_timeout_raises_after_full_timeout() {
    let timeout = Duration::from_millis(600);
    let started = Instant::now();
    let mut wait = WaitUntil::new(FnCondition::new("never", || false))
        .timeout(timeout)
        .poll_interval(Duration::from_millis(250));
    let err = wait.wait().unwrap_err();
    let elapsed = started.elapsed();

    assert_eq!(wait.state(), WaitState::TimedOut);
    assert!(elapsed >= timeout, "raised early after {elapsed:?}");
    assert!(elapsed < timeout + Duration::from_millis(400), "raised late after {elapsed:?}");
    match err {
        RedDeerError::WaitTimeoutExpired {
            description,
            detail,
            ..
        } => {
            assert_eq!(description, "never");
            assert_eq!(detail, "never is not fulfilled");
        }
        other => panic!("expected WaitTimeoutExpired, got {other:?}"),
    }
}

#[test]
fn test_timeout_message_format() {
    let err = WaitUntil::new(FnCondition::new("dialog open", || false))
        .timeout(TimePeriod::NONE)
        .wait()
        .unwrap_err();
    assert_eq!(err.to_string(), "Timeout after: 0 s.: dialog open is not fulfilled");
}

#[test]
fn test_timeout_message_keeps_sub_second_precision() {
    let err = WaitUntil::new(FnCondition::new("dialog open", || false))
        .timeout(Duration::from_millis(600))
        .poll_interval(Duration::from_millis(100))
        .wait()
        .unwrap_err();
    assert_eq!(err.to_string(), "Timeout after: 600ms.: dialog open is not fulfilled");

    let err = WaitUntil::new(FnCondition::new("dialog open", || false))
        .timeout(Duration::from_millis(1500))
        .poll_interval(Duration::from_millis(500))
        .wait()
        .unwrap_err();
    assert_eq!(err.to_string(), "Timeout after: 1.5s.: dialog open is not fulfilled");
}

#[test]
fn test_suppressed_timeout_returns_false() {
    let mut wait = WaitUntil::new(FnCondition::new("never", || false))
        .timeout(Duration::from_millis(50))
        .poll_interval(Duration::from_millis(10))
        .suppress_timeout();
    assert!(!wait.wait().unwrap());
    assert_eq!(wait.state(), WaitState::TimedOut);
}

#[test]
fn test_condition_becoming_true_midway() {
    let started = Instant::now();
    let mut polls = 0;
    let satisfied = WaitUntil::new(FnCondition::new("third poll", || {
        polls += 1;
        polls >= 3
    }))
    .timeout(TimePeriod::SHORT)
    .poll_interval(Duration::from_millis(20))
    .wait()
    .unwrap();
    assert!(satisfied);
    assert_eq!(polls, 3);
    assert!(started.elapsed() >= Duration::from_millis(40));
}

#[test]
fn test_wait_while() {
    let mut remaining = 3;
    assert!(WaitWhile::new(FnCondition::new("jobs running", || {
        remaining -= 1;
        remaining > 0
    }))
    .poll_interval(Duration::from_millis(5))
    .wait()
    .unwrap());

    let err = WaitWhile::new(FnCondition::new("busy", || true))
        .timeout(Duration::from_millis(30))
        .poll_interval(Duration::from_millis(5))
        .wait()
        .unwrap_err();
    assert_eq!(err.to_string(), "Timeout after: 30ms.: busy is still fulfilled");
}

#[test]
fn test_not_swaps_messages() {
    let not = Not(FnCondition::new("spinner visible", || true));
    assert_eq!(not.description(), "not spinner visible");
    assert_eq!(not.error_message_until(), "spinner visible is still fulfilled");
    assert!(!WaitUntil::new(not)
        .timeout(Duration::ZERO)
        .suppress_timeout()
        .wait()
        .unwrap());
}

#[test]
fn test_widget_is_found_after_delayed_creation() {
    let fixture = DisplayFixture::new();
    let shell = fixture.open(WidgetSpec::shell("Slow"));
    fixture
        .display
        .timer_exec(Duration::from_millis(150), move |display| {
            display
                .add_child(&shell, WidgetSpec::button("Ready"))
                .expect("add child");
        });

    let selector = Selector::from(Matcher::text("Ready"));
    let mut wait = WaitUntil::new(WidgetIsFound::new(fixture.session.resolver(), selector))
        .timeout(TimePeriod::SHORT)
        .poll_interval(Duration::from_millis(20));
    assert!(wait.wait().unwrap());
    let button = wait.into_condition().into_widget().unwrap();
    assert_eq!(button.kind(), WidgetKind::Button);
}

#[test]
fn test_shell_conditions() {
    let fixture = DisplayFixture::new();
    fixture.open(WidgetSpec::shell("Main"));
    fixture.display.timer_exec(Duration::from_millis(100), |display| {
        display
            .open_shell(WidgetSpec::shell("Progress"))
            .expect("open shell");
    });

    let available = ShellIsAvailable::new(fixture.session.shells(), TextMatcher::equals("Progress"));
    assert!(WaitUntil::new(available)
        .timeout(TimePeriod::SHORT)
        .poll_interval(Duration::from_millis(10))
        .wait()
        .unwrap());

    let active = ShellIsActive::new(fixture.session.shells(), TextMatcher::equals("Progress"));
    assert!(fixture.session.wait_until(active).unwrap());
}

#[test]
fn test_widget_text_matches_reports_last_text() {
    let fixture = DisplayFixture::new();
    fixture.open(WidgetSpec::shell("Status").child(WidgetSpec::label("Working")));
    let label = fixture.session.find(Matcher::kind(WidgetKind::Label)).unwrap();
    let condition = WidgetTextMatches::new(
        fixture.session.dispatcher().clone(),
        label,
        TextMatcher::equals("Done"),
    );
    let err = WaitUntil::new(condition)
        .timeout(Duration::from_millis(40))
        .poll_interval(Duration::from_millis(10))
        .wait()
        .unwrap_err();
    assert!(err.to_string().contains("last text was 'Working'"), "{err}");
}

#[test]
fn test_fatal_condition_error_ends_wait_early() {
    let fixture = DisplayFixture::new();
    let shells = fixture.session.shells();
    fixture.display.dispose();

    let started = Instant::now();
    let err = WaitUntil::new(ShellIsAvailable::new(shells, TextMatcher::equals("Any")))
        .timeout(TimePeriod::LONG)
        .wait()
        .unwrap_err();
    assert!(matches!(err, RedDeerError::DisplayUnavailable(_)));
    assert!(started.elapsed() < Duration::from_secs(1));
}

#[test]
fn test_bad_regex_ends_wait_early() {
    let fixture = DisplayFixture::new();
    fixture.open(WidgetSpec::shell("Main"));
    let err = WaitUntil::new(ShellIsAvailable::new(
        fixture.session.shells(),
        TextMatcher::regex("(["),
    ))
    .timeout(TimePeriod::LONG)
    .wait()
    .unwrap_err();
    assert!(matches!(err, RedDeerError::UnmatchedFormat(_)));
}
