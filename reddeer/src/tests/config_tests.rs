//! Tests for wait defaults and the user profile

use crate::config::{self, WaitDefaults, POLL_INTERVAL_ENV, WAIT_TIMEOUT_ENV};
use crate::user_profile::{UserProfile, PROGRAM_ARGS_KEY};
use crate::{RedDeerError, TimePeriod};
use std::collections::HashMap;
use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;

#[test]
fn test_builtin_wait_defaults() {
    let defaults = WaitDefaults::default();
    assert_eq!(defaults.timeout, TimePeriod::DEFAULT);
    assert_eq!(defaults.timeout.as_secs(), 10);
    assert_eq!(defaults.poll_interval, Duration::from_millis(500));
    // Nothing in the unit tests calls `config::init`.
    assert_eq!(config::wait_defaults(), defaults);
}

#[test]
fn test_wait_defaults_from_lookup() {
    let vars: HashMap<&str, &str> = [(WAIT_TIMEOUT_ENV, "30"), (POLL_INTERVAL_ENV, " 100 ")].into();
    let defaults = WaitDefaults::from_lookup(|key| vars.get(key).map(|v| v.to_string())).unwrap();
    assert_eq!(defaults.timeout, TimePeriod::seconds(30));
    assert_eq!(defaults.poll_interval, Duration::from_millis(100));

    let partial = WaitDefaults::from_lookup(|key| {
        (key == POLL_INTERVAL_ENV).then(|| "20".to_string())
    })
    .unwrap();
    assert_eq!(partial.timeout, TimePeriod::DEFAULT);
    assert_eq!(partial.poll_interval, Duration::from_millis(20));
}

#[test]
fn test_wait_defaults_reject_garbage() {
    let result = WaitDefaults::from_lookup(|key| (key == WAIT_TIMEOUT_ENV).then(|| "soon".to_string()));
    match result {
        Err(RedDeerError::Config(message)) => assert!(message.contains(WAIT_TIMEOUT_ENV)),
        other => panic!("expected Config error, got {other:?}"),
    }
}

#[test]
fn test_time_periods() {
    assert_eq!(TimePeriod::NONE.as_secs(), 0);
    assert_eq!(TimePeriod::SHORT.as_secs(), 1);
    assert_eq!(TimePeriod::MEDIUM.as_secs(), 20);
    assert_eq!(TimePeriod::LONG.as_secs(), 60);
    assert_eq!(TimePeriod::VERY_LONG.as_secs(), 180);
    assert_eq!(TimePeriod::from(Duration::from_millis(2500)), TimePeriod::seconds(2));
    assert_eq!(Duration::from(TimePeriod::SHORT), Duration::from_secs(1));
    assert_eq!(TimePeriod::MEDIUM.to_string(), "20 s");
}

#[test]
fn test_user_profile_parse() {
    let profile = UserProfile::parse(
        "# comment\n\
         ! another comment\n\
         \n\
         vmArgs = -Xmx1g -Dfoo=bar\n\
         programArgs: -clean\n\
         =orphan\n\
         no separator line\n",
    );
    assert_eq!(profile.vm_args(), Some("-Xmx1g -Dfoo=bar"));
    assert_eq!(profile.program_args(), Some("-clean"));
    assert_eq!(profile.property("missing"), None);
    assert_eq!(profile.len(), 2);
}

#[test]
fn test_user_profile_load_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{PROGRAM_ARGS_KEY}=-data /tmp/ws").unwrap();
    let profile = UserProfile::load(file.path()).unwrap();
    assert_eq!(profile.program_args(), Some("-data /tmp/ws"));
}

#[test]
fn test_user_profile_missing_file_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let profile = UserProfile::load(&dir.path().join(".reddeer")).unwrap();
    assert!(profile.is_empty());

    // A directory cannot be read as a file.
    assert!(UserProfile::load(dir.path()).is_err());
    assert!(UserProfile::load_or_empty(dir.path()).is_empty());
}
