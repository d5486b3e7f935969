//! Tests for selector parsing and resolution through selectors

use super::DisplayFixture;
use crate::{Matcher, RedDeerError, Selector, WidgetKind, WidgetSpec};

#[test]
fn test_parse_prefixed_parts() {
    let selector: Selector = "kind:button >> text:OK".parse().unwrap();
    assert_eq!(selector.index(), 0);
    assert!(selector.root().is_none());
    assert_eq!(
        selector.to_string(),
        "[kind is Button and text is equal to 'OK'] index 0"
    );
}

#[test]
fn test_parse_pipe_shorthand_and_nth() {
    let selector = Selector::parse("button|&Finish >> nth:2").unwrap();
    assert_eq!(selector.index(), 2);
    assert_eq!(selector.matchers().len(), 2);
    assert!(matches!(selector.matchers()[0], Matcher::Kind(WidgetKind::Button)));

    let selector = Selector::parse("kind:combo >> nth=1").unwrap();
    assert_eq!(selector.index(), 1);
}

#[test]
fn test_parse_keeps_colons_in_values() {
    let selector = Selector::parse("label:Name:").unwrap();
    assert_eq!(selector.to_string(), "[label is equal to 'Name:'] index 0");
}

#[test]
fn test_parse_rejects_bad_input() {
    for input in ["", "kind:button >>", "frobnicate", "color:red", "nth:x", "kind:slider"] {
        let result = Selector::parse(input);
        assert!(
            matches!(result, Err(RedDeerError::InvalidArgument(_))),
            "expected InvalidArgument for {input:?}, got {result:?}"
        );
    }
}

#[test]
fn test_selector_builder() {
    let selector = Selector::from(Matcher::kind(WidgetKind::Text))
        .and(Matcher::text("x"))
        .nth(3);
    assert_eq!(selector.matchers().len(), 2);
    assert_eq!(selector.index(), 3);
}

#[test]
fn test_find_by_parsed_selector() {
    let fixture = DisplayFixture::new();
    fixture.open(WidgetSpec::shell("Wizard").children([
        WidgetSpec::button("< &Back"),
        WidgetSpec::button("&Next >"),
        WidgetSpec::button("&Finish"),
        WidgetSpec::button("Cancel"),
    ]));

    let finish = fixture
        .session
        .find(Selector::parse("button|Finish").unwrap())
        .unwrap();
    assert_eq!(fixture.session.widgets().text(&finish).unwrap(), "&Finish");

    let third = fixture
        .session
        .find(Selector::parse("kind:button >> nth:2").unwrap())
        .unwrap();
    assert_eq!(third, finish);

    let all = fixture
        .session
        .find_all(Selector::parse("regex:^&?[A-Z]").unwrap())
        .unwrap();
    assert_eq!(all.len(), 3);
}

#[test]
fn test_find_within_root() {
    let fixture = DisplayFixture::new();
    let shell = fixture.open(WidgetSpec::shell("Groups").children([
        WidgetSpec::group("First").child(WidgetSpec::text("one")),
        WidgetSpec::group("Second").child(WidgetSpec::text("two")),
    ]));
    let second = fixture
        .session
        .resolver()
        .resolve(&[shell], &[Matcher::text("Second")], 0)
        .unwrap();

    let selector = Selector::from(Matcher::kind(WidgetKind::Text)).within(second);
    let text = fixture.session.find(selector).unwrap();
    assert_eq!(fixture.session.widgets().text(&text).unwrap(), "two");
}
