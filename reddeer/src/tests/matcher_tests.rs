//! Tests for text, version and widget matchers

use super::DisplayFixture;
use crate::matchers::{strip_mnemonic, Version, VersionExpression, VersionOperator};
use crate::{Matcher, RedDeerError, Style, TextMatcher, VersionMatcher, WidgetKind, WidgetSpec};
use proptest::prelude::*;

#[test]
fn test_mnemonic_matcher_strips_markers() {
    let mnemonic = TextMatcher::mnemonic("&Save");
    assert!(mnemonic.matches("Save").unwrap());
    assert!(mnemonic.matches("Sa&ve").unwrap());

    let exact = TextMatcher::equals("&Save");
    assert!(!exact.matches("Save").unwrap());
}

#[test]
fn test_strip_mnemonic_keeps_escaped_ampersand() {
    assert_eq!(strip_mnemonic("&Save && Close"), "Save & Close");
    assert_eq!(strip_mnemonic("plain"), "plain");
    assert_eq!(strip_mnemonic("trailing&"), "trailing");
}

#[test]
fn test_regex_matcher_compiles_lazily() {
    let bad = TextMatcher::regex("([unclosed");
    let err = bad.matches("anything").unwrap_err();
    assert!(matches!(err, RedDeerError::UnmatchedFormat(_)), "got {err:?}");

    let good = TextMatcher::regex("^Sa.e$");
    assert!(good.matches("Save").unwrap());
    assert!(!good.matches("Saved").unwrap());
}

#[test]
fn test_contains_and_custom_matchers() {
    assert!(TextMatcher::contains("ave").matches("Save").unwrap());
    let upper = TextMatcher::custom("is upper case", |s| s.chars().all(char::is_uppercase));
    assert!(upper.matches("OK").unwrap());
    assert!(!upper.matches("Ok").unwrap());
    assert_eq!(upper.to_string(), "is upper case");
}

#[test]
fn test_version_matcher_examples() {
    let at_least = VersionMatcher::new(">=1.1.0");
    assert!(at_least.matches("5.0.0").unwrap());
    assert!(!at_least.matches("1.0.0").unwrap());

    let half_open = VersionMatcher::new("[1.0;2.0)");
    assert!(half_open.matches("1.5").unwrap());
    assert!(half_open.matches("1.0").unwrap());
    assert!(!half_open.matches("2.0").unwrap());

    let open = VersionMatcher::new("(1.0;2.0]");
    assert!(!open.matches("1.0").unwrap());
    assert!(open.matches("2.0.0").unwrap());
}

#[test]
fn test_version_matcher_operators() {
    assert!(VersionMatcher::new(">1.0").matches("1.0.1").unwrap());
    assert!(!VersionMatcher::new(">1.0").matches("1.0.0").unwrap());
    assert!(VersionMatcher::new("<2").matches("1.9.9").unwrap());
    assert!(VersionMatcher::new("<=2").matches("2.0").unwrap());
    assert!(VersionMatcher::new("1.2").matches("1.2.0").unwrap());
    assert!(!VersionMatcher::new("1.2").matches("1.2.1").unwrap());
}

#[test]
fn test_version_matcher_reports_bad_input_at_match_time() {
    let matcher = VersionMatcher::new("[1.0;2.0");
    assert!(matches!(
        matcher.matches("1.5"),
        Err(RedDeerError::UnmatchedFormat(_))
    ));
    assert!(matches!(
        VersionMatcher::new(">=1.x").matches("1.5"),
        Err(RedDeerError::UnmatchedFormat(_))
    ));
    assert!(matches!(
        VersionMatcher::new(">=1.0").matches("latest"),
        Err(RedDeerError::UnmatchedFormat(_))
    ));
    assert!(matches!(
        VersionMatcher::new("[1.0]").matches("1.0"),
        Err(RedDeerError::UnmatchedFormat(_))
    ));
}

#[test]
fn test_version_expression_parse() {
    let expr = VersionExpression::parse("(1.0;2.0]").unwrap();
    assert_eq!(
        expr.operator,
        VersionOperator::Range {
            lower_inclusive: false,
            upper_inclusive: true
        }
    );
    assert_eq!(expr.operands.len(), 2);
    assert_eq!(expr.operands[1].components(), &[2, 0]);
}

proptest! {
    #[test]
    fn prop_trailing_zeros_do_not_change_version(parts in prop::collection::vec(0u64..1000, 1..5), zeros in 0usize..3) {
        let base = parts.iter().map(u64::to_string).collect::<Vec<_>>().join(".");
        let padded = format!("{base}{}", ".0".repeat(zeros));
        let a: Version = base.parse().unwrap();
        let b: Version = padded.parse().unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn prop_greater_or_equal_agrees_with_ordering(a in prop::collection::vec(0u64..50, 1..4), b in prop::collection::vec(0u64..50, 1..4)) {
        let join = |v: &[u64]| v.iter().map(u64::to_string).collect::<Vec<_>>().join(".");
        let (a_str, b_str) = (join(&a), join(&b));
        let ordered = a_str.parse::<Version>().unwrap() >= b_str.parse::<Version>().unwrap();
        let matched = VersionMatcher::new(format!(">={b_str}")).matches(&a_str).unwrap();
        prop_assert_eq!(ordered, matched);
    }
}

#[test]
fn test_widget_matchers_against_live_tree() {
    let fixture = DisplayFixture::new();
    let shell = fixture.open(
        WidgetSpec::shell("Matchers").children([
            WidgetSpec::label("&Name:"),
            WidgetSpec::text("John").with_tooltip("Your name"),
            WidgetSpec::check_box("&Remember me"),
            WidgetSpec::list(["a", "b"]).with_style(Style::MULTI),
        ]),
    );

    let resolver = fixture.session.resolver();
    let roots = vec![shell];

    let text = resolver
        .resolve(&roots, &[Matcher::kind(WidgetKind::Text)], 0)
        .unwrap();
    let accepted = |matcher: Matcher| {
        let widget = text.clone();
        fixture
            .session
            .run_on_ui_thread(move || matcher.matches(&widget))
            .unwrap()
    };
    assert!(accepted(Matcher::text("John")));
    assert!(accepted(Matcher::label("Name:")));
    assert!(accepted(Matcher::tooltip("Your name")));
    assert!(!accepted(Matcher::tooltip("Other")));
    assert!(accepted(Matcher::custom("always", |_| Ok(true))));

    let check = resolver
        .resolve(&roots, &[Matcher::mnemonic_text("Remember me")], 0)
        .unwrap();
    assert_eq!(check.kind(), WidgetKind::Button);

    // Widgets without the inspected capability are skipped, not errors.
    let multi = resolver
        .resolve_all(&roots, &[Matcher::style(Style::MULTI)])
        .unwrap();
    assert_eq!(multi.len(), 1);
    assert_eq!(multi[0].kind(), WidgetKind::List);
    let labelled = resolver
        .resolve_all(&roots, &[Matcher::label("Name:")])
        .unwrap();
    assert_eq!(labelled, vec![text]);
}

#[test]
fn test_matcher_descriptions() {
    let matcher = Matcher::text("OK");
    assert_eq!(matcher.to_string(), "text is equal to 'OK'");
    assert_eq!(
        crate::matchers::describe_all(&[Matcher::kind(WidgetKind::Button), matcher]),
        "kind is Button and text is equal to 'OK'"
    );
    assert_eq!(crate::matchers::describe_all(&[]), "any widget");
}
