//! Purpose: Regression coverage for parse-failure category mapping.
//! Exports: Integration tests only.
//! Role: Verify stable category labels used by CLI parse diagnostics.
//! Invariants: Category mapping remains deterministic for representative errors.
//! Invariants: Tests avoid payload leakage; assertions target category/hint text only.

use jsonconv::json::parse::{
    self, ParseFailureCategory, categorize_error, categorize_message, hint_for_error,
};
use jsonconv::{ErrorKind, ParseOptions};

#[test]
fn category_mapping_handles_syntax_and_numeric_errors() {
    let syntax_err = parse::from_str(r#"{"a":}"#).unwrap_err();
    assert_eq!(syntax_err.kind(), ErrorKind::UnexpectedCharacter);
    assert_eq!(syntax_err.position(), Some(6));
    assert_eq!(categorize_error(&syntax_err), ParseFailureCategory::Syntax);

    let number_err = parse::from_str(r#"{"n":1e309}"#).unwrap_err();
    assert_eq!(number_err.kind(), ErrorKind::MalformedNumber);
    assert_eq!(
        categorize_error(&number_err),
        ParseFailureCategory::NumericRange
    );
}

#[test]
fn category_mapping_handles_utf8_and_depth_errors() {
    let utf8_err = parse::from_slice(&[0xff, b'{', b'}']).unwrap_err();
    assert_eq!(utf8_err.kind(), ErrorKind::InvalidUtf8);
    assert_eq!(utf8_err.position(), Some(1));
    assert_eq!(categorize_error(&utf8_err), ParseFailureCategory::Utf8);

    let opts = ParseOptions::strict().with_max_depth(Some(2));
    let depth_err = parse::from_str_with("[[[0]]]", &opts).unwrap_err();
    assert_eq!(
        categorize_error(&depth_err),
        ParseFailureCategory::DepthLimit
    );
}

#[test]
fn lookup_errors_are_not_parse_failures() {
    let value = parse::from_str(r#"{"a":1}"#).unwrap();
    let err = value.get("b").unwrap_err();
    assert_eq!(categorize_error(&err), ParseFailureCategory::Unknown);
}

#[test]
fn serde_json_messages_classify_by_keyword() {
    let cases = [
        (
            serde_json::from_str::<serde_json::Value>(r#"{"a":}"#),
            ParseFailureCategory::Syntax,
        ),
        (
            serde_json::from_str::<serde_json::Value>(r#"{"n":1e309}"#),
            ParseFailureCategory::NumericRange,
        ),
        (
            serde_json::from_str::<serde_json::Value>(&"[".repeat(200)),
            ParseFailureCategory::DepthLimit,
        ),
    ];
    for (result, expected) in cases {
        let message = result.unwrap_err().to_string();
        assert_eq!(categorize_message(&message), expected, "message {message:?}");
    }

    assert_eq!(
        categorize_message("recursion limit exceeded while parsing"),
        ParseFailureCategory::DepthLimit
    );
}

#[test]
fn hint_contains_category_and_context() {
    let err = parse::from_str(r#"{"n":1e309}"#).unwrap_err();
    let hint = hint_for_error(&err, "test.context");
    assert!(hint.contains("parse category: numeric-range"));
    assert!(hint.contains("context: test.context"));
    assert!(!hint.contains("1e309"));
}

#[test]
fn unknown_category_fallback_is_stable() {
    assert_eq!(
        categorize_message("opaque parser issue"),
        ParseFailureCategory::Unknown
    );
    assert_eq!(ParseFailureCategory::Unknown.label(), "unknown");
}
