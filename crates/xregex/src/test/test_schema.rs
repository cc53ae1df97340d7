// Tests for the restricted XML Schema dialect
use crate::Regex;
use crate::error::ParseErrorKind;

fn schema(pattern: &str) -> Regex {
    Regex::with_options(pattern, "X").unwrap()
}

fn schema_err(pattern: &str) -> ParseErrorKind {
    Regex::with_options(pattern, "X").unwrap_err().kind
}

#[test]
fn test_whole_string_matching() {
    // The schema dialect matches the entire text, not substrings.
    let r = schema("a|b");
    assert!(r.matches("a"));
    assert!(r.matches("b"));
    assert!(!r.matches("ab"));
    assert!(!r.matches("xa"));
    assert!(!r.matches(""));

    assert!(schema("a*b").matches("aaab"));
    assert!(!schema("a*b").matches("aaaba"));
}

#[test]
fn test_caret_and_dollar_are_literal() {
    assert!(schema("^").matches("^"));
    assert!(schema("$").matches("$"));
    assert!(schema("a^b").matches("a^b"));
    assert!(!schema("^a").matches("a"));
}

#[test]
fn test_rejected_constructs() {
    assert_eq!(schema_err("(?:a)"), ParseErrorKind::NotInThisDialect);
    assert_eq!(schema_err("(?=a)"), ParseErrorKind::NotInThisDialect);
    assert_eq!(schema_err("(?<=a)b"), ParseErrorKind::NotInThisDialect);
    assert_eq!(schema_err("(?>a)"), ParseErrorKind::NotInThisDialect);
    assert_eq!(schema_err("(?i:a)"), ParseErrorKind::NotInThisDialect);
    assert_eq!(schema_err("(?(1)a)"), ParseErrorKind::NotInThisDialect);
    assert_eq!(schema_err("(?#note)a"), ParseErrorKind::NotInThisDialect);
    assert_eq!(schema_err(r"(a)\1"), ParseErrorKind::NotInThisDialect);
    assert_eq!(schema_err(r"\b"), ParseErrorKind::UnknownEscape);
    assert_eq!(schema_err(r"\A"), ParseErrorKind::UnknownEscape);
}

#[test]
fn test_bracket_subtraction() {
    let r = schema("[A-Z-[AEIOU]]");
    assert!(r.matches("B"));
    assert!(r.matches("Z"));
    assert!(!r.matches("A"));
    assert!(!r.matches("E"));
    assert!(!r.matches("a"));

    // Nested subtraction groups.
    let r = schema("[a-z-[m-p-[n]]]");
    assert!(r.matches("a"));
    assert!(r.matches("n"));
    assert!(!r.matches("m"));
    assert!(!r.matches("p"));
}

#[test]
fn test_groups_still_capture() {
    let r = schema("(a+)(b+)");
    assert_eq!(r.group_count(), 3);
    let mut m = crate::Match::new();
    assert!(r.matches_with("aabbb", &mut m));
    assert_eq!(m.group(1).as_deref(), Some("aa"));
    assert_eq!(m.group(2).as_deref(), Some("bbb"));
}

#[test]
fn test_schema_shorthands() {
    // \d is the Unicode decimal-digit category in this dialect.
    assert!(schema(r"\d").matches("٣"));
    assert!(schema(r"\d+").matches("123"));
    assert!(!schema(r"\d").matches("x"));
    // \s is XML whitespace only.
    assert!(schema(r"\s").matches("\t"));
    assert!(!schema(r"\s").matches("\u{000C}"));
    // \w excludes punctuation, separators and "other".
    assert!(schema(r"\w").matches("é"));
    assert!(!schema(r"\w").matches("!"));
    assert!(!schema(r"\w").matches(" "));
}

#[test]
fn test_xml_name_classes() {
    // \i name-start, \c name character.
    let name = schema(r"\i\c*");
    assert!(name.matches("xs:element"));
    assert!(name.matches("_root"));
    assert!(name.matches("a-b.c"));
    assert!(!name.matches("1abc"));
    assert!(!name.matches("a b"));

    assert!(schema(r"\I").matches("1"));
    assert!(!schema(r"\I").matches("a"));
    assert!(schema(r"\C").matches(" "));
    assert!(!schema(r"\C").matches("x"));
}

#[test]
fn test_language_pattern() {
    // The xsd:language facet pattern from the schema specification.
    let r = schema("[a-zA-Z]{1,8}(-[a-zA-Z0-9]{1,8})*");
    assert!(r.matches("en"));
    assert!(r.matches("en-US"));
    assert!(r.matches("zh-Hant-TW"));
    assert!(!r.matches("toolongtag9"));
    assert!(!r.matches("en--"));
}
