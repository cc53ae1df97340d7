// Tests for the search accelerators
// Every accelerated path must agree with the unaccelerated engine.
use crate::bmsearch::BmPattern;
use crate::matcher::Target;
use crate::{Match, Regex};

fn chars(s: &str) -> Vec<char> {
    s.chars().collect()
}

#[test]
fn test_bm_finds_first_occurrence() {
    let needle = chars("abcab");
    let bm = BmPattern::new(&needle, false);
    let hay = chars("xxabcaabcabyy");
    assert_eq!(bm.search(&Target::Slice(&hay), 0, hay.len()), Some(6));

    let hay = chars("abcab");
    assert_eq!(bm.search(&Target::Slice(&hay), 0, hay.len()), Some(0));

    let hay = chars("abcaX");
    assert_eq!(bm.search(&Target::Slice(&hay), 0, hay.len()), None);
}

#[test]
fn test_bm_respects_bounds() {
    let needle = chars("ab");
    let bm = BmPattern::new(&needle, false);
    let hay = chars("ababab");
    assert_eq!(bm.search(&Target::Slice(&hay), 1, hay.len()), Some(2));
    assert_eq!(bm.search(&Target::Slice(&hay), 0, 1), None);
    assert_eq!(bm.search(&Target::Slice(&hay), 5, hay.len()), None);
}

#[test]
fn test_bm_case_insensitive() {
    let needle = chars("AbC");
    let bm = BmPattern::new(&needle, true);
    let hay = chars("zzaBCzz");
    assert_eq!(bm.search(&Target::Slice(&hay), 0, hay.len()), Some(2));
}

#[test]
fn test_fixed_string_only_equals_plain_search() {
    // A pattern with no metacharacters is pure substring search.
    let r = Regex::new("needle").unwrap();
    let cases = [
        ("haystack needle haystack", Some(9)),
        ("needle", Some(0)),
        ("neeedle", None),
        ("", None),
        ("nearly a needl", None),
        ("double needle needle", Some(7)),
    ];
    for (hay, expected) in cases {
        let plain = hay.find("needle").map(|byte_at| {
            // Byte offset to code-point offset (all-ASCII here).
            hay[..byte_at].chars().count()
        });
        assert_eq!(plain, expected);
        let mut m = Match::new();
        assert_eq!(r.matches_with(hay, &mut m), expected.is_some(), "on {hay:?}");
        if let Some(at) = expected {
            assert_eq!(m.start(0), Some(at));
            assert_eq!(m.end(0), Some(at + 6));
        }
    }
}

#[test]
fn test_disabled_optimizations_agree() {
    // F disables the fixed-string path, H the head-character paths; the
    // outcomes must not change.
    let patterns = [r"foo\d+bar", "a+needle", "[xy]hello", r"^start\w+"];
    let texts = [
        "foo123bar",
        "aaaneedle",
        "yhello world",
        "startle",
        "nothing here",
        "foo bar",
        "",
    ];
    for pattern in patterns {
        let plain = Regex::new(pattern).unwrap();
        let no_fixed = Regex::with_options(pattern, "F").unwrap();
        let no_head = Regex::with_options(pattern, "H").unwrap();
        let neither = Regex::with_options(pattern, "FH").unwrap();
        for text in texts {
            let expected = plain.matches(text);
            assert_eq!(no_fixed.matches(text), expected, "{pattern} F on {text:?}");
            assert_eq!(no_head.matches(text), expected, "{pattern} H on {text:?}");
            assert_eq!(neither.matches(text), expected, "{pattern} FH on {text:?}");
        }
    }
}

#[test]
fn test_fixed_prefilter_rejects_without_running() {
    // "bar" is guaranteed in every match; its absence means failure even
    // though the pattern would otherwise scan every offset.
    let r = Regex::new(r"\w+bar\d").unwrap();
    assert!(!r.matches("this text has no b-a-r anywhere"));
    assert!(r.matches("xbar7"));
}

#[test]
fn test_first_char_filter_positions() {
    let r = Regex::new("[q-s]x").unwrap();
    let mut m = Match::new();
    assert!(r.matches_with("aaqqxsx", &mut m));
    assert_eq!(m.start(0), Some(3));
    assert!(!r.matches("aaqqsq"));
}

#[test]
fn test_leading_dot_closure_scans_line_starts() {
    let r = Regex::new(".*end$").unwrap();
    assert!(r.matches("the end"));
    assert!(r.matches("line one\nthe end"));
    assert!(!r.matches("endless\nmore"));

    let mut m = Match::new();
    assert!(r.matches_with("line\nthe end", &mut m));
    assert_eq!(m.start(0), Some(5));

    // Dot-all mode matches across the terminator from the very start.
    let r = Regex::with_options(".*end$", "s").unwrap();
    assert!(r.matches_with("line\nthe end", &mut m));
    assert_eq!(m.start(0), Some(0));
}

#[test]
fn test_case_insensitive_fixed_only() {
    let r = Regex::with_options("Needle", "i").unwrap();
    let mut m = Match::new();
    assert!(r.matches_with("xx nEEdLe xx", &mut m));
    assert_eq!(m.start(0), Some(3));
    assert!(!r.matches("no such thing"));
}
