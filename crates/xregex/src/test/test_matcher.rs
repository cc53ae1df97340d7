// Tests for core matching: anchors, quantifiers, captures, references
use crate::{Match, Regex};

fn re(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap()
}

fn re_opt(pattern: &str, opts: &str) -> Regex {
    Regex::with_options(pattern, opts).unwrap()
}

#[test]
fn test_whole_string_with_anchors() {
    let r = re("^a+b$");
    assert_eq!(r.group_count(), 1);
    let mut m = Match::new();
    assert!(r.matches_with("aaab", &mut m));
    assert_eq!(m.start(0), Some(0));
    assert_eq!(m.end(0), Some(4));
    assert_eq!(m.group(0).as_deref(), Some("aaab"));

    assert!(!r.matches("aab "));
    assert!(!r.matches("b"));
}

#[test]
fn test_contains_semantics() {
    let r = re("bc");
    assert!(r.matches("abcd"));
    let mut m = Match::new();
    assert!(r.matches_with("abcd", &mut m));
    assert_eq!(m.start(0), Some(1));
    assert_eq!(m.end(0), Some(3));
}

#[test]
fn test_empty_pattern_matches_everywhere() {
    let r = re("");
    let mut m = Match::new();
    assert!(r.matches_with("xyz", &mut m));
    assert_eq!(m.start(0), Some(0));
    assert_eq!(m.end(0), Some(0));
    assert!(r.matches(""));
}

#[test]
fn test_optional_group_left_absent() {
    let r = re("(a)(b)?");
    assert_eq!(r.group_count(), 3);
    let mut m = Match::new();
    assert!(r.matches_with("a", &mut m));
    assert_eq!(m.group(1).as_deref(), Some("a"));
    assert_eq!(m.start(2), None);
    assert_eq!(m.end(2), None);
    assert_eq!(m.group(2), None);

    assert!(r.matches_with("ab", &mut m));
    assert_eq!(m.group(2).as_deref(), Some("b"));
}

#[test]
fn test_bounded_quantifier_greedy_and_lazy() {
    let mut m = Match::new();
    assert!(re("a{2,4}").matches_with("aaaaa", &mut m));
    assert_eq!(m.start(0), Some(0));
    assert_eq!(m.end(0), Some(4));

    assert!(re("a{2,4}?").matches_with("aaaaa", &mut m));
    assert_eq!(m.start(0), Some(0));
    assert_eq!(m.end(0), Some(2));

    assert!(re("a{3}").matches("aaa"));
    assert!(!re("a{3}").matches("aa"));
    assert!(re("a{2,}").matches("aa"));
    assert!(!re("a{2,}").matches("a"));
}

#[test]
fn test_alternation_is_leftmost_first() {
    let mut m = Match::new();
    assert!(re("ab|a").matches_with("ab", &mut m));
    assert_eq!(m.end(0), Some(2));

    assert!(re("a|ab").matches_with("ab", &mut m));
    assert_eq!(m.end(0), Some(1));
}

#[test]
fn test_backreference() {
    let r = re(r"(a*)\1");
    let mut m = Match::new();
    assert!(r.matches_with("aaaa", &mut m));
    assert_eq!(m.group(0).as_deref(), Some("aaaa"));
    assert_eq!(m.group(1).as_deref(), Some("aa"));

    assert!(!re(r"^(a*)\1$").matches("aaa"));
    assert!(re(r"^(ab)x\1$").matches("abxab"));
    assert!(!re(r"^(ab)x\1$").matches("abxba"));
}

#[test]
fn test_backreference_to_unmatched_group_fails() {
    // Group 1 never participates, so the reference cannot match.
    assert!(!re(r"^(?:(a)|b)\1$").matches("b"));
    assert!(re(r"^(?:(a)|b)\1?$").matches("b"));
}

#[test]
fn test_zero_width_closure_terminates() {
    let r = re("(a?)*");
    let mut m = Match::new();
    assert!(r.matches_with("b", &mut m));
    assert_eq!(m.start(0), Some(0));
    assert_eq!(m.end(0), Some(0));

    assert!(re("(?:a*)*").matches("b"));
    assert!(re("(a*b?)*").matches("aabbaa"));
}

#[test]
fn test_dot_excludes_line_terminators() {
    assert!(!re("a.c").matches("a\nc"));
    assert!(!re("a.c").matches("a\rc"));
    assert!(!re("a.c").matches("a\u{2028}c"));
    assert!(re_opt("a.c", "s").matches("a\nc"));
    assert!(re("a.c").matches("abc"));
}

#[test]
fn test_multiline_anchors() {
    assert!(!re("^b").matches("a\nb"));
    assert!(re_opt("^b", "m").matches("a\nb"));
    assert!(re_opt("a$", "m").matches("a\nb"));
    assert!(!re("a$").matches("a\nb"));
}

#[test]
fn test_text_end_anchors() {
    // \Z tolerates one final terminator, \z does not.
    assert!(re(r"a\Z").matches("a\n"));
    assert!(re(r"a\Z").matches("a\r\n"));
    assert!(!re(r"a\Z").matches("a\n\n"));
    assert!(!re(r"a\z").matches("a\n"));
    assert!(re(r"a\z").matches("a"));
    // $ without "m" behaves like \Z.
    assert!(re("a$").matches("a\n"));
    assert!(re("a$").matches("a\r\n"));
}

#[test]
fn test_word_boundaries() {
    assert!(re(r"\bfoo\b").matches("a foo b"));
    assert!(!re(r"\bfoo\b").matches("afoob"));
    assert!(re(r"\Boo\B").matches("food"));
    assert!(!re(r"\Bfoo").matches("a foo"));
    assert!(re(r"\<foo").matches("a foo"));
    assert!(!re(r"\<oo").matches("foo"));
    assert!(re(r"foo\>").matches("foo bar"));
    assert!(!re(r"fo\>").matches("foo"));
    // Empty scan range: \b fails, \B holds.
    assert!(!re(r"\b").matches(""));
    assert!(re(r"\B").matches(""));
}

#[test]
fn test_case_insensitive_chars() {
    // Both case directions must match under "i".
    assert!(re_opt("aB", "i").matches("ab"));
    assert!(re_opt("Ab", "i").matches("ab"));
    assert!(re_opt("ab", "i").matches("AB"));
    assert!(!re_opt("ab", "i").matches("ac"));
    assert!(!re("aB").matches("ab"));
}

#[test]
fn test_case_insensitive_beyond_basic_plane() {
    // DESERET CAPITAL LETTER LONG I (U+10400) vs its lowercase
    // (U+10428); simple case mapping covers all planes here.
    assert!(re_opt("\u{10400}", "i").matches("\u{10428}"));
    assert!(re_opt("\u{10428}", "i").matches("\u{10400}"));
}

#[test]
fn test_case_insensitive_backreference() {
    assert!(re_opt(r"^(ab)\1$", "i").matches("abAB"));
    assert!(!re(r"^(ab)\1$").matches("abAB"));
}

#[test]
fn test_match_range() {
    let r = re("^b$");
    assert!(!r.matches("abc"));
    assert!(r.matches_range("abc", 1, 2, None));
    let mut m = Match::new();
    assert!(r.matches_range("abc", 1, 2, Some(&mut m)));
    assert_eq!(m.start(0), Some(1));
    assert_eq!(m.end(0), Some(2));
}

#[test]
fn test_matches_chars_and_custom_source() {
    struct Rot(Vec<char>);
    impl crate::CharAccess for Rot {
        fn len(&self) -> usize {
            self.0.len()
        }
        fn char_at(&self, index: usize) -> char {
            self.0[index]
        }
    }

    let r = re("b+c");
    let chars: Vec<char> = "abbc".chars().collect();
    let mut m = Match::new();
    assert!(r.matches_chars(&chars, Some(&mut m)));
    assert_eq!(m.start(0), Some(1));
    assert_eq!(m.group(0).as_deref(), Some("bbc"));

    let source = Rot("abbc".chars().collect());
    assert!(r.matches_source(&source, None));

    // Ranged slice matching anchors to the sub-range.
    let anchored = re("^bb");
    assert!(!anchored.matches_chars(&chars, None));
    assert!(anchored.matches_chars_range(&chars, 1, 4, None));
}

#[test]
fn test_supplementary_plane_positions() {
    // Offsets count code points, not encoding units.
    let r = re("(.)c");
    let mut m = Match::new();
    assert!(r.matches_with("\u{1F600}bc", &mut m));
    assert_eq!(m.start(0), Some(1));
    assert_eq!(m.group(1).as_deref(), Some("b"));
}

#[test]
fn test_nongreedy_quantifiers() {
    let mut m = Match::new();
    assert!(re("<.+?>").matches_with("<a><b>", &mut m));
    assert_eq!(m.end(0), Some(3));
    assert!(re("<.+>").matches_with("<a><b>", &mut m));
    assert_eq!(m.end(0), Some(6));

    assert!(re("a*?").matches("aaa"));
    let mut m = Match::new();
    assert!(re("a*?").matches_with("aaa", &mut m));
    assert_eq!(m.end(0), Some(0));
}

#[test]
fn test_nested_groups_number_left_to_right() {
    let r = re("((a)(b(c)))");
    assert_eq!(r.group_count(), 5);
    let mut m = Match::new();
    assert!(r.matches_with("abc", &mut m));
    assert_eq!(m.group(1).as_deref(), Some("abc"));
    assert_eq!(m.group(2).as_deref(), Some("a"));
    assert_eq!(m.group(3).as_deref(), Some("bc"));
    assert_eq!(m.group(4).as_deref(), Some("c"));
}

#[test]
fn test_capture_reset_between_calls() {
    let r = re("(b)?a");
    let mut m = Match::new();
    assert!(r.matches_with("ba", &mut m));
    assert_eq!(m.group(1).as_deref(), Some("b"));
    // The same Match reused: the stale group must not leak through.
    assert!(r.matches_with("a", &mut m));
    assert_eq!(m.group(1), None);
}
