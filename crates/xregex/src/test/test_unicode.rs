// Tests for Unicode properties, blocks and case variants
use crate::Regex;
use crate::unicode;

fn re(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap()
}

#[test]
fn test_general_categories() {
    let upper = re(r"^\p{Lu}$");
    assert!(upper.matches("A"));
    assert!(upper.matches("Å"));
    assert!(!upper.matches("a"));
    assert!(!upper.matches("1"));

    let digit = re(r"^\p{Nd}$");
    assert!(digit.matches("7"));
    assert!(digit.matches("٣"));
    assert!(!digit.matches("x"));

    let negated = re(r"^\P{Nd}$");
    assert!(negated.matches("x"));
    assert!(!negated.matches("7"));
}

#[test]
fn test_one_letter_category_groups() {
    let letter = re(r"^\pL$");
    assert!(letter.matches("a"));
    assert!(letter.matches("Z"));
    assert!(letter.matches("é"));
    assert!(letter.matches("中"));
    assert!(!letter.matches("1"));
    assert!(!letter.matches(" "));

    let punct = re(r"^\p{P}$");
    assert!(punct.matches("!"));
    assert!(punct.matches("-"));
    assert!(!punct.matches("a"));
}

#[test]
fn test_special_property_names() {
    assert!(re(r"^\p{ALL}$").matches("\u{10FFFF}"));
    assert!(re(r"^\p{ASSIGNED}$").matches("a"));
    assert!(!re(r"^\p{UNASSIGNED}$").matches("a"));
    assert!(re(r"^\p{IsWord}$").matches("_"));
    assert!(re(r"^\p{IsWord}$").matches("é"));
    assert!(!re(r"^\p{IsWord}$").matches("-"));
}

#[test]
fn test_blocks() {
    let latin = re(r"^\p{IsBasicLatin}$");
    assert!(latin.matches("a"));
    assert!(!latin.matches("é"));

    let greek = re(r"^\p{IsGreek}$");
    assert!(greek.matches("λ"));
    assert!(!greek.matches("g"));

    // Space and case variations of the block name are accepted.
    assert!(re(r"^\p{Basic Latin}$").matches("a"));
    assert!(re(r"^\p{IsLatin-1Supplement}$").matches("é"));

    let negated = re(r"^\P{IsBasicLatin}$");
    assert!(negated.matches("é"));
    assert!(!negated.matches("a"));
}

#[test]
fn test_properties_inside_classes() {
    let r = re(r"^[\p{Lu}\p{Nd}]+$");
    assert!(r.matches("A7B"));
    assert!(!r.matches("A7b"));

    let r = re(r"^[^\p{Nd}]$");
    assert!(r.matches("x"));
    assert!(!r.matches("5"));
}

#[test]
fn test_word_boundary_with_unicode_letters() {
    // The "u" option classifies word characters by category.
    let r = Regex::with_options(r"\bfée\b", "u").unwrap();
    assert!(r.matches("la fée verte"));
    assert!(!r.matches("lafée"));

    // The "w" option uses the guideline classification; combining marks
    // are transparent, so no boundary sits between a letter and its
    // accent, only after the accent.
    let text = "e\u{0301}"; // e + COMBINING ACUTE ACCENT
    assert!(!Regex::with_options(r"e\b", "w").unwrap().matches(text));
    assert!(
        Regex::with_options("e\u{0301}\\b", "w")
            .unwrap()
            .matches(text)
    );
}

#[test]
fn test_case_variants() {
    let variants: Vec<u32> = unicode::case_variants('a' as u32).collect();
    assert_eq!(variants, vec!['A' as u32]);

    let variants: Vec<u32> = unicode::case_variants('A' as u32).collect();
    assert_eq!(variants, vec!['a' as u32]);

    // A caseless character has no variants.
    assert_eq!(unicode::case_variants('1' as u32).count(), 0);

    // The sharp s uppercases to "SS", which is not a single code point
    // and therefore contributes no variant in that direction.
    let variants: Vec<u32> = unicode::case_variants(0xDF).collect();
    assert!(!variants.contains(&('S' as u32)));
}

#[test]
fn test_named_sets_are_cached() {
    let first = unicode::range_for("Lu", true).unwrap();
    let second = unicode::range_for("Lu", true).unwrap();
    assert!(std::sync::Arc::ptr_eq(&first, &second));

    let negative = unicode::range_for("Lu", false).unwrap();
    assert!(negative.contains('a' as u32));
    assert!(!negative.contains('A' as u32));
}

#[test]
fn test_unknown_names_are_rejected() {
    assert!(unicode::range_for("NoSuchBlock", true).is_none());
    assert!(unicode::range_for("Xy", true).is_none());
}

#[test]
fn test_surrogate_gap_is_cs() {
    let cs = unicode::range_for("Cs", true).unwrap();
    assert!(cs.contains(0xD800));
    assert!(cs.contains(0xDFFF));
    assert!(!cs.contains(0xE000));
}
