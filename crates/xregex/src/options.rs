// Option flags
// A compiled pattern carries a flag word; letters map to bits

use crate::error::{ParseError, ParseErrorKind};

/// "i": case-insensitive matching.
pub(crate) const IGNORE_CASE: u32 = 1 << 1;
/// "s": `.` matches any character including line terminators.
pub(crate) const SINGLE_LINE: u32 = 1 << 2;
/// "m": `^` and `$` also match around line terminators inside the text.
pub(crate) const MULTIPLE_LINES: u32 = 1 << 3;
/// "x": free-spacing mode, whitespace and `#...` comments are ignored.
pub(crate) const EXTENDED_COMMENT: u32 = 1 << 4;
/// "u": `\d \D \w \W \s \S` denote Unicode category sets.
pub(crate) const USE_UNICODE_CATEGORY: u32 = 1 << 5;
/// "w": word boundaries follow the Unicode word-boundary guideline.
pub(crate) const UNICODE_WORD_BOUNDARY: u32 = 1 << 6;
/// "H": disable the head-character optimizations.
pub(crate) const PROHIBIT_HEAD_CHARACTER_OPTIMIZATION: u32 = 1 << 7;
/// "F": disable the fixed-string optimization.
pub(crate) const PROHIBIT_FIXED_STRING_OPTIMIZATION: u32 = 1 << 8;
/// "X": restricted XML Schema dialect, whole-string matching.
pub(crate) const XMLSCHEMA_MODE: u32 = 1 << 9;
/// ",": a comma separates ranges inside a character class.
pub(crate) const SPECIAL_COMMA: u32 = 1 << 10;

/// Letters accepted by option strings, in canonical serialization order.
const LETTERS: [(char, u32); 10] = [
    ('i', IGNORE_CASE),
    ('m', MULTIPLE_LINES),
    ('s', SINGLE_LINE),
    ('x', EXTENDED_COMMENT),
    ('u', USE_UNICODE_CATEGORY),
    ('w', UNICODE_WORD_BOUNDARY),
    (',', SPECIAL_COMMA),
    ('F', PROHIBIT_FIXED_STRING_OPTIMIZATION),
    ('H', PROHIBIT_HEAD_CHARACTER_OPTIMIZATION),
    ('X', XMLSCHEMA_MODE),
];

#[inline]
pub(crate) fn is_set(options: u32, flag: u32) -> bool {
    options & flag == flag
}

/// Flag bit for a single option letter, if it names one.
pub(crate) fn flag_for_letter(ch: char) -> Option<u32> {
    LETTERS.iter().find(|&&(l, _)| l == ch).map(|&(_, f)| f)
}

/// Parses an order-independent option letter string into a flag word.
pub(crate) fn parse_options(text: &str) -> Result<u32, ParseError> {
    let mut options = 0;
    for (i, ch) in text.char_indices() {
        match flag_for_letter(ch) {
            Some(flag) => options |= flag,
            None => return Err(ParseError::new(ParseErrorKind::UnknownOption, i)),
        }
    }
    Ok(options)
}

/// Serializes a flag word back to its canonical letter order.
pub(crate) fn option_string(options: u32) -> String {
    let mut out = String::new();
    for &(letter, flag) in LETTERS.iter() {
        if is_set(options, flag) {
            out.push(letter);
        }
    }
    out
}

/// Letters valid inside an inline modifier group `(?ims-ims:...)`.
/// `u` and the engine-level letters are constructor-only.
pub(crate) fn modifier_flag_for_letter(ch: char) -> Option<u32> {
    match ch {
        'i' => Some(IGNORE_CASE),
        'm' => Some(MULTIPLE_LINES),
        's' => Some(SINGLE_LINE),
        'w' => Some(UNICODE_WORD_BOUNDARY),
        'x' => Some(EXTENDED_COMMENT),
        _ => None,
    }
}

/// Serializes modifier-group flags (subset order "imswx").
pub(crate) fn modifier_string(flags: u32) -> String {
    let mut out = String::new();
    for (letter, flag) in [
        ('i', IGNORE_CASE),
        ('m', MULTIPLE_LINES),
        ('s', SINGLE_LINE),
        ('w', UNICODE_WORD_BOUNDARY),
        ('x', EXTENDED_COMMENT),
    ] {
        if is_set(flags, flag) {
            out.push(letter);
        }
    }
    out
}
