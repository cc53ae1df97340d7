// Small shared helpers
// Metacharacter quoting, hex parsing, line-terminator classification

pub(crate) const MAX_CODEPOINT: u32 = 0x10FFFF;

pub(crate) const LINE_FEED: char = '\u{000A}';
pub(crate) const CARRIAGE_RETURN: char = '\u{000D}';
pub(crate) const LINE_SEPARATOR: char = '\u{2028}';
pub(crate) const PARAGRAPH_SEPARATOR: char = '\u{2029}';

/// The characters that terminate a line for `.`, `^`, `$`, `\Z`.
#[inline]
pub(crate) fn is_eol_char(ch: char) -> bool {
    ch == LINE_FEED || ch == CARRIAGE_RETURN || ch == LINE_SEPARATOR || ch == PARAGRAPH_SEPARATOR
}

/// Legacy word characters: `[a-zA-Z0-9_]`.
#[inline]
pub(crate) fn is_ascii_word_char(ch: char) -> bool {
    ch == '_' || ch.is_ascii_alphanumeric()
}

/// The metacharacters of the normal tokenizer context.
pub(crate) fn is_meta_char(ch: char) -> bool {
    matches!(
        ch,
        '.' | '*' | '+' | '?' | '{' | '[' | '(' | ')' | '|' | '\\' | '^' | '$'
    )
}

/// Escapes every metacharacter in `text` so the result matches `text`
/// literally when used as a pattern.
pub fn quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        if is_meta_char(ch) {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}
