// Word-boundary classification
// Each side of an offset classifies as letter-like, transparent, or
// other; a boundary exists where the two sides classify differently

use unicode_general_category::GeneralCategory;

use crate::matcher::target::Target;
use crate::options;
use crate::unicode;
use crate::util;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WordType {
    /// Transparent for boundary purposes (combining marks, format
    /// characters); the scan skips past these.
    Ignore,
    Letter,
    Other,
}

pub(crate) fn word_type_at(
    target: &Target,
    begin: usize,
    end: usize,
    offset: isize,
    opts: u32,
) -> WordType {
    if offset < begin as isize || offset >= end as isize {
        return WordType::Other;
    }
    word_type_of(target.char_at(offset as usize), opts)
}

/// Classification of the character before `offset`, skipping backward
/// past transparent code points. Running off the front classifies as
/// `Other`, which terminates the scan.
pub(crate) fn previous_word_type(
    target: &Target,
    begin: usize,
    end: usize,
    offset: isize,
    opts: u32,
) -> WordType {
    let mut off = offset - 1;
    let mut ret = word_type_at(target, begin, end, off, opts);
    while ret == WordType::Ignore {
        off -= 1;
        ret = word_type_at(target, begin, end, off, opts);
    }
    ret
}

fn word_type_of(ch: char, opts: u32) -> WordType {
    if !options::is_set(opts, options::UNICODE_WORD_BOUNDARY) {
        let is_word = if options::is_set(opts, options::USE_UNICODE_CATEGORY) {
            unicode::word_range().contains_char(ch)
        } else {
            util::is_ascii_word_char(ch)
        };
        return if is_word {
            WordType::Letter
        } else {
            WordType::Other
        };
    }
    match unicode::category_of(ch as u32) {
        GeneralCategory::UppercaseLetter
        | GeneralCategory::LowercaseLetter
        | GeneralCategory::TitlecaseLetter
        | GeneralCategory::ModifierLetter
        | GeneralCategory::OtherLetter
        | GeneralCategory::LetterNumber
        | GeneralCategory::DecimalNumber
        | GeneralCategory::OtherNumber
        | GeneralCategory::SpacingMark => WordType::Letter,
        GeneralCategory::Format
        | GeneralCategory::NonspacingMark
        | GeneralCategory::EnclosingMark => WordType::Ignore,
        GeneralCategory::Control => match ch {
            '\t' | '\n' | '\u{000B}' | '\u{000C}' | '\r' => WordType::Other,
            _ => WordType::Ignore,
        },
        _ => WordType::Other,
    }
}
