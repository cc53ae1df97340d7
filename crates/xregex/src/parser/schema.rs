// Schema-dialect shorthand classes
// XML Schema redefines the shorthand escapes and adds the name-character
// classes; everything resolves to a concrete range set

use std::sync::Arc;

use crate::ranges::RangeSet;
use crate::unicode;

/// The shorthand escapes of the restricted dialect. Uppercase letters
/// are the negated forms. Returns `None` for characters that are not
/// shorthands (they fall through to ordinary escape handling).
pub(super) fn shorthand(ch: char) -> Option<(Arc<RangeSet>, bool)> {
    let negated = ch.is_ascii_uppercase();
    let set = match ch.to_ascii_lowercase() {
        // XML Schema \d is the Unicode decimal digit category.
        'd' => unicode::range_for("Nd", true).unwrap(),
        // XML Schema \s is the XML whitespace set.
        's' => {
            let mut set = RangeSet::new();
            set.add(0x09);
            set.add(0x0A);
            set.add(0x0D);
            set.add(' ' as u32);
            set.sort_and_compact();
            Arc::new(set)
        }
        // XML Schema \w is everything but punctuation, separators and
        // the "other" categories.
        'w' => unicode::range_for("XmlWord", true).unwrap(),
        'i' => unicode::xml_name_start_char(true),
        'c' => unicode::xml_name_char(true),
        _ => return None,
    };
    Some((set, negated))
}
