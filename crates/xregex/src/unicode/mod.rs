// Unicode table adapter
// Named code-point sets (general categories, blocks, POSIX aliases) built
// lazily on top of the platform category data and cached process-wide

mod blocks;

use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};

use ahash::RandomState;
use unicode_general_category::{GeneralCategory, get_general_category};

use crate::ranges::RangeSet;
use crate::util::MAX_CODEPOINT;

/// Built sets, keyed by canonical name (prefixed `^` for negated).
/// Filled once per name, never mutated afterwards.
static TABLES: OnceLock<Mutex<HashMap<String, Arc<RangeSet>, RandomState>>> = OnceLock::new();

/// Returns the named code-point set, or `None` when the name denotes no
/// known category, alias, or block. `positive == false` yields the
/// complement. Results are cached for the life of the process.
pub(crate) fn range_for(name: &str, positive: bool) -> Option<Arc<RangeSet>> {
    let key = canonical_key(name, positive)?;
    let tables = TABLES.get_or_init(|| Mutex::new(HashMap::with_hasher(RandomState::new())));
    if let Some(set) = tables.lock().unwrap().get(&key) {
        return Some(set.clone());
    }
    // Built outside the lock; a racing builder just overwrites with an
    // equal set.
    let positive_set = build_named(name)?;
    let set = if positive {
        Arc::new(positive_set)
    } else {
        Arc::new(positive_set.complement())
    };
    tables.lock().unwrap().insert(key, set.clone());
    Some(set)
}

/// The set backing `\w` under the "u" option and the `[:word:]` alias.
/// Word-boundary tests hit this per character, so it gets its own slot
/// beside the keyed table.
pub(crate) fn word_range() -> Arc<RangeSet> {
    static WORD: OnceLock<Arc<RangeSet>> = OnceLock::new();
    WORD.get_or_init(|| range_for("IsWord", true).unwrap()).clone()
}

/// XML `NameStartChar` production, for the schema dialect's `\i`.
pub(crate) fn xml_name_start_char(positive: bool) -> Arc<RangeSet> {
    range_for("XmlNameStartChar", positive).unwrap()
}

/// XML `NameChar` production, for the schema dialect's `\c`.
pub(crate) fn xml_name_char(positive: bool) -> Arc<RangeSet> {
    range_for("XmlNameChar", positive).unwrap()
}

/// The single-code-point case variants of `cp`: its uppercase and
/// lowercase forms where those are one code point. Multi-code-point
/// expansions have no place in per-character matching and are skipped.
pub(crate) fn case_variants(cp: u32) -> impl Iterator<Item = u32> {
    let ch = char::from_u32(cp);
    let upper = ch.and_then(single_uppercase);
    let lower = ch.and_then(single_lowercase);
    upper
        .into_iter()
        .chain(lower)
        .map(|c| c as u32)
        .filter(move |&v| v != cp)
}

pub(crate) fn single_uppercase(ch: char) -> Option<char> {
    let mut it = ch.to_uppercase();
    let first = it.next();
    if it.next().is_none() { first } else { None }
}

pub(crate) fn single_lowercase(ch: char) -> Option<char> {
    let mut it = ch.to_lowercase();
    let first = it.next();
    if it.next().is_none() { first } else { None }
}

/// General category of a code point; surrogate gaps report `Cs`.
pub(crate) fn category_of(cp: u32) -> GeneralCategory {
    match char::from_u32(cp) {
        Some(ch) => get_general_category(ch),
        None => GeneralCategory::Surrogate,
    }
}

/// Two-letter abbreviation of a general category.
pub(crate) fn category_abbrev(cat: GeneralCategory) -> &'static str {
    match cat {
        GeneralCategory::UppercaseLetter => "Lu",
        GeneralCategory::LowercaseLetter => "Ll",
        GeneralCategory::TitlecaseLetter => "Lt",
        GeneralCategory::ModifierLetter => "Lm",
        GeneralCategory::OtherLetter => "Lo",
        GeneralCategory::NonspacingMark => "Mn",
        GeneralCategory::SpacingMark => "Mc",
        GeneralCategory::EnclosingMark => "Me",
        GeneralCategory::DecimalNumber => "Nd",
        GeneralCategory::LetterNumber => "Nl",
        GeneralCategory::OtherNumber => "No",
        GeneralCategory::ConnectorPunctuation => "Pc",
        GeneralCategory::DashPunctuation => "Pd",
        GeneralCategory::OpenPunctuation => "Ps",
        GeneralCategory::ClosePunctuation => "Pe",
        GeneralCategory::InitialPunctuation => "Pi",
        GeneralCategory::FinalPunctuation => "Pf",
        GeneralCategory::OtherPunctuation => "Po",
        GeneralCategory::MathSymbol => "Sm",
        GeneralCategory::CurrencySymbol => "Sc",
        GeneralCategory::ModifierSymbol => "Sk",
        GeneralCategory::OtherSymbol => "So",
        GeneralCategory::SpaceSeparator => "Zs",
        GeneralCategory::LineSeparator => "Zl",
        GeneralCategory::ParagraphSeparator => "Zp",
        GeneralCategory::Control => "Cc",
        GeneralCategory::Format => "Cf",
        GeneralCategory::Surrogate => "Cs",
        GeneralCategory::PrivateUse => "Co",
        GeneralCategory::Unassigned => "Cn",
    }
}

fn is_category_name(name: &str) -> bool {
    matches!(
        name,
        "L" | "M"
            | "N"
            | "Z"
            | "C"
            | "P"
            | "S"
            | "Lu"
            | "Ll"
            | "Lt"
            | "Lm"
            | "Lo"
            | "Mn"
            | "Mc"
            | "Me"
            | "Nd"
            | "Nl"
            | "No"
            | "Pc"
            | "Pd"
            | "Ps"
            | "Pe"
            | "Pi"
            | "Pf"
            | "Po"
            | "Sm"
            | "Sc"
            | "Sk"
            | "So"
            | "Zs"
            | "Zl"
            | "Zp"
            | "Cc"
            | "Cf"
            | "Cs"
            | "Co"
            | "Cn"
    )
}

const POSIX_NAMES: [&str; 13] = [
    "alpha", "alnum", "ascii", "cntrl", "digit", "graph", "lower", "print", "punct", "space",
    "upper", "word", "xdigit",
];

fn canonical_key(name: &str, positive: bool) -> Option<String> {
    let canonical = if is_category_name(name)
        || matches!(
            name,
            "ALL"
                | "ASSIGNED"
                | "UNASSIGNED"
                | "IsWord"
                | "XmlNameStartChar"
                | "XmlNameChar"
                | "XmlWord"
        )
        || POSIX_NAMES.contains(&name)
    {
        name.to_string()
    } else {
        format!("blk:{}", blocks::canonical_block_key(name)?)
    };
    if positive {
        Some(canonical)
    } else {
        Some(format!("^{canonical}"))
    }
}

/// Builds the positive set for a canonical name. One linear sweep of the
/// code space per category request; everything else is composition or
/// static interval data.
fn build_named(name: &str) -> Option<RangeSet> {
    if is_category_name(name) {
        return Some(category_set(|abbrev| {
            if name.len() == 1 {
                abbrev.starts_with(name)
            } else {
                abbrev == name
            }
        }));
    }
    let set = match name {
        "ALL" => RangeSet::from_range(0, MAX_CODEPOINT),
        "ASSIGNED" => category_set(|a| a != "Cn"),
        "UNASSIGNED" => category_set(|a| a == "Cn"),
        "IsWord" | "word" => {
            let mut set = category_set(|a| matches!(a, "Lu" | "Ll" | "Lo" | "Nd"));
            set.add('_' as u32);
            set.sort_and_compact();
            set
        }
        "alpha" => category_set(|a| matches!(a, "Lu" | "Ll" | "Lo")),
        "alnum" => category_set(|a| matches!(a, "Lu" | "Ll" | "Lo" | "Nd")),
        "ascii" => RangeSet::from_range(0, 0x7F),
        "cntrl" => category_set(|a| a == "Cc"),
        "digit" => RangeSet::from_range('0' as u32, '9' as u32),
        "lower" => category_set(|a| a == "Ll"),
        "upper" => category_set(|a| a == "Lu"),
        "punct" => category_set(|a| a.starts_with('P')),
        "space" => {
            let mut set = category_set(|a| a.starts_with('Z'));
            set.add_range(0x09, 0x0D);
            set.add(' ' as u32);
            set.sort_and_compact();
            set
        }
        "graph" => {
            // Everything visible: not space, not control-like.
            let mut excluded = build_named("space")?;
            excluded.merge(&category_set(|a| a.starts_with('C')));
            excluded.complement()
        }
        "print" => {
            let mut set = build_named("graph")?;
            set.add(' ' as u32);
            set.sort_and_compact();
            set
        }
        "xdigit" => {
            let mut set = RangeSet::new();
            set.add_range('0' as u32, '9' as u32);
            set.add_range('A' as u32, 'F' as u32);
            set.add_range('a' as u32, 'f' as u32);
            set.sort_and_compact();
            set
        }
        "XmlNameStartChar" => blocks::xml_name_start_set(),
        "XmlNameChar" => blocks::xml_name_char_set(),
        // Everything except punctuation, separators and "other".
        "XmlWord" => {
            category_set(|a| a.starts_with('P') || a.starts_with('Z') || a.starts_with('C'))
                .complement()
        }
        _ => blocks::block_set(name)?,
    };
    Some(set)
}

fn category_set(pred: impl Fn(&'static str) -> bool) -> RangeSet {
    let mut set = RangeSet::new();
    let mut run: Option<(u32, u32)> = None;
    for cp in 0..=MAX_CODEPOINT {
        if pred(category_abbrev(category_of(cp))) {
            match run {
                Some((_, ref mut hi)) => *hi = cp,
                None => run = Some((cp, cp)),
            }
        } else if let Some((lo, hi)) = run.take() {
            set.add_range(lo, hi);
        }
    }
    if let Some((lo, hi)) = run {
        set.add_range(lo, hi);
    }
    set.sort_and_compact();
    set
}
