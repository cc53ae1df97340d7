// Text-source abstraction
// The matcher addresses text by code-point index through one view,
// whatever the backing store

/// Random-access text supplied by the caller. Implement this to match
/// against storage the engine has no native view for (ropes, gap
/// buffers, memory-mapped code-point arrays).
pub trait CharAccess {
    /// Length in code points.
    fn len(&self) -> usize;

    /// The code point at `index`; `index < len()`.
    fn char_at(&self, index: usize) -> char;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The matcher-side view. Strings decode into the match context's
/// buffer and arrive here as the slice variant.
pub(crate) enum Target<'a> {
    Slice(&'a [char]),
    Access(&'a dyn CharAccess),
}

impl Target<'_> {
    #[inline]
    pub(crate) fn char_at(&self, index: usize) -> char {
        match self {
            Target::Slice(s) => s[index],
            Target::Access(a) => a.char_at(index),
        }
    }

    pub(crate) fn copy_into(&self, out: &mut Vec<char>) {
        out.clear();
        match self {
            Target::Slice(s) => out.extend_from_slice(s),
            Target::Access(a) => out.extend((0..a.len()).map(|i| a.char_at(i))),
        }
    }

    /// Does `[offset, offset+len)` equal the literal? `limit` bounds the
    /// readable region.
    pub(crate) fn region_matches_literal(
        &self,
        ignore_case: bool,
        offset: usize,
        limit: usize,
        literal: &[char],
    ) -> bool {
        if limit.checked_sub(offset).is_none_or(|room| room < literal.len()) {
            return false;
        }
        match self {
            Target::Slice(s) => {
                let region = &s[offset..offset + literal.len()];
                if ignore_case {
                    region
                        .iter()
                        .zip(literal)
                        .all(|(&a, &b)| chars_eq_ignore_case(a, b))
                } else {
                    region == literal
                }
            }
            Target::Access(a) => literal.iter().enumerate().all(|(i, &b)| {
                let ch = a.char_at(offset + i);
                if ignore_case {
                    chars_eq_ignore_case(ch, b)
                } else {
                    ch == b
                }
            }),
        }
    }

    /// Does `[offset, offset+len)` equal `[offset2, offset2+len)` of the
    /// same text? Backreferences compare through this.
    pub(crate) fn region_matches(
        &self,
        ignore_case: bool,
        offset: usize,
        limit: usize,
        offset2: usize,
        len: usize,
    ) -> bool {
        if limit.checked_sub(offset).is_none_or(|room| room < len) {
            return false;
        }
        (0..len).all(|i| {
            let a = self.char_at(offset + i);
            let b = self.char_at(offset2 + i);
            if ignore_case {
                chars_eq_ignore_case(a, b)
            } else {
                a == b
            }
        })
    }
}

/// Case-insensitive comparison in three stages: exact, uppercased, then
/// lowercase of the uppercased forms. The stages are not redundant;
/// Unicode case mappings are asymmetric and a single fold misses pairs
/// this accepts.
#[inline]
pub(crate) fn chars_eq_ignore_case(a: char, b: char) -> bool {
    if a == b {
        return true;
    }
    let ua = crate::unicode::single_uppercase(a).unwrap_or(a);
    let ub = crate::unicode::single_uppercase(b).unwrap_or(b);
    if ua == ub {
        return true;
    }
    crate::unicode::single_lowercase(ua).unwrap_or(ua)
        == crate::unicode::single_lowercase(ub).unwrap_or(ub)
}
