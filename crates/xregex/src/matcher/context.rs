// Per-match scratch state
// One context is claimed for the duration of a match call and returned
// afterwards; nothing in it survives into the match result

use crate::match_result::Match;

/// Offsets at which one closure has already been entered during the
/// current attempt. Entering again at a recorded offset means the body
/// matched empty; the loop stops instead of repeating forever.
#[derive(Debug, Default)]
pub(crate) struct ClosureTrace {
    offsets: Vec<isize>,
}

impl ClosureTrace {
    #[inline]
    pub(crate) fn contains(&self, offset: isize) -> bool {
        self.offsets.contains(&offset)
    }

    #[inline]
    pub(crate) fn add(&mut self, offset: isize) {
        self.offsets.push(offset);
    }

    fn clear(&mut self) {
        self.offsets.clear();
    }
}

/// Mutable scratch for one running match: scan bounds, the zero-width
/// loop traces, and reusable buffers. Never shared between concurrently
/// running matches; the owning `Regex` keeps one preferred context and
/// allocates extras when that one is busy.
#[derive(Debug, Default)]
pub(crate) struct MatchContext {
    pub(crate) start: usize,
    pub(crate) limit: usize,
    pub(crate) length: usize,
    pub(crate) closures: Vec<ClosureTrace>,
    /// Decoded subject for `&str` entry points; kept to reuse capacity.
    pub(crate) decode_buf: Vec<char>,
    /// Capture table used when the caller did not supply one.
    pub(crate) scratch_match: Match,
}

impl MatchContext {
    pub(crate) fn new() -> Self {
        MatchContext::default()
    }

    pub(crate) fn reset(&mut self, start: usize, limit: usize, n_closures: usize) {
        self.start = start;
        self.limit = limit;
        self.length = limit - start;
        if self.closures.len() != n_closures {
            self.closures.resize_with(n_closures, ClosureTrace::default);
        }
        for trace in &mut self.closures {
            trace.clear();
        }
    }
}
