// Match result
// Capture-group offset table: one (begin, end) pair per group, -1
// meaning "did not participate in this match"

/// The result of a successful match: group 0 spans the whole match,
/// groups 1..N the capturing parentheses in left-to-right order.
///
/// A `Match` is reset at the start of every `matches` call it is passed
/// to, mutated only by the engine during that call, and read-only
/// afterwards. Reusing one across calls avoids reallocation.
#[derive(Debug, Default)]
pub struct Match {
    begins: Vec<isize>,
    ends: Vec<isize>,
    source: Vec<char>,
}

impl Match {
    pub fn new() -> Self {
        Match::default()
    }

    /// Number of groups recorded by the last match attempt, including
    /// group 0. Zero before any attempt.
    pub fn group_count(&self) -> usize {
        self.begins.len()
    }

    /// Start offset of the group, `None` when the group did not
    /// participate. Panics when `group` is out of range or no match has
    /// been attempted yet.
    pub fn start(&self, group: usize) -> Option<usize> {
        assert!(
            group < self.begins.len(),
            "group {group} out of range (no match attempted yet?)"
        );
        let begin = self.begins[group];
        (begin >= 0).then_some(begin as usize)
    }

    /// End offset of the group, exclusive; `None` when absent. Panics
    /// like `start`.
    pub fn end(&self, group: usize) -> Option<usize> {
        assert!(
            group < self.ends.len(),
            "group {group} out of range (no match attempted yet?)"
        );
        let end = self.ends[group];
        (end >= 0).then_some(end as usize)
    }

    /// The captured text of the group, `None` when absent.
    pub fn group(&self, group: usize) -> Option<String> {
        let (begin, end) = (self.start(group)?, self.end(group)?);
        Some(self.source[begin..end].iter().collect())
    }

    pub(crate) fn reset(&mut self, n_groups: usize) {
        self.begins.clear();
        self.begins.resize(n_groups, -1);
        self.ends.clear();
        self.ends.resize(n_groups, -1);
        self.source.clear();
    }

    /// Buffer the matcher copies the subject text into, for later
    /// extraction by `group`.
    pub(crate) fn source_buf(&mut self) -> &mut Vec<char> {
        &mut self.source
    }

    #[inline]
    pub(crate) fn begin_of(&self, group: usize) -> isize {
        self.begins[group]
    }

    #[inline]
    pub(crate) fn end_of(&self, group: usize) -> isize {
        self.ends[group]
    }

    #[inline]
    pub(crate) fn set_begin(&mut self, group: usize, offset: isize) {
        self.begins[group] = offset;
    }

    #[inline]
    pub(crate) fn set_end(&mut self, group: usize, offset: isize) {
        self.ends[group] = offset;
    }
}
