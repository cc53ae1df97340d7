// Code-point interval sets
// The canonical representation behind character classes: a sorted,
// compacted list of closed intervals with set algebra over it

use crate::util::MAX_CODEPOINT;

/// A set of Unicode code points stored as closed intervals `[lo, hi]`.
///
/// After `sort_and_compact` the intervals are sorted by `lo`, pairwise
/// disjoint and non-adjacent (`hi + 1 < next.lo`), and membership tests
/// use a 256-bit map for the Latin-1 range plus binary search above it.
/// The algebra operations (`merge`, `subtract`, `intersect`,
/// `complement`) require both operands compacted; feeding them an
/// uncompacted set is a programming error, not a runtime failure.
#[derive(Debug, Clone)]
pub struct RangeSet {
    ranges: Vec<(u32, u32)>,
    compacted: bool,
    /// One bit per code point below 0x100, valid while `compacted`.
    map: [u64; 4],
    /// Index of the first interval reaching past 0xFF, valid while
    /// `compacted`; membership above the map searches from here.
    above_map: usize,
}

impl RangeSet {
    pub fn new() -> Self {
        RangeSet {
            ranges: Vec::new(),
            compacted: true,
            map: [0; 4],
            above_map: 0,
        }
    }

    pub fn from_range(lo: u32, hi: u32) -> Self {
        let mut set = RangeSet::new();
        set.add_range(lo, hi);
        set.sort_and_compact();
        set
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn ranges(&self) -> &[(u32, u32)] {
        &self.ranges
    }

    /// Adds the closed interval `[lo, hi]`.
    ///
    /// Appending in ascending order takes a fast path that keeps the set
    /// sorted; out-of-order inserts are fine but leave the set
    /// uncompacted until the next `sort_and_compact`.
    pub fn add_range(&mut self, lo: u32, hi: u32) {
        debug_assert!(lo <= hi && hi <= MAX_CODEPOINT);
        match self.ranges.last_mut() {
            Some(last) if last.0 <= lo => {
                if lo <= last.1.saturating_add(1) {
                    if hi > last.1 {
                        last.1 = hi;
                    }
                } else {
                    self.ranges.push((lo, hi));
                }
            }
            Some(_) => self.ranges.push((lo, hi)),
            None => self.ranges.push((lo, hi)),
        }
        self.compacted = false;
    }

    /// Adds a single code point.
    #[inline]
    pub fn add(&mut self, cp: u32) {
        self.add_range(cp, cp);
    }

    /// Sorts the intervals and merges every overlapping or adjacent
    /// pair, then rebuilds the membership accelerators. Idempotent.
    pub fn sort_and_compact(&mut self) {
        if !self.ranges.is_sorted_by_key(|r| (r.0, r.1)) {
            self.ranges.sort_unstable();
        }
        let mut out: Vec<(u32, u32)> = Vec::with_capacity(self.ranges.len());
        for &(lo, hi) in &self.ranges {
            match out.last_mut() {
                Some(last) if lo <= last.1.saturating_add(1) => {
                    if hi > last.1 {
                        last.1 = hi;
                    }
                }
                _ => out.push((lo, hi)),
            }
        }
        self.ranges = out;
        self.rebuild_lookup();
        self.compacted = true;
    }

    fn rebuild_lookup(&mut self) {
        self.map = [0; 4];
        self.above_map = self.ranges.len();
        for (i, &(lo, hi)) in self.ranges.iter().enumerate() {
            if lo < 0x100 {
                let end = hi.min(0xFF);
                for cp in lo..=end {
                    self.map[(cp >> 6) as usize] |= 1u64 << (cp & 63);
                }
            }
            if hi >= 0x100 && i < self.above_map {
                self.above_map = i;
            }
        }
    }

    /// Membership test. O(1) for code points below 0x100 on a compacted
    /// set, binary search above; linear scan on an uncompacted set.
    #[inline]
    pub fn contains(&self, cp: u32) -> bool {
        if self.compacted {
            if cp < 0x100 {
                return self.map[(cp >> 6) as usize] & (1u64 << (cp & 63)) != 0;
            }
            let tail = &self.ranges[self.above_map..];
            let idx = tail.partition_point(|r| r.0 <= cp);
            return idx > 0 && tail[idx - 1].1 >= cp;
        }
        self.ranges.iter().any(|&(lo, hi)| lo <= cp && cp <= hi)
    }

    #[inline]
    pub fn contains_char(&self, ch: char) -> bool {
        self.contains(ch as u32)
    }

    /// Union: afterwards `self.contains(x) == old.contains(x) || other.contains(x)`.
    pub fn merge(&mut self, other: &RangeSet) {
        self.ranges.extend_from_slice(&other.ranges);
        self.sort_and_compact();
    }

    /// Difference: afterwards `self.contains(x) == old.contains(x) && !other.contains(x)`.
    /// Linear two-pointer sweep over two compacted lists.
    pub fn subtract(&mut self, other: &RangeSet) {
        debug_assert!(self.compacted && other.compacted);
        let mut out: Vec<(u32, u32)> = Vec::with_capacity(self.ranges.len());
        let mut j = 0;
        for &(lo, hi) in &self.ranges {
            while j < other.ranges.len() && other.ranges[j].1 < lo {
                j += 1;
            }
            let mut cur = lo;
            let mut k = j;
            while cur <= hi && k < other.ranges.len() && other.ranges[k].0 <= hi {
                let (slo, shi) = other.ranges[k];
                if slo > cur {
                    out.push((cur, slo - 1));
                }
                if shi >= hi {
                    cur = hi + 1;
                    break;
                }
                cur = cur.max(shi + 1);
                k += 1;
            }
            if cur <= hi {
                out.push((cur, hi));
            }
        }
        self.ranges = out;
        self.rebuild_lookup();
        self.compacted = true;
    }

    /// Intersection: afterwards `self.contains(x) == old.contains(x) && other.contains(x)`.
    pub fn intersect(&mut self, other: &RangeSet) {
        debug_assert!(self.compacted && other.compacted);
        let mut out: Vec<(u32, u32)> = Vec::new();
        let (a, b) = (&self.ranges, &other.ranges);
        let (mut i, mut j) = (0, 0);
        while i < a.len() && j < b.len() {
            let lo = a[i].0.max(b[j].0);
            let hi = a[i].1.min(b[j].1);
            if lo <= hi {
                out.push((lo, hi));
            }
            if a[i].1 < b[j].1 {
                i += 1;
            } else {
                j += 1;
            }
        }
        self.ranges = out;
        self.rebuild_lookup();
        self.compacted = true;
    }

    /// The complement over `[0, MAX_CODEPOINT]` of a compacted set.
    pub fn complement(&self) -> RangeSet {
        debug_assert!(self.compacted);
        let mut out = RangeSet::new();
        let mut next = 0u32;
        for &(lo, hi) in &self.ranges {
            if lo > next {
                out.add_range(next, lo - 1);
            }
            if hi == MAX_CODEPOINT {
                out.sort_and_compact();
                return out;
            }
            next = hi + 1;
        }
        out.add_range(next, MAX_CODEPOINT);
        out.sort_and_compact();
        out
    }

    /// The set closed under simple case variation: every code point is
    /// joined by its single-code-point upper and lower case variants.
    pub fn case_insensitive_closure(&self) -> RangeSet {
        let mut out = self.clone();
        let mut extra = RangeSet::new();
        for &(lo, hi) in &self.ranges {
            for cp in lo..=hi {
                for v in crate::unicode::case_variants(cp) {
                    if !self.contains(v) {
                        extra.add_range(v, v);
                    }
                }
            }
        }
        extra.sort_and_compact();
        out.merge(&extra);
        out
    }
}

impl Default for RangeSet {
    fn default() -> Self {
        RangeSet::new()
    }
}

impl PartialEq for RangeSet {
    fn eq(&self, other: &Self) -> bool {
        self.ranges == other.ranges
    }
}

impl Eq for RangeSet {}
