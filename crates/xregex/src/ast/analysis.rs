// Static pattern analyses
// Derived once per compiled pattern: match-length bounds, the admissible
// first-character set, and the longest guaranteed literal substring

use crate::ast::Ast;
use crate::options;
use crate::ranges::RangeSet;

/// Verdict of the first-character walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FirstChar {
    /// Every path starts with a character from the collected set.
    Terminal,
    /// This subtree can match empty; the walk must continue behind it.
    Continue,
    /// No useful first-character set exists.
    Any,
}

impl Ast {
    /// Fewest code points any match of this subtree can consume.
    pub(crate) fn min_length(&self) -> usize {
        match self {
            Ast::Empty | Ast::Anchor(_) | Ast::Look { .. } => 0,
            // A reference can capture the empty string.
            Ast::BackRef(_) => 0,
            Ast::Char(_) | Ast::Dot | Ast::Range { .. } => 1,
            Ast::Str(s) => s.chars().count(),
            Ast::Concat(children) => children.iter().map(Ast::min_length).sum(),
            Ast::Union(alts) => alts.iter().map(Ast::min_length).min().unwrap_or(0),
            Ast::Closure { child, min, .. } => child.min_length() * *min as usize,
            Ast::Paren { child, .. } | Ast::Independent(child) | Ast::Modifier { child, .. } => {
                child.min_length()
            }
            Ast::Condition { yes, no, .. } => {
                let no_len = no.as_ref().map_or(0, |n| n.min_length());
                yes.min_length().min(no_len)
            }
        }
    }

    /// Most code points any match can consume; `None` when unbounded.
    pub(crate) fn max_length(&self) -> Option<usize> {
        match self {
            Ast::Empty | Ast::Anchor(_) | Ast::Look { .. } => Some(0),
            Ast::BackRef(_) => None,
            Ast::Char(_) | Ast::Dot | Ast::Range { .. } => Some(1),
            Ast::Str(s) => Some(s.chars().count()),
            Ast::Concat(children) => children
                .iter()
                .try_fold(0usize, |acc, c| c.max_length().map(|m| acc + m)),
            Ast::Union(alts) => alts
                .iter()
                .try_fold(0usize, |acc, a| a.max_length().map(|m| acc.max(m))),
            Ast::Closure { child, max, .. } => match (child.max_length(), max) {
                (Some(0), _) => Some(0),
                (_, None) => None,
                (None, _) => None,
                (Some(c), Some(m)) => Some(c * *m as usize),
            },
            Ast::Paren { child, .. } | Ast::Independent(child) | Ast::Modifier { child, .. } => {
                child.max_length()
            }
            Ast::Condition { yes, no, .. } => {
                let no_len = no.as_ref().map_or(Some(0), |n| n.max_length());
                Some(yes.max_length()?.max(no_len?))
            }
        }
    }

    /// Collects the set of code points a match can start with.
    ///
    /// The caller may use `set` only on a `Terminal` verdict: every
    /// alternative then converges on a character with no unconditional
    /// empty path around it.
    pub(crate) fn analyze_first_char(&self, set: &mut RangeSet, opts: u32) -> FirstChar {
        let ignore_case = options::is_set(opts, options::IGNORE_CASE);
        match self {
            Ast::Empty | Ast::Anchor(_) | Ast::Look { .. } => FirstChar::Continue,
            Ast::Dot | Ast::BackRef(_) | Ast::Condition { .. } => FirstChar::Any,
            Ast::Char(ch) => {
                add_char(set, *ch, ignore_case);
                FirstChar::Terminal
            }
            Ast::Str(s) => match s.chars().next() {
                Some(ch) => {
                    add_char(set, ch, ignore_case);
                    FirstChar::Terminal
                }
                None => FirstChar::Continue,
            },
            Ast::Range { set: r, negated } => {
                let mut resolved = if ignore_case {
                    r.case_insensitive_closure()
                } else {
                    (**r).clone()
                };
                if *negated {
                    resolved = resolved.complement();
                }
                set.merge(&resolved);
                FirstChar::Terminal
            }
            Ast::Concat(children) => {
                for child in children {
                    match child.analyze_first_char(set, opts) {
                        FirstChar::Continue => continue,
                        verdict => return verdict,
                    }
                }
                FirstChar::Continue
            }
            Ast::Union(alts) => {
                let mut verdict = FirstChar::Terminal;
                if alts.is_empty() {
                    return FirstChar::Continue;
                }
                for alt in alts {
                    match alt.analyze_first_char(set, opts) {
                        FirstChar::Any => return FirstChar::Any,
                        FirstChar::Continue => verdict = FirstChar::Continue,
                        FirstChar::Terminal => {}
                    }
                }
                verdict
            }
            Ast::Closure { child, min, .. } => {
                let verdict = child.analyze_first_char(set, opts);
                if *min == 0 && verdict == FirstChar::Terminal {
                    FirstChar::Continue
                } else {
                    verdict
                }
            }
            Ast::Paren { child, .. } | Ast::Independent(child) => {
                child.analyze_first_char(set, opts)
            }
            Ast::Modifier { child, add, mask } => {
                child.analyze_first_char(set, (opts | add) & !mask)
            }
        }
    }

    /// The longest literal guaranteed to occur in every match, together
    /// with the option context it occurs under. Unions, closures,
    /// references, lookarounds and conditionals guarantee nothing.
    pub(crate) fn find_fixed_string(&self, opts: u32) -> Option<(String, u32)> {
        match self {
            Ast::Str(s) => Some((s.clone(), opts)),
            Ast::Concat(children) => {
                let mut best: Option<(String, u32)> = None;
                for child in children {
                    if let Some((s, o)) = child.find_fixed_string(opts) {
                        let longer = best
                            .as_ref()
                            .is_none_or(|(b, _)| s.chars().count() > b.chars().count());
                        if longer {
                            best = Some((s, o));
                        }
                    }
                }
                best
            }
            Ast::Paren { child, .. } => child.find_fixed_string(opts),
            Ast::Modifier { child, add, mask } => child.find_fixed_string((opts | add) & !mask),
            _ => None,
        }
    }
}

fn add_char(set: &mut RangeSet, ch: char, ignore_case: bool) {
    set.add(ch as u32);
    if ignore_case {
        for v in crate::unicode::case_variants(ch as u32) {
            set.add(v);
        }
    }
    set.sort_and_compact();
}
