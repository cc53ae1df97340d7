// Matching engine
// The public Regex type, the accelerated match driver, and the
// backtracking interpreter. The interpreter never recurses: choice
// points go on an explicit operation stack and saved scalars on a data
// stack, so backtracking depth is bounded by memory, not by the native
// call stack.

mod context;
pub(crate) mod target;
mod word;

pub use target::CharAccess;

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Mutex, OnceLock};

use crate::ast::{AnchorKind, Ast, FirstChar, LookKind};
use crate::bmsearch::BmPattern;
use crate::compiler::{self, CompiledGraph};
use crate::error::ParseError;
use crate::match_result::Match;
use crate::op::{Op, OpId};
use crate::options;
use crate::parser;
use crate::ranges::RangeSet;
use crate::util;

use context::MatchContext;
pub(crate) use target::Target;
use word::{WordType, previous_word_type, word_type_at};

/// A compiled regular expression.
///
/// Construction parses the pattern completely; the operation graph and
/// the search accelerators are built once on first use. After that the
/// compiled state is immutable, so a `Regex` can serve any number of
/// concurrent matches. Per-match scratch lives in a context pool: one
/// preferred context for the single-threaded reuse case, fresh
/// allocations whenever that one is already claimed.
#[derive(Debug)]
pub struct Regex {
    pattern: String,
    options: u32,
    ast: Ast,
    /// Capture count plus one; group 0 is the whole match.
    n_groups: usize,
    has_backrefs: bool,
    prepared: OnceLock<Prepared>,
    context: Mutex<Option<Box<MatchContext>>>,
}

#[derive(Debug)]
struct Prepared {
    graph: CompiledGraph,
    min_length: usize,
    first_char: Option<RangeSet>,
    fixed: Option<FixedString>,
    /// The whole pattern is the fixed literal; matching is substring
    /// search alone and the interpreter never runs.
    fixed_only: bool,
}

#[derive(Debug)]
struct FixedString {
    literal: Vec<char>,
    table: BmPattern,
}

impl Regex {
    /// Compiles `pattern` with no options.
    pub fn new(pattern: &str) -> Result<Regex, ParseError> {
        Regex::with_flags(pattern, 0)
    }

    /// Compiles `pattern` with an option letter string (order
    /// independent), e.g. `"im"`.
    pub fn with_options(pattern: &str, option_letters: &str) -> Result<Regex, ParseError> {
        Regex::with_flags(pattern, options::parse_options(option_letters)?)
    }

    pub(crate) fn with_flags(pattern: &str, opts: u32) -> Result<Regex, ParseError> {
        let parsed = parser::parse(pattern, opts)?;
        Ok(Regex {
            pattern: pattern.to_string(),
            options: opts,
            ast: parsed.ast,
            n_groups: parsed.n_groups,
            has_backrefs: parsed.has_backrefs,
            prepared: OnceLock::new(),
            context: Mutex::new(None),
        })
    }

    /// The pattern text as given to the constructor.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// The options in canonical letter order.
    pub fn options_string(&self) -> String {
        options::option_string(self.options)
    }

    pub(crate) fn flags(&self) -> u32 {
        self.options
    }

    /// Number of groups, group 0 included: 1 when the pattern has no
    /// capturing parentheses.
    pub fn group_count(&self) -> usize {
        self.n_groups
    }

    /// Does the text contain this pattern? (In the schema dialect: does
    /// the whole text match?)
    pub fn matches(&self, text: &str) -> bool {
        self.match_str(text, None, None)
    }

    /// Like `matches`, filling `m` with group offsets on success.
    pub fn matches_with(&self, text: &str, m: &mut Match) -> bool {
        self.match_str(text, None, Some(m))
    }

    /// Matches against the code-point range `[start, end)` of `text`.
    pub fn matches_range(
        &self,
        text: &str,
        start: usize,
        end: usize,
        m: Option<&mut Match>,
    ) -> bool {
        self.match_str(text, Some((start, end)), m)
    }

    /// Matches against a caller-held code-point slice.
    pub fn matches_chars(&self, text: &[char], m: Option<&mut Match>) -> bool {
        self.matches_chars_range(text, 0, text.len(), m)
    }

    /// Matches against `[start, end)` of a caller-held code-point slice.
    pub fn matches_chars_range(
        &self,
        text: &[char],
        start: usize,
        end: usize,
        m: Option<&mut Match>,
    ) -> bool {
        let mut ctx = self.claim_context();
        let result = self.run(&Target::Slice(text), start, end, m, &mut ctx);
        self.release_context(ctx);
        result
    }

    /// Matches against an abstract random-access text.
    pub fn matches_source(&self, text: &dyn CharAccess, m: Option<&mut Match>) -> bool {
        let mut ctx = self.claim_context();
        let result = self.run(&Target::Access(text), 0, text.len(), m, &mut ctx);
        self.release_context(ctx);
        result
    }

    fn match_str(
        &self,
        text: &str,
        range: Option<(usize, usize)>,
        m: Option<&mut Match>,
    ) -> bool {
        let mut ctx = self.claim_context();
        let mut buf = std::mem::take(&mut ctx.decode_buf);
        buf.clear();
        buf.extend(text.chars());
        let (start, end) = range.unwrap_or((0, buf.len()));
        let result = self.run(&Target::Slice(&buf), start, end, m, &mut ctx);
        ctx.decode_buf = buf;
        self.release_context(ctx);
        result
    }

    // ---- context pool ---------------------------------------------

    fn claim_context(&self) -> Box<MatchContext> {
        self.context
            .lock()
            .unwrap()
            .take()
            .unwrap_or_else(|| Box::new(MatchContext::new()))
    }

    fn release_context(&self, ctx: Box<MatchContext>) {
        let mut slot = self.context.lock().unwrap();
        if slot.is_none() {
            *slot = Some(ctx);
        }
    }

    // ---- one-time preparation -------------------------------------

    fn prepare(&self) -> &Prepared {
        self.prepared.get_or_init(|| {
            let graph = compiler::compile(&self.ast);
            let min_length = self.ast.min_length();
            let schema = options::is_set(self.options, options::XMLSCHEMA_MODE);

            let mut first_char = None;
            if !options::is_set(self.options, options::PROHIBIT_HEAD_CHARACTER_OPTIMIZATION)
                && !schema
            {
                let mut set = RangeSet::new();
                if self.ast.analyze_first_char(&mut set, self.options) == FirstChar::Terminal {
                    set.sort_and_compact();
                    log::debug!("first-character filter active ({} ranges)", set.ranges().len());
                    first_char = Some(set);
                }
            }

            let mut fixed = None;
            let mut fixed_only = false;
            if let Some(entry) = graph.entry {
                let literal = match graph.arena.get(entry) {
                    Op::Str { literal, next: None } => Some(literal.to_vec()),
                    Op::Char { ch, next: None } => Some(vec![*ch]),
                    _ => None,
                };
                if let Some(literal) = literal {
                    log::debug!("pattern is a fixed literal of {} chars", literal.len());
                    let ignore_case = options::is_set(self.options, options::IGNORE_CASE);
                    fixed = Some(FixedString {
                        table: BmPattern::new(&literal, ignore_case),
                        literal,
                    });
                    fixed_only = true;
                }
            }
            if !fixed_only
                && !options::is_set(self.options, options::PROHIBIT_FIXED_STRING_OPTIMIZATION)
                && !schema
            {
                if let Some((s, fixed_opts)) = self.ast.find_fixed_string(self.options) {
                    let literal: Vec<char> = s.chars().collect();
                    if literal.len() >= 2 {
                        log::debug!("fixed-string prefilter of {} chars", literal.len());
                        let ignore_case = options::is_set(fixed_opts, options::IGNORE_CASE);
                        fixed = Some(FixedString {
                            table: BmPattern::new(&literal, ignore_case),
                            literal,
                        });
                    }
                }
            }

            Prepared {
                graph,
                min_length,
                first_char,
                fixed,
                fixed_only,
            }
        })
    }

    // ---- match driver ---------------------------------------------

    fn run(
        &self,
        target: &Target,
        start: usize,
        limit: usize,
        match_out: Option<&mut Match>,
        ctx: &mut MatchContext,
    ) -> bool {
        let mut scratch = std::mem::take(&mut ctx.scratch_match);
        let result = match match_out {
            Some(m) => {
                m.reset(self.n_groups);
                target.copy_into(m.source_buf());
                self.run_inner(target, start, limit, m, ctx)
            }
            None => {
                // Backreferences and conditionals read the capture
                // table even when the caller wants none.
                scratch.reset(self.n_groups);
                self.run_inner(target, start, limit, &mut scratch, ctx)
            }
        };
        ctx.scratch_match = scratch;
        result
    }

    fn run_inner(
        &self,
        target: &Target,
        start: usize,
        limit: usize,
        m: &mut Match,
        con: &mut MatchContext,
    ) -> bool {
        let prepared = self.prepare();
        con.reset(start, limit, prepared.graph.n_closures);
        let opts = self.options;

        // Schema mode: one attempt from the start, whole range must be
        // consumed.
        if options::is_set(opts, options::XMLSCHEMA_MODE) {
            let end = self.attempt(
                prepared,
                target,
                con,
                m,
                prepared.graph.entry,
                start as isize,
                1,
                opts,
            );
            if end == limit as isize {
                m.set_begin(0, start as isize);
                m.set_end(0, end);
                return true;
            }
            return false;
        }

        // The whole pattern is one literal: substring search decides.
        if prepared.fixed_only {
            let fixed = prepared.fixed.as_ref().unwrap();
            return match fixed.table.search(target, start, limit) {
                Some(at) => {
                    m.set_begin(0, at as isize);
                    m.set_end(0, (at + fixed.literal.len()) as isize);
                    true
                }
                None => false,
            };
        }

        // A literal guaranteed in every match: absent means no match,
        // with no interpreter run at all.
        if let Some(fixed) = &prepared.fixed {
            if fixed.table.search(target, start, limit).is_none() {
                return false;
            }
        }

        let Some(scan_end) = limit.checked_sub(prepared.min_length) else {
            return false;
        };
        if scan_end < start {
            return false;
        }

        let entry = prepared.graph.entry;
        let mut match_start = start;
        let mut match_end = -1isize;

        if self.has_leading_dot_closure(prepared) {
            if options::is_set(opts, options::SINGLE_LINE) {
                match_end = self.attempt(prepared, target, con, m, entry, start as isize, 1, opts);
            } else {
                // Only line-start offsets can begin a match.
                let mut previous_is_eol = true;
                for ms in start..=scan_end {
                    let ch = (ms < limit).then(|| target.char_at(ms));
                    match ch {
                        Some(c) if util::is_eol_char(c) => previous_is_eol = true,
                        _ => {
                            if previous_is_eol {
                                match_end = self.attempt(
                                    prepared, target, con, m, entry, ms as isize, 1, opts,
                                );
                                if match_end >= 0 {
                                    match_start = ms;
                                    break;
                                }
                            }
                            previous_is_eol = false;
                        }
                    }
                }
            }
        } else if let Some(first_char) = &prepared.first_char {
            // Skip offsets that cannot begin any match.
            for ms in start..=scan_end {
                if ms >= limit || !first_char.contains_char(target.char_at(ms)) {
                    continue;
                }
                match_end = self.attempt(prepared, target, con, m, entry, ms as isize, 1, opts);
                if match_end >= 0 {
                    match_start = ms;
                    break;
                }
            }
        } else {
            for ms in start..=scan_end {
                match_end = self.attempt(prepared, target, con, m, entry, ms as isize, 1, opts);
                if match_end >= 0 {
                    match_start = ms;
                    break;
                }
            }
        }

        if match_end >= 0 {
            m.set_begin(0, match_start as isize);
            m.set_end(0, match_end);
            true
        } else {
            false
        }
    }

    /// Does the graph start with an unbounded `.` closure?
    fn has_leading_dot_closure(&self, prepared: &Prepared) -> bool {
        let Some(entry) = prepared.graph.entry else {
            return false;
        };
        match prepared.graph.arena.get(entry) {
            Op::Closure {
                child: Some(child), ..
            } => matches!(prepared.graph.arena.get(*child), Op::Dot { .. }),
            _ => false,
        }
    }

    // ---- the backtracking interpreter -----------------------------

    /// Runs the graph from `entry` at `offset`, walking in direction
    /// `dx` (+1 forward, -1 for lookbehind subgraphs). Returns the end
    /// offset on success, -1 on failure.
    ///
    /// Visit and resume behavior are keyed by the same node: branching
    /// nodes push themselves onto the operation stack and their saved
    /// scalars onto the data stack before descending; when a path dies
    /// the pop handler for that node decides the retry.
    #[allow(clippy::too_many_arguments)]
    fn attempt(
        &self,
        prepared: &Prepared,
        target: &Target,
        con: &mut MatchContext,
        m: &mut Match,
        entry: Option<OpId>,
        start_offset: isize,
        start_dx: isize,
        init_opts: u32,
    ) -> isize {
        let arena = &prepared.graph.arena;
        let start = con.start as isize;
        let limit = con.limit as isize;

        let mut op_stack: Vec<OpId> = Vec::new();
        let mut data_stack: Vec<isize> = Vec::new();
        let mut op = entry;
        let mut offset = start_offset;
        let mut dx = start_dx;
        let mut opts = init_opts;
        let mut ret: isize;
        let mut returned: bool;

        loop {
            if op.is_none() || offset > limit || offset < start {
                ret = if op.is_none() {
                    if options::is_set(opts, options::XMLSCHEMA_MODE) && offset != limit {
                        -1
                    } else {
                        offset
                    }
                } else {
                    -1
                };
                returned = true;
            } else {
                let id = op.unwrap();
                ret = -1;
                returned = false;
                let ignore_case = options::is_set(opts, options::IGNORE_CASE);
                match arena.get(id) {
                    Op::Char { ch, next } => {
                        let o1 = if dx > 0 { offset } else { offset - 1 };
                        if o1 >= limit
                            || o1 < 0
                            || !match_char(*ch, target.char_at(o1 as usize), ignore_case)
                        {
                            returned = true;
                        } else {
                            offset += dx;
                            op = *next;
                        }
                    }

                    Op::Dot { next } => {
                        let o1 = if dx > 0 { offset } else { offset - 1 };
                        if o1 >= limit || o1 < 0 {
                            returned = true;
                        } else if !options::is_set(opts, options::SINGLE_LINE)
                            && util::is_eol_char(target.char_at(o1 as usize))
                        {
                            returned = true;
                        } else {
                            offset += dx;
                            op = *next;
                        }
                    }

                    Op::Range {
                        set,
                        negated,
                        folded,
                        next,
                    } => {
                        let o1 = if dx > 0 { offset } else { offset - 1 };
                        if o1 >= limit || o1 < 0 {
                            returned = true;
                        } else {
                            let ch = target.char_at(o1 as usize) as u32;
                            let inside = if ignore_case {
                                folded
                                    .get_or_init(|| {
                                        std::sync::Arc::new(set.case_insensitive_closure())
                                    })
                                    .contains(ch)
                            } else {
                                set.contains(ch)
                            };
                            if inside == *negated {
                                returned = true;
                            } else {
                                offset += dx;
                                op = *next;
                            }
                        }
                    }

                    Op::Anchor { kind, next } => {
                        if self.match_anchor(target, *kind, con, offset, opts) {
                            op = *next;
                        } else {
                            returned = true;
                        }
                    }

                    Op::BackRef { gref, next } => {
                        let gref = *gref as usize;
                        debug_assert!(gref >= 1 && gref < self.n_groups);
                        let begin = m.begin_of(gref);
                        let end = m.end_of(gref);
                        if begin < 0 || end < 0 {
                            returned = true;
                        } else {
                            let len = end - begin;
                            let at = if dx > 0 { offset } else { offset - len };
                            if at < 0
                                || !target.region_matches(
                                    ignore_case,
                                    at as usize,
                                    con.limit,
                                    begin as usize,
                                    len as usize,
                                )
                            {
                                returned = true;
                            } else {
                                offset += len * dx.signum();
                                op = *next;
                            }
                        }
                    }

                    Op::Str { literal, next } => {
                        let len = literal.len() as isize;
                        let at = if dx > 0 { offset } else { offset - len };
                        if at < 0
                            || !target.region_matches_literal(
                                ignore_case,
                                at as usize,
                                con.limit,
                                literal,
                            )
                        {
                            returned = true;
                        } else {
                            offset += len * dx.signum();
                            op = *next;
                        }
                    }

                    Op::Closure { id: cid, child, .. } => {
                        // A second entry at this offset means the body
                        // matched empty; stop looping here.
                        let trace = &mut con.closures[*cid as usize];
                        if trace.contains(offset) {
                            returned = true;
                        } else {
                            trace.add(offset);
                            op_stack.push(id);
                            data_stack.push(offset);
                            op = *child;
                        }
                    }

                    Op::Question { child, .. } => {
                        op_stack.push(id);
                        data_stack.push(offset);
                        op = *child;
                    }

                    Op::NonGreedyClosure { next, .. } | Op::NonGreedyQuestion { next, .. } => {
                        op_stack.push(id);
                        data_stack.push(offset);
                        op = *next;
                    }

                    Op::Union { branches } => {
                        if branches.is_empty() {
                            returned = true;
                        } else {
                            op_stack.push(id);
                            data_stack.push(0);
                            data_stack.push(offset);
                            op = branches[0];
                        }
                    }

                    Op::Capture { gref, next } => {
                        let saved = if *gref > 0 {
                            let group = *gref as usize;
                            let old = m.begin_of(group);
                            m.set_begin(group, offset);
                            old
                        } else {
                            let group = (-*gref) as usize;
                            let old = m.end_of(group);
                            m.set_end(group, offset);
                            old
                        };
                        data_stack.push(saved);
                        op_stack.push(id);
                        data_stack.push(offset);
                        op = *next;
                    }

                    Op::Look { kind, child, .. } => {
                        op_stack.push(id);
                        data_stack.push(dx);
                        data_stack.push(offset);
                        dx = if kind.is_behind() { -1 } else { 1 };
                        op = *child;
                    }

                    Op::Independent { child, .. } => {
                        op_stack.push(id);
                        data_stack.push(offset);
                        op = *child;
                    }

                    Op::Modifier {
                        add, mask, child, ..
                    } => {
                        let local = (opts | add) & !mask;
                        op_stack.push(id);
                        data_stack.push(opts as isize);
                        data_stack.push(offset);
                        opts = local;
                        op = *child;
                    }

                    Op::Condition {
                        gref,
                        cond,
                        yes,
                        no,
                        next,
                    } => {
                        if *gref > 0 {
                            let group = *gref as usize;
                            debug_assert!(group < self.n_groups);
                            if m.begin_of(group) >= 0 && m.end_of(group) >= 0 {
                                op = *yes;
                            } else if no.is_some() {
                                op = *no;
                            } else {
                                op = *next;
                            }
                        } else {
                            op_stack.push(id);
                            data_stack.push(offset);
                            op = *cond;
                        }
                    }
                }
            }

            // Resume handlers: pop choice points until one yields a new
            // path or the stacks are exhausted.
            while returned {
                let Some(id) = op_stack.pop() else {
                    return ret;
                };
                offset = data_stack.pop().unwrap();

                match arena.get(id) {
                    Op::Closure { next, .. } | Op::Question { next, .. } => {
                        if ret < 0 {
                            op = *next;
                            returned = false;
                        }
                    }

                    Op::NonGreedyClosure { child, .. } | Op::NonGreedyQuestion { child, .. } => {
                        if ret < 0 {
                            op = *child;
                            returned = false;
                        }
                    }

                    Op::Union { branches } => {
                        let branch = data_stack.pop().unwrap();
                        if ret < 0 {
                            let next_branch = (branch + 1) as usize;
                            if next_branch < branches.len() {
                                op_stack.push(id);
                                data_stack.push(next_branch as isize);
                                data_stack.push(offset);
                                op = branches[next_branch];
                                returned = false;
                            } else {
                                ret = -1;
                            }
                        }
                    }

                    Op::Capture { gref, .. } => {
                        let saved = data_stack.pop().unwrap();
                        if ret < 0 {
                            if *gref > 0 {
                                m.set_begin(*gref as usize, saved);
                            } else {
                                m.set_end((-*gref) as usize, saved);
                            }
                        }
                    }

                    Op::Look { kind, next, .. } => {
                        dx = data_stack.pop().unwrap();
                        let positive = matches!(kind, LookKind::Ahead | LookKind::Behind);
                        if (positive && ret >= 0) || (!positive && ret < 0) {
                            op = *next;
                            returned = false;
                        }
                        ret = -1;
                    }

                    Op::Modifier { next, .. } => {
                        opts = data_stack.pop().unwrap() as u32;
                        if ret >= 0 {
                            offset = ret;
                            op = *next;
                            returned = false;
                        }
                    }

                    Op::Independent { next, .. } => {
                        if ret >= 0 {
                            offset = ret;
                            op = *next;
                            returned = false;
                        }
                    }

                    Op::Condition { yes, no, next, .. } => {
                        if ret >= 0 {
                            op = *yes;
                        } else if no.is_some() {
                            op = *no;
                        } else {
                            op = *next;
                        }
                        returned = false;
                    }

                    _ => {}
                }
            }
        }
    }

    fn match_anchor(
        &self,
        target: &Target,
        kind: AnchorKind,
        con: &MatchContext,
        offset: isize,
        opts: u32,
    ) -> bool {
        let start = con.start as isize;
        let limit = con.limit as isize;
        let char_at = |at: isize| target.char_at(at as usize);
        match kind {
            AnchorKind::LineStart => {
                if options::is_set(opts, options::MULTIPLE_LINES) {
                    offset == start
                        || (offset > start
                            && offset < limit
                            && util::is_eol_char(char_at(offset - 1)))
                } else {
                    offset == start
                }
            }
            AnchorKind::TextStart => offset == start,
            AnchorKind::LineEnd => {
                if options::is_set(opts, options::MULTIPLE_LINES) {
                    offset == limit
                        || (offset < limit && util::is_eol_char(char_at(offset)))
                } else {
                    lenient_text_end(target, offset, limit)
                }
            }
            AnchorKind::TextEndLenient => lenient_text_end(target, offset, limit),
            AnchorKind::TextEnd => offset == limit,
            AnchorKind::WordBoundary => {
                if con.length == 0 {
                    return false;
                }
                let after = word_type_at(target, con.start, con.limit, offset, opts);
                if after == WordType::Ignore {
                    return false;
                }
                after != previous_word_type(target, con.start, con.limit, offset, opts)
            }
            AnchorKind::NotWordBoundary => {
                if con.length == 0 {
                    return true;
                }
                let after = word_type_at(target, con.start, con.limit, offset, opts);
                after == WordType::Ignore
                    || after == previous_word_type(target, con.start, con.limit, offset, opts)
            }
            AnchorKind::WordStart => {
                if con.length == 0 || offset == limit {
                    return false;
                }
                word_type_at(target, con.start, con.limit, offset, opts) == WordType::Letter
                    && previous_word_type(target, con.start, con.limit, offset, opts)
                        == WordType::Other
            }
            AnchorKind::WordEnd => {
                if con.length == 0 || offset == start {
                    return false;
                }
                word_type_at(target, con.start, con.limit, offset, opts) == WordType::Other
                    && previous_word_type(target, con.start, con.limit, offset, opts)
                        == WordType::Letter
            }
        }
    }
}

/// `$` without multiline and `\Z`: end of text, or just before one
/// final line terminator, or just before a final CR LF.
fn lenient_text_end(target: &Target, offset: isize, limit: isize) -> bool {
    offset == limit
        || (offset + 1 == limit && util::is_eol_char(target.char_at(offset as usize)))
        || (offset + 2 == limit
            && target.char_at(offset as usize) == util::CARRIAGE_RETURN
            && target.char_at(offset as usize + 1) == util::LINE_FEED)
}

#[inline]
fn match_char(expected: char, actual: char, ignore_case: bool) -> bool {
    if ignore_case {
        target::chars_eq_ignore_case(expected, actual)
    } else {
        expected == actual
    }
}

impl fmt::Display for Regex {
    /// Reconstructs pattern text from the syntax tree; it parses back to
    /// the same behavior, not necessarily the same characters.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.ast.fmt(f)
    }
}

impl PartialEq for Regex {
    /// Same pattern text and equivalent options.
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern && self.options == other.options
    }
}

impl Eq for Regex {}

impl Hash for Regex {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.pattern.hash(state);
        self.options.hash(state);
    }
}
