// Operation graph
// The executable form of a pattern: a flat arena of nodes addressed by
// id, each carrying its own continuation link. Continuations are shared,
// so the graph is a DAG (and cyclic through closure loops), which is why
// nodes live in an arena instead of owning their successors.

use std::sync::{Arc, OnceLock};

use crate::ast::{AnchorKind, LookKind};
use crate::ranges::RangeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct OpId(u32);

/// One node of the operation graph. `next: None` means the subgraph is
/// exhausted, which the matcher reads as success. Child and branch links
/// are `None` when the corresponding subpattern is empty.
#[derive(Debug)]
pub(crate) enum Op {
    Char {
        ch: char,
        next: Option<OpId>,
    },
    Dot {
        next: Option<OpId>,
    },
    Range {
        set: Arc<RangeSet>,
        negated: bool,
        /// Case-insensitive closure of `set`, built on first use under
        /// the ignore-case flag and immutable afterwards.
        folded: OnceLock<Arc<RangeSet>>,
        next: Option<OpId>,
    },
    Anchor {
        kind: AnchorKind,
        next: Option<OpId>,
    },
    Str {
        literal: Box<[char]>,
        next: Option<OpId>,
    },
    BackRef {
        gref: u32,
        next: Option<OpId>,
    },
    /// Ordered alternatives; each branch carries its own continuation,
    /// the node itself has none.
    Union {
        branches: Vec<Option<OpId>>,
    },
    /// Unbounded greedy loop. The id indexes the per-match table of
    /// offsets already tried, which stops zero-width repetition.
    Closure {
        id: u32,
        child: Option<OpId>,
        next: Option<OpId>,
    },
    NonGreedyClosure {
        child: Option<OpId>,
        next: Option<OpId>,
    },
    Question {
        child: Option<OpId>,
        next: Option<OpId>,
    },
    NonGreedyQuestion {
        child: Option<OpId>,
        next: Option<OpId>,
    },
    /// Positive `gref` records a group's start, negative its end.
    Capture {
        gref: i32,
        next: Option<OpId>,
    },
    Look {
        kind: LookKind,
        child: Option<OpId>,
        next: Option<OpId>,
    },
    Independent {
        child: Option<OpId>,
        next: Option<OpId>,
    },
    Modifier {
        add: u32,
        mask: u32,
        child: Option<OpId>,
        next: Option<OpId>,
    },
    Condition {
        /// Group reference; 0 when `cond` carries the condition graph.
        gref: u32,
        cond: Option<OpId>,
        yes: Option<OpId>,
        no: Option<OpId>,
        next: Option<OpId>,
    },
}

#[derive(Debug, Default)]
pub(crate) struct OpArena {
    ops: Vec<Op>,
}

impl OpArena {
    pub(crate) fn new() -> Self {
        OpArena { ops: Vec::new() }
    }

    pub(crate) fn push(&mut self, op: Op) -> OpId {
        let id = OpId(self.ops.len() as u32);
        self.ops.push(op);
        id
    }

    #[inline]
    pub(crate) fn get(&self, id: OpId) -> &Op {
        &self.ops[id.0 as usize]
    }

    /// Closes a closure's loop: the child subgraph is compiled with the
    /// closure node itself as its continuation, so the node must exist
    /// before its child link can be filled in.
    pub(crate) fn set_loop_child(&mut self, id: OpId, entry: Option<OpId>) {
        match &mut self.ops[id.0 as usize] {
            Op::Closure { child, .. } | Op::NonGreedyClosure { child, .. } => *child = entry,
            _ => unreachable!("not a closure node"),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.ops.len()
    }
}
