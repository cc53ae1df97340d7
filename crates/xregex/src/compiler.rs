// Pattern compiler
// Lowers the syntax tree into the operation graph in continuation-passing
// style: compiling a subtree takes the node that follows it and returns
// the subtree's entry node. Recursion depth is bounded by pattern nesting
// depth, never by text length.

use crate::ast::Ast;
use crate::op::{Op, OpArena, OpId};

#[derive(Debug)]
pub(crate) struct CompiledGraph {
    pub(crate) arena: OpArena,
    pub(crate) entry: Option<OpId>,
    /// How many zero-width-guarded loop nodes the graph carries; sizes
    /// the per-match offset traces.
    pub(crate) n_closures: usize,
}

pub(crate) fn compile(ast: &Ast) -> CompiledGraph {
    let mut compiler = Compiler {
        arena: OpArena::new(),
        n_closures: 0,
    };
    let entry = compiler.compile_node(ast, None, false);
    log::debug!(
        "compiled pattern graph: {} ops, {} closures",
        compiler.arena.len(),
        compiler.n_closures
    );
    CompiledGraph {
        arena: compiler.arena,
        entry,
        n_closures: compiler.n_closures,
    }
}

struct Compiler {
    arena: OpArena,
    n_closures: usize,
}

impl Compiler {
    /// Compiles `ast` so that the returned entry runs the subtree and
    /// then falls through to `next`. `reverse` flips concatenation order
    /// and capture pairing for lookbehind subgraphs.
    fn compile_node(&mut self, ast: &Ast, next: Option<OpId>, reverse: bool) -> Option<OpId> {
        let id = match ast {
            Ast::Empty => return next,
            Ast::Char(ch) => self.arena.push(Op::Char { ch: *ch, next }),
            Ast::Dot => self.arena.push(Op::Dot { next }),
            Ast::Str(s) => self.arena.push(Op::Str {
                literal: s.chars().collect(),
                next,
            }),
            Ast::Range { set, negated } => self.arena.push(Op::Range {
                set: set.clone(),
                negated: *negated,
                folded: std::sync::OnceLock::new(),
                next,
            }),
            Ast::Anchor(kind) => self.arena.push(Op::Anchor { kind: *kind, next }),
            Ast::BackRef(n) => self.arena.push(Op::BackRef { gref: *n, next }),
            Ast::Concat(children) => {
                let mut ret = next;
                if !reverse {
                    for child in children.iter().rev() {
                        ret = self.compile_node(child, ret, reverse);
                    }
                } else {
                    for child in children {
                        ret = self.compile_node(child, ret, reverse);
                    }
                }
                return ret;
            }
            Ast::Union(alts) => {
                let branches = alts
                    .iter()
                    .map(|alt| self.compile_node(alt, next, reverse))
                    .collect();
                self.arena.push(Op::Union { branches })
            }
            Ast::Closure {
                child,
                min,
                max,
                greedy,
            } => return self.compile_closure(child, *min, *max, *greedy, next, reverse),
            Ast::Paren { child, group } => {
                if *group == 0 {
                    return self.compile_node(child, next, reverse);
                }
                let group = *group as i32;
                // Positive records the group start. A forward walk meets
                // the start first; a reverse walk meets the end first,
                // so the pair swaps and offsets stay correct.
                let (entry_ref, after_ref) = if reverse { (-group, group) } else { (group, -group) };
                let after = self.arena.push(Op::Capture {
                    gref: after_ref,
                    next,
                });
                let inner = self.compile_node(child, Some(after), reverse);
                self.arena.push(Op::Capture {
                    gref: entry_ref,
                    next: inner,
                })
            }
            Ast::Look { kind, child } => {
                let sub = self.compile_node(child, None, kind.is_behind());
                self.arena.push(Op::Look {
                    kind: *kind,
                    child: sub,
                    next,
                })
            }
            Ast::Independent(child) => {
                let sub = self.compile_node(child, None, reverse);
                self.arena.push(Op::Independent { child: sub, next })
            }
            Ast::Modifier { child, add, mask } => {
                let sub = self.compile_node(child, None, reverse);
                self.arena.push(Op::Modifier {
                    add: *add,
                    mask: *mask,
                    child: sub,
                    next,
                })
            }
            Ast::Condition {
                gref,
                cond,
                yes,
                no,
            } => {
                let cond = cond
                    .as_ref()
                    .and_then(|c| self.compile_node(c, None, reverse));
                let yes = self.compile_node(yes, next, reverse);
                let no = no
                    .as_ref()
                    .and_then(|n| self.compile_node(n, next, reverse));
                self.arena.push(Op::Condition {
                    gref: *gref,
                    cond,
                    yes,
                    no,
                    next,
                })
            }
        };
        Some(id)
    }

    /// `{m,m}` unrolls to copies, finite `{m,n}` to `m` copies plus
    /// `n-m` nested optionals (`X(X(XX?)?)?`), and an unbounded closure
    /// becomes a genuine loop node whose child continues at the node.
    fn compile_closure(
        &mut self,
        child: &Ast,
        min: u32,
        max: Option<u32>,
        greedy: bool,
        next: Option<OpId>,
        reverse: bool,
    ) -> Option<OpId> {
        if max == Some(min) {
            let mut ret = next;
            for _ in 0..min {
                ret = self.compile_node(child, ret, reverse);
            }
            return ret;
        }
        let mut ret;
        match max {
            Some(max) => {
                ret = next;
                for _ in 0..(max - min) {
                    let sub = self.compile_node(child, ret, reverse);
                    ret = Some(self.arena.push(if greedy {
                        Op::Question { child: sub, next }
                    } else {
                        Op::NonGreedyQuestion { child: sub, next }
                    }));
                }
            }
            None => {
                let node = if greedy {
                    let id = self.n_closures as u32;
                    self.n_closures += 1;
                    self.arena.push(Op::Closure {
                        id,
                        child: None,
                        next,
                    })
                } else {
                    self.arena.push(Op::NonGreedyClosure { child: None, next })
                };
                let entry = self.compile_node(child, Some(node), reverse);
                self.arena.set_loop_child(node, entry);
                ret = Some(node);
            }
        }
        for _ in 0..min {
            ret = self.compile_node(child, ret, reverse);
        }
        ret
    }
}
