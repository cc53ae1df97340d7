// Pattern reconstruction
// Turns a syntax tree back into pattern text; the result is not
// character-for-character the source, but parses to the same behavior

use std::fmt;

use crate::ast::{AnchorKind, Ast, LookKind};
use crate::options;
use crate::util;

impl fmt::Display for Ast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ast::Empty => Ok(()),
            Ast::Char(ch) => write_literal(f, *ch),
            Ast::Str(s) => {
                for ch in s.chars() {
                    write_literal(f, ch)?;
                }
                Ok(())
            }
            Ast::Dot => f.write_str("."),
            Ast::Range { set, negated } => {
                f.write_str(if *negated { "[^" } else { "[" })?;
                for &(lo, hi) in set.ranges() {
                    write_class_char(f, lo)?;
                    if hi > lo {
                        f.write_str("-")?;
                        write_class_char(f, hi)?;
                    }
                }
                f.write_str("]")
            }
            Ast::Anchor(kind) => f.write_str(match kind {
                AnchorKind::LineStart => "^",
                AnchorKind::LineEnd => "$",
                AnchorKind::TextStart => "\\A",
                AnchorKind::TextEndLenient => "\\Z",
                AnchorKind::TextEnd => "\\z",
                AnchorKind::WordBoundary => "\\b",
                AnchorKind::NotWordBoundary => "\\B",
                AnchorKind::WordStart => "\\<",
                AnchorKind::WordEnd => "\\>",
            }),
            Ast::Concat(children) => {
                for child in children {
                    child.fmt(f)?;
                }
                Ok(())
            }
            Ast::Union(alts) => {
                for (i, alt) in alts.iter().enumerate() {
                    if i > 0 {
                        f.write_str("|")?;
                    }
                    alt.fmt(f)?;
                }
                Ok(())
            }
            Ast::Closure {
                child,
                min,
                max,
                greedy,
            } => {
                child.fmt(f)?;
                let mut buf = itoa::Buffer::new();
                match (*min, *max) {
                    (0, None) => f.write_str("*")?,
                    (1, None) => f.write_str("+")?,
                    (0, Some(1)) => f.write_str("?")?,
                    (m, None) => write!(f, "{{{},}}", buf.format(m))?,
                    (m, Some(n)) if m == n => write!(f, "{{{}}}", buf.format(m))?,
                    (m, Some(n)) => {
                        let mut buf2 = itoa::Buffer::new();
                        write!(f, "{{{},{}}}", buf.format(m), buf2.format(n))?;
                    }
                }
                if !greedy {
                    f.write_str("?")?;
                }
                Ok(())
            }
            Ast::Paren { child, group } => {
                if *group > 0 {
                    write!(f, "({child})")
                } else {
                    write!(f, "(?:{child})")
                }
            }
            Ast::BackRef(n) => {
                let mut buf = itoa::Buffer::new();
                write!(f, "\\{}", buf.format(*n))
            }
            Ast::Look { kind, child } => {
                f.write_str(look_prefix(*kind))?;
                write!(f, "{child})")
            }
            Ast::Independent(child) => write!(f, "(?>{child})"),
            Ast::Modifier { child, add, mask } => {
                f.write_str("(?")?;
                f.write_str(&options::modifier_string(*add))?;
                if *mask != 0 {
                    f.write_str("-")?;
                    f.write_str(&options::modifier_string(*mask))?;
                }
                write!(f, ":{child})")
            }
            Ast::Condition {
                gref,
                cond,
                yes,
                no,
            } => {
                f.write_str("(?(")?;
                match cond {
                    Some(cond) => match cond.as_ref() {
                        // The look's own parens merge with the condition parens.
                        Ast::Look { kind, child } => {
                            f.write_str(&look_prefix(*kind)[1..])?;
                            write!(f, "{child})")?;
                        }
                        other => write!(f, "{other})")?,
                    },
                    None => {
                        let mut buf = itoa::Buffer::new();
                        write!(f, "{})", buf.format(*gref))?;
                    }
                }
                yes.fmt(f)?;
                if let Some(no) = no {
                    write!(f, "|{no}")?;
                }
                f.write_str(")")
            }
        }
    }
}

fn look_prefix(kind: LookKind) -> &'static str {
    match kind {
        LookKind::Ahead => "(?=",
        LookKind::NegativeAhead => "(?!",
        LookKind::Behind => "(?<=",
        LookKind::NegativeBehind => "(?<!",
    }
}

fn write_literal(f: &mut fmt::Formatter<'_>, ch: char) -> fmt::Result {
    if util::is_meta_char(ch) {
        write!(f, "\\{ch}")
    } else if ch.is_control() || util::is_eol_char(ch) {
        write!(f, "\\x{{{:X}}}", ch as u32)
    } else {
        write!(f, "{ch}")
    }
}

fn write_class_char(f: &mut fmt::Formatter<'_>, cp: u32) -> fmt::Result {
    match char::from_u32(cp) {
        Some(ch) if matches!(ch, '[' | ']' | '\\' | '-' | '^' | ',') => write!(f, "\\{ch}"),
        Some(ch) if ch.is_control() || util::is_eol_char(ch) => {
            write!(f, "\\x{{{:X}}}", cp)
        }
        Some(ch) => write!(f, "{ch}"),
        None => write!(f, "\\x{{{cp:X}}}"),
    }
}
