// Pattern parser
// Recursive descent over two dialects sharing one grammar. The tokenizer
// runs in two contexts: the normal context drives `fetch_token`, while
// character classes read code points directly because escape and
// metacharacter rules differ inside brackets.

mod schema;

use std::sync::Arc;

use crate::ast::{AnchorKind, Ast, LookKind};
use crate::error::{ParseError, ParseErrorKind};
use crate::options;
use crate::ranges::RangeSet;
use crate::unicode;
use crate::util::MAX_CODEPOINT;

/// Which grammar productions are enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Dialect {
    /// The permissive Perl-like grammar.
    Full,
    /// The XML-Schema-like grammar: `^`/`$` are literal, lookaround,
    /// conditionals, modifiers, independent groups, POSIX classes,
    /// backreferences and class algebra are rejected; bracket
    /// subtraction and the XML name-class shorthands are added.
    Schema,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tok {
    Char,
    Eof,
    Or,
    Star,
    Plus,
    Question,
    LParen,
    RParen,
    Dot,
    LBracket,
    Caret,
    Dollar,
    Backslash,
    NonCapturing, // (?:
    Lookahead,    // (?=
    NegLookahead, // (?!
    Lookbehind,   // (?<=
    NegLookbehind, // (?<!
    Independent,  // (?>
    SetOp,        // (?[
    Modifiers,    // (?ims-ims
    Condition,    // (?(
}

/// Result of a successful parse.
pub(crate) struct Parsed {
    pub(crate) ast: Ast,
    /// Capture count plus one; group 0 is the whole match.
    pub(crate) n_groups: usize,
    pub(crate) has_backrefs: bool,
}

/// Parses `pattern` under `opts` (the X bit selects the dialect).
/// All-or-nothing: any syntax violation aborts the whole parse.
pub(crate) fn parse(pattern: &str, opts: u32) -> Result<Parsed, ParseError> {
    let dialect = if options::is_set(opts, options::XMLSCHEMA_MODE) {
        Dialect::Schema
    } else {
        Dialect::Full
    };
    let mut parser = Parser {
        chars: pattern.chars().collect(),
        pos: 0,
        options: opts,
        dialect,
        token: Tok::Eof,
        chardata: '\0',
        token_offset: 0,
        group_count: 0,
        has_backrefs: false,
        refs: Vec::new(),
        closed_groups: Vec::new(),
    };
    parser.fetch_token()?;
    let ast = parser.parse_regex()?;
    if parser.token != Tok::Eof {
        return Err(ParseError::new(
            ParseErrorKind::UnmatchedParen,
            parser.token_offset,
        ));
    }
    for pending in &parser.refs {
        if pending.number == 0 || pending.number > parser.group_count || !pending.closed_at_use {
            return Err(ParseError::new(
                ParseErrorKind::InvalidReference,
                pending.offset,
            ));
        }
    }
    Ok(Parsed {
        ast,
        n_groups: parser.group_count as usize + 1,
        has_backrefs: parser.has_backrefs,
    })
}

/// A backreference or conditional reference awaiting end-of-parse
/// validation against the final capture count.
struct PendingRef {
    number: u32,
    offset: usize,
    closed_at_use: bool,
}

struct Parser {
    chars: Vec<char>,
    /// Next unread index (code-point offsets).
    pos: usize,
    options: u32,
    dialect: Dialect,
    token: Tok,
    /// Payload of a `Char` token; for `Backslash` the escaped character,
    /// still unconsumed.
    chardata: char,
    /// Where the current token started; error offsets point here.
    token_offset: usize,
    group_count: u32,
    has_backrefs: bool,
    refs: Vec<PendingRef>,
    closed_groups: Vec<u32>,
}

enum ClassAtom {
    Cp(u32),
    Set(Arc<RangeSet>, bool),
}

impl Parser {
    // ---- raw character access -------------------------------------

    #[inline]
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    #[inline]
    fn peek_at(&self, ahead: usize) -> Option<char> {
        self.chars.get(self.pos + ahead).copied()
    }

    #[inline]
    fn next_char(&mut self) -> Option<char> {
        let ch = self.peek();
        if ch.is_some() {
            self.pos += 1;
        }
        ch
    }

    fn err<T>(&self, kind: ParseErrorKind, offset: usize) -> Result<T, ParseError> {
        Err(ParseError::new(kind, offset))
    }

    fn expect_raw(&mut self, expected: char, kind: ParseErrorKind) -> Result<(), ParseError> {
        if self.peek() == Some(expected) {
            self.pos += 1;
            Ok(())
        } else {
            self.err(kind, self.pos)
        }
    }

    fn read_number(&mut self) -> Option<u32> {
        let mut value: Option<u32> = None;
        while let Some(d) = self.peek().and_then(|c| c.to_digit(10)) {
            self.pos += 1;
            value = Some(value.unwrap_or(0).checked_mul(10)?.checked_add(d)?);
        }
        value
    }

    fn is_extended(&self) -> bool {
        options::is_set(self.options, options::EXTENDED_COMMENT)
    }

    // ---- normal-context tokenizer ---------------------------------

    fn fetch_token(&mut self) -> Result<(), ParseError> {
        if self.is_extended() {
            loop {
                match self.peek() {
                    Some(c) if c.is_whitespace() => {
                        self.pos += 1;
                    }
                    Some('#') => {
                        while let Some(c) = self.next_char() {
                            if c == '\n' {
                                break;
                            }
                        }
                    }
                    _ => break,
                }
            }
        }
        self.token_offset = self.pos;
        let Some(ch) = self.next_char() else {
            self.token = Tok::Eof;
            return Ok(());
        };
        self.chardata = ch;
        self.token = match ch {
            '|' => Tok::Or,
            '*' => Tok::Star,
            '+' => Tok::Plus,
            '?' => Tok::Question,
            ')' => Tok::RParen,
            '.' => Tok::Dot,
            '[' => Tok::LBracket,
            '^' if self.dialect == Dialect::Full => Tok::Caret,
            '$' if self.dialect == Dialect::Full => Tok::Dollar,
            '(' => return self.fetch_paren_token(),
            '\\' => match self.peek() {
                Some(escaped) => {
                    self.chardata = escaped;
                    Tok::Backslash
                }
                None => return self.err(ParseErrorKind::UnexpectedEnd, self.token_offset),
            },
            _ => Tok::Char,
        };
        Ok(())
    }

    fn fetch_paren_token(&mut self) -> Result<(), ParseError> {
        if self.peek() != Some('?') {
            self.token = Tok::LParen;
            return Ok(());
        }
        if self.dialect == Dialect::Schema {
            return self.err(ParseErrorKind::NotInThisDialect, self.token_offset);
        }
        self.pos += 1;
        let Some(ch) = self.next_char() else {
            return self.err(ParseErrorKind::UnexpectedEnd, self.token_offset);
        };
        self.token = match ch {
            ':' => Tok::NonCapturing,
            '=' => Tok::Lookahead,
            '!' => Tok::NegLookahead,
            '>' => Tok::Independent,
            '[' => Tok::SetOp,
            '(' => Tok::Condition,
            '<' => match self.next_char() {
                Some('=') => Tok::Lookbehind,
                Some('!') => Tok::NegLookbehind,
                Some(_) => return self.err(ParseErrorKind::UnexpectedChar, self.pos - 1),
                None => return self.err(ParseErrorKind::UnexpectedEnd, self.token_offset),
            },
            '#' => {
                loop {
                    match self.next_char() {
                        Some(')') => break,
                        Some(_) => {}
                        None => {
                            return self.err(
                                ParseErrorKind::UnterminatedComment,
                                self.token_offset,
                            );
                        }
                    }
                }
                return self.fetch_token();
            }
            c if c == '-' || options::modifier_flag_for_letter(c).is_some() => {
                self.pos -= 1;
                Tok::Modifiers
            }
            _ => return self.err(ParseErrorKind::UnexpectedChar, self.pos - 1),
        };
        Ok(())
    }

    // ---- grammar --------------------------------------------------

    /// `regex := term ('|' term)*`
    fn parse_regex(&mut self) -> Result<Ast, ParseError> {
        let mut alts = vec![self.parse_term()?];
        while self.token == Tok::Or {
            self.fetch_token()?;
            alts.push(self.parse_term()?);
        }
        Ok(if alts.len() == 1 {
            alts.pop().unwrap()
        } else {
            Ast::Union(alts)
        })
    }

    /// `term := factor*`, runs of literal characters fold into strings.
    fn parse_term(&mut self) -> Result<Ast, ParseError> {
        let mut children = Vec::new();
        while !matches!(self.token, Tok::Eof | Tok::Or | Tok::RParen) {
            let node = self.parse_factor()?;
            Ast::push_concat(&mut children, node);
        }
        Ok(Ast::concat_of(children))
    }

    /// `factor := anchor | atom quantifier?`
    fn parse_factor(&mut self) -> Result<Ast, ParseError> {
        match self.token {
            Tok::Caret => {
                self.fetch_token()?;
                Ok(Ast::Anchor(AnchorKind::LineStart))
            }
            Tok::Dollar => {
                self.fetch_token()?;
                Ok(Ast::Anchor(AnchorKind::LineEnd))
            }
            Tok::Backslash
                if self.dialect == Dialect::Full
                    && matches!(self.chardata, 'A' | 'Z' | 'z' | 'b' | 'B' | '<' | '>') =>
            {
                let kind = match self.chardata {
                    'A' => AnchorKind::TextStart,
                    'Z' => AnchorKind::TextEndLenient,
                    'z' => AnchorKind::TextEnd,
                    'b' => AnchorKind::WordBoundary,
                    'B' => AnchorKind::NotWordBoundary,
                    '<' => AnchorKind::WordStart,
                    _ => AnchorKind::WordEnd,
                };
                self.pos += 1;
                self.fetch_token()?;
                Ok(Ast::Anchor(kind))
            }
            _ => {
                let atom = self.parse_atom()?;
                self.parse_quantifier(atom)
            }
        }
    }

    fn parse_quantifier(&mut self, atom: Ast) -> Result<Ast, ParseError> {
        let (min, max) = match self.token {
            Tok::Star => (0, None),
            Tok::Plus => (1, None),
            Tok::Question => (0, Some(1)),
            Tok::Char if self.chardata == '{' => return self.parse_minmax(atom),
            _ => return Ok(atom),
        };
        self.fetch_token()?;
        let greedy = if self.token == Tok::Question {
            self.fetch_token()?;
            false
        } else {
            true
        };
        Ok(Ast::Closure {
            child: Box::new(atom),
            min,
            max,
            greedy,
        })
    }

    /// `{m}`, `{m,}`, `{m,n}`, `{,n}` with an optional non-greedy `?`.
    fn parse_minmax(&mut self, atom: Ast) -> Result<Ast, ParseError> {
        let start = self.token_offset;
        let min = self.read_number();
        let max = if self.peek() == Some(',') {
            self.pos += 1;
            if self.peek() == Some('}') {
                None
            } else {
                match self.read_number() {
                    Some(n) => Some(n),
                    None => return self.err(ParseErrorKind::InvalidQuantifier, start),
                }
            }
        } else {
            match min {
                Some(m) => Some(m),
                None => return self.err(ParseErrorKind::InvalidQuantifier, start),
            }
        };
        if min.is_none() && max.is_none() {
            return self.err(ParseErrorKind::InvalidQuantifier, start);
        }
        let min = min.unwrap_or(0);
        self.expect_raw('}', ParseErrorKind::InvalidQuantifier)?;
        if let Some(m) = max {
            if min > m {
                return self.err(ParseErrorKind::QuantifierOutOfOrder, start);
            }
        }
        self.fetch_token()?;
        let greedy = if self.token == Tok::Question {
            self.fetch_token()?;
            false
        } else {
            true
        };
        Ok(Ast::Closure {
            child: Box::new(atom),
            min,
            max,
            greedy,
        })
    }

    fn parse_atom(&mut self) -> Result<Ast, ParseError> {
        match self.token {
            Tok::Dot => {
                self.fetch_token()?;
                Ok(Ast::Dot)
            }
            Tok::Char => {
                let ch = self.chardata;
                self.fetch_token()?;
                Ok(Ast::Char(ch))
            }
            Tok::LBracket => {
                let (set, negated) = self.parse_class_body()?;
                self.fetch_token()?;
                Ok(Ast::Range {
                    set: Arc::new(set),
                    negated,
                })
            }
            Tok::LParen => {
                self.group_count += 1;
                let group = self.group_count;
                self.fetch_token()?;
                let child = self.parse_regex()?;
                self.expect_rparen()?;
                self.closed_groups.push(group);
                Ok(Ast::Paren {
                    child: Box::new(child),
                    group,
                })
            }
            Tok::NonCapturing => {
                self.fetch_token()?;
                let child = self.parse_regex()?;
                self.expect_rparen()?;
                Ok(Ast::Paren {
                    child: Box::new(child),
                    group: 0,
                })
            }
            Tok::Lookahead | Tok::NegLookahead | Tok::Lookbehind | Tok::NegLookbehind => {
                let kind = match self.token {
                    Tok::Lookahead => LookKind::Ahead,
                    Tok::NegLookahead => LookKind::NegativeAhead,
                    Tok::Lookbehind => LookKind::Behind,
                    _ => LookKind::NegativeBehind,
                };
                self.fetch_token()?;
                let child = self.parse_regex()?;
                self.expect_rparen()?;
                Ok(Ast::Look {
                    kind,
                    child: Box::new(child),
                })
            }
            Tok::Independent => {
                self.fetch_token()?;
                let child = self.parse_regex()?;
                self.expect_rparen()?;
                Ok(Ast::Independent(Box::new(child)))
            }
            Tok::SetOp => self.parse_set_operations(),
            Tok::Modifiers => self.parse_modifiers(),
            Tok::Condition => self.parse_condition(),
            Tok::Backslash => self.parse_escape_atom(),
            _ => self.err(ParseErrorKind::UnexpectedChar, self.token_offset),
        }
    }

    fn expect_rparen(&mut self) -> Result<(), ParseError> {
        if self.token == Tok::RParen {
            self.fetch_token()
        } else {
            self.err(ParseErrorKind::UnterminatedGroup, self.token_offset)
        }
    }

    /// `(?ims-ims:...)` scoping to the group, or `(?ims-ims)` scoping to
    /// the rest of the enclosing group. The x flag changes tokenization,
    /// so the parser's own options follow the modifier while the child
    /// is parsed.
    fn parse_modifiers(&mut self) -> Result<Ast, ParseError> {
        let mut add = 0u32;
        let mut mask = 0u32;
        loop {
            match self.peek() {
                Some(c) if options::modifier_flag_for_letter(c).is_some() => {
                    add |= options::modifier_flag_for_letter(c).unwrap();
                    self.pos += 1;
                }
                _ => break,
            }
        }
        if self.peek() == Some('-') {
            self.pos += 1;
            loop {
                match self.peek() {
                    Some(c) if options::modifier_flag_for_letter(c).is_some() => {
                        mask |= options::modifier_flag_for_letter(c).unwrap();
                        self.pos += 1;
                    }
                    _ => break,
                }
            }
            if mask == 0 {
                return self.err(ParseErrorKind::UnknownOption, self.pos);
            }
        }
        let saved = self.options;
        self.options = (self.options | add) & !mask;
        let result = match self.peek() {
            Some(':') => {
                self.pos += 1;
                self.fetch_token().and_then(|_| {
                    let child = self.parse_regex()?;
                    self.expect_rparen()?;
                    Ok((child, true))
                })
            }
            Some(')') => {
                self.pos += 1;
                self.fetch_token().and_then(|_| {
                    // Applies to the rest of the enclosing group; its end
                    // is the enclosing ')' which stays unconsumed here.
                    let child = self.parse_regex()?;
                    Ok((child, false))
                })
            }
            Some(_) => self.err(ParseErrorKind::UnknownOption, self.pos),
            None => self.err(ParseErrorKind::UnexpectedEnd, self.pos),
        };
        self.options = saved;
        let (child, _) = result?;
        Ok(Ast::Modifier {
            child: Box::new(child),
            add,
            mask,
        })
    }

    /// `(?(ref)yes|no)`, `(?(?=cond)yes|no)`, `(?(anchor)yes|no)`.
    fn parse_condition(&mut self) -> Result<Ast, ParseError> {
        let off = self.pos;
        let mut gref = 0u32;
        let cond = match self.peek() {
            Some(d) if d.is_ascii_digit() => {
                gref = match self.read_number() {
                    Some(n) => n,
                    None => return self.err(ParseErrorKind::InvalidReference, off),
                };
                self.refs.push(PendingRef {
                    number: gref,
                    offset: off,
                    closed_at_use: self.closed_groups.contains(&gref),
                });
                self.has_backrefs = true;
                self.expect_raw(')', ParseErrorKind::UnterminatedGroup)?;
                self.fetch_token()?;
                None
            }
            Some('?') => {
                self.pos += 1;
                let kind = match self.next_char() {
                    Some('=') => LookKind::Ahead,
                    Some('!') => LookKind::NegativeAhead,
                    Some('<') => match self.next_char() {
                        Some('=') => LookKind::Behind,
                        Some('!') => LookKind::NegativeBehind,
                        _ => return self.err(ParseErrorKind::UnexpectedChar, self.pos - 1),
                    },
                    _ => return self.err(ParseErrorKind::UnexpectedChar, self.pos - 1),
                };
                self.fetch_token()?;
                let child = self.parse_regex()?;
                self.expect_rparen()?;
                Some(Box::new(Ast::Look {
                    kind,
                    child: Box::new(child),
                }))
            }
            Some('\\') => {
                self.pos += 1;
                let kind = match self.next_char() {
                    Some('A') => AnchorKind::TextStart,
                    Some('Z') => AnchorKind::TextEndLenient,
                    Some('z') => AnchorKind::TextEnd,
                    Some('b') => AnchorKind::WordBoundary,
                    Some('B') => AnchorKind::NotWordBoundary,
                    Some('<') => AnchorKind::WordStart,
                    Some('>') => AnchorKind::WordEnd,
                    _ => return self.err(ParseErrorKind::UnexpectedChar, self.pos - 1),
                };
                self.expect_raw(')', ParseErrorKind::UnterminatedGroup)?;
                self.fetch_token()?;
                Some(Box::new(Ast::Anchor(kind)))
            }
            Some(c @ ('^' | '$')) => {
                self.pos += 1;
                let kind = if c == '^' {
                    AnchorKind::LineStart
                } else {
                    AnchorKind::LineEnd
                };
                self.expect_raw(')', ParseErrorKind::UnterminatedGroup)?;
                self.fetch_token()?;
                Some(Box::new(Ast::Anchor(kind)))
            }
            Some(_) => return self.err(ParseErrorKind::UnexpectedChar, self.pos),
            None => return self.err(ParseErrorKind::UnexpectedEnd, self.pos),
        };
        let yes = self.parse_term()?;
        let no = if self.token == Tok::Or {
            self.fetch_token()?;
            Some(Box::new(self.parse_term()?))
        } else {
            None
        };
        if self.token == Tok::Or {
            return self.err(ParseErrorKind::InvalidCondition, self.token_offset);
        }
        self.expect_rparen()?;
        Ok(Ast::Condition {
            gref,
            cond,
            yes: Box::new(yes),
            no,
        })
    }

    // ---- escapes in the normal context ----------------------------

    fn parse_escape_atom(&mut self) -> Result<Ast, ParseError> {
        let off = self.token_offset;
        let ch = self.chardata;
        // Property escapes belong to both dialects.
        if ch == 'p' || ch == 'P' {
            self.pos += 1;
            let set = self.parse_property(ch == 'P', off)?;
            self.fetch_token()?;
            return Ok(Ast::Range {
                set,
                negated: false,
            });
        }
        if self.dialect == Dialect::Schema {
            if let Some((set, negated)) = schema::shorthand(ch) {
                self.pos += 1;
                self.fetch_token()?;
                return Ok(Ast::Range { set, negated });
            }
            if ch.is_ascii_digit() {
                return self.err(ParseErrorKind::NotInThisDialect, off);
            }
        } else {
            match ch {
                'd' | 'D' | 'w' | 'W' | 's' | 'S' => {
                    self.pos += 1;
                    let (set, negated) = self.shorthand_set(ch);
                    self.fetch_token()?;
                    return Ok(Ast::Range { set, negated });
                }
                '1'..='9' => return self.parse_backreference(off),
                _ => {}
            }
        }
        let cp = self.parse_escaped_code_point(off)?;
        let literal = match char::from_u32(cp) {
            Some(c) => c,
            None => return self.err(ParseErrorKind::InvalidCodePoint, off),
        };
        self.fetch_token()?;
        Ok(Ast::Char(literal))
    }

    /// `\1`…: consumes further digits only while the longer number still
    /// names a group seen so far.
    fn parse_backreference(&mut self, off: usize) -> Result<Ast, ParseError> {
        let first = self.next_char().and_then(|c| c.to_digit(10)).unwrap_or(0);
        let mut number = first;
        while let Some(d) = self.peek().and_then(|c| c.to_digit(10)) {
            let wider = number * 10 + d;
            if wider > self.group_count {
                break;
            }
            number = wider;
            self.pos += 1;
        }
        self.refs.push(PendingRef {
            number,
            offset: off,
            closed_at_use: self.closed_groups.contains(&number),
        });
        self.has_backrefs = true;
        self.fetch_token()?;
        Ok(Ast::BackRef(number))
    }

    /// Decodes one escaped code point; the leading `\` is consumed, the
    /// escape character is not. Surrogate values pass through so that
    /// class set algebra can hold them; atom callers reject them.
    fn parse_escaped_code_point(&mut self, off: usize) -> Result<u32, ParseError> {
        let Some(ch) = self.next_char() else {
            return self.err(ParseErrorKind::UnexpectedEnd, off);
        };
        let cp = match ch {
            'e' => 0x1B,
            'f' => 0x0C,
            'n' => 0x0A,
            'r' => 0x0D,
            't' => 0x09,
            'c' => match self.next_char() {
                Some(c @ '@'..='_') => c as u32 - 0x40,
                Some(_) => return self.err(ParseErrorKind::InvalidControlEscape, self.pos - 1),
                None => return self.err(ParseErrorKind::UnexpectedEnd, off),
            },
            'x' => {
                if self.peek() == Some('{') {
                    self.pos += 1;
                    let mut value: u32 = 0;
                    let mut digits = 0;
                    loop {
                        match self.next_char() {
                            Some('}') => break,
                            Some(c) => match c.to_digit(16) {
                                Some(d) => {
                                    digits += 1;
                                    value = value
                                        .checked_mul(16)
                                        .and_then(|v| v.checked_add(d))
                                        .filter(|&v| v <= MAX_CODEPOINT)
                                        .ok_or(ParseError::new(
                                            ParseErrorKind::InvalidCodePoint,
                                            off,
                                        ))?;
                                }
                                None => {
                                    return self.err(ParseErrorKind::InvalidCodePoint, off);
                                }
                            },
                            None => return self.err(ParseErrorKind::UnexpectedEnd, off),
                        }
                    }
                    if digits == 0 {
                        return self.err(ParseErrorKind::InvalidCodePoint, off);
                    }
                    value
                } else {
                    self.read_fixed_hex(2, off)?
                }
            }
            'v' => {
                let value = self.read_fixed_hex(6, off)?;
                if value > MAX_CODEPOINT {
                    return self.err(ParseErrorKind::InvalidCodePoint, off);
                }
                value
            }
            c if c.is_ascii_alphanumeric() => {
                return self.err(ParseErrorKind::UnknownEscape, off);
            }
            c => c as u32,
        };
        Ok(cp)
    }

    fn read_fixed_hex(&mut self, count: usize, off: usize) -> Result<u32, ParseError> {
        let mut value = 0u32;
        for _ in 0..count {
            match self.next_char().and_then(|c| c.to_digit(16)) {
                Some(d) => value = value * 16 + d,
                None => return self.err(ParseErrorKind::InvalidCodePoint, off),
            }
        }
        Ok(value)
    }

    /// Shorthand class sets of the full dialect; the "u" option swaps in
    /// the Unicode definitions.
    fn shorthand_set(&self, ch: char) -> (Arc<RangeSet>, bool) {
        let unicode_mode = options::is_set(self.options, options::USE_UNICODE_CATEGORY);
        let negated = ch.is_ascii_uppercase();
        let set = match ch.to_ascii_lowercase() {
            'd' => {
                if unicode_mode {
                    unicode::range_for("Nd", true).unwrap()
                } else {
                    Arc::new(RangeSet::from_range('0' as u32, '9' as u32))
                }
            }
            's' => {
                let mut set = RangeSet::new();
                set.add(0x09); // \t
                set.add(0x0A); // \n
                set.add(0x0C); // \f
                set.add(0x0D); // \r
                set.add(' ' as u32);
                set.sort_and_compact();
                if unicode_mode {
                    set.merge(&unicode::range_for("Z", true).unwrap());
                }
                Arc::new(set)
            }
            _ => {
                // 'w'
                if unicode_mode {
                    unicode::word_range()
                } else {
                    let mut set = RangeSet::new();
                    set.add_range('0' as u32, '9' as u32);
                    set.add_range('A' as u32, 'Z' as u32);
                    set.add('_' as u32);
                    set.add_range('a' as u32, 'z' as u32);
                    set.sort_and_compact();
                    Arc::new(set)
                }
            }
        };
        (set, negated)
    }

    /// `\p{Name}`, `\P{Name}`, `\pL`, `\PL`. Negation is folded into the
    /// set via complement.
    fn parse_property(
        &mut self,
        negated: bool,
        off: usize,
    ) -> Result<Arc<RangeSet>, ParseError> {
        let name: String = match self.peek() {
            Some('{') => {
                self.pos += 1;
                let mut name = String::new();
                loop {
                    match self.next_char() {
                        Some('}') => break,
                        Some(c) => name.push(c),
                        None => return self.err(ParseErrorKind::UnexpectedEnd, off),
                    }
                }
                name
            }
            Some(c @ ('L' | 'M' | 'N' | 'Z' | 'C' | 'P' | 'S')) => {
                self.pos += 1;
                c.to_string()
            }
            _ => return self.err(ParseErrorKind::UnknownProperty, off),
        };
        match unicode::range_for(&name, !negated) {
            Some(set) => Ok(set),
            None => self.err(ParseErrorKind::UnknownProperty, off),
        }
    }

    // ---- character classes (in-class tokenizer context) ------------

    /// Parses a bracket class body; `[` is already consumed. Returns the
    /// collected set (positive ranges) and the negation flag.
    fn parse_class_body(&mut self) -> Result<(RangeSet, bool), ParseError> {
        let open = self.pos - 1;
        let special_comma = options::is_set(self.options, options::SPECIAL_COMMA);
        let negated = if self.peek() == Some('^') {
            self.pos += 1;
            true
        } else {
            false
        };
        let mut set = RangeSet::new();
        let mut first = true;
        loop {
            let Some(ch) = self.peek() else {
                return self.err(ParseErrorKind::UnterminatedClass, open);
            };
            if ch == ']' {
                if first {
                    return self.err(ParseErrorKind::EmptyClass, open);
                }
                self.pos += 1;
                break;
            }
            first = false;
            if special_comma && ch == ',' {
                self.pos += 1;
                continue;
            }
            if self.dialect == Dialect::Schema && ch == '-' && self.peek_at(1) == Some('[') {
                // Schema class subtraction [base-[subtrahend]]; it must
                // close the whole class.
                self.pos += 2;
                let (sub, sub_negated) = self.parse_class_body()?;
                let sub = if sub_negated { sub.complement() } else { sub };
                set.sort_and_compact();
                set.subtract(&sub);
                self.expect_raw(']', ParseErrorKind::UnterminatedClass)?;
                set.sort_and_compact();
                return Ok((set, negated));
            }
            if self.dialect == Dialect::Full && ch == '[' && self.peek_at(1) == Some(':') {
                self.parse_posix_class(&mut set)?;
                continue;
            }
            match self.parse_class_atom()? {
                ClassAtom::Set(s, neg) => {
                    if neg {
                        set.sort_and_compact();
                        set.merge(&s.complement());
                    } else {
                        set.merge(&s);
                    }
                }
                ClassAtom::Cp(lo) => {
                    let range_follows = self.peek() == Some('-')
                        && self.peek_at(1) != Some(']')
                        && !(self.dialect == Dialect::Schema && self.peek_at(1) == Some('['));
                    if range_follows {
                        self.pos += 1;
                        let hi_off = self.pos;
                        match self.parse_class_atom()? {
                            ClassAtom::Cp(hi) => {
                                if lo > hi {
                                    return self.err(ParseErrorKind::InvalidClassRange, hi_off);
                                }
                                set.add_range(lo, hi);
                            }
                            ClassAtom::Set(..) => {
                                return self.err(ParseErrorKind::InvalidClassRange, hi_off);
                            }
                        }
                    } else {
                        set.add(lo);
                    }
                }
            }
        }
        set.sort_and_compact();
        Ok((set, negated))
    }

    fn parse_class_atom(&mut self) -> Result<ClassAtom, ParseError> {
        let off = self.pos;
        let ch = self.next_char().unwrap();
        if ch != '\\' {
            return Ok(ClassAtom::Cp(ch as u32));
        }
        let Some(escaped) = self.peek() else {
            return self.err(ParseErrorKind::UnexpectedEnd, off);
        };
        if escaped == 'p' || escaped == 'P' {
            self.pos += 1;
            let set = self.parse_property(escaped == 'P', off)?;
            return Ok(ClassAtom::Set(set, false));
        }
        if self.dialect == Dialect::Schema {
            if let Some((set, negated)) = schema::shorthand(escaped) {
                self.pos += 1;
                return Ok(ClassAtom::Set(set, negated));
            }
        } else {
            match escaped {
                'd' | 'D' | 'w' | 'W' | 's' | 'S' => {
                    self.pos += 1;
                    let (set, negated) = self.shorthand_set(escaped);
                    return Ok(ClassAtom::Set(set, negated));
                }
                _ => {}
            }
        }
        let cp = self.parse_escaped_code_point(off)?;
        Ok(ClassAtom::Cp(cp))
    }

    /// `[:name:]` and `[:^name:]` (full dialect only).
    fn parse_posix_class(&mut self, set: &mut RangeSet) -> Result<(), ParseError> {
        let off = self.pos;
        self.pos += 2; // "[:"
        let positive = if self.peek() == Some('^') {
            self.pos += 1;
            false
        } else {
            true
        };
        let mut name = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_lowercase() {
                name.push(c);
                self.pos += 1;
            } else {
                break;
            }
        }
        self.expect_raw(':', ParseErrorKind::UnknownPosixClass)?;
        self.expect_raw(']', ParseErrorKind::UnknownPosixClass)?;
        match unicode::range_for(&name, positive) {
            Some(named) if POSIX_ALIASES.contains(&name.as_str()) => {
                set.merge(&named);
                Ok(())
            }
            _ => self.err(ParseErrorKind::UnknownPosixClass, off),
        }
    }

    /// `(?[ranges]op[ranges]...)`: class subtraction, union and
    /// intersection. The result is a positive class even when an operand
    /// is negated.
    fn parse_set_operations(&mut self) -> Result<Ast, ParseError> {
        let (mut set, negated) = self.parse_class_body()?;
        if negated {
            set = set.complement();
        }
        loop {
            match self.next_char() {
                Some(')') => break,
                Some(op @ ('-' | '+' | '&')) => {
                    self.expect_raw('[', ParseErrorKind::UnexpectedChar)?;
                    let (operand, operand_negated) = self.parse_class_body()?;
                    let operand = if operand_negated {
                        operand.complement()
                    } else {
                        operand
                    };
                    match op {
                        '-' => set.subtract(&operand),
                        '+' => set.merge(&operand),
                        _ => set.intersect(&operand),
                    }
                }
                Some(_) => return self.err(ParseErrorKind::UnexpectedChar, self.pos - 1),
                None => return self.err(ParseErrorKind::UnexpectedEnd, self.pos),
            }
        }
        self.fetch_token()?;
        Ok(Ast::Range {
            set: Arc::new(set),
            negated: false,
        })
    }
}

const POSIX_ALIASES: [&str; 13] = [
    "alpha", "alnum", "ascii", "cntrl", "digit", "graph", "lower", "print", "punct", "space",
    "upper", "word", "xdigit",
];
