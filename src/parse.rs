//! Pattern parser
//!
//! Turns a pattern into an [`Ast`]. Errors carry the codepoint offset of the
//! offending token so callers can point at it.

use crate::ast::{
    AssertionKind, Ast, Class, ClassItem, Group, GroupKind, PerlClass, PerlKind, Repetition,
};
use crate::error::{CompileError, ErrorKind};

/// Maximum group nesting depth
pub const NEST_LIMIT: usize = 250;

/// Maximum value of a `{m,n}` bound
pub const MAX_REPETITION_COUNT: u32 = 100_000;

/// Parse a pattern into an AST
pub fn parse(pattern: &str) -> Result<Ast, CompileError> {
    Parser::new(pattern).parse().map(|parsed| parsed.ast)
}

/// Result of a successful parse
#[derive(Debug)]
pub(crate) struct Parsed {
    pub ast: Ast,
    /// One entry per capture group, in group order
    pub group_names: Vec<Option<String>>,
}

pub(crate) struct Parser {
    chars: Vec<char>,
    pos: usize,
    depth: usize,
    capture_count: usize,
    /// Names of all groups, found before parsing so backreferences can be
    /// checked as soon as they are seen
    declared: Vec<Option<String>>,
    group_names: Vec<Option<String>>,
}

impl Parser {
    pub(crate) fn new(pattern: &str) -> Self {
        let chars: Vec<char> = pattern.chars().collect();
        let declared = scan_groups(&chars);
        Self {
            chars,
            pos: 0,
            depth: 0,
            capture_count: 0,
            declared,
            group_names: Vec::new(),
        }
    }

    pub(crate) fn parse(mut self) -> Result<Parsed, CompileError> {
        let ast = self.parse_alternation()?;
        if let Some(c) = self.peek() {
            // parse_alternation only stops early at a ')'
            debug_assert_eq!(c, ')');
            return Err(self.error(ErrorKind::UnopenedGroup, self.pos));
        }
        Ok(Parsed {
            ast,
            group_names: self.group_names,
        })
    }

    fn parse_alternation(&mut self) -> Result<Ast, CompileError> {
        let mut branches = vec![self.parse_concat()?];
        while self.peek() == Some('|') {
            self.pos += 1;
            branches.push(self.parse_concat()?);
        }
        if branches.len() == 1 {
            Ok(branches.pop().unwrap_or(Ast::Empty))
        } else {
            Ok(Ast::Alternation(branches))
        }
    }

    fn parse_concat(&mut self) -> Result<Ast, CompileError> {
        let mut items = Vec::new();
        while let Some(c) = self.peek() {
            if c == '|' || c == ')' {
                break;
            }
            let atom = self.parse_atom()?;
            let atom = self.parse_quantifier(atom)?;
            items.push(atom);
        }
        match items.len() {
            0 => Ok(Ast::Empty),
            1 => Ok(items.pop().unwrap_or(Ast::Empty)),
            _ => Ok(Ast::Concat(items)),
        }
    }

    fn parse_atom(&mut self) -> Result<Ast, CompileError> {
        let start = self.pos;
        let Some(c) = self.next() else {
            return Ok(Ast::Empty);
        };
        match c {
            '^' => Ok(Ast::Assertion(AssertionKind::Start)),
            '$' => Ok(Ast::Assertion(AssertionKind::End)),
            '.' => Ok(Ast::Dot),
            '(' => self.parse_group(start),
            '[' => self.parse_class(start),
            '\\' => self.parse_escape(start),
            '*' | '+' | '?' | '{' => Err(self.error(ErrorKind::RepetitionMissing, start)),
            ']' | '}' => Err(self.error(ErrorKind::LoneBracket, start)),
            c => Ok(Ast::Literal(c)),
        }
    }

    fn parse_quantifier(&mut self, atom: Ast) -> Result<Ast, CompileError> {
        let start = self.pos;
        let (min, max) = match self.peek() {
            Some('*') => {
                self.pos += 1;
                (0, None)
            }
            Some('+') => {
                self.pos += 1;
                (1, None)
            }
            Some('?') => {
                self.pos += 1;
                (0, Some(1))
            }
            Some('{') => self.parse_braces(start)?,
            _ => return Ok(atom),
        };

        let repeatable = !matches!(
            atom,
            Ast::Assertion(_)
                | Ast::Group(Group {
                    kind: GroupKind::LookAhead { .. },
                    ..
                })
        );
        if !repeatable {
            return Err(self.error(ErrorKind::RepetitionMissing, start));
        }

        let greedy = if self.peek() == Some('?') {
            self.pos += 1;
            false
        } else {
            true
        };

        Ok(Ast::Repetition(Repetition {
            ast: Box::new(atom),
            min,
            max,
            greedy,
            position: start,
        }))
    }

    /// Parse `{m}`, `{m,}` or `{m,n}`; `start` points at the `{`
    fn parse_braces(&mut self, start: usize) -> Result<(u32, Option<u32>), CompileError> {
        self.pos += 1;
        let min = self
            .parse_count(start)?
            .ok_or_else(|| self.error(ErrorKind::IncompleteRepetition, start))?;
        let max = match self.next() {
            Some('}') => return Ok((min, Some(min))),
            Some(',') => self.parse_count(start)?,
            _ => return Err(self.error(ErrorKind::IncompleteRepetition, start)),
        };
        if self.next() != Some('}') {
            return Err(self.error(ErrorKind::IncompleteRepetition, start));
        }
        if let Some(max) = max {
            if min > max {
                return Err(self.error(ErrorKind::InvalidRepetitionRange, start));
            }
        }
        Ok((min, max))
    }

    fn parse_count(&mut self, start: usize) -> Result<Option<u32>, CompileError> {
        let mut value: Option<u32> = None;
        while let Some(digit) = self.peek().and_then(|c| c.to_digit(10)) {
            self.pos += 1;
            let next = value
                .unwrap_or(0)
                .checked_mul(10)
                .and_then(|v| v.checked_add(digit))
                .filter(|v| *v <= MAX_REPETITION_COUNT)
                .ok_or_else(|| self.error(ErrorKind::RepetitionCountTooLarge, start))?;
            value = Some(next);
        }
        Ok(value)
    }

    fn parse_group(&mut self, start: usize) -> Result<Ast, CompileError> {
        if self.depth >= NEST_LIMIT {
            return Err(self.error(ErrorKind::NestLimitExceeded, start));
        }

        let kind = if self.peek() == Some('?') {
            self.pos += 1;
            match self.next() {
                Some(':') => GroupKind::NonCapturing,
                Some('=') => GroupKind::LookAhead { negated: false },
                Some('!') => GroupKind::LookAhead { negated: true },
                Some('<') if !matches!(self.peek(), Some('=' | '!')) => {
                    let name = self.parse_group_name(start)?;
                    if self.group_names.iter().flatten().any(|n| *n == name) {
                        return Err(self.error(ErrorKind::DuplicateGroupName, start));
                    }
                    self.open_capture(Some(name))
                }
                _ => return Err(self.error(ErrorKind::UnsupportedGroup, start)),
            }
        } else {
            self.open_capture(None)
        };

        self.depth += 1;
        let ast = self.parse_alternation()?;
        self.depth -= 1;

        if self.next() != Some(')') {
            return Err(self.error(ErrorKind::UnclosedGroup, start));
        }
        Ok(Ast::Group(Group {
            kind,
            ast: Box::new(ast),
        }))
    }

    fn open_capture(&mut self, name: Option<String>) -> GroupKind {
        self.capture_count += 1;
        self.group_names.push(name.clone());
        GroupKind::Capture {
            index: self.capture_count,
            name,
        }
    }

    /// Parse `name>` after `(?<` or `\k<`
    fn parse_group_name(&mut self, start: usize) -> Result<String, CompileError> {
        let name_start = self.pos;
        while let Some(c) = self.peek() {
            if c == '>' {
                break;
            }
            self.pos += 1;
        }
        let name: String = self.chars[name_start..self.pos].iter().collect();
        if self.next() != Some('>') || !is_valid_group_name(&name) {
            return Err(self.error(ErrorKind::InvalidGroupName, start));
        }
        Ok(name)
    }

    fn parse_class(&mut self, start: usize) -> Result<Ast, CompileError> {
        let negated = if self.peek() == Some('^') {
            self.pos += 1;
            true
        } else {
            false
        };

        let mut items = Vec::new();
        loop {
            let item_start = self.pos;
            let item = match self.peek() {
                None => return Err(self.error(ErrorKind::UnclosedClass, start)),
                Some(']') => {
                    self.pos += 1;
                    return Ok(Ast::Class(Class { negated, items }));
                }
                Some(_) => self.parse_class_atom()?,
            };

            // A '-' right before ']' is a literal, not a range
            let is_range = self.peek() == Some('-')
                && self.chars.get(self.pos + 1).is_some_and(|c| *c != ']');
            if !is_range {
                items.push(item);
                continue;
            }
            self.pos += 1;
            let end = self.parse_class_atom()?;
            match (item, end) {
                (ClassItem::Char(lo), ClassItem::Char(hi)) if lo <= hi => {
                    items.push(ClassItem::Range(lo, hi));
                }
                _ => return Err(self.error(ErrorKind::InvalidClassRange, item_start)),
            }
        }
    }

    fn parse_class_atom(&mut self) -> Result<ClassItem, CompileError> {
        let start = self.pos;
        let c = self
            .next()
            .ok_or_else(|| self.error(ErrorKind::UnclosedClass, start))?;
        if c != '\\' {
            return Ok(ClassItem::Char(c));
        }
        let escaped = self
            .next()
            .ok_or_else(|| self.error(ErrorKind::InvalidEscape, start))?;
        if let Some(perl) = perl_class(escaped) {
            return Ok(ClassItem::Perl(perl));
        }
        match escaped {
            'b' => Ok(ClassItem::Char('\u{0008}')),
            '-' => Ok(ClassItem::Char('-')),
            other => self.parse_char_escape(other, start).map(ClassItem::Char),
        }
    }

    fn parse_escape(&mut self, start: usize) -> Result<Ast, CompileError> {
        let c = self
            .next()
            .ok_or_else(|| self.error(ErrorKind::InvalidEscape, start))?;
        if let Some(perl) = perl_class(c) {
            return Ok(Ast::Perl(perl));
        }
        match c {
            'b' => Ok(Ast::Assertion(AssertionKind::WordBoundary)),
            'B' => Ok(Ast::Assertion(AssertionKind::NotWordBoundary)),
            '1'..='9' => {
                let mut index = c.to_digit(10).unwrap_or(0) as usize;
                while let Some(digit) = self.peek().and_then(|c| c.to_digit(10)) {
                    self.pos += 1;
                    index = index.saturating_mul(10).saturating_add(digit as usize);
                }
                if index > self.declared.len() {
                    return Err(self.error(ErrorKind::InvalidBackreference, start));
                }
                Ok(Ast::Backref(index))
            }
            'k' => {
                if self.next() != Some('<') {
                    return Err(self.error(ErrorKind::InvalidEscape, start));
                }
                let name = self.parse_group_name(start)?;
                let index = self
                    .declared
                    .iter()
                    .position(|n| n.as_deref() == Some(name.as_str()))
                    .ok_or_else(|| self.error(ErrorKind::InvalidBackreference, start))?;
                Ok(Ast::Backref(index + 1))
            }
            other => self.parse_char_escape(other, start).map(Ast::Literal),
        }
    }

    /// Escapes that denote a single codepoint, shared by classes and atoms
    fn parse_char_escape(&mut self, c: char, start: usize) -> Result<char, CompileError> {
        match c {
            'n' => Ok('\n'),
            'r' => Ok('\r'),
            't' => Ok('\t'),
            'v' => Ok('\u{000B}'),
            'f' => Ok('\u{000C}'),
            '0' if !self.peek().is_some_and(|c| c.is_ascii_digit()) => Ok('\0'),
            'c' => match self.peek() {
                Some(letter) if letter.is_ascii_alphabetic() => {
                    self.pos += 1;
                    Ok(char::from(letter.to_ascii_uppercase() as u8 - b'@'))
                }
                _ => Err(self.error(ErrorKind::InvalidEscape, start)),
            },
            'x' => {
                let value = self.parse_hex(2, start)?;
                char::from_u32(value).ok_or_else(|| self.error(ErrorKind::InvalidEscape, start))
            }
            'u' => self.parse_unicode_escape(start),
            c if is_meta_character(c) => Ok(c),
            _ => Err(self.error(ErrorKind::InvalidEscape, start)),
        }
    }

    fn parse_unicode_escape(&mut self, start: usize) -> Result<char, CompileError> {
        let value = if self.peek() == Some('{') {
            self.pos += 1;
            let digits_start = self.pos;
            while self.peek().is_some_and(|c| c.is_ascii_hexdigit()) {
                self.pos += 1;
            }
            if self.pos == digits_start || self.next() != Some('}') {
                return Err(self.error(ErrorKind::InvalidEscape, start));
            }
            let digits: String = self.chars[digits_start..self.pos - 1].iter().collect();
            u32::from_str_radix(&digits, 16)
                .map_err(|_| self.error(ErrorKind::InvalidEscape, start))?
        } else {
            let high = self.parse_hex(4, start)?;
            // A surrogate pair written as two escapes denotes one codepoint
            if (0xD800..0xDC00).contains(&high) && self.lookahead_str("\\u") {
                let save = self.pos;
                self.pos += 2;
                match self.parse_hex(4, start) {
                    Ok(low) if (0xDC00..0xE000).contains(&low) => {
                        0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00)
                    }
                    _ => {
                        self.pos = save;
                        high
                    }
                }
            } else {
                high
            }
        };
        char::from_u32(value).ok_or_else(|| self.error(ErrorKind::InvalidEscape, start))
    }

    fn parse_hex(&mut self, digits: usize, start: usize) -> Result<u32, CompileError> {
        let end = self.pos + digits;
        if end > self.chars.len() || !self.chars[self.pos..end].iter().all(char::is_ascii_hexdigit)
        {
            return Err(self.error(ErrorKind::InvalidEscape, start));
        }
        let value = self.chars[self.pos..end]
            .iter()
            .fold(0u32, |acc, c| acc * 16 + c.to_digit(16).unwrap_or(0));
        self.pos = end;
        Ok(value)
    }

    fn lookahead_str(&self, s: &str) -> bool {
        s.chars()
            .enumerate()
            .all(|(i, c)| self.chars.get(self.pos + i) == Some(&c))
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn next(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn error(&self, kind: ErrorKind, position: usize) -> CompileError {
        CompileError::new(kind, position)
    }
}

fn perl_class(c: char) -> Option<PerlClass> {
    let kind = match c.to_ascii_lowercase() {
        'd' => PerlKind::Digit,
        'w' => PerlKind::Word,
        's' => PerlKind::Space,
        _ => return None,
    };
    Some(PerlClass {
        kind,
        negated: c.is_ascii_uppercase(),
    })
}

/// Characters that may be escaped to stand for themselves
pub(crate) fn is_meta_character(c: char) -> bool {
    matches!(
        c,
        '\\' | '.' | '*' | '+' | '?' | '(' | ')' | '[' | ']' | '{' | '}' | '|' | '^' | '$' | '/'
    )
}

fn is_valid_group_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Find every capture group ahead of parsing.
///
/// Backreferences may point forward (`\2(a)(b)`), so the group count and
/// names must be known before the parser reaches them.
fn scan_groups(chars: &[char]) -> Vec<Option<String>> {
    let mut groups = Vec::new();
    let mut in_class = false;
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '\\' => i += 1,
            '[' => in_class = true,
            ']' => in_class = false,
            '(' if !in_class => {
                if chars.get(i + 1) != Some(&'?') {
                    groups.push(None);
                } else if chars.get(i + 2) == Some(&'<')
                    && !matches!(chars.get(i + 3), Some('=' | '!'))
                {
                    let name: String = chars[i + 3..].iter().take_while(|c| **c != '>').collect();
                    groups.push(Some(name));
                }
            }
            _ => {}
        }
        i += 1;
    }
    groups
}
