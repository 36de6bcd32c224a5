//! Abstract syntax tree produced by the parser
//!
//! The tree is public so tooling (such as the `explain` command) can walk a
//! pattern's structure. `Display` renders a node back into pattern syntax.

use std::fmt;

/// A parsed regular expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ast {
    /// Matches the empty string
    Empty,
    /// A single codepoint
    Literal(char),
    /// `.`, any codepoint except a line terminator
    Dot,
    /// A bracketed class such as `[a-z_]`
    Class(Class),
    /// One of `\d \w \s \D \W \S` outside of a class
    Perl(PerlClass),
    /// A zero-width assertion
    Assertion(AssertionKind),
    /// A capturing, non-capturing, or lookahead group
    Group(Group),
    /// A quantified sub-expression
    Repetition(Repetition),
    /// `\N` or `\k<name>`, resolved to a 1-based group number
    Backref(usize),
    Concat(Vec<Ast>),
    Alternation(Vec<Ast>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssertionKind {
    /// `^`
    Start,
    /// `$`
    End,
    /// `\b`
    WordBoundary,
    /// `\B`
    NotWordBoundary,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub kind: GroupKind,
    pub ast: Box<Ast>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupKind {
    /// A capturing group. `index` is 1-based, in order of the opening paren.
    Capture { index: usize, name: Option<String> },
    NonCapturing,
    LookAhead { negated: bool },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repetition {
    pub ast: Box<Ast>,
    pub min: u32,
    /// `None` means unbounded
    pub max: Option<u32>,
    pub greedy: bool,
    /// Codepoint offset of the quantifier operator in the pattern
    pub position: usize,
}

impl Repetition {
    /// The operator as written, without the lazy suffix
    pub fn operator(&self) -> String {
        match (self.min, self.max) {
            (0, None) => "*".to_string(),
            (1, None) => "+".to_string(),
            (0, Some(1)) => "?".to_string(),
            (m, None) => format!("{{{},}}", m),
            (m, Some(n)) if m == n => format!("{{{}}}", m),
            (m, Some(n)) => format!("{{{},{}}}", m, n),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Class {
    pub negated: bool,
    pub items: Vec<ClassItem>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassItem {
    Char(char),
    Range(char, char),
    Perl(PerlClass),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PerlClass {
    pub kind: PerlKind,
    pub negated: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PerlKind {
    Digit,
    Word,
    Space,
}

impl Ast {
    /// Whether this node can match without consuming any input
    pub fn can_match_empty(&self) -> bool {
        match self {
            Ast::Empty | Ast::Assertion(_) | Ast::Backref(_) => true,
            Ast::Literal(_) | Ast::Dot | Ast::Class(_) | Ast::Perl(_) => false,
            Ast::Group(group) => match group.kind {
                GroupKind::LookAhead { .. } => true,
                _ => group.ast.can_match_empty(),
            },
            Ast::Repetition(rep) => rep.min == 0 || rep.ast.can_match_empty(),
            Ast::Concat(asts) => asts.iter().all(Ast::can_match_empty),
            Ast::Alternation(asts) => asts.iter().any(Ast::can_match_empty),
        }
    }
}

impl fmt::Display for Ast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ast::Empty => Ok(()),
            Ast::Literal(c) => write_char(f, *c, false),
            Ast::Dot => f.write_str("."),
            Ast::Class(class) => write!(f, "{}", class),
            Ast::Perl(perl) => write!(f, "{}", perl),
            Ast::Assertion(kind) => f.write_str(match kind {
                AssertionKind::Start => "^",
                AssertionKind::End => "$",
                AssertionKind::WordBoundary => r"\b",
                AssertionKind::NotWordBoundary => r"\B",
            }),
            Ast::Group(group) => {
                match &group.kind {
                    GroupKind::Capture { name: Some(name), .. } => write!(f, "(?<{}>", name)?,
                    GroupKind::Capture { name: None, .. } => f.write_str("(")?,
                    GroupKind::NonCapturing => f.write_str("(?:")?,
                    GroupKind::LookAhead { negated: false } => f.write_str("(?=")?,
                    GroupKind::LookAhead { negated: true } => f.write_str("(?!")?,
                }
                write!(f, "{})", group.ast)
            }
            Ast::Repetition(rep) => {
                // A bare concat or alternation needs a group to stay quantified as a unit
                match rep.ast.as_ref() {
                    Ast::Concat(_) | Ast::Alternation(_) => write!(f, "(?:{})", rep.ast)?,
                    other => write!(f, "{}", other)?,
                }
                f.write_str(&rep.operator())?;
                if !rep.greedy {
                    f.write_str("?")?;
                }
                Ok(())
            }
            Ast::Backref(index) => write!(f, "\\{}", index),
            Ast::Concat(asts) => {
                for ast in asts {
                    match ast {
                        Ast::Alternation(_) => write!(f, "(?:{})", ast)?,
                        _ => write!(f, "{}", ast)?,
                    }
                }
                Ok(())
            }
            Ast::Alternation(asts) => {
                for (i, ast) in asts.iter().enumerate() {
                    if i > 0 {
                        f.write_str("|")?;
                    }
                    write!(f, "{}", ast)?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        if self.negated {
            f.write_str("^")?;
        }
        for item in &self.items {
            match item {
                ClassItem::Char(c) => write_char(f, *c, true)?,
                ClassItem::Range(lo, hi) => {
                    write_char(f, *lo, true)?;
                    f.write_str("-")?;
                    write_char(f, *hi, true)?;
                }
                ClassItem::Perl(perl) => write!(f, "{}", perl)?,
            }
        }
        f.write_str("]")
    }
}

impl fmt::Display for PerlClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self.kind {
            PerlKind::Digit => 'd',
            PerlKind::Word => 'w',
            PerlKind::Space => 's',
        };
        let c = if self.negated { c.to_ascii_uppercase() } else { c };
        write!(f, "\\{}", c)
    }
}

/// Write a codepoint so that it parses back to itself
fn write_char(f: &mut fmt::Formatter<'_>, c: char, in_class: bool) -> fmt::Result {
    match c {
        '\n' => f.write_str(r"\n"),
        '\r' => f.write_str(r"\r"),
        '\t' => f.write_str(r"\t"),
        '\u{000B}' => f.write_str(r"\v"),
        '\u{000C}' => f.write_str(r"\f"),
        '-' if in_class => f.write_str(r"\-"),
        c if crate::parse::is_meta_character(c) => write!(f, "\\{}", c),
        c if c.is_control() => write!(f, "\\u{{{:X}}}", c as u32),
        c => write!(f, "{}", c),
    }
}
