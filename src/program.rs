//! Bytecode executed by the backtracking matcher

use crate::class::ClassMatcher;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Look {
    StartText,
    EndText,
    StartLine,
    EndLine,
    WordBoundary,
    NotWordBoundary,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Inst {
    /// Consume one exact codepoint
    Char(char),
    /// Consume one codepoint from `Program::sets[i]`
    Set(usize),
    /// Consume any codepoint except a line terminator
    Any,
    /// Zero-width check
    Assert(Look),
    /// Try `x`; on failure resume at `y`
    Split { x: usize, y: usize },
    Jmp(usize),
    /// Record the current position in a slot
    Save(usize),
    /// Fail unless the position moved since the slot was saved
    Progress(usize),
    /// Match the text of a 1-based capture group again
    Backref(usize),
    /// Run the body at `pc + 1` (terminated by `LookEnd`) without consuming
    /// input, then continue at `next`
    LookAhead { negated: bool, next: usize },
    LookEnd,
    Match,
}

/// A compiled pattern.
///
/// Slots `2g` and `2g + 1` hold the start and end of group `g` (group 0 is
/// the whole match). Slots past `2 * (capture_count + 1)` are loop registers
/// used by `Progress`.
#[derive(Debug, Clone)]
pub(crate) struct Program {
    pub insts: Vec<Inst>,
    pub sets: Vec<ClassMatcher>,
    pub capture_count: usize,
    pub slot_count: usize,
    /// The program can only match at offset 0
    pub anchored: bool,
    /// Every match must begin with this codepoint
    pub first_char: Option<char>,
    /// Backreferences compare with simple case folding
    pub fold_case: bool,
}

impl Program {
    pub(crate) fn len(&self) -> usize {
        self.insts.len()
    }
}
