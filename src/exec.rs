//! Backtracking executor
//!
//! Alternatives are explored depth-first with an explicit stack, so deep
//! patterns never recurse on the native stack. The only recursion is one
//! level per nested lookahead, which the parser's nest limit bounds.

use crate::class::{fold, is_line_terminator, is_word_char};
use crate::error::MatchError;
use crate::program::{Inst, Look, Program};

/// Default number of backtracks allowed from one start position
pub const DEFAULT_BACKTRACK_LIMIT: usize = 1_000_000;

/// Capture slots of a successful search, `2 * (capture_count + 1)` long
pub(crate) type Slots = Vec<Option<usize>>;

enum Frame {
    /// Resume at `pc` with the input position reset to `pos`
    Retry { pc: usize, pos: usize },
    /// Undo a slot write
    Restore { slot: usize, old: Option<usize> },
}

struct Executor<'a> {
    prog: &'a Program,
    input: &'a [char],
    limit: usize,
    backtracks: usize,
}

/// Find the leftmost match starting at or after `start`.
///
/// The backtrack budget applies to each start position separately, so a
/// linear failure at every offset never adds up to an error.
pub(crate) fn search(
    prog: &Program,
    input: &[char],
    start: usize,
    limit: usize,
) -> Result<Option<Slots>, MatchError> {
    let mut exec = Executor {
        prog,
        input,
        limit,
        backtracks: 0,
    };
    let mut slots = vec![None; prog.slot_count];

    for at in start..=input.len() {
        if prog.anchored && at > 0 {
            break;
        }
        if let Some(c) = prog.first_char {
            if input.get(at) != Some(&c) {
                continue;
            }
        }
        slots.iter_mut().for_each(|slot| *slot = None);
        exec.backtracks = 0;
        if let Some(end) = exec.run(0, at, &mut slots)? {
            slots[0] = Some(at);
            slots[1] = Some(end);
            slots.truncate(2 * (prog.capture_count + 1));
            return Ok(Some(slots));
        }
    }
    Ok(None)
}

impl Executor<'_> {
    /// Run from `pc` until `Match` or `LookEnd`, returning the end position.
    ///
    /// On success `slots` holds the captures of the winning path. On failure
    /// every slot write has been undone.
    fn run(
        &mut self,
        mut pc: usize,
        mut pos: usize,
        slots: &mut [Option<usize>],
    ) -> Result<Option<usize>, MatchError> {
        let prog = self.prog;
        let input = self.input;
        let mut stack: Vec<Frame> = Vec::new();

        loop {
            let advanced = match prog.insts[pc] {
                Inst::Char(c) => {
                    let hit = input.get(pos) == Some(&c);
                    if hit {
                        pos += 1;
                        pc += 1;
                    }
                    hit
                }
                Inst::Set(i) => match input.get(pos) {
                    Some(&c) if prog.sets[i].matches(c) => {
                        pos += 1;
                        pc += 1;
                        true
                    }
                    _ => false,
                },
                Inst::Any => match input.get(pos) {
                    Some(&c) if !is_line_terminator(c) => {
                        pos += 1;
                        pc += 1;
                        true
                    }
                    _ => false,
                },
                Inst::Assert(look) => {
                    let hit = self.is_match_look(look, pos);
                    if hit {
                        pc += 1;
                    }
                    hit
                }
                Inst::Split { x, y } => {
                    stack.push(Frame::Retry { pc: y, pos });
                    pc = x;
                    true
                }
                Inst::Jmp(target) => {
                    pc = target;
                    true
                }
                Inst::Save(slot) => {
                    stack.push(Frame::Restore {
                        slot,
                        old: slots[slot],
                    });
                    slots[slot] = Some(pos);
                    pc += 1;
                    true
                }
                Inst::Progress(slot) => {
                    let moved = slots[slot] != Some(pos);
                    if moved {
                        pc += 1;
                    }
                    moved
                }
                Inst::Backref(group) => match self.backref_len(group, pos, slots) {
                    Some(len) => {
                        pos += len;
                        pc += 1;
                        true
                    }
                    None => false,
                },
                Inst::LookAhead { negated, next } => {
                    let mut inner = slots.to_vec();
                    let found = self.run(pc + 1, pos, &mut inner)?.is_some();
                    if found == negated {
                        false
                    } else {
                        if !negated {
                            for (slot, new) in inner.into_iter().enumerate() {
                                if slots[slot] != new {
                                    stack.push(Frame::Restore {
                                        slot,
                                        old: slots[slot],
                                    });
                                    slots[slot] = new;
                                }
                            }
                        }
                        pc = next;
                        true
                    }
                }
                Inst::LookEnd | Inst::Match => return Ok(Some(pos)),
            };

            if advanced {
                continue;
            }
            loop {
                match stack.pop() {
                    None => return Ok(None),
                    Some(Frame::Restore { slot, old }) => slots[slot] = old,
                    Some(Frame::Retry { pc: next_pc, pos: next_pos }) => {
                        self.backtracks += 1;
                        if self.backtracks > self.limit {
                            log::warn!("backtrack limit of {} exceeded", self.limit);
                            return Err(MatchError::BacktrackLimitExceeded { limit: self.limit });
                        }
                        pc = next_pc;
                        pos = next_pos;
                        break;
                    }
                }
            }
        }
    }

    fn is_match_look(&self, look: Look, pos: usize) -> bool {
        let before = pos.checked_sub(1).map(|i| self.input[i]);
        let after = self.input.get(pos).copied();
        let is_word = |c: Option<char>| c.is_some_and(is_word_char);
        match look {
            Look::StartText => pos == 0,
            Look::EndText => pos == self.input.len(),
            Look::StartLine => before.map_or(true, is_line_terminator),
            Look::EndLine => after.map_or(true, is_line_terminator),
            Look::WordBoundary => is_word(before) != is_word(after),
            Look::NotWordBoundary => is_word(before) == is_word(after),
        }
    }

    /// Length consumed by a backreference at `pos`, or `None` if it fails.
    /// A group that has not participated, or is still open, matches the
    /// empty string.
    fn backref_len(&self, group: usize, pos: usize, slots: &[Option<usize>]) -> Option<usize> {
        let (Some(start), Some(end)) = (slots[2 * group], slots[2 * group + 1]) else {
            return Some(0);
        };
        // Reopened in a later loop iteration; the end slot is stale
        if start > end {
            return Some(0);
        }
        let captured = self.input.get(start..end)?;
        let rest = self.input.get(pos..pos + captured.len())?;
        let same = if self.prog.fold_case {
            captured.iter().zip(rest).all(|(&a, &b)| fold(a) == fold(b))
        } else {
            captured == rest
        };
        same.then_some(captured.len())
    }
}
