//! Lowers an [`Ast`] into a [`Program`]

use crate::ast::{AssertionKind, Ast, Class, ClassItem, GroupKind, Repetition};
use crate::class::{case_variants, CharSet, ClassMatcher};
use crate::error::{CompileError, ErrorKind};
use crate::program::{Inst, Look, Program};
use crate::Options;

/// Default limit on the number of instructions in a program
pub const DEFAULT_SIZE_LIMIT: usize = 250_000;

/// Compile a parsed pattern.
///
/// The size of the program is estimated before anything is emitted, so a
/// pattern like `(a{1000}){1000}` is rejected without allocating it.
pub(crate) fn compile(
    ast: &Ast,
    capture_count: usize,
    options: Options,
    size_limit: usize,
) -> Result<Program, CompileError> {
    let estimate = estimate_size(ast, size_limit)?;
    if estimate >= size_limit {
        return Err(CompileError::new(ErrorKind::SizeLimitExceeded, 0));
    }

    let mut compiler = Compiler {
        insts: Vec::with_capacity(estimate + 1),
        sets: Vec::new(),
        options,
        next_register: 2 * (capture_count + 1),
    };
    compiler.c(ast);
    compiler.push(Inst::Match);

    let leading = compiler
        .insts
        .iter()
        .find(|inst| !matches!(inst, Inst::Save(_)));
    let anchored = matches!(leading, Some(Inst::Assert(Look::StartText)));
    let first_char = match leading {
        Some(Inst::Char(c)) => Some(*c),
        _ => None,
    };

    Ok(Program {
        insts: compiler.insts,
        sets: compiler.sets,
        capture_count,
        slot_count: compiler.next_register,
        anchored,
        first_char,
        fold_case: options.case_insensitive,
    })
}

/// Upper bound on the instructions `ast` compiles to.
///
/// Fails at the first repetition whose expansion alone exceeds `limit`.
fn estimate_size(ast: &Ast, limit: usize) -> Result<usize, CompileError> {
    let size = match ast {
        Ast::Empty => 0,
        Ast::Literal(_)
        | Ast::Dot
        | Ast::Class(_)
        | Ast::Perl(_)
        | Ast::Assertion(_)
        | Ast::Backref(_) => 1,
        Ast::Group(group) => {
            let body = estimate_size(&group.ast, limit)?;
            match group.kind {
                GroupKind::NonCapturing => body,
                GroupKind::Capture { .. } | GroupKind::LookAhead { .. } => body + 2,
            }
        }
        Ast::Repetition(rep) => {
            let body = estimate_size(&rep.ast, limit)?;
            let min = rep.min as usize;
            let rest = match rep.max {
                None if rep.ast.can_match_empty() => body + 4,
                None => body + 2,
                Some(max) => (max as usize - min).saturating_mul(body + 1),
            };
            let total = body.saturating_mul(min).saturating_add(rest);
            if total >= limit {
                return Err(CompileError::new(
                    ErrorKind::SizeLimitExceeded,
                    rep.position,
                ));
            }
            total
        }
        Ast::Concat(asts) => {
            let mut total = 0usize;
            for ast in asts {
                total = total.saturating_add(estimate_size(ast, limit)?);
            }
            total
        }
        Ast::Alternation(asts) => {
            let mut total = 2 * asts.len().saturating_sub(1);
            for ast in asts {
                total = total.saturating_add(estimate_size(ast, limit)?);
            }
            total
        }
    };
    Ok(size)
}

struct Compiler {
    insts: Vec<Inst>,
    sets: Vec<ClassMatcher>,
    options: Options,
    next_register: usize,
}

impl Compiler {
    fn push(&mut self, inst: Inst) -> usize {
        self.insts.push(inst);
        self.insts.len() - 1
    }

    fn push_set(&mut self, matcher: ClassMatcher) {
        self.sets.push(matcher);
        self.push(Inst::Set(self.sets.len() - 1));
    }

    fn c(&mut self, ast: &Ast) {
        match ast {
            Ast::Empty => {}
            Ast::Literal(c) => self.c_literal(*c),
            Ast::Dot => {
                self.push(Inst::Any);
            }
            Ast::Class(class) => {
                self.push_set(ClassMatcher::new(class, self.options.case_insensitive));
            }
            Ast::Perl(perl) => {
                let class = Class {
                    negated: false,
                    items: vec![ClassItem::Perl(*perl)],
                };
                self.push_set(ClassMatcher::new(&class, false));
            }
            Ast::Assertion(kind) => {
                let multi_line = self.options.multi_line;
                let look = match kind {
                    AssertionKind::Start if multi_line => Look::StartLine,
                    AssertionKind::Start => Look::StartText,
                    AssertionKind::End if multi_line => Look::EndLine,
                    AssertionKind::End => Look::EndText,
                    AssertionKind::WordBoundary => Look::WordBoundary,
                    AssertionKind::NotWordBoundary => Look::NotWordBoundary,
                };
                self.push(Inst::Assert(look));
            }
            Ast::Backref(index) => {
                self.push(Inst::Backref(*index));
            }
            Ast::Group(group) => match group.kind {
                GroupKind::Capture { index, .. } => {
                    self.push(Inst::Save(2 * index));
                    self.c(&group.ast);
                    self.push(Inst::Save(2 * index + 1));
                }
                GroupKind::NonCapturing => self.c(&group.ast),
                GroupKind::LookAhead { negated } => {
                    let at = self.push(Inst::LookAhead { negated, next: 0 });
                    self.c(&group.ast);
                    self.push(Inst::LookEnd);
                    let next = self.insts.len();
                    self.insts[at] = Inst::LookAhead { negated, next };
                }
            },
            Ast::Repetition(rep) => self.c_repeat(rep),
            Ast::Concat(asts) => {
                for ast in asts {
                    self.c(ast);
                }
            }
            Ast::Alternation(asts) => self.c_alternation(asts),
        }
    }

    fn c_literal(&mut self, c: char) {
        if !self.options.case_insensitive {
            self.push(Inst::Char(c));
            return;
        }
        let variants = case_variants(c);
        if variants.len() == 1 {
            self.push(Inst::Char(c));
        } else {
            self.push_set(ClassMatcher::from_set(CharSet::from_chars(&variants)));
        }
    }

    fn c_alternation(&mut self, asts: &[Ast]) {
        let mut jumps = Vec::with_capacity(asts.len());
        for (i, branch) in asts.iter().enumerate() {
            if i + 1 == asts.len() {
                self.c(branch);
                break;
            }
            let split = self.push(Inst::Split { x: 0, y: 0 });
            self.c(branch);
            jumps.push(self.push(Inst::Jmp(0)));
            self.insts[split] = Inst::Split {
                x: split + 1,
                y: self.insts.len(),
            };
        }
        let end = self.insts.len();
        for jump in jumps {
            self.insts[jump] = Inst::Jmp(end);
        }
    }

    fn c_repeat(&mut self, rep: &Repetition) {
        for _ in 0..rep.min {
            self.c(&rep.ast);
        }
        let Some(max) = rep.max else {
            self.c_star(&rep.ast, rep.greedy);
            return;
        };

        // Optional copies nest: each one is only tried after the previous matched
        let mut splits = Vec::new();
        for _ in rep.min..max {
            splits.push(self.push(Inst::Split { x: 0, y: 0 }));
            self.c(&rep.ast);
        }
        let end = self.insts.len();
        for split in splits {
            self.insts[split] = branch(split + 1, end, rep.greedy);
        }
    }

    fn c_star(&mut self, ast: &Ast, greedy: bool) {
        let split = self.push(Inst::Split { x: 0, y: 0 });
        // A body that can match empty needs a guard, or `(a*)*` never stops
        let register = ast.can_match_empty().then(|| {
            let register = self.next_register;
            self.next_register += 1;
            self.push(Inst::Save(register));
            register
        });
        self.c(ast);
        if let Some(register) = register {
            self.push(Inst::Progress(register));
        }
        self.push(Inst::Jmp(split));
        let end = self.insts.len();
        self.insts[split] = branch(split + 1, end, greedy);
    }
}

/// A split preferring `body` when greedy and `skip` when lazy
fn branch(body: usize, skip: usize, greedy: bool) -> Inst {
    if greedy {
        Inst::Split { x: body, y: skip }
    } else {
        Inst::Split { x: skip, y: body }
    }
}
