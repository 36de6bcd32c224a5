//! Implementation of `rexp explain`
//!
//! Walks the parsed pattern and describes each part in plain words.

use anyhow::Result;
use rexp::ast::{AssertionKind, Ast, ClassItem, GroupKind, PerlClass, PerlKind, Repetition};

use crate::output::{ExplainPart, ExplainResult};

/// Explain a regex pattern
pub fn explain_pattern(pattern: &str) -> Result<ExplainResult> {
    let ast = rexp::parse::parse(pattern)?;
    let parts = explain_ast(&ast);
    let summary = generate_summary(&parts);

    Ok(ExplainResult {
        pattern: pattern.to_string(),
        parts,
        summary,
    })
}

fn part(token: String, token_type: &str, desc: String) -> ExplainPart {
    ExplainPart {
        token,
        token_type: token_type.to_string(),
        desc,
        quantifier: None,
        group: None,
        children: None,
    }
}

/// Recursively explain an AST node
fn explain_ast(ast: &Ast) -> Vec<ExplainPart> {
    match ast {
        Ast::Empty => vec![],

        Ast::Literal(c) => {
            let desc = if c.is_ascii_graphic() || *c == ' ' {
                format!("Literal '{}'", c)
            } else {
                format!("Literal U+{:04X}", *c as u32)
            };
            vec![part(ast.to_string(), "literal", desc)]
        }

        Ast::Dot => vec![part(
            ".".to_string(),
            "any_char",
            "Any character except a line terminator".to_string(),
        )],

        Ast::Assertion(kind) => {
            let desc = match kind {
                AssertionKind::Start => "Start of input (or of a line in multi-line mode)",
                AssertionKind::End => "End of input (or of a line in multi-line mode)",
                AssertionKind::WordBoundary => "Word boundary",
                AssertionKind::NotWordBoundary => "Not a word boundary",
            };
            vec![part(ast.to_string(), "anchor", desc.to_string())]
        }

        Ast::Perl(perl) => vec![part(
            ast.to_string(),
            "perl_class",
            describe_perl(perl).to_string(),
        )],

        Ast::Class(class) => {
            let mut members: Vec<String> = class
                .items
                .iter()
                .map(|item| match item {
                    ClassItem::Char(c) => format!("'{}'", c),
                    ClassItem::Range(lo, hi) => format!("'{}' to '{}'", lo, hi),
                    ClassItem::Perl(perl) => describe_perl(perl).to_lowercase(),
                })
                .collect();
            if members.len() > 4 {
                members.truncate(4);
                members.push("...".to_string());
            }
            let desc = if class.items.is_empty() && !class.negated {
                "Empty class, never matches".to_string()
            } else if class.negated {
                format!("Any character except {}", members.join(", "))
            } else {
                format!("One of {}", members.join(", "))
            };
            vec![part(ast.to_string(), "character_class", desc)]
        }

        Ast::Backref(index) => vec![part(
            ast.to_string(),
            "backreference",
            format!("The same text group {} matched", index),
        )],

        Ast::Repetition(rep) => explain_repetition(ast, rep),

        Ast::Group(group) => {
            let children = explain_ast(&group.ast);
            let (token_type, desc, group_num) = match &group.kind {
                GroupKind::Capture {
                    index,
                    name: Some(name),
                } => ("named_group", format!("Named capture '{}'", name), Some(*index)),
                GroupKind::Capture { index, name: None } => {
                    ("capturing_group", "Capturing group".to_string(), Some(*index))
                }
                GroupKind::NonCapturing => {
                    ("non_capturing_group", "Non-capturing group".to_string(), None)
                }
                GroupKind::LookAhead { negated: false } => (
                    "lookahead",
                    "Followed by this, without consuming it".to_string(),
                    None,
                ),
                GroupKind::LookAhead { negated: true } => {
                    ("negative_lookahead", "Not followed by this".to_string(), None)
                }
            };

            let mut explained = part(ast.to_string(), token_type, desc);
            explained.group = group_num;
            explained.children = (!children.is_empty()).then_some(children);
            vec![explained]
        }

        Ast::Alternation(asts) => {
            let branches = asts
                .iter()
                .map(|a| {
                    let mut branch =
                        part(a.to_string(), "branch", "Alternative branch".to_string());
                    branch.children = Some(explain_ast(a));
                    branch
                })
                .collect();

            let mut explained = part(
                ast.to_string(),
                "alternation",
                format!("Match one of {} alternatives", asts.len()),
            );
            explained.children = Some(branches);
            vec![explained]
        }

        Ast::Concat(asts) => asts.iter().flat_map(explain_ast).collect(),
    }
}

fn explain_repetition(ast: &Ast, rep: &Repetition) -> Vec<ExplainPart> {
    let mut child_parts = explain_ast(&rep.ast);
    let operator = rep.operator();
    let lazy = if rep.greedy { "" } else { ", as few as possible" };
    let desc = match (rep.min, rep.max) {
        (0, Some(1)) => format!("Zero or one{}", lazy),
        (0, None) => format!("Zero or more{}", lazy),
        (1, None) => format!("One or more{}", lazy),
        (m, None) => format!("{} or more{}", m, lazy),
        (m, Some(n)) if m == n => format!("Exactly {}", m),
        (m, Some(n)) => format!("Between {} and {}{}", m, n, lazy),
    };
    let quantifier = format!("{}{}", operator, if rep.greedy { "" } else { "?" });

    // A single quantified token carries the quantifier itself
    if child_parts.len() == 1 && child_parts[0].children.is_none() {
        if let Some(mut only) = child_parts.pop() {
            only.token = ast.to_string();
            only.desc = format!("{} ({})", only.desc, desc.to_lowercase());
            only.quantifier = Some(quantifier);
            return vec![only];
        }
    }

    let mut explained = part(ast.to_string(), "repetition", desc);
    explained.quantifier = Some(quantifier);
    explained.children = Some(child_parts);
    vec![explained]
}

fn describe_perl(perl: &PerlClass) -> &'static str {
    match (perl.kind, perl.negated) {
        (PerlKind::Digit, false) => "Digit [0-9]",
        (PerlKind::Digit, true) => "Non-digit",
        (PerlKind::Word, false) => "Word character [A-Za-z0-9_]",
        (PerlKind::Word, true) => "Non-word character",
        (PerlKind::Space, false) => "Whitespace",
        (PerlKind::Space, true) => "Non-whitespace",
    }
}

/// Generate a summary of the pattern
fn generate_summary(parts: &[ExplainPart]) -> String {
    if parts.is_empty() {
        return "Matches the empty string everywhere".to_string();
    }

    let mut fragments = Vec::new();
    let mut has_start_anchor = false;
    let mut has_end_anchor = false;

    for part in parts {
        match part.token_type.as_str() {
            "anchor" if part.token == "^" => has_start_anchor = true,
            "anchor" if part.token == "$" => has_end_anchor = true,
            "anchor" => fragments.push(part.desc.to_lowercase()),
            "capturing_group" | "named_group" => {
                let inner = part
                    .children
                    .as_deref()
                    .map(summarize_children)
                    .unwrap_or_else(|| "group".to_string());
                fragments.push(format!("a captured {}", inner));
            }
            "alternation" => {
                let branches = part.children.as_deref().unwrap_or_default();
                if branches.len() <= 3 {
                    let names: Vec<&str> = branches.iter().map(|b| b.token.as_str()).collect();
                    fragments.push(format!("either {}", names.join(" or ")));
                } else {
                    fragments.push(format!("one of {} alternatives", branches.len()));
                }
            }
            "literal" if part.quantifier.is_some() => fragments.push(part.desc.to_lowercase()),
            "literal" => match fragments.last_mut() {
                // Merge runs of literals into one quoted string
                Some(last) if last.starts_with('\'') => {
                    last.pop();
                    last.push_str(&part.token);
                    last.push('\'');
                }
                _ => fragments.push(format!("'{}'", part.token)),
            },
            "any_char" => fragments.push(match part.quantifier.as_deref() {
                Some("*" | "*?") => "any text".to_string(),
                Some("+" | "+?") => "some text".to_string(),
                _ => "any character".to_string(),
            }),
            _ => fragments.push(part.desc.to_lowercase()),
        }
    }

    let mut summary = String::from("Matches ");
    if fragments.is_empty() {
        summary.push_str("an empty position");
    } else {
        summary.push_str(&fragments.join(", then "));
    }

    if has_start_anchor && has_end_anchor {
        summary.push_str(" (whole input)");
    } else if has_start_anchor {
        summary.push_str(" (at the start)");
    } else if has_end_anchor {
        summary.push_str(" (at the end)");
    }

    summary
}

/// Summarize a list of child parts into a brief description
fn summarize_children(children: &[ExplainPart]) -> String {
    let descs: Vec<&str> = children
        .iter()
        .filter_map(|c| match c.token_type.as_str() {
            "perl_class" => Some("class"),
            "literal" => Some("literal"),
            "any_char" => Some("any char"),
            "character_class" => Some("char class"),
            "backreference" => Some("backreference"),
            _ => None,
        })
        .collect();

    if descs.is_empty() {
        "group".to_string()
    } else {
        descs.join(" + ")
    }
}
