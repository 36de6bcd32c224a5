//! Codepoint sets and the character predicates the matcher relies on

use crate::ast::{Class, ClassItem, PerlClass, PerlKind};

/// Codepoints above this have no simple case mappings
const LAST_CASED: char = '\u{1E943}';

/// `[A-Za-z0-9_]`
pub(crate) fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Unicode whitespace plus the byte order mark
pub(crate) fn is_space_char(c: char) -> bool {
    c.is_whitespace() || c == '\u{FEFF}'
}

pub(crate) fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

impl PerlClass {
    pub fn matches(&self, c: char) -> bool {
        let hit = match self.kind {
            PerlKind::Digit => c.is_ascii_digit(),
            PerlKind::Word => is_word_char(c),
            PerlKind::Space => is_space_char(c),
        };
        hit != self.negated
    }
}

fn single(mut it: impl Iterator<Item = char>) -> Option<char> {
    let c = it.next()?;
    match it.next() {
        Some(_) => None,
        None => Some(c),
    }
}

/// The simple (single codepoint) case variants of `c`, including `c`.
pub(crate) fn case_variants(c: char) -> Vec<char> {
    let mut out = vec![c];
    let mut i = 0;
    while i < out.len() {
        let cur = out[i];
        for v in [single(cur.to_lowercase()), single(cur.to_uppercase())]
            .into_iter()
            .flatten()
        {
            if !out.contains(&v) {
                out.push(v);
            }
        }
        i += 1;
    }
    out
}

/// Canonical simple case fold: the lowercase form when it is one codepoint
pub(crate) fn fold(c: char) -> char {
    single(c.to_lowercase()).unwrap_or(c)
}

/// A sorted, non-overlapping list of inclusive codepoint ranges
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct CharSet {
    ranges: Vec<(char, char)>,
}

impl CharSet {
    pub(crate) fn from_chars(chars: &[char]) -> Self {
        let mut set = CharSet::default();
        for &c in chars {
            set.ranges.push((c, c));
        }
        set.canonicalize();
        set
    }

    pub(crate) fn push(&mut self, lo: char, hi: char) {
        self.ranges.push((lo, hi));
    }

    pub(crate) fn contains(&self, c: char) -> bool {
        self.ranges
            .binary_search_by(|&(lo, hi)| {
                if hi < c {
                    std::cmp::Ordering::Less
                } else if lo > c {
                    std::cmp::Ordering::Greater
                } else {
                    std::cmp::Ordering::Equal
                }
            })
            .is_ok()
    }

    /// Sort and merge overlapping or adjacent ranges
    pub(crate) fn canonicalize(&mut self) {
        self.ranges.sort_unstable();
        let mut merged: Vec<(char, char)> = Vec::with_capacity(self.ranges.len());
        for &(lo, hi) in &self.ranges {
            if let Some(last) = merged.last_mut() {
                if (last.1 as u32).saturating_add(1) >= lo as u32 {
                    last.1 = last.1.max(hi);
                    continue;
                }
            }
            merged.push((lo, hi));
        }
        self.ranges = merged;
    }

    /// Add the simple case variants of every member
    pub(crate) fn fold_case(&mut self) {
        let mut extra = Vec::new();
        for &(lo, hi) in &self.ranges {
            if lo > LAST_CASED {
                continue;
            }
            for c in lo..=hi.min(LAST_CASED) {
                for v in case_variants(c).into_iter().skip(1) {
                    extra.push((v, v));
                }
            }
        }
        self.ranges.extend(extra);
        self.canonicalize();
    }
}

/// A compiled bracketed class or case-folded literal
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ClassMatcher {
    negated: bool,
    set: CharSet,
    perl: Vec<PerlClass>,
}

impl ClassMatcher {
    pub(crate) fn new(class: &Class, case_insensitive: bool) -> Self {
        let mut set = CharSet::default();
        let mut perl = Vec::new();
        for item in &class.items {
            match *item {
                ClassItem::Char(c) => set.push(c, c),
                ClassItem::Range(lo, hi) => set.push(lo, hi),
                ClassItem::Perl(p) => perl.push(p),
            }
        }
        set.canonicalize();
        if case_insensitive {
            set.fold_case();
        }
        Self {
            negated: class.negated,
            set,
            perl,
        }
    }

    pub(crate) fn from_set(set: CharSet) -> Self {
        Self {
            negated: false,
            set,
            perl: Vec::new(),
        }
    }

    pub(crate) fn matches(&self, c: char) -> bool {
        let hit = self.set.contains(c) || self.perl.iter().any(|p| p.matches(c));
        hit != self.negated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_variants() {
        let mut v = case_variants('a');
        v.sort();
        assert_eq!(v, vec!['A', 'a']);
        assert_eq!(case_variants('1'), vec!['1']);
        let mut sigma = case_variants('Σ');
        sigma.sort();
        assert!(sigma.contains(&'σ'));
    }

    #[test]
    fn test_charset_canonicalize() {
        let mut set = CharSet::default();
        set.push('d', 'f');
        set.push('a', 'c');
        set.push('x', 'x');
        set.canonicalize();
        assert_eq!(set.ranges, vec![('a', 'f'), ('x', 'x')]);
        assert!(set.contains('e'));
        assert!(!set.contains('g'));
    }

    #[test]
    fn test_fold_class() {
        let class = Class {
            negated: false,
            items: vec![ClassItem::Range('a', 'c')],
        };
        let m = ClassMatcher::new(&class, true);
        assert!(m.matches('B'));
        assert!(!m.matches('D'));

        let negated = Class {
            negated: true,
            items: vec![ClassItem::Char('a')],
        };
        let m = ClassMatcher::new(&negated, true);
        assert!(!m.matches('A'));
        assert!(m.matches('b'));
    }

    #[test]
    fn test_perl_classes() {
        let digit = PerlClass {
            kind: PerlKind::Digit,
            negated: false,
        };
        assert!(digit.matches('7'));
        assert!(!digit.matches('٣'));
        let not_space = PerlClass {
            kind: PerlKind::Space,
            negated: true,
        };
        assert!(!not_space.matches('\u{00A0}'));
        assert!(not_space.matches('x'));
    }

    #[test]
    fn test_empty_class_never_matches() {
        let m = ClassMatcher::new(
            &Class {
                negated: false,
                items: vec![],
            },
            false,
        );
        assert!(!m.matches('a'));
    }
}
