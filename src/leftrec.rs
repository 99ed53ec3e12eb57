//! Left-recursion elimination.
//!
//! A directly left-recursive rule such as
//!
//! ```text
//! e ::= e '*' e | e '+' e | '-' e | INT
//! ```
//!
//! is interpreted as a precedence climb: one *primary* alternative (`'-' e`
//! or `INT`) followed by any number of *operator* alternatives (`'*' e`,
//! `'+' e`) folded in a loop, each guarded by a precedence test. The climb has
//! two decisions of its own, and their alternative numbers are not the ones
//! the grammar author wrote; the `AltRemap` tables built here translate them
//! back.
//!
//! Alternative `i` of `n` gets precedence `n - i + 1`, so earlier
//! alternatives bind tighter.

use crate::grammar::{AltNum, Assoc, Element, Grammar, NonTerm, Rule, RuleIndex};
use crate::InterpError;

use linear_map::LinearMap;

use std::collections::HashSet;

/// Synthetic alternative number (as predicted by a rewritten decision) to the
/// original alternative number of the rule.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct AltRemap(LinearMap<AltNum, AltNum>);

impl AltRemap {
    /// For rules that were not rewritten.
    pub fn identity(n: usize) -> Self {
        AltRemap((0..n).map(|i| (AltNum::from_index(i), AltNum::from_index(i))).collect())
    }

    /// Appends the next synthetic alternative, standing for `original`.
    fn push(&mut self, original: AltNum) -> AltNum {
        let synthetic = AltNum::from_index(self.0.len());
        self.0.insert(synthetic, original);
        synthetic
    }

    pub fn original(&self, synthetic: AltNum) -> Option<AltNum> {
        self.0.get(&synthetic).copied()
    }

    pub fn len(&self) -> usize { self.0.len() }
    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item=(AltNum, AltNum)> + '_ {
        self.0.iter().map(|(s, o)| (*s, *o))
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum LrAltKind {
    /// `INT`
    Primary,
    /// `'-' e`
    Prefix,
    /// `e '+' e`, also `e '?' e ':' e`
    Binary,
    /// `e '!'`
    Suffix,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct LrAlt {
    original: AltNum,
    kind: LrAltKind,
    precedence: usize,
    // operator alternatives have their leading self-reference stripped.
    elements: Vec<Element>,
    next_precedence: Option<usize>,
}

impl LrAlt {
    pub fn original(&self) -> AltNum { self.original }
    pub fn kind(&self) -> LrAltKind { self.kind }
    pub fn precedence(&self) -> usize { self.precedence }
    pub fn elements(&self) -> &[Element] { &self.elements }

    /// Precedence argument for the trailing self-reference, if there is one.
    pub fn next_precedence(&self) -> Option<usize> { self.next_precedence }

    /// Precedence argument for the self-reference at `pos` in `elements`.
    /// Only a trailing reference climbs; any other one restarts at 0.
    pub(crate) fn precedence_at(&self, pos: usize) -> usize {
        match self.next_precedence {
            Some(p) if pos + 1 == self.elements.len() => p,
            _ => 0,
        }
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct LeftRecursiveRule {
    rule: RuleIndex,
    primary: Vec<LrAlt>,
    ops: Vec<LrAlt>,
    primary_alts: AltRemap,
    op_alts: AltRemap,
}

impl LeftRecursiveRule {
    /// Rewrites the rule at `index`, or returns `None` if it is not directly
    /// left-recursive.
    pub fn analyze(grammar: &Grammar, index: RuleIndex) -> Result<Option<Self>, InterpError> {
        let rule = grammar.rule_at(index).ok_or(InterpError::InvalidRuleIndex {
            index: index.index(),
            count: grammar.rule_count(),
        })?;
        if !is_directly_left_recursive(rule) {
            return Ok(None);
        }

        let lhs = &rule.lhs;
        let n = rule.alts.len();
        let mut lr = LeftRecursiveRule {
            rule: index,
            primary: vec![],
            ops: vec![],
            primary_alts: AltRemap::default(),
            op_alts: AltRemap::default(),
        };

        for (i, alt) in rule.alts.iter().enumerate() {
            let original = AltNum::from_index(i);
            let precedence = n - i;
            if alt.starts_with(lhs) {
                let elements = alt.elements[1..].to_vec();
                if elements.is_empty() {
                    return Err(InterpError::EmptyRecursiveAlternative(lhs.name().into()));
                }
                let (kind, next_precedence) = if alt.ends_with(lhs) {
                    let next = match alt.assoc {
                        Assoc::Left => precedence + 1,
                        Assoc::Right => precedence,
                    };
                    (LrAltKind::Binary, Some(next))
                } else {
                    (LrAltKind::Suffix, None)
                };
                lr.op_alts.push(original);
                lr.ops.push(LrAlt { original, kind, precedence, elements, next_precedence });
            } else {
                let (kind, next_precedence) = if alt.ends_with(lhs) {
                    (LrAltKind::Prefix, Some(precedence))
                } else {
                    (LrAltKind::Primary, None)
                };
                lr.primary_alts.push(original);
                lr.primary.push(LrAlt {
                    original, kind, precedence, elements: alt.elements.clone(), next_precedence,
                });
            }
        }

        if lr.primary.is_empty() {
            return Err(InterpError::NoPrimaryAlternative(lhs.name().into()));
        }
        Ok(Some(lr))
    }

    pub fn rule(&self) -> RuleIndex { self.rule }

    /// Primary alternatives, in synthetic order.
    pub fn primary(&self) -> &[LrAlt] { &self.primary }

    /// Operator alternatives, in synthetic order.
    pub fn ops(&self) -> &[LrAlt] { &self.ops }

    pub fn primary_alts(&self) -> &AltRemap { &self.primary_alts }
    pub fn op_alts(&self) -> &AltRemap { &self.op_alts }
}

pub fn is_directly_left_recursive(rule: &Rule) -> bool {
    rule.alts.iter().any(|alt| alt.starts_with(&rule.lhs))
}

/// Looks for a cycle of left-corner references from `start` back to itself
/// through at least one other rule. Such recursion survives the rewrite, so
/// the interpreter refuses it up front. Direct self-references are skipped;
/// those are what the rewrite removes.
///
/// Only the first element of each alternative is followed; a nullable prefix
/// is not looked through.
pub(crate) fn left_corner_cycle(grammar: &Grammar, start: &NonTerm) -> Option<Vec<NonTerm>> {
    let mut visited = HashSet::new();
    let mut path = vec![start.clone()];
    if search_left_corner(grammar, start, &mut path, &mut visited) {
        Some(path)
    } else {
        None
    }
}

fn search_left_corner(grammar: &Grammar,
                      start: &NonTerm,
                      path: &mut Vec<NonTerm>,
                      visited: &mut HashSet<NonTerm>) -> bool {
    let current = match path.last() { Some(nt) => nt.clone(), None => return false };
    let rule = match grammar.rule(&current) { Some(r) => r, None => return false };
    for alt in &rule.alts {
        let nt = match alt.elements.first() {
            Some(Element::NonTerm(nt)) if *nt != current => nt,
            _ => continue,
        };
        if nt == start {
            path.push(nt.clone());
            return true;
        }
        if visited.insert(nt.clone()) {
            path.push(nt.clone());
            if search_left_corner(grammar, start, path, visited) {
                return true;
            }
            path.pop();
        }
    }
    false
}

#[cfg(test)]
#[path = "tests/leftrec.rs"]
mod tests_for_leftrec;
