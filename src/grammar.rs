use crate::InterpError;

use derive_more::Display;
use regex::Regex;

use std::collections::HashSet;
use std::num::NonZeroUsize;

// A grammar G is a list of rules; each rule maps a non-terminal to a list of
// alternatives, and each alternative is a sequence of terminals and
// non-terminals. Alternatives are numbered from 1 in the order the grammar
// author wrote them, and that numbering is what parse-tree consumers see, no
// matter how the interpreter rewrites the rule internally.

#[derive(PartialEq, Eq, Debug, Default)]
pub struct Grammar { pub rules: Vec<Rule> }

impl Grammar {
    pub fn new(rules: Vec<Rule>) -> Self { Grammar { rules } }

    pub fn empty() -> Self { Grammar { rules: vec![] } }

    pub fn nonterms(&self) -> HashSet<NonTerm> {
        self.rules.iter().map(|r|r.lhs.clone()).collect()
    }

    pub fn terms(&self) -> HashSet<Term> {
        self.rules.iter().flat_map(|r|r.terms()).collect()
    }

    pub fn rule(&self, nonterm: &NonTerm) -> Option<&Rule> {
        self.rules.iter().find(|r| &r.lhs == nonterm)
    }

    pub fn rule_index(&self, nonterm: &NonTerm) -> Option<RuleIndex> {
        self.rules.iter().position(|r| &r.lhs == nonterm).map(RuleIndex)
    }

    pub fn rule_at(&self, index: RuleIndex) -> Option<&Rule> {
        self.rules.get(index.0)
    }

    pub fn rule_count(&self) -> usize { self.rules.len() }

    /// Name of the rule at `index`, or `"<invalid>"` when out of range.
    pub fn rule_name(&self, index: RuleIndex) -> &str {
        self.rule_at(index).map_or("<invalid>", |r| r.lhs.name())
    }
}

/// Position of a rule within its grammar.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Display)]
pub struct RuleIndex(pub(crate) usize);

impl RuleIndex {
    pub fn new(index: usize) -> Self { RuleIndex(index) }
    pub fn index(self) -> usize { self.0 }
}

/// An alternative number. Always at least 1.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Display)]
pub struct AltNum(NonZeroUsize);

impl AltNum {
    pub const FIRST: AltNum = AltNum(NonZeroUsize::MIN);

    pub fn new(n: usize) -> Option<Self> { NonZeroUsize::new(n).map(AltNum) }

    /// The alternative at zero-based position `i`.
    pub fn from_index(i: usize) -> Self { AltNum(NonZeroUsize::MIN.saturating_add(i)) }

    pub fn get(self) -> usize { self.0.get() }
}

impl Default for AltNum {
    fn default() -> Self { AltNum::FIRST }
}

#[derive(PartialEq, Eq, Debug, Clone)]
pub struct Rule {
    pub(crate) lhs: NonTerm,
    pub(crate) alts: Vec<Alternative>,
}

impl Rule {
    pub fn new(lhs: impl Into<NonTerm>, alts: Vec<Alternative>) -> Rule {
        Rule { lhs: lhs.into(), alts }
    }

    pub fn lhs(&self) -> &NonTerm { &self.lhs }
    pub fn alts(&self) -> &[Alternative] { &self.alts }

    pub fn alt(&self, n: AltNum) -> Option<&Alternative> { self.alts.get(n.get() - 1) }

    fn terms(&self) -> impl Iterator<Item=Term> + '_ {
        self.alts.iter().flat_map(|a| a.elements.iter().filter_map(|e| e.term()))
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
pub enum Assoc { #[default] Left, Right }

#[derive(PartialEq, Eq, Debug, Clone)]
pub struct Alternative {
    pub(crate) elements: Vec<Element>,
    pub(crate) assoc: Assoc,
}

impl Alternative {
    pub fn new(elements: Vec<Element>) -> Self {
        Alternative { elements, assoc: Assoc::Left }
    }

    /// The empty alternative; matches without consuming input.
    pub fn epsilon() -> Self { Self::new(vec![]) }

    /// Marks a binary operator alternative as right-associative.
    pub fn right_assoc(mut self) -> Self {
        self.assoc = Assoc::Right;
        self
    }

    pub fn elements(&self) -> &[Element] { &self.elements }
    pub fn assoc(&self) -> Assoc { self.assoc }

    pub fn starts_with(&self, nt: &NonTerm) -> bool {
        matches!(self.elements.first(), Some(Element::NonTerm(x)) if x == nt)
    }

    pub fn ends_with(&self, nt: &NonTerm) -> bool {
        matches!(self.elements.last(), Some(Element::NonTerm(x)) if x == nt)
    }
}

impl<E: Into<Element>> FromIterator<E> for Alternative {
    fn from_iter<I: IntoIterator<Item=E>>(iter: I) -> Self {
        Alternative::new(iter.into_iter().map(Into::into).collect())
    }
}

#[derive(PartialEq, Eq, Clone, Hash, Debug)]
pub enum Element { Term(Term), NonTerm(NonTerm) }

impl Element {
    pub fn nt(name: &str) -> Self { Element::NonTerm(name.into()) }

    fn term(&self) -> Option<Term> {
        match self {
            Element::Term(t) => Some(t.clone()),
            Element::NonTerm(_) => None,
        }
    }
}

impl From<Term> for Element { fn from(t: Term) -> Self { Element::Term(t) } }
impl From<NonTerm> for Element { fn from(nt: NonTerm) -> Self { Element::NonTerm(nt) } }
impl From<char> for Element { fn from(c: char) -> Self { Element::Term(c.into()) } }

/// Terminals. `C` and `S` double as input tokens; a `Class` only ever appears
/// on the grammar side and matches any token whose text the pattern accepts.
#[derive(PartialEq, Eq, Clone, Hash, Debug)]
pub enum Term { C(char), S(String), Class(TokenClass) }

impl Term {
    /// The literal text of the terminal, if it has one.
    pub(crate) fn text(&self) -> Option<String> {
        match self {
            Term::C(c) => Some(c.to_string()),
            Term::S(s) => Some(s.clone()),
            Term::Class(_) => None,
        }
    }

    /// Does the input token `tok` match this (grammar-side) terminal?
    pub fn matches(&self, tok: &Term) -> bool {
        if let (&Term::C(c1), &Term::C(c2)) = (self, tok) {
            return c1 == c2;
        }
        match (self, tok.text()) {
            (Term::Class(class), Some(text)) => class.is_match(&text),
            (expected, Some(text)) => expected.text().map_or(false, |s| s == text),
            (_, None) => false,
        }
    }
}

impl From<char> for Term { fn from(a: char) -> Self { Self::C(a) } }
impl From<&str> for Term { fn from(a: &str) -> Self { Self::S(a.into()) } }
impl From<TokenClass> for Term { fn from(c: TokenClass) -> Self { Self::Class(c) } }

/// A named token pattern, e.g. `ID` = `[a-z]+`. The pattern must match the
/// whole token text.
#[derive(Clone, Debug)]
pub struct TokenClass {
    name: String,
    regex: Regex,
}

impl TokenClass {
    pub fn new(name: impl Into<String>, pattern: &str) -> Result<Self, InterpError> {
        let regex = Regex::new(&format!("^(?:{})$", pattern))?;
        Ok(TokenClass { name: name.into(), regex })
    }

    pub fn name(&self) -> &str { &self.name }

    pub fn is_match(&self, text: &str) -> bool { self.regex.is_match(text) }
}

impl PartialEq for TokenClass {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.regex.as_str() == other.regex.as_str()
    }
}

impl Eq for TokenClass {}

impl std::hash::Hash for TokenClass {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.regex.as_str().hash(state);
    }
}

#[derive(PartialEq, Eq, Clone, Hash, Debug)]
pub struct NonTerm(pub(crate) String);

impl NonTerm {
    pub fn name(&self) -> &str { &self.0 }
}

impl From<&str> for NonTerm { fn from(a: &str) -> Self { Self(a.into()) } }
impl From<String> for NonTerm { fn from(a: String) -> Self { Self(a) } }

#[cfg(test)]
#[path = "tests/grammar.rs"]
mod tests_for_grammar;
