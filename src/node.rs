use crate::grammar::{RuleIndex, Term};
use crate::transducer::State;

use derive_more::Display;

use std::ops::Range;

mod context;
mod tree;

pub use context::{InterpreterRuleContext, OuterAlt};
pub use tree::{Ancestors, ParseTree};

/// Handle of a rule context within its `ParseTree`.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Display)]
pub struct CtxId(pub(crate) usize);

impl CtxId {
    pub fn index(self) -> usize { self.0 }
}

/// A matched input token, as a leaf of the tree.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct TokenNode {
    index: usize,
    term: Term,
}

impl TokenNode {
    pub fn new(index: usize, term: Term) -> Self { TokenNode { index, term } }

    /// Position of the token in the input.
    pub fn index(&self) -> usize { self.index }
    pub fn term(&self) -> &Term { &self.term }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Child {
    Rule(CtxId),
    Token(TokenNode),
}

/// One rule invocation. The parent link is a back-reference only; the tree
/// owns every node and children are held top-down by id.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct RuleNode {
    pub(crate) parent: Option<CtxId>,
    pub(crate) invoking_state: Option<State>,
    pub(crate) rule_index: RuleIndex,
    pub(crate) children: Vec<Child>,
    pub(crate) start: usize,
    pub(crate) stop: usize,
}

impl RuleNode {
    pub(crate) fn new(parent: Option<CtxId>, invoking_state: Option<State>, rule_index: RuleIndex) -> Self {
        RuleNode { parent, invoking_state, rule_index, children: vec![], start: 0, stop: 0 }
    }

    pub fn parent(&self) -> Option<CtxId> { self.parent }

    /// The state whose call entered this rule; `None` for the root.
    pub fn invoking_state(&self) -> Option<State> { self.invoking_state }

    pub fn rule_index(&self) -> RuleIndex { self.rule_index }

    pub fn children(&self) -> &[Child] { &self.children }

    pub fn is_root(&self) -> bool { self.parent.is_none() }

    /// Input tokens covered by the invocation, as a half-open range.
    pub fn tokens(&self) -> Range<usize> { self.start..self.stop }
}
