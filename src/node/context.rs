use crate::grammar::{AltNum, RuleIndex};
use crate::node::RuleNode;
use crate::transducer::State;

use log::warn;

use std::ops::Deref;

/// The outer alternative of a rule invocation. It starts out provisional
/// (alternative 1) and becomes resolved once the interpreter has matched the
/// invocation and translated the alternative back to the grammar's numbering.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum OuterAlt {
    Provisional(AltNum),
    Resolved(AltNum),
}

impl OuterAlt {
    pub fn get(self) -> AltNum {
        match self {
            OuterAlt::Provisional(alt) | OuterAlt::Resolved(alt) => alt,
        }
    }

    pub fn is_resolved(self) -> bool { matches!(self, OuterAlt::Resolved(_)) }
}

impl Default for OuterAlt {
    fn default() -> Self { OuterAlt::Provisional(AltNum::FIRST) }
}

/// A rule context that knows which alternative of its rule was matched. For
/// a left-recursive rule this is the alternative of the original rule, not
/// the one the precedence climb predicted.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct InterpreterRuleContext {
    node: RuleNode,
    outer_alt: OuterAlt,
}

impl InterpreterRuleContext {
    pub fn new(parent: Option<super::CtxId>, invoking_state: Option<State>, rule_index: RuleIndex) -> Self {
        InterpreterRuleContext {
            node: RuleNode::new(parent, invoking_state, rule_index),
            outer_alt: OuterAlt::default(),
        }
    }

    pub fn outer_alternative(&self) -> AltNum { self.outer_alt.get() }

    pub fn outer_alt(&self) -> OuterAlt { self.outer_alt }

    pub fn is_outer_alternative_resolved(&self) -> bool { self.outer_alt.is_resolved() }

    pub fn set_outer_alternative(&mut self, alt: AltNum) {
        if let OuterAlt::Resolved(prev) = self.outer_alt {
            if prev != alt {
                warn!("rule {} context: outer alternative {} overwritten with {}",
                      self.node.rule_index, prev, alt);
            }
        }
        self.outer_alt = OuterAlt::Resolved(alt);
    }

    pub(crate) fn node_mut(&mut self) -> &mut RuleNode { &mut self.node }
}

impl Deref for InterpreterRuleContext {
    type Target = RuleNode;
    fn deref(&self) -> &RuleNode { &self.node }
}

#[cfg(test)]
#[path = "../tests/context.rs"]
mod tests_for_context;
