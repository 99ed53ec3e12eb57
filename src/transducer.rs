//! The control representation of a grammar: every rule becomes a handful of
//! numbered states. The interpreter steps through match and call states and
//! reads each operator's precedence off its predicate state; the remaining
//! states name the points a rule context refers to, as its invoking state or
//! as the decision that fixed its outer alternative.
//!
//! ```text
//! plain rule:           start  block(decision)  alt elements...  stop
//! left-recursive rule:  start  block(decision)  primary elements...
//!                       loop-entry  star-block(decision)
//!                       (precedence-predicate  op elements...)*  stop
//! ```

use std::collections::{HashMap, HashSet};

use crate::grammar::{Element, Grammar, RuleIndex, Term};
use crate::leftrec::{self, AltRemap, LeftRecursiveRule, LrAlt};
use crate::InterpError;

use derive_more::Display;

#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Display)]
pub struct State(pub(crate) usize);

impl State {
    pub fn number(self) -> usize { self.0 }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum StateKind {
    RuleStart,
    RuleStop,
    /// Decision over a rule's alternatives (or, for a left-recursive rule,
    /// over its primary alternatives).
    BlockStart,
    /// Decision between another climb iteration and leaving the rule.
    StarLoopEntry,
    /// Decision over the operator alternatives of a left-recursive rule.
    StarBlockStart,
    /// `{precedence >= p}?` guarding an operator alternative.
    Precedence(usize),
    Match(Term),
    Call { rule: RuleIndex, precedence: usize },
}

#[derive(Clone, Debug)]
pub struct StateData {
    label: String,
    rule: RuleIndex,
    kind: StateKind,
}

impl StateData {
    pub fn label(&self) -> &str { &self.label }
    pub fn rule(&self) -> RuleIndex { self.rule }
    pub fn kind(&self) -> &StateKind { &self.kind }
}

#[derive(Clone, Debug)]
pub(crate) struct OpStates {
    pub(crate) predicate: State,
    pub(crate) elements: Vec<State>,
}

#[derive(Clone, Debug)]
pub(crate) enum Body {
    Plain {
        decision: State,
        alts: Vec<Vec<State>>,
    },
    LeftRecursive {
        primary_decision: State,
        primary: Vec<Vec<State>>,
        loop_entry: State,
        op_decision: State,
        ops: Vec<OpStates>,
    },
}

#[derive(Clone, Debug)]
pub(crate) struct RuleStates {
    pub(crate) start: State,
    pub(crate) stop: State,
    pub(crate) body: Body,
    pub(crate) left_recursive: Option<LeftRecursiveRule>,
}

pub struct Transducer {
    states: Vec<StateData>,
    rules: Vec<RuleStates>,
    // the decisions whose predicted alternative is recorded in the context,
    // each with the table that maps it back to the grammar's numbering.
    outer_alts: HashMap<State, AltRemap>,
}

impl Transducer {
    pub fn build(grammar: &Grammar) -> Result<Self, InterpError> {
        check_rules(grammar)?;

        let mut b = TransducerBuilder {
            states: vec![],
            outer_alts: HashMap::new(),
        };
        let mut rules = Vec::with_capacity(grammar.rule_count());
        for (i, rule) in grammar.rules.iter().enumerate() {
            let index = RuleIndex(i);
            let name = rule.lhs.name();
            let start = b.state(index, format!("{name}:start"), StateKind::RuleStart);
            let left_recursive = LeftRecursiveRule::analyze(grammar, index)?;
            let body = match &left_recursive {
                None => {
                    let decision = b.state(index, format!("{name}:block"), StateKind::BlockStart);
                    let alts = rule.alts.iter().enumerate()
                        .map(|(a, alt)| b.elements(grammar, index, &format!("{name}:{}", a + 1), &alt.elements, |_| 0))
                        .collect::<Result<Vec<_>, _>>()?;
                    b.outer_alts.insert(decision, AltRemap::identity(rule.alts.len()));
                    Body::Plain { decision, alts }
                }
                Some(lr) => b.left_recursive(grammar, index, name, lr)?,
            };
            let stop = b.state(index, format!("{name}:stop"), StateKind::RuleStop);
            rules.push(RuleStates { start, stop, body, left_recursive });
        }

        Ok(Transducer { states: b.states, rules, outer_alts: b.outer_alts })
    }

    pub fn data(&self, state: State) -> &StateData {
        &self.states[state.0]
    }

    pub fn state_count(&self) -> usize { self.states.len() }
    pub fn rule_count(&self) -> usize { self.rules.len() }

    pub fn rule_start(&self, rule: RuleIndex) -> Option<State> {
        self.rules.get(rule.0).map(|r| r.start)
    }

    pub fn rule_stop(&self, rule: RuleIndex) -> Option<State> {
        self.rules.get(rule.0).map(|r| r.stop)
    }

    pub fn left_recursive_rule(&self, rule: RuleIndex) -> Option<&LeftRecursiveRule> {
        self.rules.get(rule.0).and_then(|r| r.left_recursive.as_ref())
    }

    /// The remap table for `decision`, if the alternative predicted there is
    /// the one a rule context reports.
    pub fn outer_alts(&self, decision: State) -> Option<&AltRemap> {
        self.outer_alts.get(&decision)
    }

    pub fn outer_decisions(&self) -> impl Iterator<Item=State> + '_ {
        self.outer_alts.keys().copied()
    }

    pub(crate) fn rule_states(&self, rule: RuleIndex) -> Option<&RuleStates> {
        self.rules.get(rule.0)
    }
}

fn check_rules(grammar: &Grammar) -> Result<(), InterpError> {
    let mut seen = HashSet::new();
    for rule in &grammar.rules {
        if !seen.insert(&rule.lhs) {
            return Err(InterpError::DuplicateRule(rule.lhs.name().into()));
        }
        if rule.alts.is_empty() {
            return Err(InterpError::EmptyRule(rule.lhs.name().into()));
        }
        for element in rule.alts.iter().flat_map(|a| a.elements.iter()) {
            if let Element::NonTerm(nt) = element {
                if grammar.rule(nt).is_none() {
                    return Err(InterpError::UndefinedNonTerm(nt.name().into()));
                }
            }
        }
    }
    for rule in &grammar.rules {
        if let Some(cycle) = leftrec::left_corner_cycle(grammar, &rule.lhs) {
            return Err(InterpError::MutualLeftRecursion(
                cycle.iter().map(|nt| nt.name().to_string()).collect()));
        }
    }
    Ok(())
}

struct TransducerBuilder {
    states: Vec<StateData>,
    outer_alts: HashMap<State, AltRemap>,
}

impl TransducerBuilder {
    fn state(&mut self, rule: RuleIndex, label: String, kind: StateKind) -> State {
        let s = State(self.states.len());
        self.states.push(StateData { label, rule, kind });
        s
    }

    fn elements(&mut self,
                grammar: &Grammar,
                rule: RuleIndex,
                prefix: &str,
                elements: &[Element],
                precedence_at: impl Fn(usize) -> usize) -> Result<Vec<State>, InterpError> {
        let mut states = Vec::with_capacity(elements.len());
        for (pos, element) in elements.iter().enumerate() {
            let label = format!("{prefix}.{}", pos + 1);
            let kind = match element {
                Element::Term(t) => StateKind::Match(t.clone()),
                Element::NonTerm(nt) => {
                    let callee = grammar.rule_index(nt)
                        .ok_or_else(|| InterpError::UndefinedNonTerm(nt.name().into()))?;
                    let precedence = if callee == rule { precedence_at(pos) } else { 0 };
                    StateKind::Call { rule: callee, precedence }
                }
            };
            states.push(self.state(rule, label, kind));
        }
        Ok(states)
    }

    fn lr_elements(&mut self, grammar: &Grammar, rule: RuleIndex, prefix: &str, alt: &LrAlt)
                   -> Result<Vec<State>, InterpError> {
        self.elements(grammar, rule, prefix, alt.elements(), |pos| alt.precedence_at(pos))
    }

    fn left_recursive(&mut self, grammar: &Grammar, index: RuleIndex, name: &str, lr: &LeftRecursiveRule)
                      -> Result<Body, InterpError> {
        let primary_decision = self.state(index, format!("{name}:block"), StateKind::BlockStart);
        let primary = lr.primary().iter()
            .map(|alt| self.lr_elements(grammar, index, &format!("{name}:{}", alt.original()), alt))
            .collect::<Result<Vec<_>, _>>()?;
        self.outer_alts.insert(primary_decision, lr.primary_alts().clone());

        let loop_entry = self.state(index, format!("{name}:loop"), StateKind::StarLoopEntry);
        let op_decision = self.state(index, format!("{name}:ops"), StateKind::StarBlockStart);
        let mut ops = Vec::with_capacity(lr.ops().len());
        for alt in lr.ops() {
            let predicate = self.state(index,
                                       format!("{name}:{}.prec", alt.original()),
                                       StateKind::Precedence(alt.precedence()));
            let elements = self.lr_elements(grammar, index, &format!("{name}:{}", alt.original()), alt)?;
            ops.push(OpStates { predicate, elements });
        }
        self.outer_alts.insert(op_decision, lr.op_alts().clone());

        Ok(Body::LeftRecursive { primary_decision, primary, loop_entry, op_decision, ops })
    }
}

// This is a trick: we have the source code for our tests under a single
// `src/tests/` subdirectory, but we declare it as a module *here*, under this
// module. That way, it has access to private constructors and state that a
// sibling (or in this case, nibling) module would not have access to.
#[cfg(test)]
#[path = "tests/transducer.rs"]
mod tests_for_transducer;
