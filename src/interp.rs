//! Grammar interpreter: parses input by walking the transducer directly, one
//! rule context per rule invocation.
//!
//! Alternatives are tried in order. Every step hands the rest of the parse
//! to a continuation, so when the rest fails the step rolls its own edits
//! back and the nearest choice point moves on to its next option: a later
//! alternative, or a shorter precedence climb. The first parse that reaches
//! the end wins.
//!
//! A left-recursive rule is run as a precedence climb: match a primary
//! alternative, then fold operator alternatives whose precedence is at least
//! the invocation's precedence argument, longest climb first. Each fold
//! pushes a recursion context that adopts the previous one as its first
//! child. Outer alternatives are written once the parse has succeeded, so
//! abandoned attempts never touch them.
//!
//! Continuations nest on the native stack, so its depth grows with the
//! length of the input as well as with rule nesting.

use crate::grammar::{AltNum, Grammar, NonTerm, RuleIndex, Term};
use crate::node::{Child, CtxId, ParseTree, TokenNode};
use crate::rendering::Rendered;
use crate::transducer::{Body, RuleStates, State, StateKind, Transducer};
use crate::InterpError;

use log::{debug, trace};

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct InterpOptions {
    /// Deepest nesting of rule invocations before giving up with
    /// `RecursionLimit`.
    pub max_depth: usize,
    /// Fail with `ExtraneousInput` when the start rule does not consume the
    /// whole input.
    pub require_eof: bool,
}

impl Default for InterpOptions {
    fn default() -> Self {
        InterpOptions { max_depth: 256, require_eof: true }
    }
}

pub struct Interpreter<'g> {
    grammar: &'g Grammar,
    transducer: Transducer,
    options: InterpOptions,
}

impl<'g> Interpreter<'g> {
    pub fn new(grammar: &'g Grammar) -> Result<Self, InterpError> {
        Self::with_options(grammar, InterpOptions::default())
    }

    pub fn with_options(grammar: &'g Grammar, options: InterpOptions) -> Result<Self, InterpError> {
        let transducer = Transducer::build(grammar)?;
        Ok(Interpreter { grammar, transducer, options })
    }

    pub fn grammar(&self) -> &'g Grammar { self.grammar }
    pub fn transducer(&self) -> &Transducer { &self.transducer }
    pub fn options(&self) -> &InterpOptions { &self.options }

    pub fn parse(&self, start: &NonTerm, input: &[Term]) -> Result<ParseTree, InterpError> {
        let rule = self.grammar.rule_index(start)
            .ok_or_else(|| InterpError::UndefinedNonTerm(start.name().into()))?;
        self.parse_rule(rule, input)
    }

    /// Parses `input` starting from the rule at `rule`. On success the
    /// returned tree is sealed and every context in it has its outer
    /// alternative resolved.
    pub fn parse_rule(&self, rule: RuleIndex, input: &[Term]) -> Result<ParseTree, InterpError> {
        if rule.index() >= self.transducer.rule_count() {
            return Err(InterpError::InvalidRuleIndex {
                index: rule.index(),
                count: self.transducer.rule_count(),
            });
        }
        debug!("parse {} on `{}`", self.grammar.rule_name(rule), input.rendered());

        let mut run = Run {
            grammar: self.grammar,
            transducer: &self.transducer,
            options: &self.options,
            input,
            pos: 0,
            depth: 0,
            tree: ParseTree::for_transducer(&self.transducer),
            furthest: None,
        };
        let require_eof = self.options.require_eof;
        let mut root = None;
        let result = run.invoke(rule, None, None, 0, &mut |run, ctx| {
            if require_eof && run.pos < run.input.len() {
                return Err(InterpError::ExtraneousInput {
                    position: run.pos,
                    found: run.input[run.pos..].rendered(),
                });
            }
            root = Some(ctx);
            Ok(())
        });
        if let Err(e) = result {
            return Err(run.furthest_error(e));
        }
        let root = root.ok_or_else(|| InterpError::NoViableAlt {
            rule: self.grammar.rule_name(rule).into(),
            position: 0,
        })?;
        run.tree.seal(root)?;
        Ok(run.tree)
    }
}

/// The state of one parse.
struct Run<'a> {
    grammar: &'a Grammar,
    transducer: &'a Transducer,
    options: &'a InterpOptions,
    input: &'a [Term],
    pos: usize,
    depth: usize,
    tree: ParseTree,
    // the syntax error raised furthest into the input so far.
    furthest: Option<InterpError>,
}

/// A point to roll back to.
struct Mark {
    pos: usize,
    contexts: usize,
    ctx: CtxId,
    children: usize,
}

/// The rest of the parse after a rule invocation matched, given the
/// invocation's context.
type Matched<'k, 'a> = &'k mut dyn FnMut(&mut Run<'a>, CtxId) -> Result<(), InterpError>;

/// The rest of the parse after a sequence of elements matched.
type Then<'k, 'a> = &'k mut dyn FnMut(&mut Run<'a>) -> Result<(), InterpError>;

impl<'a> Run<'a> {
    fn invoke(&mut self,
              rule: RuleIndex,
              parent: Option<CtxId>,
              invoking_state: Option<State>,
              precedence: usize,
              k: Matched<'_, 'a>) -> Result<(), InterpError> {
        if self.depth >= self.options.max_depth {
            return Err(InterpError::RecursionLimit(self.options.max_depth));
        }
        self.depth += 1;
        trace!("enter {} at {} (precedence {})", self.grammar.rule_name(rule), self.pos, precedence);
        let result = self.invoke_body(rule, parent, invoking_state, precedence, k);
        if result.is_err() {
            trace!("no parse through {} at {}", self.grammar.rule_name(rule), self.pos);
        }
        self.depth -= 1;
        result
    }

    fn invoke_body(&mut self,
                   rule: RuleIndex,
                   parent: Option<CtxId>,
                   invoking_state: Option<State>,
                   precedence: usize,
                   k: Matched<'_, 'a>) -> Result<(), InterpError> {
        let transducer = self.transducer;
        let states = transducer.rule_states(rule).ok_or(InterpError::InvalidRuleIndex {
            index: rule.index(),
            count: transducer.rule_count(),
        })?;
        let start = self.pos;
        let ctx = self.tree.push_context(parent, invoking_state, rule)?;
        self.tree.set_span(ctx, Some(start), start)?;

        match &states.body {
            Body::Plain { decision, alts } => {
                self.block(ctx, *decision, alts, &mut |run: &mut Run<'a>| -> Result<(), InterpError> {
                    run.tree.set_span(ctx, None, run.pos)?;
                    run.complete(ctx, &mut *k)
                })
            }
            Body::LeftRecursive { primary_decision, primary, .. } => {
                self.block(ctx, *primary_decision, primary, &mut |run: &mut Run<'a>| -> Result<(), InterpError> {
                    run.tree.set_span(ctx, None, run.pos)?;
                    run.climb(rule, states, precedence, ctx, &mut *k)
                })
            }
        }
    }

    /// Hands a matched invocation to the rest of the parse. The invocation no
    /// longer counts towards the nesting depth while the rest runs.
    fn complete(&mut self, ctx: CtxId, k: Matched<'_, 'a>) -> Result<(), InterpError> {
        if let Some(c) = self.tree.context(ctx) {
            trace!("{} matched {:?}", self.grammar.rule_name(c.rule_index()), c.tokens());
        }
        self.depth -= 1;
        let result = k(self, ctx);
        self.depth += 1;
        result
    }

    /// Folds operator alternatives onto `current` while they match and the
    /// rest of the parse accepts the result. When every fold from here fails,
    /// the climb stops at `current`.
    fn climb(&mut self,
             rule: RuleIndex,
             states: &'a RuleStates,
             precedence: usize,
             current: CtxId,
             k: Matched<'_, 'a>) -> Result<(), InterpError> {
        let transducer = self.transducer;
        let (loop_entry, op_decision, ops) = match &states.body {
            Body::LeftRecursive { loop_entry, op_decision, ops, .. } => (*loop_entry, *op_decision, ops),
            Body::Plain { .. } => return self.complete(current, k),
        };
        trace!("{}: climb at {} from {}", self.grammar.rule_name(rule), loop_entry, self.pos);

        for (i, op) in ops.iter().enumerate() {
            let op_precedence = match transducer.data(op.predicate).kind() {
                StateKind::Precedence(p) => *p,
                _ => return Err(InterpError::InvalidState {
                    state: op.predicate.number(),
                    count: transducer.state_count(),
                }),
            };
            if op_precedence < precedence {
                continue;
            }
            let mark = self.mark(current);
            let from = mark.pos;
            let next = self.tree.push_recursion_context(current, states.start)?;
            let folded = self.sequence(next, &op.elements, &mut |run: &mut Run<'a>| -> Result<(), InterpError> {
                run.tree.set_span(next, None, run.pos)?;
                if run.pos == from {
                    // a fold that consumed nothing would repeat forever.
                    run.complete(next, &mut *k)
                } else {
                    run.climb(rule, states, precedence, next, &mut *k)
                }
            });
            match folded {
                Ok(()) => {
                    debug!("{}: fold at {} via {}", self.grammar.rule_name(rule), from,
                           transducer.data(op.predicate).label());
                    return self.resolve(next, op_decision, AltNum::from_index(i));
                }
                Err(e) => {
                    self.recover(e)?;
                    self.tree.unwind_recursion_context(next)?;
                    self.rollback(mark);
                }
            }
        }
        self.complete(current, k)
    }

    /// Tries the alternatives of a decision in order. The first one after
    /// which the rest of the parse succeeds is recorded in `ctx`.
    fn block(&mut self, ctx: CtxId, decision: State, alts: &[Vec<State>], k: Then<'_, 'a>) -> Result<(), InterpError> {
        let start = self.pos;
        for (i, elements) in alts.iter().enumerate() {
            match self.attempt(ctx, |run| run.sequence(ctx, elements, &mut *k)) {
                Ok(()) => return self.resolve(ctx, decision, AltNum::from_index(i)),
                Err(e) => self.recover(e)?,
            }
        }
        let rule = self.transducer.data(decision).rule();
        Err(InterpError::NoViableAlt { rule: self.grammar.rule_name(rule).into(), position: start })
    }

    /// Matches `elements` into `ctx`, then runs `k`.
    fn sequence(&mut self, ctx: CtxId, elements: &[State], k: Then<'_, 'a>) -> Result<(), InterpError> {
        let (&state, rest) = match elements.split_first() {
            Some(split) => split,
            None => return k(self),
        };
        let transducer = self.transducer;
        let input = self.input;
        match transducer.data(state).kind() {
            StateKind::Match(expected) => match input.get(self.pos) {
                Some(tok) if expected.matches(tok) => self.attempt(ctx, |run| {
                    run.tree.add_child(ctx, Child::Token(TokenNode::new(run.pos, tok.clone())))?;
                    run.pos += 1;
                    run.sequence(ctx, rest, &mut *k)
                }),
                found => Err(InterpError::Mismatch {
                    position: self.pos,
                    expected: vec![expected.to_string()],
                    found: found.map_or("<EOF>".to_string(), |t| t.to_string()),
                }),
            },
            StateKind::Call { rule, precedence } => self.attempt(ctx, |run| {
                run.invoke(*rule, Some(ctx), Some(state), *precedence,
                           &mut |run: &mut Run<'a>, child: CtxId| -> Result<(), InterpError> {
                    run.attempt(ctx, |run| {
                        run.tree.add_child(ctx, Child::Rule(child))?;
                        run.sequence(ctx, rest, &mut *k)
                    })
                })
            }),
            _ => Err(InterpError::InvalidState {
                state: state.number(),
                count: transducer.state_count(),
            }),
        }
    }

    /// Runs `f`, rolling the position, the arena and `ctx`'s children back
    /// if it fails.
    fn attempt(&mut self,
               ctx: CtxId,
               f: impl FnOnce(&mut Self) -> Result<(), InterpError>) -> Result<(), InterpError> {
        let mark = self.mark(ctx);
        let result = f(self);
        if result.is_err() {
            self.rollback(mark);
        }
        result
    }

    /// Maps the alternative predicted at `decision` back to the grammar's
    /// numbering and writes it into `ctx`.
    fn resolve(&mut self, ctx: CtxId, decision: State, synthetic: AltNum) -> Result<(), InterpError> {
        let invalid = || InterpError::InvalidState {
            state: decision.number(),
            count: self.transducer.state_count(),
        };
        let remap = self.transducer.outer_alts(decision).ok_or_else(invalid)?;
        let alt = remap.original(synthetic).ok_or_else(invalid)?;
        debug!("{}: alternative {} predicted at {} is outer alternative {}",
               self.transducer.data(decision).label(), synthetic, decision, alt);
        self.tree.context_mut(ctx)?.set_outer_alternative(alt);
        Ok(())
    }

    fn mark(&self, ctx: CtxId) -> Mark {
        Mark {
            pos: self.pos,
            contexts: self.tree.len(),
            ctx,
            children: self.tree.children(ctx).len(),
        }
    }

    fn rollback(&mut self, mark: Mark) {
        self.pos = mark.pos;
        self.tree.truncate(mark.contexts, mark.ctx, mark.children);
    }

    /// Syntax errors are remembered and the caller moves on to the next
    /// alternative; anything else aborts the parse. Mismatches at the same
    /// token are merged into one list of expected terminals.
    fn recover(&mut self, e: InterpError) -> Result<(), InterpError> {
        if !e.is_syntax() {
            return Err(e);
        }
        match (&mut self.furthest, e) {
            (Some(InterpError::Mismatch { position: at, expected: so_far, .. }),
             InterpError::Mismatch { position, expected, .. }) if *at == position => {
                for term in expected {
                    if !so_far.contains(&term) {
                        so_far.push(term);
                    }
                }
            }
            (furthest, e) => {
                if furthest.as_ref().map_or(true, |prev| e.position() > prev.position()) {
                    *furthest = Some(e);
                }
            }
        }
        Ok(())
    }

    fn furthest_error(&mut self, e: InterpError) -> InterpError {
        if !e.is_syntax() {
            return e;
        }
        match self.furthest.take() {
            Some(prev) if prev.position() >= e.position() => prev,
            _ => e,
        }
    }
}

#[cfg(test)]
#[path = "tests/interp.rs"]
mod tests_for_interp;
