use crate::node::{Child, CtxId, InterpreterRuleContext, ParseTree, TokenNode};

use std::ops::ControlFlow;

/// Callbacks for a depth-first walk over a finished parse tree. Returning
/// `ControlFlow::Break` stops the walk.
pub trait ParseTreeListener {
    fn enter_rule(&mut self, id: CtxId, ctx: &InterpreterRuleContext) -> ControlFlow<()> {
        let _ = (id, ctx);
        ControlFlow::Continue(())
    }

    fn exit_rule(&mut self, id: CtxId, ctx: &InterpreterRuleContext) -> ControlFlow<()> {
        let _ = (id, ctx);
        ControlFlow::Continue(())
    }

    fn visit_token(&mut self, token: &TokenNode) -> ControlFlow<()> {
        let _ = token;
        ControlFlow::Continue(())
    }
}

pub struct ParseTreeWalker<'l, L: ?Sized> {
    listener: &'l mut L,
}

impl<'l, L: ParseTreeListener + ?Sized> ParseTreeWalker<'l, L> {
    pub fn new(listener: &'l mut L) -> Self {
        ParseTreeWalker { listener }
    }

    /// Walks `tree` from its root. A tree without a root (not sealed) is
    /// walked as empty.
    pub fn walk(&mut self, tree: &ParseTree) -> ControlFlow<()> {
        match tree.root() {
            Some(root) => self.walk_from(tree, root),
            None => ControlFlow::Continue(()),
        }
    }

    pub fn walk_from(&mut self, tree: &ParseTree, id: CtxId) -> ControlFlow<()> {
        let ctx = match tree.context(id) {
            Some(ctx) => ctx,
            None => return ControlFlow::Continue(()),
        };
        self.listener.enter_rule(id, ctx)?;
        for child in ctx.children() {
            match child {
                Child::Rule(c) => self.walk_from(tree, *c)?,
                Child::Token(tok) => self.listener.visit_token(tok)?,
            }
        }
        self.listener.exit_rule(id, ctx)
    }
}

#[cfg(test)]
#[path = "tests/walk.rs"]
mod tests_for_walk;
