use crate::grammar::RuleIndex;
use crate::node::{Child, CtxId, InterpreterRuleContext};
use crate::transducer::{State, Transducer};
use crate::InterpError;

/// Arena holding the rule contexts of one parse. Contexts refer to their
/// parent by `CtxId`; nothing is reference-counted.
///
/// The tree is open for construction until `seal` is called. After that it
/// only hands out shared references.
#[derive(Clone, Debug)]
pub struct ParseTree {
    contexts: Vec<InterpreterRuleContext>,
    root: Option<CtxId>,
    rule_count: usize,
    state_count: usize,
    sealed: bool,
}

impl ParseTree {
    /// A tree whose contexts may name rules below `rule_count` and invoking
    /// states below `state_count`.
    pub fn new(rule_count: usize, state_count: usize) -> Self {
        ParseTree { contexts: vec![], root: None, rule_count, state_count, sealed: false }
    }

    pub fn for_transducer(transducer: &Transducer) -> Self {
        Self::new(transducer.rule_count(), transducer.state_count())
    }

    pub fn push_context(&mut self,
                        parent: Option<CtxId>,
                        invoking_state: Option<State>,
                        rule_index: RuleIndex) -> Result<CtxId, InterpError> {
        if self.sealed {
            return Err(InterpError::TreeSealed);
        }
        if rule_index.index() >= self.rule_count {
            return Err(InterpError::InvalidRuleIndex { index: rule_index.index(), count: self.rule_count });
        }
        self.check_state(invoking_state)?;
        if let Some(p) = parent {
            self.check_context(p)?;
        }
        let id = CtxId(self.contexts.len());
        self.contexts.push(InterpreterRuleContext::new(parent, invoking_state, rule_index));
        Ok(id)
    }

    /// Pushes the context for the next step of a precedence climb: the new
    /// context takes over `previous`'s place in the tree (parent, invoking
    /// state, start) and adopts `previous` as its first child, which is now
    /// invoked from `invoking_state`. If the parent already lists `previous`
    /// among its children, that entry now names the new context.
    pub fn push_recursion_context(&mut self, previous: CtxId, invoking_state: State) -> Result<CtxId, InterpError> {
        self.check_state(Some(invoking_state))?;
        let (parent, outer_invoking, rule_index, start) = {
            let prev = self.context(previous).ok_or(InterpError::UnknownContext(previous))?;
            (prev.parent, prev.invoking_state, prev.rule_index, prev.start)
        };
        let id = self.push_context(parent, outer_invoking, rule_index)?;
        {
            let node = self.contexts[id.0].node_mut();
            node.start = start;
            node.children.push(Child::Rule(previous));
        }
        if let Some(p) = parent {
            self.replace_child(p, previous, id);
        }
        let prev = self.contexts[previous.0].node_mut();
        prev.parent = Some(id);
        prev.invoking_state = Some(invoking_state);
        Ok(id)
    }

    /// Undoes `push_recursion_context`: `previous` gets its old place back.
    /// Returns `previous`; `next` stays in the arena until truncated.
    pub(crate) fn unwind_recursion_context(&mut self, next: CtxId) -> Result<CtxId, InterpError> {
        if self.sealed {
            return Err(InterpError::TreeSealed);
        }
        let (previous, parent, invoking_state) = {
            let ctx = self.context(next).ok_or(InterpError::UnknownContext(next))?;
            match ctx.children.first() {
                Some(Child::Rule(previous)) => (*previous, ctx.parent, ctx.invoking_state),
                _ => return Err(InterpError::UnknownContext(next)),
            }
        };
        if let Some(p) = parent {
            self.replace_child(p, next, previous);
        }
        let prev = self.contexts[previous.0].node_mut();
        prev.parent = parent;
        prev.invoking_state = invoking_state;
        Ok(previous)
    }

    /// Appends `child` to `parent`. A rule child must already name `parent`
    /// as its parent; adding one that is already listed does nothing.
    pub fn add_child(&mut self, parent: CtxId, child: Child) -> Result<(), InterpError> {
        if self.sealed {
            return Err(InterpError::TreeSealed);
        }
        if let Child::Rule(c) = &child {
            let linked = self.context(*c).ok_or(InterpError::UnknownContext(*c))?.parent;
            if linked != Some(parent) {
                return Err(InterpError::ParentMismatch { child: *c, parent });
            }
            if self.children(parent).contains(&child) {
                return Ok(());
            }
        }
        self.context_mut(parent)?.node_mut().children.push(child);
        Ok(())
    }

    fn replace_child(&mut self, parent: CtxId, old: CtxId, new: CtxId) {
        if let Some(ctx) = self.contexts.get_mut(parent.0) {
            for child in ctx.node_mut().children.iter_mut() {
                if *child == Child::Rule(old) {
                    *child = Child::Rule(new);
                }
            }
        }
    }

    pub(crate) fn set_span(&mut self, id: CtxId, start: Option<usize>, stop: usize) -> Result<(), InterpError> {
        let node = self.context_mut(id)?.node_mut();
        if let Some(start) = start {
            node.start = start;
        }
        node.stop = stop;
        Ok(())
    }

    /// Rolls construction back to a earlier point: contexts from `len` on are
    /// dropped and `ctx` keeps only its first `children` children.
    pub(crate) fn truncate(&mut self, len: usize, ctx: CtxId, children: usize) {
        self.contexts.truncate(len);
        if let Some(c) = self.contexts.get_mut(ctx.0) {
            c.node_mut().children.truncate(children);
        }
    }

    /// Finishes construction with `root` as the root context.
    pub fn seal(&mut self, root: CtxId) -> Result<(), InterpError> {
        let ctx = self.context(root).ok_or(InterpError::UnknownContext(root))?;
        if let Some(parent) = ctx.parent {
            return Err(InterpError::ParentMismatch { child: root, parent });
        }
        self.root = Some(root);
        self.sealed = true;
        Ok(())
    }

    pub fn is_sealed(&self) -> bool { self.sealed }

    pub fn root(&self) -> Option<CtxId> { self.root }

    pub fn len(&self) -> usize { self.contexts.len() }
    pub fn is_empty(&self) -> bool { self.contexts.is_empty() }

    pub fn context(&self, id: CtxId) -> Option<&InterpreterRuleContext> {
        self.contexts.get(id.0)
    }

    pub fn context_mut(&mut self, id: CtxId) -> Result<&mut InterpreterRuleContext, InterpError> {
        if self.sealed {
            return Err(InterpError::TreeSealed);
        }
        self.contexts.get_mut(id.0).ok_or(InterpError::UnknownContext(id))
    }

    pub fn parent(&self, id: CtxId) -> Option<CtxId> {
        self.context(id).and_then(|c| c.parent)
    }

    pub fn children(&self, id: CtxId) -> &[Child] {
        self.context(id).map_or(&[], |c| c.children())
    }

    /// `id`'s parent, grandparent, and so on up to the root.
    pub fn ancestors(&self, id: CtxId) -> Ancestors<'_> {
        Ancestors { tree: self, next: self.parent(id) }
    }

    fn check_context(&self, id: CtxId) -> Result<(), InterpError> {
        self.context(id).map(|_| ()).ok_or(InterpError::UnknownContext(id))
    }

    fn check_state(&self, state: Option<State>) -> Result<(), InterpError> {
        match state {
            Some(s) if s.number() >= self.state_count =>
                Err(InterpError::InvalidState { state: s.number(), count: self.state_count }),
            _ => Ok(()),
        }
    }
}

pub struct Ancestors<'t> {
    tree: &'t ParseTree,
    next: Option<CtxId>,
}

impl<'t> Iterator for Ancestors<'t> {
    type Item = CtxId;
    fn next(&mut self) -> Option<CtxId> {
        let id = self.next?;
        self.next = self.tree.parent(id);
        Some(id)
    }
}

#[cfg(test)]
#[path = "../tests/tree.rs"]
mod tests_for_tree;
