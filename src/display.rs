use crate::grammar::{Alternative, Assoc, Element, Grammar, Rule, Term};
use crate::node::{Child, CtxId, ParseTree};
use crate::rendering::Rendered;

impl std::fmt::Display for Term {
    fn fmt(&self, w: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Term::C(c) => write!(w, "'{}'", c),
            Term::S(s) => write!(w, "'{}'", s),
            Term::Class(class) => write!(w, "{}", class.name()),
        }
    }
}

impl std::fmt::Display for Element {
    fn fmt(&self, w: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Element::Term(t) => write!(w, "{}", t),
            Element::NonTerm(nt) => write!(w, "{}", nt.name()),
        }
    }
}

impl std::fmt::Display for Alternative {
    fn fmt(&self, w: &mut std::fmt::Formatter) -> std::fmt::Result {
        if self.assoc == Assoc::Right {
            write!(w, "<assoc=right> ")?;
        }
        if self.elements.is_empty() {
            return write!(w, "''");
        }
        let mut first = true;
        for e in &self.elements {
            if !first { write!(w, " ")?; }
            write!(w, "{}", e)?;
            first = false;
        }
        Ok(())
    }
}

impl std::fmt::Display for Rule {
    fn fmt(&self, w: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(w, "{} ::= ", self.lhs.name())?;
        for (i, alt) in self.alts.iter().enumerate() {
            if i > 0 { write!(w, " | ")?; }
            write!(w, "{}", alt)?;
        }
        Ok(())
    }
}

impl std::fmt::Display for Grammar {
    fn fmt(&self, w: &mut std::fmt::Formatter) -> std::fmt::Result {
        for rule in &self.rules {
            writeln!(w, "{};", rule)?;
        }
        Ok(())
    }
}

impl ParseTree {
    /// LISP-style rendering of the tree from its root, e.g. `(e (e a) + (e b))`.
    /// Empty for a tree that has not been sealed.
    pub fn to_string_tree(&self, grammar: &Grammar) -> String {
        self.render_root(grammar, false)
    }

    /// Like `to_string_tree`, with each rule annotated by its outer
    /// alternative: `(e:2 (e:1 a) + (e:1 b))`.
    pub fn to_string_tree_with_alts(&self, grammar: &Grammar) -> String {
        self.render_root(grammar, true)
    }

    fn render_root(&self, grammar: &Grammar, alts: bool) -> String {
        let mut out = String::new();
        if let Some(root) = self.root() {
            self.render(grammar, root, alts, &mut out);
        }
        out
    }

    fn render(&self, grammar: &Grammar, id: CtxId, alts: bool, out: &mut String) {
        let ctx = match self.context(id) { Some(ctx) => ctx, None => return };
        let mut label = grammar.rule_name(ctx.rule_index()).to_string();
        if alts {
            label = format!("{}:{}", label, ctx.outer_alternative());
        }
        if ctx.children().is_empty() {
            out.push_str(&label);
            return;
        }
        out.push('(');
        out.push_str(&label);
        for child in ctx.children() {
            out.push(' ');
            match child {
                Child::Rule(c) => self.render(grammar, *c, alts, out),
                Child::Token(tok) => out.push_str(&tok.term().rendered()),
            }
        }
        out.push(')');
    }
}
