// This is actually defined at `crate::walk::tests_for_walk`

use crate::node::{CtxId, InterpreterRuleContext, TokenNode};
use crate::rendering::Rendered;
use crate::tests::*;
use crate::walk::*;
use crate::Interpreter;

use expect_test::expect;

use std::ops::ControlFlow;

#[derive(Default)]
struct Recorder {
    events: Vec<String>,
    stop_at_token: Option<usize>,
}

impl ParseTreeListener for Recorder {
    fn enter_rule(&mut self, id: CtxId, ctx: &InterpreterRuleContext) -> ControlFlow<()> {
        self.events.push(format!("enter {} alt {}", id, ctx.outer_alternative()));
        ControlFlow::Continue(())
    }

    fn exit_rule(&mut self, id: CtxId, _ctx: &InterpreterRuleContext) -> ControlFlow<()> {
        self.events.push(format!("exit {}", id));
        ControlFlow::Continue(())
    }

    fn visit_token(&mut self, token: &TokenNode) -> ControlFlow<()> {
        self.events.push(format!("token {}", token.term().rendered()));
        if self.stop_at_token == Some(token.index()) {
            return ControlFlow::Break(());
        }
        ControlFlow::Continue(())
    }
}

#[test]
fn depth_first_with_outer_alternatives() {
    let g = sum_grammar();
    let tree = Interpreter::new(&g).unwrap().parse(&"e".into(), &input("a+b")).unwrap();
    let mut recorder = Recorder::default();
    assert_eq!(ParseTreeWalker::new(&mut recorder).walk(&tree), ControlFlow::Continue(()));
    expect![[r#"
        enter 1 alt 2
        enter 0 alt 1
        token a
        exit 0
        token +
        enter 2 alt 1
        token b
        exit 2
        exit 1
    "#]].assert_eq(&(recorder.events.join("\n") + "\n"));
}

#[test]
fn break_stops_the_walk() {
    let g = sum_grammar();
    let tree = Interpreter::new(&g).unwrap().parse(&"e".into(), &input("a+b")).unwrap();
    let mut recorder = Recorder { stop_at_token: Some(1), ..Recorder::default() };
    assert_eq!(ParseTreeWalker::new(&mut recorder).walk(&tree), ControlFlow::Break(()));
    assert_eq!(recorder.events.last().map(String::as_str), Some("token +"));
    assert_eq!(recorder.events.len(), 5);
}

#[test]
fn unsealed_tree_walks_as_empty() {
    let tree = crate::node::ParseTree::new(1, 1);
    let mut recorder = Recorder::default();
    assert_eq!(ParseTreeWalker::new(&mut recorder).walk(&tree), ControlFlow::Continue(()));
    assert!(recorder.events.is_empty());
}
