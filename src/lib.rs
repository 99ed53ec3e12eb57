//! A grammar interpreter whose rule contexts remember which alternative of
//! their rule was matched, numbered the way the grammar was written, even for
//! rules the interpreter rewrote to remove left recursion.

mod error;
mod display;
mod rendering;

pub mod grammar;
pub mod leftrec;
pub mod transducer;
pub mod node;
pub mod interp;
pub mod walk;

pub use error::InterpError;
pub use grammar::{AltNum, Alternative, Assoc, Element, Grammar, NonTerm, Rule, RuleIndex, Term, TokenClass};
pub use interp::{InterpOptions, Interpreter};
pub use node::{Child, CtxId, InterpreterRuleContext, OuterAlt, ParseTree, RuleNode, TokenNode};
pub use rendering::Rendered;
pub use walk::{ParseTreeListener, ParseTreeWalker};
