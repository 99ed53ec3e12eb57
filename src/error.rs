use crate::node::CtxId;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum InterpError {
    // structural: the grammar or the tree is malformed.
    #[error("undefined nonterminal `{0}`")]
    UndefinedNonTerm(String),
    #[error("more than one rule for `{0}`")]
    DuplicateRule(String),
    #[error("rule `{0}` has no alternatives")]
    EmptyRule(String),
    #[error("left-recursive rule `{0}` has no primary alternative")]
    NoPrimaryAlternative(String),
    #[error("left-recursive rule `{0}` has an alternative consisting only of itself")]
    EmptyRecursiveAlternative(String),
    #[error("rules are mutually left-recursive: {}", .0.join(" -> "))]
    MutualLeftRecursion(Vec<String>),
    #[error("invalid token pattern: {0}")]
    Pattern(#[from] regex::Error),
    #[error("rule index {index} out of range for grammar with {count} rules")]
    InvalidRuleIndex { index: usize, count: usize },
    #[error("state {state} out of range for transducer with {count} states")]
    InvalidState { state: usize, count: usize },
    #[error("no context {0} in parse tree")]
    UnknownContext(CtxId),
    #[error("context {child} is not a child of {parent}")]
    ParentMismatch { child: CtxId, parent: CtxId },
    #[error("parse tree is sealed")]
    TreeSealed,
    #[error("rule invocation depth exceeded {0}")]
    RecursionLimit(usize),

    // syntax: the input does not match.
    #[error("mismatched input at token {position}: expected {}, found {found}", .expected.join(", "))]
    Mismatch { position: usize, expected: Vec<String>, found: String },
    #[error("no viable alternative for `{rule}` at token {position}")]
    NoViableAlt { rule: String, position: usize },
    #[error("extraneous input at token {position}: {found}")]
    ExtraneousInput { position: usize, found: String },
}

impl InterpError {
    /// Syntax errors are the ones the interpreter recovers from by trying
    /// another alternative.
    pub fn is_syntax(&self) -> bool {
        matches!(self,
                 InterpError::Mismatch { .. } |
                 InterpError::NoViableAlt { .. } |
                 InterpError::ExtraneousInput { .. })
    }

    /// Token index a syntax error was raised at.
    pub fn position(&self) -> Option<usize> {
        match self {
            InterpError::Mismatch { position, .. } |
            InterpError::NoViableAlt { position, .. } |
            InterpError::ExtraneousInput { position, .. } => Some(*position),
            _ => None,
        }
    }
}
