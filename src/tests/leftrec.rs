// This is actually defined at `crate::leftrec::tests_for_leftrec`

use crate::grammar::*;
use crate::leftrec::*;
use crate::tests::*;
use crate::InterpError;

fn alts(pairs: &[(usize, usize)]) -> Vec<(AltNum, AltNum)> {
    pairs.iter().map(|&(s, o)| (AltNum::new(s).unwrap(), AltNum::new(o).unwrap())).collect()
}

fn analyze(g: &Grammar) -> Result<Option<LeftRecursiveRule>, InterpError> {
    LeftRecursiveRule::analyze(g, RuleIndex(0))
}

#[test]
fn identity_remap() {
    let remap = AltRemap::identity(3);
    assert_eq!(remap.len(), 3);
    assert_eq!(remap.iter().collect::<Vec<_>>(), alts(&[(1, 1), (2, 2), (3, 3)]));
    assert_eq!(remap.original(AltNum::new(4).unwrap()), None);
    assert!(AltRemap::default().is_empty());
}

#[test]
fn sum_rule_split() {
    let lr = analyze(&sum_grammar()).unwrap().unwrap();
    assert_eq!(lr.rule(), RuleIndex(0));
    assert_eq!(lr.primary_alts().iter().collect::<Vec<_>>(), alts(&[(1, 1), (2, 3)]));
    assert_eq!(lr.op_alts().iter().collect::<Vec<_>>(), alts(&[(1, 2)]));

    let plus = &lr.ops()[0];
    assert_eq!(plus.kind(), LrAltKind::Binary);
    assert_eq!(plus.precedence(), 2);
    assert_eq!(plus.next_precedence(), Some(3));
    assert_eq!(plus.elements(), &[t('+'), nt("e")]);

    let parens = &lr.primary()[1];
    assert_eq!(parens.kind(), LrAltKind::Primary);
    assert_eq!(parens.original().get(), 3);
    assert_eq!(parens.precedence_at(1), 0);
}

#[test]
fn precedence_follows_alternative_order() {
    let lr = analyze(&arith_grammar()).unwrap().unwrap();
    let ops: Vec<_> = lr.ops().iter()
        .map(|a| (a.original().get(), a.precedence(), a.next_precedence()))
        .collect();
    assert_eq!(ops, vec![(1, 4, Some(5)), (2, 3, Some(4))]);
    assert_eq!(lr.primary_alts().iter().collect::<Vec<_>>(), alts(&[(1, 3), (2, 4)]));
    assert_eq!(lr.op_alts().iter().collect::<Vec<_>>(), alts(&[(1, 1), (2, 2)]));
}

#[test]
fn right_assoc_climbs_at_same_precedence() {
    let g = Grammar::new(vec![
        Rule::new("e", vec![
            alt(vec![nt("e"), t('^'), nt("e")]).right_assoc(),
            alt(vec![int()]),
        ]),
    ]);
    let lr = analyze(&g).unwrap().unwrap();
    assert_eq!(lr.ops()[0].precedence(), 2);
    assert_eq!(lr.ops()[0].next_precedence(), Some(2));
}

#[test]
fn prefix_and_suffix() {
    let g = Grammar::new(vec![
        Rule::new("e", vec![
            alt(vec![t('-'), nt("e")]),
            alt(vec![nt("e"), t('!')]),
            alt(vec![int()]),
        ]),
    ]);
    let lr = analyze(&g).unwrap().unwrap();
    let minus = &lr.primary()[0];
    assert_eq!(minus.kind(), LrAltKind::Prefix);
    assert_eq!(minus.next_precedence(), Some(3));
    assert_eq!(minus.precedence_at(1), 3);

    let bang = &lr.ops()[0];
    assert_eq!(bang.kind(), LrAltKind::Suffix);
    assert_eq!(bang.precedence(), 2);
    assert_eq!(bang.next_precedence(), None);
    assert_eq!(lr.primary_alts().iter().collect::<Vec<_>>(), alts(&[(1, 1), (2, 3)]));
    assert_eq!(lr.op_alts().iter().collect::<Vec<_>>(), alts(&[(1, 2)]));
}

#[test]
fn inner_self_reference_restarts() {
    // e ::= e '?' e ':' e | ID
    let g = Grammar::new(vec![
        Rule::new("e", vec![
            alt(vec![nt("e"), t('?'), nt("e"), t(':'), nt("e")]),
            alt(vec![id()]),
        ]),
    ]);
    let lr = analyze(&g).unwrap().unwrap();
    let ternary = &lr.ops()[0];
    assert_eq!(ternary.kind(), LrAltKind::Binary);
    assert_eq!(ternary.precedence_at(1), 0);
    assert_eq!(ternary.precedence_at(3), 3);
}

#[test]
fn not_left_recursive() {
    let g = Grammar::new(vec![
        Rule::new("s", vec![alt(vec![t('a'), nt("s")]), alt(vec![t('b')])]),
    ]);
    assert!(!is_directly_left_recursive(&g.rules[0]));
    assert_eq!(analyze(&g), Ok(None));
    assert!(is_directly_left_recursive(&sum_grammar().rules[0]));
}

#[test]
fn malformed_left_recursion() {
    let only_ops = Grammar::new(vec![
        Rule::new("e", vec![alt(vec![nt("e"), t('a')])]),
    ]);
    assert_eq!(analyze(&only_ops), Err(InterpError::NoPrimaryAlternative("e".into())));

    let bare = Grammar::new(vec![
        Rule::new("e", vec![alt(vec![nt("e")]), alt(vec![t('a')])]),
    ]);
    assert_eq!(analyze(&bare), Err(InterpError::EmptyRecursiveAlternative("e".into())));

    assert_eq!(LeftRecursiveRule::analyze(&bare, RuleIndex(3)),
               Err(InterpError::InvalidRuleIndex { index: 3, count: 1 }));
}

#[test]
fn left_corner_cycles() {
    // s ::= t 'x' | 'y';  t ::= s 'z' | u;  u ::= 'w'
    let g = Grammar::new(vec![
        Rule::new("s", vec![alt(vec![nt("t"), t('x')]), alt(vec![t('y')])]),
        Rule::new("t", vec![alt(vec![nt("s"), t('z')]), alt(vec![nt("u")])]),
        Rule::new("u", vec![alt(vec![t('w')])]),
    ]);
    let cycle = left_corner_cycle(&g, &"s".into()).unwrap();
    let names: Vec<_> = cycle.iter().map(|nt| nt.name()).collect();
    assert_eq!(names, vec!["s", "t", "s"]);
    assert_eq!(left_corner_cycle(&g, &"u".into()), None);

    // direct left recursion is not a cycle; the rewrite handles it.
    assert_eq!(left_corner_cycle(&sum_grammar(), &"e".into()), None);
}
