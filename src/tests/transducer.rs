// This is actually defined at `crate::transducer::tests_for_transducer`

use crate::grammar::*;
use crate::transducer::*;
use crate::tests::*;
use crate::InterpError;

use expect_test::expect;

fn dump(t: &Transducer) -> String {
    let mut out = String::new();
    for i in 0..t.state_count() {
        let data = t.data(State(i));
        let kind = match data.kind() {
            StateKind::Match(term) => format!("match {}", term),
            StateKind::Call { rule, precedence } => format!("call {} p{}", rule, precedence),
            other => format!("{:?}", other),
        };
        out.push_str(&format!("{} {} {}\n", i, data.label(), kind));
    }
    out
}

#[test]
fn left_recursive_layout() {
    let t = Transducer::build(&sum_grammar()).unwrap();
    expect![[r#"
        0 e:start RuleStart
        1 e:block BlockStart
        2 e:1.1 match ID
        3 e:3.1 match '('
        4 e:3.2 call 0 p0
        5 e:3.3 match ')'
        6 e:loop StarLoopEntry
        7 e:ops StarBlockStart
        8 e:2.prec Precedence(2)
        9 e:2.1 match '+'
        10 e:2.2 call 0 p3
        11 e:stop RuleStop
    "#]].assert_eq(&dump(&t));
    assert_eq!(t.rule_start(RuleIndex(0)), Some(State(0)));
    assert_eq!(t.rule_stop(RuleIndex(0)), Some(State(11)));
    assert_eq!(t.rule_start(RuleIndex(1)), None);
    assert!(t.left_recursive_rule(RuleIndex(0)).is_some());
}

#[test]
fn outer_decisions() {
    let t = Transducer::build(&sum_grammar()).unwrap();
    let mut decisions: Vec<_> = t.outer_decisions().collect();
    decisions.sort();
    assert_eq!(decisions, vec![State(1), State(7)]);

    let primary = t.outer_alts(State(1)).unwrap();
    assert_eq!(primary.original(AltNum::new(2).unwrap()), AltNum::new(3));
    let ops = t.outer_alts(State(7)).unwrap();
    assert_eq!(ops.original(AltNum::FIRST), AltNum::new(2));
    assert_eq!(t.outer_alts(State(6)), None);
}

#[test]
fn plain_rules_use_identity() {
    // s ::= ID '=' e ';' | e ';'
    let mut g = sum_grammar();
    g.rules.insert(0, Rule::new("s", vec![
        alt(vec![id(), t('='), nt("e"), t(';')]),
        alt(vec![nt("e"), t(';')]),
    ]));
    let t = Transducer::build(&g).unwrap();
    expect![[r#"
        0 s:start RuleStart
        1 s:block BlockStart
        2 s:1.1 match ID
        3 s:1.2 match '='
        4 s:1.3 call 1 p0
        5 s:1.4 match ';'
        6 s:2.1 call 1 p0
        7 s:2.2 match ';'
        8 s:stop RuleStop
        9 e:start RuleStart
        10 e:block BlockStart
        11 e:1.1 match ID
        12 e:3.1 match '('
        13 e:3.2 call 1 p0
        14 e:3.3 match ')'
        15 e:loop StarLoopEntry
        16 e:ops StarBlockStart
        17 e:2.prec Precedence(2)
        18 e:2.1 match '+'
        19 e:2.2 call 1 p3
        20 e:stop RuleStop
    "#]].assert_eq(&dump(&t));
    let s = t.outer_alts(State(1)).unwrap();
    assert_eq!(s, &crate::leftrec::AltRemap::identity(2));
    assert!(t.left_recursive_rule(RuleIndex(0)).is_none());
    assert_eq!(t.data(State(13)).rule(), RuleIndex(1));
}

#[test]
fn rejected_grammars() {
    let undefined = Grammar::new(vec![Rule::new("s", vec![alt(vec![nt("x")])])]);
    assert_eq!(Transducer::build(&undefined).err(), Some(InterpError::UndefinedNonTerm("x".into())));

    let duplicate = Grammar::new(vec![
        Rule::new("s", vec![alt(vec![t('a')])]),
        Rule::new("s", vec![alt(vec![t('b')])]),
    ]);
    assert_eq!(Transducer::build(&duplicate).err(), Some(InterpError::DuplicateRule("s".into())));

    let empty = Grammar::new(vec![Rule::new("s", vec![])]);
    assert_eq!(Transducer::build(&empty).err(), Some(InterpError::EmptyRule("s".into())));

    let mutual = Grammar::new(vec![
        Rule::new("s", vec![alt(vec![nt("t"), t('x')]), alt(vec![t('y')])]),
        Rule::new("t", vec![alt(vec![nt("s"), t('z')])]),
    ]);
    let err = Transducer::build(&mutual).err().unwrap();
    assert_eq!(err.to_string(), "rules are mutually left-recursive: s -> t -> s");

    let no_primary = Grammar::new(vec![Rule::new("e", vec![alt(vec![nt("e"), t('!')])])]);
    assert_eq!(Transducer::build(&no_primary).err(), Some(InterpError::NoPrimaryAlternative("e".into())));
}
