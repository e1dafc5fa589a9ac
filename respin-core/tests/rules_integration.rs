//! Rule parsing and matching through the public API

use respin_core::domain::pos::OracleContext;
use respin_core::domain::rules::{find_matches, OrderItem, Rule, RuleRun, RuleSet};
use respin_core::language::embedded;
use respin_core::DomainError;
use std::collections::HashMap;

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn word_run_matches_noun_span() {
    let rule = Rule::parse("013NN* 0").unwrap();
    let tokens = strings(&["the", "cat", "sat"]);
    let tags = strings(&["DT", "NN", "VBD"]);
    let runs = find_matches(0, &rule, &tokens, &tags, &HashMap::new());
    assert_eq!(
        runs,
        vec![RuleRun {
            rule: 0,
            first: 1..2,
            last: 1..2,
        }]
    );
    assert_eq!(runs[0].span(), 1..2);
}

#[test]
fn replace_order_mixes_commands_and_literals() {
    let rule = Rule::parse("010!COMMA/2because/010!COMMA 1/2/,/0").unwrap();
    assert_eq!(rule.commands.len(), 3);
    assert_eq!(
        rule.order,
        vec![
            OrderItem::Command(1),
            OrderItem::Command(2),
            OrderItem::Literal(",".to_string()),
            OrderItem::Command(0),
        ]
    );
    assert_eq!(rule.to_string(), "010!COMMA/2because/010!COMMA 1/2/,/0");
}

#[test]
fn malformed_lines_are_reported_with_line_numbers() {
    let source = "# comment\n011JJ/2and/011JJ 2/1/0\n011JJ\n011JJ 5\ntense;is;was\n";
    let (set, errors) = RuleSet::parse("en", source);
    assert_eq!(set.len(), 1);
    assert!(set.word_list("tense").is_some());
    let lines: Vec<usize> = errors
        .iter()
        .map(|e| match e {
            DomainError::Parse { line, .. } => *line,
            other => panic!("unexpected error {other:?}"),
        })
        .collect();
    assert_eq!(lines, vec![3, 4]);
}

#[test]
fn embedded_rules_swap_coordinated_adjectives() {
    let english = embedded("en").unwrap();
    let mut ctx = OracleContext::new(english.oracle.as_ref());
    assert_eq!(
        english.rules.rewrite_sentence(&mut ctx, "The coat is warm and soft.", false),
        "The coat is soft and warm."
    );
    assert_eq!(
        english.rules.rewrite_paragraph(&mut ctx, "The coat is red.", false),
        "The coat is red."
    );
}
