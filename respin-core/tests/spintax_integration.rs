//! Spintax resolution through the public API

use respin_core::domain::rng::new_rng;
use respin_core::domain::spintax::reorder_spin;
use respin_core::{spin_text, spin_tidy, Config, Rewriter, SpinOptions, SpinType};
use std::collections::HashSet;

#[test]
fn ordered_index_selects_modulo_alternative() {
    let alternatives = ["a", "b", "c"];
    let mut rng = new_rng(Some(1));
    for index in 0..12 {
        let out = spin_text("{a|b|c}", &SpinOptions::ordered(index), &mut rng);
        assert_eq!(out, alternatives[index % 3]);
    }
}

#[test]
fn random_mode_visits_every_alternative() {
    let mut rng = new_rng(Some(99));
    let options = SpinOptions::new(SpinType::Random);
    let seen: HashSet<String> = (0..1000)
        .map(|_| spin_text("{a|b|c}", &options, &mut rng))
        .collect();
    assert_eq!(seen.len(), 3);
}

#[test]
fn none_mode_is_identity() {
    let text = "The {quick|fast} fox {jumps|leaps}. ##{kept|as is}##";
    let mut rng = new_rng(Some(3));
    assert_eq!(spin_text(text, &SpinOptions::new(SpinType::None), &mut rng), text);
}

#[test]
fn seeded_resolution_is_reproducible() {
    let config = Config::builder().seed(21).build().unwrap();
    let rewriter = Rewriter::with_config(config).unwrap();
    let first = rewriter.create_spin("The {quick|fast} fox jumps.", false);
    assert!(first == "The quick fox jumps." || first == "The fast fox jumps.", "{first}");
    for _ in 0..5 {
        assert_eq!(rewriter.create_spin("The {quick|fast} fox jumps.", false), first);
    }
}

#[test]
fn nested_groups_resolve_fully() {
    let mut rng = new_rng(Some(5));
    let options = SpinOptions::new(SpinType::Random);
    for _ in 0..50 {
        let out = spin_text("{a {b|c}|d {e|{f|g}}} end", &options, &mut rng);
        assert!(!out.contains(['{', '|', '}']), "{out}");
        assert!(out.ends_with(" end"), "{out}");
    }
}

#[test]
fn list_values_are_joined_naturally() {
    let values = ["red", "blue", "green"];
    let mut rng = new_rng(Some(8));
    let out = reorder_spin(&values, Some(","), Some(" and "), 3, 3, &mut rng);
    for value in values {
        assert!(out.contains(value), "{out}");
    }
    let (head, tail) = out.split_once(" and ").unwrap();
    assert_eq!(head.matches(", ").count(), 1, "{out}");
    assert!(!tail.contains(','), "{out}");
}

#[test]
fn tidy_hoists_shared_words() {
    let (out, changes) = spin_tidy("I like the {big dog|big cat} a lot.");
    assert_eq!(out, "I like the big {dog|cat} a lot.");
    assert_eq!(changes, 1);
}
