/// Scenario 2: Declined classification
///
/// An oracle that will not relate a pair leaves it estranged and the Tree
/// valid, if incomplete.
mod common;

use common::child_names;
use ents_core::analysis::{find_estranged_pair, EstrangedPair};
use ents_core::resolution::{
    resolve_all, OrderAnswer, ResolutionEvent, ResolutionOutcome, ScriptedOracle,
};
use ents_core::rules::validate_tree;
use ents_core::Tree;

#[test]
fn test_scenario_02_all_decline_leaves_tree_unchanged() {
    // GIVEN two unrelated Ents under root
    let mut tree = Tree::new("t");
    let rock = tree.create("Rock").expect("Should create");
    let plant = tree.create("Plant").expect("Should create");
    let before = tree.to_snapshot();

    // WHEN the oracle declines every question
    let mut oracle = ScriptedOracle::new();
    let root = tree.root();
    let outcome = resolve_all(&mut tree, root, &mut oracle).expect("Should not fail");

    // THEN the pair is reported unresolved
    assert_eq!(outcome, ResolutionOutcome::PairUnresolved);
    assert_eq!(oracle.asked().len(), 3);
    assert_eq!(
        oracle.events().last(),
        Some(&ResolutionEvent::LeftUnresolved {
            a: "Rock".to_string(),
            b: "Plant".to_string(),
        })
    );

    // AND nothing changed
    assert_eq!(tree.to_snapshot(), before);

    // AND the pair is still estranged, in a valid Tree
    assert_eq!(
        find_estranged_pair(&tree, tree.root()).expect("root exists"),
        Some(EstrangedPair::new(rock, plant))
    );
    assert!(validate_tree(&tree).is_ok());
}

#[test]
fn test_scenario_02_nested_decline_does_not_stop_outer_loop() {
    // GIVEN root -> {A, B, C} and A -> X
    let mut tree = Tree::new("t");
    let a = tree.create("A").expect("Should create");
    tree.create("B").expect("Should create");
    let c = tree.create("C").expect("Should create");
    tree.add_under_parent("X", Some(a)).expect("Should create");

    // WHEN A contains B, the X/B pair under A is declined, and A/C are exclusive
    let mut oracle = ScriptedOracle::new()
        .exclusive(false)
        .overlap(false)
        .order(OrderAnswer::AParentOfB)
        .order(OrderAnswer::Neither)
        .exclusive(true);
    let root = tree.root();
    let outcome = resolve_all(&mut tree, root, &mut oracle).expect("Should not fail");

    // THEN the outer loop still classified A/C
    assert_eq!(oracle.remaining(), 0);
    assert!(tree.get(a).expect("exists").is_exclusive_with(c));
    assert_eq!(child_names(&tree, "root"), vec!["A", "C"]);

    // AND the overall result reports the pair left behind under A
    assert_eq!(outcome, ResolutionOutcome::PairUnresolved);
    assert_eq!(child_names(&tree, "A"), vec!["X", "B"]);
    assert!(find_estranged_pair(&tree, a).expect("A exists").is_some());
    assert!(validate_tree(&tree).is_ok());
}

#[test]
fn test_scenario_02_declined_order_after_no_answers() {
    // GIVEN two Ents under root
    let mut tree = Tree::new("t");
    tree.create("Sea").expect("Should create");
    tree.create("Lake").expect("Should create");

    // WHEN the oracle answers no twice and then declines to order them
    let mut oracle = ScriptedOracle::new()
        .exclusive(false)
        .overlap(false)
        .order(OrderAnswer::Neither);
    let root = tree.root();
    let outcome = resolve_all(&mut tree, root, &mut oracle).expect("Should not fail");

    // THEN the pair stays unresolved and no edge was added
    assert_eq!(outcome, ResolutionOutcome::PairUnresolved);
    assert_eq!(child_names(&tree, "root"), vec!["Sea", "Lake"]);
}
