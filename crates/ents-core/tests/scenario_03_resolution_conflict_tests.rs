/// Scenario 3: Structural contradictions
///
/// When no legal ordering is left, or the only legal one is declined,
/// resolution fails with a conflict and the Tree is left as it was.
use ents_core::errors::{ConflictReason, EntsError, ExError, ExErrorKind};
use ents_core::ops::connect;
use ents_core::resolution::{
    resolve_all, OrderAnswer, ResolutionEvent, ScriptedOracle,
};
use ents_core::Tree;

#[test]
fn test_scenario_03_both_orderings_illegal() {
    // GIVEN siblings a and b wired into a cycle a -> b -> a
    let mut tree = Tree::new("t");
    let a = tree.create("a").expect("Should create");
    let b = tree.create("b").expect("Should create");
    connect(&mut tree, a, b).expect("Should connect");
    connect(&mut tree, b, a).expect("Should connect");
    let before = tree.to_snapshot();

    // WHEN resolving root's children with a not-exclusive, not-overlap oracle
    let mut oracle = ScriptedOracle::new().exclusive(false).overlap(false);
    let root = tree.root();
    let result = resolve_all(&mut tree, root, &mut oracle);

    // THEN it fails without asking about order
    match result {
        Err(EntsError::ResolutionConflict {
            a: name_a,
            b: name_b,
            reason,
            conflicts,
        }) => {
            assert_eq!(name_a, "a");
            assert_eq!(name_b, "b");
            assert_eq!(reason, ConflictReason::BothOrderingsIllegal);
            assert_eq!(conflicts, vec!["a".to_string(), "b".to_string()]);
        }
        other => panic!("Expected ResolutionConflict, got {:?}", other),
    }
    assert_eq!(oracle.asked().len(), 2);

    // AND the Tree is unchanged
    assert_eq!(tree.to_snapshot(), before);
}

#[test]
fn test_scenario_03_forced_order_declined() {
    // GIVEN siblings a and b where a already reaches b through x
    let mut tree = Tree::new("t");
    let a = tree.create("a").expect("Should create");
    let b = tree.create("b").expect("Should create");
    let x = tree.add_under_parent("x", Some(a)).expect("Should create");
    connect(&mut tree, x, b).expect("Should connect");
    let before = tree.to_snapshot();

    // WHEN the oracle refuses the only legal direction
    let mut oracle = ScriptedOracle::new()
        .exclusive(false)
        .overlap(false)
        .order(OrderAnswer::BParentOfA);
    let root = tree.root();
    let result = resolve_all(&mut tree, root, &mut oracle);

    // THEN the forced question was asked and declined
    assert_eq!(oracle.asked()[2], "order a b ForcedAParent");
    let err = result.expect_err("Should fail");
    match &err {
        EntsError::ResolutionConflict {
            reason, conflicts, ..
        } => {
            assert_eq!(*reason, ConflictReason::ForcedOrderDeclined);
            assert_eq!(
                conflicts,
                &vec!["a".to_string(), "b".to_string(), "x".to_string()]
            );
        }
        other => panic!("Expected ResolutionConflict, got {:?}", other),
    }

    // AND the conflict was reported to the oracle
    assert!(matches!(
        oracle.events().last(),
        Some(ResolutionEvent::Conflict { .. })
    ));

    // AND the Tree is unchanged
    assert_eq!(tree.to_snapshot(), before);

    // AND the error maps onto the stable code
    let ex: ExError = err.into();
    assert_eq!(ex.kind(), ExErrorKind::ResolutionConflict);
    assert_eq!(ex.code(), "ERR_RESOLUTION_CONFLICT");
}

#[test]
fn test_scenario_03_forced_order_confirmed() {
    // GIVEN the same shape as above
    let mut tree = Tree::new("t");
    let a = tree.create("a").expect("Should create");
    let b = tree.create("b").expect("Should create");
    let x = tree.add_under_parent("x", Some(a)).expect("Should create");
    connect(&mut tree, x, b).expect("Should connect");

    // WHEN the oracle confirms a contains b
    let mut oracle = ScriptedOracle::new()
        .exclusive(false)
        .overlap(false)
        .order(OrderAnswer::AParentOfB)
        .exclusive(true);
    let root = tree.root();
    resolve_all(&mut tree, root, &mut oracle).expect("Should resolve");

    // THEN b is no longer a direct child of root
    let root = tree.get(tree.root()).expect("root exists");
    assert_eq!(root.children(), &[a]);
    assert!(tree.get(b).expect("exists").parents().contains(&a));
}
