//! Composite entry points: mutate, then restore completeness

use crate::errors::Result;
use crate::model::EntId;
use crate::ops::{checked_connect, Tree};

use super::oracle::Oracle;
use super::protocol::{resolve_all, ResolutionOutcome};

/// Create an Ent under `parent` (Root when `None`) and classify it against
/// its new siblings
///
/// The Ent stays in the Tree even if resolution fails afterwards.
///
/// # Errors
///
/// * `InvalidName` / `NameTaken` - If the Ent cannot be created
/// * `EntNotFound` - If `parent` is not an Ent of this Tree
/// * `ResolutionConflict` - If classification hits a contradiction
pub fn insert_ent(
    tree: &mut Tree,
    name: &str,
    parent: Option<EntId>,
    oracle: &mut dyn Oracle,
) -> Result<(EntId, ResolutionOutcome)> {
    let id = tree.add_under_parent(name, parent)?;
    let parent = parent.unwrap_or_else(|| tree.root());
    let outcome = resolve_all(tree, parent, oracle)?;
    Ok((id, outcome))
}

/// Add the edge `parent -> child` and classify `parent`'s children
///
/// # Errors
///
/// * `CycleOrRedundancyConflict` - If the edge is illegal; the Tree is unchanged
/// * `EntNotFound` - If either id is not an Ent of this Tree
/// * `ResolutionConflict` - If classification hits a contradiction
pub fn insert_edge(
    tree: &mut Tree,
    parent: EntId,
    child: EntId,
    oracle: &mut dyn Oracle,
) -> Result<ResolutionOutcome> {
    checked_connect(tree, parent, child)?;
    resolve_all(tree, parent, oracle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::EntsError;
    use crate::resolution::ScriptedOracle;

    #[test]
    fn test_insert_first_ent_needs_no_questions() {
        let mut tree = Tree::new("t");
        let mut oracle = ScriptedOracle::new();

        let (id, outcome) = insert_ent(&mut tree, "Animal", None, &mut oracle).unwrap();

        assert_eq!(outcome, ResolutionOutcome::NoPairsFound);
        assert_eq!(tree.get(id).unwrap().parents(), &[tree.root()]);
        assert!(oracle.asked().is_empty());
    }

    #[test]
    fn test_insert_second_ent_asks_about_the_pair() {
        let mut tree = Tree::new("t");
        let mut oracle = ScriptedOracle::new().exclusive(true);

        let (rock, _) = insert_ent(&mut tree, "Rock", None, &mut oracle).unwrap();
        let (plant, outcome) = insert_ent(&mut tree, "Plant", None, &mut oracle).unwrap();

        assert_eq!(outcome, ResolutionOutcome::NoPairsFound);
        assert!(tree.get(rock).unwrap().is_exclusive_with(plant));
        assert_eq!(oracle.asked(), &["exclusive Rock Plant".to_string()]);
    }

    #[test]
    fn test_insert_edge_rejects_cycle_before_resolving() {
        let mut tree = Tree::new("t");
        let a = tree.create("a").unwrap();
        let b = tree.add_under_parent("b", Some(a)).unwrap();
        let mut oracle = ScriptedOracle::new();

        let result = insert_edge(&mut tree, b, a, &mut oracle);

        assert!(matches!(
            result,
            Err(EntsError::CycleOrRedundancyConflict { .. })
        ));
        assert!(oracle.asked().is_empty());
    }
}
