use crate::errors::{EntsError, Result};
use crate::ops::Tree;

use super::invariants;

fn violation(invariant: &str, detail: String) -> EntsError {
    EntsError::InvariantViolation {
        invariant: invariant.to_string(),
        detail,
    }
}

/// Validate the structural invariants of a Tree
///
/// Checks, in order: edges recorded on both ends, Root parentless, no other
/// parentless Ent, acyclicity, symmetric exclusives and overlaps, at most
/// one relation kind per sibling pair, and no redundant edges.
///
/// Estranged pairs are not violations: an incomplete Tree is valid.
///
/// # Errors
///
/// Returns the first `InvariantViolation` encountered. For exhaustive
/// reporting, call the individual finders in [`invariants`] directly.
pub fn validate_tree(tree: &Tree) -> Result<()> {
    let name = |id| tree.display_name(id);

    if let Some((parent, child)) = invariants::find_unmirrored_edges(tree).first() {
        return Err(violation(
            "mirrored_edges",
            format!("edge {} -> {} is recorded on one side only", name(*parent), name(*child)),
        ));
    }

    if let Some(parent) = invariants::find_root_parents(tree).first() {
        return Err(violation(
            "root_parentless",
            format!("root has parent {}", name(*parent)),
        ));
    }

    if let Some(orphan) = invariants::find_orphans(tree).first() {
        return Err(violation(
            "single_root",
            format!("{} has no parent", name(*orphan)),
        ));
    }

    if let Some(ent) = invariants::find_cycles(tree).first() {
        return Err(violation(
            "acyclic",
            format!("{} is on a parent/child cycle", name(*ent)),
        ));
    }

    if let Some((a, b)) = invariants::find_asymmetric_exclusives(tree).first() {
        return Err(violation(
            "symmetric_exclusives",
            format!("{} is exclusive with {} but not the reverse", name(*a), name(*b)),
        ));
    }

    if let Some((a, b)) = invariants::find_asymmetric_overlaps(tree).first() {
        return Err(violation(
            "symmetric_overlaps",
            format!("{} overlaps {} but not the reverse", name(*a), name(*b)),
        ));
    }

    if let Some((a, b)) = invariants::find_contradictory_pairs(tree).first() {
        return Err(violation(
            "single_relation_kind",
            format!("{} and {} are related in more than one way", name(*a), name(*b)),
        ));
    }

    if let Some((parent, child)) = invariants::find_redundant_edges(tree).first() {
        return Err(violation(
            "transitive_reduction",
            format!(
                "edge {} -> {} is implied by a longer path",
                name(*parent),
                name(*child)
            ),
        ));
    }

    Ok(())
}
