use std::collections::BTreeSet;
use std::time::Instant;

use crate::errors::{EntsError, Result};
use crate::model::EntId;
use crate::{log_op_end, log_op_error, log_op_start};

use super::traversal::{walk, Direction};
use super::tree::Tree;

/// A parent/child edge, `(parent, child)`
pub type Edge = (EntId, EntId);

/// All Ents reachable by following `parents` transitively
///
/// # Errors
///
/// Returns `EntNotFound` if `ent` is not an Ent of this Tree.
pub fn ancestors(tree: &Tree, ent: EntId) -> Result<BTreeSet<EntId>> {
    Ok(walk(tree, ent, Direction::Up)?.reached)
}

/// All Ents reachable by following `children` transitively
///
/// # Errors
///
/// Returns `EntNotFound` if `ent` is not an Ent of this Tree.
pub fn descendants(tree: &Tree, ent: EntId) -> Result<BTreeSet<EntId>> {
    Ok(walk(tree, ent, Direction::Down)?.reached)
}

/// Children of any of `ent`'s parents, `ent` itself excluded
///
/// # Errors
///
/// Returns `EntNotFound` if `ent` is not an Ent of this Tree.
pub fn siblings(tree: &Tree, ent: EntId) -> Result<BTreeSet<EntId>> {
    let mut result = BTreeSet::new();
    for parent in tree.get(ent)?.parents() {
        result.extend(tree.get(*parent)?.children().iter().copied());
    }
    result.remove(&ent);
    Ok(result)
}

/// Ents that forbid making `parent` a parent of `child`
///
/// The intersection of `ancestors(parent) ∪ {parent}` with
/// `descendants(child) ∪ {child}`. Empty means the edge is legal. The
/// smaller set is inserted into the larger one and collisions collected.
///
/// # Errors
///
/// * `EntNotFound` - If either id is not an Ent of this Tree
/// * `TraversalTruncated` - If either walk hit the depth bound; an empty
///   answer could not be trusted
pub fn parental_conflicts(tree: &Tree, parent: EntId, child: EntId) -> Result<BTreeSet<EntId>> {
    let mut upper = complete_walk(tree, parent, Direction::Up)?;
    upper.insert(parent);
    let mut lower = complete_walk(tree, child, Direction::Down)?;
    lower.insert(child);

    let (smaller, mut larger) = if upper.len() <= lower.len() {
        (upper, lower)
    } else {
        (lower, upper)
    };

    let mut conflicts = BTreeSet::new();
    for ent in smaller {
        if !larger.insert(ent) {
            conflicts.insert(ent);
        }
    }
    Ok(conflicts)
}

fn complete_walk(tree: &Tree, start: EntId, direction: Direction) -> Result<BTreeSet<EntId>> {
    let result = walk(tree, start, direction)?;
    if result.truncated {
        return Err(EntsError::TraversalTruncated {
            ent: tree.display_name(start),
            limit: tree.config().max_traversal_depth,
        });
    }
    Ok(result.reached)
}

/// Make `parent` a parent of `child` without any legality check
///
/// Idempotent: an existing edge is left as is.
///
/// # Errors
///
/// Returns `EntNotFound` if either id is not an Ent of this Tree. Nothing is
/// mutated in that case.
pub fn connect(tree: &mut Tree, parent: EntId, child: EntId) -> Result<()> {
    tree.get(parent)?;
    tree.get(child)?;

    tree.get_mut(parent)?.add_child(child);
    tree.get_mut(child)?.add_parent(parent);

    tracing::debug!(
        parent = %tree.display_name(parent),
        child = %tree.display_name(child),
        "connected"
    );
    Ok(())
}

/// Remove the edge `parent -> child` in both directions
///
/// A missing edge is a no-op.
///
/// # Errors
///
/// Returns `EntNotFound` if either id is not an Ent of this Tree.
pub fn disconnect(tree: &mut Tree, parent: EntId, child: EntId) -> Result<()> {
    tree.get(parent)?;
    tree.get(child)?;

    let removed_child = tree.get_mut(parent)?.remove_child(child);
    let removed_parent = tree.get_mut(child)?.remove_parent(parent);

    if removed_child || removed_parent {
        tracing::debug!(
            parent = %tree.display_name(parent),
            child = %tree.display_name(child),
            "disconnected"
        );
    }
    Ok(())
}

/// Make `parent` a parent of `child`, removing edges the new one implies
///
/// With `A = ancestors(parent) ∪ {parent}` and
/// `D = descendants(child) ∪ {child}`, every existing edge `a -> d` with
/// `a ∈ A` and `d ∈ D` becomes reachable through the new edge and is
/// removed. This covers the other parents of `child` that lie in `A` and the
/// children of `parent` that lie in `D`, and keeps the graph a transitive
/// reduction.
///
/// The edge is not checked for legality: callers validate the direction
/// with [`parental_conflicts`] first, or use [`checked_connect`].
///
/// Returns the pruned edges in the order they were removed.
///
/// # Errors
///
/// Returns `EntNotFound` if either id is not an Ent of this Tree.
pub fn connect_and_prune(tree: &mut Tree, parent: EntId, child: EntId) -> Result<Vec<Edge>> {
    let start = Instant::now();
    log_op_start!(
        "connect_and_prune",
        parent = %tree.display_name(parent),
        child = %tree.display_name(child)
    );

    match connect_and_prune_inner(tree, parent, child) {
        Ok(redundant) => {
            log_op_end!(
                "connect_and_prune",
                duration_ms = start.elapsed().as_millis() as u64,
                pruned = redundant.len()
            );
            Ok(redundant)
        }
        Err(err) => {
            log_op_error!(
                "connect_and_prune",
                err.clone(),
                duration_ms = start.elapsed().as_millis() as u64,
                parent = %tree.display_name(parent),
                child = %tree.display_name(child)
            );
            Err(err)
        }
    }
}

fn connect_and_prune_inner(tree: &mut Tree, parent: EntId, child: EntId) -> Result<Vec<Edge>> {
    tree.get(parent)?;
    tree.get(child)?;

    let mut above = ancestors(tree, parent)?;
    above.insert(parent);
    let mut below = vec![child];
    below.extend(descendants(tree, child)?);

    let mut redundant = Vec::new();
    for lower in below {
        for upper in tree.get(lower)?.parents() {
            if above.contains(upper) && (*upper, lower) != (parent, child) {
                redundant.push((*upper, lower));
            }
        }
    }

    for (upper, lower) in &redundant {
        disconnect(tree, *upper, *lower)?;
    }
    connect(tree, parent, child)?;
    Ok(redundant)
}

/// Legality-checked edge insertion
///
/// Runs [`parental_conflicts`] and refuses the edge if it is non-empty. An
/// edge already implied by a path from `parent` to `child` is not added,
/// since it would be redundant. Otherwise behaves as [`connect_and_prune`].
///
/// # Errors
///
/// * `EntNotFound` - If either id is not an Ent of this Tree
/// * `CycleOrRedundancyConflict` - If the edge would create a cycle or
///   contradiction; carries the names of the conflicting Ents
/// * `TraversalTruncated` - If the hierarchy is too deep to check
pub fn checked_connect(tree: &mut Tree, parent: EntId, child: EntId) -> Result<Vec<Edge>> {
    let conflicts = parental_conflicts(tree, parent, child)?;
    if !conflicts.is_empty() {
        return Err(EntsError::CycleOrRedundancyConflict {
            parent: tree.display_name(parent),
            child: tree.display_name(child),
            conflicts: names_of(tree, &conflicts),
        });
    }
    if descendants(tree, parent)?.contains(&child) {
        tracing::debug!(
            parent = %tree.display_name(parent),
            child = %tree.display_name(child),
            "edge already implied; nothing to add"
        );
        return Ok(Vec::new());
    }
    connect_and_prune(tree, parent, child)
}

/// Record that `a` and `b` are disjoint sets
///
/// Symmetric. No check against an existing overlap or ancestry.
///
/// # Errors
///
/// Returns `EntNotFound` if either id is not an Ent of this Tree.
pub fn set_exclusive(tree: &mut Tree, a: EntId, b: EntId) -> Result<()> {
    tree.get(a)?;
    tree.get(b)?;
    tree.get_mut(a)?.add_exclusive(b);
    tree.get_mut(b)?.add_exclusive(a);
    Ok(())
}

/// Record that `a` and `b` partially intersect
///
/// Symmetric. No check against an existing exclusive or ancestry.
///
/// # Errors
///
/// Returns `EntNotFound` if either id is not an Ent of this Tree.
pub fn set_overlap(tree: &mut Tree, a: EntId, b: EntId) -> Result<()> {
    tree.get(a)?;
    tree.get(b)?;
    tree.get_mut(a)?.add_overlap(b);
    tree.get_mut(b)?.add_overlap(a);
    Ok(())
}

/// Check if either Ent is an ancestor of the other
///
/// # Errors
///
/// Returns `EntNotFound` if either id is not an Ent of this Tree.
pub fn are_ordered(tree: &Tree, a: EntId, b: EntId) -> Result<bool> {
    Ok(ancestors(tree, a)?.contains(&b) || ancestors(tree, b)?.contains(&a))
}

/// Names of a set of Ents, in id order
pub fn names_of(tree: &Tree, ids: &BTreeSet<EntId>) -> Vec<String> {
    ids.iter().map(|id| tree.display_name(*id)).collect()
}
