use std::collections::BTreeSet;

use crate::model::EntId;
use crate::ops::traversal::{walk, Direction};
use crate::ops::{ancestors, Edge, Tree};

/// Find Ents that lie on a parent/child cycle
///
/// An Ent is on a cycle when a descending walk from it comes back to it.
pub fn find_cycles(tree: &Tree) -> Vec<EntId> {
    tree.iter()
        .map(|ent| ent.id())
        .filter(|id| {
            walk(tree, *id, Direction::Down)
                .map(|w| w.cycle_hits.contains(id))
                .unwrap_or(false)
        })
        .collect()
}

/// Find edges recorded on one side only
///
/// Returns `(parent, child)` where `parent` lists `child` but not the
/// reverse, or the other way round.
pub fn find_unmirrored_edges(tree: &Tree) -> Vec<Edge> {
    let mut result = BTreeSet::new();

    for ent in tree.iter() {
        for child in ent.children() {
            let mirrored = tree
                .get(*child)
                .map(|c| c.parents().contains(&ent.id()))
                .unwrap_or(false);
            if !mirrored {
                result.insert((ent.id(), *child));
            }
        }
        for parent in ent.parents() {
            let mirrored = tree
                .get(*parent)
                .map(|p| p.children().contains(&ent.id()))
                .unwrap_or(false);
            if !mirrored {
                result.insert((*parent, ent.id()));
            }
        }
    }

    result.into_iter().collect()
}

/// Find `(a, b)` where `a` lists `b` as exclusive but `b` does not list `a`
pub fn find_asymmetric_exclusives(tree: &Tree) -> Vec<(EntId, EntId)> {
    let mut result = Vec::new();
    for ent in tree.iter() {
        for other in ent.exclusives() {
            let mirrored = tree
                .get(*other)
                .map(|o| o.is_exclusive_with(ent.id()))
                .unwrap_or(false);
            if !mirrored {
                result.push((ent.id(), *other));
            }
        }
    }
    result
}

/// Find `(a, b)` where `a` lists `b` as overlapping but `b` does not list `a`
pub fn find_asymmetric_overlaps(tree: &Tree) -> Vec<(EntId, EntId)> {
    let mut result = Vec::new();
    for ent in tree.iter() {
        for other in ent.overlaps() {
            let mirrored = tree
                .get(*other)
                .map(|o| o.overlaps_with(ent.id()))
                .unwrap_or(false);
            if !mirrored {
                result.push((ent.id(), *other));
            }
        }
    }
    result
}

/// Find edges implied by a longer path
///
/// `parent -> child` is redundant when another parent of `child` descends
/// from `parent`.
pub fn find_redundant_edges(tree: &Tree) -> Vec<Edge> {
    let mut result = Vec::new();

    for child in tree.iter() {
        for parent in child.parents() {
            let implied = child
                .parents()
                .iter()
                .filter(|other| *other != parent)
                .any(|other| {
                    ancestors(tree, *other)
                        .map(|anc| anc.contains(parent))
                        .unwrap_or(false)
                });
            if implied {
                result.push((*parent, child.id()));
            }
        }
    }

    result
}

/// Find the parents of Root, which must have none
pub fn find_root_parents(tree: &Tree) -> Vec<EntId> {
    tree.get(tree.root())
        .map(|root| root.parents().to_vec())
        .unwrap_or_default()
}

/// Find non-Root Ents with no parent
pub fn find_orphans(tree: &Tree) -> Vec<EntId> {
    tree.iter()
        .filter(|ent| ent.id() != tree.root() && ent.is_parentless())
        .map(|ent| ent.id())
        .collect()
}

/// Find sibling pairs related by more than one kind
///
/// The kinds are exclusive, overlap and ancestry. Pairs are reported once,
/// smaller id first.
pub fn find_contradictory_pairs(tree: &Tree) -> Vec<(EntId, EntId)> {
    let mut result = BTreeSet::new();

    for parent in tree.iter() {
        let children = parent.children();
        for (i, a) in children.iter().enumerate() {
            for b in &children[i + 1..] {
                let Ok(ent_a) = tree.get(*a) else { continue };
                let ordered = ancestors(tree, *a)
                    .map(|anc| anc.contains(b))
                    .unwrap_or(false)
                    || ancestors(tree, *b)
                        .map(|anc| anc.contains(a))
                        .unwrap_or(false);

                let kinds = [ent_a.is_exclusive_with(*b), ent_a.overlaps_with(*b), ordered]
                    .iter()
                    .filter(|held| **held)
                    .count();
                if kinds > 1 {
                    result.insert(((*a).min(*b), (*a).max(*b)));
                }
            }
        }
    }

    result.into_iter().collect()
}
