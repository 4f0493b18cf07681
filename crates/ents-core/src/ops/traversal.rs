use std::collections::{BTreeSet, HashMap, HashSet};

use crate::errors::Result;
use crate::model::{Ent, EntId};

use super::tree::Tree;

/// Which edge list a traversal follows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Follow `parents` (ancestors)
    Up,
    /// Follow `children` (descendants)
    Down,
}

impl Direction {
    fn edges(self, ent: &Ent) -> &[EntId] {
        match self {
            Direction::Up => ent.parents(),
            Direction::Down => ent.children(),
        }
    }

    fn op(self) -> &'static str {
        match self {
            Direction::Up => "ancestors",
            Direction::Down => "descendants",
        }
    }
}

/// Everything a traversal learned
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Walk {
    /// Ents reachable from the start, the start itself excluded
    pub reached: BTreeSet<EntId>,
    /// Ents met again while still on the current path (cycle evidence)
    pub cycle_hits: BTreeSet<EntId>,
    /// True if an Ent at the depth bound had edges left unexplored
    pub truncated: bool,
}

/// Depth-first walk from `start` along one edge direction
///
/// Iterative, with an explicit stack of `(ent, next edge index)` frames and
/// the set of Ents on the current path. A neighbour already on the path
/// closes a cycle: it is recorded and not followed. Ents at the Tree's
/// `max_traversal_depth` are reached but not expanded. An Ent met again by a
/// shorter path is expanded again, so everything within the bound is
/// reached whatever order the edges are visited in. Both conditions log a
/// warning and never fail the walk.
///
/// # Errors
///
/// Returns `EntNotFound` if `start` is not an Ent of this Tree.
pub fn walk(tree: &Tree, start: EntId, direction: Direction) -> Result<Walk> {
    tree.get(start)?;
    let limit = tree.config().max_traversal_depth;

    let mut result = Walk::default();
    let mut depth_of: HashMap<EntId, usize> = HashMap::new();
    let mut on_path: HashSet<EntId> = HashSet::from([start]);
    let mut stack: Vec<(EntId, usize)> = vec![(start, 0)];

    while let Some(frame) = stack.last_mut() {
        let (node, cursor) = *frame;
        let next = direction.edges(tree.get(node)?).get(cursor).copied();

        let Some(next) = next else {
            on_path.remove(&node);
            stack.pop();
            continue;
        };
        frame.1 += 1;

        if on_path.contains(&next) {
            result.cycle_hits.insert(next);
            continue;
        }
        let depth = stack.len();
        if depth_of.get(&next).is_some_and(|seen| *seen <= depth) {
            continue;
        }
        depth_of.insert(next, depth);
        if depth >= limit {
            continue;
        }
        on_path.insert(next);
        stack.push((next, 0));
    }

    for (id, depth) in &depth_of {
        result.reached.insert(*id);
        if *depth >= limit && !direction.edges(tree.get(*id)?).is_empty() {
            result.truncated = true;
        }
    }

    if !result.cycle_hits.is_empty() {
        tracing::warn!(
            component = module_path!(),
            op = direction.op(),
            ent_id = start.get(),
            ent_name = %tree.display_name(start),
            cycle_at = ?result.cycle_hits,
            "cycle in parent/child graph; revisited Ents were not followed"
        );
    }
    if result.truncated {
        tracing::warn!(
            component = module_path!(),
            op = direction.op(),
            ent_id = start.get(),
            ent_name = %tree.display_name(start),
            limit,
            "traversal depth bound reached; returning partial set"
        );
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::ops::relation_ops::connect;

    fn chain(tree: &mut Tree, names: &[&str]) -> Vec<EntId> {
        let mut ids = Vec::new();
        let mut parent = tree.root();
        for name in names {
            let id = tree.add_under_parent(name, Some(parent)).unwrap();
            ids.push(id);
            parent = id;
        }
        ids
    }

    #[test]
    fn test_walk_up_collects_all_ancestors() {
        let mut tree = Tree::new("t");
        let ids = chain(&mut tree, &["a", "b", "c"]);

        let walk = walk(&tree, ids[2], Direction::Up).unwrap();
        assert_eq!(
            walk.reached,
            BTreeSet::from([tree.root(), ids[0], ids[1]])
        );
        assert!(walk.cycle_hits.is_empty());
        assert!(!walk.truncated);
    }

    #[test]
    fn test_walk_down_visits_diamond_once() {
        let mut tree = Tree::new("t");
        let a = tree.create("a").unwrap();
        let b = tree.create("b").unwrap();
        let d = tree.add_under_parent("d", Some(a)).unwrap();
        connect(&mut tree, b, d).unwrap();

        let walk = walk(&tree, tree.root(), Direction::Down).unwrap();
        assert_eq!(walk.reached, BTreeSet::from([a, b, d]));
        assert!(walk.cycle_hits.is_empty());
    }

    #[test]
    fn test_walk_reports_cycle_without_looping() {
        let mut tree = Tree::new("t");
        let ids = chain(&mut tree, &["a", "b"]);
        // b -> a closes a cycle a -> b -> a
        connect(&mut tree, ids[1], ids[0]).unwrap();

        let walk = walk(&tree, ids[0], Direction::Down).unwrap();
        assert!(walk.cycle_hits.contains(&ids[0]));
        assert!(!walk.reached.contains(&ids[0]));
    }

    #[test]
    fn test_walk_truncates_at_depth_bound() {
        let config = EngineConfig {
            max_traversal_depth: 2,
            ..EngineConfig::default()
        };
        let mut tree = Tree::with_config("t", config);
        let ids = chain(&mut tree, &["a", "b", "c", "d"]);

        let walk = walk(&tree, tree.root(), Direction::Down).unwrap();
        assert!(walk.truncated);
        assert!(walk.reached.contains(&ids[0]));
        assert!(walk.reached.contains(&ids[1]));
        assert!(!walk.reached.contains(&ids[3]));
    }

    #[test]
    fn test_walk_expands_ent_again_via_shorter_path() {
        let config = EngineConfig {
            max_traversal_depth: 3,
            ..EngineConfig::default()
        };
        let mut tree = Tree::with_config("t", config);
        let ids = chain(&mut tree, &["a", "b", "c", "f"]);
        let e = tree.create("e").unwrap();
        // root -> e -> c puts f at depth 3
        connect(&mut tree, e, ids[2]).unwrap();

        let walk = walk(&tree, tree.root(), Direction::Down).unwrap();
        assert_eq!(
            walk.reached,
            BTreeSet::from([ids[0], ids[1], ids[2], ids[3], e])
        );
        assert!(!walk.truncated);
    }

    #[test]
    fn test_walk_leaf_at_bound_is_not_truncation() {
        let config = EngineConfig {
            max_traversal_depth: 2,
            ..EngineConfig::default()
        };
        let mut tree = Tree::with_config("t", config);
        let ids = chain(&mut tree, &["a", "b"]);

        let walk = walk(&tree, tree.root(), Direction::Down).unwrap();
        assert_eq!(walk.reached, BTreeSet::from([ids[0], ids[1]]));
        assert!(!walk.truncated);
    }
}
