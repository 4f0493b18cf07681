use std::collections::BTreeSet;

use crate::errors::Result;
use crate::model::EntId;
use crate::ops::Tree;

/// Two children of the same parent with no exclusive or overlap marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EstrangedPair {
    pub a: EntId,
    pub b: EntId,
}

impl EstrangedPair {
    pub fn new(a: EntId, b: EntId) -> Self {
        Self { a, b }
    }

    /// The pair with its members in id order, for deduplication
    pub fn normalized(self) -> Self {
        if self.a <= self.b {
            self
        } else {
            Self::new(self.b, self.a)
        }
    }
}

/// Find the first estranged pair among `parent`'s direct children
///
/// Pairs are visited in children-list order, `(0,1), (0,2), .., (1,2), ..`,
/// each unordered pair once. A pair is estranged when `b` appears in
/// neither `a.exclusives` nor `a.overlaps`.
///
/// # Errors
///
/// Returns `EntNotFound` if `parent` or one of its children is not an Ent of
/// this Tree.
pub fn find_estranged_pair(tree: &Tree, parent: EntId) -> Result<Option<EstrangedPair>> {
    let children = tree.get(parent)?.children();
    if children.len() < 2 {
        return Ok(None);
    }

    for (i, a) in children.iter().enumerate() {
        let ent_a = tree.get(*a)?;
        for b in &children[i + 1..] {
            if !ent_a.is_classified_with(*b) {
                return Ok(Some(EstrangedPair::new(*a, *b)));
            }
        }
    }

    Ok(None)
}

/// Every estranged pair in the Tree, with the first parent it was found under
///
/// Each unordered pair is reported once even when the two Ents share more
/// than one parent. Parents are scanned in creation order.
pub fn find_all_estranged_pairs(tree: &Tree) -> Vec<(EntId, EstrangedPair)> {
    let mut seen = BTreeSet::new();
    let mut found = Vec::new();

    for parent in tree.iter() {
        let children = parent.children();
        for (i, a) in children.iter().enumerate() {
            let Ok(ent_a) = tree.get(*a) else {
                continue;
            };
            for b in &children[i + 1..] {
                if ent_a.is_classified_with(*b) {
                    continue;
                }
                let pair = EstrangedPair::new(*a, *b);
                let key = pair.normalized();
                if seen.insert((key.a, key.b)) {
                    found.push((parent.id(), pair));
                }
            }
        }
    }

    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::{connect, set_exclusive, set_overlap};

    #[test]
    fn test_no_pair_with_fewer_than_two_children() {
        let mut tree = Tree::new("t");
        assert_eq!(find_estranged_pair(&tree, tree.root()).unwrap(), None);

        tree.create("a").unwrap();
        assert_eq!(find_estranged_pair(&tree, tree.root()).unwrap(), None);
    }

    #[test]
    fn test_first_pair_follows_children_order() {
        let mut tree = Tree::new("t");
        let a = tree.create("a").unwrap();
        let b = tree.create("b").unwrap();
        let c = tree.create("c").unwrap();

        assert_eq!(
            find_estranged_pair(&tree, tree.root()).unwrap(),
            Some(EstrangedPair::new(a, b))
        );

        set_exclusive(&mut tree, a, b).unwrap();
        assert_eq!(
            find_estranged_pair(&tree, tree.root()).unwrap(),
            Some(EstrangedPair::new(a, c))
        );

        set_overlap(&mut tree, a, c).unwrap();
        assert_eq!(
            find_estranged_pair(&tree, tree.root()).unwrap(),
            Some(EstrangedPair::new(b, c))
        );

        set_overlap(&mut tree, c, b).unwrap();
        assert_eq!(find_estranged_pair(&tree, tree.root()).unwrap(), None);
    }

    #[test]
    fn test_find_all_reports_shared_pair_once() {
        let mut tree = Tree::new("t");
        let p = tree.create("p").unwrap();
        let q = tree.create("q").unwrap();
        set_exclusive(&mut tree, p, q).unwrap();
        let x = tree.add_under_parent("x", Some(p)).unwrap();
        let y = tree.add_under_parent("y", Some(p)).unwrap();
        connect(&mut tree, q, x).unwrap();
        connect(&mut tree, q, y).unwrap();

        let all = find_all_estranged_pairs(&tree);
        assert_eq!(all, vec![(p, EstrangedPair::new(x, y))]);
    }
}
