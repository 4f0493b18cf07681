use std::collections::{BTreeSet, HashMap};

use ents_core::resolution::{Oracle, OrderAnswer, OrderQuestion};
use ents_core::{Ent, EntId, Tree};

/// Names of an Ent's children, in list order
#[allow(dead_code)]
pub fn child_names(tree: &Tree, name: &str) -> Vec<String> {
    names(tree, tree.get(id(tree, name)).expect("ent exists").children())
}

/// Names of an Ent's parents, in list order
#[allow(dead_code)]
pub fn parent_names(tree: &Tree, name: &str) -> Vec<String> {
    names(tree, tree.get(id(tree, name)).expect("ent exists").parents())
}

#[allow(dead_code)]
pub fn id(tree: &Tree, name: &str) -> EntId {
    tree.require(name).expect("name is registered")
}

fn names(tree: &Tree, ids: &[EntId]) -> Vec<String> {
    ids.iter().map(|id| tree.display_name(*id)).collect()
}

/// Oracle that answers from ground truth: each Ent name stands for a set of
/// elements, and every question is decided by comparing the two sets
///
/// Sets must be non-empty and pairwise distinct. Unknown names are treated
/// as declines.
#[allow(dead_code)]
#[derive(Debug, Default)]
pub struct SetOracle {
    sets: HashMap<String, BTreeSet<u8>>,
    pub questions: usize,
}

#[allow(dead_code)]
impl SetOracle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn define(&mut self, name: &str, elements: impl IntoIterator<Item = u8>) {
        self.sets
            .insert(name.to_string(), elements.into_iter().collect());
    }

    fn pair(&self, a: &Ent, b: &Ent) -> Option<(&BTreeSet<u8>, &BTreeSet<u8>)> {
        Some((self.sets.get(a.name())?, self.sets.get(b.name())?))
    }
}

impl Oracle for SetOracle {
    fn ask_exclusive(&mut self, a: &Ent, b: &Ent) -> bool {
        self.questions += 1;
        self.pair(a, b)
            .is_some_and(|(sa, sb)| sa.is_disjoint(sb))
    }

    fn ask_overlap(&mut self, a: &Ent, b: &Ent) -> bool {
        self.questions += 1;
        self.pair(a, b).is_some_and(|(sa, sb)| {
            !sa.is_disjoint(sb) && !sa.is_subset(sb) && !sb.is_subset(sa)
        })
    }

    fn ask_order(&mut self, a: &Ent, b: &Ent, _question: OrderQuestion) -> OrderAnswer {
        self.questions += 1;
        match self.pair(a, b) {
            Some((sa, sb)) if sb.is_subset(sa) => OrderAnswer::AParentOfB,
            Some((sa, sb)) if sa.is_subset(sb) => OrderAnswer::BParentOfA,
            _ => OrderAnswer::Neither,
        }
    }
}
