use super::ent_id::EntId;

/// Ent - a named category within a Tree
///
/// An Ent stands for a set of things ("animals", "dogs", "my favourite
/// colours"). A parent contains everything its children contain. Exclusive
/// Ents are disjoint sets, overlapping Ents share some but not all members.
///
/// The four relation lists have set semantics: an id appears at most once.
/// Insertion order is preserved so that analysis over the children list is
/// reproducible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ent {
    id: EntId,
    name: String,
    parents: Vec<EntId>,
    children: Vec<EntId>,
    exclusives: Vec<EntId>,
    overlaps: Vec<EntId>,
}

impl Ent {
    pub(crate) fn new(id: EntId, name: String) -> Self {
        Self {
            id,
            name,
            parents: Vec::new(),
            children: Vec::new(),
            exclusives: Vec::new(),
            overlaps: Vec::new(),
        }
    }

    pub fn id(&self) -> EntId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Direct parents, in the order the edges were made
    pub fn parents(&self) -> &[EntId] {
        &self.parents
    }

    /// Direct children, in the order the edges were made
    pub fn children(&self) -> &[EntId] {
        &self.children
    }

    pub fn exclusives(&self) -> &[EntId] {
        &self.exclusives
    }

    pub fn overlaps(&self) -> &[EntId] {
        &self.overlaps
    }

    /// Check if this Ent has no parents (only true for Root in a valid Tree)
    pub fn is_parentless(&self) -> bool {
        self.parents.is_empty()
    }

    pub fn is_exclusive_with(&self, other: EntId) -> bool {
        self.exclusives.contains(&other)
    }

    pub fn overlaps_with(&self, other: EntId) -> bool {
        self.overlaps.contains(&other)
    }

    /// Check if an exclusive or overlap marker links this Ent to `other`
    pub fn is_classified_with(&self, other: EntId) -> bool {
        self.is_exclusive_with(other) || self.overlaps_with(other)
    }

    pub(crate) fn add_parent(&mut self, parent: EntId) {
        insert_unique(&mut self.parents, parent);
    }

    pub(crate) fn remove_parent(&mut self, parent: EntId) -> bool {
        remove_id(&mut self.parents, parent)
    }

    pub(crate) fn add_child(&mut self, child: EntId) {
        insert_unique(&mut self.children, child);
    }

    pub(crate) fn remove_child(&mut self, child: EntId) -> bool {
        remove_id(&mut self.children, child)
    }

    pub(crate) fn add_exclusive(&mut self, other: EntId) {
        insert_unique(&mut self.exclusives, other);
    }

    pub(crate) fn add_overlap(&mut self, other: EntId) {
        insert_unique(&mut self.overlaps, other);
    }
}

fn insert_unique(list: &mut Vec<EntId>, id: EntId) {
    if !list.contains(&id) {
        list.push(id);
    }
}

fn remove_id(list: &mut Vec<EntId>, id: EntId) -> bool {
    let before = list.len();
    list.retain(|existing| *existing != id);
    list.len() != before
}
