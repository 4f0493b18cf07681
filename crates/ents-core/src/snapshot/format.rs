use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::errors::{EntsError, Result};
use crate::model::EntId;
use crate::ops::{connect, set_exclusive, set_overlap, Tree, ROOT_NAME};
use crate::rules::validate_tree;

/// Current snapshot format version
pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct EntRecord {
    pub id: EntId,
    pub name: String,
}

/// Serializable form of a Tree
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct TreeSnapshot {
    pub format_version: u32,
    pub name: String,
    pub ents: Vec<EntRecord>,
    pub edges: Vec<(EntId, EntId)>,
    #[serde(default)]
    pub exclusives: Vec<(EntId, EntId)>,
    #[serde(default)]
    pub overlaps: Vec<(EntId, EntId)>,
}

fn invalid(reason: impl Into<String>) -> EntsError {
    EntsError::InvalidSnapshot {
        reason: reason.into(),
    }
}

impl Tree {
    /// Capture the Tree as a snapshot
    pub fn to_snapshot(&self) -> TreeSnapshot {
        let mut snapshot = TreeSnapshot {
            format_version: FORMAT_VERSION,
            name: self.name().to_string(),
            ents: Vec::with_capacity(self.ent_count()),
            edges: Vec::new(),
            exclusives: Vec::new(),
            overlaps: Vec::new(),
        };

        for ent in self.iter() {
            snapshot.ents.push(EntRecord {
                id: ent.id(),
                name: ent.name().to_string(),
            });
            snapshot
                .edges
                .extend(ent.children().iter().map(|child| (ent.id(), *child)));
            snapshot.exclusives.extend(
                ent.exclusives()
                    .iter()
                    .filter(|other| **other > ent.id())
                    .map(|other| (ent.id(), *other)),
            );
            snapshot.overlaps.extend(
                ent.overlaps()
                    .iter()
                    .filter(|other| **other > ent.id())
                    .map(|other| (ent.id(), *other)),
            );
        }

        snapshot
    }

    /// Rebuild a Tree from a snapshot
    ///
    /// The snapshot must list Root at id 0 under its reserved name, then the
    /// other Ents with dense ids in order and unique names. Every relation
    /// endpoint must be a listed Ent. The rebuilt Tree must pass
    /// [`validate_tree`].
    ///
    /// # Errors
    ///
    /// Returns `InvalidSnapshot` describing the first problem found.
    pub fn from_snapshot(snapshot: &TreeSnapshot, config: EngineConfig) -> Result<Tree> {
        let tree = Self::from_snapshot_unvalidated(snapshot, config)?;
        validate_tree(&tree).map_err(|err| invalid(err.to_string()))?;
        Ok(tree)
    }

    /// Rebuild a Tree without checking its invariants
    ///
    /// Only the snapshot's own consistency is checked (ids, names, relation
    /// endpoints). Meant for inspection tools that report every violation
    /// rather than refusing the file; engine operations on the result may
    /// misbehave if it is cyclic.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSnapshot` describing the first problem found.
    pub fn from_snapshot_unvalidated(
        snapshot: &TreeSnapshot,
        config: EngineConfig,
    ) -> Result<Tree> {
        if snapshot.format_version != FORMAT_VERSION {
            return Err(invalid(format!(
                "unsupported format version {} (expected {})",
                snapshot.format_version, FORMAT_VERSION
            )));
        }

        let Some((root, rest)) = snapshot.ents.split_first() else {
            return Err(invalid("snapshot lists no Ents"));
        };
        if root.id != EntId::ROOT || root.name != ROOT_NAME {
            return Err(invalid(format!(
                "first Ent must be {} named '{}'",
                EntId::ROOT,
                ROOT_NAME
            )));
        }

        let mut tree = Tree::with_config(snapshot.name.clone(), config);
        let mut seen = HashSet::from([ROOT_NAME]);
        for (offset, record) in rest.iter().enumerate() {
            let expected = EntId::new(offset as u32 + 1);
            if record.id != expected {
                return Err(invalid(format!(
                    "Ent '{}' has id {}, expected {}",
                    record.name, record.id, expected
                )));
            }
            if !seen.insert(record.name.as_str()) {
                return Err(invalid(format!("duplicate name '{}'", record.name)));
            }
            tree.register(&record.name)
                .map_err(|err| invalid(err.to_string()))?;
        }

        let known = |id: EntId| tree.get(id).is_ok();
        for (parent, child) in &snapshot.edges {
            if !known(*parent) || !known(*child) {
                return Err(invalid(format!("edge {} -> {} names an unknown Ent", parent, child)));
            }
        }
        for (a, b) in snapshot.exclusives.iter().chain(&snapshot.overlaps) {
            if !known(*a) || !known(*b) {
                return Err(invalid(format!("pair ({}, {}) names an unknown Ent", a, b)));
            }
        }

        for (parent, child) in &snapshot.edges {
            connect(&mut tree, *parent, *child)?;
        }
        for (a, b) in &snapshot.exclusives {
            set_exclusive(&mut tree, *a, *b)?;
        }
        for (a, b) in &snapshot.overlaps {
            set_overlap(&mut tree, *a, *b)?;
        }

        Ok(tree)
    }
}
