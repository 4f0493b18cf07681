use std::collections::HashMap;
use std::time::Instant;

use crate::config::EngineConfig;
use crate::errors::{EntsError, Result};
use crate::model::{Ent, EntId};
use crate::{log_op_end, log_op_error, log_op_start};

use super::relation_ops;

/// Name given to the Root Ent of every Tree
pub const ROOT_NAME: &str = "root";

/// Tree - owner of every Ent in one hierarchy
///
/// Ents live in an arena indexed by [`EntId`] and are looked up by name
/// through a side map. The Root is created with the Tree and stands for
/// "everything". Ents are never removed individually; they go away with
/// the Tree.
///
/// Not thread-safe for shared mutation. Embedders that need concurrent
/// access wrap the Tree in their own lock.
#[derive(Debug, Clone)]
pub struct Tree {
    name: String,
    ents: Vec<Ent>,
    names: HashMap<String, EntId>,
    config: EngineConfig,
}

impl Tree {
    /// Create a new Tree with a Root and the default configuration
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_config(name, EngineConfig::default())
    }

    /// Create a new Tree with a Root and the given configuration
    pub fn with_config(name: impl Into<String>, config: EngineConfig) -> Self {
        let root = Ent::new(EntId::ROOT, ROOT_NAME.to_string());
        let mut names = HashMap::new();
        names.insert(ROOT_NAME.to_string(), EntId::ROOT);

        let tree = Self {
            name: name.into(),
            ents: vec![root],
            names,
            config,
        };
        tracing::debug!(tree = %tree.name, "created tree");
        tree
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The Root Ent, fixed for the Tree's lifetime
    pub fn root(&self) -> EntId {
        EntId::ROOT
    }

    /// Number of Ents, Root included
    pub fn ent_count(&self) -> usize {
        self.ents.len()
    }

    /// Iterate over all Ents in creation order (Root first)
    pub fn iter(&self) -> impl Iterator<Item = &Ent> {
        self.ents.iter()
    }

    /// Get an Ent by id
    ///
    /// # Errors
    ///
    /// Returns `EntNotFound` if the id was not issued by this Tree.
    pub fn get(&self, id: EntId) -> Result<&Ent> {
        self.ents
            .get(id.index())
            .ok_or(EntsError::EntNotFound { ent_id: id })
    }

    pub(crate) fn get_mut(&mut self, id: EntId) -> Result<&mut Ent> {
        self.ents
            .get_mut(id.index())
            .ok_or(EntsError::EntNotFound { ent_id: id })
    }

    /// Look up an Ent by name
    pub fn get_by_name(&self, name: &str) -> Option<EntId> {
        self.names.get(name).copied()
    }

    /// Look up an Ent by name, failing if it does not exist
    ///
    /// # Errors
    ///
    /// Returns `UnknownName` if no Ent has this name.
    pub fn require(&self, name: &str) -> Result<EntId> {
        self.get_by_name(name).ok_or_else(|| EntsError::UnknownName {
            name: name.to_string(),
        })
    }

    /// Name of an Ent, or its id rendered as `#n` for a foreign id
    pub fn display_name(&self, id: EntId) -> String {
        self.get(id)
            .map(|ent| ent.name().to_string())
            .unwrap_or_else(|_| id.to_string())
    }

    /// Create a new Ent under Root
    ///
    /// # Errors
    ///
    /// * `InvalidName` - If the name is empty or whitespace-only
    /// * `NameTaken` - If another Ent already has this name
    pub fn create(&mut self, name: &str) -> Result<EntId> {
        self.add_under_parent(name, None)
    }

    /// Create a new Ent and make it a child of `parent` (Root when `None`)
    ///
    /// The edge is made with the raw `connect`: a new leaf has no
    /// descendants, so there is nothing to prune.
    ///
    /// # Errors
    ///
    /// * `InvalidName` - If the name is empty or whitespace-only
    /// * `NameTaken` - If another Ent already has this name
    /// * `EntNotFound` - If `parent` is not an Ent of this Tree
    pub fn add_under_parent(&mut self, name: &str, parent: Option<EntId>) -> Result<EntId> {
        let start = Instant::now();
        log_op_start!("create", ent_name = name);

        match self.add_under_parent_inner(name, parent) {
            Ok(id) => {
                log_op_end!(
                    "create",
                    duration_ms = start.elapsed().as_millis() as u64,
                    ent_id = id.get()
                );
                Ok(id)
            }
            Err(err) => {
                log_op_error!(
                    "create",
                    err.clone(),
                    duration_ms = start.elapsed().as_millis() as u64
                );
                Err(err)
            }
        }
    }

    fn add_under_parent_inner(&mut self, name: &str, parent: Option<EntId>) -> Result<EntId> {
        let parent = parent.unwrap_or(EntId::ROOT);
        self.get(parent)?;

        let id = self.register(name)?;
        relation_ops::connect(self, parent, id)?;
        Ok(id)
    }

    /// Allocate an Ent with no relations
    ///
    /// Used by the factory above and by snapshot loading, which rebuilds
    /// edges afterwards.
    pub(crate) fn register(&mut self, name: &str) -> Result<EntId> {
        if name.trim().is_empty() {
            return Err(EntsError::InvalidName {
                reason: "Name cannot be empty or whitespace-only".to_string(),
            });
        }
        if self.names.contains_key(name) {
            return Err(EntsError::NameTaken {
                name: name.to_string(),
            });
        }

        let raw = u32::try_from(self.ents.len()).map_err(|_| EntsError::InvalidName {
            reason: "Tree is full".to_string(),
        })?;
        let id = EntId::new(raw);
        self.ents.push(Ent::new(id, name.to_string()));
        self.names.insert(name.to_string(), id);
        Ok(id)
    }
}
