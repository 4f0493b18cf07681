use serde::{Deserialize, Serialize};

/// Stable handle of an Ent inside its owning Tree
///
/// Ids are arena indices assigned sequentially at creation. The Root is
/// always `EntId(0)`. An id is only meaningful for the Tree that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntId(u32);

impl EntId {
    /// Id of the Root Ent in every Tree
    pub const ROOT: EntId = EntId(0);

    /// Wrap a raw numeric id
    pub fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// The raw numeric id
    pub fn get(self) -> u32 {
        self.0
    }

    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for EntId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}
