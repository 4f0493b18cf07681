//! Ents Core - consistent category hierarchies
//!
//! This crate keeps a hierarchy of named categories ("Ents") logically
//! consistent as facts are entered one at a time:
//! - Arena-backed Tree with parent/child, exclusive and overlap relations
//! - Relation engine with legality checks and transitive-reduction pruning
//! - Analyzer for sibling pairs that are not classified yet
//! - Resolution protocol driven by an injected oracle
//! - Invariant validation, JSON snapshots, configuration and logging

pub mod analysis;
pub mod config;
pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod ops;
pub mod resolution;
pub mod rules;
pub mod snapshot;

// Re-export commonly used types
pub use analysis::{find_all_estranged_pairs, find_estranged_pair, EstrangedPair};
pub use config::EngineConfig;
pub use errors::{ConflictReason, EntsError, ExError, ExErrorKind, Result};
pub use model::{Ent, EntId};
pub use ops::{Tree, ROOT_NAME};
pub use resolution::{
    insert_edge, insert_ent, resolve_all, resolve_pair, Oracle, OrderAnswer, OrderQuestion,
    ResolutionEvent, ResolutionOutcome, ScriptedOracle,
};
pub use rules::validate_tree;
pub use snapshot::TreeSnapshot;
