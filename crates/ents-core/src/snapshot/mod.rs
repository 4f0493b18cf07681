//! Tree snapshots
//!
//! A snapshot is the serializable form of a whole Tree: its name, every Ent
//! by id, and the three relations as id pairs. Snapshots are written as JSON.
//!
//! ## Format Version
//!
//! Current format version: **1**
//!
//! ## Fields
//!
//! - `format_version`: Format version (currently 1)
//! - `name`: Tree display name
//! - `ents`: `{id, name}` in id order, Root first
//! - `edges`: `[parent, child]`, grouped by parent in children order
//! - `exclusives`, `overlaps`: `[a, b]` with `a < b`, each pair once

pub mod format;
pub mod persist;

pub use format::{EntRecord, TreeSnapshot, FORMAT_VERSION};
pub use persist::{from_json, load, read_snapshot, save, to_json};
