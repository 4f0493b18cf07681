//! Canonical schema constants for structured logging and events
//!
//! These constants ensure consistency across all logging and error reporting.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";

// Entity identifiers
pub const FIELD_ENT_ID: &str = "ent_id";
pub const FIELD_ENT_NAME: &str = "ent_name";
pub const FIELD_PARENT: &str = "parent";
pub const FIELD_CHILD: &str = "child";

// Collection sizes
pub const FIELD_PRUNED: &str = "pruned";
pub const FIELD_RESOLVED: &str = "resolved";

// Resolution
pub const FIELD_OUTCOME: &str = "outcome";

// Error fields
pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
