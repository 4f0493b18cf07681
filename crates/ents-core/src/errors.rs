use thiserror::Error;

use crate::model::EntId;

/// Result type alias using EntsError
pub type Result<T> = std::result::Result<T, EntsError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that can be used for programmatic
/// error handling, testing, and reporting to a front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Structural/Validation
    InvalidInput,
    InvalidName,
    NotFound,
    AlreadyExists,
    ParentalConflict,
    ResolutionConflict,
    InvariantViolation,
    TraversalLimit,

    // Persistence
    InvalidSnapshot,
    Serialization,
    Io,
    Config,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::InvalidName => "ERR_INVALID_NAME",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::AlreadyExists => "ERR_ALREADY_EXISTS",
            ExErrorKind::ParentalConflict => "ERR_PARENTAL_CONFLICT",
            ExErrorKind::ResolutionConflict => "ERR_RESOLUTION_CONFLICT",
            ExErrorKind::InvariantViolation => "ERR_INVARIANT_VIOLATION",
            ExErrorKind::TraversalLimit => "ERR_TRAVERSAL_LIMIT",
            ExErrorKind::InvalidSnapshot => "ERR_INVALID_SNAPSHOT",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Config => "ERR_CONFIG",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries classification fields for programmatic handling plus context for
/// debugging. Built from [`EntsError`] at reporting boundaries.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity: Option<String>,
    message: String,
    candidates: Option<Vec<String>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity: None,
            message: String::new(),
            candidates: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add entity context (an Ent name or id)
    pub fn with_entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = Some(entity.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add the Ents that caused a conflict
    pub fn with_candidates(mut self, names: Vec<String>) -> Self {
        self.candidates = Some(names);
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn entity(&self) -> Option<&str> {
        self.entity.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn candidates(&self) -> Option<&[String]> {
        self.candidates.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(entity) = &self.entity {
            write!(f, " (entity: {})", entity)?;
        }
        if let Some(candidates) = &self.candidates {
            write!(f, " (conflicts: {})", candidates.join(", "))?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Why the resolution protocol refused to order a pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictReason {
    /// Neither Ent can be the parent of the other without a cycle
    BothOrderingsIllegal,
    /// Only one ordering was legal and the oracle declined it
    ForcedOrderDeclined,
}

impl std::fmt::Display for ConflictReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConflictReason::BothOrderingsIllegal => write!(f, "both orderings are illegal"),
            ConflictReason::ForcedOrderDeclined => {
                write!(f, "the only legal ordering was declined")
            }
        }
    }
}

/// Error taxonomy for Ents operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EntsError {
    /// Ent name is empty or whitespace-only
    #[error("Invalid name: {reason}")]
    InvalidName { reason: String },

    /// Another Ent in the Tree already uses this name
    #[error("Name already taken: {name}")]
    NameTaken { name: String },

    /// Id does not belong to this Tree
    #[error("Ent not found: {ent_id}")]
    EntNotFound { ent_id: EntId },

    /// No Ent with this name exists
    #[error("No Ent named '{name}'")]
    UnknownName { name: String },

    /// Making `parent` a parent of `child` would create a cycle or contradiction
    #[error("{parent} cannot be a parent of {child}: conflicts with {}", .conflicts.join(", "))]
    CycleOrRedundancyConflict {
        parent: String,
        child: String,
        conflicts: Vec<String>,
    },

    /// The resolution protocol hit a structural contradiction
    #[error("Cannot relate {a} and {b}: {reason}")]
    ResolutionConflict {
        a: String,
        b: String,
        reason: ConflictReason,
        conflicts: Vec<String>,
    },

    /// A legality check needed a walk longer than the depth bound
    #[error("Cannot check relations of {ent}: hierarchy deeper than {limit}")]
    TraversalTruncated { ent: String, limit: usize },

    /// A structural invariant does not hold
    #[error("Invariant '{invariant}' violated: {detail}")]
    InvariantViolation { invariant: String, detail: String },

    /// Snapshot content is inconsistent
    #[error("Invalid snapshot: {reason}")]
    InvalidSnapshot { reason: String },

    #[error("Serialization error: {message}")]
    Serialization { message: String },

    #[error("I/O error: {message}")]
    Io { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

/// Conversion from EntsError to ExError
impl From<EntsError> for ExError {
    fn from(err: EntsError) -> Self {
        match err {
            EntsError::InvalidName { reason } => ExError::new(ExErrorKind::InvalidName)
                .with_message(format!("Invalid name: {}", reason)),

            EntsError::NameTaken { name } => ExError::new(ExErrorKind::AlreadyExists)
                .with_entity(name)
                .with_message("Name already taken"),

            EntsError::EntNotFound { ent_id } => ExError::new(ExErrorKind::NotFound)
                .with_entity(ent_id.to_string())
                .with_message("Ent not found"),

            EntsError::UnknownName { name } => ExError::new(ExErrorKind::NotFound)
                .with_entity(name)
                .with_message("No Ent with that name"),

            EntsError::CycleOrRedundancyConflict {
                parent,
                child,
                conflicts,
            } => ExError::new(ExErrorKind::ParentalConflict)
                .with_entity(child.clone())
                .with_message(format!("{} cannot be a parent of {}", parent, child))
                .with_candidates(conflicts),

            EntsError::ResolutionConflict {
                a,
                b,
                reason,
                conflicts,
            } => ExError::new(ExErrorKind::ResolutionConflict)
                .with_op("resolve_pair")
                .with_entity(a.clone())
                .with_message(format!("Cannot relate {} and {}: {}", a, b, reason))
                .with_candidates(conflicts),

            EntsError::TraversalTruncated { ent, limit } => {
                ExError::new(ExErrorKind::TraversalLimit)
                    .with_entity(ent)
                    .with_message(format!("Traversal depth bound {} reached", limit))
            }

            EntsError::InvariantViolation { invariant, detail } => {
                ExError::new(ExErrorKind::InvariantViolation)
                    .with_op(invariant)
                    .with_message(detail)
            }

            EntsError::InvalidSnapshot { reason } => {
                ExError::new(ExErrorKind::InvalidSnapshot).with_message(reason)
            }

            EntsError::Serialization { message } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }

            EntsError::Io { message } => ExError::new(ExErrorKind::Io).with_message(message),

            EntsError::Config { message } => {
                ExError::new(ExErrorKind::Config).with_message(message)
            }
        }
    }
}

impl From<serde_json::Error> for EntsError {
    fn from(err: serde_json::Error) -> Self {
        EntsError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for EntsError {
    fn from(err: std::io::Error) -> Self {
        EntsError::Io {
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for EntsError {
    fn from(err: toml::de::Error) -> Self {
        EntsError::Config {
            message: err.to_string(),
        }
    }
}
