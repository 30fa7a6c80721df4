//! # Error Types
//!
//! All errors that can occur in the storage engine and its codec.
//!
//! Precondition violations (wrong entity, duplicate component, mismatched
//! byte length) are reported as errors and leave every index untouched.
//! Benign "nothing there yet" queries never produce an error.

use thiserror::Error;

use crate::ecs::EntityId;
use crate::guid::Guid;

/// Errors raised by pools and the registry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EcsError {
    /// The null entity id was passed where a real id is required.
    #[error("the null entity id is not a valid entity")]
    NullEntity,

    /// The entity is not currently alive in the registry.
    #[error("entity {0} is not alive")]
    EntityNotAlive(EntityId),

    /// The id is already in use by a live entity.
    #[error("entity {0} is already alive")]
    EntityAlreadyAlive(EntityId),

    /// The entity already has a record in this pool.
    #[error("entity {entity} already has component {component}")]
    DuplicateComponent {
        /// The entity that was targeted.
        entity: EntityId,
        /// Identifier of the component type.
        component: Guid,
    },

    /// The entity has no record in this pool.
    #[error("entity {entity} has no component {component}")]
    MissingComponent {
        /// The entity that was targeted.
        entity: EntityId,
        /// Identifier of the component type.
        component: Guid,
    },

    /// A byte payload does not match the pool's fixed record size.
    #[error("component {component}: expected {expected} bytes, got {actual}")]
    SizeMismatch {
        /// Identifier of the component type.
        component: Guid,
        /// The pool's record size.
        expected: usize,
        /// The size that was supplied.
        actual: usize,
    },

    /// Component records must occupy at least one byte.
    #[error("component {0} has zero size")]
    ZeroSizedComponent(Guid),

    /// The pool's byte buffer cannot honour the type's alignment.
    #[error("component {component} requires {align}-byte alignment (max {max})")]
    UnsupportedAlignment {
        /// Identifier of the component type.
        component: Guid,
        /// Alignment the type requires.
        align: usize,
        /// Largest alignment a pool provides.
        max: usize,
    },
}

/// Result type for pool and registry operations.
pub type EcsResult<T> = Result<T, EcsError>;

/// Errors raised while building the reflection table.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReflectError {
    /// The null identifier can never name a component type.
    #[error("component {0} was registered with the null identifier")]
    NullGuid(String),

    /// The identifier is already bound to another name.
    #[error("identifier {guid} is already registered as {existing}, cannot register {name}")]
    GuidCollision {
        /// The contested identifier.
        guid: Guid,
        /// Name already bound to it.
        existing: String,
        /// Name that tried to claim it.
        name: String,
    },
}

/// Result type for reflection table operations.
pub type ReflectResult<T> = Result<T, ReflectError>;

/// Errors raised while encoding or decoding an entity record.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// The input ended before the declared content.
    #[error("truncated entity record: needed {needed} bytes at offset {offset}, {available} available")]
    Truncated {
        /// Offset where the read started.
        offset: usize,
        /// Bytes the read required.
        needed: usize,
        /// Bytes that were left.
        available: usize,
    },

    /// A component name is not in the reflection table.
    #[error("unknown component name: {0}")]
    UnknownComponent(String),

    /// A pool's identifier has no name in the reflection table.
    #[error("component {0} is not registered and cannot be named")]
    UnregisteredType(Guid),

    /// A component name is not valid UTF-8.
    #[error("component name at offset {0} is not valid UTF-8")]
    InvalidName(usize),

    /// A component name does not fit the 16-bit length prefix.
    #[error("component name {0} exceeds 65535 bytes")]
    NameTooLong(String),

    /// More components than the 32-bit count can express.
    #[error("entity has too many components to encode: {0}")]
    TooManyComponents(usize),

    /// The same component appears twice in one record.
    #[error("component {0} appears twice in one entity record")]
    DuplicateComponent(String),

    /// Bytes remain after a complete record.
    #[error("{0} trailing bytes after entity record")]
    TrailingBytes(usize),

    /// The registry rejected the decoded data.
    #[error(transparent)]
    Ecs(#[from] EcsError),
}

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors raised while parsing a textual identifier.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuidParseError {
    /// Input is neither 36 characters nor 38 with braces.
    #[error("invalid GUID length {0}")]
    InvalidLength(usize),

    /// A 38-character input is not wrapped in `{}`.
    #[error("GUID braces are unbalanced")]
    UnbalancedBraces,

    /// Expected a hyphen at this position of the canonical form.
    #[error("expected '-' at position {0}")]
    MissingHyphen(usize),

    /// A character is not a hex digit.
    #[error("invalid hex digit at position {0}")]
    InvalidDigit(usize),
}

/// Errors raised while loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config {path}: {source}")]
    Io {
        /// Path that was read.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The configuration text is not valid TOML for this schema.
    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value parsed but is out of range.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;
