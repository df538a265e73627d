//! Error types for generation and configuration loading.

use std::path::PathBuf;

use thiserror::Error;

/// Conditions that stop an artifact from being generated.
///
/// Unresolved references are not listed here: they degrade to `unknown`
/// and identity mappings with a warning.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerateError {
    /// A simple union has members no structural test can tell apart.
    #[error("union `{union}`: no heuristic distinguishes member `{member}` from the others")]
    NoDiscriminatingHeuristic {
        /// Union name.
        union: String,
        /// First member that could not be placed in the fallback slot.
        member: String,
    },

    /// Two simple union members share a runtime test but convert differently.
    #[error("union `{union}`: member `{member}` shares its runtime test with a member converted differently")]
    AmbiguousMemberTest {
        /// Union name.
        union: String,
        /// Later of the two conflicting members.
        member: String,
    },

    /// A discriminated union member has no constant for the discriminator.
    #[error(
        "union `{union}`: member `{member}` has no constant value for discriminator `{discriminator}`"
    )]
    MissingDiscriminatorValue {
        /// Union name.
        union: String,
        /// Offending member.
        member: String,
        /// Discriminator property.
        discriminator: String,
    },

    /// A discriminated union member is not a record reference.
    #[error("union `{union}`: discriminated member `{member}` is not a record")]
    DiscriminatedMemberNotRecord {
        /// Union name.
        union: String,
        /// Offending member.
        member: String,
    },

    /// The maximum property count cannot be met by the required properties.
    #[error(
        "type `{type_name}`: maxProperties {max} is below its {count} declared and required-key properties"
    )]
    InvalidMaxProperties {
        /// Record name.
        type_name: String,
        /// Declared maximum.
        max: usize,
        /// Declared properties plus required map keys.
        count: usize,
    },

    /// A required map key has the same name as a declared property.
    #[error("type `{type_name}`: required map key `{key}` collides with a declared property")]
    MapKeyCollision {
        /// Record name.
        type_name: String,
        /// Colliding key.
        key: String,
    },
}

/// Result type alias for generation.
pub type GenerateResult<T> = Result<T, GenerateError>;

/// Errors raised while reading generator options.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading the file failed.
    #[error("failed to read {path}: {source}")]
    Io {
        /// File that could not be read.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// TOML parse failure.
    #[error("invalid TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    /// JSON parse failure.
    #[error("invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),
}
