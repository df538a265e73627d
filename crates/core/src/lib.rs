//! TypeScript code generation from a service IR.
//!
//! Given a [`wiremap_ir::Service`] and [`GeneratorOptions`], emits the
//! internal types, DTO types, mappers between the two and either express
//! routes (server role) or a fetch client (client role).
//!
//! The pieces, leaves first:
//! - [`classify`]: shape category of a value, declaration lookup
//! - [`render`]: declared TypeScript types per representation
//! - [`heuristics`]: per-member discrimination of simple unions
//! - [`mapping`]: conversion expressions and mapper functions
//! - [`emit`]: one generator per artifact
//!
//! Each artifact function fails independently; [`generate`] stops at the
//! first error.

pub mod classify;
pub mod config;
pub mod emit;
pub mod error;
pub mod heuristics;
pub mod imports;
pub mod mapping;
pub mod names;
pub mod render;
pub mod ts;

use tracing::{debug, info};
use wiremap_ir::Service;

pub use config::{GeneratorOptions, Side, Validation};
pub use emit::Artifact;
pub use error::{ConfigError, GenerateError, GenerateResult};

/// Generate every artifact for `options.role`.
pub fn generate(service: &Service, options: &GeneratorOptions) -> GenerateResult<Vec<Artifact>> {
    debug!(
        title = %service.title,
        role = ?options.role,
        types = service.types.len(),
        unions = service.unions.len(),
        "Generating artifacts."
    );
    let mut artifacts = vec![
        emit::types::types_file(service, options)?,
        emit::dtos::dtos_file(service, options)?,
        emit::mappers::mappers_file(service, options)?,
    ];
    artifacts.push(match options.role {
        Side::Server => emit::routes::routes_file(service, options)?,
        Side::Client => emit::client::client_file(service, options)?,
    });
    artifacts.push(emit::readme::readme_file(service, options));
    info!(title = %service.title, artifacts = artifacts.len(), "Generated artifacts.");
    Ok(artifacts)
}
