//! `types.ts`: enums, internal records and unions, service interfaces.

use tracing::debug;
use wiremap_ir::Service;

use super::{Artifact, banner, build_sorted};
use crate::classify::TypeTable;
use crate::config::GeneratorOptions;
use crate::error::GenerateResult;
use crate::render::{Facet, Module, Renderer, render_enum_declaration};
use crate::ts::{Emit, TsModule};

/// File name of the artifact.
pub const FILE_NAME: &str = "types.ts";

/// Emit the internal type declarations of `service`.
pub fn types_file(service: &Service, options: &GeneratorOptions) -> GenerateResult<Artifact> {
    let table = TypeTable::new(service);
    let renderer = Renderer::new(&table, options, Module::Types);

    let (enums, _) = build_sorted(&service.enums, |e, _| {
        let def = render_enum_declaration(e);
        Ok((def.name.clone(), def))
    })?;
    let (records, mut needs) = build_sorted(&service.types, |ty, needs| {
        let def = renderer.render_record_declaration(ty, Facet::Internal, needs)?;
        Ok((def.name.clone(), def))
    })?;
    let (unions, union_needs) = build_sorted(&service.unions, |union, needs| {
        let def = renderer.render_union_declaration(union, Facet::Internal, needs);
        Ok((def.name.clone(), def))
    })?;
    let (interfaces, interface_needs) = build_sorted(&service.interfaces, |interface, needs| {
        let def = renderer.render_interface(interface, needs);
        Ok((def.name.clone(), def))
    })?;
    needs.merge(union_needs);
    needs.merge(interface_needs);

    let types: Vec<_> = enums
        .into_iter()
        .chain(records)
        .chain(unions)
        .chain(interfaces)
        .collect();
    debug!(declarations = types.len(), "Rendered internal types.");

    let module = TsModule {
        banner: banner(service),
        imports: needs.to_imports(),
        types,
        functions: vec![],
    };
    Ok(Artifact::new(service, FILE_NAME, module.emit()))
}
