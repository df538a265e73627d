//! `mappers.ts`: a `mapFromXDto` / `mapToXDto` pair per record and union.

use tracing::debug;
use wiremap_ir::Service;

use super::{Artifact, banner, build_sorted};
use crate::classify::TypeTable;
use crate::config::GeneratorOptions;
use crate::error::GenerateResult;
use crate::imports::Helper;
use crate::mapping::{Direction, Mapper, compact_helper};
use crate::names;
use crate::render::{Module, Renderer};
use crate::ts::{Emit, TsModule};

/// File name of the artifact.
pub const FILE_NAME: &str = "mappers.ts";

/// Emit the mapper functions of `service`.
pub fn mappers_file(service: &Service, options: &GeneratorOptions) -> GenerateResult<Artifact> {
    let table = TypeTable::new(service);
    let mapper = Mapper::new(Renderer::new(&table, options, Module::Mappers));

    let (records, mut needs) = build_sorted(&service.types, |ty, needs| {
        let pair = vec![
            mapper.record_mapper(ty, Direction::WireToInternal, needs)?,
            mapper.record_mapper(ty, Direction::InternalToWire, needs)?,
        ];
        Ok((names::type_name(&ty.name), pair))
    })?;
    let (unions, union_needs) = build_sorted(&service.unions, |union, needs| {
        let pair = vec![
            mapper.union_mapper(union, Direction::WireToInternal, needs)?,
            mapper.union_mapper(union, Direction::InternalToWire, needs)?,
        ];
        Ok((names::type_name(union.name()), pair))
    })?;
    needs.merge(union_needs);

    let mut functions = Vec::new();
    if needs.needs_helper(Helper::Compact) {
        functions.push(compact_helper());
    }
    functions.extend(records.into_iter().flatten());
    functions.extend(unions.into_iter().flatten());
    debug!(functions = functions.len(), "Built mappers.");

    let module = TsModule {
        banner: banner(service),
        imports: needs.to_imports(),
        types: vec![],
        functions,
    };
    Ok(Artifact::new(service, FILE_NAME, module.emit()))
}
