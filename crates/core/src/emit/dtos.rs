//! `dtos.ts`: wire records and unions.

use tracing::debug;
use wiremap_ir::Service;

use super::{Artifact, banner, build_sorted};
use crate::classify::TypeTable;
use crate::config::GeneratorOptions;
use crate::error::GenerateResult;
use crate::render::{Facet, Module, Renderer};
use crate::ts::{Emit, TsModule};

/// File name of the artifact.
pub const FILE_NAME: &str = "dtos.ts";

/// Emit the DTO declarations of `service`. Enums stay in `types.ts` and are
/// imported from there.
pub fn dtos_file(service: &Service, options: &GeneratorOptions) -> GenerateResult<Artifact> {
    let table = TypeTable::new(service);
    let renderer = Renderer::new(&table, options, Module::Dtos);

    let (records, mut needs) = build_sorted(&service.types, |ty, needs| {
        let def = renderer.render_record_declaration(ty, Facet::Wire, needs)?;
        Ok((def.name.clone(), def))
    })?;
    let (unions, union_needs) = build_sorted(&service.unions, |union, needs| {
        let def = renderer.render_union_declaration(union, Facet::Wire, needs);
        Ok((def.name.clone(), def))
    })?;
    needs.merge(union_needs);

    let types: Vec<_> = records.into_iter().chain(unions).collect();
    debug!(declarations = types.len(), "Rendered DTO types.");

    let module = TsModule {
        banner: banner(service),
        imports: needs.to_imports(),
        types,
        functions: vec![],
    };
    Ok(Artifact::new(service, FILE_NAME, module.emit()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::error::GenerateError;
    use pretty_assertions::assert_eq;
    use wiremap_ir::{Enum, EnumMember, ObjectRule, Primitive, Property, Type, Value};

    fn prop(name: &str, value: Value) -> Property {
        Property {
            name: name.into(),
            value,
            description: None,
            deprecated: false,
        }
    }

    fn service(types: Vec<Type>) -> Service {
        Service {
            title: "shop".into(),
            description: None,
            interfaces: vec![],
            types,
            enums: vec![Enum {
                name: "color".into(),
                description: None,
                members: vec![EnumMember {
                    content: "red".into(),
                    description: None,
                }],
            }],
            unions: vec![],
        }
    }

    #[test]
    fn test_dtos_file_imports_enums_from_types() {
        let widget = Type {
            name: "widget".into(),
            description: None,
            deprecated: false,
            properties: vec![
                prop("created_at", Value::primitive(Primitive::Date)),
                prop("color", Value::complex("color").nullable()),
                prop("parts", Value::complex("part").array().optional()),
            ],
            map_properties: None,
            rules: vec![],
        };
        let part = Type {
            name: "part".into(),
            description: None,
            deprecated: true,
            properties: vec![prop("sku", Value::primitive(Primitive::String))],
            map_properties: None,
            rules: vec![],
        };
        let artifact = dtos_file(&service(vec![widget, part]), &GeneratorOptions::default()).unwrap();
        assert_eq!(
            artifact.contents,
            "// Generated by wiremap from the shop service description.
// Do not edit by hand.

import type * as types from './types';

/** @deprecated */
export type PartDto = { sku: string };

export type WidgetDto = { created_at: string; color: types.Color | null; parts?: PartDto[] };
"
        );
    }

    #[test]
    fn test_dtos_file_fails_on_invalid_record() {
        let broken = Type {
            name: "broken".into(),
            description: None,
            deprecated: false,
            properties: vec![prop("a", Value::primitive(Primitive::String))],
            map_properties: None,
            rules: vec![ObjectRule::MaxProperties { max: 0 }],
        };
        let err = dtos_file(&service(vec![broken]), &GeneratorOptions::default()).unwrap_err();
        assert!(matches!(err, GenerateError::InvalidMaxProperties { .. }));
    }
}
