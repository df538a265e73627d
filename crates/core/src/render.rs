//! Type rendering.
//!
//! Turns IR values and declarations into [`TsType`] / [`TsTypeDef`] nodes.
//! The same value renders differently per [`Facet`] (dates are `Date`
//! internally and `string` on the wire) and per [`Module`] (names are bare
//! in their home module and namespace-qualified elsewhere).

use tracing::{debug, warn};
use wiremap_ir::{Constant, Enum, Interface, Method, Primitive, Property, Type, Union, Value, ValueTarget};

use crate::classify::{Declaration, TypeTable, record_layout};
use crate::config::GeneratorOptions;
use crate::error::GenerateResult;
use crate::imports::ImportSet;
use crate::names;
use crate::ts::{
    TsDoc, TsLiteral, TsMethodSig, TsParam, TsPrimitive, TsProp, TsType, TsTypeDef, TypeDefKind,
};

/// Which representation a declaration describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Facet {
    /// Idiomatic in-process shape (camelCase, `Date`).
    Internal,
    /// Over-the-wire DTO shape (IR names, ISO strings).
    Wire,
}

/// Generated module a name is rendered into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Module {
    /// `types.ts`
    Types,
    /// `dtos.ts`
    Dtos,
    /// `mappers.ts`
    Mappers,
    /// `routes.ts`
    Routes,
    /// `client.ts`
    Client,
}

/// Namespace alias of the internal types module.
pub const TYPES_ALIAS: &str = "types";
/// Namespace alias of the DTO module.
pub const DTOS_ALIAS: &str = "dtos";

/// Renders types for one module.
#[derive(Debug, Clone, Copy)]
pub struct Renderer<'a> {
    table: &'a TypeTable<'a>,
    options: &'a GeneratorOptions,
    module: Module,
}

impl<'a> Renderer<'a> {
    /// Renderer for `module`.
    pub fn new(table: &'a TypeTable<'a>, options: &'a GeneratorOptions, module: Module) -> Self {
        Self {
            table,
            options,
            module,
        }
    }

    /// Declaration lookup.
    pub fn table(&self) -> &'a TypeTable<'a> {
        self.table
    }

    /// Generator options.
    pub fn options(&self) -> &'a GeneratorOptions {
        self.options
    }

    /// Module being rendered.
    pub fn module(&self) -> Module {
        self.module
    }

    /// Internal name of a declaration as seen from this module.
    pub fn internal_ref(&self, raw: &str, needs: &mut ImportSet) -> TsType {
        let name = names::type_name(raw);
        if self.module == Module::Types {
            TsType::Ref(name)
        } else {
            needs.use_namespace(TYPES_ALIAS, &self.options.types_import_path, true);
            TsType::Ref(format!("{TYPES_ALIAS}.{name}"))
        }
    }

    /// DTO name of a declaration as seen from this module.
    pub fn dto_ref(&self, raw: &str, needs: &mut ImportSet) -> TsType {
        let name = names::dto_name(raw);
        if self.module == Module::Dtos {
            TsType::Ref(name)
        } else {
            needs.use_namespace(DTOS_ALIAS, &self.options.dtos_import_path, true);
            TsType::Ref(format!("{DTOS_ALIAS}.{name}"))
        }
    }

    /// Name of a record or union for `facet`, as seen from this module.
    pub fn facet_ref(&self, raw: &str, facet: Facet, needs: &mut ImportSet) -> TsType {
        match facet {
            Facet::Internal => self.internal_ref(raw, needs),
            Facet::Wire => self.dto_ref(raw, needs),
        }
    }

    /// Property key spelling for `facet`.
    pub fn property_key(raw: &str, facet: Facet) -> String {
        match facet {
            Facet::Internal => names::property_name(raw),
            Facet::Wire => names::wire_property_name(raw).to_string(),
        }
    }

    /// Type of `value` without the optional marker.
    pub fn render_value(&self, value: &Value, facet: Facet, needs: &mut ImportSet) -> TsType {
        let base = match &value.target {
            ValueTarget::Primitive {
                type_name,
                constant,
            } => render_primitive(*type_name, constant.as_ref(), facet),
            ValueTarget::Complex { type_name } => match self.table.resolve(type_name) {
                Some(Declaration::Enum(_)) => self.internal_ref(type_name, needs),
                Some(Declaration::Type(_) | Declaration::Union(_)) => {
                    self.facet_ref(type_name, facet, needs)
                }
                None => {
                    warn!(type_name = %type_name, "Unresolved reference rendered as unknown.");
                    TsType::Primitive(TsPrimitive::Unknown)
                }
            },
        };
        let ty = if value.is_array {
            TsType::Array(Box::new(base))
        } else {
            base
        };
        if value.is_nullable {
            TsType::union_of([ty, TsType::Primitive(TsPrimitive::Null)])
        } else {
            ty
        }
    }

    /// A declared property for `facet`.
    pub fn render_property(&self, prop: &Property, facet: Facet, needs: &mut ImportSet) -> TsProp {
        TsProp {
            name: Self::property_key(&prop.name, facet),
            ty: self.render_value(&prop.value, facet, needs),
            optional: prop.value.is_optional,
            doc: TsDoc::from_parts(prop.description.as_deref(), prop.deprecated),
        }
    }

    /// Shape of a record for `facet`.
    pub fn render_record(&self, ty: &Type, facet: Facet, needs: &mut ImportSet) -> GenerateResult<TsType> {
        let layout = record_layout(ty)?;

        let Some(map) = layout.map else {
            if layout.properties.is_empty() {
                return Ok(unknown_record());
            }
            let props = layout
                .properties
                .iter()
                .map(|p| self.render_property(p, facet, needs))
                .collect();
            return Ok(TsType::Object(props));
        };

        let value_ty = self.render_value(&map.value, facet, needs);
        let key_ty = self.render_value(&map.key, facet, needs);
        let map_term = || {
            let record = TsType::Record {
                key: Box::new(key_ty.clone()),
                value: Box::new(value_ty.clone()),
            };
            if self.table.is_enum(&map.key) {
                TsType::partial(record)
            } else {
                record
            }
        };

        if layout.fixed_count() == 0 {
            return Ok(map_term());
        }

        let mut props: Vec<TsProp> = layout
            .properties
            .iter()
            .map(|p| self.render_property(p, facet, needs))
            .collect();
        for key in layout.required_keys {
            props.push(TsProp::new(key.clone(), value_ty.clone(), false));
        }

        if layout.map_elided {
            debug!(type_name = %ty.name, "Map clause elided by maxProperties.");
            return Ok(TsType::Object(props));
        }

        let mut values = vec![value_ty.clone()];
        values.extend(props.iter().map(|p| p.ty.clone()));
        if props.iter().any(|p| p.optional) {
            values.push(TsType::Primitive(TsPrimitive::Undefined));
        }
        let widened = TsType::Record {
            key: Box::new(key_ty.clone()),
            value: Box::new(TsType::union_of(values)),
        };
        let widened = if self.table.is_enum(&map.key) {
            TsType::partial(widened)
        } else {
            widened
        };
        Ok(TsType::Intersection(vec![TsType::Object(props), widened]))
    }

    /// `export type X = ...;` for a record.
    pub fn render_record_declaration(
        &self,
        ty: &Type,
        facet: Facet,
        needs: &mut ImportSet,
    ) -> GenerateResult<TsTypeDef> {
        Ok(TsTypeDef {
            name: declared_name(&ty.name, facet),
            kind: TypeDefKind::TypeAlias {
                ty: self.render_record(ty, facet, needs)?,
            },
            doc: TsDoc::from_parts(ty.description.as_deref(), ty.deprecated),
        })
    }

    /// `export type X = A | B;` for a union.
    pub fn render_union_declaration(&self, union: &Union, facet: Facet, needs: &mut ImportSet) -> TsTypeDef {
        let members = union
            .members()
            .iter()
            .map(|m| self.render_value(m, facet, needs));
        TsTypeDef {
            name: declared_name(union.name(), facet),
            kind: TypeDefKind::TypeAlias {
                ty: TsType::union_of(members),
            },
            doc: TsDoc::from_parts(union.description(), false),
        }
    }

    /// Parameter object type of a method, and whether every field is
    /// optional. `None` for methods without parameters.
    pub fn render_params(
        &self,
        method: &Method,
        facet: Facet,
        needs: &mut ImportSet,
    ) -> Option<(TsType, bool)> {
        if method.parameters.is_empty() {
            return None;
        }
        let props = method
            .parameters
            .iter()
            .map(|p| TsProp::new(Self::property_key(&p.name, facet), self.render_value(&p.value, facet, needs), p.value.is_optional))
            .collect();
        let all_optional = method.parameters.iter().all(|p| p.value.is_optional);
        Some((TsType::Object(props), all_optional))
    }

    /// Resolved type of a method result, `void` when it returns nothing.
    pub fn render_returns(&self, method: &Method, facet: Facet, needs: &mut ImportSet) -> TsType {
        match &method.returns {
            None => TsType::Primitive(TsPrimitive::Void),
            Some(value) if value.is_optional => TsType::union_of([
                self.render_value(value, facet, needs),
                TsType::Primitive(TsPrimitive::Undefined),
            ]),
            Some(value) => self.render_value(value, facet, needs),
        }
    }

    /// `export interface WidgetService { ... }` for an interface.
    pub fn render_interface(&self, interface: &Interface, needs: &mut ImportSet) -> TsTypeDef {
        let methods = interface
            .methods
            .iter()
            .map(|method| {
                let params = self
                    .render_params(method, Facet::Internal, needs)
                    .map(|(ty, optional)| TsParam {
                        name: "params".into(),
                        ty: Some(ty),
                        optional,
                    })
                    .into_iter()
                    .collect();
                TsMethodSig {
                    name: names::method_name(&method.name),
                    params,
                    return_type: TsType::promise(self.render_returns(method, Facet::Internal, needs)),
                    doc: method_doc(method),
                }
            })
            .collect();
        TsTypeDef {
            name: names::interface_name(&interface.name, &self.options.interface_nomenclature),
            kind: TypeDefKind::Interface {
                properties: vec![],
                methods,
            },
            doc: TsDoc::from_parts(interface.description.as_deref(), false),
        }
    }
}

/// Declared name of a record or union for `facet`.
pub fn declared_name(raw: &str, facet: Facet) -> String {
    match facet {
        Facet::Internal => names::type_name(raw),
        Facet::Wire => names::dto_name(raw),
    }
}

/// `export type Color = 'red' | 'green';`
pub fn render_enum_declaration(e: &Enum) -> TsTypeDef {
    let ty = if e.members.is_empty() {
        TsType::Ref("never".into())
    } else {
        TsType::union_of(
            e.members
                .iter()
                .map(|m| TsType::Literal(TsLiteral::String(m.content.clone()))),
        )
    };
    TsTypeDef {
        name: names::type_name(&e.name),
        kind: TypeDefKind::TypeAlias { ty },
        doc: TsDoc::from_parts(e.description.as_deref(), false),
    }
}

fn render_primitive(kind: Primitive, constant: Option<&Constant>, facet: Facet) -> TsType {
    if let Some(constant) = constant {
        return TsType::Literal(constant_literal(constant));
    }
    match kind {
        Primitive::String | Primitive::Binary => TsType::Primitive(TsPrimitive::String),
        Primitive::Number
        | Primitive::Integer
        | Primitive::Long
        | Primitive::Float
        | Primitive::Double => TsType::Primitive(TsPrimitive::Number),
        Primitive::Boolean => TsType::Primitive(TsPrimitive::Boolean),
        Primitive::Date | Primitive::DateTime => match facet {
            Facet::Internal => TsType::Ref("Date".into()),
            Facet::Wire => TsType::Primitive(TsPrimitive::String),
        },
        Primitive::Null => TsType::Primitive(TsPrimitive::Null),
        Primitive::Untyped => TsType::Primitive(TsPrimitive::Unknown),
    }
}

/// Literal for an IR constant.
pub fn constant_literal(constant: &Constant) -> TsLiteral {
    match constant {
        Constant::String(s) => TsLiteral::String(s.clone()),
        Constant::Boolean(b) => TsLiteral::Bool(*b),
        Constant::Integer(i) => TsLiteral::Int(*i),
        Constant::Number(n) => TsLiteral::Number(*n),
    }
}

fn unknown_record() -> TsType {
    TsType::Record {
        key: Box::new(TsType::Primitive(TsPrimitive::String)),
        value: Box::new(TsType::Primitive(TsPrimitive::Unknown)),
    }
}

/// JSDoc for a method: description, one `@param` line per documented
/// parameter, deprecation.
pub fn method_doc(method: &Method) -> Option<TsDoc> {
    let mut doc = TsDoc::from_parts(method.description.as_deref(), method.deprecated).unwrap_or_default();
    for param in &method.parameters {
        if let Some(description) = &param.description {
            doc.lines.push(format!(
                "@param params.{} {}",
                names::property_name(&param.name),
                description.trim()
            ));
        }
    }
    if doc.lines.is_empty() && !doc.deprecated {
        None
    } else {
        Some(doc)
    }
}
