//! Value mapping synthesis.
//!
//! Builds the TypeScript expressions and functions that move values between
//! the wire (DTO) and internal representations:
//! - [`Mapper::map_expression`] converts one value at an accessor,
//!   composing optional / nullable guards around the conversion.
//! - [`Mapper::record_mapper`] and [`Mapper::union_mapper`] build the
//!   `mapFromXDto` / `mapToXDto` functions those expressions delegate to.

use std::collections::HashSet;

use tracing::{debug, warn};
use wiremap_ir::{MapProperties, Primitive, Type, Union, Value};

use crate::classify::{ValueShape, classify, record_layout};
use crate::config::{MAPPERS_IMPORT_PATH, Side};
use crate::error::{GenerateError, GenerateResult};
use crate::heuristics::{Heuristic, MemberShape, heuristics, member_shape};
use crate::imports::{Helper, ImportSet};
use crate::names;
use crate::render::{Facet, Module, Renderer, constant_literal};
use crate::ts::{
    BinOp, ObjectEntry, SwitchCase, TsExpr, TsFunction, TsLiteral, TsParam, TsStmt,
};

/// Namespace alias of the mapper module.
pub const MAPPERS_ALIAS: &str = "mappers";

/// Semantic direction of a conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// DTO in, internal value out.
    WireToInternal,
    /// Internal value in, DTO out.
    InternalToWire,
}

impl Direction {
    /// Representation of the value being converted.
    pub fn source(self) -> Facet {
        match self {
            Direction::WireToInternal => Facet::Wire,
            Direction::InternalToWire => Facet::Internal,
        }
    }

    /// Representation produced.
    pub fn target(self) -> Facet {
        match self {
            Direction::WireToInternal => Facet::Internal,
            Direction::InternalToWire => Facet::Wire,
        }
    }

    /// Mapper function name for a record or union.
    pub fn mapper_name(self, raw: &str) -> String {
        match self {
            Direction::WireToInternal => names::map_from_dto(raw),
            Direction::InternalToWire => names::map_to_dto(raw),
        }
    }

    fn param_name(self) -> &'static str {
        match self {
            Direction::WireToInternal => "dto",
            Direction::InternalToWire => "model",
        }
    }
}

/// Where a value crosses the wire, from the point of view of one side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Request data arriving at a server.
    ServerInbound,
    /// Response data leaving a server.
    ServerOutbound,
    /// Response data arriving at a client.
    ClientInbound,
    /// Request data leaving a client.
    ClientOutbound,
}

/// Part of a method a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Payload {
    /// Method parameters.
    Params,
    /// Method result.
    Returns,
}

impl Role {
    /// Inbound roles read the wire, outbound roles write it.
    pub fn direction(self) -> Direction {
        match self {
            Role::ServerInbound | Role::ClientInbound => Direction::WireToInternal,
            Role::ServerOutbound | Role::ClientOutbound => Direction::InternalToWire,
        }
    }

    /// Role of a method payload on `side`.
    pub fn for_payload(side: Side, payload: Payload) -> Self {
        match (side, payload) {
            (Side::Server, Payload::Params) => Role::ServerInbound,
            (Side::Server, Payload::Returns) => Role::ServerOutbound,
            (Side::Client, Payload::Params) => Role::ClientOutbound,
            (Side::Client, Payload::Returns) => Role::ClientInbound,
        }
    }
}

/// Builds conversion expressions and mapper functions for one module.
#[derive(Debug, Clone, Copy)]
pub struct Mapper<'a> {
    renderer: Renderer<'a>,
}

impl<'a> Mapper<'a> {
    /// Mapper sharing `renderer`'s table, options and module.
    pub fn new(renderer: Renderer<'a>) -> Self {
        Self { renderer }
    }

    /// Renderer used for signatures.
    pub fn renderer(&self) -> &Renderer<'a> {
        &self.renderer
    }

    /// Conversion of `value` at `accessor` for `role`.
    pub fn map_expression(
        &self,
        value: &Value,
        role: Role,
        accessor: TsExpr,
        needs: &mut ImportSet,
    ) -> TsExpr {
        self.map_value(value, role.direction(), accessor, needs)
    }

    /// Reference to the mapper function of `raw` for `direction`.
    pub fn mapper_ref(&self, raw: &str, direction: Direction, needs: &mut ImportSet) -> TsExpr {
        let name = direction.mapper_name(raw);
        if self.renderer.module() == Module::Mappers {
            TsExpr::ident(name)
        } else {
            needs.use_namespace(MAPPERS_ALIAS, MAPPERS_IMPORT_PATH, false);
            TsExpr::ident(MAPPERS_ALIAS).member(&name)
        }
    }

    /// Conversion of `value` at `accessor` in `direction`, with guards.
    /// Values needing no conversion come back as `accessor` itself.
    pub fn map_value(
        &self,
        value: &Value,
        direction: Direction,
        accessor: TsExpr,
        needs: &mut ImportSet,
    ) -> TsExpr {
        match self.convert(value, direction, &accessor, needs) {
            Some(inner) => guard(value, accessor, inner),
            None => accessor,
        }
    }

    /// Unguarded conversion; `None` for identity.
    fn convert(
        &self,
        value: &Value,
        direction: Direction,
        accessor: &TsExpr,
        needs: &mut ImportSet,
    ) -> Option<TsExpr> {
        match classify(value, self.renderer.table()) {
            ValueShape::Primitive | ValueShape::PrimitiveArray => {
                let kind = value.primitive_kind()?;
                if !kind.is_date_like() || value.constant_value().is_some() {
                    return None;
                }
                if value.is_array {
                    let item = TsExpr::ident("item");
                    Some(accessor.clone().method(
                        "map",
                        vec![TsExpr::arrow("item", convert_date(kind, direction, item))],
                    ))
                } else {
                    Some(convert_date(kind, direction, accessor.clone()))
                }
            }
            ValueShape::EnumRef | ValueShape::Unresolved => None,
            ValueShape::ComplexRef | ValueShape::ComplexArray | ValueShape::MapValue => {
                let mapper = self.mapper_ref(value.complex_name()?, direction, needs);
                if value.is_array {
                    Some(accessor.clone().method("map", vec![mapper]))
                } else {
                    Some(mapper.call(vec![accessor.clone()]))
                }
            }
        }
    }

    /// `mapFromXDto` / `mapToXDto` for a record.
    pub fn record_mapper(
        &self,
        ty: &Type,
        direction: Direction,
        needs: &mut ImportSet,
    ) -> GenerateResult<TsFunction> {
        let layout = record_layout(ty)?;
        let source = direction.source();
        let target = direction.target();
        let param = direction.param_name();

        let mut used: HashSet<String> = [param, "rest", "compact"]
            .into_iter()
            .map(String::from)
            .collect();
        let mut bindings: Vec<(String, String)> = Vec::new();
        let mut entries: Vec<ObjectEntry> = Vec::new();

        for prop in layout.properties {
            let local = names::unique_local(&prop.name, &mut used);
            bindings.push((Renderer::property_key(&prop.name, source), local.clone()));
            entries.push(ObjectEntry::Prop(
                Renderer::property_key(&prop.name, target),
                self.map_value(&prop.value, direction, TsExpr::ident(local), needs),
            ));
        }
        if let Some(map) = layout.map {
            for key in layout.required_keys {
                let local = names::unique_local(key, &mut used);
                bindings.push((key.clone(), local.clone()));
                entries.push(ObjectEntry::Prop(
                    key.clone(),
                    self.map_value(&map.value, direction, TsExpr::ident(local), needs),
                ));
            }
        }

        let mut body = Vec::new();
        let open_map = layout.open_map();
        if bindings.is_empty() {
            // Nothing declared: the whole source is the map (or opaque).
            let whole = TsExpr::ident(param);
            entries.push(ObjectEntry::Spread(match open_map {
                Some(map) => self.fold_map(map, direction, whole, needs),
                None => whole,
            }));
        } else {
            body.push(TsStmt::Destructure {
                bindings,
                rest: open_map.map(|_| "rest".to_string()),
                init: TsExpr::ident(param),
            });
            if let Some(map) = open_map {
                entries.push(ObjectEntry::Spread(self.fold_map(
                    map,
                    direction,
                    TsExpr::ident("rest"),
                    needs,
                )));
            }
        }

        let needs_compact =
            open_map.is_some() || layout.properties.iter().any(|p| p.value.is_optional);
        let object = TsExpr::Object(entries);
        let result = if needs_compact {
            needs.use_helper(Helper::Compact);
            TsExpr::ident("compact").call(vec![object])
        } else {
            object
        };
        body.push(TsStmt::Return(Some(result)));

        debug!(type_name = %ty.name, ?direction, "Built record mapper.");
        Ok(TsFunction::exported(
            direction.mapper_name(&ty.name),
            vec![TsParam::typed(
                param,
                self.renderer.facet_ref(&ty.name, source, needs),
            )],
            Some(self.renderer.facet_ref(&ty.name, target, needs)),
            body,
        ))
    }

    /// Convert every remaining own key of `rest` through the map value rule.
    fn fold_map(
        &self,
        map: &MapProperties,
        direction: Direction,
        rest: TsExpr,
        needs: &mut ImportSet,
    ) -> TsExpr {
        let value = TsExpr::ident("value");
        let converted = self.map_value(&map.value, direction, value.clone(), needs);
        if converted == value {
            return rest;
        }
        let entries = TsExpr::ident("Object").method("entries", vec![rest]);
        let pairs = entries.method(
            "map",
            vec![TsExpr::Arrow {
                params: vec![TsParam::untyped("[key, value]")],
                body: Box::new(TsExpr::Array(vec![TsExpr::ident("key"), converted])),
            }],
        );
        TsExpr::ident("Object").method("fromEntries", vec![pairs])
    }

    /// `mapFromXDto` / `mapToXDto` for a union.
    pub fn union_mapper(
        &self,
        union: &Union,
        direction: Direction,
        needs: &mut ImportSet,
    ) -> GenerateResult<TsFunction> {
        let param = direction.param_name();
        let body = match union {
            Union::Discriminated {
                name,
                discriminator,
                members,
                ..
            } => self.discriminated_body(name, discriminator, members, direction, needs)?,
            Union::Simple { name, members, .. } => {
                self.simple_body(name, members, direction, needs)?
            }
        };
        debug!(union = %union.name(), ?direction, "Built union mapper.");
        Ok(TsFunction::exported(
            direction.mapper_name(union.name()),
            vec![TsParam::typed(
                param,
                self.renderer.facet_ref(union.name(), direction.source(), needs),
            )],
            Some(self.renderer.facet_ref(union.name(), direction.target(), needs)),
            body,
        ))
    }

    fn discriminated_body(
        &self,
        union: &str,
        discriminator: &str,
        members: &[Value],
        direction: Direction,
        needs: &mut ImportSet,
    ) -> GenerateResult<Vec<TsStmt>> {
        let param = TsExpr::ident(direction.param_name());
        let mut cases = Vec::with_capacity(members.len());
        for member in members {
            let Some(ty) = member
                .complex_name()
                .and_then(|name| self.renderer.table().record(name))
            else {
                return Err(GenerateError::DiscriminatedMemberNotRecord {
                    union: union.to_string(),
                    member: member.type_name().to_string(),
                });
            };
            let Some(constant) = ty
                .properties
                .iter()
                .find(|p| p.name == discriminator)
                .and_then(|p| p.value.constant_value())
            else {
                return Err(GenerateError::MissingDiscriminatorValue {
                    union: union.to_string(),
                    member: ty.name.clone(),
                    discriminator: discriminator.to_string(),
                });
            };
            let mapper = self.mapper_ref(&ty.name, direction, needs);
            cases.push(SwitchCase {
                test: constant_literal(constant),
                body: vec![TsStmt::Return(Some(mapper.call(vec![param.clone()])))],
            });
        }
        Ok(vec![
            TsStmt::Switch {
                discriminant: param.member(&Renderer::property_key(discriminator, direction.source())),
                cases,
            },
            TsStmt::Throw(TsExpr::new_of(
                "Error",
                vec![TsExpr::string(format!(
                    "Unexpected {discriminator} for {}",
                    names::type_name(union)
                ))],
            )),
        ])
    }

    fn simple_body(
        &self,
        union: &str,
        members: &[Value],
        direction: Direction,
        needs: &mut ImportSet,
    ) -> GenerateResult<Vec<TsStmt>> {
        let x = TsExpr::ident(direction.param_name());
        let mut converting: Vec<(TsExpr, TsExpr, &Value)> = Vec::new();
        let mut passthrough: Vec<TsExpr> = Vec::new();
        let mut arrays: Vec<(&Value, Option<TsExpr>)> = Vec::new();
        let mut complex: Vec<&Value> = Vec::new();

        // Date-like members first so their tests win over plain strings.
        let (dates, others): (Vec<&Value>, Vec<&Value>) =
            members.iter().partition(|m| m.is_date_like());
        for member in dates.into_iter().chain(others) {
            let bare = strip_modifiers(member);
            match classify(member, self.renderer.table()) {
                ValueShape::Unresolved => {}
                ValueShape::EnumRef if member.is_array => arrays.push((member, None)),
                ValueShape::EnumRef => passthrough.push(x.clone().type_is("string")),
                ValueShape::ComplexRef | ValueShape::MapValue => complex.push(member),
                ValueShape::ComplexArray | ValueShape::PrimitiveArray => {
                    arrays.push((member, self.convert(&bare, direction, &x, needs)));
                }
                ValueShape::Primitive => {
                    let Some(cond) = primitive_test(&bare, direction, &x) else {
                        debug!(union, member = %member.type_name(), "Untyped member needs no test.");
                        continue;
                    };
                    match self.convert(&bare, direction, &x, needs) {
                        Some(result) => converting.push((cond, result, member)),
                        None => passthrough.push(cond),
                    }
                }
            }
        }

        // Every list answers `Array.isArray`, so lists must convert alike.
        if let Some(((first, result), rest)) = arrays.split_first() {
            if let Some((member, _)) = rest.iter().find(|(_, r)| r != result) {
                return Err(GenerateError::AmbiguousMemberTest {
                    union: union.to_string(),
                    member: member.type_name().to_string(),
                });
            }
            let cond = TsExpr::ident("Array").method("isArray", vec![x.clone()]);
            match result {
                Some(result) => converting.push((cond, result.clone(), *first)),
                None => passthrough.push(cond),
            }
        }

        let mut branches: Vec<(TsExpr, TsExpr)> = Vec::new();
        let mut seen: Vec<TsExpr> = Vec::new();
        for (cond, result, member) in converting {
            match branches.iter().find(|(c, _)| *c == cond) {
                Some((_, existing)) if *existing != result => {
                    return Err(GenerateError::AmbiguousMemberTest {
                        union: union.to_string(),
                        member: member.type_name().to_string(),
                    });
                }
                Some(_) => {}
                None => {
                    seen.push(cond.clone());
                    branches.push((cond, result));
                }
            }
        }
        if !complex.is_empty() {
            // null and undefined must not reach a member mapper.
            let mut identity = absent_tests(members, &x);
            seen.extend(identity.iter().cloned());
            for cond in passthrough {
                if !seen.contains(&cond) {
                    seen.push(cond.clone());
                    identity.push(cond);
                }
            }
            let mut conds = identity.into_iter();
            if let Some(first) = conds.next() {
                let cond = conds.fold(first, |acc, c| TsExpr::bin(acc, BinOp::Or, c));
                branches.push((cond, x.clone()));
            }
        }

        let fallback = match complex.as_slice() {
            [] => x.clone(),
            [only] => self.member_call(only, direction, &x, needs),
            _ => {
                let (chain, last) = self.heuristic_chain(union, &complex, direction, &x, needs)?;
                branches.extend(chain);
                last
            }
        };

        Ok(if_chain(branches, TsStmt::Return(Some(fallback))))
    }

    fn member_call(
        &self,
        member: &Value,
        direction: Direction,
        x: &TsExpr,
        needs: &mut ImportSet,
    ) -> TsExpr {
        self.convert(&strip_modifiers(member), direction, x, needs)
            .unwrap_or_else(|| x.clone())
    }

    /// `(condition, mapper call)` per complex member, plus the fallback call.
    fn heuristic_chain(
        &self,
        union: &str,
        complex: &[&Value],
        direction: Direction,
        x: &TsExpr,
        needs: &mut ImportSet,
    ) -> GenerateResult<(Vec<(TsExpr, TsExpr)>, TsExpr)> {
        let unknown = MemberShape {
            properties: vec![],
            open: true,
        };
        let shapes: Vec<Option<MemberShape>> = complex
            .iter()
            .map(|m| member_shape(m, self.renderer.table()))
            .collect();

        let mut tests: Vec<Option<TsExpr>> = Vec::with_capacity(complex.len());
        for (i, shape) in shapes.iter().enumerate() {
            let test = shape.as_ref().and_then(|shape| {
                let others: Vec<&MemberShape> = shapes
                    .iter()
                    .enumerate()
                    .filter(|(j, _)| *j != i)
                    .map(|(_, s)| s.as_ref().unwrap_or(&unknown))
                    .collect();
                heuristics(shape, &others)
                    .first()
                    .map(|h| heuristic_test(h, direction.source(), x))
            });
            tests.push(test);
        }

        let untested: Vec<usize> = (0..complex.len()).filter(|&i| tests[i].is_none()).collect();
        let fallback = match untested.as_slice() {
            [] => complex.len() - 1,
            [only] => *only,
            [_, second, ..] => {
                warn!(union, member = %complex[*second].type_name(), "No discriminating heuristic.");
                return Err(GenerateError::NoDiscriminatingHeuristic {
                    union: union.to_string(),
                    member: complex[*second].type_name().to_string(),
                });
            }
        };

        let mut chain = Vec::new();
        for (i, member) in complex.iter().enumerate() {
            if i == fallback {
                continue;
            }
            if let Some(test) = tests[i].take() {
                chain.push((test, self.member_call(member, direction, x, needs)));
            }
        }
        Ok((chain, self.member_call(complex[fallback], direction, x, needs)))
    }
}

/// `compact` helper: drops `undefined` entries so absent values stay absent.
pub fn compact_helper() -> TsFunction {
    TsFunction::raw(
        r#"function compact<T extends object>(value: T): T {
  return Object.fromEntries(
    Object.entries(value).filter(([, entry]) => typeof entry !== 'undefined'),
  ) as T;
}"#,
    )
}

fn convert_date(kind: Primitive, direction: Direction, value: TsExpr) -> TsExpr {
    match (direction, kind) {
        (Direction::WireToInternal, _) => TsExpr::new_of("Date", vec![value]),
        (Direction::InternalToWire, Primitive::Date) => TsExpr::Index {
            object: Box::new(
                value
                    .method("toISOString", vec![])
                    .method("split", vec![TsExpr::string("T")]),
            ),
            index: Box::new(TsExpr::Literal(TsLiteral::Int(0))),
        },
        (Direction::InternalToWire, _) => value.method("toISOString", vec![]),
    }
}

fn guard(value: &Value, accessor: TsExpr, inner: TsExpr) -> TsExpr {
    let is_undefined = || accessor.clone().type_is("undefined");
    let is_null = || {
        TsExpr::bin(
            accessor.clone(),
            BinOp::StrictEqual,
            TsExpr::Literal(TsLiteral::Null),
        )
    };
    let cond = match (value.is_optional, value.is_nullable) {
        (false, false) => return inner,
        (true, false) => is_undefined(),
        (false, true) => is_null(),
        (true, true) => TsExpr::bin(is_undefined(), BinOp::Or, is_null()),
    };
    TsExpr::ternary(cond, accessor, inner)
}

fn strip_modifiers(value: &Value) -> Value {
    let mut bare = value.clone();
    bare.is_optional = false;
    bare.is_nullable = false;
    bare
}

/// `typeof x === 'undefined'` and `x === null` when some member admits them.
fn absent_tests(members: &[Value], x: &TsExpr) -> Vec<TsExpr> {
    let mut tests = Vec::new();
    if members.iter().any(|m| m.is_optional) {
        tests.push(x.clone().type_is("undefined"));
    }
    if members.iter().any(|m| m.is_nullable) {
        tests.push(TsExpr::bin(
            x.clone(),
            BinOp::StrictEqual,
            TsExpr::Literal(TsLiteral::Null),
        ));
    }
    tests
}

fn primitive_test(value: &Value, direction: Direction, x: &TsExpr) -> Option<TsExpr> {
    if let Some(constant) = value.constant_value() {
        return Some(TsExpr::bin(
            x.clone(),
            BinOp::StrictEqual,
            TsExpr::Literal(constant_literal(constant)),
        ));
    }
    let kind = value.primitive_kind()?;
    let typeof_kind = match kind {
        Primitive::Date | Primitive::DateTime => match direction {
            Direction::WireToInternal => "string",
            Direction::InternalToWire => {
                return Some(TsExpr::bin(
                    x.clone(),
                    BinOp::InstanceOf,
                    TsExpr::ident("Date"),
                ));
            }
        },
        Primitive::String | Primitive::Binary => "string",
        Primitive::Number
        | Primitive::Integer
        | Primitive::Long
        | Primitive::Float
        | Primitive::Double => "number",
        Primitive::Boolean => "boolean",
        Primitive::Null => {
            return Some(TsExpr::bin(
                x.clone(),
                BinOp::StrictEqual,
                TsExpr::Literal(TsLiteral::Null),
            ));
        }
        Primitive::Untyped => return None,
    };
    Some(x.clone().type_is(typeof_kind))
}

fn heuristic_test(heuristic: &Heuristic, facet: Facet, x: &TsExpr) -> TsExpr {
    let has = |name: &str| {
        TsExpr::bin(
            TsExpr::string(Renderer::property_key(name, facet)),
            BinOp::In,
            x.clone(),
        )
    };
    match heuristic {
        Heuristic::RequiredProperty(name) => has(name),
        Heuristic::ConstantValue(name, constant) => TsExpr::bin(
            has(name),
            BinOp::And,
            TsExpr::bin(
                x.clone().member(&Renderer::property_key(name, facet)),
                BinOp::StrictEqual,
                TsExpr::Literal(constant_literal(constant)),
            ),
        ),
        Heuristic::RequiredProperties(names) => {
            let mut tests = names.iter().map(|n| has(n));
            let first = tests
                .next()
                .unwrap_or(TsExpr::Literal(TsLiteral::Bool(true)));
            tests.fold(first, |acc, t| TsExpr::bin(acc, BinOp::And, t))
        }
    }
}

fn if_chain(branches: Vec<(TsExpr, TsExpr)>, fallback: TsStmt) -> Vec<TsStmt> {
    branches
        .into_iter()
        .rev()
        .fold(vec![fallback], |else_body, (cond, result)| {
            vec![TsStmt::If {
                cond,
                then_body: vec![TsStmt::Return(Some(result))],
                else_body: Some(else_body),
            }]
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::classify::TypeTable;
    use crate::config::GeneratorOptions;
    use crate::ts::Emit;
    use pretty_assertions::assert_eq;
    use wiremap_ir::{Constant, Property, Service};

    fn prop(name: &str, value: Value) -> Property {
        Property {
            name: name.into(),
            value,
            description: None,
            deprecated: false,
        }
    }

    fn record(name: &str, props: Vec<Property>) -> Type {
        Type {
            name: name.into(),
            description: None,
            deprecated: false,
            properties: props,
            map_properties: None,
            rules: vec![],
        }
    }

    fn service(types: Vec<Type>, unions: Vec<Union>) -> Service {
        Service {
            title: "test".into(),
            description: None,
            interfaces: vec![],
            types,
            enums: vec![],
            unions,
        }
    }

    fn with_mapper<R>(service: &Service, module: Module, f: impl FnOnce(Mapper<'_>) -> R) -> R {
        let table = TypeTable::new(service);
        let options = GeneratorOptions::default();
        let renderer = Renderer::new(&table, &options, module);
        f(Mapper::new(renderer))
    }

    #[test]
    fn test_optional_date_to_wire() {
        let service = service(vec![], vec![]);
        let value = Value::primitive(Primitive::Date).optional();
        let expr = with_mapper(&service, Module::Mappers, |m| {
            m.map_expression(
                &value,
                Role::ServerOutbound,
                TsExpr::ident("obj").member("propA"),
                &mut ImportSet::new(),
            )
        });
        assert_eq!(
            expr.emit(),
            "typeof obj.propA === 'undefined' ? obj.propA : obj.propA.toISOString().split('T')[0]"
        );
    }

    #[test]
    fn test_guard_nesting_for_all_modifier_combinations() {
        let service = service(vec![], vec![]);
        let rendered: Vec<String> = with_mapper(&service, Module::Mappers, |m| {
            (0..8u8)
                .map(|bits| {
                    let mut value = Value::primitive(Primitive::DateTime);
                    value.is_array = bits & 1 != 0;
                    value.is_optional = bits & 2 != 0;
                    value.is_nullable = bits & 4 != 0;
                    m.map_value(
                        &value,
                        Direction::WireToInternal,
                        TsExpr::ident("x"),
                        &mut ImportSet::new(),
                    )
                    .emit()
                })
                .collect()
        });
        assert_eq!(
            rendered,
            vec![
                "new Date(x)",
                "x.map((item) => new Date(item))",
                "typeof x === 'undefined' ? x : new Date(x)",
                "typeof x === 'undefined' ? x : x.map((item) => new Date(item))",
                "x === null ? x : new Date(x)",
                "x === null ? x : x.map((item) => new Date(item))",
                "typeof x === 'undefined' || x === null ? x : new Date(x)",
                "typeof x === 'undefined' || x === null ? x : x.map((item) => new Date(item))",
            ]
        );
    }

    #[test]
    fn test_identity_values_are_unguarded() {
        let service = service(vec![], vec![]);
        with_mapper(&service, Module::Mappers, |m| {
            let mut needs = ImportSet::new();
            for value in [
                Value::primitive(Primitive::String).optional().nullable(),
                Value::primitive(Primitive::Integer).array(),
                Value::complex("ghost").optional(),
            ] {
                let expr = m.map_value(&value, Direction::InternalToWire, TsExpr::ident("x"), &mut needs);
                assert_eq!(expr, TsExpr::ident("x"));
            }
        });
    }

    #[test]
    fn test_complex_values_delegate_to_mappers() {
        let service = service(vec![record("widget", vec![])], vec![]);
        let mut needs = ImportSet::new();
        let (single, list) = with_mapper(&service, Module::Routes, |m| {
            (
                m.map_expression(
                    &Value::complex("widget").nullable(),
                    Role::ClientInbound,
                    TsExpr::ident("body"),
                    &mut needs,
                ),
                m.map_expression(
                    &Value::complex("widget").array().optional(),
                    Role::ClientOutbound,
                    TsExpr::ident("params").member("items"),
                    &mut needs,
                ),
            )
        });
        assert_eq!(
            single.emit(),
            "body === null ? body : mappers.mapFromWidgetDto(body)"
        );
        assert_eq!(
            list.emit(),
            "typeof params.items === 'undefined' ? params.items : params.items.map(mappers.mapToWidgetDto)"
        );
        assert_eq!(needs.to_imports()[0].emit(), "import * as mappers from './mappers';\n");
    }

    #[test]
    fn test_roles_collapse_to_directions() {
        assert_eq!(
            Role::for_payload(Side::Server, Payload::Params).direction(),
            Direction::WireToInternal
        );
        assert_eq!(
            Role::for_payload(Side::Server, Payload::Returns).direction(),
            Direction::InternalToWire
        );
        assert_eq!(
            Role::for_payload(Side::Client, Payload::Params).direction(),
            Direction::InternalToWire
        );
        assert_eq!(
            Role::for_payload(Side::Client, Payload::Returns).direction(),
            Direction::WireToInternal
        );
    }

    #[test]
    fn test_record_mapper_pair() {
        let ty = record(
            "widget",
            vec![
                prop("id", Value::primitive(Primitive::String)),
                prop("created_at", Value::primitive(Primitive::DateTime).optional()),
                prop("part", Value::complex("part").nullable()),
            ],
        );
        let service = service(vec![ty.clone(), record("part", vec![])], vec![]);
        let mut needs = ImportSet::new();
        let (from, to) = with_mapper(&service, Module::Mappers, |m| {
            (
                m.record_mapper(&ty, Direction::WireToInternal, &mut needs).unwrap(),
                m.record_mapper(&ty, Direction::InternalToWire, &mut needs).unwrap(),
            )
        });
        assert_eq!(
            from.emit(),
            "export function mapFromWidgetDto(dto: dtos.WidgetDto): types.Widget {
  const { id, created_at: createdAt, part } = dto;
  return compact({ id, createdAt: typeof createdAt === 'undefined' ? createdAt : new Date(createdAt), part: part === null ? part : mapFromPartDto(part) });
}
"
        );
        assert_eq!(
            to.emit(),
            "export function mapToWidgetDto(model: types.Widget): dtos.WidgetDto {
  const { id, createdAt, part } = model;
  return compact({ id, created_at: typeof createdAt === 'undefined' ? createdAt : createdAt.toISOString(), part: part === null ? part : mapToPartDto(part) });
}
"
        );
        assert!(needs.needs_helper(Helper::Compact));
    }

    #[test]
    fn test_record_mapper_folds_open_map() {
        let mut ty = record("stamps", vec![prop("label", Value::primitive(Primitive::String))]);
        ty.map_properties = Some(MapProperties {
            key: Value::primitive(Primitive::String),
            value: Value::primitive(Primitive::Date),
            required_keys: vec!["first".into()],
        });
        let service = service(vec![ty.clone()], vec![]);
        let from = with_mapper(&service, Module::Mappers, |m| {
            m.record_mapper(&ty, Direction::WireToInternal, &mut ImportSet::new())
                .unwrap()
        });
        assert_eq!(
            from.emit(),
            "export function mapFromStampsDto(dto: dtos.StampsDto): types.Stamps {
  const { label, first, ...rest } = dto;
  return compact({ label, first: new Date(first), ...Object.fromEntries(Object.entries(rest).map(([key, value]) => [key, new Date(value)])) });
}
"
        );
    }

    #[test]
    fn test_record_mapper_without_compact() {
        let ty = record("point", vec![prop("x", Value::primitive(Primitive::Number))]);
        let service = service(vec![ty.clone()], vec![]);
        let mut needs = ImportSet::new();
        let to = with_mapper(&service, Module::Mappers, |m| {
            m.record_mapper(&ty, Direction::InternalToWire, &mut needs).unwrap()
        });
        assert_eq!(
            to.emit(),
            "export function mapToPointDto(model: types.Point): dtos.PointDto {
  const { x } = model;
  return { x };
}
"
        );
        assert!(!needs.needs_helper(Helper::Compact));
    }

    #[test]
    fn test_simple_union_of_disjoint_records() {
        let union = Union::Simple {
            name: "either".into(),
            description: None,
            members: vec![Value::complex("typeA"), Value::complex("typeB")],
        };
        let service = service(
            vec![
                record("typeA", vec![prop("propA", Value::primitive(Primitive::String))]),
                record("typeB", vec![prop("propB", Value::primitive(Primitive::String))]),
            ],
            vec![union.clone()],
        );
        let from = with_mapper(&service, Module::Mappers, |m| {
            m.union_mapper(&union, Direction::WireToInternal, &mut ImportSet::new())
                .unwrap()
        });
        assert_eq!(
            from.emit(),
            "export function mapFromEitherDto(dto: dtos.EitherDto): types.Either {
  if ('propA' in dto) {
    return mapFromTypeADto(dto);
  } else {
    return mapFromTypeBDto(dto);
  }
}
"
        );
    }

    #[test]
    fn test_simple_union_of_primitives_and_one_record() {
        let union = Union::Simple {
            name: "when".into(),
            description: None,
            members: vec![
                Value::primitive(Primitive::String),
                Value::complex("window"),
                Value::primitive(Primitive::DateTime),
                Value::primitive(Primitive::Number),
            ],
        };
        let service = service(vec![record("window", vec![])], vec![union.clone()]);
        let (from, to) = with_mapper(&service, Module::Mappers, |m| {
            let mut needs = ImportSet::new();
            (
                m.union_mapper(&union, Direction::WireToInternal, &mut needs).unwrap(),
                m.union_mapper(&union, Direction::InternalToWire, &mut needs).unwrap(),
            )
        });
        assert_eq!(
            from.emit(),
            "export function mapFromWhenDto(dto: dtos.WhenDto): types.When {
  if (typeof dto === 'string') {
    return new Date(dto);
  } else if (typeof dto === 'number') {
    return dto;
  } else {
    return mapFromWindowDto(dto);
  }
}
"
        );
        assert_eq!(
            to.emit(),
            "export function mapToWhenDto(model: types.When): dtos.WhenDto {
  if (model instanceof Date) {
    return model.toISOString();
  } else if (typeof model === 'string' || typeof model === 'number') {
    return model;
  } else {
    return mapToWindowDto(model);
  }
}
"
        );
    }

    #[test]
    fn test_simple_union_of_primitives_only() {
        let union = Union::Simple {
            name: "scalar".into(),
            description: None,
            members: vec![
                Value::primitive(Primitive::Boolean),
                Value::primitive(Primitive::Integer),
            ],
        };
        let service = service(vec![], vec![union.clone()]);
        let to = with_mapper(&service, Module::Mappers, |m| {
            m.union_mapper(&union, Direction::InternalToWire, &mut ImportSet::new())
                .unwrap()
        });
        assert_eq!(
            to.emit(),
            "export function mapToScalarDto(model: types.Scalar): dtos.ScalarDto {\n  return model;\n}\n"
        );
    }

    #[test]
    fn test_member_without_heuristic_moves_to_fallback() {
        let union = Union::Simple {
            name: "shape".into(),
            description: None,
            members: vec![
                Value::complex("base"),
                Value::complex("circle"),
                Value::complex("square"),
            ],
        };
        let mut circle = record(
            "circle",
            vec![
                prop("kind", Value::constant(Constant::String("circle".into()))),
                prop("radius", Value::primitive(Primitive::Number)),
            ],
        );
        circle.description = Some("A circle".into());
        let square = record(
            "square",
            vec![
                prop("kind", Value::constant(Constant::String("square".into()))),
                prop("side", Value::primitive(Primitive::Number)),
            ],
        );
        // `base` is a structural subset of both others.
        let base = record("base", vec![prop("kind", Value::primitive(Primitive::String))]);
        let service = service(vec![base, circle, square], vec![union.clone()]);
        let to = with_mapper(&service, Module::Mappers, |m| {
            m.union_mapper(&union, Direction::InternalToWire, &mut ImportSet::new())
                .unwrap()
        });
        assert_eq!(
            to.emit(),
            "export function mapToShapeDto(model: types.Shape): dtos.ShapeDto {
  if ('radius' in model) {
    return mapToCircleDto(model);
  } else if ('side' in model) {
    return mapToSquareDto(model);
  } else {
    return mapToBaseDto(model);
  }
}
"
        );
    }

    #[test]
    fn test_indistinguishable_members_are_an_error() {
        let union = Union::Simple {
            name: "dup".into(),
            description: None,
            members: vec![
                Value::complex("a"),
                Value::complex("b"),
                Value::complex("c"),
            ],
        };
        let same = |name: &str| record(name, vec![prop("id", Value::primitive(Primitive::String))]);
        let service = service(vec![same("a"), same("b"), same("c")], vec![union.clone()]);
        let err = with_mapper(&service, Module::Mappers, |m| {
            m.union_mapper(&union, Direction::WireToInternal, &mut ImportSet::new())
                .unwrap_err()
        });
        assert_eq!(
            err,
            GenerateError::NoDiscriminatingHeuristic {
                union: "dup".into(),
                member: "b".into(),
            }
        );
    }

    fn simple(name: &str, members: Vec<Value>) -> Union {
        Union::Simple {
            name: name.into(),
            description: None,
            members,
        }
    }

    fn mapper_result(service: &Service, direction: Direction) -> GenerateResult<String> {
        with_mapper(service, Module::Mappers, |m| {
            m.union_mapper(&service.unions[0], direction, &mut ImportSet::new())
                .map(|f| f.emit())
        })
    }

    #[test]
    fn test_lists_of_different_records_are_an_error() {
        let service = service(
            vec![
                record("widget", vec![prop("w", Value::primitive(Primitive::String))]),
                record("gadget", vec![prop("g", Value::primitive(Primitive::String))]),
            ],
            vec![simple(
                "lists",
                vec![Value::complex("widget").array(), Value::complex("gadget").array()],
            )],
        );
        assert_eq!(
            mapper_result(&service, Direction::InternalToWire).unwrap_err(),
            GenerateError::AmbiguousMemberTest {
                union: "lists".into(),
                member: "gadget".into(),
            }
        );
    }

    #[test]
    fn test_scalar_list_beside_record_list_is_an_error() {
        let service = service(
            vec![record("widget", vec![])],
            vec![simple(
                "lists",
                vec![
                    Value::primitive(Primitive::String).array(),
                    Value::complex("widget").array(),
                ],
            )],
        );
        assert_eq!(
            mapper_result(&service, Direction::WireToInternal).unwrap_err(),
            GenerateError::AmbiguousMemberTest {
                union: "lists".into(),
                member: "widget".into(),
            }
        );
    }

    #[test]
    fn test_single_record_list_member() {
        let service = service(
            vec![record("widget", vec![])],
            vec![simple(
                "items",
                vec![
                    Value::primitive(Primitive::String),
                    Value::complex("widget").array(),
                ],
            )],
        );
        assert_eq!(
            mapper_result(&service, Direction::InternalToWire).unwrap(),
            "export function mapToItemsDto(model: types.Items): dtos.ItemsDto {
  if (Array.isArray(model)) {
    return model.map(mapToWidgetDto);
  } else {
    return model;
  }
}
"
        );
    }

    #[test]
    fn test_date_kinds_sharing_a_test() {
        let service = service(
            vec![],
            vec![simple(
                "stamp",
                vec![
                    Value::primitive(Primitive::Date),
                    Value::primitive(Primitive::DateTime),
                ],
            )],
        );
        // Both arrive as strings and both become a Date.
        assert_eq!(
            mapper_result(&service, Direction::WireToInternal).unwrap(),
            "export function mapFromStampDto(dto: dtos.StampDto): types.Stamp {
  if (typeof dto === 'string') {
    return new Date(dto);
  } else {
    return dto;
  }
}
"
        );
        // A Date cannot tell which wire format it belongs to.
        assert_eq!(
            mapper_result(&service, Direction::InternalToWire).unwrap_err(),
            GenerateError::AmbiguousMemberTest {
                union: "stamp".into(),
                member: "date-time".into(),
            }
        );
    }

    #[test]
    fn test_nullable_member_passes_null_through() {
        let service = service(
            vec![record("widget", vec![])],
            vec![simple(
                "label",
                vec![
                    Value::primitive(Primitive::String),
                    Value::complex("widget").nullable(),
                ],
            )],
        );
        assert_eq!(
            mapper_result(&service, Direction::InternalToWire).unwrap(),
            "export function mapToLabelDto(model: types.Label): dtos.LabelDto {
  if (model === null || typeof model === 'string') {
    return model;
  } else {
    return mapToWidgetDto(model);
  }
}
"
        );
    }

    #[test]
    fn test_absent_values_skip_heuristic_chain() {
        let service = service(
            vec![
                record("circle", vec![prop("radius", Value::primitive(Primitive::Number))]),
                record("square", vec![prop("side", Value::primitive(Primitive::Number))]),
            ],
            vec![simple(
                "shape",
                vec![
                    Value::complex("circle").nullable(),
                    Value::complex("square").optional(),
                ],
            )],
        );
        assert_eq!(
            mapper_result(&service, Direction::WireToInternal).unwrap(),
            "export function mapFromShapeDto(dto: dtos.ShapeDto): types.Shape {
  if (typeof dto === 'undefined' || dto === null) {
    return dto;
  } else if ('radius' in dto) {
    return mapFromCircleDto(dto);
  } else {
    return mapFromSquareDto(dto);
  }
}
"
        );
    }

    #[test]
    fn test_nullable_constant_does_not_discriminate() {
        let kind = |c: &str| Value::constant(Constant::String(c.into()));
        let service = service(
            vec![
                record(
                    "circle",
                    vec![
                        prop("kind", kind("circle").nullable()),
                        prop("size", Value::primitive(Primitive::Number)),
                    ],
                ),
                record(
                    "square",
                    vec![
                        prop("kind", kind("square")),
                        prop("size", Value::primitive(Primitive::Number)),
                    ],
                ),
            ],
            vec![simple("shape", vec![Value::complex("circle"), Value::complex("square")])],
        );
        // A circle with a null kind would fail `dto.kind === 'circle'`.
        assert_eq!(
            mapper_result(&service, Direction::WireToInternal).unwrap_err(),
            GenerateError::NoDiscriminatingHeuristic {
                union: "shape".into(),
                member: "square".into(),
            }
        );
    }

    #[test]
    fn test_discriminated_union_switch() {
        let union = Union::Discriminated {
            name: "pet".into(),
            description: None,
            discriminator: "pet_type".into(),
            members: vec![Value::complex("cat"), Value::complex("dog")],
        };
        let member = |name: &str| {
            record(
                name,
                vec![prop("pet_type", Value::constant(Constant::String(name.into())))],
            )
        };
        let service = service(vec![member("cat"), member("dog")], vec![union.clone()]);
        let (from, to) = with_mapper(&service, Module::Mappers, |m| {
            let mut needs = ImportSet::new();
            (
                m.union_mapper(&union, Direction::WireToInternal, &mut needs).unwrap(),
                m.union_mapper(&union, Direction::InternalToWire, &mut needs).unwrap(),
            )
        });
        assert_eq!(
            from.emit(),
            "export function mapFromPetDto(dto: dtos.PetDto): types.Pet {
  switch (dto.pet_type) {
    case 'cat':
      return mapFromCatDto(dto);
    case 'dog':
      return mapFromDogDto(dto);
  }
  throw new Error('Unexpected pet_type for Pet');
}
"
        );
        assert!(to.emit().contains("switch (model.petType) {"));
    }

    #[test]
    fn test_discriminated_union_errors() {
        let union = Union::Discriminated {
            name: "pet".into(),
            description: None,
            discriminator: "type".into(),
            members: vec![Value::complex("cat")],
        };
        let service = service(
            vec![record("cat", vec![prop("type", Value::primitive(Primitive::String))])],
            vec![union.clone()],
        );
        let err = with_mapper(&service, Module::Mappers, |m| {
            m.union_mapper(&union, Direction::WireToInternal, &mut ImportSet::new())
                .unwrap_err()
        });
        assert!(matches!(err, GenerateError::MissingDiscriminatorValue { member, .. } if member == "cat"));

        let union = Union::Discriminated {
            name: "pet".into(),
            description: None,
            discriminator: "type".into(),
            members: vec![Value::primitive(Primitive::String)],
        };
        let err = with_mapper(&service, Module::Mappers, |m| {
            m.union_mapper(&union, Direction::WireToInternal, &mut ImportSet::new())
                .unwrap_err()
        });
        assert!(matches!(err, GenerateError::DiscriminatedMemberNotRecord { .. }));
    }
}
