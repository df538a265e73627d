//! Value classification and declaration lookup.

use std::collections::HashMap;

use tracing::warn;
use wiremap_ir::{Enum, MapProperties, Property, Service, Type, Union, Value, ValueTarget};

use crate::error::{GenerateError, GenerateResult};

/// A declaration a complex value can refer to.
#[derive(Debug, Clone, Copy)]
pub enum Declaration<'a> {
    /// Record.
    Type(&'a Type),
    /// Enum.
    Enum(&'a Enum),
    /// Union.
    Union(&'a Union),
}

/// Name lookup over the three declaration namespaces of a service.
#[derive(Debug)]
pub struct TypeTable<'a> {
    types: HashMap<&'a str, &'a Type>,
    enums: HashMap<&'a str, &'a Enum>,
    unions: HashMap<&'a str, &'a Union>,
}

impl<'a> TypeTable<'a> {
    /// Index every declaration of `service`.
    pub fn new(service: &'a Service) -> Self {
        Self {
            types: service.types.iter().map(|t| (t.name.as_str(), t)).collect(),
            enums: service.enums.iter().map(|e| (e.name.as_str(), e)).collect(),
            unions: service.unions.iter().map(|u| (u.name(), u)).collect(),
        }
    }

    /// Resolve a declaration by name.
    pub fn resolve(&self, name: &str) -> Option<Declaration<'a>> {
        if let Some(&ty) = self.types.get(name) {
            Some(Declaration::Type(ty))
        } else if let Some(&e) = self.enums.get(name) {
            Some(Declaration::Enum(e))
        } else {
            self.unions.get(name).map(|&u| Declaration::Union(u))
        }
    }

    /// Record by name.
    pub fn record(&self, name: &str) -> Option<&'a Type> {
        self.types.get(name).copied()
    }

    /// Whether `value` refers to an enum.
    pub fn is_enum(&self, value: &Value) -> bool {
        value
            .complex_name()
            .is_some_and(|name| self.enums.contains_key(name))
    }
}

/// Shape category of a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueShape {
    /// A scalar primitive.
    Primitive,
    /// A list of primitives.
    PrimitiveArray,
    /// A reference to an enum (scalar or list).
    EnumRef,
    /// A reference to a record or union.
    ComplexRef,
    /// A list of records or unions.
    ComplexArray,
    /// A reference to a record whose only content is a map clause.
    MapValue,
    /// A reference that names no declaration.
    Unresolved,
}

/// Classify `value` against the declarations in `table`.
pub fn classify(value: &Value, table: &TypeTable<'_>) -> ValueShape {
    match &value.target {
        ValueTarget::Primitive { .. } if value.is_array => ValueShape::PrimitiveArray,
        ValueTarget::Primitive { .. } => ValueShape::Primitive,
        ValueTarget::Complex { type_name } => match table.resolve(type_name) {
            None => {
                warn!(type_name = %type_name, "Unresolved reference, falling back to unknown.");
                ValueShape::Unresolved
            }
            Some(Declaration::Enum(_)) => ValueShape::EnumRef,
            Some(_) if value.is_array => ValueShape::ComplexArray,
            Some(Declaration::Type(ty))
                if ty.properties.is_empty() && ty.map_properties.is_some() =>
            {
                ValueShape::MapValue
            }
            Some(_) => ValueShape::ComplexRef,
        },
    }
}

/// Validated structure of a record: what is declared and whether the map
/// clause survives the maximum-property rule.
#[derive(Debug, Clone, Copy)]
pub struct RecordLayout<'a> {
    /// Declared properties in order.
    pub properties: &'a [Property],
    /// Keys guaranteed present in the map.
    pub required_keys: &'a [String],
    /// Map clause, if any.
    pub map: Option<&'a MapProperties>,
    /// The map clause is present but cannot add keys.
    pub map_elided: bool,
}

impl RecordLayout<'_> {
    /// Map clause still open to additional keys.
    pub fn open_map(&self) -> Option<&MapProperties> {
        if self.map_elided { None } else { self.map }
    }

    /// Declared properties plus required map keys.
    pub fn fixed_count(&self) -> usize {
        self.properties.len() + self.required_keys.len()
    }
}

/// Check a record's map and maximum-property rules and describe its layout.
pub fn record_layout(ty: &Type) -> GenerateResult<RecordLayout<'_>> {
    let required_keys = ty.required_keys();
    if let Some(key) = required_keys
        .iter()
        .find(|key| ty.properties.iter().any(|p| &p.name == *key))
    {
        return Err(GenerateError::MapKeyCollision {
            type_name: ty.name.clone(),
            key: key.clone(),
        });
    }

    let count = ty.properties.len() + required_keys.len();
    let max = ty.max_properties();
    if let Some(max) = max
        && max < count
    {
        return Err(GenerateError::InvalidMaxProperties {
            type_name: ty.name.clone(),
            max,
            count,
        });
    }

    let map = ty.map_properties.as_ref();
    let map_elided = map.is_some() && count > 0 && max == Some(count);
    Ok(RecordLayout {
        properties: &ty.properties,
        required_keys,
        map,
        map_elided,
    })
}
