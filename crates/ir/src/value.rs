//! Abstract value descriptions.
//!
//! A [`Value`] is the unit every renderer and mapper works on: a primitive or
//! a named complex reference, plus three independent modifiers (array,
//! optional, nullable).

use std::fmt;

use serde::Deserialize;

/// An abstract value: what a property, parameter, return value, map key or
/// union member holds.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Value {
    /// What the value refers to.
    #[serde(flatten)]
    pub target: ValueTarget,
    /// The value is a list of `target`.
    #[serde(default)]
    pub is_array: bool,
    /// The value may be absent.
    #[serde(default)]
    pub is_optional: bool,
    /// The value may be `null`.
    #[serde(default)]
    pub is_nullable: bool,
}

/// Primitive or complex target of a [`Value`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ValueTarget {
    /// A scalar, optionally narrowed to a single literal.
    Primitive {
        /// Scalar kind.
        #[serde(rename = "typeName")]
        type_name: Primitive,
        /// Literal the value is narrowed to.
        #[serde(default)]
        constant: Option<Constant>,
    },
    /// A reference to a type, enum or union declared by the service.
    Complex {
        /// Name of the referenced declaration.
        #[serde(rename = "typeName")]
        type_name: String,
    },
}

/// Scalar kinds understood by the generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Primitive {
    /// Text.
    String,
    /// Generic number.
    Number,
    /// 32-bit integer.
    Integer,
    /// 64-bit integer.
    Long,
    /// Single precision float.
    Float,
    /// Double precision float.
    Double,
    /// `true` / `false`.
    Boolean,
    /// Calendar date, `YYYY-MM-DD` on the wire.
    Date,
    /// Timestamp, full ISO 8601 on the wire.
    DateTime,
    /// Opaque bytes, base64 text on the wire.
    Binary,
    /// The `null` value itself.
    Null,
    /// Anything.
    Untyped,
}

impl Primitive {
    /// IR spelling of the kind.
    pub fn as_str(self) -> &'static str {
        match self {
            Primitive::String => "string",
            Primitive::Number => "number",
            Primitive::Integer => "integer",
            Primitive::Long => "long",
            Primitive::Float => "float",
            Primitive::Double => "double",
            Primitive::Boolean => "boolean",
            Primitive::Date => "date",
            Primitive::DateTime => "date-time",
            Primitive::Binary => "binary",
            Primitive::Null => "null",
            Primitive::Untyped => "untyped",
        }
    }

    /// Date-like kinds travel as ISO strings and live as `Date` objects.
    pub fn is_date_like(self) -> bool {
        matches!(self, Primitive::Date | Primitive::DateTime)
    }

    /// Any of the numeric kinds.
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            Primitive::Number
                | Primitive::Integer
                | Primitive::Long
                | Primitive::Float
                | Primitive::Double
        )
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A literal a primitive value is narrowed to.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Constant {
    /// String literal.
    String(String),
    /// Boolean literal.
    Boolean(bool),
    /// Integer literal.
    Integer(i64),
    /// Floating point literal.
    Number(f64),
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constant::String(s) => write!(f, "{s:?}"),
            Constant::Boolean(b) => write!(f, "{b}"),
            Constant::Integer(i) => write!(f, "{i}"),
            Constant::Number(n) => write!(f, "{n}"),
        }
    }
}

impl Value {
    /// A required, non-null, scalar primitive.
    pub fn primitive(kind: Primitive) -> Self {
        Self::bare(ValueTarget::Primitive {
            type_name: kind,
            constant: None,
        })
    }

    /// A required, non-null reference to a named declaration.
    pub fn complex(type_name: impl Into<String>) -> Self {
        Self::bare(ValueTarget::Complex {
            type_name: type_name.into(),
        })
    }

    /// A primitive narrowed to `constant`; the kind follows the literal.
    pub fn constant(constant: Constant) -> Self {
        let kind = match constant {
            Constant::String(_) => Primitive::String,
            Constant::Boolean(_) => Primitive::Boolean,
            Constant::Integer(_) => Primitive::Integer,
            Constant::Number(_) => Primitive::Number,
        };
        Self::bare(ValueTarget::Primitive {
            type_name: kind,
            constant: Some(constant),
        })
    }

    fn bare(target: ValueTarget) -> Self {
        Self {
            target,
            is_array: false,
            is_optional: false,
            is_nullable: false,
        }
    }

    /// Mark as a list.
    pub fn array(mut self) -> Self {
        self.is_array = true;
        self
    }

    /// Mark as optional.
    pub fn optional(mut self) -> Self {
        self.is_optional = true;
        self
    }

    /// Mark as nullable.
    pub fn nullable(mut self) -> Self {
        self.is_nullable = true;
        self
    }

    /// Primitive kind or referenced declaration name.
    pub fn type_name(&self) -> &str {
        match &self.target {
            ValueTarget::Primitive { type_name, .. } => type_name.as_str(),
            ValueTarget::Complex { type_name } => type_name,
        }
    }

    /// The primitive kind, when this is a primitive.
    pub fn primitive_kind(&self) -> Option<Primitive> {
        match &self.target {
            ValueTarget::Primitive { type_name, .. } => Some(*type_name),
            ValueTarget::Complex { .. } => None,
        }
    }

    /// The literal this value is narrowed to, if any.
    pub fn constant_value(&self) -> Option<&Constant> {
        match &self.target {
            ValueTarget::Primitive { constant, .. } => constant.as_ref(),
            ValueTarget::Complex { .. } => None,
        }
    }

    /// The referenced declaration name, when this is a complex reference.
    pub fn complex_name(&self) -> Option<&str> {
        match &self.target {
            ValueTarget::Complex { type_name } => Some(type_name),
            ValueTarget::Primitive { .. } => None,
        }
    }

    /// Primitive `date` or `date-time`.
    pub fn is_date_like(&self) -> bool {
        self.primitive_kind().is_some_and(Primitive::is_date_like)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_primitive_with_modifiers() {
        let value: Value = serde_json::from_str(
            r#"{ "kind": "primitive", "typeName": "date-time", "isArray": true, "isNullable": true }"#,
        )
        .unwrap();
        assert_eq!(value.primitive_kind(), Some(Primitive::DateTime));
        assert!(value.is_array);
        assert!(value.is_nullable);
        assert!(!value.is_optional);
        assert!(value.is_date_like());
    }

    #[test]
    fn test_deserialize_constant() {
        let value: Value = serde_json::from_str(
            r#"{ "kind": "primitive", "typeName": "string", "constant": "circle" }"#,
        )
        .unwrap();
        assert_eq!(
            value.constant_value(),
            Some(&Constant::String("circle".into()))
        );

        let value: Value =
            serde_json::from_str(r#"{ "kind": "primitive", "typeName": "integer", "constant": 3 }"#)
                .unwrap();
        assert_eq!(value.constant_value(), Some(&Constant::Integer(3)));
    }

    #[test]
    fn test_deserialize_complex() {
        let value: Value =
            serde_json::from_str(r#"{ "kind": "complex", "typeName": "widget", "isOptional": true }"#)
                .unwrap();
        assert_eq!(value.complex_name(), Some("widget"));
        assert!(value.is_optional);
        assert_eq!(value.primitive_kind(), None);
    }

    #[test]
    fn test_builders() {
        let value = Value::primitive(Primitive::Date).array().optional();
        assert!(value.is_array && value.is_optional && !value.is_nullable);
        assert_eq!(value.type_name(), "date");

        let value = Value::constant(Constant::Boolean(true));
        assert_eq!(value.primitive_kind(), Some(Primitive::Boolean));
    }

    #[test]
    fn test_constant_display() {
        assert_eq!(Constant::String("a\"b".into()).to_string(), "\"a\\\"b\"");
        assert_eq!(Constant::Integer(7).to_string(), "7");
        assert_eq!(Constant::Boolean(false).to_string(), "false");
    }
}
