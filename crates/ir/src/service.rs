//! Service-level IR: interfaces, methods, HTTP bindings and declarations.

use serde::Deserialize;

use crate::value::Value;

/// Root of an IR document.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    /// Human-readable service name.
    pub title: String,
    /// Service description.
    #[serde(default)]
    pub description: Option<String>,
    /// Groups of methods.
    #[serde(default)]
    pub interfaces: Vec<Interface>,
    /// Record declarations.
    #[serde(default)]
    pub types: Vec<Type>,
    /// Enum declarations.
    #[serde(default)]
    pub enums: Vec<Enum>,
    /// Union declarations.
    #[serde(default)]
    pub unions: Vec<Union>,
}

/// A named group of methods, rendered as one service interface.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interface {
    /// Interface name.
    pub name: String,
    /// Interface description.
    #[serde(default)]
    pub description: Option<String>,
    /// Methods in declaration order.
    #[serde(default)]
    pub methods: Vec<Method>,
}

/// A callable operation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Method {
    /// Method name.
    pub name: String,
    /// Method description.
    #[serde(default)]
    pub description: Option<String>,
    /// Marked deprecated.
    #[serde(default)]
    pub deprecated: bool,
    /// Inputs in declaration order.
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    /// Output, `None` for void methods.
    #[serde(default)]
    pub returns: Option<Value>,
    /// HTTP binding, `None` when the method is not exposed over HTTP.
    #[serde(default)]
    pub http: Option<HttpBinding>,
}

/// A method input.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    /// Parameter name as it appears on the wire.
    pub name: String,
    /// Parameter value.
    pub value: Value,
    /// Parameter description.
    #[serde(default)]
    pub description: Option<String>,
}

/// How a method is exposed over HTTP.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpBinding {
    /// HTTP verb.
    pub verb: HttpVerb,
    /// Path template, e.g. `/widgets/{id}`.
    pub path: String,
    /// Success status; defaults to 200 (204 for void methods).
    #[serde(default)]
    pub success_code: Option<u16>,
    /// Parameter locations; unlisted parameters are read from the query.
    #[serde(default)]
    pub parameters: Vec<HttpParameter>,
}

/// HTTP verbs supported by the route and client emitters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpVerb {
    /// GET
    Get,
    /// POST
    Post,
    /// PUT
    Put,
    /// PATCH
    Patch,
    /// DELETE
    Delete,
}

impl HttpVerb {
    /// Upper-case verb, as sent by `fetch`.
    pub fn as_str(self) -> &'static str {
        match self {
            HttpVerb::Get => "GET",
            HttpVerb::Post => "POST",
            HttpVerb::Put => "PUT",
            HttpVerb::Patch => "PATCH",
            HttpVerb::Delete => "DELETE",
        }
    }

    /// Lower-case verb, as used by express router methods.
    pub fn router_method(self) -> &'static str {
        match self {
            HttpVerb::Get => "get",
            HttpVerb::Post => "post",
            HttpVerb::Put => "put",
            HttpVerb::Patch => "patch",
            HttpVerb::Delete => "delete",
        }
    }
}

/// Location of one parameter in an HTTP request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpParameter {
    /// Name of the method parameter.
    pub name: String,
    /// Where it is carried.
    #[serde(rename = "in")]
    pub location: ParamLocation,
}

/// Request part carrying a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamLocation {
    /// Path segment.
    Path,
    /// Query string.
    Query,
    /// Request header.
    Header,
    /// JSON request body.
    Body,
}

impl HttpBinding {
    /// Location of the named parameter, defaulting to the query string.
    pub fn location_of(&self, parameter: &str) -> ParamLocation {
        self.parameters
            .iter()
            .find(|p| p.name == parameter)
            .map_or(ParamLocation::Query, |p| p.location)
    }
}

/// A record declaration.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Type {
    /// Type name.
    pub name: String,
    /// Type description.
    #[serde(default)]
    pub description: Option<String>,
    /// Marked deprecated.
    #[serde(default)]
    pub deprecated: bool,
    /// Declared properties in order.
    #[serde(default)]
    pub properties: Vec<Property>,
    /// Map clause for additional keys.
    #[serde(default)]
    pub map_properties: Option<MapProperties>,
    /// Object-level rules.
    #[serde(default)]
    pub rules: Vec<ObjectRule>,
}

impl Type {
    /// Maximum property count, when the type declares one.
    pub fn max_properties(&self) -> Option<usize> {
        self.rules.iter().find_map(|rule| match rule {
            ObjectRule::MaxProperties { max } => Some(*max),
            ObjectRule::Unknown => None,
        })
    }

    /// Required map keys, empty when there is no map clause.
    pub fn required_keys(&self) -> &[String] {
        match &self.map_properties {
            Some(map) => &map.required_keys,
            None => &[],
        }
    }
}

/// A declared property of a record.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    /// Property name as it appears on the wire.
    pub name: String,
    /// Property value.
    pub value: Value,
    /// Property description.
    #[serde(default)]
    pub description: Option<String>,
    /// Marked deprecated.
    #[serde(default)]
    pub deprecated: bool,
}

/// Map clause of a record: keys beyond the declared properties.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapProperties {
    /// Key value, usually a string or an enum reference.
    pub key: Value,
    /// Value of every map entry.
    pub value: Value,
    /// Keys guaranteed to be present.
    #[serde(default)]
    pub required_keys: Vec<String>,
}

/// Object-level validation rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(tag = "id")]
pub enum ObjectRule {
    /// At most `max` own properties.
    #[serde(rename = "ObjectMaxProperties")]
    MaxProperties {
        /// Upper bound.
        max: usize,
    },
    /// Rules this generator does not act on.
    #[serde(other)]
    Unknown,
}

/// An enum declaration.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enum {
    /// Enum name.
    pub name: String,
    /// Enum description.
    #[serde(default)]
    pub description: Option<String>,
    /// Members in declaration order.
    pub members: Vec<EnumMember>,
}

/// One enum member.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumMember {
    /// Literal value.
    pub content: String,
    /// Member description.
    #[serde(default)]
    pub description: Option<String>,
}

/// A union declaration.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Union {
    /// No discriminator: members are told apart structurally.
    Simple {
        /// Union name.
        name: String,
        /// Union description.
        #[serde(default)]
        description: Option<String>,
        /// Member values (primitives and/or complex references).
        members: Vec<Value>,
    },
    /// Members are records carrying a constant discriminator property.
    Discriminated {
        /// Union name.
        name: String,
        /// Union description.
        #[serde(default)]
        description: Option<String>,
        /// Discriminator property name.
        discriminator: String,
        /// Member values (complex references to records).
        members: Vec<Value>,
    },
}

impl Union {
    /// Union name.
    pub fn name(&self) -> &str {
        match self {
            Union::Simple { name, .. } | Union::Discriminated { name, .. } => name,
        }
    }

    /// Union description.
    pub fn description(&self) -> Option<&str> {
        match self {
            Union::Simple { description, .. } | Union::Discriminated { description, .. } => {
                description.as_deref()
            }
        }
    }

    /// Member values.
    pub fn members(&self) -> &[Value] {
        match self {
            Union::Simple { members, .. } | Union::Discriminated { members, .. } => members,
        }
    }
}
