//! Service IR consumed by the wiremap generators.
//!
//! The IR describes a service independently of any target language:
//! - [`Service`]: interfaces, records, enums and unions
//! - [`Value`]: the abstract value description shared by properties,
//!   parameters, return values and union members
//!
//! Documents are JSON or YAML with camelCase keys; see [`Service::load`].

mod load;
mod service;
mod value;

pub use load::LoadError;
pub use service::{
    Enum, EnumMember, HttpBinding, HttpParameter, HttpVerb, Interface, MapProperties, Method,
    ObjectRule, ParamLocation, Parameter, Property, Service, Type, Union,
};
pub use value::{Constant, Primitive, Value, ValueTarget};
