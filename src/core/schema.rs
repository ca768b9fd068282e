//! Schema-side type descriptors and argument definitions
//!
//! These mirror the small part of a GraphQL type system a resolver needs:
//! named types, list/non-null wrappers, object and enum definitions, and
//! field arguments. Rendering to SDL follows the conventions of the
//! GraphQL specification.

use indexmap::IndexMap;
use regex::Regex;
use serde_json::Value;
use std::fmt;
use std::sync::OnceLock;

/// Name of the identifier scalar
pub const ID_SCALAR: &str = "ID";

/// Name of the built-in integer scalar
pub const INT_SCALAR: &str = "Int";

/// Ordered mapping from argument name to its definition
pub type ArgumentSchema = IndexMap<String, Argument>;

/// Check that `name` is a valid GraphQL name (`/[_A-Za-z][_0-9A-Za-z]*/`)
pub fn is_valid_name(name: &str) -> bool {
    static NAME_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = NAME_REGEX.get_or_init(|| Regex::new(r"^[_A-Za-z][_0-9A-Za-z]*$").unwrap());
    regex.is_match(name)
}

/// Reference to a type, possibly wrapped in list/non-null modifiers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRef {
    Named(String),
    List(Box<TypeRef>),
    NonNull(Box<TypeRef>),
}

impl TypeRef {
    pub fn named(name: impl Into<String>) -> Self {
        TypeRef::Named(name.into())
    }

    pub fn list(inner: TypeRef) -> Self {
        TypeRef::List(Box::new(inner))
    }

    pub fn non_null(inner: TypeRef) -> Self {
        TypeRef::NonNull(Box::new(inner))
    }

    /// The innermost named type
    pub fn type_name(&self) -> &str {
        match self {
            TypeRef::Named(name) => name,
            TypeRef::List(inner) | TypeRef::NonNull(inner) => inner.type_name(),
        }
    }

    pub fn is_non_null(&self) -> bool {
        matches!(self, TypeRef::NonNull(_))
    }

    pub fn is_list(&self) -> bool {
        match self {
            TypeRef::List(_) => true,
            TypeRef::NonNull(inner) => inner.is_list(),
            TypeRef::Named(_) => false,
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Named(name) => write!(f, "{}", name),
            TypeRef::List(inner) => write!(f, "[{}]", inner),
            TypeRef::NonNull(inner) => write!(f, "{}!", inner),
        }
    }
}

/// A field of an object type
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectField {
    pub name: String,
    pub ty: TypeRef,
}

/// An object (output) type
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectType {
    pub name: String,
    pub fields: Vec<ObjectField>,
}

impl ObjectType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, name: impl Into<String>, ty: TypeRef) -> Self {
        self.fields.push(ObjectField {
            name: name.into(),
            ty,
        });
        self
    }
}

/// An enum type; each public name maps to an internal JSON value
#[derive(Debug, Clone, PartialEq)]
pub struct EnumType {
    pub name: String,
    pub values: IndexMap<String, Value>,
}

impl EnumType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: IndexMap::new(),
        }
    }

    pub fn value(mut self, name: impl Into<String>, value: Value) -> Self {
        self.values.insert(name.into(), value);
        self
    }

    /// Internal value for a public enum name
    pub fn resolve(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn to_sdl(&self) -> String {
        let mut sdl = format!("enum {} {{\n", self.name);
        for name in self.values.keys() {
            sdl.push_str(&format!("  {}\n", name));
        }
        sdl.push('}');
        sdl
    }
}

/// Any type the schema layer can hand to a resolver factory
#[derive(Debug, Clone, PartialEq)]
pub enum TypeDescriptor {
    Scalar(String),
    Object(ObjectType),
    Enum(EnumType),
}

impl TypeDescriptor {
    pub fn name(&self) -> &str {
        match self {
            TypeDescriptor::Scalar(name) => name,
            TypeDescriptor::Object(object) => &object.name,
            TypeDescriptor::Enum(enum_type) => &enum_type.name,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            TypeDescriptor::Scalar(_) => "scalar",
            TypeDescriptor::Object(_) => "object",
            TypeDescriptor::Enum(_) => "enum",
        }
    }

    pub fn as_object(&self) -> Option<&ObjectType> {
        match self {
            TypeDescriptor::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn to_sdl(&self) -> String {
        match self {
            TypeDescriptor::Scalar(name) => format!("scalar {}", name),
            TypeDescriptor::Enum(enum_type) => enum_type.to_sdl(),
            TypeDescriptor::Object(object) => {
                let mut sdl = format!("type {} {{\n", object.name);
                for field in &object.fields {
                    sdl.push_str(&format!("  {}: {}\n", field.name, field.ty));
                }
                sdl.push('}');
                sdl
            }
        }
    }
}

impl From<ObjectType> for TypeDescriptor {
    fn from(object: ObjectType) -> Self {
        TypeDescriptor::Object(object)
    }
}

impl From<EnumType> for TypeDescriptor {
    fn from(enum_type: EnumType) -> Self {
        TypeDescriptor::Enum(enum_type)
    }
}

/// A field argument definition
#[derive(Debug, Clone, PartialEq)]
pub struct Argument {
    pub ty: TypeRef,
    pub default_value: Option<Value>,

    /// Named type introduced by this argument (e.g. a generated enum) that
    /// must be registered alongside the field
    pub definition: Option<TypeDescriptor>,
}

impl Argument {
    pub fn new(ty: TypeRef) -> Self {
        Self {
            ty,
            default_value: None,
            definition: None,
        }
    }

    pub fn default_value(mut self, value: Value) -> Self {
        self.default_value = Some(value);
        self
    }

    pub fn definition(mut self, definition: TypeDescriptor) -> Self {
        self.definition = Some(definition);
        self
    }

    /// Render as `name: Type = default`
    pub fn to_sdl(&self, name: &str) -> String {
        let is_enum = matches!(self.definition, Some(TypeDescriptor::Enum(_)));
        match &self.default_value {
            Some(default) => format!("{}: {} = {}", name, self.ty, graphql_literal(default, is_enum)),
            None => format!("{}: {}", name, self.ty),
        }
    }
}

fn graphql_literal(value: &Value, is_enum: bool) -> String {
    match value {
        Value::String(s) if is_enum => s.clone(),
        Value::Array(items) => format!(
            "[{}]",
            items
                .iter()
                .map(|item| graphql_literal(item, is_enum))
                .collect::<Vec<_>>()
                .join(", ")
        ),
        Value::Object(map) => format!(
            "{{{}}}",
            map.iter()
                .map(|(k, v)| format!("{}: {}", k, graphql_literal(v, false)))
                .collect::<Vec<_>>()
                .join(", ")
        ),
        other => other.to_string(),
    }
}
