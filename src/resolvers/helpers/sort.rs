//! `sort` argument: orders returned records
//!
//! The contributor generates an enum with an `_ASC`/`_DESC` pair for the key
//! field and every indexed field of the model. Callers pick one of those
//! values, or pass a structured `{field: direction}` object directly.

use super::ArgsContributor;
use crate::config::SortOptions;
use crate::core::error::{ArgumentError, ConfigError};
use crate::core::query::{SortDirection, SortSpec};
use crate::core::schema::{Argument, ArgumentSchema, EnumType, TypeRef, is_valid_name};
use crate::core::store::ModelSchema;
use crate::resolvers::params::ResolveParams;
use anyhow::Result;
use serde_json::{Map, Value, json};
use std::collections::HashMap;

/// Argument name exposed by [`SortContributor`]
pub const SORT_ARG: &str = "sort";

#[derive(Debug, Clone)]
pub struct SortContributor {
    enum_type: EnumType,
    default_value: String,
}

impl SortContributor {
    /// Build the sort enum for `schema`
    ///
    /// `options.sort_type_name` must be set; resolver factories derive it
    /// from the output type when the caller leaves it empty.
    pub fn new(schema: &ModelSchema, options: &SortOptions) -> Result<Self, ConfigError> {
        let type_name = options.sort_type_name.clone().ok_or_else(|| {
            ConfigError::invalid_option("sort.sort_type_name", "a sort enum name is required")
        })?;
        if !is_valid_name(&type_name) {
            return Err(ConfigError::invalid_option(
                "sort.sort_type_name",
                format!("'{}' is not a valid type name", type_name),
            ));
        }

        let mut enum_type = EnumType::new(type_name);
        let mut owners: HashMap<String, &str> = HashMap::new();
        for field in schema.sortable_fields() {
            let constant = enum_constant(field);
            if !is_valid_name(&constant) {
                return Err(ConfigError::invalid_option(
                    "sort",
                    format!(
                        "field '{}' yields '{}', not a valid enum value name",
                        field, constant
                    ),
                ));
            }
            if let Some(other) = owners.insert(constant.clone(), field) {
                return Err(ConfigError::invalid_option(
                    "sort",
                    format!(
                        "fields '{}' and '{}' both map to {}_ASC/{}_DESC in {}",
                        other, field, constant, constant, enum_type.name
                    ),
                ));
            }
            for direction in [SortDirection::Asc, SortDirection::Desc] {
                enum_type = enum_type.value(
                    format!("{}_{}", constant, direction.suffix()),
                    sort_object(field, direction),
                );
            }
        }

        let default_value = match &options.default_value {
            Some(value) if enum_type.values.contains_key(value) => value.clone(),
            Some(value) => {
                return Err(ConfigError::invalid_option(
                    "sort.default_value",
                    format!("'{}' is not a value of {}", value, enum_type.name),
                ));
            }
            None => format!(
                "{}_{}",
                enum_constant(&schema.key_field),
                SortDirection::Asc.suffix()
            ),
        };

        Ok(Self {
            enum_type,
            default_value,
        })
    }

    pub fn enum_type(&self) -> &EnumType {
        &self.enum_type
    }

    pub fn default_value(&self) -> &str {
        &self.default_value
    }

    /// Sort spec for a runtime argument value, or the default when absent
    pub fn resolve_sort(&self, value: Option<&Value>) -> Result<SortSpec, ArgumentError> {
        let default = Value::String(self.default_value.clone());
        match value.unwrap_or(&default) {
            Value::String(name) => {
                let internal = self.enum_type.resolve(name).ok_or_else(|| {
                    ArgumentError::invalid_value(
                        SORT_ARG,
                        format!("'{}' is not a value of {}", name, self.enum_type.name),
                    )
                })?;
                match internal {
                    Value::Object(map) => parse_sort_object(map),
                    _ => Err(ArgumentError::invalid_value(
                        SORT_ARG,
                        format!("'{}' does not map to a sort object", name),
                    )),
                }
            }
            Value::Object(map) => parse_sort_object(map),
            other => Err(ArgumentError::invalid_value(
                SORT_ARG,
                format!("expected an enum value or an object, got {}", other),
            )),
        }
    }
}

fn parse_sort_object(map: &Map<String, Value>) -> Result<SortSpec, ArgumentError> {
    map.iter().try_fold(SortSpec::new(), |spec, (field, direction)| {
        let direction = SortDirection::from_value(direction).ok_or_else(|| {
            ArgumentError::invalid_value(
                SORT_ARG,
                format!("invalid direction {} for field '{}'", direction, field),
            )
        })?;
        Ok(spec.then(field.clone(), direction))
    })
}

/// Internal enum value: `{field: 1}` or `{field: -1}`
fn sort_object(field: &str, direction: SortDirection) -> Value {
    let mut map = Map::new();
    let direction = match direction {
        SortDirection::Asc => json!(1),
        SortDirection::Desc => json!(-1),
    };
    map.insert(field.to_string(), direction);
    Value::Object(map)
}

/// `createdAt` → `CREATED_AT`, `address.city` → `ADDRESS__CITY`
fn enum_constant(field: &str) -> String {
    let mut result = String::new();
    let mut prev_lower = false;
    for ch in field.chars() {
        match ch {
            '.' => {
                result.push_str("__");
                prev_lower = false;
            }
            c if c.is_ascii_uppercase() => {
                if prev_lower {
                    result.push('_');
                }
                result.push(c);
                prev_lower = false;
            }
            c if c.is_ascii_alphanumeric() || c == '_' => {
                result.push(c.to_ascii_uppercase());
                prev_lower = c.is_ascii_lowercase() || c.is_ascii_digit();
            }
            _ => {
                result.push('_');
                prev_lower = false;
            }
        }
    }
    result
}

impl ArgsContributor for SortContributor {
    fn name(&self) -> &'static str {
        SORT_ARG
    }

    fn describe_arguments(&self) -> ArgumentSchema {
        let mut args = ArgumentSchema::new();
        args.insert(
            SORT_ARG.to_string(),
            Argument::new(TypeRef::named(self.enum_type.name.clone()))
                .default_value(Value::String(self.default_value.clone()))
                .definition(self.enum_type.clone().into()),
        );
        args
    }

    fn apply(&self, params: &mut ResolveParams) -> Result<()> {
        let spec = self.resolve_sort(params.arg(SORT_ARG))?;
        if !spec.is_empty() {
            params.query_mut()?.order_by(&spec);
        }
        Ok(())
    }
}
