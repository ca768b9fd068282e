//! Core module containing the types shared by resolvers and data sources

pub mod error;
pub mod query;
pub mod schema;
pub mod store;

pub use error::{ArgumentError, ConfigError};
pub use query::{Predicate, Projection, Record, SortDirection, SortSpec};
pub use schema::{Argument, ArgumentSchema, EnumType, ObjectType, TypeDescriptor, TypeRef};
pub use store::{DataSource, ModelSchema, QueryHandle};
