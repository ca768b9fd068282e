//! # find-by-ids
//!
//! Resolver factory producing a `findByIds` query field: fetch a batch of
//! entities by identifier, with client-controlled limit and sort and
//! server-side field projection.
//!
//! ## Features
//!
//! - **Pluggable contributors**: limit, sort and projection each add their own
//!   arguments and refine the query independently
//! - **Fixed refinement order**: projection, then limit, then sort, then execute
//! - **Construction-time validation**: a broken data source or output type is
//!   rejected before the field exists
//! - **Lenient identifiers**: a malformed `ids` value resolves to no results
//! - **Store agnostic**: any backend implementing [`core::DataSource`]
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use find_by_ids::prelude::*;
//!
//! let users = InMemoryDataSource::new("User", ModelSchema::new("id").with_index("name"));
//! users.insert(json!({ "id": "u1", "name": "Ada" }))?;
//!
//! let user_type = ObjectType::new("User")
//!     .field("id", TypeRef::named("ID"))
//!     .field("name", TypeRef::named("String"))
//!     .into();
//!
//! let resolver = find_by_ids(Arc::new(users), &user_type, None)?;
//! // findByIds(ids: [ID]!, limit: Int = 1000, sort: SortFindByIdsUserInput = ID_ASC): [User]
//! println!("{}", resolver.to_sdl());
//!
//! let records = resolver
//!     .resolve(ResolveParams::new(json!({ "ids": ["u1"], "sort": "NAME_DESC" })))
//!     .await?;
//! ```

pub mod config;
pub mod core;
pub mod resolvers;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core Traits ===
    pub use crate::core::{
        error::{ArgumentError, ConfigError},
        query::{Predicate, Projection, Record, SortDirection, SortSpec},
        schema::{Argument, ArgumentSchema, EnumType, ObjectType, TypeDescriptor, TypeRef},
        store::{DataSource, ModelSchema, QueryHandle},
    };

    // === Resolvers ===
    pub use crate::resolvers::find_by_ids::find_by_ids;
    pub use crate::resolvers::{
        ArgsContributor, LimitContributor, ProjectionContributor, ResolveParams,
        ResolverDescriptor, ResolverKind, SortContributor,
    };

    // === Storage ===
    pub use crate::storage::InMemoryDataSource;

    // === Config ===
    pub use crate::config::{LimitOptions, ResolverOptions, SortOptions};

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use serde_json::{Value, json};
    pub use std::sync::Arc;
}
