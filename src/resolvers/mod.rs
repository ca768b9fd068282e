//! Resolver factories and the descriptors they produce
//!
//! A resolver pairs an argument schema with an execution function. The
//! schema layer registers the descriptor as a field and calls
//! [`ResolverDescriptor::resolve`] for every invocation.

pub mod find_by_ids;
pub mod helpers;
pub mod params;

#[cfg(test)]
pub(crate) mod testing;

pub use find_by_ids::find_by_ids;
pub use helpers::{ArgsContributor, LimitContributor, ProjectionContributor, SortContributor};
pub use params::ResolveParams;

use crate::core::query::Record;
use crate::core::schema::{ArgumentSchema, TypeDescriptor, TypeRef};
use anyhow::Result;
use futures::future::BoxFuture;
use std::fmt;
use std::sync::Arc;

/// Root operation a resolver is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolverKind {
    Query,
}

impl fmt::Display for ResolverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolverKind::Query => write!(f, "query"),
        }
    }
}

/// Execution function of a resolver
pub type ResolveFn =
    Arc<dyn Fn(ResolveParams) -> BoxFuture<'static, Result<Vec<Record>>> + Send + Sync>;

/// A fully built resolver, ready to be registered as a field
#[derive(Clone)]
pub struct ResolverDescriptor {
    name: String,
    kind: ResolverKind,
    output_type: TypeRef,
    args: ArgumentSchema,
    refinement_order: Vec<&'static str>,
    resolve: ResolveFn,
}

impl ResolverDescriptor {
    pub(crate) fn new(
        name: impl Into<String>,
        kind: ResolverKind,
        output_type: TypeRef,
        args: ArgumentSchema,
        refinement_order: Vec<&'static str>,
        resolve: ResolveFn,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            output_type,
            args,
            refinement_order,
            resolve,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ResolverKind {
        self.kind
    }

    pub fn output_type(&self) -> &TypeRef {
        &self.output_type
    }

    pub fn args(&self) -> &ArgumentSchema {
        &self.args
    }

    /// Names of the contributors applied to the query, in application order
    pub fn refinement_order(&self) -> &[&'static str] {
        &self.refinement_order
    }

    /// Run the resolver for one invocation
    pub fn resolve(&self, params: ResolveParams) -> BoxFuture<'static, Result<Vec<Record>>> {
        (self.resolve)(params)
    }

    /// Named types introduced by the arguments (e.g. generated sort enums)
    pub fn type_definitions(&self) -> Vec<&TypeDescriptor> {
        self.args
            .values()
            .filter_map(|arg| arg.definition.as_ref())
            .collect()
    }

    /// Field definition as SDL: `name(arg: Type, ...): Output`
    pub fn to_sdl(&self) -> String {
        if self.args.is_empty() {
            return format!("{}: {}", self.name, self.output_type);
        }
        let args = self
            .args
            .iter()
            .map(|(name, arg)| arg.to_sdl(name))
            .collect::<Vec<_>>()
            .join(", ");
        format!("{}({}): {}", self.name, args, self.output_type)
    }
}

impl fmt::Debug for ResolverDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolverDescriptor")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("output_type", &self.output_type)
            .field("args", &self.args.keys().collect::<Vec<_>>())
            .field("refinement_order", &self.refinement_order)
            .finish()
    }
}
