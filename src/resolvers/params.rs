//! Per-invocation execution context

use crate::core::query::Projection;
use crate::core::store::QueryHandle;
use anyhow::{Result, anyhow};
use serde_json::{Map, Value};
use std::fmt;

/// Everything a single resolver invocation works with
///
/// `args` and `projection` come from the schema layer; `query` is filled in
/// by the resolver once the base predicate is known, then refined by the
/// argument contributors before execution.
#[derive(Default)]
pub struct ResolveParams {
    /// Runtime argument values keyed by argument name
    pub args: Map<String, Value>,

    /// Fields requested by the caller's selection set
    pub projection: Option<Projection>,

    /// Query in progress
    pub query: Option<Box<dyn QueryHandle>>,
}

impl ResolveParams {
    /// Build params from a JSON value; anything but an object yields no args
    pub fn new(args: Value) -> Self {
        let args = match args {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self {
            args,
            projection: None,
            query: None,
        }
    }

    pub fn with_projection(mut self, projection: Projection) -> Self {
        self.projection = Some(projection);
        self
    }

    /// Argument value, treating an explicit `null` as absent
    pub fn arg(&self, name: &str) -> Option<&Value> {
        self.args.get(name).filter(|v| !v.is_null())
    }

    /// Query in progress, or an error if none was created yet
    pub fn query_mut(&mut self) -> Result<&mut Box<dyn QueryHandle>> {
        self.query
            .as_mut()
            .ok_or_else(|| anyhow!("query refinement applied before a query was created"))
    }
}

impl fmt::Debug for ResolveParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolveParams")
            .field("args", &self.args)
            .field("projection", &self.projection)
            .field("query", &self.query.as_ref().map(|_| "<query>"))
            .finish()
    }
}
