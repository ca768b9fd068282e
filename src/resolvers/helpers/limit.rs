//! `limit` argument: caps the number of returned records

use super::ArgsContributor;
use crate::config::LimitOptions;
use crate::core::schema::{Argument, ArgumentSchema, INT_SCALAR, TypeRef};
use crate::resolvers::params::ResolveParams;
use anyhow::Result;
use serde_json::{Value, json};

/// Argument name exposed by [`LimitContributor`]
pub const LIMIT_ARG: &str = "limit";

#[derive(Debug, Clone, Default)]
pub struct LimitContributor {
    options: LimitOptions,
}

impl LimitContributor {
    pub fn new(options: LimitOptions) -> Self {
        Self { options }
    }

    /// Cap to apply for a runtime argument value
    ///
    /// Missing values fall back to the default. Non-positive or
    /// non-numeric values mean "no cap", except that a configured maximum
    /// always applies.
    pub fn effective_limit(&self, value: Option<&Value>) -> Option<u64> {
        let requested = match value {
            None => Some(self.options.effective_default()),
            Some(value) => parse_limit(value),
        };

        match (requested, self.options.max) {
            (Some(n), Some(max)) => Some(n.min(max)),
            (Some(n), None) => Some(n),
            (None, max) => max,
        }
    }
}

/// Positive integer from a number or numeric string
fn parse_limit(value: &Value) -> Option<u64> {
    let n = match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }?;
    (n > 0).then_some(n as u64)
}

impl ArgsContributor for LimitContributor {
    fn name(&self) -> &'static str {
        LIMIT_ARG
    }

    fn describe_arguments(&self) -> ArgumentSchema {
        let mut args = ArgumentSchema::new();
        args.insert(
            LIMIT_ARG.to_string(),
            Argument::new(TypeRef::named(INT_SCALAR))
                .default_value(json!(self.options.effective_default())),
        );
        args
    }

    fn apply(&self, params: &mut ResolveParams) -> Result<()> {
        if let Some(limit) = self.effective_limit(params.arg(LIMIT_ARG)) {
            params.query_mut()?.limit_to(limit);
        }
        Ok(())
    }
}
