//! Field projection from the caller's selection set

use super::ArgsContributor;
use crate::core::schema::ArgumentSchema;
use crate::resolvers::params::ResolveParams;
use anyhow::Result;

/// Restricts fetched fields to the ones the caller selected
///
/// Contributes no arguments; the projection is computed by the schema layer
/// and handed over in [`ResolveParams::projection`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ProjectionContributor;

impl ArgsContributor for ProjectionContributor {
    fn name(&self) -> &'static str {
        "projection"
    }

    fn describe_arguments(&self) -> ArgumentSchema {
        ArgumentSchema::new()
    }

    fn apply(&self, params: &mut ResolveParams) -> Result<()> {
        let Some(projection) = params.projection.clone().filter(|p| !p.is_empty()) else {
            return Ok(());
        };
        params.query_mut()?.restrict_fields(&projection);
        Ok(())
    }
}
