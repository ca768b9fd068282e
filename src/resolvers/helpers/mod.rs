//! Reusable argument contributors
//!
//! Each contributor supplies a fragment of a resolver's argument schema and,
//! at execution time, refines the query in progress from the matching
//! runtime argument. Contributors never replace the base predicate.

pub mod limit;
pub mod projection;
pub mod sort;

pub use limit::LimitContributor;
pub use projection::ProjectionContributor;
pub use sort::SortContributor;

use crate::core::schema::ArgumentSchema;
use crate::resolvers::params::ResolveParams;
use anyhow::Result;

/// A self-contained argument schema fragment plus its runtime effect
pub trait ArgsContributor: Send + Sync {
    /// Short identifier used in logs and ordering checks
    fn name(&self) -> &'static str;

    /// Arguments this contributor adds to the field
    fn describe_arguments(&self) -> ArgumentSchema;

    /// Refine `params.query` from `params.args`
    fn apply(&self, params: &mut ResolveParams) -> Result<()>;
}
