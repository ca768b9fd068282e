//! `findByIds` resolver: fetch a batch of entities by primary key

use super::helpers::{ArgsContributor, LimitContributor, ProjectionContributor, SortContributor};
use super::params::ResolveParams;
use super::{ResolveFn, ResolverDescriptor, ResolverKind};
use crate::config::{ResolverOptions, SortOptions};
use crate::core::error::ConfigError;
use crate::core::query::{Predicate, Record};
use crate::core::schema::{
    Argument, ArgumentSchema, ID_SCALAR, ObjectType, TypeDescriptor, TypeRef, is_valid_name,
};
use crate::core::store::{DataSource, ModelSchema, QueryHandle};
use anyhow::Result;
use futures::future::FutureExt;
use serde_json::Value;
use std::sync::Arc;

/// Field name of the generated resolver
pub const RESOLVER_NAME: &str = "findByIds";

/// Required identifier-list argument
pub const IDS_ARG: &str = "ids";

/// Build a `findByIds` resolver for `data_source`, returning `[output_type]`
///
/// The generated field takes a required `ids: [ID]!` argument plus the
/// `limit` and `sort` arguments of the shared contributors. The sort enum is
/// named `SortFindByIds{TypeName}Input` unless `options.sort` says otherwise.
///
/// # Errors
///
/// Returns [`ConfigError`] when the data source lacks a model name or schema,
/// when `output_type` is not a valid object type, or when the sort options
/// cannot be satisfied. Nothing is built in that case.
///
/// # Example
///
/// ```rust,ignore
/// let users = Arc::new(InMemoryDataSource::new("User", ModelSchema::new("id")));
/// let user_type = ObjectType::new("User").field("id", TypeRef::named("ID")).into();
///
/// let resolver = find_by_ids(users, &user_type, None)?;
/// let records = resolver
///     .resolve(ResolveParams::new(json!({ "ids": ["a", "b"] })))
///     .await?;
/// ```
pub fn find_by_ids(
    data_source: Arc<dyn DataSource>,
    output_type: &TypeDescriptor,
    options: Option<&ResolverOptions>,
) -> Result<ResolverDescriptor, ConfigError> {
    let schema = validate_data_source(data_source.as_ref())?;
    let object = validate_output_type(output_type)?;
    let key_field = schema.key_field.clone();

    let options = options.cloned().unwrap_or_default();
    let limit = LimitContributor::new(options.limit.unwrap_or_default());
    let sort_options = options.sort.unwrap_or_default();
    let sort = SortContributor::new(
        schema,
        &SortOptions {
            sort_type_name: Some(
                sort_options
                    .sort_type_name
                    .unwrap_or_else(|| sort_type_name(&object.name)),
            ),
            ..sort_options
        },
    )?;

    let mut args = ArgumentSchema::new();
    args.insert(
        IDS_ARG.to_string(),
        Argument::new(TypeRef::non_null(TypeRef::list(TypeRef::named(ID_SCALAR)))),
    );
    args.extend(limit.describe_arguments());
    args.extend(sort.describe_arguments());

    // Projection first so excluded fields are never fetched, then limit, then sort
    let pipeline = Arc::new(Pipeline {
        key_field,
        data_source,
        refinements: [
            Box::new(ProjectionContributor),
            Box::new(limit),
            Box::new(sort),
        ],
    });
    let refinement_order = pipeline.refinements.iter().map(|r| r.name()).collect();

    tracing::debug!(
        resolver = RESOLVER_NAME,
        model = %pipeline.data_source.model_name(),
        type_name = %object.name,
        args = ?args.keys().collect::<Vec<_>>(),
        "built resolver"
    );

    let resolve: ResolveFn =
        Arc::new(move |params: ResolveParams| pipeline.clone().run(params).boxed());

    Ok(ResolverDescriptor::new(
        RESOLVER_NAME,
        ResolverKind::Query,
        TypeRef::list(TypeRef::named(object.name.clone())),
        args,
        refinement_order,
        resolve,
    ))
}

/// Name of the sort enum generated for an output type
pub fn sort_type_name(type_name: &str) -> String {
    format!("SortFindByIds{}Input", type_name)
}

fn validate_data_source(data_source: &dyn DataSource) -> Result<&ModelSchema, ConfigError> {
    if data_source.model_name().trim().is_empty() {
        return Err(ConfigError::invalid_data_source("model name is empty"));
    }
    let schema = data_source.schema().ok_or_else(|| {
        ConfigError::invalid_data_source(format!(
            "model '{}' has no schema",
            data_source.model_name()
        ))
    })?;
    if schema.key_field.is_empty() {
        return Err(ConfigError::invalid_data_source(format!(
            "model '{}' has no key field",
            data_source.model_name()
        )));
    }
    Ok(schema)
}

fn validate_output_type(output_type: &TypeDescriptor) -> Result<&ObjectType, ConfigError> {
    let object = output_type.as_object().ok_or_else(|| {
        ConfigError::invalid_output_type(
            output_type.name(),
            format!("expected an object type, got {}", output_type.kind()),
        )
    })?;
    if !is_valid_name(&object.name) {
        return Err(ConfigError::invalid_output_type(
            &object.name,
            "not a valid type name",
        ));
    }
    Ok(object)
}

/// State captured by the resolve function
struct Pipeline {
    key_field: String,
    data_source: Arc<dyn DataSource>,
    refinements: [Box<dyn ArgsContributor>; 3],
}

impl Pipeline {
    async fn run(self: Arc<Self>, params: ResolveParams) -> Result<Vec<Record>> {
        match self.prepare(params)? {
            Some(query) => query.execute().await,
            None => Ok(Vec::new()),
        }
    }

    /// Build and refine the query; `None` when `ids` is not a list
    fn prepare(&self, mut params: ResolveParams) -> Result<Option<Box<dyn QueryHandle>>> {
        let ids = match params.args.remove(IDS_ARG) {
            Some(Value::Array(ids)) => ids,
            other => {
                tracing::warn!(
                    resolver = RESOLVER_NAME,
                    model = %self.data_source.model_name(),
                    ids = ?other,
                    "ids argument is not a list, returning no results"
                );
                return Ok(None);
            }
        };

        tracing::debug!(
            resolver = RESOLVER_NAME,
            model = %self.data_source.model_name(),
            count = ids.len(),
            "resolving"
        );

        params.query = Some(
            self.data_source
                .find(Predicate::is_in(self.key_field.clone(), ids))?,
        );
        for refinement in &self.refinements {
            refinement.apply(&mut params)?;
        }

        Ok(params.query.take())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LimitOptions;
    use crate::core::query::{Projection, SortDirection, SortSpec};
    use crate::resolvers::testing::{QueryCall, RecordingQuery};
    use serde_json::json;
    use std::sync::Mutex;

    /// Data source that hands out recording queries
    struct Recorder {
        name: String,
        schema: Option<ModelSchema>,
        calls: Mutex<Vec<Arc<Mutex<Vec<QueryCall>>>>>,
    }

    impl Recorder {
        fn new(name: &str, schema: Option<ModelSchema>) -> Arc<Self> {
            Arc::new(Self {
                name: name.to_string(),
                schema,
                calls: Mutex::new(Vec::new()),
            })
        }

        fn last_calls(&self) -> Vec<QueryCall> {
            let calls = self.calls.lock().unwrap();
            calls.last().map(|c| c.lock().unwrap().clone()).unwrap_or_default()
        }
    }

    impl DataSource for Recorder {
        fn model_name(&self) -> &str {
            &self.name
        }

        fn schema(&self) -> Option<&ModelSchema> {
            self.schema.as_ref()
        }

        fn find(&self, predicate: Predicate) -> Result<Box<dyn QueryHandle>> {
            let (query, calls) = RecordingQuery::new(predicate);
            self.calls.lock().unwrap().push(calls);
            Ok(Box::new(query))
        }
    }

    fn user_type() -> TypeDescriptor {
        ObjectType::new("User")
            .field("id", TypeRef::named(ID_SCALAR))
            .into()
    }

    fn user_source() -> Arc<Recorder> {
        Recorder::new("User", Some(ModelSchema::new("id").with_index("name")))
    }

    #[test]
    fn test_descriptor_shape() {
        let resolver = find_by_ids(user_source(), &user_type(), None).unwrap();

        assert_eq!(resolver.name(), "findByIds");
        assert_eq!(resolver.kind(), ResolverKind::Query);
        assert_eq!(resolver.output_type().to_string(), "[User]");
        assert_eq!(
            resolver.args().keys().collect::<Vec<_>>(),
            vec!["ids", "limit", "sort"]
        );
        assert_eq!(resolver.args()["ids"].ty.to_string(), "[ID]!");
        assert_eq!(
            resolver.args()["sort"].ty.type_name(),
            "SortFindByIdsUserInput"
        );
        assert_eq!(resolver.refinement_order(), ["projection", "limit", "sort"]);
    }

    #[test]
    fn test_missing_schema_is_rejected() {
        let source = Recorder::new("User", None);
        let err = find_by_ids(source, &user_type(), None).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidDataSource { .. }));
    }

    #[test]
    fn test_empty_model_name_is_rejected() {
        let source = Recorder::new("", Some(ModelSchema::new("id")));
        let err = find_by_ids(source, &user_type(), None).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidDataSource { .. }));
    }

    #[test]
    fn test_non_object_output_type_is_rejected() {
        let err = find_by_ids(
            user_source(),
            &TypeDescriptor::Scalar("String".to_string()),
            None,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidOutputType { .. }));
    }

    #[tokio::test]
    async fn test_refinements_run_in_order_before_execute() {
        let source = user_source();
        let resolver = find_by_ids(source.clone(), &user_type(), None).unwrap();

        let params = ResolveParams::new(json!({
            "ids": [1, 2, 3],
            "limit": 2,
            "sort": "NAME_DESC",
        }))
        .with_projection(Projection::new().with_field("name"));
        let records = resolver.resolve(params).await.unwrap();

        assert_eq!(
            records,
            vec![json!({"id": 1}), json!({"id": 2}), json!({"id": 3})]
        );
        assert_eq!(
            source.last_calls(),
            vec![
                QueryCall::RestrictFields(Projection::new().with_field("name")),
                QueryCall::LimitTo(2),
                QueryCall::OrderBy(SortSpec::by("name", SortDirection::Desc)),
                QueryCall::Execute,
            ]
        );
    }

    #[tokio::test]
    async fn test_non_list_ids_never_touch_data_source() {
        let source = user_source();
        let resolver = find_by_ids(source.clone(), &user_type(), None).unwrap();

        for args in [json!({"ids": 1}), json!({}), json!({"ids": null}), json!("ids")] {
            let records = resolver.resolve(ResolveParams::new(args)).await.unwrap();
            assert!(records.is_empty());
        }
        assert!(source.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_sort_fails_before_execute() {
        let source = user_source();
        let resolver = find_by_ids(source.clone(), &user_type(), None).unwrap();

        let result = resolver
            .resolve(ResolveParams::new(json!({"ids": [1], "sort": "AGE_ASC"})))
            .await;
        assert!(result.is_err());
        assert!(!source.last_calls().contains(&QueryCall::Execute));
    }

    #[tokio::test]
    async fn test_default_refinements() {
        let source = user_source();
        let options = ResolverOptions::default().with_limit(LimitOptions {
            default_value: Some(25),
            max: None,
        });
        let resolver = find_by_ids(source.clone(), &user_type(), Some(&options)).unwrap();

        resolver
            .resolve(ResolveParams::new(json!({"ids": []})))
            .await
            .unwrap();
        assert_eq!(
            source.last_calls(),
            vec![
                QueryCall::LimitTo(25),
                QueryCall::OrderBy(SortSpec::by("id", SortDirection::Asc)),
                QueryCall::Execute,
            ]
        );
    }
}
