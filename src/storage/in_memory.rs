//! In-memory implementation of DataSource for testing and development

use crate::core::query::{Predicate, Projection, Record, SortDirection, SortSpec};
use crate::core::store::{DataSource, ModelSchema, QueryHandle};
use anyhow::{Result, anyhow, bail};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
use std::sync::{Arc, RwLock};
use uuid::Uuid;

/// In-memory data source
///
/// Records are JSON objects kept in insertion order. Uses RwLock for
/// thread-safe access; queries read a consistent snapshot at execution time.
#[derive(Clone)]
pub struct InMemoryDataSource {
    model_name: String,
    schema: Arc<ModelSchema>,
    records: Arc<RwLock<Vec<Record>>>,
    executions: Arc<AtomicUsize>,
}

impl InMemoryDataSource {
    /// Create an empty data source for a model
    pub fn new(model_name: impl Into<String>, schema: ModelSchema) -> Self {
        Self {
            model_name: model_name.into(),
            schema: Arc::new(schema),
            records: Arc::new(RwLock::new(Vec::new())),
            executions: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Insert a record, assigning a UUID key when none is present
    ///
    /// Fails if the record is not an object or its key is already taken.
    pub fn insert(&self, record: Value) -> Result<Record> {
        let Value::Object(mut fields) = record else {
            bail!("{} record must be a JSON object", self.model_name);
        };

        let key = &self.schema.key_field;
        if fields.get(key).is_none_or(Value::is_null) {
            fields.insert(key.clone(), Value::String(Uuid::new_v4().to_string()));
        }
        let record = Value::Object(fields);

        let mut records = self
            .records
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        if records.iter().any(|r| r.get(key) == record.get(key)) {
            bail!(
                "{} with {} {} already exists",
                self.model_name,
                key,
                record[key.as_str()]
            );
        }
        records.push(record.clone());

        Ok(record)
    }

    /// Insert several records, stopping at the first failure
    pub fn insert_many(&self, records: impl IntoIterator<Item = Value>) -> Result<Vec<Record>> {
        records.into_iter().map(|r| self.insert(r)).collect()
    }

    pub fn len(&self) -> usize {
        self.records.read().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of queries executed so far
    pub fn executions(&self) -> usize {
        self.executions.load(AtomicOrdering::SeqCst)
    }
}

impl DataSource for InMemoryDataSource {
    fn model_name(&self) -> &str {
        &self.model_name
    }

    fn schema(&self) -> Option<&ModelSchema> {
        Some(&self.schema)
    }

    fn find(&self, predicate: Predicate) -> Result<Box<dyn QueryHandle>> {
        let Predicate::In { field, .. } = &predicate;
        if !self.schema.has_field(field) {
            bail!("unknown field '{}' on model '{}'", field, self.model_name);
        }

        Ok(Box::new(InMemoryQuery {
            source: self.clone(),
            predicate,
            projection: None,
            limit: None,
            sort: None,
        }))
    }
}

/// Query against an [`InMemoryDataSource`]
pub struct InMemoryQuery {
    source: InMemoryDataSource,
    predicate: Predicate,
    projection: Option<Projection>,
    limit: Option<u64>,
    sort: Option<SortSpec>,
}

#[async_trait]
impl QueryHandle for InMemoryQuery {
    fn restrict_fields(&mut self, projection: &Projection) {
        self.projection = Some(projection.clone());
    }

    fn limit_to(&mut self, limit: u64) {
        self.limit = Some(limit);
    }

    fn order_by(&mut self, sort: &SortSpec) {
        self.sort = Some(sort.clone());
    }

    async fn execute(self: Box<Self>) -> Result<Vec<Record>> {
        let schema = &self.source.schema;
        if let Some(sort) = &self.sort {
            for (field, _) in sort.keys() {
                let root = field.split('.').next().unwrap_or(field);
                if !schema.has_field(root) {
                    bail!(
                        "unknown sort field '{}' on model '{}'",
                        field,
                        self.source.model_name
                    );
                }
            }
        }

        self.source.executions.fetch_add(1, AtomicOrdering::SeqCst);

        let mut matched: Vec<Record> = {
            let records = self
                .source
                .records
                .read()
                .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;
            records
                .iter()
                .filter(|record| self.predicate.matches(record))
                .cloned()
                .collect()
        };

        if let Some(sort) = &self.sort {
            // sort_by is stable: ties keep insertion order
            matched.sort_by(|a, b| compare_records(a, b, sort));
        }

        if let Some(limit) = self.limit {
            matched.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        }

        if let Some(projection) = &self.projection {
            matched = matched
                .iter()
                .map(|record| project(record, projection, &schema.key_field))
                .collect();
        }

        Ok(matched)
    }
}

fn compare_records(a: &Record, b: &Record, sort: &SortSpec) -> Ordering {
    for (field, direction) in sort.keys() {
        let ordering = compare_values(get_path(a, field), get_path(b, field));
        let ordering = match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

/// Missing/null < numbers < strings < objects < arrays < booleans
fn type_rank(value: Option<&Value>) -> u8 {
    match value {
        None | Some(Value::Null) => 0,
        Some(Value::Number(_)) => 1,
        Some(Value::String(_)) => 2,
        Some(Value::Object(_)) => 3,
        Some(Value::Array(_)) => 4,
        Some(Value::Bool(_)) => 5,
    }
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            match (x.as_i64(), y.as_i64()) {
                (Some(x), Some(y)) => x.cmp(&y),
                _ => {
                    let x = x.as_f64().unwrap_or(f64::NAN);
                    let y = y.as_f64().unwrap_or(f64::NAN);
                    x.partial_cmp(&y).unwrap_or(Ordering::Equal)
                }
            }
        }
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(Value::Array(x)), Some(Value::Array(y))) => x.len().cmp(&y.len()),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

fn get_path<'a>(record: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(record, |value, segment| value.get(segment))
}

/// Write `value` at a dotted path; a non-object intermediate is replaced
fn set_path(target: &mut Map<String, Value>, path: &str, value: Value) {
    match path.split_once('.') {
        None => {
            target.insert(path.to_string(), value);
        }
        Some((head, rest)) => {
            let child = target
                .entry(head.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !child.is_object() {
                *child = Value::Object(Map::new());
            }
            if let Value::Object(child) = child {
                set_path(child, rest, value);
            }
        }
    }
}

/// Keep the key field and the selected paths
fn project(record: &Record, projection: &Projection, key_field: &str) -> Record {
    let mut projected = Map::new();
    if let Some(key) = record.get(key_field) {
        projected.insert(key_field.to_string(), key.clone());
    }
    for path in projection.fields() {
        if let Some(value) = get_path(record, path) {
            set_path(&mut projected, path, value.clone());
        }
    }
    Value::Object(projected)
}
