//! Recording query handle for unit tests

use crate::core::query::{Predicate, Projection, Record, SortSpec};
use crate::core::store::QueryHandle;
use anyhow::Result;
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq)]
pub enum QueryCall {
    RestrictFields(Projection),
    LimitTo(u64),
    OrderBy(SortSpec),
    Execute,
}

/// Query handle that logs every call
///
/// Executing yields one `{field: value}` record per predicate value, so tests
/// can see which predicate the query was created with.
pub struct RecordingQuery {
    predicate: Predicate,
    calls: Arc<Mutex<Vec<QueryCall>>>,
}

impl RecordingQuery {
    pub fn new(predicate: Predicate) -> (Self, Arc<Mutex<Vec<QueryCall>>>) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                predicate,
                calls: calls.clone(),
            },
            calls,
        )
    }

    fn record(&self, call: QueryCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl QueryHandle for RecordingQuery {
    fn restrict_fields(&mut self, projection: &Projection) {
        self.record(QueryCall::RestrictFields(projection.clone()));
    }

    fn limit_to(&mut self, limit: u64) {
        self.record(QueryCall::LimitTo(limit));
    }

    fn order_by(&mut self, sort: &SortSpec) {
        self.record(QueryCall::OrderBy(sort.clone()));
    }

    async fn execute(self: Box<Self>) -> Result<Vec<Record>> {
        self.record(QueryCall::Execute);
        let Predicate::In { field, values } = self.predicate;
        Ok(values
            .into_iter()
            .map(|value| {
                let mut record = Map::new();
                record.insert(field.clone(), value);
                Value::Object(record)
            })
            .collect())
    }
}
