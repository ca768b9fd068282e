//! Shared fixtures for resolver integration tests
//!
//! # Usage
//!
//! From any integration test file in `tests/`:
//! ```rust,ignore
//! mod harness;
//! use harness::*;
//! ```

#![allow(dead_code)]

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use uuid::Uuid;

use find_by_ids::core::query::{Predicate, Projection, Record, SortSpec};
use find_by_ids::core::schema::{ObjectType, TypeDescriptor, TypeRef};
use find_by_ids::core::store::{DataSource, ModelSchema, QueryHandle};
use find_by_ids::storage::InMemoryDataSource;

/// Install a test subscriber once; honours `RUST_LOG`
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn user_schema() -> ModelSchema {
    ModelSchema::new("id")
        .with_field("email")
        .with_field("profile")
        .with_index("name")
        .with_index("age")
}

pub fn user_type() -> TypeDescriptor {
    ObjectType::new("User")
        .field("id", TypeRef::non_null(TypeRef::named("ID")))
        .field("name", TypeRef::named("String"))
        .field("email", TypeRef::named("String"))
        .field("age", TypeRef::named("Int"))
        .into()
}

pub fn post_type() -> TypeDescriptor {
    ObjectType::new("Post")
        .field("id", TypeRef::non_null(TypeRef::named("ID")))
        .field("title", TypeRef::named("String"))
        .into()
}

/// Users with integer keys 1..=5, inserted out of key order
pub fn seeded_users() -> InMemoryDataSource {
    let users = InMemoryDataSource::new("User", user_schema());
    users
        .insert_many([
            json!({"id": 3, "name": "Carol", "age": 41, "email": "carol@example.com"}),
            json!({"id": 1, "name": "Alice", "age": 30, "email": "alice@example.com"}),
            json!({"id": 5, "name": "Eve", "age": 30, "email": "eve@example.com"}),
            json!({"id": 2, "name": "Bob", "age": 25, "email": "bob@example.com",
                   "profile": {"bio": "builder", "avatar": "bob.png"}}),
            json!({"id": 4, "name": "Dave", "age": 52, "email": "dave@example.com"}),
        ])
        .expect("seed users");
    users
}

/// `n` users with random UUID keys; returns the source and the keys
pub fn uuid_users(n: usize) -> (InMemoryDataSource, Vec<Value>) {
    let users = InMemoryDataSource::new("User", user_schema());
    let ids: Vec<Value> = (0..n)
        .map(|i| {
            let id = Uuid::new_v4().to_string();
            users
                .insert(json!({"id": id, "name": format!("user-{}", i), "age": i}))
                .expect("insert user");
            json!(id)
        })
        .collect();
    (users, ids)
}

pub fn ids_of(records: &[Record]) -> Vec<Value> {
    records.iter().map(|r| r["id"].clone()).collect()
}

/// Where a [`FailingDataSource`] should fail
#[derive(Debug, Clone, Copy)]
pub enum FailAt {
    Find,
    Execute,
}

/// Data source that fails with a fixed message and counts calls
pub struct FailingDataSource {
    schema: ModelSchema,
    fail_at: FailAt,
    message: &'static str,
    pub finds: AtomicUsize,
}

impl FailingDataSource {
    pub fn new(fail_at: FailAt, message: &'static str) -> Arc<Self> {
        Arc::new(Self {
            schema: user_schema(),
            fail_at,
            message,
            finds: AtomicUsize::new(0),
        })
    }

    pub fn finds(&self) -> usize {
        self.finds.load(Ordering::SeqCst)
    }
}

impl DataSource for FailingDataSource {
    fn model_name(&self) -> &str {
        "User"
    }

    fn schema(&self) -> Option<&ModelSchema> {
        Some(&self.schema)
    }

    fn find(&self, _predicate: Predicate) -> Result<Box<dyn QueryHandle>> {
        self.finds.fetch_add(1, Ordering::SeqCst);
        match self.fail_at {
            FailAt::Find => Err(anyhow!(self.message)),
            FailAt::Execute => Ok(Box::new(FailingQuery {
                message: self.message,
            })),
        }
    }
}

struct FailingQuery {
    message: &'static str,
}

#[async_trait]
impl QueryHandle for FailingQuery {
    fn restrict_fields(&mut self, _projection: &Projection) {}

    fn limit_to(&mut self, _limit: u64) {}

    fn order_by(&mut self, _sort: &SortSpec) {}

    async fn execute(self: Box<Self>) -> Result<Vec<Record>> {
        Err(anyhow!(self.message))
    }
}

/// Data source handle without a schema description
pub struct SchemalessDataSource;

impl DataSource for SchemalessDataSource {
    fn model_name(&self) -> &str {
        "User"
    }

    fn schema(&self) -> Option<&ModelSchema> {
        None
    }

    fn find(&self, _predicate: Predicate) -> Result<Box<dyn QueryHandle>> {
        Err(anyhow!("schemaless data source cannot query"))
    }
}
