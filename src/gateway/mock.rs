//! In-memory gateway for protocol tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use super::{Collection, Filter, Gateway, Query, Rows};
use crate::error::{FarmError, FarmResult};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Select(Collection, Query),
    Insert(Collection, Value),
    Update(Collection, Filter, Value),
    Delete(Collection, Filter),
    Rpc(String, Value),
}

#[derive(Default)]
pub struct MockGateway {
    rows: Mutex<HashMap<Collection, Vec<Value>>>,
    calls: Mutex<Vec<Call>>,
    pub fail_rpc: bool,
    pub fail_update: bool,
    pub fail_select: bool,
    pub fail_insert: bool,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(self, collection: Collection, rows: Vec<Value>) -> Self {
        self.rows.lock().unwrap().insert(collection, rows);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

fn matches(row: &Value, filter: &Filter) -> bool {
    let field = |col: &str| match row.get(col) {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    };
    match filter {
        Filter::Eq(col, value) => field(col) == *value,
        Filter::In(col, values) => values.contains(&field(col)),
    }
}

fn rejected(what: &str) -> FarmError {
    FarmError::remote(500, format!("{} rejected", what))
}

#[async_trait(?Send)]
impl Gateway for MockGateway {
    async fn select(&self, collection: Collection, query: &Query) -> FarmResult<Rows<Value>> {
        self.record(Call::Select(collection, query.clone()));
        if self.fail_select {
            return Err(rejected("select"));
        }
        let rows: Vec<Value> = self
            .rows
            .lock()
            .unwrap()
            .get(&collection)
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .filter(|row| query.filters.iter().all(|f| matches(row, f)))
            .collect();
        let total = rows.len() as u64;
        let page = match query.range {
            Some(range) => rows
                .into_iter()
                .skip(range.from as usize)
                .take((range.to - range.from + 1) as usize)
                .collect(),
            None => rows,
        };
        Ok(Rows {
            rows: page,
            total: query.exact_count.then_some(total),
        })
    }

    async fn insert(&self, collection: Collection, record: Value) -> FarmResult<Value> {
        self.record(Call::Insert(collection, record.clone()));
        if self.fail_insert {
            return Err(rejected("insert"));
        }
        self.rows
            .lock()
            .unwrap()
            .entry(collection)
            .or_default()
            .push(record.clone());
        Ok(record)
    }

    async fn update(&self, collection: Collection, filter: &Filter, patch: Value) -> FarmResult<()> {
        self.record(Call::Update(collection, filter.clone(), patch.clone()));
        if self.fail_update {
            return Err(rejected("update"));
        }
        if let (Some(rows), Value::Object(fields)) =
            (self.rows.lock().unwrap().get_mut(&collection), &patch)
        {
            for row in rows.iter_mut().filter(|row| matches(row, filter)) {
                if let Value::Object(target) = row {
                    for (key, value) in fields {
                        target.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        Ok(())
    }

    async fn delete(&self, collection: Collection, filter: &Filter) -> FarmResult<()> {
        self.record(Call::Delete(collection, filter.clone()));
        if let Some(rows) = self.rows.lock().unwrap().get_mut(&collection) {
            rows.retain(|row| !matches(row, filter));
        }
        Ok(())
    }

    async fn rpc(&self, name: &str, args: Value) -> FarmResult<Value> {
        self.record(Call::Rpc(name.to_string(), args));
        if self.fail_rpc {
            return Err(FarmError::remote(404, format!("function {} does not exist", name)));
        }
        Ok(Value::Null)
    }
}
