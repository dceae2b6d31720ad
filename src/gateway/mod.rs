//! Remote Data Gateway
//!
//! Typed access to the Supabase tables over PostgREST, organized by
//! collection. Views talk to the [`Gateway`] trait; the HTTP client lives
//! in [`postgrest`] and tests swap in `MockGateway`.

mod postgrest;
mod tools;
mod tutorials;
mod weekreports;
mod guestbook;
#[cfg(test)]
pub mod mock;

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{FarmError, FarmResult};
use crate::pager::RowRange;

pub use postgrest::PostgrestClient;
pub use tools::*;
pub use tutorials::*;
pub use weekreports::*;
pub use guestbook::*;

/// Shared handle held by the app context
pub type SharedGateway = Arc<dyn Gateway>;

// ========================
// Query Model
// ========================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Tools,
    Tutorials,
    WeekReports,
    Guestbook,
}

impl Collection {
    pub fn table(&self) -> &'static str {
        match self {
            Collection::Tools => "ai_tools",
            Collection::Tutorials => "tutorials",
            Collection::WeekReports => "weekreports",
            Collection::Guestbook => "guestbook",
        }
    }
}

/// Row filter: `col=eq.v` or `col=in.(a,b)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    Eq(&'static str, String),
    In(&'static str, Vec<String>),
}

impl Filter {
    pub fn id(id: impl Into<String>) -> Self {
        Filter::Eq("id", id.into())
    }

    pub fn ids(ids: Vec<String>) -> Self {
        Filter::In("id", ids)
    }

    pub fn column(&self) -> &'static str {
        match self {
            Filter::Eq(col, _) | Filter::In(col, _) => col,
        }
    }

    /// Operator and operand, before URL encoding
    pub fn operand(&self) -> String {
        match self {
            Filter::Eq(_, value) => format!("eq.{}", value),
            Filter::In(_, values) => format!("in.({})", values.join(",")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub column: &'static str,
    pub ascending: bool,
}

/// A `select` request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub columns: String,
    pub filters: Vec<Filter>,
    pub order: Vec<Order>,
    pub range: Option<RowRange>,
    pub limit: Option<u32>,
    pub exact_count: bool,
}

impl Default for Query {
    fn default() -> Self {
        Self {
            columns: "*".to_string(),
            filters: Vec::new(),
            order: Vec::new(),
            range: None,
            limit: None,
            exact_count: false,
        }
    }
}

impl Query {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn columns(mut self, columns: &str) -> Self {
        self.columns = columns.split_whitespace().collect::<String>();
        self
    }

    pub fn eq(mut self, column: &'static str, value: impl ToString) -> Self {
        self.filters.push(Filter::Eq(column, value.to_string()));
        self
    }

    #[cfg(test)]
    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn order(mut self, column: &'static str, ascending: bool) -> Self {
        self.order.push(Order { column, ascending });
        self
    }

    pub fn range(mut self, range: RowRange) -> Self {
        self.range = Some(range);
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn exact_count(mut self) -> Self {
        self.exact_count = true;
        self
    }

    /// Query-string pairs, values not yet encoded
    pub fn params(&self) -> Vec<(String, String)> {
        let mut params = vec![("select".to_string(), self.columns.clone())];
        for filter in &self.filters {
            params.push((filter.column().to_string(), filter.operand()));
        }
        if !self.order.is_empty() {
            let order = self
                .order
                .iter()
                .map(|o| format!("{}.{}", o.column, if o.ascending { "asc" } else { "desc" }))
                .collect::<Vec<_>>()
                .join(",");
            params.push(("order".to_string(), order));
        }
        if let Some(limit) = self.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }
        params
    }

    /// Range and count headers
    pub fn headers(&self) -> Vec<(&'static str, String)> {
        let mut headers = Vec::new();
        if let Some(range) = self.range {
            headers.push(("Range-Unit", "items".to_string()));
            headers.push(("Range", format!("{}-{}", range.from, range.to)));
        }
        if self.exact_count {
            headers.push(("Prefer", "count=exact".to_string()));
        }
        headers
    }
}

/// Total from `Content-Range: 0-9/47` or `*/0`
pub fn parse_content_range(header: &str) -> Option<u64> {
    let (_, total) = header.trim().rsplit_once('/')?;
    total.parse().ok()
}

/// Rows of one page plus the exact total when it was requested
#[derive(Debug, Clone, PartialEq)]
pub struct Rows<T> {
    pub rows: Vec<T>,
    pub total: Option<u64>,
}

impl<T> Rows<T> {
    /// Total if the backend reported one, else the page length
    pub fn total_or_len(&self) -> u64 {
        self.total.unwrap_or(self.rows.len() as u64)
    }
}

// ========================
// Gateway Trait
// ========================

#[async_trait(?Send)]
pub trait Gateway: Send + Sync {
    async fn select(&self, collection: Collection, query: &Query) -> FarmResult<Rows<Value>>;

    /// Insert one record and return the stored row
    async fn insert(&self, collection: Collection, record: Value) -> FarmResult<Value>;

    async fn update(&self, collection: Collection, filter: &Filter, patch: Value) -> FarmResult<()>;

    async fn delete(&self, collection: Collection, filter: &Filter) -> FarmResult<()>;

    async fn rpc(&self, name: &str, args: Value) -> FarmResult<Value>;
}

/// Decode a page of JSON rows
pub(crate) fn decode_rows<T: DeserializeOwned>(rows: Rows<Value>) -> FarmResult<Rows<T>> {
    let decoded = rows
        .rows
        .into_iter()
        .map(serde_json::from_value)
        .collect::<Result<Vec<T>, _>>()?;
    Ok(Rows {
        rows: decoded,
        total: rows.total,
    })
}

pub(crate) fn to_json<T: serde::Serialize>(value: &T) -> FarmResult<Value> {
    serde_json::to_value(value).map_err(FarmError::from)
}

/// Cheap reachability probe used by the admin header
pub async fn ping(gateway: &dyn Gateway) -> FarmResult<()> {
    gateway
        .select(Collection::Tools, &Query::all().columns("id").limit(1))
        .await
        .map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guestbook_page_query() {
        let query = Query::all()
            .eq("is_approved", true)
            .order("is_featured", false)
            .order("created_at", false)
            .range(RowRange { from: 10, to: 19 })
            .exact_count();

        assert_eq!(
            query.params(),
            vec![
                ("select".to_string(), "*".to_string()),
                ("is_approved".to_string(), "eq.true".to_string()),
                ("order".to_string(), "is_featured.desc,created_at.desc".to_string()),
            ]
        );
        assert_eq!(
            query.headers(),
            vec![
                ("Range-Unit", "items".to_string()),
                ("Range", "10-19".to_string()),
                ("Prefer", "count=exact".to_string()),
            ]
        );
    }

    #[test]
    fn test_in_filter_and_columns() {
        let query = Query::all()
            .columns("*, ai_tools ( id, name )")
            .filter(Filter::ids(vec!["a".into(), "b".into()]))
            .limit(1);
        let params = query.params();
        assert_eq!(params[0].1, "*,ai_tools(id,name)");
        assert_eq!(params[1], ("id".to_string(), "in.(a,b)".to_string()));
        assert_eq!(params[2], ("limit".to_string(), "1".to_string()));
        assert!(query.headers().is_empty());
    }

    #[test]
    fn test_parse_content_range() {
        assert_eq!(parse_content_range("0-9/47"), Some(47));
        assert_eq!(parse_content_range("*/0"), Some(0));
        assert_eq!(parse_content_range("0-9/*"), None);
        assert_eq!(parse_content_range("garbage"), None);
    }

    #[test]
    fn test_rows_total_falls_back_to_len() {
        let rows = Rows {
            rows: vec![1, 2, 3],
            total: None,
        };
        assert_eq!(rows.total_or_len(), 3);
    }
}
