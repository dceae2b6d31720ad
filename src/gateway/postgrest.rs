//! PostgREST Client
//!
//! HTTP implementation of [`Gateway`] against `{url}/rest/v1`.

use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::{Method, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::Value;

use super::{parse_content_range, Collection, Filter, Gateway, Query, Rows};
use crate::config::FarmConfig;
use crate::error::{FarmError, FarmResult};

/// Keep PostgREST syntax readable; encode everything else
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'*')
    .remove(b',')
    .remove(b'(')
    .remove(b')');

#[derive(Debug, Clone)]
pub struct PostgrestClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

/// Error body returned by PostgREST
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    details: Option<String>,
    hint: Option<String>,
}

impl PostgrestClient {
    pub fn new(supabase_url: &str, api_key: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: format!("{}/rest/v1", supabase_url.trim_end_matches('/')),
            api_key: api_key.to_string(),
        }
    }

    /// Client for the public site or the admin panel.
    /// `None` when the page carries no usable key.
    pub fn from_config(config: &FarmConfig, admin: bool) -> Option<Self> {
        if config.supabase_url.trim().is_empty() {
            return None;
        }
        let key = config.api_key(admin)?;
        Some(Self::new(&config.supabase_url, key))
    }

    pub fn table_url(&self, table: &str, params: &[(String, String)]) -> String {
        let mut url = format!("{}/{}", self.base_url, table);
        let query = encode_params(params);
        if !query.is_empty() {
            url.push('?');
            url.push_str(&query);
        }
        url
    }

    pub fn rpc_url(&self, name: &str) -> String {
        format!("{}/rpc/{}", self.base_url, name)
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.http
            .request(method, url)
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
    }

    fn filter_url(&self, collection: Collection, filter: &Filter) -> String {
        self.table_url(
            collection.table(),
            &[(filter.column().to_string(), filter.operand())],
        )
    }
}

pub fn encode_params(params: &[(String, String)]) -> String {
    params
        .iter()
        .map(|(key, value)| format!("{}={}", key, utf8_percent_encode(value, QUERY_VALUE)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Turn a non-2xx response into [`FarmError::Remote`]
async fn check(response: Response) -> FarmResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(|e| e.message.or(e.details).or(e.hint))
        .unwrap_or_else(|| {
            if body.is_empty() {
                status.to_string()
            } else {
                body
            }
        });
    Err(FarmError::remote(status.as_u16(), message))
}

async fn json_or_null(response: Response) -> FarmResult<Value> {
    let text = response.text().await?;
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_str(&text)?)
}

#[async_trait(?Send)]
impl Gateway for PostgrestClient {
    async fn select(&self, collection: Collection, query: &Query) -> FarmResult<Rows<Value>> {
        let url = self.table_url(collection.table(), &query.params());
        let mut request = self.request(Method::GET, &url);
        for (name, value) in query.headers() {
            request = request.header(name, value);
        }

        let response = check(request.send().await?).await?;
        let total = response
            .headers()
            .get("content-range")
            .and_then(|v| v.to_str().ok())
            .and_then(parse_content_range);
        let rows: Vec<Value> = response.json().await?;

        tracing::debug!(
            "[GATEWAY] select {} -> {} rows (total {:?})",
            collection.table(),
            rows.len(),
            total
        );
        Ok(Rows { rows, total })
    }

    async fn insert(&self, collection: Collection, record: Value) -> FarmResult<Value> {
        let url = self.table_url(collection.table(), &[]);
        let response = self
            .request(Method::POST, &url)
            .header("Prefer", "return=representation")
            .json(&record)
            .send()
            .await?;
        let inserted = json_or_null(check(response).await?).await?;

        // PostgREST answers with an array even for a single row
        match inserted {
            Value::Array(mut rows) if !rows.is_empty() => Ok(rows.remove(0)),
            Value::Array(_) | Value::Null => Ok(record),
            row => Ok(row),
        }
    }

    async fn update(&self, collection: Collection, filter: &Filter, patch: Value) -> FarmResult<()> {
        let url = self.filter_url(collection, filter);
        let response = self
            .request(Method::PATCH, &url)
            .header("Prefer", "return=minimal")
            .json(&patch)
            .send()
            .await?;
        check(response).await?;
        tracing::debug!("[GATEWAY] update {} {}", collection.table(), filter.operand());
        Ok(())
    }

    async fn delete(&self, collection: Collection, filter: &Filter) -> FarmResult<()> {
        let url = self.filter_url(collection, filter);
        let response = self.request(Method::DELETE, &url).send().await?;
        check(response).await?;
        tracing::debug!("[GATEWAY] delete {} {}", collection.table(), filter.operand());
        Ok(())
    }

    async fn rpc(&self, name: &str, args: Value) -> FarmResult<Value> {
        let response = self
            .request(Method::POST, &self.rpc_url(name))
            .json(&args)
            .send()
            .await?;
        json_or_null(check(response).await?).await
    }
}
