//! AI tool directory calls.

use serde::Deserialize;

use super::{decode_rows, to_json, Collection, Filter, Gateway, Query};
use crate::error::FarmResult;
use crate::models::{Tool, ToolDraft};

/// Option entry for the tutorial form's tool picker
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ToolOption {
    pub id: String,
    pub name: String,
}

/// Featured first, then newest
pub async fn list_tools(gateway: &dyn Gateway) -> FarmResult<Vec<Tool>> {
    let query = Query::all()
        .order("is_featured", false)
        .order("created_at", false);
    let rows = gateway.select(Collection::Tools, &query).await?;
    Ok(decode_rows(rows)?.rows)
}

/// Newest first, as the admin table lists them
pub async fn list_tools_admin(gateway: &dyn Gateway) -> FarmResult<Vec<Tool>> {
    let query = Query::all().order("created_at", false);
    let rows = gateway.select(Collection::Tools, &query).await?;
    Ok(decode_rows(rows)?.rows)
}

pub async fn list_tool_options(gateway: &dyn Gateway) -> FarmResult<Vec<ToolOption>> {
    let query = Query::all().columns("id, name").order("name", true);
    let rows = gateway.select(Collection::Tools, &query).await?;
    Ok(decode_rows(rows)?.rows)
}

pub async fn create_tool(gateway: &dyn Gateway, draft: &ToolDraft) -> FarmResult<Tool> {
    let row = gateway.insert(Collection::Tools, to_json(draft)?).await?;
    Ok(serde_json::from_value(row)?)
}

pub async fn update_tool(gateway: &dyn Gateway, id: &str, draft: &ToolDraft) -> FarmResult<()> {
    gateway
        .update(Collection::Tools, &Filter::id(id), to_json(draft)?)
        .await
}
