//! Weekly report calls.

use serde_json::Value;

use super::{decode_rows, to_json, Collection, Filter, Gateway, Query};
use crate::error::FarmResult;
use crate::models::{WeekReport, WeekReportDraft};

/// Newest published first
pub async fn list_weekreports(gateway: &dyn Gateway) -> FarmResult<Vec<WeekReport>> {
    let query = Query::all().order("published_at", false);
    let rows = gateway.select(Collection::WeekReports, &query).await?;
    Ok(decode_rows(rows)?.rows)
}

pub async fn create_weekreport(gateway: &dyn Gateway, draft: &WeekReportDraft) -> FarmResult<Value> {
    gateway.insert(Collection::WeekReports, to_json(draft)?).await
}

pub async fn update_weekreport(
    gateway: &dyn Gateway,
    id: &str,
    draft: &WeekReportDraft,
) -> FarmResult<()> {
    gateway
        .update(Collection::WeekReports, &Filter::id(id), to_json(draft)?)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::mock::{Call, MockGateway};
    use crate::models::fixtures::at;
    use serde_json::json;

    #[tokio::test]
    async fn test_null_video_url_decodes_as_empty() {
        let gateway = MockGateway::new().with_rows(
            Collection::WeekReports,
            vec![json!({
                "id": "w1",
                "title": "第 1 周",
                "video_url": null,
                "published_at": "2025-01-01T12:00:00Z",
            })],
        );

        let reports = list_weekreports(&gateway).await.unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].video_url, "");
        assert_eq!(
            gateway.calls(),
            vec![Call::Select(
                Collection::WeekReports,
                Query::all().order("published_at", false)
            )]
        );
    }

    #[tokio::test]
    async fn test_create_sends_draft_fields() {
        let gateway = MockGateway::new();
        let draft = WeekReportDraft {
            title: "第 2 周".into(),
            video_url: "https://youtu.be/abc".into(),
            content_md: None,
            published_at: at(8),
        };

        let row = create_weekreport(&gateway, &draft).await.unwrap();
        assert_eq!(row["title"], "第 2 周");
        assert_eq!(row["video_url"], "https://youtu.be/abc");
        assert!(matches!(gateway.calls().as_slice(), [Call::Insert(Collection::WeekReports, _)]));
    }
}
