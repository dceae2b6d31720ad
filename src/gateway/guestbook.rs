//! Guestbook calls: public listing, submission, likes and moderation.

use serde_json::json;

use super::{decode_rows, to_json, Collection, Filter, Gateway, Query, Rows};
use crate::error::FarmResult;
use crate::models::{GuestbookMessage, NewMessage};
use crate::pager::RowRange;

/// Public list ordering. Featured messages always come first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Newest,
    Popular,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Newest => "newest",
            SortOrder::Popular => "popular",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortOrder::Newest => "最新",
            SortOrder::Popular => "最热",
        }
    }

    pub fn parse(value: &str) -> Self {
        match value {
            "popular" => SortOrder::Popular,
            _ => SortOrder::Newest,
        }
    }

    fn apply(&self, query: Query) -> Query {
        let query = query.order("is_featured", false);
        let query = match self {
            SortOrder::Popular => query.order("likes_count", false),
            SortOrder::Newest => query,
        };
        query.order("created_at", false)
    }
}

/// One page of approved messages with the exact total
pub async fn list_approved_page(
    gateway: &dyn Gateway,
    sort: SortOrder,
    range: RowRange,
) -> FarmResult<Rows<GuestbookMessage>> {
    let query = sort
        .apply(Query::all().eq("is_approved", true))
        .range(range)
        .exact_count();
    decode_rows(gateway.select(Collection::Guestbook, &query).await?)
}

/// Every message, newest first, for moderation
pub async fn list_all_messages(gateway: &dyn Gateway) -> FarmResult<Vec<GuestbookMessage>> {
    let query = Query::all().order("created_at", false);
    let rows = gateway.select(Collection::Guestbook, &query).await?;
    Ok(decode_rows(rows)?.rows)
}

pub async fn submit_message(gateway: &dyn Gateway, message: &NewMessage) -> FarmResult<()> {
    gateway.insert(Collection::Guestbook, to_json(message)?).await?;
    Ok(())
}

pub async fn increment_likes_rpc(gateway: &dyn Gateway, id: &str) -> FarmResult<()> {
    gateway
        .rpc("increment_guestbook_likes", json!({ "message_id": id }))
        .await?;
    Ok(())
}

pub async fn set_likes_count(gateway: &dyn Gateway, id: &str, count: i64) -> FarmResult<()> {
    gateway
        .update(Collection::Guestbook, &Filter::id(id), json!({ "likes_count": count }))
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::mock::{Call, MockGateway};
    use crate::gateway::Order;

    #[tokio::test]
    async fn test_popular_page_query() {
        let gateway = MockGateway::new();
        list_approved_page(&gateway, SortOrder::Popular, RowRange { from: 10, to: 19 })
            .await
            .unwrap();

        let calls = gateway.calls();
        let Call::Select(collection, query) = &calls[0] else {
            panic!("expected a select");
        };
        assert_eq!(*collection, Collection::Guestbook);
        assert_eq!(query.filters, vec![Filter::Eq("is_approved", "true".into())]);
        assert_eq!(
            query.order,
            vec![
                Order { column: "is_featured", ascending: false },
                Order { column: "likes_count", ascending: false },
                Order { column: "created_at", ascending: false },
            ]
        );
        assert_eq!(query.range, Some(RowRange { from: 10, to: 19 }));
        assert!(query.exact_count);
    }

    #[tokio::test]
    async fn test_page_returns_total_from_backend() {
        let rows = (0..12)
            .map(|i| {
                json!({
                    "id": format!("m{}", i), "author": "a", "content": "hello world",
                    "likes_count": 0, "is_approved": true, "is_featured": false,
                    "created_at": "2025-01-01T00:00:00Z"
                })
            })
            .collect();
        let gateway = MockGateway::new().with_rows(Collection::Guestbook, rows);

        let page = list_approved_page(&gateway, SortOrder::Newest, RowRange { from: 10, to: 19 })
            .await
            .unwrap();
        assert_eq!(page.rows.len(), 2);
        assert_eq!(page.total, Some(12));
    }

    #[tokio::test]
    async fn test_submit_inserts_author_and_content() {
        let gateway = MockGateway::new();
        let message = NewMessage {
            author: "小明".into(),
            content: "这个网站很有用！".into(),
        };
        submit_message(&gateway, &message).await.unwrap();
        assert_eq!(
            gateway.calls(),
            vec![Call::Insert(
                Collection::Guestbook,
                json!({ "author": "小明", "content": "这个网站很有用！" })
            )]
        );
    }

    #[test]
    fn test_sort_parse() {
        assert_eq!(SortOrder::parse("popular"), SortOrder::Popular);
        assert_eq!(SortOrder::parse("whatever"), SortOrder::Newest);
    }
}
