//! Admin Actions
//!
//! Row and batch actions as a typed enum, dispatched through one
//! registry. Every successful mutation yields a fresh snapshot built from
//! the old one; rows are never patched in place.

use std::sync::Arc;

use serde_json::json;

use crate::error::FarmResult;
use crate::gateway::{Collection, Filter, Gateway};
use crate::like::{self, Tentative};
use crate::models::{GuestbookMessage, Record, Tool, Tutorial, WeekReport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Approve(bool),
    Feature(bool),
    Delete,
    Like,
    Edit,
}

impl Action {
    pub fn label(&self) -> &'static str {
        match self {
            Action::Approve(true) => "审核通过",
            Action::Approve(false) => "取消审核",
            Action::Feature(true) => "置顶",
            Action::Feature(false) => "取消置顶",
            Action::Delete => "删除",
            Action::Like => "点赞",
            Action::Edit => "编辑",
        }
    }

    pub fn success_message(&self, count: usize) -> String {
        match self {
            Action::Approve(true) if count > 1 => format!("已审核通过 {} 条留言", count),
            Action::Approve(true) => "已审核通过".to_string(),
            Action::Approve(false) => "已取消审核".to_string(),
            Action::Feature(true) => "已置顶".to_string(),
            Action::Feature(false) => "已取消置顶".to_string(),
            Action::Delete if count > 1 => format!("已删除 {} 条记录", count),
            Action::Delete => "删除成功".to_string(),
            Action::Like => "点赞成功".to_string(),
            Action::Edit => String::new(),
        }
    }
}

/// Rows an action applies to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    One(String),
    Many(Vec<String>),
}

impl Target {
    pub fn filter(&self) -> Filter {
        match self {
            Target::One(id) => Filter::id(id.clone()),
            Target::Many(ids) => Filter::ids(ids.clone()),
        }
    }

    pub fn ids(&self) -> Vec<String> {
        match self {
            Target::One(id) => vec![id.clone()],
            Target::Many(ids) => ids.clone(),
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        match self {
            Target::One(one) => one == id,
            Target::Many(ids) => ids.iter().any(|i| i == id),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Target::One(_) => 1,
            Target::Many(ids) => ids.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Rows the registry can act on
pub trait Moderated: Record {
    const COLLECTION: Collection;

    fn supports(action: Action) -> bool;

    /// Local effect of a successful remote `action`
    fn applied(&self, action: Action) -> Self;

    fn like_count(&self) -> i64 {
        0
    }
}

impl Moderated for GuestbookMessage {
    const COLLECTION: Collection = Collection::Guestbook;

    fn supports(action: Action) -> bool {
        !matches!(action, Action::Edit)
    }

    fn applied(&self, action: Action) -> Self {
        let mut next = self.clone();
        match action {
            Action::Approve(on) => next.is_approved = on,
            Action::Feature(on) => next.is_featured = on,
            Action::Like => next.likes_count = Some(self.likes() + 1),
            Action::Delete | Action::Edit => {}
        }
        next
    }

    fn like_count(&self) -> i64 {
        self.likes()
    }
}

impl Moderated for Tool {
    const COLLECTION: Collection = Collection::Tools;

    fn supports(action: Action) -> bool {
        matches!(action, Action::Feature(_) | Action::Delete | Action::Edit)
    }

    fn applied(&self, action: Action) -> Self {
        let mut next = self.clone();
        if let Action::Feature(on) = action {
            next.is_featured = on;
        }
        next
    }
}

impl Moderated for Tutorial {
    const COLLECTION: Collection = Collection::Tutorials;

    fn supports(action: Action) -> bool {
        matches!(action, Action::Feature(_) | Action::Delete | Action::Edit)
    }

    fn applied(&self, action: Action) -> Self {
        let mut next = self.clone();
        if let Action::Feature(on) = action {
            next.is_featured = on;
        }
        next
    }
}

impl Moderated for WeekReport {
    const COLLECTION: Collection = Collection::WeekReports;

    fn supports(action: Action) -> bool {
        matches!(action, Action::Delete | Action::Edit)
    }

    fn applied(&self, _action: Action) -> Self {
        self.clone()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    /// Remote change accepted; the new snapshot replaces the old one
    Updated(Vec<T>),
    /// Open the editor for this row
    Edit(T),
    /// Action not offered for this row type, or target not in snapshot
    Ignored,
}

#[derive(Clone)]
pub struct ActionRegistry {
    gateway: Arc<dyn Gateway>,
}

impl ActionRegistry {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self { gateway }
    }

    pub async fn dispatch<T: Moderated>(
        &self,
        action: Action,
        target: &Target,
        snapshot: &[T],
    ) -> FarmResult<Outcome<T>> {
        if !T::supports(action) || target.is_empty() {
            return Ok(Outcome::Ignored);
        }
        tracing::info!("[ACTIONS] {:?} on {} {} row(s)", action, T::COLLECTION.table(), target.len());

        let gateway = self.gateway.as_ref();
        match action {
            Action::Edit => {
                let Target::One(id) = target else {
                    return Ok(Outcome::Ignored);
                };
                Ok(snapshot
                    .iter()
                    .find(|row| row.id() == id)
                    .cloned()
                    .map(Outcome::Edit)
                    .unwrap_or(Outcome::Ignored))
            }
            Action::Delete => {
                gateway.delete(T::COLLECTION, &target.filter()).await?;
                Ok(Outcome::Updated(
                    snapshot
                        .iter()
                        .filter(|row| !target.contains(row.id()))
                        .cloned()
                        .collect(),
                ))
            }
            Action::Approve(on) => {
                gateway
                    .update(T::COLLECTION, &target.filter(), json!({ "is_approved": on }))
                    .await?;
                Ok(Outcome::Updated(rebuild(snapshot, target, action)))
            }
            Action::Feature(on) => {
                gateway
                    .update(T::COLLECTION, &target.filter(), json!({ "is_featured": on }))
                    .await?;
                Ok(Outcome::Updated(rebuild(snapshot, target, action)))
            }
            Action::Like => {
                for id in target.ids() {
                    let Some(row) = snapshot.iter().find(|row| row.id() == id) else {
                        continue;
                    };
                    let original = row.like_count();
                    let tentative = Tentative {
                        id,
                        original,
                        displayed: original + 1,
                    };
                    like::send(gateway, &tentative).await?;
                }
                Ok(Outcome::Updated(rebuild(snapshot, target, action)))
            }
        }
    }
}

fn rebuild<T: Moderated>(snapshot: &[T], target: &Target, action: Action) -> Vec<T> {
    snapshot
        .iter()
        .map(|row| {
            if target.contains(row.id()) {
                row.applied(action)
            } else {
                row.clone()
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::mock::{Call, MockGateway};
    use crate::models::fixtures::{message, tool};

    fn registry(gateway: MockGateway) -> (ActionRegistry, Arc<MockGateway>) {
        let gateway = Arc::new(gateway);
        (ActionRegistry::new(gateway.clone()), gateway)
    }

    #[tokio::test]
    async fn test_batch_approve() {
        let (registry, gateway) = registry(MockGateway::new());
        let snapshot = vec![
            message("a", false, false),
            message("b", false, false),
            message("c", false, false),
        ];
        let target = Target::Many(vec!["a".into(), "c".into()]);

        let outcome = registry
            .dispatch(Action::Approve(true), &target, &snapshot)
            .await
            .unwrap();

        assert_eq!(
            gateway.calls(),
            vec![Call::Update(
                Collection::Guestbook,
                Filter::ids(vec!["a".into(), "c".into()]),
                json!({ "is_approved": true })
            )]
        );
        let Outcome::Updated(next) = outcome else {
            panic!("expected an update");
        };
        let approved: Vec<_> = next.iter().map(|m| m.is_approved).collect();
        assert_eq!(approved, vec![true, false, true]);
        // old snapshot untouched
        assert!(snapshot.iter().all(|m| !m.is_approved));
    }

    #[tokio::test]
    async fn test_delete_removes_rows() {
        let (registry, gateway) = registry(MockGateway::new());
        let snapshot = vec![message("a", true, false), message("b", true, false)];

        let outcome = registry
            .dispatch(Action::Delete, &Target::One("a".into()), &snapshot)
            .await
            .unwrap();

        assert_eq!(gateway.calls(), vec![Call::Delete(Collection::Guestbook, Filter::id("a"))]);
        assert_eq!(outcome, Outcome::Updated(vec![message("b", true, false)]));
    }

    #[tokio::test]
    async fn test_feature_tool() {
        let (registry, _) = registry(MockGateway::new());
        let snapshot = vec![tool("t1", "One", &[])];
        let outcome = registry
            .dispatch(Action::Feature(true), &Target::One("t1".into()), &snapshot)
            .await
            .unwrap();
        let Outcome::Updated(next) = outcome else {
            panic!("expected an update");
        };
        assert!(next[0].is_featured);
    }

    #[tokio::test]
    async fn test_unsupported_action_makes_no_call() {
        let (registry, gateway) = registry(MockGateway::new());
        let snapshot = vec![tool("t1", "One", &[])];
        let outcome = registry
            .dispatch(Action::Approve(true), &Target::One("t1".into()), &snapshot)
            .await
            .unwrap();
        assert_eq!(outcome, Outcome::Ignored);
        assert!(gateway.calls().is_empty());
    }

    #[tokio::test]
    async fn test_edit_returns_row_without_remote_call() {
        let (registry, gateway) = registry(MockGateway::new());
        let snapshot = vec![tool("t1", "One", &[])];
        let outcome = registry
            .dispatch(Action::Edit, &Target::One("t1".into()), &snapshot)
            .await
            .unwrap();
        assert_eq!(outcome, Outcome::Edit(tool("t1", "One", &[])));
        assert!(gateway.calls().is_empty());
    }

    #[tokio::test]
    async fn test_like_goes_through_rpc() {
        let (registry, gateway) = registry(MockGateway::new());
        let snapshot = vec![message("a", true, false)];
        let outcome = registry
            .dispatch(Action::Like, &Target::One("a".into()), &snapshot)
            .await
            .unwrap();
        assert_eq!(
            gateway.calls(),
            vec![Call::Rpc("increment_guestbook_likes".into(), json!({ "message_id": "a" }))]
        );
        let Outcome::Updated(next) = outcome else {
            panic!("expected an update");
        };
        assert_eq!(next[0].likes(), 1);
    }

    #[tokio::test]
    async fn test_failed_update_keeps_snapshot() {
        let mut mock = MockGateway::new();
        mock.fail_update = true;
        let (registry, _) = registry(mock);
        let snapshot = vec![message("a", false, false)];
        let result = registry
            .dispatch(Action::Approve(true), &Target::One("a".into()), &snapshot)
            .await;
        assert!(result.is_err());
        assert!(!snapshot[0].is_approved);
    }
}
