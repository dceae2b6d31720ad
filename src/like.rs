//! Guestbook Likes
//!
//! Optimistic like in three steps: `begin` shows the new count and locks
//! the control, `send` asks the backend, `finish` either records the id
//! durably or restores the previous count.

use std::collections::BTreeSet;

use crate::error::{FarmError, FarmResult};
use crate::gateway::{increment_likes_rpc, set_likes_count, Gateway};
use crate::storage::{load_or_empty, LikeStore};

/// Like shown before the backend confirmed it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tentative {
    pub id: String,
    pub original: i64,
    pub displayed: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LikeCommit {
    pub id: String,
    pub count: i64,
}

#[derive(Debug, Clone)]
pub struct LikeRollback {
    pub id: String,
    pub restored: i64,
    pub error: FarmError,
}

/// Per-session like state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LikeFlow {
    liked: BTreeSet<String>,
    in_flight: BTreeSet<String>,
}

impl LikeFlow {
    pub fn new(liked: BTreeSet<String>) -> Self {
        Self {
            liked,
            in_flight: BTreeSet::new(),
        }
    }

    pub fn from_store(store: &dyn LikeStore) -> Self {
        Self::new(load_or_empty(store))
    }

    pub fn is_liked(&self, id: &str) -> bool {
        self.liked.contains(id)
    }

    pub fn is_pending(&self, id: &str) -> bool {
        self.in_flight.contains(id)
    }

    /// Control is disabled while pending and after success
    pub fn is_disabled(&self, id: &str) -> bool {
        self.is_liked(id) || self.is_pending(id)
    }

    /// Count to display for a row whose stored count is `stored`
    pub fn display_count(&self, id: &str, stored: i64) -> i64 {
        if self.is_pending(id) {
            stored + 1
        } else {
            stored
        }
    }

    /// Start a like. `None` when already liked or already in flight.
    pub fn begin(&mut self, id: &str, displayed: i64) -> Option<Tentative> {
        if self.is_disabled(id) {
            return None;
        }
        self.in_flight.insert(id.to_string());
        Some(Tentative {
            id: id.to_string(),
            original: displayed,
            displayed: displayed + 1,
        })
    }

    pub fn finish(
        &mut self,
        tentative: Tentative,
        outcome: FarmResult<()>,
        store: &dyn LikeStore,
    ) -> Result<LikeCommit, LikeRollback> {
        match outcome {
            Ok(()) => Ok(self.commit(tentative, store)),
            Err(error) => Err(self.rollback(tentative, error)),
        }
    }

    fn commit(&mut self, tentative: Tentative, store: &dyn LikeStore) -> LikeCommit {
        self.in_flight.remove(&tentative.id);
        self.liked.insert(tentative.id.clone());
        if let Err(e) = store.save(&self.liked) {
            tracing::warn!("[LIKES] could not persist liked set: {}", e);
        }
        LikeCommit {
            id: tentative.id,
            count: tentative.displayed,
        }
    }

    fn rollback(&mut self, tentative: Tentative, error: FarmError) -> LikeRollback {
        self.in_flight.remove(&tentative.id);
        LikeRollback {
            id: tentative.id,
            restored: tentative.original,
            error,
        }
    }
}

/// Ask the backend to count the like. Falls back to writing the
/// displayed count when the RPC is unavailable.
pub async fn send(gateway: &dyn Gateway, tentative: &Tentative) -> FarmResult<()> {
    if let Err(e) = increment_likes_rpc(gateway, &tentative.id).await {
        tracing::debug!("[LIKES] rpc failed, writing count directly: {}", e);
        set_likes_count(gateway, &tentative.id, tentative.displayed).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::mock::{Call, MockGateway};
    use crate::gateway::{Collection, Filter};
    use crate::storage::MemoryLikeStore;
    use serde_json::json;

    /// Full round trip. `None` when the like was a no-op.
    async fn like_message(
        flow: &mut LikeFlow,
        gateway: &dyn Gateway,
        store: &dyn LikeStore,
        id: &str,
        displayed: i64,
    ) -> Option<Result<LikeCommit, LikeRollback>> {
        let tentative = flow.begin(id, displayed)?;
        let outcome = send(gateway, &tentative).await;
        Some(flow.finish(tentative, outcome, store))
    }

    #[tokio::test]
    async fn test_like_once_then_noop() {
        let gateway = MockGateway::new();
        let store = MemoryLikeStore::new();
        let mut flow = LikeFlow::new(BTreeSet::new());

        let first = like_message(&mut flow, &gateway, &store, "m1", 4).await;
        let commit = first.unwrap().unwrap();
        assert_eq!(commit.count, 5);
        assert!(flow.is_disabled("m1"));
        assert_eq!(store.raw().as_deref(), Some(r#"["m1"]"#));

        assert!(like_message(&mut flow, &gateway, &store, "m1", 5).await.is_none());
        assert_eq!(gateway.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_rpc_failure_falls_back_to_update() {
        let mut gateway = MockGateway::new();
        gateway.fail_rpc = true;
        let store = MemoryLikeStore::new();
        let mut flow = LikeFlow::default();

        let commit = like_message(&mut flow, &gateway, &store, "m1", 2)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(commit.count, 3);
        assert_eq!(
            gateway.calls()[1],
            Call::Update(Collection::Guestbook, Filter::id("m1"), json!({ "likes_count": 3 }))
        );
    }

    #[tokio::test]
    async fn test_remote_failure_rolls_back() {
        let mut gateway = MockGateway::new();
        gateway.fail_rpc = true;
        gateway.fail_update = true;
        let store = MemoryLikeStore::new();
        let mut flow = LikeFlow::default();

        let rollback = like_message(&mut flow, &gateway, &store, "m1", 7)
            .await
            .unwrap()
            .unwrap_err();
        assert_eq!(rollback.restored, 7);
        assert!(!flow.is_disabled("m1"));
        assert_eq!(flow.display_count("m1", 7), 7);
        assert!(store.raw().is_none());

        // control is usable again
        assert!(flow.begin("m1", 7).is_some());
    }

    #[test]
    fn test_pending_like_blocks_second_begin() {
        let mut flow = LikeFlow::default();
        let tentative = flow.begin("m1", 0).unwrap();
        assert_eq!(tentative.displayed, 1);
        assert_eq!(flow.display_count("m1", 0), 1);
        assert!(flow.begin("m1", 1).is_none());
    }

    #[test]
    fn test_previously_liked_ids_are_disabled() {
        let store = MemoryLikeStore::with_raw(r#"["m9"]"#);
        let mut flow = LikeFlow::from_store(&store);
        assert!(flow.is_liked("m9"));
        assert!(flow.begin("m9", 3).is_none());
    }
}
