//! Tutorial calls, including the view counter and manual ordering.

use serde_json::{json, Value};

use super::{decode_rows, to_json, Collection, Filter, Gateway, Query};
use crate::error::FarmResult;
use crate::models::{Tutorial, TutorialDraft};

const WITH_TOOL: &str = "*, ai_tools ( id, name, image_url )";

pub async fn list_tutorials(gateway: &dyn Gateway) -> FarmResult<Vec<Tutorial>> {
    let query = Query::all().columns(WITH_TOOL).order("created_at", false);
    let rows = gateway.select(Collection::Tutorials, &query).await?;
    Ok(decode_rows(rows)?.rows)
}

/// Admin order: manual position, then newest
pub async fn list_tutorials_admin(gateway: &dyn Gateway) -> FarmResult<Vec<Tutorial>> {
    let query = Query::all()
        .columns(WITH_TOOL)
        .order("display_order", true)
        .order("created_at", false);
    let rows = gateway.select(Collection::Tutorials, &query).await?;
    Ok(decode_rows(rows)?.rows)
}

/// Fresh copy of one tutorial for the reader
pub async fn get_tutorial(gateway: &dyn Gateway, id: &str) -> FarmResult<Option<Tutorial>> {
    let query = Query::all().columns(WITH_TOOL).eq("id", id).limit(1);
    let rows = gateway.select(Collection::Tutorials, &query).await?;
    Ok(decode_rows(rows)?.rows.into_iter().next())
}

pub async fn create_tutorial(gateway: &dyn Gateway, draft: &TutorialDraft) -> FarmResult<Value> {
    gateway.insert(Collection::Tutorials, to_json(draft)?).await
}

pub async fn update_tutorial(gateway: &dyn Gateway, id: &str, draft: &TutorialDraft) -> FarmResult<()> {
    gateway
        .update(Collection::Tutorials, &Filter::id(id), to_json(draft)?)
        .await
}

pub async fn set_display_order(gateway: &dyn Gateway, id: &str, order: i32) -> FarmResult<()> {
    gateway
        .update(
            Collection::Tutorials,
            &Filter::id(id),
            json!({ "display_order": order }),
        )
        .await
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Up,
    Down,
}

/// `display_order` writes that swap the row at `id` with its neighbour.
///
/// When the stored orders are strictly increasing only the two values are
/// exchanged. Otherwise (ties or unset values) the whole list is renumbered
/// by position with the two rows swapped, so the move is always visible.
pub fn swap_plan(list: &[Tutorial], id: &str, direction: MoveDirection) -> Option<Vec<(String, i32)>> {
    let index = list.iter().position(|t| t.id == id)?;
    let neighbour = match direction {
        MoveDirection::Up => index.checked_sub(1)?,
        MoveDirection::Down => Some(index + 1).filter(|&i| i < list.len())?,
    };

    let orders: Option<Vec<i32>> = list.iter().map(|t| t.display_order).collect();
    if let Some(orders) = orders.filter(|o| o.windows(2).all(|w| w[0] < w[1])) {
        let (a, b) = (&list[index], &list[neighbour]);
        return Some(vec![
            (a.id.clone(), orders[neighbour]),
            (b.id.clone(), orders[index]),
        ]);
    }

    let mut ids: Vec<&str> = list.iter().map(|t| t.id.as_str()).collect();
    ids.swap(index, neighbour);
    Some(
        ids.into_iter()
            .enumerate()
            .filter(|(position, id)| {
                let current = &list[*position];
                current.id != *id || current.display_order != Some(*position as i32)
            })
            .map(|(position, id)| (id.to_string(), position as i32))
            .collect(),
    )
}

/// Swap a tutorial with its neighbour. `false` when already at the edge.
pub async fn move_tutorial(
    gateway: &dyn Gateway,
    list: &[Tutorial],
    id: &str,
    direction: MoveDirection,
) -> FarmResult<bool> {
    let Some(plan) = swap_plan(list, id, direction) else {
        return Ok(false);
    };
    for (id, order) in plan {
        set_display_order(gateway, &id, order).await?;
    }
    Ok(true)
}

/// Bump `view_count`. Falls back to read-then-write when the RPC is missing.
pub async fn increment_tutorial_views(gateway: &dyn Gateway, id: &str) -> FarmResult<()> {
    let rpc = gateway
        .rpc("increment_tutorial_views", json!({ "tutorial_id": id }))
        .await;
    if rpc.is_ok() {
        return Ok(());
    }

    let query = Query::all().columns("view_count").eq("id", id).limit(1);
    let current = gateway
        .select(Collection::Tutorials, &query)
        .await?
        .rows
        .first()
        .and_then(|row| row.get("view_count"))
        .and_then(Value::as_i64)
        .unwrap_or(0);

    gateway
        .update(
            Collection::Tutorials,
            &Filter::id(id),
            json!({ "view_count": current + 1 }),
        )
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::mock::{Call, MockGateway};
    use crate::models::fixtures::tutorial;
    use crate::models::ContentType;

    fn ordered(orders: &[Option<i32>]) -> Vec<Tutorial> {
        orders
            .iter()
            .enumerate()
            .map(|(i, order)| {
                let mut t = tutorial(&format!("t{}", i), ContentType::Markdown);
                t.display_order = *order;
                t
            })
            .collect()
    }

    fn reordered(list: &[Tutorial], plan: &[(String, i32)]) -> Vec<String> {
        let mut rows: Vec<(i32, usize, String)> = list
            .iter()
            .enumerate()
            .map(|(i, t)| {
                let order = plan
                    .iter()
                    .find(|(id, _)| *id == t.id)
                    .map(|(_, order)| *order)
                    .or(t.display_order)
                    .unwrap_or(0);
                (order, i, t.id.clone())
            })
            .collect();
        rows.sort();
        rows.into_iter().map(|(_, _, id)| id).collect()
    }

    #[test]
    fn test_swap_plan_exchanges_orders() {
        let list = ordered(&[Some(1), Some(5), Some(9)]);
        assert_eq!(
            swap_plan(&list, "t1", MoveDirection::Down),
            Some(vec![("t1".to_string(), 9), ("t2".to_string(), 5)])
        );
        assert_eq!(
            swap_plan(&list, "t1", MoveDirection::Up),
            Some(vec![("t1".to_string(), 1), ("t0".to_string(), 5)])
        );
    }

    #[test]
    fn test_swap_plan_edges() {
        let list = ordered(&[None, None, None]);
        assert_eq!(swap_plan(&list, "t0", MoveDirection::Up), None);
        assert_eq!(swap_plan(&list, "t2", MoveDirection::Down), None);
        assert_eq!(swap_plan(&list, "missing", MoveDirection::Down), None);
    }

    #[test]
    fn test_tied_orders_renumber_whole_list() {
        let list = ordered(&[Some(0); 5]);
        let plan = swap_plan(&list, "t1", MoveDirection::Down).unwrap();

        assert_eq!(reordered(&list, &plan), vec!["t0", "t2", "t1", "t3", "t4"]);
        // t0 already sits at 0
        assert!(plan.iter().all(|(id, _)| id != "t0"));
    }

    #[test]
    fn test_partial_ties_and_unset_orders_move_one_step() {
        let list = ordered(&[Some(0), Some(1), Some(1), None]);
        let plan = swap_plan(&list, "t2", MoveDirection::Up).unwrap();
        assert_eq!(reordered(&list, &plan), vec!["t0", "t2", "t1", "t3"]);

        let plan = swap_plan(&list, "t2", MoveDirection::Down).unwrap();
        assert_eq!(reordered(&list, &plan), vec!["t0", "t1", "t3", "t2"]);
    }

    #[tokio::test]
    async fn test_move_issues_two_updates() {
        let gateway = MockGateway::new();
        let list = ordered(&[Some(0), Some(1)]);
        assert!(move_tutorial(&gateway, &list, "t0", MoveDirection::Down).await.unwrap());
        assert_eq!(
            gateway.calls(),
            vec![
                Call::Update(Collection::Tutorials, Filter::id("t0"), json!({ "display_order": 1 })),
                Call::Update(Collection::Tutorials, Filter::id("t1"), json!({ "display_order": 0 })),
            ]
        );
    }

    #[tokio::test]
    async fn test_view_count_uses_rpc_when_available() {
        let gateway = MockGateway::new();
        increment_tutorial_views(&gateway, "t1").await.unwrap();
        assert_eq!(
            gateway.calls(),
            vec![Call::Rpc(
                "increment_tutorial_views".into(),
                json!({ "tutorial_id": "t1" })
            )]
        );
    }

    #[tokio::test]
    async fn test_view_count_falls_back_to_read_then_write() {
        let mut gateway = MockGateway::new().with_rows(
            Collection::Tutorials,
            vec![json!({ "id": "t1", "view_count": 41 }), json!({ "id": "t2", "view_count": 7 })],
        );
        gateway.fail_rpc = true;

        increment_tutorial_views(&gateway, "t1").await.unwrap();

        let calls = gateway.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(
            calls[2],
            Call::Update(Collection::Tutorials, Filter::id("t1"), json!({ "view_count": 42 }))
        );
    }

    #[tokio::test]
    async fn test_missing_view_count_starts_from_zero() {
        let mut gateway = MockGateway::new()
            .with_rows(Collection::Tutorials, vec![json!({ "id": "t1", "view_count": null })]);
        gateway.fail_rpc = true;

        increment_tutorial_views(&gateway, "t1").await.unwrap();
        assert_eq!(
            gateway.calls().last(),
            Some(&Call::Update(Collection::Tutorials, Filter::id("t1"), json!({ "view_count": 1 })))
        );
    }
}
