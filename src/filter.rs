//! Filter / Search Engine
//!
//! Pure, order-preserving narrowing of a loaded snapshot by search text,
//! tag facets and a status facet.

use std::collections::BTreeSet;

use crate::models::Record;

/// Named status predicate
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFacet {
    #[default]
    All,
    Pending,
    Approved,
    Featured,
}

impl StatusFacet {
    pub const ALL: [StatusFacet; 4] = [
        StatusFacet::All,
        StatusFacet::Pending,
        StatusFacet::Approved,
        StatusFacet::Featured,
    ];

    pub fn matches<T: Record>(&self, item: &T) -> bool {
        match self {
            StatusFacet::All => true,
            StatusFacet::Pending => !item.is_approved(),
            StatusFacet::Approved => item.is_approved(),
            StatusFacet::Featured => item.is_featured(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusFacet::All => "all",
            StatusFacet::Pending => "pending",
            StatusFacet::Approved => "approved",
            StatusFacet::Featured => "featured",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StatusFacet::All => "全部",
            StatusFacet::Pending => "待审核",
            StatusFacet::Approved => "已审核",
            StatusFacet::Featured => "已置顶",
        }
    }

    pub fn parse(value: &str) -> Self {
        match value {
            "pending" => StatusFacet::Pending,
            "approved" => StatusFacet::Approved,
            "featured" => StatusFacet::Featured,
            _ => StatusFacet::All,
        }
    }
}

/// Per-view filter session
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterState {
    query: String,
    active_tags: BTreeSet<String>,
    pub status: StatusFacet,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Store the trimmed, lower-cased query
    pub fn set_query(&mut self, text: &str) {
        self.query = text.trim().to_lowercase();
    }

    pub fn set_status(&mut self, status: StatusFacet) {
        self.status = status;
    }

    pub fn active_tags(&self) -> &BTreeSet<String> {
        &self.active_tags
    }

    pub fn is_tag_active(&self, tag: &str) -> bool {
        self.active_tags.contains(tag)
    }

    pub fn toggle_tag(&mut self, tag: &str) {
        if !self.active_tags.remove(tag) {
            self.active_tags.insert(tag.to_string());
        }
    }

    /// True when anything narrows the result
    pub fn is_active(&self) -> bool {
        !self.query.is_empty() || !self.active_tags.is_empty() || self.status != StatusFacet::All
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn matches<T: Record>(&self, item: &T) -> bool {
        let text_ok = self.query.is_empty()
            || item
                .search_fields()
                .iter()
                .any(|field| field.to_lowercase().contains(&self.query));

        let tags_ok = self.active_tags.is_empty()
            || item.tags().iter().any(|tag| self.active_tags.contains(tag));

        text_ok && tags_ok && self.status.matches(item)
    }
}

/// Items passing `state`, in input order
pub fn apply<T: Record>(items: &[T], state: &FilterState) -> Vec<T> {
    items.iter().filter(|item| state.matches(*item)).cloned().collect()
}

/// Sorted, de-duplicated tags across the snapshot
pub fn collect_tags<T: Record>(items: &[T]) -> Vec<String> {
    items
        .iter()
        .flat_map(|item| item.tags().iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Result count line shown above a filtered list
pub fn results_summary(shown: usize, total: usize, noun: &str, filtered: bool) -> String {
    if filtered {
        format!("找到 {} 个{}（共 {} 个）", shown, noun, total)
    } else {
        format!("共 {} 个{}", total, noun)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::{message, tool};

    fn tools() -> Vec<crate::models::Tool> {
        vec![
            tool("1", "ChatGPT", &["chat", "writing"]),
            tool("2", "Midjourney", &["image"]),
            tool("3", "Claude", &["chat"]),
            tool("4", "Runway", &["video", "image"]),
        ]
    }

    #[test]
    fn test_empty_state_is_identity() {
        let items = tools();
        assert_eq!(apply(&items, &FilterState::new()), items);
    }

    #[test]
    fn test_query_is_case_insensitive_over_all_fields() {
        let items = tools();
        let mut state = FilterState::new();
        state.set_query("  MIDJ ");
        let ids: Vec<_> = apply(&items, &state).into_iter().map(|t| t.id).collect();
        assert_eq!(ids, vec!["2"]);

        // matches description too
        state.set_query("claude desc");
        assert_eq!(apply(&items, &state).len(), 1);
    }

    #[test]
    fn test_tags_are_or_combined_and_order_is_stable() {
        let items = tools();
        let mut state = FilterState::new();
        state.toggle_tag("image");
        state.toggle_tag("chat");
        let ids: Vec<_> = apply(&items, &state).into_iter().map(|t| t.id).collect();
        assert_eq!(ids, vec!["1", "2", "3", "4"]);

        state.toggle_tag("chat");
        let ids: Vec<_> = apply(&items, &state).into_iter().map(|t| t.id).collect();
        assert_eq!(ids, vec!["2", "4"]);
    }

    #[test]
    fn test_query_and_tags_are_and_combined() {
        let items = tools();
        let mut state = FilterState::new();
        state.toggle_tag("chat");
        state.set_query("claude");
        let ids: Vec<_> = apply(&items, &state).into_iter().map(|t| t.id).collect();
        assert_eq!(ids, vec!["3"]);
    }

    #[test]
    fn test_pending_and_approved_partition() {
        let items = vec![
            message("a", true, false),
            message("b", false, false),
            message("c", true, true),
            message("d", false, true),
        ];
        let mut state = FilterState::new();

        state.set_status(StatusFacet::Pending);
        let pending = apply(&items, &state);
        assert!(pending.iter().all(|m| !m.is_approved));
        assert_eq!(pending.len(), 2);

        state.set_status(StatusFacet::Approved);
        let approved = apply(&items, &state);
        assert!(approved.iter().all(|m| m.is_approved));
        assert_eq!(pending.len() + approved.len(), items.len());

        state.set_status(StatusFacet::Featured);
        let ids: Vec<_> = apply(&items, &state).into_iter().map(|m| m.id).collect();
        assert_eq!(ids, vec!["c", "d"]);
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut state = FilterState::new();
        state.set_query("x");
        state.toggle_tag("chat");
        state.set_status(StatusFacet::Pending);
        assert!(state.is_active());
        state.clear();
        assert!(!state.is_active());
        assert_eq!(state, FilterState::default());
    }

    #[test]
    fn test_clear_restores_identity_filter() {
        let items = tools();
        let mut state = FilterState::new();
        state.set_query("chat");
        state.toggle_tag("image");
        state.set_status(StatusFacet::Featured);
        assert!(apply(&items, &state).is_empty());

        state.clear();
        assert_eq!(state.query(), "");
        assert_eq!(apply(&items, &state), items);
    }

    #[test]
    fn test_collect_tags_sorted_unique() {
        assert_eq!(collect_tags(&tools()), vec!["chat", "image", "video", "writing"]);
    }

    #[test]
    fn test_results_summary() {
        assert_eq!(results_summary(2, 9, "工具", true), "找到 2 个工具（共 9 个）");
        assert_eq!(results_summary(9, 9, "工具", false), "共 9 个工具");
    }

    #[test]
    fn test_facet_parse_round_trip() {
        for facet in StatusFacet::ALL {
            assert_eq!(StatusFacet::parse(facet.as_str()), facet);
        }
    }
}
