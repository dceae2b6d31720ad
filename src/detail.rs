//! Detail / Modal Controller
//!
//! Tracks whether a content type shows its list or a single item, and
//! derives related items from the loaded snapshot.

use crate::models::{Record, Tutorial};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ViewMode {
    #[default]
    List,
    Detail(String),
}

/// Where activating a tutorial card leads
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailTarget {
    /// Rendered by the in-page reader
    InPage,
    /// Opened in a new browser tab
    External(String),
}

impl DetailTarget {
    pub fn for_tutorial(tutorial: &Tutorial) -> Self {
        match &tutorial.external_url {
            Some(url) if tutorial.content_type.is_external() && !url.trim().is_empty() => {
                DetailTarget::External(url.clone())
            }
            _ => DetailTarget::InPage,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailController {
    mode: ViewMode,
}

impl DetailController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> &ViewMode {
        &self.mode
    }

    pub fn is_open(&self) -> bool {
        matches!(self.mode, ViewMode::Detail(_))
    }

    pub fn selected_id(&self) -> Option<&str> {
        match &self.mode {
            ViewMode::Detail(id) => Some(id),
            ViewMode::List => None,
        }
    }

    pub fn open(&mut self, id: impl Into<String>) {
        self.mode = ViewMode::Detail(id.into());
    }

    pub fn close(&mut self) {
        self.mode = ViewMode::List;
    }

    /// Open a tutorial. External content leaves the mode untouched and
    /// hands back the URL to open instead.
    pub fn open_tutorial(&mut self, tutorial: &Tutorial) -> DetailTarget {
        let target = DetailTarget::for_tutorial(tutorial);
        if target == DetailTarget::InPage {
            self.open(tutorial.id.clone());
        }
        target
    }

    /// The selected row, if it is still in `snapshot`
    pub fn selected<'a, T: Record>(&self, snapshot: &'a [T]) -> Option<&'a T> {
        let id = self.selected_id()?;
        snapshot.iter().find(|item| item.id() == id)
    }
}

/// Other items sharing at least one tag with `item`, in snapshot order
pub fn related<T: Record>(snapshot: &[T], item: &T, limit: usize) -> Vec<T> {
    if item.tags().is_empty() {
        return Vec::new();
    }
    snapshot
        .iter()
        .filter(|other| other.id() != item.id())
        .filter(|other| other.tags().iter().any(|tag| item.tags().contains(tag)))
        .take(limit)
        .cloned()
        .collect()
}
