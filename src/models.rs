//! Frontend Models
//!
//! Rows as the backend returns them, plus the drafts sent on insert/update.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Common view of every content row, used by filtering, rendering and
/// the detail controller.
pub trait Record: Clone + PartialEq + 'static {
    fn id(&self) -> &str;
    /// Text fields matched by the search box
    fn search_fields(&self) -> Vec<&str>;
    fn tags(&self) -> &[String] {
        &[]
    }
    fn is_featured(&self) -> bool {
        false
    }
    fn is_approved(&self) -> bool {
        true
    }
    fn timestamp(&self) -> DateTime<Utc>;
}

/// `null` and missing arrays both become empty
fn nullable_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

fn nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn nullable_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}

// ========================
// AI Tools
// ========================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tool {
    pub id: String,
    pub name: String,
    pub url: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub description: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub pricing: Option<String>,
    #[serde(default, deserialize_with = "nullable_vec")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "nullable_vec")]
    pub features: Vec<String>,
    #[serde(default, deserialize_with = "nullable_bool")]
    pub is_featured: bool,
    pub created_at: DateTime<Utc>,
}

impl Record for Tool {
    fn id(&self) -> &str {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.description.as_str()]
    }

    fn tags(&self) -> &[String] {
        &self.tags
    }

    fn is_featured(&self) -> bool {
        self.is_featured
    }

    fn timestamp(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Insert/update payload for `ai_tools`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ToolDraft {
    pub name: String,
    pub url: String,
    pub description: String,
    pub image_url: Option<String>,
    pub pricing: Option<String>,
    pub tags: Vec<String>,
    pub features: Vec<String>,
    pub is_featured: bool,
}

impl From<&Tool> for ToolDraft {
    fn from(tool: &Tool) -> Self {
        Self {
            name: tool.name.clone(),
            url: tool.url.clone(),
            description: tool.description.clone(),
            image_url: tool.image_url.clone(),
            pricing: tool.pricing.clone(),
            tags: tool.tags.clone(),
            features: tool.features.clone(),
            is_featured: tool.is_featured,
        }
    }
}

// ========================
// Tutorials
// ========================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    #[default]
    Markdown,
    Url,
    Video,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Markdown => "markdown",
            ContentType::Url => "url",
            ContentType::Video => "video",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ContentType::Markdown => "📄 MD",
            ContentType::Url => "🔗 链接",
            ContentType::Video => "▶️ 视频",
        }
    }

    pub fn parse(value: &str) -> Self {
        match value {
            "url" => ContentType::Url,
            "video" => ContentType::Video,
            _ => ContentType::Markdown,
        }
    }

    /// Opened in a new tab instead of the in-page reader
    pub fn is_external(&self) -> bool {
        !matches!(self, ContentType::Markdown)
    }
}

/// Joined `ai_tools` columns on a tutorial row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolRef {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tutorial {
    pub id: String,
    pub title: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub author: String,
    #[serde(default)]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default, deserialize_with = "nullable_vec")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "nullable_bool")]
    pub is_featured: bool,
    #[serde(default)]
    pub content_type: ContentType,
    #[serde(default)]
    pub content_md: Option<String>,
    #[serde(default)]
    pub external_url: Option<String>,
    #[serde(default)]
    pub tool_id: Option<String>,
    #[serde(default)]
    pub ai_tools: Option<ToolRef>,
    #[serde(default)]
    pub display_order: Option<i32>,
    #[serde(default)]
    pub view_count: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl Record for Tutorial {
    fn id(&self) -> &str {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.title.as_str(), self.author.as_str()];
        if let Some(summary) = &self.summary {
            fields.push(summary.as_str());
        }
        fields
    }

    fn tags(&self) -> &[String] {
        &self.tags
    }

    fn is_featured(&self) -> bool {
        self.is_featured
    }

    fn timestamp(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Insert/update payload for `tutorials`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TutorialDraft {
    pub title: String,
    pub author: String,
    pub cover_image: String,
    pub summary: String,
    pub tags: Vec<String>,
    pub is_featured: bool,
    pub content_type: ContentType,
    pub content_md: Option<String>,
    pub external_url: Option<String>,
    pub tool_id: Option<String>,
}

// ========================
// Weekly Reports
// ========================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekReport {
    pub id: String,
    pub title: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub video_url: String,
    #[serde(default)]
    pub content_md: Option<String>,
    pub published_at: DateTime<Utc>,
}

impl Record for WeekReport {
    fn id(&self) -> &str {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.title.as_str()]
    }

    fn timestamp(&self) -> DateTime<Utc> {
        self.published_at
    }
}

/// Insert/update payload for `weekreports`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekReportDraft {
    pub title: String,
    pub video_url: String,
    pub content_md: Option<String>,
    pub published_at: DateTime<Utc>,
}

// ========================
// Guestbook
// ========================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuestbookMessage {
    pub id: String,
    pub author: String,
    pub content: String,
    #[serde(default)]
    pub likes_count: Option<i64>,
    #[serde(default, deserialize_with = "nullable_bool")]
    pub is_approved: bool,
    #[serde(default, deserialize_with = "nullable_bool")]
    pub is_featured: bool,
    pub created_at: DateTime<Utc>,
}

impl GuestbookMessage {
    pub fn likes(&self) -> i64 {
        self.likes_count.unwrap_or(0)
    }
}

impl Record for GuestbookMessage {
    fn id(&self) -> &str {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.author.as_str(), self.content.as_str()]
    }

    fn is_featured(&self) -> bool {
        self.is_featured
    }

    fn is_approved(&self) -> bool {
        self.is_approved
    }

    fn timestamp(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Visitor submission; moderation fields take their column defaults
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewMessage {
    pub author: String,
    pub content: String,
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use chrono::TimeZone;

    pub fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, day, 12, 0, 0).unwrap()
    }

    pub fn tool(id: &str, name: &str, tags: &[&str]) -> Tool {
        Tool {
            id: id.to_string(),
            name: name.to_string(),
            url: format!("https://{}.example", id),
            description: format!("{} description", name),
            image_url: None,
            pricing: None,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            features: vec![],
            is_featured: false,
            created_at: at(1),
        }
    }

    pub fn message(id: &str, approved: bool, featured: bool) -> GuestbookMessage {
        GuestbookMessage {
            id: id.to_string(),
            author: format!("author-{}", id),
            content: format!("message body {}", id),
            likes_count: Some(0),
            is_approved: approved,
            is_featured: featured,
            created_at: at(2),
        }
    }

    pub fn tutorial(id: &str, content_type: ContentType) -> Tutorial {
        Tutorial {
            id: id.to_string(),
            title: format!("Tutorial {}", id),
            author: "farm".to_string(),
            cover_image: None,
            summary: None,
            tags: vec![],
            is_featured: false,
            content_type,
            content_md: Some("# Hello".to_string()),
            external_url: Some("https://video.example/watch".to_string()),
            tool_id: None,
            ai_tools: None,
            display_order: None,
            view_count: None,
            created_at: at(3),
        }
    }
}
