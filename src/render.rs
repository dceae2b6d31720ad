//! List Renderer
//!
//! Deterministic projections from rows to display fragments. Components
//! only build markup from these, never from raw rows, and always from
//! the output of [`crate::filter::apply`].

use chrono::{DateTime, Local, NaiveDate, Utc};

use crate::detail::DetailTarget;
use crate::media;
use crate::models::{GuestbookMessage, Record, Tool, Tutorial, WeekReport};

pub const TOOL_PLACEHOLDER_IMAGE: &str = "/images/placeholder.png";
pub const TUTORIAL_PLACEHOLDER_IMAGE: &str = "images/placeholders/tutorial.png";
pub const PRICING_UNKNOWN: &str = "价格未知";

const TOOL_DESCRIPTION_CHARS: usize = 100;
const TOOL_CARD_TAGS: usize = 4;
const TUTORIAL_CARD_TAGS: usize = 3;
const ADMIN_PREVIEW_CHARS: usize = 50;

/// Either nothing to show or a non-empty list, never both
#[derive(Debug, Clone, PartialEq)]
pub enum ListView<T> {
    Empty,
    Populated(Vec<T>),
}

impl<T> ListView<T> {
    pub fn from_items(items: Vec<T>) -> Self {
        if items.is_empty() {
            ListView::Empty
        } else {
            ListView::Populated(items)
        }
    }
}

/// Project a filtered snapshot through `card`
pub fn list_view<T: Record, C>(items: &[T], card: impl Fn(&T) -> C) -> ListView<C> {
    ListView::from_items(items.iter().map(card).collect())
}

// ========================
// Text helpers
// ========================

/// Cut to `max_chars` characters, appending "..." when shortened
pub fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        None => text.to_string(),
    }
}

pub fn avatar_letter(author: &str) -> String {
    author
        .chars()
        .next()
        .map(|c| c.to_uppercase().collect())
        .unwrap_or_else(|| "?".to_string())
}

pub fn local_date(ts: DateTime<Utc>) -> NaiveDate {
    ts.with_timezone(&Local).date_naive()
}

/// `2025年01月05日`
pub fn format_date_cn(date: NaiveDate) -> String {
    date.format("%Y年%m月%d日").to_string()
}

/// `2025/01/05`
pub fn format_date_slash(date: NaiveDate) -> String {
    date.format("%Y/%m/%d").to_string()
}

/// Human label for the age of `ts` relative to `now`
pub fn relative_time(ts: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(ts);
    let minutes = elapsed.num_minutes();
    let hours = elapsed.num_hours();
    let days = elapsed.num_days();

    if minutes < 1 {
        "刚刚".to_string()
    } else if minutes < 60 {
        format!("{} 分钟前", minutes)
    } else if hours < 24 {
        format!("{} 小时前", hours)
    } else if days < 7 {
        format!("{} 天前", days)
    } else if days < 30 {
        format!("{} 周前", days / 7)
    } else if days < 365 {
        format!("{} 个月前", days / 30)
    } else {
        format!("{} 年前", days / 365)
    }
}

/// Coarser variant used by moderation tables: recent rows are relative,
/// older ones show the full local timestamp.
pub fn admin_time(ts: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(ts);
    if elapsed.num_hours() < 1 {
        "刚刚".to_string()
    } else if elapsed.num_hours() < 24 {
        format!("{} 小时前", elapsed.num_hours())
    } else if elapsed.num_days() < 7 {
        format!("{} 天前", elapsed.num_days())
    } else {
        ts.with_timezone(&Local).format("%Y/%m/%d %H:%M").to_string()
    }
}

// ========================
// Character counter
// ========================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterLevel {
    Normal,
    Warning,
    Danger,
}

impl CounterLevel {
    pub fn for_length(length: usize, max: usize) -> Self {
        let max = max as f64;
        let length = length as f64;
        if length > max * 0.95 {
            CounterLevel::Danger
        } else if length > max * 0.8 {
            CounterLevel::Warning
        } else {
            CounterLevel::Normal
        }
    }

    pub fn class(&self) -> &'static str {
        match self {
            CounterLevel::Normal => "",
            CounterLevel::Warning => "warning",
            CounterLevel::Danger => "danger",
        }
    }
}

pub fn counter_label(length: usize, max: usize) -> String {
    format!("{} / {}", length, max)
}

// ========================
// Cards
// ========================

#[derive(Debug, Clone, PartialEq)]
pub struct ToolCard {
    pub id: String,
    pub name: String,
    pub url: String,
    pub image: String,
    pub description: String,
    pub tags: Vec<String>,
    pub pricing: String,
    pub featured: bool,
}

impl ToolCard {
    pub fn from_tool(tool: &Tool) -> Self {
        Self {
            id: tool.id.clone(),
            name: tool.name.clone(),
            url: tool.url.clone(),
            image: tool_image(tool),
            description: truncate(&tool.description, TOOL_DESCRIPTION_CHARS),
            tags: tool.tags.iter().take(TOOL_CARD_TAGS).cloned().collect(),
            pricing: pricing_label(tool),
            featured: tool.is_featured,
        }
    }
}

pub fn tool_image(tool: &Tool) -> String {
    tool.image_url
        .clone()
        .filter(|url| !url.is_empty())
        .unwrap_or_else(|| TOOL_PLACEHOLDER_IMAGE.to_string())
}

pub fn pricing_label(tool: &Tool) -> String {
    tool.pricing
        .clone()
        .filter(|p| !p.is_empty())
        .unwrap_or_else(|| PRICING_UNKNOWN.to_string())
}

#[derive(Debug, Clone, PartialEq)]
pub struct TutorialCard {
    pub id: String,
    pub title: String,
    pub summary: Option<String>,
    pub author: String,
    pub cover: String,
    pub type_label: &'static str,
    pub type_class: &'static str,
    pub tool_name: Option<String>,
    pub date: String,
    pub tags: Vec<String>,
    pub featured: bool,
    pub target: DetailTarget,
}

impl TutorialCard {
    pub fn from_tutorial(tutorial: &Tutorial) -> Self {
        Self {
            id: tutorial.id.clone(),
            title: tutorial.title.clone(),
            summary: tutorial.summary.clone().filter(|s| !s.is_empty()),
            author: tutorial.author.clone(),
            cover: tutorial
                .cover_image
                .clone()
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| TUTORIAL_PLACEHOLDER_IMAGE.to_string()),
            type_label: tutorial.content_type.label(),
            type_class: tutorial.content_type.as_str(),
            tool_name: tutorial.ai_tools.as_ref().map(|t| t.name.clone()),
            date: format_date_cn(local_date(tutorial.created_at)),
            tags: tutorial.tags.iter().take(TUTORIAL_CARD_TAGS).cloned().collect(),
            featured: tutorial.is_featured,
            target: DetailTarget::for_tutorial(tutorial),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeekReportCard {
    pub id: String,
    pub title: String,
    pub date: String,
    pub thumbnail: Option<String>,
}

impl WeekReportCard {
    pub fn from_report(report: &WeekReport) -> Self {
        Self {
            id: report.id.clone(),
            title: report.title.clone(),
            date: format_date_cn(local_date(report.published_at)),
            thumbnail: media::thumbnail_url(&report.video_url),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MessageCard {
    pub id: String,
    pub author: String,
    pub avatar: String,
    pub content: String,
    pub time: String,
    pub likes: i64,
    pub liked: bool,
    pub featured: bool,
}

impl MessageCard {
    pub fn from_message(message: &GuestbookMessage, liked: bool, now: DateTime<Utc>) -> Self {
        Self {
            id: message.id.clone(),
            author: message.author.clone(),
            avatar: avatar_letter(&message.author),
            content: message.content.clone(),
            time: relative_time(message.created_at, now),
            likes: message.likes(),
            liked,
            featured: message.is_featured,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Badge {
    Featured,
    Approved,
    Pending,
}

impl Badge {
    pub fn label(&self) -> &'static str {
        match self {
            Badge::Featured => "⭐ 置顶",
            Badge::Approved => "已审核",
            Badge::Pending => "待审核",
        }
    }

    pub fn class(&self) -> &'static str {
        match self {
            Badge::Featured => "badge badge-primary",
            Badge::Approved => "badge badge-success",
            Badge::Pending => "badge badge-warning",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AdminMessageRow {
    pub id: String,
    pub author: String,
    pub content: String,
    pub preview: String,
    pub likes: i64,
    pub time: String,
    pub badges: Vec<Badge>,
    pub approved: bool,
    pub featured: bool,
    pub selected: bool,
}

impl AdminMessageRow {
    pub fn from_message(message: &GuestbookMessage, selected: bool, now: DateTime<Utc>) -> Self {
        let mut badges = Vec::with_capacity(2);
        if message.is_featured {
            badges.push(Badge::Featured);
        }
        badges.push(if message.is_approved {
            Badge::Approved
        } else {
            Badge::Pending
        });

        Self {
            id: message.id.clone(),
            author: message.author.clone(),
            content: message.content.clone(),
            preview: truncate(&message.content, ADMIN_PREVIEW_CHARS),
            likes: message.likes(),
            time: admin_time(message.created_at, now),
            badges,
            approved: message.is_approved,
            featured: message.is_featured,
            selected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::{at, message, tool, tutorial};
    use crate::models::ContentType;
    use chrono::Duration;

    #[test]
    fn test_truncate_counts_characters() {
        assert_eq!(truncate("短文本", 5), "短文本");
        assert_eq!(truncate("一二三四五六", 3), "一二三...");
        assert_eq!(truncate("abc", 3), "abc");
    }

    #[test]
    fn test_tool_card_projection() {
        let mut t = tool("1", "ChatGPT", &["a", "b", "c", "d", "e"]);
        t.description = "x".repeat(150);
        let before = t.clone();
        let card = ToolCard::from_tool(&t);

        assert_eq!(t, before);
        assert_eq!(card.description.chars().count(), 103);
        assert!(card.description.ends_with("..."));
        assert_eq!(card.tags, vec!["a", "b", "c", "d"]);
        assert_eq!(card.pricing, PRICING_UNKNOWN);
        assert_eq!(card.image, TOOL_PLACEHOLDER_IMAGE);
    }

    #[test]
    fn test_tutorial_card_targets() {
        let mut md = tutorial("1", ContentType::Markdown);
        md.tags = vec!["a".into(), "b".into(), "c".into(), "d".into()];
        let card = TutorialCard::from_tutorial(&md);
        assert_eq!(card.tags.len(), 3);
        assert_eq!(card.target, DetailTarget::InPage);
        assert_eq!(card.cover, TUTORIAL_PLACEHOLDER_IMAGE);

        let video = TutorialCard::from_tutorial(&tutorial("2", ContentType::Video));
        assert_eq!(
            video.target,
            DetailTarget::External("https://video.example/watch".to_string())
        );
        assert_eq!(video.type_class, "video");
    }

    #[test]
    fn test_list_view_empty_is_exclusive() {
        let view = list_view(&Vec::<crate::models::Tool>::new(), ToolCard::from_tool);
        assert!(matches!(view, ListView::Empty));

        let view = list_view(&[tool("1", "A", &[])], ToolCard::from_tool);
        assert!(matches!(view, ListView::Populated(ref cards) if cards.len() == 1));
    }

    #[test]
    fn test_relative_time_buckets() {
        let now = at(20);
        let cases = [
            (Duration::seconds(30), "刚刚"),
            (Duration::minutes(5), "5 分钟前"),
            (Duration::hours(3), "3 小时前"),
            (Duration::days(2), "2 天前"),
            (Duration::days(14), "2 周前"),
            (Duration::days(90), "3 个月前"),
            (Duration::days(800), "2 年前"),
        ];
        for (ago, expected) in cases {
            assert_eq!(relative_time(now - ago, now), expected);
        }
    }

    #[test]
    fn test_message_card() {
        let mut m = message("m1", true, true);
        m.author = "alice".into();
        m.likes_count = None;
        let card = MessageCard::from_message(&m, true, at(2) + Duration::hours(2));
        assert_eq!(card.avatar, "A");
        assert_eq!(card.likes, 0);
        assert_eq!(card.time, "2 小时前");
        assert!(card.liked && card.featured);
    }

    #[test]
    fn test_admin_row_badges_and_preview() {
        let mut m = message("m1", false, true);
        m.content = "长".repeat(60);
        let row = AdminMessageRow::from_message(&m, true, at(2));
        assert_eq!(row.badges, vec![Badge::Featured, Badge::Pending]);
        assert_eq!(row.preview.chars().count(), 53);
        assert_eq!(row.time, "刚刚");
        assert!(row.selected);
    }

    #[test]
    fn test_counter_levels() {
        assert_eq!(CounterLevel::for_length(1600, 2000), CounterLevel::Normal);
        assert_eq!(CounterLevel::for_length(1601, 2000), CounterLevel::Warning);
        assert_eq!(CounterLevel::for_length(1901, 2000), CounterLevel::Danger);
        assert_eq!(counter_label(12, 2000), "12 / 2000");
    }

    #[test]
    fn test_date_formats() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 5).unwrap();
        assert_eq!(format_date_cn(date), "2025年01月05日");
        assert_eq!(format_date_slash(date), "2025/01/05");
    }

    #[test]
    fn test_weekreport_card_thumbnail() {
        let report = WeekReport {
            id: "w1".into(),
            title: "Week 1".into(),
            video_url: "https://youtu.be/abc".into(),
            content_md: None,
            published_at: at(6),
        };
        let card = WeekReportCard::from_report(&report);
        assert_eq!(
            card.thumbnail.as_deref(),
            Some("https://img.youtube.com/vi/abc/hqdefault.jpg")
        );
    }
}
