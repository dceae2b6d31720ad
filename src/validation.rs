//! Form Validation
//!
//! Raw form input in, draft payload or field errors out. Nothing here
//! touches the network, so a rejected form never issues a remote call.

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};

use crate::config::FarmConfig;
use crate::error::{FarmError, FarmResult, FieldError};
use crate::models::{ContentType, NewMessage, Tool, ToolDraft, Tutorial, TutorialDraft, WeekReport, WeekReportDraft};
use crate::render::TUTORIAL_PLACEHOLDER_IMAGE;

/// Comma separated, blanks dropped
pub fn parse_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}

/// One feature per line, blanks dropped
pub fn parse_features(input: &str) -> Vec<String> {
    input
        .lines()
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .map(String::from)
        .collect()
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn finish<T>(errors: Vec<FieldError>, value: impl FnOnce() -> T) -> FarmResult<T> {
    if errors.is_empty() {
        Ok(value())
    } else {
        Err(FarmError::Validation(errors))
    }
}

fn looks_like_url(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}

// ========================
// Guestbook
// ========================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GuestbookForm {
    pub author: String,
    pub content: String,
}

impl GuestbookForm {
    pub fn validate(&self, config: &FarmConfig) -> FarmResult<NewMessage> {
        let author = self.author.trim();
        let content = self.content.trim();
        let length = content.chars().count();
        let mut errors = Vec::new();

        if author.is_empty() {
            errors.push(FieldError::new("author", "请输入姓名"));
        }
        if content.is_empty() {
            errors.push(FieldError::new("content", "请输入留言内容"));
        } else if length < config.min_content_length {
            errors.push(FieldError::new(
                "content",
                format!("留言至少需要 {} 个字符", config.min_content_length),
            ));
        } else if length > config.max_content_length {
            errors.push(FieldError::new(
                "content",
                format!("留言不能超过 {} 个字符", config.max_content_length),
            ));
        }

        finish(errors, || NewMessage {
            author: author.to_string(),
            content: content.to_string(),
        })
    }
}

// ========================
// Tools
// ========================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolForm {
    pub name: String,
    pub url: String,
    pub description: String,
    pub image_url: String,
    pub pricing: String,
    pub tags: String,
    pub features: String,
    pub is_featured: bool,
}

impl ToolForm {
    pub fn from_draft(draft: &ToolDraft) -> Self {
        Self {
            name: draft.name.clone(),
            url: draft.url.clone(),
            description: draft.description.clone(),
            image_url: draft.image_url.clone().unwrap_or_default(),
            pricing: draft.pricing.clone().unwrap_or_default(),
            tags: draft.tags.join(", "),
            features: draft.features.join("\n"),
            is_featured: draft.is_featured,
        }
    }

    pub fn from_tool(tool: &Tool) -> Self {
        Self::from_draft(&ToolDraft::from(tool))
    }

    pub fn validate(&self) -> FarmResult<ToolDraft> {
        let mut errors = Vec::new();
        if self.name.trim().is_empty() {
            errors.push(FieldError::new("name", "请输入工具名称"));
        }
        let url = self.url.trim();
        if url.is_empty() {
            errors.push(FieldError::new("url", "请输入工具链接"));
        } else if !looks_like_url(url) {
            errors.push(FieldError::new("url", "链接需以 http:// 或 https:// 开头"));
        }

        finish(errors, || ToolDraft {
            name: self.name.trim().to_string(),
            url: url.to_string(),
            description: self.description.trim().to_string(),
            image_url: non_empty(&self.image_url),
            pricing: non_empty(&self.pricing),
            tags: parse_tags(&self.tags),
            features: parse_features(&self.features),
            is_featured: self.is_featured,
        })
    }
}

// ========================
// Tutorials
// ========================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TutorialForm {
    pub title: String,
    pub author: String,
    pub cover_image: String,
    pub summary: String,
    pub tags: String,
    pub is_featured: bool,
    pub content_type: ContentType,
    pub content_md: String,
    pub external_url: String,
    pub tool_id: String,
}

impl TutorialForm {
    pub fn from_tutorial(tutorial: &Tutorial) -> Self {
        Self {
            title: tutorial.title.clone(),
            author: tutorial.author.clone(),
            cover_image: tutorial.cover_image.clone().unwrap_or_default(),
            summary: tutorial.summary.clone().unwrap_or_default(),
            tags: tutorial.tags.join(", "),
            is_featured: tutorial.is_featured,
            content_type: tutorial.content_type,
            content_md: tutorial.content_md.clone().unwrap_or_default(),
            external_url: tutorial.external_url.clone().unwrap_or_default(),
            tool_id: tutorial.tool_id.clone().unwrap_or_default(),
        }
    }

    /// Switch type, clearing the body that no longer applies
    pub fn set_content_type(&mut self, content_type: ContentType) {
        if content_type == self.content_type {
            return;
        }
        self.content_type = content_type;
        if content_type.is_external() {
            self.content_md.clear();
        } else {
            self.external_url.clear();
        }
    }

    pub fn validate(&self) -> FarmResult<TutorialDraft> {
        let mut errors = Vec::new();
        if self.title.trim().is_empty() {
            errors.push(FieldError::new("title", "请输入教程标题"));
        }
        if self.author.trim().is_empty() {
            errors.push(FieldError::new("author", "请输入作者"));
        }
        if self.content_type.is_external() {
            let url = self.external_url.trim();
            if url.is_empty() {
                errors.push(FieldError::new("external_url", "请输入外部链接"));
            } else if !looks_like_url(url) {
                errors.push(FieldError::new("external_url", "链接需以 http:// 或 https:// 开头"));
            }
        } else if self.content_md.trim().is_empty() {
            errors.push(FieldError::new("content_md", "请输入 Markdown 内容"));
        }

        let external = self.content_type.is_external();
        finish(errors, || TutorialDraft {
            title: self.title.trim().to_string(),
            author: self.author.trim().to_string(),
            cover_image: non_empty(&self.cover_image)
                .unwrap_or_else(|| TUTORIAL_PLACEHOLDER_IMAGE.to_string()),
            summary: self.summary.trim().to_string(),
            tags: parse_tags(&self.tags),
            is_featured: self.is_featured,
            content_type: self.content_type,
            content_md: (!external).then(|| self.content_md.clone()),
            external_url: external.then(|| self.external_url.trim().to_string()),
            tool_id: non_empty(&self.tool_id),
        })
    }
}

// ========================
// Weekly reports
// ========================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeekReportForm {
    pub title: String,
    pub video_url: String,
    pub content_md: String,
    /// `datetime-local` input value, e.g. `2025-01-05T20:00`
    pub published_at: String,
}

/// Value for a `datetime-local` input
pub fn datetime_local_value(ts: DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%Y-%m-%dT%H:%M").to_string()
}

fn parse_datetime_local(value: &str) -> Option<DateTime<Utc>> {
    let naive = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S"))
        .ok()?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|local| local.with_timezone(&Utc))
}

impl WeekReportForm {
    /// Empty form with the publish time preset to `now`
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            published_at: datetime_local_value(now),
            ..Default::default()
        }
    }

    pub fn from_report(report: &WeekReport) -> Self {
        Self {
            title: report.title.clone(),
            video_url: report.video_url.clone(),
            content_md: report.content_md.clone().unwrap_or_default(),
            published_at: datetime_local_value(report.published_at),
        }
    }

    pub fn validate(&self, now: DateTime<Utc>) -> FarmResult<WeekReportDraft> {
        let mut errors = Vec::new();
        if self.title.trim().is_empty() {
            errors.push(FieldError::new("title", "请输入周报标题"));
        }
        if self.video_url.trim().is_empty() {
            errors.push(FieldError::new("video_url", "请输入视频链接"));
        }
        let raw_date = self.published_at.trim();
        let published_at = if raw_date.is_empty() {
            Some(now)
        } else {
            parse_datetime_local(raw_date)
        };
        if published_at.is_none() {
            errors.push(FieldError::new("published_at", "发布时间格式不正确"));
        }

        finish(errors, || WeekReportDraft {
            title: self.title.trim().to_string(),
            video_url: self.video_url.trim().to_string(),
            content_md: non_empty(&self.content_md),
            published_at: published_at.unwrap_or(now),
        })
    }
}
