//! Site Configuration
//!
//! Backend location and keys plus the UI constants shared by all views.
//! Read from `<meta>` tags first (static deploys), then from `window`
//! globals (injected by the host), then built-in defaults.

use serde::{Deserialize, Serialize};
use wasm_bindgen::JsCast;

const DEFAULT_SUPABASE_URL: &str = "https://lczgabazrjlkhmthlvhi.supabase.co";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FarmConfig {
    pub supabase_url: String,
    pub anon_key: String,
    /// Service-role key, only present on the admin page
    pub service_key: Option<String>,
    pub page_size: u32,
    pub min_content_length: usize,
    pub max_content_length: usize,
    pub search_debounce_ms: u32,
    pub likes_storage_key: String,
    pub related_limit: usize,
}

impl Default for FarmConfig {
    fn default() -> Self {
        Self {
            supabase_url: DEFAULT_SUPABASE_URL.to_string(),
            anon_key: String::new(),
            service_key: None,
            page_size: 10,
            min_content_length: 10,
            max_content_length: 2000,
            search_debounce_ms: leptos_debounce::DEFAULT_DELAY_MS,
            likes_storage_key: "ai-farm-guestbook-likes".to_string(),
            related_limit: 3,
        }
    }
}

impl FarmConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Build from the hosting page
    pub fn from_document() -> Self {
        let mut config = window_config().unwrap_or_default();

        if let Some(url) = lookup("SUPABASE_URL") {
            config.supabase_url = url;
        }
        if let Some(key) = lookup("SUPABASE_ANON_KEY") {
            config.anon_key = key;
        }
        if let Some(key) = lookup("SUPABASE_SERVICE_KEY") {
            config.service_key = Some(key);
        }
        config
    }

    /// Key used for requests: the service key when present, else the anon key
    pub fn api_key(&self, admin: bool) -> Option<&str> {
        let key = if admin {
            self.service_key.as_deref().unwrap_or(&self.anon_key)
        } else {
            &self.anon_key
        };
        (!key.trim().is_empty()).then_some(key)
    }

    pub fn has_backend(&self) -> bool {
        !self.supabase_url.trim().is_empty() && self.api_key(false).is_some()
    }
}

/// `window.AI_FARM_CONFIG` object, if the host injected one
fn window_config() -> Option<FarmConfig> {
    let window = web_sys::window()?;
    let value = js_sys::Reflect::get(&window, &"AI_FARM_CONFIG".into()).ok()?;
    if value.is_undefined() || value.is_null() {
        return None;
    }
    match serde_wasm_bindgen::from_value(value) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!("[CONFIG] ignoring malformed AI_FARM_CONFIG: {}", e);
            None
        }
    }
}

/// `<meta name=..>` content, else a string global on `window`
fn lookup(name: &str) -> Option<String> {
    let window = web_sys::window()?;

    let from_meta = window
        .document()
        .and_then(|doc| doc.query_selector(&format!("meta[name=\"{}\"]", name)).ok().flatten())
        .and_then(|el| el.dyn_into::<web_sys::HtmlMetaElement>().ok())
        .map(|meta| meta.content())
        .filter(|content| !content.is_empty());

    from_meta.or_else(|| {
        js_sys::Reflect::get(&window, &name.into())
            .ok()
            .and_then(|v| v.as_string())
            .filter(|v| !v.is_empty())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = FarmConfig::from_json(r#"{"anon_key":"anon","page_size":20}"#).unwrap();
        assert_eq!(config.anon_key, "anon");
        assert_eq!(config.page_size, 20);
        assert_eq!(config.search_debounce_ms, 300);
        assert_eq!(config.likes_storage_key, "ai-farm-guestbook-likes");
        assert!(config.has_backend());
    }

    #[test]
    fn test_admin_key_falls_back_to_anon() {
        let mut config = FarmConfig {
            anon_key: "anon".into(),
            ..Default::default()
        };
        assert_eq!(config.api_key(true), Some("anon"));
        config.service_key = Some("service".into());
        assert_eq!(config.api_key(true), Some("service"));
        assert_eq!(config.api_key(false), Some("anon"));
    }

    #[test]
    fn test_missing_key_means_no_backend() {
        assert!(!FarmConfig::default().has_backend());
    }
}
