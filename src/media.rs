//! Video link helpers for weekly reports and tutorial previews.

use std::sync::LazyLock;

use regex::Regex;

/// `youtube.com/watch?v=ID` or `youtu.be/ID`
static YOUTUBE_WATCH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:youtube\.com/watch\?v=|youtu\.be/)([a-zA-Z0-9_-]+)")
        .expect("YouTube watch regex should compile")
});

static YOUTUBE_EMBED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"youtube\.com/embed/([a-zA-Z0-9_-]+)").expect("YouTube embed regex should compile")
});

static BILIBILI_VIDEO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"bilibili\.com/video/(BV[a-zA-Z0-9]+)").expect("Bilibili regex should compile")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoHost {
    YouTube,
    Bilibili,
    Other,
}

pub fn video_host(url: &str) -> VideoHost {
    if url.contains("youtube.com") || url.contains("youtu.be") {
        VideoHost::YouTube
    } else if url.contains("bilibili.com") {
        VideoHost::Bilibili
    } else {
        VideoHost::Other
    }
}

/// Player URL suitable for an `<iframe>`.
///
/// Already-embeddable links and unknown hosts come back unchanged.
pub fn embed_url(url: &str) -> String {
    let url = url.trim();
    if url.is_empty() {
        return String::new();
    }
    if url.contains("/embed/") || url.contains("player.bilibili.com") {
        return url.to_string();
    }
    if let Some(caps) = YOUTUBE_WATCH.captures(url) {
        return format!("https://www.youtube.com/embed/{}", &caps[1]);
    }
    if let Some(caps) = BILIBILI_VIDEO.captures(url) {
        return format!("https://player.bilibili.com/player.html?bvid={}&high_quality=1", &caps[1]);
    }
    url.to_string()
}

/// Cover image for a video link. Only YouTube exposes one.
pub fn thumbnail_url(url: &str) -> Option<String> {
    let caps = YOUTUBE_EMBED
        .captures(url)
        .or_else(|| YOUTUBE_WATCH.captures(url))?;
    Some(format!("https://img.youtube.com/vi/{}/hqdefault.jpg", &caps[1]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_youtube_links_become_embeds() {
        assert_eq!(
            embed_url("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=10"),
            "https://www.youtube.com/embed/dQw4w9WgXcQ"
        );
        assert_eq!(
            embed_url("https://youtu.be/dQw4w9WgXcQ"),
            "https://www.youtube.com/embed/dQw4w9WgXcQ"
        );
    }

    #[test]
    fn test_bilibili_links_become_player() {
        assert_eq!(
            embed_url("https://www.bilibili.com/video/BV1xx411c7mD/?spm=1"),
            "https://player.bilibili.com/player.html?bvid=BV1xx411c7mD&high_quality=1"
        );
    }

    #[test]
    fn test_embeds_and_unknown_hosts_pass_through() {
        let embed = "https://www.youtube.com/embed/abc";
        assert_eq!(embed_url(embed), embed);
        let player = "https://player.bilibili.com/player.html?bvid=BV1";
        assert_eq!(embed_url(player), player);
        assert_eq!(embed_url("https://vimeo.com/1"), "https://vimeo.com/1");
        assert_eq!(embed_url("   "), "");
    }

    #[test]
    fn test_thumbnails() {
        assert_eq!(
            thumbnail_url("https://www.youtube.com/embed/abc_1").as_deref(),
            Some("https://img.youtube.com/vi/abc_1/hqdefault.jpg")
        );
        assert_eq!(
            thumbnail_url("https://youtu.be/xyz").as_deref(),
            Some("https://img.youtube.com/vi/xyz/hqdefault.jpg")
        );
        assert_eq!(thumbnail_url("https://www.bilibili.com/video/BV1"), None);
    }

    #[test]
    fn test_host_detection() {
        assert_eq!(video_host("https://youtu.be/x"), VideoHost::YouTube);
        assert_eq!(video_host("https://www.bilibili.com/video/BV1"), VideoHost::Bilibili);
        assert_eq!(video_host("https://example.com"), VideoHost::Other);
    }
}
