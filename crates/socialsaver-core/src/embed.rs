//! Resolve a saved link to an embeddable player URL.
//!
//! Rules are tried in order and the first match wins:
//! 1. Instagram post or reel (`instagram.com/p/`, `instagram.com/reel/`)
//! 2. YouTube watch page (`youtube.com/watch?v=`)
//! 3. YouTube shorts (`youtube.com/shorts/`)
//! 4. youtu.be short link
//! 5. nothing embeddable

use serde::Serialize;

const YOUTUBE_EMBED: &str = "https://www.youtube.com/embed/";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbedPlatform {
    Instagram,
    YouTube,
    None,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Embed {
    pub platform: EmbedPlatform,
    pub embed_url: Option<String>,
}

impl Embed {
    fn none() -> Self {
        Self {
            platform: EmbedPlatform::None,
            embed_url: None,
        }
    }
}

pub fn resolve_embed(url: &str) -> Embed {
    let url = url.trim();
    if url.is_empty() {
        return Embed::none();
    }
    if url.contains("instagram.com/reel/") || url.contains("instagram.com/p/") {
        let clean = url.split('?').next().unwrap_or(url);
        let sep = if clean.ends_with('/') { "" } else { "/" };
        return Embed {
            platform: EmbedPlatform::Instagram,
            embed_url: Some(format!("{clean}{sep}embed")),
        };
    }
    for marker in ["youtube.com/watch?v=", "youtube.com/shorts/", "youtu.be/"] {
        if let Some((_, rest)) = url.split_once(marker) {
            return youtube(video_id(rest));
        }
    }
    Embed::none()
}

fn video_id(rest: &str) -> &str {
    rest.split(['?', '&', '#', '/']).next().unwrap_or("")
}

fn youtube(id: &str) -> Embed {
    Embed {
        platform: EmbedPlatform::YouTube,
        embed_url: (!id.is_empty()).then(|| format!("{YOUTUBE_EMBED}{id}?autoplay=1")),
    }
}
