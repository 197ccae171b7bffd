//! socialsaver-core: saved-item types, store backends, and the collection view-model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::RwLock;
use time::OffsetDateTime;
use url::{Host, Url};

pub mod display;
pub mod embed;
mod error;
pub mod file_store;
#[cfg(feature = "http")]
pub mod http;
pub mod view;

pub use embed::{resolve_embed, Embed, EmbedPlatform};
pub use error::StoreError;
pub use file_store::JsonFileStore;
#[cfg(feature = "http")]
pub use http::HttpStore;
pub use view::{
    derive_categories, derive_platforms, filter, mark_seen, sort, Choice, FilterState, LoadOutcome,
    LoadTicket, SortKey, TimeRange, ViewModel,
};

pub type ItemId = u64;

/// A saved social-media reference as served by `GET /items/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub item_type: Platform,
    pub url: String,
    #[serde(default)]
    pub hashtags: Vec<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(default)]
    pub is_seen: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_url: Option<String>,
}

impl Item {
    pub fn new<S: Into<String>>(id: ItemId, url: S, created_at: OffsetDateTime) -> Self {
        let url = url.into();
        Self {
            id,
            title: None,
            summary: None,
            caption: None,
            category: None,
            item_type: Platform::detect(&url),
            url,
            hashtags: Vec::new(),
            created_at,
            is_seen: false,
            media_url: None,
        }
    }
}

/// Source platform of a saved link. Open-ended: unknown wire values land in `Other`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Instagram,
    #[serde(alias = "twitter")]
    X,
    Youtube,
    Blog,
    #[default]
    #[serde(other)]
    Other,
}

impl Platform {
    pub const ALL: [Platform; 5] = [
        Platform::Instagram,
        Platform::X,
        Platform::Youtube,
        Platform::Blog,
        Platform::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Instagram => "instagram",
            Platform::X => "x",
            Platform::Youtube => "youtube",
            Platform::Blog => "blog",
            Platform::Other => "other",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Platform::Instagram => "Instagram",
            Platform::X => "X",
            Platform::Youtube => "YouTube",
            Platform::Blog => "Blog",
            Platform::Other => "Other",
        }
    }

    /// Classify a link by its host. Anything with a host that is not a known
    /// social platform counts as a blog/article.
    pub fn detect(url: &str) -> Platform {
        let Some(host) = url_host(url) else {
            return Platform::Other;
        };
        let on = |domain: &str| host == domain || host.ends_with(&format!(".{domain}"));
        if on("instagram.com") {
            Platform::Instagram
        } else if on("twitter.com") || on("x.com") {
            Platform::X
        } else if on("youtube.com") || on("youtu.be") {
            Platform::Youtube
        } else {
            Platform::Blog
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "instagram" => Ok(Platform::Instagram),
            "x" | "twitter" => Ok(Platform::X),
            "youtube" => Ok(Platform::Youtube),
            "blog" => Ok(Platform::Blog),
            "other" => Ok(Platform::Other),
            other => Err(format!(
                "unknown platform '{other}' (expected instagram, x, youtube, blog, other)"
            )),
        }
    }
}

fn url_host(url: &str) -> Option<String> {
    let parsed = Url::parse(url.trim()).ok()?;
    match parsed.host()? {
        Host::Domain(d) if !d.is_empty() => Some(d.to_ascii_lowercase()),
        Host::Domain(_) => None,
        ip => Some(ip.to_string()),
    }
}

/// Partial item sent with `PATCH /items/{id}/`; unset fields are omitted on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_seen: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl ItemPatch {
    pub fn seen() -> Self {
        Self {
            is_seen: Some(true),
            ..Self::default()
        }
    }

    pub fn category<S: Into<String>>(category: S) -> Self {
        Self {
            category: Some(category.into()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.is_seen.is_none() && self.title.is_none() && self.category.is_none()
    }

    pub fn apply(&self, item: &mut Item) {
        if let Some(seen) = self.is_seen {
            item.is_seen = seen;
        }
        if let Some(title) = &self.title {
            item.title = Some(title.clone());
        }
        if let Some(category) = &self.category {
            item.category = Some(category.clone());
        }
    }
}

/// The item backend. All durable state lives behind this trait.
pub trait ItemStore: Send + Sync {
    fn list(&self) -> Result<Vec<Item>, StoreError>;
    fn delete(&self, id: ItemId) -> Result<(), StoreError>;
    fn update(&self, id: ItemId, patch: &ItemPatch) -> Result<Item, StoreError>;
}

/// In-memory store, used by tests and by `--store mem`.
#[derive(Default)]
pub struct MemStore {
    inner: RwLock<Vec<Item>>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items(items: Vec<Item>) -> Self {
        Self {
            inner: RwLock::new(items),
        }
    }

    pub fn insert(&self, item: Item) {
        let mut v = self.inner.write().unwrap_or_else(|e| e.into_inner());
        v.retain(|i| i.id != item.id);
        v.insert(0, item);
    }

    pub fn get(&self, id: ItemId) -> Option<Item> {
        let v = self.inner.read().unwrap_or_else(|e| e.into_inner());
        v.iter().find(|i| i.id == id).cloned()
    }
}

impl ItemStore for MemStore {
    fn list(&self) -> Result<Vec<Item>, StoreError> {
        let v = self.inner.read().unwrap_or_else(|e| e.into_inner());
        Ok(v.clone())
    }

    fn delete(&self, id: ItemId) -> Result<(), StoreError> {
        let mut v = self.inner.write().unwrap_or_else(|e| e.into_inner());
        let before = v.len();
        v.retain(|i| i.id != id);
        if v.len() == before {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    fn update(&self, id: ItemId, patch: &ItemPatch) -> Result<Item, StoreError> {
        let mut v = self.inner.write().unwrap_or_else(|e| e.into_inner());
        let item = v
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or(StoreError::NotFound(id))?;
        patch.apply(item);
        Ok(item.clone())
    }
}
