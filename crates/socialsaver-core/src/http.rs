//! REST client for the item backend.
//!
//! `GET items/`, `DELETE items/{id}/` and `PATCH items/{id}/` relative to a
//! base URL such as `http://localhost:8000/api/`. The async client is driven
//! on a runtime owned by the store so callers keep the synchronous
//! [`ItemStore`] interface.

use std::time::Duration;

use reqwest::{Client, Response, StatusCode, Url};
use tokio::runtime::Runtime;
use tracing::debug;

use crate::{Item, ItemId, ItemPatch, ItemStore, StoreError};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api/";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

pub struct HttpStore {
    base: Url,
    client: Client,
    rt: Runtime,
}

impl HttpStore {
    pub fn new(base_url: &str) -> Result<Self, StoreError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, StoreError> {
        let mut raw = base_url.trim().to_string();
        // Url::join drops the last path segment unless it ends with '/'
        if !raw.ends_with('/') {
            raw.push('/');
        }
        let base =
            Url::parse(&raw).map_err(|e| StoreError::InvalidUrl(format!("{base_url}: {e}")))?;
        let client = Client::builder().timeout(timeout).build()?;
        let rt = Runtime::new()?;
        Ok(Self { base, client, rt })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> Result<Url, StoreError> {
        self.base
            .join(path)
            .map_err(|e| StoreError::InvalidUrl(format!("{path}: {e}")))
    }
}

fn check(resp: Response, id: Option<ItemId>) -> Result<Response, StoreError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    match id {
        Some(id) if status == StatusCode::NOT_FOUND => Err(StoreError::NotFound(id)),
        _ => Err(StoreError::Status {
            status: status.as_u16(),
            url: resp.url().to_string(),
        }),
    }
}

impl ItemStore for HttpStore {
    fn list(&self) -> Result<Vec<Item>, StoreError> {
        let url = self.endpoint("items/")?;
        debug!(%url, "GET");
        self.rt.block_on(async {
            let resp = self.client.get(url).send().await?;
            let items = check(resp, None)?.json::<Vec<Item>>().await?;
            Ok(items)
        })
    }

    fn delete(&self, id: ItemId) -> Result<(), StoreError> {
        let url = self.endpoint(&format!("items/{id}/"))?;
        debug!(%url, "DELETE");
        self.rt.block_on(async {
            let resp = self.client.delete(url).send().await?;
            check(resp, Some(id))?;
            Ok(())
        })
    }

    fn update(&self, id: ItemId, patch: &ItemPatch) -> Result<Item, StoreError> {
        let url = self.endpoint(&format!("items/{id}/"))?;
        debug!(%url, "PATCH");
        self.rt.block_on(async {
            let resp = self.client.patch(url).json(patch).send().await?;
            let item = check(resp, Some(id))?.json::<Item>().await?;
            Ok(item)
        })
    }
}
