//! Overlay document store
//!
//! The store surface is create/read/update/delete over overlay documents.
//! `JsonFileStore` is the bundled backend: the whole collection lives in one
//! JSON file, loaded on open and rewritten on every mutation. Fine for the
//! handful of overlays a single stream carries.

use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use super::{NewOverlay, Overlay, OverlayPatch};
use crate::error::{Error, Result};

#[async_trait]
pub trait OverlayStore: Send + Sync {
    async fn create(&self, new: NewOverlay) -> Result<Overlay>;
    async fn list(&self) -> Result<Vec<Overlay>>;
    async fn get(&self, id: &str) -> Result<Overlay>;
    async fn update(&self, id: &str, patch: OverlayPatch) -> Result<Overlay>;
    async fn delete(&self, id: &str) -> Result<()>;
}

pub struct JsonFileStore {
    path: PathBuf,
    documents: RwLock<HashMap<String, Overlay>>,
}

impl JsonFileStore {
    /// Open the store, loading existing documents if the file is present.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let documents = if tokio::fs::try_exists(&path).await.unwrap_or(false) {
            let raw = tokio::fs::read(&path).await?;
            let overlays: Vec<Overlay> = serde_json::from_slice(&raw)?;
            debug!(count = overlays.len(), path = %path.display(), "loaded overlay store");
            overlays.into_iter().map(|o| (o.id.clone(), o)).collect()
        } else {
            HashMap::new()
        };

        Ok(Self {
            path,
            documents: RwLock::new(documents),
        })
    }

    async fn persist(&self, documents: &HashMap<String, Overlay>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let mut overlays: Vec<&Overlay> = documents.values().collect();
        overlays.sort_by(|a, b| a.id.cmp(&b.id));
        let raw = serde_json::to_vec_pretty(&overlays)?;
        tokio::fs::write(&self.path, raw).await?;
        Ok(())
    }

    fn not_found(id: &str) -> Error {
        Error::NotFound(format!("Overlay not found: {id}"))
    }
}

#[async_trait]
impl OverlayStore for JsonFileStore {
    async fn create(&self, new: NewOverlay) -> Result<Overlay> {
        let mut documents = self.documents.write().await;
        let overlay = Overlay::from_new(nanoid::nanoid!(), new);
        documents.insert(overlay.id.clone(), overlay.clone());
        self.persist(&documents).await?;
        Ok(overlay)
    }

    async fn list(&self) -> Result<Vec<Overlay>> {
        let documents = self.documents.read().await;
        let mut overlays: Vec<Overlay> = documents.values().cloned().collect();
        overlays.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(overlays)
    }

    async fn get(&self, id: &str) -> Result<Overlay> {
        let documents = self.documents.read().await;
        documents.get(id).cloned().ok_or_else(|| Self::not_found(id))
    }

    async fn update(&self, id: &str, patch: OverlayPatch) -> Result<Overlay> {
        let mut documents = self.documents.write().await;
        let overlay = documents.get_mut(id).ok_or_else(|| Self::not_found(id))?;
        overlay.apply(patch);
        let updated = overlay.clone();
        self.persist(&documents).await?;
        Ok(updated)
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let mut documents = self.documents.write().await;
        if documents.remove(id).is_none() {
            return Err(Self::not_found(id));
        }
        self.persist(&documents).await?;
        Ok(())
    }
}
