//! services/planner/src/adapters/memory.rs
//!
//! In-process adapter backed by plain collections, the moral equivalent of
//! the browser-local key-value store the app originally persisted to, and
//! the double every test runs against.
//!
//! Materials live in a `Vec` so `get_all` preserves registration order,
//! which the weekly plan relies on.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use std::collections::HashSet;
use std::sync::RwLock;
use uuid::Uuid;

use studyplan_core::domain::{Material, ReminderSettings};
use studyplan_core::ports::{
    CompletionStore, MaterialPatch, MaterialStore, PortError, PortResult, SettingsStore,
};
use studyplan_core::progress::completion_key;

#[derive(Default)]
pub struct MemoryStore {
    materials: RwLock<Vec<Material>>,
    completions: RwLock<HashSet<String>>,
    settings: RwLock<ReminderSettings>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn poisoned(what: &str) -> PortError {
        PortError::Storage(format!("{what} lock poisoned"))
    }
}

#[async_trait]
impl MaterialStore for MemoryStore {
    async fn get_all(&self) -> PortResult<Vec<Material>> {
        let materials = self
            .materials
            .read()
            .map_err(|_| Self::poisoned("material store"))?;
        Ok(materials.clone())
    }

    async fn get_by_id(&self, id: Uuid) -> PortResult<Material> {
        let materials = self
            .materials
            .read()
            .map_err(|_| Self::poisoned("material store"))?;
        materials
            .iter()
            .find(|m| m.id == id)
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("Material {} not found", id)))
    }

    async fn add(&self, material: Material) -> PortResult<()> {
        let mut materials = self
            .materials
            .write()
            .map_err(|_| Self::poisoned("material store"))?;
        if materials.iter().any(|m| m.id == material.id) {
            return Err(PortError::Conflict(format!(
                "Material {} already exists",
                material.id
            )));
        }
        materials.push(material);
        Ok(())
    }

    async fn update(&self, id: Uuid, patch: MaterialPatch) -> PortResult<Material> {
        let mut materials = self
            .materials
            .write()
            .map_err(|_| Self::poisoned("material store"))?;
        let material = materials
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| PortError::NotFound(format!("Material {} not found", id)))?;
        patch.apply_to(material, Utc::now());
        Ok(material.clone())
    }

    async fn delete(&self, id: Uuid) -> PortResult<()> {
        let mut materials = self
            .materials
            .write()
            .map_err(|_| Self::poisoned("material store"))?;
        let before = materials.len();
        materials.retain(|m| m.id != id);
        if materials.len() == before {
            return Err(PortError::NotFound(format!("Material {} not found", id)));
        }
        Ok(())
    }

    async fn clear(&self) -> PortResult<()> {
        let mut materials = self
            .materials
            .write()
            .map_err(|_| Self::poisoned("material store"))?;
        materials.clear();
        Ok(())
    }
}

#[async_trait]
impl CompletionStore for MemoryStore {
    async fn get_all(&self) -> PortResult<HashSet<String>> {
        let completions = self
            .completions
            .read()
            .map_err(|_| Self::poisoned("completion store"))?;
        Ok(completions.clone())
    }

    async fn mark_completed(&self, material_id: Uuid, date: NaiveDate) -> PortResult<()> {
        let mut completions = self
            .completions
            .write()
            .map_err(|_| Self::poisoned("completion store"))?;
        completions.insert(completion_key(material_id, date));
        Ok(())
    }

    async fn mark_incomplete(&self, material_id: Uuid, date: NaiveDate) -> PortResult<()> {
        let mut completions = self
            .completions
            .write()
            .map_err(|_| Self::poisoned("completion store"))?;
        completions.remove(&completion_key(material_id, date));
        Ok(())
    }

    async fn is_completed(&self, material_id: Uuid, date: NaiveDate) -> PortResult<bool> {
        let completions = self
            .completions
            .read()
            .map_err(|_| Self::poisoned("completion store"))?;
        Ok(completions.contains(&completion_key(material_id, date)))
    }
}

#[async_trait]
impl SettingsStore for MemoryStore {
    async fn get(&self) -> PortResult<ReminderSettings> {
        let settings = self
            .settings
            .read()
            .map_err(|_| Self::poisoned("settings store"))?;
        Ok(settings.clone())
    }

    async fn save(&self, new_settings: ReminderSettings) -> PortResult<()> {
        let mut settings = self
            .settings
            .write()
            .map_err(|_| Self::poisoned("settings store"))?;
        *settings = new_settings;
        Ok(())
    }
}
