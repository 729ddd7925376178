//! Model configuration registry
//!
//! Holds the endpoints a user has configured and which one is active,
//! persisted through an injected [`KeyValueStore`]. API keys deliberately do
//! not live here; they belong to the encrypted secret store, keyed by the
//! model id.

use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::storage::KeyValueStore;

/// Storage key for the model list
const MODELS_KEY: &str = "models";

/// Storage key for the active model id
const ACTIVE_MODEL_KEY: &str = "active_model";

/// A user-configured model endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    pub id: String,
    /// Display name chosen by the user
    pub name: String,
    /// Endpoint URL; also determines the wire format
    pub endpoint: String,
    /// Model identifier sent to the API
    pub model: String,
    #[serde(default = "enabled_default")]
    pub enabled: bool,
    #[serde(default)]
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn enabled_default() -> bool {
    true
}

/// Registry of configured models with one optional active selection
pub struct ModelStore<S> {
    store: S,
    models: Vec<ModelConfig>,
    active_id: Option<String>,
}

impl<S: KeyValueStore> ModelStore<S> {
    /// Load the registry from the backing store
    pub fn new(store: S) -> Result<Self> {
        let models = match store.get(MODELS_KEY) {
            Some(json) => serde_json::from_str(&json)?,
            None => Vec::new(),
        };
        let active_id = store.get(ACTIVE_MODEL_KEY);
        Ok(Self {
            store,
            models,
            active_id,
        })
    }

    pub fn models(&self) -> &[ModelConfig] {
        &self.models
    }

    pub fn get(&self, id: &str) -> Option<&ModelConfig> {
        self.models.iter().find(|m| m.id == id)
    }

    /// Add a model configuration and return it
    pub fn add(&mut self, name: &str, endpoint: &str, model: &str) -> Result<ModelConfig> {
        let now = Utc::now();
        let config = ModelConfig {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            endpoint: endpoint.to_string(),
            model: model.to_string(),
            enabled: true,
            description: String::new(),
            created_at: now,
            updated_at: now,
        };
        self.models.push(config.clone());
        self.persist()?;
        Ok(config)
    }

    /// Apply an in-place edit to a model and bump its updated timestamp
    pub fn update<F>(&mut self, id: &str, edit: F) -> Result<()>
    where
        F: FnOnce(&mut ModelConfig),
    {
        let Some(model) = self.models.iter_mut().find(|m| m.id == id) else {
            bail!("unknown model id: {id}");
        };
        edit(model);
        model.id = id.to_string();
        model.updated_at = Utc::now();
        self.persist()
    }

    /// Remove a model; clears the active selection if it pointed here
    pub fn delete(&mut self, id: &str) -> Result<()> {
        let before = self.models.len();
        self.models.retain(|m| m.id != id);
        if self.models.len() == before {
            bail!("unknown model id: {id}");
        }
        if self.active_id.as_deref() == Some(id) {
            self.active_id = None;
            self.store.remove(ACTIVE_MODEL_KEY)?;
        }
        self.persist()
    }

    /// Mark a model as the active selection
    pub fn set_active(&mut self, id: &str) -> Result<()> {
        if self.get(id).is_none() {
            bail!("unknown model id: {id}");
        }
        self.active_id = Some(id.to_string());
        self.store.set(ACTIVE_MODEL_KEY, id)
    }

    /// The currently active model, if any
    pub fn active(&self) -> Option<&ModelConfig> {
        self.active_id.as_deref().and_then(|id| self.get(id))
    }

    fn persist(&mut self) -> Result<()> {
        let json = serde_json::to_string(&self.models)?;
        self.store.set(MODELS_KEY, &json)
    }
}
