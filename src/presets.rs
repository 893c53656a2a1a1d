//! Reusable message presets
//!
//! Named prompt snippets an operator can push as system prompts or drop into
//! chat. Same persistence pattern as the endpoint registry: an in-memory list
//! in creation order, mirrored to a flat JSON file on every mutation.

use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const PRESETS_FILE: &str = "presets.json";

/// A stored prompt/message preset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagePreset {
    pub id: i64,
    pub name: String,
    pub content: String,
    #[serde(default)]
    pub category: String,
}

/// Incoming preset payload for create/update requests
#[derive(Debug, Clone, Deserialize)]
pub struct PresetDraft {
    pub name: String,
    pub content: String,
    #[serde(default)]
    pub category: String,
}

impl PresetDraft {
    fn validate(&self) -> AppResult<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::Validation(
                "preset name must not be empty".to_string(),
            ));
        }
        if self.content.trim().is_empty() {
            return Err(AppError::Validation(
                "preset content must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// File-backed preset store
pub struct PresetStore {
    presets: Vec<MessagePreset>,
    next_id: i64,
    path: PathBuf,
}

impl PresetStore {
    /// Open the preset store under `data_dir`; a missing file is an empty store
    pub fn open(data_dir: &Path) -> AppResult<Self> {
        std::fs::create_dir_all(data_dir).map_err(|source| AppError::StoreWrite {
            path: data_dir.display().to_string(),
            source,
        })?;

        let path = data_dir.join(PRESETS_FILE);
        let presets: Vec<MessagePreset> = match std::fs::read_to_string(&path) {
            Ok(content) => {
                serde_json::from_str(&content).map_err(|source| AppError::StoreParse {
                    path: path.display().to_string(),
                    source,
                })?
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(source) => {
                return Err(AppError::StoreRead {
                    path: path.display().to_string(),
                    source,
                });
            }
        };

        let next_id = presets.iter().map(|p| p.id).max().unwrap_or(0) + 1;

        tracing::info!(count = presets.len(), path = %path.display(), "Preset store loaded");

        Ok(Self {
            presets,
            next_id,
            path,
        })
    }

    pub fn list(&self) -> &[MessagePreset] {
        &self.presets
    }

    pub fn get(&self, id: i64) -> Option<&MessagePreset> {
        self.presets.iter().find(|p| p.id == id)
    }

    pub fn create(&mut self, draft: PresetDraft) -> AppResult<MessagePreset> {
        draft.validate()?;

        let preset = MessagePreset {
            id: self.next_id,
            name: draft.name,
            content: draft.content,
            category: draft.category,
        };
        self.next_id += 1;
        self.presets.push(preset.clone());
        self.save()?;

        tracing::info!(id = preset.id, name = %preset.name, "Preset created");
        Ok(preset)
    }

    pub fn update(&mut self, id: i64, draft: PresetDraft) -> AppResult<MessagePreset> {
        draft.validate()?;

        let preset = self
            .presets
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| AppError::NotFound(format!("preset {id}")))?;
        preset.name = draft.name;
        preset.content = draft.content;
        preset.category = draft.category;
        let updated = preset.clone();
        self.save()?;

        tracing::info!(id, "Preset updated");
        Ok(updated)
    }

    pub fn delete(&mut self, id: i64) -> AppResult<()> {
        let pos = self
            .presets
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| AppError::NotFound(format!("preset {id}")))?;
        self.presets.remove(pos);
        self.save()?;

        tracing::info!(id, "Preset deleted");
        Ok(())
    }

    fn save(&self) -> AppResult<()> {
        let json = serde_json::to_string_pretty(&self.presets)
            .map_err(|e| AppError::Internal(format!("failed to serialize presets: {e}")))?;
        std::fs::write(&self.path, json).map_err(|source| AppError::StoreWrite {
            path: self.path.display().to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn draft(name: &str) -> PresetDraft {
        PresetDraft {
            name: name.to_string(),
            content: "You are a helpful assistant.".to_string(),
            category: "system".to_string(),
        }
    }

    #[test]
    fn test_create_and_list_in_order() {
        let dir = TempDir::new().unwrap();
        let mut store = PresetStore::open(dir.path()).unwrap();

        store.create(draft("greeting")).unwrap();
        store.create(draft("persona")).unwrap();

        let names: Vec<_> = store.list().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["greeting", "persona"]);
    }

    #[test]
    fn test_create_rejects_empty_content() {
        let dir = TempDir::new().unwrap();
        let mut store = PresetStore::open(dir.path()).unwrap();

        let mut bad = draft("x");
        bad.content = "  ".to_string();
        assert!(store.create(bad).is_err());
        assert!(store.list().is_empty());
    }

    #[test]
    fn test_update_unknown_id_is_not_found() {
        let dir = TempDir::new().unwrap();
        let mut store = PresetStore::open(dir.path()).unwrap();

        assert!(matches!(
            store.update(9, draft("x")),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn test_delete_then_reload_persists() {
        let dir = TempDir::new().unwrap();
        {
            let mut store = PresetStore::open(dir.path()).unwrap();
            let a = store.create(draft("a")).unwrap();
            store.create(draft("b")).unwrap();
            store.delete(a.id).unwrap();
        }

        let store = PresetStore::open(dir.path()).unwrap();
        assert_eq!(store.list().len(), 1);
        assert_eq!(store.list()[0].name, "b");
    }
}
