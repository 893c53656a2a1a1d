//! Endpoint registry
//!
//! In-memory list of registered endpoints backed by a flat JSON file. The
//! list order is the registration order, which downstream selection logic
//! uses for first-healthy tie-breaking.

pub mod endpoint;

pub use endpoint::{Endpoint, EndpointDraft, EndpointId, EndpointKind};

use crate::error::{AppError, AppResult};
use std::path::{Path, PathBuf};

const REGISTRY_FILE: &str = "endpoints.json";

/// File-backed endpoint store
///
/// Every successful mutation rewrites the JSON file, so the on-disk state
/// always matches memory. Ids are assigned from a counter rebuilt as
/// `max(existing) + 1` on load, so deleted ids are not reused within a file's
/// lifetime.
pub struct EndpointRegistry {
    endpoints: Vec<Endpoint>,
    next_id: i64,
    path: PathBuf,
}

impl EndpointRegistry {
    /// Open the registry stored under `data_dir`, creating the directory if
    /// needed. A missing registry file yields an empty registry; an unreadable
    /// or corrupt file is an error.
    pub fn open(data_dir: &Path) -> AppResult<Self> {
        std::fs::create_dir_all(data_dir).map_err(|source| AppError::StoreWrite {
            path: data_dir.display().to_string(),
            source,
        })?;

        let path = data_dir.join(REGISTRY_FILE);
        let endpoints: Vec<Endpoint> = match std::fs::read_to_string(&path) {
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

        let next_id = endpoints
            .iter()
            .map(|e| e.id().value())
            .max()
            .unwrap_or(0)
            + 1;

        tracing::info!(
            count = endpoints.len(),
            path = %path.display(),
            "Endpoint registry loaded"
        );

        Ok(Self {
            endpoints,
            next_id,
            path,
        })
    }

    /// All endpoints in registration order
    pub fn list(&self) -> &[Endpoint] {
        &self.endpoints
    }

    /// Endpoint ids in registration order
    pub fn order(&self) -> Vec<EndpointId> {
        self.endpoints.iter().map(|e| e.id()).collect()
    }

    pub fn get(&self, id: EndpointId) -> Option<&Endpoint> {
        self.endpoints.iter().find(|e| e.id() == id)
    }

    pub fn contains(&self, id: EndpointId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    /// Register a new endpoint, assigning it the next id
    pub fn create(&mut self, draft: EndpointDraft) -> AppResult<Endpoint> {
        draft.validate()?;

        let endpoint = Endpoint::from_parts(EndpointId::new(self.next_id), draft);
        self.next_id += 1;
        self.endpoints.push(endpoint.clone());
        self.save()?;

        tracing::info!(id = %endpoint.id(), name = endpoint.name(), "Endpoint registered");
        Ok(endpoint)
    }

    /// Replace the mutable fields of an existing endpoint
    pub fn update(&mut self, id: EndpointId, draft: EndpointDraft) -> AppResult<Endpoint> {
        draft.validate()?;

        let endpoint = self
            .endpoints
            .iter_mut()
            .find(|e| e.id() == id)
            .ok_or_else(|| AppError::NotFound(format!("endpoint {id}")))?;
        endpoint.apply(draft);
        let updated = endpoint.clone();
        self.save()?;

        tracing::info!(id = %id, name = updated.name(), "Endpoint updated");
        Ok(updated)
    }

    /// Remove an endpoint from the registry
    pub fn delete(&mut self, id: EndpointId) -> AppResult<()> {
        let pos = self
            .endpoints
            .iter()
            .position(|e| e.id() == id)
            .ok_or_else(|| AppError::NotFound(format!("endpoint {id}")))?;
        self.endpoints.remove(pos);
        self.save()?;

        tracing::info!(id = %id, "Endpoint deleted");
        Ok(())
    }

    fn save(&self) -> AppResult<()> {
        let json = serde_json::to_string_pretty(&self.endpoints)
            .map_err(|e| AppError::Internal(format!("failed to serialize registry: {e}")))?;
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

    fn draft(name: &str) -> EndpointDraft {
        EndpointDraft {
            name: name.to_string(),
            base_url: "http://localhost:8000".to_string(),
            kind: EndpointKind::AiCore,
            model: None,
            description: String::new(),
        }
    }

    #[test]
    fn test_open_missing_file_yields_empty_registry() {
        let dir = TempDir::new().unwrap();
        let registry = EndpointRegistry::open(dir.path()).unwrap();
        assert!(registry.is_empty());
    }

    #[test]
    fn test_create_assigns_sequential_ids() {
        let dir = TempDir::new().unwrap();
        let mut registry = EndpointRegistry::open(dir.path()).unwrap();

        let a = registry.create(draft("a")).unwrap();
        let b = registry.create(draft("b")).unwrap();

        assert_eq!(a.id(), EndpointId::new(1));
        assert_eq!(b.id(), EndpointId::new(2));
        assert_eq!(registry.order(), vec![a.id(), b.id()]);
    }

    #[test]
    fn test_create_rejects_invalid_draft_without_mutation() {
        let dir = TempDir::new().unwrap();
        let mut registry = EndpointRegistry::open(dir.path()).unwrap();

        let mut bad = draft("");
        bad.name = String::new();
        assert!(registry.create(bad).is_err());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_update_unknown_id_is_not_found() {
        let dir = TempDir::new().unwrap();
        let mut registry = EndpointRegistry::open(dir.path()).unwrap();

        let result = registry.update(EndpointId::new(99), draft("x"));
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_update_keeps_id_and_position() {
        let dir = TempDir::new().unwrap();
        let mut registry = EndpointRegistry::open(dir.path()).unwrap();

        let a = registry.create(draft("a")).unwrap();
        registry.create(draft("b")).unwrap();

        let mut renamed = draft("a-renamed");
        renamed.description = "moved host".to_string();
        let updated = registry.update(a.id(), renamed).unwrap();

        assert_eq!(updated.id(), a.id());
        assert_eq!(registry.list()[0].name(), "a-renamed");
    }

    #[test]
    fn test_delete_removes_and_preserves_order() {
        let dir = TempDir::new().unwrap();
        let mut registry = EndpointRegistry::open(dir.path()).unwrap();

        let a = registry.create(draft("a")).unwrap();
        let b = registry.create(draft("b")).unwrap();
        let c = registry.create(draft("c")).unwrap();

        registry.delete(b.id()).unwrap();
        assert_eq!(registry.order(), vec![a.id(), c.id()]);

        assert!(matches!(
            registry.delete(b.id()),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn test_persistence_round_trip_and_id_counter() {
        let dir = TempDir::new().unwrap();
        {
            let mut registry = EndpointRegistry::open(dir.path()).unwrap();
            registry.create(draft("a")).unwrap();
            let b = registry.create(draft("b")).unwrap();
            registry.delete(b.id()).unwrap();
        }

        // Reopen: surviving endpoint is back, and the id counter resumes at
        // max(existing) + 1.
        let mut registry = EndpointRegistry::open(dir.path()).unwrap();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.list()[0].name(), "a");

        let c = registry.create(draft("c")).unwrap();
        assert_eq!(c.id(), EndpointId::new(2));
    }

    #[test]
    fn test_open_corrupt_file_is_error() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(REGISTRY_FILE), "{not json").unwrap();

        let result = EndpointRegistry::open(dir.path());
        assert!(matches!(result, Err(AppError::StoreParse { .. })));
    }
}
