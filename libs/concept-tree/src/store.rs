//! Persistence seam for CodeSystem resources
//!
//! The form hands the whole resource, concept tree included, to a store and
//! gets the persisted resource back. Server transport lives elsewhere; this
//! crate ships an in-memory store and a directory of JSON files.

use crate::error::{Error, Result};
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use termadmin_models::CodeSystem;

pub trait CodeSystemStore {
    fn get(&self, id: &str) -> Result<CodeSystem>;

    /// Persist a new resource and return it with its assigned id.
    fn create(&mut self, resource: &CodeSystem) -> Result<CodeSystem>;

    /// Replace the resource stored under `id`.
    fn update(&mut self, id: &str, resource: &CodeSystem) -> Result<CodeSystem>;
}

/// Resource ids follow the FHIR id datatype: `[A-Za-z0-9\-\.]{1,64}`.
pub fn is_valid_id(id: &str) -> bool {
    (1..=64).contains(&id.len())
        && id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'.')
        && id != "."
        && id != ".."
}

fn check_id(id: &str) -> Result<()> {
    if is_valid_id(id) {
        Ok(())
    } else {
        Err(Error::Store(format!("invalid resource id '{id}'")))
    }
}

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    resources: BTreeMap<String, CodeSystem>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

impl CodeSystemStore for MemoryStore {
    fn get(&self, id: &str) -> Result<CodeSystem> {
        self.resources
            .get(id)
            .cloned()
            .ok_or_else(|| Error::NotFound(id.to_string()))
    }

    fn create(&mut self, resource: &CodeSystem) -> Result<CodeSystem> {
        let id = resource.id.clone().unwrap_or_else(new_id);
        check_id(&id)?;
        if self.resources.contains_key(&id) {
            return Err(Error::Store(format!("CodeSystem/{id} already exists")));
        }
        let mut stored = resource.clone();
        stored.id = Some(id.clone());
        self.resources.insert(id, stored.clone());
        Ok(stored)
    }

    fn update(&mut self, id: &str, resource: &CodeSystem) -> Result<CodeSystem> {
        let slot = self
            .resources
            .get_mut(id)
            .ok_or_else(|| Error::NotFound(id.to_string()))?;
        let mut stored = resource.clone();
        stored.id = Some(id.to_string());
        *slot = stored.clone();
        Ok(stored)
    }
}

/// One pretty-printed `<id>.json` file per CodeSystem.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    /// Open (and create if needed) the store directory.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        tracing::debug!(root = %root.display(), "Opened CodeSystem file store");
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn file_for(&self, id: &str) -> Result<PathBuf> {
        check_id(id)?;
        Ok(self.root.join(format!("{id}.json")))
    }

    fn write(&self, path: &Path, resource: &CodeSystem) -> Result<()> {
        // Target is only ever replaced whole.
        let tmp = path.with_extension("json.tmp");
        {
            let mut file = fs::File::create(&tmp)?;
            resource.write_json_pretty(&mut file)?;
            file.write_all(b"\n")?;
            file.sync_all()?;
        }
        fs::rename(&tmp, path)?;
        Ok(())
    }
}

impl CodeSystemStore for JsonFileStore {
    fn get(&self, id: &str) -> Result<CodeSystem> {
        let path = self.file_for(id)?;
        if !path.exists() {
            return Err(Error::NotFound(id.to_string()));
        }
        let file = fs::File::open(&path)?;
        let mut resource = CodeSystem::from_json_reader(std::io::BufReader::new(file))?;
        resource.id.get_or_insert_with(|| id.to_string());
        Ok(resource)
    }

    fn create(&mut self, resource: &CodeSystem) -> Result<CodeSystem> {
        let id = resource.id.clone().unwrap_or_else(new_id);
        let path = self.file_for(&id)?;
        if path.exists() {
            return Err(Error::Store(format!("CodeSystem/{id} already exists")));
        }
        let mut stored = resource.clone();
        stored.id = Some(id.clone());
        self.write(&path, &stored)?;

        tracing::info!(%id, concepts = stored.concept_count(), "CodeSystem created");
        Ok(stored)
    }

    fn update(&mut self, id: &str, resource: &CodeSystem) -> Result<CodeSystem> {
        let path = self.file_for(id)?;
        if !path.exists() {
            return Err(Error::NotFound(id.to_string()));
        }
        let mut stored = resource.clone();
        stored.id = Some(id.to_string());
        self.write(&path, &stored)?;

        tracing::info!(%id, concepts = stored.concept_count(), "CodeSystem updated");
        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_follow_fhir_rules() {
        assert!(is_valid_id("body-site"));
        assert!(is_valid_id("v2.0"));
        assert!(!is_valid_id(""));
        assert!(!is_valid_id("../etc"));
        assert!(!is_valid_id(".."));
        assert!(!is_valid_id("a/b"));
        assert!(!is_valid_id(&"x".repeat(65)));
    }

    #[test]
    fn memory_store_assigns_ids() {
        let mut store = MemoryStore::new();
        let saved = store.create(&CodeSystem::draft()).unwrap();
        let id = saved.id.clone().unwrap();
        assert_eq!(store.get(&id).unwrap(), saved);
        assert!(matches!(store.get("missing"), Err(Error::NotFound(_))));
        assert!(matches!(
            store.update("missing", &saved),
            Err(Error::NotFound(_))
        ));
    }
}
