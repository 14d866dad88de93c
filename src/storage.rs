//! Saved-configuration storage
//!
//! Persists post configurations as a JSON array in a single file under a
//! store directory. Exports and imports use a versioned envelope:
//! `{ "version": "1.0", "exportedAt": ..., "configs": [...] }`.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::PostConfig;

const STORAGE_FILE: &str = "saved_configs.json";
const BUNDLE_VERSION: &str = "1.0";

/// Export envelope wrapping one or more configurations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportBundle {
    pub version: String,
    pub exported_at: String,
    pub configs: Vec<PostConfig>,
}

/// File-backed store of saved post configurations.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    dir: PathBuf,
}

impl ConfigStore {
    /// Opens a store rooted at `dir`, creating the directory if needed.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(ConfigStore { dir })
    }

    /// Opens the default per-user store location.
    pub fn open_default() -> Result<Self> {
        let base = dirs::data_dir()
            .ok_or_else(|| Error::Storage("no user data directory available".to_string()))?;
        Self::open(base.join("mdpost"))
    }

    fn file(&self) -> PathBuf {
        self.dir.join(STORAGE_FILE)
    }

    /// Loads all saved configurations. A missing file is an empty store;
    /// unreadable JSON is a storage error.
    pub fn load(&self) -> Result<Vec<PostConfig>> {
        let path = self.file();
        if !path.exists() {
            return Ok(Vec::new());
        }
        let raw = fs::read_to_string(&path)?;
        serde_json::from_str(&raw)
            .map_err(|e| Error::Storage(format!("corrupt store {}: {e}", path.display())))
    }

    fn write(&self, configs: &[PostConfig]) -> Result<()> {
        let raw = serde_json::to_string_pretty(configs)
            .map_err(|e| Error::Storage(e.to_string()))?;
        fs::write(self.file(), raw)?;
        Ok(())
    }

    /// Saves `config`, assigning a fresh id and creation timestamp.
    /// Returns the assigned id.
    pub fn save(&self, mut config: PostConfig) -> Result<String> {
        let id = generate_config_id();
        config.id = Some(id.clone());
        config.created_at = Some(Utc::now().to_rfc3339());

        let mut configs = self.load()?;
        configs.push(config);
        self.write(&configs)?;
        log::debug!("saved config {id}");
        Ok(id)
    }

    /// Returns the saved configuration with `id`.
    pub fn find(&self, id: &str) -> Result<PostConfig> {
        self.load()?
            .into_iter()
            .find(|c| c.id.as_deref() == Some(id))
            .ok_or_else(|| Error::NotFound(id.to_string()))
    }

    /// Deletes the configuration with `id`.
    pub fn delete(&self, id: &str) -> Result<()> {
        let mut configs = self.load()?;
        let before = configs.len();
        configs.retain(|c| c.id.as_deref() != Some(id));
        if configs.len() == before {
            return Err(Error::NotFound(id.to_string()));
        }
        self.write(&configs)
    }

    /// Renames the configuration with `id`.
    pub fn rename(&self, id: &str, new_name: &str) -> Result<()> {
        let mut configs = self.load()?;
        let target = configs
            .iter_mut()
            .find(|c| c.id.as_deref() == Some(id))
            .ok_or_else(|| Error::NotFound(id.to_string()))?;
        target.name = new_name.to_string();
        self.write(&configs)
    }

    /// Bundles every saved configuration for export.
    pub fn export_all(&self) -> Result<ExportBundle> {
        Ok(bundle(self.load()?))
    }

    /// Bundles a single configuration for export.
    pub fn export_one(&self, id: &str) -> Result<ExportBundle> {
        Ok(bundle(vec![self.find(id)?]))
    }

    /// Imports configurations from raw JSON: an export bundle, a bare
    /// array, or a single configuration. Imported entries get fresh ids
    /// when theirs are missing or collide with existing ones. Returns the
    /// number imported.
    pub fn import(&self, raw: &str) -> Result<usize> {
        let incoming = parse_import(raw)?;
        if incoming.is_empty() {
            return Err(Error::Import("no configurations found".to_string()));
        }

        let mut configs = self.load()?;
        let mut existing: std::collections::HashSet<String> = configs
            .iter()
            .filter_map(|c| c.id.clone())
            .collect();

        let count = incoming.len();
        for mut config in incoming {
            let needs_id = match &config.id {
                Some(id) => existing.contains(id),
                None => true,
            };
            if needs_id {
                config.id = Some(generate_config_id());
            }
            if config.created_at.is_none() {
                config.created_at = Some(Utc::now().to_rfc3339());
            }
            existing.insert(config.id.clone().unwrap_or_default());
            configs.push(config);
        }
        self.write(&configs)?;
        log::debug!("imported {count} configs");
        Ok(count)
    }
}

fn bundle(configs: Vec<PostConfig>) -> ExportBundle {
    ExportBundle {
        version: BUNDLE_VERSION.to_string(),
        exported_at: Utc::now().to_rfc3339(),
        configs,
    }
}

fn parse_import(raw: &str) -> Result<Vec<PostConfig>> {
    if let Ok(bundle) = serde_json::from_str::<ExportBundle>(raw) {
        return Ok(bundle.configs);
    }
    if let Ok(list) = serde_json::from_str::<Vec<PostConfig>>(raw) {
        return Ok(list);
    }
    if let Ok(single) = serde_json::from_str::<PostConfig>(raw) {
        return Ok(vec![single]);
    }
    Err(Error::Import("unrecognized configuration JSON".to_string()))
}

/// `config_<unix millis>_<uuid fragment>`, unique and roughly sortable.
fn generate_config_id() -> String {
    let millis = Utc::now().timestamp_millis();
    let fragment = uuid::Uuid::new_v4().simple().to_string();
    format!("config_{millis}_{}", &fragment[..9])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (tempfile::TempDir, ConfigStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::open(dir.path()).unwrap();
        (dir, store)
    }

    fn named(name: &str) -> PostConfig {
        PostConfig {
            name: name.to_string(),
            ..PostConfig::default()
        }
    }

    #[test]
    fn missing_file_is_an_empty_store() {
        let (_dir, store) = store();
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn save_assigns_id_and_timestamp() {
        let (_dir, store) = store();
        let id = store.save(named("first")).unwrap();
        assert!(id.starts_with("config_"));

        let found = store.find(&id).unwrap();
        assert_eq!(found.name, "first");
        assert!(found.created_at.is_some());
    }

    #[test]
    fn delete_and_rename() {
        let (_dir, store) = store();
        let a = store.save(named("a")).unwrap();
        let b = store.save(named("b")).unwrap();

        store.rename(&a, "renamed").unwrap();
        assert_eq!(store.find(&a).unwrap().name, "renamed");

        store.delete(&b).unwrap();
        assert!(matches!(store.find(&b), Err(Error::NotFound(_))));
        assert_eq!(store.load().unwrap().len(), 1);
    }

    #[test]
    fn unknown_ids_are_not_found() {
        let (_dir, store) = store();
        assert!(matches!(store.delete("nope"), Err(Error::NotFound(_))));
        assert!(matches!(store.rename("nope", "x"), Err(Error::NotFound(_))));
    }

    #[test]
    fn export_bundle_shape() {
        let (_dir, store) = store();
        store.save(named("only")).unwrap();

        let bundle = store.export_all().unwrap();
        assert_eq!(bundle.version, "1.0");
        assert_eq!(bundle.configs.len(), 1);

        let json = serde_json::to_value(&bundle).unwrap();
        assert!(json.get("exportedAt").is_some());
        assert!(json.get("configs").is_some());
    }

    #[test]
    fn import_round_trip_reassigns_colliding_ids() {
        let (_dir, store) = store();
        store.save(named("original")).unwrap();

        let bundle = store.export_all().unwrap();
        let raw = serde_json::to_string(&bundle).unwrap();
        let count = store.import(&raw).unwrap();
        assert_eq!(count, 1);

        let configs = store.load().unwrap();
        assert_eq!(configs.len(), 2);
        assert_ne!(configs[0].id, configs[1].id);
    }

    #[test]
    fn import_accepts_single_config_and_bare_array() {
        let (_dir, store) = store();
        let single = serde_json::to_string(&named("solo")).unwrap();
        assert_eq!(store.import(&single).unwrap(), 1);

        let list = serde_json::to_string(&vec![named("x"), named("y")]).unwrap();
        assert_eq!(store.import(&list).unwrap(), 2);
        assert_eq!(store.load().unwrap().len(), 3);
    }

    #[test]
    fn import_rejects_garbage() {
        let (_dir, store) = store();
        assert!(matches!(store.import("not json"), Err(Error::Import(_))));
    }

    #[test]
    fn corrupt_store_is_a_storage_error() {
        let (dir, store) = store();
        fs::write(dir.path().join(STORAGE_FILE), "{broken").unwrap();
        assert!(matches!(store.load(), Err(Error::Storage(_))));
    }

    #[test]
    fn persisted_field_names_are_camel_case() {
        let json = serde_json::to_value(named("n")).unwrap();
        for key in [
            "titleFontSize",
            "contentFontSize",
            "titleFontWeight",
            "contentFontWeight",
            "titleY",
            "contentY",
            "showNextArrow",
            "showCodeSection",
            "codeBoxHeight",
        ] {
            assert!(json.get(key).is_some(), "missing key {key}");
        }
    }
}
