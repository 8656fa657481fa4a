// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Loading and saving repository batches (auto-detects JSON or YAML).

use crate::schema::RepoList;
use crate::RepoListError;
use serde_valid::Validate;
use std::path::Path;

/// Loads and saves `RepoList` batches from JSON or YAML files.
pub struct RepoListLoader;

impl RepoListLoader {
    /// Create a new loader.
    pub fn new() -> Self {
        Self
    }

    /// Load a repository batch from a file, auto-detecting JSON or YAML by
    /// extension, and validate it against the schema (non-empty, unique ids).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use repolizer_checks::loader::RepoListLoader;
    /// use std::path::Path;
    ///
    /// let loader = RepoListLoader::new();
    /// let batch = loader.load(Path::new("repos.json")).unwrap();
    /// println!("Loaded {} repositories", batch.repositories.len());
    /// ```
    pub fn load(&self, path: &Path) -> Result<RepoList, RepoListError> {
        if !path.exists() {
            return Err(RepoListError::NotFound(path.display().to_string()));
        }

        let content = std::fs::read_to_string(path)?;

        let batch = match path.extension().and_then(|s| s.to_str()) {
            Some("yaml") | Some("yml") => serde_yaml::from_str::<RepoList>(&content)?,
            _ => serde_json::from_str::<RepoList>(&content)?,
        };

        self.validate(&batch)?;
        Ok(batch)
    }

    /// Load from a JSON file explicitly.
    pub fn load_from_json(&self, path: &Path) -> Result<RepoList, RepoListError> {
        let content = std::fs::read_to_string(path)?;
        let batch: RepoList = serde_json::from_str(&content)?;
        self.validate(&batch)?;
        Ok(batch)
    }

    /// Load from a YAML file explicitly.
    pub fn load_from_yaml(&self, path: &Path) -> Result<RepoList, RepoListError> {
        let content = std::fs::read_to_string(path)?;
        let batch: RepoList = serde_yaml::from_str(&content)?;
        self.validate(&batch)?;
        Ok(batch)
    }

    /// Save a batch to a JSON file.
    pub fn save_to_json(&self, batch: &RepoList, path: &Path) -> Result<(), RepoListError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(batch)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Save a batch to a YAML file.
    pub fn save_to_yaml(&self, batch: &RepoList, path: &Path) -> Result<(), RepoListError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_yaml::to_string(batch)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    fn validate(&self, batch: &RepoList) -> Result<(), RepoListError> {
        batch
            .validate()
            .map_err(|e| RepoListError::ValidationError(e.to_string()))?;
        batch
            .check_unique_ids()
            .map_err(RepoListError::ValidationError)?;
        Ok(())
    }
}

impl Default for RepoListLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::RepoEntry;

    #[test]
    fn test_loader_creation() {
        let _loader = RepoListLoader::new();
    }

    #[test]
    fn test_save_and_load_json_roundtrip() {
        let loader = RepoListLoader::new();
        let temp_dir = tempfile::tempdir().unwrap();
        let file_path = temp_dir.path().join("repos.json");

        let mut batch = RepoList::new();
        batch.add(RepoEntry::new("1", "widget", "acme/widget"));

        loader.save_to_json(&batch, &file_path).unwrap();
        let loaded = loader.load_from_json(&file_path).unwrap();

        assert_eq!(loaded.repositories.len(), 1);
        assert_eq!(loaded.repositories[0].id, "1");
    }

    #[test]
    fn test_save_and_load_yaml_roundtrip() {
        let loader = RepoListLoader::new();
        let temp_dir = tempfile::tempdir().unwrap();
        let file_path = temp_dir.path().join("repos.yaml");

        let mut batch = RepoList::new();
        batch.add(RepoEntry::new("1", "widget", "acme/widget"));

        loader.save_to_yaml(&batch, &file_path).unwrap();
        let loaded = loader.load_from_yaml(&file_path).unwrap();

        assert_eq!(loaded.repositories.len(), 1);
    }

    #[test]
    fn test_load_auto_detects_extension() {
        let loader = RepoListLoader::new();
        let temp_dir = tempfile::tempdir().unwrap();
        let file_path = temp_dir.path().join("repos.yaml");

        let mut batch = RepoList::new();
        batch.add(RepoEntry::new("1", "widget", "acme/widget"));
        loader.save_to_yaml(&batch, &file_path).unwrap();

        let loaded = loader.load(&file_path).unwrap();
        assert_eq!(loaded.repositories.len(), 1);
    }

    #[test]
    fn test_load_missing_file() {
        let loader = RepoListLoader::new();
        let result = loader.load(Path::new("/nonexistent/repos.json"));
        assert!(matches!(result, Err(RepoListError::NotFound(_))));
    }

    #[test]
    fn test_load_rejects_empty_batch() {
        let loader = RepoListLoader::new();
        let temp_dir = tempfile::tempdir().unwrap();
        let file_path = temp_dir.path().join("empty.json");

        std::fs::write(&file_path, r#"{"repositories": []}"#).unwrap();
        let result = loader.load(&file_path);
        assert!(result.is_err());
    }

    #[test]
    fn test_load_rejects_duplicate_ids() {
        let loader = RepoListLoader::new();
        let temp_dir = tempfile::tempdir().unwrap();
        let file_path = temp_dir.path().join("dup.json");

        let mut batch = RepoList::new();
        batch.add(RepoEntry::new("1", "widget", "acme/widget"));
        batch.add(RepoEntry::new("1", "gizmo", "acme/gizmo"));
        let content = serde_json::to_string(&batch).unwrap();
        std::fs::write(&file_path, content).unwrap();

        let result = loader.load(&file_path);
        assert!(matches!(result, Err(RepoListError::ValidationError(_))));
    }
}
