//! Project folders under a common root
//!
//! ```text
//! <root>/projects/<name>/data.json
//! <root>/projects/<name>/pictures/
//! <root>/.current_project
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::project::{ProjectDocument, ProjectStore};
use crate::{DataError, DataResult};

const PROJECTS_DIR: &str = "projects";
const CURRENT_FILE: &str = ".current_project";
const DATA_FILE: &str = "data.json";
const PICTURES_DIR: &str = "pictures";
pub const DEFAULT_PROJECT: &str = "default";

#[derive(Debug, Clone)]
pub struct ProjectsRoot {
    root: PathBuf,
}

impl ProjectsRoot {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn project_dir(&self, name: &str) -> PathBuf {
        self.root.join(PROJECTS_DIR).join(name)
    }

    pub fn data_file(&self, name: &str) -> PathBuf {
        self.project_dir(name).join(DATA_FILE)
    }

    /// Folder image references of the project are resolved against
    pub fn pictures_dir(&self, name: &str) -> PathBuf {
        self.project_dir(name).join(PICTURES_DIR)
    }

    /// Project names, sorted
    pub fn list(&self) -> DataResult<Vec<String>> {
        let dir = self.root.join(PROJECTS_DIR);
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut names = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }

    /// Create the folders and an empty document; existing data is kept
    pub fn create(&self, name: &str) -> DataResult<PathBuf> {
        let name = project_name(name);
        fs::create_dir_all(self.pictures_dir(name))?;
        let data = self.data_file(name);
        if !data.exists() {
            fs::write(&data, ProjectDocument::default().to_json_string()?)?;
        }
        Ok(data)
    }

    pub fn rename(&self, old: &str, new: &str) -> DataResult<()> {
        let from = self.project_dir(old);
        let to = self.project_dir(new);
        if !from.exists() {
            return Err(DataError::ProjectNotFound(old.to_string()));
        }
        if to.exists() {
            return Err(DataError::ProjectExists(new.to_string()));
        }
        fs::rename(from, to)?;
        info!(old, new, "project renamed");
        Ok(())
    }

    pub fn delete(&self, name: &str) -> DataResult<()> {
        let dir = self.project_dir(name);
        if dir.exists() {
            fs::remove_dir_all(dir)?;
            info!(name, "project deleted");
        }
        Ok(())
    }

    /// Name of the selected project, `default` when none was chosen
    pub fn current(&self) -> String {
        fs::read_to_string(self.root.join(CURRENT_FILE))
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_PROJECT.to_string())
    }

    /// Select `name`, creating it if needed
    pub fn set_current(&self, name: &str) -> DataResult<()> {
        let name = project_name(name);
        fs::create_dir_all(&self.root)?;
        fs::write(self.root.join(CURRENT_FILE), name)?;
        self.create(name)?;
        Ok(())
    }

    pub fn open_current(&self) -> DataResult<ProjectStore> {
        ProjectStore::open_or_create(self.data_file(&self.current()))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

fn project_name(name: &str) -> &str {
    let name = name.trim();
    if name.is_empty() {
        DEFAULT_PROJECT
    } else {
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tl_core::Place;

    #[test]
    fn test_project_lifecycle() {
        let dir = tempfile::tempdir().unwrap();
        let root = ProjectsRoot::new(dir.path());
        assert!(root.list().unwrap().is_empty());
        assert_eq!(root.current(), DEFAULT_PROJECT);

        root.create("saga").unwrap();
        root.create("atlas").unwrap();
        assert!(root.pictures_dir("saga").is_dir());
        assert_eq!(root.list().unwrap(), vec!["atlas", "saga"]);

        assert!(matches!(root.rename("saga", "atlas"), Err(DataError::ProjectExists(_))));
        assert!(matches!(root.rename("nope", "x"), Err(DataError::ProjectNotFound(_))));
        root.rename("saga", "epic").unwrap();
        root.delete("atlas").unwrap();
        assert_eq!(root.list().unwrap(), vec!["epic"]);
    }

    #[test]
    fn test_current_project_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let root = ProjectsRoot::new(dir.path());
        root.set_current("  ").unwrap();
        assert_eq!(root.current(), DEFAULT_PROJECT);

        root.set_current("epic").unwrap();
        let mut store = root.open_current().unwrap();
        store.add_place(Place::new("Castle")).unwrap();
        store.save().unwrap();

        let reopened = root.open_current().unwrap();
        assert_eq!(reopened.places().len(), 1);
        assert_eq!(reopened.path(), Some(root.data_file("epic").as_path()));
    }
}
