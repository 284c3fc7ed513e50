//! The `data.json` project document and an in-memory store around it

use std::fs;
use std::path::{Path, PathBuf};

use ahash::AHashSet;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use tl_core::{Character, Event, EventId, Place};
use tl_views::{apply_commit, DeferredCommits, DragCommit};

use crate::{DataError, DataResult};

/// On-disk shape of a project; missing lists and fields default to empty
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectDocument {
    pub characters: Vec<Character>,
    pub places: Vec<Place>,
    pub events: Vec<Event>,
}

impl ProjectDocument {
    pub fn from_json_str(json: &str) -> DataResult<Self> {
        let document: Self = serde_json::from_str(json)?;
        document.warn_duplicates();
        Ok(document)
    }

    pub fn to_json_string(&self) -> DataResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn warn_duplicates(&self) {
        warn_duplicates("place", self.places.iter().map(|p| p.name.as_str()));
        warn_duplicates("character", self.characters.iter().map(|c| c.name.as_str()));
    }
}

/// Documents edited by hand may repeat names; the first entry wins in layout
fn warn_duplicates<'a>(kind: &str, names: impl Iterator<Item = &'a str>) {
    for name in duplicate_names(names) {
        warn!(kind, name, "duplicate entry in project document");
    }
}

/// Names that repeat an earlier one, compared trimmed and case-insensitively
fn duplicate_names<'a>(names: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen = AHashSet::new();
    names
        .filter(|name| !seen.insert(name.trim().to_lowercase()))
        .collect()
}

/// Entity lists of one project, with optional backing file
///
/// Inserts enforce what the layout assumes: non-empty names, unique
/// (case-insensitively) per kind.
#[derive(Debug, Default)]
pub struct ProjectStore {
    document: ProjectDocument,
    path: Option<PathBuf>,
    dirty: bool,
}

impl ProjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_document(document: ProjectDocument) -> Self {
        Self {
            document,
            ..Self::default()
        }
    }

    pub fn from_json_str(json: &str) -> DataResult<Self> {
        ProjectDocument::from_json_str(json).map(Self::from_document)
    }

    /// Load `path`; a missing file is an error
    pub fn load(path: impl AsRef<Path>) -> DataResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let document = ProjectDocument::from_json_str(&text)?;
        info!(
            path = %path.display(),
            places = document.places.len(),
            characters = document.characters.len(),
            events = document.events.len(),
            "project loaded"
        );
        Ok(Self {
            document,
            path: Some(path.to_path_buf()),
            dirty: false,
        })
    }

    /// Load `path`, writing an empty document first if it does not exist
    pub fn open_or_create(path: impl AsRef<Path>) -> DataResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, ProjectDocument::default().to_json_string()?)?;
            debug!(path = %path.display(), "created empty project document");
        }
        Self::load(path)
    }

    /// Write back to the file the store was loaded from
    pub fn save(&mut self) -> DataResult<()> {
        let path = self.path.clone().ok_or(DataError::NoPath)?;
        self.save_to(&path)
    }

    pub fn save_to(&mut self, path: impl AsRef<Path>) -> DataResult<()> {
        let path = path.as_ref();
        fs::write(path, self.document.to_json_string()?)?;
        self.path = Some(path.to_path_buf());
        self.dirty = false;
        info!(path = %path.display(), "project saved");
        Ok(())
    }

    pub fn document(&self) -> &ProjectDocument {
        &self.document
    }

    pub fn places(&self) -> &[Place] {
        &self.document.places
    }

    pub fn characters(&self) -> &[Character] {
        &self.document.characters
    }

    pub fn events(&self) -> &[Event] {
        &self.document.events
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Changed since the last load or save
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn add_place(&mut self, mut place: Place) -> DataResult<()> {
        let existing = self.document.places.iter().map(|p| p.name.as_str());
        place.name = checked_name("place", &place.name, existing)?;
        self.document.places.push(place);
        self.dirty = true;
        Ok(())
    }

    pub fn add_character(&mut self, mut character: Character) -> DataResult<()> {
        character.name = checked_name(
            "character",
            &character.name,
            self.document.characters.iter().map(|c| c.name.as_str()),
        )?;
        self.document.characters.push(character);
        self.dirty = true;
        Ok(())
    }

    pub fn add_event(&mut self, mut event: Event) -> DataResult<EventId> {
        let existing = self.document.events.iter().map(|e| e.title.as_str());
        event.title = checked_name("event", &event.title, existing)?;
        self.document.events.push(event);
        self.dirty = true;
        Ok(EventId(self.document.events.len() - 1))
    }

    /// Remove a place; events keep their now dangling references
    pub fn remove_place(&mut self, name: &str) -> Option<Place> {
        let index = self.document.places.iter().position(|p| p.name == name)?;
        self.dirty = true;
        Some(self.document.places.remove(index))
    }

    pub fn remove_character(&mut self, name: &str) -> Option<Character> {
        let index = self.document.characters.iter().position(|c| c.name == name)?;
        self.dirty = true;
        Some(self.document.characters.remove(index))
    }

    /// Write a drag result into its event
    pub fn apply_commit(&mut self, commit: &DragCommit) -> DataResult<()> {
        if !apply_commit(&mut self.document.events, commit) {
            return Err(DataError::UnknownEvent(commit.event.0));
        }
        self.dirty = true;
        Ok(())
    }

    /// Apply every queued commit; call between frames
    pub fn apply_deferred(&mut self, queue: &mut DeferredCommits) -> Vec<EventId> {
        let changed = queue.flush(&mut self.document.events);
        if !changed.is_empty() {
            self.dirty = true;
        }
        changed
    }
}

fn checked_name<'a>(
    kind: &'static str,
    name: &str,
    existing: impl IntoIterator<Item = &'a str>,
) -> DataResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(DataError::MissingName { kind });
    }
    let key = name.to_lowercase();
    if existing.into_iter().any(|other| other.trim().to_lowercase() == key) {
        return Err(DataError::Duplicate {
            kind,
            name: name.to_string(),
        });
    }
    Ok(name.to_string())
}
