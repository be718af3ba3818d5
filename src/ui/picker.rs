use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::import::is_import_file;

/// One row in the picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PickerEntry {
    Parent,
    Directory(String),
    File(String),
}

/// What the caller should do after the user pressed Enter.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum PickerAction {
    Stay,
    Import(Vec<PathBuf>),
}

/// Multi-select browser over `.json` files. Directories can be entered, files
/// can be checked with Space, and Enter imports the checked files (or the one
/// under the cursor when nothing is checked).
pub(crate) struct FilePicker {
    pub(crate) dir: PathBuf,
    pub(crate) entries: Vec<PickerEntry>,
    pub(crate) selected: usize,
    checked: BTreeSet<usize>,
}

impl FilePicker {
    pub(crate) fn open(dir: &Path) -> Result<Self> {
        let dir = fs::canonicalize(dir)
            .with_context(|| format!("cannot open {}", dir.display()))?;
        let entries = read_entries(&dir)?;
        Ok(Self {
            dir,
            entries,
            selected: 0,
            checked: BTreeSet::new(),
        })
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        if self.entries.is_empty() {
            return;
        }
        let last = self.entries.len() as isize - 1;
        self.selected = (self.selected as isize + offset).clamp(0, last) as usize;
    }

    pub(crate) fn select_first(&mut self) {
        self.selected = 0;
    }

    pub(crate) fn select_last(&mut self) {
        self.selected = self.entries.len().saturating_sub(1);
    }

    pub(crate) fn is_checked(&self, index: usize) -> bool {
        self.checked.contains(&index)
    }

    pub(crate) fn checked_count(&self) -> usize {
        self.checked.len()
    }

    /// Check or uncheck the file under the cursor. Directories cannot be
    /// checked.
    pub(crate) fn toggle_current(&mut self) -> bool {
        if !matches!(self.entries.get(self.selected), Some(PickerEntry::File(_))) {
            return false;
        }
        if !self.checked.remove(&self.selected) {
            self.checked.insert(self.selected);
        }
        true
    }

    /// Paths of every checked file, in listing order.
    pub(crate) fn checked_paths(&self) -> Vec<PathBuf> {
        self.checked
            .iter()
            .filter_map(|&index| match self.entries.get(index) {
                Some(PickerEntry::File(name)) => Some(self.dir.join(name)),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn go_up(&mut self) -> Result<()> {
        if let Some(parent) = self.dir.parent().map(Path::to_path_buf) {
            self.navigate(parent)?;
        }
        Ok(())
    }

    pub(crate) fn activate(&mut self) -> Result<PickerAction> {
        if !self.checked.is_empty() {
            return Ok(PickerAction::Import(self.checked_paths()));
        }

        match self.entries.get(self.selected).cloned() {
            Some(PickerEntry::Parent) => {
                self.go_up()?;
                Ok(PickerAction::Stay)
            }
            Some(PickerEntry::Directory(name)) => {
                let target = self.dir.join(name);
                self.navigate(target)?;
                Ok(PickerAction::Stay)
            }
            Some(PickerEntry::File(name)) => Ok(PickerAction::Import(vec![self.dir.join(name)])),
            None => Ok(PickerAction::Stay),
        }
    }

    fn navigate(&mut self, dir: PathBuf) -> Result<()> {
        let entries = read_entries(&dir)?;
        self.dir = dir;
        self.entries = entries;
        self.selected = 0;
        self.checked.clear();
        Ok(())
    }
}

/// List sub-directories and import files, directories first, each group sorted
/// case-insensitively. Hidden entries are skipped.
fn read_entries(dir: &Path) -> Result<Vec<PickerEntry>> {
    let mut dirs = Vec::new();
    let mut files = Vec::new();

    let listing =
        fs::read_dir(dir).with_context(|| format!("cannot list {}", dir.display()))?;
    for entry in listing {
        let entry = entry.with_context(|| format!("cannot list {}", dir.display()))?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue;
        }
        let path = entry.path();
        if path.is_dir() {
            dirs.push(name);
        } else if is_import_file(&path) {
            files.push(name);
        }
    }

    dirs.sort_by_key(|name| name.to_lowercase());
    files.sort_by_key(|name| name.to_lowercase());

    let mut entries = Vec::with_capacity(dirs.len() + files.len() + 1);
    if dir.parent().is_some() {
        entries.push(PickerEntry::Parent);
    }
    entries.extend(dirs.into_iter().map(PickerEntry::Directory));
    entries.extend(files.into_iter().map(PickerEntry::File));
    Ok(entries)
}
