//! Changeset types supplied by the diff collaborator.

use serde::Serialize;

use super::normalize_path;

/// How a file changed relative to the base ref.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeStatus {
    Added,
    Modified,
    Deleted,
    Renamed,
}

impl ChangeStatus {
    /// Maps a `git diff --name-status` letter (`M`, `R087`, ...) to a status.
    #[must_use]
    pub fn from_git_letter(code: &str) -> Option<Self> {
        match code.chars().next()? {
            'A' | 'C' => Some(Self::Added),
            'M' | 'T' => Some(Self::Modified),
            'D' => Some(Self::Deleted),
            'R' => Some(Self::Renamed),
            _ => None,
        }
    }
}

/// A single changed file. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangedFile {
    path: String,
    status: ChangeStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    old_path: Option<String>,
}

impl ChangedFile {
    #[must_use]
    pub fn new(path: &str, status: ChangeStatus) -> Self {
        Self { path: normalize_path(path), status, old_path: None }
    }

    #[must_use]
    pub fn renamed(old_path: &str, path: &str) -> Self {
        Self {
            path: normalize_path(path),
            status: ChangeStatus::Renamed,
            old_path: Some(normalize_path(old_path)),
        }
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub fn status(&self) -> ChangeStatus {
        self.status
    }

    #[must_use]
    pub fn old_path(&self) -> Option<&str> {
        self.old_path.as_deref()
    }

    #[must_use]
    pub fn is_deleted(&self) -> bool {
        self.status == ChangeStatus::Deleted
    }
}

/// Complete changeset for one review run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Changeset {
    pub base: String,
    pub files: Vec<ChangedFile>,
    pub additions: usize,
    pub deletions: usize,
}

impl Changeset {
    #[must_use]
    pub fn new(base: &str, files: Vec<ChangedFile>) -> Self {
        Self { base: base.to_string(), files, additions: 0, deletions: 0 }
    }

    #[must_use]
    pub fn total_files(&self) -> usize {
        self.files.len()
    }

    /// Paths of every changed file, in diff order.
    #[must_use]
    pub fn paths(&self) -> Vec<String> {
        self.files.iter().map(|f| f.path().to_string()).collect()
    }

    /// Paths of files that still exist after the change.
    #[must_use]
    pub fn live_paths(&self) -> Vec<String> {
        self.files
            .iter()
            .filter(|f| !f.is_deleted())
            .map(|f| f.path().to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn git_letters_map_to_status() {
        assert_eq!(ChangeStatus::from_git_letter("M"), Some(ChangeStatus::Modified));
        assert_eq!(ChangeStatus::from_git_letter("R087"), Some(ChangeStatus::Renamed));
        assert_eq!(ChangeStatus::from_git_letter("C100"), Some(ChangeStatus::Added));
        assert_eq!(ChangeStatus::from_git_letter("X"), None);
        assert_eq!(ChangeStatus::from_git_letter(""), None);
    }

    #[test]
    fn live_paths_skip_deletions() {
        let set = Changeset::new(
            "main",
            vec![
                ChangedFile::new("src/a.ts", ChangeStatus::Modified),
                ChangedFile::new("src/gone.ts", ChangeStatus::Deleted),
                ChangedFile::renamed("src/old.ts", "src/new.ts"),
            ],
        );
        assert_eq!(set.live_paths(), vec!["src/a.ts", "src/new.ts"]);
        assert_eq!(set.total_files(), 3);
    }
}
