//! Local media index backed by a directory walk

use duet_core::{DuetError, MediaIndex, MediaItem, MediaKind};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Media index over one folder tree
///
/// Titles come from file stems and ids from full paths. Durations are left
/// unknown; the decode session reports them once prepared.
#[derive(Debug, Clone)]
pub struct DirectoryIndex {
    root: PathBuf,

    /// Whether to follow symbolic links
    follow_links: bool,

    /// Maximum depth to traverse
    max_depth: Option<usize>,
}

impl DirectoryIndex {
    /// Index everything under `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            follow_links: false,
            max_depth: None,
        }
    }

    /// Set whether to follow symbolic links
    #[must_use]
    pub fn follow_links(mut self, follow: bool) -> Self {
        self.follow_links = follow;
        self
    }

    /// Set maximum directory depth to traverse
    #[must_use]
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Root folder
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn to_item(path: &Path, kind: MediaKind) -> Option<MediaItem> {
        let title = path.file_stem()?.to_str()?;
        let locator = path.to_str()?;
        Some(MediaItem::new(locator, title, locator, kind))
    }
}

impl MediaIndex for DirectoryIndex {
    fn query(&self, kind: MediaKind) -> duet_core::Result<Vec<MediaItem>> {
        match std::fs::read_dir(&self.root) {
            Ok(_) => {}
            Err(err) if err.kind() == ErrorKind::NotFound => {
                warn!(root = %self.root.display(), "Media folder does not exist");
                return Ok(Vec::new());
            }
            Err(err) if err.kind() == ErrorKind::PermissionDenied => {
                return Err(DuetError::permission_denied(format!(
                    "cannot read {}",
                    self.root.display()
                )));
            }
            Err(err) => return Err(err.into()),
        }

        let mut walker = WalkDir::new(&self.root).follow_links(self.follow_links);
        if let Some(depth) = self.max_depth {
            walker = walker.max_depth(depth);
        }

        let mut paths: Vec<PathBuf> = walker
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(err) => {
                    debug!(error = %err, "Skipping unreadable entry");
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .map(walkdir::DirEntry::into_path)
            .filter(|path| has_extension(path, kind))
            .collect();
        paths.sort();

        let items: Vec<MediaItem> = paths
            .iter()
            .filter_map(|path| Self::to_item(path, kind))
            .collect();

        debug!(root = %self.root.display(), %kind, items = items.len(), "Indexed local media");
        Ok(items)
    }
}

/// Check if a file carries one of the extensions for `kind`
pub fn has_extension(path: &Path, kind: MediaKind) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| kind.extensions().contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}
