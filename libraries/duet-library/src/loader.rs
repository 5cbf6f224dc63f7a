//! Builds the playable library from the local index and the remote catalog

use duet_core::{MediaIndex, MediaItem, MediaKind, RemoteCatalog};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Local half of a library load
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalLoad {
    /// Items found on the device
    pub items: Vec<MediaItem>,

    /// The platform refused access to the index
    pub permission_denied: bool,
}

/// Outcome of a full library load
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LibraryLoad {
    /// Remote items first, then local items
    pub items: Vec<MediaItem>,

    /// How many items came from the device
    pub local_count: usize,

    /// How many items came from the remote
    pub remote_count: usize,

    /// The platform refused access to the index
    pub permission_denied: bool,

    /// Message of a remote failure that was dropped
    pub remote_error: Option<String>,
}

/// Library loader
///
/// The local index is queried synchronously. The remote catalog is optional
/// and its failures never surface as errors; they are logged and recorded on
/// the load result.
pub struct LibraryLoader {
    index: Box<dyn MediaIndex>,
    remote: Option<Arc<dyn RemoteCatalog>>,
}

impl LibraryLoader {
    /// Create a loader with only a local index
    pub fn new(index: Box<dyn MediaIndex>) -> Self {
        Self {
            index,
            remote: None,
        }
    }

    /// Attach a remote catalog
    #[must_use]
    pub fn with_remote(mut self, remote: Arc<dyn RemoteCatalog>) -> Self {
        self.remote = Some(remote);
        self
    }

    /// The remote catalog, for callers that fetch on their own task
    pub fn remote(&self) -> Option<Arc<dyn RemoteCatalog>> {
        self.remote.clone()
    }

    /// Query the local index
    ///
    /// A permission refusal yields an empty list with the flag set; any
    /// other index error is logged and treated the same way minus the flag.
    pub fn load_local(&self, kind: MediaKind) -> LocalLoad {
        match self.index.query(kind) {
            Ok(items) => {
                debug!(%kind, count = items.len(), "Loaded local media");
                LocalLoad {
                    items,
                    permission_denied: false,
                }
            }
            Err(err) if err.is_permission_denied() => {
                warn!(%kind, error = %err, "Media index access denied");
                LocalLoad {
                    items: Vec::new(),
                    permission_denied: true,
                }
            }
            Err(err) => {
                warn!(%kind, error = %err, "Failed to query media index");
                LocalLoad::default()
            }
        }
    }

    /// Fetch the remote catalog, if one is attached
    ///
    /// Returns the items or the message of the dropped failure.
    pub async fn fetch_remote(&self, kind: MediaKind) -> std::result::Result<Vec<MediaItem>, String> {
        match &self.remote {
            Some(remote) => fetch_from(remote.as_ref(), kind).await,
            None => Ok(Vec::new()),
        }
    }

    /// Load local items, then remote ones, and merge them
    ///
    /// The remote is not consulted when the local index refused access.
    pub async fn load(&self, kind: MediaKind) -> LibraryLoad {
        let local = self.load_local(kind);
        if local.permission_denied {
            return LibraryLoad {
                permission_denied: true,
                ..LibraryLoad::default()
            };
        }

        let (remote, remote_error) = match self.fetch_remote(kind).await {
            Ok(items) => (items, None),
            Err(message) => (Vec::new(), Some(message)),
        };

        let load = LibraryLoad {
            local_count: local.items.len(),
            remote_count: remote.len(),
            items: merge(remote, local.items),
            permission_denied: false,
            remote_error,
        };
        info!(
            %kind,
            local = load.local_count,
            remote = load.remote_count,
            "Library loaded"
        );
        load
    }
}

/// Fetch from a catalog, logging and flattening any failure to its message
pub async fn fetch_from(
    remote: &dyn RemoteCatalog,
    kind: MediaKind,
) -> std::result::Result<Vec<MediaItem>, String> {
    match remote.fetch(kind).await {
        Ok(items) => Ok(items),
        Err(err) => {
            warn!(%kind, error = %err, "Remote fetch failed; showing local items only");
            Err(err.to_string())
        }
    }
}

/// Concatenate remote then local items
///
/// No deduplication; the same title from both sources shows up twice.
pub fn merge(remote: Vec<MediaItem>, local: Vec<MediaItem>) -> Vec<MediaItem> {
    let mut items = remote;
    items.extend(local);
    items
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str) -> MediaItem {
        MediaItem::new(id, "Same Title", id, MediaKind::Audio)
    }

    #[test]
    fn merge_puts_remote_first_and_keeps_duplicates() {
        let merged = merge(vec![item("r1")], vec![item("l1"), item("l2")]);
        let ids: Vec<&str> = merged.iter().map(|item| item.id.as_str()).collect();
        assert_eq!(ids, vec!["r1", "l1", "l2"]);
    }

    #[test]
    fn merge_with_empty_sides() {
        assert_eq!(merge(Vec::new(), vec![item("l")]), vec![item("l")]);
        assert_eq!(merge(vec![item("r")], Vec::new()), vec![item("r")]);
        assert!(merge(Vec::new(), Vec::new()).is_empty());
    }
}
