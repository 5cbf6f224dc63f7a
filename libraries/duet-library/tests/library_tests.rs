//! Integration tests for library loading
//!
//! The remote catalog runs against a wiremock server; the local index runs
//! against a temporary folder.

use async_trait::async_trait;
use duet_core::{DuetError, MediaIndex, MediaItem, MediaKind, RemoteCatalog};
use duet_library::{
    DirectoryIndex, LibraryError, LibraryLoader, RealtimeDbCatalog, RemoteConfig,
};
use serde_json::json;
use std::fs;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn catalog_for(server: &MockServer) -> RealtimeDbCatalog {
    RealtimeDbCatalog::new(RemoteConfig::new(server.uri()).with_timeout(Duration::from_secs(2)))
        .unwrap()
}

fn music_folder(names: &[&str]) -> TempDir {
    let temp = TempDir::new().unwrap();
    for name in names {
        fs::write(temp.path().join(name), b"fake audio").unwrap();
    }
    temp
}

struct DeniedIndex;

impl MediaIndex for DeniedIndex {
    fn query(&self, _kind: MediaKind) -> duet_core::Result<Vec<MediaItem>> {
        Err(DuetError::PermissionDenied)
    }
}

struct BrokenIndex;

impl MediaIndex for BrokenIndex {
    fn query(&self, _kind: MediaKind) -> duet_core::Result<Vec<MediaItem>> {
        Err(DuetError::Other("index crashed".into()))
    }
}

/// Counts fetches so tests can assert the remote was never consulted
#[derive(Default)]
struct CountingCatalog {
    calls: std::sync::atomic::AtomicUsize,
}

#[async_trait]
impl RemoteCatalog for CountingCatalog {
    async fn fetch(&self, kind: MediaKind) -> duet_core::Result<Vec<MediaItem>> {
        self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        Ok(vec![MediaItem::new("r", "Remote", "https://cdn/r", kind)])
    }
}

// =============================================================================
// Remote Catalog Tests
// =============================================================================

mod remote_catalog {
    use super::*;

    #[tokio::test]
    async fn test_fetch_music_object_body() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/music.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "-Na1": { "title": "Opening", "uri": "https://cdn/opening.mp3" },
                "-Na2": { "title": "Broken" },
                "-Na3": { "title": "Closing", "uri": "https://cdn/closing.mp3", "duration": 61 },
            })))
            .expect(1)
            .mount(&server)
            .await;

        let items = catalog_for(&server).fetch_items(MediaKind::Audio).await.unwrap();

        let titles: Vec<&str> = items.iter().map(|item| item.title.as_str()).collect();
        assert_eq!(titles, vec!["Opening", "Closing"]);
        assert_eq!(items[0].id, "-Na1");
        assert_eq!(items[1].duration, Some(Duration::from_secs(61)));
        assert!(items.iter().all(MediaItem::is_remote));
    }

    #[tokio::test]
    async fn test_fetch_video_array_body() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/video.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                null,
                { "id": 1, "title": "Trailer", "uri": "https://cdn/trailer.mp4", "duration": 95 },
                { "title": "Untimed" },
            ])))
            .mount(&server)
            .await;

        let items = catalog_for(&server).fetch_items(MediaKind::Video).await.unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "Trailer");
        assert_eq!(items[0].duration, Some(Duration::from_secs(95)));
        assert_eq!(items[1].id, "2");
        assert_eq!(items[1].locator, "");
        assert_eq!(items[1].duration, Some(Duration::ZERO));
    }

    #[tokio::test]
    async fn test_fetch_empty_path() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/music.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string("null"))
            .mount(&server)
            .await;

        let items = catalog_for(&server).fetch_items(MediaKind::Audio).await.unwrap();
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn test_server_error_status() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/music.json"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Permission denied"))
            .mount(&server)
            .await;

        let result = catalog_for(&server).fetch_items(MediaKind::Audio).await;
        match result.unwrap_err() {
            LibraryError::ServerError { status, message } => {
                assert_eq!(status, 401);
                assert!(message.contains("Permission denied"));
            }
            other => panic!("Expected ServerError, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/music.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let result = catalog_for(&server).fetch_items(MediaKind::Audio).await;
        assert!(matches!(result, Err(LibraryError::ParseError(_))));
    }

    #[tokio::test]
    async fn test_trait_maps_to_remote_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let catalog: Arc<dyn RemoteCatalog> = Arc::new(catalog_for(&server));
        let err = catalog.fetch(MediaKind::Video).await.unwrap_err();
        assert!(matches!(err, DuetError::Remote(_)));
    }
}

// =============================================================================
// Loader Tests
// =============================================================================

mod loader {
    use super::*;

    #[tokio::test]
    async fn test_remote_items_come_first() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/music.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "k": { "title": "Same Song", "uri": "https://cdn/same.mp3" }
            })))
            .mount(&server)
            .await;

        let folder = music_folder(&["Same Song.mp3", "Another.ogg"]);
        let loader = LibraryLoader::new(Box::new(DirectoryIndex::new(folder.path())))
            .with_remote(Arc::new(catalog_for(&server)));

        let load = loader.load(MediaKind::Audio).await;

        assert_eq!(load.remote_count, 1);
        assert_eq!(load.local_count, 2);
        assert!(load.remote_error.is_none());
        assert!(!load.permission_denied);

        let titles: Vec<&str> = load.items.iter().map(|item| item.title.as_str()).collect();
        assert_eq!(titles, vec!["Same Song", "Another", "Same Song"]);
    }

    #[tokio::test]
    async fn test_remote_failure_keeps_local_items() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503).set_body_string("down"))
            .mount(&server)
            .await;

        let folder = music_folder(&["a.mp3"]);
        let loader = LibraryLoader::new(Box::new(DirectoryIndex::new(folder.path())))
            .with_remote(Arc::new(catalog_for(&server)));

        let load = loader.load(MediaKind::Audio).await;

        assert_eq!(load.items.len(), 1);
        assert_eq!(load.remote_count, 0);
        assert!(load.remote_error.unwrap().contains("503"));
    }

    #[tokio::test]
    async fn test_permission_denied_skips_remote() {
        let remote = Arc::new(CountingCatalog::default());
        let loader = LibraryLoader::new(Box::new(DeniedIndex)).with_remote(remote.clone());

        let load = loader.load(MediaKind::Audio).await;

        assert!(load.permission_denied);
        assert!(load.items.is_empty());
        assert_eq!(remote.calls.load(std::sync::atomic::Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_index_failure_still_fetches_remote() {
        let remote = Arc::new(CountingCatalog::default());
        let loader = LibraryLoader::new(Box::new(BrokenIndex)).with_remote(remote.clone());

        let load = loader.load(MediaKind::Video).await;

        assert!(!load.permission_denied);
        assert_eq!(load.items.len(), 1);
        assert_eq!(load.items[0].kind, MediaKind::Video);
        assert_eq!(remote.calls.load(std::sync::atomic::Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_without_remote() {
        let folder = music_folder(&["b.flac", "a.mp3", "notes.txt"]);
        let loader = LibraryLoader::new(Box::new(DirectoryIndex::new(folder.path())));

        let load = loader.load(MediaKind::Audio).await;

        let titles: Vec<&str> = load.items.iter().map(|item| item.title.as_str()).collect();
        assert_eq!(titles, vec!["a", "b"]);
        assert_eq!(load.remote_count, 0);
        assert!(load.remote_error.is_none());
    }
}
