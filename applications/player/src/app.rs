//! Host loop wiring a screen to stdin, session events, and the remote fetch

use crate::config::PlayerConfig;
use crate::error::Result;
use crate::focus::FocusArbiter;
use crate::screen::{Flow, Screen};
use crate::simulated::{runtime_now, SimulatedFactory};
use duet_core::{format_duration, MediaItem, MediaKind};
use duet_library::{fetch_from, DirectoryIndex, LibraryLoad, LibraryLoader, RealtimeDbCatalog};
use duet_playback::PlaybackController;
use std::future::pending;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::unbounded_channel;
use tokio::task::JoinHandle;
use tracing::{info, warn};

type RemoteTask = JoinHandle<std::result::Result<Vec<MediaItem>, String>>;

/// Build the loader for one kind from configuration
pub fn build_loader(config: &PlayerConfig, kind: MediaKind) -> Result<LibraryLoader> {
    let index = DirectoryIndex::new(config.media_dir(kind));
    let mut loader = LibraryLoader::new(Box::new(index));
    if let Some(remote) = config.remote_config() {
        loader = loader.with_remote(Arc::new(RealtimeDbCatalog::new(remote)?));
    }
    Ok(loader)
}

/// Run an interactive screen until `quit` or end of input
pub async fn run_screen(config: &PlayerConfig, kind: MediaKind) -> Result<()> {
    let loader = build_loader(config, kind)?;

    let (events_tx, mut events) = unbounded_channel();
    let arbiter = FocusArbiter::new();
    let controller = PlaybackController::new(
        &config.playback_config(),
        Box::new(SimulatedFactory::new(events_tx.clone(), config.simulated_duration())),
        Box::new(arbiter.client(events_tx)),
    )
    .with_clock(runtime_now);
    let mut screen = Screen::new(kind, controller, arbiter);

    info!(%kind, "Screen opened");
    let local = loader.load_local(kind);
    let denied = local.permission_denied;
    screen.load_local(local);
    flush(&mut screen);

    // No remote fetch without storage permission, matching a full load
    let mut remote_task: Option<RemoteTask> = match loader.remote() {
        Some(remote) if !denied => Some(tokio::spawn(async move {
            fetch_from(remote.as_ref(), kind).await
        })),
        _ => None,
    };

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let deadline = screen.next_tick_deadline();

        tokio::select! {
            line = lines.next_line() => match line? {
                Some(line) => {
                    if screen.dispatch_line(&line) == Flow::Quit {
                        break;
                    }
                }
                None => break,
            },
            Some(event) = events.recv() => screen.on_session_event(event),
            result = join_remote(&mut remote_task), if remote_task.is_some() => {
                remote_task = None;
                screen.on_remote(result);
            }
            () = sleep_until(deadline) => screen.on_tick(runtime_now()),
        }

        flush(&mut screen);
    }

    screen.teardown();
    if let Some(task) = remote_task {
        task.abort();
    }
    info!(%kind, "Screen closed");
    Ok(())
}

/// Load and print the merged library for each kind
pub async fn run_scan(config: &PlayerConfig, kinds: &[MediaKind]) -> Result<()> {
    for &kind in kinds {
        let loader = build_loader(config, kind)?;
        let load = loader.load(kind).await;
        for line in scan_report(kind, &load) {
            println!("{line}");
        }
    }
    Ok(())
}

/// Text report for one scanned library
pub fn scan_report(kind: MediaKind, load: &LibraryLoad) -> Vec<String> {
    let heading = match kind {
        MediaKind::Audio => "Music",
        MediaKind::Video => "Videos",
    };
    let mut lines = vec![format!(
        "{heading}: {} items ({} remote, {} local)",
        load.items.len(),
        load.remote_count,
        load.local_count
    )];

    if load.permission_denied {
        lines.push("  ! storage access refused; local media not listed".to_string());
    }
    if let Some(error) = &load.remote_error {
        lines.push(format!("  ! remote unavailable: {error}"));
    }

    for (index, item) in load.items.iter().enumerate() {
        let duration = item
            .duration
            .map(|duration| format!("  [{}]", format_duration(duration)))
            .unwrap_or_default();
        lines.push(format!("{:>4}. {}{duration}  {}", index + 1, item.title, item.locator));
    }
    lines
}

fn flush(screen: &mut Screen) {
    for line in screen.drain_output() {
        println!("{line}");
    }
}

async fn join_remote(task: &mut Option<RemoteTask>) -> std::result::Result<Vec<MediaItem>, String> {
    match task {
        Some(handle) => handle.await.unwrap_or_else(|e| {
            warn!(error = %e, "Remote fetch task failed");
            Err(e.to_string())
        }),
        None => pending().await,
    }
}

async fn sleep_until(deadline: Option<std::time::Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(tokio::time::Instant::from_std(deadline)).await,
        None => pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_scan_report_lists_diagnostics() {
        let load = LibraryLoad {
            items: vec![
                MediaItem::new("r", "Trailer", "https://cdn/t.mp4", MediaKind::Video)
                    .with_duration(Duration::from_secs(95)),
            ],
            local_count: 0,
            remote_count: 1,
            permission_denied: true,
            remote_error: None,
        };

        let lines = scan_report(MediaKind::Video, &load);
        assert_eq!(lines[0], "Videos: 1 items (1 remote, 0 local)");
        assert!(lines[1].contains("storage access refused"));
        assert_eq!(lines[2], "   1. Trailer  [01:35]  https://cdn/t.mp4");
    }

    #[test]
    fn test_build_loader_rejects_bad_remote() {
        let mut config = PlayerConfig::default();
        config.remote.enabled = true;
        config.remote.base_url = "not a url".to_string();
        assert!(build_loader(&config, MediaKind::Audio).is_err());
    }
}
