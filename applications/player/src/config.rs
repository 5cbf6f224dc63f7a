/// Player configuration
use crate::error::{PlayerError, Result};
use duet_library::RemoteConfig;
use duet_playback::PlaybackConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Log filter used when neither `RUST_LOG` nor the config sets one
pub const DEFAULT_LOG_FILTER: &str = "duet_player=info,duet_playback=info,duet_library=info";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlayerConfig {
    #[serde(default = "default_library")]
    pub library: LibrarySettings,

    #[serde(default = "default_remote")]
    pub remote: RemoteSettings,

    #[serde(default = "default_playback")]
    pub playback: PlaybackSettings,

    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LibrarySettings {
    #[serde(default = "default_music_dir")]
    pub music_dir: PathBuf,

    #[serde(default = "default_video_dir")]
    pub video_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RemoteSettings {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default)]
    pub base_url: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlaybackSettings {
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    #[serde(default = "default_duck_volume")]
    pub duck_volume: f32,

    #[serde(default = "default_full_volume")]
    pub full_volume: f32,

    /// Length given to items whose source reports no duration
    #[serde(default = "default_simulated_duration_secs")]
    pub simulated_duration_secs: u64,

    #[serde(default)]
    pub loop_enabled: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LoggingSettings {
    /// `EnvFilter` directives; `RUST_LOG` wins when set
    #[serde(default)]
    pub filter: Option<String>,
}

impl PlayerConfig {
    /// Load configuration from file and environment
    ///
    /// An explicit path must exist. Without one, `duet.toml` in the working
    /// directory is used when present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path).required(true));
            }
            None => {
                let config_path = PathBuf::from("duet.toml");
                if config_path.exists() {
                    settings = settings.add_source(config::File::from(config_path));
                }
            }
        }

        // Override with environment variables, e.g. DUET_REMOTE__BASE_URL
        settings = settings.add_source(
            config::Environment::with_prefix("DUET")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        Ok(settings.build()?.try_deserialize()?)
    }

    /// Parse configuration from TOML text alone
    pub fn from_toml(text: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from_str(text, config::FileFormat::Toml))
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.playback.tick_interval_ms == 0 {
            return Err(PlayerError::Config(
                "playback.tick_interval_ms must be greater than zero".to_string(),
            ));
        }

        for (name, volume) in [
            ("playback.duck_volume", self.playback.duck_volume),
            ("playback.full_volume", self.playback.full_volume),
        ] {
            if !(0.0..=1.0).contains(&volume) {
                return Err(PlayerError::Config(format!(
                    "{name} must be between 0.0 and 1.0, got {volume}"
                )));
            }
        }

        if self.remote.enabled {
            let url = self.remote.base_url.trim();
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(PlayerError::Config(format!(
                    "remote.base_url must start with http:// or https://, got {url:?}"
                )));
            }
        }

        Ok(())
    }

    /// Folder the local index walks for `kind`
    pub fn media_dir(&self, kind: duet_core::MediaKind) -> &Path {
        match kind {
            duet_core::MediaKind::Audio => &self.library.music_dir,
            duet_core::MediaKind::Video => &self.library.video_dir,
        }
    }

    /// Controller settings
    pub fn playback_config(&self) -> PlaybackConfig {
        PlaybackConfig {
            tick_interval_ms: self.playback.tick_interval_ms,
            duck_volume: self.playback.duck_volume,
            full_volume: self.playback.full_volume,
            loop_enabled: self.playback.loop_enabled,
        }
    }

    /// Remote catalog settings, or `None` when the remote is switched off
    pub fn remote_config(&self) -> Option<RemoteConfig> {
        self.remote.enabled.then(|| {
            RemoteConfig::new(self.remote.base_url.clone())
                .with_timeout(Duration::from_secs(self.remote.timeout_secs))
        })
    }

    /// Length for items without a reported duration
    pub fn simulated_duration(&self) -> Duration {
        Duration::from_secs(self.playback.simulated_duration_secs)
    }

    /// Log filter directives
    pub fn log_filter(&self) -> &str {
        self.logging.filter.as_deref().unwrap_or(DEFAULT_LOG_FILTER)
    }
}

// Default values
fn default_library() -> LibrarySettings {
    LibrarySettings {
        music_dir: default_music_dir(),
        video_dir: default_video_dir(),
    }
}

fn default_music_dir() -> PathBuf {
    PathBuf::from("./media/music")
}

fn default_video_dir() -> PathBuf {
    PathBuf::from("./media/video")
}

fn default_remote() -> RemoteSettings {
    RemoteSettings {
        enabled: false,
        base_url: String::new(),
        timeout_secs: default_timeout_secs(),
    }
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_playback() -> PlaybackSettings {
    PlaybackSettings {
        tick_interval_ms: default_tick_interval_ms(),
        duck_volume: default_duck_volume(),
        full_volume: default_full_volume(),
        simulated_duration_secs: default_simulated_duration_secs(),
        loop_enabled: false,
    }
}

fn default_tick_interval_ms() -> u64 {
    1000
}

fn default_duck_volume() -> f32 {
    0.3
}

fn default_full_volume() -> f32 {
    1.0
}

fn default_simulated_duration_secs() -> u64 {
    180
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            library: default_library(),
            remote: default_remote(),
            playback: default_playback(),
            logging: LoggingSettings::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = PlayerConfig::from_toml("").unwrap();
        assert_eq!(config.playback.tick_interval_ms, 1000);
        assert_eq!(config.playback.duck_volume, 0.3);
        assert_eq!(config.playback.full_volume, 1.0);
        assert!(!config.remote.enabled);
        assert!(config.remote_config().is_none());
        assert_eq!(config.log_filter(), DEFAULT_LOG_FILTER);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_toml_sections() {
        let config = PlayerConfig::from_toml(
            r#"
            [library]
            music_dir = "/srv/music"

            [remote]
            enabled = true
            base_url = "https://db.example.com"
            timeout_secs = 3

            [playback]
            tick_interval_ms = 250
            duck_volume = 0.1

            [logging]
            filter = "duet_playback=debug"
            "#,
        )
        .unwrap();

        assert_eq!(config.media_dir(duet_core::MediaKind::Audio), Path::new("/srv/music"));
        assert_eq!(config.media_dir(duet_core::MediaKind::Video), Path::new("./media/video"));
        assert_eq!(config.playback_config().tick_interval(), Duration::from_millis(250));
        assert_eq!(config.log_filter(), "duet_playback=debug");

        let remote = config.remote_config().unwrap();
        assert_eq!(remote.base_url, "https://db.example.com");
        assert_eq!(remote.timeout, Duration::from_secs(3));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_tick() {
        let mut config = PlayerConfig::default();
        config.playback.tick_interval_ms = 0;
        assert!(matches!(config.validate(), Err(PlayerError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_volume_out_of_range() {
        let mut config = PlayerConfig::default();
        config.playback.duck_volume = 1.5;
        assert!(config.validate().is_err());

        let mut config = PlayerConfig::default();
        config.playback.full_volume = -0.1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_checks_remote_url_only_when_enabled() {
        let mut config = PlayerConfig::default();
        config.remote.base_url = "ftp://nope".to_string();
        assert!(config.validate().is_ok());

        config.remote.enabled = true;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let result = PlayerConfig::load(Some(&dir.path().join("absent.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("duet.toml");
        std::fs::write(&path, "[playback]\nsimulated_duration_secs = 42\n").unwrap();

        let config = PlayerConfig::load(Some(&path)).unwrap();
        assert_eq!(config.simulated_duration(), Duration::from_secs(42));
    }
}
