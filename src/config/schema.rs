use serde::Deserialize;

/// Top-level application settings.
///
/// Read from `$XDG_CONFIG_HOME/fermata/config.toml` (TOML), with
/// `FERMATA__`-prefixed environment variables layered on top and struct
/// defaults underneath; see `Settings::load`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub library: LibrarySettings,
    pub audio: AudioSettings,
    pub controls: ControlsSettings,
    pub ui: UiSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// Root folder scanned at startup. The first CLI argument overrides it.
    pub root: String,
    /// File extension to treat as audio (without dot). The scan matches the
    /// suffix case-sensitively.
    pub extension: String,
    /// Follow symlinks while scanning.
    pub follow_links: bool,
    /// Descend into subdirectories.
    pub recursive: bool,
    /// Cap on recursion depth, unlimited when unset.
    pub max_depth: Option<usize>,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            root: "Music".to_string(),
            extension: "mp3".to_string(),
            follow_links: true,
            recursive: true,
            max_depth: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Volume applied at startup, in `[0.0, 1.0]`.
    pub initial_volume: f32,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            initial_volume: 0.5,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ControlsSettings {
    /// Number of seconds to seek when pressing `H` / `L`.
    pub seek_seconds: u64,
    /// Volume change applied per `+` / `-` press.
    pub volume_step: f32,
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self {
            seek_seconds: 10,
            volume_step: 0.05,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top header box.
    pub header_text: String,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " ~ fermata: hold that note ~ ".to_string(),
        }
    }
}
