use serde::{Deserialize, Serialize};

/// Lifecycle event delivered by the launcher host.
/// Created by the host, consumed once per resolution pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// Launcher entered (`is_idle = true`) or left idle mode.
    IdleModeChanged { is_idle: bool },
    /// Periodic rotation tick.
    TimeElapsed,
}

/// Outcome of the refresh decision for one incoming event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshDecision {
    /// Query the remote status endpoint now.
    FetchNow,
    /// Serve the last persisted wallpaper.
    UseCache,
    /// Return nothing (display is idle, must not change).
    Suppress,
}

/// One candidate record as returned by the status endpoint.
/// Exists only during a single resolution pass.
#[derive(Debug, Clone, Deserialize)]
pub struct WallpaperCandidate {
    #[serde(rename = "imageUrl")]
    pub image_uri: String,
    #[serde(rename = "actionUrl", default)]
    pub action_ref: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

/// Wallpaper media kind. The status endpoint currently only serves images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WallpaperType {
    Image,
    Video,
}

/// How the host should scale the image to the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DisplayMode {
    Crop,
    Fit,
    Stretch,
}

/// The unit handed back to the host for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedWallpaper {
    pub uri: String,
    #[serde(rename = "type")]
    pub kind: WallpaperType,
    pub display_mode: DisplayMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_uri: Option<String>,
}

/// Target application deep links are built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TargetClient {
    Stremio,
    Kodi,
    Plex,
    Emby,
    #[default]
    None,
}

impl TargetClient {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetClient::Stremio => "Stremio",
            TargetClient::Kodi => "Kodi",
            TargetClient::Plex => "Plex",
            TargetClient::Emby => "Emby",
            TargetClient::None => "None",
        }
    }

    /// Unknown strings map to None — a fresh install has nothing stored.
    pub fn from_str(s: &str) -> Self {
        match s {
            "Stremio" => TargetClient::Stremio,
            "Kodi" => TargetClient::Kodi,
            "Plex" => TargetClient::Plex,
            "Emby" => TargetClient::Emby,
            _ => TargetClient::None,
        }
    }
}

/// User settings read by the engine. Written only through the host's
/// settings surface (the `Database` setters), read-only during resolution.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub server_url: String,
    pub refresh_on_idle_exit: bool,
    pub target_client: TargetClient,
}
