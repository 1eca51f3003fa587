mod database;
mod deeplink;
mod engine;
mod models;
mod network;

pub use database::Database;
pub use deeplink::{translate_action, PlayerUriMapper};
pub use engine::{decide_refresh, CacheState, WallpaperEngine, COOLDOWN_WINDOW_MS};
pub use models::{
    DisplayMode, LifecycleEvent, RefreshDecision, ResolvedWallpaper, Settings, TargetClient,
    WallpaperCandidate, WallpaperType,
};
pub use network::{FetchError, HttpRemoteSource, RemoteSource, SourceConfig};


/// Install the default log subscriber for hosts that have none of their own:
/// info level when RUST_LOG is unset, so [RESOLVE]/[FETCH] lines are visible.
/// Later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init();
}
