use crate::engine::{CacheState, WallpaperEngine};
use crate::network::RemoteSource;

impl<S: RemoteSource> WallpaperEngine<S> {
    /// Read the persisted cache fields.
    /// Store read failures degrade to the field defaults (empty cache);
    /// resolution never crashes on a broken preference store.
    pub(crate) fn load_cache(&self) -> CacheState {
        CacheState {
            last_uri: self.prefs.last_wallpaper_uri(),
            last_author: self.prefs.last_wallpaper_author(),
            last_action_uri: self.prefs.last_action_uri(),
            last_update_ms: self.prefs.last_update_ms(),
        }
    }

    /// Persist a fresh cache entry.
    /// GUARD: `last_update_ms` is monotonic — a write that would move the
    /// timestamp backwards is refused, even if the host hands in a stale
    /// clock reading.
    pub(crate) fn store_cache(&self, next: &CacheState) -> Result<(), String> {
        let current_ms = self.prefs.last_update_ms();
        if next.last_update_ms < current_ms {
            return Err(format!(
                "stale cache write refused (incoming {} < stored {})",
                next.last_update_ms, current_ms
            ));
        }
        self.prefs
            .save_last_wallpaper(
                &next.last_uri,
                &next.last_author,
                &next.last_action_uri,
                next.last_update_ms,
            )
            .map_err(|e| format!("Failed to save wallpaper cache: {}", e))
    }
}
