use std::path::PathBuf;
use std::sync::Arc;

use weft_watch::ReloadHub;

/// Shared application state.
pub struct AppState {
    /// Live reload hub, present only when live reload is enabled.
    pub hub: Option<Arc<ReloadHub>>,
    /// Directory served under `/static/`.
    pub public_dir: PathBuf,
    /// Enable verbose output.
    pub verbose: bool,
}

impl AppState {
    /// Whether live reload is active for this server.
    #[must_use]
    pub fn live_reload_enabled(&self) -> bool {
        self.hub.is_some()
    }
}
