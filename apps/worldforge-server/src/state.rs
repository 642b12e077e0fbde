//! Shared application state for the web server.

use std::sync::Arc;

use worldforge_assets::TemplateStore;
use worldforge_persist::WorldStore;

/// Application state shared between all handlers
pub struct AppState {
    /// The world store; also owned by the autosave thread.
    pub world: Arc<WorldStore>,
    /// Read-through structure template loader
    pub templates: TemplateStore,
}

impl AppState {
    pub fn new(world: Arc<WorldStore>, templates: TemplateStore) -> Self {
        Self { world, templates }
    }
}
