use crate::services::MediaProvider;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn MediaProvider>,
    /// Directory uploaded files are staged in before forwarding.
    pub staging_dir: PathBuf,
}

impl AppState {
    pub fn new(provider: Arc<dyn MediaProvider>, staging_dir: PathBuf) -> Self {
        Self {
            provider,
            staging_dir,
        }
    }
}
