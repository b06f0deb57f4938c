use std::path::PathBuf;
use std::sync::Arc;

use crate::store::EntryStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<EntryStore>,
    /// Whether `X-Forwarded-For` is trusted for the logged client address.
    pub trust_proxy: bool,
    pub static_dir: PathBuf,
}
