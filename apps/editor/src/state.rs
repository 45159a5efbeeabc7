use std::sync::{Arc, Mutex};

use crate::cache::KvStore;
use crate::compiler::CompilerService;
use crate::config::Config;
use crate::resolver::session::SessionSlot;
use crate::store::DocumentStore;

/// Shared application state injected into all route handlers via Axum
/// extractors. The collaborators are ports so tests can swap in fakes; the
/// one piece of mutable state is the session slot behind a single lock.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub compiler: Arc<dyn CompilerService>,
    pub cache: Arc<dyn KvStore>,
    pub session: Arc<Mutex<SessionSlot>>,
    pub config: Config,
}
