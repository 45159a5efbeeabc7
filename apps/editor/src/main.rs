mod cache;
mod compiler;
mod config;
mod errors;
mod resolver;
mod routes;
mod state;
mod store;

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cache::FileKvStore;
use crate::compiler::http::HttpCompilerService;
use crate::compiler::CompilerService;
use crate::config::Config;
use crate::resolver::session::SessionSlot;
use crate::resolver::startup::resolve_startup;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::http::HttpDocumentStore;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting LaTeX editor core v{}", env!("CARGO_PKG_VERSION"));

    // Collaborators: document store and compiler service live behind the
    // backend; the draft cache is a local file.
    let store = Arc::new(HttpDocumentStore::new(config.backend_url.clone()));
    let compiler = Arc::new(HttpCompilerService::new(config.backend_url.clone()));
    let cache = Arc::new(FileKvStore::open(config.cache_path.clone()));
    info!("Collaborator clients initialized ({})", config.backend_url);

    // Toolchain status is informational at startup; the view re-checks.
    match compiler.health_check().await {
        Ok(status) if status.installed => {
            info!("LaTeX toolchain available: {}", status.engines.join(", "))
        }
        Ok(_) => info!("No LaTeX toolchain found on the backend host"),
        Err(e) => info!("Toolchain check failed ({e}), continuing"),
    }

    // Resolve the startup document before serving so the first session
    // read never races resolution.
    let session = resolve_startup(store.as_ref(), cache.as_ref()).await;
    info!(
        "Editor session ready: '{}' ({})",
        session.display_name,
        session.provenance.as_str()
    );

    let state = AppState {
        store,
        compiler,
        cache,
        session: Arc::new(Mutex::new(SessionSlot::with_session(session))),
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // local-only service behind the desktop shell

    let addr: SocketAddr = format!("127.0.0.1:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
