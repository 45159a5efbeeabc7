//! Compiler Service port — the collaborator that turns LaTeX source into a
//! PDF artifact. The editor never invokes the toolchain itself; it submits
//! content + target name + engine and gets back an artifact URL or a
//! human-readable failure reason, surfaced verbatim and never retried.

pub mod http;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Engine used when the view does not pick one explicitly.
pub const DEFAULT_ENGINE: &str = "pdflatex";

/// A compile request. `target` is the output filename stem; `engine` is the
/// toolchain backend identifier (pdflatex, xelatex, lualatex).
#[derive(Debug, Clone, Serialize)]
pub struct CompileRequest {
    pub content: String,
    pub target: String,
    pub engine: String,
}

/// A successful compile: an opaque artifact URL the viewer can fetch.
#[derive(Debug, Clone, Deserialize)]
pub struct CompileArtifact {
    pub pdf_url: String,
}

/// Toolchain availability, used to enable/disable engine choices in the view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolchainStatus {
    pub installed: bool,
    pub engines: Vec<String>,
}

#[derive(Debug, Error)]
pub enum CompilerError {
    /// The compiler ran and failed; the reason is shown to the user as-is.
    #[error("{0}")]
    Rejected(String),

    #[error("compiler service unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("compiler service error (status {status}): {message}")]
    Api { status: u16, message: String },
}

#[async_trait]
pub trait CompilerService: Send + Sync {
    async fn compile(&self, request: &CompileRequest) -> Result<CompileArtifact, CompilerError>;

    async fn health_check(&self) -> Result<ToolchainStatus, CompilerError>;
}
