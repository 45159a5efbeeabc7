//! HTTP implementation of [`CompilerService`] against the local backend's
//! compile and toolchain-check endpoints.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{CompileArtifact, CompileRequest, CompilerError, CompilerService, ToolchainStatus};

/// Compiles can legitimately take a while on large documents; the backend
/// itself caps a single toolchain run at two minutes.
const COMPILE_TIMEOUT_SECS: u64 = 150;

#[derive(Debug, Serialize)]
struct CompileBody<'a> {
    content: &'a str,
    filename: &'a str,
    compiler: &'a str,
}

#[derive(Debug, Deserialize)]
struct CompileResponse {
    success: bool,
    pdf_url: Option<String>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct HealthResponse {
    installed: bool,
    compilers: Vec<String>,
}

#[derive(Clone)]
pub struct HttpCompilerService {
    client: Client,
    base_url: String,
}

impl HttpCompilerService {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(COMPILE_TIMEOUT_SECS))
                .build()
                .expect("Failed to build HTTP client"),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl CompilerService for HttpCompilerService {
    async fn compile(&self, request: &CompileRequest) -> Result<CompileArtifact, CompilerError> {
        let response = self
            .client
            .post(format!("{}/api/compile", self.base_url))
            .json(&CompileBody {
                content: &request.content,
                filename: &request.target,
                compiler: &request.engine,
            })
            .send()
            .await?;

        let status = response.status();
        // The backend answers compile failures with a 4xx carrying the
        // reason in the body, so decode before checking the status class.
        let body: CompileResponse = match response.json().await {
            Ok(body) => body,
            Err(_) if !status.is_success() => {
                return Err(CompilerError::Api {
                    status: status.as_u16(),
                    message: "compile request failed".to_string(),
                })
            }
            Err(e) => return Err(CompilerError::Transport(e)),
        };

        if body.success {
            match body.pdf_url {
                Some(pdf_url) => Ok(CompileArtifact { pdf_url }),
                None => Err(CompilerError::Api {
                    status: status.as_u16(),
                    message: "compile succeeded but no artifact was returned".to_string(),
                }),
            }
        } else {
            Err(CompilerError::Rejected(
                body.error
                    .unwrap_or_else(|| "compilation failed".to_string()),
            ))
        }
    }

    async fn health_check(&self) -> Result<ToolchainStatus, CompilerError> {
        let response = self
            .client
            .get(format!("{}/api/check-latex", self.base_url))
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(CompilerError::Api {
                status: status.as_u16(),
                message,
            });
        }
        let body: HealthResponse = response.json().await?;
        Ok(ToolchainStatus {
            installed: body.installed,
            engines: body.compilers,
        })
    }
}
