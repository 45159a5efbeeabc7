//! HTTP implementation of [`DocumentStore`] against the local backend
//! service that owns the LaTeX folders.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{
    DocumentKind, DocumentListing, DocumentStore, SaveReceipt, StoreError, TexFileEntry,
};

const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Deserialize)]
struct ContentBody {
    content: Option<String>,
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct SaveBody<'a> {
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct OpenBody<'a> {
    filename: &'a str,
    #[serde(rename = "type")]
    kind: &'a str,
}

#[derive(Debug, Deserialize)]
struct AckBody {
    success: bool,
    error: Option<String>,
    filename: Option<String>,
}

#[derive(Clone)]
pub struct HttpDocumentStore {
    client: Client,
    base_url: String,
}

impl HttpDocumentStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .expect("Failed to build HTTP client"),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Reads a `{content}` / `{error}` body, mapping 404 and absent content
    /// to [`StoreError::NotFound`].
    async fn read_content(
        &self,
        response: reqwest::Response,
        what: String,
    ) -> Result<String, StoreError> {
        let status = response.status();
        if status.as_u16() == 404 {
            return Err(StoreError::NotFound(what));
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(StoreError::Api {
                status: status.as_u16(),
                message,
            });
        }
        let body: ContentBody = response.json().await?;
        match body.content {
            Some(content) => Ok(content),
            None => Err(StoreError::NotFound(body.error.unwrap_or(what))),
        }
    }
}

#[async_trait]
impl DocumentStore for HttpDocumentStore {
    async fn fetch_by_name(&self, kind: DocumentKind, filename: &str) -> Result<String, StoreError> {
        let response = self
            .client
            .get(self.url(&format!("/api/{}/{}", kind.as_segment(), filename)))
            .send()
            .await?;
        self.read_content(response, format!("{} '{filename}'", kind.as_segment()))
            .await
    }

    async fn fetch_by_path(&self, path: &str) -> Result<String, StoreError> {
        let response = self
            .client
            .get(self.url("/api/file"))
            .query(&[("path", path)])
            .send()
            .await?;
        self.read_content(response, format!("file '{path}'")).await
    }

    async fn list(&self, kind: DocumentKind) -> Result<Vec<DocumentListing>, StoreError> {
        let response = self
            .client
            .get(self.url(&format!("/api/{}", kind.as_segment())))
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(StoreError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response.json().await?)
    }

    async fn list_files_recursive(&self) -> Result<Vec<TexFileEntry>, StoreError> {
        let response = self
            .client
            .get(self.url("/api/browse-tex-files"))
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(StoreError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response.json().await?)
    }

    async fn save(
        &self,
        kind: DocumentKind,
        filename: &str,
        content: &str,
    ) -> Result<SaveReceipt, StoreError> {
        let response = self
            .client
            .post(self.url(&format!("/api/{}/{}", kind.as_segment(), filename)))
            .json(&SaveBody { content })
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(StoreError::Api {
                status: status.as_u16(),
                message,
            });
        }
        let ack: AckBody = response.json().await?;
        if !ack.success {
            return Err(StoreError::Api {
                status: status.as_u16(),
                message: ack.error.unwrap_or_else(|| "save rejected".to_string()),
            });
        }
        Ok(SaveReceipt {
            filename: ack.filename.unwrap_or_else(|| filename.to_string()),
        })
    }

    async fn open_in_external_editor(
        &self,
        kind: DocumentKind,
        filename: &str,
    ) -> Result<(), StoreError> {
        let response = self
            .client
            .post(self.url("/api/open-in-editor"))
            .json(&OpenBody {
                filename,
                kind: match kind {
                    DocumentKind::Template => "template",
                    DocumentKind::Resume => "resume",
                    DocumentKind::CoverLetter => "cover-letter",
                },
            })
            .send()
            .await?;
        let status = response.status();
        if status.as_u16() == 404 {
            return Err(StoreError::NotFound(format!("file '{filename}'")));
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(StoreError::Api {
                status: status.as_u16(),
                message,
            });
        }
        let ack: AckBody = response.json().await?;
        if !ack.success {
            return Err(StoreError::Api {
                status: status.as_u16(),
                message: ack
                    .error
                    .unwrap_or_else(|| "could not open external editor".to_string()),
            });
        }
        Ok(())
    }
}
