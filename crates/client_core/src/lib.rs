use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use shared::{
    domain::Bill,
    error::ApiError,
    protocol::{CreateBillRequest, CreatedBill, ListBillsQuery, StoredFile, UploadReceiptQuery},
};
use thiserror::Error;
use tracing::{info, warn};

pub mod bills;
pub mod new_bill;
pub mod routes;
pub mod session;
pub mod views;

pub use bills::Bills;
pub use new_bill::{
    is_extension_available, FileSelection, FormError, NewBill, NewBillError, NewBillForm,
    SelectedFile,
};
pub use routes::{Navigate, RoutePath};
pub use session::{
    EmployeeSession, FileSessionStore, InMemorySessionStore, SessionError, SessionStore,
};

#[derive(Debug, Error)]
pub enum ClientError {
    /// Non-2xx answer from the API. Displays as `Erreur {status}` so views
    /// can show it verbatim.
    #[error("Erreur {status}")]
    Status {
        status: u16,
        detail: Option<ApiError>,
    },
    #[error("Erreur réseau: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("Réponse invalide: {0}")]
    Decode(#[source] reqwest::Error),
}

impl ClientError {
    pub fn status(status: u16) -> Self {
        Self::Status {
            status,
            detail: None,
        }
    }
}

/// Receipt bytes as sent to the file store.
#[derive(Debug, Clone)]
pub struct ReceiptUpload {
    pub filename: String,
    pub mime_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[async_trait]
pub trait BillStore: Send + Sync {
    /// Bills belonging to `email`, in server order.
    async fn list(&self, email: &str) -> Result<Vec<Bill>, ClientError>;
    async fn create(&self, request: CreateBillRequest) -> Result<CreatedBill, ClientError>;
}

#[async_trait]
pub trait FileStore: Send + Sync {
    async fn upload(&self, email: &str, receipt: ReceiptUpload) -> Result<StoredFile, ClientError>;
}

pub struct HttpBillsClient {
    http: Client,
    api_url: String,
    bearer_token: Option<String>,
}

impl HttpBillsClient {
    pub fn new(api_url: impl Into<String>) -> Self {
        let api_url = api_url.into().trim_end_matches('/').to_string();
        Self {
            http: Client::new(),
            api_url,
            bearer_token: None,
        }
    }

    pub fn with_bearer_token(mut self, token: Option<String>) -> Self {
        self.bearer_token = token;
        self
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.bearer_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

async fn check_status(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let detail = serde_json::from_str::<ApiError>(&body).ok();
    match &detail {
        Some(detail) => warn!(status = status.as_u16(), %detail, "bills api request failed"),
        None => warn!(status = status.as_u16(), "bills api request failed"),
    }
    Err(ClientError::Status {
        status: status.as_u16(),
        detail,
    })
}

#[async_trait]
impl BillStore for HttpBillsClient {
    async fn list(&self, email: &str) -> Result<Vec<Bill>, ClientError> {
        let response = self
            .authorized(self.http.get(format!("{}/bills", self.api_url)))
            .query(&ListBillsQuery {
                email: email.to_string(),
            })
            .send()
            .await
            .map_err(ClientError::Transport)?;
        let bills: Vec<Bill> = check_status(response)
            .await?
            .json()
            .await
            .map_err(ClientError::Decode)?;

        info!(count = bills.len(), "fetched bills");
        Ok(bills)
    }

    async fn create(&self, request: CreateBillRequest) -> Result<CreatedBill, ClientError> {
        let response = self
            .authorized(self.http.post(format!("{}/bills", self.api_url)))
            .json(&request)
            .send()
            .await
            .map_err(ClientError::Transport)?;
        let created: CreatedBill = check_status(response)
            .await?
            .json()
            .await
            .map_err(ClientError::Decode)?;

        info!(bill_id = %created.id, "created bill");
        Ok(created)
    }
}

#[async_trait]
impl FileStore for HttpBillsClient {
    async fn upload(&self, email: &str, receipt: ReceiptUpload) -> Result<StoredFile, ClientError> {
        let response = self
            .authorized(self.http.post(format!("{}/files", self.api_url)))
            .query(&UploadReceiptQuery {
                email: email.to_string(),
                filename: receipt.filename.clone(),
                mime_type: receipt
                    .mime_type
                    .clone()
                    .unwrap_or_else(|| "application/octet-stream".to_string()),
            })
            .body(receipt.bytes)
            .send()
            .await
            .map_err(ClientError::Transport)?;
        let stored: StoredFile = check_status(response)
            .await?
            .json()
            .await
            .map_err(ClientError::Decode)?;

        info!(filename = %receipt.filename, key = %stored.key, "uploaded receipt");
        Ok(stored)
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;

#[cfg(test)]
#[path = "tests/support.rs"]
pub(crate) mod test_support;
