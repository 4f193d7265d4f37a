use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use shared::{
    domain::{Bill, BillId, BillStatus},
    protocol::{CreateBillRequest, CreatedBill, StoredFile},
};

use crate::{BillStore, ClientError, FileStore, Navigate, ReceiptUpload, RoutePath};

pub fn bill(id: &str, date: &str, name: &str) -> Bill {
    Bill {
        id: BillId(id.to_string()),
        email: "a@a".to_string(),
        expense_type: "Hôtel et logement".to_string(),
        name: name.to_string(),
        amount: 400.0,
        date: date.to_string(),
        status: BillStatus::Pending,
        file_url: Some(format!("https://test.storage.tld/{id}.jpg")),
        file_name: Some(format!("{id}.jpg")),
        pct: Some(20),
        vat: Some("80".to_string()),
        commentary: None,
        comment_admin: None,
    }
}

/// Four bills in an order that is neither ascending nor descending.
pub fn sample_bills() -> Vec<Bill> {
    let mut accepted = bill("UIUZtnPQvnbFnB0ozvJh", "2003-03-03", "test3");
    accepted.status = BillStatus::Accepted;
    let mut refused = bill("qcCK3SzECmaZAGRrHjaC", "2002-02-02", "test2");
    refused.status = BillStatus::Refused;
    vec![
        refused,
        bill("47qAXb6fIm2zOKkLzMro", "2004-04-04", "encore"),
        bill("BeKy5Mo4jkmdfPGYpTxZ", "2001-01-01", "test1"),
        accepted,
    ]
}

#[derive(Default)]
pub struct Calls {
    pub list: Vec<String>,
    pub uploads: Vec<(String, ReceiptUpload)>,
    pub created: Vec<CreateBillRequest>,
}

/// In-memory bills API that records every call.
pub struct RecordingStore {
    bills: Vec<Bill>,
    list_failure: Option<u16>,
    upload_failure: Option<u16>,
    create_failure: Option<u16>,
    pub calls: Mutex<Calls>,
}

impl RecordingStore {
    pub fn with_bills(bills: Vec<Bill>) -> Arc<Self> {
        Arc::new(Self {
            bills,
            list_failure: None,
            upload_failure: None,
            create_failure: None,
            calls: Mutex::new(Calls::default()),
        })
    }

    pub fn failing_list(status: u16) -> Arc<Self> {
        Arc::new(Self {
            list_failure: Some(status),
            ..Self::empty()
        })
    }

    pub fn failing_upload(status: u16) -> Arc<Self> {
        Arc::new(Self {
            upload_failure: Some(status),
            ..Self::empty()
        })
    }

    pub fn failing_create(status: u16) -> Arc<Self> {
        Arc::new(Self {
            create_failure: Some(status),
            ..Self::empty()
        })
    }

    fn empty() -> Self {
        Self {
            bills: Vec::new(),
            list_failure: None,
            upload_failure: None,
            create_failure: None,
            calls: Mutex::new(Calls::default()),
        }
    }

    pub fn upload_count(&self) -> usize {
        self.calls.lock().expect("calls").uploads.len()
    }

    pub fn create_count(&self) -> usize {
        self.calls.lock().expect("calls").created.len()
    }
}

#[async_trait]
impl BillStore for RecordingStore {
    async fn list(&self, email: &str) -> Result<Vec<Bill>, ClientError> {
        self.calls.lock().expect("calls").list.push(email.to_string());
        match self.list_failure {
            Some(status) => Err(ClientError::status(status)),
            None => Ok(self.bills.clone()),
        }
    }

    async fn create(&self, request: CreateBillRequest) -> Result<CreatedBill, ClientError> {
        self.calls
            .lock()
            .expect("calls")
            .created
            .push(request.clone());
        if let Some(status) = self.create_failure {
            return Err(ClientError::status(status));
        }
        Ok(CreatedBill {
            id: BillId(request.key.clone()),
            file_url: request.file_url,
            file_name: request.file_name,
            key: request.key,
        })
    }
}

#[async_trait]
impl FileStore for RecordingStore {
    async fn upload(&self, email: &str, receipt: ReceiptUpload) -> Result<StoredFile, ClientError> {
        let filename = receipt.filename.clone();
        self.calls
            .lock()
            .expect("calls")
            .uploads
            .push((email.to_string(), receipt));
        if let Some(status) = self.upload_failure {
            return Err(ClientError::status(status));
        }
        Ok(StoredFile {
            file_url: format!("https://localhost:3456/images/{filename}"),
            key: "1234".to_string(),
        })
    }
}

pub fn recording_navigator() -> (Navigate, Arc<Mutex<Vec<RoutePath>>>) {
    let visited = Arc::new(Mutex::new(Vec::new()));
    let sink = visited.clone();
    let navigate: Navigate = Arc::new(move |route| {
        sink.lock().expect("routes").push(route);
    });
    (navigate, visited)
}
