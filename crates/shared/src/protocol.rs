use serde::{Deserialize, Serialize};

use crate::domain::{BillId, BillStatus};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListBillsQuery {
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadReceiptQuery {
    pub email: String,
    pub filename: String,
    pub mime_type: String,
}

/// Where the file store put an uploaded receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredFile {
    pub file_url: String,
    pub key: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBillRequest {
    pub email: String,
    #[serde(rename = "type")]
    pub expense_type: String,
    pub name: String,
    pub amount: f64,
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vat: Option<String>,
    pub pct: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commentary: Option<String>,
    pub file_url: String,
    pub file_name: String,
    pub key: String,
    pub status: BillStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedBill {
    pub id: BillId,
    pub file_url: String,
    pub file_name: String,
    pub key: String,
}
