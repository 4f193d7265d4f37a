use std::sync::Arc;

use shared::{
    domain::{normalize_date, parse_date, BillStatus},
    protocol::{CreateBillRequest, CreatedBill, StoredFile},
};
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    routes::{Navigate, RoutePath},
    session::EmployeeSession,
    views::{markup::Element, new_bill_ui},
    BillStore, ClientError, FileStore, ReceiptUpload,
};

pub const ALLOWED_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

pub const EXPENSE_TYPES: [&str; 7] = [
    "Transports",
    "Restaurants et bars",
    "Hôtel et logement",
    "Services en ligne",
    "IT et électronique",
    "Equipement et matériel",
    "Fournitures de bureau",
];

/// True when the file name ends in one of [`ALLOWED_EXTENSIONS`], ignoring case.
pub fn is_extension_available(filename: &str) -> bool {
    let Some((_, extension)) = file_name_of(filename).rsplit_once('.') else {
        return false;
    };
    ALLOWED_EXTENSIONS
        .iter()
        .any(|allowed| extension.eq_ignore_ascii_case(allowed))
}

/// Last segment of a file input value such as `C:\fakepath\receipt.jpg`.
fn file_name_of(path: &str) -> &str {
    path.rsplit(['\\', '/']).next().unwrap_or(path)
}

/// File picked in the receipt input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub path: String,
    pub mime_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    pub fn new(path: impl Into<String>, mime_type: Option<String>, bytes: Vec<u8>) -> Self {
        Self {
            path: path.into(),
            mime_type,
            bytes,
        }
    }

    pub fn file_name(&self) -> &str {
        file_name_of(&self.path)
    }
}

/// Raw input values of the new-bill form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewBillForm {
    pub expense_type: String,
    pub name: String,
    pub date: String,
    pub amount: String,
    pub vat: String,
    pub pct: String,
    pub commentary: String,
    pub file: Option<SelectedFile>,
}

#[derive(Debug, Clone, PartialEq)]
struct ValidatedFields {
    expense_type: String,
    name: String,
    date: String,
    amount: f64,
    vat: Option<String>,
    pct: u32,
    commentary: Option<String>,
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

impl NewBillForm {
    /// Mirrors the form's native constraints; nothing is sent when this fails.
    fn validate(&self) -> Result<ValidatedFields, FormError> {
        let expense_type = non_empty(&self.expense_type).ok_or(FormError::MissingField("expense-type"))?;
        let date = non_empty(&self.date).ok_or(FormError::MissingField("datepicker"))?;
        let amount = non_empty(&self.amount).ok_or(FormError::MissingField("amount"))?;
        let pct = non_empty(&self.pct).ok_or(FormError::MissingField("pct"))?;
        if self.file.is_none() {
            return Err(FormError::MissingField("file"));
        }

        if !EXPENSE_TYPES.contains(&expense_type.as_str()) {
            return Err(FormError::UnknownExpenseType(expense_type));
        }
        if parse_date(&date).is_none() {
            return Err(FormError::InvalidDate(date));
        }
        let amount_value = amount
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite() && *value >= 0.0)
            .ok_or(FormError::InvalidAmount(amount))?;
        let pct_value = pct.parse::<u32>().map_err(|_| FormError::InvalidPct(pct))?;

        Ok(ValidatedFields {
            expense_type,
            name: self.name.trim().to_string(),
            date: normalize_date(&date),
            amount: amount_value,
            vat: non_empty(&self.vat),
            pct: pct_value,
            commentary: non_empty(&self.commentary),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("required field `{0}` is empty")]
    MissingField(&'static str),
    #[error("unknown expense type `{0}`")]
    UnknownExpenseType(String),
    #[error("invalid date `{0}`")]
    InvalidDate(String),
    #[error("invalid amount `{0}`")]
    InvalidAmount(String),
    #[error("invalid percentage `{0}`")]
    InvalidPct(String),
    #[error("receipt has not been uploaded")]
    MissingReceipt,
}

#[derive(Debug, Error)]
pub enum NewBillError {
    #[error(transparent)]
    Validation(#[from] FormError),
    #[error(transparent)]
    Client(#[from] ClientError),
}

/// Outcome of a receipt selection. `Rejected` is the falsy sentinel: the
/// input was cleared and nothing was uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileSelection {
    Rejected,
    Accepted(StoredFile),
}

impl FileSelection {
    pub fn is_accepted(&self) -> bool {
        matches!(self, FileSelection::Accepted(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct StoredReceipt {
    file_url: String,
    key: String,
    file_name: String,
}

pub struct NewBill {
    bill_store: Arc<dyn BillStore>,
    file_store: Arc<dyn FileStore>,
    session: EmployeeSession,
    navigate: Navigate,
    form: NewBillForm,
    receipt: Option<StoredReceipt>,
}

impl NewBill {
    pub fn new(
        bill_store: Arc<dyn BillStore>,
        file_store: Arc<dyn FileStore>,
        session: EmployeeSession,
        navigate: Navigate,
    ) -> Self {
        Self {
            bill_store,
            file_store,
            session,
            navigate,
            form: NewBillForm::default(),
            receipt: None,
        }
    }

    pub fn form(&self) -> &NewBillForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut NewBillForm {
        &mut self.form
    }

    /// Key of the uploaded receipt, once the file store accepted it.
    pub fn receipt_key(&self) -> Option<&str> {
        self.receipt.as_ref().map(|receipt| receipt.key.as_str())
    }

    pub fn render(&self) -> Element {
        new_bill_ui::render(&self.form)
    }

    pub async fn handle_change_file(
        &mut self,
        file: SelectedFile,
    ) -> Result<FileSelection, ClientError> {
        self.receipt = None;
        let file_name = file.file_name().to_string();
        if !is_extension_available(&file_name) {
            warn!(file_name = %file_name, "rejected receipt with unsupported extension");
            self.form.file = None;
            return Ok(FileSelection::Rejected);
        }

        let upload = ReceiptUpload {
            filename: file_name.clone(),
            mime_type: file.mime_type.clone(),
            bytes: file.bytes.clone(),
        };
        self.form.file = Some(file);

        let stored = match self.file_store.upload(&self.session.email, upload).await {
            Ok(stored) => stored,
            Err(err) => {
                warn!(file_name = %file_name, error = %err, "receipt upload failed");
                self.form.file = None;
                return Err(err);
            }
        };
        self.receipt = Some(StoredReceipt {
            file_url: stored.file_url.clone(),
            key: stored.key.clone(),
            file_name,
        });
        Ok(FileSelection::Accepted(stored))
    }

    /// Validates the form, creates the bill and returns to the bill list.
    /// Any failure leaves the user on the form.
    pub async fn handle_submit(&mut self) -> Result<CreatedBill, NewBillError> {
        let fields = self.form.validate()?;
        let receipt = self.receipt.clone().ok_or(FormError::MissingReceipt)?;

        let request = CreateBillRequest {
            email: self.session.email.clone(),
            expense_type: fields.expense_type,
            name: fields.name,
            amount: fields.amount,
            date: fields.date,
            vat: fields.vat,
            pct: fields.pct,
            commentary: fields.commentary,
            file_url: receipt.file_url,
            file_name: receipt.file_name,
            key: receipt.key,
            status: BillStatus::Pending,
        };

        let created = self.bill_store.create(request).await.map_err(|err| {
            warn!(error = %err, "bill creation failed");
            err
        })?;
        info!(bill_id = %created.id, "submitted new bill");
        (self.navigate)(RoutePath::Bills);
        Ok(created)
    }
}

#[cfg(test)]
#[path = "tests/new_bill_tests.rs"]
mod tests;
