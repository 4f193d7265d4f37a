use std::sync::Arc;

use shared::domain::Bill;
use tracing::{info, warn};

use crate::{
    routes::{Navigate, RoutePath},
    session::EmployeeSession,
    views::{
        bills_ui::{self, DEFAULT_MODAL_WIDTH},
        markup::Element,
        BillsPageState, BillsView, ReceiptModal,
    },
    BillStore, ClientError,
};

/// Controller behind the employee's bill list.
pub struct Bills {
    store: Arc<dyn BillStore>,
    session: EmployeeSession,
    navigate: Navigate,
    modal_width: u32,
    modal: Option<ReceiptModal>,
}

impl Bills {
    pub fn new(store: Arc<dyn BillStore>, session: EmployeeSession, navigate: Navigate) -> Self {
        Self {
            store,
            session,
            navigate,
            modal_width: DEFAULT_MODAL_WIDTH,
            modal: None,
        }
    }

    pub fn with_modal_width(mut self, modal_width: u32) -> Self {
        self.modal_width = modal_width;
        self
    }

    /// What the page shows until `load` resolves.
    pub fn initial_state() -> BillsPageState {
        BillsPageState::Loading
    }

    pub async fn get_bills(&self) -> Result<Vec<Bill>, ClientError> {
        self.store.list(&self.session.email).await
    }

    /// Fetches the bills; a failed fetch becomes the error page with the
    /// failure message as-is.
    pub async fn load(&self) -> BillsPageState {
        match self.get_bills().await {
            Ok(bills) => {
                info!(email = %self.session.email, count = bills.len(), "loaded bills page");
                BillsPageState::Loaded(BillsView::new(&bills))
            }
            Err(err) => {
                warn!(email = %self.session.email, error = %err, "failed to load bills");
                BillsPageState::Error(err.to_string())
            }
        }
    }

    pub fn handle_click_new_bill(&self) {
        (self.navigate)(RoutePath::NewBill);
    }

    pub fn handle_click_icon_eye(&mut self, bill_url: &str) -> &ReceiptModal {
        self.modal
            .insert(ReceiptModal::new(bill_url, self.modal_width))
    }

    pub fn close_modal(&mut self) {
        self.modal = None;
    }

    pub fn modal(&self) -> Option<&ReceiptModal> {
        self.modal.as_ref()
    }

    pub fn render(&self, state: &BillsPageState) -> Element {
        bills_ui::render(state, self.modal.as_ref())
    }
}

#[cfg(test)]
#[path = "tests/bills_tests.rs"]
mod tests;
