use shared::domain::{Bill, BillId, BillStatus};
use tracing::warn;

use crate::routes::RoutePath;

use super::{
    format::{format_amount, format_date},
    layout::page,
    markup::Element,
};

pub const DEFAULT_MODAL_WIDTH: u32 = 800;

const COLUMNS: [&str; 6] = ["Type", "Nom", "Date", "Montant", "Statut", "Actions"];

#[derive(Debug, Clone, PartialEq)]
pub struct BillRow {
    pub id: BillId,
    pub expense_type: String,
    pub name: String,
    /// Normalized `YYYY-MM-DD` date, used for ordering.
    pub date: String,
    pub display_date: String,
    pub amount: f64,
    pub status: BillStatus,
    pub file_url: Option<String>,
    pub file_name: Option<String>,
}

impl BillRow {
    pub fn from_bill(bill: &Bill) -> Self {
        let display_date = format_date(&bill.date).unwrap_or_else(|| {
            warn!(bill_id = %bill.id, date = %bill.date, "bill date could not be formatted");
            bill.date.clone()
        });
        Self {
            id: bill.id.clone(),
            expense_type: bill.expense_type.clone(),
            name: bill.name.clone(),
            date: bill.normalized_date(),
            display_date,
            amount: bill.amount,
            status: bill.status,
            file_url: bill.file_url.clone(),
            file_name: bill.file_name.clone(),
        }
    }
}

/// Bills ready for display: most recent first, equal dates keep their
/// fetch order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BillsView {
    rows: Vec<BillRow>,
}

impl BillsView {
    pub fn new(bills: &[Bill]) -> Self {
        let mut rows: Vec<BillRow> = bills.iter().map(BillRow::from_bill).collect();
        rows.sort_by(|a, b| b.date.cmp(&a.date));
        Self { rows }
    }

    pub fn rows(&self) -> &[BillRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BillsPageState {
    Loading,
    Error(String),
    Loaded(BillsView),
}

/// Receipt preview opened from a row's eye icon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptModal {
    pub file_url: String,
    pub image_width: u32,
}

impl ReceiptModal {
    pub fn new(file_url: impl Into<String>, modal_width: u32) -> Self {
        Self {
            file_url: file_url.into(),
            image_width: modal_width / 2,
        }
    }
}

pub fn render(state: &BillsPageState, modal: Option<&ReceiptModal>) -> Element {
    match state {
        BillsPageState::Loading => page(RoutePath::Bills, loading_content()),
        BillsPageState::Error(message) => page(RoutePath::Bills, error_content(message)),
        BillsPageState::Loaded(view) => {
            let root = page(RoutePath::Bills, bills_content(view));
            match modal {
                Some(modal) => root.child(render_modal(modal)),
                None => root,
            }
        }
    }
}

fn loading_content() -> Element {
    Element::new("div")
        .id("loading")
        .class("content")
        .test_id("loading")
        .text("Loading...")
}

fn error_content(message: &str) -> Element {
    Element::new("div")
        .class("content")
        .child(
            Element::new("div")
                .id("layout-error1")
                .test_id("error-message")
                .text("Erreur"),
        )
        .child(Element::new("div").id("layout-error2").text(message))
}

fn bills_content(view: &BillsView) -> Element {
    let header = Element::new("div")
        .class("content-header")
        .child(
            Element::new("div")
                .class("content-title")
                .text("Mes notes de frais"),
        )
        .child(
            Element::new("button")
                .attr("type", "button")
                .id("btn-new-bill")
                .test_id("btn-new-bill")
                .attr("data-route", RoutePath::NewBill.as_str())
                .text("Nouvelle note de frais"),
        );

    let head = Element::new("thead").child(
        Element::new("tr").children(
            COLUMNS
                .iter()
                .map(|title| Element::new("th").text(*title)),
        ),
    );
    let body = Element::new("tbody")
        .test_id("tbody")
        .children(view.rows().iter().map(render_row));

    Element::new("div").class("content").child(header).child(
        Element::new("div")
            .id("data-table")
            .child(Element::new("table").id("example").child(head).child(body)),
    )
}

fn render_row(row: &BillRow) -> Element {
    let eye = Element::new("div")
        .id("eye")
        .test_id("icon-eye")
        .attr("data-bill-url", row.file_url.clone().unwrap_or_default())
        .attr("role", "button")
        .text("👁");

    Element::new("tr")
        .attr("data-bill-id", row.id.0.clone())
        .child(Element::new("td").text(row.expense_type.clone()))
        .child(Element::new("td").text(row.name.clone()))
        .child(
            Element::new("td").child(
                Element::new("time")
                    .attr("datetime", row.date.clone())
                    .text(row.display_date.clone()),
            ),
        )
        .child(Element::new("td").text(format_amount(row.amount)))
        .child(
            Element::new("td").child(
                Element::new("span")
                    .class("status-badge")
                    .attr("data-status", status_key(row.status))
                    .text(row.status.label()),
            ),
        )
        .child(
            Element::new("td").child(Element::new("div").class("icon-actions").child(eye)),
        )
}

fn status_key(status: BillStatus) -> &'static str {
    match status {
        BillStatus::Pending => "pending",
        BillStatus::Accepted => "accepted",
        BillStatus::Refused => "refused",
    }
}

fn render_modal(modal: &ReceiptModal) -> Element {
    let header = Element::new("div")
        .class("modal-header")
        .child(
            Element::new("h5")
                .class("modal-title")
                .id("exampleModalLongTitle")
                .text("Justificatif"),
        )
        .child(
            Element::new("button")
                .attr("type", "button")
                .class("close")
                .attr("data-dismiss", "modal")
                .attr("aria-label", "Close")
                .test_id("modal-close")
                .text("×"),
        );
    let body = Element::new("div").class("modal-body").child(
        Element::new("div").class("bill-proof-container").child(
            Element::new("img")
                .attr("width", modal.image_width.to_string())
                .attr("src", modal.file_url.clone())
                .attr("alt", "Bill"),
        ),
    );

    Element::new("div")
        .class("modal fade show")
        .id("modaleFile")
        .attr("tabindex", "-1")
        .attr("role", "dialog")
        .attr("aria-labelledby", "exampleModalCenterTitle")
        .test_id("modal-file")
        .child(
            Element::new("div")
                .class("modal-dialog modal-dialog-centered modal-lg")
                .attr("role", "document")
                .child(
                    Element::new("div")
                        .class("modal-content")
                        .child(header)
                        .child(body),
                ),
        )
}
