//! Typed view-models and the render functions that turn them into markup.

pub mod bills_ui;
pub mod format;
pub mod layout;
pub mod markup;
pub mod new_bill_ui;

pub use bills_ui::{BillRow, BillsPageState, BillsView, ReceiptModal};
pub use markup::{Element, Node};
