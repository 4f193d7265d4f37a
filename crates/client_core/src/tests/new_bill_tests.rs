use super::*;

use crate::test_support::{recording_navigator, RecordingStore};

fn controller(store: Arc<RecordingStore>) -> (NewBill, Arc<std::sync::Mutex<Vec<RoutePath>>>) {
    let (navigate, visited) = recording_navigator();
    let controller = NewBill::new(
        store.clone(),
        store,
        EmployeeSession::new("e@e"),
        navigate,
    );
    (controller, visited)
}

fn jpg() -> SelectedFile {
    SelectedFile::new(
        "C:\\fakepath\\goodExtension.jpg",
        Some("image/jpeg".to_string()),
        b"goodExtension".to_vec(),
    )
}

fn fill_valid_fields(form: &mut NewBillForm) {
    form.expense_type = "Transports".to_string();
    form.name = "testId".to_string();
    form.date = "2022-06-13".to_string();
    form.amount = "25".to_string();
    form.vat = "5".to_string();
    form.pct = "20".to_string();
    form.commentary = "client meeting".to_string();
}

#[test]
fn accepts_jpg_jpeg_and_png_in_any_case() {
    for name in ["x.jpg", "x.jpeg", "x.png", "X.JPG", "scan.Png", "C:\\fakepath\\a.b.jpeg"] {
        assert!(is_extension_available(name), "{name}");
    }
}

#[test]
fn rejects_other_or_missing_extensions() {
    for name in ["x.svg", "x", "x.pdf", "x.jpg.exe", "jpg", "dir.png/file"] {
        assert!(!is_extension_available(name), "{name}");
    }
}

#[test]
fn file_name_drops_browser_fake_path() {
    assert_eq!(jpg().file_name(), "goodExtension.jpg");
    let unix = SelectedFile::new("/tmp/receipts/ticket.png", None, Vec::new());
    assert_eq!(unix.file_name(), "ticket.png");
}

#[tokio::test]
async fn bad_extension_clears_input_without_uploading() {
    let store = RecordingStore::with_bills(Vec::new());
    let (mut new_bill, _) = controller(store.clone());

    let selection = new_bill
        .handle_change_file(SelectedFile::new(
            "badExtension.svg",
            Some("image/svg".to_string()),
            b"badExtension".to_vec(),
        ))
        .await
        .expect("selection");

    assert_eq!(selection, FileSelection::Rejected);
    assert!(!selection.is_accepted());
    assert!(new_bill.form().file.is_none());
    assert_eq!(store.upload_count(), 0);
    let input = new_bill.render();
    let file_input = input.find_by_test_id("file").expect("file input");
    assert_eq!(file_input.get_attr("value"), Some(""));
}

#[tokio::test]
async fn good_extension_uploads_raw_bytes_and_keeps_stored_key() {
    let store = RecordingStore::with_bills(Vec::new());
    let (mut new_bill, _) = controller(store.clone());

    let selection = new_bill.handle_change_file(jpg()).await.expect("selection");

    assert!(selection.is_accepted());
    assert_eq!(new_bill.receipt_key(), Some("1234"));
    let calls = store.calls.lock().expect("calls");
    let (email, upload) = &calls.uploads[0];
    assert_eq!(email, "e@e");
    assert_eq!(upload.filename, "goodExtension.jpg");
    assert_eq!(upload.bytes, b"goodExtension".to_vec());
}

#[tokio::test]
async fn upload_failure_propagates_and_leaves_no_receipt() {
    let store = RecordingStore::failing_upload(500);
    let (mut new_bill, _) = controller(store.clone());

    let err = new_bill.handle_change_file(jpg()).await.expect_err("must fail");

    assert_eq!(err.to_string(), "Erreur 500");
    assert_eq!(new_bill.receipt_key(), None);
    assert!(new_bill.form().file.is_none());
}

#[tokio::test]
async fn submit_creates_pending_bill_and_returns_to_list() {
    let store = RecordingStore::with_bills(Vec::new());
    let (mut new_bill, visited) = controller(store.clone());
    fill_valid_fields(new_bill.form_mut());
    new_bill.handle_change_file(jpg()).await.expect("upload");

    let created = new_bill.handle_submit().await.expect("submit");

    assert_eq!(created.key, "1234");
    let calls = store.calls.lock().expect("calls");
    let request = &calls.created[0];
    assert_eq!(request.email, "e@e");
    assert_eq!(request.expense_type, "Transports");
    assert_eq!(request.name, "testId");
    assert_eq!(request.date, "2022-06-13");
    assert_eq!(request.amount, 25.0);
    assert_eq!(request.vat.as_deref(), Some("5"));
    assert_eq!(request.pct, 20);
    assert_eq!(request.commentary.as_deref(), Some("client meeting"));
    assert_eq!(request.file_name, "goodExtension.jpg");
    assert_eq!(
        request.file_url,
        "https://localhost:3456/images/goodExtension.jpg"
    );
    assert_eq!(request.key, "1234");
    assert_eq!(request.status, BillStatus::Pending);
    assert_eq!(*visited.lock().expect("routes"), vec![RoutePath::Bills]);
}

#[tokio::test]
async fn empty_required_field_blocks_create_and_stays_on_form() {
    let clears: [fn(&mut NewBillForm); 4] = [
        |form| form.expense_type.clear(),
        |form| form.date.clear(),
        |form| form.amount = "  ".to_string(),
        |form| form.pct.clear(),
    ];

    for clear in clears {
        let store = RecordingStore::with_bills(Vec::new());
        let (mut new_bill, visited) = controller(store.clone());
        fill_valid_fields(new_bill.form_mut());
        new_bill.handle_change_file(jpg()).await.expect("upload");
        clear(new_bill.form_mut());

        let err = new_bill.handle_submit().await.expect_err("must fail");

        assert!(
            matches!(err, NewBillError::Validation(FormError::MissingField(_))),
            "unexpected: {err:?}"
        );
        assert_eq!(store.create_count(), 0);
        assert!(visited.lock().expect("routes").is_empty());
    }
}

#[tokio::test]
async fn missing_receipt_blocks_create() {
    let store = RecordingStore::with_bills(Vec::new());
    let (mut new_bill, visited) = controller(store.clone());
    fill_valid_fields(new_bill.form_mut());

    let err = new_bill.handle_submit().await.expect_err("must fail");

    assert!(matches!(
        err,
        NewBillError::Validation(FormError::MissingField("file"))
    ));
    assert_eq!(store.create_count(), 0);
    assert!(visited.lock().expect("routes").is_empty());
}

#[tokio::test]
async fn malformed_values_are_rejected_before_create() {
    let cases: [(fn(&mut NewBillForm), FormError); 4] = [
        (
            |form| form.date = "13/06/2022".to_string(),
            FormError::InvalidDate("13/06/2022".to_string()),
        ),
        (
            |form| form.amount = "-3".to_string(),
            FormError::InvalidAmount("-3".to_string()),
        ),
        (
            |form| form.pct = "vingt".to_string(),
            FormError::InvalidPct("vingt".to_string()),
        ),
        (
            |form| form.expense_type = "Casino".to_string(),
            FormError::UnknownExpenseType("Casino".to_string()),
        ),
    ];

    for (corrupt, expected) in cases {
        let store = RecordingStore::with_bills(Vec::new());
        let (mut new_bill, _) = controller(store.clone());
        fill_valid_fields(new_bill.form_mut());
        new_bill.handle_change_file(jpg()).await.expect("upload");
        corrupt(new_bill.form_mut());

        match new_bill.handle_submit().await {
            Err(NewBillError::Validation(err)) => assert_eq!(err, expected),
            other => panic!("unexpected: {other:?}"),
        }
        assert_eq!(store.create_count(), 0);
    }
}

#[tokio::test]
async fn create_failure_is_surfaced_and_does_not_navigate() {
    let store = RecordingStore::failing_create(500);
    let (mut new_bill, visited) = controller(store.clone());
    fill_valid_fields(new_bill.form_mut());
    new_bill.handle_change_file(jpg()).await.expect("upload");

    let err = new_bill.handle_submit().await.expect_err("must fail");

    assert!(matches!(
        err,
        NewBillError::Client(ClientError::Status { status: 500, .. })
    ));
    assert_eq!(store.create_count(), 1);
    assert!(visited.lock().expect("routes").is_empty());
}

#[test]
fn new_bill_page_renders_form_and_highlights_mail_icon() {
    let store = RecordingStore::with_bills(Vec::new());
    let (mut new_bill, _) = controller(store);
    fill_valid_fields(new_bill.form_mut());

    let markup = new_bill.render();

    assert!(markup.find_by_test_id("form-new-bill").is_some());
    assert!(markup
        .find_by_test_id("icon-mail")
        .expect("icon")
        .has_class("active-icon"));
    let amount = markup.find_by_test_id("amount").expect("amount");
    assert_eq!(amount.get_attr("value"), Some("25"));
    assert!(amount.get_attr("required").is_some());
    let selected = markup
        .find_by_test_id("expense-type")
        .expect("select")
        .find_all(&|element| element.get_attr("selected").is_some());
    assert_eq!(selected.len(), 1);
    assert_eq!(selected[0].text_content(), "Transports");
}
