use super::test_utils::{last_message, report_row, MockReports};
use backoffice::domain::ReportRow;
use backoffice::notify::{NotificationQueue, Severity};
use backoffice::report::{
    ReportPage, END_BEFORE_START, MISSING_FIELDS, NOTHING_TO_EXPORT, NO_RESULTS, SEARCH_FIRST,
    START_AFTER_END,
};
use chrono::{NaiveDate, SecondsFormat};
use std::sync::Arc;

fn day(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d)
}

fn page_with(service: MockReports) -> (ReportPage, Arc<MockReports>, NotificationQueue) {
    let service = Arc::new(service);
    let notifications = NotificationQueue::default();
    let page = ReportPage::new(service.clone(), notifications.clone());
    (page, service, notifications)
}

fn fill_criteria(page: &mut ReportPage) {
    page.set_customer(Some(1));
    page.set_from(day(2024, 2, 1));
    page.set_to(day(2024, 2, 29));
}

#[tokio::test(start_paused = true)]
async fn search_requires_every_field() {
    let (mut page, service, notifications) = page_with(MockReports::default());
    page.set_customer(Some(1));

    assert!(!page.search().await);
    assert_eq!(last_message(&notifications).as_deref(), Some(MISSING_FIELDS));
    assert!(service.requests.lock().is_empty());
}

#[tokio::test(start_paused = true)]
async fn inverted_dates_warn_on_edit() {
    let (mut page, _service, notifications) = page_with(MockReports::default());

    page.set_to(day(2024, 1, 10));
    page.set_from(day(2024, 1, 20));
    assert_eq!(last_message(&notifications).as_deref(), Some(START_AFTER_END));

    page.set_from(day(2024, 1, 1));
    page.set_to(day(2023, 12, 31));
    assert_eq!(last_message(&notifications).as_deref(), Some(END_BEFORE_START));
    assert_eq!(notifications.len(), 2);
}

#[tokio::test(start_paused = true)]
async fn search_sends_midnight_utc_range_and_counts_rows() {
    let rows = vec![report_row("Jose Lema", -575.0), report_row("Jose Lema", 600.0)];
    let (mut page, service, notifications) = page_with(MockReports {
        rows: rows.clone(),
        ..MockReports::default()
    });
    fill_criteria(&mut page);

    assert!(page.search().await);
    assert_eq!(page.rows(), rows.as_slice());
    assert!(!page.is_loading());

    let (customer_id, from, to) = service.requests.lock()[0];
    assert_eq!(customer_id, 1);
    assert_eq!(from.to_rfc3339_opts(SecondsFormat::Millis, true), "2024-02-01T00:00:00.000Z");
    assert_eq!(to.to_rfc3339_opts(SecondsFormat::Millis, true), "2024-02-29T00:00:00.000Z");

    let notification = notifications.notifications().pop().unwrap();
    assert_eq!(notification.severity, Severity::Success);
    assert_eq!(notification.message, "Se encontraron 2 movimiento(s)");
}

#[tokio::test(start_paused = true)]
async fn empty_result_is_informational() {
    let (mut page, _service, notifications) = page_with(MockReports::default());
    fill_criteria(&mut page);

    assert!(page.search().await);
    let notification = notifications.notifications().pop().unwrap();
    assert_eq!(notification.severity, Severity::Info);
    assert_eq!(notification.message, NO_RESULTS);
}

#[tokio::test(start_paused = true)]
async fn failed_search_clears_previous_rows() {
    let (mut page, _service, notifications) = page_with(MockReports {
        failure: Some("Cliente no encontrado".to_string()),
        ..MockReports::default()
    });
    fill_criteria(&mut page);

    assert!(!page.search().await);
    assert!(page.rows().is_empty());
    assert_eq!(
        last_message(&notifications).as_deref(),
        Some("Error al obtener el reporte: Cliente no encontrado")
    );
}

#[tokio::test]
async fn json_export_writes_rows_into_directory() {
    let dir = tempfile::tempdir().unwrap();
    let rows = vec![report_row("Marianela Montalvo", 100.0)];
    let (mut page, _service, notifications) = page_with(MockReports {
        rows: rows.clone(),
        ..MockReports::default()
    });

    assert!(page.export_json(dir.path()).await.is_none());
    assert_eq!(last_message(&notifications).as_deref(), Some(NOTHING_TO_EXPORT));

    fill_criteria(&mut page);
    page.search().await;
    let path = page.export_json(dir.path()).await.unwrap();

    let name = path.file_name().unwrap().to_str().unwrap();
    assert!(name.starts_with("reporte-movimientos-1-"));
    assert!(name.ends_with(".json"));

    let written: Vec<ReportRow> =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(written, rows);
    assert_eq!(
        last_message(&notifications).as_deref(),
        Some("Reporte JSON descargado exitosamente")
    );
}

#[tokio::test]
async fn pdf_download_requires_criteria_and_saves_bytes() {
    let dir = tempfile::tempdir().unwrap();
    let (mut page, _service, notifications) = page_with(MockReports {
        pdf: b"%PDF-1.4".to_vec(),
        ..MockReports::default()
    });

    assert!(page.download_pdf(dir.path()).await.is_none());
    assert_eq!(last_message(&notifications).as_deref(), Some(SEARCH_FIRST));

    fill_criteria(&mut page);
    let path = page.download_pdf(dir.path()).await.unwrap();

    assert_eq!(path.extension().and_then(|ext| ext.to_str()), Some("pdf"));
    assert_eq!(std::fs::read(&path).unwrap(), b"%PDF-1.4");
    assert_eq!(
        last_message(&notifications).as_deref(),
        Some("Reporte PDF descargado exitosamente")
    );
}
