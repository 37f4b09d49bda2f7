use super::test_utils::{customer, customer_page, last_message, location};
use backoffice::app::{LoadPhase, ModalKind, DETACHED_MODAL_MESSAGE};
use backoffice::domain::Customer;
use backoffice::notify::Severity;
use backoffice::ui::{render, PageViewModel, Theme};
use std::time::Duration;
use tokio::time::{sleep, timeout};

const CLIENTES: &str = "http://localhost:3000/clientes";

fn two_customers() -> Vec<Customer> {
    vec![customer(1, "Jose Lema"), customer(2, "Marianela Montalvo")]
}

fn names(items: &[Customer]) -> Vec<&str> {
    items.iter().map(|item| item.name.as_str()).collect()
}

#[tokio::test(start_paused = true)]
async fn initial_load_fills_the_list() {
    let (mut page, service) = customer_page(CLIENTES, two_customers());
    assert!(page.state().loading);
    assert!(page.state().items.is_empty());

    assert!(page.activate());
    assert!(!page.activate());
    assert!(page.next().await);

    let state = page.state();
    assert!(!state.loading);
    assert_eq!(state.items.len(), 2);
    assert_eq!(state.error, None);
    assert_eq!(state.phase, LoadPhase::Loaded);
    assert_eq!(service.calls(), vec!["list"]);
}

#[tokio::test(start_paused = true)]
async fn debounced_search_issues_one_query_per_settled_value() {
    let (mut page, service) = customer_page(CLIENTES, two_customers());
    page.activate();
    page.next().await;

    for text in ["m", "ma", "mar"] {
        page.set_search_text(text);
        sleep(Duration::from_millis(150)).await;
    }
    assert_eq!(service.count("search:"), 0);

    assert!(page.next().await);
    assert!(page.state().loading);
    assert!(page.next().await);

    assert_eq!(page.state().settled_search, "mar");
    assert_eq!(names(&page.state().items), vec!["Marianela Montalvo"]);
    assert_eq!(service.calls(), vec!["list", "search:mar"]);

    page.set_search_text("");
    page.next().await;
    page.next().await;
    assert_eq!(page.state().items.len(), 2);
    assert_eq!(service.calls(), vec!["list", "search:mar", "list"]);
}

#[tokio::test(start_paused = true)]
async fn superseded_search_never_overwrites_the_latest() {
    let items = vec![
        customer(1, "Abel Ortiz"),
        customer(2, "Ana Vera"),
        customer(3, "Abigail Ruiz"),
    ];
    let (mut page, service) = customer_page(CLIENTES, items);
    service.set_latency("a", Duration::from_secs(2));
    page.activate();
    page.next().await;

    page.set_search_text("a");
    page.next().await;
    assert!(page.state().loading);

    page.set_search_text("ab");
    page.next().await;
    page.next().await;
    assert_eq!(names(&page.state().items), vec!["Abel Ortiz", "Abigail Ruiz"]);

    assert!(timeout(Duration::from_secs(3), page.next()).await.is_err());
    assert_eq!(names(&page.state().items), vec!["Abel Ortiz", "Abigail Ruiz"]);
    assert_eq!(page.state().settled_search, "ab");
    assert_eq!(service.calls(), vec!["list", "search:a", "search:ab"]);
}

#[tokio::test(start_paused = true)]
async fn list_failure_clears_items_and_retry_recovers() {
    let (mut page, service) = customer_page(CLIENTES, two_customers());
    service.fail_lists(Some("Servicio no disponible"));
    page.activate();
    page.next().await;

    let state = page.state();
    assert!(state.items.is_empty());
    assert!(!state.loading);
    assert_eq!(state.phase, LoadPhase::Error);
    assert_eq!(state.error.as_deref(), Some("Servicio no disponible"));

    let notification = page.notifications().notifications().pop().unwrap();
    assert_eq!(notification.severity, Severity::Error);
    assert_eq!(notification.message, "Servicio no disponible");

    let vm = PageViewModel::from_page(&page);
    assert_eq!(
        vm.error_banner.map(|banner| banner.message).as_deref(),
        Some("Error: Servicio no disponible")
    );

    service.fail_lists(None);
    assert!(page.retry());
    page.next().await;
    assert_eq!(page.state().items.len(), 2);
    assert_eq!(page.state().error, None);
}

#[tokio::test(start_paused = true)]
async fn failed_search_clears_items_and_retry_repeats_the_search() {
    let (mut page, service) = customer_page(CLIENTES, two_customers());
    page.activate();
    page.next().await;
    service.fail_lists(Some("Tiempo de espera agotado"));

    page.set_search_text("jose");
    page.next().await;
    assert!(page.state().loading);
    page.next().await;

    let state = page.state();
    assert!(!state.loading);
    assert!(state.items.is_empty());
    assert_eq!(state.phase, LoadPhase::Error);
    assert_eq!(state.error.as_deref(), Some("Tiempo de espera agotado"));

    let notification = page.notifications().notifications().pop().unwrap();
    assert_eq!(notification.severity, Severity::Error);
    assert_eq!(notification.message, "Tiempo de espera agotado");

    service.fail_lists(None);
    assert!(page.retry());
    page.next().await;

    assert_eq!(names(&page.state().items), vec!["Jose Lema"]);
    assert_eq!(page.state().phase, LoadPhase::Loaded);
    assert_eq!(service.calls(), vec!["list", "search:jose", "search:jose"]);
}

#[tokio::test(start_paused = true)]
async fn confirmed_delete_removes_item_and_closes_modal() {
    let (mut page, service) = customer_page(CLIENTES, two_customers());
    page.activate();
    page.next().await;

    page.open_delete(customer(1, "Jose Lema"));
    assert!(page.store().is_open(&page.keys().delete));
    assert!(page.confirm_delete());
    assert!(!page.confirm_delete());

    page.next().await;

    assert_eq!(names(&page.state().items), vec!["Marianela Montalvo"]);
    assert!(!page.store().is_open(&page.keys().delete));
    assert_eq!(page.store().record_count(), 0);
    assert_eq!(service.count("delete:"), 1);

    let notification = page.notifications().notifications().pop().unwrap();
    assert_eq!(notification.severity, Severity::Success);
    assert_eq!(notification.message, "Cliente \"Jose Lema\" eliminado exitosamente");
}

#[tokio::test(start_paused = true)]
async fn failed_delete_keeps_item_and_reports_error() {
    let (mut page, service) = customer_page(CLIENTES, two_customers());
    page.activate();
    page.next().await;
    service.fail_mutations(Some("El cliente tiene cuentas asociadas"));

    page.open_delete(customer(2, "Marianela Montalvo"));
    page.confirm_delete();
    page.next().await;

    assert_eq!(page.state().items.len(), 2);
    assert!(page.store().is_open(&page.keys().delete));
    assert!(!page.state().delete_pending);
    assert_eq!(
        last_message(page.notifications()).as_deref(),
        Some("Error al eliminar cliente: El cliente tiene cuentas asociadas")
    );
}

#[tokio::test(start_paused = true)]
async fn create_notifies_closes_and_reloads() {
    let (mut page, service) = customer_page(CLIENTES, two_customers());
    page.activate();
    page.next().await;

    page.open_create();
    assert_eq!(
        page.store().location().as_str(),
        "http://localhost:3000/clientes?createCliente=new"
    );

    let draft = Customer {
        name: "Juan Osorio".to_string(),
        identification: "0987654321".to_string(),
        ..Customer::default()
    };
    assert!(page.submit(draft.clone()));
    assert!(!page.submit(draft));

    page.next().await;
    assert!(!page.store().is_open(&page.keys().create));
    assert_eq!(
        last_message(page.notifications()).as_deref(),
        Some("Cliente creado exitosamente")
    );
    assert!(page.state().loading);

    page.next().await;
    assert_eq!(page.state().items.len(), 3);
    assert_eq!(service.calls(), vec!["list", "create", "list"]);
}

#[tokio::test(start_paused = true)]
async fn rejected_update_keeps_edit_modal_open() {
    let (mut page, service) = customer_page(CLIENTES, two_customers());
    page.activate();
    page.next().await;
    service.fail_mutations(Some("La identificación ya existe"));

    let jose = customer(1, "Jose Lema");
    page.open_edit(jose.clone());
    page.submit(Customer {
        identification: "1700000002".to_string(),
        ..jose
    });
    page.next().await;

    assert!(page.store().is_open(&page.keys().edit));
    assert!(!page.state().form_pending);
    assert_eq!(service.count("update:1"), 1);
    assert_eq!(
        last_message(page.notifications()).as_deref(),
        Some("Error: La identificación ya existe")
    );
}

#[tokio::test(start_paused = true)]
async fn submit_without_form_modal_does_nothing() {
    let (mut page, service) = customer_page(CLIENTES, two_customers());
    page.activate();
    page.next().await;

    assert!(!page.submit(customer(9, "Nadie")));
    assert!(!page.confirm_delete());
    assert_eq!(service.calls(), vec!["list"]);
}

#[tokio::test(start_paused = true)]
async fn detached_edit_waits_for_list_and_recovers_record() {
    let url = "http://localhost:3000/clientes?editCliente=2";
    let (mut page, _service) = customer_page(url, two_customers());

    page.activate();
    page.navigate(location(url));
    assert!(page.modal_item(ModalKind::Edit).is_none());
    assert!(page.store().is_open(&page.keys().edit));

    page.next().await;

    assert_eq!(
        page.modal_item(ModalKind::Edit),
        Some(customer(2, "Marianela Montalvo"))
    );
    assert!(page.notifications().is_empty());
}

#[tokio::test(start_paused = true)]
async fn detached_delete_with_unknown_id_is_closed_with_warning() {
    let (mut page, _service) = customer_page(CLIENTES, two_customers());
    page.activate();
    page.next().await;

    page.navigate(location("http://localhost:3000/clientes?deleteCliente=99"));

    assert!(!page.store().is_open(&page.keys().delete));
    let notification = page.notifications().notifications().pop().unwrap();
    assert_eq!(notification.severity, Severity::Warning);
    assert_eq!(notification.message, DETACHED_MODAL_MESSAGE);
}

#[tokio::test(start_paused = true)]
async fn back_navigation_to_create_modal_keeps_it_open() {
    let (mut page, _service) = customer_page(CLIENTES, two_customers());
    page.activate();
    page.next().await;

    page.open_create();
    page.navigate(location(CLIENTES));
    page.navigate(location("http://localhost:3000/clientes?createCliente=new"));

    assert!(page.store().is_open(&page.keys().create));
    assert!(page.notifications().is_empty());
}

#[tokio::test(start_paused = true)]
async fn view_model_reflects_search_and_delete_prompt() {
    let (mut page, _service) = customer_page(CLIENTES, two_customers());
    page.activate();
    page.next().await;

    page.set_search_text("jose");
    page.next().await;
    page.next().await;
    page.open_delete(customer(1, "Jose Lema"));

    let vm = PageViewModel::from_page(&page);
    assert_eq!(vm.header.title, "Clientes");
    assert_eq!(vm.header.count, 1);
    assert!(!vm.search_bar.pending);
    assert_eq!(vm.rows[0].highlight_ranges[0], vec![(0, 4)]);

    let modal = vm.modal.clone().unwrap();
    assert_eq!(modal.kind, ModalKind::Delete);
    assert_eq!(modal.title, "Eliminar Cliente");
    assert_eq!(
        modal.prompt.as_deref(),
        Some("¿Estás seguro que deseas eliminar el cliente \"Jose Lema\"?")
    );

    let frame = render(&vm, &Theme::default(), 80);
    assert!(frame.contains("Eliminar Cliente [1]"));
    assert!(frame.contains("Lema"));
}
