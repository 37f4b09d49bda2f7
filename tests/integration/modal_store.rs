use super::test_utils::{customer, location};
use backoffice::domain::Customer;
use backoffice::modal::{ModalKey, ModalStore, Payload, NEW_TOKEN};

fn store(url: &str) -> ModalStore {
    ModalStore::new(location(url))
}

#[test]
fn open_exposes_value_and_payload() {
    let store = store("http://localhost:3000/clientes");
    let key = ModalKey::from_static("editCliente");
    let jose = customer(4, "Jose Lema");

    store.open(&key, "4", Payload::new(jose.clone()));

    let query = store.query(&key);
    assert!(query.is_open());
    assert_eq!(query.param().as_deref(), Some("4"));
    assert_eq!(query.additional_props().get::<Customer>(), Some(&jose));
    assert!(!query.is_detached());
    assert_eq!(store.location().as_str(), "http://localhost:3000/clientes?editCliente=4");
}

#[test]
fn close_clears_value_and_payload() {
    let store = store("http://localhost:3000/clientes");
    let key = ModalKey::from_static("deleteCliente");
    store.open(&key, "9", Payload::new(customer(9, "Marianela Montalvo")));

    store.query(&key).close();

    let query = store.query(&key);
    assert!(!query.is_open());
    assert_eq!(query.param(), None);
    assert!(query.additional_props().is_empty());
    assert_eq!(store.record_count(), 0);
    assert_eq!(store.location().query(), None);
}

#[test]
fn modals_are_independent() {
    let store = store("http://localhost:3000/clientes");
    let create = ModalKey::from_static("createCliente");
    let edit = ModalKey::from_static("editCliente");

    store.open(&edit, "2", Payload::new(customer(2, "Juan Osorio")));
    store.open(&create, NEW_TOKEN, Payload::empty());

    assert_eq!(store.param(&edit).as_deref(), Some("2"));
    assert!(store.additional_props(&edit).get::<Customer>().is_some());

    store.close(&create);
    assert!(store.is_open(&edit));
    assert_eq!(store.param(&edit).as_deref(), Some("2"));
}

#[test]
fn foreign_parameters_survive_modal_changes() {
    let store = store("http://localhost:3000/cuentas?page=2&sort=numero%20cuenta");
    let key = ModalKey::from_static("createCuenta");

    store.open(&key, NEW_TOKEN, Payload::empty());
    assert_eq!(
        store.location().query(),
        Some("page=2&sort=numero%20cuenta&createCuenta=new")
    );

    store.close(&key);
    assert_eq!(store.location().query(), Some("page=2&sort=numero%20cuenta"));
}

#[test]
fn navigation_back_to_a_modal_leaves_it_detached() {
    let store = store("http://localhost:3000/clientes");
    let key = ModalKey::from_static("editCliente");
    store.open(&key, "4", Payload::new(customer(4, "Jose Lema")));

    store.sync_location(location("http://localhost:3000/clientes"));
    assert_eq!(store.record_count(), 0);

    store.sync_location(location("http://localhost:3000/clientes?editCliente=4"));
    let query = store.query(&key);
    assert!(query.is_open());
    assert!(query.is_detached());
    assert!(query.additional_props().is_empty());
}

#[test]
fn held_facade_follows_later_location_changes() {
    let store = store("http://localhost:3000/clientes");
    let key = ModalKey::from_static("deleteCliente");
    let query = store.query(&key);
    assert!(!query.is_open());

    store.open(&key, "5", Payload::new(customer(5, "Juan Osorio")));
    assert!(query.is_open());
    assert_eq!(query.param().as_deref(), Some("5"));
    assert!(query.additional_props().get::<Customer>().is_some());

    store.sync_location(location("http://localhost:3000/clientes?deleteCliente=6"));
    assert_eq!(query.param().as_deref(), Some("6"));
    assert!(query.is_detached());

    store.close(&key);
    assert!(!query.is_open());
    assert_eq!(query.param(), None);
}

#[tokio::test]
async fn subscribers_see_every_location_change() {
    let store = store("http://localhost:3000/clientes");
    let mut changes = store.subscribe();
    let key = ModalKey::from_static("createCliente");

    store.open(&key, NEW_TOKEN, Payload::empty());

    changes.changed().await.unwrap();
    assert_eq!(
        changes.borrow_and_update().as_str(),
        "http://localhost:3000/clientes?createCliente=new"
    );
}
