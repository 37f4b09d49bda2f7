use backoffice::notify::{NotificationQueue, Severity, DEFAULT_TIMEOUT};
use std::time::Duration;
use tokio::time::sleep;

#[tokio::test(start_paused = true)]
async fn success_notification_expires_after_default_timeout() {
    let queue = NotificationQueue::default();
    assert_eq!(queue.timeout(), DEFAULT_TIMEOUT);

    queue.push("Cliente creado exitosamente", Severity::Success);
    assert_eq!(queue.len(), 1);

    sleep(Duration::from_millis(4999)).await;
    assert_eq!(queue.len(), 1);

    sleep(Duration::from_millis(2)).await;
    assert_eq!(queue.len(), 0);
}

#[tokio::test(start_paused = true)]
async fn each_notification_keeps_its_own_deadline() {
    let queue = NotificationQueue::new(Duration::from_millis(1000));

    queue.info("primero");
    sleep(Duration::from_millis(600)).await;
    queue.info("segundo");

    sleep(Duration::from_millis(500)).await;
    let messages: Vec<_> = queue.notifications().into_iter().map(|n| n.message).collect();
    assert_eq!(messages, vec!["segundo"]);

    sleep(Duration::from_millis(600)).await;
    assert!(queue.is_empty());
}

#[tokio::test(start_paused = true)]
async fn early_dismissal_cancels_scheduled_eviction() {
    let queue = NotificationQueue::default();
    let first = queue.error("Error al eliminar cliente: sin conexión");

    assert!(queue.dismiss(first));
    assert!(queue.is_empty());
    assert!(!queue.dismiss(first));

    sleep(Duration::from_millis(1000)).await;
    let second = queue.warning("No hay datos para exportar");

    sleep(Duration::from_millis(4500)).await;
    let live: Vec<_> = queue.notifications().into_iter().map(|n| n.id).collect();
    assert_eq!(live, vec![second]);
}

#[tokio::test(start_paused = true)]
async fn revision_changes_on_push_and_eviction() {
    let queue = NotificationQueue::new(Duration::from_millis(100));
    let mut revisions = queue.subscribe();

    queue.info("Cargando...");
    revisions.changed().await.unwrap();
    revisions.borrow_and_update();

    revisions.changed().await.unwrap();
    assert!(queue.is_empty());
}
