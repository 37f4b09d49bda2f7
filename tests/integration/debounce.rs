use backoffice::debounce::Debounced;
use std::time::Duration;
use tokio::time::{sleep, Instant};

const DELAY: Duration = Duration::from_millis(500);

#[tokio::test(start_paused = true)]
async fn burst_settles_once_on_last_value() {
    let mut search = Debounced::new(String::new(), DELAY);
    let mut settled = search.subscribe();

    for text in ["j", "jo", "jos", "jose"] {
        search.set(text.to_string());
        sleep(Duration::from_millis(200)).await;
        assert_eq!(search.value(), "");
    }

    let last_change = Instant::now() - Duration::from_millis(200);
    settled.changed().await.unwrap();

    assert_eq!(*settled.borrow_and_update(), "jose");
    let elapsed = Instant::now() - last_change;
    assert!(elapsed >= DELAY && elapsed < DELAY + Duration::from_millis(5));

    sleep(Duration::from_secs(5)).await;
    assert!(!settled.has_changed().unwrap());
}

#[tokio::test(start_paused = true)]
async fn returning_to_settled_value_publishes_nothing() {
    let mut search = Debounced::new("ana".to_string(), DELAY);
    let settled = search.subscribe();

    search.set("anab".to_string());
    sleep(Duration::from_millis(100)).await;
    search.set("ana".to_string());
    assert!(search.is_pending());

    sleep(DELAY * 2).await;
    assert!(!search.is_pending());
    assert!(!settled.has_changed().unwrap());
    assert_eq!(search.value(), "ana");
}

#[tokio::test(start_paused = true)]
async fn cancel_drops_pending_value() {
    let mut search = Debounced::new(String::new(), DELAY);

    search.set("maria".to_string());
    assert_eq!(search.source(), "maria");
    search.cancel();

    sleep(DELAY * 2).await;
    assert_eq!(search.value(), "");
}
