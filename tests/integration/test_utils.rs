//! Shared fixtures: in-memory services and page construction.

use async_trait::async_trait;
use backoffice::app::ListPage;
use backoffice::domain::{BackofficeError, Customer, ReportRow, Resource, ResourceId, Result};
use backoffice::modal::{Location, ModalStore};
use backoffice::notify::NotificationQueue;
use backoffice::services::{ReportService, ResourceService};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

pub const SEARCH_DELAY: Duration = Duration::from_millis(500);

pub fn customer(id: ResourceId, name: &str) -> Customer {
    Customer {
        id: Some(id),
        name: name.to_string(),
        identification: format!("17{id:08}"),
        active: Some(true),
        ..Customer::default()
    }
}

pub fn location(url: &str) -> Location {
    Location::parse(url).unwrap()
}

fn rejected(message: &str) -> BackofficeError {
    BackofficeError::Rejected {
        status: 400,
        message: Some(message.to_string()),
    }
}

#[derive(Debug)]
struct MockState<R> {
    items: Vec<R>,
    next_id: ResourceId,
    list_failure: Option<String>,
    mutation_failure: Option<String>,
    latency: HashMap<String, Duration>,
    calls: Vec<String>,
}

/// In-memory collection recording every call it receives.
///
/// Searches match names case-insensitively. Latency can be set per search
/// filter (`""` for the full list) to reorder completions.
#[derive(Debug)]
pub struct MockService<R> {
    state: Mutex<MockState<R>>,
}

impl<R: Resource> MockService<R> {
    pub fn new(items: Vec<R>) -> Arc<Self> {
        let next_id = items.iter().filter_map(Resource::id).max().unwrap_or(0) + 1;
        Arc::new(Self {
            state: Mutex::new(MockState {
                items,
                next_id,
                list_failure: None,
                mutation_failure: None,
                latency: HashMap::new(),
                calls: Vec::new(),
            }),
        })
    }

    pub fn fail_lists(&self, message: Option<&str>) {
        self.state.lock().list_failure = message.map(String::from);
    }

    pub fn fail_mutations(&self, message: Option<&str>) {
        self.state.lock().mutation_failure = message.map(String::from);
    }

    pub fn set_latency(&self, filter: &str, latency: Duration) {
        self.state.lock().latency.insert(filter.to_string(), latency);
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().calls.clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.state
            .lock()
            .calls
            .iter()
            .filter(|call| call.starts_with(prefix))
            .count()
    }

    async fn wait(&self, filter: &str) {
        let latency = self.state.lock().latency.get(filter).copied();
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
    }

    fn record(&self, call: String) {
        self.state.lock().calls.push(call);
    }
}

#[async_trait]
impl<R: Resource> ResourceService<R> for MockService<R> {
    async fn list(&self) -> Result<Vec<R>> {
        self.record("list".to_string());
        self.wait("").await;
        let state = self.state.lock();
        match &state.list_failure {
            Some(message) => Err(rejected(message)),
            None => Ok(state.items.clone()),
        }
    }

    async fn search(&self, filter: &str) -> Result<Vec<R>> {
        self.record(format!("search:{filter}"));
        self.wait(filter).await;
        let state = self.state.lock();
        if let Some(message) = &state.list_failure {
            return Err(rejected(message));
        }
        let needle = filter.to_lowercase();
        Ok(state
            .items
            .iter()
            .filter(|item| item.label().to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn create(&self, data: R) -> Result<R> {
        self.record("create".to_string());
        let mut state = self.state.lock();
        if let Some(message) = &state.mutation_failure {
            return Err(rejected(message));
        }
        let id = state.next_id;
        state.next_id += 1;
        let mut value = serde_json::to_value(&data)?;
        if let Some(object) = value.as_object_mut() {
            object.insert("clienteId".to_string(), id.into());
            object.insert("id".to_string(), id.into());
        }
        let created: R = serde_json::from_value(value)?;
        state.items.push(created.clone());
        Ok(created)
    }

    async fn update(&self, id: ResourceId, data: R) -> Result<R> {
        self.record(format!("update:{id}"));
        let mut state = self.state.lock();
        if let Some(message) = &state.mutation_failure {
            return Err(rejected(message));
        }
        let slot = state
            .items
            .iter_mut()
            .find(|item| item.id() == Some(id))
            .ok_or_else(|| BackofficeError::NotFound(format!("el registro {id}")))?;
        *slot = data.clone();
        Ok(data)
    }

    async fn delete(&self, id: ResourceId) -> Result<()> {
        self.record(format!("delete:{id}"));
        let mut state = self.state.lock();
        if let Some(message) = &state.mutation_failure {
            return Err(rejected(message));
        }
        let before = state.items.len();
        state.items.retain(|item| item.id() != Some(id));
        if state.items.len() == before {
            return Err(BackofficeError::NotFound(format!("el registro {id}")));
        }
        Ok(())
    }
}

/// Customer list page over a mock service, starting at `url`.
pub fn customer_page(
    url: &str,
    items: Vec<Customer>,
) -> (ListPage<Customer>, Arc<MockService<Customer>>) {
    let service = MockService::new(items);
    let page = ListPage::new(
        service.clone(),
        ModalStore::new(location(url)),
        NotificationQueue::default(),
        SEARCH_DELAY,
    );
    (page, service)
}

/// Latest notification message, if any.
pub fn last_message(notifications: &NotificationQueue) -> Option<String> {
    notifications
        .notifications()
        .last()
        .map(|notification| notification.message.clone())
}

/// Report service answering from fixed rows and PDF bytes.
#[derive(Debug, Default)]
pub struct MockReports {
    pub rows: Vec<ReportRow>,
    pub pdf: Vec<u8>,
    pub failure: Option<String>,
    pub requests: Mutex<Vec<(ResourceId, DateTime<Utc>, DateTime<Utc>)>>,
}

#[async_trait]
impl ReportService for MockReports {
    async fn report(
        &self,
        customer_id: ResourceId,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<ReportRow>> {
        self.requests.lock().push((customer_id, from, to));
        match &self.failure {
            Some(message) => Err(rejected(message)),
            None => Ok(self.rows.clone()),
        }
    }

    async fn report_pdf(
        &self,
        customer_id: ResourceId,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<u8>> {
        self.requests.lock().push((customer_id, from, to));
        match &self.failure {
            Some(message) => Err(rejected(message)),
            None => Ok(self.pdf.clone()),
        }
    }
}

pub fn report_row(customer: &str, movement: f64) -> ReportRow {
    ReportRow {
        date: Some("10/02/2024".to_string()),
        customer: Some(customer.to_string()),
        account_number: Some(478_758),
        kind: Some("Ahorros".to_string()),
        opening_balance: Some(2000.0),
        active: Some(true),
        movement: Some(movement),
        available_balance: Some(2000.0 + movement),
    }
}
