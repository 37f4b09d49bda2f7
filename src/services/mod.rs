//! Data-access services.
//!
//! List pages talk to the back end only through [`ResourceService`], and the
//! reports page only through [`ReportService`]. The REST implementations live
//! in [`rest`]; tests substitute in-memory ones.
//!
//! # Modules
//!
//! - [`rest`]: `reqwest` clients for the `/api/v1` endpoints

pub mod rest;

use crate::domain::{ReportRow, Resource, ResourceId, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

pub use rest::{Endpoints, RestReportService, RestService};

/// CRUD and free-text search over one resource collection.
#[async_trait]
pub trait ResourceService<R: Resource>: Send + Sync {
    /// Returns every record of the collection.
    async fn list(&self) -> Result<Vec<R>>;

    /// Returns the records matching `filter`.
    async fn search(&self, filter: &str) -> Result<Vec<R>>;

    async fn create(&self, data: R) -> Result<R>;

    async fn update(&self, id: ResourceId, data: R) -> Result<R>;

    async fn delete(&self, id: ResourceId) -> Result<()>;
}

/// Movement reports for one customer and date range.
#[async_trait]
pub trait ReportService: Send + Sync {
    async fn report(
        &self,
        customer_id: ResourceId,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<ReportRow>>;

    /// Returns the rendered PDF document bytes.
    async fn report_pdf(
        &self,
        customer_id: ResourceId,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<u8>>;
}
