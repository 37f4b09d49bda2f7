//! REST clients for the back-office API.
//!
//! Every collection follows the same layout under the configured base URL:
//!
//! ```text
//! GET    {base}/{collection}
//! GET    {base}/{collection}/buscar?filtro={text}
//! POST   {base}/{collection}
//! PUT    {base}/{collection}/{id}
//! DELETE {base}/{collection}/{id}
//! ```
//!
//! Reports live under `{base}/movimientos/reportes` and `.../reportes/pdf`.
//! Error bodies of the form `{ "message": "..." }` are surfaced verbatim.

use super::{ReportService, ResourceService};
use crate::domain::{BackofficeError, ReportRow, Resource, ResourceId, Result};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::marker::PhantomData;
use std::time::Duration;
use url::Url;

const HTTP_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const HTTP_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Collection holding movements and their reports.
const REPORTS_COLLECTION: &str = "movimientos";

fn build_http_client() -> Result<Client> {
    Client::builder()
        .connect_timeout(HTTP_CONNECT_TIMEOUT)
        .timeout(HTTP_REQUEST_TIMEOUT)
        .build()
        .map_err(|e| BackofficeError::Transport(format!("Failed to create HTTP client: {e}")))
}

/// URL builder rooted at the API base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base: Url,
}

impl Endpoints {
    /// Parses the API base URL.
    ///
    /// # Errors
    ///
    /// Returns [`BackofficeError::Config`] if `base` is not an absolute
    /// hierarchical URL.
    pub fn new(base: &str) -> Result<Self> {
        let base = Url::parse(base)
            .map_err(|e| BackofficeError::Config(format!("invalid api_url '{base}': {e}")))?;
        if base.cannot_be_a_base() {
            return Err(BackofficeError::Config(format!("api_url '{base}' cannot be a base")));
        }
        Ok(Self { base })
    }

    #[must_use]
    pub const fn base(&self) -> &Url {
        &self.base
    }

    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    #[must_use]
    pub fn collection(&self, collection: &str) -> Url {
        self.url(&[collection])
    }

    #[must_use]
    pub fn item(&self, collection: &str, id: ResourceId) -> Url {
        self.url(&[collection, &id.to_string()])
    }

    #[must_use]
    pub fn search(&self, collection: &str, filter: &str) -> Url {
        let mut url = self.url(&[collection, "buscar"]);
        url.query_pairs_mut().append_pair("filtro", filter);
        url
    }

    /// Report URL; timestamps are ISO-8601 UTC with millisecond precision.
    #[must_use]
    pub fn report(
        &self,
        customer_id: ResourceId,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        pdf: bool,
    ) -> Url {
        let mut url = if pdf {
            self.url(&[REPORTS_COLLECTION, "reportes", "pdf"])
        } else {
            self.url(&[REPORTS_COLLECTION, "reportes"])
        };
        url.query_pairs_mut()
            .append_pair("clienteId", &customer_id.to_string())
            .append_pair("fechaInicio", &from.to_rfc3339_opts(SecondsFormat::Millis, true))
            .append_pair("fechaFin", &to.to_rfc3339_opts(SecondsFormat::Millis, true));
        url
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Turns a non-success response into an error, keeping the upstream message.
async fn check_status(response: Response, what: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(|body| body.message)
        .filter(|message| !message.is_empty());

    tracing::debug!(status = status.as_u16(), message = ?message, what = what, "request rejected");

    if status == StatusCode::NOT_FOUND && message.is_none() {
        return Err(BackofficeError::NotFound(what.to_string()));
    }
    Err(BackofficeError::Rejected {
        status: status.as_u16(),
        message,
    })
}

async fn read_json<T: DeserializeOwned>(response: Response, what: &str) -> Result<T> {
    let response = check_status(response, what).await?;
    let body = response.bytes().await?;
    Ok(serde_json::from_slice(&body)?)
}

/// REST-backed [`ResourceService`] for the collection of `R`.
#[derive(Debug, Clone)]
pub struct RestService<R> {
    client: Client,
    endpoints: Endpoints,
    _resource: PhantomData<fn() -> R>,
}

impl<R: Resource> RestService<R> {
    /// Creates a service with its own HTTP client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(endpoints: Endpoints) -> Result<Self> {
        Ok(Self::with_client(build_http_client()?, endpoints))
    }

    /// Creates a service sharing an existing HTTP client.
    #[must_use]
    pub const fn with_client(client: Client, endpoints: Endpoints) -> Self {
        Self {
            client,
            endpoints,
            _resource: PhantomData,
        }
    }

    fn item_name(id: ResourceId) -> String {
        format!("{} {id}", R::MESSAGES.noun.to_lowercase())
    }
}

#[async_trait]
impl<R: Resource> ResourceService<R> for RestService<R> {
    #[tracing::instrument(level = "debug", skip(self), fields(collection = R::COLLECTION))]
    async fn list(&self) -> Result<Vec<R>> {
        let response = self
            .client
            .get(self.endpoints.collection(R::COLLECTION))
            .send()
            .await?;
        read_json(response, R::COLLECTION).await
    }

    #[tracing::instrument(level = "debug", skip(self), fields(collection = R::COLLECTION))]
    async fn search(&self, filter: &str) -> Result<Vec<R>> {
        let response = self
            .client
            .get(self.endpoints.search(R::COLLECTION, filter))
            .send()
            .await?;
        read_json(response, R::COLLECTION).await
    }

    #[tracing::instrument(level = "debug", skip(self, data), fields(collection = R::COLLECTION))]
    async fn create(&self, data: R) -> Result<R> {
        let response = self
            .client
            .post(self.endpoints.collection(R::COLLECTION))
            .json(&data)
            .send()
            .await?;
        read_json(response, R::COLLECTION).await
    }

    #[tracing::instrument(level = "debug", skip(self, data), fields(collection = R::COLLECTION))]
    async fn update(&self, id: ResourceId, data: R) -> Result<R> {
        let response = self
            .client
            .put(self.endpoints.item(R::COLLECTION, id))
            .json(&data)
            .send()
            .await?;
        read_json(response, &Self::item_name(id)).await
    }

    #[tracing::instrument(level = "debug", skip(self), fields(collection = R::COLLECTION))]
    async fn delete(&self, id: ResourceId) -> Result<()> {
        let response = self
            .client
            .delete(self.endpoints.item(R::COLLECTION, id))
            .send()
            .await?;
        check_status(response, &Self::item_name(id)).await?;
        Ok(())
    }
}

/// REST-backed [`ReportService`].
#[derive(Debug, Clone)]
pub struct RestReportService {
    client: Client,
    endpoints: Endpoints,
}

impl RestReportService {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(endpoints: Endpoints) -> Result<Self> {
        Ok(Self {
            client: build_http_client()?,
            endpoints,
        })
    }
}

#[async_trait]
impl ReportService for RestReportService {
    #[tracing::instrument(level = "debug", skip(self))]
    async fn report(
        &self,
        customer_id: ResourceId,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<ReportRow>> {
        let response = self
            .client
            .get(self.endpoints.report(customer_id, from, to, false))
            .send()
            .await?;
        read_json(response, "el reporte").await
    }

    #[tracing::instrument(level = "debug", skip(self))]
    async fn report_pdf(
        &self,
        customer_id: ResourceId,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(self.endpoints.report(customer_id, from, to, true))
            .send()
            .await?;
        let response = check_status(response, "el reporte").await?;
        Ok(response.bytes().await?.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn collection_urls_keep_base_path() {
        let endpoints = Endpoints::new("http://localhost:8080/api/v1").unwrap();
        assert_eq!(
            endpoints.collection("clientes").as_str(),
            "http://localhost:8080/api/v1/clientes"
        );
        assert_eq!(
            endpoints.item("cuentas", 12).as_str(),
            "http://localhost:8080/api/v1/cuentas/12"
        );
    }

    #[test]
    fn trailing_slash_on_base_is_tolerated() {
        let endpoints = Endpoints::new("http://localhost:8080/api/v1/").unwrap();
        assert_eq!(
            endpoints.collection("movimientos").as_str(),
            "http://localhost:8080/api/v1/movimientos"
        );
    }

    #[test]
    fn search_filter_is_encoded() {
        let endpoints = Endpoints::new("http://localhost:8080/api/v1").unwrap();
        assert_eq!(
            endpoints.search("clientes", "José Lema").as_str(),
            "http://localhost:8080/api/v1/clientes/buscar?filtro=Jos%C3%A9+Lema"
        );
    }

    #[test]
    fn report_uses_millisecond_utc_timestamps() {
        let endpoints = Endpoints::new("http://localhost:8080/api/v1").unwrap();
        let from = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        let to = Utc.with_ymd_and_hms(2024, 2, 29, 0, 0, 0).unwrap();
        assert_eq!(
            endpoints.report(7, from, to, true).as_str(),
            "http://localhost:8080/api/v1/movimientos/reportes/pdf?clienteId=7\
             &fechaInicio=2024-02-01T00%3A00%3A00.000Z&fechaFin=2024-02-29T00%3A00%3A00.000Z"
        );
    }

    #[test]
    fn rejects_opaque_base() {
        assert!(Endpoints::new("mailto:ops@example.com").is_err());
    }
}
