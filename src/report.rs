//! Movements report page.
//!
//! The operator picks a customer and a date range, fetches the movements in
//! that range, and can save the result as JSON or download the server-rendered
//! PDF. All outcomes are reported through the shared notification queue; the
//! page itself only keeps the criteria and the last result.
//!
//! Dates are calendar days. They are sent to the server as midnight UTC with
//! millisecond precision, e.g. `2024-02-01T00:00:00.000Z`.

use crate::domain::{BackofficeError, ReportRow, ResourceId, Result};
use crate::notify::NotificationQueue;
use crate::services::ReportService;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::Instrument;

pub const MISSING_FIELDS: &str = "Todos los campos son obligatorios";
pub const INVERTED_RANGE: &str = "La fecha fin debe ser mayor o igual a la fecha inicio";
pub const START_AFTER_END: &str = "La fecha de inicio no puede ser mayor a la fecha fin";
pub const END_BEFORE_START: &str = "La fecha fin no puede ser menor a la fecha de inicio";
pub const NO_RESULTS: &str = "No se encontraron movimientos para los criterios seleccionados";
pub const NOTHING_TO_EXPORT: &str = "No hay datos para exportar";
pub const SEARCH_FIRST: &str = "Debe realizar una búsqueda antes de generar el PDF";

/// Customer and date range of a report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportCriteria {
    pub customer_id: Option<ResourceId>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

/// Criteria that passed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidCriteria {
    pub customer_id: ResourceId,
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl ReportCriteria {
    /// Checks that every field is set and the range is not inverted.
    ///
    /// # Errors
    ///
    /// Returns [`BackofficeError::Validation`] with the operator-facing text.
    pub fn validate(&self) -> Result<ValidCriteria> {
        let (Some(customer_id), Some(from), Some(to)) = (self.customer_id, self.from, self.to)
        else {
            return Err(BackofficeError::Validation(MISSING_FIELDS.to_string()));
        };
        if to < from {
            return Err(BackofficeError::Validation(INVERTED_RANGE.to_string()));
        }
        Ok(ValidCriteria {
            customer_id,
            from: midnight_utc(from),
            to: midnight_utc(to),
        })
    }

    fn is_inverted(&self) -> bool {
        matches!((self.from, self.to), (Some(from), Some(to)) if from > to)
    }
}

fn midnight_utc(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// File name used for exports: `reporte-movimientos-{id}-{YYYY-MM-DD}.{ext}`.
#[must_use]
pub fn export_file_name(customer_id: ResourceId, date: NaiveDate, extension: &str) -> String {
    format!(
        "reporte-movimientos-{customer_id}-{}.{extension}",
        date.format("%Y-%m-%d")
    )
}

/// State and operations of the reports page.
pub struct ReportPage {
    service: Arc<dyn ReportService>,
    notifications: NotificationQueue,
    criteria: ReportCriteria,
    rows: Vec<ReportRow>,
    loading: bool,
}

impl std::fmt::Debug for ReportPage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReportPage")
            .field("criteria", &self.criteria)
            .field("rows", &self.rows.len())
            .field("loading", &self.loading)
            .finish_non_exhaustive()
    }
}

impl ReportPage {
    pub fn new(service: Arc<dyn ReportService>, notifications: NotificationQueue) -> Self {
        Self {
            service,
            notifications,
            criteria: ReportCriteria::default(),
            rows: Vec::new(),
            loading: false,
        }
    }

    #[must_use]
    pub const fn criteria(&self) -> &ReportCriteria {
        &self.criteria
    }

    #[must_use]
    pub fn rows(&self) -> &[ReportRow] {
        &self.rows
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn set_customer(&mut self, customer_id: Option<ResourceId>) {
        self.criteria.customer_id = customer_id;
    }

    /// Sets the start date, warning immediately if it passes the end date.
    pub fn set_from(&mut self, from: Option<NaiveDate>) {
        self.criteria.from = from;
        if self.criteria.is_inverted() {
            self.notifications.error(START_AFTER_END);
        }
    }

    /// Sets the end date, warning immediately if it precedes the start date.
    pub fn set_to(&mut self, to: Option<NaiveDate>) {
        self.criteria.to = to;
        if self.criteria.is_inverted() {
            self.notifications.error(END_BEFORE_START);
        }
    }

    /// Validates the criteria and fetches the report.
    ///
    /// # Returns
    ///
    /// `true` if the report was fetched. Validation and service failures are
    /// reported as error notifications; a service failure clears the rows.
    pub async fn search(&mut self) -> bool {
        let criteria = match self.criteria.validate() {
            Ok(criteria) => criteria,
            Err(e) => {
                self.notifications.error(e.user_message());
                return false;
            }
        };

        self.loading = true;
        let result = self
            .service
            .report(criteria.customer_id, criteria.from, criteria.to)
            .instrument(tracing::debug_span!("report_search", customer_id = criteria.customer_id))
            .await;
        self.loading = false;

        match result {
            Ok(rows) => {
                tracing::debug!(row_count = rows.len(), "report loaded");
                if rows.is_empty() {
                    self.notifications.info(NO_RESULTS);
                } else {
                    self.notifications
                        .success(format!("Se encontraron {} movimiento(s)", rows.len()));
                }
                self.rows = rows;
                true
            }
            Err(e) => {
                tracing::debug!(error = %e, "report failed");
                self.notifications
                    .error(format!("Error al obtener el reporte: {}", e.user_message()));
                self.rows.clear();
                false
            }
        }
    }

    /// Writes the current rows as pretty-printed JSON into `dir`.
    ///
    /// # Returns
    ///
    /// The written path, or `None` when there was nothing to export or the
    /// write failed (both reported as notifications).
    pub async fn export_json(&self, dir: &Path) -> Option<PathBuf> {
        if self.rows.is_empty() {
            self.notifications.warning(NOTHING_TO_EXPORT);
            return None;
        }
        let customer_id = self.criteria.customer_id.unwrap_or_default();
        let path = dir.join(export_file_name(customer_id, Utc::now().date_naive(), "json"));

        match write_json(&path, &self.rows).await {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "report exported");
                self.notifications.success("Reporte JSON descargado exitosamente");
                Some(path)
            }
            Err(e) => {
                self.notifications
                    .error(format!("Error al descargar el JSON: {}", e.user_message()));
                None
            }
        }
    }

    /// Downloads the server-rendered PDF for the current criteria into `dir`.
    pub async fn download_pdf(&mut self, dir: &Path) -> Option<PathBuf> {
        let Ok(criteria) = self.criteria.validate() else {
            self.notifications.error(SEARCH_FIRST);
            return None;
        };

        self.loading = true;
        let result = self
            .service
            .report_pdf(criteria.customer_id, criteria.from, criteria.to)
            .await;
        self.loading = false;

        let path = dir.join(export_file_name(
            criteria.customer_id,
            Utc::now().date_naive(),
            "pdf",
        ));
        let written = match result {
            Ok(bytes) => tokio::fs::write(&path, bytes).await.map_err(BackofficeError::from),
            Err(e) => Err(e),
        };

        match written {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "report pdf saved");
                self.notifications.success("Reporte PDF descargado exitosamente");
                Some(path)
            }
            Err(e) => {
                self.notifications
                    .error(format!("Error al generar el PDF: {}", e.user_message()));
                None
            }
        }
    }
}

async fn write_json(path: &Path, rows: &[ReportRow]) -> Result<()> {
    let json = serde_json::to_string_pretty(rows)?;
    tokio::fs::write(path, json).await?;
    Ok(())
}
