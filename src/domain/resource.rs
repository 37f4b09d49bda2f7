//! Resource models managed by the back-office list pages.
//!
//! Customers, accounts and transactions share one list-page machinery. The
//! [`Resource`] trait carries everything that machinery needs to know about a
//! concrete type: where it lives on the REST API, which modal keys it uses,
//! how it is named in notifications and how it is shown in a table.
//!
//! Field names follow the upstream JSON contract (camelCase, Spanish) through
//! `serde` renames, while the Rust side uses English identifiers.

use chrono::NaiveDateTime;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Numeric identifier assigned by the server.
pub type ResourceId = i64;

/// User-facing wording for one resource kind.
///
/// Messages are kept verbatim from the operator-facing product, which is in
/// Spanish. Grammatical gender differs per resource so every phrase is stored
/// whole instead of being assembled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceMessages {
    /// Page title, e.g. `Clientes`.
    pub title: &'static str,
    /// Capitalised singular noun, e.g. `Cliente`.
    pub noun: &'static str,
    /// Success text after a create.
    pub created: &'static str,
    /// Success text after an update.
    pub updated: &'static str,
    /// Suffix after the quoted label in the delete success text.
    pub deleted: &'static str,
    /// Prefix of the delete failure text.
    pub delete_failed: &'static str,
    /// Shown when the list is empty.
    pub empty: &'static str,
    /// Title of the creation modal.
    pub create_title: &'static str,
    /// Noun phrase with article used in the delete confirmation, e.g. `el cliente`.
    pub delete_subject: &'static str,
    /// Placeholder of the search box.
    pub search_placeholder: &'static str,
}

/// A record type that can be listed, searched and mutated by a list page.
pub trait Resource:
    Clone + Debug + PartialEq + Send + Sync + Serialize + DeserializeOwned + 'static
{
    /// REST collection segment, e.g. `clientes`.
    const COLLECTION: &'static str;

    /// Suffix used to build modal keys (`create{S}`, `edit{S}`, `delete{S}`).
    const MODAL_SUFFIX: &'static str;

    /// Notification and page wording.
    const MESSAGES: ResourceMessages;

    /// Table column headers, matching [`Resource::cells`].
    const COLUMNS: &'static [&'static str];

    /// Server identifier, `None` for records not yet persisted.
    fn id(&self) -> Option<ResourceId>;

    /// Short human label used in confirmations and notifications.
    fn label(&self) -> String;

    /// Display cells, one per entry of [`Resource::COLUMNS`].
    fn cells(&self) -> Vec<String>;
}

fn active_label(active: Option<bool>) -> String {
    match active {
        Some(true) => "Activo".to_string(),
        Some(false) => "Inactivo".to_string(),
        None => String::new(),
    }
}

fn optional<T: ToString>(value: Option<&T>) -> String {
    value.map(ToString::to_string).unwrap_or_default()
}

/// A bank customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Customer {
    #[serde(rename = "clienteId", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ResourceId>,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "genero", default)]
    pub gender: Option<String>,
    #[serde(rename = "edad", default)]
    pub age: Option<i32>,
    #[serde(rename = "identificacion")]
    pub identification: String,
    #[serde(rename = "direccion", default)]
    pub address: Option<String>,
    #[serde(rename = "telefono", default)]
    pub phone: Option<String>,
    #[serde(rename = "contrasena", default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(rename = "estado", default)]
    pub active: Option<bool>,
}

impl Resource for Customer {
    const COLLECTION: &'static str = "clientes";
    const MODAL_SUFFIX: &'static str = "Cliente";
    const MESSAGES: ResourceMessages = ResourceMessages {
        title: "Clientes",
        noun: "Cliente",
        created: "Cliente creado exitosamente",
        updated: "Cliente actualizado exitosamente",
        deleted: "eliminado exitosamente",
        delete_failed: "Error al eliminar cliente",
        empty: "No hay clientes registrados",
        create_title: "Crear Nuevo Cliente",
        delete_subject: "el cliente",
        search_placeholder: "Buscar cliente...",
    };
    const COLUMNS: &'static [&'static str] = &[
        "Nombre",
        "Género",
        "Edad",
        "Identificación",
        "Dirección",
        "Teléfono",
        "Estado",
    ];

    fn id(&self) -> Option<ResourceId> {
        self.id
    }

    fn label(&self) -> String {
        self.name.clone()
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            optional(self.gender.as_ref()),
            optional(self.age.as_ref()),
            self.identification.clone(),
            optional(self.address.as_ref()),
            optional(self.phone.as_ref()),
            active_label(self.active),
        ]
    }
}

/// Account product type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountKind {
    Ahorros,
    Corriente,
}

impl std::fmt::Display for AccountKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ahorros => f.write_str("Ahorros"),
            Self::Corriente => f.write_str("Corriente"),
        }
    }
}

/// A bank account owned by a customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ResourceId>,
    #[serde(rename = "numeroCuenta")]
    pub number: String,
    #[serde(rename = "tipoCuenta")]
    pub kind: AccountKind,
    #[serde(rename = "saldoInicial")]
    pub opening_balance: f64,
    #[serde(rename = "estado", default)]
    pub active: Option<bool>,
    #[serde(rename = "clienteId")]
    pub customer_id: ResourceId,
    #[serde(rename = "cliente", default, skip_serializing_if = "Option::is_none")]
    pub customer: Option<Customer>,
}

impl Resource for Account {
    const COLLECTION: &'static str = "cuentas";
    const MODAL_SUFFIX: &'static str = "Cuenta";
    const MESSAGES: ResourceMessages = ResourceMessages {
        title: "Cuentas",
        noun: "Cuenta",
        created: "Cuenta creada exitosamente",
        updated: "Cuenta actualizada exitosamente",
        deleted: "eliminada exitosamente",
        delete_failed: "Error al eliminar cuenta",
        empty: "No hay cuentas registradas",
        create_title: "Crear Nueva Cuenta",
        delete_subject: "la cuenta",
        search_placeholder: "Buscar cuenta...",
    };
    const COLUMNS: &'static [&'static str] = &[
        "Número de Cuenta",
        "Tipo de Cuenta",
        "Saldo Inicial",
        "Estado",
        "Cliente",
    ];

    fn id(&self) -> Option<ResourceId> {
        self.id
    }

    fn label(&self) -> String {
        self.number.clone()
    }

    fn cells(&self) -> Vec<String> {
        let owner = self.customer.as_ref().map_or_else(
            || self.customer_id.to_string(),
            |c| format!("{} - {}", optional(c.id.as_ref()), c.name),
        );
        vec![
            self.number.clone(),
            self.kind.to_string(),
            format!("${:.2}", self.opening_balance),
            active_label(self.active),
            owner,
        ]
    }
}

/// Movement type recorded against an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionKind {
    Deposito,
    Retiro,
    Transferencia,
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Deposito => f.write_str("Deposito"),
            Self::Retiro => f.write_str("Retiro"),
            Self::Transferencia => f.write_str("Transferencia"),
        }
    }
}

/// A movement on an account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ResourceId>,
    #[serde(rename = "fecha", default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDateTime>,
    #[serde(rename = "tipoMovimiento")]
    pub kind: TransactionKind,
    #[serde(rename = "valor")]
    pub amount: f64,
    #[serde(rename = "saldo", default, skip_serializing_if = "Option::is_none")]
    pub balance: Option<f64>,
    #[serde(rename = "estado", default)]
    pub active: Option<bool>,
    #[serde(rename = "cuentaId")]
    pub account_id: ResourceId,
    #[serde(rename = "cuenta", default, skip_serializing_if = "Option::is_none")]
    pub account: Option<Account>,
}

impl Resource for Transaction {
    const COLLECTION: &'static str = "movimientos";
    const MODAL_SUFFIX: &'static str = "Movimiento";
    const MESSAGES: ResourceMessages = ResourceMessages {
        title: "Movimientos",
        noun: "Movimiento",
        created: "Movimiento creado exitosamente",
        updated: "Movimiento actualizado exitosamente",
        deleted: "eliminado exitosamente",
        delete_failed: "Error al eliminar movimiento",
        empty: "No hay movimientos registrados",
        create_title: "Crear Nuevo Movimiento",
        delete_subject: "el movimiento",
        search_placeholder: "Buscar movimiento...",
    };
    const COLUMNS: &'static [&'static str] =
        &["Fecha", "Tipo de Movimiento", "Valor", "Saldo", "Cuenta"];

    fn id(&self) -> Option<ResourceId> {
        self.id
    }

    fn label(&self) -> String {
        self.kind.to_string()
    }

    fn cells(&self) -> Vec<String> {
        let account = self
            .account
            .as_ref()
            .map_or_else(|| self.account_id.to_string(), |a| a.number.clone());
        vec![
            self.date
                .map(|d| d.format("%d/%m/%Y").to_string())
                .unwrap_or_default(),
            self.kind.to_string(),
            format!("${:.2}", self.amount),
            self.balance.map(|b| format!("${b:.2}")).unwrap_or_default(),
            account,
        ]
    }
}

/// One row of the movements report for a customer and date range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRow {
    #[serde(rename = "fecha")]
    pub date: Option<String>,
    #[serde(rename = "cliente")]
    pub customer: Option<String>,
    #[serde(rename = "numeroCuenta")]
    pub account_number: Option<i64>,
    #[serde(rename = "tipo")]
    pub kind: Option<String>,
    #[serde(rename = "saldoInicial")]
    pub opening_balance: Option<f64>,
    #[serde(rename = "estado")]
    pub active: Option<bool>,
    #[serde(rename = "movimiento")]
    pub movement: Option<f64>,
    #[serde(rename = "saldoDisponible")]
    pub available_balance: Option<f64>,
}
