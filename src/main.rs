//! Interactive back-office console.
//!
//! Reads one command per line from stdin and redraws the current page after
//! every command, every page event (settled search, service response) and
//! every change to the notification queue.
//!
//! # Pages
//!
//! The address path selects the page: `/clientes`, `/cuentas`,
//! `/movimientos` or `/reportes`. Modal state lives in the query string, so
//! `goto /clientes?editCliente=4` behaves like a browser back/forward.
//!
//! # Commands
//!
//! List pages:
//! - `search <texto>`: Type into the search box (`search` alone clears it)
//! - `new`, `edit <id>`, `delete <id>`: Open a modal
//! - `submit <json>`: Send form data to the open create/edit modal
//! - `confirm`: Confirm the open delete modal
//! - `close`: Close the open modal
//! - `retry`: Reload after a failed list request
//!
//! Reports page:
//! - `cliente <id>`, `desde <AAAA-MM-DD>`, `hasta <AAAA-MM-DD>`: Criteria
//! - `buscar`: Fetch the report
//! - `json`, `pdf`: Save the report into the data directory
//!
//! Everywhere:
//! - `clientes`, `cuentas`, `movimientos`, `reportes`: Switch page
//! - `goto <url>`: Apply an address as if reached by navigation
//! - `dismiss <n>`: Dismiss notification `n`
//! - `help`, `quit`

use backoffice::app::ListPage;
use backoffice::domain::{Account, Customer, Resource, ResourceId, Transaction};
use backoffice::infrastructure::data_dir;
use backoffice::modal::Location;
use backoffice::notify::{NotificationId, NotificationQueue};
use backoffice::observability::init_tracing;
use backoffice::report::ReportPage;
use backoffice::services::{RestReportService, RestService};
use backoffice::ui::{self, PageViewModel, Theme};
use backoffice::{env_settings, initialize, AppContext, Config};
use chrono::NaiveDate;
use clap::Parser;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::Instrument;

const DEFAULT_COLUMNS: usize = 100;

const HELP: &str = "\
Páginas: clientes | cuentas | movimientos | reportes | goto <url>
Listas:  search <texto> | new | edit <id> | delete <id> | submit <json> | confirm | close | retry
Reporte: cliente <id> | desde <AAAA-MM-DD> | hasta <AAAA-MM-DD> | buscar | json | pdf
General: dismiss <n> | help | quit";

#[derive(Debug, Parser)]
#[command(name = "backoffice", version, about = "Banking back-office console")]
struct Cli {
    /// TOML configuration file
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Base URL of the REST API
    #[arg(long)]
    api_url: Option<String>,

    /// Address to start at, e.g. http://localhost:3000/cuentas
    #[arg(long)]
    start_url: Option<String>,

    /// Tracing filter directive (trace, debug, info, warn, error)
    #[arg(long)]
    trace_level: Option<String>,

    /// Also print log events to stderr
    #[arg(long, short = 'v')]
    verbose: bool,
}

/// Builds the configuration: file or defaults, then environment, then flags.
fn build_config(cli: &Cli) -> backoffice::Result<Config> {
    let base = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    let mut flags = BTreeMap::new();
    let overrides = [
        ("api_url", &cli.api_url),
        ("start_url", &cli.start_url),
        ("trace_level", &cli.trace_level),
    ];
    for (key, value) in overrides {
        if let Some(value) = value {
            flags.insert(key.to_string(), value.clone());
        }
    }

    Ok(base.with_overrides(&env_settings()).with_overrides(&flags))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PageKind {
    Customers,
    Accounts,
    Transactions,
    Reports,
}

impl PageKind {
    fn from_path(path: &str) -> Option<Self> {
        match path.trim_end_matches('/') {
            "" | "/clientes" => Some(Self::Customers),
            "/cuentas" => Some(Self::Accounts),
            "/movimientos" => Some(Self::Transactions),
            "/reportes" => Some(Self::Reports),
            _ => None,
        }
    }

    const fn path(self) -> &'static str {
        match self {
            Self::Customers => "/clientes",
            Self::Accounts => "/cuentas",
            Self::Transactions => "/movimientos",
            Self::Reports => "/reportes",
        }
    }
}

struct Console {
    context: AppContext,
    customers: ListPage<Customer>,
    accounts: ListPage<Account>,
    transactions: ListPage<Transaction>,
    report: ReportPage,
    current: PageKind,
    downloads: PathBuf,
    columns: usize,
}

impl Console {
    fn new(context: AppContext) -> backoffice::Result<Self> {
        let delay = context.config.search_debounce();
        let endpoints = context.endpoints.clone();

        let customers = ListPage::new(
            Arc::new(RestService::<Customer>::new(endpoints.clone())?),
            context.store.clone(),
            context.notifications.clone(),
            delay,
        );
        let accounts = ListPage::new(
            Arc::new(RestService::<Account>::new(endpoints.clone())?),
            context.store.clone(),
            context.notifications.clone(),
            delay,
        );
        let transactions = ListPage::new(
            Arc::new(RestService::<Transaction>::new(endpoints.clone())?),
            context.store.clone(),
            context.notifications.clone(),
            delay,
        );
        let report = ReportPage::new(
            Arc::new(RestReportService::new(endpoints)?),
            context.notifications.clone(),
        );

        let downloads = data_dir(&context.config);
        let columns = std::env::var("COLUMNS")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(DEFAULT_COLUMNS);

        Ok(Self {
            context,
            customers,
            accounts,
            transactions,
            report,
            current: PageKind::Customers,
            downloads,
            columns,
        })
    }

    fn notifications(&self) -> &NotificationQueue {
        &self.context.notifications
    }

    /// Applies `location` and makes the page it names current.
    fn navigate(&mut self, location: Location) {
        let Some(kind) = PageKind::from_path(location.path()) else {
            self.notifications()
                .warning(format!("Página desconocida: {}", location.path()));
            return;
        };
        tracing::debug!(page = ?kind, location = %location, "navigating");
        self.current = kind;

        match kind {
            PageKind::Customers => {
                self.customers.activate();
                self.customers.navigate(location);
            }
            PageKind::Accounts => {
                self.accounts.activate();
                self.accounts.navigate(location);
            }
            PageKind::Transactions => {
                self.transactions.activate();
                self.transactions.navigate(location);
            }
            PageKind::Reports => self.context.store.sync_location(location),
        }
    }

    fn goto(&mut self, target: &str) {
        let current = self.context.store.location();
        let resolved = url::Url::parse(current.as_str())
            .and_then(|base| base.join(target))
            .map(String::from)
            .unwrap_or_else(|_| target.to_string());

        match Location::parse(&resolved) {
            Ok(location) => self.navigate(location),
            Err(e) => {
                self.notifications().error(e.user_message());
            }
        }
    }

    fn switch(&mut self, kind: PageKind) {
        let location = self.context.store.location().at_path(kind.path());
        self.navigate(location);
    }

    /// Waits for the current page's next asynchronous event.
    async fn pump(&mut self) -> bool {
        match self.current {
            PageKind::Customers => self.customers.next().await,
            PageKind::Accounts => self.accounts.next().await,
            PageKind::Transactions => self.transactions.next().await,
            PageKind::Reports => std::future::pending().await,
        }
    }

    /// Runs one command line.
    ///
    /// # Returns
    ///
    /// `false` once the operator asked to quit.
    async fn execute(&mut self, line: &str) -> bool {
        let line = line.trim();
        let (command, argument) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(command, rest)| (command, rest.trim()));

        tracing::debug!(command, "command received");

        match command {
            "" => {}
            "quit" | "exit" => return false,
            "help" => {
                self.notifications().info(HELP);
            }
            "clientes" => self.switch(PageKind::Customers),
            "cuentas" => self.switch(PageKind::Accounts),
            "movimientos" => self.switch(PageKind::Transactions),
            "reportes" => self.switch(PageKind::Reports),
            "goto" => self.goto(argument),
            "dismiss" => match argument.parse::<u64>() {
                Ok(id) => {
                    self.notifications().dismiss(NotificationId(id));
                }
                Err(_) => self.usage("dismiss <n>"),
            },
            _ => {
                let span = tracing::debug_span!("page_command", page = ?self.current, command);
                self.page_command(command, argument).instrument(span).await;
            }
        }
        true
    }

    async fn page_command(&mut self, command: &str, argument: &str) {
        let notifications = self.context.notifications.clone();
        match self.current {
            PageKind::Customers => {
                list_command(&mut self.customers, &notifications, command, argument);
            }
            PageKind::Accounts => {
                list_command(&mut self.accounts, &notifications, command, argument);
            }
            PageKind::Transactions => {
                list_command(&mut self.transactions, &notifications, command, argument);
            }
            PageKind::Reports => self.report_command(command, argument).await,
        }
    }

    async fn report_command(&mut self, command: &str, argument: &str) {
        match command {
            "cliente" => match argument.parse::<ResourceId>() {
                Ok(id) => self.report.set_customer(Some(id)),
                Err(_) => self.usage("cliente <id>"),
            },
            "desde" => match parse_date(argument) {
                Ok(date) => self.report.set_from(date),
                Err(()) => self.usage("desde <AAAA-MM-DD>"),
            },
            "hasta" => match parse_date(argument) {
                Ok(date) => self.report.set_to(date),
                Err(()) => self.usage("hasta <AAAA-MM-DD>"),
            },
            "buscar" => {
                self.report.search().await;
            }
            "json" => {
                if self.ensure_downloads() {
                    self.report.export_json(&self.downloads).await;
                }
            }
            "pdf" => {
                if self.ensure_downloads() {
                    self.report.download_pdf(&self.downloads).await;
                }
            }
            other => unknown_command(self.notifications(), other),
        }
    }

    fn ensure_downloads(&self) -> bool {
        match std::fs::create_dir_all(&self.downloads) {
            Ok(()) => true,
            Err(e) => {
                self.notifications().error(format!(
                    "No se pudo crear {}: {e}",
                    self.downloads.display()
                ));
                false
            }
        }
    }

    fn usage(&self, usage: &str) {
        self.notifications().warning(format!("Uso: {usage}"));
    }

    fn draw(&self) {
        let theme = &self.context.theme;
        let frame = match self.current {
            PageKind::Customers => frame_for(&self.customers, theme, self.columns),
            PageKind::Accounts => frame_for(&self.accounts, theme, self.columns),
            PageKind::Transactions => frame_for(&self.transactions, theme, self.columns),
            PageKind::Reports => report_frame(&self.report, self.notifications(), theme),
        };
        print!("\u{001b}[2J\u{001b}[H{frame}> ");
        let _ = std::io::Write::flush(&mut std::io::stdout());
    }
}

fn frame_for<R: Resource>(page: &ListPage<R>, theme: &Theme, columns: usize) -> String {
    ui::render(&PageViewModel::from_page(page), theme, columns)
}

fn report_frame(report: &ReportPage, notifications: &NotificationQueue, theme: &Theme) -> String {
    use std::fmt::Write;

    let criteria = report.criteria();
    let show = |value: Option<String>| value.unwrap_or_else(|| "-".to_string());

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}{}Reportes ({}){}",
        Theme::bold(),
        Theme::fg(&theme.colors.header_fg),
        report.rows().len(),
        Theme::reset()
    );
    let _ = writeln!(
        out,
        "Cliente: {}  Desde: {}  Hasta: {}",
        show(criteria.customer_id.map(|id| id.to_string())),
        show(criteria.from.map(|d| d.to_string())),
        show(criteria.to.map(|d| d.to_string())),
    );
    if report.is_loading() {
        let _ = writeln!(out, "{}Cargando...{}", Theme::dim(), Theme::reset());
    }
    for row in report.rows() {
        let _ = writeln!(
            out,
            "{:<12} {:<20} {:>10} {:<10} {:>10.2} {:>10.2} {:>10.2}",
            row.date.as_deref().unwrap_or_default(),
            row.customer.as_deref().unwrap_or_default(),
            row.account_number.map(|n| n.to_string()).unwrap_or_default(),
            row.kind.as_deref().unwrap_or_default(),
            row.opening_balance.unwrap_or_default(),
            row.movement.unwrap_or_default(),
            row.available_balance.unwrap_or_default(),
        );
    }
    for notification in notifications.notifications() {
        let _ = writeln!(
            out,
            "{}{} {}{} {}[{}]{}",
            Theme::fg(theme.severity_fg(notification.severity)),
            notification.severity.icon(),
            notification.message,
            Theme::reset(),
            Theme::dim(),
            notification.id,
            Theme::reset()
        );
    }
    let _ = writeln!(
        out,
        "{}cliente <id> | desde <fecha> | hasta <fecha> | buscar | json | pdf | quit{}",
        Theme::dim(),
        Theme::reset()
    );
    out
}

fn list_command<R: Resource>(
    page: &mut ListPage<R>,
    notifications: &NotificationQueue,
    command: &str,
    argument: &str,
) {
    match command {
        "search" => {
            page.set_search_text(argument);
        }
        "new" => {
            page.open_create();
        }
        "edit" | "delete" => {
            let Ok(id) = argument.parse::<ResourceId>() else {
                notifications.warning(format!("Uso: {command} <id>"));
                return;
            };
            let Some(item) = page.state().find(id).cloned() else {
                notifications.warning(format!("No existe un registro con id {id}"));
                return;
            };
            if command == "edit" {
                page.open_edit(item);
            } else {
                page.open_delete(item);
            }
        }
        "submit" => match serde_json::from_str::<R>(argument) {
            Ok(data) => {
                page.submit(data);
            }
            Err(e) => {
                notifications.error(format!("Datos inválidos: {e}"));
            }
        },
        "confirm" => {
            page.confirm_delete();
        }
        "close" => {
            match page.modals().open_kind() {
                Some(kind) => {
                    page.close_modal(kind);
                }
                None => {
                    notifications.info("No hay ningún modal abierto");
                }
            }
        }
        "retry" => {
            page.retry();
        }
        other => unknown_command(notifications, other),
    }
}

fn unknown_command(notifications: &NotificationQueue, command: &str) {
    notifications.warning(format!("Comando desconocido: {command} (help)"));
}

fn parse_date(argument: &str) -> Result<Option<NaiveDate>, ()> {
    if argument.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(argument, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| ())
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    let config = match build_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("backoffice: {e}");
            process::exit(1);
        }
    };

    init_tracing(&config, cli.verbose);
    tracing::info!(api_url = %config.api_url, "backoffice console starting");

    let console = initialize(&config).and_then(Console::new);
    let mut console = match console {
        Ok(console) => console,
        Err(e) => {
            tracing::error!(error = %e, "failed to initialize");
            eprintln!("backoffice: {e}");
            process::exit(1);
        }
    };

    let start = console.context.store.location();
    console.navigate(start);
    console.draw();

    let mut notices = console.context.notifications.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => match line {
                Ok(Some(line)) => {
                    if !console.execute(&line).await {
                        break;
                    }
                    console.draw();
                }
                Ok(None) => break,
                Err(e) => {
                    tracing::error!(error = %e, "failed to read stdin");
                    break;
                }
            },
            render = console.pump() => {
                if render {
                    console.draw();
                }
            }
            Ok(()) = notices.changed() => console.draw(),
        }
    }

    tracing::info!("backoffice console stopped");
}
