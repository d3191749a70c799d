//! Service wiring shared by the binary and the HTTP tests

use std::sync::Arc;

use actix_web::web;
use sqlx::MySqlPool;

use crate::config::{AppConfig, NotificationConfig};
use crate::core::{Clock, ReportingCalendar, Result};
use crate::middleware::configure_extractors;
use crate::modules::catalog::repositories::{MySqlServiceTypeRepository, ServiceTypeRepository};
use crate::modules::catalog::{self, services::CatalogService};
use crate::modules::employees::repositories::{EmployeeRepository, MySqlEmployeeRepository};
use crate::modules::employees::{self, services::EmployeeService};
use crate::modules::health::{self, HealthState};
use crate::modules::notifications::services::{AuditLogSink, EventPublisher, WebhookSink};
use crate::modules::reports::{self, services::ReportService};
use crate::modules::sales::repositories::{MySqlSaleRepository, SaleRepository};
use crate::modules::sales::{self, services::SaleService};
use crate::modules::withdrawals::repositories::{MySqlWithdrawalRepository, WithdrawalRepository};
use crate::modules::withdrawals::{self, services::EarningsService};
use crate::store::InMemoryStore;

/// One handle per repository trait
#[derive(Clone)]
pub struct Repositories {
    pub employees: Arc<dyn EmployeeRepository>,
    pub service_types: Arc<dyn ServiceTypeRepository>,
    pub sales: Arc<dyn SaleRepository>,
    pub withdrawals: Arc<dyn WithdrawalRepository>,
}

impl Repositories {
    pub fn mysql(pool: MySqlPool) -> Self {
        Self {
            employees: Arc::new(MySqlEmployeeRepository::new(pool.clone())),
            service_types: Arc::new(MySqlServiceTypeRepository::new(pool.clone())),
            sales: Arc::new(MySqlSaleRepository::new(pool.clone())),
            withdrawals: Arc::new(MySqlWithdrawalRepository::new(pool)),
        }
    }

    pub fn in_memory(store: Arc<InMemoryStore>) -> Self {
        Self {
            employees: store.clone(),
            service_types: store.clone(),
            sales: store.clone(),
            withdrawals: store,
        }
    }
}

/// Settings the services read at construction
#[derive(Debug, Clone)]
pub struct ServiceSettings {
    pub calendar: ReportingCalendar,
    pub top_employees: usize,
    pub recent_sales: usize,
    pub withdrawal_notify_email: Option<String>,
}

impl ServiceSettings {
    pub fn from_config(app: &AppConfig, notifications: &NotificationConfig) -> Self {
        Self {
            calendar: app.calendar(),
            top_employees: app.dashboard_top_employees,
            recent_sales: app.dashboard_recent_sales,
            withdrawal_notify_email: notifications.withdrawal_notify_email.clone(),
        }
    }
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            calendar: ReportingCalendar::utc(),
            top_employees: 5,
            recent_sales: 10,
            withdrawal_notify_email: None,
        }
    }
}

/// Audit sink always; webhook sink when a URL is configured
pub fn event_publisher(config: &NotificationConfig, clock: Arc<dyn Clock>) -> Result<EventPublisher> {
    let mut publisher = EventPublisher::new(clock).with_sink(Arc::new(AuditLogSink));

    if let (Some(url), Some(secret)) = (&config.webhook_url, &config.webhook_secret) {
        publisher = publisher.with_sink(Arc::new(WebhookSink::new(url.clone(), secret.clone())?));
        tracing::info!(url = %url, "Webhook notifications enabled");
    }

    Ok(publisher)
}

/// Services shared by every worker
#[derive(Clone)]
pub struct AppState {
    pub employees: Arc<EmployeeService>,
    pub catalog: Arc<CatalogService>,
    pub sales: Arc<SaleService>,
    pub reports: Arc<ReportService>,
    pub earnings: Arc<EarningsService>,
    pub health: HealthState,
}

impl AppState {
    pub fn new(
        repos: Repositories,
        settings: ServiceSettings,
        clock: Arc<dyn Clock>,
        events: Arc<EventPublisher>,
        health: HealthState,
    ) -> Self {
        let employees = EmployeeService::new(repos.employees.clone(), clock.clone());
        let catalog = CatalogService::new(repos.service_types.clone(), clock.clone());

        let sales = SaleService::new(
            repos.sales.clone(),
            repos.employees.clone(),
            repos.service_types.clone(),
            settings.calendar,
            clock.clone(),
            events.clone(),
        );

        let reports = ReportService::new(
            repos.sales.clone(),
            repos.employees.clone(),
            repos.service_types.clone(),
            settings.calendar,
            clock.clone(),
            settings.top_employees,
            settings.recent_sales,
        );

        let earnings = EarningsService::new(
            repos.withdrawals.clone(),
            repos.sales.clone(),
            repos.employees.clone(),
            settings.calendar,
            clock,
            events,
            settings.withdrawal_notify_email,
        );

        Self {
            employees: Arc::new(employees),
            catalog: Arc::new(catalog),
            sales: Arc::new(sales),
            reports: Arc::new(reports),
            earnings: Arc::new(earnings),
            health,
        }
    }

    /// Register shared state, extractor error handlers and every route
    ///
    /// Modules sharing a path prefix are composed into one scope: actix stops
    /// at the first scope whose prefix matches, so a second `/employees`
    /// scope would never be reached.
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(web::Data::new(self.employees.clone()))
            .app_data(web::Data::new(self.catalog.clone()))
            .app_data(web::Data::new(self.sales.clone()))
            .app_data(web::Data::new(self.reports.clone()))
            .app_data(web::Data::new(self.earnings.clone()))
            .app_data(web::Data::new(self.health.clone()));

        configure_extractors(cfg);

        health::configure(cfg);
        reports::controllers::configure(cfg);

        cfg.service(
            web::scope("/services")
                .configure(catalog::controllers::configure)
                .configure(sales::controllers::configure),
        )
        .service(
            web::scope("/employees")
                .configure(withdrawals::controllers::configure)
                .configure(employees::controllers::configure),
        )
        .service(web::scope("/withdrawals").configure(withdrawals::controllers::configure_reviews));
    }
}
