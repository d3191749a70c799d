// In-memory application context
//
// Services are wired exactly as in the binary, but over `InMemoryStore` and
// a `FixedClock` the test can move.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rust_decimal::Decimal;

use salonledger::app::{AppState, Repositories, ServiceSettings};
use salonledger::core::{Clock, FixedClock, ReportingCalendar, Result};
use salonledger::middleware::identity::{EMPLOYEE_ID_HEADER, ROLE_HEADER, USER_ID_HEADER};
use salonledger::modules::catalog::models::ServiceType;
use salonledger::modules::catalog::repositories::ServiceTypeRepository;
use salonledger::modules::employees::models::Employee;
use salonledger::modules::employees::repositories::EmployeeRepository;
use salonledger::modules::health::HealthState;
use salonledger::modules::notifications::models::EventEnvelope;
use salonledger::modules::notifications::services::{EventPublisher, EventSink};
use salonledger::store::InMemoryStore;

use super::TestDataFactory;

/// Keeps every delivered event name in order
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<String>>,
}

impl RecordingSink {
    pub fn names(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl EventSink for RecordingSink {
    fn name(&self) -> &'static str {
        "recording"
    }

    async fn deliver(&self, envelope: &EventEnvelope) -> Result<()> {
        self.events
            .lock()
            .unwrap()
            .push(envelope.event.name().to_string());
        Ok(())
    }
}

pub struct TestContext {
    pub store: Arc<InMemoryStore>,
    pub clock: Arc<FixedClock>,
    pub events: Arc<RecordingSink>,
    pub state: AppState,
    pub admin_id: String,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_calendar(ReportingCalendar::utc())
    }

    pub fn with_calendar(calendar: ReportingCalendar) -> Self {
        let store = Arc::new(InMemoryStore::new());
        let clock = Arc::new(FixedClock::new(TestDataFactory::reference_now()));
        let events = Arc::new(RecordingSink::default());

        let dyn_clock: Arc<dyn Clock> = clock.clone();
        let publisher = EventPublisher::new(dyn_clock.clone()).with_sink(events.clone());

        let settings = ServiceSettings {
            calendar,
            top_employees: 3,
            recent_sales: 5,
            withdrawal_notify_email: Some("finanzas@example.com".to_string()),
        };

        let state = AppState::new(
            Repositories::in_memory(store.clone()),
            settings,
            dyn_clock,
            Arc::new(publisher),
            HealthState::memory(),
        );

        Self {
            store,
            clock,
            events,
            state,
            admin_id: TestDataFactory::admin_id(),
        }
    }

    pub async fn seed_employee(&self, first_name: &str, rate: Decimal) -> Employee {
        let employee = TestDataFactory::employee(first_name, rate);
        EmployeeRepository::save(self.store.as_ref(), &employee)
            .await
            .unwrap();
        employee
    }

    pub async fn seed_inactive_employee(&self, first_name: &str, rate: Decimal) -> Employee {
        let mut employee = TestDataFactory::employee(first_name, rate);
        employee.is_active = false;
        EmployeeRepository::save(self.store.as_ref(), &employee)
            .await
            .unwrap();
        employee
    }

    pub async fn seed_service_type(&self, name: &str, default_price: Decimal) -> ServiceType {
        let service_type = TestDataFactory::service_type(name, default_price);
        ServiceTypeRepository::save(self.store.as_ref(), &service_type)
            .await
            .unwrap();
        service_type
    }

    pub fn admin_headers(&self) -> Vec<(&'static str, String)> {
        vec![
            (USER_ID_HEADER, self.admin_id.clone()),
            (ROLE_HEADER, "ADMIN".to_string()),
        ]
    }

    pub fn employee_headers(&self, employee: &Employee) -> Vec<(&'static str, String)> {
        vec![
            (USER_ID_HEADER, uuid::Uuid::new_v4().to_string()),
            (ROLE_HEADER, "EMPLOYEE".to_string()),
            (EMPLOYEE_ID_HEADER, employee.id.clone()),
        ]
    }
}
