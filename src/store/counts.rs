//! Dashboard totals read from the `/count` endpoints.

use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, warn};

use super::classify;
use crate::api::{ApiRequest, Transport};
use crate::error::StoreError;

const INVALID_FORMAT: &str = "Invalid response format.";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CountKind {
    Departments,
    Roles,
    DepartmentAdmins,
}

impl CountKind {
    pub const ALL: [CountKind; 3] = [CountKind::Departments, CountKind::Roles, CountKind::DepartmentAdmins];

    pub fn path(&self) -> &'static str {
        match self {
            CountKind::Departments => "/departments/count",
            CountKind::Roles => "/roles/count",
            CountKind::DepartmentAdmins => "/department-admins/count",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CountKind::Departments => "departments",
            CountKind::Roles => "roles",
            CountKind::DepartmentAdmins => "department admins",
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Counts {
    pub departments: Option<u64>,
    pub roles: Option<u64>,
    pub department_admins: Option<u64>,
    pub error: Option<String>,
    in_flight: usize,
}

impl Counts {
    pub fn get(&self, kind: CountKind) -> Option<u64> {
        match kind {
            CountKind::Departments => self.departments,
            CountKind::Roles => self.roles,
            CountKind::DepartmentAdmins => self.department_admins,
        }
    }

    pub fn loading(&self) -> bool {
        self.in_flight > 0
    }

    fn slot(&mut self, kind: CountKind) -> &mut Option<u64> {
        match kind {
            CountKind::Departments => &mut self.departments,
            CountKind::Roles => &mut self.roles,
            CountKind::DepartmentAdmins => &mut self.department_admins,
        }
    }
}

#[derive(Clone)]
pub struct CountsStore {
    transport: Arc<dyn Transport>,
    state: Arc<Mutex<Counts>>,
}

impl CountsStore {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport, state: Arc::new(Mutex::new(Counts::default())) }
    }

    pub fn snapshot(&self) -> Counts {
        self.state.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn write<T>(&self, f: impl FnOnce(&mut Counts) -> T) -> T {
        f(&mut self.state.lock().unwrap_or_else(PoisonError::into_inner))
    }

    /// Fetch one total. A non-numeric `count` is rejected.
    pub async fn count(&self, kind: CountKind) {
        self.write(|c| {
            c.in_flight += 1;
            c.error = None;
        });
        let outcome = self.load(kind).await;
        self.write(|c| {
            c.in_flight = c.in_flight.saturating_sub(1);
            match outcome {
                Ok(n) => {
                    debug!(kind = kind.label(), count = n, "count refreshed");
                    *c.slot(kind) = Some(n);
                }
                Err(e) => c.error = Some(e.to_string()),
            }
        });
    }

    async fn load(&self, kind: CountKind) -> Result<u64, StoreError> {
        let fallback = format!("Failed to count {}.", kind.label());
        let result = self.transport.send(ApiRequest::get(kind.path())).await;
        let resp = classify(result, &fallback, kind.path())?;
        let env = resp.envelope::<serde_json::Value>().map_err(|e| {
            warn!(kind = kind.label(), error = %e, "unusable count envelope");
            StoreError::Transport(fallback.clone())
        })?;
        match env.count.as_ref().and_then(serde_json::Value::as_u64) {
            Some(n) if env.success => Ok(n),
            _ => Err(StoreError::Application(env.message_or(INVALID_FORMAT))),
        }
    }

    pub async fn refresh_all(&self) {
        for kind in CountKind::ALL {
            self.count(kind).await;
        }
    }
}
