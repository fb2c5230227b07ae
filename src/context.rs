//! The single shared instance of every store, built once and passed by
//! reference to whoever needs it.

use std::sync::Arc;

use crate::api::Transport;
use crate::api::auth::{AuthSession, TokenSlot};
use crate::api::http::HttpTransport;
use crate::config::Config;
use crate::error::TransportError;
use crate::model::{Admin, Department, DepartmentAdmin, Role};
use crate::store::ResourceStore;
use crate::store::counts::CountsStore;

pub struct AppContext {
    pub admins: ResourceStore<Admin>,
    pub department_admins: ResourceStore<DepartmentAdmin>,
    pub departments: ResourceStore<Department>,
    pub roles: ResourceStore<Role>,
    pub counts: CountsStore,
    pub auth: AuthSession,
}

impl AppContext {
    /// Build every store on top of one shared transport.
    pub fn new(transport: Arc<dyn Transport>, token: TokenSlot) -> Self {
        Self {
            admins: ResourceStore::new(Arc::clone(&transport)),
            department_admins: ResourceStore::new(Arc::clone(&transport)),
            departments: ResourceStore::new(Arc::clone(&transport)),
            roles: ResourceStore::new(Arc::clone(&transport)),
            counts: CountsStore::new(Arc::clone(&transport)),
            auth: AuthSession::new(transport, token),
        }
    }

    /// HTTP-backed context from command-line configuration.
    pub fn from_config(config: &Config) -> Result<Self, TransportError> {
        let token = TokenSlot::load(config.token_path());
        let transport = HttpTransport::with_timeout(&config.api_url, token.clone(), config.timeout())?;
        Ok(Self::new(Arc::new(transport), token))
    }

    /// Initial load: profile, every list, and the dashboard counts.
    pub async fn refresh_everything(&self) {
        self.auth.fetch_user().await;
        tokio::join!(
            self.admins.fetch_all(),
            self.department_admins.fetch_all(),
            self.departments.fetch_all(),
            self.roles.fetch_all(),
        );
        self.counts.refresh_all().await;
    }
}
