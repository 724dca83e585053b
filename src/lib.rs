//! Project, client, provider, team and lead tracking for a construction
//! company's back office. Everything here is plain data plus the rules that
//! act on it; the desktop binary wires it to the UI.

pub mod config;
pub mod csv;
pub mod dashboard;
pub mod error;
pub mod finance;
pub mod forms;
pub mod gantt;
pub mod ids;
pub mod media;
pub mod model;
pub mod seed;
pub mod settings;
pub mod store;
pub mod validate;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub use config::DashboardConfig;
pub use dashboard::{Dashboard, Notice, NoticeVariant, Overview, ProjectForm, Snapshot};
pub use error::{CrmError, Result};
pub use ids::{EntityKind, IdAllocator};

/// Log filter env var; falls back to `winnbuilders_crm=info`.
pub const LOG_ENV: &str = "CRM_LOG";

/// Installs the global fmt subscriber. Safe to call more than once.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new("winnbuilders_crm=info"));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
