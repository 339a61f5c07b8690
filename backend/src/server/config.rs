//! Application settings and the HTTP server configuration object.

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use worksheets::outbound::persistence::DbPool;
use worksheets::outbound::postgrest::PostgrestWorksheetRepository;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Start-up settings loaded from CLI flags, `WORKSHEETS_*` variables and
/// configuration files.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "WORKSHEETS")]
pub struct AppSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL; selects the Diesel store when set.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    pub pool_max_size: Option<u32>,
    /// PostgREST project URL; used when no database URL is set.
    pub postgrest_url: Option<String>,
    /// Key sent to PostgREST as `apikey` and bearer token.
    pub postgrest_api_key: Option<String>,
    /// Timeout for store requests, in seconds.
    pub request_timeout_secs: Option<u64>,
    /// Apply embedded migrations before serving.
    #[ortho_config(default = true)]
    pub run_migrations: bool,
}

impl AppSettings {
    /// Parse the bind address, falling back to all interfaces on 8080.
    pub fn bind_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        self.bind_addr
            .as_deref()
            .unwrap_or(DEFAULT_BIND_ADDR)
            .parse()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.request_timeout_secs
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        )
    }
}

/// Record store chosen at start-up.
pub enum WorksheetStore {
    Diesel(DbPool),
    Postgrest(PostgrestWorksheetRepository),
    InMemory,
}

impl WorksheetStore {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Diesel(_) => "postgres",
            Self::Postgrest(_) => "postgrest",
            Self::InMemory => "memory",
        }
    }
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) store: WorksheetStore,
}

impl ServerConfig {
    /// Serve from the in-memory store until another one is attached.
    #[must_use]
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            store: WorksheetStore::InMemory,
        }
    }

    /// Attach the record store backing the handlers.
    #[must_use]
    pub fn with_store(mut self, store: WorksheetStore) -> Self {
        self.store = store;
        self
    }
}
