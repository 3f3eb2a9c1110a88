//! Application state wiring all services together.
//!
//! AppState holds the concrete repository and service instances used by
//! the HTTP handlers. The messaging service is generic over its storage
//! and transport seams; AppState pins it to the SQLite implementations
//! and the WebSocket connection table.

use std::sync::Arc;

use natter_core::presence::PresenceRegistry;
use natter_core::service::MessagingService;
use natter_infra::sqlite::contact::SqliteContactRepository;
use natter_infra::sqlite::group::SqliteGroupRepository;
use natter_infra::sqlite::message::SqliteMessageRepository;
use natter_infra::sqlite::pool::DatabasePool;
use natter_infra::sqlite::user::SqliteUserRepository;

use crate::transport::ConnectionTable;

/// Concrete type alias for the messaging service pinned to infra
/// implementations and the WebSocket transport.
pub type ConcreteMessagingService =
    MessagingService<SqliteMessageRepository, SqliteGroupRepository, Arc<ConnectionTable>>;

/// Shared application state holding repositories, the messaging core,
/// and the live-connection bookkeeping.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<SqliteUserRepository>,
    pub contacts: Arc<SqliteContactRepository>,
    pub groups: Arc<SqliteGroupRepository>,
    pub messaging: Arc<ConcreteMessagingService>,
    pub presence: Arc<PresenceRegistry>,
    pub connections: Arc<ConnectionTable>,
}

impl AppState {
    /// Initialize the application state: connect to the database
    /// (running migrations) and wire the messaging core.
    pub async fn init(database_url: &str) -> anyhow::Result<Self> {
        let db_pool = DatabasePool::new(database_url).await?;

        let presence = Arc::new(PresenceRegistry::new());
        let connections = Arc::new(ConnectionTable::new());

        // The fan-out router gets its own group repository instance so
        // membership reads go straight to the store on every message.
        let messaging = MessagingService::new(
            SqliteMessageRepository::new(db_pool.clone()),
            Arc::clone(&presence),
            SqliteGroupRepository::new(db_pool.clone()),
            Arc::clone(&connections),
        );

        Ok(Self {
            users: Arc::new(SqliteUserRepository::new(db_pool.clone())),
            contacts: Arc::new(SqliteContactRepository::new(db_pool.clone())),
            groups: Arc::new(SqliteGroupRepository::new(db_pool.clone())),
            messaging: Arc::new(messaging),
            presence,
            connections,
        })
    }
}
