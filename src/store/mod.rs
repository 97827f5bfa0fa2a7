use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Event, NewEvent, NewTicket, NewUser, Ticket, TicketStatus, User};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Upper bound on a single list page.
pub const MAX_PAGE_SIZE: i64 = 100;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error")]
    Database(#[from] sqlx::Error),
}

/// Offset/limit window for list operations, clamped at construction so no
/// caller can page past [`MAX_PAGE_SIZE`].
#[derive(Debug, Clone, Copy)]
pub struct Page {
    offset: i64,
    limit: i64,
}

impl Page {
    pub fn new(offset: i64, limit: i64) -> Self {
        Self {
            offset: offset.max(0),
            limit: limit.clamp(1, MAX_PAGE_SIZE),
        }
    }

    pub fn offset(&self) -> i64 {
        self.offset
    }

    pub fn limit(&self) -> i64 {
        self.limit
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(0, MAX_PAGE_SIZE)
    }
}

/// Persistence seam for the whole service. Records are keyed by
/// store-assigned integer ids starting at 1; `get_*` return `None` on a
/// miss, `list_*` return id-ordered pages.
///
/// `update_ticket_status` is the one mutation with a guard: it persists the
/// new status only if the stored status still equals `expected`, and returns
/// `None` when another request got there first.
#[async_trait]
pub trait Store: Send + Sync {
    async fn create_user(&self, new: NewUser) -> Result<User, StoreError>;
    async fn get_user(&self, id: i64) -> Result<Option<User>, StoreError>;
    async fn list_users(&self, page: Page) -> Result<Vec<User>, StoreError>;

    async fn create_event(&self, new: NewEvent) -> Result<Event, StoreError>;
    async fn get_event(&self, id: i64) -> Result<Option<Event>, StoreError>;
    async fn list_events(&self, page: Page) -> Result<Vec<Event>, StoreError>;

    async fn create_ticket(&self, new: NewTicket) -> Result<Ticket, StoreError>;
    async fn get_ticket(&self, id: i64) -> Result<Option<Ticket>, StoreError>;
    async fn list_tickets(&self, page: Page) -> Result<Vec<Ticket>, StoreError>;
    async fn update_ticket_status(
        &self,
        id: i64,
        expected: TicketStatus,
        next: TicketStatus,
    ) -> Result<Option<Ticket>, StoreError>;
}
