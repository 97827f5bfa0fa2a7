use async_trait::async_trait;
use sqlx::PgPool;

use crate::models::{Event, NewEvent, NewTicket, NewUser, Ticket, TicketStatus, User};
use crate::store::{Page, Store, StoreError};

/// Postgres-backed store. Schema lives in `migrations/` and is applied with
/// `sqlx::migrate!` at startup.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn create_user(&self, new: NewUser) -> Result<User, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (username, password)
             VALUES ($1, $2)
             RETURNING id, username, password, created_at, updated_at",
        )
        .bind(&new.username)
        .bind(&new.password)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    async fn get_user(&self, id: i64) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password, created_at, updated_at
             FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn list_users(&self, page: Page) -> Result<Vec<User>, StoreError> {
        let users = sqlx::query_as::<_, User>(
            "SELECT id, username, password, created_at, updated_at
             FROM users ORDER BY id OFFSET $1 LIMIT $2",
        )
        .bind(page.offset())
        .bind(page.limit())
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn create_event(&self, new: NewEvent) -> Result<Event, StoreError> {
        let event = sqlx::query_as::<_, Event>(
            "INSERT INTO events (name, price)
             VALUES ($1, $2)
             RETURNING id, name, price, created_at, updated_at",
        )
        .bind(&new.name)
        .bind(new.price)
        .fetch_one(&self.pool)
        .await?;

        Ok(event)
    }

    async fn get_event(&self, id: i64) -> Result<Option<Event>, StoreError> {
        let event = sqlx::query_as::<_, Event>(
            "SELECT id, name, price, created_at, updated_at
             FROM events WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(event)
    }

    async fn list_events(&self, page: Page) -> Result<Vec<Event>, StoreError> {
        let events = sqlx::query_as::<_, Event>(
            "SELECT id, name, price, created_at, updated_at
             FROM events ORDER BY id OFFSET $1 LIMIT $2",
        )
        .bind(page.offset())
        .bind(page.limit())
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    async fn create_ticket(&self, new: NewTicket) -> Result<Ticket, StoreError> {
        let ticket = sqlx::query_as::<_, Ticket>(
            "INSERT INTO tickets (user_id, event_id, status)
             VALUES ($1, $2, $3)
             RETURNING id, user_id, event_id, status, created_at, updated_at",
        )
        .bind(new.user_id)
        .bind(new.event_id)
        .bind(new.status)
        .fetch_one(&self.pool)
        .await?;

        Ok(ticket)
    }

    async fn get_ticket(&self, id: i64) -> Result<Option<Ticket>, StoreError> {
        let ticket = sqlx::query_as::<_, Ticket>(
            "SELECT id, user_id, event_id, status, created_at, updated_at
             FROM tickets WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(ticket)
    }

    async fn list_tickets(&self, page: Page) -> Result<Vec<Ticket>, StoreError> {
        let tickets = sqlx::query_as::<_, Ticket>(
            "SELECT id, user_id, event_id, status, created_at, updated_at
             FROM tickets ORDER BY id OFFSET $1 LIMIT $2",
        )
        .bind(page.offset())
        .bind(page.limit())
        .fetch_all(&self.pool)
        .await?;

        Ok(tickets)
    }

    async fn update_ticket_status(
        &self,
        id: i64,
        expected: TicketStatus,
        next: TicketStatus,
    ) -> Result<Option<Ticket>, StoreError> {
        // Single-statement compare-and-swap; the WHERE clause on status makes
        // racing transitions lose cleanly instead of double-applying.
        let ticket = sqlx::query_as::<_, Ticket>(
            "UPDATE tickets SET status = $2, updated_at = now()
             WHERE id = $1 AND status = $3
             RETURNING id, user_id, event_id, status, created_at, updated_at",
        )
        .bind(id)
        .bind(next)
        .bind(expected)
        .fetch_optional(&self.pool)
        .await?;

        Ok(ticket)
    }
}
